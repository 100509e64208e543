//! `SQLite` queries for the `users` table and the `user_pets` link table.
//!
//! A user's `pet_ids` are stored as one `user_pets` row per owned pet and
//! are loaded back with the user row.

use std::collections::BTreeSet;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqliteConnection};

use pethub_domain::id::{PetId, UserId};
use pethub_domain::time::Timestamp;
use pethub_domain::user::{User, UserFilter};

pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let email: String = row.try_get("email")?;
        let phone: Option<String> = row.try_get("phone")?;
        let pet_ids: Option<String> = row.try_get("pet_ids")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let id = UserId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let pet_ids = pet_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.is_empty())
            .map(PetId::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(User {
            id,
            name,
            email,
            phone,
            pet_ids,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const SELECT: &str = r"
    SELECT u.id, u.name, u.email, u.phone, u.created_at, u.updated_at,
           (SELECT GROUP_CONCAT(up.pet_id) FROM user_pets up WHERE up.user_id = u.id) AS pet_ids
    FROM users u
";
const INSERT: &str = r"
    INSERT INTO users (id, name, email, phone, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const UPDATE: &str = r"
    UPDATE users
    SET name = ?, email = ?, phone = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";
const INSERT_LINK: &str = "INSERT INTO user_pets (user_id, pet_id) VALUES (?, ?)";
const DELETE_LINKS: &str = "DELETE FROM user_pets WHERE user_id = ?";

/// Replace the stored pet set of `user` with `user.pet_ids`.
async fn write_links(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(DELETE_LINKS)
        .bind(user.id.to_string())
        .execute(&mut *conn)
        .await?;
    for pet_id in &user.pet_ids {
        sqlx::query(INSERT_LINK)
            .bind(user.id.to_string())
            .bind(pet_id.to_string())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub(crate) async fn insert(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(INSERT)
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;
    write_links(conn, user).await
}

pub(crate) async fn find(
    conn: &mut SqliteConnection,
    id: UserId,
) -> Result<Option<User>, sqlx::Error> {
    let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT);
    query.push(" WHERE u.id = ").push_bind(id.to_string());

    let row: Option<Wrapper> = query.build_query_as().fetch_optional(&mut *conn).await?;
    Ok(Wrapper::maybe(row))
}

pub(crate) async fn list(
    conn: &mut SqliteConnection,
    filter: &UserFilter,
) -> Result<Vec<User>, sqlx::Error> {
    let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT);
    query.push(" WHERE 1 = 1");
    if let Some(name) = &filter.name {
        query.push(" AND u.name = ").push_bind(name.clone());
    }
    if let Some(email) = &filter.email {
        query.push(" AND u.email = ").push_bind(email.clone());
    }
    query.push(" ORDER BY u.created_at, u.id");

    let rows: Vec<Wrapper> = query.build_query_as().fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().map(|w| w.0).collect())
}

pub(crate) async fn update(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(UPDATE)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.updated_at.to_rfc3339())
        .bind(user.id.to_string())
        .execute(&mut *conn)
        .await?;
    write_links(conn, user).await
}

pub(crate) async fn delete(conn: &mut SqliteConnection, id: UserId) -> Result<bool, sqlx::Error> {
    sqlx::query(DELETE_LINKS)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query(DELETE_BY_ID)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
