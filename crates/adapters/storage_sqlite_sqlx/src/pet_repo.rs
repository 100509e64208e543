//! `SQLite` queries for the `pets` table.
//!
//! Every function runs on a borrowed connection so that callers decide the
//! transaction it belongs to.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqliteConnection};

use pethub_domain::id::{PetId, UserId};
use pethub_domain::pet::{Pet, PetFilter};

use crate::user_repo::parse_timestamp;

/// Wrapper for converting database rows into domain [`Pet`].
struct Wrapper(Pet);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Pet> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let species: Option<String> = row.try_get("species")?;
        let user_id: Option<String> = row.try_get("user_id")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let id = PetId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let user_id = user_id
            .map(|s| UserId::from_str(&s))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Pet {
            id,
            name,
            species,
            user_id,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO pets (id, name, species, user_id, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM pets WHERE id = ?";
const UPDATE: &str = r"
    UPDATE pets
    SET name = ?, species = ?, user_id = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM pets WHERE id = ?";

pub(crate) async fn insert(conn: &mut SqliteConnection, pet: &Pet) -> Result<(), sqlx::Error> {
    sqlx::query(INSERT)
        .bind(pet.id.to_string())
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(pet.user_id.map(|id| id.to_string()))
        .bind(pet.created_at.to_rfc3339())
        .bind(pet.updated_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn find(conn: &mut SqliteConnection, id: PetId) -> Result<Option<Pet>, sqlx::Error> {
    let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(Wrapper::maybe(row))
}

pub(crate) async fn list(
    conn: &mut SqliteConnection,
    filter: &PetFilter,
) -> Result<Vec<Pet>, sqlx::Error> {
    let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT * FROM pets WHERE 1 = 1");
    if let Some(name) = &filter.name {
        query.push(" AND name = ").push_bind(name.clone());
    }
    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id.to_string());
    }
    query.push(" ORDER BY created_at, id");

    let rows: Vec<Wrapper> = query.build_query_as().fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().map(|w| w.0).collect())
}

pub(crate) async fn update(conn: &mut SqliteConnection, pet: &Pet) -> Result<(), sqlx::Error> {
    sqlx::query(UPDATE)
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(pet.user_id.map(|id| id.to_string()))
        .bind(pet.updated_at.to_rfc3339())
        .bind(pet.id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn delete(conn: &mut SqliteConnection, id: PetId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(DELETE_BY_ID)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_many(
    conn: &mut SqliteConnection,
    ids: &[PetId],
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new("DELETE FROM pets WHERE id IN (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");

    let result = query.build().execute(&mut *conn).await?;
    Ok(result.rows_affected())
}
