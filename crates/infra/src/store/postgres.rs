//! Postgres-backed entity stores.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `MissingReference` |
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Database` |
//! | RowNotFound | N/A | `NotFound` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | Other | N/A | `Database` |
//!
//! Referential integrity (care event -> pet, cascade on delete) is enforced by
//! the schema, never re-checked here.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use mascotas_core::{CareEventId, DomainError, Page, PetId};
use mascotas_pets::{CareEvent, CareEventDraft, Pet, PetDraft};

use super::r#trait::{CareEventStore, PetStore, StoreError, StoreHealth, StoreResult};

/// Postgres store for pets and care events over a shared connection pool.
///
/// `PgPool` is cheap to clone and safe to share across request handlers.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetStore for PostgresStore {
    #[instrument(skip(self, draft), err)]
    async fn create(&self, draft: PetDraft) -> StoreResult<Pet> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO mascotas (nombre, especie, raza, fecha_nacimiento, sexo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(draft.species.as_str())
        .bind(&draft.breed)
        .bind(draft.birth_date)
        .bind(draft.sex.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_pet", e))?;

        Ok(draft.with_id(PetId::from_db(id)))
    }

    #[instrument(skip(self), fields(pet_id = %id), err)]
    async fn get(&self, id: PetId) -> StoreResult<Pet> {
        sqlx::query_as::<_, PetRow>(
            r#"
            SELECT id, nombre, especie, raza, fecha_nacimiento, sexo
            FROM mascotas
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_pet", e))?
        .map(|row| row.0)
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self), fields(limit = page.limit(), offset = page.offset()), err)]
    async fn list(&self, page: Page) -> StoreResult<Vec<Pet>> {
        let rows = sqlx::query_as::<_, PetRow>(
            r#"
            SELECT id, nombre, especie, raza, fecha_nacimiento, sexo
            FROM mascotas
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_pets", e))?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    #[instrument(skip(self, draft), fields(pet_id = %id), err)]
    async fn update(&self, id: PetId, draft: PetDraft) -> StoreResult<Pet> {
        let result = sqlx::query(
            r#"
            UPDATE mascotas
            SET nombre = $1, especie = $2, raza = $3, fecha_nacimiento = $4, sexo = $5
            WHERE id = $6
            "#,
        )
        .bind(&draft.name)
        .bind(draft.species.as_str())
        .bind(&draft.breed)
        .bind(draft.birth_date)
        .bind(draft.sex.as_str())
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_pet", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(draft.with_id(id))
    }

    #[instrument(skip(self), fields(pet_id = %id), err)]
    async fn delete(&self, id: PetId) -> StoreResult<()> {
        sqlx::query("DELETE FROM mascotas WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_pet", e))?;
        Ok(())
    }
}

#[async_trait]
impl CareEventStore for PostgresStore {
    #[instrument(skip(self, draft), fields(pet_id = %draft.pet_id), err)]
    async fn create(&self, draft: CareEventDraft) -> StoreResult<CareEvent> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO cuidados (tipo_cuidado, descripcion, fecha_cuidado, mascota_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(draft.care_type.as_str())
        .bind(&draft.description)
        .bind(draft.occurred_at)
        .bind(draft.pet_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_care_event", e))?;

        Ok(draft.with_id(CareEventId::from_db(id)))
    }

    #[instrument(skip(self), fields(care_event_id = %id), err)]
    async fn get(&self, id: CareEventId) -> StoreResult<CareEvent> {
        sqlx::query_as::<_, CareEventRow>(
            r#"
            SELECT id, tipo_cuidado, descripcion, fecha_cuidado, mascota_id
            FROM cuidados
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_care_event", e))?
        .map(|row| row.0)
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self), fields(pet_id = %pet_id), err)]
    async fn list_for_pet(&self, pet_id: PetId) -> StoreResult<Vec<CareEvent>> {
        let rows = sqlx::query_as::<_, CareEventRow>(
            r#"
            SELECT id, tipo_cuidado, descripcion, fecha_cuidado, mascota_id
            FROM cuidados
            WHERE mascota_id = $1
            ORDER BY fecha_cuidado DESC, id ASC
            "#,
        )
        .bind(pet_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_care_events", e))?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    #[instrument(skip(self, draft), fields(care_event_id = %id, pet_id = %draft.pet_id), err)]
    async fn update(&self, id: CareEventId, draft: CareEventDraft) -> StoreResult<CareEvent> {
        let result = sqlx::query(
            r#"
            UPDATE cuidados
            SET tipo_cuidado = $1, descripcion = $2, fecha_cuidado = $3, mascota_id = $4
            WHERE id = $5
            "#,
        )
        .bind(draft.care_type.as_str())
        .bind(&draft.description)
        .bind(draft.occurred_at)
        .bind(draft.pet_id.get())
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_care_event", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(draft.with_id(id))
    }

    #[instrument(skip(self), fields(care_event_id = %id), err)]
    async fn delete(&self, id: CareEventId) -> StoreResult<()> {
        sqlx::query("DELETE FROM cuidados WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_care_event", e))?;
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for PostgresStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            match code.as_deref() {
                Some("23503") => StoreError::MissingReference(format!(
                    "{operation}: {}",
                    db_err.constraint().unwrap_or_else(|| db_err.message())
                )),
                Some("23505") => {
                    StoreError::Conflict(format!("{operation}: {}", db_err.message()))
                }
                _ => StoreError::Database(sqlx::Error::Database(db_err)),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{operation}: {err}"))
        }
        other => StoreError::Database(other),
    }
}

/// Decode a text column holding one of a closed set of labels.
fn decode_label<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: core::str::FromStr<Err = DomainError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: DomainError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

struct PetRow(Pet);

impl<'r> FromRow<'r, PgRow> for PetRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PetRow(Pet {
            id: PetId::from_db(row.try_get("id")?),
            name: row.try_get("nombre")?,
            species: decode_label(row, "especie")?,
            breed: row.try_get("raza")?,
            birth_date: row.try_get("fecha_nacimiento")?,
            sex: decode_label(row, "sexo")?,
        }))
    }
}

struct CareEventRow(CareEvent);

impl<'r> FromRow<'r, PgRow> for CareEventRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CareEventRow(CareEvent {
            id: CareEventId::from_db(row.try_get("id")?),
            care_type: decode_label(row, "tipo_cuidado")?,
            description: row.try_get("descripcion")?,
            occurred_at: row.try_get("fecha_cuidado")?,
            pet_id: PetId::from_db(row.try_get("mascota_id")?),
        }))
    }
}
