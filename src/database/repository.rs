use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::{unique_index_name, DatabaseError, DatabaseManager};
use crate::database::record::Record;
use crate::database::store::RecordStore;
use crate::filter::Filter;
use crate::schema::ResourceType;

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL document store: one JSONB table per resource type
pub struct Repository {
    manager: DatabaseManager,
}

impl Repository {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }

    fn pool(&self) -> &PgPool {
        self.manager.pool()
    }

    fn table(resource: ResourceType) -> String {
        DatabaseManager::quote_identifier(resource.table_name())
    }

    fn row_to_record(row: &PgRow) -> Result<Record, DatabaseError> {
        let id: Uuid = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let data: Value = row.try_get("data")?;
        match data {
            Value::Object(fields) => Ok(Record::from_parts(id, created_at, fields)),
            other => Err(DatabaseError::QueryError(format!(
                "record {} holds a non-object document: {}",
                id, other
            ))),
        }
    }

    /// Translate a unique-index violation into the field it protects
    fn map_write_error(resource: ResourceType, err: sqlx::Error) -> DatabaseError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or_default();
                if let Some(field) = resource
                    .unique_fields()
                    .find(|f| unique_index_name(resource, f.name) == constraint)
                {
                    return DatabaseError::DuplicateKey(field.name.to_string());
                }
                return DatabaseError::DuplicateKey(constraint.to_string());
            }
        }
        DatabaseError::Sqlx(err)
    }
}

#[async_trait]
impl RecordStore for Repository {
    async fn insert(&self, resource: ResourceType, record: Record) -> Result<Record, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (id, data, created_at) VALUES ($1, $2, $3)",
            Self::table(resource)
        );
        sqlx::query(&sql)
            .bind(record.id)
            .bind(Value::Object(record.fields.clone()))
            .bind(record.created_at)
            .execute(self.pool())
            .await
            .map_err(|e| Self::map_write_error(resource, e))?;

        Ok(record)
    }

    async fn find_by_id(&self, resource: ResourceType, id: Uuid) -> Result<Option<Record>, DatabaseError> {
        let sql = format!(
            "SELECT id, data, created_at FROM {} WHERE id = $1",
            Self::table(resource)
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.pool()).await?;
        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find(&self, resource: ResourceType, filter: &Filter) -> Result<Vec<Record>, DatabaseError> {
        let sql_result = filter.to_sql(&Self::table(resource));
        let mut query = sqlx::query(&sql_result.query);
        for param in &sql_result.params {
            query = query.bind(param.clone());
        }
        let rows = query.fetch_all(self.pool()).await?;
        rows.iter().map(Self::row_to_record).collect()
    }

    async fn find_by_ids(&self, resource: ResourceType, ids: &[Uuid]) -> Result<Vec<Record>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT id, data, created_at FROM {} WHERE id = ANY($1)",
            Self::table(resource)
        );
        let rows = sqlx::query(&sql)
            .bind(ids.to_vec())
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(Self::row_to_record).collect()
    }

    async fn replace(
        &self,
        resource: ResourceType,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<Option<Record>, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET data = $2 WHERE id = $1 RETURNING id, data, created_at",
            Self::table(resource)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(fields))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| Self::map_write_error(resource, e))?;
        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn delete(&self, resource: ResourceType, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::table(resource));
        let result = sqlx::query(&sql).bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }

    async fn close(&self) {
        self.manager.close().await;
    }
}
