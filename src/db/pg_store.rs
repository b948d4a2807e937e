// src/db/pg_store.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{EntityKind, RecordQuery, RecordStore, StoredRecord},
};

// O armazenamento remoto: uma tabela `records` com o documento em JSONB.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, kind: EntityKind, record: StoredRecord) -> Result<StoredRecord, AppError> {
        let row = sqlx::query_as::<_, StoredRecord>(
            r#"
            INSERT INTO records (id, kind, owner_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, data, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(kind.as_str())
        .bind(record.owner_id)
        .bind(&record.data)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, AppError> {
        let row = sqlx::query_as::<_, StoredRecord>(
            "SELECT id, owner_id, data, created_at, updated_at FROM records WHERE kind = $1 AND id = $2",
        )
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, kind: EntityKind, record: StoredRecord) -> Result<Option<StoredRecord>, AppError> {
        // Sem controle de concorrência otimista: quem escreve por último vence.
        let row = sqlx::query_as::<_, StoredRecord>(
            r#"
            UPDATE records
            SET data = $3, updated_at = $4
            WHERE kind = $1 AND id = $2
            RETURNING id, owner_id, data, created_at, updated_at
            "#,
        )
        .bind(kind.as_str())
        .bind(record.id)
        .bind(&record.data)
        .bind(record.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM records WHERE kind = $1 AND id = $2")
            .bind(kind.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, kind: EntityKind, query: &RecordQuery) -> Result<Vec<StoredRecord>, AppError> {
        // `data @> '{}'` é sempre verdadeiro, então o filtro vazio não precisa de ramo próprio.
        let filter = Value::Object(query.filter.clone());

        let rows = sqlx::query_as::<_, StoredRecord>(
            r#"
            SELECT id, owner_id, data, created_at, updated_at
            FROM records
            WHERE kind = $1
              AND ($2::uuid IS NULL OR owner_id = $2)
              AND data @> $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind.as_str())
        .bind(query.owner_id)
        .bind(&filter)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_by_owner(&self, kind: EntityKind, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM records WHERE kind = $1 AND owner_id = $2")
            .bind(kind.as_str())
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
