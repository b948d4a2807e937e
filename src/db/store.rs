// src/db/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use std::{marker::PhantomData, sync::Arc};
use uuid::Uuid;

use crate::common::error::AppError;

/// Coleções conhecidas pelo armazenamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Proposals,
    Contracts,
    Clients,
    FinancialRecords,
    Settings,
    Freelancers,
    Users,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Proposals => "proposals",
            EntityKind::Contracts => "contracts",
            EntityKind::Clients => "clients",
            EntityKind::FinancialRecords => "financial_records",
            EntityKind::Settings => "settings",
            EntityKind::Freelancers => "freelancers",
            EntityKind::Users => "users",
        }
    }
}

/// Linha genérica: colunas de indexação + documento JSON completo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filtro de listagem: dono opcional + igualdade em campos de topo do documento.
/// Resultado sempre ordenado por `created_at` decrescente.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub owner_id: Option<Uuid>,
    pub filter: Map<String, Value>,
}

impl RecordQuery {
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self { owner_id: Some(owner_id), filter: Map::new() }
    }

    pub fn any_owner() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    /// Mesma semântica do `@>` do Postgres: um filtro nulo só casa com um
    /// campo presente e nulo.
    pub fn matches(&self, record: &StoredRecord) -> bool {
        if let Some(owner) = self.owner_id {
            if record.owner_id != owner {
                return false;
            }
        }
        self.filter
            .iter()
            .all(|(k, v)| record.data.get(k) == Some(v))
    }
}

/// Armazenamento de registros. Duas implementações: Postgres (remoto) e
/// arquivos JSON locais. Atualizações são "última escrita vence".
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn insert(&self, kind: EntityKind, record: StoredRecord) -> Result<StoredRecord, AppError>;

    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, AppError>;

    /// `None` se o registro não existe.
    async fn update(&self, kind: EntityKind, record: StoredRecord) -> Result<Option<StoredRecord>, AppError>;

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<bool, AppError>;

    async fn list(&self, kind: EntityKind, query: &RecordQuery) -> Result<Vec<StoredRecord>, AppError>;

    async fn delete_by_owner(&self, kind: EntityKind, owner_id: Uuid) -> Result<u64, AppError>;
}

pub type SharedStore = Arc<dyn RecordStore>;

/// Entidade persistida pelo `Repository`.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Fachada tipada sobre o `RecordStore`. Leitura/escrita por id é sempre
/// restrita ao dono: registro de outro dono é "não encontrado".
pub struct Repository<T> {
    store: SharedStore,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), _marker: PhantomData }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: SharedStore) -> Self {
        Self { store, _marker: PhantomData }
    }

    fn to_stored(entity: &T) -> Result<StoredRecord, AppError> {
        Ok(StoredRecord {
            id: entity.id(),
            owner_id: entity.owner_id(),
            data: serde_json::to_value(entity)?,
            created_at: entity.created_at(),
            updated_at: entity.updated_at(),
        })
    }

    fn from_stored(record: StoredRecord) -> Result<T, AppError> {
        Ok(serde_json::from_value(record.data)?)
    }

    pub async fn create(&self, entity: &T) -> Result<T, AppError> {
        let stored = self.store.insert(T::KIND, Self::to_stored(entity)?).await?;
        Self::from_stored(stored)
    }

    pub async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<T>, AppError> {
        match self.store.get(T::KIND, id).await? {
            Some(record) if record.owner_id == owner_id => Ok(Some(Self::from_stored(record)?)),
            _ => Ok(None),
        }
    }

    /// Busca sem checar o dono (usuários, perfis públicos).
    pub async fn find_any(&self, id: Uuid) -> Result<Option<T>, AppError> {
        self.store.get(T::KIND, id).await?.map(Self::from_stored).transpose()
    }

    pub async fn update(&self, entity: &T) -> Result<Option<T>, AppError> {
        match self.store.get(T::KIND, entity.id()).await? {
            Some(existing) if existing.owner_id == entity.owner_id() => {}
            _ => return Ok(None),
        }
        self.store
            .update(T::KIND, Self::to_stored(entity)?)
            .await?
            .map(Self::from_stored)
            .transpose()
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        match self.store.get(T::KIND, id).await? {
            Some(existing) if existing.owner_id == owner_id => self.store.delete(T::KIND, id).await,
            _ => Ok(false),
        }
    }

    pub async fn list(&self, query: &RecordQuery) -> Result<Vec<T>, AppError> {
        self.store
            .list(T::KIND, query)
            .await?
            .into_iter()
            .map(Self::from_stored)
            .collect()
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<T>, AppError> {
        self.list(&RecordQuery::owned_by(owner_id)).await
    }

    pub async fn find_first(&self, query: &RecordQuery) -> Result<Option<T>, AppError> {
        Ok(self.list(query).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(owner: Uuid, data: Value) -> StoredRecord {
        StoredRecord {
            id: Uuid::new_v4(),
            owner_id: owner,
            data,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn query_matches_owner_and_fields() {
        let owner = Uuid::new_v4();
        let rec = record(owner, json!({ "name": "Ana", "status": "draft" }));

        assert!(RecordQuery::owned_by(owner).matches(&rec));
        assert!(RecordQuery::owned_by(owner).with("name", "Ana").matches(&rec));
        assert!(!RecordQuery::owned_by(owner).with("name", "Bia").matches(&rec));
        assert!(!RecordQuery::owned_by(Uuid::new_v4()).matches(&rec));
        assert!(RecordQuery::any_owner().with("status", "draft").matches(&rec));
    }

    #[test]
    fn null_filter_requires_explicit_null() {
        let query = RecordQuery::any_owner().with("contract_id", Value::Null);
        assert!(!query.matches(&record(Uuid::new_v4(), json!({ "name": "Ana" }))));
        assert!(query.matches(&record(Uuid::new_v4(), json!({ "name": "Ana", "contract_id": null }))));
    }
}
