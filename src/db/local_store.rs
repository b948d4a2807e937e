// src/db/local_store.rs

use async_trait::async_trait;
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{EntityKind, RecordQuery, RecordStore, StoredRecord},
};

/// Cache local em arquivos JSON (um arquivo por coleção).
///
/// Usado quando o banco remoto não está configurado ou não responde na
/// inicialização. Leitura e escrita são síncronas e nada daqui é enviado ao
/// banco remoto quando ele volta: é um último recurso, não uma réplica.
pub struct LocalRecordStore {
    dir: PathBuf,
    collections: Mutex<HashMap<EntityKind, Vec<StoredRecord>>>,
}

impl LocalRecordStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, collections: Mutex::new(HashMap::new()) })
    }

    fn file_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.as_str()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<EntityKind, Vec<StoredRecord>>>, AppError> {
        self.collections
            .lock()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("armazenamento local envenenado")))
    }

    fn load<'a>(
        &self,
        cache: &'a mut HashMap<EntityKind, Vec<StoredRecord>>,
        kind: EntityKind,
    ) -> Result<&'a mut Vec<StoredRecord>, AppError> {
        if !cache.contains_key(&kind) {
            let path = self.file_for(kind);
            let records = if path.exists() {
                let raw = fs::read_to_string(&path)?;
                if raw.trim().is_empty() { Vec::new() } else { serde_json::from_str(&raw)? }
            } else {
                Vec::new()
            };
            cache.insert(kind, records);
        }
        Ok(cache.entry(kind).or_default())
    }

    fn persist(&self, kind: EntityKind, records: &[StoredRecord]) -> Result<(), AppError> {
        let path = self.file_for(kind);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(records)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn insert(&self, kind: EntityKind, record: StoredRecord) -> Result<StoredRecord, AppError> {
        let mut cache = self.lock()?;
        let records = self.load(&mut cache, kind)?;
        records.retain(|r| r.id != record.id);
        records.push(record.clone());
        self.persist(kind, records)?;
        Ok(record)
    }

    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, AppError> {
        let mut cache = self.lock()?;
        let records = self.load(&mut cache, kind)?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, kind: EntityKind, record: StoredRecord) -> Result<Option<StoredRecord>, AppError> {
        let mut cache = self.lock()?;
        let records = self.load(&mut cache, kind)?;

        let Some(existing) = records.iter_mut().find(|r| r.id == record.id) else {
            return Ok(None);
        };
        existing.data = record.data;
        existing.updated_at = record.updated_at;
        let updated = existing.clone();

        self.persist(kind, records)?;
        Ok(Some(updated))
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<bool, AppError> {
        let mut cache = self.lock()?;
        let records = self.load(&mut cache, kind)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        if removed {
            self.persist(kind, records)?;
        }
        Ok(removed)
    }

    async fn list(&self, kind: EntityKind, query: &RecordQuery) -> Result<Vec<StoredRecord>, AppError> {
        let mut cache = self.lock()?;
        let records = self.load(&mut cache, kind)?;
        let mut found: Vec<StoredRecord> = records.iter().filter(|r| query.matches(r)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete_by_owner(&self, kind: EntityKind, owner_id: Uuid) -> Result<u64, AppError> {
        let mut cache = self.lock()?;
        let records = self.load(&mut cache, kind)?;
        let before = records.len();
        records.retain(|r| r.owner_id != owner_id);
        let removed = (before - records.len()) as u64;
        if removed > 0 {
            self.persist(kind, records)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn record(owner: Uuid, offset_secs: i64, data: serde_json::Value) -> StoredRecord {
        let at = Utc::now() + Duration::seconds(offset_secs);
        StoredRecord { id: Uuid::new_v4(), owner_id: owner, data, created_at: at, updated_at: at }
    }

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let owner = Uuid::new_v4();
        let rec = record(owner, 0, json!({ "name": "Ana" }));

        let store = LocalRecordStore::open(dir.path()).unwrap();
        store.insert(EntityKind::Clients, rec.clone()).await.unwrap();

        let reopened = LocalRecordStore::open(dir.path()).unwrap();
        let found = reopened.get(EntityKind::Clients, rec.id).await.unwrap();
        assert_eq!(found.unwrap().data["name"], "Ana");
    }

    #[tokio::test]
    async fn lists_newest_first_with_filter() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRecordStore::open(dir.path()).unwrap();
        let owner = Uuid::new_v4();

        let old = record(owner, -60, json!({ "status": "draft" }));
        let new = record(owner, 0, json!({ "status": "draft" }));
        let other = record(owner, -30, json!({ "status": "sent" }));
        for r in [&old, &new, &other] {
            store.insert(EntityKind::Proposals, r.clone()).await.unwrap();
        }

        let drafts = store
            .list(EntityKind::Proposals, &RecordQuery::owned_by(owner).with("status", "draft"))
            .await
            .unwrap();
        let ids: Vec<Uuid> = drafts.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);
    }

    #[tokio::test]
    async fn update_is_last_write_wins_and_delete_by_owner_scopes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRecordStore::open(dir.path()).unwrap();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let mut mine = record(owner, 0, json!({ "v": 1 }));
        let theirs = record(stranger, 0, json!({ "v": 9 }));
        store.insert(EntityKind::Contracts, mine.clone()).await.unwrap();
        store.insert(EntityKind::Contracts, theirs.clone()).await.unwrap();

        mine.data = json!({ "v": 2 });
        store.update(EntityKind::Contracts, mine.clone()).await.unwrap();
        mine.data = json!({ "v": 3 });
        store.update(EntityKind::Contracts, mine.clone()).await.unwrap();
        let current = store.get(EntityKind::Contracts, mine.id).await.unwrap().unwrap();
        assert_eq!(current.data["v"], 3);

        assert_eq!(store.delete_by_owner(EntityKind::Contracts, owner).await.unwrap(), 1);
        assert!(store.get(EntityKind::Contracts, theirs.id).await.unwrap().is_some());
        assert!(store.update(EntityKind::Contracts, mine).await.unwrap().is_none());
    }
}
