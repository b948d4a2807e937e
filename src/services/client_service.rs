// src/services/client_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::non_empty},
    db::{RecordQuery, Repository},
    models::client::{Client, ClientPayload},
};

/// Dados de contato vindos de uma proposta/contrato salvos.
#[derive(Debug, Default, Clone)]
pub struct ClientContact<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub document: Option<&'a str>,
}

#[derive(Clone)]
pub struct ClientService {
    repo: Repository<Client>,
}

impl ClientService {
    pub fn new(repo: Repository<Client>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Client>, AppError> {
        self.repo.list_for_owner(owner_id).await
    }

    pub async fn create(&self, owner_id: Uuid, payload: ClientPayload) -> Result<Client, AppError> {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            owner_id,
            name: payload.name.trim().to_string(),
            email: non_empty(&payload.email).map(str::to_string),
            phone: non_empty(&payload.phone).map(str::to_string),
            document: non_empty(&payload.document).map(str::to_string),
            notes: non_empty(&payload.notes).map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&client).await
    }

    pub async fn update(&self, owner_id: Uuid, id: Uuid, payload: ClientPayload) -> Result<Client, AppError> {
        let mut client = self.repo.find(owner_id, id).await?.ok_or(AppError::NotFound("Cliente"))?;
        client.name = payload.name.trim().to_string();
        client.email = non_empty(&payload.email).map(str::to_string);
        client.phone = non_empty(&payload.phone).map(str::to_string);
        client.document = non_empty(&payload.document).map(str::to_string);
        client.notes = non_empty(&payload.notes).map(str::to_string);
        client.updated_at = Utc::now();
        self.repo.update(&client).await?.ok_or(AppError::NotFound("Cliente"))
    }

    /// Busca pelo nome exato; se não existir, cria com os contatos informados.
    /// Um cliente existente só ganha os contatos que ainda não tinha.
    pub async fn find_or_create(&self, owner_id: Uuid, contact: ClientContact<'_>) -> Result<Client, AppError> {
        let name = contact.name.trim();
        let query = RecordQuery::owned_by(owner_id).with("name", name);
        let pick = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        if let Some(mut existing) = self.repo.find_first(&query).await? {
            let mut changed = false;
            for (slot, incoming) in [
                (&mut existing.email, pick(contact.email)),
                (&mut existing.phone, pick(contact.phone)),
                (&mut existing.document, pick(contact.document)),
            ] {
                if slot.is_none() && incoming.is_some() {
                    *slot = incoming;
                    changed = true;
                }
            }
            if !changed {
                return Ok(existing);
            }
            existing.updated_at = Utc::now();
            return self.repo.update(&existing).await?.ok_or(AppError::NotFound("Cliente"));
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            email: pick(contact.email),
            phone: pick(contact.phone),
            document: pick(contact.document),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(%owner_id, client = %client.name, "Cliente criado automaticamente");
        self.repo.create(&client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::local_store;

    #[tokio::test]
    async fn find_or_create_reuses_client_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = ClientService::new(Repository::new(local_store(dir.path())));
        let owner = Uuid::new_v4();

        let first = service
            .find_or_create(owner, ClientContact { name: "Maria da Silva ", ..Default::default() })
            .await
            .unwrap();
        let second = service
            .find_or_create(
                owner,
                ClientContact { name: "Maria da Silva", email: Some("maria@email.com"), ..Default::default() },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.email.as_deref(), Some("maria@email.com"));
        assert_eq!(service.list(owner).await.unwrap().len(), 1);

        // Outro dono, outro cliente
        let other = service
            .find_or_create(Uuid::new_v4(), ClientContact { name: "Maria da Silva", ..Default::default() })
            .await
            .unwrap();
        assert_ne!(other.id, first.id);
    }

    #[tokio::test]
    async fn update_of_unknown_client_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = ClientService::new(Repository::new(local_store(dir.path())));
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, ClientPayload { name: "Ana".into(), ..Default::default() })
            .await
            .unwrap();

        let err = service
            .update(Uuid::new_v4(), created.id, ClientPayload { name: "Bia".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
