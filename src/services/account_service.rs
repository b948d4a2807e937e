// src/services/account_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EntityKind, SharedStore},
};

// Ordem da exclusão: dependentes primeiro, identidade por último.
const CASCADE: [EntityKind; 7] = [
    EntityKind::FinancialRecords,
    EntityKind::Contracts,
    EntityKind::Proposals,
    EntityKind::Clients,
    EntityKind::Settings,
    EntityKind::Freelancers,
    EntityKind::Users,
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub removed: Vec<(EntityKind, u64)>,
}

impl DeletionReport {
    pub fn total(&self) -> u64 {
        self.removed.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: SharedStore,
}

impl AccountService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Apaga tudo do usuário. Rodar de novo não é erro (apaga zero registros).
    pub async fn delete_account(&self, owner_id: Uuid) -> Result<DeletionReport, AppError> {
        let mut report = DeletionReport::default();
        for kind in CASCADE {
            let removed = self.store.delete_by_owner(kind, owner_id).await?;
            report.removed.push((kind, removed));
        }
        tracing::info!(%owner_id, total = report.total(), "🗑️ Conta excluída");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{Repository, RecordQuery},
        models::{auth::User, proposal::Proposal},
        services::testing::{local_store, sample_contract, sample_proposal},
    };
    use chrono::Utc;

    #[tokio::test]
    async fn cascade_removes_only_the_owner_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(dir.path());
        let proposals: Repository<Proposal> = Repository::new(store.clone());
        let contracts = Repository::new(store.clone());
        let users: Repository<User> = Repository::new(store.clone());

        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        proposals.create(&sample_proposal(owner)).await.unwrap();
        proposals.create(&sample_proposal(other)).await.unwrap();
        contracts.create(&sample_contract(owner)).await.unwrap();
        let now = Utc::now();
        users
            .create(&User {
                id: owner,
                owner_id: owner,
                email: "joao@email.com".into(),
                password_hash: "x".into(),
                email_confirmed_at: None,
                token_version: 0,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let service = AccountService::new(store);
        let report = service.delete_account(owner).await.unwrap();
        assert_eq!(report.total(), 3);
        assert_eq!(report.removed.first().map(|(k, _)| *k), Some(EntityKind::FinancialRecords));
        assert_eq!(report.removed.last(), Some(&(EntityKind::Users, 1)));

        assert!(proposals.list_for_owner(owner).await.unwrap().is_empty());
        assert_eq!(proposals.list(&RecordQuery::any_owner()).await.unwrap().len(), 1);
        assert!(users.find_any(owner).await.unwrap().is_none());

        let again = service.delete_account(owner).await.unwrap();
        assert_eq!(again.total(), 0);
    }
}
