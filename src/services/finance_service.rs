// src/services/finance_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::non_empty},
    db::{RecordQuery, Repository},
    models::{
        contract::{Contract, ContractLedger},
        finance::{FinancialRecord, FinancialRecordFilter, FinancialRecordPayload},
    },
};

/// Soma dos lançamentos marcados como recebidos.
pub fn amount_received(records: &[FinancialRecord]) -> Decimal {
    records.iter().filter(|r| r.received).map(|r| r.amount).sum()
}

/// Extrato do contrato: o que falta receber nunca fica negativo.
pub fn contract_ledger(contract: &Contract, records: Vec<FinancialRecord>) -> ContractLedger {
    let received = amount_received(&records);
    ContractLedger {
        contract_id: contract.id,
        contract_value: contract.value,
        amount_received: received,
        amount_outstanding: (contract.value - received).max(Decimal::ZERO),
        records,
    }
}

#[derive(Clone)]
pub struct FinanceService {
    repo: Repository<FinancialRecord>,
    contracts: Repository<Contract>,
}

impl FinanceService {
    pub fn new(repo: Repository<FinancialRecord>, contracts: Repository<Contract>) -> Self {
        Self { repo, contracts }
    }

    pub async fn list(&self, owner_id: Uuid, filter: &FinancialRecordFilter) -> Result<Vec<FinancialRecord>, AppError> {
        let mut query = RecordQuery::owned_by(owner_id);
        if let Some(contract_id) = filter.contract_id {
            query = query.with("contractId", contract_id.to_string());
        }
        self.repo.list(&query).await
    }

    async fn ensure_contract(&self, owner_id: Uuid, contract_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(id) = contract_id {
            self.contracts.find(owner_id, id).await?.ok_or(AppError::NotFound("Contrato"))?;
        }
        Ok(())
    }

    fn apply(record: &mut FinancialRecord, payload: FinancialRecordPayload) {
        record.contract_id = payload.contract_id;
        record.description = payload.description.trim().to_string();
        record.amount = payload.amount;
        record.due_date = payload.due_date;
        record.received = payload.received;
        // Recebido sem data: considera hoje
        record.received_date = match (payload.received, payload.received_date) {
            (true, None) => Some(Utc::now().date_naive()),
            (_, date) => date,
        };
        record.payment_method = non_empty(&payload.payment_method).map(str::to_string);
        record.notes = non_empty(&payload.notes).map(str::to_string);
    }

    pub async fn create(&self, owner_id: Uuid, payload: FinancialRecordPayload) -> Result<FinancialRecord, AppError> {
        self.ensure_contract(owner_id, payload.contract_id).await?;

        let now = Utc::now();
        let mut record = FinancialRecord {
            id: Uuid::new_v4(),
            owner_id,
            contract_id: None,
            description: String::new(),
            amount: Decimal::ZERO,
            due_date: None,
            received_date: None,
            received: false,
            payment_method: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        Self::apply(&mut record, payload);
        self.repo.create(&record).await
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        payload: FinancialRecordPayload,
    ) -> Result<FinancialRecord, AppError> {
        let mut record = self.repo.find(owner_id, id).await?.ok_or(AppError::NotFound("Lançamento"))?;
        self.ensure_contract(owner_id, payload.contract_id).await?;

        Self::apply(&mut record, payload);
        record.updated_at = Utc::now();
        self.repo.update(&record).await?.ok_or(AppError::NotFound("Lançamento"))
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(owner_id, id).await? {
            return Err(AppError::NotFound("Lançamento"));
        }
        Ok(())
    }

    pub async fn ledger(&self, owner_id: Uuid, contract_id: Uuid) -> Result<ContractLedger, AppError> {
        let contract = self
            .contracts
            .find(owner_id, contract_id)
            .await?
            .ok_or(AppError::NotFound("Contrato"))?;
        let records = self
            .list(owner_id, &FinancialRecordFilter { contract_id: Some(contract_id) })
            .await?;
        Ok(contract_ledger(&contract, records))
    }
}
