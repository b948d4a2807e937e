// src/services/dashboard_service.rs

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Repository,
    models::{
        contract::Contract,
        dashboard::{ContractCounts, DashboardSummary, ProposalPipeline},
        finance::FinancialRecord,
        proposal::Proposal,
        status::{ContractStatus, ProposalStatus},
    },
    services::finance_service::amount_received,
};

/// Percentual inteiro (meio para cima); denominador zero dá 0.
fn percentage(part: Decimal, whole: Decimal) -> u32 {
    if whole <= Decimal::ZERO {
        return 0;
    }
    (part * Decimal::ONE_HUNDRED / whole)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Redutor puro dos cards do painel.
pub fn compute_summary(
    proposals: &[Proposal],
    contracts: &[Contract],
    records: &[FinancialRecord],
) -> DashboardSummary {
    let mut pipeline = ProposalPipeline::default();
    let mut total_proposed_value = Decimal::ZERO;
    let mut total_closed_value = Decimal::ZERO;

    for p in proposals {
        match p.status {
            ProposalStatus::Draft => pipeline.draft += 1,
            ProposalStatus::Sent => pipeline.sent += 1,
            ProposalStatus::Accepted => pipeline.accepted += 1,
            ProposalStatus::Closed => pipeline.closed += 1,
            ProposalStatus::Expired => pipeline.expired += 1,
        }
        total_proposed_value += p.value;
        if p.status.is_won() {
            total_closed_value += p.value;
        }
    }

    let sent_count = proposals.iter().filter(|p| p.status.is_post_draft()).count() as u32;
    let accepted_count = pipeline.accepted + pipeline.closed;

    let mut counts = ContractCounts::default();
    let mut total_contract_value = Decimal::ZERO;
    for c in contracts {
        match c.status {
            ContractStatus::Draft => counts.draft += 1,
            ContractStatus::Active => counts.active += 1,
            ContractStatus::Finished => counts.finished += 1,
            ContractStatus::Cancelled => counts.cancelled += 1,
        }
        total_contract_value += c.value;
    }

    let received = amount_received(records);

    DashboardSummary {
        pipeline,
        sent_count,
        accepted_count,
        accepted_percent: percentage(Decimal::from(accepted_count), Decimal::from(sent_count)),
        total_proposed_value,
        total_closed_value,
        closing_rate: percentage(total_closed_value, total_proposed_value),
        contracts: counts,
        total_contract_value,
        amount_received: received,
        amount_outstanding: (total_contract_value - received).max(Decimal::ZERO),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    proposals: Repository<Proposal>,
    contracts: Repository<Contract>,
    records: Repository<FinancialRecord>,
}

impl DashboardService {
    pub fn new(
        proposals: Repository<Proposal>,
        contracts: Repository<Contract>,
        records: Repository<FinancialRecord>,
    ) -> Self {
        Self { proposals, contracts, records }
    }

    pub async fn get_summary(&self, owner_id: Uuid) -> Result<DashboardSummary, AppError> {
        let proposals = self.proposals.list_for_owner(owner_id).await?;
        let contracts = self.contracts.list_for_owner(owner_id).await?;
        let records = self.records.list_for_owner(owner_id).await?;
        Ok(compute_summary(&proposals, &contracts, &records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        finance_service::tests::record,
        testing::{sample_contract, sample_proposal},
    };

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn proposal(status: ProposalStatus, value: &str) -> Proposal {
        let mut p = sample_proposal(Uuid::nil());
        p.status = status;
        p.value = d(value);
        p
    }

    #[test]
    fn empty_lists_give_zeroed_summary() {
        assert_eq!(compute_summary(&[], &[], &[]), DashboardSummary::default());
    }

    #[test]
    fn acceptance_is_zero_when_nothing_was_sent() {
        let drafts = vec![proposal(ProposalStatus::Draft, "100"), proposal(ProposalStatus::Draft, "50")];
        let summary = compute_summary(&drafts, &[], &[]);
        assert_eq!(summary.sent_count, 0);
        assert_eq!(summary.accepted_percent, 0);
        assert_eq!(summary.closing_rate, 0);
        assert_eq!(summary.pipeline.draft, 2);
        assert_eq!(summary.total_proposed_value, d("150"));
    }

    #[test]
    fn pipeline_counts_and_rates() {
        let proposals = vec![
            proposal(ProposalStatus::Draft, "100"),
            proposal(ProposalStatus::Sent, "100"),
            proposal(ProposalStatus::Accepted, "300"),
            proposal(ProposalStatus::Closed, "200"),
            proposal(ProposalStatus::Expired, "300"),
        ];
        let summary = compute_summary(&proposals, &[], &[]);

        assert_eq!(
            summary.pipeline,
            ProposalPipeline { draft: 1, sent: 1, accepted: 1, closed: 1, expired: 1 }
        );
        assert_eq!(summary.sent_count, 4);
        assert_eq!(summary.accepted_count, 2);
        assert_eq!(summary.accepted_percent, 50);
        assert_eq!(summary.total_proposed_value, d("1000"));
        assert_eq!(summary.total_closed_value, d("500"));
        assert_eq!(summary.closing_rate, 50);
    }

    #[test]
    fn accepted_percent_stays_within_bounds() {
        let statuses = ProposalStatus::ALL;
        for mask in 0u32..(1 << 10) {
            let proposals: Vec<Proposal> = (0..10)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| proposal(statuses[i % statuses.len()], "10"))
                .collect();
            let summary = compute_summary(&proposals, &[], &[]);
            assert!(summary.accepted_percent <= 100);
            if summary.sent_count == 0 {
                assert_eq!(summary.accepted_percent, 0);
            }
        }
    }

    #[test]
    fn contracts_and_receipts() {
        let mut active = sample_contract(Uuid::nil());
        active.status = ContractStatus::Active;
        active.value = d("1000");
        let mut cancelled = sample_contract(Uuid::nil());
        cancelled.status = ContractStatus::Cancelled;
        cancelled.value = d("500");

        let summary = compute_summary(&[], &[active, cancelled], &[record("300", true), record("200", false)]);

        assert_eq!(summary.contracts.active, 1);
        assert_eq!(summary.contracts.cancelled, 1);
        assert_eq!(summary.total_contract_value, d("1500"));
        assert_eq!(summary.amount_received, d("300"));
        assert_eq!(summary.amount_outstanding, d("1200"));
    }
}
