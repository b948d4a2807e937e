// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// 1. Funil de propostas (um balde por status)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPipeline {
    pub draft: u32,
    pub sent: u32,
    pub accepted: u32,
    pub closed: u32,
    pub expired: u32,
}

// 2. Contratos por status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractCounts {
    pub draft: u32,
    pub active: u32,
    pub finished: u32,
    pub cancelled: u32,
}

// 3. Os cards do topo
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub pipeline: ProposalPipeline,
    pub sent_count: u32,     // propostas fora do rascunho
    pub accepted_count: u32, // aceitas + fechadas
    pub accepted_percent: u32,
    pub total_proposed_value: Decimal,
    pub total_closed_value: Decimal,
    pub closing_rate: u32,
    pub contracts: ContractCounts,
    pub total_contract_value: Decimal,
    pub amount_received: Decimal,
    pub amount_outstanding: Decimal,
}
