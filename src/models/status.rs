// src/models/status.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Os status são um conjunto rotulado, não um autômato: qualquer status pode
// ir para qualquer outro pela escolha manual do usuário. A única transição
// automática é rascunho -> enviada ao gerar o documento de uma proposta.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Closed,
    Expired,
}

impl ProposalStatus {
    #[cfg(test)]
    pub const ALL: [ProposalStatus; 5] = [
        ProposalStatus::Draft,
        ProposalStatus::Sent,
        ProposalStatus::Accepted,
        ProposalStatus::Closed,
        ProposalStatus::Expired,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "Rascunho",
            ProposalStatus::Sent => "Enviada",
            ProposalStatus::Accepted => "Aceita",
            ProposalStatus::Closed => "Fechada",
            ProposalStatus::Expired => "Expirada",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Closed => "closed",
            ProposalStatus::Expired => "expired",
        }
    }

    /// Já saiu do rascunho (conta como "enviada" no funil).
    pub fn is_post_draft(&self) -> bool {
        !matches!(self, ProposalStatus::Draft)
    }

    /// Aceita ou fechada.
    pub fn is_won(&self) -> bool {
        matches!(self, ProposalStatus::Accepted | ProposalStatus::Closed)
    }

    /// Status resultante de "gerar documento".
    pub fn after_generate(self) -> Self {
        match self {
            ProposalStatus::Draft => ProposalStatus::Sent,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    #[default]
    Draft,
    Active,
    Finished,
    Cancelled,
}

impl ContractStatus {
    #[cfg(test)]
    pub const ALL: [ContractStatus; 4] = [
        ContractStatus::Draft,
        ContractStatus::Active,
        ContractStatus::Finished,
        ContractStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "Rascunho",
            ContractStatus::Active => "Ativo",
            ContractStatus::Finished => "Finalizado",
            ContractStatus::Cancelled => "Cancelado",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Finished => "finished",
            ContractStatus::Cancelled => "cancelled",
        }
    }
}
