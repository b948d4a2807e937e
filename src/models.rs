pub mod auth;
pub mod client;
pub mod contract;
pub mod dashboard;
pub mod document;
pub mod finance;
pub mod freelancer;
pub mod proposal;
pub mod settings;
pub mod status;
pub mod subscription;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{EntityKind, Record};

macro_rules! impl_record {
    ($ty:ty, $kind:expr) => {
        impl Record for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> Uuid {
                self.id
            }
            fn owner_id(&self) -> Uuid {
                self.owner_id
            }
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
            fn updated_at(&self) -> DateTime<Utc> {
                self.updated_at
            }
        }
    };
}

impl_record!(proposal::Proposal, EntityKind::Proposals);
impl_record!(contract::Contract, EntityKind::Contracts);
impl_record!(client::Client, EntityKind::Clients);
impl_record!(finance::FinancialRecord, EntityKind::FinancialRecords);
impl_record!(settings::UserSettings, EntityKind::Settings);
impl_record!(freelancer::Freelancer, EntityKind::Freelancers);
impl_record!(auth::User, EntityKind::Users);
