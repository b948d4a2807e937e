// src/models/subscription.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::freelancer::{PlanType, SubscriptionStatus};

/// Situação do plano calculada a partir do cadastro do freelancer e do "agora".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub trial_started_at: DateTime<Utc>,
    pub trial_ends_at: DateTime<Utc>,
    #[schema(example = 5)]
    pub days_remaining: i64,
    pub is_trial_active: bool,
    pub can_create_documents: bool,
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_123")]
    pub url: String,
}
