// src/services/subscription.rs

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Repository,
    models::{
        freelancer::{Freelancer, PlanType, SubscriptionStatus},
        subscription::SubscriptionView,
    },
};

pub const DEFAULT_TRIAL_DAYS: i64 = 7;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Dias restantes arredondados para cima, nunca negativos.
pub fn days_remaining(trial_ends_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (trial_ends_at - now).num_milliseconds();
    if ms <= 0 { 0 } else { (ms + DAY_MS - 1) / DAY_MS }
}

/// Calcula a situação do plano. Sem cadastro, vale um teste de `trial_days`
/// começando agora.
pub fn evaluate(record: Option<&Freelancer>, now: DateTime<Utc>, trial_days: i64) -> SubscriptionView {
    let (plan_type, stored_status, trial_started_at, trial_ends_at) = match record {
        Some(f) => {
            let start = f.trial_started_at.unwrap_or(f.created_at);
            let end = f.trial_ends_at.unwrap_or(start + Duration::days(trial_days));
            (f.plan_type, f.subscription_status, start, end)
        }
        None => (PlanType::Free, SubscriptionStatus::Trial, now, now + Duration::days(trial_days)),
    };

    let is_trial_active = now < trial_ends_at;

    let status = match stored_status {
        SubscriptionStatus::Trial if !is_trial_active && plan_type == PlanType::Free => SubscriptionStatus::Expired,
        other => other,
    };

    let can_create_documents = plan_type == PlanType::Pro
        || status == SubscriptionStatus::Active
        || (status == SubscriptionStatus::Trial && is_trial_active);

    let is_blocked = stored_status == SubscriptionStatus::Blocked || status == SubscriptionStatus::Expired;

    SubscriptionView {
        plan_type,
        status,
        trial_started_at,
        trial_ends_at,
        days_remaining: days_remaining(trial_ends_at, now),
        is_trial_active,
        can_create_documents,
        is_blocked,
    }
}

#[derive(Clone)]
pub struct SubscriptionService {
    freelancers: Repository<Freelancer>,
    trial_days: i64,
}

impl SubscriptionService {
    pub fn new(freelancers: Repository<Freelancer>, trial_days: i64) -> Self {
        Self { freelancers, trial_days }
    }

    pub async fn view(&self, owner_id: Uuid) -> Result<SubscriptionView, AppError> {
        let record = self.freelancers.find(owner_id, owner_id).await?;
        Ok(evaluate(record.as_ref(), Utc::now(), self.trial_days))
    }

    /// Barra criação/edição de documentos fora do teste e sem plano.
    pub async fn require_document_access(&self, owner_id: Uuid) -> Result<SubscriptionView, AppError> {
        let view = self.view(owner_id).await?;
        if !view.can_create_documents {
            tracing::info!(%owner_id, status = ?view.status, "Criação de documento bloqueada pela assinatura");
            return Err(AppError::SubscriptionRequired);
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn freelancer(plan: PlanType, status: SubscriptionStatus, started: DateTime<Utc>) -> Freelancer {
        Freelancer {
            id: Uuid::nil(),
            owner_id: Uuid::nil(),
            name: "João".into(),
            email: "joao@email.com".into(),
            document: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            plan_type: plan,
            subscription_status: status,
            trial_started_at: Some(started),
            trial_ends_at: Some(started + Duration::days(7)),
            marketing_opt_in: false,
            slug: None,
            specialty: None,
            bio: None,
            photo_url: None,
            whatsapp_link: None,
            video_url: None,
            portfolio_urls: vec![],
            published: false,
            created_at: started,
            updated_at: started,
        }
    }

    #[test]
    fn expired_trial_blocks_free_plan() {
        let f = freelancer(PlanType::Free, SubscriptionStatus::Trial, now() - Duration::days(8));
        let view = evaluate(Some(&f), now(), DEFAULT_TRIAL_DAYS);
        assert_eq!(view.status, SubscriptionStatus::Expired);
        assert!(!view.can_create_documents);
        assert!(view.is_blocked);
        assert!(!view.is_trial_active);
        assert_eq!(view.days_remaining, 0);
    }

    #[test]
    fn active_trial_allows_documents() {
        let f = freelancer(PlanType::Free, SubscriptionStatus::Trial, now() - Duration::days(2));
        let view = evaluate(Some(&f), now(), DEFAULT_TRIAL_DAYS);
        assert_eq!(view.status, SubscriptionStatus::Trial);
        assert!(view.can_create_documents);
        assert!(!view.is_blocked);
        assert_eq!(view.days_remaining, 5);
    }

    #[test]
    fn pro_plan_always_allows_documents() {
        let f = freelancer(PlanType::Pro, SubscriptionStatus::Trial, now() - Duration::days(30));
        let view = evaluate(Some(&f), now(), DEFAULT_TRIAL_DAYS);
        assert_eq!(view.status, SubscriptionStatus::Trial);
        assert!(view.can_create_documents);

        let f = freelancer(PlanType::Free, SubscriptionStatus::Active, now() - Duration::days(30));
        assert!(evaluate(Some(&f), now(), DEFAULT_TRIAL_DAYS).can_create_documents);
    }

    #[test]
    fn blocked_status_is_reported() {
        let f = freelancer(PlanType::Free, SubscriptionStatus::Blocked, now() - Duration::days(1));
        let view = evaluate(Some(&f), now(), DEFAULT_TRIAL_DAYS);
        assert!(view.is_blocked);
        assert!(!view.can_create_documents);
    }

    #[test]
    fn missing_record_defaults_to_fresh_trial() {
        let view = evaluate(None, now(), DEFAULT_TRIAL_DAYS);
        assert_eq!(view.plan_type, PlanType::Free);
        assert_eq!(view.status, SubscriptionStatus::Trial);
        assert_eq!(view.trial_started_at, now());
        assert_eq!(view.days_remaining, 7);
        assert!(view.can_create_documents);
    }

    #[test]
    fn falls_back_to_creation_time_without_trial_start() {
        let mut f = freelancer(PlanType::Free, SubscriptionStatus::Trial, now() - Duration::days(3));
        f.trial_started_at = None;
        f.trial_ends_at = None;
        let view = evaluate(Some(&f), now(), DEFAULT_TRIAL_DAYS);
        assert_eq!(view.trial_started_at, f.created_at);
        assert_eq!(view.days_remaining, 4);
    }

    #[test]
    fn days_remaining_is_monotonic_and_bounded() {
        let start = now();
        let end = start + Duration::days(7);
        let mut previous = i64::MAX;
        for hour in 0..(24 * 9) {
            let at = start + Duration::hours(hour);
            let remaining = days_remaining(end, at);
            assert!(remaining <= previous);
            assert!((0..=7).contains(&remaining));
            previous = remaining;
        }
        assert_eq!(days_remaining(end, end), 0);
        assert_eq!(days_remaining(end, end - Duration::minutes(1)), 1);
    }
}
