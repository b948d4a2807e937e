// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RecordQuery, Repository},
    models::{
        auth::{AccountResponse, AuthResponse, Claims, SignInPayload, SignUpPayload, TokenPurpose, User},
        freelancer::{Freelancer, PlanType, SubscriptionStatus},
    },
};

const SESSION_TTL_DAYS: i64 = 7;
const CONFIRMATION_TTL_HOURS: i64 = 48;
const RESET_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    EmailConfirmation,
    PasswordReset,
}

/// Envio de links fora de banda (confirmação de e-mail, redefinição de senha).
pub trait LinkNotifier: Send + Sync {
    fn send_link(&self, email: &str, kind: LinkKind, url: &str);
}

/// Só registra o link no log. Serve para desenvolvimento e para quem
/// ainda não configurou um provedor de e-mail.
pub struct LoggingNotifier;

impl LinkNotifier for LoggingNotifier {
    fn send_link(&self, email: &str, kind: LinkKind, url: &str) {
        tracing::info!(%email, ?kind, %url, "✉️ Link enviado");
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Repository<User>,
    freelancers: Repository<Freelancer>,
    notifier: Arc<dyn LinkNotifier>,
    jwt_secret: String,
    public_base_url: String,
    trial_days: i64,
    require_email_confirmation: bool,
    hash_cost: u32,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        users: Repository<User>,
        freelancers: Repository<Freelancer>,
        notifier: Arc<dyn LinkNotifier>,
        jwt_secret: String,
        public_base_url: String,
        trial_days: i64,
        require_email_confirmation: bool,
    ) -> Self {
        Self {
            users,
            freelancers,
            notifier,
            jwt_secret,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            trial_days,
            require_email_confirmation,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    #[cfg(test)]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.hash_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users
            .find_first(&RecordQuery::any_owner().with("email", normalize_email(email)))
            .await
    }

    pub async fn sign_up(&self, payload: &SignUpPayload) -> Result<AccountResponse, AppError> {
        let email = normalize_email(&payload.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = self.hash_password(&payload.password).await?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let user = self
            .users
            .create(&User {
                id,
                owner_id: id,
                email: email.clone(),
                password_hash,
                email_confirmed_at: None,
                token_version: 0,
                created_at: now,
                updated_at: now,
            })
            .await?;

        // Todo cadastro novo começa no teste gratuito
        let freelancer = self
            .freelancers
            .create(&Freelancer {
                id,
                owner_id: id,
                name: payload.name.trim().to_string(),
                email: email.clone(),
                document: None,
                phone: None,
                address: None,
                city: None,
                state: None,
                plan_type: PlanType::Free,
                subscription_status: SubscriptionStatus::Trial,
                trial_started_at: Some(now),
                trial_ends_at: Some(now + Duration::days(self.trial_days)),
                marketing_opt_in: payload.marketing_opt_in,
                slug: None,
                specialty: None,
                bio: None,
                photo_url: None,
                whatsapp_link: None,
                video_url: None,
                portfolio_urls: Vec::new(),
                published: false,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let token = self.create_token(&user, TokenPurpose::EmailConfirmation, Duration::hours(CONFIRMATION_TTL_HOURS))?;
        let url = format!("{}/api/auth/confirm?token={}", self.public_base_url, token);
        self.notifier.send_link(&user.email, LinkKind::EmailConfirmation, &url);

        tracing::info!(user_id = %user.id, "👤 Nova conta criada");
        Ok(Self::account(&user, Some(&freelancer)))
    }

    pub async fn confirm_email(&self, token: &str) -> Result<AccountResponse, AppError> {
        let claims = self.decode_claims(token)?;
        if claims.purpose != TokenPurpose::EmailConfirmation {
            return Err(AppError::InvalidToken);
        }

        let mut user = self.users.find_any(claims.sub).await?.ok_or(AppError::UserNotFound)?;
        if user.email_confirmed_at.is_none() {
            let now = Utc::now();
            user.email_confirmed_at = Some(now);
            user.updated_at = now;
            user = self.users.update(&user).await?.ok_or(AppError::UserNotFound)?;
            tracing::info!(user_id = %user.id, "✅ E-mail confirmado");
        }

        let freelancer = self.freelancers.find(user.id, user.id).await?;
        Ok(Self::account(&user, freelancer.as_ref()))
    }

    pub async fn sign_in(&self, payload: &SignInPayload) -> Result<AuthResponse, AppError> {
        let user = self
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = payload.password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if self.require_email_confirmation && user.email_confirmed_at.is_none() {
            return Err(AppError::EmailNotConfirmed);
        }

        let token = self.create_token(&user, TokenPurpose::Session, Duration::days(SESSION_TTL_DAYS))?;
        Ok(AuthResponse { token, user_id: user.id })
    }

    /// Invalida todos os tokens emitidos até agora.
    pub async fn sign_out(&self, user: &User) -> Result<(), AppError> {
        let mut updated = user.clone();
        updated.token_version += 1;
        updated.updated_at = Utc::now();
        self.users.update(&updated).await?.ok_or(AppError::UserNotFound)?;
        Ok(())
    }

    /// E-mail desconhecido não gera erro (não revela quem tem conta).
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.find_by_email(email).await? else {
            tracing::debug!("Pedido de redefinição para e-mail sem conta");
            return Ok(());
        };

        let token = self.create_token(&user, TokenPurpose::PasswordReset, Duration::hours(RESET_TTL_HOURS))?;
        let url = format!("{}/reset-password?token={}", self.public_base_url, token);
        self.notifier.send_link(&user.email, LinkKind::PasswordReset, &url);
        Ok(())
    }

    /// Troca a senha e derruba as sessões abertas, inclusive a do link de
    /// redefinição.
    pub async fn update_password(&self, user: &User, new_password: &str) -> Result<(), AppError> {
        let mut updated = user.clone();
        updated.password_hash = self.hash_password(new_password).await?;
        updated.token_version += 1;
        updated.updated_at = Utc::now();
        self.users.update(&updated).await?.ok_or(AppError::UserNotFound)?;
        tracing::info!(user_id = %user.id, "🔑 Senha atualizada");
        Ok(())
    }

    /// Valida um token de sessão (o link de redefinição também abre uma
    /// sessão curta) e devolve o usuário.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_claims(token)?;
        if !matches!(claims.purpose, TokenPurpose::Session | TokenPurpose::PasswordReset) {
            return Err(AppError::InvalidToken);
        }

        let user = self.users.find_any(claims.sub).await?.ok_or(AppError::UserNotFound)?;
        if user.token_version != claims.ver {
            return Err(AppError::InvalidToken);
        }
        Ok(user)
    }

    pub async fn account_of(&self, user: &User) -> Result<AccountResponse, AppError> {
        let freelancer = self.freelancers.find(user.id, user.id).await?;
        Ok(Self::account(user, freelancer.as_ref()))
    }

    fn account(user: &User, freelancer: Option<&Freelancer>) -> AccountResponse {
        AccountResponse {
            id: user.id,
            email: user.email.clone(),
            name: freelancer.map(|f| f.name.clone()).unwrap_or_default(),
            email_confirmed: user.email_confirmed_at.is_some(),
            created_at: user.created_at,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(self.jwt_secret.as_ref()), &validation)
            .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims)
    }

    fn create_token(&self, user: &User, purpose: TokenPurpose, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user.id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            ver: user.token_version,
            purpose,
        };

        Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(self.jwt_secret.as_ref()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LocalRecordStore, SharedStore};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingNotifier {
        sent: Mutex<Vec<(String, LinkKind, String)>>,
    }

    impl LinkNotifier for CapturingNotifier {
        fn send_link(&self, email: &str, kind: LinkKind, url: &str) {
            self.sent.lock().unwrap().push((email.to_string(), kind, url.to_string()));
        }
    }

    impl CapturingNotifier {
        fn last_token(&self, kind: LinkKind) -> String {
            let sent = self.sent.lock().unwrap();
            let (_, _, url) = sent.iter().rev().find(|(_, k, _)| *k == kind).unwrap();
            url.split("token=").nth(1).unwrap().to_string()
        }
    }

    fn service(dir: &std::path::Path, require_confirmation: bool) -> (AuthService, Arc<CapturingNotifier>) {
        let store: SharedStore = Arc::new(LocalRecordStore::open(dir).unwrap());
        let notifier = Arc::new(CapturingNotifier::default());
        let service = AuthService::new(
            Repository::new(store.clone()),
            Repository::new(store),
            notifier.clone(),
            "segredo-de-teste".into(),
            "http://localhost:3000/".into(),
            7,
            require_confirmation,
        )
        .with_hash_cost(4);
        (service, notifier)
    }

    fn sign_up_payload(email: &str) -> SignUpPayload {
        SignUpPayload {
            email: email.into(),
            password: "senha123".into(),
            name: "João Pereira".into(),
            marketing_opt_in: true,
        }
    }

    fn sign_in_payload(email: &str, password: &str) -> SignInPayload {
        SignInPayload { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn sign_up_creates_account_with_trial() {
        let dir = tempfile::tempdir().unwrap();
        let (auth, notifier) = service(dir.path(), false);

        let account = auth.sign_up(&sign_up_payload("Joao@Email.com ")).await.unwrap();
        assert_eq!(account.email, "joao@email.com");
        assert_eq!(account.name, "João Pereira");
        assert!(!account.email_confirmed);

        let freelancer = auth.freelancers.find(account.id, account.id).await.unwrap().unwrap();
        assert_eq!(freelancer.subscription_status, SubscriptionStatus::Trial);
        assert!(freelancer.marketing_opt_in);
        assert_eq!(
            freelancer.trial_ends_at.unwrap() - freelancer.trial_started_at.unwrap(),
            Duration::days(7)
        );

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].2.starts_with("http://localhost:3000/api/auth/confirm?token="));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (auth, _) = service(dir.path(), false);

        auth.sign_up(&sign_up_payload("joao@email.com")).await.unwrap();
        let err = auth.sign_up(&sign_up_payload("JOAO@email.com")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn sign_in_checks_password_and_sign_out_revokes_token() {
        let dir = tempfile::tempdir().unwrap();
        let (auth, _) = service(dir.path(), false);
        auth.sign_up(&sign_up_payload("joao@email.com")).await.unwrap();

        let err = auth.sign_in(&sign_in_payload("joao@email.com", "errada1")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        let err = auth.sign_in(&sign_in_payload("ninguem@email.com", "senha123")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let session = auth.sign_in(&sign_in_payload("joao@email.com", "senha123")).await.unwrap();
        let user = auth.validate_token(&session.token).await.unwrap();
        assert_eq!(user.id, session.user_id);

        auth.sign_out(&user).await.unwrap();
        assert!(matches!(auth.validate_token(&session.token).await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn confirmation_is_enforced_when_required() {
        let dir = tempfile::tempdir().unwrap();
        let (auth, notifier) = service(dir.path(), true);
        auth.sign_up(&sign_up_payload("joao@email.com")).await.unwrap();

        let err = auth.sign_in(&sign_in_payload("joao@email.com", "senha123")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailNotConfirmed));

        let token = notifier.last_token(LinkKind::EmailConfirmation);
        // Token de confirmação não abre sessão
        assert!(matches!(auth.validate_token(&token).await, Err(AppError::InvalidToken)));

        let account = auth.confirm_email(&token).await.unwrap();
        assert!(account.email_confirmed);
        auth.sign_in(&sign_in_payload("joao@email.com", "senha123")).await.unwrap();
    }

    #[tokio::test]
    async fn password_reset_link_allows_password_update() {
        let dir = tempfile::tempdir().unwrap();
        let (auth, notifier) = service(dir.path(), false);
        auth.sign_up(&sign_up_payload("joao@email.com")).await.unwrap();
        let old_session = auth.sign_in(&sign_in_payload("joao@email.com", "senha123")).await.unwrap();

        auth.request_password_reset("desconhecido@email.com").await.unwrap();
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);

        auth.request_password_reset("joao@email.com").await.unwrap();
        let token = notifier.last_token(LinkKind::PasswordReset);
        let user = auth.validate_token(&token).await.unwrap();

        auth.update_password(&user, "novasenha").await.unwrap();

        // O link de redefinição e as sessões antigas deixam de valer
        assert!(matches!(auth.validate_token(&token).await, Err(AppError::InvalidToken)));
        assert!(matches!(auth.validate_token(&old_session.token).await, Err(AppError::InvalidToken)));

        assert!(auth.sign_in(&sign_in_payload("joao@email.com", "senha123")).await.is_err());
        let fresh = auth.sign_in(&sign_in_payload("joao@email.com", "novasenha")).await.unwrap();
        auth.validate_token(&fresh.token).await.unwrap();
    }
}
