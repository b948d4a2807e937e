// src/services/billing_service.rs

use std::time::Duration;

use reqwest::Client;

use crate::{common::error::AppError, models::subscription::RedirectResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Cliente da função de cobrança. A função fala com o provedor de pagamento
/// e devolve a URL do checkout ou do portal de assinatura.
#[derive(Clone)]
pub struct BillingService {
    http: Client,
    function_url: Option<String>,
}

impl BillingService {
    pub fn new(function_url: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("propostas-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            function_url: function_url.map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    pub async fn create_checkout_session(&self, bearer_token: &str) -> Result<RedirectResponse, AppError> {
        self.redirect("create-checkout-session", bearer_token).await
    }

    pub async fn create_portal_session(&self, bearer_token: &str) -> Result<RedirectResponse, AppError> {
        self.redirect("create-portal-session", bearer_token).await
    }

    // Sem retentativa: a falha volta para quem clicou.
    async fn redirect(&self, function: &str, bearer_token: &str) -> Result<RedirectResponse, AppError> {
        let base = self
            .function_url
            .as_deref()
            .ok_or_else(|| AppError::ExternalService("BILLING_FUNCTION_URL não configurada".into()))?;

        let res = self
            .http
            .post(format!("{}/{}", base, function))
            .bearer_auth(bearer_token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("{}: {}", function, e)))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!("{} respondeu {}: {}", function, status, body)));
        }

        let redirect = res
            .json::<RedirectResponse>()
            .await
            .map_err(|e| AppError::ExternalService(format!("{}: resposta inválida ({})", function, e)))?;

        if redirect.url.trim().is_empty() {
            return Err(AppError::ExternalService(format!("{}: URL vazia", function)));
        }
        Ok(redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use tokio::net::TcpListener;

    async fn fake_function() -> String {
        async fn checkout(headers: HeaderMap) -> Json<serde_json::Value> {
            let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default();
            Json(serde_json::json!({ "url": format!("https://checkout.exemplo/{}", auth.len()) }))
        }

        let app = Router::new()
            .route("/create-checkout-session", post(checkout))
            .route("/create-portal-session", post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "falhou") }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn missing_configuration_is_an_external_error() {
        let billing = BillingService::new(None).unwrap();
        let err = billing.create_checkout_session("token").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(_)));
    }

    #[tokio::test]
    async fn forwards_bearer_and_returns_url() {
        let billing = BillingService::new(Some(fake_function().await)).unwrap();

        let redirect = billing.create_checkout_session("abc").await.unwrap();
        // "Bearer abc" tem 10 caracteres
        assert_eq!(redirect.url, "https://checkout.exemplo/10");

        let err = billing.create_portal_session("abc").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(_)));
    }
}
