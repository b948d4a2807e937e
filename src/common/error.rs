use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

// Erro único da aplicação. Cada variante cai em uma das quatro famílias:
// validação, armazenamento, identidade e serviços externos.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação de regra de negócio (campo -> mensagem)
    #[error("Campo inválido: {0}")]
    InvalidField(&'static str, String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("E-mail não confirmado")]
    EmailNotConfirmed,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Endereço público já está em uso")]
    SlugTaken,

    #[error("Assinatura necessária")]
    SubscriptionRequired,

    #[error("Falha no serviço externo: {0}")]
    ExternalService(String),

    #[error("Falha ao gerar o PDF: {0}")]
    PdfExport(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro no armazenamento local: {0}")]
    LocalStoreError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidField(field, message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidField(..) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::SlugTaken => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::EmailNotConfirmed => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SubscriptionRequired => StatusCode::PAYMENT_REQUIRED,
            AppError::ExternalService(_) | AppError::PdfExport(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message: String = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidField(field, message) => {
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": { field: [message] },
                }));
                return (status, body).into_response();
            }
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".into(),
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".into(),
            AppError::EmailNotConfirmed => "Confirme seu e-mail antes de entrar.".into(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".into(),
            AppError::UserNotFound => "Usuário não encontrado.".into(),
            AppError::NotFound(what) => format!("{} não encontrado(a).", what),
            AppError::SlugTaken => "Este endereço público já está em uso.".into(),
            AppError::SubscriptionRequired => {
                "Seu período de teste terminou. Assine o plano Pro para continuar.".into()
            }
            ref e @ (AppError::ExternalService(_) | AppError::PdfExport(_)) => {
                tracing::error!("Falha em serviço externo: {}", e);
                "Não foi possível concluir a operação. Tente novamente.".into()
            }

            // Todos os outros erros (banco, armazenamento local, interno) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".into()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(AppError::invalid("value", "x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::EmailNotConfirmed.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Proposta").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::SubscriptionRequired.status_code(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(AppError::PdfExport("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
