// src/autenticacao/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use futures::future::{ready, Ready};
use jsonwebtoken::decode;
use tracing::{error, warn};

use super::auth_structs::{Claims, ConfigAutenticacao};
use crate::shared::api_error::ApiError;

/// Usuário autenticado, extraído do token Bearer.
/// Toda rota que recebe este tipo como parâmetro exige autenticação.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub user_email: Option<String>,
}

impl AuthenticatedUser {
    /// Como o usuário aparece nos logs de alteração: e-mail, ou o ID se não houver.
    pub fn identificacao(&self) -> &str {
        self.user_email.as_deref().unwrap_or(&self.user_id)
    }
}

/// Extrator de autenticação para Actix Web.
/// Valida o JWT presente no cabeçalho Authorization.
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(autenticar(req))
    }
}

fn autenticar(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let config = match req.app_data::<web::Data<ConfigAutenticacao>>() {
        Some(config) => config,
        None => {
            error!("ConfigAutenticacao não registrada no App");
            return Err(ApiError::Interno("Erro de configuração do servidor.".into()));
        }
    };

    let header_str = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ApiError::NaoAutorizado("Token de autenticação ausente.".into()))?
        .to_str()
        .map_err(|_| ApiError::NaoAutorizado("Token de autenticação inválido.".into()))?;

    let token = header_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::NaoAutorizado("Formato de token inválido. Esperado 'Bearer <token>'.".into())
    })?;

    let token_data = decode::<Claims>(token.trim(), config.chave(), config.validacao())
        .map_err(|e| {
            warn!(error = ?e, "Token rejeitado");
            let mensagem = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidAudience => "Token emitido para outro público.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de autenticação inválido.",
            };
            ApiError::NaoAutorizado(mensagem.into())
        })?;

    Ok(AuthenticatedUser {
        user_id: token_data.claims.sub,
        user_email: token_data.claims.email,
    })
}
