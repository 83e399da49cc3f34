// src/autenticacao/auth_structs.rs

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Estrutura para o payload do JWT (Claims).
/// Os tokens são emitidos pelo provedor de identidade externo; aqui só
/// lemos o que precisamos para identificar quem fez a requisição.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID do usuário no provedor)
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64, // Expiration Time (timestamp Unix)
}

/// Chave e regras de validação dos tokens, compartilhadas entre as rotas.
pub struct ConfigAutenticacao {
    chave: DecodingKey,
    validacao: Validation,
}

impl ConfigAutenticacao {
    pub fn new(jwt_secret: &str, audience: Option<&str>) -> Self {
        let mut validacao = Validation::new(Algorithm::HS256);
        if let Some(aud) = audience {
            validacao.set_audience(&[aud]);
        }
        ConfigAutenticacao {
            chave: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validacao,
        }
    }

    pub fn chave(&self) -> &DecodingKey {
        &self.chave
    }

    pub fn validacao(&self) -> &Validation {
        &self.validacao
    }
}
