// src/sabores/sabores_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::api_error::ApiError;

/// Estrutura para receber dados de um sabor na requisição POST/PUT
#[derive(Deserialize)]
pub struct NovoSabor {
    pub nome: String,
}

impl NovoSabor {
    /// Nome sem espaços nas pontas; vazio é rejeitado.
    pub fn nome_validado(&self) -> Result<String, ApiError> {
        let nome = self.nome.trim();
        if nome.is_empty() {
            return Err(ApiError::RequisicaoInvalida(
                "O nome do sabor é obrigatório.".to_string(),
            ));
        }
        Ok(nome.to_string())
    }
}

/// Estrutura que representa um sabor no banco de dados (tabela `flavors`)
#[derive(Debug, Serialize, FromRow)]
pub struct Sabor {
    pub id: i32,
    #[sqlx(rename = "name")]
    pub nome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_e_aparado() {
        let novo = NovoSabor { nome: "  Calabresa ".into() };
        assert_eq!(novo.nome_validado().unwrap(), "Calabresa");
    }

    #[test]
    fn nome_vazio_e_rejeitado() {
        let novo = NovoSabor { nome: "   ".into() };
        assert!(matches!(novo.nome_validado(), Err(ApiError::RequisicaoInvalida(_))));
    }
}
