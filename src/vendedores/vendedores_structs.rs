// src/vendedores/vendedores_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::api_error::ApiError;

#[derive(Deserialize)]
pub struct NovoVendedor {
    pub nome: String,
}

impl NovoVendedor {
    pub fn nome_validado(&self) -> Result<String, ApiError> {
        let nome = self.nome.trim();
        if nome.is_empty() {
            return Err(ApiError::RequisicaoInvalida(
                "O nome do vendedor é obrigatório.".to_string(),
            ));
        }
        Ok(nome.to_string())
    }
}

/// Pessoa creditada pelas vendas nos relatórios (tabela `sellers`)
#[derive(Debug, Serialize, FromRow)]
pub struct Vendedor {
    pub id: i32,
    #[sqlx(rename = "name")]
    pub nome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valida_nome_do_vendedor() {
        let ok = NovoVendedor { nome: "Maria Oliveira\n".into() };
        assert_eq!(ok.nome_validado().unwrap(), "Maria Oliveira");

        let vazio = NovoVendedor { nome: String::new() };
        assert!(vazio.nome_validado().is_err());
    }
}
