// src/vendas/vendas_structs.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use thiserror::Error;

use crate::configuracoes::configuracoes_structs::ConfiguracoesEvento;
use crate::shared::api_error::ApiError;

/// SELECT base das vendas com nomes de vendedor e sabores resolvidos.
/// Usado pelas rotas de vendas, entregas e relatórios.
pub const SELECT_VENDAS: &str = "SELECT s.id, s.customer_name, s.customer_phone, \
     s.seller_id, se.name AS seller_name, s.pickup_date, \
     s.flavor1_id, f1.name AS flavor1_name, s.flavor2_id, f2.name AS flavor2_name, \
     s.status, s.card_number, s.created_at \
     FROM sales s \
     LEFT JOIN sellers se ON se.id = s.seller_id \
     LEFT JOIN flavors f1 ON f1.id = s.flavor1_id \
     LEFT JOIN flavors f2 ON f2.id = s.flavor2_id";

/// Situação de uma venda. Os nomes são os mesmos gravados na coluna `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusVenda {
    Pendente,
    Entregue,
    Cancelado,
}

#[derive(Debug, Error)]
#[error("status de venda desconhecido: '{0}'")]
pub struct StatusDesconhecido(pub String);

impl StatusVenda {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusVenda::Pendente => "Pendente",
            StatusVenda::Entregue => "Entregue",
            StatusVenda::Cancelado => "Cancelado",
        }
    }

    /// Vendas canceladas não contam para receita nem relatórios.
    pub fn e_valida(&self) -> bool {
        *self != StatusVenda::Cancelado
    }
}

impl fmt::Display for StatusVenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusVenda {
    type Err = StatusDesconhecido;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendente" => Ok(StatusVenda::Pendente),
            "Entregue" => Ok(StatusVenda::Entregue),
            "Cancelado" => Ok(StatusVenda::Cancelado),
            outro => Err(StatusDesconhecido(outro.to_string())),
        }
    }
}

/// Estrutura para receber os dados de uma venda na requisição POST/PUT.
/// Uma venda tem um ou dois sabores: `sabor2_id` só vem quando são dois.
#[derive(Debug, Deserialize)]
pub struct NovaVenda {
    pub nome_cliente: String,
    pub telefone_cliente: String,
    pub vendedor_id: Option<i32>,
    pub data_retirada: NaiveDate,
    pub sabor1_id: i32,
    pub sabor2_id: Option<i32>,
    pub numero_cartao: Option<String>,
}

/// Venda já validada e normalizada, pronta para gravar.
#[derive(Debug, PartialEq)]
pub struct VendaValidada {
    pub nome_cliente: String,
    pub telefone_cliente: String,
    pub vendedor_id: Option<i32>,
    pub data_retirada: NaiveDate,
    pub sabor1_id: i32,
    pub sabor2_id: Option<i32>,
    pub numero_cartao: Option<String>,
}

impl NovaVenda {
    pub fn validada(self, configuracoes: &ConfiguracoesEvento) -> Result<VendaValidada, ApiError> {
        let nome_cliente = self.nome_cliente.trim().to_string();
        if nome_cliente.is_empty() {
            return Err(ApiError::RequisicaoInvalida(
                "O nome do cliente é obrigatório.".to_string(),
            ));
        }

        let telefone_cliente = self.telefone_cliente.trim().to_string();
        if telefone_cliente.is_empty() {
            return Err(ApiError::RequisicaoInvalida(
                "O telefone do cliente é obrigatório.".to_string(),
            ));
        }

        if !configuracoes.aceita_data_retirada(self.data_retirada) {
            return Err(ApiError::RequisicaoInvalida(format!(
                "A data de retirada {} não está entre as datas configuradas.",
                formatar_data_br(self.data_retirada)
            )));
        }

        let numero_cartao = self
            .numero_cartao
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(VendaValidada {
            nome_cliente,
            telefone_cliente,
            vendedor_id: self.vendedor_id,
            data_retirada: self.data_retirada,
            sabor1_id: self.sabor1_id,
            sabor2_id: self.sabor2_id,
            numero_cartao,
        })
    }
}

/// Venda com os nomes de vendedor e sabores já resolvidos.
#[derive(Debug, Clone, Serialize)]
pub struct VendaDetalhada {
    pub id: i32,
    pub nome_cliente: String,
    pub telefone_cliente: String,
    pub vendedor_id: Option<i32>,
    pub vendedor_nome: Option<String>,
    pub data_retirada: NaiveDate,
    pub sabor1_id: i32,
    pub sabor1_nome: Option<String>,
    pub sabor2_id: Option<i32>,
    pub sabor2_nome: Option<String>,
    pub status: StatusVenda,
    pub numero_cartao: Option<String>,
    pub criado_em: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for VendaDetalhada {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<StatusVenda>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(VendaDetalhada {
            id: row.try_get("id")?,
            nome_cliente: row.try_get("customer_name")?,
            telefone_cliente: row.try_get("customer_phone")?,
            vendedor_id: row.try_get("seller_id")?,
            vendedor_nome: row.try_get("seller_name")?,
            data_retirada: row.try_get("pickup_date")?,
            sabor1_id: row.try_get("flavor1_id")?,
            sabor1_nome: row.try_get("flavor1_name")?,
            sabor2_id: row.try_get("flavor2_id")?,
            sabor2_nome: row.try_get("flavor2_name")?,
            status,
            numero_cartao: row.try_get("card_number")?,
            criado_em: row.try_get("created_at")?,
        })
    }
}

/// Filtros opcionais de GET /vendas.
#[derive(Debug, Default, Deserialize)]
pub struct FiltroVendas {
    pub status: Option<StatusVenda>,
    pub vendedor_id: Option<i32>,
    pub data_retirada: Option<NaiveDate>,
    pub busca: Option<String>,
}

impl FiltroVendas {
    /// Padrão ILIKE para a busca por nome ou telefone, com `%` e `_`
    /// do texto digitado tratados como literais.
    pub fn padrao_busca(&self) -> Option<String> {
        let termo = self.busca.as_deref()?.trim();
        if termo.is_empty() {
            return None;
        }
        let escapado = termo
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{}%", escapado))
    }
}

/// Corpo do PATCH /vendas/{id}/status.
#[derive(Debug, Deserialize)]
pub struct AtualizacaoStatus {
    pub status: StatusVenda,
}

/// Data no formato usado no Brasil (dd/mm/aaaa).
pub fn formatar_data_br(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn data(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn configuracoes(datas: &[&str]) -> ConfiguracoesEvento {
        ConfiguracoesEvento {
            preco: BigDecimal::from(35),
            datas_retirada: datas.iter().map(|d| data(d)).collect(),
        }
    }

    fn nova_venda() -> NovaVenda {
        NovaVenda {
            nome_cliente: " Carlos Pereira ".into(),
            telefone_cliente: "11 98765-4321".into(),
            vendedor_id: Some(1),
            data_retirada: data("2024-10-26"),
            sabor1_id: 1,
            sabor2_id: Some(2),
            numero_cartao: Some("  ".into()),
        }
    }

    #[test]
    fn status_ida_e_volta_pelo_texto() {
        for status in [StatusVenda::Pendente, StatusVenda::Entregue, StatusVenda::Cancelado] {
            assert_eq!(status.as_str().parse::<StatusVenda>().unwrap(), status);
        }
        assert!("entregue".parse::<StatusVenda>().is_err());
    }

    #[test]
    fn status_serializa_com_nome_do_banco() {
        assert_eq!(serde_json::to_value(StatusVenda::Cancelado).unwrap(), "Cancelado");
        let status: StatusVenda = serde_json::from_str("\"Entregue\"").unwrap();
        assert_eq!(status, StatusVenda::Entregue);
    }

    #[test]
    fn so_cancelado_e_invalida() {
        assert!(StatusVenda::Pendente.e_valida());
        assert!(StatusVenda::Entregue.e_valida());
        assert!(!StatusVenda::Cancelado.e_valida());
    }

    #[test]
    fn normaliza_venda_valida() {
        let venda = nova_venda()
            .validada(&configuracoes(&["2024-10-26", "2024-11-02"]))
            .unwrap();
        assert_eq!(venda.nome_cliente, "Carlos Pereira");
        assert_eq!(venda.numero_cartao, None);
        assert_eq!(venda.sabor2_id, Some(2));
    }

    #[test]
    fn numero_do_cartao_e_aparado() {
        let mut venda = nova_venda();
        venda.numero_cartao = Some(" 0042 ".into());
        let venda = venda.validada(&configuracoes(&[])).unwrap();
        assert_eq!(venda.numero_cartao.as_deref(), Some("0042"));
    }

    #[test]
    fn exige_nome_e_telefone() {
        let mut sem_nome = nova_venda();
        sem_nome.nome_cliente = "  ".into();
        assert!(matches!(
            sem_nome.validada(&configuracoes(&[])),
            Err(ApiError::RequisicaoInvalida(msg)) if msg.contains("nome")
        ));

        let mut sem_telefone = nova_venda();
        sem_telefone.telefone_cliente = String::new();
        assert!(matches!(
            sem_telefone.validada(&configuracoes(&[])),
            Err(ApiError::RequisicaoInvalida(msg)) if msg.contains("telefone")
        ));
    }

    #[test]
    fn rejeita_data_fora_das_configuradas() {
        let mut venda = nova_venda();
        venda.data_retirada = data("2024-12-25");
        let err = venda.validada(&configuracoes(&["2024-10-26"])).unwrap_err();
        assert!(matches!(err, ApiError::RequisicaoInvalida(msg) if msg.contains("25/12/2024")));
    }

    #[test]
    fn desserializa_venda_de_um_sabor() {
        let venda: NovaVenda = serde_json::from_value(serde_json::json!({
            "nome_cliente": "Ana Souza",
            "telefone_cliente": "21 91234-5678",
            "data_retirada": "2024-11-02",
            "sabor1_id": 3
        }))
        .unwrap();
        assert_eq!(venda.vendedor_id, None);
        assert_eq!(venda.sabor2_id, None);
        assert_eq!(venda.numero_cartao, None);
    }

    #[test]
    fn padrao_de_busca_escapa_curingas() {
        let filtro = FiltroVendas { busca: Some(" 50%_off ".into()), ..Default::default() };
        assert_eq!(filtro.padrao_busca().as_deref(), Some("%50\\%\\_off%"));

        let vazio = FiltroVendas { busca: Some("   ".into()), ..Default::default() };
        assert_eq!(vazio.padrao_busca(), None);
    }

    #[test]
    fn formata_data_no_padrao_brasileiro() {
        assert_eq!(formatar_data_br(data("2024-11-02")), "02/11/2024");
    }
}
