// src/entregas/entregas_structs.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::shared::api_error::ApiError;
use crate::vendas::vendas_structs::{formatar_data_br, StatusVenda, VendaDetalhada};

/// Ações da tela de entregas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcaoEntrega {
    /// Pendente → Entregue
    Registrar,
    /// Entregue → Pendente
    Desfazer,
}

impl AcaoEntrega {
    pub fn status_origem(&self) -> StatusVenda {
        match self {
            AcaoEntrega::Registrar => StatusVenda::Pendente,
            AcaoEntrega::Desfazer => StatusVenda::Entregue,
        }
    }

    pub fn status_destino(&self) -> StatusVenda {
        match self {
            AcaoEntrega::Registrar => StatusVenda::Entregue,
            AcaoEntrega::Desfazer => StatusVenda::Pendente,
        }
    }

    /// A ação que faz sentido para uma venda no status dado.
    /// Pedidos cancelados não têm ação.
    pub fn disponivel_para(status: StatusVenda) -> Option<AcaoEntrega> {
        match status {
            StatusVenda::Pendente => Some(AcaoEntrega::Registrar),
            StatusVenda::Entregue => Some(AcaoEntrega::Desfazer),
            StatusVenda::Cancelado => None,
        }
    }

    /// Confere se a ação pode partir do status atual e devolve o novo status.
    pub fn aplicar(&self, atual: StatusVenda) -> Result<StatusVenda, ApiError> {
        if atual == StatusVenda::Cancelado {
            return Err(ApiError::Conflito(
                "Pedido cancelado: a entrega não pode ser alterada.".to_string(),
            ));
        }
        if atual != self.status_origem() {
            return Err(ApiError::Conflito(format!(
                "A venda está com status {}; esperado {}.",
                atual,
                self.status_origem()
            )));
        }
        Ok(self.status_destino())
    }
}

/// Linha da lista de entregas.
#[derive(Debug, Serialize)]
pub struct ItemEntrega {
    pub id: i32,
    pub nome_cliente: String,
    pub sabores: String,
    pub data_retirada: NaiveDate,
    pub data_retirada_formatada: String,
    pub status: StatusVenda,
    pub acao_disponivel: Option<AcaoEntrega>,
}

impl From<VendaDetalhada> for ItemEntrega {
    fn from(venda: VendaDetalhada) -> Self {
        let sabores = [venda.sabor1_nome, venda.sabor2_nome]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        ItemEntrega {
            id: venda.id,
            nome_cliente: venda.nome_cliente,
            sabores,
            data_retirada: venda.data_retirada,
            data_retirada_formatada: formatar_data_br(venda.data_retirada),
            status: venda.status,
            acao_disponivel: AcaoEntrega::disponivel_para(venda.status),
        }
    }
}
