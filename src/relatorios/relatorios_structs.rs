// src/relatorios/relatorios_structs.rs

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

/// Quantidade de vendas agrupada por um nome (vendedor ou sabor).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContagemPorNome {
    pub nome: String,
    pub quantidade: u64,
}

/// Números do painel principal.
#[derive(Debug, Serialize)]
pub struct ResumoDashboard {
    /// Vendas válidas × preço do cartão.
    pub receita_esperada: BigDecimal,
    /// Todas as vendas registradas, inclusive canceladas.
    pub cartoes_vendidos: u64,
    pub pizzas_entregues: u64,
    pub vendas_pendentes: u64,
    pub vendas_canceladas: u64,
    pub vendas_por_vendedor: Vec<ContagemPorNome>,
    pub vendas_por_sabor: Vec<ContagemPorNome>,
}

/// Linha do relatório "Vendas por Vendedor".
#[derive(Debug, PartialEq, Serialize)]
pub struct RelatorioVendedor {
    pub vendedor: String,
    pub cartoes_vendidos: u64,
    pub valor_total: BigDecimal,
}

/// Linha do resumo por data de retirada.
#[derive(Debug, PartialEq, Serialize)]
pub struct RelatorioDataRetirada {
    pub data_retirada: NaiveDate,
    pub total: u64,
    pub pendentes: u64,
    pub entregues: u64,
}
