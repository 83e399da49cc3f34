// src/relatorios/relatorios_calculo.rs
//
// Agregações sobre vendas já carregadas do banco. Nada aqui faz consulta:
// as rotas buscam as vendas e o preço e passam para estas funções.

use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;

use super::relatorios_structs::{
    ContagemPorNome, RelatorioDataRetirada, RelatorioVendedor, ResumoDashboard,
};
use crate::vendas::vendas_structs::{StatusVenda, VendaDetalhada};

/// Nome usado quando a venda não tem vendedor.
pub const VENDEDOR_NAO_INFORMADO: &str = "N/A";

const CABECALHO_CSV: [&str; 8] = [
    "ID",
    "Cliente",
    "Telefone",
    "Vendedor",
    "Data Retirada",
    "Sabor 1",
    "Sabor 2",
    "Status",
];

/// Vendas que não foram canceladas.
pub fn vendas_validas(vendas: &[VendaDetalhada]) -> impl Iterator<Item = &VendaDetalhada> {
    vendas.iter().filter(|v| v.status.e_valida())
}

fn contar_status(vendas: &[VendaDetalhada], status: StatusVenda) -> u64 {
    vendas.iter().filter(|v| v.status == status).count() as u64
}

/// Maior quantidade primeiro; empate em ordem alfabética.
fn ordenar_contagens(mapa: HashMap<String, u64>) -> Vec<ContagemPorNome> {
    let mut contagens: Vec<ContagemPorNome> = mapa
        .into_iter()
        .map(|(nome, quantidade)| ContagemPorNome { nome, quantidade })
        .collect();
    contagens.sort_by(|a, b| b.quantidade.cmp(&a.quantidade).then_with(|| a.nome.cmp(&b.nome)));
    contagens
}

pub fn vendas_por_vendedor(vendas: &[VendaDetalhada]) -> Vec<ContagemPorNome> {
    let mut mapa: HashMap<String, u64> = HashMap::new();
    for venda in vendas_validas(vendas) {
        let nome = venda
            .vendedor_nome
            .clone()
            .unwrap_or_else(|| VENDEDOR_NAO_INFORMADO.to_string());
        *mapa.entry(nome).or_insert(0) += 1;
    }
    ordenar_contagens(mapa)
}

/// Cada sabor da venda conta uma vez: uma pizza meio a meio soma nos dois.
pub fn vendas_por_sabor(vendas: &[VendaDetalhada]) -> Vec<ContagemPorNome> {
    let mut mapa: HashMap<String, u64> = HashMap::new();
    for venda in vendas_validas(vendas) {
        for nome in [&venda.sabor1_nome, &venda.sabor2_nome].into_iter().flatten() {
            *mapa.entry(nome.clone()).or_insert(0) += 1;
        }
    }
    ordenar_contagens(mapa)
}

fn valor_total(preco: &BigDecimal, quantidade: u64) -> BigDecimal {
    (preco * &BigDecimal::from(quantidade)).round(2).with_scale(2)
}

pub fn resumo_dashboard(vendas: &[VendaDetalhada], preco: &BigDecimal) -> ResumoDashboard {
    let validas = vendas_validas(vendas).count() as u64;

    ResumoDashboard {
        receita_esperada: valor_total(preco, validas),
        cartoes_vendidos: vendas.len() as u64,
        pizzas_entregues: contar_status(vendas, StatusVenda::Entregue),
        vendas_pendentes: contar_status(vendas, StatusVenda::Pendente),
        vendas_canceladas: contar_status(vendas, StatusVenda::Cancelado),
        vendas_por_vendedor: vendas_por_vendedor(vendas),
        vendas_por_sabor: vendas_por_sabor(vendas),
    }
}

pub fn relatorio_por_vendedor(vendas: &[VendaDetalhada], preco: &BigDecimal) -> Vec<RelatorioVendedor> {
    vendas_por_vendedor(vendas)
        .into_iter()
        .map(|c| RelatorioVendedor {
            valor_total: valor_total(preco, c.quantidade),
            vendedor: c.nome,
            cartoes_vendidos: c.quantidade,
        })
        .collect()
}

/// Vendas válidas por data de retirada, em ordem cronológica.
pub fn relatorio_por_data_retirada(vendas: &[VendaDetalhada]) -> Vec<RelatorioDataRetirada> {
    let mut por_data = BTreeMap::new();
    for venda in vendas_validas(vendas) {
        let linha = por_data
            .entry(venda.data_retirada)
            .or_insert_with(|| RelatorioDataRetirada {
                data_retirada: venda.data_retirada,
                total: 0,
                pendentes: 0,
                entregues: 0,
            });
        linha.total += 1;
        match venda.status {
            StatusVenda::Pendente => linha.pendentes += 1,
            StatusVenda::Entregue => linha.entregues += 1,
            StatusVenda::Cancelado => {}
        }
    }
    por_data.into_values().collect()
}

/// Arquivos CSV oferecidos para download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exportacao {
    /// Todas as vendas válidas.
    Vendas,
    /// Só as vendas entregues.
    Entregas,
}

impl Exportacao {
    pub fn nome_arquivo(&self) -> &'static str {
        match self {
            Exportacao::Vendas => "vendas_gerais.csv",
            Exportacao::Entregas => "entregas.csv",
        }
    }

    pub fn inclui(&self, venda: &VendaDetalhada) -> bool {
        match self {
            Exportacao::Vendas => venda.status.e_valida(),
            Exportacao::Entregas => venda.status == StatusVenda::Entregue,
        }
    }

    pub fn gerar(&self, vendas: &[VendaDetalhada]) -> String {
        gerar_csv(vendas.iter().filter(|v| self.inclui(v)))
    }
}

fn campo_texto(valor: &str) -> String {
    format!("\"{}\"", valor.replace('"', "\"\""))
}

/// Monta o CSV: uma linha de cabeçalho e uma por venda, separadas por `\n`.
/// Campos de texto vão entre aspas; ID, data e status não.
pub fn gerar_csv<'a>(vendas: impl IntoIterator<Item = &'a VendaDetalhada>) -> String {
    let mut linhas = vec![CABECALHO_CSV.join(",")];
    for venda in vendas {
        let campos = [
            venda.id.to_string(),
            campo_texto(&venda.nome_cliente),
            campo_texto(&venda.telefone_cliente),
            campo_texto(venda.vendedor_nome.as_deref().unwrap_or("")),
            venda.data_retirada.format("%Y-%m-%d").to_string(),
            campo_texto(venda.sabor1_nome.as_deref().unwrap_or("")),
            campo_texto(venda.sabor2_nome.as_deref().unwrap_or("")),
            venda.status.to_string(),
        ];
        linhas.push(campos.join(","));
    }
    linhas.join("\n")
}
