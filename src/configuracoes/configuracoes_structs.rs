// src/configuracoes/configuracoes_structs.rs

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::api_error::ApiError;

/// Chave do preço de um cartão na tabela `settings`.
pub const CHAVE_PRECO: &str = "price";
/// Chave das datas de retirada (array JSON de datas `YYYY-MM-DD`).
pub const CHAVE_DATAS_RETIRADA: &str = "pickup_dates";

/// Par chave/valor exatamente como está no banco.
#[derive(Debug, Serialize, FromRow)]
pub struct ConfiguracaoBruta {
    #[sqlx(rename = "key")]
    pub chave: String,
    #[sqlx(rename = "value")]
    pub valor: String,
}

/// Preço com duas casas, arredondado. Negativo não é preço válido.
pub fn normalizar_preco(preco: BigDecimal) -> Option<BigDecimal> {
    if preco < BigDecimal::from(0) {
        return None;
    }
    Some(preco.round(2).with_scale(2))
}

/// Configurações do evento já interpretadas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfiguracoesEvento {
    pub preco: BigDecimal,
    pub datas_retirada: Vec<NaiveDate>,
}

impl ConfiguracoesEvento {
    /// Interpreta os pares do banco. Chave ausente usa o padrão (preço 0,
    /// nenhuma data); valor presente que não pode ser lido é erro.
    pub fn de_pares(pares: &[ConfiguracaoBruta]) -> Result<Self, ApiError> {
        let valor = |chave: &str| {
            pares
                .iter()
                .find(|p| p.chave == chave)
                .map(|p| p.valor.trim())
        };

        let preco = match valor(CHAVE_PRECO) {
            Some(v) if !v.is_empty() => BigDecimal::from_str(v)
                .ok()
                .and_then(normalizar_preco)
                .ok_or_else(|| {
                    ApiError::Interno(format!("Configuração '{}' inválida: '{}'", CHAVE_PRECO, v))
                })?,
            _ => BigDecimal::from(0).with_scale(2),
        };

        let datas_retirada = match valor(CHAVE_DATAS_RETIRADA) {
            Some(v) if !v.is_empty() => serde_json::from_str::<Vec<NaiveDate>>(v).map_err(|_| {
                ApiError::Interno(format!(
                    "Configuração '{}' inválida: '{}'",
                    CHAVE_DATAS_RETIRADA, v
                ))
            })?,
            _ => Vec::new(),
        };

        Ok(ConfiguracoesEvento { preco, datas_retirada })
    }

    /// Sem datas configuradas, qualquer data é aceita.
    pub fn aceita_data_retirada(&self, data: NaiveDate) -> bool {
        self.datas_retirada.is_empty() || self.datas_retirada.contains(&data)
    }
}

/// Corpo do PUT /configuracoes.
#[derive(Debug, Deserialize)]
pub struct AtualizacaoConfiguracoes {
    pub preco: BigDecimal,
    pub datas_retirada: Vec<NaiveDate>,
}

impl AtualizacaoConfiguracoes {
    /// Valida o preço e devolve as configurações normalizadas
    /// (preço com duas casas, datas ordenadas e sem repetição).
    pub fn normalizada(self) -> Result<ConfiguracoesEvento, ApiError> {
        let preco = normalizar_preco(self.preco).ok_or_else(|| {
            ApiError::RequisicaoInvalida("O preço não pode ser negativo.".to_string())
        })?;

        let mut datas_retirada = self.datas_retirada;
        datas_retirada.sort();
        datas_retirada.dedup();

        Ok(ConfiguracoesEvento {
            preco,
            datas_retirada,
        })
    }
}

/// Valores em texto prontos para gravar em `settings`.
pub fn valores_para_gravar(cfg: &ConfiguracoesEvento) -> Result<[(&'static str, String); 2], ApiError> {
    let datas = serde_json::to_string(&cfg.datas_retirada)
        .map_err(|e| ApiError::Interno(format!("Falha ao serializar datas de retirada: {}", e)))?;
    Ok([
        (CHAVE_PRECO, cfg.preco.with_scale(2).to_string()),
        (CHAVE_DATAS_RETIRADA, datas),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn par(chave: &str, valor: &str) -> ConfiguracaoBruta {
        ConfiguracaoBruta { chave: chave.into(), valor: valor.into() }
    }

    fn data(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn le_preco_e_datas() {
        let cfg = ConfiguracoesEvento::de_pares(&[
            par("price", "35.00"),
            par("pickup_dates", r#"["2024-10-26","2024-11-02"]"#),
        ])
        .unwrap();

        assert_eq!(cfg.preco, BigDecimal::from(35));
        assert_eq!(cfg.datas_retirada, vec![data("2024-10-26"), data("2024-11-02")]);
    }

    #[test]
    fn chaves_ausentes_usam_padrao() {
        let cfg = ConfiguracoesEvento::de_pares(&[]).unwrap();
        assert_eq!(cfg.preco, BigDecimal::from(0));
        assert!(cfg.datas_retirada.is_empty());
        assert!(cfg.aceita_data_retirada(data("2030-01-01")));
    }

    #[test]
    fn valor_corrompido_e_erro_interno() {
        let err = ConfiguracoesEvento::de_pares(&[par("price", "trinta")]).unwrap_err();
        assert!(matches!(err, ApiError::Interno(msg) if msg.contains("price")));

        let err = ConfiguracoesEvento::de_pares(&[par("pickup_dates", "26/10")]).unwrap_err();
        assert!(matches!(err, ApiError::Interno(msg) if msg.contains("pickup_dates")));
    }

    #[test]
    fn preco_lido_do_banco_e_normalizado() {
        let cfg = ConfiguracoesEvento::de_pares(&[par("price", "35.5")]).unwrap();
        assert_eq!(cfg.preco.to_string(), "35.50");

        let cfg = ConfiguracoesEvento::de_pares(&[par("price", "35.555")]).unwrap();
        assert_eq!(cfg.preco.to_string(), "35.56");

        let cfg = ConfiguracoesEvento::de_pares(&[]).unwrap();
        assert_eq!(cfg.preco.to_string(), "0.00");
    }

    #[test]
    fn preco_negativo_no_banco_e_erro_interno() {
        let err = ConfiguracoesEvento::de_pares(&[par("price", "-1")]).unwrap_err();
        assert!(matches!(err, ApiError::Interno(msg) if msg.contains("'-1'")));
    }

    #[test]
    fn so_aceita_datas_configuradas() {
        let cfg = ConfiguracoesEvento {
            preco: BigDecimal::from(35),
            datas_retirada: vec![data("2024-10-26")],
        };
        assert!(cfg.aceita_data_retirada(data("2024-10-26")));
        assert!(!cfg.aceita_data_retirada(data("2024-10-27")));
    }

    #[test]
    fn normaliza_atualizacao() {
        let cfg = AtualizacaoConfiguracoes {
            preco: BigDecimal::from_str("40").unwrap(),
            datas_retirada: vec![data("2024-11-02"), data("2024-10-26"), data("2024-11-02")],
        }
        .normalizada()
        .unwrap();

        assert_eq!(cfg.datas_retirada, vec![data("2024-10-26"), data("2024-11-02")]);

        let [(chave_preco, preco), (chave_datas, datas)] = valores_para_gravar(&cfg).unwrap();
        assert_eq!((chave_preco, preco.as_str()), ("price", "40.00"));
        assert_eq!(chave_datas, "pickup_dates");
        assert_eq!(datas, r#"["2024-10-26","2024-11-02"]"#);
    }

    #[test]
    fn rejeita_preco_negativo() {
        let err = AtualizacaoConfiguracoes {
            preco: BigDecimal::from(-1),
            datas_retirada: vec![],
        }
        .normalizada()
        .unwrap_err();
        assert!(matches!(err, ApiError::RequisicaoInvalida(_)));
    }
}
