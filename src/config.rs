// src/config.rs

use std::collections::HashMap;

use thiserror::Error;

/// Erros ao montar a configuração a partir do ambiente.
#[derive(Debug, Error, PartialEq)]
pub enum ErroConfiguracao {
    #[error("variável de ambiente obrigatória ausente: {0}")]
    Ausente(&'static str),

    #[error("valor inválido para {chave}: '{valor}'")]
    Invalida { chave: &'static str, valor: String },
}

/// Configuração do servidor, lida de variáveis de ambiente (e de um `.env`,
/// se existir).
#[derive(Debug, Clone)]
pub struct Configuracao {
    pub database_url: String,
    pub host: String,
    pub porta: u16,
    pub max_conexoes: u32,
    pub executar_migracoes: bool,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
}

impl Configuracao {
    /// Carrega o `.env` (quando presente) e lê as variáveis do processo.
    pub fn do_ambiente() -> Result<Self, ErroConfiguracao> {
        // dotenvy não sobrescreve variáveis já definidas no processo
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::de_variaveis(&vars)
    }

    /// Monta a configuração a partir de um mapa de variáveis.
    pub fn de_variaveis(vars: &HashMap<String, String>) -> Result<Self, ErroConfiguracao> {
        let obrigatoria = |chave: &'static str| -> Result<String, ErroConfiguracao> {
            vars.get(chave)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ErroConfiguracao::Ausente(chave))
        };
        let opcional = |chave: &'static str| -> Option<String> {
            vars.get(chave)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let porta = match opcional("PORTA") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|_| ErroConfiguracao::Invalida { chave: "PORTA", valor: v })?,
            None => 8080,
        };

        let max_conexoes = match opcional("MAX_CONEXOES") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ErroConfiguracao::Invalida { chave: "MAX_CONEXOES", valor: v }),
            },
            None => 5,
        };

        let executar_migracoes = match opcional("EXECUTAR_MIGRACOES") {
            Some(v) => parse_bool(&v).ok_or(ErroConfiguracao::Invalida {
                chave: "EXECUTAR_MIGRACOES",
                valor: v,
            })?,
            None => true,
        };

        Ok(Configuracao {
            database_url: obrigatoria("DATABASE_URL")?,
            host: opcional("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            porta,
            max_conexoes,
            executar_migracoes,
            jwt_secret: obrigatoria("JWT_SECRET")?,
            jwt_audience: opcional("JWT_AUDIENCE"),
        })
    }

    pub fn endereco(&self) -> (String, u16) {
        (self.host.clone(), self.porta)
    }
}

fn parse_bool(valor: &str) -> Option<bool> {
    match valor.to_ascii_lowercase().as_str() {
        "1" | "true" | "sim" | "yes" => Some(true),
        "0" | "false" | "nao" | "não" | "no" => Some(false),
        _ => None,
    }
}
