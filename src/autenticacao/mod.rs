// src/autenticacao/mod.rs

// Claims do token e configuração de validação
pub mod auth_structs;
// Extrator que valida o token Bearer das requisições
pub mod auth_middleware;
