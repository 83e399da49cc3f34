// src/shared/mod.rs

// Envelope padrão das respostas da API
pub mod shared_structs;
// Erros da API e sua conversão em respostas HTTP
pub mod api_error;
