// src/relatorios/mod.rs

// Tipos devolvidos pelas rotas de relatório
pub mod relatorios_structs;
// Agregações e exportação CSV, sem acesso ao banco
pub mod relatorios_calculo;
pub mod relatorios_router;
