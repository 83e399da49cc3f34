// src/entregas/mod.rs

pub mod entregas_structs;
pub mod entregas_router;
