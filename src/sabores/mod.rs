// src/sabores/mod.rs

pub mod sabores_structs;
pub mod sabores_router;
