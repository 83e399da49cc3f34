// src/sabores/sabores_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::query_as;
use tracing::info;

use super::sabores_structs::{NovoSabor, Sabor};
use crate::autenticacao::auth_middleware::AuthenticatedUser;
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota para listar os sabores, em ordem alfabética.
#[get("/sabores")]
pub async fn buscar_sabores(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let sabores = query_as::<_, Sabor>("SELECT id, name FROM flavors ORDER BY name")
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Sabores listados com sucesso!",
        sabores,
    )))
}

/// Rota para buscar um sabor por ID.
#[get("/sabores/{id}")]
pub async fn buscar_sabor_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let sabor = query_as::<_, Sabor>("SELECT id, name FROM flavors WHERE id = $1")
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado(format!("Sabor com ID {} não encontrado.", id)))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Sabor com ID {} encontrado.", id),
        sabor,
    )))
}

/// Rota para cadastrar um novo sabor.
#[post("/sabores")]
pub async fn cadastrar_sabor(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovoSabor>,
) -> Result<HttpResponse, ApiError> {
    let nome = item.nome_validado()?;

    let sabor = query_as::<_, Sabor>("INSERT INTO flavors (name) VALUES ($1) RETURNING id, name")
        .bind(&nome)
        .fetch_one(&data.db_pool)
        .await
        .map_err(|e| ApiError::de_escrita(e, "Erro ao cadastrar sabor"))?;

    info!(id = sabor.id, nome = %sabor.nome, usuario = usuario.identificacao(), "Sabor cadastrado");
    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Sabor cadastrado com sucesso! ID: {}", sabor.id),
        sabor,
    )))
}

/// Rota para renomear um sabor existente.
#[put("/sabores/{id}")]
pub async fn atualizar_sabor(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovoSabor>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let nome = item.nome_validado()?;

    let result = sqlx::query("UPDATE flavors SET name = $1 WHERE id = $2")
        .bind(&nome)
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| ApiError::de_escrita(e, "Erro ao atualizar sabor"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Sabor com ID {} não encontrado para atualização.",
            id
        )));
    }

    info!(id, nome = %nome, usuario = usuario.identificacao(), "Sabor atualizado");
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem(format!(
        "Sabor com ID {} atualizado com sucesso.",
        id
    ))))
}

/// Rota para deletar um sabor. Sabores usados em vendas não podem ser removidos.
#[delete("/sabores/{id}")]
pub async fn deletar_sabor(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM flavors WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| ApiError::de_exclusao(e, "Erro ao deletar sabor"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Sabor com ID {} não encontrado para exclusão.",
            id
        )));
    }

    info!(id, usuario = usuario.identificacao(), "Sabor deletado");
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem(format!(
        "Sabor com ID {} deletado com sucesso.",
        id
    ))))
}
