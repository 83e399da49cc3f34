// src/vendedores/vendedores_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::query_as;
use tracing::info;

use super::vendedores_structs::{NovoVendedor, Vendedor};
use crate::autenticacao::auth_middleware::AuthenticatedUser;
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota para listar os vendedores, em ordem alfabética.
#[get("/vendedores")]
pub async fn buscar_vendedores(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let vendedores = query_as::<_, Vendedor>("SELECT id, name FROM sellers ORDER BY name")
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Vendedores listados com sucesso!",
        vendedores,
    )))
}

/// Rota para buscar um vendedor por ID.
#[get("/vendedores/{id}")]
pub async fn buscar_vendedor_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let vendedor = query_as::<_, Vendedor>("SELECT id, name FROM sellers WHERE id = $1")
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| {
            ApiError::NaoEncontrado(format!("Vendedor com ID {} não encontrado.", id))
        })?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Vendedor com ID {} encontrado.", id),
        vendedor,
    )))
}

/// Rota para cadastrar um novo vendedor. Nomes repetidos retornam 409.
#[post("/vendedores")]
pub async fn cadastrar_vendedor(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovoVendedor>,
) -> Result<HttpResponse, ApiError> {
    let nome = item.nome_validado()?;

    let vendedor =
        query_as::<_, Vendedor>("INSERT INTO sellers (name) VALUES ($1) RETURNING id, name")
            .bind(&nome)
            .fetch_one(&data.db_pool)
            .await
            .map_err(|e| ApiError::de_escrita(e, "Erro ao cadastrar vendedor"))?;

    info!(id = vendedor.id, nome = %vendedor.nome, usuario = usuario.identificacao(), "Vendedor cadastrado");
    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Vendedor cadastrado com sucesso! ID: {}", vendedor.id),
        vendedor,
    )))
}

#[put("/vendedores/{id}")]
pub async fn atualizar_vendedor(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovoVendedor>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let nome = item.nome_validado()?;

    let result = sqlx::query("UPDATE sellers SET name = $1 WHERE id = $2")
        .bind(&nome)
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| ApiError::de_escrita(e, "Erro ao atualizar vendedor"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Vendedor com ID {} não encontrado para atualização.",
            id
        )));
    }

    info!(id, nome = %nome, usuario = usuario.identificacao(), "Vendedor atualizado");
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem(format!(
        "Vendedor com ID {} atualizado com sucesso.",
        id
    ))))
}

/// Rota para deletar um vendedor. Vendedores com vendas registradas não podem ser removidos.
#[delete("/vendedores/{id}")]
pub async fn deletar_vendedor(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM sellers WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| ApiError::de_exclusao(e, "Erro ao deletar vendedor"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Vendedor com ID {} não encontrado para exclusão.",
            id
        )));
    }

    info!(id, usuario = usuario.identificacao(), "Vendedor deletado");
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem(format!(
        "Vendedor com ID {} deletado com sucesso.",
        id
    ))))
}
