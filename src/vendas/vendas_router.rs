// src/vendas/vendas_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use sqlx::{query_as, PgPool, Row};
use tracing::info;

use super::vendas_structs::{
    AtualizacaoStatus, FiltroVendas, NovaVenda, VendaDetalhada, SELECT_VENDAS,
};
use crate::autenticacao::auth_middleware::AuthenticatedUser;
use crate::configuracoes::configuracoes_router::carregar_configuracoes;
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Busca uma venda com os nomes de vendedor e sabores resolvidos.
pub async fn buscar_venda_detalhada(pool: &PgPool, id: i32) -> Result<VendaDetalhada, ApiError> {
    query_as::<_, VendaDetalhada>(&format!("{} WHERE s.id = $1", SELECT_VENDAS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado(format!("Venda com ID {} não encontrada.", id)))
}

/// Rota para listar as vendas, das mais recentes para as mais antigas.
///
/// Aceita os filtros opcionais `status`, `vendedor_id`, `data_retirada`
/// e `busca` (trecho do nome ou telefone do cliente).
#[get("/vendas")]
pub async fn buscar_vendas(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    filtro: web::Query<FiltroVendas>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "{} WHERE ($1::text IS NULL OR s.status = $1) \
         AND ($2::int IS NULL OR s.seller_id = $2) \
         AND ($3::date IS NULL OR s.pickup_date = $3) \
         AND ($4::text IS NULL OR s.customer_name ILIKE $4 OR s.customer_phone ILIKE $4) \
         ORDER BY s.created_at DESC, s.id DESC",
        SELECT_VENDAS
    );

    let vendas = query_as::<_, VendaDetalhada>(&sql)
        .bind(filtro.status.map(|s| s.as_str()))
        .bind(filtro.vendedor_id)
        .bind(filtro.data_retirada)
        .bind(filtro.padrao_busca())
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("{} venda(s) encontrada(s).", vendas.len()),
        vendas,
    )))
}

/// Rota para buscar uma venda por ID.
#[get("/vendas/{id}")]
pub async fn buscar_venda_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let venda = buscar_venda_detalhada(&data.db_pool, id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Venda com ID {} encontrada.", id),
        venda,
    )))
}

/// Rota para registrar uma nova venda.
///
/// A data de retirada precisa estar entre as datas configuradas (quando há
/// alguma configurada). Toda venda começa como `Pendente`. Vendedor ou sabor
/// inexistente vira 400 pela chave estrangeira do banco.
#[post("/vendas")]
pub async fn registrar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovaVenda>,
) -> Result<HttpResponse, ApiError> {
    let configuracoes = carregar_configuracoes(&data.db_pool).await?;
    let venda = item.into_inner().validada(&configuracoes)?;

    let row = sqlx::query(
        "INSERT INTO sales (customer_name, customer_phone, seller_id, pickup_date, \
         flavor1_id, flavor2_id, card_number, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, 'Pendente') RETURNING id",
    )
    .bind(&venda.nome_cliente)
    .bind(&venda.telefone_cliente)
    .bind(venda.vendedor_id)
    .bind(venda.data_retirada)
    .bind(venda.sabor1_id)
    .bind(venda.sabor2_id)
    .bind(&venda.numero_cartao)
    .fetch_one(&data.db_pool)
    .await
    .map_err(|e| ApiError::de_escrita(e, "Erro ao registrar venda"))?;

    let id: i32 = row.try_get("id")?;
    info!(id, cliente = %venda.nome_cliente, usuario = usuario.identificacao(), "Venda registrada");

    let registrada = buscar_venda_detalhada(&data.db_pool, id).await?;
    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Venda registrada com sucesso! ID: {}", id),
        registrada,
    )))
}

/// Rota para editar os dados de uma venda. O status não muda por aqui.
#[put("/vendas/{id}")]
pub async fn atualizar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovaVenda>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let configuracoes = carregar_configuracoes(&data.db_pool).await?;
    let venda = item.into_inner().validada(&configuracoes)?;

    let result = sqlx::query(
        "UPDATE sales SET customer_name = $1, customer_phone = $2, seller_id = $3, \
         pickup_date = $4, flavor1_id = $5, flavor2_id = $6, card_number = $7 \
         WHERE id = $8",
    )
    .bind(&venda.nome_cliente)
    .bind(&venda.telefone_cliente)
    .bind(venda.vendedor_id)
    .bind(venda.data_retirada)
    .bind(venda.sabor1_id)
    .bind(venda.sabor2_id)
    .bind(&venda.numero_cartao)
    .bind(id)
    .execute(&data.db_pool)
    .await
    .map_err(|e| ApiError::de_escrita(e, "Erro ao atualizar venda"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Venda com ID {} não encontrada para atualização.",
            id
        )));
    }

    info!(id, usuario = usuario.identificacao(), "Venda atualizada");
    let atualizada = buscar_venda_detalhada(&data.db_pool, id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Venda com ID {} atualizada com sucesso.", id),
        atualizada,
    )))
}

/// Rota para alterar o status de uma venda (ex.: cancelar um pedido).
#[patch("/vendas/{id}/status")]
pub async fn atualizar_status_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<AtualizacaoStatus>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("UPDATE sales SET status = $1 WHERE id = $2")
        .bind(item.status.as_str())
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Venda com ID {} não encontrada para atualização.",
            id
        )));
    }

    info!(id, status = %item.status, usuario = usuario.identificacao(), "Status da venda alterado");
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem(format!(
        "Status da venda {} alterado para {}.",
        id, item.status
    ))))
}

/// Rota para deletar uma venda.
#[delete("/vendas/{id}")]
pub async fn deletar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM sales WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Venda com ID {} não encontrada para exclusão.",
            id
        )));
    }

    info!(id, usuario = usuario.identificacao(), "Venda deletada");
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem(format!(
        "Venda com ID {} deletada com sucesso.",
        id
    ))))
}
