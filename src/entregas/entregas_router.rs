// src/entregas/entregas_router.rs

use actix_web::{get, post, web, HttpResponse};
use sqlx::{query_as, query_scalar};
use tracing::{info, warn};

use super::entregas_structs::{AcaoEntrega, ItemEntrega};
use crate::autenticacao::auth_middleware::AuthenticatedUser;
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::vendas::vendas_structs::{StatusVenda, VendaDetalhada, SELECT_VENDAS};
use crate::AppState;

/// Rota para listar as entregas, pela data de retirada.
#[get("/entregas")]
pub async fn buscar_entregas(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let vendas = query_as::<_, VendaDetalhada>(&format!(
        "{} ORDER BY s.pickup_date, s.customer_name, s.id",
        SELECT_VENDAS
    ))
    .fetch_all(&data.db_pool)
    .await?;

    let entregas: Vec<ItemEntrega> = vendas.into_iter().map(ItemEntrega::from).collect();
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Registro de entregas.", entregas)))
}

#[post("/entregas/{id}/registrar")]
pub async fn registrar_entrega(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    aplicar_acao(&data, &usuario, path.into_inner(), AcaoEntrega::Registrar).await
}

#[post("/entregas/{id}/desfazer")]
pub async fn desfazer_entrega(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    aplicar_acao(&data, &usuario, path.into_inner(), AcaoEntrega::Desfazer).await
}

/// Troca o status com um UPDATE condicionado ao status de origem. Se nenhuma
/// linha mudar, relê o status atual para devolver 404 ou 409.
async fn aplicar_acao(
    data: &AppState,
    usuario: &AuthenticatedUser,
    id: i32,
    acao: AcaoEntrega,
) -> Result<HttpResponse, ApiError> {
    let result = sqlx::query("UPDATE sales SET status = $1 WHERE id = $2 AND status = $3")
        .bind(acao.status_destino().as_str())
        .bind(id)
        .bind(acao.status_origem().as_str())
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        let atual = query_scalar::<_, String>("SELECT status FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&data.db_pool)
            .await?
            .ok_or_else(|| ApiError::NaoEncontrado(format!("Venda com ID {} não encontrada.", id)))?;

        let atual = atual
            .parse::<StatusVenda>()
            .map_err(|e| ApiError::Interno(e.to_string()))?;

        // Status mudou entre o UPDATE e a releitura.
        acao.aplicar(atual)?;
        warn!(id, ?acao, "Status da venda alterado concorrentemente");
        return Err(ApiError::Conflito(
            "A venda foi alterada por outra operação. Tente novamente.".to_string(),
        ));
    }

    info!(
        id,
        status = %acao.status_destino(),
        usuario = usuario.identificacao(),
        "Status da entrega atualizado"
    );
    Ok(HttpResponse::Ok().json(GenericResponse::mensagem("Status da entrega atualizado!")))
}
