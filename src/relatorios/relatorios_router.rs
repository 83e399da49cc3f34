// src/relatorios/relatorios_router.rs

use actix_web::{
    get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use sqlx::{query_as, PgPool};
use tracing::info;

use super::relatorios_calculo::{
    relatorio_por_data_retirada, relatorio_por_vendedor, resumo_dashboard, vendas_por_sabor,
    Exportacao,
};
use crate::autenticacao::auth_middleware::AuthenticatedUser;
use crate::configuracoes::configuracoes_router::carregar_configuracoes;
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::vendas::vendas_structs::{VendaDetalhada, SELECT_VENDAS};
use crate::AppState;

async fn carregar_vendas(pool: &PgPool) -> Result<Vec<VendaDetalhada>, ApiError> {
    let vendas = query_as::<_, VendaDetalhada>(&format!("{} ORDER BY s.id", SELECT_VENDAS))
        .fetch_all(pool)
        .await?;
    Ok(vendas)
}

/// Rota do painel: receita esperada, cartões vendidos, entregas e os
/// agrupamentos por vendedor e por sabor.
#[get("/dashboard")]
pub async fn buscar_dashboard(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let (vendas, configuracoes) = futures::try_join!(
        carregar_vendas(&data.db_pool),
        carregar_configuracoes(&data.db_pool)
    )?;

    let resumo = resumo_dashboard(&vendas, &configuracoes.preco);
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Resumo das vendas.", resumo)))
}

#[get("/relatorios/vendedores")]
pub async fn relatorio_vendedores(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let (vendas, configuracoes) = futures::try_join!(
        carregar_vendas(&data.db_pool),
        carregar_configuracoes(&data.db_pool)
    )?;

    let linhas = relatorio_por_vendedor(&vendas, &configuracoes.preco);
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Vendas por vendedor.", linhas)))
}

#[get("/relatorios/sabores")]
pub async fn relatorio_sabores(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let vendas = carregar_vendas(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Vendas por sabor.",
        vendas_por_sabor(&vendas),
    )))
}

#[get("/relatorios/datas-retirada")]
pub async fn relatorio_datas_retirada(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let vendas = carregar_vendas(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Vendas por data de retirada.",
        relatorio_por_data_retirada(&vendas),
    )))
}

/// Exporta as vendas válidas em CSV (`vendas_gerais.csv`).
#[get("/relatorios/exportar/vendas")]
pub async fn exportar_vendas(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    exportar(&data.db_pool, &usuario, Exportacao::Vendas).await
}

/// Exporta as vendas entregues em CSV (`entregas.csv`).
#[get("/relatorios/exportar/entregas")]
pub async fn exportar_entregas(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    exportar(&data.db_pool, &usuario, Exportacao::Entregas).await
}

async fn exportar(
    pool: &PgPool,
    usuario: &AuthenticatedUser,
    exportacao: Exportacao,
) -> Result<HttpResponse, ApiError> {
    let vendas = carregar_vendas(pool).await?;
    let csv = exportacao.gerar(&vendas);

    info!(
        arquivo = exportacao.nome_arquivo(),
        usuario = usuario.identificacao(),
        "Exportação CSV gerada"
    );
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                exportacao.nome_arquivo().to_string(),
            )],
        })
        .body(csv))
}
