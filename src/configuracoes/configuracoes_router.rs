// src/configuracoes/configuracoes_router.rs

use actix_web::{get, put, web, HttpResponse};
use sqlx::{query_as, PgPool};
use tracing::info;

use super::configuracoes_structs::{
    valores_para_gravar, AtualizacaoConfiguracoes, ConfiguracaoBruta, ConfiguracoesEvento,
};
use crate::autenticacao::auth_middleware::AuthenticatedUser;
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Lê e interpreta as configurações do evento (preço e datas de retirada).
/// Usada também pelas rotas de vendas e relatórios.
pub async fn carregar_configuracoes(pool: &PgPool) -> Result<ConfiguracoesEvento, ApiError> {
    let pares = query_as::<_, ConfiguracaoBruta>("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await?;
    ConfiguracoesEvento::de_pares(&pares)
}

/// Rota para consultar preço e datas de retirada.
#[get("/configuracoes")]
pub async fn buscar_configuracoes(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let configuracoes = carregar_configuracoes(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Configurações do evento.",
        configuracoes,
    )))
}

/// Rota para listar os pares chave/valor sem interpretação.
#[get("/configuracoes/chaves")]
pub async fn buscar_configuracoes_brutas(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let pares = query_as::<_, ConfiguracaoBruta>("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(&data.db_pool)
        .await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Configurações armazenadas.", pares)))
}

/// Rota para atualizar preço e datas de retirada.
///
/// As duas chaves são gravadas na mesma transação: ou ambas mudam, ou nenhuma.
#[put("/configuracoes")]
pub async fn atualizar_configuracoes(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<AtualizacaoConfiguracoes>,
) -> Result<HttpResponse, ApiError> {
    let configuracoes = item.into_inner().normalizada()?;
    let valores = valores_para_gravar(&configuracoes)?;

    let mut transaction = data.db_pool.begin().await?;
    for (chave, valor) in valores {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(chave)
        .bind(valor)
        .execute(&mut *transaction)
        .await?;
    }
    transaction.commit().await?;

    info!(
        preco = %configuracoes.preco,
        datas = configuracoes.datas_retirada.len(),
        usuario = usuario.identificacao(),
        "Configurações atualizadas"
    );
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Configurações atualizadas com sucesso.",
        configuracoes,
    )))
}
