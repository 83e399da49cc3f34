// src/saude.rs

use actix_web::{get, web, HttpResponse};
use tracing::warn;

use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Verificação de saúde para o balanceador/orquestrador. Não exige token.
#[get("/saude")]
pub async fn verificar_saude(data: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(&data.db_pool).await {
        Ok(_) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "API no ar.",
            serde_json::json!({ "banco": "ok" }),
        )),
        Err(e) => {
            warn!(error = ?e, "Banco de dados indisponível na verificação de saúde");
            HttpResponse::ServiceUnavailable()
                .json(GenericResponse::erro("Banco de dados indisponível."))
        }
    }
}
