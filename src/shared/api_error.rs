// src/shared/api_error.rs

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use thiserror::Error;
use tracing::error;

use super::shared_structs::GenericResponse;

/// SQLSTATE de violação de chave estrangeira.
const FK_VIOLATION: &str = "23503";
/// SQLSTATE de violação de unicidade.
const UNIQUE_VIOLATION: &str = "23505";

/// Erros que uma rota pode devolver ao cliente.
///
/// Todos são renderizados no mesmo envelope `GenericResponse` com
/// `status: "error"`. Erros de banco não expõem detalhes ao cliente; o
/// detalhe vai para o log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    RequisicaoInvalida(String),

    #[error("{0}")]
    NaoEncontrado(String),

    #[error("{0}")]
    Conflito(String),

    #[error("{0}")]
    NaoAutorizado(String),

    #[error("{0}")]
    Interno(String),

    #[error("erro de banco de dados: {0}")]
    Banco(#[from] sqlx::Error),
}

impl ApiError {
    /// Converte um erro de INSERT/UPDATE em uma resposta adequada.
    /// Referência inexistente vira 400, duplicidade vira 409.
    pub fn de_escrita(e: sqlx::Error, contexto: &str) -> Self {
        match codigo_sql(&e).as_deref() {
            Some(FK_VIOLATION) => ApiError::RequisicaoInvalida(format!(
                "{}: referência inexistente (vendedor ou sabor).",
                contexto
            )),
            Some(UNIQUE_VIOLATION) => {
                ApiError::Conflito(format!("{}: registro duplicado.", contexto))
            }
            _ => ApiError::Banco(e),
        }
    }

    /// Converte um erro de DELETE. Registro ainda referenciado vira 409.
    pub fn de_exclusao(e: sqlx::Error, contexto: &str) -> Self {
        match codigo_sql(&e).as_deref() {
            Some(FK_VIOLATION) => ApiError::Conflito(format!(
                "{}: registro em uso por vendas existentes.",
                contexto
            )),
            _ => ApiError::Banco(e),
        }
    }
}

fn codigo_sql(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RequisicaoInvalida(_) => StatusCode::BAD_REQUEST,
            ApiError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::Conflito(_) => StatusCode::CONFLICT,
            ApiError::NaoAutorizado(_) => StatusCode::UNAUTHORIZED,
            ApiError::Interno(_) | ApiError::Banco(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Banco(e) => {
                error!(error = ?e, "Erro ao acessar o banco de dados");
                "Erro interno ao acessar o banco de dados.".to_string()
            }
            ApiError::Interno(msg) => {
                error!(%msg, "Erro interno");
                msg.clone()
            }
            outro => outro.to_string(),
        };
        HttpResponse::build(self.status_code()).json(GenericResponse::erro(message))
    }
}

// Handlers usados em JsonConfig/QueryConfig/PathConfig para que falhas de
// desserialização usem o mesmo envelope das demais respostas.

pub fn erro_json(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::RequisicaoInvalida(format!("Corpo JSON inválido: {}", err)).into()
}

pub fn erro_query(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::RequisicaoInvalida(format!("Parâmetros de consulta inválidos: {}", err)).into()
}

pub fn erro_path(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::RequisicaoInvalida(format!("Parâmetro de rota inválido: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use actix_web::{body::to_bytes, test, web, App};

    use crate::vendas::vendas_structs::{FiltroVendas, NovaVenda};

    /// Erro de banco com SQLSTATE fixo, como o Postgres devolveria.
    #[derive(Debug, Error)]
    #[error("violação de restrição ({codigo})")]
    struct ErroPostgres {
        codigo: &'static str,
    }

    impl sqlx::error::DatabaseError for ErroPostgres {
        fn message(&self) -> &str {
            "violação de restrição"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.codigo))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn erro_sql(codigo: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ErroPostgres { codigo }))
    }

    async fn corpo_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn nao_encontrado_vira_404_com_envelope() {
        let err = ApiError::NaoEncontrado("Venda com ID 7 não encontrada.".into());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let json = corpo_json(resp).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Venda com ID 7 não encontrada.");
    }

    #[actix_web::test]
    async fn erro_de_banco_nao_vaza_detalhes() {
        let err = ApiError::Banco(sqlx::Error::RowNotFound);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = corpo_json(resp).await;
        assert_eq!(json["message"], "Erro interno ao acessar o banco de dados.");
    }

    #[::core::prelude::v1::test]
    fn erro_sem_codigo_sql_permanece_erro_de_banco() {
        let err = ApiError::de_escrita(sqlx::Error::PoolTimedOut, "Erro ao inserir venda");
        assert!(matches!(err, ApiError::Banco(_)));

        let err = ApiError::de_exclusao(sqlx::Error::PoolTimedOut, "Erro ao deletar sabor");
        assert!(matches!(err, ApiError::Banco(_)));
    }

    #[::core::prelude::v1::test]
    fn chave_estrangeira_na_escrita_vira_400() {
        let err = ApiError::de_escrita(erro_sql(FK_VIOLATION), "Erro ao registrar venda");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::RequisicaoInvalida(msg)
            if msg.starts_with("Erro ao registrar venda: referência inexistente")));
    }

    #[::core::prelude::v1::test]
    fn duplicidade_na_escrita_vira_409() {
        let err = ApiError::de_escrita(erro_sql(UNIQUE_VIOLATION), "Erro ao cadastrar sabor");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(matches!(err, ApiError::Conflito(msg) if msg.contains("registro duplicado")));
    }

    #[::core::prelude::v1::test]
    fn chave_estrangeira_na_exclusao_vira_409() {
        let err = ApiError::de_exclusao(erro_sql(FK_VIOLATION), "Erro ao deletar vendedor");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(matches!(err, ApiError::Conflito(msg) if msg.contains("em uso")));
    }

    #[::core::prelude::v1::test]
    fn outro_codigo_sql_permanece_erro_de_banco() {
        // check_violation não tem tratamento próprio
        let err = ApiError::de_escrita(erro_sql("23514"), "Erro ao atualizar venda");
        assert!(matches!(err, ApiError::Banco(_)));

        let err = ApiError::de_exclusao(erro_sql(UNIQUE_VIOLATION), "Erro ao deletar sabor");
        assert!(matches!(err, ApiError::Banco(_)));
    }

    async fn listar(_filtro: web::Query<FiltroVendas>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn registrar(_venda: web::Json<NovaVenda>) -> HttpResponse {
        HttpResponse::Created().finish()
    }

    async fn buscar(_id: web::Path<i32>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn resposta_de_erro(req: test::TestRequest) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(erro_json))
                .app_data(web::QueryConfig::default().error_handler(erro_query))
                .app_data(web::PathConfig::default().error_handler(erro_path))
                .route("/vendas", web::get().to(listar))
                .route("/vendas", web::post().to(registrar))
                .route("/vendas/{id}", web::get().to(buscar)),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn status_desconhecido_na_consulta_vira_400_com_envelope() {
        let (status, json) =
            resposta_de_erro(test::TestRequest::get().uri("/vendas?status=foo")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        let msg = json["message"].as_str().unwrap();
        assert!(msg.starts_with("Parâmetros de consulta inválidos"));
        assert!(msg.contains("foo"));
    }

    #[actix_web::test]
    async fn corpo_sem_campo_obrigatorio_vira_400_com_envelope() {
        let req = test::TestRequest::post().uri("/vendas").set_json(serde_json::json!({
            "nome_cliente": "Ana Souza",
            "data_retirada": "2024-10-26",
            "sabor1_id": 1
        }));
        let (status, json) = resposta_de_erro(req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        let msg = json["message"].as_str().unwrap();
        assert!(msg.starts_with("Corpo JSON inválido"));
        assert!(msg.contains("telefone_cliente"));
    }

    #[actix_web::test]
    async fn id_nao_numerico_na_rota_vira_400_com_envelope() {
        let (status, json) = resposta_de_erro(test::TestRequest::get().uri("/vendas/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Parâmetro de rota inválido"));
    }

    #[::core::prelude::v1::test]
    fn status_por_variante() {
        assert_eq!(
            ApiError::RequisicaoInvalida(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflito(String::new()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::NaoAutorizado(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
