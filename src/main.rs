// src/main.rs

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, Pool, Postgres};
use tracing::info;
use tracing_subscriber::EnvFilter;

// Módulos da API
mod autenticacao;  // Validação dos tokens do provedor de identidade
mod config;        // Configuração lida do ambiente
mod configuracoes; // Preço e datas de retirada
mod entregas;      // Registro de entregas
mod relatorios;    // Dashboard, relatórios e exportação CSV
mod sabores;       // Sabores de pizza
mod saude;         // Verificação de saúde
mod shared;        // Envelope de resposta e erros
mod vendas;        // Registro de vendas
mod vendedores;    // Vendedores

use autenticacao::auth_structs::ConfigAutenticacao;
use config::Configuracao;
use shared::api_error::{erro_json, erro_path, erro_query};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

// Estado compartilhado que contém a conexão com o banco de dados.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Também recebe os registros do `log` (access log do middleware::Logger)
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Registra todas as rotas da API.
fn rotas(cfg: &mut web::ServiceConfig) {
    cfg.service(saude::verificar_saude)
        // Módulo de Sabores
        .service(sabores::sabores_router::buscar_sabores)
        .service(sabores::sabores_router::buscar_sabor_por_id)
        .service(sabores::sabores_router::cadastrar_sabor)
        .service(sabores::sabores_router::atualizar_sabor)
        .service(sabores::sabores_router::deletar_sabor)
        // Módulo de Vendedores
        .service(vendedores::vendedores_router::buscar_vendedores)
        .service(vendedores::vendedores_router::buscar_vendedor_por_id)
        .service(vendedores::vendedores_router::cadastrar_vendedor)
        .service(vendedores::vendedores_router::atualizar_vendedor)
        .service(vendedores::vendedores_router::deletar_vendedor)
        // Módulo de Configurações (a rota fixa vem antes das demais)
        .service(configuracoes::configuracoes_router::buscar_configuracoes_brutas)
        .service(configuracoes::configuracoes_router::buscar_configuracoes)
        .service(configuracoes::configuracoes_router::atualizar_configuracoes)
        // Módulo de Vendas
        .service(vendas::vendas_router::buscar_vendas)
        .service(vendas::vendas_router::buscar_venda_por_id)
        .service(vendas::vendas_router::registrar_venda)
        .service(vendas::vendas_router::atualizar_venda)
        .service(vendas::vendas_router::atualizar_status_venda)
        .service(vendas::vendas_router::deletar_venda)
        // Módulo de Entregas
        .service(entregas::entregas_router::buscar_entregas)
        .service(entregas::entregas_router::registrar_entrega)
        .service(entregas::entregas_router::desfazer_entrega)
        // Módulo de Relatórios
        .service(relatorios::relatorios_router::buscar_dashboard)
        .service(relatorios::relatorios_router::relatorio_vendedores)
        .service(relatorios::relatorios_router::relatorio_sabores)
        .service(relatorios::relatorios_router::relatorio_datas_retirada)
        .service(relatorios::relatorios_router::exportar_vendas)
        .service(relatorios::relatorios_router::exportar_entregas);
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Lê o ambiente (e o .env) antes de iniciar o log, para respeitar RUST_LOG do .env
    let configuracao = Configuracao::do_ambiente().context("Configuração inválida")?;
    init_logging();

    let db_pool = PgPoolOptions::new()
        .max_connections(configuracao.max_conexoes)
        .connect(&configuracao.database_url)
        .await
        .context("Falha ao conectar ao banco PostgreSQL")?;

    if configuracao.executar_migracoes {
        MIGRATOR
            .run(&db_pool)
            .await
            .context("Falha ao aplicar as migrações")?;
        info!("Migrações aplicadas");
    }

    let app_state = web::Data::new(AppState { db_pool });
    let autenticacao = web::Data::new(ConfigAutenticacao::new(
        &configuracao.jwt_secret,
        configuracao.jwt_audience.as_deref(),
    ));

    let (host, porta) = configuracao.endereco();
    info!(%host, porta, "Iniciando API Pizza CRM");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(autenticacao.clone())
            // Erros de desserialização no mesmo envelope das demais respostas
            .app_data(web::JsonConfig::default().error_handler(erro_json))
            .app_data(web::QueryConfig::default().error_handler(erro_query))
            .app_data(web::PathConfig::default().error_handler(erro_path))
            .configure(rotas)
    })
    .bind((host, porta))?
    .run()
    .await?;

    Ok(())
}
