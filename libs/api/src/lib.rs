use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use gemini::TextGeneration;
use repository::Repository;
use service::{BlockService, PageService};
use toml::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

mod agent;
pub mod block;
pub mod healthz;
pub mod not_found;
pub mod page;
pub mod response;
pub mod service;

pub enum ApiError {
    ClientError(String),
    NotFound(String),
    UpstreamError(String),
    ServerError(String),
}

pub struct ApiState {
    page: PageService,
    block: BlockService,
}

impl ApiState {
    pub fn new(repo: Repository, gemini: Arc<dyn TextGeneration>) -> Self {
        Self {
            page: PageService::new(repo.clone(), gemini.clone()),
            block: BlockService::new(repo, gemini),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini: Gemini,
    pub server: Server,
}

#[derive(Clone, Debug)]
pub struct Gemini {
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct Server {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz::get_health,
        page::get_pages,
        page::get_page,
        page::post_page,
        page::delete_page,
        block::get_blocks,
        block::post_block,
        block::get_block,
        block::put_block,
        block::delete_block,
        block::ask_block,
        block::create_page_with_ai,
    ),
    components(schemas(
        response::ErrorResponse,
        page::request::CreatePageRequest,
        page::response::PageResponse,
        page::response::PageWithBlocksResponse,
        block::request::BlockFields,
        block::request::PromptRequest,
        block::response::BlockResponse,
        block::response::TextBlockResponse,
        block::response::ImageBlockResponse,
        block::response::CodeBlockResponse,
        block::response::TableBlockResponse,
        block::response::WebpageEmbedResponse,
        block::response::AskBlockResponse,
    )),
    tags(
        (name = "notion-editor", description = "Pages made of ordered, typed blocks")
    )
)]
struct ApiDoc;

pub async fn serve(
    repository: Repository,
    gemini_api_key: Option<String>,
    config: &Config,
) -> anyhow::Result<Router> {
    info!(task = "start api serving");

    if gemini_api_key.is_none() {
        info!(task = "start api serving", gemini = "disabled");
    }

    let gemini = gemini::Client::new(
        gemini_api_key,
        config.gemini.base_url.clone(),
        config.gemini.model.clone(),
    )
    .context("failed to build gemini client")?;

    let state = ApiState::new(repository, Arc::new(gemini));

    router(state, &config.server.cors_origins)
}

pub fn router(
    state: ApiState,
    cors_origins: &[String],
) -> anyhow::Result<Router> {
    let state = Arc::new(state);

    let origins = cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid cors origin")?;

    // pages
    let page_router = Router::new()
        .route("/", get(page::get_pages).post(page::post_page))
        .route("/:id", get(page::get_page).delete(page::delete_page))
        .fallback(not_found::get_404)
        .with_state(state.clone());

    // blocks
    let block_router = Router::new()
        .route("/create", post(block::create_page_with_ai))
        .route(
            "/page/:page_id",
            get(block::get_blocks).post(block::post_block),
        )
        .route(
            "/:id",
            get(block::get_block)
                .put(block::put_block)
                .delete(block::delete_block),
        )
        .route("/:id/ask", post(block::ask_block))
        .fallback(not_found::get_404)
        .with_state(state);

    let router = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .route("/healthz", get(healthz::get_health))
        .nest("/page", page_router)
        .nest("/block", block_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .fallback(not_found::get_404);

    Ok(router)
}

/// Reads `Config{suffix}.toml` from the workspace root.
pub fn load_config(config_name: &str) -> anyhow::Result<Config> {
    let config = util::load_config(config_name)?;

    let gemini = Gemini {
        base_url: util::get_str(&config, "gemini", "base_url")
            .unwrap_or(gemini::DEFAULT_BASE_URL)
            .to_string(),
        model: util::get_str(&config, "gemini", "model")
            .unwrap_or(gemini::DEFAULT_MODEL)
            .to_string(),
    };

    let server = config.get("server");
    let port = server
        .and_then(|server| server.get("port"))
        .and_then(Value::as_integer)
        .unwrap_or(8000);
    let cors_origins = config
        .get("cors")
        .and_then(|cors| cors.get("origins"))
        .and_then(Value::as_array)
        .map(|origins| {
            origins
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Config {
        gemini,
        server: Server {
            port: u16::try_from(port).context("server.port is out of range")?,
            cors_origins,
        },
    })
}
