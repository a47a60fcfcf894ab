//! 应用层：目录页、表单页与页面渲染

pub mod catalog;
pub mod form;
pub mod product;
pub mod view;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::UiConfig;
use crate::core::{clock::Clock, error::CoreError, middleware::request_logging_middleware};
use crate::infrastructure::storage::ProductRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProductRepository>,
    pub clock: Arc<dyn Clock>,
    pub ui: UiConfig,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        clock: Arc<dyn Clock>,
        ui: UiConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            ui,
        }
    }
}

/// 在阻塞线程池中执行一次页面视图
///
/// 控制器的加载和保存都是同步文件 IO，不能占用异步工作线程。
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CoreError::Storage(format!("页面任务失败: {}", err)))?
}

/// 构建路由
pub fn router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/", get(catalog::handler::index))
        .route("/delete", post(catalog::handler::confirm_delete))
        .route("/create", get(form::handler::show).post(form::handler::save))
        .route("/create/delete", post(form::handler::delete))
        .route("/api/products", get(catalog::handler::list_products))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, CoreError> {
    let repository = state.repository.clone();
    let products = run_blocking(move || repository.load()).await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "status": "available",
            "products_count": products.len()
        }
    })))
}
