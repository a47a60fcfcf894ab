//! 目录页处理器

use axum::{
    extract::{Query, State},
    response::{Html, Json, Redirect},
    Form,
};
use serde::Deserialize;

use super::service::CatalogController;
use crate::app::{product::model::Product, run_blocking, view, AppState};
use crate::core::{error::CoreError, response::ApiResponse};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
    /// 请求删除确认的产品 id
    #[serde(default)]
    pub delete: Option<String>,
    /// 删除后重定向回来时显示提示
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: String,
    #[serde(default)]
    pub q: Option<String>,
}

fn open(state: &AppState, filter: Option<&str>) -> Result<CatalogController, CoreError> {
    let mut controller = CatalogController::load(state.repository.clone(), &state.ui)?;
    match filter {
        Some(text) => controller.search(text),
        None => controller.clear_search(),
    }
    Ok(controller)
}

/// GET / 产品列表
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, CoreError> {
    let html = run_blocking(move || {
        let mut controller = open(&state, query.q.as_deref())?;

        if let Some(id) = query.delete.filter(|id| !id.is_empty()) {
            controller.request_delete(id);
        }
        if query.deleted {
            controller.announce_deleted();
        }

        Ok(view::render_catalog(&controller))
    })
    .await?;

    Ok(Html(html))
}

/// POST /delete 确认删除，完成后重定向回目录页
pub async fn confirm_delete(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, CoreError> {
    let filter = form.q.clone().unwrap_or_default();

    run_blocking(move || {
        let mut controller = open(&state, form.q.as_deref())?;
        controller.request_delete(form.id);
        controller.confirm_delete()
    })
    .await?;

    let location = view::href_with("/", &[("q", filter.trim()), ("deleted", "true")]);
    Ok(Redirect::to(&location))
}

/// GET /api/products 产品列表 (JSON)
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let (products, total) = run_blocking(move || {
        let controller = open(&state, query.q.as_deref())?;
        let products: Vec<Product> = controller.visible().into_iter().cloned().collect();
        Ok((products, controller.products().len()))
    })
    .await?;

    let message = if products.len() == total {
        format!("获取到 {} 个产品", products.len())
    } else {
        format!("过滤后获取到 {} 个产品 (总共 {} 个)", products.len(), total)
    };

    Ok(Json(ApiResponse::success(products, message)))
}
