//! 创建/编辑页处理器

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use super::service::FormController;
use crate::app::{run_blocking, view, AppState};
use crate::core::error::CoreError;

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub confirm_delete: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn open(state: &AppState, id: Option<&str>) -> Result<FormController, CoreError> {
    FormController::initialize(
        state.repository.clone(),
        state.clock.clone(),
        &state.ui,
        id,
    )
}

/// GET /create 表单页，带 id 时为编辑
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<Html<String>, CoreError> {
    let html = run_blocking(move || {
        let mut controller = open(&state, query.id.as_deref())?;

        if query.confirm_delete {
            controller.request_delete();
        }

        Ok(view::render_form(&controller))
    })
    .await?;

    Ok(Html(html))
}

/// POST /create 保存表单
pub async fn save(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
    Form(form): Form<ProductForm>,
) -> Result<Response, CoreError> {
    let (status, html) = run_blocking(move || {
        let mut controller = open(&state, query.id.as_deref())?;

        match controller.save(&form.name, &form.description) {
            Ok(_) => Ok((StatusCode::OK, view::render_form(&controller))),
            Err(CoreError::Validation(_)) => Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                view::render_form(&controller),
            )),
            Err(err) => Err(err),
        }
    })
    .await?;

    Ok((status, Html(html)).into_response())
}

/// POST /create/delete 确认删除正在编辑的产品
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<Html<String>, CoreError> {
    let html = run_blocking(move || {
        let mut controller = open(&state, query.id.as_deref())?;

        if controller.request_delete() {
            controller.confirm_delete()?;
        }

        Ok(view::render_form(&controller))
    })
    .await?;

    Ok(Html(html))
}
