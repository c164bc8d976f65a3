use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

pub mod request;
pub mod response;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::{ApiError, ApiState};

use self::{
    request::CreatePageRequest,
    response::{PageResponse, PageWithBlocksResponse},
};

/// List all pages
#[utoipa::path(
    get,
    path = "/page",
    responses(
        (status = 200, description = "List all pages successfully", body = [PageResponse]),
        (status = 500, description = "Failed to fetch pages", body = crate::response::ErrorResponse)
    )
)]
pub async fn get_pages(
    State(state): State<Arc<ApiState>>,
) -> ApiResponse<Json<Vec<PageResponse>>> {
    let pages = state.page.list().await.into_response("500-001")?;

    Ok(Json(pages.into_iter().map(PageResponse::from).collect()))
}

/// Get a page with its blocks
#[utoipa::path(
    get,
    path = "/page/{id}",
    responses(
        (status = 200, description = "Get a page successfully", body = PageWithBlocksResponse),
        (status = 404, description = "Page not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "page id"),
    )
)]
pub async fn get_page(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResponse<Json<PageWithBlocksResponse>> {
    let page = state.page.get(&id).await.into_response("500-002")?;

    Ok(Json(PageWithBlocksResponse::from(page)))
}

/// Create a page
#[utoipa::path(
    post,
    path = "/page",
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "Create a page successfully", body = PageResponse),
        (status = 400, description = "Title is required", body = crate::response::ErrorResponse)
    )
)]
pub async fn post_page(
    State(state): State<Arc<ApiState>>,
    WithRejection(Json(body), _): WithRejection<
        Json<CreatePageRequest>,
        ApiError,
    >,
) -> ApiResponse<(StatusCode, Json<PageResponse>)> {
    let page = state
        .page
        .create(&body.title)
        .await
        .into_response("500-003")?;

    Ok((StatusCode::CREATED, Json(PageResponse::from(page))))
}

/// Delete a page and all of its blocks
#[utoipa::path(
    delete,
    path = "/page/{id}",
    responses(
        (status = 204, description = "Delete a page successfully"),
        (status = 404, description = "Page not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "page id"),
    )
)]
pub async fn delete_page(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResponse<StatusCode> {
    state.page.delete(&id).await.into_response("500-004")?;

    Ok(StatusCode::NO_CONTENT)
}
