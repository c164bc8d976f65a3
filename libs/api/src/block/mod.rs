use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

pub mod request;
pub mod response;

use crate::page::response::PageWithBlocksResponse;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::{ApiError, ApiState};

use self::{
    request::PromptRequest,
    response::{AskBlockResponse, BlockResponse},
};

/// List the blocks of a page in order
#[utoipa::path(
    get,
    path = "/block/page/{page_id}",
    responses(
        (status = 200, description = "List blocks successfully", body = [BlockResponse]),
        (status = 404, description = "Page not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("page_id" = String, Path, description = "page id"),
    )
)]
pub async fn get_blocks(
    State(state): State<Arc<ApiState>>,
    Path(page_id): Path<String>,
) -> ApiResponse<Json<Vec<BlockResponse>>> {
    let blocks = state
        .block
        .list(&page_id)
        .await
        .into_response("500-005")?;

    Ok(Json(blocks.into_iter().map(BlockResponse::from).collect()))
}

/// Append a block to a page
#[utoipa::path(
    post,
    path = "/block/page/{page_id}",
    request_body = request::BlockFields,
    responses(
        (status = 201, description = "Create a block successfully", body = BlockResponse),
        (status = 400, description = "Missing or invalid block type", body = crate::response::ErrorResponse),
        (status = 404, description = "Page not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("page_id" = String, Path, description = "page id"),
    )
)]
pub async fn post_block(
    State(state): State<Arc<ApiState>>,
    Path(page_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, ApiError>,
) -> ApiResponse<(StatusCode, Json<BlockResponse>)> {
    let block = state
        .block
        .create(&page_id, &body)
        .await
        .into_response("500-007")?;

    Ok((StatusCode::CREATED, Json(BlockResponse::from(block))))
}

/// Get a block
#[utoipa::path(
    get,
    path = "/block/{id}",
    responses(
        (status = 200, description = "Get a block successfully", body = BlockResponse),
        (status = 404, description = "Block not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "block id"),
    )
)]
pub async fn get_block(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResponse<Json<BlockResponse>> {
    let block = state.block.get(&id).await.into_response("500-006")?;

    Ok(Json(BlockResponse::from(block)))
}

/// Update the content of a block
#[utoipa::path(
    put,
    path = "/block/{id}",
    request_body = request::BlockFields,
    responses(
        (status = 200, description = "Update a block successfully", body = BlockResponse),
        (status = 404, description = "Block not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "block id"),
    )
)]
pub async fn put_block(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, ApiError>,
) -> ApiResponse<Json<BlockResponse>> {
    let block = state
        .block
        .update(&id, &body)
        .await
        .into_response("500-008")?;

    Ok(Json(BlockResponse::from(block)))
}

/// Delete a block
#[utoipa::path(
    delete,
    path = "/block/{id}",
    responses(
        (status = 204, description = "Delete a block successfully"),
        (status = 404, description = "Block not found", body = crate::response::ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "block id"),
    )
)]
pub async fn delete_block(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResponse<StatusCode> {
    state.block.delete(&id).await.into_response("500-009")?;

    Ok(StatusCode::NO_CONTENT)
}

/// Ask the language model a question about one block
#[utoipa::path(
    post,
    path = "/block/{id}/ask",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Answered successfully", body = AskBlockResponse),
        (status = 400, description = "Missing prompt or empty block", body = crate::response::ErrorResponse),
        (status = 404, description = "Block not found", body = crate::response::ErrorResponse),
        (status = 502, description = "Language model failed", body = crate::response::ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "block id"),
    )
)]
pub async fn ask_block(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<
        Json<PromptRequest>,
        ApiError,
    >,
) -> ApiResponse<Json<AskBlockResponse>> {
    let answer = state
        .block
        .ask(&id, &body.prompt)
        .await
        .into_response("500-010")?;

    Ok(Json(AskBlockResponse { answer }))
}

/// Generate a whole page with the language model
#[utoipa::path(
    post,
    path = "/block/create",
    request_body = PromptRequest,
    responses(
        (status = 201, description = "Page generated successfully", body = PageWithBlocksResponse),
        (status = 400, description = "Missing prompt", body = crate::response::ErrorResponse),
        (status = 502, description = "Language model failed or replied with an unusable page", body = crate::response::ErrorResponse)
    )
)]
pub async fn create_page_with_ai(
    State(state): State<Arc<ApiState>>,
    WithRejection(Json(body), _): WithRejection<
        Json<PromptRequest>,
        ApiError,
    >,
) -> ApiResponse<(StatusCode, Json<PageWithBlocksResponse>)> {
    let page = state
        .page
        .create_with_ai(&body.prompt)
        .await
        .into_response("500-011")?;

    Ok((StatusCode::CREATED, Json(PageWithBlocksResponse::from(page))))
}
