use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{InteractionKind, Item, PreferenceProfile, ScoredItem};
use crate::services::Ranker;

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub kind: InteractionKind,
    pub item_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Catalog ids of items the user authored
    #[serde(default)]
    pub own_item_ids: Vec<String>,
    pub limit: Option<usize>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the catalog
pub async fn get_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.catalog.read().await.clone())
}

/// Add or replace a catalog item
pub async fn upsert_item(
    State(state): State<AppState>,
    Json(item): Json<Item>,
) -> AppResult<(StatusCode, Json<Item>)> {
    if item.id.trim().is_empty() {
        return Err(AppError::InvalidInput("item id must not be empty".to_string()));
    }

    tracing::debug!(item_id = %item.id, category = item.category_name(), "Upserting catalog item");
    state.upsert_item(item.clone()).await;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Record one user interaction and persist the updated profile
pub async fn record_interaction(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(request): Json<InteractionRequest>,
) -> AppResult<Json<PreferenceProfile>> {
    let item = state
        .find_item(&request.item_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("item {}", request.item_id)))?;

    let session = state.session(&user_id).await;
    let mut store = session.lock().await;
    store.record_interaction(request.kind, &item);

    // The session already holds the update, a failed write only loses durability
    if let Err(e) = store.save(state.repository.as_ref()).await {
        tracing::error!(
            request_id = %request_id,
            user_id = %user_id,
            error = %e,
            "Failed to persist preference profile"
        );
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        item_id = %item.id,
        kind = %request.kind,
        "Interaction recorded"
    );

    Ok(Json(store.profile().clone()))
}

/// Current preference profile of a user
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<PreferenceProfile> {
    let session = state.session(&user_id).await;
    let store = session.lock().await;
    Json(store.profile().clone())
}

/// Top unseen items for a user
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<Item>>> {
    let limit = resolve_limit(&state, request.limit)?;

    // Opening a session may hit the repository, so it happens before the catalog is locked
    let session = state.session(&user_id).await;
    let store = session.lock().await;

    let catalog = state.catalog.read().await;
    let own_items = own_items(&catalog, &request.own_item_ids);
    let items: Vec<Item> = store
        .recommend(&catalog, &own_items, limit)
        .into_iter()
        .cloned()
        .collect();

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        catalog_size = catalog.len(),
        returned = items.len(),
        "Recommendations generated"
    );

    Ok(Json(items))
}

/// Ranked score records with their reasons
pub async fn explain(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<ScoredItem>>> {
    let limit = resolve_limit(&state, request.limit)?;

    let session = state.session(&user_id).await;
    let store = session.lock().await;

    let catalog = state.catalog.read().await;
    let own_items = own_items(&catalog, &request.own_item_ids);

    Ok(Json(
        Ranker::new(store.profile()).explain(&catalog, &own_items, limit),
    ))
}

fn resolve_limit(state: &AppState, requested: Option<usize>) -> AppResult<usize> {
    match requested {
        Some(0) => Err(AppError::InvalidInput("limit must be positive".to_string())),
        Some(limit) => Ok(limit),
        None => Ok(state.default_limit),
    }
}

/// Looks up the user's own items in the catalog, unknown ids are skipped
fn own_items(catalog: &[Item], ids: &[String]) -> Vec<Item> {
    catalog
        .iter()
        .filter(|item| ids.contains(&item.id))
        .cloned()
        .collect()
}
