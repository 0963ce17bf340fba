//! Request handlers for the menu endpoints
//!
//! Each handler names the permission it requires, translates the request
//! into store calls, and wraps the result in the shared envelope.

use super::error::ApiError;
use super::guard::BearerClaims;
use super::server::AppState;
use crate::auth::Permission;
use crate::storage::StorageError;
use crate::{Drink, DrinkSummary, Ingredient};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use serde::{Deserialize, Serialize};

/// Success envelope for endpoints returning drinks
#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

/// Success envelope for the delete endpoint
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

/// Health report for the service
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Request body for creating a drink
#[derive(Debug, Deserialize)]
pub struct CreateDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Request body for partially updating a drink
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDrink {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

/// Validate a recipe: at least one ingredient, every field filled in
fn validate_recipe(recipe: &[Ingredient]) -> Result<(), ApiError> {
    if recipe.is_empty() {
        return Err(ApiError::BadRequest);
    }

    for ingredient in recipe {
        if ingredient.name.is_empty() || ingredient.color.is_empty() || ingredient.parts == 0 {
            return Err(ApiError::BadRequest);
        }
    }

    Ok(())
}

/// GET /drinks - public menu, short view
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkSummary>>, ApiError> {
    let drinks = state.store.list().await.map_err(|_| ApiError::NotFound)?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(DrinkSummary::from).collect(),
    }))
}

/// GET /drinks-detail - full recipes, requires `get:drinks-detail`
pub async fn drink_details(
    State(state): State<AppState>,
    claims: BearerClaims,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    claims.require(Permission::ReadDetail)?;

    let drinks = state.store.list().await.map_err(|_| ApiError::NotFound)?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// POST /drinks - add a drink, requires `post:drinks`
pub async fn create_drink(
    State(state): State<AppState>,
    claims: BearerClaims,
    body: Result<Json<CreateDrink>, JsonRejection>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    claims.require(Permission::Create)?;

    let Json(body) = body.map_err(|_| ApiError::BadRequest)?;

    if body.title.is_empty() {
        return Err(ApiError::BadRequest);
    }
    validate_recipe(&body.recipe)?;

    if state
        .store
        .find_by_title(&body.title)
        .await
        .map_err(|_| ApiError::BadRequest)?
        .is_some()
    {
        return Err(ApiError::BadRequest);
    }

    let drink = state
        .store
        .insert(body.title, body.recipe)
        .await
        .map_err(|_| ApiError::BadRequest)?;

    tracing::info!(id = drink.id, title = %drink.title, "drink created");

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

/// PATCH /drinks/{id} - partial update, requires `patch:drinks`
pub async fn update_drink(
    State(state): State<AppState>,
    claims: BearerClaims,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateDrink>, JsonRejection>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    claims.require(Permission::Update)?;

    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let Json(body) = body.map_err(|_| ApiError::BadRequest)?;

    let mut drink = state
        .store
        .get(id)
        .await
        .map_err(|_| ApiError::BadRequest)?
        .ok_or(ApiError::NotFound)?;

    // Empty values count as absent: omitted fields keep their prior value
    if let Some(title) = body.title.filter(|title| !title.is_empty()) {
        drink.title = title;
    }
    if let Some(recipe) = body.recipe.filter(|recipe| !recipe.is_empty()) {
        validate_recipe(&recipe)?;
        drink.recipe = recipe;
    }

    state.store.update(&drink).await.map_err(|err| match err {
        StorageError::NotFound(_) => ApiError::NotFound,
        _ => ApiError::BadRequest,
    })?;

    tracing::info!(id = drink.id, title = %drink.title, "drink updated");

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

/// DELETE /drinks/{id} - requires `delete:drinks`
pub async fn delete_drink(
    State(state): State<AppState>,
    claims: BearerClaims,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    claims.require(Permission::Delete)?;

    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    state
        .store
        .get(id)
        .await
        .map_err(|_| ApiError::BadRequest)?
        .ok_or(ApiError::NotFound)?;

    state.store.delete(id).await.map_err(|err| match err {
        StorageError::NotFound(_) => ApiError::NotFound,
        _ => ApiError::BadRequest,
    })?;

    tracing::info!(id, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}

/// GET /health - no auth required
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
