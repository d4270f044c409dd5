use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    recipes::{
        dto::{
            CreateRecipeRequest, Pagination, PostIdData, RecipeEnvelope, RecipeListResponse,
            SaveRecipeResponse, UpdateRecipeRequest,
        },
        repo::Recipe,
        services::{is_blank, merge_update},
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route(
            "/recipes/:id",
            axum::routing::patch(update_recipe).delete(delete_recipe),
        )
}

// Ids arrive as raw path segments so a malformed one maps to a 400 with a
// `{ message }` body rather than the framework's plain-text rejection.
fn parse_recipe_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("invalid recipe id".into()))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let recipes = Recipe::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(RecipeListResponse {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeEnvelope>, ApiError> {
    let id = parse_recipe_id(&id)?;
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    Ok(Json(RecipeEnvelope {
        recipe: recipe.into(),
    }))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<SaveRecipeResponse>), ApiError> {
    if is_blank(&body.title) {
        return Err(ApiError::BadRequest("title is required".into()));
    }
    if is_blank(&body.content) {
        return Err(ApiError::BadRequest("content is required".into()));
    }

    let recipe = Recipe::create(
        &state.db,
        user_id,
        &body.title,
        body.subtitle.as_deref(),
        &body.content,
        &body.hashtags,
        body.thumbnail_url.as_deref(),
    )
    .await?;

    info!(recipe_id = %recipe.id, %user_id, "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(SaveRecipeResponse {
            message: "create recipe post success".into(),
            data: PostIdData { post_id: recipe.id },
        }),
    ))
}

/// PATCH /recipes/:id
///
/// Authenticate, load, check ownership, then merge the partial body over
/// the stored fields and persist. A missing recipe is a 404, never a
/// dereference of an absent row.
#[instrument(skip(state, body))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<SaveRecipeResponse>, ApiError> {
    let id = parse_recipe_id(&id)?;

    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;

    if recipe.user_id != user_id {
        warn!(recipe_id = %id, owner = %recipe.user_id, %user_id, "non-owner update rejected");
        return Err(ApiError::Forbidden(
            "only the author may edit this post".into(),
        ));
    }

    if let Some(title) = &body.title {
        if is_blank(title) {
            return Err(ApiError::BadRequest("title is required".into()));
        }
    }
    if let Some(content) = &body.content {
        if is_blank(content) {
            return Err(ApiError::BadRequest("content is required".into()));
        }
    }

    let patch = merge_update(&recipe, &body);
    let updated = Recipe::update(&state.db, id, &patch).await?;

    info!(recipe_id = %updated.id, %user_id, "recipe updated");
    Ok(Json(SaveRecipeResponse {
        message: "modify recipe post success".into(),
        data: PostIdData {
            post_id: updated.id,
        },
    }))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SaveRecipeResponse>, ApiError> {
    let id = parse_recipe_id(&id)?;

    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;

    if recipe.user_id != user_id {
        warn!(recipe_id = %id, owner = %recipe.user_id, %user_id, "non-owner delete rejected");
        return Err(ApiError::Forbidden(
            "only the author may delete this post".into(),
        ));
    }

    Recipe::delete(&state.db, id).await?;
    info!(recipe_id = %id, %user_id, "recipe deleted");
    Ok(Json(SaveRecipeResponse {
        message: "delete recipe post success".into(),
        data: PostIdData { post_id: id },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_bad_request() {
        let err = parse_recipe_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid recipe id");
    }

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_recipe_id(&id.to_string()).unwrap(), id);
    }
}
