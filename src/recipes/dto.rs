use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::repo::Recipe;

/// `GET /recipes/:id` response wrapper: `{ "recipe": { ... } }`.
#[derive(Debug, Serialize)]
pub struct RecipeEnvelope {
    pub recipe: RecipeDetails,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub hashtags: Vec<String>,
    pub thumbnail_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Recipe> for RecipeDetails {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            author: r.user_id,
            title: r.title,
            subtitle: r.subtitle,
            content: r.content,
            hashtags: r.hashtags,
            thumbnail_url: r.thumbnail_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Body of `POST /recipes`. The canonical tag field is `hashtags`; the
/// legacy singular `hashtag` is accepted as an alias.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, alias = "hashtag")]
    pub hashtags: Vec<String>,
}

/// Body of `PATCH /recipes/:id`. Every field is optional; omitted fields
/// keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "hashtag")]
    pub hashtags: Option<Vec<String>>,
    pub thumbnail_url: Option<String>,
}

/// Save responses: `{ "message": ..., "data": { "postId": ... } }`.
#[derive(Debug, Serialize)]
pub struct SaveRecipeResponse {
    pub message: String,
    pub data: PostIdData,
}

#[derive(Debug, Serialize)]
pub struct PostIdData {
    #[serde(rename = "postId")]
    pub post_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeListItem>,
}

#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub hashtags: Vec<String>,
    pub thumbnail_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Recipe> for RecipeListItem {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            author: r.user_id,
            title: r.title,
            subtitle: r.subtitle,
            hashtags: r.hashtags,
            thumbnail_url: r.thumbnail_url,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}
