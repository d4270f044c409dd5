use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::services::RecipePatch;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub hashtags: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const RECIPE_COLUMNS: &str =
    "id, user_id, title, subtitle, content, hashtags, thumbnail_url, created_at, updated_at";

impl Recipe {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    /// Newest-first listing for the recipes page.
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        subtitle: Option<&str>,
        content: &str,
        hashtags: &[String],
        thumbnail_url: Option<&str>,
    ) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (user_id, title, subtitle, content, hashtags, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(title)
        .bind(subtitle)
        .bind(content)
        .bind(hashtags)
        .bind(thumbnail_url)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    /// Persist a fully resolved patch. Field merging happens beforehand in
    /// `services::merge_update`; this write is unconditional.
    pub async fn update(db: &PgPool, id: Uuid, patch: &RecipePatch) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes
            SET title = $2,
                subtitle = $3,
                content = $4,
                hashtags = $5,
                thumbnail_url = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.subtitle)
        .bind(&patch.content)
        .bind(&patch.hashtags)
        .bind(&patch.thumbnail_url)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    /// Delete one recipe; returns whether a row was removed.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
