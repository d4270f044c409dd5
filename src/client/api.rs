use axum::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields the editor submits on create and update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub content: String,
    pub thumbnail_url: String,
    pub hashtags: Vec<String>,
}

/// Recipe fields as returned by `GET /recipes/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchedRecipe {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecipeEnvelope {
    recipe: FetchedRecipe,
}

/// Parsed `{ message, data: { postId } }` save reply.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedPost {
    pub message: String,
    pub data: SavedPostData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedPostData {
    #[serde(rename = "postId")]
    pub post_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Error)]
pub enum ApiFailure {
    /// Non-2xx reply; carries the server's `message` when one was sent.
    #[error("server returned {status}")]
    Status { status: u16, message: Option<String> },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiFailure {
    /// Best-effort user-facing text, preferring the server's message.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

/// What the editor needs from the backend. `RecipeApi` is the real
/// implementation; tests substitute their own.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    async fn fetch_recipe(&self, id: &str) -> Result<FetchedRecipe, ApiFailure>;
    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<SavedPost, ApiFailure>;
    async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<SavedPost, ApiFailure>;
}

/// reqwest-backed client. Write requests carry the access token as a
/// bearer credential.
pub struct RecipeApi {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl RecipeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, ApiFailure> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let message = res.json::<ErrorBody>().await.ok().map(|b| b.message);
        Err(ApiFailure::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RecipeBackend for RecipeApi {
    async fn fetch_recipe(&self, id: &str) -> Result<FetchedRecipe, ApiFailure> {
        let url = format!("{}/recipes/{}", self.base_url, id);
        let res = self.http.get(&url).send().await?;
        let envelope = Self::check(res).await?.json::<RecipeEnvelope>().await?;
        Ok(envelope.recipe)
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<SavedPost, ApiFailure> {
        let url = format!("{}/recipes", self.base_url);
        let res = self.authorize(self.http.post(&url)).json(draft).send().await?;
        Ok(Self::check(res).await?.json::<SavedPost>().await?)
    }

    async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<SavedPost, ApiFailure> {
        let url = format!("{}/recipes/{}", self.base_url, id);
        let res = self
            .authorize(self.http.patch(&url))
            .json(draft)
            .send()
            .await?;
        Ok(Self::check(res).await?.json::<SavedPost>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_post_parses_camel_case_post_id() {
        let reply: SavedPost = serde_json::from_str(
            r#"{ "message": "create recipe post success",
                 "data": { "postId": "3fa85f64-5717-4562-b3fc-2c963f66afa6" } }"#,
        )
        .unwrap();
        assert_eq!(reply.data.post_id, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn fetched_recipe_tolerates_missing_optionals() {
        let body = r#"{ "recipe": { "title": "Omelette", "content": "<p>Crack eggs</p>" } }"#;
        let envelope: RecipeEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.recipe.title, "Omelette");
        assert!(envelope.recipe.hashtags.is_empty());
        assert!(envelope.recipe.thumbnail_url.is_none());
    }

    #[test]
    fn failure_prefers_server_message() {
        let failure = ApiFailure::Status {
            status: 403,
            message: Some("only the author may edit this post".into()),
        };
        assert_eq!(
            failure.user_message(),
            Some("only the author may edit this post")
        );
    }
}
