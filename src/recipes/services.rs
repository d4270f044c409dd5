use crate::recipes::dto::UpdateRecipeRequest;
use crate::recipes::repo::Recipe;

/// A fully resolved set of recipe fields, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePatch {
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub hashtags: Vec<String>,
    pub thumbnail_url: Option<String>,
}

/// Resolve a partial update against the stored document: each supplied
/// field replaces the stored value, each omitted field keeps it. Fields
/// are resolved independently of one another.
pub fn merge_update(existing: &Recipe, req: &UpdateRecipeRequest) -> RecipePatch {
    RecipePatch {
        title: req.title.clone().unwrap_or_else(|| existing.title.clone()),
        subtitle: req.subtitle.clone().or_else(|| existing.subtitle.clone()),
        content: req
            .content
            .clone()
            .unwrap_or_else(|| existing.content.clone()),
        hashtags: req
            .hashtags
            .clone()
            .unwrap_or_else(|| existing.hashtags.clone()),
        thumbnail_url: req
            .thumbnail_url
            .clone()
            .or_else(|| existing.thumbnail_url.clone()),
    }
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn stored_recipe() -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Omelette".into(),
            subtitle: Some("breakfast classic".into()),
            content: "<p>Crack eggs</p>".into(),
            hashtags: vec!["eggs".into(), "breakfast".into()],
            thumbnail_url: Some("https://img.example/omelette.jpg".into()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn empty_request_keeps_every_field() {
        let recipe = stored_recipe();
        let merged = merge_update(&recipe, &UpdateRecipeRequest::default());
        assert_eq!(merged.title, recipe.title);
        assert_eq!(merged.subtitle, recipe.subtitle);
        assert_eq!(merged.content, recipe.content);
        assert_eq!(merged.hashtags, recipe.hashtags);
        assert_eq!(merged.thumbnail_url, recipe.thumbnail_url);
    }

    #[test]
    fn supplied_field_replaces_only_itself() {
        let recipe = stored_recipe();
        let req = UpdateRecipeRequest {
            subtitle: Some("v2".into()),
            ..Default::default()
        };
        let merged = merge_update(&recipe, &req);
        assert_eq!(merged.subtitle.as_deref(), Some("v2"));
        assert_eq!(merged.title, recipe.title);
        assert_eq!(merged.content, recipe.content);
        assert_eq!(merged.hashtags, recipe.hashtags);
    }

    #[test]
    fn fields_resolve_independently() {
        let recipe = stored_recipe();
        let req = UpdateRecipeRequest {
            title: Some("Frittata".into()),
            hashtags: Some(vec!["brunch".into()]),
            ..Default::default()
        };
        let merged = merge_update(&recipe, &req);
        assert_eq!(merged.title, "Frittata");
        assert_eq!(merged.hashtags, vec!["brunch".to_string()]);
        assert_eq!(merged.subtitle, recipe.subtitle);
        assert_eq!(merged.content, recipe.content);
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   \n\t"));
        assert!(!is_blank("Omelette"));
    }
}
