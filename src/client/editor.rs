use tracing::error;

use crate::client::api::{ApiFailure, RecipeBackend, RecipeDraft};
use crate::recipes::services::is_blank;

/// Form field to focus after a rejected save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeMode {
    Info,
    Success,
    Error,
}

/// Transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub mode: NoticeMode,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            mode: NoticeMode::Info,
            message: message.into(),
        }
    }
    fn success(message: impl Into<String>) -> Self {
        Self {
            mode: NoticeMode::Success,
            message: message.into(),
        }
    }
    fn error(message: impl Into<String>) -> Self {
        Self {
            mode: NoticeMode::Error,
            message: message.into(),
        }
    }
}

/// Where the UI goes after a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The listing view, carrying the saved post id when there is one.
    RecipeList { post_id: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Input validation failed; no request was made, the form stays
    /// editable and the given field should receive focus.
    Rejected { focus: Field, notice: Notice },
    /// A save is already outstanding; the attempt was dropped.
    Busy,
    Saved {
        post_id: String,
        notice: Notice,
        navigation: Navigation,
    },
    /// The request failed; the user is routed to the listing regardless.
    Failed {
        notice: Notice,
        navigation: Navigation,
    },
}

/// Marker for the unwired draft-save modal. Opening it shows a
/// "service in preparation" placeholder; no persistence is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftModal;

/// One editing session of the recipe edit page: create mode when started
/// empty, update mode when loaded from an existing post.
#[derive(Debug, Default)]
pub struct EditorSession {
    title: String,
    content: String,
    thumbnail_url: String,
    tag_list: Vec<String>,
    edit_post_id: Option<String>,
    saving: bool,
}

impl EditorSession {
    /// Empty creation form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for the edit page's mount path: with an edit-target id the
    /// post is fetched and the form populated; without one, or when the
    /// fetch fails, the empty creation form is returned.
    pub async fn load<B: RecipeBackend + ?Sized>(backend: &B, edit_post_id: Option<&str>) -> Self {
        let Some(id) = edit_post_id.filter(|id| !id.is_empty()) else {
            return Self::new();
        };
        match backend.fetch_recipe(id).await {
            Ok(recipe) => Self {
                title: recipe.title,
                content: recipe.content,
                thumbnail_url: recipe.thumbnail_url.unwrap_or_default(),
                tag_list: recipe.hashtags,
                edit_post_id: Some(id.to_string()),
                saving: false,
            },
            Err(e) => {
                error!(error = %e, post_id = %id, "loading edit target failed");
                Self::new()
            }
        }
    }

    pub fn is_update_mode(&self) -> bool {
        self.edit_post_id.is_some()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
    pub fn set_thumbnail_url(&mut self, url: impl Into<String>) {
        self.thumbnail_url = url.into();
    }
    pub fn set_tag_list(&mut self, tags: Vec<String>) {
        self.tag_list = tags;
    }

    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn content(&self) -> &str {
        &self.content
    }
    pub fn tag_list(&self) -> &[String] {
        &self.tag_list
    }

    /// The save button. Validates locally, then issues POST (create) or
    /// PATCH (update) depending on how the session was started. Any
    /// non-2xx or transport failure routes to the listing view.
    pub async fn save<B: RecipeBackend + ?Sized>(&mut self, backend: &B) -> SaveOutcome {
        if self.saving {
            return SaveOutcome::Busy;
        }

        if is_blank(&self.title) {
            return SaveOutcome::Rejected {
                focus: Field::Title,
                notice: Notice::info("please enter a title"),
            };
        }
        if is_blank(&self.content) {
            return SaveOutcome::Rejected {
                focus: Field::Content,
                notice: Notice::info("please enter the recipe body"),
            };
        }

        self.saving = true;

        let draft = RecipeDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            hashtags: self.tag_list.clone(),
        };

        let result = match &self.edit_post_id {
            Some(id) => backend.update_recipe(id, &draft).await,
            None => backend.create_recipe(&draft).await,
        };

        match result {
            Ok(saved) => SaveOutcome::Saved {
                post_id: saved.data.post_id.clone(),
                notice: Notice::success(saved.message),
                navigation: Navigation::RecipeList {
                    post_id: Some(saved.data.post_id),
                },
            },
            Err(failure) => {
                let message = failure
                    .user_message()
                    .unwrap_or("an error occurred while saving the recipe")
                    .to_string();
                SaveOutcome::Failed {
                    notice: Notice::error(message),
                    navigation: Navigation::RecipeList { post_id: None },
                }
            }
        }
    }

    /// The secondary draft button. Placeholder only.
    pub fn open_draft_modal(&self) -> DraftModal {
        DraftModal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::{FetchedRecipe, SavedPost, SavedPostData};
    use axum::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch(String),
        Create(RecipeDraft),
        Update(String, RecipeDraft),
    }

    #[derive(Default)]
    struct MockBackend {
        calls: Mutex<Vec<Call>>,
        fetch_result: Option<FetchedRecipe>,
        save_failure: Option<(u16, Option<String>)>,
    }

    impl MockBackend {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn saved_reply() -> SavedPost {
            SavedPost {
                message: "save success".into(),
                data: SavedPostData {
                    post_id: "post-1".into(),
                },
            }
        }

        fn save_result(&self) -> Result<SavedPost, ApiFailure> {
            match &self.save_failure {
                Some((status, message)) => Err(ApiFailure::Status {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(Self::saved_reply()),
            }
        }
    }

    #[async_trait]
    impl RecipeBackend for MockBackend {
        async fn fetch_recipe(&self, id: &str) -> Result<FetchedRecipe, ApiFailure> {
            self.calls.lock().unwrap().push(Call::Fetch(id.into()));
            self.fetch_result.clone().ok_or(ApiFailure::Status {
                status: 404,
                message: Some("recipe not found".into()),
            })
        }

        async fn create_recipe(&self, draft: &RecipeDraft) -> Result<SavedPost, ApiFailure> {
            self.calls.lock().unwrap().push(Call::Create(draft.clone()));
            self.save_result()
        }

        async fn update_recipe(
            &self,
            id: &str,
            draft: &RecipeDraft,
        ) -> Result<SavedPost, ApiFailure> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(id.into(), draft.clone()));
            self.save_result()
        }
    }

    fn filled_session() -> EditorSession {
        let mut session = EditorSession::new();
        session.set_title("Omelette");
        session.set_content("<p>Crack eggs</p>");
        session.set_tag_list(vec!["eggs".into()]);
        session
    }

    #[tokio::test]
    async fn blank_title_rejects_without_any_request() {
        let backend = MockBackend::default();
        let mut session = EditorSession::new();
        session.set_content("<p>body</p>");

        let outcome = session.save(&backend).await;
        match outcome {
            SaveOutcome::Rejected { focus, notice } => {
                assert_eq!(focus, Field::Title);
                assert_eq!(notice.mode, NoticeMode::Info);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_content_rejects_and_form_stays_editable() {
        let backend = MockBackend::default();
        let mut session = EditorSession::new();
        session.set_title("Omelette");
        session.set_content("   \n");

        let outcome = session.save(&backend).await;
        assert!(matches!(
            outcome,
            SaveOutcome::Rejected {
                focus: Field::Content,
                ..
            }
        ));
        assert!(backend.calls().is_empty());

        // A later attempt with valid content still goes through.
        session.set_content("<p>Crack eggs</p>");
        let outcome = session.save(&backend).await;
        assert!(matches!(outcome, SaveOutcome::Saved { .. }));
    }

    #[tokio::test]
    async fn create_mode_posts_and_navigates_with_post_id() {
        let backend = MockBackend::default();
        let mut session = filled_session();

        let outcome = session.save(&backend).await;
        match outcome {
            SaveOutcome::Saved {
                post_id,
                navigation,
                ..
            } => {
                assert_eq!(post_id, "post-1");
                assert_eq!(
                    navigation,
                    Navigation::RecipeList {
                        post_id: Some("post-1".into())
                    }
                );
            }
            other => panic!("expected save, got {other:?}"),
        }
        assert!(matches!(backend.calls().as_slice(), [Call::Create(_)]));
    }

    #[tokio::test]
    async fn update_mode_patches_the_edit_target() {
        let backend = MockBackend {
            fetch_result: Some(FetchedRecipe {
                title: "Omelette".into(),
                subtitle: None,
                content: "<p>Crack eggs</p>".into(),
                thumbnail_url: Some("https://img.example/o.jpg".into()),
                hashtags: vec!["eggs".into()],
            }),
            ..Default::default()
        };

        let mut session = EditorSession::load(&backend, Some("post-1")).await;
        assert!(session.is_update_mode());
        assert_eq!(session.title(), "Omelette");

        session.set_title("Frittata");
        let outcome = session.save(&backend).await;
        assert!(matches!(outcome, SaveOutcome::Saved { .. }));

        let calls = backend.calls();
        match &calls[..] {
            [Call::Fetch(id), Call::Update(target, draft)] => {
                assert_eq!(id, "post-1");
                assert_eq!(target, "post-1");
                assert_eq!(draft.title, "Frittata");
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_load_falls_back_to_creation_form() {
        let backend = MockBackend::default(); // fetch returns 404
        let session = EditorSession::load(&backend, Some("gone")).await;
        assert!(!session.is_update_mode());
        assert!(session.title().is_empty());
    }

    #[tokio::test]
    async fn missing_edit_id_means_creation_form_without_fetch() {
        let backend = MockBackend::default();
        let session = EditorSession::load(&backend, None).await;
        assert!(!session.is_update_mode());
        assert!(backend.calls().is_empty());

        let session = EditorSession::load(&backend, Some("")).await;
        assert!(!session.is_update_mode());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_routes_to_listing_with_server_message() {
        let backend = MockBackend {
            save_failure: Some((403, Some("only the author may edit this post".into()))),
            ..Default::default()
        };
        let mut session = filled_session();

        let outcome = session.save(&backend).await;
        match outcome {
            SaveOutcome::Failed { notice, navigation } => {
                assert_eq!(notice.mode, NoticeMode::Error);
                assert_eq!(notice.message, "only the author may edit this post");
                assert_eq!(navigation, Navigation::RecipeList { post_id: None });
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn second_save_is_refused_while_outstanding() {
        let backend = MockBackend::default();
        let mut session = filled_session();

        let first = session.save(&backend).await;
        assert!(matches!(first, SaveOutcome::Saved { .. }));

        // The page navigates away after a save; a stray second click is a no-op.
        let second = session.save(&backend).await;
        assert!(matches!(second, SaveOutcome::Busy));
        assert_eq!(backend.calls().len(), 1);
    }

    #[test]
    fn draft_button_opens_placeholder_modal_only() {
        let session = EditorSession::new();
        assert_eq!(session.open_draft_modal(), DraftModal);
    }
}
