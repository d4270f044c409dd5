//! Headless client for the recipe editor: an HTTP API client plus the
//! save-flow state machine the browser edit page runs. Kept transport-
//! agnostic behind [`api::RecipeBackend`] so the flow is testable without
//! a network.

pub mod api;
pub mod editor;

pub use api::{ApiFailure, RecipeApi, RecipeBackend, RecipeDraft};
pub use editor::{EditorSession, Field, Navigation, Notice, NoticeMode, SaveOutcome};
