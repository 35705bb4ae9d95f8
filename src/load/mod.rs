/// Image fetching module
///
/// This module is the platform side of the widget: it owns the decoded
/// images and answers the two questions the state machine asks, "is this
/// source already available?" and "fetch this source for me".

use async_trait::async_trait;
use iced::widget::image::Handle;
use thiserror::Error;

pub mod loader;

pub use loader::WebImageLoader;

/// Errors that can occur while fetching a source.
///
/// The widget collapses all of these into the `error` status; callers never
/// see them synchronously.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("task join error: {0}")]
    Join(String),
}

/// Platform image primitive.
///
/// The state machine only ever talks to this trait, so tests can drive it
/// with a fake whose availability and completions are fully controlled.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// True when `src` can be shown right now, without a fetch.
    fn is_ready(&self, src: &str) -> bool;

    /// Decoded handle for `src`, if it is in memory.
    fn get(&self, src: &str) -> Option<Handle>;

    /// Fetch and decode `src`. On success the decoded handle is retained in
    /// memory, making `src` ready for `is_ready`/`get`.
    async fn fetch(&self, src: String) -> Result<(), LoadError>;
}
