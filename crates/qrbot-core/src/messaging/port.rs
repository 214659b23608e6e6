use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, ImageRef},
    Result,
};

/// Reply delivery port.
///
/// Telegram is the first implementation; the shape is deliberately narrow so
/// other messenger adapters can sit behind the same interface.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Hand a local image file to the messenger.
    ///
    /// The sink may still be reading the file after this returns (upload
    /// queues, retries), so callers must not delete it right away; that is
    /// what deferred cleanup is for.
    async fn send_image_file(&self, chat_id: ChatId, path: &Path) -> Result<()>;
}

/// Image retrieval port.
///
/// Resolves an image reference to raw bytes, whether that means reading a
/// platform cache file or calling a download API. Implementations map their
/// failures to `Error::Download`.
#[async_trait]
pub trait ImageFetch: Send + Sync {
    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>>;
}
