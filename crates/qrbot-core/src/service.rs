//! Request handling for the two commands: generate a QR image from a URL in
//! the message, and decode a QR image back to text.
//!
//! Each flow is a linear state machine. Internal failures are converted to
//! user-facing replies here; only a failing reply sink bubbles out as `Err`.

use std::{
    path::PathBuf,
    sync::{Arc, OnceLock},
};

use regex::Regex;
use tracing::{info, warn};

use crate::{
    config::Config,
    errors::Error,
    messaging::{
        port::{ImageFetch, ReplySink},
        types::IncomingMessage,
    },
    qr,
    tempfiles::TempStore,
    Result,
};

const REPLY_PROVIDE_LINK: &str = "⚠️ Please provide a valid link, e.g. /qr https://example.com";
const REPLY_GENERATE_FAILED: &str = "❌ QR code generation failed. Check the link and try again.";
const REPLY_SEND_IMAGE: &str = "⚠️ Please send a QR code image.";
const REPLY_DOWNLOAD_FAILED: &str = "❌ Failed to download the image.";
const REPLY_NO_QR_FOUND: &str = "❌ No QR code detected, or it could not be read.";
const REPLY_DECODE_FAILED: &str = "❌ Something went wrong while decoding the image.";
const REPLY_DECODE_DISABLED: &str = "⚠️ QR decoding is disabled on this bot.";

fn url_pattern() -> &'static Regex {
    static URL_PATTERN: OnceLock<Regex> = OnceLock::new();
    URL_PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("valid regex"))
}

/// First `http(s)://` run of non-whitespace characters in `text`.
pub fn extract_url(text: &str) -> Option<&str> {
    url_pattern().find(text).map(|m| m.as_str())
}

/// The request handler both commands route into.
pub struct QrService {
    cfg: Arc<Config>,
    store: Arc<TempStore>,
}

impl QrService {
    pub fn new(cfg: Arc<Config>, store: Arc<TempStore>) -> Self {
        Self { cfg, store }
    }

    /// Service with its own store rooted at `cfg.temp_dir`.
    pub fn from_config(cfg: Arc<Config>) -> Result<Self> {
        let store = Arc::new(TempStore::from_config(&cfg)?);
        Ok(Self::new(cfg, store))
    }

    /// `/qr`: extract a URL from the message text, render it as a QR image
    /// file, hand the path to the sink, then schedule the deferred delete.
    pub async fn handle_generate(&self, msg: &IncomingMessage, sink: &dyn ReplySink) -> Result<()> {
        match self.generate(msg, sink).await {
            Ok(()) => Ok(()),
            Err(Error::Validation(_)) => sink.send_text(msg.chat_id, REPLY_PROVIDE_LINK).await,
            Err(e) => {
                warn!(error = %e, chat_id = msg.chat_id.0, "qr generation failed");
                sink.send_text(msg.chat_id, REPLY_GENERATE_FAILED).await
            }
        }
    }

    async fn generate(&self, msg: &IncomingMessage, sink: &dyn ReplySink) -> Result<()> {
        let url = extract_url(&msg.text)
            .ok_or_else(|| Error::Validation("message contains no http(s) link".to_string()))?;

        // Render before touching the filesystem: an encode failure must not
        // leave a file behind.
        let img = qr::render(url, &self.cfg.qr)?;
        let bytes = qr::to_jpeg_bytes(&img)?;
        let path = self.write_temp(&bytes).await?;

        if let Err(e) = sink.send_image_file(msg.chat_id, &path).await {
            self.store.delete_now(&path).await;
            return Err(e);
        }

        info!(chat_id = msg.chat_id.0, url, "qr image sent");
        self.store.schedule_cleanup(path);
        Ok(())
    }

    /// `/qr_decode`: fetch the first attached image, decode the first QR
    /// symbol in it, reply with the text. The temp copy is deleted before
    /// the reply goes out, whatever the outcome.
    pub async fn handle_decode(
        &self,
        msg: &IncomingMessage,
        fetcher: &dyn ImageFetch,
        sink: &dyn ReplySink,
    ) -> Result<()> {
        if !self.cfg.decode_enabled {
            return sink.send_text(msg.chat_id, REPLY_DECODE_DISABLED).await;
        }

        match self.decode(msg, fetcher).await {
            Ok(Some(text)) => {
                info!(chat_id = msg.chat_id.0, "qr decoded");
                sink.send_text(msg.chat_id, &format!("✅ Decoded: {text}"))
                    .await
            }
            Ok(None) => sink.send_text(msg.chat_id, REPLY_NO_QR_FOUND).await,
            Err(Error::Validation(_)) => sink.send_text(msg.chat_id, REPLY_SEND_IMAGE).await,
            Err(e @ Error::Download(_)) => {
                warn!(error = %e, chat_id = msg.chat_id.0, "image download failed");
                sink.send_text(msg.chat_id, REPLY_DOWNLOAD_FAILED).await
            }
            Err(e) => {
                warn!(error = %e, chat_id = msg.chat_id.0, "qr decode failed");
                sink.send_text(msg.chat_id, REPLY_DECODE_FAILED).await
            }
        }
    }

    async fn decode(
        &self,
        msg: &IncomingMessage,
        fetcher: &dyn ImageFetch,
    ) -> Result<Option<String>> {
        let image_ref = msg
            .first_image()
            .ok_or_else(|| Error::Validation("message has no image part".to_string()))?;

        let bytes = fetcher.fetch(image_ref).await?;
        let path = self.write_temp(&bytes).await?;

        let decoded = qr::decode_file(&path);
        // Never handed off, so no deferred dance: delete before replying.
        self.store.delete_now(&path).await;
        Ok(decoded)
    }

    async fn write_temp(&self, bytes: &[u8]) -> Result<PathBuf> {
        let file = self.store.create(".jpg").await?;
        let path = file.path().to_path_buf();
        match file.write(bytes).await {
            Ok(path) => Ok(path),
            Err(e) => {
                self.store.delete_now(&path).await;
                Err(e)
            }
        }
    }
}
