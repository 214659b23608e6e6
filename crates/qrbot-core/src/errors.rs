/// Core error type for the plugin.
///
/// Adapter crates should map their transport errors into this type so the
/// request handler can turn failures into user-facing replies consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("payload too large for qr version {version}: {len} bytes")]
    PayloadTooLarge { version: u8, len: usize },

    #[error("qr encode error: {0}")]
    Encode(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("download error: {0}")]
    Download(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
