/// Chat id replies are delivered to (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Opaque reference to an image held by the chat platform.
///
/// The host's fetch adapter resolves it (a file id or a local cache path);
/// the core never looks inside.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageRef(pub String);
