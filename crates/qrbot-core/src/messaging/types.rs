use crate::domain::{ChatId, ImageRef};

/// One part of an incoming message, in platform order.
#[derive(Clone, Debug)]
pub enum MessagePart {
    Text(String),
    Image(ImageRef),
}

/// Incoming message, already routed to this plugin by the host.
///
/// Platform-specific fields should live in the adapter. `text` is the
/// flattened plain text of the whole message; `parts` keeps the ordered
/// component chain so attachments stay addressable.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parts: Vec<MessagePart>,
}

impl IncomingMessage {
    /// First image part, in part order.
    pub fn first_image(&self) -> Option<&ImageRef> {
        self.parts.iter().find_map(|p| match p {
            MessagePart::Image(r) => Some(r),
            MessagePart::Text(_) => None,
        })
    }
}
