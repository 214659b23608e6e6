//! Host-facing abstractions (Telegram today; other messengers later).

pub mod port;
pub mod types;
