//! Bot API abstractions (Telegram today; the port keeps the CLI adapter-agnostic).

pub mod client;
pub mod port;
pub mod types;
