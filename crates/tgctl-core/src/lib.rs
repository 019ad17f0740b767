//! Core domain + application logic for `tgctl`.
//!
//! This crate is intentionally framework-agnostic. The Telegram Bot API lives
//! behind the [`messaging::port::BotApi`] port, implemented in an adapter crate.

pub mod attachments;
pub mod buttons;
pub mod config;
pub mod contacts;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod render;
pub mod target;

pub use errors::{Error, Result};
