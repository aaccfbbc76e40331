//! Chat message delivery.
//!
//! Rendered webhook messages are handed to a [`MessageSender`]. The production
//! sender talks to a Matrix homeserver; tests plug in their own implementation.

mod markdown;
mod matrix;
mod types;

pub use markdown::to_html;
pub use matrix::MatrixSender;
pub use types::{DeliveryError, DeliveryReceipt, MessageKind, MessageSender, OutgoingMessage};
