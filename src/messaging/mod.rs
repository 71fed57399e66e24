//! Outbound client messaging
//!
//! The queue service notifies each newly registered client through a
//! [`NotificationSender`]. Delivery is best effort and never affects the
//! registration itself.

mod error;
mod http;
mod noop;
mod traits;

pub use error::{MessagingError, MessagingResult};
pub use http::{registration_message, HttpSmsSender, SmsSettings};
pub use noop::NoopSender;
pub use traits::NotificationSender;
