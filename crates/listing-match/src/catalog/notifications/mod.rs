//! Turns demand matches into pending notification records.

mod emitter;
mod format;
mod messaging;

pub use emitter::{NotificationEmitter, NotificationId, NotificationRecord};
pub use format::PriceFormatter;
pub use messaging::{MessagingChannel, WhatsAppChannel};
