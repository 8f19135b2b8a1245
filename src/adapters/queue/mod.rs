//! Notification channel adapters

pub mod local;
pub mod sqs;
pub mod traits;

pub use local::LocalDispatcher;
pub use sqs::SqsDispatcher;
pub use traits::NotificationDispatcher;
