//! The integration point for detection sources.

use async_trait::async_trait;

use trafficwatch_core::error::AppError;

use crate::notification::Notification;

/// Source of incident notifications, polled once per emitter tick.
///
/// Returning `Ok(None)` means nothing was detected on this tick. An `Err`
/// abandons the tick without broadcasting anything.
#[async_trait]
pub trait NotificationProducer: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Produce zero or one notification.
    async fn produce(&self) -> Result<Option<Notification>, AppError>;
}
