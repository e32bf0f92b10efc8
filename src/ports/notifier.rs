//! Outbound notification port trait.

use crate::domain::error::RibbonError;

/// Delivers one formatted text message. Failure is reported, never
/// panicked; callers decide whether it is fatal (for scans it is not).
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), RibbonError>;
}
