//! Interrupt controller abstraction

use crate::error::HalResult;

/// Interrupt source (request) number
pub type InterruptSource = u32;

/// Interrupt vector number
pub type InterruptVector = u32;

/// Interrupt priority (higher value = higher priority on PIC32, 0 disables)
pub type InterruptPriority = u8;

/// Interrupt controller abstraction
pub trait InterruptController {
    /// Enable interrupt source
    fn enable_source(&mut self, source: InterruptSource) -> HalResult<()>;

    /// Disable interrupt source
    fn disable_source(&mut self, source: InterruptSource) -> HalResult<()>;

    /// Set vector priority and sub-priority
    fn set_vector_priority(
        &mut self,
        vector: InterruptVector,
        priority: InterruptPriority,
        subpriority: InterruptPriority,
    ) -> HalResult<()>;

    /// Check if interrupt source is pending
    fn is_pending(&self, source: InterruptSource) -> bool;

    /// Clear pending interrupt source
    fn clear_pending(&mut self, source: InterruptSource) -> HalResult<()>;
}
