//! Process-wide home for the console UART
//!
//! A board declares one `static` slot and stores its brought-up UART in it:
//!
//! ```ignore
//! static CONSOLE: UartSlot<BoardPlib> = UartSlot::new();
//!
//! let mut uart = Pic32Uart::new(BoardPlib::take(), UartInstance::default());
//! uart.initialize()?;
//! CONSOLE.init(uart)?;
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use hal::error::{HalError, HalResult};

use crate::plib::Plib;
use crate::uart::Pic32Uart;

/// Slot holding at most one initialized UART context
pub struct UartSlot<P: Plib> {
    inner: Mutex<RefCell<Option<Pic32Uart<P>>>>,
}

impl<P: Plib> UartSlot<P> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store a brought-up context.
    ///
    /// Fails with `NotInitialized` if `uart` has not been brought up, with
    /// `AlreadyInitialized` if the slot is taken and with `Busy` when called
    /// from inside [`with`](Self::with); the rejected context is dropped.
    pub fn init(&self, uart: Pic32Uart<P>) -> HalResult<()> {
        if !uart.is_initialized() {
            return Err(HalError::NotInitialized);
        }
        critical_section::with(|cs| {
            let mut slot = self
                .inner
                .borrow(cs)
                .try_borrow_mut()
                .map_err(|_| HalError::Busy)?;
            if slot.is_some() {
                return Err(HalError::AlreadyInitialized);
            }
            *slot = Some(uart);
            Ok(())
        })
    }

    /// True once a context is stored. A context lent out through
    /// [`with`](Self::with) counts as stored.
    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| match self.inner.borrow(cs).try_borrow() {
            Ok(slot) => slot.is_some(),
            Err(_) => true,
        })
    }

    /// Run `f` on the stored context inside a critical section.
    ///
    /// Not re-entrant: a nested `with` or `init` on the same slot from inside
    /// `f` returns `Busy` instead of running.
    pub fn with<R>(&self, f: impl FnOnce(&mut Pic32Uart<P>) -> R) -> HalResult<R> {
        critical_section::with(|cs| {
            let mut slot = self
                .inner
                .borrow(cs)
                .try_borrow_mut()
                .map_err(|_| HalError::Busy)?;
            slot.as_mut().map(f).ok_or(HalError::NotInitialized)
        })
    }
}

impl<P: Plib> Default for UartSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}
