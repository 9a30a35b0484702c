//! Baud rate generator divisor computation
//!
//! `baud = clock / (divider * (BRG + 1))` where the divider is 4 for the
//! high-speed generator and 16 for the standard one.

use hal::HalError;
use thiserror::Error;

use crate::config::BaudSpeed;

/// Largest accepted deviation from the requested rate, in tenths of a percent
pub const MAX_ERROR_PERMILLE: u32 = 20;

/// Errors raised while deriving a divisor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRateError {
    #[error("baud rate must be non-zero")]
    ZeroBaud,
    #[error("peripheral clock must be non-zero")]
    ZeroClock,
    #[error("{0} baud is too fast for the peripheral clock")]
    TooFast(u32),
    #[error("{0} baud is too slow for a 16-bit divisor")]
    TooSlow(u32),
    #[error("closest rate misses the request by {0} permille")]
    Tolerance(u32),
}

impl From<BaudRateError> for HalError {
    fn from(_: BaudRateError) -> Self {
        HalError::ConfigurationError
    }
}

/// Computed generator setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudDivisor {
    /// Value for the BRG register
    pub divisor: u16,
    /// Rate the line actually runs at
    pub actual: u32,
}

impl BaudDivisor {
    /// Closest divisor for `baud`, rejected if it lands outside the tolerance.
    pub fn compute(clock_hz: u32, baud: u32, speed: BaudSpeed) -> Result<Self, BaudRateError> {
        if baud == 0 {
            return Err(BaudRateError::ZeroBaud);
        }
        if clock_hz == 0 {
            return Err(BaudRateError::ZeroClock);
        }

        let step = u64::from(speed.divider()) * u64::from(baud);
        let ticks = (u64::from(clock_hz) + step / 2) / step;
        if ticks == 0 {
            return Err(BaudRateError::TooFast(baud));
        }
        let divisor = u16::try_from(ticks - 1).map_err(|_| BaudRateError::TooSlow(baud))?;

        let actual = (u64::from(clock_hz) / (u64::from(speed.divider()) * ticks)) as u32;
        let error = u64::from(actual.abs_diff(baud)) * 1000 / u64::from(baud);
        if error > u64::from(MAX_ERROR_PERMILLE) {
            return Err(BaudRateError::Tolerance(error as u32));
        }

        Ok(Self { divisor, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_speed_115200_at_80mhz() {
        let setting = BaudDivisor::compute(80_000_000, 115_200, BaudSpeed::High).unwrap();
        assert_eq!(setting.divisor, 173);
        assert_eq!(setting.actual, 114_942);
    }

    #[test]
    fn test_standard_speed_9600_at_80mhz() {
        let setting = BaudDivisor::compute(80_000_000, 9_600, BaudSpeed::Standard).unwrap();
        assert_eq!(setting.divisor, 520);
        assert_eq!(setting.actual, 9_596);
    }

    #[test]
    fn test_zero_inputs() {
        assert_eq!(
            BaudDivisor::compute(80_000_000, 0, BaudSpeed::High),
            Err(BaudRateError::ZeroBaud)
        );
        assert_eq!(
            BaudDivisor::compute(0, 115_200, BaudSpeed::High),
            Err(BaudRateError::ZeroClock)
        );
    }

    #[test]
    fn test_too_fast() {
        assert_eq!(
            BaudDivisor::compute(1_000_000, 1_000_000, BaudSpeed::Standard),
            Err(BaudRateError::TooFast(1_000_000))
        );
    }

    #[test]
    fn test_too_slow() {
        assert_eq!(
            BaudDivisor::compute(80_000_000, 50, BaudSpeed::High),
            Err(BaudRateError::TooSlow(50))
        );
    }

    #[test]
    fn test_tolerance() {
        // 1 MHz / 4 / 3 ≈ 83333, far from 100000
        assert_eq!(
            BaudDivisor::compute(1_000_000, 100_000, BaudSpeed::High),
            Err(BaudRateError::Tolerance(166))
        );
    }

    #[test]
    fn test_converts_to_hal_error() {
        assert_eq!(HalError::from(BaudRateError::ZeroBaud), HalError::ConfigurationError);
    }
}
