//! UART (Universal Asynchronous Receiver/Transmitter) abstraction

use bitflags::bitflags;

use crate::error::HalResult;

/// UART data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// UART parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// UART flow control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    RtsCts,
}

/// UART configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Serial line direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Receiver,
    Transmitter,
}

/// Logic level a line rests at between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleLevel {
    /// Hardware default, mark = logical 1
    High,
    /// Inverted line
    Low,
}

bitflags! {
    /// Access intent requested when opening a driver instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IoIntent: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const BLOCKING = 1 << 2;
        const NONBLOCKING = 1 << 3;
        const EXCLUSIVE = 1 << 4;
    }
}

impl IoIntent {
    /// Write-only, non-blocking access
    pub const WRITE_NONBLOCKING: Self = Self::WRITE.union(Self::NONBLOCKING);
}

/// UART peripheral trait
pub trait UartPort {
    /// Configure UART parameters
    fn configure(&mut self, config: &UartConfig) -> HalResult<()>;

    /// Write data (blocking)
    fn write(&mut self, data: &[u8]) -> HalResult<usize>;

    /// Read data (blocking with timeout in milliseconds)
    fn read(&mut self, buffer: &mut [u8], timeout_ms: u32) -> HalResult<usize>;

    /// Bytes available in RX buffer
    fn available(&self) -> usize;

    /// Flush TX buffer
    fn flush(&mut self) -> HalResult<()>;
}
