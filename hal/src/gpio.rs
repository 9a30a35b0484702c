//! GPIO (General Purpose Input/Output) abstraction

use core::fmt;

use crate::error::HalResult;

/// GPIO port channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
}

impl Port {
    /// Port letter as printed in datasheets
    pub const fn letter(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
            Port::H => 'H',
            Port::J => 'J',
            Port::K => 'K',
        }
    }
}

/// A single pin, addressed by port channel and bit position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PortPin {
    pub port: Port,
    pub bit: u8,
}

impl PortPin {
    /// Highest bit position on a port
    pub const MAX_BIT: u8 = 15;

    /// Create a pin without validation (const fn)
    pub const fn new(port: Port, bit: u8) -> Self {
        Self { port, bit }
    }

    /// Check that the bit position exists on a 16-bit port
    pub const fn is_valid(self) -> bool {
        self.bit <= Self::MAX_BIT
    }
}

impl fmt::Display for PortPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}{}", self.port.letter(), self.bit)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PortPin {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "R{}{}", self.port.letter(), self.bit);
    }
}

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Input (floating)
    Input,
    /// Input with pull-up resistor
    InputPullUp,
    /// Input with pull-down resistor
    InputPullDown,
    /// Output (push-pull)
    Output,
    /// Output (open-drain)
    OutputOpenDrain,
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

/// Vendor code of a peripheral output signal that can be routed to a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFunction(pub u8);

/// Port controller: pin direction, level and output remapping
pub trait PortControl {
    /// Configure pin mode
    fn set_pin_mode(&mut self, pin: PortPin, mode: PinMode) -> HalResult<()>;

    /// Write level (for output pins)
    fn write_pin(&mut self, pin: PortPin, level: Level) -> HalResult<()>;

    /// Read current level
    fn read_pin(&self, pin: PortPin) -> HalResult<Level>;

    /// Route a peripheral output signal to a pin
    fn remap_output(&mut self, function: OutputFunction, pin: PortPin) -> HalResult<()>;

    /// Toggle output
    fn toggle_pin(&mut self, pin: PortPin) -> HalResult<()> {
        let new_level = match self.read_pin(pin)? {
            Level::Low => Level::High,
            Level::High => Level::Low,
        };
        self.write_pin(pin, new_level)
    }
}
