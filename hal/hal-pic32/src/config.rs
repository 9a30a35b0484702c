//! UART instance and register-mode configuration
//!
//! Interrupt numbers follow the PIC32MZ EF family, where every UART line has
//! its own source and vector.

use core::fmt;

use hal::error::{HalError, HalResult};
use hal::gpio::{OutputFunction, Port, PortPin};
use hal::interrupt::{InterruptPriority, InterruptSource, InterruptVector};
use hal::uart::{DataBits, FlowControl, Parity, StopBits, UartConfig};

/// Highest interrupt priority level
pub const MAX_PRIORITY: InterruptPriority = 7;

/// Highest interrupt sub-priority level
pub const MAX_SUBPRIORITY: InterruptPriority = 3;

/// Peripheral bus clock the register-mode baud rate is derived from
pub const DEFAULT_PERIPHERAL_CLOCK_HZ: u32 = 80_000_000;

/// USART peripheral instance (1-based, as in the datasheet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UsartId(u8);

impl UsartId {
    pub const USART1: UsartId = UsartId(1);
    pub const USART2: UsartId = UsartId(2);
    pub const USART3: UsartId = UsartId(3);
    pub const USART4: UsartId = UsartId(4);
    pub const USART5: UsartId = UsartId(5);
    pub const USART6: UsartId = UsartId(6);

    /// Number of USART instances on the largest parts
    pub const COUNT: u8 = 6;

    /// Create an instance id from its datasheet number
    pub fn new(number: u8) -> HalResult<Self> {
        if number == 0 || number > Self::COUNT {
            Err(HalError::InvalidParameter)
        } else {
            Ok(UsartId(number))
        }
    }

    /// Datasheet number of the instance
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for UsartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "USART{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UsartId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "USART{}", self.0);
    }
}

/// Interrupt wiring of one USART instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartInterrupts {
    pub transmit: InterruptSource,
    pub receive: InterruptSource,
    pub error: InterruptSource,
    pub vector: InterruptVector,
    pub priority: InterruptPriority,
    pub subpriority: InterruptPriority,
}

impl Default for UartInterrupts {
    fn default() -> Self {
        Self {
            transmit: 114,
            receive: 113,
            error: 112,
            vector: 114,
            priority: MAX_PRIORITY,
            subpriority: 0,
        }
    }
}

/// Hardware instance a UART bring-up targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartInstance {
    pub id: UsartId,
    /// Pin carrying the transmit signal
    pub tx_pin: PortPin,
    /// Output function code that routes the transmit signal to `tx_pin`
    pub tx_function: OutputFunction,
    pub interrupts: UartInterrupts,
}

impl Default for UartInstance {
    /// USART1 transmitting on RPD3
    fn default() -> Self {
        Self {
            id: UsartId::USART1,
            tx_pin: PortPin::new(Port::D, 3),
            tx_function: OutputFunction(0b0001),
            interrupts: UartInterrupts::default(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UartInstance {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{}: TX {} fn {=u8}, vector {=u32} prio {=u8}.{=u8}",
            self.id,
            self.tx_pin,
            self.tx_function.0,
            self.interrupts.vector,
            self.interrupts.priority,
            self.interrupts.subpriority
        );
    }
}

impl UartInstance {
    /// Creates a new instance configuration builder.
    pub fn builder() -> UartInstanceBuilder {
        UartInstanceBuilder::default()
    }

    /// Checks pin and interrupt level ranges.
    pub fn validate(&self) -> HalResult<()> {
        if !self.tx_pin.is_valid() {
            return Err(HalError::InvalidParameter);
        }
        if self.interrupts.priority > MAX_PRIORITY || self.interrupts.subpriority > MAX_SUBPRIORITY {
            return Err(HalError::ConfigurationError);
        }
        Ok(())
    }
}

/// Builder for ergonomic instance configuration construction.
#[derive(Debug, Clone, Default)]
pub struct UartInstanceBuilder {
    instance: UartInstance,
}

impl UartInstanceBuilder {
    /// Sets the USART peripheral.
    pub fn id(mut self, id: UsartId) -> Self {
        self.instance.id = id;
        self
    }

    /// Sets the transmit pin and the output function code that selects the
    /// transmit signal on it.
    pub fn tx_pin(mut self, pin: PortPin, function: OutputFunction) -> Self {
        self.instance.tx_pin = pin;
        self.instance.tx_function = function;
        self
    }

    /// Sets the transmit, receive and error interrupt sources.
    pub fn interrupt_sources(
        mut self,
        transmit: InterruptSource,
        receive: InterruptSource,
        error: InterruptSource,
    ) -> Self {
        self.instance.interrupts.transmit = transmit;
        self.instance.interrupts.receive = receive;
        self.instance.interrupts.error = error;
        self
    }

    /// Sets the interrupt vector and its priority levels.
    pub fn vector(
        mut self,
        vector: InterruptVector,
        priority: InterruptPriority,
        subpriority: InterruptPriority,
    ) -> Self {
        self.instance.interrupts.vector = vector;
        self.instance.interrupts.priority = priority;
        self.instance.interrupts.subpriority = subpriority;
        self
    }

    /// Builds the instance configuration.
    pub fn build(self) -> HalResult<UartInstance> {
        self.instance.validate()?;
        Ok(self.instance)
    }
}

/// General mode switches applied before the peripheral is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneralMode {
    pub autobaud: bool,
    pub loopback: bool,
    pub wake_from_sleep: bool,
    pub irda: bool,
    pub stop_in_idle: bool,
}

/// Receive FIFO fill level that raises the receive interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxFifoThreshold {
    OneChar,
    HalfFull,
    ThreeQuartersFull,
}

/// Transmit FIFO state that raises the transmit interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxFifoThreshold {
    NotFull,
    Idle,
    Empty,
}

/// Which of the USART pins the peripheral drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineUsage {
    TxRx,
    TxRxCts,
    TxRxRts,
    TxRxCtsRts,
}

/// Frame format supported by the PIC32 USART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineControl {
    Mode8N1,
    Mode8N2,
    Mode8E1,
    Mode8E2,
    Mode8O1,
    Mode8O2,
    Mode9N1,
    Mode9N2,
}

#[cfg(feature = "defmt")]
impl defmt::Format for LineControl {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LineControl::Mode8N1 => defmt::write!(fmt, "8N1"),
            LineControl::Mode8N2 => defmt::write!(fmt, "8N2"),
            LineControl::Mode8E1 => defmt::write!(fmt, "8E1"),
            LineControl::Mode8E2 => defmt::write!(fmt, "8E2"),
            LineControl::Mode8O1 => defmt::write!(fmt, "8O1"),
            LineControl::Mode8O2 => defmt::write!(fmt, "8O2"),
            LineControl::Mode9N1 => defmt::write!(fmt, "9N1"),
            LineControl::Mode9N2 => defmt::write!(fmt, "9N2"),
        }
    }
}

impl LineControl {
    /// Frame format for the given line settings.
    ///
    /// The hardware only knows 8-bit frames with optional parity and 9-bit
    /// frames without parity; hardware flow control is not routed by this
    /// bring-up.
    pub fn from_config(config: &UartConfig) -> HalResult<Self> {
        if config.flow_control != FlowControl::None {
            return Err(HalError::NotSupported);
        }
        let mode = match (config.data_bits, config.parity, config.stop_bits) {
            (DataBits::Eight, Parity::None, StopBits::One) => LineControl::Mode8N1,
            (DataBits::Eight, Parity::None, StopBits::Two) => LineControl::Mode8N2,
            (DataBits::Eight, Parity::Even, StopBits::One) => LineControl::Mode8E1,
            (DataBits::Eight, Parity::Even, StopBits::Two) => LineControl::Mode8E2,
            (DataBits::Eight, Parity::Odd, StopBits::One) => LineControl::Mode8O1,
            (DataBits::Eight, Parity::Odd, StopBits::Two) => LineControl::Mode8O2,
            (DataBits::Nine, Parity::None, StopBits::One) => LineControl::Mode9N1,
            (DataBits::Nine, Parity::None, StopBits::Two) => LineControl::Mode9N2,
            _ => return Err(HalError::NotSupported),
        };
        Ok(mode)
    }
}

/// Baud rate generator clock multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudSpeed {
    /// Divide by 4
    High,
    /// Divide by 16
    Standard,
}

#[cfg(feature = "defmt")]
impl defmt::Format for BaudSpeed {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BaudSpeed::High => defmt::write!(fmt, "High"),
            BaudSpeed::Standard => defmt::write!(fmt, "Standard"),
        }
    }
}

impl BaudSpeed {
    pub const fn divider(self) -> u32 {
        match self {
            BaudSpeed::High => 4,
            BaudSpeed::Standard => 16,
        }
    }
}

/// Register-level bring-up settings, used instead of the vendor driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualConfig {
    pub mode: GeneralMode,
    pub rx_threshold: RxFifoThreshold,
    pub tx_threshold: TxFifoThreshold,
    pub usage: LineUsage,
    pub receiver_enabled: bool,
    pub speed: BaudSpeed,
    pub peripheral_clock_hz: u32,
    pub line: UartConfig,
    /// Program vector priority and sub-priority from the instance wiring
    pub program_vector_priority: bool,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            mode: GeneralMode::default(),
            rx_threshold: RxFifoThreshold::OneChar,
            tx_threshold: TxFifoThreshold::NotFull,
            usage: LineUsage::TxRx,
            receiver_enabled: false,
            speed: BaudSpeed::High,
            peripheral_clock_hz: DEFAULT_PERIPHERAL_CLOCK_HZ,
            line: UartConfig::default(),
            program_vector_priority: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instance() {
        let instance = UartInstance::default();
        assert_eq!(instance.id, UsartId::USART1);
        assert_eq!(instance.tx_pin, PortPin::new(Port::D, 3));
        assert_eq!(instance.interrupts.priority, 7);
        assert_eq!(instance.interrupts.subpriority, 0);
    }

    #[test]
    fn test_builder() {
        let instance = UartInstance::builder()
            .id(UsartId::USART2)
            .tx_pin(PortPin::new(Port::B, 14), OutputFunction(0b0010))
            .interrupt_sources(147, 146, 145)
            .vector(147, 5, 2)
            .build()
            .unwrap();

        assert_eq!(instance.id, UsartId::USART2);
        assert_eq!(instance.tx_function, OutputFunction(0b0010));
        assert_eq!(instance.interrupts.receive, 146);
        assert_eq!(instance.interrupts.subpriority, 2);
    }

    #[test]
    fn test_builder_rejects_priority() {
        let result = UartInstance::builder().vector(114, 8, 0).build();
        assert_eq!(result, Err(HalError::ConfigurationError));

        let result = UartInstance::builder().vector(114, 7, 4).build();
        assert_eq!(result, Err(HalError::ConfigurationError));
    }

    #[test]
    fn test_builder_rejects_pin() {
        let result = UartInstance::builder()
            .tx_pin(PortPin::new(Port::D, 16), OutputFunction(1))
            .build();
        assert_eq!(result, Err(HalError::InvalidParameter));
    }

    #[test]
    fn test_usart_id_range() {
        assert!(UsartId::new(0).is_err());
        assert!(UsartId::new(7).is_err());
        assert_eq!(UsartId::new(3).unwrap(), UsartId::USART3);
    }

    #[test]
    fn test_line_control_mapping() {
        let mut config = UartConfig::default();
        assert_eq!(LineControl::from_config(&config), Ok(LineControl::Mode8N1));

        config.parity = Parity::Odd;
        config.stop_bits = StopBits::Two;
        assert_eq!(LineControl::from_config(&config), Ok(LineControl::Mode8O2));

        config.data_bits = DataBits::Nine;
        assert_eq!(LineControl::from_config(&config), Err(HalError::NotSupported));

        config = UartConfig { data_bits: DataBits::Seven, ..UartConfig::default() };
        assert_eq!(LineControl::from_config(&config), Err(HalError::NotSupported));

        config = UartConfig { flow_control: FlowControl::RtsCts, ..UartConfig::default() };
        assert_eq!(LineControl::from_config(&config), Err(HalError::NotSupported));
    }
}
