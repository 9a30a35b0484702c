//! PIC32 UART bring-up and polled transmit

use core::fmt;

use hal::error::{HalError, HalResult};
use hal::gpio::PinMode;
use hal::uart::{IdleLevel, IoIntent, Line, UartConfig, UartPort};
use log::{debug, error, info, warn};

use crate::baud::BaudDivisor;
use crate::config::{BaudSpeed, LineControl, ManualConfig, UartInstance};
use crate::plib::{DriverHandle, Plib};

/// How bytes reach the transmit FIFO once the UART is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Through an open vendor driver session
    Driver(DriverHandle),
    /// Straight into the USART registers
    Registers { clock_hz: u32, speed: BaudSpeed },
}

#[cfg(feature = "defmt")]
impl defmt::Format for Transport {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Transport::Driver(handle) => defmt::write!(fmt, "Driver({})", handle),
            Transport::Registers { clock_hz, speed } => {
                defmt::write!(fmt, "Registers({=u32} Hz, {})", *clock_hz, speed)
            }
        }
    }
}

/// Owned hardware context for one UART instance.
///
/// Holds the peripheral library, the instance wiring and, after bring-up,
/// the transport used for transmission. Bring-up runs at most once per
/// context; there is no teardown.
pub struct Pic32Uart<P: Plib> {
    plib: P,
    instance: UartInstance,
    transport: Option<Transport>,
    line: UartConfig,
}

impl<P: Plib> Pic32Uart<P> {
    /// Create an uninitialized context. Touches no hardware.
    pub fn new(plib: P, instance: UartInstance) -> Self {
        Self {
            plib,
            instance,
            transport: None,
            line: UartConfig::default(),
        }
    }

    pub fn instance(&self) -> &UartInstance {
        &self.instance
    }

    pub fn is_initialized(&self) -> bool {
        self.transport.is_some()
    }

    pub fn transport(&self) -> Option<Transport> {
        self.transport
    }

    /// Driver handle, if the UART was brought up through the vendor driver
    pub fn handle(&self) -> Option<DriverHandle> {
        match self.transport {
            Some(Transport::Driver(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Line settings currently programmed
    pub fn line_config(&self) -> &UartConfig {
        &self.line
    }

    pub fn plib(&self) -> &P {
        &self.plib
    }

    pub fn plib_mut(&mut self) -> &mut P {
        &mut self.plib
    }

    /// Give the peripheral library back; the UART stays configured.
    pub fn release(self) -> P {
        self.plib
    }

    /// Bring the UART up for write-only, non-blocking transmission through
    /// the vendor driver.
    ///
    /// Steps that already ran are not rolled back when a later one fails.
    /// A failed driver open leaves the context uninitialized so bring-up can
    /// be retried.
    pub fn initialize(&mut self) -> HalResult<()> {
        self.ensure_uninitialized()?;
        self.instance.validate()?;
        self.route_pins()?;

        let id = self.instance.id;
        let handle = self.plib.open(id, IoIntent::WRITE_NONBLOCKING).map_err(|err| {
            error!("{}: driver open failed: {}", id, err);
            err
        })?;

        self.transport = Some(Transport::Driver(handle));
        info!("{}: up, driver handle {:#x}", id, handle.0);
        Ok(())
    }

    /// Bring the UART up by programming the USART registers directly.
    ///
    /// Interrupt sources stay disabled; transmission is polled.
    pub fn initialize_manual(&mut self, config: &ManualConfig) -> HalResult<()> {
        self.ensure_uninitialized()?;
        self.instance.validate()?;

        let control = LineControl::from_config(&config.line)?;
        let baud = BaudDivisor::compute(
            config.peripheral_clock_hz,
            config.line.baud_rate,
            config.speed,
        )?;

        self.route_pins()?;

        let id = self.instance.id;
        let irq = self.instance.interrupts;

        self.plib.initialize_mode(id, config.mode)?;
        self.plib
            .initialize_operation(id, config.rx_threshold, config.tx_threshold, config.usage)?;
        self.plib.set_line_control(id, control)?;

        self.plib.transmitter_enable(id)?;
        if config.receiver_enabled {
            self.plib.receiver_enable(id)?;
        }

        self.plib.set_baud_high_speed(id, config.speed == BaudSpeed::High)?;
        self.plib.set_baud_divisor(id, baud.divisor)?;
        debug!(
            "{}: divisor {} for {} baud (actual {})",
            id, baud.divisor, config.line.baud_rate, baud.actual
        );

        if config.program_vector_priority {
            self.plib.set_vector_priority(irq.vector, irq.priority, irq.subpriority)?;
        }

        self.plib.disable_source(irq.transmit)?;
        self.plib.disable_source(irq.receive)?;
        self.plib.disable_source(irq.error)?;

        self.plib.enable(id)?;

        self.transport = Some(Transport::Registers {
            clock_hz: config.peripheral_clock_hz,
            speed: config.speed,
        });
        self.line = config.line.clone();
        info!("{}: up, register mode", id);
        Ok(())
    }

    /// Queue one byte for transmission without waiting.
    pub fn write_byte(&mut self, byte: u8) -> nb::Result<(), HalError> {
        match self.transport {
            Some(Transport::Driver(handle)) => self.plib.write_byte(handle, byte),
            Some(Transport::Registers { .. }) => self.plib.transmit_byte(self.instance.id, byte),
            None => Err(nb::Error::Other(HalError::NotInitialized)),
        }
    }

    /// Completes once every queued byte has been shifted out.
    pub fn transmit_complete(&mut self) -> nb::Result<(), HalError> {
        match self.transport {
            Some(Transport::Driver(handle)) => self.plib.write_complete(handle),
            Some(Transport::Registers { .. }) => self.plib.transmit_idle(self.instance.id),
            None => Err(nb::Error::Other(HalError::NotInitialized)),
        }
    }

    fn ensure_uninitialized(&self) -> HalResult<()> {
        if self.transport.is_some() {
            warn!("{}: bring-up requested twice", self.instance.id);
            return Err(HalError::AlreadyInitialized);
        }
        Ok(())
    }

    /// Console selection, transmit pin routing and idle polarity.
    fn route_pins(&mut self) -> HalResult<()> {
        let id = self.instance.id;
        let pin = self.instance.tx_pin;

        self.plib.select_console(id)?;

        self.plib.set_pin_mode(pin, PinMode::Output)?;
        self.plib.remap_output(self.instance.tx_function, pin)?;
        debug!("{}: TX routed to {}", id, pin);

        // Idle level follows the hardware default: line high when quiet.
        self.plib.set_idle_level(id, Line::Receiver, IdleLevel::High)?;
        self.plib.set_idle_level(id, Line::Transmitter, IdleLevel::High)?;
        Ok(())
    }
}

impl<P: Plib> UartPort for Pic32Uart<P> {
    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        let control = LineControl::from_config(config)?;
        if config.baud_rate == 0 {
            return Err(HalError::ConfigurationError);
        }

        match self.transport {
            Some(Transport::Driver(handle)) => {
                self.plib.line_control_set(handle, control)?;
                self.plib.baud_set(handle, config.baud_rate)?;
            }
            Some(Transport::Registers { clock_hz, speed }) => {
                // Generator speed stays as chosen at bring-up.
                let id = self.instance.id;
                let baud = BaudDivisor::compute(clock_hz, config.baud_rate, speed)?;
                self.plib.set_line_control(id, control)?;
                self.plib.set_baud_divisor(id, baud.divisor)?;
            }
            None => return Err(HalError::NotInitialized),
        }

        self.line = config.clone();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> HalResult<usize> {
        for &byte in data {
            nb::block!(self.write_byte(byte))?;
        }
        Ok(data.len())
    }

    fn read(&mut self, _buffer: &mut [u8], _timeout_ms: u32) -> HalResult<usize> {
        // Opened with write intent only.
        Err(HalError::NotSupported)
    }

    fn available(&self) -> usize {
        0
    }

    fn flush(&mut self) -> HalResult<()> {
        nb::block!(self.transmit_complete())
    }
}

impl<P: Plib> fmt::Write for Pic32Uart<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        UartPort::write(self, s.as_bytes()).map(|_| ()).map_err(|_| fmt::Error)
    }
}
