//! Recording simulation of the peripheral library
//!
//! Every configuration call is appended to [`SimPlib::calls`] with its
//! arguments, so tests can check what a bring-up did and in which order.
//! Transmitted bytes go through a small FIFO; each poll that finds the FIFO
//! busy shifts one byte out to [`SimPlib::sent`].

use heapless::Vec;

use hal::error::{HalError, HalResult};
use hal::gpio::{Level, OutputFunction, PinMode, PortControl, PortPin};
use hal::interrupt::{InterruptController, InterruptPriority, InterruptSource, InterruptVector};
use hal::uart::{IdleLevel, IoIntent, Line};

use crate::config::{GeneralMode, LineControl, LineUsage, RxFifoThreshold, TxFifoThreshold, UsartId};
use crate::plib::{DriverHandle, UsartDriver, UsartRegisters};

/// Calls kept before further ones are dropped
pub const CALL_CAPACITY: usize = 64;

/// Bytes kept in the shifted-out log
pub const SENT_CAPACITY: usize = 256;

/// Depth of the simulated transmit FIFO
pub const TX_FIFO_DEPTH: usize = 8;

/// One recorded peripheral library call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlibCall {
    SelectConsole(UsartId),
    SetPinMode(PortPin, PinMode),
    WritePin(PortPin, Level),
    RemapOutput(OutputFunction, PortPin),
    SetIdleLevel(UsartId, Line, IdleLevel),
    InitializeMode(UsartId, GeneralMode),
    InitializeOperation(UsartId, RxFifoThreshold, TxFifoThreshold, LineUsage),
    SetLineControl(UsartId, LineControl),
    TransmitterEnable(UsartId),
    ReceiverEnable(UsartId),
    SetBaudHighSpeed(UsartId, bool),
    SetBaudDivisor(UsartId, u16),
    Enable(UsartId),
    EnableSource(InterruptSource),
    DisableSource(InterruptSource),
    SetVectorPriority(InterruptVector, InterruptPriority, InterruptPriority),
    ClearPending(InterruptSource),
    Open(UsartId, IoIntent),
    BaudSet(DriverHandle, u32),
    LineControlSet(DriverHandle, LineControl),
}

/// Simulated peripheral library
#[derive(Debug, Default)]
pub struct SimPlib {
    calls: Vec<PlibCall, CALL_CAPACITY>,
    sent: Vec<u8, SENT_CAPACITY>,
    fifo: Vec<u8, TX_FIFO_DEPTH>,
    levels: Vec<(PortPin, Level), 16>,
    pending: Vec<InterruptSource, 16>,
    next_handle: u32,
    /// Make every driver open return the invalid-handle sentinel
    pub fail_open: bool,
    /// Make every output remap fail
    pub fail_remap: bool,
}

impl SimPlib {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation whose driver open always fails
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// Recorded calls, oldest first
    pub fn calls(&self) -> &[PlibCall] {
        &self.calls
    }

    /// Bytes shifted out of the transmit FIFO, oldest first
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// Bytes still waiting in the transmit FIFO
    pub fn queued(&self) -> usize {
        self.fifo.len()
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&PlibCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(*call)).count()
    }

    /// Index of the first recorded call equal to `call`
    pub fn position(&self, call: &PlibCall) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }

    /// Mark an interrupt source as pending
    pub fn raise(&mut self, source: InterruptSource) {
        if !self.pending.contains(&source) {
            let _ = self.pending.push(source);
        }
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: PlibCall) {
        // Full log: later calls are dropped.
        let _ = self.calls.push(call);
    }

    fn shift_out(&mut self) {
        if !self.fifo.is_empty() {
            let byte = self.fifo.remove(0);
            let _ = self.sent.push(byte);
        }
    }

    fn enqueue(&mut self, byte: u8) -> nb::Result<(), HalError> {
        if self.fifo.is_full() {
            self.shift_out();
            return Err(nb::Error::WouldBlock);
        }
        let _ = self.fifo.push(byte);
        Ok(())
    }

    fn drain_step(&mut self) -> nb::Result<(), HalError> {
        if self.fifo.is_empty() {
            Ok(())
        } else {
            self.shift_out();
            Err(nb::Error::WouldBlock)
        }
    }
}

impl PortControl for SimPlib {
    fn set_pin_mode(&mut self, pin: PortPin, mode: PinMode) -> HalResult<()> {
        if !pin.is_valid() {
            return Err(HalError::InvalidParameter);
        }
        self.record(PlibCall::SetPinMode(pin, mode));
        Ok(())
    }

    fn write_pin(&mut self, pin: PortPin, level: Level) -> HalResult<()> {
        self.record(PlibCall::WritePin(pin, level));
        if let Some(entry) = self.levels.iter_mut().find(|(p, _)| *p == pin) {
            entry.1 = level;
            return Ok(());
        }
        self.levels.push((pin, level)).map_err(|_| HalError::Busy)
    }

    fn read_pin(&self, pin: PortPin) -> HalResult<Level> {
        Ok(self
            .levels
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
            .unwrap_or(Level::Low))
    }

    fn remap_output(&mut self, function: OutputFunction, pin: PortPin) -> HalResult<()> {
        if self.fail_remap {
            return Err(HalError::HardwareError);
        }
        self.record(PlibCall::RemapOutput(function, pin));
        Ok(())
    }
}

impl InterruptController for SimPlib {
    fn enable_source(&mut self, source: InterruptSource) -> HalResult<()> {
        self.record(PlibCall::EnableSource(source));
        Ok(())
    }

    fn disable_source(&mut self, source: InterruptSource) -> HalResult<()> {
        self.record(PlibCall::DisableSource(source));
        Ok(())
    }

    fn set_vector_priority(
        &mut self,
        vector: InterruptVector,
        priority: InterruptPriority,
        subpriority: InterruptPriority,
    ) -> HalResult<()> {
        self.record(PlibCall::SetVectorPriority(vector, priority, subpriority));
        Ok(())
    }

    fn is_pending(&self, source: InterruptSource) -> bool {
        self.pending.contains(&source)
    }

    fn clear_pending(&mut self, source: InterruptSource) -> HalResult<()> {
        self.record(PlibCall::ClearPending(source));
        self.pending.retain(|s| *s != source);
        Ok(())
    }
}

impl UsartRegisters for SimPlib {
    fn select_console(&mut self, id: UsartId) -> HalResult<()> {
        self.record(PlibCall::SelectConsole(id));
        Ok(())
    }

    fn set_idle_level(&mut self, id: UsartId, line: Line, level: IdleLevel) -> HalResult<()> {
        self.record(PlibCall::SetIdleLevel(id, line, level));
        Ok(())
    }

    fn initialize_mode(&mut self, id: UsartId, mode: GeneralMode) -> HalResult<()> {
        self.record(PlibCall::InitializeMode(id, mode));
        Ok(())
    }

    fn initialize_operation(
        &mut self,
        id: UsartId,
        rx_threshold: RxFifoThreshold,
        tx_threshold: TxFifoThreshold,
        usage: LineUsage,
    ) -> HalResult<()> {
        self.record(PlibCall::InitializeOperation(id, rx_threshold, tx_threshold, usage));
        Ok(())
    }

    fn set_line_control(&mut self, id: UsartId, control: LineControl) -> HalResult<()> {
        self.record(PlibCall::SetLineControl(id, control));
        Ok(())
    }

    fn transmitter_enable(&mut self, id: UsartId) -> HalResult<()> {
        self.record(PlibCall::TransmitterEnable(id));
        Ok(())
    }

    fn receiver_enable(&mut self, id: UsartId) -> HalResult<()> {
        self.record(PlibCall::ReceiverEnable(id));
        Ok(())
    }

    fn set_baud_high_speed(&mut self, id: UsartId, high: bool) -> HalResult<()> {
        self.record(PlibCall::SetBaudHighSpeed(id, high));
        Ok(())
    }

    fn set_baud_divisor(&mut self, id: UsartId, divisor: u16) -> HalResult<()> {
        self.record(PlibCall::SetBaudDivisor(id, divisor));
        Ok(())
    }

    fn enable(&mut self, id: UsartId) -> HalResult<()> {
        self.record(PlibCall::Enable(id));
        Ok(())
    }

    fn transmit_byte(&mut self, _id: UsartId, byte: u8) -> nb::Result<(), HalError> {
        self.enqueue(byte)
    }

    fn transmit_idle(&mut self, _id: UsartId) -> nb::Result<(), HalError> {
        self.drain_step()
    }
}

impl UsartDriver for SimPlib {
    fn open(&mut self, id: UsartId, intent: IoIntent) -> HalResult<DriverHandle> {
        self.record(PlibCall::Open(id, intent));
        if self.fail_open {
            return Err(HalError::InvalidHandle);
        }
        self.next_handle += 1;
        Ok(DriverHandle(self.next_handle))
    }

    fn write_byte(&mut self, _handle: DriverHandle, byte: u8) -> nb::Result<(), HalError> {
        self.enqueue(byte)
    }

    fn write_complete(&mut self, _handle: DriverHandle) -> nb::Result<(), HalError> {
        self.drain_step()
    }

    fn baud_set(&mut self, handle: DriverHandle, baud: u32) -> HalResult<()> {
        self.record(PlibCall::BaudSet(handle, baud));
        Ok(())
    }

    fn line_control_set(&mut self, handle: DriverHandle, control: LineControl) -> HalResult<()> {
        self.record(PlibCall::LineControlSet(handle, control));
        Ok(())
    }
}
