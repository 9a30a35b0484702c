use hal::uart::{IoIntent, Parity, UartConfig, UartPort};
use hal::HalError;

use crate::config::{
    BaudSpeed, GeneralMode, LineControl, LineUsage, ManualConfig, RxFifoThreshold,
    TxFifoThreshold, UartInstance, UsartId,
};
use crate::sim::{PlibCall, SimPlib};
use crate::uart::{Pic32Uart, Transport};

const ID: UsartId = UsartId::USART1;

fn manual_uart(config: &ManualConfig) -> Pic32Uart<SimPlib> {
    let mut uart = Pic32Uart::new(SimPlib::new(), UartInstance::default());
    uart.initialize_manual(config).unwrap();
    uart
}

#[test]
fn register_sequence_follows_pin_setup() {
    let uart = manual_uart(&ManualConfig::default());
    let calls = uart.plib().calls();

    // Console, pin direction, remap and both idle levels come first.
    assert_eq!(calls[0], PlibCall::SelectConsole(ID));
    assert!(matches!(calls[4], PlibCall::SetIdleLevel(..)));

    assert_eq!(
        &calls[5..],
        &[
            PlibCall::InitializeMode(ID, GeneralMode::default()),
            PlibCall::InitializeOperation(
                ID,
                RxFifoThreshold::OneChar,
                TxFifoThreshold::NotFull,
                LineUsage::TxRx
            ),
            PlibCall::SetLineControl(ID, LineControl::Mode8N1),
            PlibCall::TransmitterEnable(ID),
            PlibCall::SetBaudHighSpeed(ID, true),
            PlibCall::SetBaudDivisor(ID, 173),
            PlibCall::DisableSource(114),
            PlibCall::DisableSource(113),
            PlibCall::DisableSource(112),
            PlibCall::Enable(ID),
        ]
    );
    assert_eq!(
        uart.transport(),
        Some(Transport::Registers {
            clock_hz: 80_000_000,
            speed: BaudSpeed::High
        })
    );
}

#[test]
fn register_mode_never_opens_driver() {
    let uart = manual_uart(&ManualConfig::default());
    assert_eq!(uart.plib().count(|c| matches!(c, PlibCall::Open(..))), 0);
    assert_eq!(uart.handle(), None);
}

#[test]
fn enable_is_last() {
    let uart = manual_uart(&ManualConfig::default());
    assert_eq!(uart.plib().calls().last(), Some(&PlibCall::Enable(ID)));
}

#[test]
fn receiver_and_priority_are_opt_in() {
    let config = ManualConfig {
        receiver_enabled: true,
        program_vector_priority: true,
        ..ManualConfig::default()
    };
    let uart = manual_uart(&config);
    let plib = uart.plib();

    let tx = plib.position(&PlibCall::TransmitterEnable(ID)).unwrap();
    let rx = plib.position(&PlibCall::ReceiverEnable(ID)).unwrap();
    assert_eq!(rx, tx + 1);

    let priority = plib.position(&PlibCall::SetVectorPriority(114, 7, 0)).unwrap();
    let first_disable = plib.position(&PlibCall::DisableSource(114)).unwrap();
    assert!(priority < first_disable);
}

#[test]
fn defaults_leave_receiver_and_priority_alone() {
    let uart = manual_uart(&ManualConfig::default());
    let plib = uart.plib();
    assert_eq!(plib.count(|c| matches!(c, PlibCall::ReceiverEnable(_))), 0);
    assert_eq!(plib.count(|c| matches!(c, PlibCall::SetVectorPriority(..))), 0);
}

#[test]
fn standard_speed_divisor() {
    let config = ManualConfig {
        speed: BaudSpeed::Standard,
        line: UartConfig {
            baud_rate: 9_600,
            ..UartConfig::default()
        },
        ..ManualConfig::default()
    };
    let uart = manual_uart(&config);
    let plib = uart.plib();
    assert!(plib.position(&PlibCall::SetBaudHighSpeed(ID, false)).is_some());
    assert!(plib.position(&PlibCall::SetBaudDivisor(ID, 520)).is_some());
}

#[test]
fn bad_baud_touches_no_hardware() {
    let config = ManualConfig {
        line: UartConfig {
            baud_rate: 0,
            ..UartConfig::default()
        },
        ..ManualConfig::default()
    };
    let mut uart = Pic32Uart::new(SimPlib::new(), UartInstance::default());

    assert_eq!(uart.initialize_manual(&config), Err(HalError::ConfigurationError));
    assert!(!uart.is_initialized());
    assert!(uart.plib().calls().is_empty());
}

#[test]
fn unsupported_frame_touches_no_hardware() {
    let config = ManualConfig {
        line: UartConfig {
            data_bits: hal::uart::DataBits::Seven,
            ..UartConfig::default()
        },
        ..ManualConfig::default()
    };
    let mut uart = Pic32Uart::new(SimPlib::new(), UartInstance::default());

    assert_eq!(uart.initialize_manual(&config), Err(HalError::NotSupported));
    assert!(uart.plib().calls().is_empty());
}

#[test]
fn manual_after_driver_bringup_is_rejected() {
    let mut uart = Pic32Uart::new(SimPlib::new(), UartInstance::default());
    uart.initialize().unwrap();

    assert_eq!(
        uart.initialize_manual(&ManualConfig::default()),
        Err(HalError::AlreadyInitialized)
    );
    assert_eq!(
        uart.plib().count(|c| matches!(c, PlibCall::Open(_, i) if *i == IoIntent::WRITE_NONBLOCKING)),
        1
    );
}

#[test]
fn configure_reprograms_registers() {
    let mut uart = manual_uart(&ManualConfig::default());
    uart.plib_mut().clear_calls();

    let line = UartConfig {
        baud_rate: 57_600,
        parity: Parity::Even,
        ..UartConfig::default()
    };
    uart.configure(&line).unwrap();

    assert_eq!(
        uart.plib().calls(),
        &[
            PlibCall::SetLineControl(ID, LineControl::Mode8E1),
            PlibCall::SetBaudDivisor(ID, 346),
        ]
    );
    assert_eq!(uart.line_config(), &line);
}
