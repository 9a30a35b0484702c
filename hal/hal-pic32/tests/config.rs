//! Instance configuration and baud rate tests for hal-pic32

use hal::gpio::{OutputFunction, Port, PortPin};
use hal::HalError;
use hal_pic32::baud::{BaudDivisor, BaudRateError};
use hal_pic32::config::{BaudSpeed, ManualConfig, UartInstance, UsartId};

#[test]
fn test_default_instance_is_usart1_on_rpd3() {
    let instance = UartInstance::default();
    assert_eq!(instance.id, UsartId::USART1);
    assert_eq!(instance.tx_pin.to_string(), "RD3");
    assert_eq!(instance.id.to_string(), "USART1");
}

#[test]
fn test_builder_keeps_unset_fields() {
    let instance = UartInstance::builder()
        .tx_pin(PortPin::new(Port::F, 5), OutputFunction(0b0011))
        .build()
        .unwrap();
    assert_eq!(instance.id, UsartId::USART1);
    assert_eq!(instance.interrupts, UartInstance::default().interrupts);
}

#[test]
fn test_manual_defaults() {
    let config = ManualConfig::default();
    assert_eq!(config.peripheral_clock_hz, 80_000_000);
    assert_eq!(config.line.baud_rate, 115_200);
    assert_eq!(config.speed, BaudSpeed::High);
    assert!(!config.receiver_enabled);
    assert!(!config.program_vector_priority);
}

#[test]
fn test_default_manual_config_has_valid_divisor() {
    let config = ManualConfig::default();
    let setting =
        BaudDivisor::compute(config.peripheral_clock_hz, config.line.baud_rate, config.speed)
            .unwrap();
    assert_eq!(setting.divisor, 173);
}

#[test]
fn test_baud_error_maps_to_configuration_error() {
    let err: HalError = BaudRateError::TooFast(10_000_000).into();
    assert_eq!(err, HalError::ConfigurationError);
    assert_eq!(
        BaudRateError::TooFast(10_000_000).to_string(),
        "10000000 baud is too fast for the peripheral clock"
    );
}
