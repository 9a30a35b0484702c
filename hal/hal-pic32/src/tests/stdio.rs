use crate::config::UartInstance;
use crate::sim::{PlibCall, SimPlib};
use crate::stdio::{set_stderr_uart, set_stdout_uart, RedirectError, Stream};
use crate::uart::Pic32Uart;

#[test]
fn redirect_after_bringup() {
    let mut uart = Pic32Uart::new(SimPlib::new(), UartInstance::default());
    uart.initialize().unwrap();
    let recorded = uart.plib().calls().len();

    assert_eq!(
        set_stdout_uart(1),
        Err(RedirectError::UartFailed {
            stream: Stream::Stdout,
            uart: 1
        })
    );
    assert_eq!(set_stdout_uart(0), Ok(()));
    assert_eq!(set_stderr_uart(0), Ok(()));

    // Redirection leaves the brought-up UART alone.
    assert!(uart.is_initialized());
    assert_eq!(uart.plib().calls().len(), recorded);
    assert_eq!(uart.plib().count(|c| matches!(c, PlibCall::Open(..))), 1);
}
