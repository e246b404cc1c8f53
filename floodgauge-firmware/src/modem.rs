//! Wi-Fi modem link over the buffered UART

use defmt::*;
use floodgauge_hal::{UartRx, UartTx};
use floodgauge_protocol::ModemLink;

/// Adapts the UART halves to the session's byte link
///
/// Transport errors are logged and dropped; the session deadlines turn a
/// lost command into a retry.
pub struct ModemPort<T, R> {
    tx: T,
    rx: R,
}

impl<T: UartTx, R: UartRx> ModemPort<T, R> {
    pub fn new(tx: T, rx: R) -> Self {
        Self { tx, rx }
    }
}

impl<T, R> ModemLink for ModemPort<T, R>
where
    T: UartTx,
    R: UartRx,
    T::Error: Format,
    R::Error: Format,
{
    fn send(&mut self, bytes: &[u8]) {
        if let Err(e) = self.tx.write_blocking(bytes) {
            warn!("Modem UART write failed: {}", e);
        }
    }

    fn try_recv(&mut self) -> Option<u8> {
        match self.rx.try_read_byte() {
            Ok(byte) => byte,
            Err(e) => {
                warn!("Modem UART read failed: {}", e);
                None
            }
        }
    }
}
