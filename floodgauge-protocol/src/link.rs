//! Byte transport to the modem

/// Serial link to the Wi-Fi modem
///
/// The receive side is fed by an interrupt into a ring buffer; `try_recv`
/// only drains what is already there. Sending may busy-wait on the UART
/// FIFO but always completes in bounded time.
pub trait ModemLink {
    /// Queue bytes for transmission
    fn send(&mut self, bytes: &[u8]);

    /// Take the next received byte, if any
    fn try_recv(&mut self) -> Option<u8>;
}
