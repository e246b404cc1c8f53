//! Modem UART on the RP2040 buffered UART driver
//!
//! The UART interrupt moves received bytes into a ring buffer; the
//! receiver here only ever takes what is already there.

use embassy_rp::uart::{self, BufferedUartRx, BufferedUartTx, Error};
use embedded_io::{Read, ReadReady, Write};
use floodgauge_hal::uart::{DataBits, Parity, StopBits};
use floodgauge_hal::{UartConfig, UartRx, UartTx};

/// Translate the shared line settings into an embassy-rp UART config
pub fn line_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

/// Transmit half of the modem UART
pub struct ModemTx {
    tx: BufferedUartTx,
}

impl ModemTx {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }
}

impl UartTx for ModemTx {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(&mut self.tx)
    }
}

/// Receive half of the modem UART
pub struct ModemRx {
    rx: BufferedUartRx,
}

impl ModemRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl UartRx for ModemRx {
    type Error = Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.rx.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.rx.read_ready()? {
            return Ok(0);
        }
        // Returns what is buffered without waiting for more
        self.rx.read(buf)
    }
}
