//! AT command vocabulary
//!
//! Commands are single ASCII lines terminated by `\r\n`. Replies are free
//! text; the session only looks for the literal tokens listed in [`token`].

use core::fmt::Write;

use heapless::String;

/// Longest rendered command line, including the `\r\n` terminator
pub const MAX_COMMAND_LEN: usize = 160;

/// A rendered command line ready to be written to the modem
pub type CommandLine = String<MAX_COMMAND_LEN>;

/// Literal substrings the session looks for in modem replies
pub mod token {
    /// Generic command success
    pub const OK: &str = "OK";
    /// Generic command failure
    pub const ERROR: &str = "ERROR";
    /// Network join failure
    pub const FAIL: &str = "FAIL";
    /// Station associated with the access point
    pub const WIFI_CONNECTED: &str = "WIFI CONNECTED";
    /// Join or connect issued while already associated/connected
    pub const ALREADY_CONNECTED: &str = "ALREADY CONNECTED";
    /// TCP connection opened
    pub const CONNECT: &str = "CONNECT";
    /// Modem is ready to take raw payload bytes
    pub const PROMPT: &str = ">";
    /// HTTP success status line
    pub const HTTP_OK: &str = "200 OK";
    /// Any HTTP/1.1 response header
    pub const HTTP_RESPONSE: &str = "HTTP/1.1";
    /// Modem finished pushing the payload onto the socket
    pub const SEND_OK: &str = "SEND OK";
}

/// Commands understood by the modem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// `AT` - liveness probe
    Attention,
    /// `ATE0` - stop echoing commands back
    EchoOff,
    /// `AT+CWMODE=1` - station mode
    StationMode,
    /// `AT+CIPMUX=0` - single connection mode
    SingleConnection,
    /// `AT+CWJAP="ssid","password"` - join an access point
    JoinNetwork { ssid: &'a str, password: &'a str },
    /// `AT+CIPSTART="TCP","host",port` - open the upload socket
    OpenConnection { host: &'a str, port: u16 },
    /// `AT+CIPSEND=n` - announce an n-byte payload
    SendLength(usize),
    /// `AT+CIPCLOSE` - close the upload socket
    CloseConnection,
}

impl Command<'_> {
    /// Render the command line, including its `\r\n` terminator
    pub fn render(&self) -> Result<CommandLine, core::fmt::Error> {
        let mut line = CommandLine::new();
        match *self {
            Command::Attention => line.push_str("AT").map_err(|_| core::fmt::Error)?,
            Command::EchoOff => line.push_str("ATE0").map_err(|_| core::fmt::Error)?,
            Command::StationMode => line.push_str("AT+CWMODE=1").map_err(|_| core::fmt::Error)?,
            Command::SingleConnection => {
                line.push_str("AT+CIPMUX=0").map_err(|_| core::fmt::Error)?
            }
            Command::JoinNetwork { ssid, password } => {
                write!(line, "AT+CWJAP=\"{}\",\"{}\"", ssid, password)?
            }
            Command::OpenConnection { host, port } => {
                write!(line, "AT+CIPSTART=\"TCP\",\"{}\",{}", host, port)?
            }
            Command::SendLength(len) => write!(line, "AT+CIPSEND={}", len)?,
            Command::CloseConnection => line.push_str("AT+CIPCLOSE").map_err(|_| core::fmt::Error)?,
        }
        line.push_str("\r\n").map_err(|_| core::fmt::Error)?;
        Ok(line)
    }
}
