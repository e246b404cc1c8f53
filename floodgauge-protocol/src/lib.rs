//! Wi-Fi modem upload protocol
//!
//! This crate drives an ESP8266-class serial Wi-Fi modem through its
//! AT-command dialect and tunnels a single HTTP GET per upload through it.
//! Everything is nonblocking: bytes from the modem are appended to a bounded
//! response buffer, and [`WifiSession::poll`] matches that text against the
//! tokens the current state is waiting for.
//!
//! # Session Overview
//!
//! ```text
//!  begin()
//!    │
//!    ▼
//!  AT ─► ATE0 ─► CWMODE=1 ─► CIPMUX=0 ─► CWJAP ─► READY ◄──────────────┐
//!                                                  │                    │
//!                                   request_upload │                    │
//!                                                  ▼                    │
//!          CIPSTART ─► CIPSEND=n ─► <payload> ─► await HTTP ─► CIPCLOSE ┘
//!              │           │                        │             ▲
//!              └───────────┴──── ERROR / deadline ──┴─────────────┘
//! ```
//!
//! Bootstrap steps retry their own command when their deadline passes.
//! Upload steps give up and close the connection instead.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod http;
pub mod link;
pub mod response;
pub mod session;

pub use command::{Command, CommandLine, MAX_COMMAND_LEN};
pub use http::{HttpRequest, UploadRequest, UPLOAD_HOST, UPLOAD_PORT};
pub use link::ModemLink;
pub use response::{ResponseBuffer, RESPONSE_CAPACITY};
pub use session::{SessionError, SessionState, WifiSession};
