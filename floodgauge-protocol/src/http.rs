//! HTTP upload request
//!
//! The reading is uploaded as a ThingSpeak-style GET with the API key and
//! the value in the query string. The modem tunnels the raw request bytes
//! over the TCP socket opened by `AT+CIPSTART`.

use core::fmt::Write;

use heapless::String;

/// Upload endpoint host
pub const UPLOAD_HOST: &str = "api.thingspeak.com";

/// Upload endpoint TCP port
pub const UPLOAD_PORT: u16 = 80;

/// Maximum API key length
pub const MAX_API_KEY_LEN: usize = 32;

/// Maximum rendered request length
pub const MAX_REQUEST_LEN: usize = 256;

/// A rendered HTTP request
pub type HttpRequest = String<MAX_REQUEST_LEN>;

/// A pending upload: one value for one channel key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    api_key: String<MAX_API_KEY_LEN>,
    value: i16,
}

impl UploadRequest {
    /// Create a request, or `None` if the key does not fit
    pub fn new(api_key: &str, value: i16) -> Option<Self> {
        let mut key = String::new();
        key.push_str(api_key).ok()?;
        Some(Self {
            api_key: key,
            value,
        })
    }

    /// Render the full GET request for `host`
    pub fn render(&self, host: &str) -> Result<HttpRequest, core::fmt::Error> {
        let mut req = HttpRequest::new();
        write!(
            req,
            "GET /update?api_key={}&field1={} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.api_key, self.value, host
        )?;
        Ok(req)
    }
}
