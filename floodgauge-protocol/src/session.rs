//! Wi-Fi association and upload state machine
//!
//! The session never blocks. The caller appends modem bytes with
//! [`WifiSession::feed`] and advances the machine with
//! [`WifiSession::poll`], once per scheduler iteration.
//!
//! Every state carries a deadline. Bootstrap states resend their own
//! command when it passes; upload states fall through to closing the socket.
//! The response buffer is cleared on every transition so that text from an
//! earlier step can never satisfy a later one.

use heapless::String;

use crate::command::{token, Command};
use crate::http::{HttpRequest, UploadRequest, UPLOAD_HOST, UPLOAD_PORT};
use crate::link::ModemLink;
use crate::response::{ResponseBuffer, RESPONSE_CAPACITY};

/// Deadline for each bootstrap command except the network join
pub const BOOTSTRAP_STEP_TIMEOUT_MS: u32 = 1_500;
/// Deadline for `AT+CWJAP`; the modem itself gives up after about 20 s
pub const JOIN_TIMEOUT_MS: u32 = 25_000;
/// Deadline for the TCP connect
pub const OPEN_TIMEOUT_MS: u32 = 9_000;
/// Deadline for the `>` payload prompt
pub const SEND_LENGTH_TIMEOUT_MS: u32 = 5_000;
/// Deadline for any HTTP response after the payload is written
pub const RESPONSE_TIMEOUT_MS: u32 = 12_000;
/// Deadline for the socket close acknowledgement
pub const CLOSE_TIMEOUT_MS: u32 = 2_500;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;
/// Maximum WPA passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

const JOIN_SUCCESS: &[&str] = &[token::WIFI_CONNECTED, token::OK, token::ALREADY_CONNECTED];
const OPEN_SUCCESS: &[&str] = &[token::CONNECT, token::OK, token::ALREADY_CONNECTED];
const RESPONSE_SUCCESS: &[&str] = &[token::HTTP_OK, token::HTTP_RESPONSE, token::SEND_OK];

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// `begin()` has not been called
    Idle,
    /// Waiting for `OK` to `AT`
    Attention,
    /// Waiting for `OK` to `ATE0`
    EchoOff,
    /// Waiting for `OK` to `AT+CWMODE=1`
    StationMode,
    /// Waiting for `OK` to `AT+CIPMUX=0`
    SingleConnection,
    /// Waiting for the access point join
    JoinNetwork,
    /// Associated and idle; accepts one upload request
    Ready,
    /// Waiting for the TCP connect
    OpenConnection,
    /// Waiting for the `>` prompt after announcing the payload length
    SendLength,
    /// Prompt received; the payload is written on entry and the session
    /// moves straight on to `AwaitResponse`
    SendPayload,
    /// Waiting for the HTTP response
    AwaitResponse,
    /// Waiting for the socket close acknowledgement
    CloseConnection,
}

impl SessionState {
    /// Deadline applied on entry to this state
    pub fn timeout_ms(self) -> u32 {
        match self {
            SessionState::Idle | SessionState::Ready => 0,
            SessionState::Attention
            | SessionState::EchoOff
            | SessionState::StationMode
            | SessionState::SingleConnection => BOOTSTRAP_STEP_TIMEOUT_MS,
            SessionState::JoinNetwork => JOIN_TIMEOUT_MS,
            SessionState::OpenConnection => OPEN_TIMEOUT_MS,
            SessionState::SendLength => SEND_LENGTH_TIMEOUT_MS,
            // Transient; the response deadline starts after the write
            SessionState::SendPayload | SessionState::AwaitResponse => RESPONSE_TIMEOUT_MS,
            SessionState::CloseConnection => CLOSE_TIMEOUT_MS,
        }
    }
}

/// Errors returned when starting a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// SSID longer than 32 bytes
    SsidTooLong,
    /// Password longer than 64 bytes
    PasswordTooLong,
}

/// Result of evaluating the current state against time and received text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Nothing to do yet
    Wait,
    /// Resend this state's command with a fresh deadline
    Retry,
    /// Move to another state
    Enter(SessionState),
}

/// Wi-Fi modem session
pub struct WifiSession {
    state: SessionState,
    deadline_ms: u32,
    response: ResponseBuffer<RESPONSE_CAPACITY>,
    ssid: String<MAX_SSID_LEN>,
    password: String<MAX_PASSWORD_LEN>,
    /// One-slot request queue, filled by `request_upload`
    pending: Option<UploadRequest>,
    /// Request being uploaded, rendered when the socket is opened
    payload: HttpRequest,
    uploading: bool,
}

impl Default for WifiSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiSession {
    /// Create an idle session
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
            deadline_ms: 0,
            response: ResponseBuffer::new(),
            ssid: String::new(),
            password: String::new(),
            pending: None,
            payload: HttpRequest::new(),
            uploading: false,
        }
    }

    /// (Re)start the association sequence
    ///
    /// Any pending or in-flight upload is dropped. Sends `AT` immediately.
    pub fn begin<L: ModemLink>(
        &mut self,
        ssid: &str,
        password: &str,
        now_ms: u32,
        link: &mut L,
    ) -> Result<(), SessionError> {
        let mut new_ssid = String::new();
        new_ssid
            .push_str(ssid)
            .map_err(|_| SessionError::SsidTooLong)?;
        let mut new_password = String::new();
        new_password
            .push_str(password)
            .map_err(|_| SessionError::PasswordTooLong)?;

        self.ssid = new_ssid;
        self.password = new_password;
        self.pending = None;
        self.payload.clear();
        self.uploading = false;
        self.enter(SessionState::Attention, now_ms, link);
        Ok(())
    }

    /// Append received modem bytes to the response buffer
    pub fn feed(&mut self, bytes: &[u8]) {
        self.response.extend(bytes);
    }

    /// Append one received modem byte to the response buffer
    pub fn feed_byte(&mut self, byte: u8) {
        self.response.push(byte);
    }

    /// Advance the state machine by at most one transition
    pub fn poll<L: ModemLink>(&mut self, now_ms: u32, link: &mut L) {
        match self.evaluate(now_ms) {
            Outcome::Wait => {}
            Outcome::Retry => self.enter(self.state, now_ms, link),
            Outcome::Enter(next) => self.enter(next, now_ms, link),
        }
    }

    /// Offer one value for upload
    ///
    /// Accepted only when the session is ready and no request is waiting.
    /// A rejected request leaves the session untouched.
    pub fn request_upload(&mut self, api_key: &str, value: i16) -> bool {
        if self.state != SessionState::Ready || self.pending.is_some() {
            return false;
        }
        match UploadRequest::new(api_key, value) {
            Some(request) => {
                self.pending = Some(request);
                self.uploading = true;
                true
            }
            None => false,
        }
    }

    /// True when associated and idle
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// True from request acceptance until the session is back in `Ready`
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// True when a request is accepted but not yet started
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Absolute time at which the current state times out
    pub fn deadline_ms(&self) -> u32 {
        self.deadline_ms
    }

    /// Text received since the last transition
    pub fn response(&self) -> &[u8] {
        self.response.as_bytes()
    }

    /// Decide what the current state should do next
    fn evaluate(&self, now_ms: u32) -> Outcome {
        use SessionState::*;

        let expired = deadline_passed(now_ms, self.deadline_ms);
        let has = |t: &str| self.response.contains(t);
        let failed = has(token::ERROR) || expired;

        match self.state {
            Idle => Outcome::Wait,

            Attention | EchoOff | StationMode | SingleConnection => {
                if has(token::OK) {
                    Outcome::Enter(bootstrap_successor(self.state))
                } else if expired {
                    Outcome::Retry
                } else {
                    Outcome::Wait
                }
            }

            JoinNetwork => {
                if self.response.contains_any(JOIN_SUCCESS) {
                    Outcome::Enter(Ready)
                } else if has(token::FAIL) || expired {
                    Outcome::Retry
                } else {
                    Outcome::Wait
                }
            }

            Ready => {
                if self.pending.is_some() {
                    Outcome::Enter(OpenConnection)
                } else {
                    Outcome::Wait
                }
            }

            OpenConnection => {
                if self.response.contains_any(OPEN_SUCCESS) {
                    Outcome::Enter(SendLength)
                } else if failed {
                    Outcome::Enter(CloseConnection)
                } else {
                    Outcome::Wait
                }
            }

            SendLength => {
                if has(token::PROMPT) {
                    Outcome::Enter(SendPayload)
                } else if failed {
                    Outcome::Enter(CloseConnection)
                } else {
                    Outcome::Wait
                }
            }

            SendPayload => Outcome::Enter(AwaitResponse),

            AwaitResponse => {
                if self.response.contains_any(RESPONSE_SUCCESS) || failed {
                    Outcome::Enter(CloseConnection)
                } else {
                    Outcome::Wait
                }
            }

            CloseConnection => {
                if has(token::OK) || expired {
                    Outcome::Enter(Ready)
                } else {
                    Outcome::Wait
                }
            }
        }
    }

    /// Enter `next`: reset the response buffer, arm the deadline and run
    /// the entry action
    fn enter<L: ModemLink>(&mut self, next: SessionState, now_ms: u32, link: &mut L) {
        self.response.clear();
        self.state = next;
        self.deadline_ms = now_ms.wrapping_add(next.timeout_ms());

        match next {
            SessionState::Idle | SessionState::AwaitResponse => {}
            SessionState::SendPayload => {
                // Raw bytes, not a command line
                link.send(self.payload.as_bytes());
                self.enter(SessionState::AwaitResponse, now_ms, link);
            }
            SessionState::Attention => send_command(link, Command::Attention),
            SessionState::EchoOff => send_command(link, Command::EchoOff),
            SessionState::StationMode => send_command(link, Command::StationMode),
            SessionState::SingleConnection => send_command(link, Command::SingleConnection),
            SessionState::JoinNetwork => send_command(
                link,
                Command::JoinNetwork {
                    ssid: &self.ssid,
                    password: &self.password,
                },
            ),
            SessionState::Ready => {
                self.uploading = false;
                self.payload.clear();
            }
            SessionState::OpenConnection => {
                if let Some(request) = self.pending.take() {
                    self.payload = request.render(UPLOAD_HOST).unwrap_or_default();
                }
                send_command(
                    link,
                    Command::OpenConnection {
                        host: UPLOAD_HOST,
                        port: UPLOAD_PORT,
                    },
                );
            }
            SessionState::SendLength => {
                send_command(link, Command::SendLength(self.payload.len()))
            }
            SessionState::CloseConnection => send_command(link, Command::CloseConnection),
        }
    }
}

/// Next step of the association sequence after a plain `OK`
fn bootstrap_successor(state: SessionState) -> SessionState {
    match state {
        SessionState::Attention => SessionState::EchoOff,
        SessionState::EchoOff => SessionState::StationMode,
        SessionState::StationMode => SessionState::SingleConnection,
        SessionState::SingleConnection => SessionState::JoinNetwork,
        other => other,
    }
}

/// Wrap-safe "now is strictly after deadline"
fn deadline_passed(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) > 0
}

fn send_command<L: ModemLink>(link: &mut L, command: Command<'_>) {
    // Every command fits MAX_COMMAND_LEN by construction of the length limits
    if let Ok(line) = command.render() {
        link.send(line.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandLine;
    use heapless::Vec;

    const SSID: &str = "IJBC";
    const PASSWORD: &str = "ian12345";
    const KEY: &str = "VYAV7M3MXXHXHFVE";

    /// Records everything the session writes
    struct MockLink {
        sent: Vec<u8, 4096>,
    }

    impl MockLink {
        fn new() -> Self {
            Self { sent: Vec::new() }
        }

        /// Return and forget everything sent so far
        fn take(&mut self) -> Vec<u8, 4096> {
            core::mem::take(&mut self.sent)
        }
    }

    impl ModemLink for MockLink {
        fn send(&mut self, bytes: &[u8]) {
            self.sent.extend_from_slice(bytes).unwrap();
        }

        fn try_recv(&mut self) -> Option<u8> {
            None
        }
    }

    /// Drive a fresh session to `Ready`, returning the current time
    fn bootstrap(session: &mut WifiSession, link: &mut MockLink) -> u32 {
        let mut now = 0;
        session.begin(SSID, PASSWORD, now, link).unwrap();
        for _ in 0..4 {
            now += 10;
            session.feed(b"\r\nOK\r\n");
            session.poll(now, link);
        }
        now += 10;
        session.feed(b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n");
        session.poll(now, link);
        assert!(session.is_ready());
        link.take();
        now
    }

    #[test]
    fn test_begin_sends_attention() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();
        assert_eq!(session.state(), SessionState::Attention);
        assert_eq!(link.take().as_slice(), b"AT\r\n");
    }

    #[test]
    fn test_ok_advances_to_echo_off_and_clears_response() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();
        link.take();

        session.feed(b"AT\r\r\n\r\nOK\r\n");
        session.poll(5, &mut link);

        assert_eq!(session.state(), SessionState::EchoOff);
        assert_eq!(link.take().as_slice(), b"ATE0\r\n");
        assert!(session.response().is_empty());

        // The old OK must not advance the next step
        session.poll(6, &mut link);
        assert_eq!(session.state(), SessionState::EchoOff);
        assert!(link.take().is_empty());
    }

    #[test]
    fn test_bootstrap_retries_same_command_after_deadline() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.begin(SSID, PASSWORD, 100, &mut link).unwrap();
        link.take();

        session.poll(1_600, &mut link);
        assert!(link.take().is_empty());

        session.poll(1_601, &mut link);
        assert_eq!(session.state(), SessionState::Attention);
        assert_eq!(link.take().as_slice(), b"AT\r\n");
        assert_eq!(session.deadline_ms(), 1_601 + BOOTSTRAP_STEP_TIMEOUT_MS);
    }

    #[test]
    fn test_full_bootstrap_command_sequence() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();

        let steps: [&[u8]; 4] = [
            b"ATE0\r\n",
            b"AT+CWMODE=1\r\n",
            b"AT+CIPMUX=0\r\n",
            b"AT+CWJAP=\"IJBC\",\"ian12345\"\r\n",
        ];
        link.take();
        for (i, expected) in steps.iter().enumerate() {
            session.feed(b"OK\r\n");
            session.poll(10 * (i as u32 + 1), &mut link);
            assert_eq!(link.take().as_slice(), *expected);
        }
        assert_eq!(session.state(), SessionState::JoinNetwork);
        assert_eq!(session.deadline_ms(), 40 + JOIN_TIMEOUT_MS);

        session.feed(b"WIFI CONNECTED\r\n");
        session.poll(3_000, &mut link);
        assert!(session.is_ready());
        assert!(!session.is_uploading());
        assert!(link.take().is_empty());
    }

    #[test]
    fn test_join_failure_reissues_immediately() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();
        for t in 1..=4 {
            session.feed(b"OK");
            session.poll(t, &mut link);
        }
        link.take();

        session.feed(b"+CWJAP:3\r\n\r\nFAIL\r\n");
        session.poll(2_000, &mut link);

        assert_eq!(session.state(), SessionState::JoinNetwork);
        assert_eq!(link.take().as_slice(), b"AT+CWJAP=\"IJBC\",\"ian12345\"\r\n");
        assert_eq!(session.deadline_ms(), 2_000 + JOIN_TIMEOUT_MS);
        assert!(session.response().is_empty());
    }

    #[test]
    fn test_join_timeout_reissues() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();
        for t in 1..=4 {
            session.feed(b"OK");
            session.poll(t, &mut link);
        }
        link.take();

        session.poll(4 + JOIN_TIMEOUT_MS, &mut link);
        assert!(link.take().is_empty());
        session.poll(5 + JOIN_TIMEOUT_MS, &mut link);
        assert_eq!(link.take().as_slice(), b"AT+CWJAP=\"IJBC\",\"ian12345\"\r\n");
    }

    #[test]
    fn test_request_rejected_when_not_ready() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        assert!(!session.request_upload(KEY, 25));

        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();
        assert!(!session.request_upload(KEY, 25));
        assert!(!session.has_pending());
        assert!(!session.is_uploading());
        assert_eq!(session.state(), SessionState::Attention);
    }

    #[test]
    fn test_second_request_rejected_while_pending() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        bootstrap(&mut session, &mut link);

        assert!(session.request_upload(KEY, 25));
        assert!(session.is_uploading());
        assert!(!session.request_upload(KEY, 99));
        assert!(session.has_pending());
    }

    #[test]
    fn test_upload_happy_path() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let mut now = bootstrap(&mut session, &mut link);

        assert!(session.request_upload(KEY, 25));
        now += 1;
        session.poll(now, &mut link);
        assert_eq!(session.state(), SessionState::OpenConnection);
        assert_eq!(
            link.take().as_slice(),
            b"AT+CIPSTART=\"TCP\",\"api.thingspeak.com\",80\r\n"
        );
        assert!(!session.has_pending());
        assert!(session.is_uploading());

        let expected_payload = UploadRequest::new(KEY, 25)
            .unwrap()
            .render(UPLOAD_HOST)
            .unwrap();

        now += 200;
        session.feed(b"CONNECT\r\n\r\nOK\r\n");
        session.poll(now, &mut link);
        assert_eq!(session.state(), SessionState::SendLength);
        let mut expected_len = CommandLine::new();
        core::fmt::Write::write_fmt(
            &mut expected_len,
            format_args!("AT+CIPSEND={}\r\n", expected_payload.len()),
        )
        .unwrap();
        assert_eq!(link.take().as_slice(), expected_len.as_bytes());

        // The payload follows the prompt in the same poll
        now += 20;
        session.feed(b"\r\nOK\r\n> ");
        session.poll(now, &mut link);
        assert_eq!(session.state(), SessionState::AwaitResponse);
        assert_eq!(link.take().as_slice(), expected_payload.as_bytes());
        assert_eq!(session.deadline_ms(), now + RESPONSE_TIMEOUT_MS);

        now += 300;
        session.feed(b"Recv 97 bytes\r\n\r\nSEND OK\r\n\r\n+IPD,200:HTTP/1.1 200 OK\r\n");
        session.poll(now, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        assert_eq!(link.take().as_slice(), b"AT+CIPCLOSE\r\n");
        assert!(session.is_uploading());

        now += 50;
        session.feed(b"CLOSED\r\n\r\nOK\r\n");
        session.poll(now, &mut link);
        assert!(session.is_ready());
        assert!(!session.is_uploading());

        // Ready for the next one
        assert!(session.request_upload(KEY, 26));
    }

    #[test]
    fn test_open_timeout_closes_then_returns_ready() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        assert!(session.request_upload(KEY, 25));
        session.poll(start, &mut link);
        assert_eq!(session.state(), SessionState::OpenConnection);
        link.take();

        session.poll(start + OPEN_TIMEOUT_MS, &mut link);
        assert_eq!(session.state(), SessionState::OpenConnection);

        let t = start + OPEN_TIMEOUT_MS + 1;
        session.poll(t, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        assert_eq!(link.take().as_slice(), b"AT+CIPCLOSE\r\n");
        assert!(session.is_uploading());

        // No reply to the close either: deadline returns us to Ready
        session.poll(t + CLOSE_TIMEOUT_MS, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        session.poll(t + CLOSE_TIMEOUT_MS + 1, &mut link);
        assert!(session.is_ready());
        assert!(!session.is_uploading());
    }

    #[test]
    fn test_close_ok_returns_ready() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        session.request_upload(KEY, 25);
        session.poll(start, &mut link);
        session.poll(start + OPEN_TIMEOUT_MS + 1, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);

        session.feed(b"OK\r\n");
        session.poll(start + OPEN_TIMEOUT_MS + 2, &mut link);
        assert!(session.is_ready());
        assert!(!session.is_uploading());
    }

    #[test]
    fn test_error_during_open_short_circuits_to_close() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        session.request_upload(KEY, 25);
        session.poll(start, &mut link);
        link.take();

        session.feed(b"DNS Fail\r\nERROR\r\n");
        session.poll(start + 5, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        assert_eq!(link.take().as_slice(), b"AT+CIPCLOSE\r\n");
    }

    #[test]
    fn test_error_waiting_for_prompt_closes() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        session.request_upload(KEY, 25);
        session.poll(start, &mut link);
        session.feed(b"CONNECT\r\n");
        session.poll(start + 1, &mut link);
        assert_eq!(session.state(), SessionState::SendLength);
        link.take();

        session.feed(b"link is not valid\r\nERROR\r\n");
        session.poll(start + 2, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        assert_eq!(link.take().as_slice(), b"AT+CIPCLOSE\r\n");
    }

    #[test]
    fn test_response_timeout_closes() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        session.request_upload(KEY, 25);
        session.poll(start, &mut link);
        session.feed(b"CONNECT");
        session.poll(start + 1, &mut link);
        session.feed(b">");
        session.poll(start + 2, &mut link);
        session.poll(start + 3, &mut link);
        assert_eq!(session.state(), SessionState::AwaitResponse);

        session.poll(start + 3 + RESPONSE_TIMEOUT_MS + 1, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
    }

    #[test]
    fn test_prompt_timeout_closes() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        session.request_upload(KEY, 25);
        session.poll(start, &mut link);
        session.feed(b"CONNECT\r\n");
        let entered = start + 1;
        session.poll(entered, &mut link);
        assert_eq!(session.state(), SessionState::SendLength);
        link.take();

        // No prompt ever arrives
        session.poll(entered + SEND_LENGTH_TIMEOUT_MS, &mut link);
        assert_eq!(session.state(), SessionState::SendLength);
        assert!(link.take().is_empty());

        session.poll(entered + SEND_LENGTH_TIMEOUT_MS + 1, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        assert_eq!(link.take().as_slice(), b"AT+CIPCLOSE\r\n");
    }

    #[test]
    fn test_error_awaiting_response_closes() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = bootstrap(&mut session, &mut link);

        session.request_upload(KEY, 25);
        session.poll(start, &mut link);
        session.feed(b"CONNECT\r\n");
        session.poll(start + 1, &mut link);
        session.feed(b"> ");
        session.poll(start + 2, &mut link);
        assert_eq!(session.state(), SessionState::AwaitResponse);
        link.take();

        session.feed(b"ERROR\r\n");
        session.poll(start + 3, &mut link);
        assert_eq!(session.state(), SessionState::CloseConnection);
        assert_eq!(link.take().as_slice(), b"AT+CIPCLOSE\r\n");
    }

    #[test]
    fn test_overflow_drops_split_token_until_next_reply() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.begin(SSID, PASSWORD, 0, &mut link).unwrap();
        link.take();

        // Fill the buffer exactly, ending on the first half of "OK"
        for _ in 0..RESPONSE_CAPACITY - 1 {
            session.feed_byte(b'x');
        }
        session.feed_byte(b'O');
        assert_eq!(session.response().len(), RESPONSE_CAPACITY);

        // The second half lands in a fresh buffer on its own
        session.feed_byte(b'K');
        session.poll(10, &mut link);
        assert_eq!(session.state(), SessionState::Attention);
        assert_eq!(session.response(), b"K");
        assert!(link.take().is_empty());

        session.feed(b"OK");
        session.poll(20, &mut link);
        assert_eq!(session.state(), SessionState::EchoOff);
        assert_eq!(link.take().as_slice(), b"ATE0\r\n");
    }

    #[test]
    fn test_begin_restarts_and_drops_pending() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let now = bootstrap(&mut session, &mut link);
        session.request_upload(KEY, 25);

        session.begin(SSID, PASSWORD, now, &mut link).unwrap();
        assert_eq!(session.state(), SessionState::Attention);
        assert!(!session.has_pending());
        assert!(!session.is_uploading());
        assert_eq!(link.take().as_slice(), b"AT\r\n");
    }

    #[test]
    fn test_begin_rejects_long_credentials() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let long_ssid = "0123456789012345678901234567890123";
        assert_eq!(
            session.begin(long_ssid, PASSWORD, 0, &mut link),
            Err(SessionError::SsidTooLong)
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert!(link.take().is_empty());
    }

    #[test]
    fn test_deadline_survives_clock_wrap() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        let start = u32::MAX - 100;
        session.begin(SSID, PASSWORD, start, &mut link).unwrap();
        link.take();

        // 1400 ms later, across the wrap: not yet expired
        session.poll(start.wrapping_add(1_400), &mut link);
        assert!(link.take().is_empty());

        session.poll(start.wrapping_add(1_501), &mut link);
        assert_eq!(link.take().as_slice(), b"AT\r\n");
    }

    #[test]
    fn test_idle_poll_does_nothing() {
        let mut session = WifiSession::new();
        let mut link = MockLink::new();
        session.feed(b"OK");
        session.poll(100_000, &mut link);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(link.take().is_empty());
    }

    #[test]
    fn test_state_timeouts() {
        assert_eq!(SessionState::Attention.timeout_ms(), 1_500);
        assert_eq!(SessionState::SendLength.timeout_ms(), 5_000);
        assert_eq!(SessionState::CloseConnection.timeout_ms(), 2_500);
        assert_eq!(SessionState::Ready.timeout_ms(), 0);
    }
}
