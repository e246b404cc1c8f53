//! Cooperative scheduler
//!
//! [`Monitor::step`] runs one iteration of the main loop. It never blocks:
//! every periodic task is a wrap-safe deadline check against a single clock
//! read taken at the top of the iteration.
//!
//! Per iteration, in order:
//! 1. drain received modem bytes into the session
//! 2. read the clock once
//! 3. poll the upload session
//! 4. start a measurement when the measure period has elapsed
//! 5. condition a finished measurement and update the indicator lamps
//! 6. update the buzzer pattern
//! 7. offer the median for upload when due
//! 8. update the status screen

use floodgauge_display::{DisplayError, StatusScreen};
use floodgauge_protocol::{ModemLink, SessionError, SessionState, WifiSession};

use crate::alarm::{BuzzerPattern, Lamp};
use crate::conditioning::{Classification, Conditioned, SignalConditioner, NO_MEDIAN};
use crate::config::MonitorConfig;
use crate::status::{level_line, status_line, CONNECTING_TEXT, READY_TEXT};
use crate::traits::{Annunciator, Clock, RangingPort};

/// Credentials and upload key
#[derive(Debug, Clone, Copy)]
pub struct StationIdentity<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
    pub api_key: &'a str,
}

/// What the status screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayPhase {
    /// "Connecting WiFi" until the session is first ready
    Connecting,
    /// "System Ready" banner, shown since the given time
    Banner(u32),
    /// Periodic level and status lines
    Live,
}

/// Things that happened during one iteration, for the caller to log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepEvents {
    /// Session moved to this state
    pub session: Option<SessionState>,
    /// Raw distance taken from the ranging engine
    pub raw_cm: Option<i16>,
    /// Conditioning result for that sample
    pub sample: Option<Conditioned>,
    /// Value accepted for upload
    pub upload: Option<i16>,
    /// Status screen could not be written
    pub display_error: Option<DisplayError>,
}

/// Point-in-time view of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorSnapshot {
    pub raw_cm: i16,
    pub median_cm: i16,
    pub active: Classification,
    pub session: SessionState,
    pub uploading: bool,
    pub display: DisplayPhase,
}

/// Flood monitor application
pub struct Monitor<'a> {
    config: MonitorConfig,
    identity: StationIdentity<'a>,
    session: WifiSession,
    conditioner: SignalConditioner,
    buzzer: BuzzerPattern,
    screen: StatusScreen,
    phase: DisplayPhase,
    next_measure_ms: u32,
    last_upload_ms: u32,
    last_refresh_ms: Option<u32>,
    raw_cm: i16,
}

impl<'a> Monitor<'a> {
    pub fn new(config: MonitorConfig, identity: StationIdentity<'a>) -> Self {
        Self {
            config,
            identity,
            session: WifiSession::new(),
            conditioner: SignalConditioner::new(config.thresholds),
            buzzer: BuzzerPattern::new(),
            screen: StatusScreen::new(),
            phase: DisplayPhase::Connecting,
            next_measure_ms: 0,
            last_upload_ms: 0,
            last_refresh_ms: None,
            raw_cm: NO_MEDIAN,
        }
    }

    /// Show the connecting message and start associating
    ///
    /// The measurement schedule starts at `now`, so the first measurement is
    /// requested by the first `step`.
    pub fn begin<C, L, P>(&mut self, clock: &C, link: &mut L, panel: &mut P) -> Result<(), SessionError>
    where
        C: Clock,
        L: ModemLink,
        P: Annunciator,
    {
        let now = clock.now_ms();
        self.screen.clear();
        self.screen.set_line(0, CONNECTING_TEXT);
        // A dead display must not keep the station offline
        let _ = self.screen.flush(panel);

        self.phase = DisplayPhase::Connecting;
        self.next_measure_ms = now;
        self.session
            .begin(self.identity.ssid, self.identity.password, now, link)
    }

    /// Run one scheduler iteration
    pub fn step<C, L, R, P>(&mut self, clock: &C, link: &mut L, ranging: &mut R, panel: &mut P) -> StepEvents
    where
        C: Clock,
        L: ModemLink,
        R: RangingPort,
        P: Annunciator,
    {
        let mut events = StepEvents::default();

        while let Some(byte) = link.try_recv() {
            self.session.feed_byte(byte);
        }

        let now = clock.now_ms();

        let before = self.session.state();
        self.session.poll(now, link);
        if self.session.state() != before {
            events.session = Some(self.session.state());
        }

        let schedule = self.config.schedule;
        if due(now, self.next_measure_ms) {
            self.next_measure_ms = now.wrapping_add(schedule.measure_period_ms);
            ranging.start();
        }

        if ranging.is_done() {
            if let Some(raw) = ranging.take() {
                self.raw_cm = raw;
                let sample = self.conditioner.process(raw);
                panel.show(Lamp::from(sample.active));
                events.raw_cm = Some(raw);
                events.sample = Some(sample);
            }
        }

        panel.set_tone(self.buzzer.update(self.conditioner.active(), now));

        // Uploads follow the raw median, not the debounced category
        let median = self.conditioner.median();
        if self.session.is_ready()
            && median > 0
            && now.wrapping_sub(self.last_upload_ms) > schedule.upload_interval_ms
            && self.session.request_upload(self.identity.api_key, median)
        {
            self.last_upload_ms = now;
            events.upload = Some(median);
        }

        self.update_screen(now);
        if self.screen.is_dirty() {
            if let Err(e) = self.screen.flush(panel) {
                events.display_error = Some(e);
            }
        }

        events
    }

    fn update_screen(&mut self, now: u32) {
        let schedule = self.config.schedule;

        if self.phase == DisplayPhase::Connecting && self.session.is_ready() {
            self.screen.clear();
            self.screen.set_line(0, READY_TEXT);
            self.phase = DisplayPhase::Banner(now);
        }

        if let DisplayPhase::Banner(since) = self.phase {
            if now.wrapping_sub(since) >= schedule.ready_banner_ms {
                self.screen.clear();
                self.phase = DisplayPhase::Live;
                self.last_refresh_ms = None;
            }
        }

        if self.phase == DisplayPhase::Live {
            let refresh = match self.last_refresh_ms {
                Some(last) => now.wrapping_sub(last) >= schedule.display_refresh_ms,
                None => true,
            };
            if refresh {
                self.last_refresh_ms = Some(now);
                self.screen.set_line(0, &level_line(self.conditioner.median()));
                self.screen.set_line(
                    1,
                    status_line(self.conditioner.active(), self.session.is_uploading()),
                );
            }
        }
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            raw_cm: self.raw_cm,
            median_cm: self.conditioner.median(),
            active: self.conditioner.active(),
            session: self.session.state(),
            uploading: self.session.is_uploading(),
            display: self.phase,
        }
    }

    pub fn session(&self) -> &WifiSession {
        &self.session
    }

    pub fn screen(&self) -> &StatusScreen {
        &self.screen
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

/// Wrap-safe "deadline reached"
fn due(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}
