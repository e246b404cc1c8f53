//! Floodgauge - Flood Monitor Firmware
//!
//! Main firmware binary for RP2040-based flood monitoring stations.
//! Ranges the water surface with an HC-SR04 style sensor, drives a
//! three-lamp indicator, a buzzer and a 16x2 LCD, and uploads the level
//! through an ESP8266 AT-command modem.
//!
//! Pin assignments:
//!
//! | Function        | Pin     |
//! |-----------------|---------|
//! | Modem UART TX   | GPIO 0  |
//! | Modem UART RX   | GPIO 1  |
//! | Sensor trigger  | GPIO 2  |
//! | Sensor echo     | GPIO 3  |
//! | LCD SDA (I2C0)  | GPIO 4  |
//! | LCD SCL (I2C0)  | GPIO 5  |
//! | Red lamp        | GPIO 10 |
//! | Yellow lamp     | GPIO 11 |
//! | Green lamp      | GPIO 12 |
//! | Buzzer (PWM 7B) | GPIO 15 |

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use floodgauge_core::monitor::{Monitor, StepEvents};
use floodgauge_core::ranging::{Rangefinder, SharedRanging};
use floodgauge_drivers::{Hd44780, TrafficLight};
use floodgauge_hal::UartConfig;
use floodgauge_hal_rp2040::{line_config, EchoArm, EchoTrigger, EmbassyClock, GpioOutput, ModemRx, ModemTx, PwmTone};

use crate::modem::ModemPort;
use crate::panel::FrontPanel;
use crate::station::{STATION_CONFIG, STATION_IDENTITY};

mod modem;
mod panel;
mod station;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Runs the echo capture above the thread-mode loop
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

/// Ranging engine shared with the capture task
static RANGING: SharedRanging = SharedRanging::new();

/// Wakes the capture task for each trigger pulse
static ECHO_ARM: EchoArm = EchoArm::new();

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[entry]
fn main() -> ! {
    info!("Floodgauge firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Echo capture preempts the main loop
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    let echo = Input::new(p.PIN_3, Pull::None);
    spawner.spawn(unwrap!(tasks::echo_capture_task(echo, &RANGING, &ECHO_ARM)));

    let trigger = EchoTrigger::new(Output::new(p.PIN_2, Level::Low), &ECHO_ARM);
    let mut rangefinder = Rangefinder::new(&RANGING, trigger);

    // Modem UART
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart_config = line_config(&UartConfig::default());
    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();
    let mut modem = ModemPort::new(ModemTx::new(tx), ModemRx::new(rx));
    info!("Modem UART initialized at {} baud", UartConfig::default().baudrate);

    // Front panel
    let lamps = TrafficLight::new(
        GpioOutput::new(Output::new(p.PIN_10, Level::Low)),
        GpioOutput::new(Output::new(p.PIN_11, Level::Low)),
        GpioOutput::new(Output::new(p.PIN_12, Level::Low)),
    );
    let buzzer = PwmTone::new(Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, pwm::Config::default()));

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut lcd = Hd44780::new(i2c, Delay);
    if let Err(e) = lcd.init() {
        warn!("LCD init failed: {}", e);
    }
    let mut panel = FrontPanel::new(lamps, buzzer, lcd);
    info!("Front panel initialized");

    let clock = EmbassyClock;
    let mut monitor = Monitor::new(STATION_CONFIG, STATION_IDENTITY);
    if let Err(e) = monitor.begin(&clock, &mut modem, &mut panel) {
        error!("Wi-Fi credentials rejected: {}", e);
    }
    info!("Monitor running");

    loop {
        let events = monitor.step(&clock, &mut modem, &mut rangefinder, &mut panel);
        log_events(&events);
    }
}

/// Log what one loop iteration changed
fn log_events(events: &StepEvents) {
    if let Some(state) = events.session {
        debug!("Session -> {}", state);
    }

    if let Some(sample) = events.sample {
        trace!("Raw {} cm, median {} cm", events.raw_cm, sample.median_cm);
        if sample.confirmed {
            info!("Hazard level now {} (median {} cm)", sample.active.name(), sample.median_cm);
        }
    }

    if let Some(cm) = events.upload {
        info!("Uploading level {} cm", cm);
    }

    if let Some(e) = events.display_error {
        warn!("Status screen update failed: {}", e);
    }
}
