//! pcmon - PC Telemetry LCD Firmware
//!
//! Main firmware binary for RP2040-based boards with an HD44780 character
//! LCD on an I2C backpack. The host streams newline-terminated telemetry
//! lines over the UART; the firmware shows the latest values and falls back
//! to a waiting screen when the host goes quiet.
//!
//! Everything runs in one cooperative loop: drain the UART, check the link
//! timeout, repaint when the refresh interval elapsed, sleep briefly.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::{Delay, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pcmon_core::Monitor;
use pcmon_display::{upload_glyphs, DisplayBackend, Renderer};
use pcmon_drivers::lcd::{Hd44780, LcdConfig};
use pcmon_hal_rp2040::uart::peripheral_config;
use pcmon_hal_rp2040::{BlockingI2c, BufferedSerial, UartConfig};
use pcmon_protocol::LINE_CAPACITY;

mod config;
mod report;

/// Firmware version shown on the boot screen
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long the boot screen stays up
const BOOT_SCREEN_MS: u64 = 1500;

/// The LCD as wired on the board
type Lcd = Hd44780<BlockingI2c<'static, I2C0>, Delay>;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
// RX holds two full lines so a burst never overruns between polls
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 2 * LINE_CAPACITY]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("pcmon firmware v{} starting...", VERSION);

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Host link on UART0 (GPIO0 TX, GPIO1 RX)
    let uart_config = peripheral_config(&UartConfig {
        baudrate: config.serial.baudrate,
    });
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 2 * LINE_CAPACITY]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let mut serial = BufferedSerial::new(uart);
    info!("UART initialized at {} baud", config.serial.baudrate);

    // LCD backpack on I2C0 (GPIO4 SDA, GPIO5 SCL)
    let i2c = I2c::new_blocking(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        pcmon_hal_rp2040::i2c::peripheral_config(),
    );
    let (cols, rows) = config.variant.grid();
    let mut lcd: Lcd = Hd44780::new(
        BlockingI2c::new(i2c),
        Delay,
        LcdConfig {
            address: config.display.i2c_address,
            cols,
            rows,
            backlight: config.display.backlight,
        },
    );

    let mut renderer = Renderer::new(config.variant);
    let mut lcd_ready = bring_up(&mut lcd);
    if lcd_ready {
        let screen = renderer.render_boot(config.variant, VERSION);
        if let Err(e) = screen.flush(&mut lcd) {
            warn!("Boot screen failed: {:?}", e);
        }
        Timer::after_millis(BOOT_SCREEN_MS).await;
    }

    let mut monitor = Monitor::new(config);
    let mut was_connected = false;
    info!("Waiting for telemetry");

    loop {
        let now_ms = Instant::now().as_millis();
        let report = monitor.poll(&mut serial, now_ms);
        report::log_poll(&report, config.link.timeout_ms);

        let connected = monitor.link().is_connected();
        if connected && !was_connected {
            info!("Telemetry link established");
        }
        was_connected = connected;

        if let Some(frame) = report.render_frame {
            // A display that failed earlier gets another init attempt
            if !lcd_ready {
                lcd_ready = bring_up(&mut lcd);
            }
            if lcd_ready {
                let screen = renderer.render(&monitor.view(now_ms), frame);
                if let Err(e) = screen.flush(&mut lcd) {
                    warn!("LCD write failed: {:?}", e);
                    lcd_ready = false;
                }
            }
        }

        Timer::after_millis(u64::from(config.poll.delay_ms)).await;
    }
}

/// Initialize the display and load the bar glyphs
fn bring_up(lcd: &mut Lcd) -> bool {
    if let Err(e) = lcd.init() {
        warn!("LCD init failed: {:?}", e);
        return false;
    }
    match upload_glyphs(lcd) {
        Ok(()) => {
            let (cols, rows) = lcd.dimensions();
            info!("LCD ready ({}x{})", cols, rows);
            true
        }
        Err(e) => {
            warn!("Glyph upload failed: {:?}", e);
            false
        }
    }
}
