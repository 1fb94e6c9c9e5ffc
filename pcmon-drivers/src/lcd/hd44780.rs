//! HD44780 character LCD behind a PCF8574 I2C backpack
//!
//! The backpack is an 8-bit I2C port expander wired to the LCD in 4-bit mode:
//!
//! | PCF8574 bit | LCD pin   |
//! |-------------|-----------|
//! | P0          | RS        |
//! | P1          | RW (low)  |
//! | P2          | EN        |
//! | P3          | Backlight |
//! | P4..P7      | D4..D7    |
//!
//! Every byte sent to the controller is split into two nibbles, each latched
//! by pulsing EN. A nibble is one two-byte I2C write (EN high, then EN low),
//! which at 100 kHz easily meets the controller's pulse width.
//!
//! # Initialization
//!
//! The controller powers up in 8-bit mode in an unknown state. The standard
//! recovery sequence sends `0x3` three times, then `0x2` to switch to 4-bit
//! mode, followed by function set, display on, clear and entry mode.

use embedded_hal::delay::DelayNs;
use pcmon_display::{DisplayBackend, DisplayError};
use pcmon_hal::I2cBus;

/// PCF8574 backpack pin bits
mod pin {
    /// Register select: 0 = command, 1 = data
    pub const RS: u8 = 0x01;
    /// Enable strobe
    pub const EN: u8 = 0x04;
    /// Backlight transistor
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 instructions
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    /// Entry mode: increment, no shift
    pub const ENTRY_MODE: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const DISPLAY_OFF: u8 = 0x08;
    /// Function set: 4-bit bus, two lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// DDRAM start address of each row
///
/// Rows 2 and 3 of a 20x4 panel continue rows 0 and 1 in memory.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Custom character slots in CGRAM
const CGRAM_SLOTS: u8 = 8;

/// LCD panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LcdConfig {
    /// 7-bit I2C address of the backpack (0x27 or 0x3F on most boards)
    pub address: u8,
    pub cols: u8,
    pub rows: u8,
    /// Backlight state after init
    pub backlight: bool,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            address: 0x27,
            cols: 16,
            rows: 2,
            backlight: true,
        }
    }
}

/// LCD driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Position outside the panel
    InvalidPosition,
    /// Glyph slot outside CGRAM
    InvalidSlot,
    /// Used before `init`
    NotInitialized,
}

impl<E> From<LcdError<E>> for DisplayError {
    fn from(e: LcdError<E>) -> Self {
        match e {
            LcdError::Bus(_) => DisplayError::Communication,
            LcdError::InvalidPosition | LcdError::InvalidSlot => DisplayError::InvalidCoordinates,
            LcdError::NotInitialized => DisplayError::NotInitialized,
        }
    }
}

/// HD44780 driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    config: LcdConfig,
    initialized: bool,
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2cBus,
    D: DelayNs,
{
    /// Create a driver; call [`Hd44780::init`] before drawing
    pub fn new(i2c: I2C, delay: D, config: LcdConfig) -> Self {
        Self {
            i2c,
            delay,
            config,
            initialized: false,
        }
    }

    pub fn config(&self) -> &LcdConfig {
        &self.config
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Run the power-on sequence and clear the panel
    pub fn init(&mut self) -> Result<(), LcdError<I2C::Error>> {
        // Wait for Vcc to settle
        self.delay.delay_ms(50);
        self.expander(0)?;

        // Force 8-bit mode from any state, then switch to 4-bit
        self.nibble(0x03, 0)?;
        self.delay.delay_us(4500);
        self.nibble(0x03, 0)?;
        self.delay.delay_us(4500);
        self.nibble(0x03, 0)?;
        self.delay.delay_us(150);
        self.nibble(0x02, 0)?;

        self.command(cmd::FUNCTION_SET)?;
        self.command(cmd::DISPLAY_ON)?;
        self.clear_display()?;
        self.command(cmd::ENTRY_MODE)?;

        self.initialized = true;
        Ok(())
    }

    /// Turn the backlight on or off
    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError<I2C::Error>> {
        self.config.backlight = on;
        self.expander(0)
    }

    /// Clear every cell and home the cursor
    pub fn clear_display(&mut self) -> Result<(), LcdError<I2C::Error>> {
        self.command(cmd::CLEAR)?;
        // Clear is the slowest instruction (1.52 ms)
        self.delay.delay_us(2000);
        Ok(())
    }

    /// Move the cursor to (`col`, `row`)
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), LcdError<I2C::Error>> {
        if col >= self.config.cols || row >= self.config.rows {
            return Err(LcdError::InvalidPosition);
        }
        let offset = ROW_OFFSETS[usize::from(row.min(3))];
        self.command(cmd::SET_DDRAM_ADDR | (offset + col))
    }

    /// Write character codes at (`col`, `row`), clipped to the row
    pub fn write_at(
        &mut self,
        col: u8,
        row: u8,
        bytes: &[u8],
    ) -> Result<(), LcdError<I2C::Error>> {
        self.ensure_initialized()?;
        self.set_cursor(col, row)?;
        let room = usize::from(self.config.cols - col);
        for &b in bytes.iter().take(room) {
            self.data(b)?;
        }
        Ok(())
    }

    /// Program custom character `slot` with a 5x8 bitmap
    pub fn create_char(
        &mut self,
        slot: u8,
        bitmap: &[u8; 8],
    ) -> Result<(), LcdError<I2C::Error>> {
        self.ensure_initialized()?;
        if slot >= CGRAM_SLOTS {
            return Err(LcdError::InvalidSlot);
        }
        self.command(cmd::SET_CGRAM_ADDR | (slot << 3))?;
        for &row in bitmap {
            self.data(row & 0x1F)?;
        }
        // Leave the address counter back in DDRAM
        self.command(cmd::SET_DDRAM_ADDR)
    }

    fn ensure_initialized(&self) -> Result<(), LcdError<I2C::Error>> {
        if self.initialized {
            Ok(())
        } else {
            Err(LcdError::NotInitialized)
        }
    }

    fn command(&mut self, value: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(value, 0)
    }

    fn data(&mut self, value: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(value, pin::RS)
    }

    /// Send a full byte as high then low nibble
    fn send(&mut self, value: u8, mode: u8) -> Result<(), LcdError<I2C::Error>> {
        self.nibble(value >> 4, mode)?;
        self.nibble(value & 0x0F, mode)?;
        // Most instructions need 37 us to execute
        self.delay.delay_us(50);
        Ok(())
    }

    /// Latch one nibble with an EN pulse
    fn nibble(&mut self, nibble: u8, mode: u8) -> Result<(), LcdError<I2C::Error>> {
        let bits = (nibble << 4) | mode | self.backlight_bit();
        self.i2c
            .write(self.config.address, &[bits | pin::EN, bits])
            .map_err(LcdError::Bus)
    }

    /// Write the expander pins directly
    fn expander(&mut self, bits: u8) -> Result<(), LcdError<I2C::Error>> {
        let bits = bits | self.backlight_bit();
        self.i2c
            .write(self.config.address, &[bits])
            .map_err(LcdError::Bus)
    }

    fn backlight_bit(&self) -> u8 {
        if self.config.backlight {
            pin::BACKLIGHT
        } else {
            0
        }
    }
}

impl<I2C, D> DisplayBackend for Hd44780<I2C, D>
where
    I2C: I2cBus,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.clear_display()?;
        Ok(())
    }

    fn draw_bytes(&mut self, col: u8, row: u8, bytes: &[u8]) -> Result<(), DisplayError> {
        self.write_at(col, row, bytes)?;
        Ok(())
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), DisplayError> {
        self.create_char(slot, bitmap)?;
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.config.cols, self.config.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    /// Records every I2C write
    #[derive(Default)]
    struct MockBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl I2cBus for MockBus {
        type Error = Nack;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Nack> {
            if self.fail {
                return Err(Nack);
            }
            self.writes.push((address, data.to_vec()));
            Ok(())
        }
    }

    /// Counts requested delay
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    fn lcd(cols: u8, rows: u8) -> Hd44780<MockBus, MockDelay> {
        let config = LcdConfig {
            cols,
            rows,
            ..LcdConfig::default()
        };
        Hd44780::new(MockBus::default(), MockDelay::default(), config)
    }

    /// Reassemble the bytes sent as (mode, value) pairs
    ///
    /// Nibbles are taken from the EN-high half of each two-byte write.
    fn decode(writes: &[(u8, Vec<u8>)]) -> Vec<(u8, u8)> {
        let nibbles: Vec<u8> = writes
            .iter()
            .filter(|(_, d)| d.len() == 2)
            .map(|(_, d)| d[0])
            .collect();
        nibbles
            .chunks(2)
            .map(|pair| (pair[0] & pin::RS, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = lcd(16, 2);
        lcd.init().unwrap();
        let (bus, delay) = lcd.release();

        // Expander reset with backlight on
        assert_eq!(bus.writes[0], (0x27, vec![pin::BACKLIGHT]));

        // Four single nibbles: 0x3, 0x3, 0x3, 0x2
        let starts: Vec<u8> = bus.writes[1..5].iter().map(|(_, d)| d[0] >> 4).collect();
        assert_eq!(starts, [0x3, 0x3, 0x3, 0x2]);
        for (_, d) in &bus.writes[1..5] {
            assert_eq!(d[0] & pin::EN, pin::EN);
            assert_eq!(d[1] & pin::EN, 0);
        }

        // Then full commands
        let commands = decode(&bus.writes[5..]);
        assert_eq!(
            commands,
            [
                (0, cmd::FUNCTION_SET),
                (0, cmd::DISPLAY_ON),
                (0, cmd::CLEAR),
                (0, cmd::ENTRY_MODE),
            ]
        );

        // Power-on wait alone is 50 ms
        assert!(delay.total_ns >= 50_000_000);
    }

    #[test]
    fn test_write_at_row_addresses() {
        let mut lcd = lcd(20, 4);
        lcd.init().unwrap();

        for (row, offset) in ROW_OFFSETS.iter().enumerate() {
            lcd.i2c.writes.clear();
            lcd.write_at(3, row as u8, b"A").unwrap();
            let sent = decode(&lcd.i2c.writes);
            assert_eq!(sent, [(0, cmd::SET_DDRAM_ADDR | (offset + 3)), (pin::RS, b'A')]);
        }
    }

    #[test]
    fn test_write_clips_to_row() {
        let mut lcd = lcd(16, 2);
        lcd.init().unwrap();
        lcd.i2c.writes.clear();

        lcd.write_at(14, 0, b"xyz").unwrap();
        let sent = decode(&lcd.i2c.writes);
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2], (pin::RS, b'y'));
    }

    #[test]
    fn test_invalid_position() {
        let mut lcd = lcd(16, 2);
        lcd.init().unwrap();
        assert_eq!(lcd.write_at(16, 0, b"x"), Err(LcdError::InvalidPosition));
        assert_eq!(lcd.write_at(0, 2, b"x"), Err(LcdError::InvalidPosition));
    }

    #[test]
    fn test_create_char() {
        let mut lcd = lcd(16, 2);
        lcd.init().unwrap();
        lcd.i2c.writes.clear();

        lcd.create_char(1, &[0x1C; 8]).unwrap();
        let sent = decode(&lcd.i2c.writes);
        assert_eq!(sent[0], (0, cmd::SET_CGRAM_ADDR | 0x08));
        assert!(sent[1..9].iter().all(|&b| b == (pin::RS, 0x1C)));
        assert_eq!(sent[9], (0, cmd::SET_DDRAM_ADDR));

        assert_eq!(lcd.create_char(8, &[0; 8]), Err(LcdError::InvalidSlot));
    }

    #[test]
    fn test_requires_init() {
        let mut lcd = lcd(16, 2);
        assert_eq!(lcd.write_at(0, 0, b"x"), Err(LcdError::NotInitialized));
        assert_eq!(
            DisplayBackend::define_glyph(&mut lcd, 0, &[0; 8]),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_backlight_off_clears_bit() {
        let mut lcd = lcd(16, 2);
        lcd.init().unwrap();
        lcd.set_backlight(false).unwrap();
        lcd.i2c.writes.clear();

        lcd.write_at(0, 0, b"a").unwrap();
        assert!(lcd
            .i2c
            .writes
            .iter()
            .all(|(_, d)| d.iter().all(|b| b & pin::BACKLIGHT == 0)));
    }

    #[test]
    fn test_bus_error_maps_to_communication() {
        let mut lcd = lcd(16, 2);
        lcd.init().unwrap();
        lcd.i2c.fail = true;
        assert_eq!(lcd.write_at(0, 0, b"a"), Err(LcdError::Bus(Nack)));
        assert_eq!(
            DisplayBackend::draw_bytes(&mut lcd, 0, 0, b"a"),
            Err(DisplayError::Communication)
        );
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(DisplayBackend::dimensions(&lcd(20, 4)), (20, 4));
    }
}
