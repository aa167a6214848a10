//! Character-LCD display adapter.
//!
//! Implements [`DisplayPort`] on the 16x2 HD44780 behind a PCF8574 I²C
//! backpack, driven through `hd44780-driver`. Status lines are always
//! full width, so each one simply overwrites its row; unchanged rows are
//! skipped to keep I²C traffic down at the 200 ms cycle rate.

use embedded_hal_0_2::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_0_2::blocking::i2c::Write;
use hd44780_driver::bus::I2CBus;
use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};
use log::warn;

use crate::app::ports::DisplayPort;
use crate::app::status::{LcdLine, StatusLines};
use crate::error::ActuatorError;

/// DDRAM address of the first column on each row.
const ROW_START: [u8; 2] = [0x00, 0x40];

pub struct LcdDisplay<I: Write, D> {
    lcd: HD44780<I2CBus<I>>,
    delay: D,
    shown: [Option<LcdLine>; 2],
    faulted: bool,
}

impl<I, D> LcdDisplay<I, D>
where
    I: Write,
    D: DelayUs<u16> + DelayMs<u8>,
{
    /// Initialise the controller. Fails if the backpack does not answer.
    pub fn new(i2c: I, mut delay: D, address: u8) -> Result<Self, ActuatorError> {
        let mut lcd = HD44780::new_i2c(i2c, address, &mut delay)
            .map_err(|_| ActuatorError::I2cWriteFailed)?;
        lcd.reset(&mut delay)
            .and_then(|()| lcd.clear(&mut delay))
            .and_then(|()| {
                lcd.set_display_mode(
                    DisplayMode {
                        display: Display::On,
                        cursor_visibility: Cursor::Invisible,
                        cursor_blink: CursorBlink::Off,
                    },
                    &mut delay,
                )
            })
            .map_err(|_| ActuatorError::I2cWriteFailed)?;
        Ok(Self {
            lcd,
            delay,
            shown: [None, None],
            faulted: false,
        })
    }

    /// Blank the screen, e.g. after the boot splash.
    pub fn clear(&mut self) {
        self.shown = [None, None];
        if self.lcd.clear(&mut self.delay).is_err() {
            warn!("display: clear failed: {}", ActuatorError::I2cWriteFailed);
        }
    }

    fn write_row(&mut self, row: usize, text: &LcdLine) -> Result<(), ActuatorError> {
        if self.shown[row].as_ref() == Some(text) {
            return Ok(());
        }
        self.lcd
            .set_cursor_pos(ROW_START[row], &mut self.delay)
            .and_then(|()| self.lcd.write_str(text, &mut self.delay))
            .map_err(|_| ActuatorError::I2cWriteFailed)?;
        self.shown[row] = Some(text.clone());
        Ok(())
    }
}

impl<I, D> DisplayPort for LcdDisplay<I, D>
where
    I: Write,
    D: DelayUs<u16> + DelayMs<u8>,
{
    fn show(&mut self, lines: &StatusLines) {
        let result = self
            .write_row(0, &lines.top)
            .and_then(|()| self.write_row(1, &lines.bottom));
        match result {
            Ok(()) => self.faulted = false,
            Err(e) => {
                // Contents are unknown after a failed transfer.
                self.shown = [None, None];
                if !self.faulted {
                    warn!("display: {}", e);
                    self.faulted = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::app::decision::{AlarmCondition, SensorSample};
    use crate::app::status;

    /// Counts I²C writes, shared with the test body.
    #[derive(Clone, Default)]
    struct CountingBus {
        writes: Rc<Cell<usize>>,
    }

    impl Write for CountingBus {
        type Error = ();

        fn write(&mut self, _address: u8, _bytes: &[u8]) -> Result<(), ()> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayUs<u16> for NoDelay {
        fn delay_us(&mut self, _us: u16) {}
    }

    impl DelayMs<u8> for NoDelay {
        fn delay_ms(&mut self, _ms: u8) {}
    }

    fn sample() -> SensorSample {
        SensorSample {
            temperature_c: 27.0,
            humidity_pct: 75.0,
            distance_cm: Some(50.0),
        }
    }

    #[test]
    fn unchanged_rows_are_not_rewritten() {
        let bus = CountingBus::default();
        let mut display = LcdDisplay::new(bus.clone(), NoDelay, 0x27).unwrap();
        let after_init = bus.writes.get();

        display.show(&status::render(&sample(), AlarmCondition::None));
        let both_rows = bus.writes.get() - after_init;
        assert!(both_rows > 0);

        let before = bus.writes.get();
        display.show(&status::render(&sample(), AlarmCondition::None));
        assert_eq!(bus.writes.get(), before);

        // Only the bottom row changes.
        display.show(&status::render(&sample(), AlarmCondition::WaterLow));
        let one_row = bus.writes.get() - before;
        assert!(one_row > 0);
        assert!(one_row < both_rows);
    }

    #[test]
    fn clear_forces_full_redraw() {
        let bus = CountingBus::default();
        let mut display = LcdDisplay::new(bus.clone(), NoDelay, 0x27).unwrap();
        let lines = status::render(&sample(), AlarmCondition::None);
        display.show(&lines);

        display.clear();
        assert_eq!(display.shown, [None, None]);

        let before = bus.writes.get();
        display.show(&lines);
        assert!(bus.writes.get() > before);
        assert_eq!(
            display.shown,
            [Some(lines.top.clone()), Some(lines.bottom.clone())]
        );
    }
}
