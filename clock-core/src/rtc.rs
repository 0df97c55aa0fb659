//! DS1307-style RTC over blocking I2C.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::time::{self, TimeRecord, OSCILLATOR_HALT};

/// 7-bit bus address.
pub const RTC_ADDRESS: u8 = 0x68;
pub const REG_SECONDS: u8 = 0x00;
pub const REG_CONTROL: u8 = 0x07;
/// Square-wave output disabled, OUT pin low.
pub const CONTROL_SQW_OFF: u8 = 0x00;

/// Moves the time record to and from the chip. Holds no copy of it.
pub struct Rtc<I2C> {
    i2c: I2C,
}

impl<I2C, E> Rtc<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Startup only: turns the square-wave output off and starts the
    /// oscillator if it was halted. Returns whether it was halted.
    pub fn configure(&mut self) -> Result<bool, E> {
        self.i2c
            .write(RTC_ADDRESS, &[REG_CONTROL, CONTROL_SQW_OFF])?;

        let mut seconds = [0_u8; 1];
        self.i2c
            .write_read(RTC_ADDRESS, &[REG_SECONDS], &mut seconds)?;

        let halted = seconds[0] & OSCILLATOR_HALT != 0;
        if halted {
            warn!("RTC oscillator was halted, starting it");
            self.i2c
                .write(RTC_ADDRESS, &[REG_SECONDS, seconds[0] & !OSCILLATOR_HALT])?;
        }
        Ok(halted)
    }

    /// Burst-reads the seven time registers starting at the seconds register.
    pub fn read(&mut self) -> Result<TimeRecord, E> {
        let mut regs = [0_u8; time::LEN];
        self.i2c.write_read(RTC_ADDRESS, &[REG_SECONDS], &mut regs)?;
        Ok(TimeRecord::from_registers(regs))
    }

    /// Burst-writes the seven time registers starting at the seconds register.
    pub fn write(&mut self, record: &TimeRecord) -> Result<(), E> {
        let mut frame = [0_u8; time::LEN + 1];
        frame[0] = REG_SECONDS;
        frame[1..].copy_from_slice(&record.to_registers());
        debug!("RTC write {}", record);
        self.i2c.write(RTC_ADDRESS, &frame)
    }
}
