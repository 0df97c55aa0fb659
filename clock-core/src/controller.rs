//! One pass of the main loop: edges in, RTC and display traffic out.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::{
    clock::{Clock, Edges, Mode},
    display::{self, DisplayBus, Indicator, View},
    rtc::Rtc,
};

/// A failed bus transaction. Nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<R, D> {
    Rtc(R),
    Display(D),
}

pub struct Controller<I2C, D> {
    clock: Clock,
    rtc: Rtc<I2C>,
    display: D,
}

impl<I2C, E, D> Controller<I2C, D>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    D: DisplayBus,
{
    pub fn new(i2c: I2C, display: D) -> Self {
        Self {
            clock: Clock::new(),
            rtc: Rtc::new(i2c),
            display,
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn release(self) -> (I2C, D) {
        (self.rtc.release(), self.display)
    }

    /// Configures the RTC and the display, then loads the current time.
    pub fn start(&mut self) -> Result<(), Error<E, D::Error>> {
        self.rtc.configure().map_err(Error::Rtc)?;
        display::configure(&mut self.display, self.clock.intensity()).map_err(Error::Display)?;
        let time = self.rtc.read().map_err(Error::Rtc)?;
        self.clock.set_time(time);
        info!("started at {}", time);
        Ok(())
    }

    /// Runs one cycle and returns what the AM/PM indicators should show.
    ///
    /// `blink` is the scheduler's mask, sampled once by the caller.
    pub fn cycle(
        &mut self,
        edges: Edges,
        view: View,
        blink: u8,
    ) -> Result<Indicator, Error<E, D::Error>> {
        if let Some(time) = self.clock.step(edges) {
            self.rtc.write(&time).map_err(Error::Rtc)?;
        }

        let (frame, indicator) = display::render(&self.clock, view, blink);
        display::write_frame(&mut self.display, &frame).map_err(Error::Display)?;
        display::set_intensity(&mut self.display, self.clock.intensity())
            .map_err(Error::Display)?;

        if self.clock.mode() == Mode::Run {
            let time = self.rtc.read().map_err(Error::Rtc)?;
            self.clock.set_time(time);
        }
        Ok(indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bcd::to_bcd,
        blink::{Blink, BLINK_HALF_PERIOD},
        clock::Field,
        display::{tests::Recorder, REG_INTENSITY},
        rtc::{CONTROL_SQW_OFF, REG_CONTROL, REG_SECONDS, RTC_ADDRESS},
        time::{TimeRecord, DATE_MASK},
    };
    use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const REGS: [u8; 7] = [0x21, 0x43, 0x66, 0x01, 0x14, 0x02, 0x16];
    const MODE: Edges = Edges {
        mode: true,
        ..Edges::NONE
    };
    const INC: Edges = Edges {
        increment: true,
        ..Edges::NONE
    };

    fn read() -> I2cTrans {
        I2cTrans::write_read(RTC_ADDRESS, vec![REG_SECONDS], REGS.to_vec())
    }

    /// Digit values of the last frame pushed, followed by the intensity write.
    fn last_frame(bus: &Recorder) -> Vec<(u8, u8)> {
        bus.writes[bus.writes.len() - 7..].to_vec()
    }

    #[test]
    fn test_start() {
        let expectations = [
            I2cTrans::write(RTC_ADDRESS, vec![REG_CONTROL, CONTROL_SQW_OFF]),
            I2cTrans::write_read(RTC_ADDRESS, vec![REG_SECONDS], vec![REGS[0]]),
            read(),
        ];
        let mut c = Controller::new(I2cMock::new(&expectations), Recorder::default());
        c.start().unwrap();
        assert_eq!(*c.clock().time(), TimeRecord::from_registers(REGS));
        let (mut i2c, bus) = c.release();
        i2c.done();
        assert_eq!(bus.writes.len(), 4);
    }

    #[test]
    fn test_run_cycle_reads_rtc_and_renders_time() {
        let expectations = [read(), read()];
        let mut c = Controller::new(I2cMock::new(&expectations), Recorder::default());
        c.cycle(Edges::NONE, View::Time, 0).unwrap();
        let ind = c.cycle(Edges::NONE, View::Time, 0).unwrap();
        assert_eq!(ind, Indicator { am: false, pm: true });
        let (mut i2c, bus) = c.release();
        i2c.done();
        assert_eq!(
            last_frame(&bus),
            [(1, 1), (2, 2), (3, 3), (4, 4), (5, 6), (6, 0), (REG_INTENSITY, 0x07)]
        );
    }

    #[test]
    fn test_set_day_scenario() {
        // one Run cycle reads; nothing touches the RTC while editing
        let expectations = [read()];
        let mut c = Controller::new(I2cMock::new(&expectations), Recorder::default());
        let mut blink = Blink::new();

        c.cycle(Edges::NONE, View::Time, blink.mask()).unwrap();
        c.cycle(MODE, View::Time, blink.mask()).unwrap();
        c.cycle(MODE, View::Time, blink.mask()).unwrap();
        assert_eq!(c.clock().mode(), Mode::Set(Field::Day));
        for _ in 0..3 {
            c.cycle(INC, View::Time, blink.mask()).unwrap();
        }
        assert_eq!(c.clock().edit_count(), 3);
        assert_eq!(c.clock().time().date, to_bcd(3) & DATE_MASK);
        assert_eq!(c.clock().time().date, 0x03);

        let ind = c.cycle(Edges::NONE, View::Time, blink.mask()).unwrap();
        assert_eq!(ind, Indicator::EDITING_DATE);

        for _ in 0..BLINK_HALF_PERIOD {
            blink.tick();
        }
        c.cycle(Edges::NONE, View::Time, blink.mask()).unwrap();
        let blanked = last_frame(&c.display);

        for _ in 0..BLINK_HALF_PERIOD {
            blink.tick();
        }
        c.cycle(Edges::NONE, View::Time, blink.mask()).unwrap();
        let shown = last_frame(&c.display);

        let (mut i2c, _) = c.release();
        i2c.done();

        assert_eq!(&blanked[2..4], &[(3, 0x0F), (4, 0x0F)]);
        assert_eq!(&shown[2..4], &[(3, 3), (4, 0)]);
        // year keeps its true digits in both phases
        assert_eq!(&blanked[0..2], &[(1, 6), (2, 1)]);
        assert_eq!(&shown[0..2], &[(1, 6), (2, 1)]);
    }

    #[test]
    fn test_session_writes_once_at_close() {
        let closed = TimeRecord {
            second: 0x00,
            minute: 0x00,
            hour: 0x40,
            day_of_week: 0x01,
            date: 0x00,
            month: 0x00,
            year: 0x00,
        };
        let mut frame = vec![REG_SECONDS];
        frame.extend_from_slice(&closed.to_registers());
        let expectations = [I2cTrans::write(RTC_ADDRESS, frame), read()];
        let mut c = Controller::new(I2cMock::new(&expectations), Recorder::default());
        // opens the session, then walks Month..=Minute
        for _ in 0..5 {
            c.cycle(MODE, View::Time, 0).unwrap();
        }
        assert_eq!(c.clock().mode(), Mode::Set(Field::Minute));
        c.cycle(MODE, View::Time, 0).unwrap();
        assert_eq!(c.clock().mode(), Mode::Run);
        assert_eq!(*c.clock().time(), TimeRecord::from_registers(REGS));
        let (mut i2c, _) = c.release();
        i2c.done();
    }

    #[test]
    fn test_display_error_is_reported() {
        struct Broken;
        impl DisplayBus for Broken {
            type Error = u8;
            fn write(&mut self, register: u8, _: u8) -> Result<(), u8> {
                Err(register)
            }
        }

        let mut c = Controller::new(I2cMock::new(&[]), Broken);
        assert!(matches!(
            c.cycle(Edges::NONE, View::Date, 0),
            Err(Error::Display(1))
        ));
        let (mut i2c, _) = c.release();
        i2c.done();
    }
}
