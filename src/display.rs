//! The MAX7219 seen through the core's register-write interface.

use clock_core::DisplayBus;
use max7219::{connectors::SpiConnectorSW, DataError, MAX7219};
use rp_pico::hal::{
    gpio::{
        bank0::{Gpio16, Gpio17, Gpio18, Gpio19},
        FunctionSio, FunctionSpi, Pin, PullDown, SioOutput,
    },
    pac,
    spi::{Enabled, Spi},
};

pub type Spi0 = Spi<
    Enabled,
    pac::SPI0,
    (
        Pin<Gpio19, FunctionSpi, PullDown>,
        Pin<Gpio16, FunctionSpi, PullDown>,
        Pin<Gpio18, FunctionSpi, PullDown>,
    ),
>;
pub type CsPin = Pin<Gpio17, FunctionSio<SioOutput>, PullDown>;
type DisplayType = MAX7219<SpiConnectorSW<Spi0, CsPin>>;

/// Single device on the chain.
const DEVICE: usize = 0;

pub struct Max7219Bus(DisplayType);

impl Max7219Bus {
    /// Wakes the chip and blanks it. Scan limit, decode mode and intensity
    /// are written afterwards by the core's bring-up.
    pub fn new(spi: Spi0, cs: CsPin) -> Result<Self, DataError> {
        let mut display = MAX7219::from_spi_cs(1, spi, cs)?;
        display.power_on()?;
        display.clear_display(DEVICE)?;
        Ok(Self(display))
    }
}

impl DisplayBus for Max7219Bus {
    type Error = DataError;

    fn write(&mut self, register: u8, value: u8) -> Result<(), DataError> {
        self.0.write_raw_byte(DEVICE, register, value)
    }
}
