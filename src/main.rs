#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

mod display;

/// Period of the tick that samples the buttons and advances the blink.
const TICK_PERIOD_US: u32 = 5_000;
const I2C_FREQ_KHZ: u32 = 100;
const SPI_FREQ_HZ: u32 = 2_000_000;

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use clock_core::{Blink, Controller, Debouncer, View};
    use defmt::{debug, info};
    use embedded_hal::digital::v2::{InputPin, OutputPin, ToggleableOutputPin};
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        gpio::{
            bank0::{Gpio12, Gpio13, Gpio14, Gpio15, Gpio20, Gpio21, Gpio25, Gpio4, Gpio5},
            FunctionI2C, FunctionSio, FunctionSpi, Pin, PullDown, PullUp, SioInput, SioOutput,
        },
        i2c::I2C,
        pac,
        sio::Sio,
        spi::Spi,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
    };

    use crate::display::Max7219Bus;

    type Button<P> = Pin<P, FunctionSio<SioInput>, PullUp>;
    type Led<P> = Pin<P, FunctionSio<SioOutput>, PullDown>;
    type RtcBus = I2C<
        pac::I2C0,
        (
            Pin<Gpio4, FunctionI2C, PullUp>,
            Pin<Gpio5, FunctionI2C, PullUp>,
        ),
    >;

    // Touched by both the tick interrupt and the main loop
    #[shared]
    struct Shared {
        blink: Blink,
        buttons: Debouncer,
    }

    #[local]
    struct Local {
        controller: Controller<RtcBus, Max7219Bus>,
        view_select: Button<Gpio12>,
        mode_button: Button<Gpio13>,
        increment_button: Button<Gpio14>,
        decrement_button: Button<Gpio15>,
        am_led: Led<Gpio20>,
        pm_led: Led<Gpio21>,
        life_led: Led<Gpio25>,
        alarm: Alarm0,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        alarm.schedule(TICK_PERIOD_US.micros()).unwrap();
        alarm.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let mut life_led = pins.led.into_push_pull_output();
        life_led.set_high().ok();

        let i2c = I2C::i2c0(
            pac.I2C0,
            pins.gpio4.reconfigure::<FunctionI2C, PullUp>(),
            pins.gpio5.reconfigure::<FunctionI2C, PullUp>(),
            I2C_FREQ_KHZ.kHz(),
            &mut pac.RESETS,
            &clocks.system_clock,
        );

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let miso = pins.gpio16.into_function::<FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            SPI_FREQ_HZ.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let display = Max7219Bus::new(spi, cs).unwrap();
        let mut controller = Controller::new(i2c, display);
        if let Err(e) = controller.start() {
            defmt::panic!("bring-up failed: {}", defmt::Debug2Format(&e));
        }
        info!("clock running");

        (
            Shared {
                blink: Blink::new(),
                buttons: Debouncer::new(),
            },
            Local {
                controller,
                view_select: pins.gpio12.into_pull_up_input(),
                mode_button: pins.gpio13.into_pull_up_input(),
                increment_button: pins.gpio14.into_pull_up_input(),
                decrement_button: pins.gpio15.into_pull_up_input(),
                am_led: pins.gpio20.into_push_pull_output(),
                pm_led: pins.gpio21.into_push_pull_output(),
                life_led,
                alarm,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: periodic tick. Debounce and blink only, no bus traffic.
    #[task(
        binds = TIMER_IRQ_0,
        priority = 1,
        shared = [blink, buttons],
        local = [alarm, life_led, mode_button, increment_button, decrement_button]
    )]
    fn tick(mut ctx: tick::Context) {
        ctx.local.alarm.clear_interrupt();
        ctx.local.alarm.schedule(TICK_PERIOD_US.micros()).unwrap();

        // Buttons pull to ground
        let raw = [
            ctx.local.mode_button.is_low().unwrap_or(false),
            ctx.local.increment_button.is_low().unwrap_or(false),
            ctx.local.decrement_button.is_low().unwrap_or(false),
        ];
        ctx.shared.buttons.lock(|b| b.sample(raw));

        if ctx.shared.blink.lock(|b| b.tick()) {
            ctx.local.life_led.toggle().ok();
        }
    }

    // Main loop: input, state machine, render, RTC.
    #[idle(shared = [blink, buttons], local = [controller, view_select, am_led, pm_led])]
    fn idle(mut ctx: idle::Context) -> ! {
        loop {
            let edges = ctx.shared.buttons.lock(|b| b.edges());
            let blink = ctx.shared.blink.lock(|b| b.mask());
            let view = if ctx.local.view_select.is_high().unwrap_or(false) {
                View::Date
            } else {
                View::Time
            };

            if !edges.is_empty() {
                debug!("{}", edges);
            }

            match ctx.local.controller.cycle(edges, view, blink) {
                Ok(indicator) => {
                    ctx.local.am_led.set_state(indicator.am.into()).ok();
                    ctx.local.pm_led.set_state(indicator.pm.into()).ok();
                }
                Err(e) => defmt::panic!("bus failure: {}", defmt::Debug2Format(&e)),
            }
        }
    }
}
