//! Ticker firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32G431KB.
//!
//! Pin assignments:
//!   PA0–PA3 = pots 1–4 (ADC1_IN1–IN4)
//!   PB6     = clock in  (EXTI6, rising edge)
//!   PB7     = reset in  (EXTI7, both edges)
//!   PB5     = button    (active low, internal pull-up)
//!   PA8     = trigger out
//!   PA9     = clock LED
//!   PA10, PA11, PA12, PA15 = position LEDs 1–4

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_stm32::adc::Adc;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{AnyPin, Input, Level, Output, Pin, Pull, Speed};
use embassy_stm32::peripherals::{PB6, PB7};
use embassy_time::{Delay, Duration, Ticker};
use static_cell::StaticCell;

use firmware::{App, IsrCell, Leds, PinBar, SharedClock, TriggerOut};
use platform::config::{self, NUM_POTS};
use platform::{Bpm, PinState, PotReading, StepCount};
use timebase::TimebaseConfig;

use defmt_rtt as _;
// Panic handler
use panic_probe as _;

type BoardOutput = TriggerOut<Output<'static, AnyPin>>;
type BoardLeds = Leds<Output<'static, AnyPin>, PinBar<Output<'static, AnyPin>>>;

/// Timebase and reset gate, shared by the tick, edge and poll tasks.
static CLOCK: SharedClock = SharedClock::new(TimebaseConfig::DEFAULT);

static OUTPUT: StaticCell<IsrCell<BoardOutput>> = StaticCell::new();
static LEDS: StaticCell<IsrCell<BoardLeds>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("{=str} v{=str}", config::app_title(), config::APP_VERSION);
    let p = embassy_stm32::init(embassy_stm32::Config::default());

    let output: &'static IsrCell<BoardOutput> = OUTPUT.init(IsrCell::new(TriggerOut::new(
        Output::new(p.PA8.degrade(), Level::Low, Speed::Low),
    )));
    let bar = PinBar::new([
        Output::new(p.PA10.degrade(), Level::Low, Speed::Low),
        Output::new(p.PA11.degrade(), Level::Low, Speed::Low),
        Output::new(p.PA12.degrade(), Level::Low, Speed::Low),
        Output::new(p.PA15.degrade(), Level::Low, Speed::Low),
    ]);
    let leds: &'static IsrCell<BoardLeds> = LEDS.init(IsrCell::new(Leds::new(
        Output::new(p.PA9.degrade(), Level::Low, Speed::Low),
        bar,
    )));

    let mut adc = Adc::new(p.ADC1, &mut Delay);
    let mut pot_pins = (p.PA0, p.PA1, p.PA2, p.PA3);
    let mut read_pot = |adc: &mut Adc<'static, _>, channel: usize| {
        let raw = match channel {
            0 => adc.read(&mut pot_pins.0),
            1 => adc.read(&mut pot_pins.1),
            2 => adc.read(&mut pot_pins.2),
            _ => adc.read(&mut pot_pins.3),
        };
        PotReading::from_adc12(raw)
    };
    let mut initial = [PotReading::CENTER; NUM_POTS];
    for (channel, reading) in initial.iter_mut().enumerate() {
        *reading = read_pot(&mut adc, channel);
    }
    defmt::info!("pots: {}", initial);

    CLOCK.init(Bpm::DEFAULT, StepCount::DEFAULT);
    let mut app = App::new(initial);

    let clock_in = ExtiInput::new(Input::new(p.PB6, Pull::Down), p.EXTI6);
    let reset_in = ExtiInput::new(Input::new(p.PB7, Pull::Down), p.EXTI7);
    let button = Input::new(p.PB5, Pull::Up);

    defmt::unwrap!(spawner.spawn(tick_task(output, leds)));
    defmt::unwrap!(spawner.spawn(jack_task(clock_in, reset_in)));
    defmt::info!(
        "running: {=u16} bpm, {=u8} steps",
        Bpm::DEFAULT.get(),
        StepCount::DEFAULT.get()
    );

    // Poll loop: one pot conversion, one UI step and one sequencer pass per
    // millisecond.
    let mut out_handle = output;
    let mut leds_handle = leds;
    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        ticker.next().await;
        let channel = app.pots_mut().channel();
        let reading = read_pot(&mut adc, channel);
        app.pots_mut().on_sample(reading);
        app.on_ms(&CLOCK, button.is_low(), &mut out_handle, &mut leds_handle);
    }
}

/// 1 ms tick: timebase, output pulse shaper, LED timeouts.
#[embassy_executor::task]
async fn tick_task(output: &'static IsrCell<BoardOutput>, leds: &'static IsrCell<BoardLeds>) {
    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        ticker.next().await;
        CLOCK.on_tick();
        output.lock(TriggerOut::on_ms);
        leds.lock(Leds::on_ms);
    }
}

/// Clock and reset jacks.
#[embassy_executor::task]
async fn jack_task(mut clock_in: ExtiInput<'static, PB6>, mut reset_in: ExtiInput<'static, PB7>) {
    join(clock_loop(&mut clock_in), reset_loop(&mut reset_in)).await;
}

async fn clock_loop(pin: &mut ExtiInput<'static, PB6>) {
    loop {
        pin.wait_for_rising_edge().await;
        CLOCK.on_external_pulse();
    }
}

async fn reset_loop(pin: &mut ExtiInput<'static, PB7>) {
    let mut level = PinState::from(pin.is_high());
    loop {
        pin.wait_for_any_edge().await;
        let now = PinState::from(pin.is_high());
        if let Some(edge) = level.edge_to(now) {
            defmt::trace!("reset edge: {}", edge);
            CLOCK.on_reset_edge(edge);
        }
        level = now;
    }
}
