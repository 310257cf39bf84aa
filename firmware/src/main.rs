#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::{self as irq, Mutex};
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use linetrack::config::TELEMETRY_INTERVAL;
use linetrack::telemetry::Snapshot;
use linetrack::{ControlConfig, LineFollower, SharedState, StepScheduler};
use linetrack_fw::hw::{pins::ADC_CHANNELS, pwm, Adc, BoardPins, StepPin, StepTimer3, Usart};

/// TIM3 runs at 16 MHz / (15 + 1) = 1 MHz, so one step-period tick is 1 µs.
const STEP_TIMER_PRESCALER: u16 = 15;

type Scheduler = StepScheduler<StepTimer3, StepPin<'B', 4>, StepPin<'A', 2>>;

static SHARED: SharedState = SharedState::new();
static SCHEDULER: Mutex<RefCell<Option<Scheduler>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let mut pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let mut usart = Usart::new(serial);

    // Drive directions are fixed: right wheel CW, left wheel CCW
    pins.steppers.right_dir.set_low();
    pins.steppers.left_dir.set_high();

    // Sensors and motors
    let adc = Adc::adc1(dp.ADC1, ADC_CHANNELS);
    let (pwm1, pwm2) = pwm::tim4(dp.TIM4);

    let mut follower = match LineFollower::new(adc, pwm1, pwm2, ControlConfig::default()) {
        Ok(follower) => follower,
        Err(e) => halt(&mut usart, e),
    };
    if let Err(e) = follower.init(&SHARED) {
        halt(&mut usart, e);
    }

    // Step scheduler
    let timer = StepTimer3::tim3(dp.TIM3, STEP_TIMER_PRESCALER);
    let mut scheduler = StepScheduler::new(
        timer,
        StepPin::new(pins.steppers.left_step),
        StepPin::new(pins.steppers.right_step),
    );
    scheduler.start(&SHARED);
    irq::free(|cs| *SCHEDULER.borrow(cs).borrow_mut() = Some(scheduler));
    unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIM3) };

    let config = *follower.config();
    usart.info(format_args!(
        "linetrack up, threshold {} step period {} ({}..{}) tracking {}",
        config.threshold,
        SHARED.step_rate().ticks(),
        config.min_step_period,
        config.max_step_period,
        if config.setpoint_tracking { "on" } else { "off" },
    ));

    let result = follower.run(&SHARED, |result| match result {
        Ok(_) if SHARED.iterations() % TELEMETRY_INTERVAL == 0 => {
            usart.info(format_args!("{}", Snapshot::capture(&SHARED)));
        }
        Ok(_) => {}
        Err(e) => usart.warn(format_args!("{}", e)),
    });

    match result {
        Ok(()) => usart.info(format_args!("stopped")),
        Err(e) => halt(&mut usart, e),
    }

    loop {
        cortex_m::asm::nop();
    }
}

/// Report a fatal error, stop the step timer and park the core.
fn halt<U: hal::serial::Instance>(usart: &mut Usart<U>, e: linetrack::Error) -> ! {
    SHARED.request_shutdown();
    usart.error(format_args!("fatal: {}", e));
    loop {
        cortex_m::asm::nop();
    }
}

#[interrupt]
fn TIM3() {
    irq::free(|cs| {
        if let Some(scheduler) = SCHEDULER.borrow(cs).borrow_mut().as_mut() {
            scheduler.on_expiry(&SHARED);
        }
    });
}
