//! Foreground loop and step interrupt running against each other through one `SharedState`.

use core::convert::Infallible;
use std::cell::Cell;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin, StatefulOutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use linetrack::driver::{AnalogInput, StepTimer};
use linetrack::engine::Steering;
use linetrack::scheduler::AxisOutcome;
use linetrack::types::{Axis, Channel, DutyChannel, MotorDuty};
use linetrack::{ControlConfig, Error, LineFollower, SharedState, StepScheduler};

/// Analog input whose readings can be changed between iterations.
struct Adc {
    setpoint: u16,
    left: u16,
    right: u16,
    selected: Channel,
    stuck: bool,
}

impl Adc {
    fn new(setpoint: u16, left: u16, right: u16) -> Self {
        Self {
            setpoint,
            left,
            right,
            selected: Channel::Setpoint,
            stuck: false,
        }
    }
}

impl AnalogInput for Adc {
    type Error = Infallible;

    fn configure(&mut self, _channel: Channel) {}

    fn start(&mut self, channel: Channel) {
        self.selected = channel;
    }

    fn poll(&mut self) -> nb::Result<u16, Infallible> {
        if self.stuck {
            return Err(nb::Error::WouldBlock);
        }
        Ok(match self.selected {
            Channel::Setpoint => self.setpoint,
            Channel::LeftSensor => self.left,
            Channel::RightSensor => self.right,
        })
    }
}

#[derive(Default)]
struct Pwm(u16);

impl PwmErrorType for Pwm {
    type Error = Infallible;
}

impl SetDutyCycle for Pwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.0 = duty;
        Ok(())
    }
}

#[derive(Default)]
struct Timer {
    armed: Option<u16>,
}

impl StepTimer for Timer {
    fn arm(&mut self, ticks: u16) {
        self.armed = Some(ticks);
    }
    fn disable_expiry(&mut self) {}
    fn enable_expiry(&mut self) {}
    fn acknowledge(&mut self) {}
    fn disarm(&mut self) {
        self.armed = None;
    }
}

#[derive(Default)]
struct Pin(bool);

impl PinErrorType for Pin {
    type Error = Infallible;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 = false;
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0 = true;
        Ok(())
    }
}

impl StatefulOutputPin for Pin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0)
    }
    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0)
    }
}

fn rig(
    adc: Adc,
    shared: &SharedState,
) -> (
    LineFollower<Adc, Pwm, Pwm>,
    StepScheduler<Timer, Pin, Pin>,
) {
    let mut follower =
        LineFollower::new(adc, Pwm::default(), Pwm::default(), ControlConfig::default()).unwrap();
    follower.init(shared).unwrap();
    let mut scheduler = StepScheduler::new(Timer::default(), Pin::default(), Pin::default());
    scheduler.start(shared);
    (follower, scheduler)
}

#[test]
fn right_wheel_steps_while_left_sensor_is_over_the_line() {
    let shared = SharedState::new();
    let (mut follower, mut scheduler) = rig(Adc::new(0, 2500, 1800), &shared);

    let decision = follower.iterate(&shared).unwrap();
    assert_eq!(decision.steering, Steering::StepRight);

    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.left, AxisOutcome::Idle);
    assert_eq!(expiry.right, AxisOutcome::Toggled { high: true });

    // no new request, nothing moves
    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.right, AxisOutcome::Idle);

    follower.iterate(&shared).unwrap();
    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.right, AxisOutcome::Toggled { high: false });
    assert_eq!(shared.toggles(), 2);

    let (_, left, right) = scheduler.free();
    assert!(!left.0);
    assert!(!right.0);
}

#[test]
fn steering_follows_changing_sensor_readings() {
    let shared = SharedState::new();
    let (mut follower, mut scheduler) = rig(Adc::new(0, 1900, 1700), &shared);

    assert_eq!(follower.iterate(&shared).unwrap().steering, Steering::StepLeft);
    assert_eq!(
        scheduler.on_expiry(&shared).left,
        AxisOutcome::Toggled { high: true }
    );

    let (mut adc, pwm1, pwm2) = follower.free();
    adc.right = 2100;
    let mut follower = LineFollower::new(adc, pwm1, pwm2, ControlConfig::default()).unwrap();

    assert_eq!(follower.iterate(&shared).unwrap().steering, Steering::Balanced);
    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.left, AxisOutcome::Idle);
    assert_eq!(expiry.right, AxisOutcome::Idle);
    assert!(shared.step_level(Axis::Left));
}

#[test]
fn duties_reach_the_pwm_outputs() {
    let shared = SharedState::new();
    let (mut follower, _scheduler) = rig(Adc::new(0, 2500, 1800), &shared);

    follower.iterate(&shared).unwrap();

    let expected = [MotorDuty::from_sample(2500), MotorDuty::from_sample(1800)];
    assert_eq!(shared.duty(DutyChannel::Motor1), expected[0]);
    assert_eq!(shared.duty(DutyChannel::Motor2), expected[1]);

    let (_, pwm1, pwm2) = follower.free();
    assert_eq!(pwm1.0, expected[0].value());
    assert_eq!(pwm2.0, expected[1].value());
}

#[test]
fn scheduler_rearms_with_the_latest_setpoint_rate() {
    let shared = SharedState::new();
    let (mut follower, mut scheduler) = rig(Adc::new(0, 1000, 3000), &shared);
    let slow = follower.iterate(&shared).unwrap().step_rate;

    let (mut adc, pwm1, pwm2) = follower.free();
    adc.setpoint = 4095;
    let mut follower = LineFollower::new(adc, pwm1, pwm2, ControlConfig::default()).unwrap();
    let fast = follower.iterate(&shared).unwrap().step_rate;
    assert!(fast.ticks() < slow.ticks());

    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.rearmed, Some(fast));
    let (timer, _, _) = scheduler.free();
    assert_eq!(timer.armed, Some(fast.ticks()));
}

#[test]
fn conversion_timeout_skips_the_iteration() {
    let shared = SharedState::new();
    let mut adc = Adc::new(0, 2500, 1800);
    adc.stuck = true;
    let (mut follower, mut scheduler) = rig(adc, &shared);

    let err = follower.iterate(&shared).unwrap_err();
    assert!(matches!(err, Error::ConversionTimeout { .. }));
    assert!(err.is_recoverable());
    assert_eq!(shared.timeouts(), 1);
    assert_eq!(shared.iterations(), 0);

    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.right, AxisOutcome::Idle);
    assert_eq!(shared.duty(DutyChannel::Motor1), MotorDuty::OFF);
}

#[test]
fn shutdown_stops_motors_and_disarms_the_timer() {
    let shared = SharedState::new();
    let (mut follower, mut scheduler) = rig(Adc::new(2000, 2500, 1800), &shared);

    let seen = Cell::new(0u32);
    follower
        .run(&shared, |result| {
            assert!(result.is_ok());
            seen.set(seen.get() + 1);
            if seen.get() == 3 {
                shared.request_shutdown();
            }
        })
        .unwrap();

    assert_eq!(seen.get(), 3);
    assert_eq!(shared.iterations(), 3);
    assert!(shared.duty(DutyChannel::Motor1).is_off());
    assert!(shared.duty(DutyChannel::Motor2).is_off());

    // the pending right step is still serviced, then the timer stays off
    let expiry = scheduler.on_expiry(&shared);
    assert_eq!(expiry.right, AxisOutcome::Toggled { high: true });
    assert_eq!(expiry.rearmed, None);
    assert!(!scheduler.is_armed());

    let (_, pwm1, pwm2) = follower.free();
    assert_eq!(pwm1.0, MotorDuty::OFF.value());
    assert_eq!(pwm2.0, MotorDuty::OFF.value());
}
