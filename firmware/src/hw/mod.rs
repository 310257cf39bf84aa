pub mod adc;
pub mod pins;
pub mod pwm;
pub mod step_pin;
pub mod step_timer;
pub mod usart;

pub use adc::Adc;
pub use pins::BoardPins;
pub use pwm::PwmChannel;
pub use step_pin::StepPin;
pub use step_timer::StepTimer3;
pub use usart::{Level, Usart};
