pub mod adc;
pub mod calibration;

use crate::sensors::traits::Delay;
use esp_idf_svc::hal::delay::FreeRtos;
use std::time::Duration;

/// Blocks the calling task with `vTaskDelay`, letting the scheduler run others.
#[derive(Debug, Default, Copy, Clone)]
pub struct FreeRtosDelay;

impl Delay for FreeRtosDelay {
    fn suspend(&mut self, duration: Duration) {
        FreeRtos::delay_ms(duration.as_millis() as u32);
    }
}
