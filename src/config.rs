use crate::sensors::oversample::ReadFailurePolicy;
use crate::sensors::thresholds::{Bucket, Classification};
use crate::types::*;
use serde::Serialize;
use std::time::Duration;

pub const ADC_MAX_RAW: Raw = 4095;
pub const ADC_FULL_SCALE_MV: Millivolts = 3300;
pub const ADC_SAMPLES: usize = 64;

pub const SENSOR_THREAD_STACK_SIZE: usize = 8 * 1024;

#[cfg(feature = "simulate")]
pub const SIMULATED_NOISE_STD_DEV: f32 = 12.0;
#[cfg(feature = "simulate")]
pub const SIMULATED_STEP_PER_READ: f32 = 0.5;

#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub enum Attenuation {
    Db0,
    Db2_5,
    Db6,
    /// Roughly the full 0-3.3V range.
    Db12,
}

pub const LIGHT_LEVELS: Classification = Classification {
    buckets: &[
        Bucket {
            below: 20.0,
            label: "dark",
        },
        Bucket {
            below: 50.0,
            label: "low light",
        },
        Bucket {
            below: 80.0,
            label: "medium light",
        },
    ],
    otherwise: "bright",
};

#[derive(Serialize, Debug, Copy, Clone)]
pub struct SensorProfile {
    /// Log target for everything the monitor emits.
    pub tag: &'static str,
    pub sensor: &'static str,
    pub gpio: u8,
    pub attenuation: Attenuation,
    pub samples: usize,
    pub interval: Duration,
    pub on_read_failure: ReadFailurePolicy,
    pub classification: Option<Classification>,
}

impl SensorProfile {
    /// LDR on GPIO35 (ADC1 channel 7).
    pub const LDR: SensorProfile = SensorProfile {
        tag: "LDR_SENSOR",
        sensor: "light dependent resistor",
        gpio: 35,
        attenuation: Attenuation::Db12,
        samples: ADC_SAMPLES,
        interval: Duration::from_millis(1000),
        on_read_failure: ReadFailurePolicy::SkipSample,
        classification: Some(LIGHT_LEVELS),
    };

    /// Potentiometer on GPIO34 (ADC1 channel 6).
    pub const POTENTIOMETER: SensorProfile = SensorProfile {
        tag: "ADC_POT",
        sensor: "potentiometer",
        gpio: 34,
        attenuation: Attenuation::Db12,
        samples: ADC_SAMPLES,
        interval: Duration::from_millis(500),
        on_read_failure: ReadFailurePolicy::SkipSample,
        classification: None,
    };
}
