use crate::config;
use crate::types::{Millivolts, Percent, Raw};

/// Linear model of the converter: `0..=top` raw counts span `0..=full_scale` millivolts.
///
/// This is the conversion used whenever the platform has no calibration scheme for the
/// channel, so it has to stay a plain integer formula with truncating division.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Adc {
    top: Raw,
    full_scale: Millivolts,
}

impl Default for Adc {
    fn default() -> Self {
        Adc::new(config::ADC_MAX_RAW, config::ADC_FULL_SCALE_MV)
    }
}

impl Adc {
    pub fn new(top: Raw, full_scale: Millivolts) -> Self {
        Self {
            top: top.max(1),
            full_scale,
        }
    }

    pub fn top(&self) -> Raw {
        self.top
    }

    pub fn clamp(&self, raw: Raw) -> Raw {
        raw.min(self.top)
    }

    pub fn raw_to_millivolts(&self, raw: Raw) -> Millivolts {
        Millivolts::from(self.clamp(raw)) * self.full_scale / Millivolts::from(self.top)
    }

    pub fn raw_to_percent(&self, raw: Raw) -> Percent {
        // multiply first so exact fractions like 819/4095 land on 20.0
        self.clamp(raw) as Percent * 100.0 / self.top as Percent
    }
}
