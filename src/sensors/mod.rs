pub mod adc;
pub mod oversample;
#[cfg(feature = "simulate")]
pub mod simulated;
pub mod thresholds;
pub mod traits;
