use crate::error::Error;
use crate::sensors::traits::Calibration;
use crate::types::{Millivolts, Raw};
use esp_idf_sys::{self as sys, esp};

/// The scheme this chip's ADC calibration eFuses are written for.
#[cfg(any(esp32c3, esp32s3, esp32c6, esp32h2))]
pub type ChipCalibration = CurveFitting;
#[cfg(not(any(esp32c3, esp32s3, esp32c6, esp32h2)))]
pub type ChipCalibration = LineFitting;

fn raw_to_millivolts(handle: sys::adc_cali_handle_t, raw: Raw) -> Result<Millivolts, Error> {
    let mut millivolts: i32 = 0;
    esp!(unsafe { sys::adc_cali_raw_to_voltage(handle, i32::from(raw), &mut millivolts) })?;
    Ok(millivolts.max(0) as Millivolts)
}

/// ESP-IDF line fitting scheme for one unit/attenuation pair at the default bit width.
///
/// Only ESP32, ESP32-S2 and ESP32-C2 implement line fitting. Elsewhere, or when the eFuse
/// holds no reference values, creation fails and the caller is expected to fall back.
pub struct LineFitting {
    handle: sys::adc_cali_handle_t,
}

impl LineFitting {
    #[cfg(any(esp32, esp32s2, esp32c2))]
    pub fn new(
        unit: sys::adc_unit_t,
        _channel: sys::adc_channel_t,
        atten: sys::adc_atten_t,
    ) -> Result<Self, Error> {
        let config = sys::adc_cali_line_fitting_config_t {
            unit_id: unit,
            atten,
            bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_DEFAULT,
            ..Default::default()
        };
        let mut handle: sys::adc_cali_handle_t = core::ptr::null_mut();
        esp!(unsafe { sys::adc_cali_create_scheme_line_fitting(&config, &mut handle) })
            .map_err(|e| Error::Calibration(format!("line fitting scheme rejected: {}", e)))?;
        Ok(Self { handle })
    }

    #[cfg(not(any(esp32, esp32s2, esp32c2)))]
    pub fn new(
        _unit: sys::adc_unit_t,
        _channel: sys::adc_channel_t,
        _atten: sys::adc_atten_t,
    ) -> Result<Self, Error> {
        Err(Error::Calibration(
            "this chip has no line fitting scheme".to_string(),
        ))
    }
}

impl Calibration for LineFitting {
    fn scheme(&self) -> &'static str {
        "line fitting"
    }

    fn raw_to_millivolts(&self, raw: Raw) -> Result<Millivolts, Error> {
        raw_to_millivolts(self.handle, raw)
    }
}

#[cfg(any(esp32, esp32s2, esp32c2))]
impl Drop for LineFitting {
    fn drop(&mut self) {
        match esp!(unsafe { sys::adc_cali_delete_scheme_line_fitting(self.handle) }) {
            Ok(()) => log::debug!("Calibration scheme released"),
            Err(e) => log::error!("Failed to release calibration scheme: {:?}", e),
        }
    }
}

/// ESP-IDF curve fitting scheme, per channel, used by the ESP32-S3, C3, C6 and H2.
#[cfg(any(esp32c3, esp32s3, esp32c6, esp32h2))]
pub struct CurveFitting {
    handle: sys::adc_cali_handle_t,
}

#[cfg(any(esp32c3, esp32s3, esp32c6, esp32h2))]
impl CurveFitting {
    pub fn new(
        unit: sys::adc_unit_t,
        channel: sys::adc_channel_t,
        atten: sys::adc_atten_t,
    ) -> Result<Self, Error> {
        let config = sys::adc_cali_curve_fitting_config_t {
            unit_id: unit,
            chan: channel,
            atten,
            bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_DEFAULT,
        };
        let mut handle: sys::adc_cali_handle_t = core::ptr::null_mut();
        esp!(unsafe { sys::adc_cali_create_scheme_curve_fitting(&config, &mut handle) })
            .map_err(|e| Error::Calibration(format!("curve fitting scheme rejected: {}", e)))?;
        Ok(Self { handle })
    }
}

#[cfg(any(esp32c3, esp32s3, esp32c6, esp32h2))]
impl Calibration for CurveFitting {
    fn scheme(&self) -> &'static str {
        "curve fitting"
    }

    fn raw_to_millivolts(&self, raw: Raw) -> Result<Millivolts, Error> {
        raw_to_millivolts(self.handle, raw)
    }
}

#[cfg(any(esp32c3, esp32s3, esp32c6, esp32h2))]
impl Drop for CurveFitting {
    fn drop(&mut self) {
        match esp!(unsafe { sys::adc_cali_delete_scheme_curve_fitting(self.handle) }) {
            Ok(()) => log::debug!("Calibration scheme released"),
            Err(e) => log::error!("Failed to release calibration scheme: {:?}", e),
        }
    }
}
