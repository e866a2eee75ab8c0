use crate::config::Attenuation;
use crate::error::Error;
use crate::sensors::traits::OneshotChannel;
use crate::types::Raw;
use esp_idf_hal::{
    adc::{
        attenuation,
        oneshot::{config::AdcChannelConfig, AdcChannelDriver, AdcDriver},
        Adc,
    },
    gpio::ADCPin,
    peripheral::Peripheral,
};
use esp_idf_sys::{adc_atten_t, adc_channel_t, adc_unit_t};

pub fn atten(setting: Attenuation) -> adc_atten_t {
    match setting {
        Attenuation::Db0 => attenuation::NONE,
        Attenuation::Db2_5 => attenuation::DB_2_5,
        Attenuation::Db6 => attenuation::DB_6,
        Attenuation::Db12 => attenuation::DB_11,
    }
}

/// One oneshot channel that owns its converter unit. Dropping it releases the unit.
pub struct EspChannel<T: ADCPin + 'static> {
    driver: AdcChannelDriver<'static, T, AdcDriver<'static, T::Adc>>,
}

impl<T: ADCPin + 'static> EspChannel<T> {
    pub fn open(
        adc: impl Peripheral<P = T::Adc> + 'static,
        pin: T,
        attenuation: Attenuation,
    ) -> Result<Self, Error> {
        let adc = AdcDriver::new(adc)?;
        // the driver's own calibration stays off, raw counts are converted by the monitor
        let config = AdcChannelConfig {
            attenuation: atten(attenuation),
            ..Default::default()
        };
        let driver = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { driver })
    }

    pub fn unit() -> adc_unit_t {
        T::Adc::unit()
    }

    pub fn channel() -> adc_channel_t {
        T::CHANNEL
    }
}

impl<T: ADCPin + 'static> OneshotChannel for EspChannel<T> {
    fn read(&mut self) -> Result<Raw, Error> {
        Ok(self.driver.read_raw()?)
    }
}
