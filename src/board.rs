use crate::config::{self, SensorProfile};
use crate::error::Error;
use crate::gpio::{calibration::ChipCalibration, FreeRtosDelay};
use crate::monitor::{Killswitch, Monitor};
#[cfg(not(feature = "simulate"))]
use crate::{gpio::adc::{self, EspChannel}, monitor::best_effort_calibration};
#[cfg(feature = "simulate")]
use crate::sensors::simulated::SimulatedChannel;
use esp_idf_svc::hal::{
    gpio::{ADCPin, Pin},
    peripheral::Peripheral,
};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

pub fn bootstrap() {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();
    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();
}

/// The running sensor thread. Nothing on the board cancels it, so the monitor runs until
/// reset or until it fails.
pub struct Sensor {
    thread: JoinHandle<Result<(), Error>>,
}

impl Sensor {
    /// Opens the converter on the sensor thread and waits until the channel is configured.
    /// Unit or channel setup failures are returned here; a missing calibration is not.
    pub fn start<T, A>(profile: &'static SensorProfile, adc: A, pin: T) -> anyhow::Result<Self>
    where
        T: ADCPin + Send + 'static,
        A: Peripheral<P = T::Adc> + Send + 'static,
    {
        log::info!(target: profile.tag, "Starting {} monitor", profile.sensor);
        match serde_json::to_string(profile) {
            Ok(json) => log::info!(target: profile.tag, "Profile: {}", json),
            Err(e) => log::warn!(target: profile.tag, "Failed to serialize profile: {:?}", e),
        }

        if pin.pin() != i32::from(profile.gpio) {
            return Err(Error::WrongPin {
                expected: profile.gpio,
                found: pin.pin(),
            }
            .into());
        }

        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let thread = thread::Builder::new()
            .name("sensor".to_string())
            .stack_size(config::SENSOR_THREAD_STACK_SIZE)
            .spawn(move || {
                let monitor = match open(profile, adc, pin) {
                    Ok(monitor) => {
                        let _ = ready_tx.send(Ok(()));
                        monitor
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return Ok(());
                    }
                };
                monitor.run(&Killswitch::new())
            })?;

        ready_rx.recv()??;
        log::info!(target: profile.tag, "Sensor ready");

        Ok(Self { thread })
    }

    /// Blocks until the monitor returns, which only happens on an aborted read.
    pub fn wait(self) -> anyhow::Result<()> {
        self.thread
            .join()
            .map_err(|_| anyhow::anyhow!("Sensor thread panicked"))??;
        Ok(())
    }
}

#[cfg(not(feature = "simulate"))]
fn open<T, A>(
    profile: &SensorProfile,
    adc: A,
    pin: T,
) -> Result<Monitor<EspChannel<T>, ChipCalibration, FreeRtosDelay>, Error>
where
    T: ADCPin + 'static,
    A: Peripheral<P = T::Adc> + 'static,
{
    let channel = EspChannel::open(adc, pin, profile.attenuation)?;
    let calibration = best_effort_calibration(
        profile.tag,
        ChipCalibration::new(
            EspChannel::<T>::unit(),
            EspChannel::<T>::channel(),
            adc::atten(profile.attenuation),
        ),
    );
    Monitor::new(profile, channel, calibration, FreeRtosDelay)
}

#[cfg(feature = "simulate")]
fn open<T, A>(
    profile: &SensorProfile,
    _adc: A,
    _pin: T,
) -> Result<Monitor<SimulatedChannel, ChipCalibration, FreeRtosDelay>, Error>
where
    T: ADCPin + 'static,
    A: Peripheral<P = T::Adc> + 'static,
{
    log::warn!(
        target: profile.tag,
        "Simulating the {}, GPIO{} is not read",
        profile.sensor,
        profile.gpio
    );
    let channel = SimulatedChannel::new(config::ADC_MAX_RAW)?;
    Monitor::new(profile, channel, None, FreeRtosDelay)
}
