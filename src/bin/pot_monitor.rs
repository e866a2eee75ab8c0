#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use adc_monitor::{board, config::SensorProfile};
    use esp_idf_svc::hal::prelude::Peripherals;

    board::bootstrap();

    let peripherals = Peripherals::take()?;
    let sensor = board::Sensor::start(
        &SensorProfile::POTENTIOMETER,
        peripherals.adc1,
        peripherals.pins.gpio34,
    )?;
    sensor.wait()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("pot-monitor is firmware, build it with --target xtensa-esp32-espidf");
}
