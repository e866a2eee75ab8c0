use crate::config::SensorProfile;
use crate::error::Error;
use crate::sensors::{
    adc::Adc,
    oversample::Oversampler,
    thresholds::Thresholds,
    traits::{Calibration, Delay, OneshotChannel},
};
use crate::types::{from_millivolts_to_volts, Millivolts, Percent, Raw};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Killswitch(Arc<AtomicBool>);

impl Killswitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kill(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_killed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Report {
    pub raw: Raw,
    pub millivolts: Millivolts,
    pub percent: Percent,
    pub status: Option<&'static str>,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ADC: {} | Voltage: {:.2}V | {:.1}%",
            self.raw,
            from_millivolts_to_volts(self.millivolts),
            self.percent
        )?;
        if let Some(status) = self.status {
            write!(f, " | Status: {}", status)?;
        }
        Ok(())
    }
}

/// Keeps whatever calibration the platform could offer, logging why when it could not.
pub fn best_effort_calibration<K: Calibration>(
    tag: &'static str,
    calibration: Result<K, Error>,
) -> Option<K> {
    match calibration {
        Ok(calibration) => {
            log::info!(target: tag, "Using {} calibration", calibration.scheme());
            Some(calibration)
        }
        Err(e) => {
            log::warn!(target: tag, "{}, falling back to linear approximation", e);
            None
        }
    }
}

pub struct Monitor<C, K, D>
where
    C: OneshotChannel,
    K: Calibration,
    D: Delay,
{
    tag: &'static str,
    // released before the channel's converter unit
    calibration: Option<K>,
    channel: C,
    adc: Adc,
    oversampler: Oversampler,
    thresholds: Option<Thresholds>,
    interval: Duration,
    delay: D,
}

impl<C, K, D> Monitor<C, K, D>
where
    C: OneshotChannel,
    K: Calibration,
    D: Delay,
{
    pub fn new(
        profile: &SensorProfile,
        channel: C,
        calibration: Option<K>,
        delay: D,
    ) -> Result<Self, Error> {
        let thresholds = profile.classification.map(Thresholds::new).transpose()?;
        let adc = Adc::default();

        Ok(Self {
            tag: profile.tag,
            calibration,
            channel,
            adc,
            oversampler: Oversampler::new(profile.samples, adc.top(), profile.on_read_failure),
            thresholds,
            interval: profile.interval,
            delay,
        })
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    fn to_millivolts(&self, raw: Raw) -> Millivolts {
        match &self.calibration {
            Some(calibration) => calibration.raw_to_millivolts(raw).unwrap_or_else(|e| {
                log::warn!(target: self.tag, "{}, using linear approximation", e);
                self.adc.raw_to_millivolts(raw)
            }),
            None => self.adc.raw_to_millivolts(raw),
        }
    }

    /// One oversampled batch turned into a report. The report itself is not logged.
    pub fn measure(&mut self) -> Result<Report, Error> {
        let batch = self.oversampler.sample(&mut self.channel)?;
        if batch.failed > 0 {
            log::warn!(
                target: self.tag,
                "{} of {} reads failed",
                batch.failed,
                self.oversampler.samples()
            );
        }

        let raw = batch.average;
        let percent = self.adc.raw_to_percent(raw);
        Ok(Report {
            raw,
            millivolts: self.to_millivolts(raw),
            percent,
            status: self
                .thresholds
                .as_ref()
                .map(|thresholds| thresholds.classify(percent)),
        })
    }

    /// Measure, report and sleep until `killswitch` is set. The channel and calibration
    /// are dropped, and so released, when this returns.
    pub fn run(mut self, killswitch: &Killswitch) -> Result<(), Error> {
        log::info!(
            target: self.tag,
            "Sampling every {:?} ({} reads per report)",
            self.interval,
            self.oversampler.samples()
        );

        while !killswitch.is_killed() {
            match self.measure() {
                Ok(report) => log::info!(target: self.tag, "{}", report),
                Err(Error::NoSamples) => {
                    log::error!(target: self.tag, "Every read failed, skipping report")
                }
                Err(e) => return Err(e),
            }
            self.delay.suspend(self.interval);
        }

        log::info!(target: self.tag, "Monitor stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::sensors::oversample::ReadFailurePolicy;
    use std::cell::Cell;
    use std::rc::Rc;

    struct ThreadDelay;

    impl Delay for ThreadDelay {
        fn suspend(&mut self, duration: Duration) {
            std::thread::sleep(duration);
        }
    }

    struct Constant(Raw);

    impl OneshotChannel for Constant {
        fn read(&mut self) -> Result<Raw, Error> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl OneshotChannel for Failing {
        fn read(&mut self) -> Result<Raw, Error> {
            Err(Error::Read("timeout".to_string()))
        }
    }

    /// Reports `raw + offset` and records its own release.
    struct Offset {
        offset: Millivolts,
        released: Rc<Cell<bool>>,
    }

    impl Calibration for Offset {
        fn scheme(&self) -> &'static str {
            "offset"
        }

        fn raw_to_millivolts(&self, raw: Raw) -> Result<Millivolts, Error> {
            Ok(Millivolts::from(raw) + self.offset)
        }
    }

    impl Drop for Offset {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    struct Broken;

    impl Calibration for Broken {
        fn scheme(&self) -> &'static str {
            "broken"
        }

        fn raw_to_millivolts(&self, _raw: Raw) -> Result<Millivolts, Error> {
            Err(Error::Calibration("out of range".to_string()))
        }
    }

    struct Unreachable;

    impl Calibration for Unreachable {
        fn scheme(&self) -> &'static str {
            unreachable!("calibration must not be touched when absent")
        }

        fn raw_to_millivolts(&self, _raw: Raw) -> Result<Millivolts, Error> {
            unreachable!("calibration must not be touched when absent")
        }
    }

    /// Counts suspensions and pulls the killswitch after `limit` of them.
    struct KillAfter {
        limit: usize,
        count: Rc<Cell<usize>>,
        killswitch: Killswitch,
    }

    impl Delay for KillAfter {
        fn suspend(&mut self, duration: Duration) {
            assert_eq!(duration, config::SensorProfile::LDR.interval);
            self.count.set(self.count.get() + 1);
            if self.count.get() >= self.limit {
                self.killswitch.kill();
            }
        }
    }

    fn ldr<C: OneshotChannel, K: Calibration>(
        channel: C,
        calibration: Option<K>,
    ) -> Monitor<C, K, ThreadDelay> {
        Monitor::new(&config::SensorProfile::LDR, channel, calibration, ThreadDelay).unwrap()
    }

    #[test]
    fn test_midscale_scenario() {
        let mut monitor = ldr(Constant(2048), None::<Unreachable>);
        let report = monitor.measure().unwrap();
        assert_eq!(report.raw, 2048);
        assert_eq!(report.millivolts, 1650);
        assert!((report.percent - 50.0).abs() < 0.05);
        assert_eq!(report.status, Some("medium light"));
    }

    #[test]
    fn test_twenty_percent_is_low_light() {
        let mut monitor = ldr(Constant(819), None::<Unreachable>);
        let report = monitor.measure().unwrap();
        assert_eq!(report.percent, 20.0);
        assert_eq!(report.status, Some("low light"));
    }

    #[test]
    fn test_all_zero_samples() {
        let mut monitor = ldr(Constant(0), None::<Unreachable>);
        let report = monitor.measure().unwrap();
        assert_eq!(report.raw, 0);
        assert_eq!(report.millivolts, 0);
        assert_eq!(report.percent, 0.0);
        assert_eq!(report.status, Some("dark"));
    }

    #[test]
    fn test_calibration_is_preferred() {
        let released = Rc::new(Cell::new(false));
        let calibration = Offset {
            offset: 142,
            released: released.clone(),
        };
        let mut monitor = ldr(Constant(1000), Some(calibration));
        assert!(monitor.is_calibrated());
        assert_eq!(monitor.measure().unwrap().millivolts, 1142);
    }

    #[test]
    fn test_failing_calibration_falls_back_per_reading() {
        let mut monitor = ldr(Constant(2048), Some(Broken));
        assert_eq!(monitor.measure().unwrap().millivolts, 1650);
    }

    #[test]
    fn test_failed_calibration_acquire_never_calls_transform() {
        let calibration = best_effort_calibration::<Unreachable>(
            "test",
            Err(Error::Calibration("eFuse not burnt".to_string())),
        );
        assert!(calibration.is_none());

        let mut monitor = ldr(Constant(4095), calibration);
        assert!(!monitor.is_calibrated());
        let report = monitor.measure().unwrap();
        assert_eq!(report.millivolts, 3300);
        assert_eq!(report.status, Some("bright"));
    }

    #[test]
    fn test_potentiometer_has_no_status() {
        let mut monitor = Monitor::new(
            &config::SensorProfile::POTENTIOMETER,
            Constant(3000),
            None::<Unreachable>,
            ThreadDelay,
        )
        .unwrap();
        let report = monitor.measure().unwrap();
        assert_eq!(report.status, None);
        assert_eq!(report.to_string(), "ADC: 3000 | Voltage: 2.42V | 73.3%");
    }

    #[test]
    fn test_report_format() {
        let report = Report {
            raw: 2048,
            millivolts: 1650,
            percent: 50.012_21,
            status: Some("medium light"),
        };
        assert_eq!(
            report.to_string(),
            "ADC: 2048 | Voltage: 1.65V | 50.0% | Status: medium light"
        );
    }

    #[test]
    fn test_run_stops_on_killswitch_and_releases() {
        let killswitch = Killswitch::new();
        let count = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(false));
        let delay = KillAfter {
            limit: 3,
            count: count.clone(),
            killswitch: killswitch.clone(),
        };
        let calibration = Offset {
            offset: 0,
            released: released.clone(),
        };
        let monitor = Monitor::new(
            &config::SensorProfile::LDR,
            Constant(100),
            Some(calibration),
            delay,
        )
        .unwrap();

        monitor.run(&killswitch).unwrap();
        assert_eq!(count.get(), 3);
        assert!(released.get());
    }

    #[test]
    fn test_run_without_iterations_when_already_killed() {
        let killswitch = Killswitch::new();
        killswitch.kill();
        let count = Rc::new(Cell::new(0));
        let delay = KillAfter {
            limit: 1,
            count: count.clone(),
            killswitch: killswitch.clone(),
        };
        let monitor = Monitor::new(
            &config::SensorProfile::LDR,
            Failing,
            None::<Unreachable>,
            delay,
        )
        .unwrap();
        monitor.run(&killswitch).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_run_survives_failed_batches_when_skipping() {
        let killswitch = Killswitch::new();
        let count = Rc::new(Cell::new(0));
        let delay = KillAfter {
            limit: 2,
            count: count.clone(),
            killswitch: killswitch.clone(),
        };
        let monitor = Monitor::new(
            &config::SensorProfile::LDR,
            Failing,
            None::<Unreachable>,
            delay,
        )
        .unwrap();
        monitor.run(&killswitch).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_run_aborts_on_read_failure_when_configured() {
        let profile = config::SensorProfile {
            on_read_failure: ReadFailurePolicy::Abort,
            ..config::SensorProfile::LDR
        };
        let killswitch = Killswitch::new();
        let released = Rc::new(Cell::new(false));
        let calibration = Offset {
            offset: 0,
            released: released.clone(),
        };
        let monitor = Monitor::new(&profile, Failing, Some(calibration), ThreadDelay).unwrap();
        assert!(matches!(monitor.run(&killswitch), Err(Error::Read(_))));
        assert!(released.get());
    }
}
