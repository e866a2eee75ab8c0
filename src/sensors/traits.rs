use crate::error::Error;
use crate::types::{Millivolts, Raw};
use std::time::Duration;

/// A single configured converter channel that can be read on demand.
pub trait OneshotChannel {
    fn read(&mut self) -> Result<Raw, Error>;
}

/// Platform supplied mapping from raw counts to millivolts.
pub trait Calibration {
    fn scheme(&self) -> &'static str;
    fn raw_to_millivolts(&self, raw: Raw) -> Result<Millivolts, Error>;
}

pub trait Delay {
    /// Must yield to the scheduler, never spin.
    fn suspend(&mut self, duration: Duration);
}
