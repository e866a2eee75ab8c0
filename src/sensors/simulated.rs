use crate::config;
use crate::error::Error;
use crate::sensors::traits::OneshotChannel;
use crate::types::Raw;
use rand::prelude::*;
use rand_distr::Normal;

/// Stands in for the sensor pin: a level that sweeps up and down the full range with
/// gaussian noise on every read.
pub struct SimulatedChannel {
    level: f32,
    step: f32,
    top: Raw,
    noise: Normal<f32>,
    rng: ThreadRng,
}

impl SimulatedChannel {
    pub fn new(top: Raw) -> Result<Self, Error> {
        let noise = Normal::new(0.0, config::SIMULATED_NOISE_STD_DEV)
            .map_err(|e| Error::Read(format!("bad noise model: {}", e)))?;
        Ok(Self {
            level: 0.0,
            step: config::SIMULATED_STEP_PER_READ,
            top,
            noise,
            rng: thread_rng(),
        })
    }

    fn advance(&mut self) {
        self.level += self.step;
        if self.level >= self.top as f32 || self.level <= 0.0 {
            self.step = -self.step;
            self.level = self.level.clamp(0.0, self.top as f32);
        }
    }
}

impl OneshotChannel for SimulatedChannel {
    fn read(&mut self) -> Result<Raw, Error> {
        self.advance();
        let noisy = self.level + self.noise.sample(&mut self.rng);
        Ok(noisy.round().clamp(0.0, self.top as f32) as Raw)
    }
}
