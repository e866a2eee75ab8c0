use crate::error::Error;
use crate::sensors::traits::OneshotChannel;
use crate::types::Raw;
use serde::Serialize;

/// What a failed read inside a batch does to the batch.
#[derive(Serialize, Debug, Default, Copy, Clone, PartialEq)]
pub enum ReadFailurePolicy {
    /// The first failed read ends the batch with that error.
    Abort,
    /// Failed reads are left out of the average.
    #[default]
    SkipSample,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Batch {
    pub average: Raw,
    pub taken: usize,
    pub failed: usize,
}

pub struct Oversampler {
    samples: usize,
    top: Raw,
    policy: ReadFailurePolicy,
}

impl Oversampler {
    pub fn new(samples: usize, top: Raw, policy: ReadFailurePolicy) -> Self {
        Self {
            samples: samples.max(1),
            top,
            policy,
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn sample(&self, channel: &mut impl OneshotChannel) -> Result<Batch, Error> {
        let mut sum: u64 = 0;
        let mut taken = 0;
        let mut failed = 0;

        for _ in 0..self.samples {
            match channel.read() {
                Ok(raw) => {
                    sum += u64::from(raw.min(self.top));
                    taken += 1;
                }
                Err(e) => match self.policy {
                    ReadFailurePolicy::Abort => return Err(e),
                    ReadFailurePolicy::SkipSample => {
                        log::warn!("Dropping sample: {}", e);
                        failed += 1;
                    }
                },
            }
        }

        if taken == 0 {
            return Err(Error::NoSamples);
        }

        Ok(Batch {
            average: (sum / taken as u64) as Raw,
            taken,
            failed,
        })
    }
}
