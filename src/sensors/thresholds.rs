use crate::error::Error;
use crate::types::Percent;
use serde::Serialize;

#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Bucket {
    pub below: Percent,
    pub label: &'static str,
}

/// Ascending cutoffs plus the label for everything at or above the last one.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Classification {
    pub buckets: &'static [Bucket],
    pub otherwise: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Thresholds {
    classification: Classification,
}

impl Thresholds {
    pub fn new(classification: Classification) -> Result<Self, Error> {
        let buckets = classification.buckets;
        if let Some(bucket) = buckets.iter().find(|bucket| !bucket.below.is_finite()) {
            return Err(Error::InvalidThresholds(format!(
                "cutoff for {:?} is not finite",
                bucket.label
            )));
        }
        if let Some(pair) = buckets.windows(2).find(|pair| pair[0].below >= pair[1].below) {
            return Err(Error::InvalidThresholds(format!(
                "{:?} ({}) must be below {:?} ({})",
                pair[0].label, pair[0].below, pair[1].label, pair[1].below
            )));
        }
        Ok(Self { classification })
    }

    /// First bucket whose cutoff is strictly above `percent`, otherwise the final label.
    pub fn classify(&self, percent: Percent) -> &'static str {
        self.classification
            .buckets
            .iter()
            .find(|bucket| percent < bucket.below)
            .map(|bucket| bucket.label)
            .unwrap_or(self.classification.otherwise)
    }
}
