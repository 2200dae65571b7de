use refguard_types::Domain;
use serde::{Deserialize, Serialize};

/// Patch lengths wrap at this many characters before normalization.
pub const LENGTH_RANGE: usize = 1024;

/// Normalized model inputs, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFeatures {
    pub text_len: f64,
    pub domain_index: f64,
}

impl RiskFeatures {
    pub fn extract(patch_text: &str, domain: &Domain) -> Self {
        let len = patch_text.chars().count() % LENGTH_RANGE;
        Self {
            text_len: len as f64 / LENGTH_RANGE as f64,
            domain_index: domain_index(domain) as f64 / 4.0,
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.text_len, self.domain_index]
    }
}

/// Index the model was trained with; every other domain shares slot 4.
fn domain_index(domain: &Domain) -> u8 {
    match domain {
        Domain::Gaming => 0,
        Domain::Robotics => 1,
        Domain::Hpc => 2,
        Domain::Medical => 3,
        _ => 4,
    }
}
