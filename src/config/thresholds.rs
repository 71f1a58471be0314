use serde::{Deserialize, Serialize};

/// Statistical thresholds for the missing-value rule.
///
/// A blank cell is only unexpected when the sheet is large enough for its fill
/// rate to mean something and the field is almost always filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionThresholds {
    /// Minimum sheet size before fill rates are trusted (default: 10)
    #[serde(default = "default_min_rows_for_fill_rate")]
    pub min_rows_for_fill_rate: usize,

    /// Fill rate at or above which a blank cell is flagged (default: 0.90)
    #[serde(default = "default_expected_fill_rate")]
    pub expected_fill_rate: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_rows_for_fill_rate: default_min_rows_for_fill_rate(),
            expected_fill_rate: default_expected_fill_rate(),
        }
    }
}

impl DetectionThresholds {
    /// Flags fewer gaps: larger sample and near-perfect fill required.
    pub fn strict() -> Self {
        Self {
            min_rows_for_fill_rate: 20,
            expected_fill_rate: 0.95,
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }

    /// Flags more gaps on smaller sheets.
    pub fn lenient() -> Self {
        Self {
            min_rows_for_fill_rate: 5,
            expected_fill_rate: 0.80,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.expected_fill_rate > 0.0 && self.expected_fill_rate <= 1.0) {
            return Err(format!(
                "expected_fill_rate must be in (0, 1], got {}",
                self.expected_fill_rate
            ));
        }
        if self.min_rows_for_fill_rate == 0 {
            return Err("min_rows_for_fill_rate must be at least 1".to_string());
        }
        Ok(())
    }

    /// Whether a field with these statistics is "normally always filled".
    pub fn expects_value(&self, fill_rate: f64, total_rows: usize) -> bool {
        // Epsilon keeps 9/10 on the right side of a 0.9 threshold.
        total_rows >= self.min_rows_for_fill_rate
            && fill_rate + f64::EPSILON >= self.expected_fill_rate
    }
}

fn default_min_rows_for_fill_rate() -> usize {
    10
}

fn default_expected_fill_rate() -> f64 {
    0.90
}
