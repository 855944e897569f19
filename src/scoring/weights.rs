use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative importance of each criterion. Values need not sum to 100;
/// [`MatchWeights::normalized`] rescales them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchWeights {
    #[serde(default = "default_skills")]
    pub skills: f64,
    #[serde(default = "default_cgpa", alias = "academic")]
    pub cgpa: f64,
    #[serde(default = "default_location")]
    pub location: f64,
    #[serde(default = "default_domain", alias = "sector")]
    pub domain: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        WeightPreset::Enhanced.weights()
    }
}

impl MatchWeights {
    pub fn new(skills: f64, cgpa: f64, location: f64, domain: f64) -> Self {
        Self {
            skills,
            cgpa,
            location,
            domain,
        }
    }

    /// Rescales to a total of 100. Negative or non-finite weights count as
    /// zero; when nothing is left the default weights apply.
    pub fn normalized(&self) -> NormalizedWeights {
        let parts = [
            sanitize(self.skills),
            sanitize(self.cgpa),
            sanitize(self.location),
            sanitize(self.domain),
        ];
        let total: f64 = parts.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return MatchWeights::default().normalized();
        }
        let scale = 100.0 / total;
        NormalizedWeights {
            skills: parts[0] * scale,
            academic: parts[1] * scale,
            location: parts[2] * scale,
            domain: parts[3] * scale,
        }
    }
}

/// Points available per criterion; always sums to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalizedWeights {
    pub skills: f64,
    pub academic: f64,
    pub location: f64,
    pub domain: f64,
}

impl NormalizedWeights {
    pub fn total(&self) -> f64 {
        self.skills + self.academic + self.location + self.domain
    }
}

/// Weight splits that shipped with the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightPreset {
    /// 50 / 25 / 15 / 10, the personalized-matching split.
    Enhanced,
    /// 40 / 20 / 20 / 20, the card-view split.
    Classic,
}

impl WeightPreset {
    pub fn weights(self) -> MatchWeights {
        match self {
            Self::Enhanced => MatchWeights::new(50.0, 25.0, 15.0, 10.0),
            Self::Classic => MatchWeights::new(40.0, 20.0, 20.0, 20.0),
        }
    }
}

impl Display for WeightPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enhanced => write!(f, "enhanced"),
            Self::Classic => write!(f, "classic"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown weight preset: {0}")]
pub struct WeightPresetParseError(pub String);

impl FromStr for WeightPreset {
    type Err = WeightPresetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enhanced" | "default" | "personalized" => Ok(Self::Enhanced),
            "classic" | "basic" => Ok(Self::Classic),
            _ => Err(WeightPresetParseError(s.to_string())),
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn default_skills() -> f64 {
    50.0
}

fn default_cgpa() -> f64 {
    25.0
}

fn default_location() -> f64 {
    15.0
}

fn default_domain() -> f64 {
    10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_already_sum_to_hundred() {
        let w = MatchWeights::default().normalized();
        assert_eq!(w.skills, 50.0);
        assert_eq!(w.academic, 25.0);
        assert_eq!(w.location, 15.0);
        assert_eq!(w.domain, 10.0);
    }

    #[test]
    fn rescales_arbitrary_totals() {
        let w = MatchWeights::new(2.0, 1.0, 1.0, 0.0).normalized();
        assert!((w.skills - 50.0).abs() < 1e-9);
        assert!((w.academic - 25.0).abs() < 1e-9);
        assert!((w.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn negative_and_nan_weights_count_as_zero() {
        let w = MatchWeights::new(-10.0, f64::NAN, 50.0, 50.0).normalized();
        assert_eq!(w.skills, 0.0);
        assert_eq!(w.academic, 0.0);
        assert!((w.location - 50.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_falls_back_to_defaults() {
        let w = MatchWeights::new(0.0, 0.0, 0.0, 0.0).normalized();
        assert_eq!(w, MatchWeights::default().normalized());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let w: MatchWeights = toml::from_str("skills = 40.0").expect("valid weights");
        assert_eq!(w.skills, 40.0);
        assert_eq!(w.cgpa, 25.0);
    }

    #[test]
    fn parses_presets() {
        assert_eq!(
            WeightPreset::from_str("Classic").unwrap(),
            WeightPreset::Classic
        );
        assert!(WeightPreset::from_str("turbo").is_err());
    }
}
