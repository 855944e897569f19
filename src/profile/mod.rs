pub mod input;
pub mod normalize;
pub mod validate;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use input::{OpportunityInput, PreferencesField, ProfileInput};
pub use normalize::{
    normalize_opportunities, normalize_opportunity, normalize_profile, normalize_profiles,
};
pub use validate::{describe_issues, validate_profile, ValidationError};

/// Candidate side of a match, in canonical form.
///
/// `cgpa` is always on the 10-point scale; see [`normalize`] for how 4-point
/// GPAs and structured locations are folded in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub cgpa: f64,
    pub location: String,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub experience: Option<ExperienceLevel>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cgpa(mut self, cgpa: f64) -> Self {
        self.cgpa = cgpa;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Remote work counts as preferred when the work mode says so or when
    /// "Remote" is listed among the preferred locations.
    pub fn prefers_remote(&self) -> bool {
        self.preferences.work_mode == Some(WorkMode::Remote)
            || self
                .preferences
                .locations
                .iter()
                .any(|loc| loc.trim().eq_ignore_ascii_case("remote"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Preferences {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    /// Builds a range, swapping the bounds when they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Office,
}

impl Display for WorkMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
            Self::Office => "office",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Error)]
#[error("unknown work mode: {0}")]
pub struct WorkModeParseError(pub String);

impl FromStr for WorkMode {
    type Err = WorkModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "wfh" | "work-from-home" => Ok(Self::Remote),
            "hybrid" | "flexible" => Ok(Self::Hybrid),
            "office" | "onsite" | "on-site" | "in-office" => Ok(Self::Office),
            _ => Err(WorkModeParseError(s.to_string())),
        }
    }
}

/// Experience as shown on candidate cards. Not used by scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Fresher,
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn from_years(years: f64) -> Self {
        if !years.is_finite() || years < 0.5 {
            Self::Fresher
        } else if years < 1.5 {
            Self::Beginner
        } else if years < 3.0 {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    /// Accepts the labels used across the demo data ("Fresher", "0-1 years",
    /// "Intermediate", ...). Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" => None,
            "fresher" | "entry" | "none" => Some(Self::Fresher),
            "beginner" | "junior" | "0-1 years" | "0-1" => Some(Self::Beginner),
            "intermediate" | "mid" | "1-3 years" => Some(Self::Intermediate),
            "advanced" | "expert" | "senior" | "3+ years" => Some(Self::Advanced),
            other => other.parse::<f64>().ok().map(Self::from_years),
        }
    }
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Fresher => "fresher",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        write!(f, "{label}")
    }
}

/// Internship or project side of a match, in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub min_cgpa: f64,
    pub location: String,
    pub is_remote: bool,
    pub domain: String,
    #[serde(default)]
    pub stipend: Option<f64>,
    #[serde(default)]
    pub duration_months: Option<u32>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Opportunity {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_required_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_cgpa(mut self, min_cgpa: f64) -> Self {
        self.min_cgpa = min_cgpa;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>, is_remote: bool) -> Self {
        self.location = location.into();
        self.is_remote = is_remote;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_stipend(mut self, stipend: f64) -> Self {
        self.stipend = Some(stipend);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_work_mode_aliases() {
        assert_eq!(WorkMode::from_str("Remote").unwrap(), WorkMode::Remote);
        assert_eq!(WorkMode::from_str(" on-site ").unwrap(), WorkMode::Office);
        assert_eq!(WorkMode::from_str("flexible").unwrap(), WorkMode::Hybrid);
        assert!(WorkMode::from_str("moon").is_err());
    }

    #[test]
    fn remote_listed_as_location_counts_as_preference() {
        let profile = Profile::new("p1", "Arjun").with_preferences(Preferences {
            locations: vec!["Bangalore".to_string(), "Remote".to_string()],
            work_mode: Some(WorkMode::Hybrid),
            ..Preferences::default()
        });
        assert!(profile.prefers_remote());
    }

    #[test]
    fn salary_range_swaps_reversed_bounds() {
        let range = SalaryRange::new(50_000.0, 40_000.0);
        assert_eq!(range.min, 40_000.0);
        assert!(range.contains(45_000.0));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn experience_labels_map_to_levels() {
        assert_eq!(
            ExperienceLevel::from_label("0-1 years"),
            Some(ExperienceLevel::Beginner)
        );
        assert_eq!(
            ExperienceLevel::from_label("Fresher"),
            Some(ExperienceLevel::Fresher)
        );
        assert_eq!(
            ExperienceLevel::from_label("4"),
            Some(ExperienceLevel::Advanced)
        );
        assert_eq!(ExperienceLevel::from_label("unknown"), None);
    }
}
