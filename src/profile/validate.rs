use thiserror::Error;

use crate::profile::Profile;

/// Form-level problems with a user-entered profile.
///
/// Scoring never rejects a profile; these checks run only where a person
/// typed the profile in (CLI `--profile-file`, the `/v1/rank` endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("profile name is required")]
    MissingName,
    #[error("at least one skill is required")]
    NoSkills,
    #[error("CGPA must be greater than zero")]
    NonPositiveCgpa,
}

pub fn validate_profile(profile: &Profile) -> Result<(), Vec<ValidationError>> {
    let mut issues = Vec::new();
    if profile.name.trim().is_empty() {
        issues.push(ValidationError::MissingName);
    }
    if profile.skills.iter().all(|s| s.trim().is_empty()) {
        issues.push(ValidationError::NoSkills);
    }
    if profile.cgpa.is_nan() || profile.cgpa <= 0.0 {
        issues.push(ValidationError::NonPositiveCgpa);
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

pub fn describe_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
