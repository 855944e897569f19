//! Lenient wire shapes for profiles and opportunities.
//!
//! Demo data arrives in several layouts (flat, nested or project-type list
//! preferences, `cgpa` vs `gpa`, string vs structured locations, display
//! strings for money). Every field that has been seen in more than one shape
//! is kept as a raw [`Value`] or a [`PreferencesField`] here and coerced in
//! [`super::normalize`], so deserialization of
//! a well-formed JSON object never fails on field types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub skills: Value,
    pub cgpa: Value,
    /// Four-point scale; only consulted when `cgpa` is absent.
    pub gpa: Value,
    pub education: Option<EducationInput>,
    pub location: Value,
    pub preferences: Option<PreferencesField>,
    #[serde(alias = "preferred_locations")]
    pub preferred_locations: Value,
    #[serde(alias = "preferred_sectors", alias = "preferredDomains")]
    pub preferred_sectors: Value,
    pub experience: Value,
}

/// Preferences arrive either as a structured block or, in project records,
/// as a bare list of project types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferencesField {
    /// Listed first so an array never lands in the struct by position.
    ProjectTypes(Vec<Value>),
    Structured(PreferencesInput),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationInput {
    pub cgpa: Value,
    pub gpa: Value,
    pub university: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesInput {
    #[serde(alias = "locations")]
    pub location: Value,
    #[serde(alias = "sectors")]
    pub domains: Value,
    #[serde(alias = "salary_range")]
    pub salary_range: Value,
    #[serde(alias = "work_mode")]
    pub work_mode: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpportunityInput {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "companyName")]
    pub company: Option<String>,
    #[serde(alias = "required_skills")]
    pub required_skills: Value,
    pub requirements: Option<RequirementsInput>,
    #[serde(alias = "minCGPA", alias = "min_cgpa")]
    pub min_cgpa: Value,
    #[serde(alias = "minGPA", alias = "min_gpa")]
    pub min_gpa: Value,
    pub location: Value,
    #[serde(alias = "is_remote")]
    pub is_remote: Value,
    #[serde(alias = "sector", alias = "type")]
    pub domain: Value,
    pub salary: Value,
    pub stipend: Value,
    pub duration: Value,
    #[serde(alias = "maxInterns", alias = "max_interns")]
    pub capacity: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementsInput {
    pub skills: Value,
    #[serde(alias = "minCGPA", alias = "min_cgpa")]
    pub min_cgpa: Value,
    #[serde(alias = "minGPA", alias = "min_gpa")]
    pub min_gpa: Value,
    pub experience: Value,
}
