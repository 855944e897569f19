use serde_json::Value;

use crate::profile::input::{OpportunityInput, PreferencesField, PreferencesInput, ProfileInput};
use crate::profile::{ExperienceLevel, Opportunity, Preferences, Profile, SalaryRange, WorkMode};

/// Multiplier from the 4-point GPA scale to the 10-point CGPA scale.
pub const GPA_TO_CGPA: f64 = 2.5;
pub const MAX_CGPA: f64 = 10.0;

pub fn normalize_cgpa(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_CGPA)
    } else {
        0.0
    }
}

pub fn normalize_amount(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

pub fn normalize_profile(input: ProfileInput, fallback_index: usize) -> Profile {
    let education = input.education.unwrap_or_default();
    let cgpa = coerce_number(&input.cgpa)
        .or_else(|| coerce_number(&education.cgpa))
        .or_else(|| {
            coerce_number(&input.gpa)
                .or_else(|| coerce_number(&education.gpa))
                .map(|gpa| gpa * GPA_TO_CGPA)
        })
        .map(normalize_cgpa)
        .unwrap_or(0.0);

    // A bare list holds project types, which compare against opportunity domains.
    let (prefs, project_types) = match input.preferences {
        Some(PreferencesField::Structured(prefs)) => (prefs, Vec::new()),
        Some(PreferencesField::ProjectTypes(types)) => {
            (PreferencesInput::default(), string_list(&Value::Array(types)))
        }
        Some(PreferencesField::Other(_)) | None => (PreferencesInput::default(), Vec::new()),
    };
    let mut locations = string_list(&prefs.location);
    locations.extend(string_list(&input.preferred_locations));
    let mut domains = string_list(&prefs.domains);
    domains.extend(project_types);
    domains.extend(string_list(&input.preferred_sectors));

    let preferences = Preferences {
        locations: dedupe_case_insensitive(locations),
        domains: dedupe_case_insensitive(domains),
        salary_range: salary_range(&prefs.salary_range),
        work_mode: coerce_text(&prefs.work_mode).and_then(|raw| raw.parse::<WorkMode>().ok()),
    };

    let experience = match &input.experience {
        Value::Number(n) => n.as_f64().map(ExperienceLevel::from_years),
        Value::String(label) => ExperienceLevel::from_label(label),
        _ => None,
    };

    Profile {
        id: non_empty(input.id).unwrap_or_else(|| format!("profile-{}", fallback_index + 1)),
        name: input.name.map(|n| n.trim().to_string()).unwrap_or_default(),
        skills: dedupe_case_insensitive(string_list(&input.skills)),
        cgpa,
        location: location_text(&input.location),
        preferences,
        experience,
    }
}

pub fn normalize_opportunity(input: OpportunityInput, fallback_index: usize) -> Opportunity {
    let requirements = input.requirements.unwrap_or_default();

    let mut required = string_list(&input.required_skills);
    if required.is_empty() {
        required = string_list(&requirements.skills);
    }

    let min_cgpa = coerce_number(&input.min_cgpa)
        .or_else(|| coerce_number(&requirements.min_cgpa))
        .or_else(|| {
            coerce_number(&input.min_gpa)
                .or_else(|| coerce_number(&requirements.min_gpa))
                .map(|gpa| gpa * GPA_TO_CGPA)
        })
        .map(normalize_cgpa)
        .unwrap_or(0.0);

    let location = location_text(&input.location);
    let is_remote = coerce_flag(&input.is_remote)
        .unwrap_or_else(|| location.eq_ignore_ascii_case("remote"));

    let stipend = coerce_amount(&input.stipend)
        .or_else(|| coerce_amount(&input.salary))
        .map(normalize_amount);

    Opportunity {
        id: non_empty(input.id)
            .unwrap_or_else(|| format!("opportunity-{}", fallback_index + 1)),
        title: input.title.map(|t| t.trim().to_string()).unwrap_or_default(),
        company: input.company.map(|c| c.trim().to_string()).unwrap_or_default(),
        required_skills: dedupe_case_insensitive(required),
        min_cgpa,
        location,
        is_remote,
        domain: coerce_text(&input.domain).unwrap_or_default(),
        stipend,
        duration_months: duration_months(&input.duration),
        capacity: coerce_number(&input.capacity).and_then(to_count),
    }
}

pub fn normalize_profiles(inputs: Vec<ProfileInput>) -> Vec<Profile> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| normalize_profile(input, idx))
        .collect()
}

pub fn normalize_opportunities(inputs: Vec<OpportunityInput>) -> Vec<Opportunity> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| normalize_opportunity(input, idx))
        .collect()
}

/// Numbers and numeric strings ("8.2", "6 months"); anything else is `None`.
fn coerce_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Money may arrive as a display string such as "₹42,000/month" or
/// "₹50K/month". The first number is read with its thousands separators and
/// decimals; a trailing `K` or `lakh` scales it.
fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_money(s),
        _ => None,
    }
}

fn parse_money(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());
    let amount: f64 = rest[..end]
        .replace(',', "")
        .trim_end_matches('.')
        .parse()
        .ok()?;
    let suffix = rest[end..].trim_start().to_ascii_lowercase();
    let scale = if suffix.starts_with("lakh") {
        100_000.0
    } else if suffix.starts_with('k') {
        1_000.0
    } else {
        1.0
    };
    Some(amount * scale).filter(|v| v.is_finite())
}

/// Bare numbers are weeks, as in project records; strings carry their unit
/// ("6 months", "12 weeks", "1 year") and default to months.
fn duration_months(value: &Value) -> Option<u32> {
    let weeks_to_months = |weeks: u32| weeks.div_ceil(4);
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .and_then(to_count)
            .map(weeks_to_months),
        Value::String(s) => {
            let count = leading_number(s).and_then(to_count)?;
            let unit = s.to_ascii_lowercase();
            if unit.contains("week") {
                Some(weeks_to_months(count))
            } else if unit.contains("year") {
                Some(count.saturating_mul(12))
            } else {
                Some(count)
            }
        }
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "remote" | "1" => Some(true),
            "false" | "no" | "onsite" | "office" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        _ => None,
    }
}

fn leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-'))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok()
}

fn to_count(value: f64) -> Option<u32> {
    (value >= 0.0).then(|| value.round().min(u32::MAX as f64) as u32)
}

/// Arrays of strings or of `{ "name": ... }` objects, or one comma-separated
/// string.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(map) => map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn location_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => ["city", "district", "state"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn salary_range(value: &Value) -> Option<SalaryRange> {
    match value {
        Value::Array(bounds) if bounds.len() == 2 => {
            let min = coerce_amount(&bounds[0])?;
            let max = coerce_amount(&bounds[1])?;
            Some(SalaryRange::new(min, max))
        }
        Value::Object(map) => {
            let min = map.get("min").and_then(coerce_amount)?;
            let max = map.get("max").and_then(coerce_amount)?;
            Some(SalaryRange::new(min, max))
        }
        _ => None,
    }
}

fn dedupe_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let key = item.to_lowercase();
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(item);
    }
    out
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
