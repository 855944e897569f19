use crate::profile::{Opportunity, Profile};
use crate::scoring::{Criterion, MatchResult, MatchWeights, NormalizedWeights, SubScore};

const CLOSE_GAP: f64 = 0.3;
const MODERATE_GAP: f64 = 0.5;
const CLOSE_FACTOR: f64 = 0.8;
const MODERATE_FACTOR: f64 = 0.6;
const LOCATION_FLEX_FACTOR: f64 = 0.5;
// Keeps a gap that is exactly on a tier boundary inside that tier.
const GAP_EPSILON: f64 = 1e-9;

/// Scores profile/opportunity pairs under one fixed weight split.
///
/// Holds no mutable state; a single scorer can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScorer {
    weights: NormalizedWeights,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(&MatchWeights::default())
    }
}

impl MatchScorer {
    pub fn new(weights: &MatchWeights) -> Self {
        Self {
            weights: weights.normalized(),
        }
    }

    pub fn weights(&self) -> &NormalizedWeights {
        &self.weights
    }

    pub fn score(&self, profile: &Profile, opportunity: &Opportunity) -> MatchResult {
        let mut reasons = Vec::new();
        let mut breakdown = Vec::with_capacity(Criterion::ALL.len());

        let skills = evaluate_skills(profile, opportunity);
        push_criterion(
            &mut breakdown,
            &mut reasons,
            Criterion::Skills,
            skills.ratio(),
            self.weights.skills,
            skills.reason(),
        );

        let (academic_factor, academic_reason) = evaluate_academic(profile, opportunity);
        push_criterion(
            &mut breakdown,
            &mut reasons,
            Criterion::Academic,
            academic_factor,
            self.weights.academic,
            academic_reason,
        );

        let (location_factor, location_reason) = evaluate_location(profile, opportunity);
        push_criterion(
            &mut breakdown,
            &mut reasons,
            Criterion::Location,
            location_factor,
            self.weights.location,
            location_reason,
        );

        let domain_matched = evaluate_domain(profile, opportunity);
        push_criterion(
            &mut breakdown,
            &mut reasons,
            Criterion::Domain,
            if domain_matched { 1.0 } else { 0.0 },
            self.weights.domain,
            domain_matched.then(|| "Domain preference matched".to_string()),
        );

        if salary_in_range(profile, opportunity) {
            reasons.push("Salary within preferred range".to_string());
        }

        let total: f64 = breakdown.iter().map(|s| s.points).sum();
        MatchResult {
            score: to_score(total),
            reasons,
            breakdown,
            missing_skills: skills.missing,
        }
    }
}

/// Convenience wrapper; `None` means the default weight split.
pub fn score(
    profile: &Profile,
    opportunity: &Opportunity,
    weights: Option<&MatchWeights>,
) -> MatchResult {
    match weights {
        Some(w) => MatchScorer::new(w).score(profile, opportunity),
        None => MatchScorer::default().score(profile, opportunity),
    }
}

fn push_criterion(
    breakdown: &mut Vec<SubScore>,
    reasons: &mut Vec<String>,
    criterion: Criterion,
    factor: f64,
    max_points: f64,
    reason: Option<String>,
) {
    let points = factor * max_points;
    // Reasons only accompany criteria that actually earned points.
    if points > 0.0 {
        if let Some(reason) = reason {
            reasons.push(reason);
        }
    }
    breakdown.push(SubScore {
        criterion,
        points,
        max_points,
    });
}

struct SkillOutcome {
    required: usize,
    matched: Vec<String>,
    missing: Vec<String>,
}

impl SkillOutcome {
    fn ratio(&self) -> f64 {
        if self.required == 0 {
            0.0
        } else {
            self.matched.len() as f64 / self.required as f64
        }
    }

    fn reason(&self) -> Option<String> {
        if self.matched.is_empty() {
            return None;
        }
        Some(format!(
            "{}/{} skills match: {}",
            self.matched.len(),
            self.required,
            self.matched.join(", ")
        ))
    }
}

fn evaluate_skills(profile: &Profile, opportunity: &Opportunity) -> SkillOutcome {
    let held: Vec<String> = profile
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut outcome = SkillOutcome {
        required: 0,
        matched: Vec::new(),
        missing: Vec::new(),
    };
    for required in &opportunity.required_skills {
        let needle = required.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        outcome.required += 1;
        if held.iter().any(|h| skills_overlap(h, &needle)) {
            outcome.matched.push(required.trim().to_string());
        } else {
            outcome.missing.push(required.trim().to_string());
        }
    }
    outcome
}

/// Bidirectional containment so "ReactJS" and "React" style pairs still
/// line up. Both sides must already be lowercased.
pub(crate) fn skills_overlap(held: &str, required: &str) -> bool {
    held.contains(required) || required.contains(held)
}

fn evaluate_academic(profile: &Profile, opportunity: &Opportunity) -> (f64, Option<String>) {
    let cgpa = finite_or_zero(profile.cgpa);
    let min = finite_or_zero(opportunity.min_cgpa);
    if cgpa >= min {
        return (
            1.0,
            Some(format!("CGPA meets requirement ({cgpa} >= {min})")),
        );
    }
    let gap = min - cgpa;
    if gap <= CLOSE_GAP + GAP_EPSILON {
        (
            CLOSE_FACTOR,
            Some(format!("CGPA close to requirement (gap: {gap:.1})")),
        )
    } else if gap <= MODERATE_GAP + GAP_EPSILON {
        (
            MODERATE_FACTOR,
            Some(format!("CGPA moderately close (gap: {gap:.1})")),
        )
    } else {
        (0.0, None)
    }
}

fn evaluate_location(profile: &Profile, opportunity: &Opportunity) -> (f64, Option<String>) {
    if opportunity.is_remote && profile.prefers_remote() {
        return (1.0, Some("Remote work preference matched".to_string()));
    }

    let target = opportunity.location.trim().to_lowercase();
    let preferred: Vec<String> = profile
        .preferences
        .locations
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    if !target.is_empty() && preferred.iter().any(|loc| target.contains(loc.as_str())) {
        return (1.0, Some("Preferred location matched".to_string()));
    }

    // Either side leaving location open reads as flexibility, not a mismatch.
    if preferred.is_empty() || opportunity.is_remote || target.is_empty() {
        return (
            LOCATION_FLEX_FACTOR,
            Some("Location flexibility".to_string()),
        );
    }
    (0.0, None)
}

fn evaluate_domain(profile: &Profile, opportunity: &Opportunity) -> bool {
    let preferred: Vec<String> = profile
        .preferences
        .domains
        .iter()
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect();
    if preferred.is_empty() {
        return true;
    }
    let domain = opportunity.domain.to_lowercase();
    preferred.iter().any(|d| domain.contains(d.as_str()))
}

fn salary_in_range(profile: &Profile, opportunity: &Opportunity) -> bool {
    match (profile.preferences.salary_range, opportunity.stipend) {
        (Some(range), Some(stipend)) => range.contains(stipend),
        _ => false,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn to_score(total: f64) -> u8 {
    if !total.is_finite() {
        return 0;
    }
    total.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Preferences, SalaryRange, WorkMode};

    fn frontend_profile() -> Profile {
        Profile::new("p1", "Arjun Sharma")
            .with_skills(["React", "JavaScript"])
            .with_cgpa(8.2)
            .with_preferences(Preferences {
                locations: vec!["Bangalore".to_string(), "Remote".to_string()],
                domains: vec!["Frontend Development".to_string()],
                ..Preferences::default()
            })
    }

    fn frontend_role() -> Opportunity {
        Opportunity::new("fe-001", "Frontend Developer Intern")
            .with_required_skills(["React", "JavaScript", "HTML", "CSS", "TypeScript"])
            .with_min_cgpa(7.0)
            .with_location("Bangalore, India", false)
            .with_domain("Frontend Development")
    }

    fn academic_points(cgpa: f64) -> f64 {
        let profile = Profile::new("p", "P").with_cgpa(cgpa);
        let opportunity = Opportunity::new("o", "O").with_min_cgpa(8.0);
        MatchScorer::default()
            .score(&profile, &opportunity)
            .points_for(Criterion::Academic)
    }

    #[test]
    fn end_to_end_frontend_example() {
        let result = score(&frontend_profile(), &frontend_role(), None);
        assert_eq!(result.score, 70);
        assert_eq!(
            result.reasons,
            vec![
                "2/5 skills match: React, JavaScript".to_string(),
                "CGPA meets requirement (8.2 >= 7)".to_string(),
                "Preferred location matched".to_string(),
                "Domain preference matched".to_string(),
            ]
        );
        assert_eq!(result.missing_skills, vec!["HTML", "CSS", "TypeScript"]);
    }

    #[test]
    fn classic_preset_shifts_the_total() {
        let weights = crate::scoring::WeightPreset::Classic.weights();
        let result = score(&frontend_profile(), &frontend_role(), Some(&weights));
        // 16 + 20 + 20 + 20
        assert_eq!(result.score, 76);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = MatchScorer::default();
        let a = scorer.score(&frontend_profile(), &frontend_role());
        let b = scorer.score(&frontend_profile(), &frontend_role());
        assert_eq!(a, b);
    }

    #[test]
    fn zero_required_skills_contributes_nothing() {
        let profile = Profile::new("p", "P").with_skills(["x"]);
        let result = score(&profile, &Opportunity::new("o", "O"), None);
        assert_eq!(result.points_for(Criterion::Skills), 0.0);
        assert!(!result.reasons.iter().any(|r| r.contains("skills match")));
    }

    #[test]
    fn skill_match_is_bidirectional_substring() {
        let profile = Profile::new("p", "P").with_skills(["ReactJS", "SQL"]);
        let opportunity =
            Opportunity::new("o", "O").with_required_skills(["react", "PostgreSQL"]);
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Skills), 50.0);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn blank_skill_tokens_are_ignored() {
        let profile = Profile::new("p", "P").with_skills(["", "  "]);
        let opportunity = Opportunity::new("o", "O").with_required_skills(["Rust", ""]);
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Skills), 0.0);
        assert_eq!(result.missing_skills, vec!["Rust"]);
    }

    #[test]
    fn cgpa_tiers_step_down_with_the_gap() {
        let exact = academic_points(8.0);
        let close = academic_points(7.71);
        let edge = academic_points(7.7);
        let moderate = academic_points(7.5);
        let far = academic_points(7.0);
        assert_eq!(exact, 25.0);
        assert!((close - 20.0).abs() < 1e-9);
        assert!((edge - 20.0).abs() < 1e-9);
        assert!((moderate - 15.0).abs() < 1e-9);
        assert_eq!(far, 0.0);
        assert!(exact >= close && close > far);
    }

    #[test]
    fn close_gap_reason_names_the_gap() {
        let profile = Profile::new("p", "P").with_cgpa(7.8);
        let opportunity = Opportunity::new("o", "O").with_min_cgpa(8.0);
        let result = score(&profile, &opportunity, None);
        assert!(result
            .reasons
            .contains(&"CGPA close to requirement (gap: 0.2)".to_string()));
    }

    #[test]
    fn remote_preference_earns_full_location_weight() {
        let profile = Profile::new("p", "P").with_preferences(Preferences {
            work_mode: Some(WorkMode::Remote),
            ..Preferences::default()
        });
        let opportunity = Opportunity::new("o", "O").with_location("Remote", true);
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Location), 15.0);
        assert!(result
            .reasons
            .contains(&"Remote work preference matched".to_string()));
    }

    #[test]
    fn mismatched_city_earns_nothing() {
        let profile = Profile::new("p", "P").with_preferences(Preferences {
            locations: vec!["Paris".to_string()],
            work_mode: Some(WorkMode::Office),
            ..Preferences::default()
        });
        let opportunity = Opportunity::new("o", "O").with_location("Berlin", false);
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Location), 0.0);
        assert!(!result.reasons.iter().any(|r| r.contains("Location")));
    }

    #[test]
    fn open_location_preference_earns_half_weight() {
        let profile = Profile::new("p", "P");
        let opportunity = Opportunity::new("o", "O").with_location("Pune", false);
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Location), 7.5);
        assert!(result.reasons.contains(&"Location flexibility".to_string()));
    }

    #[test]
    fn remote_role_is_flexible_for_office_candidates() {
        let profile = Profile::new("p", "P").with_preferences(Preferences {
            locations: vec!["Delhi".to_string()],
            work_mode: Some(WorkMode::Office),
            ..Preferences::default()
        });
        let opportunity = Opportunity::new("o", "O").with_location("Remote", true);
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Location), 7.5);
    }

    #[test]
    fn domain_preference_must_overlap() {
        let profile = Profile::new("p", "P").with_preferences(Preferences {
            domains: vec!["Data Science".to_string()],
            ..Preferences::default()
        });
        let opportunity = Opportunity::new("o", "O").with_domain("Mobile Development");
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Domain), 0.0);

        let opportunity = Opportunity::new("o", "O").with_domain("Data Science & Analytics");
        let result = score(&profile, &opportunity, None);
        assert_eq!(result.points_for(Criterion::Domain), 10.0);
    }

    #[test]
    fn salary_reason_is_informational() {
        let base = frontend_profile();
        let mut with_salary = base.clone();
        with_salary.preferences.salary_range = Some(SalaryRange::new(20_000.0, 50_000.0));
        let opportunity = frontend_role().with_stipend(35_000.0);

        let without = score(&base, &opportunity, None);
        let with = score(&with_salary, &opportunity, None);
        assert_eq!(without.score, with.score);
        assert_eq!(
            with.reasons.last().map(String::as_str),
            Some("Salary within preferred range")
        );
    }

    #[test]
    fn malformed_numbers_do_not_escape_bounds() {
        let profile = Profile::new("p", "P").with_cgpa(f64::NAN);
        let opportunity = Opportunity::new("o", "O").with_min_cgpa(f64::INFINITY);
        let result = score(&profile, &opportunity, None);
        assert!(result.score <= 100);
        assert_eq!(result.points_for(Criterion::Academic), 25.0);
    }

    #[test]
    fn zero_skill_weight_drops_the_skill_reason() {
        let weights = MatchWeights::new(0.0, 25.0, 15.0, 10.0);
        let result = score(&frontend_profile(), &frontend_role(), Some(&weights));
        assert_eq!(result.points_for(Criterion::Skills), 0.0);
        assert_eq!(
            result.reasons,
            vec![
                "CGPA meets requirement (8.2 >= 7)".to_string(),
                "Preferred location matched".to_string(),
                "Domain preference matched".to_string(),
            ]
        );
        assert_eq!(result.missing_skills, vec!["HTML", "CSS", "TypeScript"]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn perfect_match_reaches_one_hundred() {
        let profile = Profile::new("p", "P")
            .with_skills(["Rust", "Tokio"])
            .with_cgpa(9.5)
            .with_preferences(Preferences {
                work_mode: Some(WorkMode::Remote),
                ..Preferences::default()
            });
        let opportunity = Opportunity::new("o", "O")
            .with_required_skills(["Rust", "Tokio"])
            .with_min_cgpa(7.0)
            .with_location("Remote", true);
        assert_eq!(score(&profile, &opportunity, None).score, 100);
    }
}
