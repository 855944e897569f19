use std::collections::HashMap;

use crate::allocation::{SkillGainDelta, SkillGainResult, SkillGap};
use crate::profile::{Opportunity, Profile};
use crate::scoring::{MatchScorer, RankedMatch};

/// Re-scores `profile` as if it also held `skills`.
///
/// Added skills only ever create matches, so no delta is negative.
pub fn simulate_skill_gain(
    scorer: &MatchScorer,
    profile: &Profile,
    opportunities: &[Opportunity],
    skills: &[String],
) -> SkillGainResult {
    let mut changed = profile.clone();
    let mut skills_added = Vec::new();
    for skill in skills {
        let skill = skill.trim();
        if skill.is_empty() {
            continue;
        }
        let already_held = changed
            .skills
            .iter()
            .any(|held| held.eq_ignore_ascii_case(skill));
        if !already_held {
            changed.skills.push(skill.to_string());
            skills_added.push(skill.to_string());
        }
    }

    let deltas: Vec<SkillGainDelta> = opportunities
        .iter()
        .map(|opportunity| SkillGainDelta {
            opportunity_id: opportunity.id.clone(),
            title: opportunity.title.clone(),
            before: scorer.score(profile, opportunity).score,
            after: scorer.score(&changed, opportunity).score,
        })
        .collect();

    SkillGainResult {
        profile_id: profile.id.clone(),
        skills_added,
        average_before: average(deltas.iter().map(|d| d.before)),
        average_after: average(deltas.iter().map(|d| d.after)),
        deltas,
    }
}

/// Required skills most often missing across `matches`, most frequent first.
/// Ties are broken alphabetically.
pub fn skill_gaps(matches: &[RankedMatch], limit: usize) -> Vec<SkillGap> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for m in matches {
        for skill in &m.result.missing_skills {
            let entry = counts
                .entry(skill.to_lowercase())
                .or_insert_with(|| (skill.clone(), 0));
            entry.1 += 1;
        }
    }
    let mut gaps: Vec<SkillGap> = counts
        .into_values()
        .map(|(skill, occurrences)| SkillGap { skill, occurrences })
        .collect();
    gaps.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.skill.to_lowercase().cmp(&b.skill.to_lowercase()))
    });
    gaps.truncate(limit);
    gaps
}

fn average(scores: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = scores.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rank_opportunities;

    fn opportunities() -> Vec<Opportunity> {
        vec![
            Opportunity::new("a", "Frontend")
                .with_required_skills(["React", "TypeScript"])
                .with_min_cgpa(7.0),
            Opportunity::new("b", "Fullstack")
                .with_required_skills(["React", "Node.js", "TypeScript", "MongoDB"])
                .with_min_cgpa(7.0),
            Opportunity::new("c", "Backend")
                .with_required_skills(["Java"])
                .with_min_cgpa(7.0),
        ]
    }

    #[test]
    fn added_skill_lifts_matching_roles_only() {
        let profile = Profile::new("p", "P").with_skills(["React"]).with_cgpa(8.0);
        let result = simulate_skill_gain(
            &MatchScorer::default(),
            &profile,
            &opportunities(),
            &["TypeScript".to_string(), "react".to_string()],
        );
        assert_eq!(result.skills_added, vec!["TypeScript"]);
        assert_eq!(result.deltas[0].gain(), 25);
        assert!(result.deltas[1].gain() > 0);
        assert_eq!(result.deltas[2].gain(), 0);
        assert!(result.deltas.iter().all(|d| d.after >= d.before));
        assert!(result.average_after > result.average_before);
        assert_eq!(result.improved().count(), 2);
    }

    #[test]
    fn gaps_count_missing_skills() {
        let profile = Profile::new("p", "P").with_skills(["React"]);
        let ranked = rank_opportunities(&MatchScorer::default(), &profile, &opportunities());
        let gaps = skill_gaps(&ranked, 2);
        assert_eq!(
            gaps,
            vec![
                SkillGap {
                    skill: "TypeScript".to_string(),
                    occurrences: 2
                },
                SkillGap {
                    skill: "Java".to_string(),
                    occurrences: 1
                },
            ]
        );
    }

    #[test]
    fn empty_catalog_averages_to_zero() {
        let profile = Profile::new("p", "P");
        let result = simulate_skill_gain(&MatchScorer::default(), &profile, &[], &[]);
        assert_eq!(result.average_before, 0.0);
        assert!(result.deltas.is_empty());
    }
}
