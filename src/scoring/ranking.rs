use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::profile::{Opportunity, Profile};
use crate::scoring::{MatchResult, MatchScorer};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedMatch {
    pub position: usize,
    pub opportunity_id: String,
    pub title: String,
    pub company: String,
    pub domain: String,
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCandidate {
    pub position: usize,
    pub profile_id: String,
    pub name: String,
    pub result: MatchResult,
}

/// Every opportunity ranked for one profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileMatches {
    pub profile_id: String,
    pub name: String,
    pub matches: Vec<RankedMatch>,
}

impl ProfileMatches {
    pub fn best(&self) -> Option<&RankedMatch> {
        self.matches.first()
    }
}

/// Scores `profile` against every opportunity, best first.
///
/// Scoring runs in parallel; the final sort is stable, so equal scores keep
/// the order in which opportunities were supplied.
pub fn rank_opportunities(
    scorer: &MatchScorer,
    profile: &Profile,
    opportunities: &[Opportunity],
) -> Vec<RankedMatch> {
    tracing::debug!(
        profile = %profile.id,
        opportunities = opportunities.len(),
        "ranking opportunities"
    );
    let mut scored: Vec<RankedMatch> = opportunities
        .par_iter()
        .map(|opportunity| RankedMatch {
            position: 0,
            opportunity_id: opportunity.id.clone(),
            title: opportunity.title.clone(),
            company: opportunity.company.clone(),
            domain: opportunity.domain.clone(),
            result: scorer.score(profile, opportunity),
        })
        .collect();
    scored.sort_by(|a, b| b.result.score.cmp(&a.result.score));
    for (idx, item) in scored.iter_mut().enumerate() {
        item.position = idx + 1;
    }
    scored
}

pub fn rank_candidates(
    scorer: &MatchScorer,
    opportunity: &Opportunity,
    profiles: &[Profile],
) -> Vec<RankedCandidate> {
    tracing::debug!(
        opportunity = %opportunity.id,
        profiles = profiles.len(),
        "ranking candidates"
    );
    let mut scored: Vec<RankedCandidate> = profiles
        .par_iter()
        .map(|profile| RankedCandidate {
            position: 0,
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            result: scorer.score(profile, opportunity),
        })
        .collect();
    scored.sort_by(|a, b| b.result.score.cmp(&a.result.score));
    for (idx, item) in scored.iter_mut().enumerate() {
        item.position = idx + 1;
    }
    scored
}

/// Full profile × opportunity grid, one ranked list per profile in input order.
pub fn score_matrix(
    scorer: &MatchScorer,
    profiles: &[Profile],
    opportunities: &[Opportunity],
) -> Vec<ProfileMatches> {
    tracing::debug!(
        profiles = profiles.len(),
        opportunities = opportunities.len(),
        "scoring matrix"
    );
    profiles
        .par_iter()
        .map(|profile| ProfileMatches {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            matches: rank_opportunities(scorer, profile, opportunities),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Preferences;

    fn profile() -> Profile {
        Profile::new("p1", "Priya Patel")
            .with_skills(["Python", "SQL"])
            .with_cgpa(8.0)
            .with_preferences(Preferences {
                locations: vec!["Mumbai".to_string()],
                domains: vec!["Data".to_string()],
                ..Preferences::default()
            })
    }

    fn opportunities() -> Vec<Opportunity> {
        vec![
            // 25 + 25 + 15 + 10
            Opportunity::new("a", "Analyst")
                .with_required_skills(["Python", "Excel"])
                .with_min_cgpa(7.0)
                .with_location("Mumbai", false)
                .with_domain("Data Analytics"),
            // 50 + 25 + 15 + 10
            Opportunity::new("b", "Data Engineer")
                .with_required_skills(["Python", "SQL"])
                .with_min_cgpa(7.5)
                .with_location("Mumbai", false)
                .with_domain("Data Engineering"),
            // 50 + 25 + 15 + 10, identical to "b"
            Opportunity::new("c", "Data Scientist")
                .with_required_skills(["python", "sql"])
                .with_min_cgpa(6.0)
                .with_location("Mumbai, India", false)
                .with_domain("Data Science"),
        ]
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank_opportunities(&MatchScorer::default(), &profile(), &opportunities());
        let ids: Vec<&str> = ranked.iter().map(|r| r.opportunity_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].result.score, 100);
        assert_eq!(ranked[2].result.score, 75);
        assert_eq!(
            ranked.iter().map(|r| r.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn candidates_rank_best_first() {
        let strong = profile();
        let weak = Profile::new("p2", "Rahul Kumar")
            .with_skills(["Java"])
            .with_cgpa(6.0);
        let ranked = rank_candidates(
            &MatchScorer::default(),
            &opportunities()[1],
            &[weak, strong],
        );
        assert_eq!(ranked[0].profile_id, "p1");
        assert!(ranked[0].result.score > ranked[1].result.score);
    }

    #[test]
    fn matrix_preserves_profile_order() {
        let profiles = vec![
            Profile::new("x", "X"),
            profile(),
            Profile::new("y", "Y"),
        ];
        let matrix = score_matrix(&MatchScorer::default(), &profiles, &opportunities());
        let ids: Vec<&str> = matrix.iter().map(|m| m.profile_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "p1", "y"]);
        assert!(matrix.iter().all(|m| m.matches.len() == 3));
        assert_eq!(
            matrix[1].best().map(|m| m.opportunity_id.as_str()),
            Some("b")
        );
    }

    #[test]
    fn empty_inputs_yield_empty_rankings() {
        let scorer = MatchScorer::default();
        assert!(rank_opportunities(&scorer, &profile(), &[]).is_empty());
        assert!(score_matrix(&scorer, &[], &opportunities()).is_empty());
    }
}
