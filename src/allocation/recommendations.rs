use crate::allocation::{Alternative, Recommendation};
use crate::profile::{Opportunity, Profile};
use crate::scoring::{rank_opportunities, MatchBand, MatchScorer, RankedMatch};

const LOW_SCORE: u8 = 60;

/// One recommendation per profile that has at least one opportunity scoring
/// `min_score` or better, ordered by confidence.
pub fn recommend(
    scorer: &MatchScorer,
    profiles: &[Profile],
    opportunities: &[Opportunity],
    min_score: u8,
    top: usize,
) -> Vec<Recommendation> {
    let top = top.max(1);
    let mut recommendations = Vec::new();

    for profile in profiles {
        let shortlist: Vec<RankedMatch> = rank_opportunities(scorer, profile, opportunities)
            .into_iter()
            .filter(|m| m.result.score >= min_score)
            .take(top)
            .collect();
        let Some(best) = shortlist.first() else {
            continue;
        };
        let opportunity = opportunities.iter().find(|o| o.id == best.opportunity_id);

        let mut reasons = vec![format!(
            "Best match based on {} overall alignment",
            band_phrase(best.result.band())
        )];
        reasons.extend(best.result.reasons.iter().cloned());

        recommendations.push(Recommendation {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            opportunity_id: best.opportunity_id.clone(),
            title: best.title.clone(),
            company: best.company.clone(),
            match_score: best.result.score,
            confidence: shortlist
                .iter()
                .map(|m| m.result.score)
                .max()
                .unwrap_or(best.result.score),
            reasons,
            concerns: concerns(profile, opportunity, best),
            alternatives: shortlist
                .iter()
                .skip(1)
                .map(|m| Alternative {
                    opportunity_id: m.opportunity_id.clone(),
                    title: m.title.clone(),
                    score: m.result.score,
                })
                .collect(),
        });
    }

    recommendations.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    recommendations
}

fn concerns(profile: &Profile, opportunity: Option<&Opportunity>, best: &RankedMatch) -> Vec<String> {
    let mut out = Vec::new();
    if best.result.score < LOW_SCORE {
        out.push("Low match score".to_string());
    }
    if !best.result.missing_skills.is_empty() {
        out.push(format!(
            "Missing skills: {}",
            best.result.missing_skills.join(", ")
        ));
    }
    if let Some(opportunity) = opportunity {
        if profile.cgpa < opportunity.min_cgpa {
            out.push(format!(
                "CGPA below minimum ({} < {})",
                profile.cgpa, opportunity.min_cgpa
            ));
        }
    }
    out
}

fn band_phrase(band: MatchBand) -> &'static str {
    match band {
        MatchBand::Excellent => "excellent",
        MatchBand::Good => "good",
        MatchBand::Fair | MatchBand::Poor => "partial",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Opportunity> {
        vec![
            Opportunity::new("be-001", "Backend Intern")
                .with_required_skills(["Java", "Spring", "SQL", "Docker"])
                .with_min_cgpa(7.5)
                .with_domain("Backend Development"),
            Opportunity::new("ds-001", "Data Science Intern")
                .with_required_skills(["Python", "Pandas"])
                .with_min_cgpa(8.0)
                .with_domain("Data Science"),
            Opportunity::new("ml-001", "ML Intern")
                .with_required_skills(["Python", "TensorFlow"])
                .with_min_cgpa(8.5)
                .with_domain("Machine Learning"),
        ]
    }

    #[test]
    fn picks_best_match_with_alternatives() {
        let profile = Profile::new("p1", "Priya")
            .with_skills(["Python", "Pandas"])
            .with_cgpa(8.7);
        let recs = recommend(&MatchScorer::default(), &[profile], &catalog(), 40, 3);
        assert_eq!(recs.len(), 1);
        let rec = &recs[0];
        assert_eq!(rec.opportunity_id, "ds-001");
        // 50 + 25 + 7.5 + 10 rounds to 93
        assert_eq!(rec.match_score, 93);
        assert_eq!(rec.confidence, rec.match_score);
        assert!(rec.concerns.is_empty());
        assert_eq!(rec.alternatives[0].opportunity_id, "ml-001");
        assert!(rec.reasons[0].contains("excellent"));
    }

    #[test]
    fn weak_matches_carry_concerns() {
        let profile = Profile::new("p2", "Rahul")
            .with_skills(["Java"])
            .with_cgpa(7.3);
        let recs = recommend(&MatchScorer::default(), &[profile], &catalog(), 40, 3);
        let rec = &recs[0];
        assert_eq!(rec.opportunity_id, "be-001");
        assert!(rec.concerns.contains(&"Low match score".to_string()));
        assert!(rec
            .concerns
            .contains(&"Missing skills: Spring, SQL, Docker".to_string()));
        assert!(rec.concerns.iter().any(|c| c.starts_with("CGPA below minimum")));
    }

    #[test]
    fn profiles_without_qualifying_match_are_omitted() {
        let strong = Profile::new("p1", "Priya")
            .with_skills(["Python", "Pandas"])
            .with_cgpa(8.7);
        let none = Profile::new("p3", "Nobody").with_skills(["Cobol"]);
        let recs = recommend(&MatchScorer::default(), &[none, strong], &catalog(), 60, 3);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].profile_id, "p1");
    }

    #[test]
    fn sorted_by_confidence() {
        let weak = Profile::new("p2", "Rahul").with_skills(["Java"]).with_cgpa(7.3);
        let strong = Profile::new("p1", "Priya")
            .with_skills(["Python", "Pandas"])
            .with_cgpa(8.7);
        let recs = recommend(&MatchScorer::default(), &[weak, strong], &catalog(), 40, 3);
        assert_eq!(recs[0].profile_id, "p1");
        assert!(recs[0].confidence >= recs[1].confidence);
    }
}
