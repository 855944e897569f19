use anyhow::Result;

use crate::allocation::{AllocationRun, Recommendation};
use crate::scoring::{RankedCandidate, RankedMatch};

pub fn ranked_to_csv(matches: &[RankedMatch]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "position",
        "opportunity_id",
        "title",
        "company",
        "domain",
        "score",
        "reasons",
        "missing_skills",
    ])?;
    for m in matches {
        writer.write_record([
            m.position.to_string(),
            m.opportunity_id.clone(),
            m.title.clone(),
            m.company.clone(),
            m.domain.clone(),
            m.result.score.to_string(),
            m.result.reasons.join("; "),
            m.result.missing_skills.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn candidates_to_csv(candidates: &[RankedCandidate]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["position", "profile_id", "name", "score", "missing_skills"])?;
    for c in candidates {
        writer.write_record([
            c.position.to_string(),
            c.profile_id.clone(),
            c.name.clone(),
            c.result.score.to_string(),
            c.result.missing_skills.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn recommendations_to_csv(recommendations: &[Recommendation]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "profile_id",
        "name",
        "opportunity_id",
        "title",
        "match_score",
        "confidence",
        "concerns",
    ])?;
    for rec in recommendations {
        writer.write_record([
            rec.profile_id.clone(),
            rec.name.clone(),
            rec.opportunity_id.clone(),
            rec.title.clone(),
            rec.match_score.to_string(),
            rec.confidence.to_string(),
            rec.concerns.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn allocation_to_csv(run: &AllocationRun) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "profile_id",
        "name",
        "opportunity_id",
        "score",
        "status",
    ])?;
    for entry in &run.entries {
        writer.write_record([
            entry.id.clone(),
            entry.profile_id.clone(),
            entry.name.clone(),
            entry.opportunity_id.clone().unwrap_or_default(),
            entry.score.to_string(),
            entry.status.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Opportunity, Profile};
    use crate::scoring::{rank_opportunities, MatchScorer};

    #[test]
    fn ranked_csv_quotes_fields_with_commas() {
        let profile = Profile::new("p", "P").with_skills(["React", "CSS"]);
        let opportunities = vec![Opportunity::new("fe-001", "Frontend Intern")
            .with_required_skills(["React", "CSS"])
            .with_location("Bangalore, India", false)];
        let ranked = rank_opportunities(&MatchScorer::default(), &profile, &opportunities);
        let csv = ranked_to_csv(&ranked).expect("csv renders");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("position,opportunity_id,title,company,domain,score,reasons,missing_skills")
        );
        let row = lines.next().expect("one data row");
        assert!(row.starts_with("1,fe-001,Frontend Intern,,,"));
        assert!(row.contains("\"2/2 skills match: React, CSS; "));
    }
}
