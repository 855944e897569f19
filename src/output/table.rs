use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::allocation::{
    AllocationRun, AllocationStatus, MatchSummary, Recommendation, SkillGainResult, SkillGap,
};
use crate::profile::{Opportunity, Profile};
use crate::scoring::{MatchBand, MatchResult, RankedCandidate, RankedMatch};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn score_cell(score: u8) -> Cell {
    let color = match MatchBand::from_score(score) {
        MatchBand::Excellent => Color::Green,
        MatchBand::Good => Color::Cyan,
        MatchBand::Fair => Color::Yellow,
        MatchBand::Poor => Color::Red,
    };
    Cell::new(format!("{score}%")).fg(color)
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

pub fn render_score_table(result: &MatchResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Criterion", "Points", "Max"]);
    for sub in &result.breakdown {
        table.add_row(vec![
            sub.criterion.to_string(),
            format!("{:.1}", sub.points),
            format!("{:.1}", sub.max_points),
        ]);
    }
    table.add_row(Row::from(vec![
        Cell::new("total"),
        score_cell(result.score),
        Cell::new(result.band().to_string()),
    ]));

    let mut out = table.to_string();
    for reason in &result.reasons {
        out.push_str(&format!("\n  + {reason}"));
    }
    if !result.missing_skills.is_empty() {
        out.push_str(&format!(
            "\n  missing: {}",
            result.missing_skills.join(", ")
        ));
    }
    out
}

pub fn render_ranked_table(matches: &[RankedMatch]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Opportunity", "Company", "Domain", "Score", "Reasons"]);
    for m in matches {
        table.add_row(Row::from(vec![
            Cell::new(m.position),
            Cell::new(format!("{} ({})", m.title, m.opportunity_id)),
            Cell::new(or_dash(&m.company)),
            Cell::new(or_dash(&m.domain)),
            score_cell(m.result.score),
            Cell::new(m.result.reasons.join("\n")),
        ]));
    }
    table.to_string()
}

pub fn render_candidates_table(candidates: &[RankedCandidate]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Candidate", "Score", "Missing Skills"]);
    for c in candidates {
        table.add_row(Row::from(vec![
            Cell::new(c.position),
            Cell::new(format!("{} ({})", c.name, c.profile_id)),
            score_cell(c.result.score),
            Cell::new(or_dash(&c.result.missing_skills.join(", "))),
        ]));
    }
    table.to_string()
}

pub fn render_recommendations_table(recommendations: &[Recommendation]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Candidate",
        "Recommended",
        "Score",
        "Confidence",
        "Concerns",
        "Alternatives",
    ]);
    for rec in recommendations {
        let alternatives = rec
            .alternatives
            .iter()
            .map(|a| format!("{} ({}%)", a.title, a.score))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(Row::from(vec![
            Cell::new(&rec.name),
            Cell::new(format!("{} @ {}", rec.title, or_dash(&rec.company))),
            score_cell(rec.match_score),
            Cell::new(format!("{}%", rec.confidence)),
            Cell::new(or_dash(&rec.concerns.join("\n"))),
            Cell::new(or_dash(&alternatives)),
        ]));
    }
    table.to_string()
}

pub fn render_allocation_table(run: &AllocationRun) -> String {
    let mut table = new_table();
    table.set_header(vec!["Id", "Candidate", "Opportunity", "Score", "Status"]);
    for entry in &run.entries {
        let status = Cell::new(entry.status.to_string()).fg(match entry.status {
            AllocationStatus::Pending => Color::Green,
            AllocationStatus::Waitlisted => Color::Yellow,
            AllocationStatus::NotMatched | AllocationStatus::Rejected => Color::Red,
            AllocationStatus::Approved => Color::Cyan,
        });
        table.add_row(Row::from(vec![
            Cell::new(&entry.id),
            Cell::new(&entry.name),
            Cell::new(entry.title.as_deref().unwrap_or("-")),
            score_cell(entry.score),
            status,
        ]));
    }
    format!(
        "{}\nrun at {} | pending {} | waitlisted {} | not matched {}",
        table,
        run.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        run.count(AllocationStatus::Pending),
        run.count(AllocationStatus::Waitlisted),
        run.count(AllocationStatus::NotMatched),
    )
}

pub fn render_summary_table(summary: &MatchSummary) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Profiles".to_string(), summary.profiles.to_string()]);
    table.add_row(vec![
        "Opportunities".to_string(),
        summary.opportunities.to_string(),
    ]);
    table.add_row(vec![
        "Pairs scored".to_string(),
        summary.pairs_scored.to_string(),
    ]);
    table.add_row(vec![
        "Average score".to_string(),
        format!("{:.1}", summary.average_score),
    ]);
    table.add_row(vec![
        "Best score".to_string(),
        summary.best_score.to_string(),
    ]);
    for (band, count) in &summary.bands {
        table.add_row(vec![format!("Band: {band}"), count.to_string()]);
    }

    let mut domains = new_table();
    domains.set_header(vec!["Domain", "Average Score"]);
    for (domain, avg) in &summary.domain_averages {
        domains.add_row(vec![domain.clone(), format!("{avg:.1}")]);
    }
    format!("{table}\n{domains}")
}

pub fn render_whatif_table(result: &SkillGainResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Opportunity", "Before", "After", "Gain"]);
    for delta in &result.deltas {
        let gain = delta.gain();
        let gain_cell = if gain > 0 {
            Cell::new(format!("+{gain}")).fg(Color::Green)
        } else {
            Cell::new("0")
        };
        table.add_row(Row::from(vec![
            Cell::new(format!("{} ({})", delta.title, delta.opportunity_id)),
            score_cell(delta.before),
            score_cell(delta.after),
            gain_cell,
        ]));
    }
    format!(
        "{}\nadded: {} | average {:.1} -> {:.1}",
        table,
        if result.skills_added.is_empty() {
            "-".to_string()
        } else {
            result.skills_added.join(", ")
        },
        result.average_before,
        result.average_after
    )
}

pub fn render_skill_gaps_table(gaps: &[SkillGap]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Missing Skill", "Opportunities"]);
    for gap in gaps {
        table.add_row(vec![gap.skill.clone(), gap.occurrences.to_string()]);
    }
    table.to_string()
}

pub fn render_opportunities_table(opportunities: &[Opportunity]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Id",
        "Title",
        "Company",
        "Location",
        "Domain",
        "Min CGPA",
        "Skills",
    ]);
    for o in opportunities {
        let location = if o.is_remote {
            format!("{} (remote)", or_dash(&o.location))
        } else {
            or_dash(&o.location)
        };
        table.add_row(vec![
            o.id.clone(),
            o.title.clone(),
            or_dash(&o.company),
            location,
            or_dash(&o.domain),
            format!("{:.1}", o.min_cgpa),
            o.required_skills.join(", "),
        ]);
    }
    table.to_string()
}

pub fn render_profiles_table(profiles: &[Profile]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Id", "Name", "CGPA", "Skills", "Locations", "Domains"]);
    for p in profiles {
        table.add_row(vec![
            p.id.clone(),
            p.name.clone(),
            format!("{:.2}", p.cgpa),
            p.skills.join(", "),
            or_dash(&p.preferences.locations.join(", ")),
            or_dash(&p.preferences.domains.join(", ")),
        ]);
    }
    table.to_string()
}
