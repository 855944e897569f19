use std::collections::BTreeMap;

use crate::allocation::MatchSummary;
use crate::scoring::{MatchBand, ProfileMatches};

pub fn summarize(matrix: &[ProfileMatches]) -> MatchSummary {
    let mut bands: BTreeMap<MatchBand, usize> =
        MatchBand::ALL.iter().map(|band| (*band, 0)).collect();
    let mut by_domain: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    let mut opportunities = 0usize;
    let mut pairs = 0usize;
    let mut total = 0u64;
    let mut best = 0u8;

    for row in matrix {
        opportunities = opportunities.max(row.matches.len());
        for m in &row.matches {
            let score = m.result.score;
            pairs += 1;
            total += u64::from(score);
            best = best.max(score);
            *bands.entry(m.result.band()).or_insert(0) += 1;

            let domain = if m.domain.trim().is_empty() {
                "Unspecified".to_string()
            } else {
                m.domain.clone()
            };
            let slot = by_domain.entry(domain).or_insert((0, 0));
            slot.0 += u64::from(score);
            slot.1 += 1;
        }
    }

    MatchSummary {
        profiles: matrix.len(),
        opportunities,
        pairs_scored: pairs,
        average_score: if pairs == 0 {
            0.0
        } else {
            total as f64 / pairs as f64
        },
        best_score: best,
        bands,
        domain_averages: by_domain
            .into_iter()
            .map(|(domain, (sum, count))| (domain, sum as f64 / count as f64))
            .collect(),
    }
}
