use serde::{Deserialize, Serialize};

use crate::profile::Opportunity;
use crate::scoring::RankedMatch;

/// Narrowing applied to a catalog before and after ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpportunityFilter {
    pub remote_only: bool,
    pub domain: Option<String>,
    pub location: Option<String>,
    /// Fuzzy text over title, company and domain.
    pub query: Option<String>,
    pub min_score: Option<u8>,
}

impl OpportunityFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        if self.remote_only && !opportunity.is_remote {
            return false;
        }
        if let Some(domain) = non_blank(&self.domain) {
            if !contains_ignore_case(&opportunity.domain, domain) {
                return false;
            }
        }
        if let Some(location) = non_blank(&self.location) {
            let remote_hit = opportunity.is_remote && location.eq_ignore_ascii_case("remote");
            if !remote_hit && !contains_ignore_case(&opportunity.location, location) {
                return false;
            }
        }
        if let Some(query) = non_blank(&self.query) {
            let haystack = format!(
                "{} {} {}",
                opportunity.title, opportunity.company, opportunity.domain
            );
            if !fuzzy_match(&haystack, query) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, opportunities: &[Opportunity]) -> Vec<Opportunity> {
        opportunities
            .iter()
            .filter(|o| self.matches(o))
            .cloned()
            .collect()
    }

    /// Drops ranked matches under `min_score`, renumbering positions.
    pub fn apply_min_score(&self, ranked: Vec<RankedMatch>) -> Vec<RankedMatch> {
        let Some(min) = self.min_score else {
            return ranked;
        };
        ranked
            .into_iter()
            .filter(|m| m.result.score >= min)
            .enumerate()
            .map(|(idx, mut m)| {
                m.position = idx + 1;
                m
            })
            .collect()
    }
}

/// Case-insensitive subsequence match: every character of `query` appears
/// in `haystack` in order. Whitespace in the query is ignored.
pub fn fuzzy_match(haystack: &str, query: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let mut chars = haystack.chars();
    query
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|q| chars.any(|h| h == q))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
