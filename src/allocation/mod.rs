pub mod recommendations;
pub mod run;
pub mod summary;
pub mod whatif;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::MatchBand;

pub use recommendations::recommend;
pub use run::{run_allocation, ReviewError};
pub use summary::summarize;
pub use whatif::{simulate_skill_gain, skill_gaps};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub profile_id: String,
    pub name: String,
    pub opportunity_id: String,
    pub title: String,
    pub company: String,
    pub match_score: u8,
    /// Best score among the shortlisted opportunities.
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub concerns: Vec<String>,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alternative {
    pub opportunity_id: String,
    pub title: String,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AllocationThresholds {
    pub pending: u8,
    pub waitlist: u8,
}

impl Default for AllocationThresholds {
    fn default() -> Self {
        Self {
            pending: 70,
            waitlist: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Pending,
    Waitlisted,
    NotMatched,
    Approved,
    Rejected,
}

impl Display for AllocationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Waitlisted => "waitlisted",
            Self::NotMatched => "not_matched",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationEntry {
    pub id: String,
    pub profile_id: String,
    pub name: String,
    pub opportunity_id: Option<String>,
    pub title: Option<String>,
    pub score: u8,
    pub status: AllocationStatus,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationRun {
    pub created_at: DateTime<Utc>,
    pub thresholds: AllocationThresholds,
    pub entries: Vec<AllocationEntry>,
}

impl AllocationRun {
    pub fn count(&self, status: AllocationStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn entry(&self, id: &str) -> Option<&AllocationEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillGainDelta {
    pub opportunity_id: String,
    pub title: String,
    pub before: u8,
    pub after: u8,
}

impl SkillGainDelta {
    pub fn gain(&self) -> u8 {
        self.after.saturating_sub(self.before)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillGainResult {
    pub profile_id: String,
    pub skills_added: Vec<String>,
    pub deltas: Vec<SkillGainDelta>,
    pub average_before: f64,
    pub average_after: f64,
}

impl SkillGainResult {
    pub fn improved(&self) -> impl Iterator<Item = &SkillGainDelta> {
        self.deltas.iter().filter(|d| d.after > d.before)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillGap {
    pub skill: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSummary {
    pub profiles: usize,
    pub opportunities: usize,
    pub pairs_scored: usize,
    pub average_score: f64,
    pub best_score: u8,
    pub bands: BTreeMap<MatchBand, usize>,
    pub domain_averages: BTreeMap<String, f64>,
}
