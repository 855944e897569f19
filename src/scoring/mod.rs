pub mod ranking;
pub mod scorer;
pub mod weights;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use ranking::{
    rank_candidates, rank_opportunities, score_matrix, ProfileMatches, RankedCandidate,
    RankedMatch,
};
pub use scorer::{score, MatchScorer};
pub use weights::{MatchWeights, NormalizedWeights, WeightPreset};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub score: u8,
    pub reasons: Vec<String>,
    pub breakdown: Vec<SubScore>,
    pub missing_skills: Vec<String>,
}

impl MatchResult {
    pub fn band(&self) -> MatchBand {
        MatchBand::from_score(self.score)
    }

    pub fn sub_score(&self, criterion: Criterion) -> Option<&SubScore> {
        self.breakdown.iter().find(|s| s.criterion == criterion)
    }

    pub fn points_for(&self, criterion: Criterion) -> f64 {
        self.sub_score(criterion).map(|s| s.points).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubScore {
    pub criterion: Criterion,
    pub points: f64,
    pub max_points: f64,
}

impl SubScore {
    pub fn is_full(&self) -> bool {
        self.max_points > 0.0 && (self.max_points - self.points).abs() < 1e-9
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Skills,
    Academic,
    Location,
    Domain,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Skills,
        Criterion::Academic,
        Criterion::Location,
        Criterion::Domain,
    ];
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Skills => "skills",
            Self::Academic => "academic",
            Self::Location => "location",
            Self::Domain => "domain",
        };
        write!(f, "{label}")
    }
}

/// Dashboard colour buckets for a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchBand {
    pub const ALL: [MatchBand; 4] = [
        MatchBand::Excellent,
        MatchBand::Good,
        MatchBand::Fair,
        MatchBand::Poor,
    ];

    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl Display for MatchBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        write!(f, "{label}")
    }
}
