use chrono::Utc;
use thiserror::Error;

use crate::allocation::{AllocationEntry, AllocationRun, AllocationStatus, AllocationThresholds};
use crate::profile::{Opportunity, Profile};
use crate::scoring::{score_matrix, MatchScorer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("allocation entry not found: {0}")]
    NotFound(String),
    #[error("allocation entry {id} is {status}, only pending entries can be reviewed")]
    NotPending { id: String, status: AllocationStatus },
}

/// Assigns every profile its single best opportunity and a review status.
///
/// Capacity is not tracked: two profiles may land on the same opportunity.
pub fn run_allocation(
    scorer: &MatchScorer,
    profiles: &[Profile],
    opportunities: &[Opportunity],
    thresholds: AllocationThresholds,
) -> AllocationRun {
    let entries = score_matrix(scorer, profiles, opportunities)
        .into_iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let id = format!("allocation-{}", idx + 1);
            match ranked.matches.into_iter().next() {
                Some(best) => AllocationEntry {
                    id,
                    profile_id: ranked.profile_id,
                    name: ranked.name,
                    status: status_for(best.result.score, thresholds),
                    score: best.result.score,
                    opportunity_id: Some(best.opportunity_id),
                    title: Some(best.title),
                    reasons: best.result.reasons,
                },
                None => AllocationEntry {
                    id,
                    profile_id: ranked.profile_id,
                    name: ranked.name,
                    opportunity_id: None,
                    title: None,
                    score: 0,
                    status: AllocationStatus::NotMatched,
                    reasons: Vec::new(),
                },
            }
        })
        .collect::<Vec<_>>();

    let run = AllocationRun {
        created_at: Utc::now(),
        thresholds,
        entries,
    };
    tracing::info!(
        entries = run.entries.len(),
        pending = run.count(AllocationStatus::Pending),
        waitlisted = run.count(AllocationStatus::Waitlisted),
        "allocation run complete"
    );
    run
}

fn status_for(score: u8, thresholds: AllocationThresholds) -> AllocationStatus {
    if score >= thresholds.pending {
        AllocationStatus::Pending
    } else if score >= thresholds.waitlist {
        AllocationStatus::Waitlisted
    } else {
        AllocationStatus::NotMatched
    }
}

impl AllocationRun {
    /// Approves or rejects a pending entry.
    pub fn review(&mut self, id: &str, approve: bool) -> Result<&AllocationEntry, ReviewError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ReviewError::NotFound(id.to_string()))?;
        if entry.status != AllocationStatus::Pending {
            return Err(ReviewError::NotPending {
                id: id.to_string(),
                status: entry.status,
            });
        }
        entry.status = if approve {
            AllocationStatus::Approved
        } else {
            AllocationStatus::Rejected
        };
        Ok(entry)
    }
}
