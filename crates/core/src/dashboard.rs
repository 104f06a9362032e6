//! Dashboard summary folded from the `my-sessions` list.

use crate::model::{Session, SessionStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub completed_count: usize,
    /// Rounded average score over completed sessions only.
    pub average_score: u32,
    /// 0..=96 readiness figure derived from the average and the volume of
    /// completed practice.
    pub readiness: u32,
    /// Most recent in-progress session, resumable from the dashboard.
    pub resumable: Option<i64>,
}

impl DashboardSummary {
    /// `sessions` is expected newest first, as the server returns it.
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let completed: Vec<&Session> = sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .collect();
        let completed_count = completed.len();

        let average_score = if completed_count == 0 {
            0
        } else {
            let total: u64 = completed.iter().map(|s| s.score.unwrap_or(0) as u64).sum();
            (total as f64 / completed_count as f64).round() as u32
        };

        let readiness = if completed_count == 0 {
            // Baseline before any completed practice.
            10
        } else {
            let raw = (average_score as f64 * 0.8 + completed_count as f64 * 2.0).round() as u32;
            raw.min(96)
        };

        let resumable = sessions
            .iter()
            .find(|s| s.status == SessionStatus::InProgress)
            .map(|s| s.id);

        DashboardSummary {
            completed_count,
            average_score,
            readiness,
            resumable,
        }
    }
}
