//! Text panels for the terminal. Pure formatting; printing happens at the
//! call site.

use neurovisa_core::dashboard::DashboardSummary;
use neurovisa_core::model::{Feedback, ScoreTier, Session, SessionStatus};
use neurovisa_core::report::Report;

pub fn tier_label(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::High => "strong",
        ScoreTier::Medium => "borderline",
        ScoreTier::Low => "at risk",
    }
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::InProgress => "in progress",
        SessionStatus::Completed => "completed",
        SessionStatus::EndedByUser => "ended early",
        SessionStatus::Interrupted => "interrupted",
    }
}

pub fn feedback_panel(feedback: &Feedback) -> String {
    let mut out = String::new();
    let tier = ScoreTier::classify(feedback.score);
    out.push_str(&format!(
        "--- Feedback: {} ({}) ---\n",
        feedback.score,
        tier_label(tier)
    ));
    out.push_str(&feedback.feedback);
    out.push('\n');
    if let Some(metrics) = &feedback.metrics {
        out.push_str(&format!(
            "clarity: {:?}  confidence: {:?}  risk: {:?}  words: {}\n",
            metrics.clarity, metrics.confidence, metrics.risk_level, metrics.word_count
        ));
        for flag in &metrics.red_flags {
            out.push_str(&format!("  ! {flag}\n"));
        }
    }
    if feedback.follow_up.is_some() {
        out.push_str("A follow-up question is coming. Type /next to continue.\n");
    } else {
        out.push_str("Type /next to continue.\n");
    }
    out
}

pub fn report_panel(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Session {} report: {} ({}) ===\n",
        report.session_id,
        report.overall_score,
        tier_label(report.overall_tier)
    ));
    out.push_str("score per question:");
    for point in &report.score_trend {
        out.push_str(&format!(" [{}] {}", point.index, point.score));
    }
    out.push('\n');
    out.push_str("response seconds (edits):");
    for point in &report.response_times {
        out.push_str(&format!(" [{}] {:.1} ({})", point.index, point.seconds, point.edits));
    }
    out.push('\n');
    out.push_str(&format!(
        "avg response: {:.1}s\n",
        report.average_response_secs
    ));
    let s = &report.skills;
    out.push_str(&format!(
        "skills: clarity {:.0}, consistency {:.0}, logic {:.0}, intent {:.0}, vocal stability {:.0}\n",
        s.clarity, s.consistency, s.logic, s.intent, s.vocal_stability
    ));
    let d = &report.distribution;
    out.push_str(&format!(
        "distribution: optimal {}, stable {}, calibrating {}\n",
        d.optimal, d.stable, d.calibrating
    ));
    if !report.red_flags.is_empty() {
        out.push_str("red flags:\n");
        for flag in &report.red_flags {
            out.push_str(&format!("  ! {flag}\n"));
        }
    }
    if let Some(plan) = &report.improvement_plan {
        out.push_str(&format!("improvement plan: {plan}\n"));
    }
    out
}

pub fn sessions_panel(sessions: &[Session], summary: &DashboardSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "completed: {}  avg score: {}  readiness: {}%\n",
        summary.completed_count, summary.average_score, summary.readiness
    ));
    if let Some(id) = summary.resumable {
        out.push_str(&format!("session {id} is in progress; resume with `neurovisa resume {id}`\n"));
    }
    for session in sessions {
        out.push_str(&format!(
            "  #{} {} {}",
            session.id,
            session.start_time.format("%Y-%m-%d %H:%M"),
            status_label(session.status)
        ));
        if let Some(score) = session.score {
            out.push_str(&format!(" score {score}"));
        }
        out.push('\n');
    }
    out
}
