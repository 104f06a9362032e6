//! Pure mapping of a fetched `Session` into chart-ready report series.
//!
//! No I/O here; the runtime fetches the session and hands it over. All the
//! math is zero-safe: a session with no questions, or questions without
//! answers or feedback, yields empty or zeroed series rather than NaN.

use crate::model::{QualLevel, ScoreTier, Session};

/// Score of one answered question, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePoint {
    /// 1-based question index.
    pub index: usize,
    pub score: u32,
}

/// Response timing of one question, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePoint {
    pub index: usize,
    pub seconds: f64,
    pub edits: u32,
}

/// Radar axes for the skill chart. All values are 0..=100.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAxes {
    pub clarity: f64,
    pub consistency: f64,
    pub logic: f64,
    pub intent: f64,
    pub vocal_stability: f64,
}

/// Per-question score distribution for the pie chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreDistribution {
    /// score > 80
    pub optimal: usize,
    /// 60 < score <= 80
    pub stable: usize,
    /// score <= 60
    pub calibrating: usize,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub session_id: i64,
    pub overall_score: u32,
    pub overall_tier: ScoreTier,
    pub score_trend: Vec<ScorePoint>,
    pub response_times: Vec<ResponsePoint>,
    pub skills: SkillAxes,
    pub distribution: ScoreDistribution,
    pub average_response_secs: f64,
    /// Every red flag the server raised, in question order.
    pub red_flags: Vec<String>,
    pub improvement_plan: Option<serde_json::Value>,
}

impl Report {
    pub fn from_session(session: &Session) -> Self {
        let overall_score = session.score.unwrap_or(0);
        let n = session.questions.len();

        let score_trend = session
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| ScorePoint {
                index: i + 1,
                score: q
                    .answer
                    .as_ref()
                    .and_then(|a| a.feedback.as_ref())
                    .map(|f| f.score)
                    .unwrap_or(0),
            })
            .collect::<Vec<_>>();

        let response_times = session
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let answer = q.answer.as_ref();
                ResponsePoint {
                    index: i + 1,
                    seconds: answer.and_then(|a| a.response_time_ms).unwrap_or(0) as f64 / 1000.0,
                    edits: answer.map(|a| a.edit_count).unwrap_or(0),
                }
            })
            .collect::<Vec<_>>();

        // Clarity and vocal stability average the qualitative metric per
        // question; a non-High (or missing) reading contributes the floor.
        let (clarity, vocal_stability) = if n == 0 {
            (0.0, 0.0)
        } else {
            let mut clarity_sum = 0.0;
            let mut stability_sum = 0.0;
            for q in &session.questions {
                let metrics = q
                    .answer
                    .as_ref()
                    .and_then(|a| a.feedback.as_ref())
                    .and_then(|f| f.metrics.as_ref());
                clarity_sum += match metrics.map(|m| m.clarity) {
                    Some(QualLevel::High) => 100.0,
                    _ => 60.0,
                };
                stability_sum += match metrics.map(|m| m.confidence) {
                    Some(QualLevel::High) => 100.0,
                    _ => 70.0,
                };
            }
            (clarity_sum / n as f64, stability_sum / n as f64)
        };

        let skills = SkillAxes {
            clarity,
            consistency: overall_score as f64,
            logic: overall_score as f64 * 0.9,
            intent: (overall_score as f64).max(70.0),
            vocal_stability,
        };

        let mut distribution = ScoreDistribution::default();
        for point in &score_trend {
            if point.score > 80 {
                distribution.optimal += 1;
            } else if point.score > 60 {
                distribution.stable += 1;
            } else {
                distribution.calibrating += 1;
            }
        }

        let average_response_secs = if n == 0 {
            0.0
        } else {
            response_times.iter().map(|p| p.seconds).sum::<f64>() / n as f64
        };

        let red_flags = session
            .questions
            .iter()
            .filter_map(|q| q.answer.as_ref())
            .filter_map(|a| a.feedback.as_ref())
            .filter_map(|f| f.metrics.as_ref())
            .flat_map(|m| m.red_flags.iter().cloned())
            .collect();

        Report {
            session_id: session.id,
            overall_score,
            overall_tier: ScoreTier::classify(overall_score),
            score_trend,
            response_times,
            skills,
            distribution,
            average_response_secs,
            red_flags,
            improvement_plan: session.improvement_plan.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Answer, Feedback, FeedbackMetrics, Question, SessionStatus,
    };
    use chrono::Utc;

    fn answered_question(id: i64, score: u32, ms: u64, clarity: QualLevel) -> Question {
        Question {
            id,
            text: format!("Q{id}"),
            order: id as u32,
            answer: Some(Answer {
                user_audio_text: "answer".into(),
                response_time_ms: Some(ms),
                edit_count: 1,
                feedback: Some(Feedback {
                    score,
                    feedback: "ok".into(),
                    follow_up: None,
                    metrics: Some(FeedbackMetrics {
                        clarity,
                        confidence: clarity,
                        risk_level: QualLevel::Low,
                        word_count: 10,
                        red_flags: if score <= 60 {
                            vec!["Vague funding source".into()]
                        } else {
                            vec![]
                        },
                        risky_sentences: vec![],
                    }),
                }),
            }),
        }
    }

    fn completed_session(questions: Vec<Question>, score: Option<u32>) -> Session {
        Session {
            id: 9,
            status: SessionStatus::Completed,
            start_time: Utc::now(),
            end_time: Some(Utc::now()),
            total_duration: Some(300),
            score,
            questions,
            improvement_plan: None,
        }
    }

    #[test]
    fn series_follow_question_order() {
        let session = completed_session(
            vec![
                answered_question(1, 90, 4000, QualLevel::High),
                answered_question(2, 55, 12000, QualLevel::Medium),
                answered_question(3, 70, 8000, QualLevel::High),
            ],
            Some(72),
        );
        let report = Report::from_session(&session);

        assert_eq!(
            report.score_trend,
            vec![
                ScorePoint { index: 1, score: 90 },
                ScorePoint { index: 2, score: 55 },
                ScorePoint { index: 3, score: 70 },
            ]
        );
        assert_eq!(report.response_times[1].seconds, 12.0);
        assert_eq!(report.average_response_secs, 8.0);
        assert_eq!(report.distribution.optimal, 1);
        assert_eq!(report.distribution.stable, 1);
        assert_eq!(report.distribution.calibrating, 1);
        assert_eq!(report.red_flags, vec!["Vague funding source".to_string()]);
        assert_eq!(report.overall_tier, ScoreTier::High);
    }

    #[test]
    fn skill_axes_use_overall_score_and_metric_floors() {
        let session = completed_session(
            vec![
                answered_question(1, 80, 5000, QualLevel::High),
                answered_question(2, 80, 5000, QualLevel::Low),
            ],
            Some(80),
        );
        let skills = Report::from_session(&session).skills;
        assert_eq!(skills.clarity, 80.0); // (100 + 60) / 2
        assert_eq!(skills.consistency, 80.0);
        assert_eq!(skills.logic, 72.0);
        assert_eq!(skills.intent, 80.0);
        assert_eq!(skills.vocal_stability, 85.0); // (100 + 70) / 2
    }

    #[test]
    fn low_overall_score_keeps_intent_floor() {
        let session = completed_session(
            vec![answered_question(1, 40, 3000, QualLevel::Medium)],
            Some(40),
        );
        let skills = Report::from_session(&session).skills;
        assert_eq!(skills.intent, 70.0);
    }

    #[test]
    fn empty_session_yields_zeroed_report() {
        let session = completed_session(vec![], None);
        let report = Report::from_session(&session);
        assert!(report.score_trend.is_empty());
        assert!(report.response_times.is_empty());
        assert_eq!(report.average_response_secs, 0.0);
        assert_eq!(report.skills.clarity, 0.0);
        assert_eq!(report.distribution, ScoreDistribution::default());
        assert_eq!(report.overall_tier, ScoreTier::Low);
    }

    #[test]
    fn unanswered_questions_count_as_zero() {
        let mut q = answered_question(1, 90, 4000, QualLevel::High);
        q.answer = None;
        let session = completed_session(vec![q], Some(90));
        let report = Report::from_session(&session);
        assert_eq!(report.score_trend[0].score, 0);
        assert_eq!(report.response_times[0].seconds, 0.0);
        assert_eq!(report.distribution.calibrating, 1);
        // Missing metrics contribute the floor values.
        assert_eq!(report.skills.clarity, 60.0);
        assert_eq!(report.skills.vocal_stability, 70.0);
    }
}
