use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Lifetime totals, updated only when a session completes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_sessions: u32,
    pub total_points: u64,
    pub total_words_correct: u64,
    pub total_words_missed: u64,
}

impl Stats {
    pub fn record(&mut self, session: &Session) {
        self.total_sessions += 1;
        self.total_words_correct += u64::from(session.correct_count);
        self.total_words_missed += u64::from(session.missed_count);
        self.total_points += u64::from(session.points);
    }

    pub fn accuracy(&self) -> f64 {
        let attempts = self.total_words_correct + self.total_words_missed;
        if attempts == 0 {
            return 0.0;
        }
        self.total_words_correct as f64 / attempts as f64 * 100.0
    }

    /// Plain-text totals for the `stats` subcommand.
    pub fn report(&self, challenge_words: usize) -> String {
        format!(
            "Sessions:        {}\n\
             Points:          {}\n\
             Words correct:   {}\n\
             Words missed:    {}\n\
             Accuracy:        {:.1}%\n\
             Challenge deck:  {}",
            self.total_sessions,
            self.total_points,
            self.total_words_correct,
            self.total_words_missed,
            self.accuracy(),
            challenge_words
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_folds_session_tallies() {
        let mut stats = Stats::default();
        let mut session = Session::new(vec!["a".into(), "b".into()]);
        session.correct_count = 3;
        session.missed_count = 1;
        session.points = 30;
        stats.record(&session);
        stats.record(&session);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_words_correct, 6);
        assert_eq!(stats.total_words_missed, 2);
        assert_eq!(stats.total_points, 60);
        assert!((stats.accuracy() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_without_attempts() {
        assert_eq!(Stats::default().accuracy(), 0.0);
    }

    #[test]
    fn test_report_prints_accuracy_as_percent() {
        let stats = Stats {
            total_sessions: 1,
            total_points: 30,
            total_words_correct: 3,
            total_words_missed: 1,
        };
        let report = stats.report(2);
        assert!(report.contains("Accuracy:        75.0%"), "{report}");
        assert!(report.contains("Challenge deck:  2"));
        assert_eq!(report.lines().count(), 6);
        assert!(Stats::default().report(0).contains("Accuracy:        0.0%"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&Stats::default()).unwrap();
        assert!(json.contains("totalSessions"));
        assert!(json.contains("totalWordsMissed"));
    }
}
