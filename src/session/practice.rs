/// A single practice run. Holds word identifiers only; the live records stay
/// in the word store and are re-fetched on every response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub words: Vec<String>,
    pub current_index: usize,
    pub correct_count: u32,
    pub missed_count: u32,
    pub streak: u32,
    pub points: u32,
    pub(crate) finalized: bool,
}

impl Session {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current_index).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.words.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Move the cursor by one. Returns true when this step exhausted the session.
    pub fn advance(&mut self) -> bool {
        if self.current_index < self.words.len() {
            self.current_index += 1;
        }
        self.is_complete()
    }

    /// 1-based position for display ("Word 3 of 10").
    pub fn position(&self) -> usize {
        (self.current_index + 1).min(self.words.len())
    }

    pub fn progress(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.current_index as f64 / self.words.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(words: &[&str]) -> Session {
        Session::new(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_new_session_starts_at_zero() {
        let s = session(&["the", "and"]);
        assert_eq!(s.current_index, 0);
        assert_eq!(s.current_word(), Some("the"));
        assert_eq!(s.points, 0);
        assert!(!s.is_complete());
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_advance_until_complete() {
        let mut s = session(&["the", "and"]);
        assert!(!s.advance());
        assert_eq!(s.current_word(), Some("and"));
        assert!(s.advance());
        assert!(s.current_word().is_none());
        // Further advances stay clamped at the end
        assert!(s.advance());
        assert_eq!(s.current_index, 2);
    }

    #[test]
    fn test_empty_session_is_complete() {
        let s = Session::new(Vec::new());
        assert!(s.is_complete());
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_progress_ratio() {
        let mut s = session(&["a", "b", "c", "d"]);
        s.advance();
        assert!((s.progress() - 0.25).abs() < f64::EPSILON);
    }
}
