use chrono::{DateTime, Utc};

use crate::engine::challenge_deck::ChallengeDeck;
use crate::engine::word::{WordState, WordStore};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponseRules {
    pub points_per_word: u32,
    /// Lifetime correct answers needed for Mastered.
    pub mastery_threshold: u32,
    /// Misses within one session that put a word in the challenge deck.
    pub challenge_threshold: u32,
    /// A Mastered word is demoted on a miss once lifetime misses exceed this.
    pub demotion_miss_threshold: u32,
}

impl Default for ResponseRules {
    fn default() -> Self {
        Self {
            points_per_word: 10,
            mastery_threshold: 5,
            challenge_threshold: 2,
            demotion_miss_threshold: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub text: String,
    pub correct: bool,
    pub previous_state: WordState,
    pub state: WordState,
    pub added_to_challenge: bool,
    pub removed_from_challenge: bool,
}

impl ResponseOutcome {
    pub fn became_mastered(&self) -> bool {
        self.state == WordState::Mastered && self.previous_state != WordState::Mastered
    }

    pub fn was_demoted(&self) -> bool {
        self.previous_state == WordState::Mastered && self.state == WordState::Learning
    }
}

/// Grade the session's current word. Does not move the cursor.
///
/// Returns `None` when the session is exhausted or the word no longer exists
/// in the store; nothing is mutated in either case.
pub fn handle_response(
    session: &mut Session,
    words: &mut WordStore,
    deck: &mut ChallengeDeck,
    correct: bool,
    rules: &ResponseRules,
    now: DateTime<Utc>,
) -> Option<ResponseOutcome> {
    let text = session.current_word()?.to_string();
    let mut word = words.get(&text)?.clone();
    let previous_state = word.state;
    let mut added_to_challenge = false;
    let mut removed_from_challenge = false;

    if correct {
        word.correct_count += 1;
        session.correct_count += 1;
        session.streak += 1;
        session.points += rules.points_per_word;

        if word.correct_count >= rules.mastery_threshold && word.state != WordState::Mastered {
            word.state = WordState::Mastered;
            removed_from_challenge = deck.remove(&word.text);
        } else if word.state == WordState::New {
            word.state = WordState::Learning;
        }
    } else {
        word.missed_count += 1;
        word.session_misses += 1;
        session.missed_count += 1;
        session.streak = 0;

        if word.session_misses >= rules.challenge_threshold {
            added_to_challenge = deck.add(&word.text);
        }
        if word.state == WordState::Mastered && word.missed_count > rules.demotion_miss_threshold
        {
            word.state = WordState::Learning;
        }
    }

    word.last_practiced = Some(now);
    let state = word.state;
    words.upsert_by_text(&text, |w| *w = word);

    Some(ResponseOutcome {
        text,
        correct,
        previous_state,
        state,
        added_to_challenge,
        removed_from_challenge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::word::Word;

    fn setup(word: Word) -> (Session, WordStore, ChallengeDeck) {
        let session = Session::new(vec![word.text.clone()]);
        (session, WordStore::new(vec![word]), ChallengeDeck::default())
    }

    fn respond(
        s: &mut Session,
        w: &mut WordStore,
        d: &mut ChallengeDeck,
        correct: bool,
    ) -> Option<ResponseOutcome> {
        handle_response(s, w, d, correct, &ResponseRules::default(), Utc::now())
    }

    #[test]
    fn test_fifth_correct_masters_and_leaves_deck() {
        let mut the = Word::new("the", Some(1));
        the.correct_count = 4;
        the.state = WordState::Learning;
        let (mut s, mut w, mut d) = setup(the);
        d.add("the");

        let out = respond(&mut s, &mut w, &mut d, true).unwrap();
        let word = w.get("the").unwrap();
        assert_eq!(word.correct_count, 5);
        assert_eq!(word.state, WordState::Mastered);
        assert!(out.became_mastered());
        assert!(out.removed_from_challenge);
        assert!(!d.contains("the"));
    }

    #[test]
    fn test_correct_updates_session_tallies() {
        let (mut s, mut w, mut d) = setup(Word::new("go", Some(2)));
        respond(&mut s, &mut w, &mut d, true);
        assert_eq!(s.correct_count, 1);
        assert_eq!(s.streak, 1);
        assert_eq!(s.points, 10);
        // Grading never moves the cursor
        assert_eq!(s.current_index, 0);
    }

    #[test]
    fn test_new_word_promotes_to_learning() {
        let (mut s, mut w, mut d) = setup(Word::new("go", Some(2)));
        let out = respond(&mut s, &mut w, &mut d, true).unwrap();
        assert_eq!(out.previous_state, WordState::New);
        assert_eq!(out.state, WordState::Learning);
    }

    #[test]
    fn test_new_word_with_prior_tallies_masters_directly() {
        let mut word = Word::new("go", Some(2));
        word.correct_count = 7;
        let (mut s, mut w, mut d) = setup(word);
        let out = respond(&mut s, &mut w, &mut d, true).unwrap();
        assert_eq!(out.state, WordState::Mastered);
    }

    #[test]
    fn test_second_session_miss_adds_to_deck() {
        let mut cat = Word::new("cat", None);
        cat.session_misses = 1;
        let (mut s, mut w, mut d) = setup(cat);
        let out = respond(&mut s, &mut w, &mut d, false).unwrap();
        assert_eq!(w.get("cat").unwrap().session_misses, 2);
        assert!(out.added_to_challenge);
        assert!(d.contains("cat"));
    }

    #[test]
    fn test_single_miss_does_not_add_to_deck() {
        let (mut s, mut w, mut d) = setup(Word::new("cat", None));
        respond(&mut s, &mut w, &mut d, false);
        assert!(d.is_empty());
        assert_eq!(s.missed_count, 1);
        assert_eq!(s.streak, 0);
    }

    #[test]
    fn test_miss_resets_streak() {
        let mut s = Session::new(vec!["a".into()]);
        s.streak = 4;
        let mut w = WordStore::new(vec![Word::new("a", Some(1))]);
        let mut d = ChallengeDeck::default();
        respond(&mut s, &mut w, &mut d, false);
        assert_eq!(s.streak, 0);
    }

    #[test]
    fn test_mastered_demotes_after_third_lifetime_miss() {
        let mut word = Word::new("was", Some(3));
        word.state = WordState::Mastered;
        word.correct_count = 6;
        word.missed_count = 2;
        let (mut s, mut w, mut d) = setup(word);
        let out = respond(&mut s, &mut w, &mut d, false).unwrap();
        assert!(out.was_demoted());
        assert_eq!(w.get("was").unwrap().missed_count, 3);
    }

    #[test]
    fn test_mastered_survives_early_misses() {
        let mut word = Word::new("was", Some(3));
        word.state = WordState::Mastered;
        word.missed_count = 1;
        let (mut s, mut w, mut d) = setup(word);
        let out = respond(&mut s, &mut w, &mut d, false).unwrap();
        assert_eq!(out.state, WordState::Mastered);
    }

    #[test]
    fn test_learning_word_is_never_demoted_further() {
        let mut word = Word::new("on", Some(3));
        word.state = WordState::Learning;
        word.missed_count = 10;
        let (mut s, mut w, mut d) = setup(word);
        let out = respond(&mut s, &mut w, &mut d, false).unwrap();
        assert_eq!(out.state, WordState::Learning);
    }

    #[test]
    fn test_correct_on_mastered_word_keeps_state() {
        let mut word = Word::new("the", Some(1));
        word.state = WordState::Mastered;
        word.correct_count = 9;
        let (mut s, mut w, mut d) = setup(word);
        let out = respond(&mut s, &mut w, &mut d, true).unwrap();
        assert_eq!(out.state, WordState::Mastered);
        assert!(!out.became_mastered());
    }

    #[test]
    fn test_stamps_last_practiced() {
        let (mut s, mut w, mut d) = setup(Word::new("the", Some(1)));
        let now = Utc::now();
        handle_response(&mut s, &mut w, &mut d, true, &ResponseRules::default(), now);
        assert_eq!(w.get("the").unwrap().last_practiced, Some(now));
    }

    #[test]
    fn test_unknown_word_is_silent_noop() {
        let mut s = Session::new(vec!["gone".into()]);
        let mut w = WordStore::new(vec![Word::new("the", Some(1))]);
        let mut d = ChallengeDeck::default();
        let before = w.clone();
        assert!(respond(&mut s, &mut w, &mut d, true).is_none());
        assert_eq!(w, before);
        assert_eq!(s.correct_count, 0);
    }

    #[test]
    fn test_completed_session_is_noop() {
        let (mut s, mut w, mut d) = setup(Word::new("the", Some(1)));
        s.advance();
        assert!(respond(&mut s, &mut w, &mut d, true).is_none());
    }
}
