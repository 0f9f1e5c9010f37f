use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::challenge_deck::ChallengeDeck;
use crate::engine::word::{Word, WordState, WordStore};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub session_size: usize,
    pub challenge_slice_limit: usize,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            session_size: 10,
            challenge_slice_limit: 5,
        }
    }
}

/// Enabled words whose chapter is unlocked. Custom words are always eligible.
pub fn eligible_pool<'a>(words: &'a WordStore, unlocked: &BTreeSet<u32>) -> Vec<&'a Word> {
    words
        .list()
        .iter()
        .filter(|w| w.state != WordState::Disabled)
        .filter(|w| w.chapter_id.is_none_or(|id| unlocked.contains(&id)))
        .collect()
}

/// Assemble a new session: challenge-deck words first (in store order, up to
/// the slice limit), then the shuffled remainder. Every chosen word has its
/// `session_misses` reset in the store before the session is returned.
pub fn build_session<R: Rng + ?Sized>(
    words: &mut WordStore,
    unlocked: &BTreeSet<u32>,
    deck: &ChallengeDeck,
    params: SessionParams,
    rng: &mut R,
) -> Session {
    let pool = eligible_pool(words, unlocked);
    let (challenge, other): (Vec<&Word>, Vec<&Word>) =
        pool.into_iter().partition(|w| deck.contains(&w.text));

    let slice = params
        .challenge_slice_limit
        .min(challenge.len())
        .min(params.session_size);
    let mut chosen: Vec<String> = challenge[..slice].iter().map(|w| w.text.clone()).collect();

    // Tiered Learning > New > Mastered, then shuffled as a whole. The shuffle
    // spans every tier, so the tiering does not bias which words are drawn.
    let mut rest: Vec<&Word> = Vec::with_capacity(other.len());
    for tier in [WordState::Learning, WordState::New, WordState::Mastered] {
        rest.extend(other.iter().copied().filter(|w| w.state == tier));
    }
    rest.shuffle(rng);

    let remaining_slots = params.session_size.saturating_sub(chosen.len());
    chosen.extend(rest.into_iter().take(remaining_slots).map(|w| w.text.clone()));

    for text in &chosen {
        words.upsert_by_text(text, |w| w.session_misses = 0);
    }

    Session::new(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::seed_words;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn unlocked(ids: &[u32]) -> BTreeSet<u32> {
        ids.iter().copied().collect()
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    /// Default params and a fresh seeded rng.
    fn build(words: &mut WordStore, chapters: &[u32], deck: &ChallengeDeck) -> Session {
        build_session(words, &unlocked(chapters), deck, SessionParams::default(), &mut rng())
    }

    #[test]
    fn test_only_unlocked_and_enabled_words_are_eligible() {
        let mut words = WordStore::new(seed_words());
        words.upsert_by_text("the", |w| w.state = WordState::Disabled);
        words.add("cat", None).unwrap();
        let pool = eligible_pool(&words, &unlocked(&[1]));
        let texts: Vec<&str> = pool.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts.len(), 10);
        assert!(!texts.contains(&"the"));
        assert!(texts.contains(&"cat"));
        assert!(pool.iter().all(|w| w.chapter_id.is_none_or(|id| id == 1)));
    }

    #[test]
    fn test_length_is_min_of_size_and_pool() {
        let mut words = WordStore::new(seed_words());
        let deck = ChallengeDeck::default();
        let s = build(&mut words, &[1, 2], &deck);
        assert_eq!(s.len(), 10);

        let params = SessionParams {
            session_size: 25,
            challenge_slice_limit: 5,
        };
        let s = build_session(&mut words, &unlocked(&[1, 2]), &deck, params, &mut rng());
        assert_eq!(s.len(), 20);
    }

    #[test]
    fn test_session_words_are_distinct() {
        let mut words = WordStore::new(seed_words());
        let deck = ChallengeDeck::from_members(vec!["the".into(), "and".into()]);
        let s = build(&mut words, &[1, 2, 3], &deck);
        let unique: BTreeSet<&String> = s.words.iter().collect();
        assert_eq!(unique.len(), s.len());
    }

    #[test]
    fn test_challenge_words_come_first_in_store_order() {
        let mut words = WordStore::new(seed_words());
        // Deck order differs from store order; store order wins
        let deck = ChallengeDeck::from_members(vec!["it".into(), "the".into(), "to".into()]);
        let s = build(&mut words, &[1, 2], &deck);
        assert_eq!(&s.words[..3], &["the", "to", "it"]);
        assert!(s.words[3..].iter().all(|w| !deck.contains(w)));
    }

    #[test]
    fn test_challenge_slice_is_capped() {
        let mut words = WordStore::new(seed_words());
        let deck = ChallengeDeck::from_members(
            ["the", "and", "a", "to", "in", "i", "is"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let s = build(&mut words, &[1, 2], &deck);
        let challenge_in_session = s.words.iter().filter(|w| deck.contains(w)).count();
        assert_eq!(challenge_in_session, 5);
        assert!(s.words[..5].iter().all(|w| deck.contains(w)));
    }

    #[test]
    fn test_locked_deck_words_are_skipped() {
        let mut words = WordStore::new(seed_words());
        let deck = ChallengeDeck::from_members(vec!["go".into()]);
        let s = build(&mut words, &[1], &deck);
        assert!(!s.words.contains(&"go".to_string()));
    }

    #[test]
    fn test_session_misses_reset_for_chosen_words() {
        let mut words = WordStore::new(seed_words());
        for w in ["the", "and", "a"] {
            words.upsert_by_text(w, |w| {
                w.session_misses = 4;
                w.missed_count = 9;
            });
        }
        let s = build(&mut words, &[1], &ChallengeDeck::default());
        for text in &s.words {
            let w = words.get(text).unwrap();
            assert_eq!(w.session_misses, 0);
        }
        // Lifetime counters are untouched
        assert_eq!(words.get("the").unwrap().missed_count, 9);
    }

    #[test]
    fn test_words_outside_session_keep_session_misses() {
        let mut words = WordStore::new(seed_words());
        words.upsert_by_text("go", |w| w.session_misses = 3);
        build(&mut words, &[1], &ChallengeDeck::default());
        assert_eq!(words.get("go").unwrap().session_misses, 3);
    }

    #[test]
    fn test_empty_pool_yields_empty_session() {
        let mut words = WordStore::default();
        let s = build(&mut words, &[1], &ChallengeDeck::default());
        assert!(s.is_empty());
        assert!(s.is_complete());
    }

    #[test]
    fn test_state_tiering_does_not_bias_selection() {
        // 10 Learning + 10 Mastered competing for 10 slots. If the tier order
        // survived the shuffle no Mastered word could ever be picked.
        let mut list = Vec::new();
        for i in 0..10 {
            let mut w = Word::new(format!("learn{i}"), None);
            w.state = WordState::Learning;
            list.push(w);
            let mut m = Word::new(format!("master{i}"), None);
            m.state = WordState::Mastered;
            list.push(m);
        }
        let mut words = WordStore::new(list);
        let mut rng = rng();
        let mut saw_mastered = false;
        for _ in 0..5 {
            let s = build_session(
                &mut words,
                &BTreeSet::new(),
                &ChallengeDeck::default(),
                SessionParams::default(),
                &mut rng,
            );
            saw_mastered |= s.words.iter().any(|w| w.starts_with("master"));
        }
        assert!(saw_mastered);
    }

    #[test]
    fn test_same_seed_same_session() {
        let deck = ChallengeDeck::default();
        let mut a = WordStore::new(seed_words());
        let mut b = WordStore::new(seed_words());
        let sa = build(&mut a, &[1, 2, 3], &deck);
        let sb = build(&mut b, &[1, 2, 3], &deck);
        assert_eq!(sa.words, sb.words);
    }
}
