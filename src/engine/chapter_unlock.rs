use crate::engine::catalog::{ALL_CHAPTERS, ChapterStates, compute_progress};
use crate::engine::word::WordStore;

pub const DEFAULT_UNLOCK_RATIO: f64 = 0.8;

/// Unlock each locked chapter whose predecessor is unlocked and at least
/// `ratio` mastered. Never locks anything. Returns newly unlocked ids in order.
pub fn evaluate_unlocks(states: &mut ChapterStates, words: &WordStore, ratio: f64) -> Vec<u32> {
    let mut unlocked = Vec::new();
    for pair in ALL_CHAPTERS.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if !states.is_unlocked(current.id) || states.is_unlocked(next.id) {
            continue;
        }
        let progress = compute_progress(words, current.id);
        if progress.total > 0
            && progress.mastered_ratio() >= ratio
            && states.unlock(next.id)
        {
            unlocked.push(next.id);
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::{ALL_CHAPTERS, get_chapter, seed_words};
    use crate::engine::word::{WordState, normalize_text};

    fn master_in_chapter(words: &mut WordStore, chapter: u32, count: usize) {
        let def = get_chapter(chapter).unwrap();
        for raw in def.words.iter().take(count) {
            words.upsert_by_text(&normalize_text(raw), |w| w.state = WordState::Mastered);
        }
    }

    #[test]
    fn test_eighty_percent_unlocks_next() {
        let mut words = WordStore::new(seed_words());
        master_in_chapter(&mut words, 1, 8);
        let mut states = ChapterStates::default();
        assert_eq!(evaluate_unlocks(&mut states, &words, DEFAULT_UNLOCK_RATIO), vec![2]);
        assert!(states.is_unlocked(2));
    }

    #[test]
    fn test_seventy_percent_stays_locked() {
        let mut words = WordStore::new(seed_words());
        master_in_chapter(&mut words, 1, 7);
        let mut states = ChapterStates::default();
        assert!(evaluate_unlocks(&mut states, &words, DEFAULT_UNLOCK_RATIO).is_empty());
        assert!(!states.is_unlocked(2));
    }

    #[test]
    fn test_empty_chapter_never_unlocks_successor() {
        let words = WordStore::default();
        let mut states = ChapterStates::default();
        assert!(evaluate_unlocks(&mut states, &words, 0.0).is_empty());
    }

    #[test]
    fn test_locked_predecessor_blocks_unlock() {
        let mut words = WordStore::new(seed_words());
        master_in_chapter(&mut words, 2, 10);
        let mut states = ChapterStates::default();
        states.toggle(1);
        assert!(evaluate_unlocks(&mut states, &words, DEFAULT_UNLOCK_RATIO).is_empty());
        assert!(!states.is_unlocked(3));
    }

    #[test]
    fn test_cascades_through_mastered_chapters() {
        let mut words = WordStore::new(seed_words());
        master_in_chapter(&mut words, 1, 10);
        master_in_chapter(&mut words, 2, 10);
        let mut states = ChapterStates::default();
        assert_eq!(evaluate_unlocks(&mut states, &words, DEFAULT_UNLOCK_RATIO), vec![2, 3]);
    }

    #[test]
    fn test_never_relocks() {
        let words = WordStore::new(seed_words());
        let mut states = ChapterStates::default();
        states.toggle(ALL_CHAPTERS.len() as u32);
        evaluate_unlocks(&mut states, &words, DEFAULT_UNLOCK_RATIO);
        assert!(states.is_unlocked(ALL_CHAPTERS.len() as u32));
    }

    #[test]
    fn test_disabled_words_count_against_ratio() {
        let mut words = WordStore::new(seed_words());
        master_in_chapter(&mut words, 1, 7);
        words.upsert_by_text("it", |w| w.state = WordState::Disabled);
        words.upsert_by_text("you", |w| w.state = WordState::Disabled);
        let mut states = ChapterStates::default();
        // 7 mastered of 10 total, the disabled pair still counts toward total
        assert!(evaluate_unlocks(&mut states, &words, DEFAULT_UNLOCK_RATIO).is_empty());
    }
}
