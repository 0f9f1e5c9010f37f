use chrono::{DateTime, Utc};
use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordState {
    New,
    Learning,
    Mastered,
    Disabled,
}

impl WordState {
    pub fn as_str(self) -> &'static str {
        match self {
            WordState::New => "new",
            WordState::Learning => "learning",
            WordState::Mastered => "mastered",
            WordState::Disabled => "disabled",
        }
    }

    pub fn all() -> &'static [WordState] {
        &[
            WordState::New,
            WordState::Learning,
            WordState::Mastered,
            WordState::Disabled,
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,
    pub state: WordState,
    pub correct_count: u32,
    pub missed_count: u32,
    pub session_misses: u32,
    pub last_practiced: Option<DateTime<Utc>>,
    pub chapter_id: Option<u32>,
}

impl Word {
    /// A fresh word. `text` is expected to be normalized already.
    pub fn new(text: impl Into<String>, chapter_id: Option<u32>) -> Self {
        Self {
            text: text.into(),
            state: WordState::New,
            correct_count: 0,
            missed_count: 0,
            session_misses: 0,
            last_practiced: None,
            chapter_id,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.chapter_id.is_none()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordError {
    #[error("the word \"{0}\" already exists")]
    DuplicateWord(String),
    #[error("a word cannot be empty")]
    EmptyWord,
}

/// Canonical identity of a word: NFC, trimmed, lowercased.
pub fn normalize_text(raw: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc().normalize(raw.trim());
    nfc.to_lowercase()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordStore {
    words: Vec<Word>,
}

impl WordStore {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn list(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn replace_all(&mut self, words: Vec<Word>) {
        self.words = words;
    }

    fn position(&self, text: &str) -> Option<usize> {
        let key = normalize_text(text);
        self.words.iter().position(|w| w.text == key)
    }

    pub fn get(&self, text: &str) -> Option<&Word> {
        self.position(text).map(|i| &self.words[i])
    }

    pub fn contains(&self, text: &str) -> bool {
        self.position(text).is_some()
    }

    /// Apply `mutator` to the word keyed by `text`. Returns false (and does
    /// nothing) when no such word exists.
    pub fn upsert_by_text<F>(&mut self, text: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut Word),
    {
        match self.position(text) {
            Some(i) => {
                mutator(&mut self.words[i]);
                true
            }
            None => false,
        }
    }

    pub fn add(&mut self, raw: &str, chapter_id: Option<u32>) -> Result<&Word, WordError> {
        let text = normalize_text(raw);
        if text.is_empty() {
            return Err(WordError::EmptyWord);
        }
        if self.words.iter().any(|w| w.text == text) {
            return Err(WordError::DuplicateWord(text));
        }
        self.words.push(Word::new(text, chapter_id));
        Ok(&self.words[self.words.len() - 1])
    }

    /// Flip between Disabled and Learning. Returns the new state.
    pub fn toggle_disabled(&mut self, text: &str) -> Option<WordState> {
        let i = self.position(text)?;
        let word = &mut self.words[i];
        word.state = if word.state == WordState::Disabled {
            WordState::Learning
        } else {
            WordState::Disabled
        };
        Some(word.state)
    }

    pub fn filter_by_state(&self, state: Option<WordState>) -> Vec<&Word> {
        self.words
            .iter()
            .filter(|w| state.is_none_or(|s| w.state == s))
            .collect()
    }

    pub fn count_in_state(&self, state: WordState) -> usize {
        self.words.iter().filter(|w| w.state == state).count()
    }
}
