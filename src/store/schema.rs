use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::catalog::{ChapterStates, chapter_for_word, seed_words};
use crate::engine::challenge_deck::ChallengeDeck;
use crate::engine::stats::Stats;
use crate::engine::word::{Word, WordState, normalize_text};
use crate::store::{KvStore, StoreError};

pub const WORDS_KEY: &str = "words";
pub const STATS_KEY: &str = "stats";
pub const CHALLENGE_DECK_KEY: &str = "challengeDeck";
pub const CHAPTER_STATES_KEY: &str = "chapterStates";

pub const ALL_KEYS: &[&str] = &[WORDS_KEY, STATS_KEY, CHALLENGE_DECK_KEY, CHAPTER_STATES_KEY];

/// Read and decode a record. Unparseable data is logged and reported as absent.
pub fn load<T, K>(kv: &K, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    K: KvStore + ?Sized,
{
    let Some(raw) = kv.read(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(key, %err, "stored record could not be parsed, using defaults");
            Ok(None)
        }
    }
}

pub fn save<T, K>(kv: &mut K, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    K: KvStore + ?Sized,
{
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    kv.write(key, &json)
}

// --- Words & migration ---

/// On-disk word shape. `chapter_id` distinguishes a missing field (needs
/// migration) from an explicit null (custom word).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWord {
    text: String,
    #[serde(default = "default_state")]
    state: WordState,
    #[serde(default)]
    correct_count: u32,
    #[serde(default)]
    missed_count: u32,
    #[serde(default)]
    session_misses: u32,
    #[serde(default)]
    last_practiced: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "present")]
    chapter_id: Option<Option<u32>>,
}

fn default_state() -> WordState {
    WordState::New
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Some)
}

pub struct LoadedWords {
    pub words: Vec<Word>,
    /// True when the result differs from what is stored and should be re-persisted.
    pub needs_save: bool,
}

fn migrate_words(stored: Vec<StoredWord>) -> LoadedWords {
    let mut needs_save = false;
    let mut seen = HashSet::new();
    let mut words = Vec::with_capacity(stored.len());

    for sw in stored {
        let text = normalize_text(&sw.text);
        if text != sw.text {
            needs_save = true;
        }
        if text.is_empty() || !seen.insert(text.clone()) {
            needs_save = true;
            continue;
        }
        let chapter_id = match sw.chapter_id {
            Some(id) => id,
            None => {
                needs_save = true;
                chapter_for_word(&text)
            }
        };
        words.push(Word {
            text,
            state: sw.state,
            correct_count: sw.correct_count,
            missed_count: sw.missed_count,
            session_misses: sw.session_misses,
            last_practiced: sw.last_practiced,
            chapter_id,
        });
    }

    LoadedWords { words, needs_save }
}

pub fn load_words<K: KvStore + ?Sized>(kv: &K) -> Result<LoadedWords, StoreError> {
    match load::<Vec<StoredWord>, _>(kv, WORDS_KEY)? {
        Some(stored) => Ok(migrate_words(stored)),
        None => Ok(LoadedWords {
            words: seed_words(),
            needs_save: true,
        }),
    }
}

// --- Export ---

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub sightwords_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub words: Vec<Word>,
    pub stats: Stats,
    pub challenge_deck: ChallengeDeck,
    pub chapter_states: ChapterStates,
}

impl ExportData {
    /// Serialized payload per store key, in `ALL_KEYS` order.
    pub fn records(&self) -> Result<Vec<(&'static str, String)>, StoreError> {
        fn encode<T: Serialize>(
            key: &'static str,
            v: &T,
        ) -> Result<(&'static str, String), StoreError> {
            serde_json::to_string_pretty(v)
                .map(|json| (key, json))
                .map_err(|source| StoreError::Encode {
                    key: key.to_string(),
                    source,
                })
        }
        Ok(vec![
            encode(WORDS_KEY, &self.words)?,
            encode(STATS_KEY, &self.stats)?,
            encode(CHALLENGE_DECK_KEY, &self.challenge_deck)?,
            encode(CHAPTER_STATES_KEY, &self.chapter_states)?,
        ])
    }
}

pub fn export_all<K: KvStore + ?Sized>(kv: &K) -> Result<ExportData, StoreError> {
    Ok(ExportData {
        sightwords_export_version: EXPORT_VERSION,
        exported_at: Utc::now(),
        words: load_words(kv)?.words,
        stats: load(kv, STATS_KEY)?.unwrap_or_default(),
        challenge_deck: load(kv, CHALLENGE_DECK_KEY)?.unwrap_or_default(),
        chapter_states: load(kv, CHAPTER_STATES_KEY)?.unwrap_or_default(),
    })
}
