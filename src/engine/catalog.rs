use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::engine::word::{Word, WordState, WordStore, normalize_text};

// --- Static Definitions ---

pub struct ChapterDefinition {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub words: &'static [&'static str],
}

pub const ALL_CHAPTERS: &[ChapterDefinition] = &[
    ChapterDefinition {
        id: 1,
        name: "Starting Out",
        description: "The most common and essential sight words",
        words: &["the", "and", "a", "to", "in", "I", "is", "it", "you", "of"],
    },
    ChapterDefinition {
        id: 2,
        name: "Simple Actions",
        description: "Basic action words we use every day",
        words: &["go", "see", "can", "we", "my", "he", "she", "me", "up", "at"],
    },
    ChapterDefinition {
        id: 3,
        name: "More Basics",
        description: "Building on what you know",
        words: &["was", "on", "they", "but", "had", "all", "are", "for", "his", "her"],
    },
    ChapterDefinition {
        id: 4,
        name: "Common Verbs",
        description: "Action words for everyday activities",
        words: &["look", "come", "get", "said", "with", "do", "make", "run", "play", "help"],
    },
    ChapterDefinition {
        id: 5,
        name: "Question Words",
        description: "Words that help us ask questions",
        words: &["what", "who", "where", "when", "why", "how", "which", "an", "as", "be"],
    },
    ChapterDefinition {
        id: 6,
        name: "Direction & Place",
        description: "Words about where things are",
        words: &["here", "there", "out", "down", "up", "into", "over", "under", "from", "about"],
    },
    ChapterDefinition {
        id: 7,
        name: "More Actions",
        description: "Learning more things we can do",
        words: &["jump", "walk", "stop", "find", "put", "take", "give", "think", "say", "know"],
    },
    ChapterDefinition {
        id: 8,
        name: "People & Things",
        description: "Words about us and our world",
        words: &["him", "them", "us", "this", "that", "these", "those", "some", "any", "many"],
    },
    ChapterDefinition {
        id: 9,
        name: "Describing Words",
        description: "Words that tell us about size and quality",
        words: &["big", "little", "good", "bad", "old", "new", "long", "short", "small", "very"],
    },
    ChapterDefinition {
        id: 10,
        name: "Numbers",
        description: "Counting words from one to ten",
        words: &["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten"],
    },
    ChapterDefinition {
        id: 11,
        name: "Connecting Ideas",
        description: "Words that join thoughts together",
        words: &["or", "if", "so", "not", "yes", "no", "by", "then", "than", "now"],
    },
    ChapterDefinition {
        id: 12,
        name: "More Describing",
        description: "Even more ways to describe things",
        words: &["much", "more", "most", "few", "lots", "only", "just", "other", "every", "each"],
    },
    ChapterDefinition {
        id: 13,
        name: "Around & About",
        description: "More directional and location words",
        words: &[
            "around",
            "off",
            "away",
            "back",
            "again",
            "soon",
            "right",
            "left",
            "before",
            "after",
        ],
    },
    ChapterDefinition {
        id: 14,
        name: "Belonging",
        description: "Words about possession and ownership",
        words: &["our", "your", "their", "my", "his", "her", "me", "us", "them", "its"],
    },
    ChapterDefinition {
        id: 15,
        name: "Helping Verbs",
        description: "Words that help other verbs",
        words: &["has", "have", "does", "did", "will", "would", "could", "should", "may", "must"],
    },
    ChapterDefinition {
        id: 16,
        name: "Being & Doing",
        description: "More forms of verbs",
        words: &["been", "being", "want", "like", "let", "went", "made", "came", "call", "ask"],
    },
    ChapterDefinition {
        id: 17,
        name: "Advanced Connectors",
        description: "Complex connecting words",
        words: &[
            "because",
            "also",
            "too",
            "both",
            "either",
            "neither",
            "while",
            "until",
            "since",
            "well",
        ],
    },
    ChapterDefinition {
        id: 18,
        name: "Time & Frequency",
        description: "Words about when things happen",
        words: &["always", "never", "once", "time", "day"],
    },
    ChapterDefinition {
        id: 19,
        name: "Ways & Means",
        description: "Words about how we do things",
        words: &["use", "way", "work", "live", "best"],
    },
];

pub fn get_chapter(id: u32) -> Option<&'static ChapterDefinition> {
    ALL_CHAPTERS.iter().find(|c| c.id == id)
}

/// The first chapter (in id order) listing `text`. Some words appear in more
/// than one chapter; the earliest one owns them.
pub fn chapter_for_word(text: &str) -> Option<u32> {
    let key = normalize_text(text);
    ALL_CHAPTERS
        .iter()
        .find(|c| c.words.iter().any(|w| normalize_text(w) == key))
        .map(|c| c.id)
}

/// Initial word list for a first run: every catalog word once, in chapter order.
pub fn seed_words() -> Vec<Word> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for chapter in ALL_CHAPTERS {
        for raw in chapter.words {
            let text = normalize_text(raw);
            if seen.insert(text.clone()) {
                words.push(Word::new(text, Some(chapter.id)));
            }
        }
    }
    words
}

// --- Persisted Unlock State ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterState {
    pub id: u32,
    pub unlocked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterStates {
    states: Vec<ChapterState>,
}

impl Default for ChapterStates {
    fn default() -> Self {
        // Chapter 1 starts unlocked; everything else locked
        let states = ALL_CHAPTERS
            .iter()
            .map(|c| ChapterState {
                id: c.id,
                unlocked: c.id == 1,
            })
            .collect();
        Self { states }
    }
}

impl ChapterStates {
    pub fn from_states(states: Vec<ChapterState>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[ChapterState] {
        &self.states
    }

    pub fn is_unlocked(&self, id: u32) -> bool {
        self.states.iter().any(|s| s.id == id && s.unlocked)
    }

    pub fn unlocked_ids(&self) -> BTreeSet<u32> {
        self.states
            .iter()
            .filter(|s| s.unlocked)
            .map(|s| s.id)
            .collect()
    }

    fn state_mut(&mut self, id: u32) -> Option<&mut ChapterState> {
        if self.states.iter().all(|s| s.id != id) {
            get_chapter(id)?;
            self.states.push(ChapterState {
                id,
                unlocked: false,
            });
            self.states.sort_by_key(|s| s.id);
        }
        self.states.iter_mut().find(|s| s.id == id)
    }

    /// Manual lock/unlock. Returns the new flag, or None for an unknown chapter.
    pub fn toggle(&mut self, id: u32) -> Option<bool> {
        let state = self.state_mut(id)?;
        state.unlocked = !state.unlocked;
        Some(state.unlocked)
    }

    /// Returns true if the chapter went from locked to unlocked.
    pub fn unlock(&mut self, id: u32) -> bool {
        match self.state_mut(id) {
            Some(state) if !state.unlocked => {
                state.unlocked = true;
                true
            }
            _ => false,
        }
    }
}

// --- Progress ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChapterProgress {
    pub total: usize,
    pub mastered: usize,
    pub learning: usize,
    pub new: usize,
}

impl ChapterProgress {
    pub fn mastered_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.mastered as f64 / self.total as f64
    }
}

/// Disabled words count toward `total` but fall in no bucket.
pub fn compute_progress(words: &WordStore, chapter_id: u32) -> ChapterProgress {
    let mut progress = ChapterProgress::default();
    if get_chapter(chapter_id).is_none() {
        return progress;
    }
    for word in words.list().iter().filter(|w| w.chapter_id == Some(chapter_id)) {
        progress.total += 1;
        match word.state {
            WordState::Mastered => progress.mastered += 1,
            WordState::Learning => progress.learning += 1,
            WordState::New => progress.new += 1,
            WordState::Disabled => {}
        }
    }
    progress
}
