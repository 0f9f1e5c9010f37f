use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::chapter_unlock::DEFAULT_UNLOCK_RATIO;
use crate::engine::response::ResponseRules;
use crate::engine::session_builder::SessionParams;
use crate::engine::speech_match::DEFAULT_SIMILARITY_THRESHOLD;
use crate::store::json_store::default_data_dir;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_session_size")]
    pub session_size: usize,
    #[serde(default = "default_challenge_slice_limit")]
    pub challenge_slice_limit: usize,
    #[serde(default = "default_points_per_word")]
    pub points_per_word: u32,
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: u32,
    #[serde(default = "default_challenge_threshold")]
    pub challenge_threshold: u32,
    #[serde(default = "default_demotion_miss_threshold")]
    pub demotion_miss_threshold: u32,
    #[serde(default = "default_unlock_ratio")]
    pub unlock_ratio: f64,
    #[serde(default = "default_speech_similarity_threshold")]
    pub speech_similarity_threshold: f64,
    #[serde(default = "default_auto_speak_delay_secs")]
    pub auto_speak_delay_secs: u64,
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_speech_args")]
    pub speech_args: Vec<String>,
    /// Command that records one utterance and prints candidate transcripts,
    /// one per line. Empty disables speech input.
    #[serde(default)]
    pub recognizer_command: String,
    #[serde(default)]
    pub recognizer_args: Vec<String>,
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_session_size() -> usize {
    10
}
fn default_challenge_slice_limit() -> usize {
    5
}
fn default_points_per_word() -> u32 {
    10
}
fn default_mastery_threshold() -> u32 {
    5
}
fn default_challenge_threshold() -> u32 {
    2
}
fn default_demotion_miss_threshold() -> u32 {
    2
}
fn default_unlock_ratio() -> f64 {
    DEFAULT_UNLOCK_RATIO
}
fn default_speech_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}
fn default_auto_speak_delay_secs() -> u64 {
    5
}
fn default_feedback_delay_ms() -> u64 {
    1500
}
fn default_theme() -> String {
    "storybook".to_string()
}
fn default_speech_command() -> String {
    "espeak-ng".to_string()
}
fn default_speech_args() -> Vec<String> {
    // Slower and slightly higher than the voice default, for young listeners
    vec!["-s".to_string(), "130".to_string(), "-p".to_string(), "60".to_string()]
}
fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_size: default_session_size(),
            challenge_slice_limit: default_challenge_slice_limit(),
            points_per_word: default_points_per_word(),
            mastery_threshold: default_mastery_threshold(),
            challenge_threshold: default_challenge_threshold(),
            demotion_miss_threshold: default_demotion_miss_threshold(),
            unlock_ratio: default_unlock_ratio(),
            speech_similarity_threshold: default_speech_similarity_threshold(),
            auto_speak_delay_secs: default_auto_speak_delay_secs(),
            feedback_delay_ms: default_feedback_delay_ms(),
            theme: default_theme(),
            speech_command: default_speech_command(),
            speech_args: default_speech_args(),
            recognizer_command: String::new(),
            recognizer_args: Vec::new(),
            data_dir: default_data_dir_string(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sightwords")
            .join("config.toml")
    }

    /// Clamp values loaded from a hand-edited file into workable ranges.
    pub fn validate(&mut self) {
        self.session_size = self.session_size.clamp(1, 50);
        self.challenge_slice_limit = self.challenge_slice_limit.min(self.session_size);
        self.mastery_threshold = self.mastery_threshold.max(1);
        self.challenge_threshold = self.challenge_threshold.max(1);
        if !(self.unlock_ratio > 0.0 && self.unlock_ratio <= 1.0) {
            self.unlock_ratio = default_unlock_ratio();
        }
        if !(self.speech_similarity_threshold > 0.0 && self.speech_similarity_threshold <= 1.0) {
            self.speech_similarity_threshold = default_speech_similarity_threshold();
        }
        self.auto_speak_delay_secs = self.auto_speak_delay_secs.clamp(1, 60);
        self.feedback_delay_ms = self.feedback_delay_ms.min(10_000);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir_string();
        }
    }

    pub fn session_params(&self) -> SessionParams {
        SessionParams {
            session_size: self.session_size,
            challenge_slice_limit: self.challenge_slice_limit,
        }
    }

    pub fn response_rules(&self) -> ResponseRules {
        ResponseRules {
            points_per_word: self.points_per_word,
            mastery_threshold: self.mastery_threshold,
            challenge_threshold: self.challenge_threshold,
            demotion_miss_threshold: self.demotion_miss_threshold,
        }
    }

    pub fn auto_speak_delay(&self) -> Duration {
        Duration::from_secs(self.auto_speak_delay_secs)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}
