use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::engine::catalog::{ALL_CHAPTERS, get_chapter};
use crate::engine::response::ResponseOutcome;
use crate::engine::speech_match::best_match;
use crate::engine::trainer::{Advance, SessionSummary, Trainer, TrainerError};
use crate::engine::word::{Word, WordError, WordState};
use crate::event::AppEvent;
use crate::session::schedule::{CancelToken, Scheduled};
use crate::speech::{CommandRecognizer, RecognitionError, SpeechOutput};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Welcome,
    Learning,
    Summary,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardTab {
    Chapters,
    Challenge,
    Words,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [
        DashboardTab::Chapters,
        DashboardTab::Challenge,
        DashboardTab::Words,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardTab::Chapters => "Chapters",
            DashboardTab::Challenge => "Challenge Deck",
            DashboardTab::Words => "All Words",
        }
    }

    fn next(self) -> Self {
        match self {
            DashboardTab::Chapters => DashboardTab::Challenge,
            DashboardTab::Challenge => DashboardTab::Words,
            DashboardTab::Words => DashboardTab::Chapters,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DashboardState {
    pub tab: DashboardTab,
    pub chapter_selected: usize,
    pub word_selected: usize,
    /// `None` shows every word.
    pub word_filter: Option<WordState>,
    /// Text typed so far while the add-word prompt is open.
    pub new_word: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            tab: DashboardTab::Chapters,
            chapter_selected: 0,
            word_selected: 0,
            word_filter: None,
            new_word: None,
        }
    }
}

fn next_filter(filter: Option<WordState>) -> Option<WordState> {
    match filter {
        None => Some(WordState::New),
        Some(WordState::New) => Some(WordState::Learning),
        Some(WordState::Learning) => Some(WordState::Mastered),
        Some(WordState::Mastered) => Some(WordState::Disabled),
        Some(WordState::Disabled) => None,
    }
}

pub struct App {
    pub screen: AppScreen,
    pub trainer: Trainer,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub dashboard: DashboardState,
    pub toast: Option<Toast>,
    /// Result of the last answer, shown until the session moves on.
    pub feedback: Option<ResponseOutcome>,
    pub last_summary: Option<SessionSummary>,
    pub should_quit: bool,
    auto_speak: Scheduled<String>,
    pending_advance: Scheduled<()>,
    listening: Option<CancelToken>,
    speaker: Box<dyn SpeechOutput>,
    recognizer: CommandRecognizer,
}

impl App {
    pub fn new(
        trainer: Trainer,
        config: Config,
        theme: &'static Theme,
        speaker: Box<dyn SpeechOutput>,
        recognizer: CommandRecognizer,
    ) -> Self {
        let mut app = Self {
            screen: AppScreen::Welcome,
            trainer,
            config,
            theme,
            menu: Menu::new(theme),
            dashboard: DashboardState::default(),
            toast: None,
            feedback: None,
            last_summary: None,
            should_quit: false,
            auto_speak: Scheduled::new(),
            pending_advance: Scheduled::new(),
            listening: None,
            speaker,
            recognizer,
        };
        app.refresh_tagline();
        app
    }

    fn refresh_tagline(&mut self) {
        let stats = self.trainer.stats();
        self.menu.tagline = if stats.total_sessions > 0 {
            format!(
                "{} points from {} sessions",
                stats.total_points, stats.total_sessions
            )
        } else {
            String::new()
        };
    }

    pub fn speech_output_available(&self) -> bool {
        self.speaker.is_available()
    }

    pub fn speech_input_available(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_some()
    }

    /// Whole seconds left before the current word is spoken automatically.
    pub fn countdown_secs(&self, now: Instant) -> Option<u64> {
        self.auto_speak
            .remaining(now)
            .map(|d| d.as_millis().div_ceil(1000) as u64)
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        match severity {
            Severity::Error => tracing::warn!(%message, "toast"),
            _ => tracing::debug!(%message, "toast"),
        }
        self.toast = Some(Toast {
            message,
            severity,
            shown_at: now,
        });
    }

    fn report(&mut self, err: TrainerError, now: Instant) {
        let message = match &err {
            TrainerError::Word(WordError::EmptyWord) => "Please enter a word".to_string(),
            TrainerError::Word(WordError::DuplicateWord(_)) => {
                "This word already exists".to_string()
            }
            TrainerError::Store(e) => {
                tracing::error!(error = %e, "failed to save progress");
                "Could not save progress".to_string()
            }
        };
        self.notify(message, Severity::Error, now);
    }

    fn cancel_timers(&mut self) {
        self.auto_speak.cancel();
        self.pending_advance.cancel();
        self.stop_listening();
    }

    fn stop_listening(&mut self) {
        if let Some(token) = self.listening.take() {
            token.cancel();
        }
    }

    // --- Navigation ---

    pub fn go_to_menu(&mut self) {
        self.cancel_timers();
        self.trainer.end_session();
        self.feedback = None;
        self.refresh_tagline();
        self.screen = AppScreen::Welcome;
    }

    pub fn go_to_dashboard(&mut self) {
        self.dashboard = DashboardState::default();
        self.screen = AppScreen::Dashboard;
    }

    // --- Learning ---

    pub fn start_session(&mut self, now: Instant) {
        self.cancel_timers();
        self.feedback = None;
        self.last_summary = None;
        let empty = match self.trainer.start_session() {
            Ok(session) => session.is_empty(),
            Err(err) => {
                self.report(err, now);
                return;
            }
        };
        self.screen = AppScreen::Learning;
        if empty {
            self.notify(
                "No words to practice. Unlock a chapter or add words in the dashboard.",
                Severity::Info,
                now,
            );
            self.advance(now);
        } else {
            self.show_current_word(now);
        }
    }

    fn show_current_word(&mut self, now: Instant) {
        self.auto_speak.cancel();
        self.stop_listening();
        if let Some(word) = self.trainer.current_word() {
            let text = word.text.clone();
            self.auto_speak.schedule(text, self.config.auto_speak_delay(), now);
        }
    }

    fn can_answer(&self) -> bool {
        self.screen == AppScreen::Learning
            && !self.pending_advance.is_pending()
            && self.trainer.current_word().is_some()
    }

    /// "Got it" (`true`) or "Need help" (`false`). Help reads the word aloud first.
    pub fn answer(&mut self, correct: bool, now: Instant) {
        if !self.can_answer() {
            return;
        }
        self.auto_speak.cancel();
        self.stop_listening();
        if !correct {
            self.hear_word();
        }
        self.record_answer(correct, now);
    }

    fn record_answer(&mut self, correct: bool, now: Instant) {
        match self.trainer.handle_response(correct) {
            Ok(Some(outcome)) => {
                self.feedback = Some(outcome);
                self.pending_advance
                    .schedule((), self.config.feedback_delay(), now);
            }
            Ok(None) => {}
            Err(err) => {
                // Already counted; move on so the word is not graded twice
                self.report(err, now);
                self.pending_advance
                    .schedule((), self.config.feedback_delay(), now);
            }
        }
    }

    pub fn hear_word(&mut self) {
        if let Some(text) = self.trainer.current_word().map(|w| w.text.clone()) {
            self.speaker.speak(&text);
        }
    }

    /// Start one recognizer run. Ignored while already listening or when
    /// recognition is unavailable.
    pub fn listen(&mut self, tx: Sender<AppEvent>) {
        if !self.can_answer() || self.listening.is_some() || !self.recognizer.is_available() {
            return;
        }
        self.auto_speak.cancel();
        let token = CancelToken::new();
        self.listening = Some(token.clone());
        self.recognizer.listen(token, tx);
    }

    fn take_live_listen(&mut self, token: &CancelToken) -> bool {
        let live = self
            .listening
            .as_ref()
            .is_some_and(|t| t.same_as(token) && !t.is_cancelled());
        if live {
            self.listening = None;
        } else {
            tracing::debug!("dropping stale recognizer result");
        }
        live
    }

    pub fn on_transcript(&mut self, alternatives: &[String], token: &CancelToken, now: Instant) {
        if !self.take_live_listen(token) || !self.can_answer() {
            return;
        }
        let Some(target) = self.trainer.current_word().map(|w| w.text.clone()) else {
            return;
        };
        match best_match(alternatives, &target, self.config.speech_similarity_threshold) {
            Some((heard, confidence)) => {
                tracing::debug!(%heard, confidence, "speech matched");
                self.notify(format!("Great job! You said \"{heard}\""), Severity::Success, now);
                self.record_answer(true, now);
            }
            None => {
                let heard = alternatives.first().map(String::as_str).unwrap_or("");
                self.notify(
                    format!("I heard \"{heard}\". Try saying \"{target}\""),
                    Severity::Info,
                    now,
                );
            }
        }
    }

    pub fn on_recognition_failed(
        &mut self,
        error: RecognitionError,
        token: &CancelToken,
        now: Instant,
    ) {
        if !self.take_live_listen(token) {
            return;
        }
        let severity = match error {
            RecognitionError::NoSpeech => Severity::Info,
            RecognitionError::Unavailable | RecognitionError::Failed => Severity::Error,
        };
        self.notify(error.message(), severity, now);
    }

    fn advance(&mut self, now: Instant) {
        self.feedback = None;
        match self.trainer.advance() {
            Ok(Advance::Next(_)) => self.show_current_word(now),
            Ok(Advance::Completed(summary)) => {
                self.cancel_timers();
                let names: Vec<String> = summary
                    .unlocked
                    .iter()
                    .filter_map(|id| get_chapter(*id))
                    .map(|c| format!("Chapter {} \"{}\"", c.id, c.name))
                    .collect();
                if !names.is_empty() {
                    self.notify(format!("{} unlocked!", names.join(", ")), Severity::Success, now);
                }
                self.last_summary = Some(summary);
                self.screen = AppScreen::Summary;
            }
            Ok(Advance::Idle) => self.go_to_menu(),
            Err(err) => self.report(err, now),
        }
    }

    pub fn leave_session(&mut self) {
        self.go_to_menu();
    }

    /// Drive timers. Called on every tick and after every event.
    pub fn tick(&mut self, now: Instant) {
        if let Some(text) = self.auto_speak.poll(now) {
            self.speaker.speak(&text);
        }
        if self.pending_advance.poll(now).is_some() {
            self.advance(now);
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.saturating_duration_since(t.shown_at) >= TOAST_DURATION)
        {
            self.toast = None;
        }
    }

    // --- Dashboard ---

    pub fn visible_words(&self) -> Vec<&Word> {
        self.trainer.words().filter_by_state(self.dashboard.word_filter)
    }

    fn selection_len(&self) -> usize {
        match self.dashboard.tab {
            DashboardTab::Chapters => ALL_CHAPTERS.len(),
            DashboardTab::Challenge => self.trainer.deck().len(),
            DashboardTab::Words => self.visible_words().len(),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.dashboard.tab {
            DashboardTab::Chapters => &mut self.dashboard.chapter_selected,
            DashboardTab::Challenge | DashboardTab::Words => &mut self.dashboard.word_selected,
        }
    }

    pub fn dashboard_down(&mut self) {
        let max = self.selection_len().saturating_sub(1);
        let sel = self.selection_mut();
        *sel = (*sel + 1).min(max);
    }

    pub fn dashboard_up(&mut self) {
        let sel = self.selection_mut();
        *sel = sel.saturating_sub(1);
    }

    pub fn dashboard_next_tab(&mut self) {
        self.dashboard.tab = self.dashboard.tab.next();
        self.dashboard.word_selected = 0;
    }

    pub fn cycle_word_filter(&mut self) {
        if self.dashboard.tab != DashboardTab::Words {
            return;
        }
        self.dashboard.word_filter = next_filter(self.dashboard.word_filter);
        self.dashboard.word_selected = 0;
    }

    /// Lock/unlock the selected chapter or disable/enable the selected word.
    pub fn toggle_selected(&mut self, now: Instant) {
        match self.dashboard.tab {
            DashboardTab::Chapters => {
                let Some(chapter) = ALL_CHAPTERS.get(self.dashboard.chapter_selected) else {
                    return;
                };
                if let Err(err) = self.trainer.toggle_chapter_lock(chapter.id) {
                    self.report(err, now);
                }
            }
            DashboardTab::Words => {
                let Some(text) = self
                    .visible_words()
                    .get(self.dashboard.word_selected)
                    .map(|w| w.text.clone())
                else {
                    return;
                };
                if let Err(err) = self.trainer.toggle_word(&text) {
                    self.report(err, now);
                }
                let max = self.selection_len().saturating_sub(1);
                self.dashboard.word_selected = self.dashboard.word_selected.min(max);
            }
            DashboardTab::Challenge => {}
        }
    }

    pub fn begin_add_word(&mut self) {
        self.dashboard.new_word = Some(String::new());
    }

    pub fn is_adding_word(&self) -> bool {
        self.dashboard.new_word.is_some()
    }

    pub fn add_word_push(&mut self, ch: char) {
        if let Some(buf) = self.dashboard.new_word.as_mut() {
            buf.push(ch);
        }
    }

    pub fn add_word_backspace(&mut self) {
        if let Some(buf) = self.dashboard.new_word.as_mut() {
            buf.pop();
        }
    }

    pub fn cancel_add_word(&mut self) {
        self.dashboard.new_word = None;
    }

    /// Submit the prompt. A rejected word keeps the prompt open for editing.
    pub fn submit_new_word(&mut self, now: Instant) {
        let Some(raw) = self.dashboard.new_word.clone() else {
            return;
        };
        match self.trainer.add_word(&raw) {
            Ok(word) => {
                self.dashboard.new_word = None;
                self.notify(
                    format!("Word \"{}\" added successfully!", word.text),
                    Severity::Success,
                    now,
                );
            }
            Err(err) => self.report(err, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::store::KvStore;
    use crate::store::memory::MemoryStore;
    use crate::store::memory::flaky::FlakyStore;
    use crate::store::schema::WORDS_KEY;

    #[derive(Clone, Default)]
    struct RecordingSpeaker {
        spoken: Rc<RefCell<Vec<String>>>,
    }

    impl SpeechOutput for RecordingSpeaker {
        fn is_available(&self) -> bool {
            true
        }
        fn speak(&mut self, text: &str) {
            self.spoken.borrow_mut().push(text.to_string());
        }
    }

    fn make_app() -> (App, RecordingSpeaker) {
        make_app_with(Box::new(MemoryStore::new()))
    }

    fn make_app_with(store: Box<dyn KvStore>) -> (App, RecordingSpeaker) {
        let config = Config::default();
        let trainer =
            Trainer::load_with_rng(store, &config, SmallRng::seed_from_u64(3)).unwrap();
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let speaker = RecordingSpeaker::default();
        let app = App::new(
            trainer,
            config,
            theme,
            Box::new(speaker.clone()),
            CommandRecognizer::new("", &[]),
        );
        (app, speaker)
    }

    fn current_text(app: &App) -> String {
        app.trainer.current_word().unwrap().text.clone()
    }

    #[test]
    fn test_auto_speak_after_countdown() {
        let (mut app, speaker) = make_app();
        let t0 = Instant::now();
        app.start_session(t0);
        assert_eq!(app.screen, AppScreen::Learning);
        assert_eq!(app.countdown_secs(t0), Some(5));

        app.tick(t0 + Duration::from_secs(4));
        assert!(speaker.spoken.borrow().is_empty());
        app.tick(t0 + Duration::from_secs(5));
        assert_eq!(speaker.spoken.borrow().as_slice(), &[current_text(&app)]);
        // Fires once
        app.tick(t0 + Duration::from_secs(11));
        assert_eq!(speaker.spoken.borrow().len(), 1);
    }

    #[test]
    fn test_answer_cancels_auto_speak_and_advances_after_delay() {
        let (mut app, speaker) = make_app();
        let t0 = Instant::now();
        app.start_session(t0);
        let first = current_text(&app);

        app.answer(true, t0 + Duration::from_secs(1));
        assert!(app.feedback.as_ref().is_some_and(|f| f.correct));
        assert_eq!(app.countdown_secs(t0), None);

        // A second answer during feedback is ignored
        app.answer(false, t0 + Duration::from_secs(1));
        assert_eq!(app.trainer.session().unwrap().correct_count, 1);
        assert_eq!(app.trainer.session().unwrap().missed_count, 0);

        app.tick(t0 + Duration::from_millis(2400));
        assert_eq!(current_text(&app), first);
        app.tick(t0 + Duration::from_millis(2500));
        assert_ne!(current_text(&app), first);
        assert!(app.feedback.is_none());
        // The old word's countdown never fired
        assert!(speaker.spoken.borrow().is_empty());
    }

    #[test]
    fn test_failed_save_still_advances_once() {
        let store = FlakyStore::default();
        let (mut app, _speaker) = make_app_with(Box::new(store.clone()));
        let t0 = Instant::now();
        app.start_session(t0);
        let first = current_text(&app);
        store.fail_writes(WORDS_KEY);

        app.answer(true, t0);
        assert!(app.toast.as_ref().is_some_and(|t| t.severity == Severity::Error));
        app.answer(true, t0 + Duration::from_millis(100));
        app.answer(false, t0 + Duration::from_millis(200));
        let session = app.trainer.session().unwrap();
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.missed_count, 0);
        assert_eq!(app.trainer.words().get(&first).unwrap().correct_count, 1);

        store.heal();
        app.tick(t0 + Duration::from_millis(1500));
        assert_ne!(current_text(&app), first);
    }

    #[test]
    fn test_need_help_speaks_and_records_miss() {
        let (mut app, speaker) = make_app();
        let t0 = Instant::now();
        app.start_session(t0);
        let word = current_text(&app);
        app.answer(false, t0);
        assert_eq!(speaker.spoken.borrow().as_slice(), &[word.clone()]);
        assert_eq!(app.trainer.words().get(&word).unwrap().missed_count, 1);
        assert_eq!(app.trainer.session().unwrap().streak, 0);
    }

    #[test]
    fn test_full_session_reaches_summary() {
        let (mut app, _) = make_app();
        let mut now = Instant::now();
        app.start_session(now);
        for _ in 0..10 {
            app.answer(true, now);
            now += Duration::from_secs(2);
            app.tick(now);
        }
        assert_eq!(app.screen, AppScreen::Summary);
        let summary = app.last_summary.as_ref().unwrap();
        assert_eq!(summary.correct, 10);
        assert_eq!(summary.points, 100);

        app.go_to_menu();
        assert_eq!(app.screen, AppScreen::Welcome);
        assert!(app.menu.tagline.contains("100 points"));
    }

    #[test]
    fn test_empty_pool_goes_straight_to_summary() {
        let (mut app, _) = make_app();
        app.trainer.toggle_chapter_lock(1).unwrap();
        let now = Instant::now();
        app.start_session(now);
        assert_eq!(app.screen, AppScreen::Summary);
        assert_eq!(app.last_summary.as_ref().unwrap().attempted, 0);
        assert_eq!(app.toast.as_ref().unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_stale_transcript_is_dropped() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.start_session(now);
        let word = current_text(&app);
        let stale = CancelToken::new();
        app.on_transcript(&[word], &stale, now);
        assert!(app.feedback.is_none());
        assert_eq!(app.trainer.session().unwrap().correct_count, 0);
    }

    #[test]
    fn test_transcript_match_and_mismatch() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.start_session(now);
        let word = current_text(&app);

        let token = CancelToken::new();
        app.listening = Some(token.clone());
        app.on_transcript(&["zzzzzzzz".to_string()], &token, now);
        assert!(app.feedback.is_none());
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.severity, Severity::Info);
        assert!(toast.message.contains("zzzzzzzz"));
        assert!(!app.is_listening());

        let token = CancelToken::new();
        app.listening = Some(token.clone());
        app.on_transcript(&[format!("um {word}")], &token, now);
        assert!(app.feedback.as_ref().is_some_and(|f| f.correct));
        assert_eq!(app.toast.as_ref().unwrap().severity, Severity::Success);
    }

    #[test]
    fn test_listen_without_recognizer_is_ignored() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.start_session(now);
        let (tx, rx) = mpsc::channel();
        app.listen(tx);
        assert!(!app.is_listening());
        assert!(rx.try_recv().is_err());
        // Countdown still running
        assert!(app.countdown_secs(now).is_some());
    }

    #[test]
    fn test_recognition_failure_toast() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.start_session(now);
        let token = CancelToken::new();
        app.listening = Some(token.clone());
        app.on_recognition_failed(RecognitionError::NoSpeech, &token, now);
        assert_eq!(app.toast.as_ref().unwrap().severity, Severity::Info);
        assert!(!app.is_listening());
    }

    #[test]
    fn test_toast_expires() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.notify("hello", Severity::Info, now);
        app.tick(now + Duration::from_secs(2));
        assert!(app.toast.is_some());
        app.tick(now + TOAST_DURATION);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_dashboard_add_word_prompt() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.go_to_dashboard();
        app.begin_add_word();
        app.submit_new_word(now);
        assert!(app.is_adding_word());
        assert_eq!(app.toast.as_ref().unwrap().message, "Please enter a word");

        for ch in "Zebra".chars() {
            app.add_word_push(ch);
        }
        app.submit_new_word(now);
        assert!(!app.is_adding_word());
        assert!(app.trainer.words().contains("zebra"));

        app.begin_add_word();
        for ch in "the".chars() {
            app.add_word_push(ch);
        }
        app.submit_new_word(now);
        assert_eq!(app.toast.as_ref().unwrap().message, "This word already exists");
    }

    #[test]
    fn test_dashboard_toggles() {
        let (mut app, _) = make_app();
        let now = Instant::now();
        app.go_to_dashboard();

        app.dashboard_down();
        app.toggle_selected(now);
        assert!(app.trainer.chapters().is_unlocked(2));

        app.dashboard_next_tab();
        app.dashboard_next_tab();
        assert_eq!(app.dashboard.tab, DashboardTab::Words);
        let first = app.visible_words()[0].text.clone();
        app.toggle_selected(now);
        assert_eq!(app.trainer.words().get(&first).unwrap().state, WordState::Disabled);

        app.cycle_word_filter();
        app.cycle_word_filter();
        app.cycle_word_filter();
        app.cycle_word_filter();
        assert_eq!(app.dashboard.word_filter, Some(WordState::Disabled));
        assert_eq!(app.visible_words().len(), 1);
        app.toggle_selected(now);
        assert_eq!(app.trainer.words().get(&first).unwrap().state, WordState::Learning);
        assert!(app.visible_words().is_empty());
        assert_eq!(app.dashboard.word_selected, 0);
    }
}
