use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use crate::event::AppEvent;
use crate::session::schedule::CancelToken;

const LISTEN_POLL: Duration = Duration::from_millis(50);

/// Resolve a command name the way a shell would. Names containing a path
/// separator are checked directly.
pub fn find_command(command: &str) -> Option<PathBuf> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}

pub trait SpeechOutput {
    fn is_available(&self) -> bool;
    fn speak(&mut self, text: &str);
}

/// Speaks through an external TTS program, one process per utterance.
pub struct CommandSpeaker {
    program: Option<PathBuf>,
    args: Vec<String>,
    current: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(command: &str, args: &[String]) -> Self {
        let program = find_command(command);
        if program.is_none() && !command.trim().is_empty() {
            tracing::info!(command, "speech output unavailable");
        }
        Self {
            program,
            args: args.to_vec(),
            current: None,
        }
    }

    pub fn silent() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            current: None,
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl SpeechOutput for CommandSpeaker {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn speak(&mut self, text: &str) {
        self.stop();
        let Some(program) = &self.program else {
            return;
        };
        let spawned = Command::new(program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(err) => {
                tracing::warn!(%err, program = %program.display(), "failed to start speech output")
            }
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognitionError {
    /// No recognizer command configured or found.
    Unavailable,
    NoSpeech,
    Failed,
}

impl RecognitionError {
    pub fn message(self) -> &'static str {
        match self {
            RecognitionError::Unavailable => {
                "Speech recognition is not available. Use the keys below."
            }
            RecognitionError::NoSpeech => "No speech detected. Try again!",
            RecognitionError::Failed => "Speech recognition error. Use the keys below instead.",
        }
    }
}

/// Candidate transcripts from recognizer stdout, one per non-empty line.
pub fn parse_alternatives(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs an external recognizer that captures one utterance and prints its
/// alternatives. Results arrive on the event channel tagged with the token
/// that was live when listening began.
pub struct CommandRecognizer {
    program: Option<PathBuf>,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(command: &str, args: &[String]) -> Self {
        Self {
            program: find_command(command),
            args: args.to_vec(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }

    pub fn listen(&self, token: CancelToken, tx: Sender<AppEvent>) {
        let Some(program) = self.program.clone() else {
            let _ = tx.send(AppEvent::RecognitionFailed {
                error: RecognitionError::Unavailable,
                token,
            });
            return;
        };
        let args = self.args.clone();

        thread::spawn(move || {
            if let Some(event) = run_recognizer(&program, &args, token) {
                let _ = tx.send(event);
            }
        });
    }
}

/// Run one recognizer process to completion. Returns `None` (after killing
/// the process) once `token` is cancelled.
fn run_recognizer(program: &Path, args: &[String], token: CancelToken) -> Option<AppEvent> {
    let failed = |token| AppEvent::RecognitionFailed {
        error: RecognitionError::Failed,
        token,
    };
    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(%err, program = %program.display(), "failed to start recognizer");
            return Some(failed(token));
        }
    };

    // Stdout is read concurrently; the child may fill the pipe before exiting
    let reader = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut text = String::new();
            let _ = out.read_to_string(&mut text);
            text
        })
    });

    let status = loop {
        if token.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("recognizer cancelled");
            return None;
        }
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(LISTEN_POLL),
            Err(err) => {
                tracing::warn!(%err, "lost track of recognizer");
                let _ = child.kill();
                return Some(failed(token));
            }
        }
    };
    let stdout = reader.and_then(|r| r.join().ok()).unwrap_or_default();

    if !status.success() {
        tracing::warn!(%status, "recognizer exited with failure");
        return Some(failed(token));
    }
    let alternatives = parse_alternatives(&stdout);
    if alternatives.is_empty() {
        Some(AppEvent::RecognitionFailed {
            error: RecognitionError::NoSpeech,
            token,
        })
    } else {
        Some(AppEvent::Transcript { alternatives, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Instant;

    #[test]
    fn test_parse_alternatives_skips_blank_lines() {
        let alts = parse_alternatives("  the \n\nthee\n   \n");
        assert_eq!(alts, vec!["the".to_string(), "thee".to_string()]);
    }

    #[test]
    fn test_find_command_rejects_empty_and_missing() {
        assert!(find_command("").is_none());
        assert!(find_command("   ").is_none());
        assert!(find_command("definitely-not-a-real-program-4821").is_none());
        assert!(find_command("/no/such/dir/prog").is_none());
    }

    #[test]
    fn test_silent_speaker_is_noop() {
        let mut speaker = CommandSpeaker::silent();
        assert!(!speaker.is_available());
        speaker.speak("the");
        assert!(speaker.current.is_none());
    }

    #[test]
    fn test_unavailable_recognizer_reports_failure() {
        let recognizer = CommandRecognizer::new("", &[]);
        assert!(!recognizer.is_available());
        let (tx, rx) = mpsc::channel();
        let token = CancelToken::new();
        recognizer.listen(token.clone(), tx);
        match rx.recv().unwrap() {
            AppEvent::RecognitionFailed { error, token: t } => {
                assert_eq!(error, RecognitionError::Unavailable);
                assert!(t.same_as(&token));
            }
            _ => panic!("expected failure event"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_recognizer_output_becomes_transcript() {
        let echo = find_command("echo").unwrap();
        let event = run_recognizer(&echo, &["the".to_string()], CancelToken::new());
        match event {
            Some(AppEvent::Transcript { alternatives, .. }) => {
                assert_eq!(alternatives, vec!["the"])
            }
            _ => panic!("expected transcript"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_cancelled_listen_kills_recognizer() {
        let sleep = find_command("sleep").unwrap();
        let token = CancelToken::new();
        let worker_token = token.clone();
        let started = Instant::now();
        let worker =
            thread::spawn(move || run_recognizer(&sleep, &["30".to_string()], worker_token));
        thread::sleep(Duration::from_millis(100));
        token.cancel();
        assert!(worker.join().unwrap().is_none());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
