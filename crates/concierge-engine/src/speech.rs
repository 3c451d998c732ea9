//! Speech capabilities: recognition (voice input) and synthesis (voice
//! output).
//!
//! Both capabilities are optional external collaborators. When a helper
//! command is not configured or not installed, the corresponding control
//! is simply absent; that is not an error.
//!
//! Recognition lifecycle is an explicit two-state machine rather than a
//! pile of callbacks: capture restarts on unexpected end only while the
//! machine is still `Listening`, and any capability error drops it back
//! to `Idle`.

use std::fmt;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Prefix marking an interim (not yet finalized) transcript line.
const INTERIM_PREFIX: char = '~';

/// Capture state for speech recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    /// Not capturing. Ready to start.
    Idle,
    /// Actively capturing speech input.
    Listening,
}

impl fmt::Display for ListenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenState::Idle => write!(f, "Idle"),
            ListenState::Listening => write!(f, "Listening"),
        }
    }
}

impl ListenState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(self, target: ListenState) -> bool {
        matches!(
            (self, target),
            (ListenState::Idle, ListenState::Listening)
                | (ListenState::Listening, ListenState::Idle)
        )
    }
}

/// Events emitted by a speech recognizer while capture is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A transcript update. Interim results replace the input buffer;
    /// finalized results additionally arm the auto-submit debounce.
    Transcript {
        /// Recognized text.
        text: String,
        /// Whether the recognizer considers this segment finalized.
        is_final: bool,
    },
    /// Capture ended without being asked to stop.
    Ended,
    /// The capability failed. Logged, never shown to the user.
    Error(String),
}

/// Events emitted by a speech synthesizer around each utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// An utterance started playing.
    Started,
    /// An utterance finished (or failed; either way playback is over).
    Finished,
}

/// Optional speech-to-text capability.
pub trait SpeechRecognizer: Send {
    /// Begin continuous capture. Events arrive on the channel supplied at
    /// construction time.
    fn start(&mut self) -> Result<(), SpeechError>;

    /// Stop capture. No further events are delivered for this session.
    fn stop(&mut self);
}

/// Optional text-to-speech capability.
pub trait SpeechSynthesizer: Send {
    /// Queue one utterance. Utterances play sequentially.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Errors from speech helpers. These never surface to the transcript;
/// the controller logs them and clears the capture flag.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Failed to spawn the helper process.
    #[error("failed to spawn speech helper: {0}")]
    Spawn(#[source] std::io::Error),

    /// The helper command is not configured.
    #[error("no speech helper configured")]
    NotConfigured,

    /// The synthesis queue is gone (worker exited).
    #[error("synthesis queue closed")]
    QueueClosed,
}

/// Recognizer backed by a long-running helper command.
///
/// The helper writes one transcript per stdout line; lines starting with
/// `~` are interim, everything else is finalized. EOF means capture ended
/// on the helper's side.
pub struct CommandRecognizer {
    argv: Vec<String>,
    events: mpsc::UnboundedSender<RecognitionEvent>,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl CommandRecognizer {
    /// Create a recognizer for the given argv, delivering events on `events`.
    pub fn new(argv: Vec<String>, events: mpsc::UnboundedSender<RecognitionEvent>) -> Self {
        Self {
            argv,
            events,
            child: None,
            reader: None,
        }
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn start(&mut self) -> Result<(), SpeechError> {
        // Drop any previous session first.
        self.stop();

        let Some(program) = self.argv.first() else {
            return Err(SpeechError::NotConfigured);
        };

        let mut cmd = Command::new(program);
        cmd.args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(SpeechError::Spawn)?;

        let stdout = child.stdout.take();
        let events = self.events.clone();
        let reader = tokio::spawn(async move {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let event = match line.strip_prefix(INTERIM_PREFIX) {
                        Some(rest) => RecognitionEvent::Transcript {
                            text: rest.to_string(),
                            is_final: false,
                        },
                        None => RecognitionEvent::Transcript {
                            text: line,
                            is_final: true,
                        },
                    };
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            // Helper exited on its own; the controller decides whether to
            // restart based on capture intent.
            let _ = events.send(RecognitionEvent::Ended);
        });

        self.child = Some(child);
        self.reader = Some(reader);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        // kill_on_drop terminates the helper.
        self.child = None;
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Synthesizer backed by a per-utterance helper command.
///
/// Utterances are queued through a worker task and played one at a time;
/// the helper receives the text on stdin. `Started`/`Finished` events
/// bracket each utterance.
pub struct CommandSynthesizer {
    queue: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl CommandSynthesizer {
    /// Create a synthesizer for the given argv, delivering events on `events`.
    pub fn new(argv: Vec<String>, events: mpsc::UnboundedSender<SynthesisEvent>) -> Self {
        let (queue_tx, mut queue_rx) = mpsc::unbounded_channel::<String>();

        let worker = tokio::spawn(async move {
            while let Some(text) = queue_rx.recv().await {
                let _ = events.send(SynthesisEvent::Started);
                if let Err(e) = run_utterance(&argv, &text).await {
                    tracing::warn!("speech synthesis failed: {e}");
                }
                let _ = events.send(SynthesisEvent::Finished);
            }
        });

        Self {
            queue: queue_tx,
            worker,
        }
    }
}

/// Run one utterance through the helper command.
async fn run_utterance(argv: &[String], text: &str) -> Result<(), SpeechError> {
    let Some(program) = argv.first() else {
        return Err(SpeechError::NotConfigured);
    };

    let mut cmd = Command::new(program);
    cmd.args(&argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(SpeechError::Spawn)?;

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(text.as_bytes()).await;
        drop(stdin);
    }

    let _ = child.wait().await;
    Ok(())
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.queue
            .send(text.to_string())
            .map_err(|_| SpeechError::QueueClosed)
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_state_display() {
        assert_eq!(ListenState::Idle.to_string(), "Idle");
        assert_eq!(ListenState::Listening.to_string(), "Listening");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(ListenState::Idle.can_transition_to(ListenState::Listening));
        assert!(ListenState::Listening.can_transition_to(ListenState::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!ListenState::Idle.can_transition_to(ListenState::Idle));
        assert!(!ListenState::Listening.can_transition_to(ListenState::Listening));
    }

    #[tokio::test]
    async fn test_command_recognizer_line_protocol() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut recognizer = CommandRecognizer::new(
            vec![
                "sh".into(),
                "-c".into(),
                "printf '~book the ca\\nbook the cabin\\n'".into(),
            ],
            tx,
        );
        recognizer.start().unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            RecognitionEvent::Transcript {
                text: "book the ca".into(),
                is_final: false,
            }
        );

        let second = rx.recv().await.unwrap();
        assert_eq!(
            second,
            RecognitionEvent::Transcript {
                text: "book the cabin".into(),
                is_final: true,
            }
        );

        // Helper exits after printing: capture ends.
        assert_eq!(rx.recv().await.unwrap(), RecognitionEvent::Ended);
    }

    #[tokio::test]
    async fn test_command_recognizer_stop_suppresses_ended() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut recognizer =
            CommandRecognizer::new(vec!["sh".into(), "-c".into(), "sleep 30".into()], tx);
        recognizer.start().unwrap();
        recognizer.stop();

        // Explicit stop aborts the reader before it can report an end.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_command_recognizer_missing_binary() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut recognizer =
            CommandRecognizer::new(vec!["definitely-not-a-real-recognizer".into()], tx);
        assert!(matches!(recognizer.start(), Err(SpeechError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_command_synthesizer_events_bracket_utterance() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut synth =
            CommandSynthesizer::new(vec!["sh".into(), "-c".into(), "cat > /dev/null".into()], tx);
        synth.speak("Your booking is confirmed.").unwrap();

        assert_eq!(rx.recv().await.unwrap(), SynthesisEvent::Started);
        assert_eq!(rx.recv().await.unwrap(), SynthesisEvent::Finished);
    }

    #[tokio::test]
    async fn test_command_synthesizer_queues_sequentially() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut synth =
            CommandSynthesizer::new(vec!["sh".into(), "-c".into(), "cat > /dev/null".into()], tx);
        synth.speak("first").unwrap();
        synth.speak("second").unwrap();

        // Two utterances, two non-overlapping Started/Finished pairs.
        assert_eq!(rx.recv().await.unwrap(), SynthesisEvent::Started);
        assert_eq!(rx.recv().await.unwrap(), SynthesisEvent::Finished);
        assert_eq!(rx.recv().await.unwrap(), SynthesisEvent::Started);
        assert_eq!(rx.recv().await.unwrap(), SynthesisEvent::Finished);
    }
}
