//! Turn-taking conversation between two assistant instances.
//!
//! State machine:
//!
//! ```text
//! Idle -> Speaking(First) -> Speaking(Second) -> ... -> Done
//!                 \                 \
//!                  +-> Interrupted   +-> Failed
//! ```
//!
//! Turns are strictly sequential. Interruption is only observed between
//! invocations; a reply that lands after the interrupt was raised is dropped.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::backend::Assistant;
use crate::error::{ConversationError, InvokeError};
use crate::invoke::ProcessInvoker;
use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::transcript::{Transcript, TranscriptStatus, TranscriptWriter};

use super::interrupt::Interrupt;
use super::speaker::{Seat, Speaker};
use super::turn::Turn;

/// Driver states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Speaking(Seat),
    Done,
    Interrupted,
    Failed,
}

/// Knobs for one run.
#[derive(Debug, Clone, Copy)]
pub struct ConversationOptions {
    pub rounds: u32,
    /// Pause between rounds; skipped after the last one.
    pub delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            rounds: crate::config::DEFAULT_ROUNDS,
            delay: Duration::from_secs(crate::config::DEFAULT_DELAY_SECS),
            retry: RetryPolicy::single_retry(),
        }
    }
}

/// Progress notifications.
#[derive(Debug)]
pub enum ConversationEvent<'a> {
    RoundStarted { round: u32, speaker: &'a Speaker },
    TurnRecorded(&'a Turn),
    Waiting(Duration),
}

/// Result of a run that reached a terminal state other than `Failed`.
#[derive(Debug)]
pub struct ConversationReport {
    pub state: DriverState,
    pub turns: Vec<Turn>,
    pub transcript_path: std::path::PathBuf,
}

pub struct ConversationDriver<'a, I: ProcessInvoker + ?Sized> {
    invoker: &'a I,
    assistant: &'a Assistant,
    project: String,
    speakers: [Speaker; 2],
    options: ConversationOptions,
    interrupt: Interrupt,
    state: DriverState,
    started_at: DateTime<Local>,
    turns: Vec<Turn>,
}

impl<'a, I: ProcessInvoker + ?Sized> ConversationDriver<'a, I> {
    pub fn new(
        invoker: &'a I,
        assistant: &'a Assistant,
        project: impl Into<String>,
        speakers: [Speaker; 2],
        options: ConversationOptions,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            invoker,
            assistant,
            project: project.into(),
            speakers,
            options,
            interrupt,
            state: DriverState::Idle,
            started_at: Local::now(),
            turns: Vec::new(),
        }
    }

    /// Run every round, then write the transcript.
    ///
    /// On interruption the turns recorded so far are written and the run ends
    /// with `DriverState::Interrupted`. If a turn still fails after its retry,
    /// the partial transcript is written and the error returned.
    pub async fn run<F>(
        mut self,
        initial_prompt: &str,
        writer: &TranscriptWriter,
        mut observer: F,
    ) -> Result<ConversationReport, ConversationError>
    where
        F: FnMut(ConversationEvent<'_>),
    {
        info!(
            project = %self.project,
            rounds = self.options.rounds,
            "starting conversation"
        );

        let mut prompt = initial_prompt.to_string();
        let mut seat = Seat::First;

        for round in 1..=self.options.rounds {
            if self.interrupt.is_raised() {
                return self.halt_interrupted(writer);
            }

            self.state = DriverState::Speaking(seat);
            let speaker = &self.speakers[seat.index()];
            observer(ConversationEvent::RoundStarted { round, speaker });

            let spoken = self.speak(seat, &prompt).await;
            let response = match spoken {
                Ok(response) => response,
                Err(InvokeError::Interrupted) => return self.halt_interrupted(writer),
                Err(source) => {
                    let speaker = self.speakers[seat.index()].name.clone();
                    return Err(self.halt_failed(writer, speaker, round, source));
                }
            };

            self.turns.push(Turn {
                round,
                seat,
                speaker: self.speakers[seat.index()].name.clone(),
                prompt: std::mem::take(&mut prompt),
                response: response.clone(),
                timestamp: Local::now(),
            });
            if let Some(turn) = self.turns.last() {
                observer(ConversationEvent::TurnRecorded(turn));
            }

            prompt = response;
            seat = seat.other();

            if round < self.options.rounds {
                if self.interrupt.is_raised() {
                    return self.halt_interrupted(writer);
                }
                observer(ConversationEvent::Waiting(self.options.delay));
                let interrupted = tokio::select! {
                    _ = tokio::time::sleep(self.options.delay) => false,
                    _ = self.interrupt.raised() => true,
                };
                if interrupted {
                    return self.halt_interrupted(writer);
                }
            }
        }

        self.state = DriverState::Done;
        let transcript_path = writer.write(&self.transcript(TranscriptStatus::Completed))?;
        info!(turns = self.turns.len(), "conversation completed");

        Ok(ConversationReport {
            state: self.state,
            turns: self.turns,
            transcript_path,
        })
    }

    /// One invocation for `seat`, retried once on a retryable failure.
    async fn speak(&self, seat: Seat, prompt: &str) -> Result<String, InvokeError> {
        let speaker = &self.speakers[seat.index()];
        let full_prompt = speaker.compose_prompt(prompt);

        retry_with_backoff(
            self.options.retry,
            |attempt| {
                let full_prompt = &full_prompt;
                async move {
                    if self.interrupt.is_raised() {
                        return Err(InvokeError::Interrupted);
                    }
                    if attempt > 1 {
                        warn!(speaker = %speaker.name, attempt, "retrying turn");
                    }

                    let result = self.assistant.ask(self.invoker, full_prompt).await;

                    if self.interrupt.is_raised() {
                        debug!(speaker = %speaker.name, "discarding reply received after interrupt");
                        return Err(InvokeError::Interrupted);
                    }
                    if let Err(e) = &result {
                        warn!(speaker = %speaker.name, "turn failed: {}", e);
                    }
                    result
                }
            },
            InvokeError::is_retryable,
            |e| InvokeError::RetriesExhausted(Box::new(e)),
        )
        .await
    }

    fn transcript(&self, status: TranscriptStatus) -> Transcript {
        Transcript {
            project: self.project.clone(),
            participants: self.speakers.to_vec(),
            started_at: self.started_at,
            status,
            turns: self.turns.clone(),
        }
    }

    fn halt_interrupted(
        mut self,
        writer: &TranscriptWriter,
    ) -> Result<ConversationReport, ConversationError> {
        self.state = DriverState::Interrupted;
        info!(turns = self.turns.len(), "conversation interrupted, saving partial transcript");
        let transcript_path = writer.write(&self.transcript(TranscriptStatus::Interrupted))?;

        Ok(ConversationReport {
            state: self.state,
            turns: self.turns,
            transcript_path,
        })
    }

    fn halt_failed(
        &mut self,
        writer: &TranscriptWriter,
        speaker: String,
        round: u32,
        source: InvokeError,
    ) -> ConversationError {
        self.state = DriverState::Failed;
        let transcript = match writer.write(&self.transcript(TranscriptStatus::Failed)) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Could not save partial transcript: {}", e);
                None
            }
        };
        ConversationError::Turn {
            speaker,
            round,
            source,
            transcript,
        }
    }
}
