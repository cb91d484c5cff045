use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::apply::{CHAT_FAILURE_MESSAGE, Refinement, apply_refinement, format_analysis};
use super::policy::{SessionPolicy, SubmitLock};
use super::status::{StatusBoard, TransformStatus};
use crate::document::DocumentId;
use crate::editing::{
    EditingParameters, RefinePreset, SelectionState, SelectionTracker, TargetTone,
    refine_instruction,
};
use crate::error::Result;
use crate::history::{VersionEntry, VersionHistoryStore};
use crate::message::{ChatMessage, MessageLog};
use crate::transform::{
    TextTransformClient, TransformFailure, TransformMode, TransformRequest, TransformResult,
    sanitize,
};

/// What happened to a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The result was applied to the session.
    Applied,
    /// The request was invalid or the service failed; recorded for the kind.
    Failed(TransformFailure),
    /// The session was cleared or restored while the request was in flight;
    /// the late result was dropped.
    Discarded,
    /// The kind was already pending and the session holds a hard submit lock.
    Busy,
    /// Nothing to send (a blank chat message).
    Ignored,
}

impl SubmitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Point-in-time copy of the session, for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub input_text: String,
    pub output_text: String,
    pub parameters: EditingParameters,
    pub selection: Option<SelectionState>,
    pub refine_preset: Option<RefinePreset>,
    pub custom_instruction: String,
    pub target_tone: Option<TargetTone>,
    pub statuses: Vec<(TransformMode, TransformStatus)>,
}

#[derive(Debug, Default)]
struct SessionState {
    input_text: String,
    output_text: String,
    parameters: EditingParameters,
    selection: SelectionTracker,
    refine_preset: Option<RefinePreset>,
    custom_instruction: String,
    target_tone: Option<TargetTone>,
    /// Latest analysis published to the message log; frames chat messages.
    last_insight: Option<String>,
    statuses: StatusBoard,
    /// Bumped by `clear` and `restore`. Completions issued under an older
    /// generation are discarded.
    generation: u64,
}

struct InFlight {
    mode: TransformMode,
    request: TransformRequest,
    generation: u64,
}

/// The editing session state machine.
///
/// Owns the input and output text, the editing parameters, the tracked
/// selection, the pending refinement instruction and one status per
/// transform kind. Transforms run through the injected
/// [`TextTransformClient`]; edits are recorded in the shared
/// [`VersionHistoryStore`] and analyses are published to the shared
/// [`MessageLog`].
///
/// The state lock is never held across the network call.
#[derive(Clone)]
pub struct EditingSession {
    state: Arc<Mutex<SessionState>>,
    client: Arc<dyn TextTransformClient>,
    history: VersionHistoryStore,
    messages: MessageLog,
    policy: SessionPolicy,
}

impl EditingSession {
    pub fn new(
        client: Arc<dyn TextTransformClient>,
        history: VersionHistoryStore,
        messages: MessageLog,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            client,
            history,
            messages,
            policy,
        }
    }

    pub fn history(&self) -> &VersionHistoryStore {
        &self.history
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    // ============================================================================
    // Editable state
    // ============================================================================

    pub async fn set_input_text(&self, text: impl Into<String>) {
        self.state.lock().await.input_text = text.into();
    }

    pub async fn set_output_text(&self, text: impl Into<String>) {
        self.state.lock().await.output_text = text.into();
    }

    pub async fn set_parameters(&self, parameters: EditingParameters) {
        self.state.lock().await.parameters = parameters;
    }

    pub async fn set_refine_preset(&self, preset: Option<RefinePreset>) {
        self.state.lock().await.refine_preset = preset;
    }

    pub async fn set_custom_instruction(&self, instruction: impl Into<String>) {
        self.state.lock().await.custom_instruction = instruction.into();
    }

    pub async fn set_target_tone(&self, tone: Option<TargetTone>) {
        self.state.lock().await.target_tone = tone;
    }

    /// Forwards a selection-end event to the selection tracker.
    pub async fn observe_selection(&self, raw: &str, source: Option<DocumentId>) -> bool {
        self.state.lock().await.selection.observe(raw, source)
    }

    pub async fn input_text(&self) -> String {
        self.state.lock().await.input_text.clone()
    }

    pub async fn output_text(&self) -> String {
        self.state.lock().await.output_text.clone()
    }

    pub async fn parameters(&self) -> EditingParameters {
        self.state.lock().await.parameters
    }

    pub async fn current_selection(&self) -> String {
        self.state.lock().await.selection.current_selection().to_string()
    }

    pub async fn status(&self, mode: TransformMode) -> TransformStatus {
        self.state.lock().await.statuses.get(mode)
    }

    /// The failure recorded for a kind, if its last submit failed.
    pub async fn last_failure(&self, mode: TransformMode) -> Option<TransformFailure> {
        self.status(mode).await.failure().cloned()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            input_text: state.input_text.clone(),
            output_text: state.output_text.clone(),
            parameters: state.parameters,
            selection: state.selection.state().cloned(),
            refine_preset: state.refine_preset,
            custom_instruction: state.custom_instruction.clone(),
            target_tone: state.target_tone,
            statuses: state.statuses.all(),
        }
    }

    // ============================================================================
    // Transforms
    // ============================================================================

    /// Rewrites the input text. On success the output text is replaced and a
    /// version is recorded.
    pub async fn submit_edit(&self, parameters: EditingParameters) -> SubmitOutcome {
        self.set_parameters(parameters).await;

        let in_flight = match self
            .begin(TransformMode::Edit, |state| {
                TransformRequest::edit(state.input_text.clone(), state.parameters)
            })
            .await
        {
            Ok(in_flight) => in_flight,
            Err(outcome) => return outcome,
        };

        let outcome = self.call(&in_flight).await;
        let entry = {
            let (mut state, result) = match self.complete(&in_flight, outcome).await {
                Ok(done) => done,
                Err(outcome) => return outcome,
            };
            let output = sanitize(&result.text);
            state.output_text = output.clone();
            state.statuses.set(TransformMode::Edit, TransformStatus::Succeeded);
            VersionEntry::new(
                in_flight.request.input_text.clone(),
                output,
                in_flight.request.parameters.unwrap_or_default(),
            )
        };

        if let Err(e) = self.history.record(entry).await {
            tracing::warn!("[EditingSession] Failed to persist version history: {}", e);
        }
        SubmitOutcome::Applied
    }

    /// Refines the output text, scoped to the tracked selection when there is one.
    ///
    /// An explicit `instruction` wins over the session's preset and custom
    /// instruction; with none of them the default phrase is used.
    pub async fn submit_refine(&self, instruction: Option<String>) -> SubmitOutcome {
        let in_flight = match self
            .begin(TransformMode::Refine, |state| {
                let instruction = match instruction.filter(|i| !i.trim().is_empty()) {
                    Some(instruction) => instruction,
                    None => refine_instruction(
                        state.refine_preset,
                        Some(state.custom_instruction.as_str()),
                    ),
                };
                TransformRequest::refine(
                    state.output_text.clone(),
                    state.selection.current_selection(),
                    instruction,
                )
            })
            .await
        {
            Ok(in_flight) => in_flight,
            Err(outcome) => return outcome,
        };

        let outcome = self.call(&in_flight).await;
        let (mut state, result) = match self.complete(&in_flight, outcome).await {
            Ok(done) => done,
            Err(outcome) => return outcome,
        };

        let replacement = sanitize(&result.text);
        let (output, how) = apply_refinement(
            &state.output_text,
            in_flight.request.scoped_selection(),
            &replacement,
        );
        if how == Refinement::Replaced && in_flight.request.scoped_selection().is_some() {
            tracing::info!("[EditingSession] Selection no longer in output, replacing full text");
        }
        state.output_text = output;
        state
            .statuses
            .set(TransformMode::Refine, TransformStatus::Succeeded);
        SubmitOutcome::Applied
    }

    /// Critiques the output text.
    pub async fn submit_critique(&self) -> SubmitOutcome {
        self.submit_analysis(TransformMode::Critique, |state| {
            TransformRequest::critique(state.output_text.clone(), Some(state.parameters))
        })
        .await
    }

    /// Looks for repeated phrases in the input text.
    pub async fn submit_echo(&self) -> SubmitOutcome {
        self.submit_analysis(TransformMode::Echo, |state| {
            TransformRequest::echo(state.input_text.clone())
        })
        .await
    }

    /// Analyses tone and formality of the input text, optionally against a target tone.
    pub async fn submit_tone(&self, target_tone: Option<TargetTone>) -> SubmitOutcome {
        self.set_target_tone(target_tone).await;
        self.submit_analysis(TransformMode::Tone, |state| {
            TransformRequest::tone(state.input_text.clone(), state.target_tone)
        })
        .await
    }

    async fn submit_analysis<F>(&self, mode: TransformMode, build: F) -> SubmitOutcome
    where
        F: FnOnce(&SessionState) -> TransformRequest,
    {
        let in_flight = match self.begin(mode, build).await {
            Ok(in_flight) => in_flight,
            Err(outcome) => return outcome,
        };

        let outcome = self.call(&in_flight).await;
        let (mut state, result) = match self.complete(&in_flight, outcome).await {
            Ok(done) => done,
            Err(outcome) => return outcome,
        };

        let text = result.text.trim();
        let content = format_analysis(mode, in_flight.request.target_tone, text);
        state.last_insight = Some(content.clone());
        state.statuses.set(mode, TransformStatus::Succeeded);
        self.messages.append(ChatMessage::assistant(content)).await;
        SubmitOutcome::Applied
    }

    /// Sends a chat message, framed by the latest analysis when there is one.
    ///
    /// The user message and the reply (or an error notice) are appended to
    /// the message log.
    pub async fn send_chat(&self, message: &str) -> SubmitOutcome {
        let message = message.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let in_flight = match self
            .begin(TransformMode::Chat, |state| {
                TransformRequest::chat(message, state.last_insight.clone())
            })
            .await
        {
            Ok(in_flight) => in_flight,
            Err(outcome) => return outcome,
        };
        self.messages.append(ChatMessage::user(message)).await;

        let outcome = self.call(&in_flight).await;
        let failed = outcome.is_err();
        match self.complete(&in_flight, outcome).await {
            Ok((mut state, result)) => {
                state
                    .statuses
                    .set(TransformMode::Chat, TransformStatus::Succeeded);
                self.messages
                    .append(ChatMessage::assistant(result.text.trim()))
                    .await;
                SubmitOutcome::Applied
            }
            Err(outcome) => {
                if failed {
                    self.messages
                        .append(ChatMessage::assistant(CHAT_FAILURE_MESSAGE))
                        .await;
                }
                outcome
            }
        }
    }

    // ============================================================================
    // Session-level actions
    // ============================================================================

    /// Empties input, output, selection and the pending refinement
    /// instruction, and abandons in-flight requests.
    ///
    /// The message log is left alone; the version history is only cleared
    /// when the policy asks for it.
    pub async fn clear(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.input_text.clear();
            state.output_text.clear();
            state.selection.clear();
            state.refine_preset = None;
            state.custom_instruction.clear();
            state.statuses.reset();
            state.generation += 1;
        }
        tracing::debug!("[EditingSession] Cleared");

        if self.policy.clear_history_on_clear {
            self.history.clear().await?;
        }
        Ok(())
    }

    /// Applies the version at `index` (0 is the newest) and abandons
    /// in-flight requests. Transform statuses go back to idle. Returns the
    /// applied entry.
    pub async fn restore(&self, index: usize) -> Option<VersionEntry> {
        let entry = self.history.restore(index).await?;
        let mut state = self.state.lock().await;
        state.input_text = entry.input.clone();
        state.output_text = entry.output.clone();
        state.parameters = entry.parameters();
        state.statuses.reset();
        state.generation += 1;
        tracing::debug!("[EditingSession] Restored version {}", index);
        Some(entry)
    }

    /// Sends the tracked selection to the chat log as a user message and
    /// consumes it. Returns `false` when there is no selection.
    pub async fn inject_selection_into_chat(&self) -> bool {
        let taken = self.state.lock().await.selection.take();
        match taken {
            Some(selection) => {
                self.messages.append(ChatMessage::user(selection.text)).await;
                true
            }
            None => false,
        }
    }

    /// Copies a logged message into the input text.
    pub async fn inject_message_into_input(&self, index: usize) -> bool {
        match self.messages.get(index).await {
            Some(message) => {
                self.set_input_text(message.content).await;
                true
            }
            None => false,
        }
    }

    // ============================================================================
    // Submit machinery
    // ============================================================================

    async fn begin<F>(&self, mode: TransformMode, build: F) -> std::result::Result<InFlight, SubmitOutcome>
    where
        F: FnOnce(&SessionState) -> TransformRequest,
    {
        let mut state = self.state.lock().await;

        if self.policy.submit_lock == SubmitLock::Hard && state.statuses.get(mode).is_pending() {
            tracing::debug!("[EditingSession] {} already pending, submit rejected", mode);
            return Err(SubmitOutcome::Busy);
        }

        let request = match build(&state).validated() {
            Ok(request) => request,
            Err(failure) => {
                tracing::debug!("[EditingSession] {} not sent: {}", mode, failure);
                state
                    .statuses
                    .set(mode, TransformStatus::Failed(failure.clone()));
                return Err(SubmitOutcome::Failed(failure));
            }
        };

        tracing::info!(
            "[EditingSession] Submitting {} ({} chars)",
            mode,
            request.input_text.chars().count()
        );
        state.statuses.set(mode, TransformStatus::Pending);
        Ok(InFlight {
            mode,
            request,
            generation: state.generation,
        })
    }

    async fn call(
        &self,
        in_flight: &InFlight,
    ) -> std::result::Result<TransformResult, TransformFailure> {
        self.client.transform(in_flight.request.clone()).await
    }

    /// Re-locks the state after the call. Stale completions are discarded and
    /// failures are recorded; on success the caller applies the result while
    /// holding the returned guard.
    async fn complete(
        &self,
        in_flight: &InFlight,
        outcome: std::result::Result<TransformResult, TransformFailure>,
    ) -> std::result::Result<(MutexGuard<'_, SessionState>, TransformResult), SubmitOutcome> {
        let mut state = self.state.lock().await;

        if state.generation != in_flight.generation {
            tracing::debug!(
                "[EditingSession] Discarding stale {} result (generation {} != {})",
                in_flight.mode,
                in_flight.generation,
                state.generation
            );
            return Err(SubmitOutcome::Discarded);
        }

        match outcome {
            Ok(result) => Ok((state, result)),
            Err(failure) => {
                tracing::warn!("[EditingSession] {} failed: {}", in_flight.mode, failure);
                state
                    .statuses
                    .set(in_flight.mode, TransformStatus::Failed(failure.clone()));
                Err(SubmitOutcome::Failed(failure))
            }
        }
    }
}
