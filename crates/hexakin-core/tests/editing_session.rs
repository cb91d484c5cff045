use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hexakin_core::document::{DocumentPolicy, MultiDocumentStore};
use hexakin_core::editing::{EditingParameters, EditorType, Purpose, RefinePreset, Style, TargetTone};
use hexakin_core::history::VersionHistoryStore;
use hexakin_core::message::{MessageLog, MessageRole};
use hexakin_core::session::{
    EditingSession, SessionPolicy, SubmitLock, SubmitOutcome, TransformStatus,
};
use hexakin_core::storage::MemoryStore;
use hexakin_core::transform::{
    FailureKind, TextTransformClient, TransformFailure, TransformMode, TransformRequest,
    TransformResult,
};
use tokio::sync::Semaphore;

// Mock client answering from a script and recording every request
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<TransformResult, TransformFailure>>>,
    requests: Mutex<Vec<TransformRequest>>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn answer(self, text: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TransformResult::new(text)));
        self
    }

    fn fail(self, failure: TransformFailure) -> Self {
        self.responses.lock().unwrap().push_back(Err(failure));
        self
    }

    fn requests(&self) -> Vec<TransformRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextTransformClient for ScriptedClient {
    async fn transform(
        &self,
        request: TransformRequest,
    ) -> Result<TransformResult, TransformFailure> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TransformResult::new("unscripted")))
    }
}

// Mock client that holds every request until the test releases it
struct GatedClient {
    started: Semaphore,
    release: Semaphore,
    calls: AtomicUsize,
    text: String,
}

impl GatedClient {
    fn new(text: &str) -> Self {
        Self {
            started: Semaphore::new(0),
            release: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            text: text.to_string(),
        }
    }

    async fn wait_started(&self) {
        self.started.acquire().await.unwrap().forget();
    }

    fn release_one(&self) {
        self.release.add_permits(1);
    }
}

#[async_trait]
impl TextTransformClient for GatedClient {
    async fn transform(
        &self,
        _request: TransformRequest,
    ) -> Result<TransformResult, TransformFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.add_permits(1);
        self.release.acquire().await.unwrap().forget();
        Ok(TransformResult::new(self.text.clone()))
    }
}

async fn session_with(
    client: Arc<dyn TextTransformClient>,
    policy: SessionPolicy,
) -> EditingSession {
    let history = VersionHistoryStore::load(Arc::new(MemoryStore::new())).await;
    EditingSession::new(client, history, MessageLog::new(), policy)
}

async fn session(client: Arc<ScriptedClient>) -> EditingSession {
    session_with(client, SessionPolicy::default()).await
}

fn params() -> EditingParameters {
    EditingParameters::new(Purpose::FictionImprove, Style::DarkThriller, EditorType::Novel)
}

// ============================================================================
// Edit
// ============================================================================

#[tokio::test]
async fn test_edit_replaces_output_and_records_version() {
    let client = Arc::new(ScriptedClient::new().answer("He felt a deep sorrow."));
    let session = session(client.clone()).await;
    session.set_input_text("He was sad.").await;

    let outcome = session.submit_edit(params()).await;

    assert_eq!(outcome, SubmitOutcome::Applied);
    assert_eq!(session.output_text().await, "He felt a deep sorrow.");
    let newest = session.history().restore(0).await.unwrap();
    assert_eq!(newest.input, "He was sad.");
    assert_eq!(newest.output, "He felt a deep sorrow.");
    assert_eq!(newest.style, Style::DarkThriller);
    assert_eq!(
        session.status(TransformMode::Edit).await,
        TransformStatus::Succeeded
    );

    let sent = client.requests();
    assert_eq!(sent[0].mode, TransformMode::Edit);
    assert_eq!(sent[0].parameters, Some(params()));
}

#[tokio::test]
async fn test_history_keeps_five_newest_edits() {
    let mut client = ScriptedClient::new();
    for n in 1..=6 {
        client = client.answer(&format!("out {n}"));
    }
    let session = session(Arc::new(client)).await;

    for n in 1..=6 {
        session.set_input_text(format!("in {n}")).await;
        assert!(session.submit_edit(params()).await.is_applied());
    }

    let entries = session.history().entries().await;
    let inputs: Vec<&str> = entries.iter().map(|e| e.input.as_str()).collect();
    assert_eq!(inputs, vec!["in 6", "in 5", "in 4", "in 3", "in 2"]);
}

#[tokio::test]
async fn test_empty_input_is_never_sent() {
    let client = Arc::new(ScriptedClient::new());
    let session = session(client.clone()).await;

    let outcome = session.submit_edit(params()).await;

    match outcome {
        SubmitOutcome::Failed(failure) => assert_eq!(failure.kind(), FailureKind::Validation),
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(client.requests().is_empty());
    assert!(session.history().is_empty().await);
}

// ============================================================================
// Refine
// ============================================================================

#[tokio::test]
async fn test_refine_splices_selection() {
    let client = Arc::new(ScriptedClient::new().answer("dog"));
    let session = session(client.clone()).await;
    session.set_output_text("The cat sat on the mat.").await;
    session.observe_selection("cat", None).await;

    let outcome = session.submit_refine(Some("Make it a dog".into())).await;

    assert!(outcome.is_applied());
    assert_eq!(session.output_text().await, "The dog sat on the mat.");
    let sent = client.requests();
    assert_eq!(sent[0].selection.as_deref(), Some("cat"));
    assert_eq!(sent[0].input_text, "The cat sat on the mat.");
}

#[tokio::test]
async fn test_refine_replaces_only_first_occurrence() {
    let client = Arc::new(ScriptedClient::new().answer("dog"));
    let session = session(client).await;
    session.set_output_text("The cat saw another cat.").await;
    session.observe_selection("cat", None).await;

    session.submit_refine(None).await;

    assert_eq!(session.output_text().await, "The dog saw another cat.");
}

#[tokio::test]
async fn test_stale_selection_replaces_whole_output() {
    let client = Arc::new(ScriptedClient::new().answer("A dog ran."));
    let session = session(client).await;
    session.set_output_text("The cat sat.").await;
    session.observe_selection("cat", None).await;
    session.set_output_text("A bird flew.").await;

    session.submit_refine(None).await;

    assert_eq!(session.output_text().await, "A dog ran.");
}

#[tokio::test]
async fn test_refine_result_is_sanitized() {
    let client = Arc::new(ScriptedClient::new().answer("  \"dog\"\n"));
    let session = session(client).await;
    session.set_output_text("The cat sat.").await;
    session.observe_selection("cat", None).await;

    session.submit_refine(None).await;

    assert_eq!(session.output_text().await, "The dog sat.");
}

#[tokio::test]
async fn test_refine_instruction_resolution() {
    let client = Arc::new(ScriptedClient::new().answer("a").answer("b").answer("c"));
    let session = session(client.clone()).await;
    session.set_output_text("Some text.").await;

    session.submit_refine(None).await;
    session.set_refine_preset(Some(RefinePreset::TightenPacing)).await;
    session.submit_refine(None).await;
    session.set_custom_instruction("Use more verbs").await;
    session.submit_refine(None).await;

    let instructions: Vec<String> = client
        .requests()
        .into_iter()
        .map(|r| r.instruction.unwrap())
        .collect();
    assert_eq!(
        instructions,
        vec!["Refine the text.", "Tighten the pacing", "Use more verbs"]
    );
}

#[tokio::test]
async fn test_failure_preserves_output() {
    let client = Arc::new(
        ScriptedClient::new().fail(TransformFailure::Upstream("model overloaded".into())),
    );
    let session = session(client).await;
    session.set_output_text("Current draft.").await;

    let outcome = session.submit_refine(None).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(session.output_text().await, "Current draft.");
    let failure = session.last_failure(TransformMode::Refine).await.unwrap();
    assert_eq!(failure.kind(), FailureKind::Upstream);
    for mode in [
        TransformMode::Edit,
        TransformMode::Critique,
        TransformMode::Echo,
        TransformMode::Tone,
    ] {
        assert_eq!(session.status(mode).await, TransformStatus::Idle);
    }
}

// ============================================================================
// Selection
// ============================================================================

#[tokio::test]
async fn test_selection_survives_collapse() {
    let session = session(Arc::new(ScriptedClient::new())).await;
    session.observe_selection("alpha", None).await;
    session.observe_selection("", None).await;
    assert_eq!(session.current_selection().await, "alpha");
}

#[tokio::test]
async fn test_inject_selection_consumes_it() {
    let session = session(Arc::new(ScriptedClient::new())).await;
    assert!(!session.inject_selection_into_chat().await);

    session.observe_selection("  a striking line ", None).await;
    assert!(session.inject_selection_into_chat().await);

    let messages = session.messages().messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "a striking line");
    assert_eq!(session.current_selection().await, "");
}

// ============================================================================
// Analyses and chat
// ============================================================================

#[tokio::test]
async fn test_analyses_publish_labelled_messages_without_touching_text() {
    let client = Arc::new(
        ScriptedClient::new()
            .answer("The ending is rushed.")
            .answer("## Echoes Found\n- \"she said\" (3)")
            .answer("Wistful, informal."),
    );
    let session = session(client.clone()).await;
    session.set_input_text("Input prose.").await;
    session.set_output_text("Output prose.").await;

    assert!(session.submit_critique().await.is_applied());
    assert!(session.submit_echo().await.is_applied());
    assert!(session.submit_tone(Some(TargetTone::Hopeful)).await.is_applied());

    assert_eq!(session.input_text().await, "Input prose.");
    assert_eq!(session.output_text().await, "Output prose.");

    let contents: Vec<String> = session
        .messages()
        .messages()
        .await
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents[0], "💡 Critique Result:\n\nThe ending is rushed.");
    assert!(contents[1].starts_with("📊 Echo Analysis Result:\n\n## Echoes Found"));
    assert_eq!(
        contents[2],
        "🎯 Tone Analysis (Target: Hopeful):\n\nWistful, informal."
    );

    let sent = client.requests();
    assert_eq!(sent[0].input_text, "Output prose.");
    assert_eq!(sent[1].input_text, "Input prose.");
    assert_eq!(sent[2].target_tone, Some(TargetTone::Hopeful));
}

#[tokio::test]
async fn test_failed_analysis_appends_nothing() {
    let client = Arc::new(
        ScriptedClient::new().fail(TransformFailure::Unreachable("connection refused".into())),
    );
    let session = session(client).await;
    session.set_input_text("Input prose.").await;

    let outcome = session.submit_echo().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(session.messages().is_empty().await);
    assert!(session.last_failure(TransformMode::Echo).await.is_some());
}

#[tokio::test]
async fn test_chat_is_framed_by_latest_insight() {
    let client = Arc::new(
        ScriptedClient::new()
            .answer("Too many adverbs.")
            .answer("Cut 'quickly' in line two."),
    );
    let session = session(client.clone()).await;
    session.set_output_text("She ran quickly.").await;
    session.submit_critique().await;

    let outcome = session.send_chat("Which adverb first?").await;

    assert!(outcome.is_applied());
    let sent = client.requests();
    assert_eq!(sent[1].mode, TransformMode::Chat);
    assert_eq!(sent[1].message.as_deref(), Some("Which adverb first?"));
    assert_eq!(
        sent[1].context.as_deref(),
        Some("💡 Critique Result:\n\nToo many adverbs.")
    );

    let messages = session.messages().messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[2].content, "Cut 'quickly' in line two.");
}

#[tokio::test]
async fn test_chat_failure_appends_error_notice() {
    let client = Arc::new(
        ScriptedClient::new().fail(TransformFailure::Unconfigured("no api key".into())),
    );
    let session = session(client).await;

    session.send_chat("Hello?").await;

    let messages = session.messages().messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "Error: failed to respond.");
}

#[tokio::test]
async fn test_blank_chat_is_ignored() {
    let client = Arc::new(ScriptedClient::new());
    let session = session(client.clone()).await;
    assert_eq!(session.send_chat("   ").await, SubmitOutcome::Ignored);
    assert!(client.requests().is_empty());
    assert!(session.messages().is_empty().await);
}

#[tokio::test]
async fn test_inject_message_into_input() {
    let client = Arc::new(ScriptedClient::new().answer("Rewrite the opening."));
    let session = session(client).await;
    session.set_input_text("Opening.").await;
    session.submit_echo().await;

    assert!(session.inject_message_into_input(0).await);
    assert!(session.input_text().await.ends_with("Rewrite the opening."));
    assert!(!session.inject_message_into_input(5).await);
}

// ============================================================================
// Clear, restore and cancellation
// ============================================================================

#[tokio::test]
async fn test_clear_keeps_history_and_messages_by_default() {
    let client = Arc::new(ScriptedClient::new().answer("Edited.").answer("Critique."));
    let session = session(client).await;
    session.set_input_text("Draft.").await;
    session.submit_edit(params()).await;
    session.submit_critique().await;
    session.observe_selection("Edited", None).await;
    session.set_custom_instruction("Shorter").await;

    session.clear().await.unwrap();

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.input_text, "");
    assert_eq!(snapshot.output_text, "");
    assert!(snapshot.selection.is_none());
    assert_eq!(snapshot.custom_instruction, "");
    assert_eq!(session.history().len().await, 1);
    assert_eq!(session.messages().len().await, 1);
}

#[tokio::test]
async fn test_clear_can_empty_history() {
    let client = Arc::new(ScriptedClient::new().answer("Edited."));
    let policy = SessionPolicy {
        clear_history_on_clear: true,
        ..SessionPolicy::default()
    };
    let session = session_with(client, policy).await;
    session.set_input_text("Draft.").await;
    session.submit_edit(params()).await;

    session.clear().await.unwrap();

    assert!(session.history().is_empty().await);
}

#[tokio::test]
async fn test_restore_applies_snapshot() {
    let client = Arc::new(ScriptedClient::new().answer("First out.").answer("Second out."));
    let session = session(client).await;
    session.set_input_text("First in.").await;
    session.submit_edit(params()).await;
    session.set_input_text("Second in.").await;
    session.submit_edit(EditingParameters::default()).await;

    let restored = session.restore(1).await.unwrap();

    assert_eq!(restored.input, "First in.");
    assert_eq!(session.input_text().await, "First in.");
    assert_eq!(session.output_text().await, "First out.");
    assert_eq!(session.parameters().await, params());
    assert_eq!(session.history().len().await, 2);
    assert!(session.restore(7).await.is_none());
}

#[tokio::test]
async fn test_clear_discards_late_result() {
    let client = Arc::new(GatedClient::new("Late edit."));
    let session = session_with(client.clone(), SessionPolicy::default()).await;
    session.set_input_text("Draft.").await;

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_edit(params()).await })
    };
    client.wait_started().await;
    session.clear().await.unwrap();
    client.release_one();

    assert_eq!(pending.await.unwrap(), SubmitOutcome::Discarded);
    assert_eq!(session.output_text().await, "");
    assert!(session.history().is_empty().await);
    assert_eq!(session.status(TransformMode::Edit).await, TransformStatus::Idle);
}

#[tokio::test]
async fn test_restore_discards_late_result_and_unlocks_kind() {
    let client = Arc::new(GatedClient::new("Edited."));
    let session = session_with(client.clone(), SessionPolicy::default()).await;
    session.set_input_text("Draft.").await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_edit(params()).await })
    };
    client.wait_started().await;
    client.release_one();
    assert_eq!(first.await.unwrap(), SubmitOutcome::Applied);
    assert!(!session.history().is_empty().await);

    let late = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_edit(params()).await })
    };
    client.wait_started().await;
    assert!(session.restore(0).await.is_some());
    assert_eq!(session.status(TransformMode::Edit).await, TransformStatus::Idle);
    client.release_one();
    assert_eq!(late.await.unwrap(), SubmitOutcome::Discarded);
    assert!(!session.status(TransformMode::Edit).await.is_pending());

    let again = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_edit(params()).await })
    };
    client.wait_started().await;
    client.release_one();
    assert_eq!(again.await.unwrap(), SubmitOutcome::Applied);
    assert_eq!(client.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_hard_lock_rejects_second_submit() {
    let client = Arc::new(GatedClient::new("Edited."));
    let session = session_with(client.clone(), SessionPolicy::default()).await;
    session.set_input_text("Draft.").await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_edit(params()).await })
    };
    client.wait_started().await;
    assert!(session.status(TransformMode::Edit).await.is_pending());

    assert_eq!(session.submit_edit(params()).await, SubmitOutcome::Busy);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    client.release_one();
    assert_eq!(first.await.unwrap(), SubmitOutcome::Applied);
    assert_eq!(session.output_text().await, "Edited.");
}

#[tokio::test]
async fn test_advisory_lock_lets_requests_race() {
    let client = Arc::new(GatedClient::new("Edited."));
    let policy = SessionPolicy {
        submit_lock: SubmitLock::Advisory,
        ..SessionPolicy::default()
    };
    let session = session_with(client.clone(), policy).await;
    session.set_input_text("Draft.").await;

    let spawn_edit = || {
        let session = session.clone();
        tokio::spawn(async move { session.submit_edit(params()).await })
    };
    let first = spawn_edit();
    client.wait_started().await;
    let second = spawn_edit();
    client.wait_started().await;
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);

    client.release_one();
    client.release_one();
    assert!(first.await.unwrap().is_applied());
    assert!(second.await.unwrap().is_applied());
    assert_eq!(session.history().len().await, 2);
}

// ============================================================================
// Documents alongside the session
// ============================================================================

#[tokio::test]
async fn test_document_deletion_reassigns_active() {
    let docs = MultiDocumentStore::load(Arc::new(MemoryStore::new()), DocumentPolicy::default()).await;
    let a = docs.add_document(Some("A"), None).await.unwrap();
    let b = docs.add_document(Some("B"), None).await.unwrap();
    let c = docs.add_document(Some("C"), None).await.unwrap();
    docs.select(&b).await;

    docs.delete(&b).await.unwrap();
    assert_eq!(docs.active_id().await, Some(a.clone()));

    docs.delete(&a).await.unwrap();
    docs.delete(&c).await.unwrap();
    assert_eq!(docs.active_id().await, None);
}

#[tokio::test]
async fn test_chapter_content_feeds_the_session() {
    let client = Arc::new(ScriptedClient::new().answer("Polished chapter."));
    let session = session(client.clone()).await;
    let docs = MultiDocumentStore::load(Arc::new(MemoryStore::new()), DocumentPolicy::default()).await;
    let id = docs.add_document(None, Some("Rough chapter.")).await.unwrap();

    let active = docs.active().await.unwrap();
    session.set_input_text(active.content).await;
    session.submit_edit(params()).await;
    docs.set_content(&id, &session.output_text().await).await.unwrap();

    assert_eq!(docs.get(&id).await.unwrap().content, "Polished chapter.");
    assert_eq!(docs.get(&id).await.unwrap().title, "Chapter 1");
}
