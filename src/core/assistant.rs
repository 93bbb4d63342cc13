//! Assistant chat session.
//!
//! A session owns an append-only transcript and a single `pending` flag.
//! Submitting is split in two phases so the host never has to hold a borrow
//! across the network await:
//!
//! 1. [`Session::begin`] validates the input, appends the user message and
//!    either answers locally (offline mode) or hands back the request to send;
//! 2. [`Session::finish`] appends exactly one assistant message for the
//!    outcome and returns the session to idle.
//!
//! [`submit`] drives both phases against a [`GenerativeClient`] and only keeps
//! a weak reference while the call is in flight.

use std::cell::RefCell;
use std::rc::Weak;

use crate::citations::{dedup_citations, Citation};
use crate::config::{AssistantConfig, Phrasebook};
use crate::profile::{persona_instruction, Achievement, Profile};
use crate::remote::{GenerateRequest, GenerateResponse, GenerativeClient, RemoteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    User,
    Assistant,
}

/// Why a message exists. Lets the host style fallbacks without comparing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MessageKind {
    Greeting,
    User,
    Reply,
    Offline,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChatMessage {
    role: Role,
    kind: MessageKind,
    text: String,
    sources: Vec<Citation>,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            kind: MessageKind::User,
            text: text.to_string(),
            sources: Vec::new(),
        }
    }

    fn assistant(kind: MessageKind, text: &str, sources: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            kind,
            text: text.to_string(),
            sources,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Deduplicated grounding sources; empty unless the reply used retrieval.
    pub fn sources(&self) -> &[Citation] {
        &self.sources
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Pending,
}

/// Borrowed snapshot pushed to observers after every change.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptView<'a> {
    pub messages: &'a [ChatMessage],
    pub pending: bool,
}

/// Owned snapshot, for hosts that keep their own copy.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transcript {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
}

impl From<TranscriptView<'_>> for Transcript {
    fn from(view: TranscriptView<'_>) -> Self {
        Self {
            messages: view.messages.to_vec(),
            pending: view.pending,
        }
    }
}

/// Result of [`Session::begin`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Blank input, or a request is already in flight. Nothing changed.
    Ignored,
    /// No credential: the offline message was appended, nothing to send.
    Offline,
    /// Send this request, then call [`Session::finish`] with the outcome.
    Dispatch(GenerateRequest),
}

/// What [`submit`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Offline,
    Completed,
    /// The session was dropped while the call was in flight.
    Discarded,
}

type Observer = Box<dyn FnMut(TranscriptView<'_>)>;

pub struct Session {
    persona: String,
    config: AssistantConfig,
    augmentation_available: bool,
    messages: Vec<ChatMessage>,
    state: SessionState,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("augmentation_available", &self.augmentation_available)
            .field("messages", &self.messages.len())
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    /// A fresh session seeded with the greeting.
    ///
    /// The credential is checked once here; `augmentation_available` never
    /// changes afterwards.
    pub fn new(config: AssistantConfig, persona: impl Into<String>) -> Self {
        let augmentation_available = config.has_credential();
        let greeting = ChatMessage::assistant(
            MessageKind::Greeting,
            &config.phrases.greeting,
            Vec::new(),
        );
        Self {
            persona: persona.into(),
            config,
            augmentation_available,
            messages: vec![greeting],
            state: SessionState::Idle,
            observers: Vec::new(),
        }
    }

    pub fn for_profile(
        config: AssistantConfig,
        profile: &Profile,
        achievements: &[Achievement],
    ) -> Self {
        Self::new(config, persona_instruction(profile, achievements))
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SessionState::Pending
    }

    pub fn augmentation_available(&self) -> bool {
        self.augmentation_available
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn phrases(&self) -> &Phrasebook {
        &self.config.phrases
    }

    pub fn view(&self) -> TranscriptView<'_> {
        TranscriptView {
            messages: &self.messages,
            pending: self.is_pending(),
        }
    }

    pub fn snapshot(&self) -> Transcript {
        self.view().into()
    }

    /// Register a callback that receives a snapshot after every change.
    ///
    /// Observers run while the session is mutably borrowed and must not reach
    /// back into it.
    pub fn subscribe(&mut self, observer: impl FnMut(TranscriptView<'_>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit_change(&mut self) {
        let view = TranscriptView {
            messages: &self.messages,
            pending: self.state == SessionState::Pending,
        };
        for observer in &mut self.observers {
            observer(view);
        }
    }

    /// Phase one of a submission. See the module docs.
    pub fn begin(&mut self, user_text: &str) -> Submission {
        let text = user_text.trim();
        if text.is_empty() || self.is_pending() {
            return Submission::Ignored;
        }

        self.messages.push(ChatMessage::user(text));

        if !self.augmentation_available {
            tracing::info!("assistant has no credential; answering in offline mode");
            let offline = ChatMessage::assistant(
                MessageKind::Offline,
                &self.config.phrases.offline,
                Vec::new(),
            );
            self.messages.push(offline);
            self.emit_change();
            return Submission::Offline;
        }

        self.state = SessionState::Pending;
        self.emit_change();

        Submission::Dispatch(GenerateRequest {
            system_instruction: self.persona.clone(),
            prompt: text.to_string(),
            enable_retrieval: self.config.enable_retrieval,
            temperature: self.config.temperature,
        })
    }

    /// Phase two: record the outcome of the dispatched request.
    ///
    /// Returns `false` (and changes nothing) if no request was pending.
    pub fn finish(&mut self, outcome: Result<GenerateResponse, RemoteError>) -> bool {
        if !self.is_pending() {
            tracing::debug!("ignoring completion with no request in flight");
            return false;
        }

        let phrases = &self.config.phrases;
        let message = match outcome {
            Ok(response) => {
                let sources = dedup_citations(response.citations, &phrases.untitled_source);
                let text = response.text.trim();
                let text = if text.is_empty() {
                    phrases.no_answer.as_str()
                } else {
                    text
                };
                tracing::debug!(
                    chars = text.chars().count(),
                    sources = sources.len(),
                    "assistant reply received"
                );
                ChatMessage::assistant(MessageKind::Reply, text, sources)
            }
            Err(err) => {
                tracing::warn!(error = %err, "assistant request failed");
                ChatMessage::assistant(MessageKind::Failure, &phrases.failure, Vec::new())
            }
        };

        self.messages.push(message);
        self.state = SessionState::Idle;
        self.emit_change();
        true
    }
}

/// Run one full submission against `client`.
///
/// The session is only borrowed briefly before and after the call; while the
/// request is in flight only `session` (a weak handle) is held, so a host that
/// tears the session down mid-call simply gets [`SubmitOutcome::Discarded`].
pub async fn submit<C>(
    session: Weak<RefCell<Session>>,
    client: &C,
    user_text: &str,
) -> SubmitOutcome
where
    C: GenerativeClient + ?Sized,
{
    let submission = match session.upgrade() {
        Some(strong) => {
            let mut session = strong.borrow_mut();
            session.begin(user_text)
        }
        None => return SubmitOutcome::Discarded,
    };

    let request = match submission {
        Submission::Ignored => return SubmitOutcome::Ignored,
        Submission::Offline => return SubmitOutcome::Offline,
        Submission::Dispatch(request) => request,
    };

    let outcome = client.generate(&request).await;

    match session.upgrade() {
        Some(strong) => {
            strong.borrow_mut().finish(outcome);
            SubmitOutcome::Completed
        }
        None => {
            tracing::debug!("session dropped before the reply arrived");
            SubmitOutcome::Discarded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::rc::Rc;

    fn online() -> AssistantConfig {
        AssistantConfig::default().with_api_key(Some("test-key"))
    }

    fn session(config: AssistantConfig) -> Rc<RefCell<Session>> {
        Rc::new(RefCell::new(Session::new(config, "persona")))
    }

    #[derive(Default)]
    struct Scripted {
        replies: RefCell<Vec<Result<GenerateResponse, RemoteError>>>,
        calls: RefCell<Vec<GenerateRequest>>,
    }

    impl Scripted {
        fn replying(reply: Result<GenerateResponse, RemoteError>) -> Self {
            Self {
                replies: RefCell::new(vec![reply]),
                calls: RefCell::default(),
            }
        }
    }

    #[async_trait(?Send)]
    impl GenerativeClient for Scripted {
        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<GenerateResponse, RemoteError> {
            self.calls.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(RemoteError::Transport("script exhausted".into())))
        }
    }

    #[test]
    fn new_session_is_idle_with_greeting() {
        let s = Session::new(AssistantConfig::default(), "p");
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].kind(), MessageKind::Greeting);
        assert_eq!(s.messages()[0].role(), Role::Assistant);
        assert!(!s.augmentation_available());
    }

    #[test]
    fn blank_submissions_change_nothing() {
        let s = session(online());
        let notified = Rc::new(Cell::new(0));
        let n = notified.clone();
        s.borrow_mut().subscribe(move |_| n.set(n.get() + 1));
        let client = Scripted::default();

        for text in ["", "   ", "\n\t"] {
            let out = pollster::block_on(submit(Rc::downgrade(&s), &client, text));
            assert_eq!(out, SubmitOutcome::Ignored);
        }
        assert_eq!(s.borrow().messages().len(), 1);
        assert!(!s.borrow().is_pending());
        assert_eq!(notified.get(), 0);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn offline_mode_answers_locally() {
        let s = session(AssistantConfig::default());
        let client = Scripted::default();

        let out = pollster::block_on(submit(Rc::downgrade(&s), &client, "你好"));
        assert_eq!(out, SubmitOutcome::Offline);
        assert!(client.calls.borrow().is_empty());

        let s = s.borrow();
        let msgs = s.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].role(), Role::User);
        assert_eq!(msgs[1].text(), "你好");
        assert_eq!(msgs[2].kind(), MessageKind::Offline);
        assert_eq!(msgs[2].text(), Phrasebook::default().offline);
        assert!(msgs[2].sources().is_empty());
        assert!(!s.is_pending());
    }

    #[test]
    fn successful_reply_carries_deduplicated_sources() {
        let s = session(online());
        let client = Scripted::replying(Ok(GenerateResponse {
            text: "你好！".into(),
            citations: vec![Citation::new("https://x.com", "")],
        }));

        let out = pollster::block_on(submit(Rc::downgrade(&s), &client, "你好"));
        assert_eq!(out, SubmitOutcome::Completed);

        let s = s.borrow();
        let reply = s.messages().last().unwrap();
        assert_eq!(reply.kind(), MessageKind::Reply);
        assert_eq!(reply.text(), "你好！");
        assert_eq!(
            reply.sources(),
            &[Citation::new("https://x.com", Phrasebook::default().untitled_source)]
        );
        assert!(!s.is_pending());
    }

    #[test]
    fn request_carries_persona_latest_text_and_flags() {
        let s = session(online().with_temperature(0.3).with_retrieval(false));
        let client = Scripted::replying(Ok(GenerateResponse::default()));
        pollster::block_on(submit(Rc::downgrade(&s), &client, "first"));
        let client2 = Scripted::replying(Ok(GenerateResponse::default()));
        pollster::block_on(submit(Rc::downgrade(&s), &client2, "  second  "));

        let calls = client2.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_instruction, "persona");
        assert_eq!(calls[0].prompt, "second");
        assert!(!calls[0].enable_retrieval);
        assert_eq!(calls[0].temperature, 0.3);
    }

    #[test]
    fn remote_failure_becomes_fallback_message() {
        let s = session(online());
        let client = Scripted::replying(Err(RemoteError::Status {
            code: 503,
            message: "overloaded".into(),
        }));

        pollster::block_on(submit(Rc::downgrade(&s), &client, "hello"));
        let s = s.borrow();
        let last = s.messages().last().unwrap();
        assert_eq!(last.kind(), MessageKind::Failure);
        assert_eq!(last.text(), Phrasebook::default().failure);
        assert!(last.sources().is_empty());
        assert!(!s.is_pending());
    }

    #[test]
    fn blank_reply_uses_no_answer_text() {
        let s = session(online());
        let client = Scripted::replying(Ok(GenerateResponse {
            text: "  ".into(),
            citations: Vec::new(),
        }));
        pollster::block_on(submit(Rc::downgrade(&s), &client, "hello"));
        assert_eq!(
            s.borrow().messages().last().unwrap().text(),
            Phrasebook::default().no_answer
        );
    }

    #[test]
    fn second_begin_while_pending_is_ignored() {
        let mut s = Session::new(online(), "p");
        assert!(matches!(s.begin("one"), Submission::Dispatch(_)));
        assert!(s.is_pending());
        assert_eq!(s.begin("two"), Submission::Ignored);
        assert_eq!(s.messages().len(), 2);

        assert!(s.finish(Ok(GenerateResponse {
            text: "ok".into(),
            citations: Vec::new(),
        })));
        assert!(!s.is_pending());
        assert!(matches!(s.begin("two"), Submission::Dispatch(_)));
    }

    #[test]
    fn finish_without_pending_request_is_ignored() {
        let mut s = Session::new(online(), "p");
        assert!(!s.finish(Err(RemoteError::Malformed("late".into()))));
        assert_eq!(s.messages().len(), 1);
    }

    struct Reentrant {
        session: Rc<RefCell<Session>>,
        inner: RefCell<Vec<Submission>>,
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl GenerativeClient for Reentrant {
        async fn generate(
            &self,
            _request: &GenerateRequest,
        ) -> Result<GenerateResponse, RemoteError> {
            self.calls.set(self.calls.get() + 1);
            // A second click arrives while the first call is still out.
            let again = self.session.borrow_mut().begin("again");
            self.inner.borrow_mut().push(again);
            Ok(GenerateResponse {
                text: "done".into(),
                citations: Vec::new(),
            })
        }
    }

    #[test]
    fn submit_while_in_flight_neither_appends_nor_calls() {
        let s = session(online());
        let client = Reentrant {
            session: s.clone(),
            inner: RefCell::default(),
            calls: Cell::new(0),
        };

        let out = pollster::block_on(submit(Rc::downgrade(&s), &client, "first"));
        assert_eq!(out, SubmitOutcome::Completed);
        assert_eq!(client.calls.get(), 1);
        assert_eq!(*client.inner.borrow(), vec![Submission::Ignored]);

        let s = s.borrow();
        let texts: Vec<&str> = s.messages().iter().map(ChatMessage::text).collect();
        assert_eq!(texts[1..], ["first", "done"]);
    }

    struct Dropper {
        slot: RefCell<Option<Rc<RefCell<Session>>>>,
    }

    #[async_trait(?Send)]
    impl GenerativeClient for Dropper {
        async fn generate(
            &self,
            _request: &GenerateRequest,
        ) -> Result<GenerateResponse, RemoteError> {
            // The host unmounts the widget mid-call.
            self.slot.borrow_mut().take();
            Ok(GenerateResponse::default())
        }
    }

    #[test]
    fn late_completion_after_teardown_is_discarded() {
        let s = session(online());
        let weak = Rc::downgrade(&s);
        let client = Dropper {
            slot: RefCell::new(Some(s)),
        };
        let out = pollster::block_on(submit(weak.clone(), &client, "hi"));
        assert_eq!(out, SubmitOutcome::Discarded);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn observers_see_pending_then_idle() {
        let s = session(online());
        let seen: Rc<RefCell<Vec<(usize, bool)>>> = Rc::default();
        let sink = seen.clone();
        s.borrow_mut()
            .subscribe(move |view| sink.borrow_mut().push((view.messages.len(), view.pending)));

        let client = Scripted::replying(Ok(GenerateResponse {
            text: "hi".into(),
            citations: Vec::new(),
        }));
        pollster::block_on(submit(Rc::downgrade(&s), &client, "yo"));
        assert_eq!(*seen.borrow(), vec![(2, true), (3, false)]);

        let snap = s.borrow().snapshot();
        assert_eq!(snap.messages.len(), 3);
        assert!(!snap.pending);
    }

    #[test]
    fn persona_is_built_from_profile() {
        use crate::profile::{ACHIEVEMENTS, OWNER};
        let s = Session::for_profile(online(), &OWNER, ACHIEVEMENTS);
        assert!(s.persona().contains(OWNER.name));
        assert!(s.augmentation_available());
    }
}
