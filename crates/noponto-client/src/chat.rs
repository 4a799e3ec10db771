//! Glue between user input, the auth manager and the transcript.
//!
//! [`ChatController::send`] is what the message input calls; its
//! [`SendOutcome`] tells the presentation layer whether to keep going, show
//! the inline error that was appended, or redirect to login.
//! [`submit_login`] plays the same role for the login form.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use noponto_shared::constants::{MSG_EMPTY_ANSWER, MSG_GENERIC_ERROR, MSG_SESSION_EXPIRED};
use noponto_shared::sanitize::{sanitize_input, validate_credentials};
use noponto_shared::types::{Conversation, ConversationId, Message};

use crate::auth::{AskOutcome, AuthSessionManager, LoginResult};
use crate::transcript::ChatTranscript;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent: empty input, or another send still in flight.
    Ignored,
    /// The answer was appended to the transcript.
    Answered,
    /// An error message was appended; the user may try again.
    Failed,
    /// The session is gone. An explanatory message was appended and the
    /// caller must redirect to login.
    SessionExpired,
}

impl SendOutcome {
    pub fn requires_login(self) -> bool {
        self == SendOutcome::SessionExpired
    }
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ChatController {
    auth: Arc<AuthSessionManager>,
    transcript: Mutex<ChatTranscript>,
    in_flight: AtomicBool,
}

impl ChatController {
    pub fn new(auth: Arc<AuthSessionManager>, greeting: impl Into<String>) -> Self {
        Self {
            auth,
            transcript: Mutex::new(ChatTranscript::new(greeting)),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn auth(&self) -> &AuthSessionManager {
        &self.auth
    }

    fn transcript(&self) -> MutexGuard<'_, ChatTranscript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.transcript().messages().to_vec()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.transcript().conversations().to_vec()
    }

    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.transcript().active_conversation_id()
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn new_chat(&self) {
        self.transcript().new_chat();
    }

    pub fn load_conversation(&self, id: ConversationId) -> bool {
        self.transcript().load_conversation(id)
    }

    /// Send `input` as a question and append the reply.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let question = sanitize_input(input);
        if question.is_empty() {
            return SendOutcome::Ignored;
        }

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Send already in flight, ignoring input");
            return SendOutcome::Ignored;
        };

        self.transcript().add_message(Message::user(question.clone()));

        let (reply, outcome) = match self.auth.ask(&question).await {
            Ok(AskOutcome::Answer(answer)) if answer.trim().is_empty() => {
                (MSG_EMPTY_ANSWER.to_string(), SendOutcome::Answered)
            }
            Ok(AskOutcome::Answer(answer)) => (answer, SendOutcome::Answered),
            Ok(AskOutcome::Rejected { status, message }) => {
                warn!(status, message = ?message, "Question rejected");
                (MSG_GENERIC_ERROR.to_string(), SendOutcome::Failed)
            }
            Err(e) if e.requires_login() => {
                warn!(error = %e, "Session lost while asking");
                (MSG_SESSION_EXPIRED.to_string(), SendOutcome::SessionExpired)
            }
            Err(e) => {
                error!(error = %e, "Failed to ask question");
                (MSG_GENERIC_ERROR.to_string(), SendOutcome::Failed)
            }
        };

        self.transcript().add_message(Message::bot(reply));
        outcome
    }
}

/// What the login form should do after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginFormOutcome {
    /// Logged in; navigate to the chat.
    Authenticated(LoginResult),
    /// Show this message inline and stay on the form.
    Rejected(String),
}

/// Validate the login form and, if it passes, log in.
///
/// Invalid input is rejected before any network call.
pub async fn submit_login(
    auth: &AuthSessionManager,
    email: &str,
    password: &str,
) -> LoginFormOutcome {
    let credentials = match validate_credentials(email, password) {
        Ok(credentials) => credentials,
        Err(e) => {
            debug!(error = %e, "Login form rejected");
            return LoginFormOutcome::Rejected(e.to_string());
        }
    };

    let result = auth.login(&credentials.email, &credentials.password).await;
    if result.success {
        LoginFormOutcome::Authenticated(result)
    } else {
        LoginFormOutcome::Rejected(result.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use axum::routing::post;
    use axum::{Json, Router};
    use noponto_shared::types::Sender;
    use noponto_store::{SessionStore, StoredToken};
    use serde_json::json;

    use crate::test_support::{dead_url, dev_server, harness, serve_router, T0};

    const GREETING: &str = "Olá!";

    #[tokio::test]
    async fn test_send_answers_and_records_conversation() {
        let (url, _state) = dev_server().await;
        let h = harness(&url);
        assert!(h.auth.login("admin@teste.com", "123456").await.success);
        let chat = ChatController::new(h.auth.clone(), GREETING);

        let outcome = chat.send("  Qual o horário?  ").await;

        assert_eq!(outcome, SendOutcome::Answered);
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "Qual o horário?");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert!(messages[2].content.contains("Qual o horário?"));

        let conversations = chat.conversations();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].title, "Qual o horário?");
        assert_eq!(conversations[0].transcript, messages);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let h = harness("http://unused");
        let chat = ChatController::new(h.auth.clone(), GREETING);

        assert_eq!(chat.send("   \n ").await, SendOutcome::Ignored);
        assert_eq!(chat.messages().len(), 1);
        assert!(chat.conversations().is_empty());
    }

    #[tokio::test]
    async fn test_send_without_session_requires_login() {
        let h = harness("http://unused");
        let chat = ChatController::new(h.auth.clone(), GREETING);

        let outcome = chat.send("oi").await;

        assert_eq!(outcome, SendOutcome::SessionExpired);
        assert!(outcome.requires_login());
        let last = chat.messages().pop().unwrap();
        assert_eq!(last.content, MSG_SESSION_EXPIRED);
    }

    #[tokio::test]
    async fn test_server_401_requires_login_and_clears_session() {
        let (url, _state) = dev_server().await;
        let h = harness(&url);
        h.store.store_token(StoredToken::new("forged", T0));
        let chat = ChatController::new(h.auth.clone(), GREETING);

        assert_eq!(chat.send("oi").await, SendOutcome::SessionExpired);
        assert!(h.store.load().token.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_appends_generic_error() {
        let h = harness(&dead_url().await);
        h.store.store_token(StoredToken::new("tok", T0));
        let chat = ChatController::new(h.auth.clone(), GREETING);

        assert_eq!(chat.send("oi").await, SendOutcome::Failed);
        assert_eq!(chat.messages().pop().unwrap().content, MSG_GENERIC_ERROR);
        assert!(h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_empty_answer_replaced_with_fallback() {
        let url = serve_router(Router::new().route(
            "/ask",
            post(|| async { Json(json!({ "success": true, "data": { "answer": "" } })) }),
        ))
        .await;
        let h = harness(&url);
        h.store.store_token(StoredToken::new("tok", T0));
        let chat = ChatController::new(h.auth.clone(), GREETING);

        assert_eq!(chat.send("oi").await, SendOutcome::Answered);
        assert_eq!(chat.messages().pop().unwrap().content, MSG_EMPTY_ANSWER);
    }

    #[tokio::test]
    async fn test_malformed_answer_is_a_failure() {
        let url = serve_router(Router::new().route(
            "/ask",
            post(|| async {
                Json(json!({ "success": true, "data": { "answer": { "content": "x" } } }))
            }),
        ))
        .await;
        let h = harness(&url);
        h.store.store_token(StoredToken::new("tok", T0));
        let chat = ChatController::new(h.auth.clone(), GREETING);

        assert_eq!(chat.send("oi").await, SendOutcome::Failed);
        assert_eq!(chat.messages().pop().unwrap().content, MSG_GENERIC_ERROR);
    }

    #[tokio::test]
    async fn test_second_send_while_in_flight_is_ignored() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let url = serve_router(Router::new().route(
            "/ask",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Json(json!({ "success": true, "data": { "answer": "ok" } }))
                }
            }),
        ))
        .await;
        let h = harness(&url);
        h.store.store_token(StoredToken::new("tok", T0));
        let chat = ChatController::new(h.auth.clone(), GREETING);

        let (first, second) = tokio::join!(chat.send("um"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(chat.is_sending());
            chat.send("dois").await
        });

        assert_eq!(first, SendOutcome::Answered);
        assert_eq!(second, SendOutcome::Ignored);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!chat.is_sending());
    }

    #[tokio::test]
    async fn test_new_chat_and_load_through_controller() {
        let (url, _state) = dev_server().await;
        let h = harness(&url);
        assert!(h.auth.login("admin@teste.com", "123456").await.success);
        let chat = ChatController::new(h.auth.clone(), GREETING);

        chat.send("primeira").await;
        let id = chat.active_conversation_id().unwrap();
        let saved = chat.messages();

        chat.new_chat();
        assert_eq!(chat.messages().len(), 1);
        assert!(chat.load_conversation(id));
        assert_eq!(chat.messages(), saved);
    }

    #[tokio::test]
    async fn test_submit_login_validates_before_network() {
        let h = harness(&dead_url().await);

        assert_eq!(
            submit_login(&h.auth, "not-an-email", "123456").await,
            LoginFormOutcome::Rejected("Email inválido".into())
        );
        assert_eq!(
            submit_login(&h.auth, "admin@teste.com", "123").await,
            LoginFormOutcome::Rejected("Senha deve ter entre 6 e 128 caracteres".into())
        );
    }

    #[tokio::test]
    async fn test_submit_login_outcomes() {
        let (url, _state) = dev_server().await;
        let h = harness(&url);

        assert_eq!(
            submit_login(&h.auth, "x@x.com", "wrong-password").await,
            LoginFormOutcome::Rejected("Credenciais inválidas".into())
        );

        match submit_login(&h.auth, " admin@teste.com ", "123456").await {
            LoginFormOutcome::Authenticated(result) => assert!(result.token.is_some()),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(h.auth.display_email().as_deref(), Some("admin@teste.com"));
    }
}
