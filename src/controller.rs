//! The send/receive cycle of the chat surface.
//!
//! `Idle --submit--> Pending --(reply | failure)--> Idle`
//!
//! The controller owns the cycle but not the pixels: everything visible goes
//! through the injected [`ChatView`]. A submit can run as one `await`
//! ([`ChatController::submit`]) or be split around a spawned task
//! ([`ChatController::begin_submit`], [`ChatController::dispatch`],
//! [`ChatController::settle`]) so an event loop keeps drawing while the
//! request is in flight.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::escape::escape_html;
use crate::events::{Bubble, ChatRole, Message};
use crate::markdown::MarkdownRenderer;
use crate::protocol::{ChatReply, ChatRequest, ReplyKind};
use crate::transport::{Transport, TransportError};

/// Prefix of a bot bubble that reports a server-side error.
pub const ERROR_MARKER: &str = "🚨 Error: ";

/// Bot bubble shown when the backend could not be reached or understood.
pub const CONNECTION_FAILED: &str = "❌ Failed to connect to server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
}

/// The surface the controller drives: transcript, input field, send control
/// and loading indicator.
pub trait ChatView {
    fn input_text(&self) -> String;
    fn clear_input(&mut self);
    fn focus_input(&mut self);
    fn append_bubble(&mut self, bubble: Bubble);
    fn scroll_to_end(&mut self);
    fn set_send_enabled(&mut self, enabled: bool);
    fn set_loading(&mut self, visible: bool);
}

/// How a submit ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// A request was already in flight, nothing happened
    Rejected,
    /// The backend answered
    Answered,
    /// The backend reported an error
    ServerError,
    /// Transport failure, fallback bubble shown
    Failed,
}

/// A request that has been started but not settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub request_id: Uuid,
    pub request: ChatRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginSubmit {
    Started(PendingSend),
    Ignored,
    Rejected,
}

pub struct ChatController<V, T, R> {
    view: V,
    transport: Arc<T>,
    renderer: R,
    endpoint: String,
    state: RequestState,
    in_flight: Option<Uuid>,
}

impl<V, T, R> ChatController<V, T, R>
where
    V: ChatView,
    T: Transport + 'static,
    R: MarkdownRenderer,
{
    pub fn new(view: V, transport: Arc<T>, renderer: R, endpoint: impl Into<String>) -> Self {
        Self {
            view,
            transport,
            renderer,
            endpoint: endpoint.into(),
            state: RequestState::Idle,
            in_flight: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    /// Submit whatever is in the view's input field.
    pub fn begin_from_input(&mut self) -> BeginSubmit {
        let text = self.view.input_text();
        self.begin_submit(&text)
    }

    /// First half of a submit: validate, show the user bubble, enter Pending.
    pub fn begin_submit(&mut self, message: &str) -> BeginSubmit {
        let message = message.trim();
        if message.is_empty() {
            return BeginSubmit::Ignored;
        }
        if self.is_pending() {
            debug!("send rejected, a request is already in flight");
            return BeginSubmit::Rejected;
        }

        let user = Message {
            role: ChatRole::User,
            raw_text: message.to_string(),
        };
        let bubble = self.bubble_for(&user);
        self.view.append_bubble(bubble);
        self.view.clear_input();
        self.view.scroll_to_end();

        let request_id = Uuid::new_v4();
        self.state = RequestState::Pending;
        self.in_flight = Some(request_id);
        self.view.set_send_enabled(false);
        self.view.set_loading(true);
        self.view.scroll_to_end();

        debug!(%request_id, "state Idle -> Pending");
        BeginSubmit::Started(PendingSend {
            request_id,
            request: ChatRequest::new(user.raw_text),
        })
    }

    /// The network step of a started submit. The returned future owns what it
    /// needs, so it can be awaited in place or spawned.
    pub fn dispatch(
        &self,
        pending: &PendingSend,
    ) -> BoxFuture<'static, Result<ChatReply, TransportError>> {
        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();
        let request = pending.request.clone();
        let span = info_span!("chat_request", request_id = %pending.request_id);

        async move {
            info!(endpoint = %endpoint, "sending chat message");
            transport.post(&endpoint, &request).await
        }
        .instrument(span)
        .boxed()
    }

    /// Second half of a submit: render the reply (or the fallback) and return
    /// to Idle. Returns `None` for an outcome that does not belong to the
    /// request in flight.
    pub fn settle(
        &mut self,
        request_id: Uuid,
        outcome: Result<ChatReply, TransportError>,
    ) -> Option<SubmitOutcome> {
        if self.in_flight != Some(request_id) {
            warn!(%request_id, "ignoring reply for a request that is not in flight");
            return None;
        }

        self.view.set_loading(false);

        let kind = outcome.and_then(|reply| reply.into_kind().ok_or(TransportError::EmptyReply));
        let result = match kind {
            Ok(ReplyKind::Answer(text)) => {
                self.append_bot(text);
                SubmitOutcome::Answered
            }
            Ok(ReplyKind::ServerError(error)) => {
                info!(%request_id, %error, "backend reported an error");
                self.append_bot(format!("{ERROR_MARKER}{error}"));
                SubmitOutcome::ServerError
            }
            Err(e) => {
                warn!(%request_id, error = %e, "chat request failed");
                self.view
                    .append_bubble(Bubble::new(ChatRole::Bot, CONNECTION_FAILED.to_string()));
                SubmitOutcome::Failed
            }
        };

        self.state = RequestState::Idle;
        self.in_flight = None;
        self.view.set_send_enabled(true);
        self.view.scroll_to_end();
        self.view.focus_input();

        debug!(%request_id, ?result, "state Pending -> Idle");
        Some(result)
    }

    /// The whole cycle in one call.
    pub async fn submit(&mut self, message: &str) -> SubmitOutcome {
        let pending = match self.begin_submit(message) {
            BeginSubmit::Started(pending) => pending,
            BeginSubmit::Ignored => return SubmitOutcome::Ignored,
            BeginSubmit::Rejected => return SubmitOutcome::Rejected,
        };

        let outcome = self.dispatch(&pending).await;
        self.settle(pending.request_id, outcome)
            .unwrap_or(SubmitOutcome::Failed)
    }

    fn append_bot(&mut self, raw_text: String) {
        let bot = Message {
            role: ChatRole::Bot,
            raw_text,
        };
        let bubble = self.bubble_for(&bot);
        self.view.append_bubble(bubble);
    }

    fn bubble_for(&self, message: &Message) -> Bubble {
        let markup = match message.role {
            ChatRole::User => escape_html(&message.raw_text),
            ChatRole::Bot => self.renderer.render(&message.raw_text),
        };
        Bubble::new(message.role, markup)
    }
}
