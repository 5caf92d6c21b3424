use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clipboard;
use crate::config::Config;
use crate::controller::{BeginSubmit, ChatController, ChatView};
use crate::events::{AppEvent, TuiEvent};
use crate::markdown::CommonMarkRenderer;
use crate::transport::HttpTransport;
use crate::tui::{EventHandler, Tui};
use crate::ui::contact::{ContactAction, ContactModal, CopyFeedback};
use crate::ui::conversation::{ChatScreen, ComposerResult, ParsedCommand, SlashCommand};
use crate::ui::sidebar::{SidebarInfo, SidebarState};

const SIDEBAR_WIDTH: u16 = 32;
/// Narrower terminals get the sidebar as an overlay
const SPLIT_MIN_WIDTH: u16 = 80;
const PAGE_ROWS: u16 = 10;
const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

type Chat = ChatController<ChatScreen, HttpTransport, CommonMarkRenderer>;

pub struct App {
    config: Config,
    chat: Chat,
    sidebar: SidebarState,
    sidebar_info: SidebarInfo,
    contact: ContactModal,
    should_quit: bool,
    app_tx: mpsc::UnboundedSender<AppEvent>,
    app_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        let sidebar_info = SidebarInfo {
            title: config.ui.title.clone(),
            server: transport.base_url().to_string(),
            contact_email: config.contact_email.clone(),
        };

        let chat = ChatController::new(
            ChatScreen::new(),
            Arc::new(transport),
            CommonMarkRenderer::new(),
            config.chat_path.clone(),
        );
        let (app_tx, app_rx) = mpsc::unbounded_channel();

        Ok(Self {
            sidebar: SidebarState::new(config.ui.show_sidebar),
            contact: ContactModal::new(config.contact_email.clone()),
            sidebar_info,
            chat,
            config,
            should_quit: false,
            app_tx,
            app_rx,
        })
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventHandler::new(self.config.tick_rate());
        info!(server = %self.sidebar_info.server, "chat session started");

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(event) => self.handle_tui_event(event),
                    None => break,
                },
                Some(event) = self.app_rx.recv() => self.handle_app_event(event),
            }
        }

        info!("chat session ended");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let buf = frame.buffer_mut();
        let split = area.width >= SPLIT_MIN_WIDTH;

        let (chat_area, sidebar_area) = if self.sidebar.visible && split {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .split(area);
            (chunks[1], chunks[0])
        } else {
            let overlay = Rect {
                width: SIDEBAR_WIDTH.min(area.width),
                ..area
            };
            (area, overlay)
        };

        self.chat.view_mut().render(chat_area, buf);
        self.sidebar
            .render(sidebar_area, buf, &self.sidebar_info, !split);
        self.contact.render(area, buf);
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => {
                if !self.contact.is_open() {
                    self.chat.view_mut().composer_mut().handle_paste(&text);
                }
            }
            TuiEvent::Resize(width, height) => debug!(width, height, "terminal resized"),
            TuiEvent::Tick => {
                self.chat.view_mut().tick();
                self.contact.tick();
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ReplySettled {
                request_id,
                outcome,
            } => {
                self.chat.settle(request_id, outcome);
                // Settling restores input focus; the modal keeps it while open
                if self.contact.is_open() {
                    self.chat.view_mut().composer_mut().set_focus(false);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('b') => self.sidebar.toggle(),
                KeyCode::Char('k') => self.open_contact(),
                _ => {}
            }
            return;
        }

        if self.contact.is_open() {
            match self.contact.handle_key(key) {
                ContactAction::Close => self.close_contact(),
                ContactAction::Copy => self.copy_contact(),
                ContactAction::None => {}
            }
            return;
        }

        let screen = self.chat.view_mut();
        match key.code {
            KeyCode::PageUp => {
                screen.transcript_mut().scroll_up(PAGE_ROWS);
                return;
            }
            KeyCode::PageDown => {
                screen.transcript_mut().scroll_down(PAGE_ROWS);
                return;
            }
            KeyCode::Esc if !screen.composer().is_palette_open() => {
                self.sidebar.close();
                return;
            }
            _ => {}
        }

        match screen.composer_mut().handle_key(key) {
            ComposerResult::Send => self.send(),
            ComposerResult::Command(command) => self.run_command(command),
            ComposerResult::None => {}
        }
    }

    /// Start a submit and hand the request to a task; the reply comes back
    /// as [`AppEvent::ReplySettled`].
    fn send(&mut self) {
        let pending = match self.chat.begin_from_input() {
            BeginSubmit::Started(pending) => pending,
            BeginSubmit::Ignored | BeginSubmit::Rejected => return,
        };

        let request = self.chat.dispatch(&pending);
        let request_id = pending.request_id;
        let tx = self.app_tx.clone();
        tokio::spawn(async move {
            let outcome = request.await;
            if tx.send(AppEvent::ReplySettled { request_id, outcome }).is_err() {
                debug!(%request_id, "reply arrived after shutdown");
            }
        });
    }

    fn run_command(&mut self, command: ParsedCommand) {
        debug!(command = command.command.command(), "slash command");
        match command.command {
            SlashCommand::Help => self.sidebar.open(),
            SlashCommand::Contact => self.open_contact(),
            SlashCommand::Sidebar => self.sidebar.toggle(),
            SlashCommand::Quit => self.should_quit = true,
        }
    }

    fn open_contact(&mut self) {
        self.contact.open();
        self.chat.view_mut().composer_mut().set_focus(false);
    }

    fn close_contact(&mut self) {
        self.contact.close();
        self.chat.view_mut().focus_input();
    }

    fn copy_contact(&mut self) {
        let tick_ms = self.config.tick_rate().as_millis().max(1);
        let ticks = (FEEDBACK_DURATION.as_millis() / tick_ms).clamp(1, u16::MAX as u128) as u16;

        let feedback = match clipboard::copy_to_clipboard(&mut io::stderr(), self.contact.email()) {
            Ok(()) => CopyFeedback::Copied,
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                CopyFeedback::Failed
            }
        };
        self.contact.show_feedback(feedback, ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(server_url: &str) -> App {
        let config = Config {
            server_url: server_url.to_string(),
            ..Config::default()
        };
        App::new(config).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_sidebar_keys() {
        let mut app = app("http://127.0.0.1:5000");
        assert!(app.sidebar.visible);
        app.handle_key(ctrl('b'));
        assert!(!app.sidebar.visible);
        app.handle_key(ctrl('b'));
        app.handle_key(press(KeyCode::Esc));
        assert!(!app.sidebar.visible);
    }

    #[test]
    fn test_contact_modal_captures_keys() {
        let mut app = app("http://127.0.0.1:5000");
        app.handle_key(ctrl('k'));
        assert!(app.contact.is_open());

        assert!(!app.chat.view().composer().has_focus());

        type_text(&mut app, "x");
        assert_eq!(app.chat.view().input_text(), "");

        app.handle_key(press(KeyCode::Esc));
        assert!(!app.contact.is_open());
        assert!(app.chat.view().composer().has_focus());
    }

    #[tokio::test]
    async fn test_reply_settling_under_modal_keeps_modal_focus() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "pong"})),
            )
            .mount(&server)
            .await;

        let mut app = app(&server.uri());
        type_text(&mut app, "ping");
        app.handle_key(press(KeyCode::Enter));
        app.handle_key(ctrl('k'));

        let event = app.app_rx.recv().await.unwrap();
        app.handle_app_event(event);
        assert!(!app.chat.view().composer().has_focus());

        app.handle_key(press(KeyCode::Esc));
        assert!(app.chat.view().composer().has_focus());
    }

    #[test]
    fn test_slash_commands_stay_local() {
        let mut app = app("http://127.0.0.1:5000");
        type_text(&mut app, "/contact");
        app.handle_key(press(KeyCode::Enter));
        assert!(app.contact.is_open());
        assert!(app.chat.view().transcript().is_empty());

        app.handle_key(press(KeyCode::Esc));
        type_text(&mut app, "/quit");
        app.handle_key(press(KeyCode::Enter));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app("http://127.0.0.1:5000");
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_enter_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "pong"})),
            )
            .mount(&server)
            .await;

        let mut app = app(&server.uri());
        type_text(&mut app, "ping");
        app.handle_key(press(KeyCode::Enter));

        assert!(app.chat.is_pending());
        assert!(!app.chat.view().composer().send_enabled());
        assert_eq!(app.chat.view().input_text(), "");

        let event = app.app_rx.recv().await.unwrap();
        app.handle_app_event(event);

        assert!(!app.chat.is_pending());
        assert!(app.chat.view().composer().send_enabled());
        let markups: Vec<String> = app
            .chat
            .view()
            .transcript()
            .bubbles()
            .map(|b| b.markup.clone())
            .collect();
        assert_eq!(markups, vec!["ping".to_string(), "<p>pong</p>\n".to_string()]);
    }

    #[tokio::test]
    async fn test_enter_while_pending_keeps_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "late"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let mut app = app(&server.uri());
        type_text(&mut app, "first");
        app.handle_key(press(KeyCode::Enter));
        type_text(&mut app, "second");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.chat.view().input_text(), "second");
        assert_eq!(app.chat.view().transcript().len(), 1);

        let event = app.app_rx.recv().await.unwrap();
        app.handle_app_event(event);
        assert_eq!(app.chat.view().transcript().len(), 2);
    }

    #[test]
    fn test_tick_expires_copy_feedback() {
        let mut app = app("http://127.0.0.1:5000");
        app.contact.open();
        app.contact.show_feedback(CopyFeedback::Copied, 1);
        app.handle_tui_event(TuiEvent::Tick);
        assert_eq!(app.contact.feedback(), None);
    }
}
