use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::KeyEvent;
use log::{debug, error, info};

use crate::event::AppEvent;
use crate::session::{FetchOutcome, FetchReport, Session, fetch_word};
use crate::store::history::{HistoryStore, filter_history};
use crate::swipe::{SwipeController, SwipeOutcome};
use crate::ui::search_input::{InputResult, SearchInput};
use crate::ui::theme::Theme;
use crate::word::provider::WordProvider;
use crate::word::record::WordRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    History,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// A dismissible message box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn error(message: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.to_string(),
        }
    }

    fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success".to_string(),
            message: message.to_string(),
        }
    }
}

/// State of the history screen.
#[derive(Default)]
pub struct HistoryView {
    pub records: Vec<WordRecord>,
    pub search: SearchInput,
    pub searching: bool,
    pub selected: usize,
    pub confirm_clear: bool,
}

impl HistoryView {
    pub fn filtered(&self) -> Vec<&WordRecord> {
        filter_history(&self.records, self.search.query())
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub struct App {
    pub screen: AppScreen,
    pub theme: Theme,
    pub session: Session,
    pub swipe: SwipeController,
    pub history_view: HistoryView,
    pub notices: VecDeque<Notice>,
    pub should_quit: bool,
    history: Arc<HistoryStore>,
    provider: Arc<dyn WordProvider>,
    events: Sender<AppEvent>,
    drag_origin: Option<u16>,
}

impl App {
    pub fn new(
        theme: Theme,
        history: Arc<HistoryStore>,
        provider: Arc<dyn WordProvider>,
        events: Sender<AppEvent>,
        viewport_width: u16,
    ) -> Self {
        let mut app = Self {
            screen: AppScreen::Home,
            theme,
            session: Session::new(),
            swipe: SwipeController::new(viewport_width as f64),
            history_view: HistoryView::default(),
            notices: VecDeque::new(),
            should_quit: false,
            history,
            provider,
            events,
            drag_origin: None,
        };
        if app.session.start() {
            app.spawn_fetch();
        }
        app
    }

    /// The card is only on screen, and only takes input, when a word is
    /// showing and no fetch is running.
    pub fn card_visible(&self) -> bool {
        self.session.current().is_some() && !self.session.is_fetching()
    }

    fn spawn_fetch(&self) {
        let provider = Arc::clone(&self.provider);
        let history = Arc::clone(&self.history);
        let tx = self.events.clone();
        thread::spawn(move || {
            let report = fetch_word(provider.as_ref(), &history, Utc::now());
            if tx.send(AppEvent::Fetched(report)).is_err() {
                debug!("fetch finished after the UI loop exited");
            }
        });
    }

    fn request_fetch(&mut self) {
        if self.session.request_fetch() {
            self.spawn_fetch();
        }
    }

    pub fn on_fetched(&mut self, report: FetchReport) {
        match self.session.complete_fetch(report) {
            FetchOutcome::Shown { added } => {
                if let Some(word) = self.session.current() {
                    info!("showing {:?} (new to history: {added})", word.word);
                }
            }
            FetchOutcome::ShownUnsaved(e) => {
                error!("word shown but not saved: {e}");
                self.notices
                    .push_back(Notice::error("Word shown but not saved to history."));
            }
            FetchOutcome::Failed(e) => {
                error!("error fetching word: {e}");
                self.notices.push_back(Notice::error(
                    "Failed to fetch a new word. Please try again.",
                ));
            }
        }
    }

    /// Step animations by `dt` and act on a finished swipe.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(outcome) = self.swipe.advance(dt) {
            self.on_swipe(outcome);
        }
    }

    fn on_swipe(&mut self, outcome: SwipeOutcome) {
        match outcome {
            SwipeOutcome::Forward => self.request_fetch(),
            SwipeOutcome::Backward => {
                if !self.session.go_to_previous() {
                    debug!("no earlier word this session");
                }
            }
        }
    }

    /// The "new word" button: swipe the card away when one is showing,
    /// otherwise fetch directly.
    pub fn new_word(&mut self) {
        if self.session.is_fetching() {
            return;
        }
        if self.card_visible() {
            self.drag_origin = None;
            self.swipe.commit_forward();
        } else {
            self.request_fetch();
        }
    }

    pub fn previous_word(&mut self) {
        if self.card_visible() {
            self.drag_origin = None;
            self.swipe.commit_backward();
        }
    }

    pub fn resize(&mut self, width: u16) {
        self.swipe.set_viewport_width(width as f64);
    }

    /// Notices are modal, so a drag can only begin with none open.
    pub fn drag_start(&mut self, column: u16) {
        if self.card_visible() && self.notices.is_empty() && !self.swipe.is_animating() {
            self.drag_origin = Some(column);
            self.swipe.on_drag_update(0.0);
        }
    }

    /// A drag whose card went away mid-gesture is dropped.
    pub fn drag_move(&mut self, column: u16) {
        if !self.card_visible() {
            self.drag_origin = None;
            return;
        }
        if let Some(origin) = self.drag_origin {
            self.swipe.on_drag_update(column as f64 - origin as f64);
        }
    }

    pub fn drag_end(&mut self, column: u16) {
        let Some(origin) = self.drag_origin.take() else {
            return;
        };
        if self.card_visible() {
            self.swipe.on_drag_end(column as f64 - origin as f64);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn open_history(&mut self) {
        self.screen = AppScreen::History;
        self.history_view.confirm_clear = false;
        self.history_view.searching = false;
        self.reload_history();
    }

    pub fn reload_history(&mut self) {
        match self.history.read_all() {
            Ok(records) => {
                debug!("history loaded: {} items", records.len());
                self.history_view.records = records;
                self.history_view.clamp_selection();
            }
            Err(e) => {
                error!("error loading history: {e}");
                self.notices.push_back(Notice::error("Failed to load history."));
            }
        }
    }

    /// Back to the card screen; the home view becoming active fetches if
    /// nothing is showing.
    pub fn close_history(&mut self) {
        self.screen = AppScreen::Home;
        self.history_view.confirm_clear = false;
        if self.session.on_activate() {
            self.spawn_fetch();
        }
    }

    pub fn request_clear(&mut self) {
        if !self.history_view.records.is_empty() {
            self.history_view.confirm_clear = true;
        }
    }

    pub fn cancel_clear(&mut self) {
        self.history_view.confirm_clear = false;
    }

    pub fn confirm_clear(&mut self) {
        self.history_view.confirm_clear = false;
        match self.history.clear() {
            Ok(true) => {
                self.history_view.records.clear();
                self.history_view.search.clear();
                self.history_view.selected = 0;
                self.notices
                    .push_back(Notice::success("History has been cleared."));
            }
            Ok(false) => {
                self.notices.push_back(Notice::error("Failed to clear history."));
            }
            Err(e) => {
                error!("error clearing history: {e}");
                self.notices.push_back(Notice::error("Failed to clear history."));
            }
        }
    }

    pub fn start_search(&mut self) {
        self.history_view.searching = true;
    }

    pub fn search_key(&mut self, key: KeyEvent) {
        match self.history_view.search.handle(key) {
            InputResult::Editing => {
                self.history_view.selected = 0;
            }
            InputResult::Done | InputResult::Leave => {
                self.history_view.searching = false;
            }
        }
    }

    pub fn clear_search(&mut self) {
        self.history_view.search.clear();
        self.history_view.selected = 0;
    }

    pub fn select_next(&mut self) {
        self.history_view.selected += 1;
        self.history_view.clamp_selection();
    }

    pub fn select_prev(&mut self) {
        self.history_view.selected = self.history_view.selected.saturating_sub(1);
    }
}
