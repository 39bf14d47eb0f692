//! Main application state for the TUI

use super::events::{key_handler, AppAction, AppEvent, EventHandler};
use super::widgets::{
    AccountEntry, AccountList, ColorScheme, HelpDialog, InputDialog, MessageScreen, StatusBar,
    SubmissionTable,
};
use crate::api::HttpSubmissionSource;
use crate::registry::{AccountRegistry, AddOutcome};
use crate::sync::{BatchOutcome, SessionState, SyncEngine};
use crate::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::{ListState, TableState},
    Frame,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Application state
pub struct App {
    engine: SyncEngine,
    session: SessionState,

    // Event handling
    event_handler: EventHandler,

    // UI state
    colors: ColorScheme,
    selected_account: usize,
    list_state: ListState,
    table_state: TableState,
    status_message: String,

    // Input popup; Some while the add-username line is open
    input_buffer: Option<String>,

    // Adds that arrived while a batch was in flight; replayed afterwards
    // so batches never overlap
    pending_adds: VecDeque<String>,

    // Popup state
    show_help: bool,

    // Sync state
    syncing: bool,

    // Exit flag
    should_exit: bool,
}

impl App {
    /// Create the application and kick off the seed-list sync in the background
    pub fn new(config: Config) -> Result<Self> {
        // Note: Don't use tracing in TUI - raw mode conflicts with stdout

        let event_handler = EventHandler::new(Duration::from_millis(250));

        let source = HttpSubmissionSource::new(&config)?;
        let engine = SyncEngine::new(Arc::new(source));
        let session = SessionState::new(AccountRegistry::new(&config.accounts.seeds));

        let mut list_state = ListState::default();
        list_state.select(Some(0));

        let mut app = Self {
            engine,
            session,
            event_handler,
            colors: ColorScheme::default(),
            selected_account: 0,
            list_state,
            table_state: TableState::default(),
            status_message: "Loading submissions...".to_string(),
            input_buffer: None,
            pending_adds: VecDeque::new(),
            show_help: false,
            syncing: false,
            should_exit: false,
        };

        // Startup trigger: one batch over the full seed list
        let seeds = app.session.registry.usernames().to_vec();
        app.start_sync(seeds);

        Ok(app)
    }

    /// Check if the application should exit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Ctrl+C quits from any mode
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_exit = true;
            return;
        }

        // Input popup captures everything else while open
        if self.input_buffer.is_some() {
            self.handle_input_key(key_event);
            return;
        }

        // Help popup closes on Esc/q
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        // An aborted batch takes over the display; allow retry or quit only
        if self.session.error.is_some() {
            match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
                KeyCode::Char('r') => self.refresh(),
                _ => {}
            }
            return;
        }

        match key_handler::key_to_app_action(&key_event) {
            Some(AppAction::Quit) => self.should_exit = true,
            Some(AppAction::AddAccount) => self.input_buffer = Some(String::new()),
            Some(AppAction::Refresh) => self.refresh(),
            Some(AppAction::ShowHelp) => self.show_help = true,
            Some(AppAction::Up) => self.select_previous(),
            Some(AppAction::Down) => self.select_next(),
            None => {}
        }
    }

    /// Keys while the add-username line is open
    fn handle_input_key(&mut self, key_event: KeyEvent) {
        let Some(buffer) = self.input_buffer.as_mut() else {
            return;
        };

        match key_event.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.input_buffer = None;
            }
            KeyCode::Enter => {
                let raw = buffer.clone();
                self.input_buffer = None;
                self.submit_add(raw);
            }
            _ => {}
        }
    }

    /// Queue an add-username request; runs immediately when no batch is in flight
    fn submit_add(&mut self, raw: String) {
        self.pending_adds.push_back(raw);

        if self.syncing {
            self.status_message = "Sync in progress, add queued".to_string();
        } else {
            self.drain_pending_adds();
        }
    }

    /// Register queued names until one triggers a sync or the queue empties
    fn drain_pending_adds(&mut self) {
        while let Some(raw) = self.pending_adds.pop_front() {
            match self.session.registry.add(&raw) {
                AddOutcome::Added(name) => {
                    self.status_message = format!("Added {}, fetching submissions...", name);
                    self.start_sync(vec![name]);
                    return;
                }
                AddOutcome::AlreadyExists(name) => {
                    self.status_message = format!("Username \"{}\" already exists", name);
                }
                AddOutcome::Empty => {}
            }
        }
    }

    /// Re-run the full registry batch; cached accounts are skipped for free
    fn refresh(&mut self) {
        if self.syncing {
            self.status_message = "Sync already in progress".to_string();
            return;
        }
        let batch = self.session.registry.usernames().to_vec();
        self.start_sync(batch);
    }

    /// Start a batch sync in the background
    ///
    /// The session state moves (as a clone) into the task and comes back with
    /// the outcome; `syncing` gates any further batch until then.
    fn start_sync(&mut self, batch: Vec<String>) {
        if batch.is_empty() {
            return;
        }

        self.syncing = true;
        // Mirror the batch-start reset on the UI copy so the error takeover
        // ends as soon as the retry is in flight
        self.session.loading = true;
        self.session.error = None;

        let engine = self.engine.clone();
        let mut session = self.session.clone();
        let sender = self.event_handler.sender();

        tokio::spawn(async move {
            let outcome = engine.sync(&mut session, &batch).await;
            let _ = sender.send(AppEvent::SyncFinished { session, outcome });
        });
    }

    /// Process pending events
    pub async fn update(&mut self) -> Result<()> {
        // Try to get an event without blocking
        if let Ok(event) =
            tokio::time::timeout(Duration::from_millis(1), self.event_handler.next_event()).await
        {
            match event? {
                AppEvent::SyncFinished { session, outcome } => {
                    self.session = session;
                    self.syncing = false;
                    self.apply_outcome(outcome);
                    self.clamp_selection();
                    self.drain_pending_adds();
                }
                AppEvent::StatusUpdate(message) => {
                    self.status_message = message;
                }
                AppEvent::Tick => {}
                AppEvent::Exit => {
                    self.should_exit = true;
                }
            }
        }

        Ok(())
    }

    /// Turn a batch outcome into status/notice text
    fn apply_outcome(&mut self, outcome: BatchOutcome) {
        match outcome {
            BatchOutcome::Completed { fetched, pruned } => {
                if let Some(username) = pruned.first() {
                    // Pruning notice, not an error
                    self.status_message = format!(
                        "User \"{}\" has zero submissions and was not added",
                        username
                    );
                } else if fetched.is_empty() {
                    self.status_message = "Up to date".to_string();
                } else {
                    self.status_message = format!("Fetched {} account(s)", fetched.len());
                }
            }
            BatchOutcome::Aborted { username, .. } => {
                // The full message takes over the display via session.error
                self.status_message = format!("Sync failed for {}", username);
            }
        }
    }

    fn select_previous(&mut self) {
        if self.selected_account > 0 {
            self.selected_account -= 1;
            self.list_state.select(Some(self.selected_account));
            self.table_state = TableState::default();
        }
    }

    fn select_next(&mut self) {
        if self.selected_account + 1 < self.session.registry.len() {
            self.selected_account += 1;
            self.list_state.select(Some(self.selected_account));
            self.table_state = TableState::default();
        }
    }

    /// Keep the selection valid after pruning shrank the registry
    fn clamp_selection(&mut self) {
        let len = self.session.registry.len();
        if len == 0 {
            self.selected_account = 0;
            self.list_state.select(None);
        } else if self.selected_account >= len {
            self.selected_account = len - 1;
            self.list_state.select(Some(self.selected_account));
        }
    }

    /// Draw the application UI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();

        // A batch error takes over the entire display until the next batch
        if let Some(error) = self.session.error.clone() {
            let message = format!("{}\n\nPress r to retry, q to quit", error);
            MessageScreen::new(&message, self.colors.error).render(frame, size);
            return;
        }

        // Initial load: nothing cached yet
        if self.syncing && self.session.cache.is_empty() {
            MessageScreen::new("Loading submissions...", self.colors.text).render(frame, size);
            return;
        }

        // Main content area + status line
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Accounts on the left, submissions on the right
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(vertical_chunks[0]);

        let accounts: Vec<AccountEntry> = self
            .session
            .registry
            .usernames()
            .iter()
            .map(|username| {
                let submissions = self.session.submissions(username);
                AccountEntry {
                    username,
                    today_count: crate::stats::today_count(submissions),
                    cached: self.session.cache.contains_key(username),
                }
            })
            .collect();

        AccountList::new(&accounts, &self.colors).render(
            frame,
            main_chunks[0],
            &mut self.list_state,
        );

        if let Some(username) = self
            .session
            .registry
            .usernames()
            .get(self.selected_account)
            .cloned()
        {
            let submissions = self.session.submissions(&username).to_vec();
            SubmissionTable::new(&username, &submissions, &self.colors).render(
                frame,
                main_chunks[1],
                &mut self.table_state,
            );
        }

        let right_status = if self.syncing {
            "Loading new submissions...".to_string()
        } else {
            format!("{} account(s) | ? for help", self.session.registry.len())
        };
        StatusBar::new(&self.status_message, &right_status, &self.colors)
            .render(frame, vertical_chunks[1]);

        // Popups
        if let Some(buffer) = self.input_buffer.clone() {
            InputDialog::new(&buffer, &self.colors).render(frame, size);
        }
        if self.show_help {
            HelpDialog::new(&self.colors).render(frame, size);
        }
    }
}
