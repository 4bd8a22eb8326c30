use anyhow::Result;
use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::Receiver;
use std::time::Instant;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::form::{Form, FormAction, FormKind, Submission};
use crate::logging::FlashMessage;
use crate::models::{CapacityFilter, Room, RoomFilter, RoomRegistry};
use crate::storage::{Config, RoomStorage};
use crate::ui;
use crate::ui::Theme;

/// Application mode determines which keybindings are active
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the room list
    #[default]
    Normal,
    /// Typing a room number search (activated with '/')
    Search,
    /// Filling in one of the forms
    Form,
    /// Delete confirmation dialog
    Confirm,
    /// Help overlay (activated with '?')
    Help,
}

/// Result of the last allocation or deallocation, shown in the side panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub headline: String,
    pub details: Vec<String>,
}

impl Outcome {
    fn allocated(room: &Room) -> Self {
        let mut details = vec![format!("Capacity: {}", room.capacity_label())];
        if room.has_ac {
            details.push("AC: Yes".to_string());
        }
        if room.has_attached_washroom {
            details.push("Attached Washroom: Yes".to_string());
        }
        Outcome {
            success: true,
            headline: format!("Room {} has been allocated!", room.room_no),
            details,
        }
    }

    fn freed(room_no: &str) -> Self {
        Outcome {
            success: true,
            headline: format!("Room {} is now free", room_no),
            details: Vec::new(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            headline: message.into(),
            details: Vec::new(),
        }
    }
}

/// Main application state
pub struct App {
    /// Current interaction mode
    pub mode: AppMode,

    /// Rooms and occupancy (loaded from storage)
    pub registry: RoomRegistry,

    /// Where the registry is saved after every change
    storage: Box<dyn RoomStorage>,

    /// Application configuration
    pub config: Config,

    theme: Theme,

    /// Active list filter; `search` mirrors `search_input`
    pub filter: RoomFilter,

    /// Search input with cursor support
    pub search_input: Input,

    /// Currently selected index in the visible list
    pub selected_index: usize,

    /// Open form (when in Form mode)
    pub form: Option<Form>,

    /// Result box of the last allocate/release
    pub outcome: Option<Outcome>,

    /// Room waiting for delete confirmation
    pub pending_delete: Option<String>,

    /// Startup error message (shown in modal, dismissible with any key)
    pub startup_error: Option<String>,

    /// Flag to request application exit
    pub should_quit: bool,

    /// Notifications displayed under the side panel
    pub flash_messages: Vec<FlashMessage>,

    /// Receiver for notifications from the logger
    flash_rx: Option<Receiver<FlashMessage>>,
}

impl App {
    pub fn new(
        registry: RoomRegistry,
        storage: Box<dyn RoomStorage>,
        config: Config,
        flash_rx: Option<Receiver<FlashMessage>>,
    ) -> Self {
        let (theme, startup_error) = match Theme::load(&config.general.theme) {
            Ok(t) => (t, None),
            Err(e) => {
                log::error!("Failed to load theme '{}': {}", config.general.theme, e);
                (Theme::default(), Some(e.to_string()))
            }
        };

        App {
            mode: AppMode::default(),
            registry,
            storage,
            config,
            theme,
            filter: RoomFilter::default(),
            search_input: Input::default(),
            selected_index: 0,
            form: None,
            outcome: None,
            pending_delete: None,
            startup_error,
            should_quit: false,
            flash_messages: Vec::new(),
            flash_rx,
        }
    }

    /// Poll flash message receiver and add to queue
    pub fn poll_flash_messages(&mut self) {
        if let Some(rx) = &self.flash_rx {
            while let Ok(msg) = rx.try_recv() {
                self.flash_messages.push(msg);
            }
        }
    }

    /// Remove expired flash messages (based on config duration)
    pub fn prune_flash_messages(&mut self) {
        if self.flash_messages.is_empty() {
            return;
        }

        let now = Instant::now();
        let duration_ms = self.config.general.flash_message_duration_ms;
        self.flash_messages
            .retain(|msg| now.duration_since(msg.timestamp).as_millis() < duration_ms as u128);
    }

    /// Rooms passing the current search and filters
    pub fn visible_rooms(&self) -> Vec<&Room> {
        self.registry.filter(&self.filter)
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.visible_rooms().get(self.selected_index).copied()
    }

    /// Keep the selection inside the visible list
    fn clamp_selection(&mut self) {
        let visible_count = self.visible_rooms().len();
        if visible_count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= visible_count {
            self.selected_index = visible_count - 1;
        }
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.registry)
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let visible_count = self.visible_rooms().len();
        if visible_count > 0 {
            self.selected_index = (self.selected_index + n).min(visible_count - 1);
        }
    }

    pub fn jump_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        let visible_count = self.visible_rooms().len();
        if visible_count > 0 {
            self.selected_index = visible_count - 1;
        }
    }

    pub fn open_form(&mut self, kind: FormKind) {
        let form = match kind {
            FormKind::Release => match self.selected_room() {
                Some(room) if self.registry.is_allocated(&room.room_no) => {
                    Form::release_for(&room.room_no)
                }
                _ => Form::new(kind),
            },
            _ => Form::new(kind),
        };
        self.form = Some(form);
        self.mode = AppMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = AppMode::Normal;
    }

    /// Run the operation behind the open form
    /// The form stays open on validation errors so it can be corrected
    pub fn submit_form(&mut self) -> Result<()> {
        let submission = match self.form.as_ref().map(Form::submission) {
            Some(Ok(submission)) => submission,
            Some(Err(e)) => {
                log::error!("{}", e);
                return Ok(());
            }
            None => {
                self.mode = AppMode::Normal;
                return Ok(());
            }
        };

        match submission {
            Submission::AddRoom(room) => {
                self.add_room(&room.room_no, room.capacity, room.has_ac, room.has_washroom)
            }
            Submission::Allocate(request) => {
                self.allocate(request.students, request.needs_ac, request.needs_washroom)
            }
            Submission::Release(room_no) => self.release(&room_no),
        }
    }

    /// Register a room; on success the add form is reset for the next one
    pub fn add_room(
        &mut self,
        room_no: &str,
        capacity: u32,
        has_ac: bool,
        has_washroom: bool,
    ) -> Result<()> {
        match self.registry.add_room(room_no, capacity, has_ac, has_washroom) {
            Ok(room) => {
                log::info!("Room {} added successfully!", room.room_no);
                self.persist()?;
                if let Some(form) = self.form.as_mut() {
                    form.reset();
                }
            }
            Err(e) => log::error!("{}", e),
        }
        Ok(())
    }

    pub fn allocate(&mut self, students: u32, needs_ac: bool, needs_washroom: bool) -> Result<()> {
        match self.registry.allocate(students, needs_ac, needs_washroom) {
            Ok(room) => {
                log::info!("Allocated room {} for {} students", room.room_no, students);
                self.outcome = Some(Outcome::allocated(&room));
                self.persist()?;
            }
            Err(e) => {
                log::debug!("Allocation failed: {}", e);
                self.outcome = Some(Outcome::failed(e.to_string()));
            }
        }
        Ok(())
    }

    pub fn release(&mut self, room_no: &str) -> Result<()> {
        match self.registry.release(room_no) {
            Ok(()) => {
                log::info!("Room {} released", room_no.trim());
                self.outcome = Some(Outcome::freed(room_no.trim()));
                self.persist()?;
                if let Some(form) = self.form.as_mut() {
                    form.reset();
                }
            }
            Err(e) => {
                log::debug!("Release failed: {}", e);
                self.outcome = Some(Outcome::failed(e.to_string()));
            }
        }
        Ok(())
    }

    /// Ask for confirmation (if configured) before deleting the selected room
    pub fn request_delete(&mut self) -> Result<()> {
        let Some(room_no) = self.selected_room().map(|r| r.room_no.clone()) else {
            return Ok(());
        };

        if self.config.general.confirm_delete {
            self.pending_delete = Some(room_no);
            self.mode = AppMode::Confirm;
            Ok(())
        } else {
            self.delete_room(&room_no)
        }
    }

    pub fn delete_room(&mut self, room_no: &str) -> Result<()> {
        if self.registry.delete_room(room_no) {
            log::info!("Room {} deleted", room_no);
            self.persist()?;
        }
        self.clamp_selection();
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> Result<()> {
        self.mode = AppMode::Normal;
        match self.pending_delete.take() {
            Some(room_no) => self.delete_room(&room_no),
            None => Ok(()),
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.pending_delete = None;
        self.mode = AppMode::Normal;
    }

    /// Re-apply the search text after it changed
    pub fn update_search(&mut self) {
        self.filter.search = self.search_input.value().to_string();
        self.selected_index = 0;
    }

    pub fn clear_search(&mut self) {
        self.search_input.reset();
        self.update_search();
    }

    pub fn cycle_capacity_filter(&mut self) {
        self.filter.capacity = CapacityFilter::cycle(self.filter.capacity);
        self.selected_index = 0;
    }

    pub fn cycle_ac_filter(&mut self) {
        self.filter.ac = self.filter.ac.cycle();
        self.selected_index = 0;
    }

    pub fn cycle_washroom_filter(&mut self) {
        self.filter.washroom = self.filter.washroom.cycle();
        self.selected_index = 0;
    }

    /// Dismiss the result box and notifications
    pub fn dismiss(&mut self) {
        self.outcome = None;
        self.flash_messages.clear();
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
    }

    /// Request application exit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle keyboard event based on current mode
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // If there's a startup error modal, any key dismisses it
        if self.startup_error.is_some() {
            self.startup_error = None;
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Ok(());
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Search => self.handle_search_key(key),
            AppMode::Form => self.handle_form_key(key),
            AppMode::Confirm => self.handle_confirm_key(key),
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Ok(())
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::Home => self.jump_to_top(),
            KeyCode::End => self.jump_to_bottom(),

            KeyCode::Char('a') => self.open_form(FormKind::AddRoom),
            KeyCode::Char('o') => self.open_form(FormKind::Allocate),
            KeyCode::Char('r') => self.open_form(FormKind::Release),
            KeyCode::Char('d') => self.request_delete()?,

            KeyCode::Char('/') => self.mode = AppMode::Search,
            KeyCode::Char('C') => self.cycle_capacity_filter(),
            KeyCode::Char('A') => self.cycle_ac_filter(),
            KeyCode::Char('W') => self.cycle_washroom_filter(),

            KeyCode::Char('x') => self.dismiss(),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc => {
                // ESC clears the search, then the filters, then quits
                if !self.search_input.value().is_empty() {
                    self.clear_search();
                } else if self.filter.is_active() {
                    self.filter.clear_criteria();
                    self.selected_index = 0;
                } else {
                    self.quit();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::Esc | KeyCode::Enter => self.mode = AppMode::Normal,
            _ => {
                // Delegate editing keys to tui-input
                let event = Event::Key(key);
                if self.search_input.handle_event(&event).is_some() {
                    self.update_search();
                }
            }
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(());
        };

        match form.handle_key(key) {
            FormAction::None => {}
            FormAction::Cancel => self.close_form(),
            FormAction::Submit => {
                self.submit_form()?;
                self.clamp_selection();
            }
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete()?,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel_confirm(),
            _ => {}
        }
        Ok(())
    }

    /// Render the TUI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        frame.render_widget(
            ratatui::widgets::Block::default()
                .style(ratatui::prelude::Style::default().bg(self.theme.default_bg)),
            size,
        );

        let layout = ui::create_main_layout(size);

        ui::render_stats_bar(frame, layout.stats, self.registry.stats(), &self.theme);

        let visible_rooms = self.visible_rooms();
        ui::render_room_list(
            frame,
            layout.list,
            &visible_rooms,
            ui::room_list::RoomListRenderContext {
                selected: self.selected_index,
                mode: self.mode,
                search_input: &self.search_input,
                filter: &self.filter,
                registry: &self.registry,
                total_rooms: self.registry.len(),
                theme: &self.theme,
            },
        );

        ui::render_divider(frame, layout.divider, &self.theme);

        let selected_room = visible_rooms.get(self.selected_index).copied();
        ui::render_side_panel(
            frame,
            layout.side,
            ui::details::SidePanelContext {
                form: self.form.as_ref().filter(|_| self.mode == AppMode::Form),
                outcome: self.outcome.as_ref(),
                selected: selected_room,
                selected_allocated: selected_room
                    .map(|r| self.registry.is_allocated(&r.room_no))
                    .unwrap_or(false),
                flash_messages: &self.flash_messages,
                theme: &self.theme,
            },
        );

        ui::render_keyboard_hints(frame, layout.hints, self.mode, &self.theme);

        if matches!(self.mode, AppMode::Help) {
            ui::render_help_overlay(frame, size, &self.theme);
        }

        if let (AppMode::Confirm, Some(room_no)) = (self.mode, self.pending_delete.as_deref()) {
            ui::render_confirm_overlay(frame, size, room_no, &self.theme);
        }

        if let Some(ref error_msg) = self.startup_error {
            ui::render_error_modal(frame, size, error_msg, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ALLOCATED_KEY, JsonRoomStorage, KeyValueStore, MemoryStore, ROOMS_KEY};
    use std::sync::Arc;

    /// Shares one memory store between the app and the test
    struct SharedStore(Arc<MemoryStore>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn test_app() -> (App, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let storage = JsonRoomStorage::new(SharedStore(store.clone()));
        let mut registry = RoomRegistry::new();
        registry.add_room("101", 2, false, false).unwrap();
        registry.add_room("102", 4, true, true).unwrap();
        registry.add_room("B201", 4, true, false).unwrap();
        let app = App::new(registry, Box::new(storage), Config::default(), None);
        (app, store)
    }

    #[test]
    fn test_add_room_through_form_persists() {
        let (mut app, store) = test_app();

        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.mode, AppMode::Form);
        type_str(&mut app, "301");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_str(&mut app, "1");
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert!(app.registry.contains("301"));
        assert!(store.get(ROOMS_KEY).unwrap().unwrap().contains("\"301\""));
        // Form stays open and is cleared for the next room
        assert_eq!(app.form.as_ref().unwrap().text(0), "");
    }

    #[test]
    fn test_failed_add_does_not_save() {
        let (mut app, store) = test_app();

        app.add_room("101", 3, false, false).unwrap();
        assert_eq!(app.registry.len(), 3);
        assert_eq!(store.get(ROOMS_KEY).unwrap(), None);
    }

    #[test]
    fn test_failed_allocate_and_release_do_not_save() {
        let (mut app, store) = test_app();

        app.allocate(9, false, false).unwrap();
        assert!(!app.outcome.as_ref().unwrap().success);

        app.release("101").unwrap();
        assert_eq!(
            app.outcome.as_ref().unwrap().headline,
            "Room 101 is not currently allocated"
        );

        app.release("999").unwrap();
        assert_eq!(app.registry.stats().allocated, 0);
        assert_eq!(store.get(ROOMS_KEY).unwrap(), None);
        assert_eq!(store.get(ALLOCATED_KEY).unwrap(), None);
    }

    #[test]
    fn test_allocate_sets_outcome() {
        let (mut app, _store) = test_app();

        app.allocate(3, true, false).unwrap();
        let outcome = app.outcome.clone().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.headline, "Room 102 has been allocated!");
        assert!(outcome.details.contains(&"Capacity: 4 students".to_string()));

        app.allocate(5, false, false).unwrap();
        let outcome = app.outcome.clone().unwrap();
        assert!(!outcome.success);
        assert_eq!(
            outcome.headline,
            "No room available matching these requirements"
        );
    }

    #[test]
    fn test_release_form_prefills_selected_allocated_room() {
        let (mut app, _store) = test_app();
        app.allocate(1, false, false).unwrap();

        app.handle_key(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.form.as_ref().unwrap().text(0), "101");
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert!(!app.registry.is_allocated("101"));
        assert_eq!(app.outcome.as_ref().unwrap().headline, "Room 101 is now free");
    }

    #[test]
    fn test_release_unallocated_reports() {
        let (mut app, _store) = test_app();
        app.release("102").unwrap();
        assert_eq!(
            app.outcome.as_ref().unwrap().headline,
            "Room 102 is not currently allocated"
        );
        app.release("nope").unwrap();
        assert_eq!(
            app.outcome.as_ref().unwrap().headline,
            "Room nope does not exist"
        );
    }

    #[test]
    fn test_delete_with_confirmation() {
        let (mut app, _store) = test_app();
        app.allocate(1, false, false).unwrap();

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.mode, AppMode::Confirm);
        assert_eq!(app.pending_delete.as_deref(), Some("101"));

        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert!(app.registry.contains("101"));

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert!(!app.registry.contains("101"));
        assert!(!app.registry.is_allocated("101"));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_delete_without_confirmation() {
        let (mut app, _store) = test_app();
        app.config.general.confirm_delete = false;
        app.jump_to_bottom();

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(!app.registry.contains("B201"));
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_search_and_filters() {
        let (mut app, _store) = test_app();

        app.handle_key(key(KeyCode::Char('/'))).unwrap();
        type_str(&mut app, "b2");
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.visible_rooms().len(), 1);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.visible_rooms().len(), 3);

        // any -> 1 -> 2 -> 3 -> 4+
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Char('C'))).unwrap();
        }
        app.handle_key(key(KeyCode::Char('W'))).unwrap();
        let names: Vec<&str> = app.visible_rooms().iter().map(|r| r.room_no.as_str()).collect();
        assert_eq!(names, vec!["102"]);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.filter.is_active());
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    fn render(app: &mut App) -> String {
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_shows_rooms_and_outcome() {
        let (mut app, _store) = test_app();
        app.allocate(2, false, false).unwrap();

        let screen = render(&mut app);
        assert!(screen.contains("Room B201"));
        assert!(screen.contains("Occupied"));
        assert!(screen.contains("Room 101 has been allocated!"));

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(render(&mut app).contains("Delete room 101?"));
    }

    #[test]
    fn test_unknown_theme_shows_modal_until_key() {
        let mut config = Config::default();
        config.general.theme = "neon".to_string();
        let storage = JsonRoomStorage::new(MemoryStore::new());
        let mut app = App::new(RoomRegistry::new(), Box::new(storage), config, None);

        let screen = render(&mut app);
        assert!(screen.contains("config problem"));
        assert!(screen.contains("neon"));

        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(app.startup_error.is_none());
        assert!(!app.should_quit);
        assert!(!render(&mut app).contains("config problem"));
    }
}
