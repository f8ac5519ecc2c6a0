use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::Rng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::calendar;
use crate::io::Storage;
use crate::model::{Task, TaskStore};
use crate::ops::{self, InsertAnchor};
use crate::quotes::{self, Quote};
use crate::search::SearchResult;

use super::input;
use super::render;
use super::theme::Theme;

/// Days shown in the timeline, today included.
pub const HORIZON_DAYS: u64 = 31;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Edit,
    Search,
    History,
    Help,
    ConfirmDelete,
}

/// A row in the flattened timeline
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineItem {
    DayHeader(NaiveDate),
    Task { id: String, date: NaiveDate },
    AddSlot(NaiveDate),
}

impl TimelineItem {
    pub fn is_selectable(&self) -> bool {
        !matches!(self, TimelineItem::DayHeader(_))
    }
}

/// State of the inline text editor while creating or renaming a task
#[derive(Debug, Clone)]
pub struct EditState {
    pub buffer: String,
    /// Cursor position in characters, not bytes
    pub cursor: usize,
    /// Existing task being renamed; `None` means a new task
    pub target: Option<String>,
    pub date: NaiveDate,
    pub anchor: InsertAnchor,
}

/// Main application state
pub struct App {
    pub storage: Storage,
    pub store: TaskStore,
    pub calendar: calendar::Manager,
    pub quotes: quotes::Manager,
    pub theme: Theme,
    pub mode: Mode,
    pub today: NaiveDate,
    /// Flattened timeline rows, rebuilt after every mutation
    pub items: Vec<TimelineItem>,
    /// Composited per-day sequences backing `items`
    pub day_cache: HashMap<NaiveDate, Vec<Task>>,
    /// Cursor index into `items` (always a selectable row when non-empty)
    pub cursor: usize,
    /// First visible timeline row
    pub scroll: usize,
    pub edit: Option<EditState>,
    pub search_input: String,
    pub search_results: Vec<SearchResult>,
    pub search_cursor: usize,
    pub quote: Option<Quote>,
    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(storage: Storage) -> Result<Self, crate::io::StorageError> {
        let store = storage.load_data()?;
        let config = storage.config().clone();
        let theme = Theme::load(&config.theme, storage.config_dir());
        let calendar =
            calendar::Manager::new(config.calendar_urls.clone(), config.refresh_interval);
        let (quotes, quote_errors) = quotes::Manager::new(storage.config_dir(), &config.quote_files);
        for err in &quote_errors {
            storage.log_error(&err.to_string());
        }

        let mut app = App {
            storage,
            store,
            calendar,
            quotes,
            theme,
            mode: Mode::View,
            today: Local::now().date_naive(),
            items: Vec::new(),
            day_cache: HashMap::new(),
            cursor: 0,
            scroll: 0,
            edit: None,
            search_input: String::new(),
            search_results: Vec::new(),
            search_cursor: 0,
            quote: None,
            last_error: None,
            should_quit: false,
        };
        app.next_quote();
        app.refresh_days();
        app.cursor = app
            .items
            .iter()
            .position(TimelineItem::is_selectable)
            .unwrap_or(0);
        Ok(app)
    }

    pub fn horizon(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let start = self.today;
        (0..HORIZON_DAYS).filter_map(move |offset| {
            start.checked_add_days(chrono::Days::new(offset))
        })
    }

    /// Recomposite every day in the horizon and rebuild the flat row list,
    /// keeping the selection on the same task where possible.
    pub fn refresh_days(&mut self) {
        let days: Vec<NaiveDate> = self.horizon().collect();
        self.day_cache.clear();
        for day in &days {
            let events = if self.calendar.has_feeds() {
                self.calendar.events_for(*day, &self.storage)
            } else {
                Vec::new()
            };
            let sequence = ops::compose_day(&self.store, *day, &events);
            self.day_cache.insert(*day, sequence);
        }
        self.rebuild_items();
    }

    /// Rebuild `items` from the day cache without refetching calendars.
    pub fn rebuild_items(&mut self) {
        let selected = self.selected_task_id();
        let days: Vec<NaiveDate> = self.horizon().collect();
        self.items.clear();
        for day in days {
            self.items.push(TimelineItem::DayHeader(day));
            if let Some(sequence) = self.day_cache.get(&day) {
                for task in sequence {
                    self.items.push(TimelineItem::Task {
                        id: task.id.clone(),
                        date: day,
                    });
                }
            }
            self.items.push(TimelineItem::AddSlot(day));
        }

        if let Some(id) = selected {
            if let Some(idx) = self.items.iter().position(
                |item| matches!(item, TimelineItem::Task { id: tid, .. } if *tid == id),
            ) {
                self.cursor = idx;
                return;
            }
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        if self.items.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.items.len() - 1;
        if self.cursor > max {
            self.cursor = max;
        }
        // Settle on a selectable row, preferring earlier ones.
        if !self.items[self.cursor].is_selectable() {
            let after = self.items[self.cursor..]
                .iter()
                .position(TimelineItem::is_selectable)
                .map(|off| self.cursor + off);
            let before = self.items[..self.cursor]
                .iter()
                .rposition(TimelineItem::is_selectable);
            if let Some(idx) = after.or(before) {
                self.cursor = idx;
            }
        }
    }

    pub fn selected_item(&self) -> Option<&TimelineItem> {
        self.items.get(self.cursor)
    }

    pub fn selected_task_id(&self) -> Option<String> {
        match self.items.get(self.cursor) {
            Some(TimelineItem::Task { id, .. }) => Some(id.clone()),
            _ => None,
        }
    }

    /// The composited task under the cursor, if the cursor is on a task row.
    pub fn selected_task(&self) -> Option<&Task> {
        match self.items.get(self.cursor)? {
            TimelineItem::Task { id, date } => self
                .day_cache
                .get(date)
                .and_then(|seq| seq.iter().find(|t| t.id == *id)),
            _ => None,
        }
    }

    /// Move the selection to the next selectable row in `delta` direction.
    pub fn move_selection(&mut self, delta: i64) {
        if self.items.is_empty() {
            return;
        }
        let mut idx = self.cursor as i64;
        loop {
            idx += delta;
            if idx < 0 || idx as usize >= self.items.len() {
                return;
            }
            if self.items[idx as usize].is_selectable() {
                self.cursor = idx as usize;
                return;
            }
        }
    }

    /// Persist the store, surfacing failures in the footer instead of
    /// crashing out of raw mode.
    pub fn save(&mut self) {
        if let Err(err) = self.storage.save_data(&self.store) {
            self.storage.log_error(&err.to_string());
            self.last_error = Some(err.to_string());
        }
    }

    /// Advance `today` when the wall clock crosses midnight mid-session.
    /// The daily completion counter starts over with the new day.
    pub fn refresh_today(&mut self) {
        let now = Local::now().date_naive();
        if now != self.today {
            self.today = now;
            self.store.settings.tasks_completed_today = 0;
            self.save();
            self.refresh_days();
        }
    }

    /// Pick a fresh quote, avoiding an immediate repeat when possible.
    pub fn next_quote(&mut self) {
        let len = self.quotes.len();
        if len == 0 {
            self.quote = None;
            return;
        }
        let mut idx = rand::rng().random_range(0..len);
        if len > 1 && idx == self.store.settings.last_quote_index {
            idx = (idx + 1) % len;
        }
        self.store.settings.last_quote_index = idx;
        self.quote = self.quotes.get(idx).cloned();
    }

    /// Past days that still hold tasks, most recent first, capped at ten.
    pub fn history_days(&self) -> Vec<(NaiveDate, Vec<Task>)> {
        let mut days: Vec<NaiveDate> = self
            .store
            .tasks
            .iter()
            .filter(|t| !t.is_calendar)
            .map(Task::day)
            .filter(|d| *d < self.today)
            .collect();
        days.sort();
        days.dedup();
        days.reverse();
        days.truncate(10);
        days.into_iter()
            .map(|day| {
                let tasks: Vec<Task> = self
                    .store
                    .day_tasks(day)
                    .into_iter()
                    .cloned()
                    .collect();
                (day, tasks)
            })
            .collect()
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::new(data_dir)?;
    let mut app = App::new(storage)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Persist once more on the way out.
    app.save();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
        app.refresh_today();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
