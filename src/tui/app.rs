use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::trash::{HttpTrash, MemoryTrash, TrashStore};
use crate::model::{Config, ItemId};
use crate::ops::{Board, SelectionCursor};
use crate::seed;

use super::input;
use super::render;
use super::theme::Theme;

/// Which popup is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Notes,
    Todos,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Typing into the new-item field
    Input,
    /// Navigating the list
    Browse,
    /// Editing an existing item's content
    Edit,
}

/// Main application state
pub struct App {
    pub notes: Board,
    pub todos: Board,
    pub popup: Popup,
    pub mode: Mode,
    pub theme: Theme,
    pub should_quit: bool,
    /// New-item input buffer
    pub input: String,
    /// Keyboard selection for the todo popup
    pub todo_cursor: SelectionCursor,
    /// Plain list cursor for the note popup (presentation only)
    pub notes_cursor: usize,
    /// Showing the completed partition instead of the active one
    pub show_completed: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Current-thread runtime driving trash submissions
    pub rt: tokio::runtime::Runtime,
}

impl App {
    pub fn new(config: &Config, trash: Arc<dyn TrashStore>, rt: tokio::runtime::Runtime) -> Self {
        App {
            notes: Board::notes(Arc::clone(&trash), config.user.name.clone()),
            todos: Board::todos(trash, config.user.name.clone()),
            popup: Popup::Notes,
            mode: Mode::Input,
            theme: Theme::from_config(&config.ui),
            should_quit: false,
            input: String::new(),
            todo_cursor: SelectionCursor::new(),
            notes_cursor: 0,
            show_completed: config.ui.show_completed,
            status_message: None,
            status_is_error: false,
            rt,
        }
    }

    pub fn current_board(&self) -> &Board {
        match self.popup {
            Popup::Notes => &self.notes,
            Popup::Todos => &self.todos,
        }
    }

    /// Length of the list the cursor currently indexes into
    pub fn visible_len(&self) -> usize {
        let board = self.current_board();
        if self.show_completed {
            board.completed_count()
        } else {
            board.active_count()
        }
    }

    /// Id of the item under the cursor in the visible list
    pub fn selected_id(&self) -> Option<ItemId> {
        let board = self.current_board();
        let items = if self.show_completed {
            board.ordered_completed()
        } else {
            board.ordered_active()
        };
        let idx = match self.popup {
            Popup::Todos => self.todo_cursor.index()?,
            Popup::Notes => self.notes_cursor,
        };
        items.get(idx).map(|item| item.id.clone())
    }

    /// Re-synchronize cursors after any mutation that may have shrunk
    /// the visible list.
    pub fn sync_cursors(&mut self) {
        let todo_len = if self.show_completed {
            self.todos.completed_count()
        } else {
            self.todos.active_count()
        };
        self.todo_cursor.clamp(todo_len);

        let note_len = if self.show_completed {
            self.notes.completed_count()
        } else {
            self.notes.active_count()
        };
        self.notes_cursor = self.notes_cursor.min(note_len.saturating_sub(1));
    }

    /// Selection drops on popup switch or view toggle — the index would
    /// point into a different sequence.
    pub fn reset_selection(&mut self) {
        self.todo_cursor.clear();
        self.notes_cursor = 0;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }
}

/// Run the TUI application
pub fn run(config: Config, demo: bool) -> Result<(), Box<dyn std::error::Error>> {
    let trash: Arc<dyn TrashStore> = match &config.trash.url {
        Some(url) => Arc::new(HttpTrash::new(url.clone())),
        None => Arc::new(MemoryTrash::new()),
    };
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut app = App::new(&config, trash, rt);
    if demo {
        app.notes.preload(seed::sample_notes())?;
        app.todos.preload(seed::sample_todos())?;
    }

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

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
