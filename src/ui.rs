use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use movie_catalog::{Catalog, CatalogError, Config, EventLog, JsonCodec, LoadPolicy, MovieRecord};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;

const ALL_MOVIES_TITLE: &str = "Movies";

#[derive(Debug, Clone, PartialEq)]
pub enum PromptAction {
    AddTitle,
    AddCategory { title: String },
    RateTitle,
    RateValue { title: String },
    Search,
    Category,
    MinRating,
}

impl PromptAction {
    fn label(&self) -> &str {
        match self {
            PromptAction::AddTitle => "Title",
            PromptAction::AddCategory { .. } => "Category",
            PromptAction::RateTitle => "Movie title to rate",
            PromptAction::RateValue { .. } => "Rating (integer)",
            PromptAction::Search => "Movie title",
            PromptAction::Category => "Category",
            PromptAction::MinRating => "Minimum rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    LoadOnStart,
    SaveOnQuit,
}

impl ConfirmAction {
    fn question(&self) -> &str {
        match self {
            ConfirmAction::LoadOnStart => "Would you like to load a saved movie list?",
            ConfirmAction::SaveOnQuit => "Would you like to save your movie list?",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Prompt { action: PromptAction, input: String },
    Confirm(ConfirmAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

pub struct App {
    pub catalog: Catalog,
    pub catalog_path: PathBuf,
    pub view: Vec<MovieRecord>,
    pub list_title: String,
    pub state: TableState,
    pub mode: Mode,
    pub status: Option<Status>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, log: EventLog) -> Self {
        let mut app = Self {
            catalog: Catalog::new(log),
            catalog_path: config.catalog_path.clone(),
            view: Vec::new(),
            list_title: ALL_MOVIES_TITLE.to_string(),
            state: TableState::default(),
            mode: Mode::Browse,
            status: None,
            should_quit: false,
        };

        match config.load_on_start {
            LoadPolicy::Always => app.load(),
            LoadPolicy::Ask if app.catalog_path.exists() => {
                app.mode = Mode::Confirm(ConfirmAction::LoadOnStart);
            }
            LoadPolicy::Ask | LoadPolicy::Never => {}
        }

        app.show_all();
        app
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    fn set_view(&mut self, title: String, movies: Vec<MovieRecord>) {
        self.list_title = title;
        self.view = movies;
        if self.view.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn show_all(&mut self) {
        let movies = self.catalog.list_all().to_vec();
        self.set_view(ALL_MOVIES_TITLE.to_string(), movies);
    }

    fn info(&mut self, message: String) {
        self.status = Some(Status {
            message,
            is_error: false,
        });
    }

    fn error(&mut self, err: CatalogError) {
        self.status = Some(Status {
            message: err.to_string(),
            is_error: true,
        });
    }

    // ========================================================================
    // FILE ACTIONS
    // ========================================================================

    pub fn load(&mut self) {
        match JsonCodec::load(&self.catalog_path, self.catalog.event_log().clone()) {
            Ok(catalog) => {
                self.catalog = catalog;
                self.show_all();
                self.info(format!("Loaded your movie list from {}", self.catalog_path.display()));
            }
            Err(err) => self.error(err),
        }
    }

    pub fn save(&mut self) -> bool {
        match JsonCodec::save(&self.catalog_path, &self.catalog) {
            Ok(()) => {
                self.info(format!("Your movie list has been saved to {}", self.catalog_path.display()));
                true
            }
            Err(err) => {
                self.error(err);
                false
            }
        }
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    fn prompt(&mut self, action: PromptAction) {
        self.mode = Mode::Prompt {
            action,
            input: String::new(),
        };
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => {
                // A message stays up until the next key press
                self.status = None;
                self.handle_browse_key(code);
            }
            Mode::Prompt { action, mut input } => match code {
                KeyCode::Enter => self.submit(action, input),
                KeyCode::Esc => self.status = None,
                KeyCode::Backspace => {
                    input.pop();
                    self.mode = Mode::Prompt { action, input };
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.mode = Mode::Prompt { action, input };
                }
                _ => self.mode = Mode::Prompt { action, input },
            },
            Mode::Confirm(action) => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm(action, true),
                KeyCode::Char('n') | KeyCode::Char('N') => self.confirm(action, false),
                KeyCode::Esc if action == ConfirmAction::LoadOnStart => self.confirm(action, false),
                KeyCode::Esc => {}
                _ => self.mode = Mode::Confirm(action),
            },
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.mode = Mode::Confirm(ConfirmAction::SaveOnQuit),
            KeyCode::Char('l') => self.show_all(),
            KeyCode::Char('a') => self.prompt(PromptAction::AddTitle),
            KeyCode::Char('r') => self.prompt(PromptAction::RateTitle),
            KeyCode::Char('s') => self.prompt(PromptAction::Search),
            KeyCode::Char('c') => self.prompt(PromptAction::Category),
            KeyCode::Char('m') => self.prompt(PromptAction::MinRating),
            KeyCode::Char('u') => {
                let result = owned(self.catalog.list_unwatched());
                self.show_result("Unwatched/unrated Movies".to_string(), result);
            }
            KeyCode::Char('w') => {
                self.save();
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            _ => {}
        }
    }

    fn show_result(&mut self, title: String, result: movie_catalog::Result<Vec<MovieRecord>>) {
        match result {
            Ok(movies) => {
                self.set_view(title, movies);
                self.status = None;
            }
            Err(err) => self.error(err),
        }
    }

    fn submit(&mut self, action: PromptAction, input: String) {
        match action {
            PromptAction::AddTitle => {
                if input.is_empty() {
                    self.error(CatalogError::InvalidArgument(
                        "movie title must not be empty".to_string(),
                    ));
                } else {
                    self.prompt(PromptAction::AddCategory { title: input });
                }
            }
            PromptAction::AddCategory { title } => match self.catalog.add(&title, &input) {
                Ok(()) => {
                    self.show_all();
                    self.info(format!("Added '{}'", title));
                }
                Err(err) => self.error(err),
            },
            PromptAction::RateTitle => {
                let found = self.catalog.find_movie(&input).map(|_| ());
                match found {
                    Ok(()) => self.prompt(PromptAction::RateValue { title: input }),
                    Err(err) => self.error(err),
                }
            }
            PromptAction::RateValue { title } => {
                let rated = MovieRecord::parse_rating(&input)
                    .and_then(|rating| self.catalog.rate_movie(&title, rating));
                match rated {
                    Ok(()) => {
                        self.show_all();
                        self.info(format!("Rated '{}'", title));
                    }
                    Err(err) => self.error(err),
                }
            }
            PromptAction::Search => {
                let result = owned(self.catalog.find_movie(&input).map(|movie| vec![movie]));
                self.show_result(format!("Result for '{}'", input), result);
            }
            PromptAction::Category => {
                let result = owned(self.catalog.filter_by_category(&input));
                self.show_result(format!("{} Movies", input), result);
            }
            PromptAction::MinRating => {
                let result = owned(
                    MovieRecord::parse_rating(&input)
                        .and_then(|min| self.catalog.filter_by_min_rating(min)),
                );
                self.show_result(format!("Movies rated at least {}", input.trim()), result);
            }
        }
    }

    fn confirm(&mut self, action: ConfirmAction, yes: bool) {
        match (action, yes) {
            (ConfirmAction::LoadOnStart, true) => self.load(),
            (ConfirmAction::LoadOnStart, false) => {}
            (ConfirmAction::SaveOnQuit, true) => {
                // Stay open when the save fails so the user can retry
                if self.save() {
                    self.should_quit = true;
                }
            }
            (ConfirmAction::SaveOnQuit, false) => self.should_quit = true,
        }
    }

    pub fn next(&mut self) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

/// Detach a query result from the catalog borrow
fn owned(result: movie_catalog::Result<Vec<&MovieRecord>>) -> movie_catalog::Result<Vec<MovieRecord>> {
    result.map(|found| found.into_iter().cloned().collect())
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Movie table
            Constraint::Length(3), // Prompt / status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let total = app.catalog.len();
    let watched = app.catalog.list_all().iter().filter(|m| m.is_watched()).count();

    let header_text = Line::from(vec![
        Span::styled(
            "🎬 Movie List",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled(format!("{} movies", total), Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(format!("{} watched", watched), Style::default().fg(Color::Green)),
        Span::raw("  │  "),
        Span::styled(format!("{} unwatched", total - watched), Style::default().fg(Color::Yellow)),
    ]);

    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Title", "Category", "Rating"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.view.iter().map(|movie| {
        let (rating, color) = match movie.rating() {
            Some(r) => (format!("{}/10", r), Color::Green),
            None => ("unrated".to_string(), Color::DarkGray),
        };
        Row::new(vec![
            Cell::from(movie.title().to_string()),
            Cell::from(movie.category().to_string()),
            Cell::from(rating).style(Style::default().fg(color)),
        ])
    });

    let widths = [
        Constraint::Percentage(50),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", app.list_title)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let line = match &app.mode {
        Mode::Prompt { action, input } => Line::from(vec![
            Span::styled(format!("{}: ", action.label()), Style::default().fg(Color::Cyan)),
            Span::raw(input.clone()),
            Span::styled("█", Style::default().fg(Color::White)),
            Span::raw("   "),
            key("Enter"),
            Span::raw(" ok  "),
            key("Esc"),
            Span::raw(" cancel"),
        ]),
        Mode::Confirm(action) => Line::from(vec![
            Span::styled(action.question(), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            key("y"),
            Span::raw("/"),
            key("n"),
        ]),
        Mode::Browse => match &app.status {
            Some(status) => {
                let color = if status.is_error { Color::Red } else { Color::Green };
                Line::from(Span::styled(status.message.clone(), Style::default().fg(color)))
            }
            None => Line::from(vec![
                key("l"),
                Span::raw(" all  "),
                key("a"),
                Span::raw(" add  "),
                key("r"),
                Span::raw(" rate  "),
                key("s"),
                Span::raw(" search  "),
                key("c"),
                Span::raw(" category  "),
                key("m"),
                Span::raw(" min rating  "),
                key("u"),
                Span::raw(" unwatched  "),
                key("w"),
                Span::raw(" save  "),
                Span::styled("q", Style::default().fg(Color::Red)),
                Span::raw(" quit"),
            ]),
        },
    };

    let status_bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
