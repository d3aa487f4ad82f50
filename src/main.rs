use std::fs::File;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use ipl_predictor::config::AppConfig;
use ipl_predictor::delivery;
use ipl_predictor::export;
use ipl_predictor::pipeline;
use ipl_predictor::state::{AppState, PredictionView};

struct App {
    state: AppState,
    config: AppConfig,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config.cache_predictions),
            config,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('i') | KeyCode::Tab => self.state.toggle_innings(),
            KeyCode::Char('1') => self.state.innings = 1,
            KeyCode::Char('2') => self.state.innings = 2,
            KeyCode::Char('p') | KeyCode::Enter => self.state.predict_selected(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn reload(&mut self) {
        let path = self.config.data_path.clone();
        if !path.exists() {
            self.state
                .set_load_error(format!("Waiting for data: {} not found", path.display()));
            return;
        }
        match delivery::read_deliveries_from_path(&path) {
            Ok(rows) => self.state.load(path.display().to_string(), rows),
            Err(err) => self
                .state
                .set_load_error(format!("Failed to load {}: {err}", path.display())),
        }
    }

    fn export(&mut self) {
        if !self.state.has_data() {
            self.state.status = Some("Nothing to export".to_string());
            return;
        }
        let path = self.config.export_path.clone();
        let outcome = pipeline::fit_estimator(&self.state.deliveries)
            .map_err(anyhow::Error::from)
            .and_then(|estimator| export::export_summary(&path, &estimator));
        self.state.status = Some(match outcome {
            Ok(report) => format!(
                "Exported {} innings and {} team rows to {}",
                report.innings_rows,
                report.team_rows,
                path.display()
            ),
            Err(err) => format!("Export failed: {err:#}"),
        });
    }
}

fn init_logging(config: &AppConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // The alternate screen owns the terminal, so log lines go to a file instead.
    match File::create(&config.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn main() -> io::Result<()> {
    let config = AppConfig::from_env().with_args(std::env::args().skip(1));
    init_logging(&config);

    let mut app = App::new(config);
    app.reload();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(chunks[1]);
    render_teams(frame, body[0], &app.state);
    render_result(frame, body[1], &app.state);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let source = state.source_label.as_deref().unwrap_or("no data");
    let cache = if state.caching() { " | cache on" } else { "" };
    format!(
        "IPL TEAM SCORE PREDICTOR | {source}{cache}\nInnings: {}",
        state.innings
    )
}

fn footer_text(state: &AppState) -> String {
    state.status.clone().unwrap_or_else(|| {
        "j/k/↑/↓ Team | i/Tab Innings | Enter/p Predict | r Reload | e Export | ? Help | q Quit"
            .to_string()
    })
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Batting Team")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.teams.is_empty() {
        let empty = Paragraph::new("Awaiting data")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected, state.teams.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let style = if idx == state.selected {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(state.teams[idx].clone(), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_result(frame: &mut Frame, area: Rect, state: &AppState) {
    let style = match &state.result {
        Some(PredictionView::Score(_)) => Style::default().fg(Color::Green),
        Some(PredictionView::NotEnoughData { .. }) => Style::default().fg(Color::Yellow),
        Some(PredictionView::Failed(_)) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    };
    let text = state.result_lines().join("\n");
    let panel = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Prediction Result").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "IPL Score Predictor - Help",
        "",
        "  j/k or ↑/↓   Select batting team",
        "  i / Tab      Toggle innings",
        "  1 / 2        Pick innings",
        "  Enter / p    Predict final score",
        "  r            Reload data file",
        "  e            Export summary workbook",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
