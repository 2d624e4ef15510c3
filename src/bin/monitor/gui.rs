use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

use signal_tracker::{
    gui::{axis_labels, MonitorError, Plane, Projection},
    tracker::{Report, Tracker},
    Point3,
};

/// How far one key press moves the signal.
const STEP: f64 = 0.25;

struct App {
    tracker: Tracker,
    last_report: Option<Report>,
    last_error: Option<String>,
}

impl App {
    fn new(tracker: Tracker) -> App {
        App {
            tracker,
            last_report: None,
            last_error: None,
        }
    }

    fn on_tick(&mut self) {
        match self.tracker.step() {
            Ok(report) => {
                self.last_report = Some(report);
                self.last_error = None;
            }
            Err(e) => {
                self.last_report = None;
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn nudge(&mut self, dx: f64, dy: f64, dz: f64) {
        let to = self.tracker.signal() + Point3::new(dx, dy, dz);
        self.tracker.move_signal(to);
    }
}

pub fn engage_gui(tracker: Tracker) -> Result<(), MonitorError> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let tick_rate = Duration::from_millis(250);
    let mut app = App::new(tracker);
    app.on_tick();
    let res = run_app(&mut terminal, app, tick_rate);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(MonitorError::from)
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Left => app.nudge(-STEP, 0.0, 0.0),
                        KeyCode::Right => app.nudge(STEP, 0.0, 0.0),
                        KeyCode::Down => app.nudge(0.0, -STEP, 0.0),
                        KeyCode::Up => app.nudge(0.0, STEP, 0.0),
                        KeyCode::PageDown => app.nudge(0.0, 0.0, -STEP),
                        KeyCode::PageUp => app.nudge(0.0, 0.0, STEP),
                        _ => {}
                    }
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(4)])
        .split(f.size());
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_plane(f, app, Plane::Top, charts[0]);
    render_plane(f, app, Plane::Side, charts[1]);
    render_status(f, app, rows[1]);
}

fn render_plane(f: &mut Frame, app: &App, plane: Plane, area: Rect) {
    let projection = Projection::new(plane, &app.tracker, app.last_report.as_ref());
    let ([x_min, x_max], [y_min, y_max]) = plane.bounds(app.tracker.room());
    let (x_title, y_title) = plane.axis_titles();

    let chart = Chart::new(vec![
        scatter("Microphones", Color::Blue, &projection.microphones),
        scatter("Observer", Color::Green, &projection.observer),
        scatter("Actual", Color::Cyan, &projection.actual),
        scatter("Predicted", Color::Red, &projection.estimate),
    ])
    .block(
        Block::default()
            .title(plane.title().magenta().bold())
            .borders(Borders::ALL),
    )
    .x_axis(
        Axis::default()
            .title(Span::styled(x_title, Style::default().fg(Color::Red)))
            .style(Style::default().fg(Color::White))
            .bounds([x_min, x_max])
            .labels(axis_labels(x_max).into_iter().map(Span::from).collect()),
    )
    .y_axis(
        Axis::default()
            .title(Span::styled(y_title, Style::default().fg(Color::Red)))
            .style(Style::default().fg(Color::White))
            .bounds([y_min, y_max])
            .labels(axis_labels(y_max).into_iter().map(Span::from).collect()),
    );

    f.render_widget(chart, area);
}

fn scatter<'a>(name: &'static str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color))
        .data(data)
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let result = match (&app.last_report, &app.last_error) {
        (Some(report), _) => format!(
            "Predicted: {}  Actual: {}  Observer: {}",
            report.estimate,
            report.actual,
            app.tracker.observer().heading()
        ),
        (None, Some(e)) => format!("Error: {}", e),
        (None, None) => "Waiting for the first estimate...".to_owned(),
    };
    let instructions = Line::from(vec![
        " Move ".into(),
        "<Arrows>".magenta().bold(),
        " Up/Down ".into(),
        "<PgUp>/<PgDn>".magenta().bold(),
        " Quit ".into(),
        "<Q> ".magenta().bold(),
    ]);
    let text = Paragraph::new(vec![Line::from(result), instructions])
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(text, area);
}
