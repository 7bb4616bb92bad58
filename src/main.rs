use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Rectangle};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use standings_chart::band::{self, ClassificationBand};
use standings_chart::chart::tooltip_lines;
use standings_chart::config::Config;
use standings_chart::feed;
use standings_chart::state::{self, apply_delta, screen_label, AppState, ProviderCommand, Screen};
use standings_chart::surface::{Element, Point};

struct App {
    state: AppState,
    config: Config,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    chart_area: Option<Rect>,
}

impl App {
    fn new(config: Config, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(&config),
            config,
            should_quit: false,
            cmd_tx,
            chart_area: None,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.state.search_active = false,
                KeyCode::Backspace => {
                    self.state.search.pop();
                }
                KeyCode::Char(c) => self.state.search.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Chart,
            KeyCode::Char('2') => {
                self.state.screen = Screen::Scores;
                self.request(ProviderCommand::FetchScores {
                    league: self.state.league,
                });
            }
            KeyCode::Char('3') => {
                self.state.screen = Screen::Teams;
                self.ensure_teams();
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Esc => self.state.clear_hover(),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.state.cycle_league();
                match self.state.screen {
                    Screen::Scores => self.request(ProviderCommand::FetchScores {
                        league: self.state.league,
                    }),
                    Screen::Teams => self.ensure_teams(),
                    Screen::Chart => {}
                }
            }
            KeyCode::Char('/') if self.state.screen == Screen::Teams => {
                self.state.search_active = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.state.screen != Screen::Chart {
            return;
        }
        if !matches!(mouse.kind, MouseEventKind::Moved) {
            return;
        }
        let Some(area) = self.chart_area else {
            return;
        };
        match cell_to_page(area, &self.state, mouse.column, mouse.row) {
            Some(page) => self.state.pointer_at(page),
            None => self.state.clear_hover(),
        }
    }

    fn refresh(&mut self) {
        match self.state.screen {
            Screen::Chart => {
                self.state.standings_loading = true;
                self.request(ProviderCommand::FetchStandings);
                self.request(ProviderCommand::FetchNews);
            }
            Screen::Scores => self.request(ProviderCommand::FetchScores {
                league: self.state.league,
            }),
            Screen::Teams => self.request(ProviderCommand::FetchTeams {
                league: self.state.league,
            }),
        }
    }

    fn ensure_teams(&mut self) {
        if !self.state.teams.contains_key(&self.state.league) {
            self.request(ProviderCommand::FetchTeams {
                league: self.state.league,
            });
        }
    }

    fn request(&mut self, cmd: ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Fetch unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::load();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx, config.clone());

    let mut app = App::new(config, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let ticker = Paragraph::new(app.state.ticker_text()).style(Style::default().fg(Color::Yellow));
    frame.render_widget(ticker, chunks[1]);

    app.chart_area = None;
    match app.state.screen {
        Screen::Chart => render_chart_screen(frame, chunks[2], app),
        Screen::Scores => render_scores(frame, chunks[2], &app.state),
        Screen::Teams => render_teams(frame, chunks[2], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let status = if app.state.standings_loading {
        "loading…".to_string()
    } else {
        app.state
            .standings_updated
            .as_deref()
            .map(|t| format!("updated {t}"))
            .unwrap_or_default()
    };
    format!(
        " STANDINGS CHART | {} | {} {} | {} | {}",
        screen_label(app.state.screen),
        app.config.standings_league,
        app.config.standings_season,
        app.state.league.label(),
        status
    )
}

fn footer_text(state: &AppState) -> String {
    let keys = match state.screen {
        Screen::Chart => "1 Chart | 2 Scores | 3 Teams | j/k Hover | mouse Hover | Esc Unhover | r Refresh | ? Help | q Quit",
        Screen::Scores => "1 Chart | 2 Scores | 3 Teams | l League | j/k Scroll | r Refresh | ? Help | q Quit",
        Screen::Teams => "1 Chart | 2 Scores | 3 Teams | l League | / Search | j/k Scroll | r Refresh | q Quit",
    };
    let last = state.logs.back().map(String::as_str).unwrap_or("");
    format!("{keys}\n{last}")
}

fn band_color(band: ClassificationBand) -> Color {
    match band {
        ClassificationBand::Elite => Color::Green,
        ClassificationBand::Middle => Color::Yellow,
        ClassificationBand::Poor => Color::Red,
    }
}

fn class_band(class: &str) -> Option<ClassificationBand> {
    ClassificationBand::ALL
        .into_iter()
        .find(|b| b.css_class() == class)
}

fn render_chart_screen(frame: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(area);

    let block = Block::default().title("Goals vs Wins").borders(Borders::ALL);
    let inner = block.inner(cols[0]);
    app.chart_area = Some(inner);
    frame.render_widget(block, cols[0]);

    let state = &app.state;
    let (w, h) = (state.surface.width, state.surface.height);
    let elapsed = state.fade_elapsed();
    let canvas = Canvas::default()
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| paint_surface(ctx, state, elapsed));
    frame.render_widget(canvas, inner);

    render_tooltip(frame, inner, state);
    render_legend(frame, cols[1], state);
}

fn paint_surface(ctx: &mut Context, state: &AppState, elapsed: Duration) {
    let h = state.surface.height;
    let markers = state.renderer.markers();
    for layer in state.surface.layers() {
        layer.walk(Point::default(), &mut |el, origin| match el {
            Element::Rect {
                class,
                x,
                y,
                width,
                height,
            } => {
                let color = class
                    .as_deref()
                    .and_then(class_band)
                    .map(band_color)
                    .unwrap_or(Color::DarkGray);
                ctx.draw(&Rectangle {
                    x: origin.x + x,
                    y: h - (origin.y + y + height),
                    width: *width,
                    height: *height,
                    color,
                });
            }
            Element::Line { x1, y1, x2, y2 } => {
                ctx.draw(&CanvasLine {
                    x1: origin.x + x1,
                    y1: h - (origin.y + y1),
                    x2: origin.x + x2,
                    y2: h - (origin.y + y2),
                    color: Color::Gray,
                });
            }
            Element::Text { x, y, content, .. } => {
                ctx.print(
                    origin.x + x,
                    h - (origin.y + y),
                    Span::styled(content.clone(), Style::default().fg(Color::Gray)),
                );
            }
            Element::Image(img) => {
                let Some(marker) = markers.get(img.marker) else {
                    return;
                };
                let opacity = marker.opacity_at(elapsed);
                let mut style = Style::default().fg(if opacity < 0.5 {
                    Color::DarkGray
                } else {
                    band_color(marker.band)
                });
                if state.renderer.hovered() == Some(img.marker) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let c = marker.center();
                ctx.print(
                    origin.x + c.x,
                    h - (origin.y + c.y),
                    Span::styled(marker_label(&marker.record.name), style),
                );
            }
            Element::Group { .. } => {}
        });
        ctx.layer();
    }
}

fn marker_label(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(3)
        .collect();
    if initials.chars().count() >= 2 {
        initials.to_uppercase()
    } else {
        name.chars().take(3).collect::<String>().to_uppercase()
    }
}

fn cell_to_page(area: Rect, state: &AppState, column: u16, row: u16) -> Option<Point> {
    if column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    Some(Point::new(fx * state.surface.width, fy * state.surface.height))
}

fn page_to_cell(area: Rect, state: &AppState, page: Point) -> (u16, u16) {
    let fx = (page.x / state.surface.width).clamp(0.0, 1.0);
    let fy = (page.y / state.surface.height).clamp(0.0, 1.0);
    let col = area.x + (fx * f64::from(area.width.saturating_sub(1))) as u16;
    let row = area.y + (fy * f64::from(area.height.saturating_sub(1))) as u16;
    (col, row)
}

fn render_tooltip(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(idx) = state.renderer.hovered() else {
        return;
    };
    let Some(marker) = state.renderer.markers().get(idx) else {
        return;
    };
    let Some(tip) = state
        .surface
        .overlays()
        .map(|(_, tip)| tip)
        .find(|tip| tip.visible)
    else {
        return;
    };

    let lines = tooltip_lines(&marker.record);
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let (col, row) = page_to_cell(area, state, Point::new(tip.left, tip.top));
    let x = col.min((area.x + area.width).saturating_sub(width)).max(area.x);
    let y = row.min((area.y + area.height).saturating_sub(height)).max(area.y);
    let popup = Rect::new(x, y, width.min(area.width), height.min(area.height));

    let text = vec![
        Line::from(Span::styled(
            lines[0].clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(lines[1].clone()),
        Line::from(lines[2].clone()),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_legend(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::with_capacity(state.standings.len() + 4);
    for band in ClassificationBand::ALL {
        lines.push(Line::from(Span::styled(
            format!("■ {}", band.label()),
            Style::default().fg(band_color(band)),
        )));
    }
    lines.push(Line::from(""));
    if state.standings.is_empty() {
        lines.push(Line::from(Span::styled(
            "No standings yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, record) in state.standings.iter().enumerate() {
        let mut style = Style::default().fg(band_color(band::classify(record)));
        if idx == state.selected && state.renderer.hovered().is_some() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(
            format!("{:<22} {:>3} {:>3}", truncate(&record.name, 22), record.goals_scored, record.wins),
            style,
        )));
    }
    let legend = Paragraph::new(lines).block(Block::default().title("Team  G  W").borders(Borders::ALL));
    frame.render_widget(legend, area);
}

fn render_scores(frame: &mut Frame, area: Rect, state: &AppState) {
    let games = state.league_games();
    let text = if games.is_empty() {
        format!("No {} games loaded", state.league.label())
    } else {
        games
            .iter()
            .map(|g| {
                format!(
                    "{:<28} {:>4}   {:<28} {:>4}",
                    truncate(&g.home.name, 28),
                    g.home.score,
                    truncate(&g.away.name, 28),
                    g.away.score
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let block = Block::default()
        .title(format!("{} scoreboard", state.league.label()))
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(text).block(block).scroll((state.list_scroll, 0)),
        area,
    );
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let cursor = if state.search_active { "_" } else { "" };
    let search = Paragraph::new(format!("{}{cursor}", state.search))
        .block(Block::default().title("Search").borders(Borders::ALL));
    frame.render_widget(search, rows[0]);

    let teams = state.filtered_teams();
    let text = if teams.is_empty() {
        format!("No {} teams", state.league.label())
    } else {
        teams
            .iter()
            .map(|t| {
                format!(
                    "{:<36} {:<6} {}",
                    truncate(&t.display_name, 36),
                    t.abbreviation,
                    t.clubhouse.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let block = Block::default()
        .title(format!("{} teams ({})", state.league.label(), teams.len()))
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.list_scroll, 0)),
        rows[1],
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(['…']).collect()
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Standings Chart - Help",
        "",
        "Global:",
        "  1 / 2 / 3    Chart / Scores / Teams",
        "  l            Cycle basketball league",
        "  r            Refresh current screen",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Chart:",
        "  j/k or ↑/↓   Hover next/previous team",
        "  mouse        Hover a marker",
        "  Esc          Hide tooltip",
        "",
        "Teams:",
        "  /            Search by name (Enter/Esc ends)",
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

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
