use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use chrono::Local;

use crate::chart::StandingsChartRenderer;
use crate::config::Config;
use crate::scoreboard::{self, GameCard, ScoreLine};
use crate::standings::{StandingsParse, TeamRecord};
use crate::surface::{Point, Surface};
use crate::teams::{filter_teams, League, TeamEntry};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chart,
    Scores,
    Teams,
}

#[derive(Debug)]
pub enum Delta {
    SetStandings(StandingsParse),
    StandingsFailed(String),
    SetNews(Vec<ScoreLine>),
    SetTeams { league: League, teams: Vec<TeamEntry> },
    SetGames { league: League, games: Vec<GameCard> },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchStandings,
    FetchNews,
    FetchTeams { league: League },
    FetchScores { league: League },
}

/// Everything one session knows; nothing here is global.
pub struct AppState {
    pub screen: Screen,
    pub surface: Surface,
    pub renderer: StandingsChartRenderer,
    pub standings: Vec<TeamRecord>,
    pub standings_loading: bool,
    pub standings_updated: Option<String>,
    pub rendered_at: Option<Instant>,
    pub selected: usize,
    pub ticker: Vec<String>,
    pub league: League,
    pub teams: HashMap<League, Vec<TeamEntry>>,
    pub games: HashMap<League, Vec<GameCard>>,
    pub search: String,
    pub search_active: bool,
    pub list_scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let mut surface = Surface::new(config.chart_width, config.chart_height);
        let mut renderer = StandingsChartRenderer::new(&mut surface, config.logos.clone());
        renderer.render(&[], &mut surface);
        Self {
            screen: Screen::Chart,
            surface,
            renderer,
            standings: Vec::new(),
            standings_loading: true,
            standings_updated: None,
            rendered_at: None,
            selected: 0,
            ticker: scoreboard::fallback_ticker(),
            league: League::Nba,
            teams: HashMap::with_capacity(League::ALL.len()),
            games: HashMap::with_capacity(League::ALL.len()),
            search: String::new(),
            search_active: false,
            list_scroll: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_standings(&mut self, records: Vec<TeamRecord>) {
        self.renderer.render(&records, &mut self.surface);
        self.standings = records;
        self.standings_loading = false;
        self.standings_updated = Some(Local::now().format("%H:%M:%S").to_string());
        self.rendered_at = Some(Instant::now());
        if self.selected >= self.standings.len() {
            self.selected = 0;
        }
    }

    pub fn fade_elapsed(&self) -> Duration {
        self.rendered_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::MAX)
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Chart => {
                let total = self.renderer.markers().len();
                if total == 0 {
                    self.selected = 0;
                    return;
                }
                self.selected = (self.selected + 1) % total;
                self.hover_selected();
            }
            Screen::Scores | Screen::Teams => {
                self.list_scroll = self.list_scroll.saturating_add(1);
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Chart => {
                let total = self.renderer.markers().len();
                if total == 0 {
                    self.selected = 0;
                    return;
                }
                self.selected = (self.selected + total - 1) % total;
                self.hover_selected();
            }
            Screen::Scores | Screen::Teams => {
                self.list_scroll = self.list_scroll.saturating_sub(1);
            }
        }
    }

    /// Keyboard hover: behave as if the pointer sat on the selected marker.
    pub fn hover_selected(&mut self) {
        let Some(center) = self.renderer.marker_page_center(self.selected) else {
            return;
        };
        self.renderer.pointer_leave(&mut self.surface);
        self.renderer
            .pointer_enter(&mut self.surface, self.selected, center);
    }

    pub fn pointer_at(&mut self, page: Point) {
        if let Some(idx) = self.renderer.pointer_move(&mut self.surface, page) {
            self.selected = idx;
        }
    }

    pub fn clear_hover(&mut self) {
        self.renderer.pointer_leave(&mut self.surface);
    }

    pub fn cycle_league(&mut self) {
        self.league = self.league.next();
        self.list_scroll = 0;
    }

    pub fn filtered_teams(&self) -> Vec<&TeamEntry> {
        self.teams
            .get(&self.league)
            .map(|teams| filter_teams(teams, &self.search))
            .unwrap_or_default()
    }

    pub fn league_games(&self) -> &[GameCard] {
        self.games
            .get(&self.league)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn ticker_text(&self) -> String {
        scoreboard::ticker_text(&self.ticker)
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetStandings(parsed) => {
            for warning in &parsed.warnings {
                state.push_log(format!("[WARN] {warning}"));
            }
            let count = parsed.records.len();
            state.set_standings(parsed.records);
            state.push_log(format!("[INFO] Standings updated: {count} teams"));
        }
        Delta::StandingsFailed(err) => {
            state.standings_loading = false;
            state.push_log(format!("[WARN] Standings fetch error: {err}"));
        }
        Delta::SetNews(lines) => {
            if lines.is_empty() {
                state.push_log("[INFO] Scoreboard empty, keeping ticker");
                return;
            }
            state.ticker = lines.iter().map(ScoreLine::headline).collect();
        }
        Delta::SetTeams { league, teams } => {
            state.push_log(format!("[INFO] {}: {} teams", league.label(), teams.len()));
            state.teams.insert(league, teams);
        }
        Delta::SetGames { league, games } => {
            state.push_log(format!("[INFO] {}: {} games", league.label(), games.len()));
            state.games.insert(league, games);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Chart => "Standings",
        Screen::Scores => "Scores",
        Screen::Teams => "Teams",
    }
}
