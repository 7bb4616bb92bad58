use standings_chart::config::Config;
use standings_chart::scoreboard::{CompetitorScore, GameCard, ScoreLine};
use standings_chart::standings::{StandingsParse, StandingsWarning, TeamRecord};
use standings_chart::state::{AppState, Delta, Screen, apply_delta};
use standings_chart::teams::{League, TeamEntry};

fn standings_delta() -> Delta {
    Delta::SetStandings(StandingsParse {
        records: vec![
            TeamRecord::new("Man City", 70, 20),
            TeamRecord::new("Leeds", 35, 5),
        ],
        warnings: vec![StandingsWarning::MissingStatistic {
            team: "X".to_string(),
            stat: "pointsFor",
        }],
    })
}

fn team(name: &str) -> TeamEntry {
    TeamEntry {
        display_name: name.to_string(),
        abbreviation: "N/A".to_string(),
        logo: None,
        clubhouse: None,
    }
}

#[test]
fn standings_delta_renders_and_logs_warnings() {
    let mut state = AppState::new(&Config::default());
    assert!(state.standings_loading);
    apply_delta(&mut state, standings_delta());

    assert!(!state.standings_loading);
    assert!(state.standings_updated.is_some());
    assert_eq!(state.renderer.markers().len(), 2);
    assert_eq!(state.surface.images().len(), 2);
    assert!(state.logs.iter().any(|l| l == "[WARN] Stats missing for X (pointsFor)"));
    assert!(state.logs.iter().any(|l| l.contains("Standings updated: 2 teams")));
}

#[test]
fn stale_standings_overwrite_and_tooltip_is_not_duplicated() {
    let mut state = AppState::new(&Config::default());
    apply_delta(&mut state, standings_delta());
    apply_delta(
        &mut state,
        Delta::SetStandings(StandingsParse {
            records: vec![TeamRecord::new("Leeds", 35, 5)],
            warnings: Vec::new(),
        }),
    );
    assert_eq!(state.standings.len(), 1);
    assert_eq!(state.surface.images().len(), 1);
    assert_eq!(state.surface.overlay_count(), 1);
}

#[test]
fn keyboard_selection_drives_hover() {
    let mut state = AppState::new(&Config::default());
    apply_delta(&mut state, standings_delta());

    state.select_next();
    assert_eq!(state.selected, 1);
    assert_eq!(state.renderer.hovered(), Some(1));
    let (_, tip) = state.surface.overlays().next().expect("tooltip");
    assert!(tip.visible);
    assert!(tip.html.contains("Leeds"));

    state.select_next();
    assert_eq!(state.selected, 0);
    state.select_prev();
    assert_eq!(state.selected, 1);

    state.clear_hover();
    assert_eq!(state.renderer.hovered(), None);
    let (_, tip) = state.surface.overlays().next().expect("tooltip");
    assert!(!tip.visible);
}

#[test]
fn pointer_hover_updates_selection() {
    let mut state = AppState::new(&Config::default());
    apply_delta(&mut state, standings_delta());
    let page = state.renderer.marker_page_center(1).expect("marker 1");
    state.pointer_at(page);
    assert_eq!(state.selected, 1);
    assert_eq!(state.renderer.hovered(), Some(1));
}

#[test]
fn empty_news_keeps_fallback_ticker() {
    let mut state = AppState::new(&Config::default());
    let before = state.ticker_text();
    apply_delta(&mut state, Delta::SetNews(Vec::new()));
    assert_eq!(state.ticker_text(), before);

    apply_delta(
        &mut state,
        Delta::SetNews(vec![ScoreLine {
            home: "Chelsea".to_string(),
            away: "Arsenal".to_string(),
            status: "FT".to_string(),
        }]),
    );
    assert_eq!(state.ticker_text(), "Chelsea vs Arsenal - FT");
}

#[test]
fn team_lists_are_cached_per_league() {
    let mut state = AppState::new(&Config::default());
    apply_delta(
        &mut state,
        Delta::SetTeams {
            league: League::Nba,
            teams: vec![team("Boston Celtics"), team("Miami Heat")],
        },
    );
    apply_delta(
        &mut state,
        Delta::SetTeams {
            league: League::Wnba,
            teams: vec![team("Las Vegas Aces")],
        },
    );

    state.screen = Screen::Teams;
    assert_eq!(state.filtered_teams().len(), 2);
    state.search = "heat".to_string();
    assert_eq!(state.filtered_teams().len(), 1);

    state.search.clear();
    state.cycle_league();
    assert_eq!(state.league, League::Wnba);
    assert_eq!(state.filtered_teams()[0].display_name, "Las Vegas Aces");
    state.cycle_league();
    assert!(state.filtered_teams().is_empty());
}

#[test]
fn games_are_stored_per_league() {
    let mut state = AppState::new(&Config::default());
    let score = |name: &str, pts: &str| CompetitorScore {
        name: name.to_string(),
        logo: None,
        score: pts.to_string(),
    };
    apply_delta(
        &mut state,
        Delta::SetGames {
            league: League::Nba,
            games: vec![GameCard {
                home: score("Boston Celtics", "112"),
                away: score("Miami Heat", "104"),
            }],
        },
    );
    assert_eq!(state.league_games().len(), 1);
    state.cycle_league();
    assert!(state.league_games().is_empty());
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new(&Config::default());
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] 249"));
}

#[test]
fn failed_standings_fetch_stops_loading() {
    let mut state = AppState::new(&Config::default());
    assert!(state.standings_loading);
    apply_delta(&mut state, Delta::StandingsFailed("connection refused".to_string()));

    assert!(!state.standings_loading);
    assert!(state.standings_updated.is_none());
    assert!(state.renderer.markers().is_empty());
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[WARN] Standings fetch error: connection refused")
    );
}
