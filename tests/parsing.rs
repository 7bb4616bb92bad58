use std::fs;
use std::path::PathBuf;

use standings_chart::scoreboard::{fallback_ticker, parse_games_json, parse_news_json, ticker_text};
use standings_chart::standings::{
    logo_href, logo_slug, parse_standings_json, LogoAssets, StandingsWarning, TeamRecord,
};
use standings_chart::teams::{filter_teams, parse_teams_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_espn_standings_fixture() {
    let parsed = parse_standings_json(&read_fixture("standings.json")).expect("fixture should parse");
    assert_eq!(parsed.records.len(), 5);
    assert_eq!(parsed.records[0], TeamRecord::new("Manchester City", 94, 28));
    assert_eq!(parsed.records[2].name, "Brighton & Hove Albion");
    assert_eq!(parsed.records[4], TeamRecord::new("Leeds United", 48, 7));
}

#[test]
fn entries_missing_a_stat_are_skipped_with_a_warning() {
    let parsed = parse_standings_json(&read_fixture("standings.json")).expect("fixture should parse");
    assert!(parsed.records.iter().all(|r| r.name != "Everton"));
    assert!(parsed.records.iter().all(|r| r.name != "Wolverhampton Wanderers"));
    assert_eq!(
        parsed.warnings,
        vec![
            StandingsWarning::MissingStatistic {
                team: "Everton".to_string(),
                stat: "pointsFor",
            },
            StandingsWarning::MissingStatistic {
                team: "Wolverhampton Wanderers".to_string(),
                stat: "wins",
            },
        ]
    );
    assert_eq!(parsed.warnings[0].to_string(), "Stats missing for Everton (pointsFor)");
}

#[test]
fn plain_team_name_without_goals_is_skipped() {
    let raw = r#"{"children":[{"standings":{"entries":[
        {"team":"X","stats":[{"name":"wins","value":10}]},
        {"team":"Y","stats":[{"name":"wins","value":3},{"name":"pointsFor","value":12}]}
    ]}}]}"#;
    let parsed = parse_standings_json(raw).expect("should parse");
    assert_eq!(parsed.records, vec![TeamRecord::new("Y", 12, 3)]);
    assert_eq!(parsed.warnings.len(), 1);
}

#[test]
fn duplicate_team_names_keep_the_first_entry() {
    let raw = r#"{"standings":{"entries":[
        {"team":{"displayName":"Leeds"},"stats":[{"name":"wins","value":5},{"name":"pointsFor","value":35}]},
        {"team":{"displayName":"Leeds"},"stats":[{"name":"wins","value":9},{"name":"pointsFor","value":40}]}
    ]}}"#;
    let parsed = parse_standings_json(raw).expect("should parse");
    assert_eq!(parsed.records, vec![TeamRecord::new("Leeds", 35, 5)]);
    assert_eq!(
        parsed.warnings,
        vec![StandingsWarning::DuplicateTeam {
            team: "Leeds".to_string()
        }]
    );
}

#[test]
fn empty_and_null_standings_are_empty() {
    for raw in ["", "null", "{}", r#"{"children":[]}"#] {
        let parsed = parse_standings_json(raw).expect("should parse");
        assert!(parsed.records.is_empty());
        assert!(parsed.warnings.is_empty());
    }
    assert!(parse_standings_json("{not json").is_err());
}

#[test]
fn logo_paths_are_derived_from_team_names() {
    assert_eq!(logo_slug("Brighton & Hove Albion"), "brighton-and-hove-albion");
    assert_eq!(logo_slug("Man City"), "man-city");
    assert_eq!(
        logo_href("Manchester United", &LogoAssets::default()),
        "../logos/manchester-united.png"
    );
    let assets = LogoAssets {
        dir: "assets/crests/".to_string(),
        ext: "svg".to_string(),
    };
    assert_eq!(logo_href("Leeds", &assets), "assets/crests/leeds.svg");
}

#[test]
fn parses_soccer_scoreboard_news() {
    let lines = parse_news_json(&read_fixture("scoreboard_soccer.json")).expect("fixture should parse");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].headline(), "Chelsea vs Arsenal - 90'+4'");
    assert_eq!(lines[1].headline(), "Liverpool vs Everton - Scheduled");
}

#[test]
fn parses_basketball_game_cards() {
    let games = parse_games_json(&read_fixture("scoreboard_nba.json")).expect("fixture should parse");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].home.name, "Boston Celtics");
    assert_eq!(games[0].home.score, "112");
    assert_eq!(games[0].away.name, "Miami Heat");
    assert!(games[0].away.logo.as_deref().is_some_and(|l| l.ends_with("mia.png")));
}

#[test]
fn ticker_joins_results() {
    let items = fallback_ticker();
    assert_eq!(items.len(), 10);
    let text = ticker_text(&items[..2]);
    assert_eq!(text, "Man City 2-0 Arsenal  |  Liverpool 1-1 Chelsea");
}

#[test]
fn parses_team_directory_and_filters_case_insensitively() {
    let teams = parse_teams_json(&read_fixture("teams_nba.json")).expect("fixture should parse");
    assert_eq!(teams.len(), 3);
    assert_eq!(teams[0].abbreviation, "ATL");
    assert!(teams[0].clubhouse.is_some());
    assert_eq!(teams[1].logo, None);
    assert_eq!(teams[2].abbreviation, "N/A");

    let hits = filter_teams(&teams, "BOS");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display_name, "Boston Celtics");
    assert_eq!(filter_teams(&teams, "b").len(), 2);
    assert_eq!(filter_teams(&teams, "").len(), 3);
}

#[test]
fn scoreboard_and_teams_null_are_empty() {
    assert!(parse_news_json("null").expect("null should parse").is_empty());
    assert!(parse_games_json("").expect("empty should parse").is_empty());
    assert!(parse_teams_json("null").expect("null should parse").is_empty());
}
