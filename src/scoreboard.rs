use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::teams::League;

const ESPN_SITE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";
const TICKER_SEPARATOR: &str = "  |  ";

/// Static 2022-23 results shown until a live scoreboard arrives.
const FALLBACK_RESULTS: &[&str] = &[
    "Man City 2-0 Arsenal",
    "Liverpool 1-1 Chelsea",
    "Tottenham 3-2 Man United",
    "Leicester 1-0 Southampton",
    "Everton 2-3 West Ham",
    "Crystal Palace 1-1 Nottm Forest",
    "Leicester City 2-1 West Ham",
    "Leeds 1-4 Tottenham",
    "Wolves 1-0 Aston Villa",
    "Bournemouth 2-0 Brighton",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub home: String,
    pub away: String,
    pub status: String,
}

impl ScoreLine {
    pub fn headline(&self) -> String {
        format!("{} vs {} - {}", self.home, self.away, self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitorScore {
    pub name: String,
    pub logo: Option<String>,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCard {
    pub home: CompetitorScore,
    pub away: CompetitorScore,
}

pub fn fallback_ticker() -> Vec<String> {
    FALLBACK_RESULTS.iter().map(|s| s.to_string()).collect()
}

pub fn ticker_text(items: &[String]) -> String {
    items.join(TICKER_SEPARATOR)
}

pub fn soccer_scoreboard_url(league: &str) -> String {
    format!("{ESPN_SITE_URL}/soccer/{league}/scoreboard")
}

pub fn basketball_scoreboard_url(league: League) -> String {
    format!("{ESPN_SITE_URL}/basketball/{}/scoreboard", league.slug())
}

pub fn fetch_news(league: &str) -> Result<Vec<ScoreLine>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, &soccer_scoreboard_url(league), &[])
        .context("scoreboard request failed")?;
    parse_news_json(&body)
}

pub fn fetch_games(league: League) -> Result<Vec<GameCard>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, &basketball_scoreboard_url(league), &[])
        .context("scoreboard request failed")?;
    parse_games_json(&body)
}

#[derive(Debug, Default, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Vec<ScoreboardEvent>,
}

#[derive(Debug, Deserialize)]
struct ScoreboardEvent {
    #[serde(default)]
    competitions: Vec<Competition>,
    status: Option<EventStatus>,
}

#[derive(Debug, Deserialize)]
struct Competition {
    #[serde(default)]
    competitors: Vec<Competitor>,
}

#[derive(Debug, Deserialize)]
struct Competitor {
    team: CompetitorTeam,
    score: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompetitorTeam {
    name: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventStatus {
    #[serde(rename = "displayClock")]
    display_clock: Option<String>,
}

fn parse_scoreboard(raw: &str) -> Result<ScoreboardResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ScoreboardResponse::default());
    }
    serde_json::from_str(trimmed).context("invalid scoreboard json")
}

fn first_pair(event: &ScoreboardEvent) -> Option<(&Competitor, &Competitor)> {
    let competitors = &event.competitions.first()?.competitors;
    Some((competitors.first()?, competitors.get(1)?))
}

/// One headline per event; events without two competitors are dropped.
pub fn parse_news_json(raw: &str) -> Result<Vec<ScoreLine>> {
    let data = parse_scoreboard(raw)?;
    let lines = data
        .events
        .iter()
        .filter_map(|event| {
            let (home, away) = first_pair(event)?;
            let status = event
                .status
                .as_ref()
                .and_then(|s| s.display_clock.clone())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Scheduled".to_string());
            Some(ScoreLine {
                home: short_name(&home.team),
                away: short_name(&away.team),
                status,
            })
        })
        .collect();
    Ok(lines)
}

pub fn parse_games_json(raw: &str) -> Result<Vec<GameCard>> {
    let data = parse_scoreboard(raw)?;
    let games = data
        .events
        .iter()
        .filter_map(|event| {
            let (home, away) = first_pair(event)?;
            Some(GameCard {
                home: competitor_score(home),
                away: competitor_score(away),
            })
        })
        .collect();
    Ok(games)
}

fn short_name(team: &CompetitorTeam) -> String {
    team.name
        .clone()
        .or_else(|| team.display_name.clone())
        .unwrap_or_default()
}

fn competitor_score(c: &Competitor) -> CompetitorScore {
    CompetitorScore {
        name: c
            .team
            .display_name
            .clone()
            .or_else(|| c.team.name.clone())
            .unwrap_or_default(),
        logo: c.team.logo.clone(),
        score: c.score.clone().unwrap_or_default(),
    }
}
