use std::collections::HashSet;
use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;

const ESPN_STANDINGS_URL: &str = "https://site.web.api.espn.com/apis/v2/sports/soccer";

pub const GOALS_STAT: &str = "pointsFor";
pub const WINS_STAT: &str = "wins";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub name: String,
    pub goals_scored: i64,
    pub wins: i64,
}

impl TeamRecord {
    pub fn new(name: impl Into<String>, goals_scored: i64, wins: i64) -> Self {
        Self {
            name: name.into(),
            goals_scored,
            wins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandingsWarning {
    MissingStatistic { team: String, stat: &'static str },
    DuplicateTeam { team: String },
}

impl fmt::Display for StandingsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandingsWarning::MissingStatistic { team, stat } => {
                write!(f, "Stats missing for {team} ({stat})")
            }
            StandingsWarning::DuplicateTeam { team } => {
                write!(f, "Duplicate standings entry for {team}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StandingsParse {
    pub records: Vec<TeamRecord>,
    pub warnings: Vec<StandingsWarning>,
}

/// Where marker images live and which extension they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAssets {
    pub dir: String,
    pub ext: String,
}

impl Default for LogoAssets {
    fn default() -> Self {
        Self {
            dir: "../logos".to_string(),
            ext: "png".to_string(),
        }
    }
}

pub fn logo_slug(team: &str) -> String {
    team.to_lowercase().replace(' ', "-").replacen('&', "and", 1)
}

/// Unresolvable names are not reported; the image simply fails to load.
pub fn logo_href(team: &str, assets: &LogoAssets) -> String {
    let dir = assets.dir.trim_end_matches('/');
    format!("{dir}/{}.{}", logo_slug(team), assets.ext)
}

pub fn standings_url(league: &str, season: &str) -> String {
    format!("{ESPN_STANDINGS_URL}/{league}/standings?season={season}")
}

pub fn fetch_standings(league: &str, season: &str) -> Result<StandingsParse> {
    let client = http_client()?;
    let url = standings_url(league, season);
    let body = fetch_json_cached(client, &url, &[]).context("standings request failed")?;
    parse_standings_json(&body)
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    #[serde(default)]
    children: Vec<StandingsGroup>,
    standings: Option<StandingsTable>,
}

#[derive(Debug, Deserialize)]
struct StandingsGroup {
    standings: Option<StandingsTable>,
}

#[derive(Debug, Deserialize)]
struct StandingsTable {
    #[serde(default)]
    entries: Vec<StandingsEntry>,
}

#[derive(Debug, Deserialize)]
struct StandingsEntry {
    team: EntryTeam,
    #[serde(default)]
    stats: Vec<EntryStat>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntryTeam {
    Named(String),
    Detailed {
        #[serde(rename = "displayName")]
        display_name: String,
    },
}

impl EntryTeam {
    fn into_name(self) -> String {
        match self {
            EntryTeam::Named(name) => name,
            EntryTeam::Detailed { display_name } => display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntryStat {
    name: String,
    value: Option<f64>,
}

pub fn parse_standings_json(raw: &str) -> Result<StandingsParse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(StandingsParse::default());
    }
    let response: StandingsResponse =
        serde_json::from_str(trimmed).context("invalid standings json")?;
    Ok(build_records(response))
}

fn build_records(response: StandingsResponse) -> StandingsParse {
    let table = response
        .children
        .into_iter()
        .next()
        .and_then(|group| group.standings)
        .or(response.standings);
    let Some(table) = table else {
        return StandingsParse::default();
    };

    let mut out = StandingsParse::default();
    let mut seen = HashSet::new();
    for entry in table.entries {
        let name = entry.team.into_name();
        let goals = stat_value(&entry.stats, GOALS_STAT);
        let wins = stat_value(&entry.stats, WINS_STAT);
        let (Some(goals), Some(wins)) = (goals, wins) else {
            let stat = if goals.is_none() { GOALS_STAT } else { WINS_STAT };
            out.warnings
                .push(StandingsWarning::MissingStatistic { team: name, stat });
            continue;
        };
        if !seen.insert(name.clone()) {
            out.warnings.push(StandingsWarning::DuplicateTeam { team: name });
            continue;
        }
        out.records.push(TeamRecord {
            name,
            goals_scored: goals.round() as i64,
            wins: wins.round() as i64,
        });
    }
    out
}

fn stat_value(stats: &[EntryStat], name: &str) -> Option<f64> {
    stats
        .iter()
        .find(|s| s.name == name)
        .and_then(|s| s.value)
        .filter(|v| v.is_finite())
}
