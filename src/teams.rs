use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;

const ESPN_BASKETBALL_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/basketball";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    Nba,
    Wnba,
    NcaaMen,
    NcaaWomen,
}

impl League {
    pub const ALL: [League; 4] = [League::Nba, League::Wnba, League::NcaaMen, League::NcaaWomen];

    pub fn slug(self) -> &'static str {
        match self {
            League::Nba => "nba",
            League::Wnba => "wnba",
            League::NcaaMen => "mens-college-basketball",
            League::NcaaWomen => "womens-college-basketball",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            League::Nba => "NBA",
            League::Wnba => "WNBA",
            League::NcaaMen => "NCAA Men",
            League::NcaaWomen => "NCAA Women",
        }
    }

    pub fn next(self) -> Self {
        match self {
            League::Nba => League::Wnba,
            League::Wnba => League::NcaaMen,
            League::NcaaMen => League::NcaaWomen,
            League::NcaaWomen => League::Nba,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamEntry {
    pub display_name: String,
    pub abbreviation: String,
    pub logo: Option<String>,
    pub clubhouse: Option<String>,
}

pub fn teams_url(league: League) -> String {
    format!("{ESPN_BASKETBALL_URL}/{}/teams", league.slug())
}

pub fn fetch_teams(league: League) -> Result<Vec<TeamEntry>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, &teams_url(league), &[]).context("teams request failed")?;
    parse_teams_json(&body)
}

#[derive(Debug, Default, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    sports: Vec<Sport>,
}

#[derive(Debug, Deserialize)]
struct Sport {
    #[serde(default)]
    leagues: Vec<LeagueTeams>,
}

#[derive(Debug, Deserialize)]
struct LeagueTeams {
    #[serde(default)]
    teams: Vec<TeamItem>,
}

#[derive(Debug, Deserialize)]
struct TeamItem {
    team: TeamDetail,
}

#[derive(Debug, Deserialize)]
struct TeamDetail {
    #[serde(rename = "displayName")]
    display_name: String,
    abbreviation: Option<String>,
    #[serde(default)]
    logos: Vec<Link>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: TeamsResponse = serde_json::from_str(trimmed).context("invalid teams json")?;
    let Some(league) = data
        .sports
        .into_iter()
        .next()
        .and_then(|s| s.leagues.into_iter().next())
    else {
        return Ok(Vec::new());
    };

    Ok(league
        .teams
        .into_iter()
        .map(|item| {
            let team = item.team;
            TeamEntry {
                display_name: team.display_name,
                abbreviation: team
                    .abbreviation
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| "N/A".to_string()),
                logo: team.logos.into_iter().next().map(|l| l.href),
                clubhouse: team.links.into_iter().next().map(|l| l.href),
            }
        })
        .collect())
}

/// Case-insensitive substring match on the display name.
pub fn filter_teams<'a>(teams: &'a [TeamEntry], term: &str) -> Vec<&'a TeamEntry> {
    let needle = term.trim().to_lowercase();
    teams
        .iter()
        .filter(|t| needle.is_empty() || t.display_name.to_lowercase().contains(&needle))
        .collect()
}
