use std::env;
use std::time::Duration;

use crate::standings::LogoAssets;

const DEFAULT_LEAGUE: &str = "eng.1";
const DEFAULT_SEASON: &str = "2022";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub standings_league: String,
    pub standings_season: String,
    pub news_league: String,
    pub chart_width: f64,
    pub chart_height: f64,
    pub logos: LogoAssets,
    pub refresh: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            standings_league: DEFAULT_LEAGUE.to_string(),
            standings_season: DEFAULT_SEASON.to_string(),
            news_league: DEFAULT_LEAGUE.to_string(),
            chart_width: 800.0,
            chart_height: 500.0,
            logos: LogoAssets::default(),
            refresh: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Loads `.env.local` then `.env`, then reads the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, fallback: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        let number = |key: &str, fallback: u64, min: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(fallback)
                .max(min)
        };

        Self {
            standings_league: text("STANDINGS_LEAGUE", &defaults.standings_league),
            standings_season: text("STANDINGS_SEASON", &defaults.standings_season),
            news_league: text("NEWS_LEAGUE", &defaults.news_league),
            chart_width: number("CHART_WIDTH", 800, 200) as f64,
            chart_height: number("CHART_HEIGHT", 500, 150) as f64,
            logos: LogoAssets {
                dir: text("LOGO_DIR", &defaults.logos.dir),
                ext: text("LOGO_EXT", &defaults.logos.ext)
                    .trim_start_matches('.')
                    .to_string(),
            },
            refresh: Duration::from_secs(number("REFRESH_SECS", 300, 30)),
        }
    }
}
