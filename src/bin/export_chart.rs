use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;

use standings_chart::chart::StandingsChartRenderer;
use standings_chart::config::Config;
use standings_chart::standings::{self, StandingsParse};
use standings_chart::surface::Surface;
use standings_chart::svg;

const DEFAULT_OUT: &str = "standings.svg";

fn main() -> Result<()> {
    let config = Config::load();

    let parsed = match arg_value("--fixture") {
        Some(path) => {
            let raw = fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            standings::parse_standings_json(&raw)?
        }
        None => {
            let league = arg_value("--league").unwrap_or_else(|| config.standings_league.clone());
            let season = arg_value("--season").unwrap_or_else(|| config.standings_season.clone());
            standings::fetch_standings(&league, &season)
                .with_context(|| format!("fetch standings {league} {season}"))?
        }
    };
    report(&parsed);

    let mut surface = Surface::new(config.chart_width, config.chart_height);
    let mut renderer = StandingsChartRenderer::new(&mut surface, config.logos.clone());
    renderer.render(&parsed.records, &mut surface);

    if let Some(team) = arg_value("--hover") {
        let idx = renderer
            .markers()
            .iter()
            .position(|m| m.record.name.eq_ignore_ascii_case(&team))
            .ok_or_else(|| anyhow!("no marker for team {team}"))?;
        let center = renderer
            .marker_page_center(idx)
            .ok_or_else(|| anyhow!("chart has no geometry"))?;
        renderer.pointer_enter(&mut surface, idx, center);
    }

    let out = arg_value("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
    svg::write_svg(&out, &surface, Some(Utc::now()))?;

    println!("Chart written");
    println!("File: {}", out.display());
    println!("Teams: {}", renderer.markers().len());
    if let Some(geometry) = renderer.geometry() {
        let (_, goals) = geometry.x_scale.domain();
        let (_, wins) = geometry.y_scale.domain();
        println!("Domain: goals 0..{goals} wins 0..{wins}");
    }
    Ok(())
}

fn report(parsed: &StandingsParse) {
    for warning in &parsed.warnings {
        eprintln!("[WARN] {warning}");
    }
    eprintln!("[INFO] Standings parsed: {} teams", parsed.records.len());
}

fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
