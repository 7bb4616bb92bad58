use chrono::{TimeZone, Utc};

use standings_chart::chart::StandingsChartRenderer;
use standings_chart::config::Config;
use standings_chart::standings::{LogoAssets, TeamRecord};
use standings_chart::surface::Surface;
use standings_chart::svg::svg_document;

fn rendered(records: &[TeamRecord]) -> (Surface, StandingsChartRenderer) {
    let mut surface = Surface::new(800.0, 500.0);
    let mut renderer = StandingsChartRenderer::new(&mut surface, LogoAssets::default());
    renderer.render(records, &mut surface);
    (surface, renderer)
}

#[test]
fn svg_contains_bands_axes_and_fading_markers() {
    let (surface, _) = rendered(&[
        TeamRecord::new("Man City", 70, 20),
        TeamRecord::new("Leeds", 35, 5),
    ]);
    let doc = svg_document(&surface, None);

    assert!(doc.starts_with("<svg "));
    assert!(doc.contains(r#"width="800" height="500""#));
    assert!(doc.contains(r#"class="elite-section""#));
    assert!(doc.contains(r#"class="middle-section""#));
    assert!(doc.contains(r#"class="poor-section""#));
    assert!(doc.contains(">Goals Scored</text>"));
    assert!(doc.contains(">Wins</text>"));
    assert!(doc.contains(r#"transform="translate(50,20)""#));
    assert_eq!(doc.matches("<image ").count(), 2);
    assert!(doc.contains(r#"xlink:href="../logos/man-city.png""#));
    assert_eq!(
        doc.matches(r#"<animate attributeName="opacity" from="0" to="1" dur="1000ms" fill="freeze"/>"#)
            .count(),
        2
    );
    assert_eq!(doc.matches("<foreignObject").count(), 1);
    assert!(doc.contains("display:none"));
    assert!(doc.trim_end().ends_with("</svg>"));
}

#[test]
fn svg_shows_hovered_tooltip_and_metadata() {
    let (mut surface, mut renderer) = rendered(&[TeamRecord::new("Brighton & Hove Albion", 72, 18)]);
    let page = renderer.marker_page_center(0).expect("marker 0");
    renderer.pointer_enter(&mut surface, 0, page);

    let ts = Utc.with_ymd_and_hms(2023, 5, 28, 18, 0, 0).single();
    let doc = svg_document(&surface, ts);
    assert!(doc.contains("<metadata>generated 2023-05-28T18:00:00Z</metadata>"));
    assert!(doc.contains("display:inline-block"));
    assert!(doc.contains("<strong>Brighton &amp; Hove Albion</strong><br/>Goals: 72<br/>Wins: 18"));
    assert!(doc.contains(r#"href="../logos/brighton-and-hove-albion.png""#));
}

#[test]
fn empty_chart_still_serializes() {
    let (surface, _) = rendered(&[]);
    let doc = svg_document(&surface, None);
    assert_eq!(doc.matches("<image ").count(), 0);
    assert!(doc.contains(r#"class="poor-section""#));
}

#[test]
fn config_reads_overrides_and_falls_back() {
    let config = Config::from_lookup(|key| match key {
        "CHART_WIDTH" => Some("1024".to_string()),
        "CHART_HEIGHT" => Some("40".to_string()),
        "STANDINGS_SEASON" => Some(" 2023 ".to_string()),
        "LOGO_EXT" => Some(".svg".to_string()),
        "REFRESH_SECS" => Some("abc".to_string()),
        _ => None,
    });
    assert_eq!(config.chart_width, 1024.0);
    assert_eq!(config.chart_height, 150.0);
    assert_eq!(config.standings_season, "2023");
    assert_eq!(config.standings_league, "eng.1");
    assert_eq!(config.logos.ext, "svg");
    assert_eq!(config.refresh.as_secs(), 300);
}
