use std::time::Duration;

use crate::band::{self, BandLayout, ClassificationBand};
use crate::scale::{self, LinearScale, DEFAULT_TICKS};
use crate::standings::{logo_href, LogoAssets, TeamRecord};
use crate::surface::{
    Element, ImageElement, Point, Surface, TextAnchor, Transition,
};

pub const CHART_LAYER: &str = "standings-chart";
pub const TOOLTIP_ID: &str = "standings-tooltip";
pub const MARKER_SIZE: f64 = 30.0;
pub const FADE_DURATION: Duration = Duration::from_secs(1);
pub const TICK_SIZE: f64 = 6.0;

const TOOLTIP_OFFSET_X: f64 = 10.0;
const TOOLTIP_OFFSET_Y: f64 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 40.0,
            left: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub chart_width: f64,
    pub chart_height: f64,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
}

impl ChartGeometry {
    pub fn compute(records: &[TeamRecord], width: f64, height: f64, margins: Margins) -> Self {
        let chart_width = (width - margins.left - margins.right).max(0.0);
        let chart_height = (height - margins.top - margins.bottom).max(0.0);

        let max_goals = records.iter().map(|r| r.goals_scored).max();
        let max_wins = records.iter().map(|r| r.wins).max();

        let x_scale = LinearScale::from_zero(max_goals.map(|v| v as f64), (0.0, chart_width))
            .nice(DEFAULT_TICKS);
        let y_scale = LinearScale::from_zero(max_wins.map(|v| v as f64), (chart_height, 0.0))
            .nice(DEFAULT_TICKS);

        Self {
            width,
            height,
            margins,
            chart_width,
            chart_height,
            x_scale,
            y_scale,
        }
    }

    pub fn bands(&self) -> BandLayout {
        band::band_layout(
            &self.x_scale,
            &self.y_scale,
            self.chart_width,
            self.chart_height,
        )
    }

    pub fn to_chart(&self, page: Point) -> Point {
        Point::new(page.x - self.margins.left, page.y - self.margins.top)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub record: TeamRecord,
    pub band: ClassificationBand,
    pub href: String,
    /// Top-left corner in chart coordinates.
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub fade: Transition,
}

impl Marker {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.size && p.y >= self.y && p.y < self.y + self.size
    }

    pub fn opacity_at(&self, elapsed: Duration) -> f64 {
        self.fade.value_at(elapsed)
    }

    fn on_enter(&self, tooltip: &Tooltip, surface: &mut Surface, page: Point) {
        tooltip.show(surface, page, &self.record);
    }

    fn on_leave(&self, tooltip: &Tooltip, surface: &mut Surface) {
        tooltip.hide(surface);
    }
}

pub fn tooltip_lines(record: &TeamRecord) -> [String; 3] {
    [
        record.name.clone(),
        format!("Goals: {}", record.goals_scored),
        format!("Wins: {}", record.wins),
    ]
}

pub fn tooltip_html(record: &TeamRecord) -> String {
    let [name, goals, wins] = tooltip_lines(record);
    format!("<strong>{}</strong><br>{goals}<br>{wins}", escape_html(&name))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The one floating tooltip in the surface body, found by `TOOLTIP_ID`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tooltip;

impl Tooltip {
    pub fn attach(surface: &mut Surface) -> Self {
        surface.ensure_overlay(TOOLTIP_ID);
        Self
    }

    pub fn show(&self, surface: &mut Surface, page: Point, record: &TeamRecord) {
        let handle = surface.ensure_overlay(TOOLTIP_ID);
        if let Some(tip) = surface.overlay_mut(handle) {
            tip.left = page.x + TOOLTIP_OFFSET_X;
            tip.top = page.y + TOOLTIP_OFFSET_Y;
            tip.visible = true;
            tip.html = tooltip_html(record);
        }
    }

    pub fn hide(&self, surface: &mut Surface) {
        let handle = surface.ensure_overlay(TOOLTIP_ID);
        if let Some(tip) = surface.overlay_mut(handle) {
            tip.visible = false;
        }
    }
}

pub struct StandingsChartRenderer {
    assets: LogoAssets,
    margins: Margins,
    tooltip: Tooltip,
    geometry: Option<ChartGeometry>,
    markers: Vec<Marker>,
    hovered: Option<usize>,
}

impl StandingsChartRenderer {
    pub fn new(surface: &mut Surface, assets: LogoAssets) -> Self {
        Self {
            assets,
            margins: Margins::default(),
            tooltip: Tooltip::attach(surface),
            geometry: None,
            markers: Vec::new(),
            hovered: None,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn geometry(&self) -> Option<&ChartGeometry> {
        self.geometry.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Rebuild the chart layer from scratch for `records`.
    pub fn render(&mut self, records: &[TeamRecord], surface: &mut Surface) {
        self.tooltip = Tooltip::attach(surface);
        let geometry = ChartGeometry::compute(records, surface.width, surface.height, self.margins);

        self.markers = records
            .iter()
            .map(|record| {
                let cx = geometry.x_scale.apply(record.goals_scored as f64);
                let cy = geometry.y_scale.apply(record.wins as f64);
                Marker {
                    record: record.clone(),
                    band: band::classify(record),
                    href: logo_href(&record.name, &self.assets),
                    x: cx - MARKER_SIZE / 2.0,
                    y: cy - MARKER_SIZE / 2.0,
                    size: MARKER_SIZE,
                    fade: Transition::fade_in(FADE_DURATION),
                }
            })
            .collect();

        let root = Element::group(
            Some("chart"),
            Point::new(geometry.margins.left, geometry.margins.top),
            vec![
                band_group(&geometry.bands()),
                x_axis(&geometry),
                y_axis(&geometry),
                marker_group(&self.markers),
            ],
        );
        surface.set_layer(CHART_LAYER, root);

        self.hovered = None;
        self.tooltip.hide(surface);
        self.geometry = Some(geometry);
    }

    /// Topmost marker under a page-space point.
    pub fn marker_at(&self, page: Point) -> Option<usize> {
        let geometry = self.geometry.as_ref()?;
        let p = geometry.to_chart(page);
        self.markers.iter().rposition(|m| m.contains(p))
    }

    pub fn pointer_enter(&mut self, surface: &mut Surface, marker: usize, page: Point) {
        let Some(m) = self.markers.get(marker) else {
            return;
        };
        m.on_enter(&self.tooltip, surface, page);
        self.hovered = Some(marker);
    }

    pub fn pointer_leave(&mut self, surface: &mut Surface) {
        if let Some(m) = self.hovered.take().and_then(|idx| self.markers.get(idx)) {
            m.on_leave(&self.tooltip, surface);
        } else {
            self.tooltip.hide(surface);
        }
    }

    /// Track the pointer; returns the marker now hovered, if any.
    pub fn pointer_move(&mut self, surface: &mut Surface, page: Point) -> Option<usize> {
        let hit = self.marker_at(page);
        match (self.hovered, hit) {
            (Some(prev), Some(next)) if prev == next => {
                self.pointer_enter(surface, next, page);
            }
            (_, Some(next)) => {
                self.pointer_leave(surface);
                self.pointer_enter(surface, next, page);
            }
            (Some(_), None) => self.pointer_leave(surface),
            (None, None) => {}
        }
        self.hovered
    }

    /// Page-space centre of a marker, for keyboard-driven hover.
    pub fn marker_page_center(&self, marker: usize) -> Option<Point> {
        let geometry = self.geometry.as_ref()?;
        let c = self.markers.get(marker)?.center();
        Some(Point::new(c.x + geometry.margins.left, c.y + geometry.margins.top))
    }
}

fn band_group(layout: &BandLayout) -> Element {
    let children = ClassificationBand::ALL
        .into_iter()
        .map(|band| {
            let rects = layout
                .rects(band)
                .iter()
                .map(|r| Element::Rect {
                    class: Some(band.css_class().to_string()),
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                })
                .collect();
            Element::group(Some(band.css_class()), Point::default(), rects)
        })
        .collect();
    Element::group(Some("bands"), Point::default(), children)
}

fn x_axis(geometry: &ChartGeometry) -> Element {
    let mut children = vec![Element::Line {
        x1: 0.0,
        y1: 0.0,
        x2: geometry.chart_width,
        y2: 0.0,
    }];
    for t in geometry.x_scale.ticks(DEFAULT_TICKS) {
        children.push(Element::group(
            Some("tick"),
            Point::new(geometry.x_scale.apply(t), 0.0),
            vec![
                Element::Line {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 0.0,
                    y2: TICK_SIZE,
                },
                Element::Text {
                    x: 0.0,
                    y: TICK_SIZE + 12.0,
                    anchor: TextAnchor::Middle,
                    content: scale::format_tick(t),
                },
            ],
        ));
    }
    children.push(Element::Text {
        x: geometry.chart_width,
        y: 35.0,
        anchor: TextAnchor::End,
        content: "Goals Scored".to_string(),
    });
    Element::group(
        Some("x-axis"),
        Point::new(0.0, geometry.chart_height),
        children,
    )
}

fn y_axis(geometry: &ChartGeometry) -> Element {
    let mut children = vec![Element::Line {
        x1: 0.0,
        y1: 0.0,
        x2: 0.0,
        y2: geometry.chart_height,
    }];
    for t in geometry.y_scale.ticks(DEFAULT_TICKS) {
        children.push(Element::group(
            Some("tick"),
            Point::new(0.0, geometry.y_scale.apply(t)),
            vec![
                Element::Line {
                    x1: -TICK_SIZE,
                    y1: 0.0,
                    x2: 0.0,
                    y2: 0.0,
                },
                Element::Text {
                    x: -TICK_SIZE - 3.0,
                    y: 4.0,
                    anchor: TextAnchor::End,
                    content: scale::format_tick(t),
                },
            ],
        ));
    }
    children.push(Element::Text {
        x: -10.0,
        y: -10.0,
        anchor: TextAnchor::End,
        content: "Wins".to_string(),
    });
    Element::group(Some("y-axis"), Point::default(), children)
}

fn marker_group(markers: &[Marker]) -> Element {
    let children = markers
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            Element::Image(ImageElement {
                marker: idx,
                href: m.href.clone(),
                x: m.x,
                y: m.y,
                width: m.size,
                height: m.size,
                opacity: m.fade.from,
                transition: Some(m.fade),
            })
        })
        .collect();
    Element::group(Some("markers"), Point::default(), children)
}
