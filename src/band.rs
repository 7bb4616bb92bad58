use crate::scale::LinearScale;
use crate::standings::TeamRecord;

pub const ELITE_MIN_GOALS: f64 = 60.0;
pub const ELITE_MIN_WINS: f64 = 18.0;
pub const MIDDLE_MIN_GOALS: f64 = 40.0;
pub const MIDDLE_MIN_WINS: f64 = 10.0;

const EDGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationBand {
    Elite,
    Middle,
    Poor,
}

impl ClassificationBand {
    pub const ALL: [ClassificationBand; 3] = [
        ClassificationBand::Elite,
        ClassificationBand::Middle,
        ClassificationBand::Poor,
    ];

    pub fn css_class(self) -> &'static str {
        match self {
            ClassificationBand::Elite => "elite-section",
            ClassificationBand::Middle => "middle-section",
            ClassificationBand::Poor => "poor-section",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClassificationBand::Elite => "Elite",
            ClassificationBand::Middle => "Middle",
            ClassificationBand::Poor => "Poor",
        }
    }
}

pub fn classify_values(goals: f64, wins: f64) -> ClassificationBand {
    if goals >= ELITE_MIN_GOALS && wins >= ELITE_MIN_WINS {
        ClassificationBand::Elite
    } else if (MIDDLE_MIN_GOALS..ELITE_MIN_GOALS).contains(&goals)
        && (MIDDLE_MIN_WINS..ELITE_MIN_WINS).contains(&wins)
    {
        ClassificationBand::Middle
    } else {
        ClassificationBand::Poor
    }
}

pub fn classify(record: &TeamRecord) -> ClassificationBand {
    classify_values(record.goals_scored as f64, record.wins as f64)
}

/// Axis-aligned rectangle in chart pixel space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Interiors intersect; shared edges (up to rounding) do not count.
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.x + EDGE_EPSILON < other.right()
            && other.x + EDGE_EPSILON < self.right()
            && self.y + EDGE_EPSILON < other.bottom()
            && other.y + EDGE_EPSILON < self.bottom()
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandLayout {
    pub elite: Vec<PixelRect>,
    pub middle: Vec<PixelRect>,
    pub poor: Vec<PixelRect>,
}

impl BandLayout {
    pub fn rects(&self, band: ClassificationBand) -> &[PixelRect] {
        match band {
            ClassificationBand::Elite => &self.elite,
            ClassificationBand::Middle => &self.middle,
            ClassificationBand::Poor => &self.poor,
        }
    }

    fn rects_mut(&mut self, band: ClassificationBand) -> &mut Vec<PixelRect> {
        match band {
            ClassificationBand::Elite => &mut self.elite,
            ClassificationBand::Middle => &mut self.middle,
            ClassificationBand::Poor => &mut self.poor,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = (ClassificationBand, &PixelRect)> {
        ClassificationBand::ALL
            .into_iter()
            .flat_map(move |band| self.rects(band).iter().map(move |r| (band, r)))
    }

    pub fn total_area(&self) -> f64 {
        self.all().map(|(_, r)| r.area()).sum()
    }
}

/// Split the plotting area along the threshold lines and tag every cell
/// with its band. Cells are merged so each band is a short list of rects.
pub fn band_layout(
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    chart_width: f64,
    chart_height: f64,
) -> BandLayout {
    let xs = breaks(
        [x_scale.apply(MIDDLE_MIN_GOALS), x_scale.apply(ELITE_MIN_GOALS)],
        chart_width,
    );
    let ys = breaks(
        [y_scale.apply(ELITE_MIN_WINS), y_scale.apply(MIDDLE_MIN_WINS)],
        chart_height,
    );

    let mut layout = BandLayout::default();
    for row in ys.windows(2) {
        let (top, bottom) = (row[0], row[1]);
        if bottom <= top {
            continue;
        }
        let mut run: Option<(ClassificationBand, PixelRect)> = None;
        for col in xs.windows(2) {
            let (left, right) = (col[0], col[1]);
            if right <= left {
                continue;
            }
            let goals = x_scale.invert((left + right) / 2.0);
            let wins = y_scale.invert((top + bottom) / 2.0);
            let band = classify_values(goals, wins);
            match run.as_mut() {
                Some((current, rect))
                    if *current == band && (rect.right() - left).abs() <= EDGE_EPSILON =>
                {
                    rect.width = right - rect.x;
                }
                _ => {
                    if let Some((b, rect)) = run.take() {
                        push_merged(&mut layout, b, rect);
                    }
                    run = Some((
                        band,
                        PixelRect {
                            x: left,
                            y: top,
                            width: right - left,
                            height: bottom - top,
                        },
                    ));
                }
            }
        }
        if let Some((b, rect)) = run {
            push_merged(&mut layout, b, rect);
        }
    }
    layout
}

fn breaks(inner: [f64; 2], extent: f64) -> Vec<f64> {
    let mut out = vec![0.0, extent];
    for v in inner {
        let v = if v.is_finite() { v.clamp(0.0, extent) } else { 0.0 };
        out.push(v);
    }
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

fn push_merged(layout: &mut BandLayout, band: ClassificationBand, rect: PixelRect) {
    let rects = layout.rects_mut(band);
    if let Some(above) = rects
        .iter_mut()
        .find(|r| r.x == rect.x && r.width == rect.width && r.bottom() == rect.y)
    {
        above.height += rect.height;
        return;
    }
    rects.push(rect);
}
