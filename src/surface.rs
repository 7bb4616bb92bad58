use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Linear attribute animation, e.g. an opacity fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl Transition {
    pub fn fade_in(duration: Duration) -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration,
        }
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub marker: usize,
    pub href: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Group {
        class: Option<String>,
        translate: Point,
        children: Vec<Element>,
    },
    Rect {
        class: Option<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Text {
        x: f64,
        y: f64,
        anchor: TextAnchor,
        content: String,
    },
    Image(ImageElement),
}

impl Element {
    pub fn group(class: Option<&str>, translate: Point, children: Vec<Element>) -> Self {
        Element::Group {
            class: class.map(str::to_string),
            translate,
            children,
        }
    }

    /// Depth-first visit with the accumulated translation of each element.
    pub fn walk<'a>(&'a self, origin: Point, visit: &mut dyn FnMut(&'a Element, Point)) {
        visit(self, origin);
        if let Element::Group {
            translate,
            children,
            ..
        } = self
        {
            let inner = Point::new(origin.x + translate.x, origin.y + translate.y);
            for child in children {
                child.walk(inner, visit);
            }
        }
    }
}

/// Body-level floating box, positioned in page coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipElement {
    pub left: f64,
    pub top: f64,
    pub visible: bool,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle(usize);

#[derive(Debug, Clone)]
struct Layer {
    id: String,
    root: Element,
}

#[derive(Debug, Clone)]
struct Overlay {
    id: String,
    tooltip: TooltipElement,
}

/// Drawing target: an SVG-like canvas plus the page body it sits in.
#[derive(Debug, Clone)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    layers: Vec<Layer>,
    overlays: Vec<Overlay>,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
            overlays: Vec::new(),
        }
    }

    /// Replace the layer with the same id, or append a new one on top.
    pub fn set_layer(&mut self, id: &str, root: Element) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            layer.root = root;
        } else {
            self.layers.push(Layer {
                id: id.to_string(),
                root,
            });
        }
    }

    pub fn layer(&self, id: &str) -> Option<&Element> {
        self.layers.iter().find(|l| l.id == id).map(|l| &l.root)
    }

    pub fn layers(&self) -> impl Iterator<Item = &Element> {
        self.layers.iter().map(|l| &l.root)
    }

    /// Returns the existing overlay with this id, creating it only once.
    pub fn ensure_overlay(&mut self, id: &str) -> OverlayHandle {
        if let Some(idx) = self.overlays.iter().position(|o| o.id == id) {
            return OverlayHandle(idx);
        }
        self.overlays.push(Overlay {
            id: id.to_string(),
            tooltip: TooltipElement::default(),
        });
        OverlayHandle(self.overlays.len() - 1)
    }

    pub fn overlay_mut(&mut self, handle: OverlayHandle) -> Option<&mut TooltipElement> {
        self.overlays.get_mut(handle.0).map(|o| &mut o.tooltip)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (&str, &TooltipElement)> {
        self.overlays.iter().map(|o| (o.id.as_str(), &o.tooltip))
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Every image on the canvas with its absolute top-left corner.
    pub fn images(&self) -> Vec<(&ImageElement, Point)> {
        let mut out = Vec::new();
        for layer in &self.layers {
            layer.root.walk(Point::default(), &mut |el, origin| {
                if let Element::Image(img) = el {
                    out.push((img, Point::new(origin.x + img.x, origin.y + img.y)));
                }
            });
        }
        out
    }

    pub fn rects_with_class(&self, class: &str) -> Vec<(f64, f64, f64, f64)> {
        let mut out = Vec::new();
        for layer in &self.layers {
            layer.root.walk(Point::default(), &mut |el, origin| {
                if let Element::Rect {
                    class: Some(c),
                    x,
                    y,
                    width,
                    height,
                } = el
                    && c == class
                {
                    out.push((origin.x + x, origin.y + y, *width, *height));
                }
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_created_once_per_id() {
        let mut surface = Surface::new(100.0, 100.0);
        let a = surface.ensure_overlay("tip");
        let b = surface.ensure_overlay("tip");
        assert_eq!(a, b);
        assert_eq!(surface.overlay_count(), 1);
    }

    #[test]
    fn fade_interpolates_and_clamps() {
        let fade = Transition::fade_in(Duration::from_secs(1));
        assert_eq!(fade.value_at(Duration::ZERO), 0.0);
        assert!((fade.value_at(Duration::from_millis(250)) - 0.25).abs() < 1e-9);
        assert_eq!(fade.value_at(Duration::from_secs(3)), 1.0);
        assert!(fade.is_done(Duration::from_secs(1)));
    }

    #[test]
    fn images_report_absolute_position() {
        let mut surface = Surface::new(100.0, 100.0);
        let img = Element::Image(ImageElement {
            marker: 0,
            href: "a.png".to_string(),
            x: 5.0,
            y: 6.0,
            width: 30.0,
            height: 30.0,
            opacity: 0.0,
            transition: None,
        });
        surface.set_layer("chart", Element::group(None, Point::new(10.0, 20.0), vec![img]));
        let images = surface.images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].1, Point::new(15.0, 26.0));
    }
}
