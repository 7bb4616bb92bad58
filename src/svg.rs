use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::surface::{Element, Surface, TextAnchor, TooltipElement};

const STYLE: &str = "\
.elite-section{fill:#2e7d32;fill-opacity:0.18}\
.middle-section{fill:#f9a825;fill-opacity:0.18}\
.poor-section{fill:#c62828;fill-opacity:0.12}\
line{stroke:#000;stroke-width:1}\
text{font:10px sans-serif;fill:#000}";

const TOOLTIP_STYLE: &str = "position:absolute;background-color:white;border:solid;border-width:1px;border-radius:5px;padding:10px";

pub fn svg_document(surface: &Surface, generated_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::with_capacity(4096);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        num(surface.width),
        num(surface.height),
        num(surface.width),
        num(surface.height)
    );
    if let Some(ts) = generated_at {
        let _ = writeln!(
            out,
            "<metadata>generated {}</metadata>",
            ts.format("%Y-%m-%dT%H:%M:%SZ")
        );
    }
    let _ = writeln!(out, "<style>{STYLE}</style>");
    for layer in surface.layers() {
        write_element(&mut out, layer, 1);
    }
    for (id, tip) in surface.overlays() {
        write_tooltip(&mut out, id, tip, surface);
    }
    out.push_str("</svg>\n");
    out
}

pub fn write_svg(path: &Path, surface: &Surface, generated_at: Option<DateTime<Utc>>) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let doc = svg_document(surface, generated_at);
    fs::write(path, doc).with_context(|| format!("write {}", path.display()))
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    let pad = "  ".repeat(depth);
    match el {
        Element::Group {
            class,
            translate,
            children,
        } => {
            let _ = write!(out, "{pad}<g");
            if let Some(class) = class {
                let _ = write!(out, r#" class="{}""#, attr(class));
            }
            if translate.x != 0.0 || translate.y != 0.0 {
                let _ = write!(
                    out,
                    r#" transform="translate({},{})""#,
                    num(translate.x),
                    num(translate.y)
                );
            }
            out.push_str(">\n");
            for child in children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{pad}</g>");
        }
        Element::Rect {
            class,
            x,
            y,
            width,
            height,
        } => {
            let _ = write!(
                out,
                r#"{pad}<rect x="{}" y="{}" width="{}" height="{}""#,
                num(*x),
                num(*y),
                num(*width),
                num(*height)
            );
            if let Some(class) = class {
                let _ = write!(out, r#" class="{}""#, attr(class));
            }
            out.push_str("/>\n");
        }
        Element::Line { x1, y1, x2, y2 } => {
            let _ = writeln!(
                out,
                r#"{pad}<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                num(*x1),
                num(*y1),
                num(*x2),
                num(*y2)
            );
        }
        Element::Text {
            x,
            y,
            anchor,
            content,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = writeln!(
                out,
                r#"{pad}<text x="{}" y="{}" text-anchor="{anchor}">{}</text>"#,
                num(*x),
                num(*y),
                text(content)
            );
        }
        Element::Image(img) => {
            let href = attr(&img.href);
            let _ = write!(
                out,
                r#"{pad}<image data-marker="{}" href="{href}" xlink:href="{href}" x="{}" y="{}" width="{}" height="{}" opacity="{}""#,
                img.marker,
                num(img.x),
                num(img.y),
                num(img.width),
                num(img.height),
                num(img.opacity)
            );
            match img.transition {
                Some(t) => {
                    let _ = writeln!(
                        out,
                        r#"><animate attributeName="opacity" from="{}" to="{}" dur="{}ms" fill="freeze"/></image>"#,
                        num(t.from),
                        num(t.to),
                        t.duration.as_millis()
                    );
                }
                None => out.push_str("/>\n"),
            }
        }
    }
}

fn write_tooltip(out: &mut String, id: &str, tip: &TooltipElement, surface: &Surface) {
    let display = if tip.visible { "inline-block" } else { "none" };
    let _ = writeln!(
        out,
        r#"  <foreignObject x="0" y="0" width="{}" height="{}" pointer-events="none">"#,
        num(surface.width),
        num(surface.height)
    );
    let _ = writeln!(
        out,
        r#"    <div xmlns="http://www.w3.org/1999/xhtml" id="{}" style="{TOOLTIP_STYLE};left:{}px;top:{}px;display:{display}">{}</div>"#,
        attr(id),
        num(tip.left),
        num(tip.top),
        xhtml(&tip.html)
    );
    out.push_str("  </foreignObject>\n");
}

fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn attr(raw: &str) -> String {
    text(raw).replace('"', "&quot;")
}

// Tooltip markup is already escaped; only void tags need closing for XML.
fn xhtml(html: &str) -> String {
    html.replace("<br>", "<br/>")
}
