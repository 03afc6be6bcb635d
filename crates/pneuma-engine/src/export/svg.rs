use core::f32::consts::PI;
use core::fmt::Write as _;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::shapes::{AnnulusShape, ArcShape, ArrowShape, RoundedRectShape, TextShape};
use crate::scene::{DrawCmd, DrawList, Node, Shape};

/// SVG output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Output pixels per scene unit.
    pub scale: f32,
    /// Blank border around the scene bounds, in scene units.
    pub margin: f32,
    /// Scene units per stroke-width unit.
    pub stroke_unit: f32,
    pub background: Option<Color>,
    pub font_family: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            scale: 100.0,
            margin: 0.5,
            stroke_unit: 0.01,
            background: Some(crate::paint::palette::WHITE),
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Renders `node` as a standalone SVG document.
///
/// Scene +Y points up; the document flips it so the picture reads the same.
pub fn to_svg(node: &Node, opts: &SvgOptions) -> String {
    let bounds = node
        .try_bounds()
        .unwrap_or(Rect::new(-1.0, -1.0, 2.0, 2.0))
        .inflated(opts.margin);
    let mut list = DrawList::from_node(node);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        num(bounds.width() * opts.scale),
        num(bounds.height() * opts.scale),
        num(bounds.min().x),
        num(-bounds.max().y),
        num(bounds.width()),
        num(bounds.height()),
    );
    out.push('\n');
    if let Some(bg) = opts.background {
        let _ = writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(bounds.min().x),
            num(-bounds.max().y),
            num(bounds.width()),
            num(bounds.height()),
            bg.to_hex(),
        );
    }
    for item in list.iter_in_paint_order() {
        write_cmd(&mut out, &item.cmd, opts);
    }
    out.push_str("</svg>\n");
    out
}

fn write_cmd(out: &mut String, cmd: &DrawCmd, opts: &SvgOptions) {
    match &cmd.shape {
        Shape::Path(p) => {
            if p.points.len() < 2 {
                return;
            }
            let mut d = String::new();
            for (i, &pt) in p.points.iter().enumerate() {
                let _ = write!(d, "{}{} ", if i == 0 { "M" } else { "L" }, pt_str(pt));
            }
            if p.closed {
                d.push('Z');
            }
            let _ = writeln!(out, r#"<path d="{}" {}/>"#, d.trim_end(), paint(cmd, p.closed, opts));
        }
        Shape::Arc(a) => {
            let _ = writeln!(out, r#"<path d="{}" {}/>"#, arc_d(a, true), paint(cmd, false, opts));
        }
        Shape::Circle(c) => {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
                num(c.center.x),
                num(-c.center.y),
                num(c.radius),
                paint(cmd, true, opts),
            );
        }
        Shape::Annulus(a) => {
            let _ = writeln!(
                out,
                r#"<path d="{}" fill-rule="evenodd" {}/>"#,
                annulus_d(a),
                paint(cmd, true, opts),
            );
        }
        Shape::RoundedRect(r) => write_rect(out, r, cmd, opts),
        Shape::Arrow(a) => write_arrow(out, a, cmd, opts),
        Shape::Text(t) => write_text(out, t, cmd, opts),
    }
}

fn write_rect(out: &mut String, r: &RoundedRectShape, cmd: &DrawCmd, opts: &SvgOptions) {
    let (w, h) = (r.width.abs(), r.height.abs());
    let _ = writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" transform="translate({} {}) rotate({})" {}/>"#,
        num(-w * 0.5),
        num(-h * 0.5),
        num(w),
        num(h),
        num(r.effective_radius()),
        num(r.center.x),
        num(-r.center.y),
        num(-r.rotation.to_degrees()),
        paint(cmd, true, opts),
    );
}

fn write_arrow(out: &mut String, a: &ArrowShape, cmd: &DrawCmd, opts: &SvgOptions) {
    let [tip, l, r] = a.tip();
    let shaft = a.shaft_end();
    if cmd.stroke.is_visible() {
        let _ = writeln!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            num(a.start.x),
            num(-a.start.y),
            num(shaft.x),
            num(-shaft.y),
            paint(cmd, false, opts),
        );
    }
    let _ = writeln!(
        out,
        r#"<polygon points="{} {} {}" fill="{}" fill-opacity="{}" stroke="none"/>"#,
        pt_str(tip),
        pt_str(l),
        pt_str(r),
        cmd.stroke.color.to_hex(),
        num(cmd.stroke.opacity * cmd.stroke.color.a),
    );
}

fn write_text(out: &mut String, t: &TextShape, cmd: &DrawCmd, opts: &SvgOptions) {
    let _ = writeln!(
        out,
        r#"<text x="0" y="0" font-family="{}" font-size="{}" text-anchor="middle" dominant-baseline="central" transform="translate({} {}) rotate({})" fill="{}" fill-opacity="{}">{}</text>"#,
        escape(&opts.font_family),
        num(t.size),
        num(t.center.x),
        num(-t.center.y),
        num(-t.rotation.to_degrees()),
        cmd.fill.color.to_hex(),
        num(cmd.fill.opacity * cmd.fill.color.a),
        escape(&t.text),
    );
}

/// `fill`/`stroke` attributes of a command.
fn paint(cmd: &DrawCmd, fillable: bool, opts: &SvgOptions) -> String {
    let mut s = String::new();
    if fillable && cmd.fill.is_visible() {
        let _ = write!(
            s,
            r#"fill="{}" fill-opacity="{}" "#,
            cmd.fill.color.to_hex(),
            num(cmd.fill.opacity * cmd.fill.color.a)
        );
    } else {
        s.push_str(r#"fill="none" "#);
    }
    if cmd.stroke.is_visible() {
        let _ = write!(
            s,
            r#"stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linejoin="round" stroke-linecap="round""#,
            cmd.stroke.color.to_hex(),
            num(cmd.stroke.width * opts.stroke_unit),
            num(cmd.stroke.opacity * cmd.stroke.color.a),
        );
    } else {
        s.push_str(r#"stroke="none""#);
    }
    s
}

/// Arc as SVG `A` segments, each at most half a turn.
fn arc_d(a: &ArcShape, move_to: bool) -> String {
    let mut d = String::new();
    if move_to {
        let _ = write!(d, "M{} ", pt_str(a.start()));
    }
    let chunks = (a.sweep.abs() / PI).ceil().max(1.0) as usize;
    // Scene counter-clockwise is negative-angle in the flipped document.
    let flag = if a.sweep >= 0.0 { 0 } else { 1 };
    for i in 1..=chunks {
        let p = a.point_at(i as f32 / chunks as f32);
        let _ = write!(d, "A{} {} 0 0 {} {} ", num(a.radius), num(a.radius), flag, pt_str(p));
    }
    d.trim_end().to_string()
}

fn annulus_d(a: &AnnulusShape) -> String {
    let outer = ArcShape::new(a.center, a.outer, a.start_angle, a.sweep);
    let inner = ArcShape::new(a.center, a.inner, a.start_angle + a.sweep, -a.sweep);
    if a.is_full() {
        format!("{} Z {} Z", arc_d(&outer, true), arc_d(&inner, true))
    } else {
        format!("{} L{} {} Z", arc_d(&outer, true), pt_str(inner.start()), arc_d(&inner, false))
    }
}

fn pt_str(p: Vec2) -> String {
    format!("{} {}", num(p.x), num(-p.y))
}

/// Fixed precision without trailing zeros.
fn num(v: f32) -> String {
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::palette;
    use crate::scene::ZIndex;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(2.0), "2");
        assert_eq!(num(-0.00001), "0");
    }

    #[test]
    fn y_axis_is_flipped() {
        let svg = to_svg(&Node::circle(Vec2::new(1.0, 2.0), 0.5), &SvgOptions::default());
        assert!(svg.contains(r#"cx="1" cy="-2" r="0.5""#));
    }

    #[test]
    fn paint_order_follows_z() {
        let node = Node::group(vec![
            Node::circle(Vec2::ORIGIN, 1.0).stroke_color(palette::RED_C).z(ZIndex::FRONT),
            Node::circle(Vec2::ORIGIN, 1.0).stroke_color(palette::BLUE_E),
        ]);
        let svg = to_svg(&node, &SvgOptions::default());
        let red = svg.find(&palette::RED_C.to_hex()).unwrap();
        let blue = svg.find(&palette::BLUE_E.to_hex()).unwrap();
        assert!(blue < red);
    }

    #[test]
    fn text_is_escaped() {
        let svg = to_svg(&Node::text("a<b", Vec2::ORIGIN, 0.3), &SvgOptions::default());
        assert!(svg.contains("a&lt;b"));
    }

    #[test]
    fn full_turn_arc_is_split() {
        let d = arc_d(&ArcShape::new(Vec2::ORIGIN, 1.0, 0.0, 2.0 * PI), true);
        assert_eq!(d.matches('A').count(), 2);
    }

    #[test]
    fn unfilled_shapes_have_no_fill() {
        let svg = to_svg(&Node::line(Vec2::ORIGIN, Vec2::RIGHT), &SvgOptions { background: None, ..Default::default() });
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"stroke-width="0.04""#));
    }
}
