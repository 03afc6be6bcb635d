use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};
use crate::paint::{palette, Color, Fill, Style};

use super::shapes::{
    AnnulusShape, ArcShape, ArrowShape, CircleShape, PathShape, RoundedRectShape, Shape, TextShape,
    DEFAULT_TOLERANCE,
};
use super::{DrawCmd, DrawList, NodePath, PathError, ZIndex};

/// Default radius of [`Node::dot`].
pub const DOT_RADIUS: f32 = 0.08;

/// Leaf of the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub shape: Shape,
    pub style: Style,
}

/// Scene tree: a styled shape or an ordered group of nodes.
///
/// Children are addressed by index through [`NodePath`]; inserting or removing
/// children shifts the paths of later siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Shape(Item),
    Group(Vec<Node>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Group(Vec::new())
    }
}

// ── constructors ──────────────────────────────────────────────────────────

impl Node {
    #[inline]
    pub fn shape(shape: Shape, style: Style) -> Self {
        Node::Shape(Item { shape, style })
    }

    #[inline]
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group(children)
    }

    #[inline]
    pub fn empty() -> Self {
        Node::Group(Vec::new())
    }

    pub fn line(from: Vec2, to: Vec2) -> Self {
        Self::polyline(vec![from, to])
    }

    pub fn polyline(points: Vec<Vec2>) -> Self {
        Self::shape(Shape::Path(PathShape::open(points)), Style::outline())
    }

    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self::shape(Shape::Path(PathShape::closed(points)), Style::outline())
    }

    /// Closed polygon with `n` vertices on a circle; the first one sits at
    /// `start_angle`.
    pub fn regular_polygon(center: Vec2, n: usize, radius: f32, start_angle: f32) -> Self {
        let n = n.max(3);
        let step = core::f32::consts::TAU / n as f32;
        Self::polygon(
            (0..n)
                .map(|i| center + Vec2::from_angle(start_angle + step * i as f32) * radius)
                .collect(),
        )
    }

    /// Equilateral triangle pointing up.
    pub fn triangle(center: Vec2, radius: f32) -> Self {
        Self::regular_polygon(center, 3, radius, core::f32::consts::FRAC_PI_2)
    }

    pub fn rect(center: Vec2, width: f32, height: f32) -> Self {
        Self::rounded_rect(center, width, height, 0.0)
    }

    pub fn square(center: Vec2, side: f32) -> Self {
        Self::rect(center, side, side)
    }

    pub fn rounded_rect(center: Vec2, width: f32, height: f32, radius: f32) -> Self {
        Self::shape(
            Shape::RoundedRect(RoundedRectShape::new(center, width, height, radius)),
            Style::outline(),
        )
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::shape(Shape::Circle(CircleShape::new(center, radius)), Style::outline())
    }

    /// Small filled disc.
    pub fn dot(center: Vec2, radius: f32) -> Self {
        Self::shape(Shape::Circle(CircleShape::new(center, radius)), Style::solid(palette::BLACK))
    }

    pub fn arc(center: Vec2, radius: f32, start_angle: f32, sweep: f32) -> Self {
        Self::shape(
            Shape::Arc(ArcShape::new(center, radius, start_angle, sweep)),
            Style::outline(),
        )
    }

    /// Arc from `from` to `to` turning by `angle`; a zero angle gives a line.
    pub fn arc_between(from: Vec2, to: Vec2, angle: f32) -> Self {
        match ArcShape::between(from, to, angle) {
            Some(arc) => Self::shape(Shape::Arc(arc), Style::outline()),
            None => Self::line(from, to),
        }
    }

    pub fn annulus(center: Vec2, inner: f32, outer: f32) -> Self {
        Self::shape(
            Shape::Annulus(AnnulusShape::ring(center, inner, outer)),
            Style::solid(palette::BLACK),
        )
    }

    pub fn annular_sector(center: Vec2, inner: f32, outer: f32, start_angle: f32, sweep: f32) -> Self {
        Self::shape(
            Shape::Annulus(AnnulusShape::sector(center, inner, outer, start_angle, sweep)),
            Style::solid(palette::BLACK),
        )
    }

    /// Arrow with a filled tip in the stroke colour.
    pub fn arrow(from: Vec2, to: Vec2) -> Self {
        let mut style = Style::outline();
        style.fill = Fill::solid(palette::BLACK);
        Self::shape(Shape::Arrow(ArrowShape::new(from, to)), style)
    }

    /// Arrow whose tip is at most `max_ratio` of its length.
    pub fn arrow_with_ratio(from: Vec2, to: Vec2, max_ratio: f32) -> Self {
        let tip = ArrowShape::DEFAULT_TIP_LENGTH.min(max_ratio * from.distance(to));
        let mut style = Style::outline();
        style.fill = Fill::solid(palette::BLACK);
        Self::shape(Shape::Arrow(ArrowShape::with_tip(from, to, tip)), style)
    }

    pub fn text(text: impl Into<String>, center: Vec2, size: f32) -> Self {
        Self::shape(Shape::Text(TextShape::new(text, center, size)), Style::solid(palette::BLACK))
    }
}

// ── style builders ────────────────────────────────────────────────────────

impl Node {
    pub fn stroke(mut self, color: Color, width: f32) -> Self {
        self.set_stroke(color, width);
        self
    }

    pub fn stroke_color(mut self, color: Color) -> Self {
        self.set_stroke_color(color);
        self
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.set_stroke_width(width);
        self
    }

    pub fn stroke_opacity(mut self, opacity: f32) -> Self {
        self.for_each_item_mut(&mut |it| it.style.stroke.opacity = opacity.clamp(0.0, 1.0));
        self
    }

    pub fn no_stroke(self) -> Self {
        self.stroke_width(0.0)
    }

    pub fn fill(mut self, color: Color, opacity: f32) -> Self {
        self.set_fill(color, opacity);
        self
    }

    pub fn fill_color(mut self, color: Color) -> Self {
        self.set_fill_color(color);
        self
    }

    pub fn fill_opacity(mut self, opacity: f32) -> Self {
        self.set_fill_opacity(opacity);
        self
    }

    /// Stroke and fill colour together; opacities are kept.
    pub fn color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    pub fn z(mut self, z: ZIndex) -> Self {
        self.set_z(z);
        self
    }
}

// ── style mutators ────────────────────────────────────────────────────────

impl Node {
    pub fn set_stroke(&mut self, color: Color, width: f32) {
        self.for_each_item_mut(&mut |it| {
            it.style.stroke.color = color;
            it.style.stroke.width = width;
        });
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.for_each_item_mut(&mut |it| it.style.stroke.color = color);
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.for_each_item_mut(&mut |it| it.style.stroke.width = width.max(0.0));
    }

    pub fn set_fill(&mut self, color: Color, opacity: f32) {
        self.for_each_item_mut(&mut |it| it.style.fill = Fill::new(color, opacity));
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.for_each_item_mut(&mut |it| it.style.fill.color = color);
    }

    pub fn set_fill_opacity(&mut self, opacity: f32) {
        self.for_each_item_mut(&mut |it| it.style.fill.opacity = opacity.clamp(0.0, 1.0));
    }

    pub fn set_color(&mut self, color: Color) {
        self.for_each_item_mut(&mut |it| {
            it.style.stroke.color = color;
            it.style.fill.color = color;
        });
    }

    pub fn set_z(&mut self, z: ZIndex) {
        self.for_each_item_mut(&mut |it| it.style.z = z);
    }
}

// ── geometry ──────────────────────────────────────────────────────────────

impl Node {
    pub fn transform(&mut self, t: &Affine) {
        self.for_each_item_mut(&mut |it| it.shape.transform(t));
    }

    pub fn shift(&mut self, by: Vec2) {
        self.transform(&Affine::translate(by));
    }

    /// Rotates counter-clockwise about the bounds centre.
    pub fn rotate(&mut self, angle: f32) {
        let c = self.center();
        self.rotate_about(angle, c);
    }

    pub fn rotate_about(&mut self, angle: f32, about: Vec2) {
        self.transform(&Affine::rotate_about(about, angle));
    }

    pub fn scale(&mut self, factor: f32) {
        let c = self.center();
        self.scale_about(factor, c);
    }

    pub fn scale_about(&mut self, factor: f32, about: Vec2) {
        self.transform(&Affine::scale_about(about, factor));
    }

    /// Scales along `axis` only.
    pub fn stretch(&mut self, factor: f32, axis: Vec2) {
        let c = self.center();
        self.stretch_about(factor, axis, c);
    }

    pub fn stretch_about(&mut self, factor: f32, axis: Vec2, about: Vec2) {
        self.transform(&Affine::stretch_about(about, axis, factor));
    }

    /// Half-turn about the in-plane `axis` through the bounds centre.
    pub fn flip(&mut self, axis: Vec2) {
        let c = self.center();
        self.flip_about(axis, c);
    }

    pub fn flip_about(&mut self, axis: Vec2, about: Vec2) {
        self.transform(&Affine::flip_about(about, axis));
    }

    /// Moves the bounds centre onto `point`.
    pub fn move_to(&mut self, point: Vec2) {
        let c = self.center();
        self.shift(point - c);
    }

    /// Places this node beside `target` in direction `dir`, `buff` apart.
    pub fn next_to(&mut self, target: Rect, dir: Vec2, buff: f32) {
        let anchor = self.critical_point(-dir);
        self.shift(target.critical_point(dir) - anchor + dir * buff);
    }

    pub fn next_to_point(&mut self, point: Vec2, dir: Vec2, buff: f32) {
        self.next_to(Rect::from_origin_size(point, Vec2::zero()), dir, buff);
    }

    /// Aligns the `dir` edge(s) with the same edge(s) of `target`.
    pub fn align_to(&mut self, target: Rect, dir: Vec2) {
        let mine = self.critical_point(dir);
        let theirs = target.critical_point(dir);
        let mut by = theirs - mine;
        if dir.x == 0.0 {
            by.x = 0.0;
        }
        if dir.y == 0.0 {
            by.y = 0.0;
        }
        self.shift(by);
    }

    pub fn shifted(mut self, by: Vec2) -> Self {
        self.shift(by);
        self
    }

    pub fn rotated(mut self, angle: f32) -> Self {
        self.rotate(angle);
        self
    }

    pub fn rotated_about(mut self, angle: f32, about: Vec2) -> Self {
        self.rotate_about(angle, about);
        self
    }

    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale(factor);
        self
    }

    pub fn flipped(mut self, axis: Vec2) -> Self {
        self.flip(axis);
        self
    }

    pub fn moved_to(mut self, point: Vec2) -> Self {
        self.move_to(point);
        self
    }

    pub fn placed_next_to(mut self, target: Rect, dir: Vec2, buff: f32) -> Self {
        self.next_to(target, dir, buff);
        self
    }
}

// ── queries ───────────────────────────────────────────────────────────────

impl Node {
    /// Union of every shape's bounds, or `None` for an empty tree.
    pub fn try_bounds(&self) -> Option<Rect> {
        let mut acc: Option<Rect> = None;
        self.for_each_item(&mut |it| {
            let b = it.shape.bounds();
            acc = Some(match acc {
                Some(r) => r.union(b),
                None => b,
            });
        });
        acc
    }

    /// Bounds; an empty tree is a zero box at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.try_bounds().unwrap_or_default()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    #[inline]
    pub fn critical_point(&self, dir: Vec2) -> Vec2 {
        self.bounds().critical_point(dir)
    }

    #[inline]
    pub fn top(&self) -> Vec2 {
        self.bounds().top()
    }

    #[inline]
    pub fn bottom(&self) -> Vec2 {
        self.bounds().bottom()
    }

    #[inline]
    pub fn left(&self) -> Vec2 {
        self.bounds().left()
    }

    #[inline]
    pub fn right(&self) -> Vec2 {
        self.bounds().right()
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.bounds().width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bounds().height()
    }

    /// Start of the first shape in tree order.
    pub fn start(&self) -> Vec2 {
        match self {
            Node::Shape(it) => it.shape.start(),
            Node::Group(children) => children.first().map(Node::start).unwrap_or_default(),
        }
    }

    /// End of the last shape in tree order.
    pub fn end(&self) -> Vec2 {
        match self {
            Node::Shape(it) => it.shape.end(),
            Node::Group(children) => children.last().map(Node::end).unwrap_or_default(),
        }
    }

    /// Outline of a leaf; groups have none.
    pub fn outline(&self) -> Vec<Vec2> {
        match self {
            Node::Shape(it) => it.shape.outline(DEFAULT_TOLERANCE),
            Node::Group(_) => Vec::new(),
        }
    }

    #[inline]
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Node::Shape(it) => Some(it),
            Node::Group(_) => None,
        }
    }

    #[inline]
    pub fn style(&self) -> Option<&Style> {
        self.as_item().map(|it| &it.style)
    }

    /// Children of a group; a leaf has none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group(children) => children,
            Node::Shape(_) => &[],
        }
    }

    /// Number of direct children.
    #[inline]
    pub fn len(&self) -> usize {
        self.children().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        match self {
            Node::Group(children) => children.get_mut(index),
            Node::Shape(_) => None,
        }
    }

    /// Appends a child and returns its index. A leaf is first wrapped in a group.
    pub fn push(&mut self, child: Node) -> usize {
        match self {
            Node::Group(children) => {
                children.push(child);
                children.len() - 1
            }
            Node::Shape(_) => {
                let leaf = core::mem::take(self);
                *self = Node::Group(vec![leaf, child]);
                1
            }
        }
    }

    pub fn get(&self, path: &NodePath) -> Result<&Node, PathError> {
        let mut node = self;
        for (depth, &i) in path.indices().iter().enumerate() {
            node = node
                .child(i)
                .ok_or_else(|| PathError { path: path.clone(), depth })?;
        }
        Ok(node)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Result<&mut Node, PathError> {
        let mut node = self;
        for (depth, &i) in path.indices().iter().enumerate() {
            node = node
                .child_mut(i)
                .ok_or_else(|| PathError { path: path.clone(), depth })?;
        }
        Ok(node)
    }

    /// Visits every leaf in tree order.
    pub fn for_each_item(&self, f: &mut impl FnMut(&Item)) {
        match self {
            Node::Shape(it) => f(it),
            Node::Group(children) => {
                for c in children {
                    c.for_each_item(f);
                }
            }
        }
    }

    pub fn for_each_item_mut(&mut self, f: &mut impl FnMut(&mut Item)) {
        match self {
            Node::Shape(it) => f(it),
            Node::Group(children) => {
                for c in children {
                    c.for_each_item_mut(f);
                }
            }
        }
    }

    /// Number of leaves in the whole tree.
    pub fn item_count(&self) -> usize {
        let mut n = 0;
        self.for_each_item(&mut |_| n += 1);
        n
    }

    /// Records every visible leaf into `list`.
    pub fn draw_into(&self, list: &mut DrawList) {
        self.for_each_item(&mut |it| {
            let cmd = DrawCmd::new(it.shape.clone(), it.style.stroke, it.style.fill);
            if cmd.is_visible() {
                list.push(it.style.z, cmd);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::{FRAC_PI_2, PI};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn next_to_leaves_the_requested_gap() {
        let anchor = Node::square(Vec2::ORIGIN, 2.0);
        let mut label = Node::square(Vec2::new(5.0, 5.0), 0.5);
        label.next_to(anchor.bounds(), Vec2::DOWN, 0.1);
        assert!(close(label.top(), Vec2::new(0.0, -1.1)));
    }

    #[test]
    fn move_to_recentres_a_group() {
        let mut g = Node::group(vec![
            Node::circle(Vec2::new(-1.0, 0.0), 0.5),
            Node::circle(Vec2::new(3.0, 0.0), 0.5),
        ]);
        g.move_to(Vec2::ORIGIN);
        assert!(close(g.center(), Vec2::ORIGIN));
    }

    #[test]
    fn align_to_only_moves_the_requested_axis() {
        let target = Rect::new(0.0, 0.0, 4.0, 4.0);
        let mut n = Node::square(Vec2::new(10.0, 10.0), 1.0);
        n.align_to(target, Vec2::LEFT);
        assert!((n.bounds().min().x - 0.0).abs() < 1e-5);
        assert!((n.center().y - 10.0).abs() < 1e-5);
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn rotation_about_centre_keeps_centre() {
        let mut r = Node::rect(Vec2::new(1.0, 2.0), 4.0, 1.0);
        r.rotate(FRAC_PI_2);
        assert!(close(r.center(), Vec2::new(1.0, 2.0)));
        assert!((r.width() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn flip_about_up_mirrors_an_arc() {
        let mut a = Node::arc(Vec2::ORIGIN, 1.0, 0.0, FRAC_PI_2);
        a.flip_about(Vec2::UP, Vec2::ORIGIN);
        assert!(close(a.start(), Vec2::new(-1.0, 0.0)));
        assert!(close(a.end(), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn stretch_turns_circles_into_paths() {
        let mut c = Node::circle(Vec2::ORIGIN, 1.0);
        c.stretch(2.0, Vec2::RIGHT);
        assert!(matches!(c.as_item().map(|i| &i.shape), Some(Shape::Path(_))));
        assert!((c.width() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn arc_between_with_zero_angle_is_a_line() {
        let n = Node::arc_between(Vec2::ORIGIN, Vec2::RIGHT, 0.0);
        assert!(matches!(n.as_item().map(|i| &i.shape), Some(Shape::Path(_))));
        let a = Node::arc_between(Vec2::ORIGIN, Vec2::RIGHT, PI);
        assert!(close(a.end(), Vec2::RIGHT));
    }

    // ── addressing ────────────────────────────────────────────────────────

    #[test]
    fn get_resolves_nested_paths() {
        let tree = Node::group(vec![
            Node::line(Vec2::ORIGIN, Vec2::UP),
            Node::group(vec![Node::circle(Vec2::ORIGIN, 1.0), Node::dot(Vec2::ORIGIN, DOT_RADIUS)]),
        ]);
        assert!(tree.get(&NodePath::from([1, 1])).is_ok());
        let err = tree.get(&NodePath::from([1, 5])).unwrap_err();
        assert_eq!(err.depth, 1);
        assert!(tree.get(&NodePath::from([0, 0])).is_err());
    }

    #[test]
    fn triangle_points_up() {
        let t = Node::triangle(Vec2::ORIGIN, 1.0);
        assert!(close(t.top(), Vec2::UP));
        assert!((t.bottom().y + 0.5).abs() < 1e-5);
        assert_eq!(t.outline().len(), 3);
    }

    #[test]
    fn push_onto_leaf_wraps_it() {
        let mut n = Node::line(Vec2::ORIGIN, Vec2::UP);
        assert_eq!(n.push(Node::dot(Vec2::UP, DOT_RADIUS)), 1);
        assert_eq!(n.len(), 2);
    }

    #[test]
    fn color_keeps_opacity() {
        let n = Node::circle(Vec2::ORIGIN, 1.0)
            .fill(palette::BLUE_E, 0.4)
            .color(palette::RED_C);
        let s = n.style().unwrap();
        assert_eq!(s.fill.color, palette::RED_C);
        assert_eq!(s.stroke.color, palette::RED_C);
        assert!((s.fill.opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn empty_group_bounds_are_at_origin() {
        assert!(Node::empty().try_bounds().is_none());
        assert_eq!(Node::empty().center(), Vec2::ORIGIN);
    }
}
