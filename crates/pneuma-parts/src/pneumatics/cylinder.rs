use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::geom::{self, BooleanOperation};
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath, ZIndex};

use crate::component::Component;

/// Colours of a cylinder.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CylinderStyle {
    pub barrel_color: Color,
    pub head_color: Color,
    pub rod_color: Color,
    pub fitting_color: Color,
    /// Air colour of a chamber with no volume left.
    pub air_deep: Color,
    /// Air colour of a chamber spanning the whole barrel.
    pub air_light: Color,
    pub air_opacity: f32,
}

impl Default for CylinderStyle {
    fn default() -> Self {
        Self {
            barrel_color: palette::BLACK,
            head_color: palette::GREY_C,
            rod_color: palette::GREY,
            fitting_color: palette::GREY_B,
            air_deep: palette::BLUE_E,
            air_light: palette::BLUE_A,
            air_opacity: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CylinderConfig {
    height: f32,
    width: f32,
    angle: f32,
    style: CylinderStyle,
}

impl CylinderConfig {
    pub fn new(height: f32, width: f32) -> Self {
        Self { height, width, ..Self::default() }
    }

    /// Direction of the rod, counter-clockwise from +X.
    pub fn angle(mut self, v: f32) -> Self { self.angle = v; self }
    pub fn style(mut self, v: CylinderStyle) -> Self { self.style = v; self }

    pub fn build(self) -> DoubleActingCylinder {
        DoubleActingCylinder::new(self)
    }
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self { height: 2.0, width: 4.0, angle: 0.0, style: CylinderStyle::default() }
    }
}

/// Double-acting cylinder with air chambers on both sides of the piston.
///
/// Node layout:
/// - `0` barrel
/// - `1` moving parts: `[piston head, rod]`
/// - `2` fittings: `[rear, front]`
/// - `3` air: `[rear chamber, front chamber]`
#[derive(Debug, Clone)]
pub struct DoubleActingCylinder {
    node: Node,
    height: f32,
    width: f32,
    angle: f32,
    style: CylinderStyle,
    /// Rod travel at full stroke.
    stroke: f32,
    /// Current rod displacement along the axis.
    travel: f32,
    /// Flips on every `open_close`, even a zero-length one.
    extended: bool,
    fittings_flipped: bool,
}

impl DoubleActingCylinder {
    const BARREL: usize = 0;
    const MOVING: usize = 1;
    const FITTINGS: usize = 2;
    const AIR: usize = 3;

    fn new(cfg: CylinderConfig) -> Self {
        let CylinderConfig { height: h, width: w, angle, style } = cfg;
        let r = h / 20.0;
        let stroke = w - 2.0 * r;

        let barrel = Node::rounded_rect(Vec2::ORIGIN, w, h, r).stroke(style.barrel_color, 2.0 * h);

        let head = Node::rounded_rect(Vec2::LEFT * (stroke / 2.0 - w / 8.0), w / 8.0, 0.99 * h, r / 2.0)
            .no_stroke()
            .fill(style.head_color, 1.0);
        let rod = Node::rounded_rect(Vec2::ORIGIN, 0.85 * w, h / 5.0, r / 2.0)
            .color(style.rod_color)
            .fill_opacity(1.0)
            .placed_next_to(head.bounds(), Vec2::RIGHT, 0.0);

        let (fw, fh) = (w / 40.0, h / 10.0);
        let fitting = |corner: Vec2, inset: Vec2| {
            Node::rect(Vec2::ORIGIN, fw, fh)
                .color(style.fitting_color)
                .fill_opacity(1.0)
                .placed_next_to(barrel.bounds(), corner, 0.0)
                .shifted(inset + Vec2::UP * (h / 50.0))
        };
        let fittings = Node::group(vec![
            fitting(Vec2::UL, Vec2::RIGHT * (w / 12.0)),
            fitting(Vec2::UR, Vec2::LEFT * (w / 12.0)),
        ]);

        let mut node = Node::group(vec![barrel, Node::group(vec![head, rod]), fittings]);
        node.rotate_about(angle, Vec2::ORIGIN);

        let mut cylinder = Self {
            node,
            height: h,
            width: w,
            angle,
            style,
            stroke,
            travel: 0.0,
            extended: false,
            fittings_flipped: false,
        };
        let air = Node::group(vec![cylinder.air_area(-1.0, 0.0), cylinder.air_area(1.0, 0.0)]);
        cylinder.node.push(air);
        log::debug!("double-acting cylinder {w}x{h}, angle {angle}");
        cylinder
    }

    /// Unit vector along the rod.
    #[inline]
    pub fn axis(&self) -> Vec2 {
        Vec2::RIGHT.rotated(self.angle)
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    #[inline]
    pub fn stroke(&self) -> f32 {
        self.stroke
    }

    fn part(&self, path: &[usize]) -> Option<&Node> {
        self.node.get(&NodePath::from(path.to_vec())).ok()
    }

    /// Air chamber on side `sgn` (`-1` rear, `1` front) with the piston moved
    /// `ahead` further along the axis.
    fn air_area(&self, sgn: f32, ahead: f32) -> Node {
        let Some(barrel) = self.part(&[Self::BARREL]) else {
            return Node::empty();
        };
        let origin = barrel.center();
        let u = self.axis();
        let piston = self.part(&[Self::MOVING, 0]).map(Node::center).unwrap_or(origin);
        let s = (piston - origin).dot(u) + ahead;

        let w = self.width;
        let face = sgn * s + w / 16.0;
        let span = (w / 2.0 - face).clamp(0.0, w);
        let center = origin + u * (sgn * (w / 2.0 - span / 2.0));
        let mask = Node::rect(center, span.max(1e-6), self.width.hypot(self.height))
            .rotated_about(self.angle, center);

        let color = self.style.air_deep.lerp(self.style.air_light, (span / w).clamp(0.0, 1.0));
        let mut area = geom::boolean(barrel, &mask, BooleanOperation::Intersection);
        area.set_fill(color, self.style.air_opacity);
        area.set_stroke_width(0.0);
        area.set_z(ZIndex::BEHIND);
        area
    }

    /// Extends the rod by `fraction` of the stroke, or retracts it to the
    /// rear if already extended. Returns the rod motion and the air chambers'
    /// new shapes.
    pub fn open_close(&mut self, fraction: f32, run_time: f32) -> Vec<Animation> {
        let target = if self.extended { 0.0 } else { self.stroke * fraction.clamp(0.0, 1.0) };
        let by = target - self.travel;
        self.travel = target;
        self.extended = !self.extended;

        let rear = self.air_area(-1.0, by);
        let front = self.air_area(1.0, by);
        let anims = vec![
            Animation::mutate([Self::MOVING]).with(Mutation::Shift(self.axis() * by)),
            Animation::mutate([Self::AIR, 0]).with(Mutation::Become(rear)),
            Animation::mutate([Self::AIR, 1]).with(Mutation::Become(front)),
        ];
        let anims = anims.into_iter().map(|a| a.run_time(run_time)).collect();
        self.commit(anims)
    }

    /// Moves both fittings to the opposite barrel wall.
    pub fn switch_fitting_side(&mut self) -> Vec<Animation> {
        let distance = self.height + self.height / 10.0 + 2.0 * self.height / 50.0;
        let dir = if self.fittings_flipped { Vec2::UP } else { Vec2::DOWN };
        self.fittings_flipped = !self.fittings_flipped;
        let anim = Animation::mutate([Self::FITTINGS])
            .with(Mutation::Shift(dir.rotated(self.angle) * distance));
        self.commit(vec![anim])
    }

    /// Outer end of fitting `index` (`0` rear, `1` front), where a pipe
    /// attaches.
    pub fn fitting(&self, index: usize) -> Vec2 {
        let outward = if self.fittings_flipped { Vec2::DOWN } else { Vec2::UP };
        self.part(&[Self::FITTINGS, index])
            .map(|f| f.center() + outward.rotated(self.angle) * (self.height / 20.0))
            .unwrap_or_default()
    }
}

impl Component for DoubleActingCylinder {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;
    use pneuma_engine::geom::signed_area;

    fn area(node: &Node) -> f32 {
        let mut total = 0.0;
        node.for_each_item(&mut |it| {
            total += signed_area(&Node::Shape(it.clone()).outline()).abs();
        });
        total
    }

    fn air(c: &DoubleActingCylinder) -> (f32, f32) {
        let part = |i| c.node().get(&NodePath::from([3, i])).map(area).unwrap_or(f32::NAN);
        (part(0), part(1))
    }

    #[test]
    fn air_partitions_the_barrel() {
        let c = CylinderConfig::default().build();
        let barrel = area(&c.node().children()[0]);
        let (rear, front) = air(&c);
        // Piston head is w/8 wide over the full height.
        assert!((rear + front + 0.5 * 2.0 - barrel).abs() < 2e-2, "{rear} + {front} vs {barrel}");
        assert!(rear < front);
    }

    #[test]
    fn stroke_moves_rod_and_air() {
        let mut c = CylinderConfig::default().build();
        let head = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        let (rear0, front0) = air(&c);

        let anims = c.open_close(0.75, 1.0);
        assert_eq!(anims.len(), 3);
        assert!(c.is_extended());
        let moved = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        assert!((moved.x - head.x - 0.75 * c.stroke()).abs() < 1e-4);
        let (rear1, front1) = air(&c);
        assert!(rear1 > rear0 && front1 < front0);
        assert!(((rear1 + front1) - (rear0 + front0)).abs() < 2e-2);

        c.open_close(0.75, 1.0);
        let back = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        assert!((back - head).length() < 1e-4);
    }

    #[test]
    fn zero_stroke_still_counts_as_extended() {
        let mut c = CylinderConfig::default().build();
        let head = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        c.open_close(0.0, 1.0);
        assert!(c.is_extended());

        // The next call retracts, so the fraction is ignored.
        c.open_close(0.5, 1.0);
        assert!(!c.is_extended());
        let now = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        assert!((now - head).length() < 1e-4);

        c.open_close(0.5, 1.0);
        assert!(c.is_extended());
    }

    #[test]
    fn air_colour_tracks_volume() {
        let c = CylinderConfig::default().build();
        let fill = |i| {
            c.node().get(&NodePath::from([3, i])).ok().and_then(Node::style).map(|s| s.fill.color)
        };
        let style = CylinderStyle::default();
        // Rear chamber is nearly empty, so close to the deep colour.
        let rear = fill(0).unwrap_or_default();
        let deep = style.air_deep;
        assert!((rear.r - deep.r).abs() < (rear.r - style.air_light.r).abs());
        assert!(fill(1).is_some());
    }

    #[test]
    fn rotated_cylinder_strokes_along_its_axis() {
        let mut c = CylinderConfig::default().angle(FRAC_PI_2).build();
        let head = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        c.open_close(1.0, 1.0);
        let moved = c.node().get(&NodePath::from([1, 0])).map(Node::center).unwrap_or_default();
        assert!((moved.x - head.x).abs() < 1e-4);
        assert!((moved.y - head.y - c.stroke()).abs() < 1e-4);
    }

    #[test]
    fn fittings_switch_and_return() {
        let mut c = CylinderConfig::default().build();
        let top = c.fitting(0);
        assert!(top.y > 1.0);
        c.switch_fitting_side();
        let bottom = c.fitting(0);
        assert!(bottom.y < -1.0);
        assert!((bottom.x - top.x).abs() < 1e-5);
        c.switch_fitting_side();
        assert!((c.fitting(0) - top).length() < 1e-5);
    }
}
