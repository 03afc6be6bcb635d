use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, ZIndex};

use crate::component::Component;

/// How the free length of a spring is chosen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SpringSizing {
    /// Total uncompressed height; the coil angle is derived.
    ByHeight(f32),
    /// Coil tilt in radians; the height follows from the coil count.
    ByCoilAngle(f32),
}

/// Shared look of compression springs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpringStyle {
    /// Colour of the coils seen from behind.
    pub fill_color: Color,
    /// Wire radius over external diameter.
    pub geometric_ratio: f32,
}

impl Default for SpringStyle {
    fn default() -> Self {
        Self { fill_color: palette::GREY_C, geometric_ratio: 1.0 / 20.0 }
    }
}

/// Parameters of a [`CompressionSpring`].
///
/// ```rust,ignore
/// let spring = SpringConfig::new(0.4, SpringSizing::ByHeight(1.2))
///     .coils(6)
///     .angle(-FRAC_PI_2)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpringConfig {
    d_ext: f32,
    sizing: SpringSizing,
    n_coils: usize,
    angle: f32,
    color: Color,
    style: SpringStyle,
}

impl SpringConfig {
    pub fn new(d_ext: f32, sizing: SpringSizing) -> Self {
        Self { d_ext, sizing, ..Self::default() }
    }

    /// At least three coils are always drawn.
    pub fn coils(mut self, v: usize) -> Self { self.n_coils = v; self }
    /// Axis rotation; `0` stacks the coils upwards.
    pub fn angle(mut self, v: f32) -> Self { self.angle = v; self }
    pub fn color(mut self, v: Color) -> Self { self.color = v; self }
    pub fn style(mut self, v: SpringStyle) -> Self { self.style = v; self }

    pub fn build(self) -> CompressionSpring {
        CompressionSpring::new(self)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            d_ext: 1.0,
            sizing: SpringSizing::ByCoilAngle(core::f32::consts::PI / 10.0),
            n_coils: 10,
            angle: 0.0,
            color: palette::GREY_B,
            style: SpringStyle::default(),
        }
    }
}

/// Side view of a helical compression spring.
///
/// Each coil is a rounded bar tilted alternately; the odd ones face the
/// viewer. Node layout: one child per coil, base coil first.
#[derive(Debug, Clone)]
pub struct CompressionSpring {
    node: Node,
    n_coils: usize,
    coil_angle: f32,
    d_ext: f32,
    d_coil: f32,
    angle: f32,
}

impl CompressionSpring {
    fn new(cfg: SpringConfig) -> Self {
        let n_coils = cfg.n_coils.max(3);
        let d_coil = 2.0 * cfg.d_ext * cfg.style.geometric_ratio;
        let coil_angle = match cfg.sizing {
            SpringSizing::ByCoilAngle(a) => a,
            SpringSizing::ByHeight(h) => {
                let lead = (h - d_coil) / (n_coils - 2) as f32;
                (lead / (cfg.d_ext - 2.0 * d_coil)).atan()
            }
        };

        let coils = build_coils(&cfg, n_coils, d_coil, coil_angle);
        log::debug!("compression spring: {n_coils} coils, coil angle {coil_angle:.4}");
        Self {
            node: Node::group(coils),
            n_coils,
            coil_angle,
            d_ext: cfg.d_ext,
            d_coil,
            angle: cfg.angle,
        }
    }

    #[inline]
    pub fn n_coils(&self) -> usize {
        self.n_coils
    }

    #[inline]
    pub fn coil_angle(&self) -> f32 {
        self.coil_angle
    }

    /// Wire diameter.
    #[inline]
    pub fn wire_diameter(&self) -> f32 {
        self.d_coil
    }

    /// Unit vector from the base coil towards the free end.
    #[inline]
    pub fn axis(&self) -> Vec2 {
        Vec2::UP.rotated(self.angle)
    }

    /// Centre of the base coil.
    pub fn base(&self) -> Vec2 {
        self.coil_center(0)
    }

    fn coil_center(&self, i: usize) -> Vec2 {
        self.node.child(i).map(Node::center).unwrap_or_default()
    }

    /// Wire diameter plus the distance between the end coils' centres.
    pub fn length(&self) -> f32 {
        self.d_coil + self.coil_center(0).distance(self.coil_center(self.n_coils - 1))
    }

    /// Compresses by `fraction` of the coil tilt (`1` flattens every coil);
    /// negative values extend. The whole spring also moves by `shift`.
    ///
    /// Successive calls are relative: `compress(f)` then `compress(-f)`
    /// restores the previous shape.
    pub fn compress(&mut self, fraction: f32, shift: Vec2) -> Vec<Animation> {
        let anims = self.compression(fraction, shift);
        self.commit(anims)
    }

    /// Animations of [`compress`](Self::compress) without committing them.
    ///
    /// They only depend on the spring's proportions, so they also apply to
    /// any translated copy of [`node`](Component::node).
    pub fn compression(&self, fraction: f32, shift: Vec2) -> Vec<Animation> {
        let fraction = fraction.clamp(-1.0, 1.0);
        let towards_base = -self.axis();
        let mut comp = (fraction * self.coil_angle.sin()).asin();
        let step = (self.d_ext / 2.0 - self.d_coil) * comp.tan();

        let mut position = towards_base * step + shift;
        let mut anims = vec![Animation::mutate([0]).with(Mutation::Shift(shift))];
        for i in 1..self.n_coils {
            if i == self.n_coils - 1 {
                // The end coil stays square to the axis.
                comp = 0.0;
                position -= towards_base * step;
            }
            anims.push(
                Animation::mutate([i])
                    .with(Mutation::rotate(-comp))
                    .with(Mutation::Shift(position)),
            );
            position += towards_base * (2.0 * step);
            comp = -comp;
        }
        anims
    }
}

fn build_coils(cfg: &SpringConfig, n_coils: usize, d_coil: f32, coil_angle: f32) -> Vec<Node> {
    let (sin, cos) = coil_angle.sin_cos();
    let d_spring = cfg.d_ext / cos;
    let lead = (d_spring / 2.0 - d_coil) * sin;

    let mut coils = Vec::with_capacity(n_coils);
    let mut position = 0.0;
    let mut pitch = 1.0;
    let mut tilt = coil_angle;
    for i in 0..n_coils {
        let k = if i == 0 {
            0.0
        } else if i < n_coils - 1 {
            pitch = 2.0;
            -1.0
        } else {
            position -= lead;
            0.0
        };

        let mut coil = Node::rounded_rect(Vec2::ORIGIN, d_spring - d_coil, d_coil, d_coil / 2.0)
            .stroke(cfg.style.fill_color, 1.0)
            .fill(cfg.style.fill_color, 1.0)
            .rotated(tilt * k)
            .shifted(Vec2::UP * position);
        let layer = ZIndex::BASE.winding(i);
        if layer != ZIndex::BASE {
            coil = coil.color(cfg.color).stroke_color(palette::BLACK);
        }
        coil.set_z(layer);
        coils.push(coil);

        position += pitch * lead;
        tilt = -tilt;
    }

    // The base coil sits on the origin, so the axis turns about it.
    for coil in &mut coils {
        coil.rotate_about(cfg.angle, Vec2::ORIGIN);
    }
    coils
}

impl Component for CompressionSpring {
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

    fn spring() -> CompressionSpring {
        SpringConfig::new(1.0, SpringSizing::ByHeight(2.0)).build()
    }

    fn centers(s: &CompressionSpring) -> Vec<Vec2> {
        s.node().children().iter().map(Node::center).collect()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn coil_count_is_at_least_three() {
        let s = SpringConfig::new(1.0, SpringSizing::ByCoilAngle(0.2)).coils(1).build();
        assert_eq!(s.n_coils(), 3);
        assert_eq!(s.node().len(), 3);
    }

    #[test]
    fn by_height_matches_requested_length() {
        let s = spring();
        assert!((s.length() - 2.0).abs() < 0.05, "length {}", s.length());
        assert!((s.wire_diameter() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn odd_coils_face_the_viewer() {
        let s = spring();
        let z = |i: usize| s.node().children()[i].style().map(|st| st.z);
        assert_eq!(z(0), Some(ZIndex::BASE));
        assert_eq!(z(1), Some(ZIndex::FRONT));
        assert_eq!(z(2), Some(ZIndex::BASE));
    }

    #[test]
    fn angle_rotates_about_the_base() {
        let s = SpringConfig::new(1.0, SpringSizing::ByHeight(2.0)).angle(FRAC_PI_2).build();
        assert!(s.base().length() < 1e-5);
        let tip = s.node().children()[s.n_coils() - 1].center();
        assert!(tip.x < -1.5 && tip.y.abs() < 1e-3);
    }

    // ── compression ───────────────────────────────────────────────────────

    #[test]
    fn compression_shortens_and_reverse_restores() {
        let mut s = spring();
        let before = centers(&s);
        let free = s.length();

        let anims = s.compress(0.5, Vec2::ORIGIN);
        assert_eq!(anims.len(), s.n_coils());
        assert!(s.length() < free - 0.5);

        s.compress(-0.5, Vec2::ORIGIN);
        for (a, b) in centers(&s).iter().zip(&before) {
            assert!((*a - *b).length() < 1e-4);
        }
    }

    #[test]
    fn shift_moves_the_base_coil() {
        let mut s = spring();
        s.compress(0.3, Vec2::new(0.0, -0.2));
        assert!((s.base() - Vec2::new(0.0, -0.2)).length() < 1e-5);
    }

    #[test]
    fn fraction_is_clamped() {
        let mut a = spring();
        let mut b = spring();
        a.compress(1.0, Vec2::ORIGIN);
        b.compress(5.0, Vec2::ORIGIN);
        assert!((a.length() - b.length()).abs() < 1e-5);
    }
}
