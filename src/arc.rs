use std::fmt::Write as _;

use egui::{pos2, Pos2};

/// An annular sector centered on the origin.
///
/// Angles are in degrees, measured clockwise from 12 o'clock with the y axis
/// pointing down (the SVG convention). An `inner_radius` of `0.0` is a pie slice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arc {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Arc {
    pub const fn new(inner_radius: f32, outer_radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
        }
    }

    pub fn sweep(&self) -> f32 {
        (self.end_angle - self.start_angle).abs()
    }

    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn is_full_circle(&self) -> bool {
        self.sweep() >= 360.0 - f32::EPSILON
    }

    /// The point on the circle of `radius` at `degrees`.
    pub fn point(radius: f32, degrees: f32) -> Pos2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        pos2(radius * sin, -radius * cos)
    }

    /// Middle of the sector: halfway between the radii, at the mid angle.
    pub fn centroid(&self) -> Pos2 {
        Self::point(
            (self.inner_radius + self.outer_radius) / 2.0,
            self.mid_angle(),
        )
    }

    /// Points along the arc of `radius`, from start to end, `steps + 1` of them.
    pub fn sample(&self, radius: f32, steps: usize) -> Vec<Pos2> {
        let steps = steps.max(1);
        let sweep = self.end_angle - self.start_angle;
        (0..=steps)
            .map(|i| Self::point(radius, self.start_angle + sweep * i as f32 / steps as f32))
            .collect()
    }

    /// How many straight pieces to use when approximating this arc at `max_step` degrees each.
    pub fn steps_for(&self, max_step: f32) -> usize {
        (self.sweep() / max_step.max(0.1)).ceil().max(1.0) as usize
    }

    /// SVG path data, shaped like d3's `arc()` output.
    pub fn svg_path(&self) -> String {
        let (r0, r1) = (self.inner_radius, self.outer_radius);
        let mut path = String::new();

        if self.is_full_circle() {
            let _ = write!(
                path,
                "M0,{}A{r},{r},0,1,1,0,{}A{r},{r},0,1,1,0,{}",
                num(-r1),
                num(r1),
                num(-r1),
                r = num(r1),
            );
            if r0 > 0.0 {
                let _ = write!(
                    path,
                    "M0,{}A{r},{r},0,1,0,0,{}A{r},{r},0,1,0,0,{}",
                    num(-r0),
                    num(r0),
                    num(-r0),
                    r = num(r0),
                );
            }
            path.push('Z');
            return path;
        }

        let large = if self.sweep() > 180.0 { 1 } else { 0 };
        let a0 = Self::point(r1, self.start_angle);
        let a1 = Self::point(r1, self.end_angle);

        let _ = write!(
            path,
            "M{},{}A{r},{r},0,{large},1,{},{}",
            num(a0.x),
            num(a0.y),
            num(a1.x),
            num(a1.y),
            r = num(r1),
        );

        if r0 > 0.0 {
            let b1 = Self::point(r0, self.end_angle);
            let b0 = Self::point(r0, self.start_angle);
            let _ = write!(
                path,
                "L{},{}A{r},{r},0,{large},0,{},{}Z",
                num(b1.x),
                num(b1.y),
                num(b0.x),
                num(b0.y),
                r = num(r0),
            );
        } else {
            path.push_str("L0,0Z");
        }

        path
    }
}

// at most three decimals, no trailing zeros, and never "-0"
fn num(v: f32) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
