use egui::{
    emath::Rot2,
    epaint::{Mesh, TextShape},
    pos2, vec2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2,
};

use crate::{
    arc::Arc,
    presentation::{Frame, IconDraw, LabelDraw, SegmentDraw},
    segment::FontWeight,
};

pub struct WheelPainter<'a> {
    painter: &'a Painter,
    center: Pos2,
    radius: f32,
    knob_size: f32,
}

impl<'a> WheelPainter<'a> {
    // degrees per straight piece of an arc
    const ARC_STEP: f32 = 3.0;
    // label sizes are given for a wheel of this radius
    const REFERENCE_RADIUS: f32 = 160.0;

    pub fn new(painter: &'a Painter, wheel: Rect, knob_size: f32) -> Self {
        Self {
            painter,
            center: wheel.center(),
            radius: wheel.width().min(wheel.height()) / 2.0,
            knob_size,
        }
    }

    pub fn paint(&self, frame: &Frame) {
        if let Some(background) = frame.background {
            self.painter.circle_filled(self.center, self.radius, background);
        }

        let rotation = Rot2::from_angle(frame.rotation.to_radians());
        let scale = frame
            .segments
            .first()
            .map(|s| self.radius / s.arc.outer_radius.max(f32::EPSILON))
            .unwrap_or(1.0);

        let to_screen = |p: Pos2| self.center + rotation * (p.to_vec2() * scale);

        for segment in &frame.segments {
            self.paint_segment(segment, &to_screen);
        }

        let text_scale = (self.radius / Self::REFERENCE_RADIUS).clamp(0.5, 2.0);
        for segment in &frame.segments {
            self.paint_label(&segment.label, frame.rotation, text_scale, &to_screen);
            if let Some(icon) = &segment.icon {
                self.paint_icon(icon, frame.rotation, text_scale, &to_screen);
            }
        }

        self.paint_knob(frame.knob_fill);
    }

    fn paint_segment(&self, segment: &SegmentDraw, to_screen: &impl Fn(Pos2) -> Pos2) {
        let arc = &segment.arc;
        let steps = arc.steps_for(Self::ARC_STEP);
        let outer = arc.sample(arc.outer_radius, steps);

        let mut mesh = Mesh::default();
        if arc.inner_radius <= 0.0 {
            mesh.colored_vertex(to_screen(Pos2::ZERO), segment.fill);
            for p in &outer {
                mesh.colored_vertex(to_screen(*p), segment.fill);
            }
            for i in 1..=steps as u32 {
                mesh.add_triangle(0, i, i + 1);
            }
        } else {
            let inner = arc.sample(arc.inner_radius, steps);
            for (o, i) in outer.iter().zip(&inner) {
                mesh.colored_vertex(to_screen(*o), segment.fill);
                mesh.colored_vertex(to_screen(*i), segment.fill);
            }
            for i in 0..steps as u32 {
                let (o0, i0, o1, i1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
                mesh.add_triangle(o0, i0, o1);
                mesh.add_triangle(o1, i0, i1);
            }
        }
        self.painter.add(Shape::mesh(mesh));

        // hairline between neighbours
        let edge = [
            to_screen(Arc::point(arc.inner_radius, arc.start_angle)),
            to_screen(Arc::point(arc.outer_radius, arc.start_angle)),
        ];
        self.painter.line_segment(
            edge,
            Stroke::new(1.0, Color32::from_white_alpha(40)),
        );
    }

    fn paint_text(
        &self,
        text: &str,
        anchor: Pos2,
        angle: f32,
        font_id: FontId,
        color: Color32,
        bold: bool,
    ) {
        let galley = self.painter.layout_no_wrap(text.to_string(), font_id, color);
        let rot = Rot2::from_angle(angle);
        let pos = anchor - rot * (galley.size() / 2.0);

        const PASSES: [Vec2; 2] = [Vec2::ZERO, Vec2 { x: 0.6, y: 0.0 }];
        let passes = if bold { &PASSES[..] } else { &PASSES[..1] };

        for offset in passes {
            let mut shape = TextShape::new(pos + rot * *offset, galley.clone());
            shape.angle = angle;
            self.painter.add(shape);
        }
    }

    fn paint_label(
        &self,
        label: &LabelDraw,
        rotation: f32,
        text_scale: f32,
        to_screen: &impl Fn(Pos2) -> Pos2,
    ) {
        self.paint_text(
            &label.text,
            to_screen(label.anchor),
            (label.rotation + rotation).to_radians(),
            FontId::proportional(label.size * text_scale),
            label.color,
            label.weight == FontWeight::Bold,
        );
    }

    fn paint_icon(
        &self,
        icon: &IconDraw,
        rotation: f32,
        text_scale: f32,
        to_screen: &impl Fn(Pos2) -> Pos2,
    ) {
        self.paint_text(
            &icon.glyph,
            to_screen(icon.anchor),
            (icon.rotation + rotation).to_radians(),
            FontId::proportional(20.0 * text_scale),
            icon.color,
            false,
        );
    }

    // a pin hanging over the rim at 12 o'clock
    fn paint_knob(&self, fill: Color32) {
        let size = self.knob_size;
        let top = self.center.y - self.radius - size;
        let head = pos2(self.center.x, top + size / 2.0);
        let r = size / 2.0;

        self.painter.add(Shape::convex_polygon(
            vec![
                head + vec2(-r * 0.9, r * 0.45),
                head + vec2(r * 0.9, r * 0.45),
                pos2(head.x, head.y + size * 1.25),
            ],
            fill,
            Stroke::none(),
        ));
        self.painter.circle_filled(head, r, fill);
        self.painter.circle_filled(head, r * 0.45, Color32::WHITE);
    }
}
