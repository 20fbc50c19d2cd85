use egui::{emath::Rot2, vec2, Color32, Pos2};

use crate::{
    arc::Arc,
    segment::{segment_angle, FontWeight, Segment, DEFAULT_FONT_COLOR, DEFAULT_FONT_SIZE, ONE_TURN},
};

/// Stable id of the interactive wheel surface, for automation hooks.
pub const WHEEL_TEST_ID: &str = "wheel-svg-container";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelStyle {
    pub wheel_background_color: Option<Color32>,
    pub knob_fill: Color32,
    pub winning_segment_color: Option<Color32>,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            wheel_background_color: None,
            knob_fill: Color32::from_rgb(0x21, 0x21, 0x21),
            winning_segment_color: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelDraw {
    pub text: String,
    pub anchor: Pos2,
    /// degrees, clockwise, around `anchor`
    pub rotation: f32,
    pub color: Color32,
    pub size: f32,
    pub weight: FontWeight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IconDraw {
    pub glyph: String,
    pub anchor: Pos2,
    pub rotation: f32,
    pub color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentDraw {
    pub index: usize,
    pub arc: Arc,
    pub path: String,
    pub fill: Color32,
    pub highlighted: bool,
    pub label: LabelDraw,
    pub icon: Option<IconDraw>,
}

/// Everything needed to paint the wheel for one frame, in wheel-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub test_id: &'static str,
    /// degrees, clockwise, applied to every segment
    pub rotation: f32,
    pub background: Option<Color32>,
    pub knob_fill: Color32,
    pub interactive: bool,
    pub segments: Vec<SegmentDraw>,
}

impl Frame {
    pub fn winner(&self) -> Option<&SegmentDraw> {
        self.segments.iter().find(|s| s.highlighted)
    }
}

pub fn present(
    segments: &[Segment],
    winning_index: Option<usize>,
    enabled: bool,
    rotation: f32,
    style: &WheelStyle,
) -> Frame {
    let width = if segments.is_empty() {
        0.0
    } else {
        segment_angle(segments.len())
    };
    let offset = width / 2.0;

    let segments = segments
        .iter()
        .map(|segment| {
            let highlighted = winning_index == Some(segment.index);
            let item = &segment.item;

            let fill = match style.winning_segment_color {
                Some(color) if highlighted => color,
                _ => segment.color,
            };

            let base_color = item.font_color.unwrap_or(DEFAULT_FONT_COLOR);
            let (color, size, weight) = if highlighted {
                (
                    item.winning_font_color.unwrap_or(base_color),
                    item.winning_font_size
                        .or(item.font_size)
                        .unwrap_or(DEFAULT_FONT_SIZE),
                    item.winning_font_weight.or(item.font_weight).unwrap_or_default(),
                )
            } else {
                (
                    base_color,
                    item.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                    item.font_weight.unwrap_or_default(),
                )
            };

            let label_rotation = (segment.index as f32 * width + offset + 90.0) % ONE_TURN;

            SegmentDraw {
                index: segment.index,
                arc: segment.arc,
                path: segment.path.clone(),
                fill,
                highlighted,
                label: LabelDraw {
                    text: item.value.clone(),
                    anchor: segment.centroid,
                    rotation: label_rotation,
                    color,
                    size,
                    weight,
                },
                icon: item.icon.as_ref().map(|glyph| IconDraw {
                    glyph: glyph.clone(),
                    anchor: segment.centroid
                        + Rot2::from_angle(label_rotation.to_radians()) * vec2(item.icon_offset, 0.0),
                    rotation: label_rotation,
                    color,
                }),
            }
        })
        .collect();

    Frame {
        test_id: WHEEL_TEST_ID,
        rotation: rotation - offset,
        background: style.wheel_background_color,
        knob_fill: style.knob_fill,
        interactive: enabled,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{make_wheel, Geometry, WheelItem, WheelItems};

    fn items() -> WheelItems {
        WheelItems::new(vec![
            WheelItem::new("100", Color32::RED).with_font_color(Color32::WHITE),
            WheelItem {
                winning_font_size: Some(24.0),
                winning_font_weight: Some(FontWeight::Bold),
                ..WheelItem::new("200", Color32::GREEN)
                    .with_font_color(Color32::WHITE)
                    .with_winning_font_color(Color32::YELLOW)
            },
            WheelItem {
                icon_offset: 5.0,
                ..WheelItem::new("300", Color32::BLUE).with_icon("★")
            },
        ])
    }

    fn segments() -> Vec<Segment> {
        make_wheel(&items(), Geometry::pie(100.0)).unwrap()
    }

    #[test]
    fn no_winner_uses_base_styles() {
        let frame = present(&segments(), None, true, 0.0, &WheelStyle::default());
        assert!(frame.interactive);
        assert_eq!(frame.test_id, "wheel-svg-container");
        assert!(frame.winner().is_none());

        let fills = frame.segments.iter().map(|s| s.fill).collect::<Vec<_>>();
        assert_eq!(fills, [Color32::RED, Color32::GREEN, Color32::BLUE]);

        let label = &frame.segments[2].label;
        assert_eq!(label.color, DEFAULT_FONT_COLOR);
        assert_eq!(label.size, DEFAULT_FONT_SIZE);
        assert_eq!(label.weight, FontWeight::Normal);
    }

    #[test]
    fn winner_gets_the_winning_overrides() {
        let style = WheelStyle {
            winning_segment_color: Some(Color32::from_rgb(0xFF, 0xD7, 0x00)),
            ..WheelStyle::default()
        };
        let frame = present(&segments(), Some(1), true, 0.0, &style);

        let winner = frame.winner().unwrap();
        assert_eq!(winner.index, 1);
        assert_eq!(winner.fill, Color32::from_rgb(0xFF, 0xD7, 0x00));
        assert_eq!(winner.label.color, Color32::YELLOW);
        assert_eq!(winner.label.size, 24.0);
        assert_eq!(winner.label.weight, FontWeight::Bold);

        assert_eq!(frame.segments[0].fill, Color32::RED);
        assert_eq!(frame.segments[0].label.color, Color32::WHITE);
    }

    #[test]
    fn winner_falls_back_to_base_style() {
        // no winning color configured anywhere
        let frame = present(&segments(), Some(0), true, 0.0, &WheelStyle::default());
        let winner = frame.winner().unwrap();
        assert_eq!(winner.fill, Color32::RED);
        assert_eq!(winner.label.color, Color32::WHITE);
        assert_eq!(winner.label.size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn disabled_wheel_is_not_interactive() {
        let frame = present(&segments(), None, false, 0.0, &WheelStyle::default());
        assert!(!frame.interactive);
    }

    #[test]
    fn rotation_and_label_angles() {
        let frame = present(&segments(), None, true, 100.0, &WheelStyle::default());
        // half a segment back so centers line up with the pointer
        assert!((frame.rotation - 40.0).abs() < 1e-4);

        let angles = frame
            .segments
            .iter()
            .map(|s| s.label.rotation)
            .collect::<Vec<_>>();
        for (angle, expected) in angles.into_iter().zip([150.0, 270.0, 30.0]) {
            assert!((angle - expected).abs() < 1e-3, "{angle} != {expected}");
        }
    }

    #[test]
    fn icons_are_offset_from_the_centroid() {
        let segments = segments();
        let frame = present(&segments, None, true, 0.0, &WheelStyle::default());
        let icon = frame.segments[2].icon.as_ref().unwrap();
        assert_eq!(icon.glyph, "★");
        // pushed along the label's baseline
        assert!(((icon.anchor - segments[2].centroid).length() - 5.0).abs() < 1e-4);
        assert!(frame.segments[0].icon.is_none());
    }

    #[test]
    fn empty_wheel() {
        let frame = present(&[], None, true, 12.0, &WheelStyle::default());
        assert!(frame.segments.is_empty());
        assert_eq!(frame.rotation, 12.0);
    }
}
