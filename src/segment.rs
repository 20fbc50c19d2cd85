use egui::{Color32, Pos2};

use crate::{arc::Arc, ConfigurationError};

pub const ONE_TURN: f32 = 360.0;

pub const DEFAULT_FONT_COLOR: Color32 = Color32::BLACK;
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// What a single wedge shows, and how.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelItem {
    pub value: String,
    pub icon: Option<String>,
    pub segment_color: Color32,
    pub font_color: Option<Color32>,
    pub font_weight: Option<FontWeight>,
    pub font_size: Option<f32>,
    pub winning_font_color: Option<Color32>,
    pub winning_font_weight: Option<FontWeight>,
    pub winning_font_size: Option<f32>,
    pub icon_offset: f32,
}

impl WheelItem {
    pub fn new(value: impl ToString, segment_color: Color32) -> Self {
        Self {
            value: value.to_string(),
            icon: None,
            segment_color,
            font_color: None,
            font_weight: None,
            font_size: None,
            winning_font_color: None,
            winning_font_weight: None,
            winning_font_size: None,
            icon_offset: 0.0,
        }
    }

    pub fn with_icon(self, icon: impl ToString) -> Self {
        Self {
            icon: Some(icon.to_string()),
            ..self
        }
    }

    pub fn with_font_color(self, color: Color32) -> Self {
        Self {
            font_color: Some(color),
            ..self
        }
    }

    pub fn with_winning_font_color(self, color: Color32) -> Self {
        Self {
            winning_font_color: Some(color),
            ..self
        }
    }
}

/// The ordered item table of a wheel. Its length is the segment count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelItems {
    items: Vec<WheelItem>,
}

impl WheelItems {
    pub fn new(items: Vec<WheelItem>) -> Self {
        Self { items }
    }

    /// Pairs `labels[i]` with `colors[i]`. Both must have the same length.
    pub fn from_labels<L, C>(labels: &[L], colors: &[C]) -> Result<Self, ConfigurationError>
    where
        L: ToString,
        C: Copy + Into<Color32>,
    {
        if labels.len() != colors.len() {
            return Err(ConfigurationError::LengthMismatch {
                what: "colors",
                expected: labels.len(),
                actual: colors.len(),
            });
        }

        Ok(Self::new(
            labels
                .iter()
                .zip(colors)
                .map(|(label, &color)| WheelItem::new(label.to_string(), color.into()))
                .collect(),
        ))
    }

    /// A numbered wheel (`1..=count`) in alternating colors.
    pub fn fixed(count: usize) -> Self {
        const PALETTE: [Color32; 2] = [
            Color32::from_rgb(0xE6, 0x39, 0x46),
            Color32::from_rgb(0x1D, 0x35, 0x57),
        ];

        Self::new(
            (0..count)
                .map(|i| {
                    WheelItem::new(i + 1, PALETTE[i % PALETTE.len()]).with_font_color(Color32::WHITE)
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WheelItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WheelItem> + ExactSizeIterator + '_ {
        self.items.iter()
    }
}

impl From<Vec<WheelItem>> for WheelItems {
    fn from(items: Vec<WheelItem>) -> Self {
        Self::new(items)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    pub outer_radius: f32,
    pub inner_radius: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::pie(1.0)
    }
}

impl Geometry {
    pub const fn pie(outer_radius: f32) -> Self {
        Self {
            outer_radius,
            inner_radius: 0.0,
        }
    }

    pub const fn ring(outer_radius: f32, inner_radius: f32) -> Self {
        Self {
            outer_radius,
            inner_radius,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let Self {
            outer_radius: outer,
            inner_radius: inner,
        } = *self;

        if !(outer.is_finite() && outer > 0.0 && inner >= 0.0 && inner < outer) {
            return Err(ConfigurationError::InvalidRadius { inner, outer });
        }
        Ok(())
    }

    /// Returns a copy with both radii multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            outer_radius: self.outer_radius * factor,
            inner_radius: self.inner_radius * factor,
        }
    }
}

pub fn segment_angle(count: usize) -> f32 {
    ONE_TURN / count as f32
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub arc: Arc,
    pub path: String,
    pub centroid: Pos2,
    pub color: Color32,
    pub item: WheelItem,
}

impl Segment {
    pub fn value(&self) -> &str {
        &self.item.value
    }
}

/// Splits the circle into `expected` equal wedges, clockwise from 12 o'clock.
///
/// Fails before producing anything if `items` doesn't have exactly `expected` entries.
pub fn build_segments(
    expected: usize,
    items: &WheelItems,
    geometry: Geometry,
) -> Result<Vec<Segment>, ConfigurationError> {
    if items.len() != expected {
        return Err(ConfigurationError::LengthMismatch {
            what: "items",
            expected,
            actual: items.len(),
        });
    }

    if expected == 0 {
        return Ok(vec![]);
    }

    geometry.validate()?;

    let width = segment_angle(expected);
    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let start = index as f32 * width;
            let arc = Arc::new(
                geometry.inner_radius,
                geometry.outer_radius,
                start,
                start + width,
            );
            Segment {
                index,
                path: arc.svg_path(),
                centroid: arc.centroid(),
                color: item.segment_color,
                item: item.clone(),
                arc,
            }
        })
        .collect())
}

/// Builds one segment per item.
pub fn make_wheel(
    items: &WheelItems,
    geometry: Geometry,
) -> Result<Vec<Segment>, ConfigurationError> {
    build_segments(items.len(), items, geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_wedges_in_order() {
        let items = WheelItems::fixed(16);
        let segments = make_wheel(&items, Geometry::pie(100.0)).unwrap();

        assert_eq!(segments.len(), 16);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, i);
            assert_eq!(segment.value(), (i + 1).to_string());
            assert!((segment.arc.sweep() - 22.5).abs() < 1e-4);
            assert!((segment.arc.start_angle - i as f32 * 22.5).abs() < 1e-4);
            assert!(segment.path.starts_with('M'));
            assert!(segment.path.ends_with("L0,0Z"));
        }
        assert!((segments[15].arc.end_angle - 360.0).abs() < 1e-3);
    }

    #[test]
    fn labels_and_colors_must_line_up() {
        let err = WheelItems::from_labels(&["1", "2", "3"], &[Color32::RED, Color32::GREEN])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::LengthMismatch {
                what: "colors",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn items_must_match_the_segment_count() {
        let items = WheelItems::fixed(3);
        assert!(matches!(
            build_segments(4, &items, Geometry::pie(10.0)),
            Err(ConfigurationError::LengthMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn empty_wheel_has_no_segments() {
        let segments = make_wheel(&WheelItems::default(), Geometry::pie(10.0)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn ring_radius_is_checked() {
        let items = WheelItems::fixed(2);
        for geometry in [Geometry::ring(10.0, 10.0), Geometry::ring(10.0, -1.0), Geometry::pie(0.0)] {
            assert!(matches!(
                make_wheel(&items, geometry),
                Err(ConfigurationError::InvalidRadius { .. })
            ));
        }

        let ring = make_wheel(&items, Geometry::ring(10.0, 4.0)).unwrap();
        // centroid sits between the radii
        assert!((ring[0].centroid.to_vec2().length() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn labels_keep_their_colors() {
        let items =
            WheelItems::from_labels(&["a", "b"], &[Color32::RED, Color32::BLUE]).unwrap();
        let segments = make_wheel(&items, Geometry::pie(1.0)).unwrap();
        assert_eq!(segments[0].color, Color32::RED);
        assert_eq!(segments[1].color, Color32::BLUE);
        assert_eq!(segments[1].value(), "b");
    }
}
