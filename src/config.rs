use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    color::parse_color,
    presentation::WheelStyle,
    segment::{FontWeight, Geometry, WheelItem, WheelItems},
    spin::SpinPolicy,
    widgets::WheelOptions,
    ConfigurationError,
};

/// Settings read from the process environment (and `.dev.env`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvConfig {
    pub wheel_config: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl EnvConfig {
    pub const WHEEL_CONFIG: &'static str = "WUNDERWHEEL_CONFIG";
    pub const SEED: &'static str = "WUNDERWHEEL_SEED";

    pub fn load_from_env() -> anyhow::Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    pub fn load_from(get_env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key| get_env(key).filter(|s| !s.trim().is_empty());

        let seed = non_empty(Self::SEED)
            .map(|seed| {
                seed.trim()
                    .parse()
                    .with_context(|| anyhow::anyhow!("expected `{}` to be a number", Self::SEED))
            })
            .transpose()?;

        Ok(Self {
            wheel_config: non_empty(Self::WHEEL_CONFIG).map(PathBuf::from),
            seed,
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ItemConfig {
    pub value: String,
    pub segment_color: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub font_color: Option<String>,
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub winning_font_color: Option<String>,
    #[serde(default)]
    pub winning_font_weight: Option<FontWeight>,
    #[serde(default)]
    pub winning_font_size: Option<f32>,
    #[serde(default)]
    pub icon_offset: f32,
}

impl TryFrom<ItemConfig> for WheelItem {
    type Error = ConfigurationError;

    fn try_from(item: ItemConfig) -> Result<Self, Self::Error> {
        let color = |c: Option<String>| c.as_deref().map(parse_color).transpose();

        Ok(Self {
            segment_color: parse_color(&item.segment_color)?,
            font_color: color(item.font_color)?,
            winning_font_color: color(item.winning_font_color)?,
            value: item.value,
            icon: item.icon,
            font_weight: item.font_weight,
            font_size: item.font_size,
            winning_font_weight: item.winning_font_weight,
            winning_font_size: item.winning_font_size,
            icon_offset: item.icon_offset,
        })
    }
}

/// A wheel as written in a YAML or JSON file.
///
/// Either `items`, or `labels` with a matching `colors` list.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub items: Vec<ItemConfig>,
    pub labels: Vec<String>,
    pub colors: Vec<String>,
    pub wheel_background_color: Option<String>,
    pub knob_fill: Option<String>,
    pub winning_segment_color: Option<String>,
    pub min_deceleration: Option<f32>,
    pub max_deceleration: Option<f32>,
    pub policy: Option<SpinPolicy>,
    /// fraction of the outer radius, 0 for a pie
    pub inner_radius: f32,
    pub seed: Option<u64>,
}

impl WheelConfig {
    pub fn from_yaml(input: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(input).context("invalid wheel yaml")
    }

    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        serde_json::from_str(input).context("invalid wheel json")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| anyhow::anyhow!("cannot read `{}`", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&data),
            _ => Self::from_yaml(&data),
        }
        .with_context(|| anyhow::anyhow!("cannot load `{}`", path.display()))
    }

    /// The ten segment wheel the demo shows without a config file.
    pub fn demo() -> Self {
        let colors = ["red", "green", "blue", "yellow", "purple", "orange"];
        Self {
            labels: (1..=10).map(|i| i.to_string()).collect(),
            colors: (0..10).map(|i| colors[i % 6].to_string()).collect(),
            wheel_background_color: Some("white".into()),
            knob_fill: Some("#212121".into()),
            winning_segment_color: Some("gold".into()),
            ..Self::default()
        }
    }

    fn items(&mut self) -> Result<WheelItems, ConfigurationError> {
        if !self.items.is_empty() {
            let items = std::mem::take(&mut self.items)
                .into_iter()
                .map(WheelItem::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(WheelItems::new(items));
        }

        let colors = self
            .colors
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>, _>>()?;
        WheelItems::from_labels(&self.labels, &colors)
    }

    fn policy(&self) -> SpinPolicy {
        let (min, max) = (self.min_deceleration, self.max_deceleration);
        match self.policy.unwrap_or_default() {
            SpinPolicy::Decay {
                min_deceleration,
                max_deceleration,
                velocity_multiplier,
            } => SpinPolicy::Decay {
                min_deceleration: min.unwrap_or(min_deceleration),
                max_deceleration: max.unwrap_or(max_deceleration),
                velocity_multiplier,
            },
            policy => policy,
        }
    }

    pub fn into_options(mut self, radius: f32) -> Result<WheelOptions, ConfigurationError> {
        let color = |c: &Option<String>| c.as_deref().map(parse_color).transpose();

        let style = WheelStyle {
            wheel_background_color: color(&self.wheel_background_color)?,
            knob_fill: color(&self.knob_fill)?.unwrap_or(WheelStyle::default().knob_fill),
            winning_segment_color: color(&self.winning_segment_color)?,
        };

        let geometry = if self.inner_radius > 0.0 {
            Geometry::ring(radius, radius * self.inner_radius)
        } else {
            Geometry::pie(radius)
        };

        Ok(WheelOptions {
            items: self.items()?,
            geometry,
            style,
            policy: self.policy(),
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use egui::Color32;

    use super::*;

    #[test]
    fn env() {
        let config = EnvConfig::load_from(|key| match key {
            EnvConfig::WHEEL_CONFIG => Some("wheel.yaml".into()),
            EnvConfig::SEED => Some(" 42 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(
            config,
            EnvConfig {
                wheel_config: Some("wheel.yaml".into()),
                seed: Some(42)
            }
        );

        assert_eq!(EnvConfig::load_from(|_| None).unwrap(), EnvConfig::default());
        assert!(EnvConfig::load_from(|key| (key == EnvConfig::SEED).then(|| "x".into())).is_err());
    }

    #[test]
    fn items_from_yaml() {
        let config = WheelConfig::from_yaml(
            r##"
items:
  - value: "100"
    segment_color: "#FF0000"
    font_color: "#FFFFFF"
  - value: "200"
    segment_color: "#00FF00"
    winning_font_color: black
    winning_font_weight: bold
    icon: "★"
    icon_offset: 4
winning_segment_color: gold
min_deceleration: 0.95
inner_radius: 0.25
seed: 9
"##,
        )
        .unwrap();

        let options = config.into_options(100.0).unwrap();
        assert_eq!(options.items.len(), 2);

        let second = options.items.get(1).unwrap();
        assert_eq!(second.segment_color, Color32::from_rgb(0, 255, 0));
        assert_eq!(second.winning_font_weight, Some(FontWeight::Bold));
        assert_eq!(second.icon.as_deref(), Some("★"));
        assert_eq!(second.icon_offset, 4.0);

        assert_eq!(options.geometry, Geometry::ring(100.0, 25.0));
        assert_eq!(options.seed, Some(9));
        assert_eq!(
            options.policy,
            SpinPolicy::Decay {
                min_deceleration: 0.95,
                max_deceleration: SpinPolicy::DEFAULT_MAX_DECELERATION,
                velocity_multiplier: SpinPolicy::DEFAULT_VELOCITY_MULTIPLIER,
            }
        );
    }

    #[test]
    fn labels_from_json() {
        let config = WheelConfig::from_json(
            r##"{
                "labels": ["a", "b", "c"],
                "colors": ["red", "green", "#00f"],
                "policy": {
                    "kind": "target_angle",
                    "minimum_spins": 2,
                    "scale_factor": 300,
                    "stiffness": 50,
                    "damping": 12,
                    "mass": 1
                }
            }"##,
        )
        .unwrap();

        let options = config.into_options(1.0).unwrap();
        assert_eq!(options.items.len(), 3);
        assert!(matches!(options.policy, SpinPolicy::TargetAngle { minimum_spins, .. } if minimum_spins == 2.0));
    }

    #[test]
    fn policy_fields_fall_back_to_defaults() {
        let config = WheelConfig::from_yaml("labels: [a]\ncolors: [red]\npolicy: { kind: decay }").unwrap();
        assert_eq!(config.policy, Some(SpinPolicy::default()));

        let config = WheelConfig::from_json(
            r#"{ "policy": { "kind": "target_angle", "minimum_spins": 5 } }"#,
        )
        .unwrap();
        assert_eq!(
            config.policy,
            Some(SpinPolicy::TargetAngle {
                minimum_spins: 5.0,
                scale_factor: SpinPolicy::DEFAULT_SCALE_FACTOR,
                stiffness: SpinPolicy::DEFAULT_STIFFNESS,
                damping: SpinPolicy::DEFAULT_DAMPING,
                mass: SpinPolicy::DEFAULT_MASS,
            })
        );
    }

    #[test]
    fn bad_spring_fails_when_the_wheel_is_built() {
        let config = WheelConfig::from_yaml(
            "labels: [a, b]\ncolors: [red, blue]\npolicy: { kind: target_angle, stiffness: 0 }",
        )
        .unwrap();
        let options = config.into_options(1.0).unwrap();
        assert!(matches!(
            crate::widgets::WheelState::new(options),
            Err(ConfigurationError::InvalidSpinParameter {
                name: "stiffness",
                ..
            })
        ));
    }

    #[test]
    fn mismatched_labels() {
        let config = WheelConfig {
            labels: vec!["1".into(), "2".into(), "3".into()],
            colors: vec!["red".into(), "blue".into()],
            ..WheelConfig::default()
        };
        assert!(matches!(
            config.into_options(1.0),
            Err(ConfigurationError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn bad_color() {
        let config = WheelConfig {
            labels: vec!["1".into()],
            colors: vec!["not a color".into()],
            ..WheelConfig::default()
        };
        assert!(matches!(
            config.into_options(1.0),
            Err(ConfigurationError::InvalidColor(_))
        ));
    }

    #[test]
    fn demo_wheel_is_valid() {
        let options = WheelConfig::demo().into_options(1.0).unwrap();
        assert_eq!(options.items.len(), 10);
        assert_eq!(options.policy, SpinPolicy::default());
    }
}
