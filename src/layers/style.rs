use serde::Deserialize;
use std::time::Duration;

use crate::domain::Color;
use crate::host::ShapeStyle;

/// Fixed styling and timing of one choropleth layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub stroke_color: Color,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
    /// Resting fill opacity
    pub fill_opacity: f64,
    /// Added to the fill opacity of the hovered region
    pub hover_opacity_delta: f64,
    /// Added to the fill opacity of a clicked region while it pulses
    pub pulse_opacity_delta: f64,
    /// Added to the stroke weight of a clicked region while it pulses
    pub pulse_stroke_delta: f64,
    pub pulse_duration: Duration,
    /// Wait after the host's view-settled signal before honoring pointers
    pub settle_delay: Duration,
    /// Settle anyway this long after render if the host never signals
    pub settle_fallback: Option<Duration>,
    /// Ask the host to fit its viewport to the rendered regions
    pub fit_bounds: bool,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::population()
    }
}

impl LayerStyle {
    /// Heat map of population metrics over every region
    pub fn population() -> Self {
        Self {
            stroke_color: Color::CHARCOAL,
            stroke_opacity: 0.5,
            stroke_weight: 1.0,
            fill_opacity: 0.2,
            hover_opacity_delta: 0.2,
            pulse_opacity_delta: 0.2,
            pulse_stroke_delta: 1.0,
            pulse_duration: Duration::from_millis(1500),
            settle_delay: Duration::from_millis(200),
            settle_fallback: Some(Duration::from_millis(500)),
            fit_bounds: false,
        }
    }

    /// Graded recommendation map over matched regions only
    pub fn recommendation() -> Self {
        Self {
            hover_opacity_delta: 0.1,
            pulse_opacity_delta: 0.1,
            fit_bounds: true,
            ..Self::population()
        }
    }

    /// Resting style for a region filled with `fill_color`
    pub fn shape_style(&self, fill_color: Color) -> ShapeStyle {
        ShapeStyle {
            fill_color,
            fill_opacity: self.fill_opacity,
            stroke_color: self.stroke_color,
            stroke_opacity: self.stroke_opacity,
            stroke_weight: self.stroke_weight,
        }
    }
}

/// Partial `[style]` table from a config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleOverrides {
    #[serde(default)]
    pub stroke_color: Option<Color>,
    #[serde(default)]
    pub stroke_opacity: Option<f64>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub fill_opacity: Option<f64>,
    #[serde(default)]
    pub hover_opacity_delta: Option<f64>,
    #[serde(default)]
    pub pulse_opacity_delta: Option<f64>,
    #[serde(default)]
    pub pulse_stroke_delta: Option<f64>,
    #[serde(default)]
    pub pulse_duration_ms: Option<u64>,
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,
    /// 0 disables the fallback
    #[serde(default)]
    pub settle_fallback_ms: Option<u64>,
}

impl StyleOverrides {
    pub fn apply(&self, mut style: LayerStyle) -> LayerStyle {
        if let Some(v) = self.stroke_color {
            style.stroke_color = v;
        }
        if let Some(v) = self.stroke_opacity {
            style.stroke_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.stroke_weight {
            style.stroke_weight = v.max(0.0);
        }
        if let Some(v) = self.fill_opacity {
            style.fill_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.hover_opacity_delta {
            style.hover_opacity_delta = v;
        }
        if let Some(v) = self.pulse_opacity_delta {
            style.pulse_opacity_delta = v;
        }
        if let Some(v) = self.pulse_stroke_delta {
            style.pulse_stroke_delta = v;
        }
        if let Some(ms) = self.pulse_duration_ms {
            style.pulse_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = self.settle_delay_ms {
            style.settle_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.settle_fallback_ms {
            style.settle_fallback = (ms > 0).then(|| Duration::from_millis(ms));
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_emphasis() {
        let population = LayerStyle::population();
        let recommendation = LayerStyle::recommendation();

        assert_eq!(population.hover_opacity_delta, 0.2);
        assert_eq!(recommendation.hover_opacity_delta, 0.1);
        assert!(!population.fit_bounds);
        assert!(recommendation.fit_bounds);
        assert_eq!(recommendation.stroke_color, Color::CHARCOAL);
    }

    #[test]
    fn test_overrides_from_toml() {
        let overrides: StyleOverrides = toml::from_str(
            r##"
            stroke_color = "#FFFFFF"
            fill_opacity = 1.7
            pulse_duration_ms = 800
            settle_fallback_ms = 0
            "##,
        )
        .unwrap();

        let style = overrides.apply(LayerStyle::population());
        assert_eq!(style.stroke_color, Color::WHITE);
        assert_eq!(style.fill_opacity, 1.0);
        assert_eq!(style.pulse_duration, Duration::from_millis(800));
        assert_eq!(style.settle_fallback, None);
        assert_eq!(style.stroke_weight, 1.0);
    }
}
