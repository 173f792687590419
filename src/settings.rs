use crate::log::LogLevel;

pub const THEME_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const LOG_LEVEL_ATTRIBUTE: &str = "data-log-level";
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

pub const SCROLL_REVEAL_THRESHOLD: f64 = 0.15;
pub const SCROLL_REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const COUNTER_THRESHOLD: f64 = 0.5;
pub const VIDEO_THRESHOLD: f64 = 0.1;
pub const FORM_GROUP_THRESHOLD: f64 = 0.1;
pub const VISION_THRESHOLD: f64 = 0.2;
pub const FORM_GROUP_STAGGER_MS: u32 = 100;

pub const MAGNETIC_FRICTION: f64 = 0.2;
pub const MAGNETIC_SETTLE_EPSILON: f64 = 0.01;
pub const DEFAULT_MAGNETIC_STRENGTH: f64 = 0.2;
pub const DEFAULT_TILT_MAX_DEGREES: f64 = 10.0;
pub const DEFAULT_TILT_PERSPECTIVE_PX: f64 = 1000.0;
pub const DEFAULT_TILT_SCALE: f64 = 1.0;

pub const COUNTER_DURATION_MS: f64 = 1500.0;

pub const PARTICLE_AREA_PER_PARTICLE: f64 = 5000.0;
pub const PARTICLE_MAX_POPULATION: usize = 300;
pub const PARTICLE_CONNECTION_RADIUS: f64 = 150.0;
/// Width of each axis's spawn velocity range, centred on zero.
pub const PARTICLE_VELOCITY_SPAN: f64 = 0.3;
pub const PARTICLE_HUE_JITTER: f64 = 15.0;
pub const DEFAULT_PRIMARY_HUE: f64 = 210.0;

const MAGNETIC_STRENGTH_BOUNDS: (f64, f64) = (0.0, 2.0);
const TILT_MAX_DEGREES_BOUNDS: (f64, f64) = (0.0, 90.0);
const TILT_PERSPECTIVE_PX_BOUNDS: (f64, f64) = (100.0, 10_000.0);
const TILT_SCALE_BOUNDS: (f64, f64) = (0.5, 2.0);
const PRIMARY_HUE_BOUNDS: (f64, f64) = (0.0, 360.0);

/// Parses a numeric data attribute, falling back to `default` when it is
/// missing, malformed, zero or outside `bounds`.
pub fn parse_attr_f64_with_bounds(raw: Option<&str>, default: f64, bounds: (f64, f64)) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value != 0.0)
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

pub fn parse_log_level(raw: Option<&str>, default: LogLevel) -> LogLevel {
    match raw
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => default,
    }
}

pub fn magnetic_strength(raw: Option<&str>) -> f64 {
    parse_attr_f64_with_bounds(raw, DEFAULT_MAGNETIC_STRENGTH, MAGNETIC_STRENGTH_BOUNDS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltConfig {
    pub max_tilt_degrees: f64,
    pub perspective_px: f64,
    pub scale: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_tilt_degrees: DEFAULT_TILT_MAX_DEGREES,
            perspective_px: DEFAULT_TILT_PERSPECTIVE_PX,
            scale: DEFAULT_TILT_SCALE,
        }
    }
}

impl TiltConfig {
    pub fn from_attributes(max: Option<&str>, perspective: Option<&str>, scale: Option<&str>) -> Self {
        Self {
            max_tilt_degrees: parse_attr_f64_with_bounds(
                max,
                DEFAULT_TILT_MAX_DEGREES,
                TILT_MAX_DEGREES_BOUNDS,
            ),
            perspective_px: parse_attr_f64_with_bounds(
                perspective,
                DEFAULT_TILT_PERSPECTIVE_PX,
                TILT_PERSPECTIVE_PX_BOUNDS,
            ),
            scale: parse_attr_f64_with_bounds(scale, DEFAULT_TILT_SCALE, TILT_SCALE_BOUNDS),
        }
    }
}

/// `--primary-hue` may carry whitespace or a trailing unit (`210deg`); only the
/// leading integer part is used.
pub fn primary_hue(raw: Option<&str>) -> f64 {
    let digits: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| (PRIMARY_HUE_BOUNDS.0..=PRIMARY_HUE_BOUNDS.1).contains(value))
        .unwrap_or(DEFAULT_PRIMARY_HUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_malformed_attribute_uses_default() {
        assert_eq!(magnetic_strength(None), DEFAULT_MAGNETIC_STRENGTH);
        assert_eq!(magnetic_strength(Some("strong")), DEFAULT_MAGNETIC_STRENGTH);
        assert_eq!(magnetic_strength(Some("0")), DEFAULT_MAGNETIC_STRENGTH);
        assert_eq!(magnetic_strength(Some(" 0.35 ")), 0.35);
    }

    #[test]
    fn out_of_range_attribute_uses_default() {
        let config = TiltConfig::from_attributes(Some("400"), Some("50"), Some("1.05"));

        assert_eq!(config.max_tilt_degrees, DEFAULT_TILT_MAX_DEGREES);
        assert_eq!(config.perspective_px, DEFAULT_TILT_PERSPECTIVE_PX);
        assert_eq!(config.scale, 1.05);
    }

    #[test]
    fn primary_hue_reads_leading_integer() {
        assert_eq!(primary_hue(Some(" 160")), 160.0);
        assert_eq!(primary_hue(Some("145deg")), 145.0);
        assert_eq!(primary_hue(Some("")), DEFAULT_PRIMARY_HUE);
        assert_eq!(primary_hue(None), DEFAULT_PRIMARY_HUE);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        assert_eq!(parse_log_level(Some("DEBUG"), LogLevel::Info), LogLevel::Debug);
        assert_eq!(parse_log_level(Some("verbose"), LogLevel::Warn), LogLevel::Warn);
        assert_eq!(parse_log_level(None, LogLevel::Info), LogLevel::Info);
    }
}
