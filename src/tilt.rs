use crate::geometry::{Rect, Vec2};
use crate::settings::TiltConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltTransform {
    pub perspective_px: f64,
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
    pub scale: f64,
}

impl TiltTransform {
    pub fn neutral(config: &TiltConfig) -> Self {
        Self {
            perspective_px: config.perspective_px,
            rotate_x_deg: 0.0,
            rotate_y_deg: 0.0,
            scale: 1.0,
        }
    }

    pub fn css(&self) -> String {
        format!(
            "perspective({}px) rotateX({:.2}deg) rotateY({:.2}deg) scale({})",
            self.perspective_px, self.rotate_x_deg, self.rotate_y_deg, self.scale
        )
    }
}

/// Rotation is linear in the normalised pointer position and a pure function of
/// it; nothing accumulates between events.
pub fn tilt_for_pointer(config: &TiltConfig, bounds: Rect, pointer: Vec2) -> TiltTransform {
    let max = config.max_tilt_degrees;
    let half = max / 2.0;
    let position = bounds.normalize(pointer);

    TiltTransform {
        perspective_px: config.perspective_px,
        rotate_x_deg: (position.y * max - half).clamp(-half, half),
        rotate_y_deg: (half - position.x * max).clamp(-half, half),
        scale: config.scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Rect {
        Rect {
            left: 0.0,
            top: 0.0,
            width: 400.0,
            height: 200.0,
        }
    }

    #[test]
    fn center_is_flat() {
        let transform = tilt_for_pointer(&TiltConfig::default(), card(), Vec2::new(200.0, 100.0));

        assert_eq!(transform.rotate_x_deg, 0.0);
        assert_eq!(transform.rotate_y_deg, 0.0);
    }

    #[test]
    fn corners_reach_half_of_max() {
        let config = TiltConfig::default();

        let top_left = tilt_for_pointer(&config, card(), Vec2::new(0.0, 0.0));
        assert_eq!(top_left.rotate_x_deg, -5.0);
        assert_eq!(top_left.rotate_y_deg, 5.0);

        let bottom_right = tilt_for_pointer(&config, card(), Vec2::new(400.0, 200.0));
        assert_eq!(bottom_right.rotate_x_deg, 5.0);
        assert_eq!(bottom_right.rotate_y_deg, -5.0);
    }

    #[test]
    fn pointer_outside_box_is_clamped() {
        let config = TiltConfig {
            max_tilt_degrees: 20.0,
            ..TiltConfig::default()
        };

        let transform = tilt_for_pointer(&config, card(), Vec2::new(-300.0, 900.0));
        assert_eq!(transform.rotate_y_deg, 10.0);
        assert_eq!(transform.rotate_x_deg, 10.0);
    }

    #[test]
    fn neutral_resets_rotation_and_scale() {
        let config = TiltConfig {
            scale: 1.05,
            ..TiltConfig::default()
        };

        assert_eq!(
            TiltTransform::neutral(&config).css(),
            "perspective(1000px) rotateX(0.00deg) rotateY(0.00deg) scale(1)"
        );
    }
}
