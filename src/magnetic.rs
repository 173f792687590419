use crate::geometry::{Rect, Vec2};
use crate::settings::{MAGNETIC_FRICTION, MAGNETIC_SETTLE_EPSILON};

/// Per-element smoothing state for the magnetic hover effect.
///
/// The offset chases its target by a fixed fraction each frame, so it converges
/// monotonically and never overshoots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticState {
    pub strength: f64,
    pub target: Vec2,
    pub current: Vec2,
}

impl MagneticState {
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            target: Vec2::ZERO,
            current: Vec2::ZERO,
        }
    }

    pub fn pointer_move(&mut self, pointer: Vec2, bounds: Rect) {
        self.target = (pointer - bounds.center()) * self.strength;
    }

    pub fn pointer_leave(&mut self) {
        self.target = Vec2::ZERO;
    }

    pub fn tick(&mut self) -> Vec2 {
        self.current = self.current + (self.target - self.current) * MAGNETIC_FRICTION;
        self.current
    }

    pub fn is_settled(&self) -> bool {
        (self.target - self.current).length() < MAGNETIC_SETTLE_EPSILON
    }

    /// Jumps the last sub-epsilon step so a stopped loop leaves the element
    /// exactly on target.
    pub fn settle(&mut self) -> Vec2 {
        self.current = self.target;
        self.current
    }

    pub fn transform(&self) -> String {
        format!("translate({:.3}px, {:.3}px)", self.current.x, self.current.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect {
            left: 100.0,
            top: 100.0,
            width: 200.0,
            height: 100.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9,
            "expected {expected} got {actual}"
        );
    }

    #[test]
    fn target_is_scaled_offset_from_center() {
        let mut state = MagneticState::new(0.5);
        state.pointer_move(Vec2::new(260.0, 130.0), bounds());

        assert_close(state.target.x, 30.0);
        assert_close(state.target.y, -10.0);
    }

    #[test]
    fn first_tick_moves_a_fifth_of_the_way() {
        let mut state = MagneticState::new(1.0);
        state.pointer_move(Vec2::new(300.0, 200.0), bounds());

        let offset = state.tick();
        assert_close(offset.x, 0.2 * 100.0);
        assert_close(offset.y, 0.2 * 50.0);
    }

    #[test]
    fn leave_decays_gradually_toward_zero() {
        let mut state = MagneticState::new(1.0);
        state.pointer_move(Vec2::new(300.0, 150.0), bounds());
        for _ in 0..40 {
            state.tick();
        }
        let before = state.current.x;
        state.pointer_leave();

        let after = state.tick().x;
        assert_close(after, before * 0.8);
        assert!(after > 0.0);

        let mut previous = after;
        for _ in 0..20 {
            let next = state.tick().x;
            assert!(next < previous && next >= 0.0);
            previous = next;
        }
    }

    #[test]
    fn converges_without_overshoot() {
        let mut state = MagneticState::new(1.0);
        state.pointer_move(Vec2::new(300.0, 150.0), bounds());

        let mut ticks = 0;
        while !state.is_settled() {
            let offset = state.tick();
            assert!(offset.x <= state.target.x);
            ticks += 1;
        }
        assert!(ticks < 100);
        assert_eq!(state.settle(), state.target);
    }

    #[test]
    fn transform_formats_translation() {
        let mut state = MagneticState::new(1.0);
        state.current = Vec2::new(1.5, -2.0);

        assert_eq!(state.transform(), "translate(1.500px, -2.000px)");
    }
}
