use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Vec2};

pub const DEFAULT_BODY_SIZE: f32 = 50.0;
pub const DEFAULT_GRAVITY: f32 = 0.5;
pub const DEFAULT_VERTICAL_SPEED_CAP: f32 = 10.0;
pub const DEFAULT_HORIZONTAL_SPEED: f32 = 10.0;
pub const DEFAULT_LIFT_ACCELERATION: f32 = 1.0;
pub const DEFAULT_JUMP_IMPULSE: f32 = 5.0;
pub const BODY_COLOR: [u8; 4] = [0, 0, 255, 255];

/// Per-body movement constants. All values are in pixels per frame (or per frame squared).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BodyTuning {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub vertical_speed_cap: f32,
    pub horizontal_speed: f32,
    pub lift_acceleration: f32,
    pub jump_impulse: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            width: DEFAULT_BODY_SIZE,
            height: DEFAULT_BODY_SIZE,
            gravity: DEFAULT_GRAVITY,
            vertical_speed_cap: DEFAULT_VERTICAL_SPEED_CAP,
            horizontal_speed: DEFAULT_HORIZONTAL_SPEED,
            lift_acceleration: DEFAULT_LIFT_ACCELERATION,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
        }
    }
}

/// Held input intents. Written between frames, read by the integrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub moving_right: bool,
    pub moving_left: bool,
    pub lifting: bool,
}

/// The single dynamic actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub tuning: BodyTuning,
    pub intents: Intents,
    pub grounded: bool,
    pub hovered_zone: Option<usize>,
    pub color: Option<[u8; 4]>,
}

impl Body {
    pub fn new(position: Vec2, tuning: BodyTuning) -> Self {
        Self {
            position,
            velocity: Vec2::default(),
            tuning,
            intents: Intents::default(),
            grounded: false,
            hovered_zone: None,
            color: Some(BODY_COLOR),
        }
    }

    pub fn width(&self) -> f32 {
        self.tuning.width
    }

    pub fn height(&self) -> f32 {
        self.tuning.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.tuning.width,
            self.tuning.height,
        )
    }

    pub fn set_moving_right(&mut self, active: bool) {
        self.intents.moving_right = active;
    }

    pub fn set_moving_left(&mut self, active: bool) {
        self.intents.moving_left = active;
    }

    /// Lift onset. A grounded body also receives the one-off jump impulse.
    pub fn begin_lift(&mut self) {
        if self.grounded {
            self.velocity.y -= self.tuning.jump_impulse;
        }
        self.intents.lifting = true;
    }

    pub fn end_lift(&mut self) {
        self.intents.lifting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_starts_at_rest() {
        let body = Body::new(Vec2 { x: 3.0, y: 4.0 }, BodyTuning::default());

        assert_eq!(body.velocity, Vec2::default());
        assert_eq!(body.intents, Intents::default());
        assert!(!body.grounded);
        assert_eq!(body.hovered_zone, None);
        assert_eq!(body.rect(), Rect::new(3.0, 4.0, 50.0, 50.0));
    }

    #[test]
    fn lift_onset_while_grounded_applies_jump_impulse() {
        let mut body = Body::new(Vec2::default(), BodyTuning::default());
        body.grounded = true;

        body.begin_lift();

        assert_eq!(body.velocity.y, -DEFAULT_JUMP_IMPULSE);
        assert!(body.intents.lifting);
    }

    #[test]
    fn lift_onset_airborne_only_sets_intent() {
        let mut body = Body::new(Vec2::default(), BodyTuning::default());
        body.velocity.y = 2.0;

        body.begin_lift();
        assert_eq!(body.velocity.y, 2.0);
        assert!(body.intents.lifting);

        body.end_lift();
        assert!(!body.intents.lifting);
    }
}
