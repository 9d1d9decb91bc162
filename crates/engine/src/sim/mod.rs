//! Single-body platformer simulation: integration, collision resolution and scroll
//! tracking, advanced one frame at a time by an outside scheduler.

mod body;
mod camera;
mod collision;
mod geometry;
mod integrator;
mod obstacles;
mod world;

pub use body::{
    Body, BodyTuning, Intents, BODY_COLOR, DEFAULT_BODY_SIZE, DEFAULT_GRAVITY,
    DEFAULT_HORIZONTAL_SPEED, DEFAULT_JUMP_IMPULSE, DEFAULT_LIFT_ACCELERATION,
    DEFAULT_VERTICAL_SPEED_CAP,
};
pub use camera::{
    CameraSettings, CameraState, ScrollCamera, DEFAULT_LEFT_THRESHOLD, DEFAULT_RIGHT_THRESHOLD,
};
pub use collision::{resolve, ContactReport};
pub use geometry::{Rect, Vec2, Viewport};
pub use integrator::integrate;
pub use obstacles::{Block, Placement, Zone, ZoneTarget};
pub use world::{DrawRect, FrameReport, Simulation};
