use super::body::Body;
use super::geometry::Viewport;
use super::obstacles::{Block, Zone};

pub const DEFAULT_RIGHT_THRESHOLD: f32 = 0.8;
pub const DEFAULT_LEFT_THRESHOLD: f32 = 0.2;

/// Scroll configuration. `max_offset: None` means "one viewport width".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub right_threshold: f32,
    pub left_threshold: f32,
    pub min_offset: f32,
    pub max_offset: Option<f32>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            right_threshold: DEFAULT_RIGHT_THRESHOLD,
            left_threshold: DEFAULT_LEFT_THRESHOLD,
            min_offset: 0.0,
            max_offset: None,
        }
    }
}

/// Outcome of one tracker step. Derived fresh every frame, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraState {
    Locked,
    Tracking { delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCamera {
    offset: f32,
    right_threshold: f32,
    left_threshold: f32,
    min_offset: f32,
    configured_max_offset: Option<f32>,
    max_offset: f32,
}

impl ScrollCamera {
    pub fn new(settings: CameraSettings, viewport: Viewport) -> Self {
        let mut camera = Self {
            offset: settings.min_offset,
            right_threshold: settings.right_threshold,
            left_threshold: settings.left_threshold,
            min_offset: settings.min_offset,
            configured_max_offset: settings.max_offset,
            max_offset: settings.min_offset,
        };
        camera.max_offset = camera.resolve_max_offset(viewport);
        camera
    }

    fn resolve_max_offset(&self, viewport: Viewport) -> f32 {
        self.configured_max_offset
            .unwrap_or(viewport.width_px())
            .max(self.min_offset)
    }

    /// Re-resolves a width-relative upper bound for a new viewport. If the offset has to
    /// shrink, the body moves with the world so its world position is unchanged.
    pub fn fit_viewport(&mut self, body: &mut Body, viewport: Viewport) {
        self.max_offset = self.resolve_max_offset(viewport);
        let clamped = self.offset.clamp(self.min_offset, self.max_offset);
        body.position.x += self.offset - clamped;
        self.offset = clamped;
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn min_offset(&self) -> f32 {
        self.min_offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    /// Scrolls when the body sits past a threshold, holding it still on screen while the
    /// world moves underneath. Must run after collision resolution.
    pub fn track(&mut self, body: &mut Body, viewport: Viewport) -> CameraState {
        self.fit_viewport(body, viewport);
        let width = viewport.width_px();
        let x = body.position.x;
        let mut applied = 0.0;

        if x > width * self.right_threshold && self.offset + width < self.max_offset {
            applied += self.absorb(body);
        }
        if x < width * self.left_threshold && self.offset > self.min_offset {
            applied += self.absorb(body);
        }

        if applied == 0.0 {
            CameraState::Locked
        } else {
            CameraState::Tracking { delta: applied }
        }
    }

    fn absorb(&mut self, body: &mut Body) -> f32 {
        let target = (self.offset + body.velocity.x).clamp(self.min_offset, self.max_offset);
        let delta = target - self.offset;
        self.offset = target;
        body.position.x -= delta;
        delta
    }

    pub fn reproject(&self, blocks: &mut [Block], zones: &mut [Zone]) {
        for block in blocks.iter_mut() {
            block.placement.reproject(self.offset);
        }
        for zone in zones.iter_mut() {
            zone.placement.reproject(self.offset);
        }
    }
}
