use std::fmt;

use super::geometry::Rect;

/// Opaque reference carried by an interactive zone, e.g. `level:cave.xml` or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneTarget(pub String);

impl ZoneTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// World placement shared by blocks and zones. `screen_x` is rederived from the camera
/// offset every frame; everything else is fixed at load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    world: Rect,
    screen_x: f32,
}

impl Placement {
    pub fn new(world: Rect) -> Self {
        Self {
            world,
            screen_x: world.x,
        }
    }

    pub fn world(&self) -> Rect {
        self.world
    }

    pub fn screen_x(&self) -> f32 {
        self.screen_x
    }

    pub fn screen_rect(&self) -> Rect {
        Rect {
            x: self.screen_x,
            ..self.world
        }
    }

    pub(crate) fn reproject(&mut self, camera_offset: f32) {
        self.screen_x = self.world.x - camera_offset;
    }
}

/// Static rectangle that blocks the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub placement: Placement,
    pub color: Option<[u8; 4]>,
}

impl Block {
    pub fn new(world: Rect) -> Self {
        Self {
            placement: Placement::new(world),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Option<[u8; 4]>) -> Self {
        self.color = color;
        self
    }
}

/// Static rectangle that reports overlap but never blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub placement: Placement,
    pub target: ZoneTarget,
    pub color: Option<[u8; 4]>,
}

impl Zone {
    pub fn new(world: Rect, target: ZoneTarget) -> Self {
        Self {
            placement: Placement::new(world),
            target,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Option<[u8; 4]>) -> Self {
        self.color = color;
        self
    }
}
