use tracing::debug;

use super::body::Body;
use super::camera::{CameraSettings, CameraState, ScrollCamera};
use super::collision::{resolve, ContactReport};
use super::geometry::Viewport;
use super::integrator::integrate;
use super::obstacles::{Block, Zone, ZoneTarget};

/// Read-only projection of one drawable in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub screen_x: f32,
    pub screen_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Option<[u8; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub contacts: ContactReport,
    /// `None` in the fixed-screen variant.
    pub camera: Option<CameraState>,
}

/// Everything one frame reads and writes. The step functions only ever see state through
/// this context; nothing is shared globally.
#[derive(Debug, Clone)]
pub struct Simulation {
    body: Body,
    blocks: Vec<Block>,
    zones: Vec<Zone>,
    camera: Option<ScrollCamera>,
    viewport: Viewport,
    frame: u64,
}

impl Simulation {
    pub fn new(body: Body, viewport: Viewport) -> Self {
        Self {
            body,
            blocks: Vec::new(),
            zones: Vec::new(),
            camera: None,
            viewport,
            frame: 0,
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self.reproject();
        self
    }

    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = zones;
        self.reproject();
        self
    }

    /// Switches to the scrolling variant.
    pub fn with_camera(mut self, settings: CameraSettings) -> Self {
        self.camera = Some(ScrollCamera::new(settings, self.viewport));
        self.reproject();
        self
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn camera(&self) -> Option<&ScrollCamera> {
        self.camera.as_ref()
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera.map(|camera| camera.offset()).unwrap_or(0.0)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Zero-area viewports are ignored so a minimized window freezes the layout instead of
    /// collapsing the floor to the top edge.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        if let Some(camera) = self.camera.as_mut() {
            camera.fit_viewport(&mut self.body, viewport);
            camera.reproject(&mut self.blocks, &mut self.zones);
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn set_moving_right(&mut self, active: bool) {
        self.body.set_moving_right(active);
    }

    pub fn set_moving_left(&mut self, active: bool) {
        self.body.set_moving_left(active);
    }

    pub fn begin_lift(&mut self) {
        self.body.begin_lift();
    }

    pub fn end_lift(&mut self) {
        self.body.end_lift();
    }

    pub fn hovered_zone(&self) -> Option<&Zone> {
        self.body
            .hovered_zone
            .and_then(|index| self.zones.get(index))
    }

    pub fn hovered_target(&self) -> Option<&ZoneTarget> {
        self.hovered_zone().map(|zone| &zone.target)
    }

    /// Integrate, resolve, then track. The order is load-bearing: the camera must see the
    /// velocity the resolver settled on.
    pub fn advance_frame(&mut self) -> FrameReport {
        let hovered_before = self.body.hovered_zone;

        integrate(&mut self.body);
        let contacts = resolve(&mut self.body, &self.blocks, &self.zones, self.viewport);
        let camera = match self.camera.as_mut() {
            Some(camera) => {
                let state = camera.track(&mut self.body, self.viewport);
                camera.reproject(&mut self.blocks, &mut self.zones);
                Some(state)
            }
            None => None,
        };

        if self.body.hovered_zone != hovered_before {
            debug!(
                frame = self.frame,
                zone_target = self.hovered_target().map(ZoneTarget::as_str),
                "zone_hover_changed"
            );
        }

        let report = FrameReport {
            frame: self.frame,
            contacts,
            camera,
        };
        self.frame = self.frame.saturating_add(1);
        report
    }

    /// Blocks, then zones, then the body so it draws on top.
    pub fn draw_list(&self) -> Vec<DrawRect> {
        let mut rects = Vec::with_capacity(self.blocks.len() + self.zones.len() + 1);
        rects.extend(self.blocks.iter().map(|block| {
            let rect = block.placement.screen_rect();
            DrawRect {
                screen_x: rect.x,
                screen_y: rect.y,
                width: rect.width,
                height: rect.height,
                color: block.color,
            }
        }));
        rects.extend(self.zones.iter().map(|zone| {
            let rect = zone.placement.screen_rect();
            DrawRect {
                screen_x: rect.x,
                screen_y: rect.y,
                width: rect.width,
                height: rect.height,
                color: zone.color,
            }
        }));
        let body = self.body.rect();
        rects.push(DrawRect {
            screen_x: body.x,
            screen_y: body.y,
            width: body.width,
            height: body.height,
            color: self.body.color,
        });
        rects
    }

    fn reproject(&mut self) {
        if let Some(camera) = self.camera {
            camera.reproject(&mut self.blocks, &mut self.zones);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BodyTuning, Rect, Vec2};

    const VIEWPORT: Viewport = Viewport {
        width: 1000,
        height: 600,
    };

    fn simulation_at(x: f32, y: f32) -> Simulation {
        Simulation::new(Body::new(Vec2 { x, y }, BodyTuning::default()), VIEWPORT)
    }

    #[test]
    fn first_frame_of_free_fall() {
        let mut sim = simulation_at(100.0, 0.0);

        let report = sim.advance_frame();

        assert_eq!(report.frame, 0);
        assert_eq!(report.camera, None);
        assert_eq!(sim.body().velocity.y, 0.5);
        assert_eq!(sim.body().position.y, 0.5);
        assert!(!sim.body().grounded);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn vertical_speed_never_exceeds_cap() {
        let mut sim = simulation_at(100.0, -5000.0)
            .with_blocks(vec![Block::new(Rect::new(0.0, 300.0, 1000.0, 20.0))]);
        let cap = sim.body().tuning.vertical_speed_cap;

        for frame in 0..2000 {
            if frame % 300 == 0 {
                sim.begin_lift();
            }
            if frame % 300 == 150 {
                sim.end_lift();
            }
            sim.advance_frame();
            assert!(sim.body().velocity.y.abs() <= cap);
        }
    }

    #[test]
    fn body_comes_to_rest_on_block() {
        let mut sim = simulation_at(600.0, 0.0)
            .with_blocks(vec![Block::new(Rect::new(500.0, 500.0, 500.0, 200.0))]);

        for _ in 0..200 {
            sim.advance_frame();
        }

        assert!(sim.body().grounded);
        assert_eq!(sim.body().rect().bottom(), 500.0);
        assert_eq!(sim.body().velocity.y, 0.0);
    }

    #[test]
    fn jump_from_floor_leaves_the_ground() {
        let mut sim = simulation_at(100.0, 550.0);
        sim.advance_frame();
        assert!(sim.body().grounded);

        sim.begin_lift();
        sim.end_lift();
        sim.advance_frame();

        assert!(!sim.body().grounded);
        assert!(sim.body().position.y < 550.0);
    }

    #[test]
    fn scrolling_variant_moves_world_not_body() {
        let mut sim = simulation_at(785.0, 550.0)
            .with_blocks(vec![Block::new(Rect::new(1200.0, 500.0, 100.0, 100.0))])
            .with_camera(CameraSettings {
                max_offset: Some(4000.0),
                ..CameraSettings::default()
            });
        sim.set_moving_right(true);

        let first = sim.advance_frame();
        let second = sim.advance_frame();

        assert_eq!(first.camera, Some(CameraState::Locked));
        assert_eq!(second.camera, Some(CameraState::Tracking { delta: 10.0 }));
        assert_eq!(sim.body().position.x, 795.0);
        assert_eq!(sim.camera_offset(), 10.0);
        assert_eq!(sim.blocks()[0].placement.screen_x(), 1190.0);
    }

    #[test]
    fn offset_stays_within_bounds_while_running_back_and_forth() {
        let mut sim = simulation_at(500.0, 550.0).with_camera(CameraSettings {
            max_offset: Some(2500.0),
            ..CameraSettings::default()
        });

        for leg in 0..6 {
            sim.set_moving_right(leg % 2 == 0);
            sim.set_moving_left(leg % 2 == 1);
            for _ in 0..250 {
                sim.advance_frame();
                let camera = sim.camera().expect("camera");
                assert!(camera.offset() >= camera.min_offset());
                assert!(camera.offset() <= camera.max_offset());
            }
        }
    }

    #[test]
    fn zero_area_viewport_is_ignored() {
        let mut sim = simulation_at(500.0, 550.0).with_camera(CameraSettings {
            max_offset: Some(3000.0),
            ..CameraSettings::default()
        });
        sim.set_moving_right(true);
        sim.advance_frame();

        sim.set_viewport(Viewport {
            width: 0,
            height: 0,
        });
        sim.set_viewport(Viewport {
            width: 1000,
            height: 0,
        });
        for _ in 0..5 {
            sim.advance_frame();
        }

        assert_eq!(sim.viewport(), VIEWPORT);
        assert_eq!(sim.body().position.y, 550.0);
        assert_eq!(sim.camera_offset(), 0.0);
    }

    #[test]
    fn default_camera_stays_put_after_resize() {
        let mut sim = simulation_at(500.0, 550.0).with_camera(CameraSettings::default());
        sim.set_viewport(Viewport {
            width: 800,
            height: 600,
        });
        sim.set_moving_right(true);

        for _ in 0..100 {
            sim.advance_frame();
        }

        assert_eq!(sim.camera().expect("camera").max_offset(), 800.0);
        assert_eq!(sim.camera_offset(), 0.0);
    }

    #[test]
    fn hovered_target_follows_zone_overlap() {
        let mut sim = simulation_at(100.0, 550.0).with_zones(vec![Zone::new(
            Rect::new(80.0, 500.0, 100.0, 100.0),
            ZoneTarget("level:next.xml".to_string()),
        )]);

        sim.advance_frame();
        assert_eq!(
            sim.hovered_target().map(ZoneTarget::as_str),
            Some("level:next.xml")
        );

        sim.set_moving_right(true);
        for _ in 0..10 {
            sim.advance_frame();
        }
        assert_eq!(sim.hovered_target(), None);
    }

    #[test]
    fn draw_list_puts_body_last() {
        let sim = simulation_at(10.0, 20.0)
            .with_blocks(vec![Block::new(Rect::new(0.0, 500.0, 50.0, 50.0))])
            .with_zones(vec![Zone::new(
                Rect::new(100.0, 400.0, 20.0, 20.0),
                ZoneTarget("x".to_string()),
            )]);

        let rects = sim.draw_list();

        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].screen_y, 500.0);
        assert_eq!(rects[1].screen_x, 100.0);
        assert_eq!(rects[2].screen_x, 10.0);
        assert_eq!(rects[2].color, Some(crate::sim::BODY_COLOR));
        assert_eq!(rects[0].color, None);
    }
}
