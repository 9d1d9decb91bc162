use super::body::Body;
use super::geometry::{Rect, Viewport};
use super::obstacles::{Block, Zone};

/// Which corrections fired during one resolver pass. Side counts are per block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    pub floor: bool,
    pub landed: u32,
    pub ceiling: u32,
    pub left_face: u32,
    pub right_face: u32,
}

impl ContactReport {
    pub fn total(&self) -> u32 {
        u32::from(self.floor) + self.landed + self.ceiling + self.left_face + self.right_face
    }
}

/// Corrects the integrated body against the viewport floor and every block, then refreshes
/// the hovered zone.
pub fn resolve(
    body: &mut Body,
    blocks: &[Block],
    zones: &[Zone],
    viewport: Viewport,
) -> ContactReport {
    let mut report = ContactReport {
        floor: clamp_to_floor(body, viewport),
        ..ContactReport::default()
    };

    // Every block gets its own pass; later blocks may override earlier corrections.
    for block in blocks {
        let block_rect = block.placement.screen_rect();
        if land_on_top(body, &block_rect) {
            report.landed += 1;
        }
        if bump_underside(body, &block_rect) {
            report.ceiling += 1;
        }
        if push_from_left_face(body, &block_rect) {
            report.left_face += 1;
        }
        if push_from_right_face(body, &block_rect) {
            report.right_face += 1;
        }
    }

    body.hovered_zone = first_overlapping_zone(body, zones);
    report
}

fn clamp_to_floor(body: &mut Body, viewport: Viewport) -> bool {
    let floor = viewport.height_px();
    if body.position.y + body.height() > floor {
        body.position.y = floor - body.height();
        body.velocity.y = 0.0;
        body.grounded = true;
        true
    } else {
        body.grounded = false;
        false
    }
}

fn land_on_top(body: &mut Body, block: &Rect) -> bool {
    let rect = body.rect();
    let crossing_top = rect.bottom() > block.top()
        && rect.top() < block.top()
        && rect.bottom() < block.bottom()
        && rect.top() < block.bottom();
    if crossing_top && rect.overlaps_horizontally(block) && body.velocity.y > 0.0 {
        body.position.y = block.top() - body.height();
        body.velocity.y = 0.0;
        body.grounded = true;
        return true;
    }
    false
}

fn bump_underside(body: &mut Body, block: &Rect) -> bool {
    let rect = body.rect();
    let crossing_bottom = rect.top() > block.top()
        && rect.bottom() > block.top()
        && rect.top() < block.bottom()
        && rect.bottom() > block.bottom();
    if crossing_bottom && rect.overlaps_horizontally(block) && body.velocity.y < 0.0 {
        body.position.y = block.bottom();
        body.velocity.y = 0.0;
        return true;
    }
    false
}

fn push_from_left_face(body: &mut Body, block: &Rect) -> bool {
    let rect = body.rect();
    let crossing_left = rect.right() > block.left() && rect.left() < block.left();
    if crossing_left && rect.overlaps_vertically(block) && body.velocity.x > 0.0 {
        body.position.x = block.left() - body.width();
        body.velocity.x = 0.0;
        return true;
    }
    false
}

fn push_from_right_face(body: &mut Body, block: &Rect) -> bool {
    let rect = body.rect();
    if rect.overlaps_horizontally(block)
        && rect.overlaps_vertically(block)
        && body.velocity.x < 0.0
    {
        body.position.x = block.right();
        body.velocity.x = 0.0;
        return true;
    }
    false
}

/// First-declared zone wins so stacked zones do not flip between frames.
fn first_overlapping_zone(body: &Body, zones: &[Zone]) -> Option<usize> {
    let rect = body.rect();
    zones
        .iter()
        .position(|zone| rect.overlaps(&zone.placement.screen_rect()))
}
