use crate::sim::DrawRect;

/// Pixel-space rectangle; `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRectPx {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Rounds a drawable to whole pixels and clips it to the surface. `None` when nothing of
/// it is visible.
pub fn clip_to_surface(rect: &DrawRect, surface_size: (u32, u32)) -> Option<ScreenRectPx> {
    let (surface_width, surface_height) = surface_size;
    if !(rect.screen_x.is_finite()
        && rect.screen_y.is_finite()
        && rect.width.is_finite()
        && rect.height.is_finite())
    {
        return None;
    }

    let left = rect.screen_x.round().max(0.0);
    let top = rect.screen_y.round().max(0.0);
    let right = (rect.screen_x + rect.width)
        .round()
        .min(surface_width as f32);
    let bottom = (rect.screen_y + rect.height)
        .round()
        .min(surface_height as f32);
    if right <= left || bottom <= top {
        return None;
    }

    Some(ScreenRectPx {
        left: left as u32,
        top: top as u32,
        right: right as u32,
        bottom: bottom as u32,
    })
}
