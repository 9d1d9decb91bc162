use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::sim::{DrawRect, Simulation};

use super::transform::{clip_to_surface, ScreenRectPx};

const CLEAR_COLOR: [u8; 4] = [255, 255, 255, 255];
/// Used for any drawable that does not carry its own color.
pub const FALLBACK_COLOR: [u8; 4] = [0, 0, 0, 255];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_simulation(&mut self, simulation: &Simulation) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let draw_list = simulation.draw_list();
        paint_frame(self.pixels.frame_mut(), (self.width, self.height), &draw_list);
        self.pixels.render()
    }
}

fn paint_frame(frame: &mut [u8], surface_size: (u32, u32), draw_list: &[DrawRect]) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&CLEAR_COLOR);
    }
    for rect in draw_list {
        if let Some(px) = clip_to_surface(rect, surface_size) {
            fill_rect(
                frame,
                surface_size.0,
                px,
                rect.color.unwrap_or(FALLBACK_COLOR),
            );
        }
    }
}

fn fill_rect(frame: &mut [u8], width: u32, rect: ScreenRectPx, color: [u8; 4]) {
    let row_bytes = width as usize * 4;
    for y in rect.top..rect.bottom {
        let row_start = y as usize * row_bytes;
        let start = row_start + rect.left as usize * 4;
        let end = row_start + rect.right as usize * 4;
        let Some(row) = frame.get_mut(start..end) else {
            return;
        };
        for pixel in row.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * width as usize + x as usize) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn rect(x: f32, y: f32, size: f32, color: Option<[u8; 4]>) -> DrawRect {
        DrawRect {
            screen_x: x,
            screen_y: y,
            width: size,
            height: size,
            color,
        }
    }

    #[test]
    fn missing_color_falls_back_to_black() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        paint_frame(&mut frame, (8, 8), &[rect(2.0, 2.0, 2.0, None)]);

        assert_eq!(pixel_at(&frame, 8, 2, 2), FALLBACK_COLOR);
        assert_eq!(pixel_at(&frame, 8, 3, 3), FALLBACK_COLOR);
        assert_eq!(pixel_at(&frame, 8, 4, 4), CLEAR_COLOR);
    }

    #[test]
    fn later_draws_cover_earlier_ones() {
        let blue = [0, 0, 255, 255];
        let red = [255, 0, 0, 255];
        let mut frame = vec![0u8; 8 * 8 * 4];
        paint_frame(
            &mut frame,
            (8, 8),
            &[rect(0.0, 0.0, 4.0, Some(red)), rect(2.0, 2.0, 4.0, Some(blue))],
        );

        assert_eq!(pixel_at(&frame, 8, 1, 1), red);
        assert_eq!(pixel_at(&frame, 8, 3, 3), blue);
    }

    #[test]
    fn offscreen_rects_leave_frame_clear() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        paint_frame(&mut frame, (4, 4), &[rect(10.0, 10.0, 4.0, None)]);

        assert!(frame.chunks_exact(4).all(|pixel| pixel == CLEAR_COLOR));
    }
}
