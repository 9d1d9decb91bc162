mod renderer;
mod transform;

pub use renderer::{Renderer, FALLBACK_COLOR};
pub use transform::{clip_to_surface, ScreenRectPx};
