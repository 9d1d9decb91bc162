mod input;
mod loop_runner;
mod metrics;
mod navigation;
mod rendering;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use navigation::{NavigationCommand, Navigator, StayNavigator};
pub use rendering::{clip_to_surface, Renderer, ScreenRectPx, FALLBACK_COLOR};
