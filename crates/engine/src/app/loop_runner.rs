use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::sim::{Simulation, Viewport};

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::{InputAction, InputSnapshot, NavigationCommand, Navigator, Renderer};

pub const SLOW_FRAME_ENV_VAR: &str = "LEDGE_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Ledge".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
        }
    }
}

impl LoopConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.window_width,
            height: self.window_height,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window, builds the first simulation for the window's actual inner size and
/// drives it one fixed step at a time until the window closes or Escape is pressed.
pub fn run_app<F>(
    config: LoopConfig,
    build_simulation: F,
    mut navigator: Box<dyn Navigator>,
) -> Result<(), AppError>
where
    F: FnOnce(Viewport) -> Simulation,
{
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);

    let initial_size = window.inner_size();
    let start_viewport =
        initial_viewport(initial_size.width, initial_size.height, config.viewport());
    let mut simulation = build_simulation(start_viewport);
    let mut input_collector = InputCollector::default();

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        viewport_width = start_viewport.width,
        viewport_height = start_viewport.height,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let window_for_loop = Arc::clone(&window);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                        let viewport = Viewport {
                            width: new_size.width,
                            height: new_size.height,
                        };
                        if viewport.is_empty() {
                            debug!("window_minimized");
                        } else {
                            simulation.set_viewport(viewport);
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        let is_pressed = event.state == ElementState::Pressed;
                        input_collector.handle_physical_key(event.physical_key, is_pressed);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if slow_frame_delay > Duration::ZERO {
                            // Explicit debug perturbation only.
                            thread::sleep(slow_frame_delay);
                        }

                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                        accumulator = accumulator.saturating_add(clamped_frame_dt);

                        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            let input_snapshot = input_collector.snapshot_for_tick();
                            apply_input(&mut simulation, &input_snapshot);
                            let report = simulation.advance_frame();
                            metrics_accumulator.record_tick(&report);

                            if let Some(next) =
                                handle_activate(&simulation, &input_snapshot, navigator.as_mut())
                            {
                                simulation = next;
                                info!(
                                    blocks = simulation.blocks().len(),
                                    zones = simulation.zones().len(),
                                    scrolling = simulation.camera().is_some(),
                                    "level_switched"
                                );
                            }
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            warn!(
                                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                                max_ticks_per_frame, "sim_clamp_triggered"
                            );
                        }

                        if let Err(error) = renderer.render_simulation(&simulation) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        metrics_accumulator.record_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            info!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                contacts = snapshot.contacts,
                                scrolling_ticks = snapshot.scrolling_ticks,
                                camera_offset = simulation.camera_offset(),
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                info!(frames = simulation.frame(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Falls back to the configured size when the window starts minimized.
fn initial_viewport(width: u32, height: u32, fallback: Viewport) -> Viewport {
    let viewport = Viewport { width, height };
    if viewport.is_empty() {
        fallback
    } else {
        viewport
    }
}

/// Writes held intents into the body. Lift onset goes through `begin_lift` so the jump
/// impulse fires once per press.
fn apply_input(simulation: &mut Simulation, input: &InputSnapshot) {
    simulation.set_moving_right(input.is_down(InputAction::MoveRight));
    simulation.set_moving_left(input.is_down(InputAction::MoveLeft));
    if input.lift_pressed() {
        simulation.begin_lift();
    }
    if !input.is_down(InputAction::Lift) {
        simulation.end_lift();
    }
}

fn handle_activate(
    simulation: &Simulation,
    input: &InputSnapshot,
    navigator: &mut dyn Navigator,
) -> Option<Simulation> {
    if !input.activate_pressed() {
        return None;
    }
    let target = simulation.hovered_target()?;
    info!(zone_target = %target, "navigation_requested");
    match navigator.navigate(target, simulation.viewport()) {
        NavigationCommand::Stay => None,
        NavigationCommand::SwitchTo(next) => Some(*next),
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held_keys: HashSet<KeyCode>,
    action_states: ActionStates,
    lift_pressed_edge: bool,
    activate_pressed_edge: bool,
}

impl InputCollector {
    /// An action stays down while any key bound to it is held.
    fn handle_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let Some(action) = action_for_key(code) else {
            return;
        };
        if is_pressed {
            self.held_keys.insert(code);
        } else {
            self.held_keys.remove(&code);
        }

        let was_down = self.action_states.is_down(action);
        let is_down = self
            .held_keys
            .iter()
            .any(|held| action_for_key(*held) == Some(action));
        if is_down && !was_down {
            match action {
                InputAction::Lift => self.lift_pressed_edge = true,
                InputAction::Activate => self.activate_pressed_edge = true,
                InputAction::Quit => self.quit_requested = true,
                InputAction::MoveLeft | InputAction::MoveRight => {}
            }
        }
        self.action_states.set(action, is_down);
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.action_states,
            self.lift_pressed_edge,
            self.activate_pressed_edge,
        );
        self.lift_pressed_edge = false;
        self.activate_pressed_edge = false;
        snapshot
    }
}

fn action_for_key(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyW | KeyCode::ArrowUp | KeyCode::Space => Some(InputAction::Lift),
        KeyCode::KeyE => Some(InputAction::Activate),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::replace(&mut accumulator, Duration::ZERO)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}
