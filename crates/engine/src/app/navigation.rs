use crate::sim::{Simulation, Viewport, ZoneTarget};

/// What the loop should do after an activated zone has been handed to the navigator.
#[derive(Debug)]
pub enum NavigationCommand {
    Stay,
    SwitchTo(Box<Simulation>),
}

/// Resolves an activated zone's target. Called only on an explicit activate press while a
/// zone is hovered, never on hover alone.
pub trait Navigator {
    fn navigate(&mut self, target: &ZoneTarget, viewport: Viewport) -> NavigationCommand;
}

/// Navigator that never leaves the current level.
#[derive(Debug, Default)]
pub struct StayNavigator;

impl Navigator for StayNavigator {
    fn navigate(&mut self, _target: &ZoneTarget, _viewport: Viewport) -> NavigationCommand {
        NavigationCommand::Stay
    }
}
