#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Lift,
    Activate,
    Quit,
}

const ACTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Lift => 2,
            InputAction::Activate => 3,
            InputAction::Quit => 4,
        }
    }
}

/// Input as seen by one simulation tick: held actions plus press edges that are consumed
/// by exactly one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    lift_pressed: bool,
    activate_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates, lift_pressed: bool, activate_pressed: bool) -> Self {
        Self {
            actions,
            lift_pressed,
            activate_pressed,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_lift_pressed(mut self, lift_pressed: bool) -> Self {
        self.lift_pressed = lift_pressed;
        self
    }

    pub fn with_activate_pressed(mut self, activate_pressed: bool) -> Self {
        self.activate_pressed = activate_pressed;
        self
    }

    /// Lift went down since the previous tick.
    pub fn lift_pressed(&self) -> bool {
        self.lift_pressed
    }

    pub fn activate_pressed(&self) -> bool {
        self.activate_pressed
    }
}
