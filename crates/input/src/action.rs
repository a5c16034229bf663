/// A high-level action the desktop shell can produce from key presses or
/// inspector buttons.
///
/// The scene and app state consume actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Show or hide the inspector panel.
    TogglePanel,
    /// Freeze or resume the scene clock.
    TogglePause,
    /// Draw a new random seed for the campfire.
    ReseedFire,
    /// Restore the fire parameters the scene started with.
    ResetFire,
    /// Close the window.
    Quit,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Key-binding hint shown next to the action in the inspector.
    pub fn hint(self) -> &'static str {
        match self {
            Action::TogglePanel => "F1",
            Action::TogglePause => "Space",
            Action::ReseedFire => "R",
            Action::ResetFire => "Backspace",
            Action::Quit => "Esc",
            Action::Noop => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bound_action_has_a_hint() {
        for a in [
            Action::TogglePanel,
            Action::TogglePause,
            Action::ReseedFire,
            Action::ResetFire,
            Action::Quit,
        ] {
            assert!(!a.hint().is_empty(), "{a:?}");
        }
        assert!(Action::Noop.hint().is_empty());
    }
}
