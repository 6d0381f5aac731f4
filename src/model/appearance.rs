/// Display state that affects how the status-bar text is coloured. Passed
/// explicitly into every render rather than read from globals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub dark_mode: bool,
    pub menu_open: bool,
}

impl Appearance {
    /// Calibrated white level for the title while the menu is open, `None`
    /// to use the system label colour.
    pub fn foreground_white(self) -> Option<f64> {
        self.menu_open.then_some(if self.dark_mode { 0.7 } else { 0.3 })
    }
}

/// Interprets the `AppleInterfaceStyle` default. It is absent in light mode.
pub fn is_dark_style(style: Option<&str>) -> bool {
    style.is_some_and(|s| s.to_lowercase().contains("dark"))
}
