use crate::model::appearance::Appearance;
use crate::model::label::{ActiveSpaceLabel, LabelSegments};
use crate::model::space::{DisplaySpaces, SpaceKind};
use crate::sys::keyboard::MAX_SHORTCUT_DESKTOP;

/// Everything the status item shows for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub label: ActiveSpaceLabel,
    pub segments: LabelSegments,
    pub entries: Vec<MenuEntry>,
    pub appearance: Appearance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    /// Mission Control desktop number used to switch here, if it has one.
    pub desktop: Option<usize>,
    pub is_active: bool,
}

impl MenuEntry {
    /// One entry per Space on `display`. Only user desktops count towards
    /// the Control+digit shortcuts; fullscreen Spaces are listed but cannot
    /// be selected.
    pub fn for_display(display: &DisplaySpaces) -> Vec<MenuEntry> {
        let mut desktop = 0;
        let mut fullscreen = 0;
        display
            .spaces
            .iter()
            .enumerate()
            .map(|(idx, space)| {
                let (title, shortcut) = match space.kind {
                    SpaceKind::User => {
                        desktop += 1;
                        let shortcut = (desktop <= MAX_SHORTCUT_DESKTOP).then_some(desktop);
                        (format!("Desktop {desktop}"), shortcut)
                    }
                    SpaceKind::Fullscreen => {
                        fullscreen += 1;
                        (format!("Fullscreen {fullscreen}"), None)
                    }
                    SpaceKind::Other(_) => (format!("Space {}", idx + 1), None),
                };
                MenuEntry {
                    title,
                    desktop: shortcut,
                    is_active: space.id == display.current,
                }
            })
            .collect()
    }

    pub fn is_enabled(&self) -> bool { self.desktop.is_some() }
}

/// The status-bar surface the controller renders into.
pub trait StatusSurface {
    fn render(&mut self, view: &StatusView);

    fn terminate(&self);
}
