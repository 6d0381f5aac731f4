//! Event plumbing between the OS callbacks and the status-bar controller.
//!
//! Every signal (notification, file watch, menu interaction) is turned into
//! an [`Event`] and posted onto the main dispatch queue, where the single
//! [`menu_bar::Menu`] controller handles it.

pub mod menu_bar;
pub mod notification_center;
pub mod space_monitor;

use dispatchr::queue;
use dispatchr::time::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The active Space changed.
    SpaceChanged,
    /// The Spaces preferences file was deleted or replaced.
    SpacesFileDeleted,
    MenuOpened,
    MenuClosed,
    /// Switch to Mission Control desktop `n` (1-based).
    SwitchToDesktop(usize),
    Quit,
}

/// Delivers `event` to the controller on the main thread. Safe to call from
/// any thread; delivery is always asynchronous.
pub fn post(event: Event) {
    queue::main().after_f_s(Time::NOW, event, |event| menu_bar::deliver(event));
}
