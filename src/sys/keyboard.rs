//! Switching Spaces by synthesizing Mission Control's "Switch to Desktop n"
//! shortcut (Control + digit). There is no public API for selecting a Space,
//! and the private ones do not move the user's focus along with it.

use std::thread;
use std::time::Duration;

use objc2_core_graphics::{CGEvent, CGEventFlags, CGEventTapLocation, CGKeyCode};
use tracing::{debug, warn};

const KEY_CONTROL: CGKeyCode = 59;
const MODIFIER_DELAY: Duration = Duration::from_millis(30);
const KEY_DELAY: Duration = Duration::from_millis(10);

/// Mission Control only binds desktops 1 through 10.
pub const MAX_SHORTCUT_DESKTOP: usize = 10;

/// Virtual key code of the digit used for desktop `n` (1-based).
pub fn desktop_key_code(n: usize) -> Option<CGKeyCode> {
    let code = match n {
        1 => 18,
        2 => 19,
        3 => 20,
        4 => 21,
        5 => 23,
        6 => 22,
        7 => 26,
        8 => 28,
        9 => 25,
        10 => 29,
        _ => return None,
    };
    Some(code)
}

/// Posts Control+`n` from a helper thread so the menu can close immediately.
/// Returns `false` when desktop `n` has no shortcut.
pub fn switch_to_desktop(n: usize) -> bool {
    let Some(key) = desktop_key_code(n) else {
        warn!(desktop = n, "No Mission Control shortcut for desktop");
        return false;
    };
    debug!(desktop = n, "Switching desktop");

    let spawned = thread::Builder::new().name("space-switch".into()).spawn(move || {
        post_key(KEY_CONTROL, true, CGEventFlags::empty());
        thread::sleep(MODIFIER_DELAY);
        post_key(key, true, CGEventFlags::MaskControl);
        thread::sleep(KEY_DELAY);
        post_key(key, false, CGEventFlags::MaskControl);
        thread::sleep(KEY_DELAY);
        post_key(KEY_CONTROL, false, CGEventFlags::empty());
    });
    if let Err(err) = spawned {
        warn!(%err, "Failed to spawn space switch thread");
        return false;
    }
    true
}

fn post_key(key: CGKeyCode, down: bool, flags: CGEventFlags) {
    let Some(event) = CGEvent::new_keyboard_event(None, key, down) else {
        warn!(key, down, "Failed to create keyboard event");
        return;
    };
    if !flags.is_empty() {
        CGEvent::set_flags(Some(&event), flags);
    }
    CGEvent::post(CGEventTapLocation::HIDEventTap, Some(&event));
}
