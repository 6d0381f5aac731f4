use objc2_foundation::{NSString, NSUserDefaults};

use crate::model::appearance::is_dark_style;

/// Reads the global `AppleInterfaceStyle` default.
pub fn dark_mode_enabled() -> bool {
    let defaults = NSUserDefaults::standardUserDefaults();
    let key = NSString::from_str("AppleInterfaceStyle");
    let style = defaults.stringForKey(&key);
    is_dark_style(style.map(|s| s.to_string()).as_deref())
}
