//! Wires the window-server source, the status item, and the change signals
//! together and runs the AppKit event loop.

use objc2::MainThreadMarker;
use objc2::rc::autoreleasepool;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
use tracing::{info, warn};

use crate::actor::menu_bar::{self, Menu, SystemHooks};
use crate::actor::notification_center::NotificationCenter;
use crate::actor::space_monitor::{NotifyWatcher, SpaceFileMonitor};
use crate::actor::{self, Event};
use crate::common::config::Config;
use crate::model::server::QueryData;
use crate::sys::skylight::{SkyLight, SpaceError, SpaceSource};
use crate::ui::menu_bar::MenuIcon;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("the status item must be created on the main thread")]
    NotMainThread,
}

/// Runs until the user picks Quit.
pub fn run(config: Config) -> Result<(), AppError> {
    let mtm = MainThreadMarker::new().ok_or(AppError::NotMainThread)?;

    autoreleasepool(|_| {
        let app = NSApplication::sharedApplication(mtm);
        if !app.setActivationPolicy(NSApplicationActivationPolicy::Accessory) {
            warn!("Could not switch to accessory activation policy");
        }

        let surface = MenuIcon::new(mtm, config.label.clone());
        let monitor = config.watch.enabled.then(|| {
            SpaceFileMonitor::new(config.watch.resolved_path(), Box::new(NotifyWatcher), || {
                actor::post(Event::SpacesFileDeleted)
            })
        });

        let mut menu = Menu::new(
            config,
            Box::new(SkyLight::connect()),
            Box::new(surface),
            monitor,
            SystemHooks::default(),
        );
        menu.start();
        menu_bar::install(menu);

        let _notifications = NotificationCenter::new();

        info!("WhichSpace running");
        app.run();
    });

    Ok(())
}

/// One-off read of what the status item would show.
pub fn query(config: &Config) -> Result<QueryData, SpaceError> {
    let snapshot = SkyLight::connect().snapshot()?;
    Ok(QueryData::from_snapshot(&snapshot, config))
}
