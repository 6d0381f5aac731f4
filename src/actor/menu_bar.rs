use std::cell::RefCell;

use tracing::{debug, info_span, trace, warn};

use crate::actor::Event;
use crate::actor::space_monitor::SpaceFileMonitor;
use crate::common::config::Config;
use crate::model::appearance::Appearance;
use crate::model::label::ActiveSpaceLabel;
use crate::sys::skylight::SpaceSource;
use crate::sys::{appearance, keyboard};
use crate::ui::view::{MenuEntry, StatusSurface, StatusView};

thread_local! {
    static MENU: RefCell<Option<Menu>> = const { RefCell::new(None) };
}

/// Makes `menu` the receiver of [`crate::actor::post`]ed events. Must be
/// called on the main thread.
pub fn install(menu: Menu) { MENU.with(|slot| *slot.borrow_mut() = Some(menu)); }

pub(crate) fn deliver(event: Event) {
    MENU.with(|slot| match slot.borrow_mut().as_mut() {
        Some(menu) => menu.handle_event(event),
        None => trace!(?event, "No menu installed; dropping event"),
    });
}

/// OS hooks the controller calls outside of Space enumeration.
#[derive(Clone, Copy)]
pub struct SystemHooks {
    pub dark_mode: fn() -> bool,
    pub switch_to_desktop: fn(usize) -> bool,
}

impl Default for SystemHooks {
    fn default() -> Self {
        Self {
            dark_mode: appearance::dark_mode_enabled,
            switch_to_desktop: keyboard::switch_to_desktop,
        }
    }
}

/// Owns the status item and recomputes its label whenever a change signal
/// arrives.
pub struct Menu {
    config: Config,
    source: Box<dyn SpaceSource>,
    surface: Box<dyn StatusSurface>,
    monitor: Option<SpaceFileMonitor>,
    hooks: SystemHooks,
    appearance: Appearance,
    last_view: Option<StatusView>,
}

impl Menu {
    pub fn new(
        config: Config,
        source: Box<dyn SpaceSource>,
        surface: Box<dyn StatusSurface>,
        monitor: Option<SpaceFileMonitor>,
        hooks: SystemHooks,
    ) -> Self {
        Self {
            config,
            source,
            surface,
            monitor,
            hooks,
            appearance: Appearance::default(),
            last_view: None,
        }
    }

    /// Arms the file monitor and renders the first label.
    pub fn start(&mut self) {
        if let Some(monitor) = &mut self.monitor {
            monitor.arm();
        }
        self.refresh();
    }

    pub fn handle_event(&mut self, event: Event) {
        let span = info_span!("menu_bar::handle_event", ?event);
        let _s = span.enter();

        match event {
            Event::SpaceChanged => self.refresh(),
            Event::SpacesFileDeleted => {
                if let Some(monitor) = &mut self.monitor {
                    monitor.arm();
                }
                self.refresh();
            }
            Event::MenuOpened => self.set_menu_open(true),
            Event::MenuClosed => self.set_menu_open(false),
            Event::SwitchToDesktop(desktop) => {
                if !(self.hooks.switch_to_desktop)(desktop) {
                    warn!(desktop, "Could not switch desktop");
                }
            }
            Event::Quit => {
                debug!("Quit requested");
                self.surface.terminate();
            }
        }
    }

    fn set_menu_open(&mut self, open: bool) {
        if self.appearance.menu_open == open {
            return;
        }
        self.appearance.menu_open = open;
        self.refresh();
    }

    /// Reads a fresh snapshot and re-renders if anything visible changed.
    /// On failure the previous label stays up.
    pub fn refresh(&mut self) {
        let snapshot = match self.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "Failed to read spaces");
                return;
            }
        };
        if snapshot.is_empty() {
            warn!("Window server reported no spaces");
            return;
        }
        let Some(display) = snapshot.select_display(self.config.menu.display) else {
            warn!("Window server reported no displays");
            return;
        };
        let label = match ActiveSpaceLabel::compute(display, &self.config.label) {
            Ok(label) => label,
            Err(err) => {
                warn!(%err, display = %display.display_identifier, "Failed to compute label");
                return;
            }
        };

        self.appearance.dark_mode = (self.hooks.dark_mode)();
        let entries = if self.config.menu.list_spaces {
            MenuEntry::for_display(display)
        } else {
            Vec::new()
        };
        let view = StatusView {
            segments: label.segments(&self.config.label.separator),
            label,
            entries,
            appearance: self.appearance,
        };

        if self.last_view.as_ref() == Some(&view) {
            trace!("Status unchanged; skipping render");
            return;
        }
        debug!(label = %view.label, "Rendering status");
        self.surface.render(&view);
        self.last_view = Some(view);
    }
}
