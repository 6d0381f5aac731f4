//! Observes the shared workspace's notification center, which tells us when
//! the active Space changes.

use objc2::rc::Retained;
use objc2::{AnyThread, define_class, msg_send, sel};
use objc2_app_kit::{NSWorkspace, NSWorkspaceActiveSpaceDidChangeNotification};
use objc2_foundation::{NSNotification, NSObject};
use tracing::{debug, info_span, trace, warn};

use crate::actor::{self, Event};

define_class! {
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `NotificationCenterInner` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[name = "WhichSpaceNotificationCenter"]
    struct NotificationCenterInner;

    // SAFETY: Each of these method signatures must match their invocations.
    impl NotificationCenterInner {
        #[unsafe(method(recvActiveSpaceChanged:))]
        fn recv_active_space_changed(&self, notif: &NSNotification) {
            trace!("{notif:#?}");
            self.handle_active_space_changed(notif);
        }
    }
}

impl NotificationCenterInner {
    fn new() -> Retained<Self> {
        let this = Self::alloc().set_ivars(());
        unsafe { msg_send![super(this), init] }
    }

    fn handle_active_space_changed(&self, notif: &NSNotification) {
        let name = &*notif.name();
        let span = info_span!("notification_center::handle_active_space_changed", ?name);
        let _s = span.enter();
        if unsafe { NSWorkspaceActiveSpaceDidChangeNotification } == name {
            actor::post(Event::SpaceChanged);
        } else {
            warn!("Unexpected workspace notification: {notif:?}");
        }
    }
}

/// Keeps the observer registered for as long as it lives.
pub struct NotificationCenter {
    inner: Retained<NotificationCenterInner>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let handler = NotificationCenterInner::new();

        let workspace = NSWorkspace::sharedWorkspace();
        let workspace_center = workspace.notificationCenter();
        // SAFETY: `recvActiveSpaceChanged:` has signature fn(&self, &NSNotification).
        unsafe {
            workspace_center.addObserver_selector_name_object(
                &handler,
                sel!(recvActiveSpaceChanged:),
                Some(NSWorkspaceActiveSpaceDidChangeNotification),
                Some(&workspace),
            );
        }
        debug!("Observing active space changes");

        NotificationCenter { inner: handler }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self { Self::new() }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        let center = NSWorkspace::sharedWorkspace().notificationCenter();
        unsafe { center.removeObserver(&self.inner) };
    }
}
