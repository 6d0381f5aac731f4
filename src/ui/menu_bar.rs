use objc2::rc::Retained;
use objc2::runtime::{AnyObject, ProtocolObject};
use objc2::{AnyThread, ClassType, MainThreadOnly, Message, define_class, msg_send, sel};
use objc2_app_kit::{
    NSApplication, NSBaselineOffsetAttributeName, NSColor, NSControlStateValueOff,
    NSControlStateValueOn, NSFont, NSFontAttributeName, NSForegroundColorAttributeName, NSMenu,
    NSMenuDelegate, NSMenuItem, NSStatusBar, NSStatusItem, NSVariableStatusItemLength,
};
use objc2_foundation::{
    MainThreadMarker, NSAttributedString, NSAttributedStringKey, NSDictionary,
    NSMutableAttributedString, NSMutableDictionary, NSNumber, NSObject, NSObjectProtocol,
    NSString,
};
use tracing::debug;

use crate::actor::{self, Event};
use crate::common::config::LabelSettings;
use crate::model::appearance::Appearance;
use crate::model::label::LabelSegments;
use crate::ui::view::{MenuEntry, StatusSurface, StatusView};

const MENU_TITLE: &str = "WhichSpace";

/// The status item: an attributed title showing the label and a dropdown
/// listing the display's Spaces.
pub struct MenuIcon {
    status_item: Retained<NSStatusItem>,
    handler: Retained<MenuActionHandler>,
    settings: LabelSettings,
    mtm: MainThreadMarker,
    entries: Option<Vec<MenuEntry>>,
}

impl MenuIcon {
    pub fn new(mtm: MainThreadMarker, settings: LabelSettings) -> Self {
        let status_bar = NSStatusBar::systemStatusBar();
        let status_item = status_bar.statusItemWithLength(NSVariableStatusItemLength);
        let handler = MenuActionHandler::new(mtm);
        let menu = build_status_menu(mtm, &handler, &[]);
        status_item.setMenu(Some(&menu));
        status_item.setVisible(true);

        Self {
            status_item,
            handler,
            settings,
            mtm,
            entries: None,
        }
    }

    fn set_title(&self, segments: &LabelSegments, appearance: Appearance) {
        let Some(button) = self.status_item.button(self.mtm) else {
            return;
        };
        let title = build_title(segments, appearance, &self.settings);
        button.setAttributedTitle(&title);
    }

    fn set_entries(&mut self, entries: &[MenuEntry]) {
        // Rebuilding while the menu is open would close it, so only do it
        // when the list actually changed.
        if self.entries.as_deref() == Some(entries) {
            return;
        }
        let menu = build_status_menu(self.mtm, &self.handler, entries);
        self.status_item.setMenu(Some(&menu));
        self.entries = Some(entries.to_vec());
    }
}

impl StatusSurface for MenuIcon {
    fn render(&mut self, view: &StatusView) {
        self.set_title(&view.segments, view.appearance);
        self.set_entries(&view.entries);
    }

    fn terminate(&self) { NSApplication::sharedApplication(self.mtm).terminate(None); }
}

impl Drop for MenuIcon {
    fn drop(&mut self) {
        debug!("Removing menu bar icon");

        let status_bar = NSStatusBar::systemStatusBar();
        status_bar.removeStatusItem(&self.status_item);
    }
}

fn as_any_object<T: Message>(obj: &T) -> &AnyObject {
    unsafe { &*(obj as *const T as *const AnyObject) }
}

fn build_text_attrs(
    font: &NSFont,
    color: Option<&NSColor>,
    baseline_offset: Option<f64>,
) -> Retained<NSDictionary<NSAttributedStringKey, AnyObject>> {
    let dict = NSMutableDictionary::<NSAttributedStringKey, AnyObject>::new();
    unsafe {
        dict.setObject_forKeyedSubscript(
            Some(as_any_object(font)),
            ProtocolObject::from_ref(NSFontAttributeName),
        );
        if let Some(color) = color {
            dict.setObject_forKeyedSubscript(
                Some(as_any_object(color)),
                ProtocolObject::from_ref(NSForegroundColorAttributeName),
            );
        }
        if let Some(offset) = baseline_offset {
            let offset = NSNumber::new_f64(offset);
            dict.setObject_forKeyedSubscript(
                Some(as_any_object(&*offset)),
                ProtocolObject::from_ref(NSBaselineOffsetAttributeName),
            );
        }
    }
    unsafe { Retained::cast_unchecked(dict) }
}

fn attributed(
    text: &str,
    attrs: &NSDictionary<NSAttributedStringKey, AnyObject>,
) -> Retained<NSAttributedString> {
    let text = NSString::from_str(text);
    unsafe { msg_send![NSAttributedString::alloc(), initWithString: &*text, attributes: attrs] }
}

/// Neighbours in a small regular font raised by the baseline offset, the
/// active number bold in between.
fn build_title(
    segments: &LabelSegments,
    appearance: Appearance,
    settings: &LabelSettings,
) -> Retained<NSAttributedString> {
    let color = appearance
        .foreground_white()
        .map(|white| NSColor::colorWithCalibratedWhite_alpha(white, 1.0));

    let neighbor_font = NSFont::systemFontOfSize(settings.neighbor_font_size);
    let active_font = NSFont::boldSystemFontOfSize(settings.active_font_size);
    let neighbor_attrs = build_text_attrs(
        &neighbor_font,
        color.as_deref(),
        Some(settings.neighbor_baseline_offset),
    );
    let active_attrs = build_text_attrs(&active_font, color.as_deref(), None);

    let title = NSMutableAttributedString::new();
    for (text, attrs) in [
        (segments.before.as_str(), &neighbor_attrs),
        (segments.active.as_str(), &active_attrs),
        (segments.after.as_str(), &neighbor_attrs),
    ] {
        if text.is_empty() {
            continue;
        }
        let part = attributed(text, attrs);
        title.appendAttributedString(&part);
    }
    Retained::into_super(title)
}

fn make_menu_item(
    mtm: MainThreadMarker,
    title: &str,
    action: Option<objc2::runtime::Sel>,
    target: Option<&MenuActionHandler>,
    checked: Option<bool>,
    tag: Option<isize>,
) -> Retained<NSMenuItem> {
    let ns_title = NSString::from_str(title);
    let key_equivalent_empty = NSString::from_str("");
    let item: Retained<NSMenuItem> = unsafe {
        msg_send![NSMenuItem::alloc(mtm), initWithTitle: &*ns_title, action: action, keyEquivalent: &*key_equivalent_empty]
    };
    if let Some(target) = target {
        unsafe {
            item.setTarget(Some(target));
        }
    }
    if let Some(checked) = checked {
        item.setState(if checked {
            NSControlStateValueOn
        } else {
            NSControlStateValueOff
        });
    }
    if let Some(tag) = tag {
        item.setTag(tag);
    }

    item
}

fn add_separator(menu: &NSMenu) {
    let separator: Retained<NSMenuItem> = unsafe { msg_send![NSMenuItem::class(), separatorItem] };
    menu.addItem(&separator);
}

fn build_status_menu(
    mtm: MainThreadMarker,
    handler: &MenuActionHandler,
    entries: &[MenuEntry],
) -> Retained<NSMenu> {
    let title = NSString::from_str(MENU_TITLE);
    let menu: Retained<NSMenu> = unsafe { msg_send![NSMenu::alloc(mtm), initWithTitle: &*title] };
    menu.setAutoenablesItems(false);
    menu.setDelegate(Some(ProtocolObject::from_ref(handler)));

    for entry in entries {
        let item = make_menu_item(
            mtm,
            &entry.title,
            Some(sel!(onSwitchDesktop:)),
            Some(handler),
            Some(entry.is_active),
            entry.desktop.map(|d| d as isize),
        );
        item.setEnabled(entry.is_enabled());
        menu.addItem(&item);
    }
    if !entries.is_empty() {
        add_separator(&menu);
    }

    menu.addItem(&make_menu_item(
        mtm,
        "Quit WhichSpace",
        Some(sel!(onQuit:)),
        Some(handler),
        None,
        None,
    ));

    menu
}

impl MenuActionHandler {
    fn new(mtm: MainThreadMarker) -> Retained<Self> {
        let this = mtm.alloc().set_ivars(());
        unsafe { msg_send![super(this), init] }
    }
}

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "WhichSpaceMenuActionHandler"]
    struct MenuActionHandler;

    impl MenuActionHandler {
        #[unsafe(method(onSwitchDesktop:))]
        fn on_switch_desktop(&self, sender: Option<&NSMenuItem>) {
            if let Some(sender) = sender {
                let tag = sender.tag();
                if tag > 0 {
                    actor::post(Event::SwitchToDesktop(tag as usize));
                }
            }
        }

        #[unsafe(method(onQuit:))]
        fn on_quit(&self, _sender: Option<&AnyObject>) {
            actor::post(Event::Quit);
        }
    }

    unsafe impl NSObjectProtocol for MenuActionHandler {}

    unsafe impl NSMenuDelegate for MenuActionHandler {
        #[unsafe(method(menuWillOpen:))]
        fn menu_will_open(&self, _menu: &NSMenu) {
            actor::post(Event::MenuOpened);
        }

        #[unsafe(method(menuDidClose:))]
        fn menu_did_close(&self, _menu: &NSMenu) {
            actor::post(Event::MenuClosed);
        }
    }
);
