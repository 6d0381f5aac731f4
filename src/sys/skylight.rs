//! Space enumeration through the private SkyLight (CGS) API.
//!
//! `CGSCopyManagedDisplaySpaces` returns an array with one dictionary per
//! display:
//!
//! ```text
//! { "Display Identifier": "Main",
//!   "Current Space": { "ManagedSpaceID": 3, ... },
//!   "Spaces": [ { "ManagedSpaceID": 1, "type": 0, ... }, ... ] }
//! ```

use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{ClassType, msg_send};
use objc2_foundation::{NSArray, NSDictionary, NSNumber, NSString};
use tracing::trace;

use crate::model::space::{DisplaySpaces, Space, SpaceId, SpaceKind, SpaceSnapshot};

pub type ConnectionId = i32;

const DISPLAY_IDENTIFIER_KEY: &str = "Display Identifier";
const CURRENT_SPACE_KEY: &str = "Current Space";
const SPACES_KEY: &str = "Spaces";
const MANAGED_SPACE_ID_KEY: &str = "ManagedSpaceID";
const SPACE_TYPE_KEY: &str = "type";

#[link(name = "SkyLight", kind = "framework")]
unsafe extern "C" {
    fn SLSMainConnectionID() -> ConnectionId;
    /// Returns a +1 retained CFArray.
    fn CGSCopyManagedDisplaySpaces(cid: ConnectionId) -> *mut NSArray;
    fn CGSGetActiveSpace(cid: ConnectionId) -> u64;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    #[error("CGSCopyManagedDisplaySpaces returned null")]
    NullResult,
    #[error("malformed display entry {index}: {reason}")]
    Malformed { index: usize, reason: &'static str },
}

/// Source of [`SpaceSnapshot`]s.
pub trait SpaceSource {
    fn snapshot(&self) -> Result<SpaceSnapshot, SpaceError>;
}

pub struct SkyLight {
    conn: ConnectionId,
}

impl SkyLight {
    pub fn connect() -> Self {
        let conn = unsafe { SLSMainConnectionID() };
        trace!(conn, "Connected to window server");
        Self { conn }
    }

    pub fn active_space(&self) -> Option<SpaceId> {
        match unsafe { CGSGetActiveSpace(self.conn) } {
            0 => None,
            sid => Some(SpaceId::new(sid)),
        }
    }

    fn copy_display_spaces(&self) -> Result<Vec<RawDisplay>, SpaceError> {
        let raw = unsafe { CGSCopyManagedDisplaySpaces(self.conn) };
        // SAFETY: the Copy rule hands us ownership of the returned array.
        let displays = unsafe { Retained::from_raw(raw) }.ok_or(SpaceError::NullResult)?;

        Ok(displays
            .iter()
            .map(|display| unsafe { RawDisplay::read(&display) })
            .collect())
    }
}

impl SpaceSource for SkyLight {
    fn snapshot(&self) -> Result<SpaceSnapshot, SpaceError> {
        let displays = self
            .copy_display_spaces()?
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_display(index))
            .collect::<Result<Vec<_>, _>>()?;
        let snapshot = SpaceSnapshot {
            displays,
            active: self.active_space(),
        };
        trace!(?snapshot, "Read space snapshot");
        Ok(snapshot)
    }
}

/// One display dictionary with every field optional, as read from the
/// window server before validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct RawDisplay {
    identifier: Option<String>,
    current: Option<u64>,
    spaces: Option<Vec<RawSpace>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RawSpace {
    id: Option<u64>,
    kind: Option<i64>,
}

impl RawDisplay {
    /// # Safety
    /// `obj` must be a live Objective-C object.
    unsafe fn read(obj: &AnyObject) -> Self {
        if !unsafe { is_kind::<NSDictionary>(obj) } {
            return Self::default();
        }
        unsafe {
            let identifier = object_for_key(obj, DISPLAY_IDENTIFIER_KEY)
                .filter(|o| is_kind::<NSString>(o))
                .map(|o| string_value(&o));
            let current = object_for_key(obj, CURRENT_SPACE_KEY)
                .and_then(|cur| object_for_key(&cur, MANAGED_SPACE_ID_KEY))
                .and_then(|id| u64_value(&id));
            let spaces = object_for_key(obj, SPACES_KEY)
                .filter(|o| is_kind::<NSArray>(o))
                .map(|arr| array_items(&arr).iter().map(|s| RawSpace::read(s)).collect());
            Self { identifier, current, spaces }
        }
    }

    fn into_display(self, index: usize) -> Result<DisplaySpaces, SpaceError> {
        let malformed = |reason| SpaceError::Malformed { index, reason };
        let current = self.current.ok_or_else(|| malformed("missing current space"))?;
        let spaces = self
            .spaces
            .ok_or_else(|| malformed("missing space list"))?
            .into_iter()
            .map(|raw| {
                let id = raw.id.ok_or_else(|| malformed("space without ManagedSpaceID"))?;
                Ok(Space {
                    id: SpaceId::new(id),
                    kind: SpaceKind::from_raw(raw.kind.unwrap_or(0)),
                })
            })
            .collect::<Result<Vec<_>, SpaceError>>()?;

        Ok(DisplaySpaces {
            display_identifier: self.identifier.unwrap_or_else(|| format!("Display-{index}")),
            current: SpaceId::new(current),
            spaces,
        })
    }
}

impl RawSpace {
    unsafe fn read(obj: &AnyObject) -> Self {
        if !unsafe { is_kind::<NSDictionary>(obj) } {
            return Self::default();
        }
        unsafe {
            Self {
                id: object_for_key(obj, MANAGED_SPACE_ID_KEY).and_then(|id| u64_value(&id)),
                kind: object_for_key(obj, SPACE_TYPE_KEY).and_then(|t| i64_value(&t)),
            }
        }
    }
}

unsafe fn is_kind<T: ClassType>(obj: &AnyObject) -> bool {
    unsafe { msg_send![obj, isKindOfClass: T::class()] }
}

unsafe fn object_for_key(dict: &AnyObject, key: &str) -> Option<Retained<AnyObject>> {
    let key = NSString::from_str(key);
    unsafe { msg_send![dict, objectForKey: &*key] }
}

unsafe fn array_items(arr: &AnyObject) -> Vec<Retained<AnyObject>> {
    let count: usize = unsafe { msg_send![arr, count] };
    (0..count)
        .map(|idx| -> Retained<AnyObject> { unsafe { msg_send![arr, objectAtIndex: idx] } })
        .collect()
}

unsafe fn u64_value(obj: &AnyObject) -> Option<u64> {
    if !unsafe { is_kind::<NSNumber>(obj) } {
        return None;
    }
    Some(unsafe { msg_send![obj, unsignedLongLongValue] })
}

unsafe fn i64_value(obj: &AnyObject) -> Option<i64> {
    if !unsafe { is_kind::<NSNumber>(obj) } {
        return None;
    }
    Some(unsafe { msg_send![obj, longLongValue] })
}

unsafe fn string_value(obj: &AnyObject) -> String {
    let string = unsafe { &*(obj as *const AnyObject as *const NSString) };
    string.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw_space(id: u64, kind: i64) -> RawSpace {
        RawSpace {
            id: Some(id),
            kind: Some(kind),
        }
    }

    #[test]
    fn raw_display_converts_in_order() {
        let raw = RawDisplay {
            identifier: Some("Main".into()),
            current: Some(5),
            spaces: Some(vec![raw_space(1, 0), raw_space(5, 0), raw_space(9, 4)]),
        };
        let display = raw.into_display(0).unwrap();
        assert_eq!(display.display_identifier, "Main");
        assert_eq!(display.current, SpaceId::new(5));
        assert_eq!(
            display.spaces,
            vec![
                Space::user(1),
                Space::user(5),
                Space {
                    id: SpaceId::new(9),
                    kind: SpaceKind::Fullscreen
                },
            ]
        );
    }

    #[test]
    fn missing_identifier_and_type_get_defaults() {
        let raw = RawDisplay {
            identifier: None,
            current: Some(2),
            spaces: Some(vec![RawSpace { id: Some(2), kind: None }]),
        };
        let display = raw.into_display(3).unwrap();
        assert_eq!(display.display_identifier, "Display-3");
        assert_eq!(display.spaces, vec![Space::user(2)]);
    }

    #[test]
    fn malformed_entries_are_reported() {
        let no_current = RawDisplay {
            spaces: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            no_current.into_display(1),
            Err(SpaceError::Malformed {
                index: 1,
                reason: "missing current space"
            })
        );

        let no_space_id = RawDisplay {
            current: Some(1),
            spaces: Some(vec![RawSpace::default()]),
            ..Default::default()
        };
        assert!(matches!(
            no_space_id.into_display(0),
            Err(SpaceError::Malformed { index: 0, .. })
        ));

        let no_spaces = RawDisplay {
            current: Some(1),
            ..Default::default()
        };
        assert!(no_spaces.into_display(0).is_err());
    }
}
