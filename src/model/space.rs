//! Window-server Space data as seen at one point in time.
//!
//! Nothing here is owned by us: a [`SpaceSnapshot`] is read fresh from the
//! window server on every change event and thrown away afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::config::DisplaySelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(u64);

impl SpaceId {
    pub const fn new(id: u64) -> Self { Self(id) }

    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    User,
    Fullscreen,
    Other(i64),
}

impl SpaceKind {
    /// Maps the window server's `type` value.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => SpaceKind::User,
            4 => SpaceKind::Fullscreen,
            other => SpaceKind::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub kind: SpaceKind,
}

impl Space {
    pub fn user(id: u64) -> Self {
        Self {
            id: SpaceId::new(id),
            kind: SpaceKind::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySpaces {
    /// "Main" on single-display setups, otherwise a display UUID.
    pub display_identifier: String,
    pub current: SpaceId,
    /// In mission-control order.
    pub spaces: Vec<Space>,
}

impl DisplaySpaces {
    pub fn space_ids(&self) -> Vec<SpaceId> { self.spaces.iter().map(|s| s.id).collect() }

    /// 1-based position of `id` on this display.
    pub fn position_of(&self, id: SpaceId) -> Option<usize> {
        self.spaces.iter().position(|s| s.id == id).map(|idx| idx + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSnapshot {
    pub displays: Vec<DisplaySpaces>,
    /// The globally active Space, if the window server reported one.
    pub active: Option<SpaceId>,
}

impl SpaceSnapshot {
    pub fn is_empty(&self) -> bool { self.displays.iter().all(|d| d.spaces.is_empty()) }

    /// The display whose Spaces the indicator should show.
    pub fn select_display(&self, selection: DisplaySelection) -> Option<&DisplaySpaces> {
        match selection {
            DisplaySelection::Main => self.displays.first(),
            DisplaySelection::Active => self.active_display().or_else(|| self.displays.first()),
        }
    }

    /// The display currently showing the globally active Space.
    pub fn active_display(&self) -> Option<&DisplaySpaces> {
        let active = self.active?;
        self.displays.iter().find(|d| d.current == active)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn display(name: &str, current: u64, ids: &[u64]) -> DisplaySpaces {
        DisplaySpaces {
            display_identifier: name.to_string(),
            current: SpaceId::new(current),
            spaces: ids.iter().copied().map(Space::user).collect(),
        }
    }

    #[test]
    fn active_selection_follows_the_active_space() {
        let snapshot = SpaceSnapshot {
            displays: vec![display("Main", 1, &[1, 2]), display("Side", 9, &[8, 9])],
            active: Some(SpaceId::new(9)),
        };

        let picked = snapshot.select_display(DisplaySelection::Active).unwrap();
        assert_eq!(picked.display_identifier, "Side");

        let picked = snapshot.select_display(DisplaySelection::Main).unwrap();
        assert_eq!(picked.display_identifier, "Main");
    }

    #[test]
    fn active_selection_falls_back_to_first_display() {
        let snapshot = SpaceSnapshot {
            displays: vec![display("Main", 1, &[1, 2]), display("Side", 9, &[8, 9])],
            active: Some(SpaceId::new(77)),
        };
        let picked = snapshot.select_display(DisplaySelection::Active).unwrap();
        assert_eq!(picked.display_identifier, "Main");

        let snapshot = SpaceSnapshot { active: None, ..snapshot };
        let picked = snapshot.select_display(DisplaySelection::Active).unwrap();
        assert_eq!(picked.display_identifier, "Main");
    }

    #[test]
    fn positions_are_one_based() {
        let d = display("Main", 40, &[12, 40, 7]);
        assert_eq!(d.position_of(SpaceId::new(12)), Some(1));
        assert_eq!(d.position_of(SpaceId::new(7)), Some(3));
        assert_eq!(d.position_of(SpaceId::new(99)), None);
    }

    #[test]
    fn space_kind_mapping() {
        assert_eq!(SpaceKind::from_raw(0), SpaceKind::User);
        assert_eq!(SpaceKind::from_raw(4), SpaceKind::Fullscreen);
        assert_eq!(SpaceKind::from_raw(2), SpaceKind::Other(2));
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = SpaceSnapshot {
            displays: vec![display("Main", 1, &[])],
            active: None,
        };
        assert!(snapshot.is_empty());
        assert!(SpaceSnapshot { displays: vec![], active: None }.is_empty());
    }
}
