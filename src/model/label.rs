use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::common::config::{LabelSettings, LabelStrategy};
use crate::model::space::{DisplaySpaces, SpaceId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("window server reported no spaces")]
    EmptySnapshot,
    #[error("active space {0} is not in the reported space list")]
    ActiveNotFound(SpaceId),
    #[error("active space {active} is outside the label range {low}..={high}")]
    ActiveOutOfRange { active: SpaceId, low: u64, high: u64 },
}

/// The three parts of the status-bar text: neighbours before the active
/// Space, the active Space itself, and neighbours after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSpaceLabel {
    pub before: Vec<u64>,
    pub active: u64,
    pub after: Vec<u64>,
}

/// Rendered text for each part of an [`ActiveSpaceLabel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSegments {
    pub before: String,
    pub active: String,
    pub after: String,
}

impl ActiveSpaceLabel {
    pub fn compute(display: &DisplaySpaces, settings: &LabelSettings) -> Result<Self, LabelError> {
        let ids = display.space_ids();
        match settings.strategy {
            LabelStrategy::Position => Self::by_position(&ids, display.current),
            LabelStrategy::Value => {
                let [low, high] = settings.value_range;
                Self::by_value(&ids, display.current, low..=high)
            }
        }
    }

    /// Numbers Spaces 1..=N by their order and splits around the active
    /// Space's position.
    pub fn by_position(ids: &[SpaceId], active: SpaceId) -> Result<Self, LabelError> {
        if ids.is_empty() {
            return Err(LabelError::EmptySnapshot);
        }
        let position = ids
            .iter()
            .position(|&id| id == active)
            .ok_or(LabelError::ActiveNotFound(active))? as u64
            + 1;
        let count = ids.len() as u64;

        Ok(Self {
            before: (1..position).collect(),
            active: position,
            after: (position + 1..=count).collect(),
        })
    }

    /// Keeps raw ids inside `range`, sorts them, and splits around the active
    /// id's value rather than its position.
    pub fn by_value(
        ids: &[SpaceId],
        active: SpaceId,
        range: RangeInclusive<u64>,
    ) -> Result<Self, LabelError> {
        if ids.is_empty() {
            return Err(LabelError::EmptySnapshot);
        }
        if !ids.contains(&active) {
            return Err(LabelError::ActiveNotFound(active));
        }
        if !range.contains(&active.get()) {
            return Err(LabelError::ActiveOutOfRange {
                active,
                low: *range.start(),
                high: *range.end(),
            });
        }

        let mut values: Vec<u64> =
            ids.iter().map(|id| id.get()).filter(|v| range.contains(v)).collect();
        values.sort_unstable();
        values.dedup();

        let active = active.get();
        let split = values.partition_point(|&v| v < active);
        let after = values.split_off(split + 1);
        values.truncate(split);

        Ok(Self { before: values, active, after })
    }

    pub fn is_first(&self) -> bool { self.before.is_empty() }

    pub fn is_last(&self) -> bool { self.after.is_empty() }

    /// The active segment is padded with `separator` on both sides so it
    /// stands apart from the smaller neighbour text.
    pub fn segments(&self, separator: &str) -> LabelSegments {
        LabelSegments {
            before: join(&self.before, separator),
            active: format!("{separator}{}{separator}", self.active),
            after: join(&self.after, separator),
        }
    }
}

/// Plain-text form used outside the status bar, e.g. `1 2 [3] 4 5`.
impl fmt::Display for ActiveSpaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.before.iter().map(u64::to_string).collect();
        parts.push(format!("[{}]", self.active));
        parts.extend(self.after.iter().map(u64::to_string));
        f.write_str(&parts.join(" "))
    }
}

fn join(values: &[u64], separator: &str) -> String {
    values.iter().map(u64::to_string).collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::space::Space;

    fn ids(raw: &[u64]) -> Vec<SpaceId> { raw.iter().copied().map(SpaceId::new).collect() }

    #[test]
    fn middle_space_by_position() {
        let label = ActiveSpaceLabel::by_position(&ids(&[1, 2, 3, 4, 5]), SpaceId::new(3)).unwrap();
        assert_eq!(label.before, vec![1, 2]);
        assert_eq!(label.active, 3);
        assert_eq!(label.after, vec![4, 5]);
        assert_eq!(label.to_string(), "1 2 [3] 4 5");

        let segments = label.segments(" ");
        assert_eq!(segments.before, "1 2");
        assert_eq!(segments.active, " 3 ");
        assert_eq!(segments.after, "4 5");
    }

    #[test]
    fn position_ignores_raw_id_values() {
        // Window-server ids are rarely contiguous.
        let label =
            ActiveSpaceLabel::by_position(&ids(&[3, 41, 8, 112]), SpaceId::new(8)).unwrap();
        assert_eq!(label.before, vec![1, 2]);
        assert_eq!(label.active, 3);
        assert_eq!(label.after, vec![4]);
    }

    #[test]
    fn every_position_accounts_for_all_spaces_once() {
        let spaces = ids(&[5, 9, 2, 14, 7, 30]);
        for (idx, &active) in spaces.iter().enumerate() {
            let label = ActiveSpaceLabel::by_position(&spaces, active).unwrap();
            assert_eq!(label.active, idx as u64 + 1);

            let mut all = label.before.clone();
            all.push(label.active);
            all.extend(&label.after);
            assert_eq!(all, (1..=spaces.len() as u64).collect::<Vec<_>>());
        }
    }

    #[test]
    fn first_and_last_have_one_empty_side() {
        let spaces = ids(&[10, 20, 30]);

        let first = ActiveSpaceLabel::by_position(&spaces, SpaceId::new(10)).unwrap();
        assert!(first.is_first());
        assert!(!first.is_last());
        assert_eq!(first.segments(" ").before, "");
        assert_eq!(first.to_string(), "[1] 2 3");

        let last = ActiveSpaceLabel::by_position(&spaces, SpaceId::new(30)).unwrap();
        assert!(last.is_last());
        assert_eq!(last.segments(" ").after, "");
        assert_eq!(last.to_string(), "1 2 [3]");
    }

    #[test]
    fn single_space() {
        let label = ActiveSpaceLabel::by_position(&ids(&[77]), SpaceId::new(77)).unwrap();
        assert!(label.is_first() && label.is_last());
        assert_eq!(label.to_string(), "[1]");
    }

    #[test]
    fn errors_on_empty_or_unknown_active() {
        assert_eq!(
            ActiveSpaceLabel::by_position(&[], SpaceId::new(1)),
            Err(LabelError::EmptySnapshot)
        );
        assert_eq!(
            ActiveSpaceLabel::by_position(&ids(&[1, 2]), SpaceId::new(9)),
            Err(LabelError::ActiveNotFound(SpaceId::new(9)))
        );
    }

    #[test]
    fn value_strategy_sorts_filters_and_splits_on_value() {
        let label =
            ActiveSpaceLabel::by_value(&ids(&[7, 3, 120, 5, 1]), SpaceId::new(5), 1..=16).unwrap();
        assert_eq!(label.before, vec![1, 3]);
        assert_eq!(label.active, 5);
        assert_eq!(label.after, vec![7]);
    }

    #[test]
    fn value_strategy_deduplicates() {
        let label =
            ActiveSpaceLabel::by_value(&ids(&[2, 2, 1, 3, 3]), SpaceId::new(2), 1..=16).unwrap();
        assert_eq!(label.before, vec![1]);
        assert_eq!(label.after, vec![3]);
    }

    #[test]
    fn value_strategy_rejects_active_outside_range() {
        assert_eq!(
            ActiveSpaceLabel::by_value(&ids(&[1, 40]), SpaceId::new(40), 1..=16),
            Err(LabelError::ActiveOutOfRange {
                active: SpaceId::new(40),
                low: 1,
                high: 16
            })
        );
    }

    #[test]
    fn compute_uses_configured_strategy() {
        let display = DisplaySpaces {
            display_identifier: "Main".into(),
            current: SpaceId::new(9),
            spaces: [4, 9, 2].into_iter().map(Space::user).collect(),
        };

        let mut settings = LabelSettings::default();
        let by_position = ActiveSpaceLabel::compute(&display, &settings).unwrap();
        assert_eq!(by_position.to_string(), "1 [2] 3");

        settings.strategy = LabelStrategy::Value;
        let by_value = ActiveSpaceLabel::compute(&display, &settings).unwrap();
        assert_eq!(by_value.to_string(), "2 4 [9]");
    }
}
