//! Serializable answers for `whichspace query`.

use serde::{Deserialize, Serialize};

use crate::common::config::Config;
use crate::model::label::ActiveSpaceLabel;
use crate::model::space::{Space, SpaceSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayData {
    pub identifier: String,
    pub current_space: u64,
    pub position: Option<usize>,
    pub spaces: Vec<Space>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelData {
    pub before: Vec<u64>,
    pub active: u64,
    pub after: Vec<u64>,
    pub text: String,
}

impl From<&ActiveSpaceLabel> for LabelData {
    fn from(label: &ActiveSpaceLabel) -> Self {
        Self {
            before: label.before.clone(),
            active: label.active,
            after: label.after.clone(),
            text: label.to_string(),
        }
    }
}

/// What the status item would show right now. `error` is set instead of
/// `label` when no label can be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryData {
    pub display: Option<DisplayData>,
    pub label: Option<LabelData>,
    pub error: Option<String>,
}

impl QueryData {
    pub fn from_snapshot(snapshot: &SpaceSnapshot, config: &Config) -> Self {
        let Some(display) = snapshot.select_display(config.menu.display) else {
            return Self {
                display: None,
                label: None,
                error: Some("window server reported no displays".to_string()),
            };
        };

        let display_data = DisplayData {
            identifier: display.display_identifier.clone(),
            current_space: display.current.get(),
            position: display.position_of(display.current),
            spaces: display.spaces.clone(),
        };

        let (label, error) = match ActiveSpaceLabel::compute(display, &config.label) {
            Ok(label) => (Some(LabelData::from(&label)), None),
            Err(err) => (None, Some(err.to_string())),
        };

        Self {
            display: Some(display_data),
            label,
            error,
        }
    }

    /// Single line for non-JSON output.
    pub fn summary(&self) -> String {
        match (&self.label, &self.error) {
            (Some(label), _) => label.text.clone(),
            (None, Some(err)) => format!("error: {err}"),
            (None, None) => "error: no label".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::common::config::LabelStrategy;
    use crate::model::space::{DisplaySpaces, SpaceId, SpaceKind};

    fn snapshot() -> SpaceSnapshot {
        SpaceSnapshot {
            displays: vec![DisplaySpaces {
                display_identifier: "Main".to_string(),
                current: SpaceId::new(5),
                spaces: vec![
                    Space::user(3),
                    Space::user(5),
                    Space {
                        id: SpaceId::new(9),
                        kind: SpaceKind::Fullscreen,
                    },
                ],
            }],
            active: Some(SpaceId::new(5)),
        }
    }

    #[test]
    fn query_serializes_display_and_label() {
        let data = QueryData::from_snapshot(&snapshot(), &Config::default());

        let value = serde_json::to_value(&data).expect("serialize QueryData");
        let expected = json!({
            "display": {
                "identifier": "Main",
                "current_space": 5,
                "position": 2,
                "spaces": [
                    { "id": 3, "kind": "user" },
                    { "id": 5, "kind": "user" },
                    { "id": 9, "kind": "fullscreen" },
                ],
            },
            "label": {
                "before": [1],
                "active": 2,
                "after": [3],
                "text": "1 [2] 3",
            },
            "error": null,
        });
        assert_eq!(value, expected);
        assert_eq!(data.summary(), "1 [2] 3");
    }

    #[test]
    fn value_strategy_reports_out_of_range() {
        let mut config = Config::default();
        config.label.strategy = LabelStrategy::Value;
        config.label.value_range = [1, 4];

        let data = QueryData::from_snapshot(&snapshot(), &config);
        assert!(data.label.is_none());
        assert!(data.display.is_some());
        assert!(data.summary().starts_with("error: "));
    }

    #[test]
    fn empty_snapshot_has_no_display() {
        let empty = SpaceSnapshot { displays: vec![], active: None };
        let data = QueryData::from_snapshot(&empty, &Config::default());
        assert_eq!(data.display, None);
        assert_eq!(data.label, None);
        assert!(data.error.is_some());
    }
}
