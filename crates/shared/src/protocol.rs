use serde::{Deserialize, Serialize};

use crate::domain::{ControlId, TargetId};

/// One intersection report for an observed target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: TargetId,
    pub is_intersecting: bool,
    #[serde(default)]
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target: TargetId, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
        }
    }
}

/// Keyboard key, decoded from either script names (`"escape"`) or DOM
/// `KeyboardEvent.key` values (`"Escape"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        match value.as_str() {
            "enter" => Self::Enter,
            "space" => Self::Space,
            "escape" => Self::Escape,
            other => Self::from_dom_key(other),
        }
    }
}

impl From<Key> for String {
    fn from(value: Key) -> Self {
        match value {
            Key::Enter => "enter",
            Key::Space => "space",
            Key::Escape => "escape",
            Key::Other => "other",
        }
        .to_string()
    }
}

impl Key {
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    pub fn activates(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// What a pointer or keyboard event landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlTarget {
    StepTrigger { index: usize },
    CloseButton,
    /// Anything inside the overlay region marked as closing it (backdrop, footer link).
    CloseRegion,
    Other { control: ControlId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    Scroll {
        y: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
    AnimationFrame,
    Click {
        target: ControlTarget,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        target: Option<ControlTarget>,
    },
    Focus {
        control: ControlId,
    },
    /// Moves the page clock forward, firing any deferred work that falls due.
    Advance {
        ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scripted_events() {
        let raw = r#"[
            {"type": "scroll", "y": 420.0},
            {"type": "click", "target": {"kind": "step_trigger", "index": 2}},
            {"type": "key_down", "key": "escape"},
            {"type": "key_down", "key": "Tab"},
            {"type": "advance", "ms": 250}
        ]"#;

        let events: Vec<PageEvent> = serde_json::from_str(raw).expect("decode");
        assert_eq!(events.len(), 5);
        assert_eq!(
            events[1],
            PageEvent::Click {
                target: ControlTarget::StepTrigger { index: 2 }
            }
        );
        assert_eq!(
            events[2],
            PageEvent::KeyDown {
                key: Key::Escape,
                target: None
            }
        );
        assert!(matches!(
            events[3],
            PageEvent::KeyDown {
                key: Key::Other,
                ..
            }
        ));
    }

    #[test]
    fn maps_dom_key_names() {
        assert_eq!(Key::from_dom_key(" "), Key::Space);
        assert_eq!(Key::from("Escape".to_string()), Key::Escape);
        assert_eq!(Key::from_dom_key("Escape"), Key::Escape);
        assert!(Key::from_dom_key("Enter").activates());
        assert!(!Key::from_dom_key("a").activates());
    }
}
