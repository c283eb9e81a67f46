use std::{fs, path::Path};

use anyhow::Context;
use shared::protocol::PageEvent;

pub fn load_script(path: &Path) -> anyhow::Result<Vec<PageEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read script '{}'", path.display()))?;
    parse_script(&raw).with_context(|| format!("invalid script '{}'", path.display()))
}

/// A script is a JSON array of events. A `scroll` is followed by an implicit
/// animation frame unless the next event is already one.
pub fn parse_script(raw: &str) -> anyhow::Result<Vec<PageEvent>> {
    let events: Vec<PageEvent> = serde_json::from_str(raw)?;
    let mut expanded = Vec::with_capacity(events.len());
    let mut iter = events.into_iter().peekable();
    while let Some(event) = iter.next() {
        let is_scroll = matches!(event, PageEvent::Scroll { .. });
        expanded.push(event);
        if is_scroll
            && !matches!(
                iter.peek(),
                Some(PageEvent::AnimationFrame | PageEvent::Scroll { .. })
            )
        {
            expanded.push(PageEvent::AnimationFrame);
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use shared::protocol::ControlTarget;

    use super::*;

    #[test]
    fn inserts_frames_after_scroll_bursts() {
        let events = parse_script(
            r#"[
                {"type": "scroll", "y": 10.0},
                {"type": "scroll", "y": 20.0},
                {"type": "advance", "ms": 16},
                {"type": "scroll", "y": 30.0},
                {"type": "animation_frame"}
            ]"#,
        )
        .expect("script");

        assert_eq!(
            events,
            vec![
                PageEvent::Scroll { y: 10.0 },
                PageEvent::Scroll { y: 20.0 },
                PageEvent::AnimationFrame,
                PageEvent::Advance { ms: 16 },
                PageEvent::Scroll { y: 30.0 },
                PageEvent::AnimationFrame,
            ]
        );
    }

    #[test]
    fn demo_walkthrough_stays_within_demo_steps() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let events = load_script(&demos.join("walkthrough.json")).expect("demo script");
        let catalog =
            crate::settings::load_steps(Some(&demos.join("steps.toml"))).expect("demo steps");

        let indices: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                PageEvent::Click {
                    target: ControlTarget::StepTrigger { index },
                }
                | PageEvent::KeyDown {
                    target: Some(ControlTarget::StepTrigger { index }),
                    ..
                } => Some(*index),
                _ => None,
            })
            .collect();

        assert!(!indices.is_empty());
        assert!(indices.iter().all(|index| *index < catalog.len()), "{indices:?}");
    }

    #[test]
    fn rejects_unknown_event_types() {
        assert!(parse_script(r#"[{"type": "hover"}]"#).is_err());
    }
}
