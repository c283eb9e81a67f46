use serde::{Deserialize, Serialize};

use crate::error::PageError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(SectionId);
id_newtype!(BlockId);
id_newtype!(ControlId);

/// Any element the viewport can report intersections for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TargetId {
    Section(SectionId),
    Block(BlockId),
}

impl TargetId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Section(id) => id.as_str(),
            Self::Block(id) => id.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Step content as authored in configuration. The index is implied by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(default)]
    pub label: Option<String>,
    pub title: String,
    pub lead: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub label: String,
    pub title: String,
    pub lead: String,
    pub bullets: Vec<String>,
    pub deliverables: Vec<String>,
}

impl Step {
    fn from_record(index: usize, record: StepRecord) -> Self {
        Self {
            index,
            label: record
                .label
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| format!("Step {}", index + 1)),
            title: record.title,
            lead: record.lead,
            bullets: record.bullets,
            deliverables: record.deliverables,
        }
    }
}

/// Ordered, immutable list of steps. `steps[i].index == i` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCatalog {
    steps: Vec<Step>,
}

impl StepCatalog {
    pub fn from_records(records: Vec<StepRecord>) -> Result<Self, PageError> {
        let mut steps = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            if record.title.trim().is_empty() {
                return Err(PageError::InvalidCatalog(format!(
                    "step {index} has an empty title"
                )));
            }
            steps.push(Step::from_record(index, record));
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn checked(&self, index: usize) -> Result<&Step, PageError> {
        self.steps.get(index).ok_or(PageError::InvalidIndex {
            index,
            count: self.steps.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

impl Default for StepCatalog {
    fn default() -> Self {
        Self {
            steps: default_step_records()
                .into_iter()
                .enumerate()
                .map(|(index, record)| Step::from_record(index, record))
                .collect(),
        }
    }
}

fn record(title: &str, lead: &str, bullets: &[&str], deliverables: &[&str]) -> StepRecord {
    StepRecord {
        label: None,
        title: title.to_string(),
        lead: lead.to_string(),
        bullets: bullets.iter().map(|s| s.to_string()).collect(),
        deliverables: deliverables.iter().map(|s| s.to_string()).collect(),
    }
}

/// The built-in process timeline shipped with the page.
pub fn default_step_records() -> Vec<StepRecord> {
    vec![
        record(
            "Discovery",
            "We learn your goals and your customers. We get clear on what the website must do.",
            &[
                "We ask simple questions about your business",
                "We list the main pages you need",
                "We talk about timeline, budget, and content",
                "We agree on what success looks like",
            ],
            &["Project notes", "Page list", "Basic timeline", "Next steps"],
        ),
        record(
            "Plan & Design",
            "We plan the site so it is easy to use. Then we design a clean look that feels premium.",
            &[
                "We set up the navigation and page order",
                "We sketch simple page layouts",
                "We choose fonts, spacing, and style",
            ],
            &["Wireframes", "Style direction", "Page layout plan", "Design draft"],
        ),
        record(
            "Build",
            "We build the website and make it work on every device.",
            &[
                "We build mobile-first sections",
                "We keep the site nice & smooth",
                "We test the site for basic accessibility",
            ],
            &["Working website", "Mobile layout", "Speed checks", "QA review"],
        ),
        record(
            "Launch",
            "We launch your site and make sure everything is working. We can also help with updates after launch.",
            &[
                "We run a final launch checklist",
                "We help with domain and hosting if needed",
                "We share simple handoff notes",
            ],
            &[
                "Launch checklist",
                "Handoff notes",
                "Go-live support",
                "Update options",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_assigns_contiguous_indices_and_default_labels() {
        let catalog = StepCatalog::from_records(vec![
            record("One", "", &[], &[]),
            StepRecord {
                label: Some("Kickoff".into()),
                ..record("Two", "", &[], &[])
            },
            record("Three", "", &[], &[]),
        ])
        .expect("catalog");

        let indices: Vec<_> = catalog.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(catalog.get(0).map(|s| s.label.as_str()), Some("Step 1"));
        assert_eq!(catalog.get(1).map(|s| s.label.as_str()), Some("Kickoff"));
    }

    #[test]
    fn catalog_rejects_blank_titles() {
        let err = StepCatalog::from_records(vec![record("  ", "", &[], &[])]).unwrap_err();
        assert!(matches!(err, PageError::InvalidCatalog(_)));
    }

    #[test]
    fn checked_lookup_reports_out_of_range_index() {
        let catalog = StepCatalog::default();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.checked(2).map(|s| s.title.as_str()), Ok("Build"));
        assert_eq!(
            catalog.checked(4),
            Err(PageError::InvalidIndex { index: 4, count: 4 })
        );
    }

    #[test]
    fn target_ids_serialize_with_kind_tag() {
        let json = serde_json::to_string(&TargetId::Section(SectionId::from("#about")))
            .expect("serialize");
        assert_eq!(json, r##"{"kind":"section","id":"#about"}"##);
    }
}
