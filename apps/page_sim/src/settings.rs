use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use page_core::{PageConfig, Rect};
use serde::Deserialize;
use shared::domain::{default_step_records, BlockId, SectionId, StepCatalog, StepRecord, TargetId};

const DEFAULT_SETTINGS_FILE: &str = "page_sim.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Section,
    Block,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutEntry {
    pub kind: LayoutKind,
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl LayoutEntry {
    fn new(kind: LayoutKind, id: &str, top: f64, height: f64) -> Self {
        Self {
            kind,
            id: id.to_string(),
            top,
            height,
        }
    }

    pub fn target(&self) -> TargetId {
        match self.kind {
            LayoutKind::Section => TargetId::Section(SectionId::new(self.id.clone())),
            LayoutKind::Block => TargetId::Block(BlockId::new(self.id.clone())),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.top, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub header_height: f64,
    pub reduced_motion: bool,
    pub observer_available: bool,
    pub steps_file: Option<PathBuf>,
    pub page: PageConfig,
    pub layout: Vec<LayoutEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 900.0,
            header_height: 64.0,
            reduced_motion: false,
            observer_available: true,
            steps_file: None,
            page: PageConfig::default(),
            layout: default_layout(),
        }
    }
}

impl Settings {
    pub fn blocks(&self) -> Vec<BlockId> {
        self.layout
            .iter()
            .filter(|entry| entry.kind == LayoutKind::Block)
            .map(|entry| BlockId::new(entry.id.clone()))
            .collect()
    }
}

/// Hero, the five tracked sections and the revealable blocks inside them.
fn default_layout() -> Vec<LayoutEntry> {
    use LayoutKind::{Block, Section};
    vec![
        LayoutEntry::new(Block, "hero-copy", 120.0, 420.0),
        LayoutEntry::new(Section, "#about", 900.0, 900.0),
        LayoutEntry::new(Block, "about-copy", 980.0, 360.0),
        LayoutEntry::new(Section, "#services", 1800.0, 1100.0),
        LayoutEntry::new(Block, "services-tabs", 1900.0, 700.0),
        LayoutEntry::new(Section, "#process", 2900.0, 1000.0),
        LayoutEntry::new(Block, "process-timeline", 3000.0, 520.0),
        LayoutEntry::new(Section, "#portfolio", 3900.0, 1200.0),
        LayoutEntry::new(Block, "portfolio-grid", 4000.0, 900.0),
        LayoutEntry::new(Section, "#contact", 5100.0, 800.0),
        LayoutEntry::new(Block, "contact-form", 5200.0, 500.0),
    ]
}

/// Defaults, then `page_sim.toml` (or an explicit file), then `PAGE_SIM__*`
/// environment overrides.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match explicit {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings '{}'", path.display()))?;
            parse_settings(&raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?
        }
        None => match fs::read_to_string(DEFAULT_SETTINGS_FILE) {
            Ok(raw) => parse_settings(&raw)
                .with_context(|| format!("invalid settings file '{DEFAULT_SETTINGS_FILE}'"))?,
            Err(_) => Settings::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PAGE_SIM__VIEWPORT_WIDTH").and_then(|v| v.parse().ok()) {
        settings.viewport_width = v;
    }
    if let Some(v) = lookup("PAGE_SIM__VIEWPORT_HEIGHT").and_then(|v| v.parse().ok()) {
        settings.viewport_height = v;
    }
    if let Some(v) = lookup("PAGE_SIM__REDUCED_MOTION").and_then(|v| parse_flag(&v)) {
        settings.reduced_motion = v;
    }
    if let Some(v) = lookup("PAGE_SIM__OBSERVER_AVAILABLE").and_then(|v| parse_flag(&v)) {
        settings.observer_available = v;
    }
    if let Some(v) = lookup("PAGE_SIM__HIDE_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.page.overlay_hide_delay_ms = v;
    }
    if let Some(v) = lookup("PAGE_SIM__STEPS_FILE") {
        settings.steps_file = Some(PathBuf::from(v));
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct StepsFile {
    steps: Vec<StepRecord>,
}

pub fn load_steps(path: Option<&Path>) -> anyhow::Result<StepCatalog> {
    let records = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read steps '{}'", path.display()))?;
            toml::from_str::<StepsFile>(&raw)
                .with_context(|| format!("invalid steps file '{}'", path.display()))?
                .steps
        }
        None => default_step_records(),
    };
    Ok(StepCatalog::from_records(records)?)
}
