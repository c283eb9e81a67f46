use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use page_core::{
    Environment, IntersectionSource, PageController, PageSnapshot, PageTargets,
    RecordingSurface, Unavailable, ViewportMetrics, ViewportModel,
};
use shared::protocol::PageEvent;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod script;
mod settings;
mod trace_surface;

use settings::{load_settings, load_steps, Settings};
use trace_surface::TraceSurface;

/// Replays a JSON event script against the landing page controller and
/// prints the final page snapshot.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    steps: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    reduced_motion: bool,
    /// Simulate a browser without intersection observation.
    #[arg(long)]
    no_observer: bool,
    /// Sleep through `advance` events instead of only moving the page clock.
    #[arg(long)]
    realtime: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(width) = args.width {
        settings.viewport_width = width;
    }
    settings.reduced_motion |= args.reduced_motion;
    settings.observer_available &= !args.no_observer;

    let steps_path = args.steps.clone().or_else(|| settings.steps_file.clone());
    let steps = load_steps(steps_path.as_deref())?;
    let events = script::load_script(&args.script)?;

    let viewport = ViewportModel::new(
        settings.layout.iter().map(|entry| (entry.target(), entry.rect())),
        ViewportMetrics {
            scroll_y: 0.0,
            width: settings.viewport_width,
            height: settings.viewport_height,
        },
    );
    let env = Environment {
        reduced_motion: settings.reduced_motion,
        viewport: viewport.metrics(),
        document_height: viewport.document_height(),
        header_height: settings.header_height,
    };
    let targets = PageTargets {
        sections: settings.page.sections.clone(),
        reveal_blocks: settings.blocks(),
        steps,
    };

    let snapshot = if settings.observer_available {
        replay(&settings, env, targets, viewport, events, args.realtime).await
    } else {
        replay(&settings, env, targets, Unavailable, events, args.realtime).await
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn replay<S: IntersectionSource>(
    settings: &Settings,
    env: Environment,
    targets: PageTargets,
    source: S,
    events: Vec<PageEvent>,
    realtime: bool,
) -> PageSnapshot {
    let surface = TraceSurface::new(RecordingSurface::new());
    let mut page = PageController::start(settings.page.clone(), env, targets, source, surface);

    for event in events {
        if let (true, PageEvent::Advance { ms }) = (realtime, &event) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        let outcome = page.handle(event);
        tracing::debug!(?outcome, "event handled");
    }

    let recorded = page.surface().recorded();
    info!(
        announcements = recorded.announcements.len(),
        revealed = recorded.revealed.len(),
        "replay finished"
    );
    page.snapshot()
}
