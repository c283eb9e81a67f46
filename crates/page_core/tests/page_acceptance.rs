use page_core::{
    Environment, PageConfig, PageController, PageTargets, RecordingSurface, Rect, ViewportMetrics,
    ViewportModel,
};
use shared::{
    domain::{BlockId, SectionId, StepCatalog, TargetId},
    protocol::{ControlTarget, Key, PageEvent},
};

const VIEWPORT_HEIGHT: f64 = 1000.0;

fn section(id: &str) -> TargetId {
    TargetId::Section(SectionId::from(id))
}

fn block(id: &str) -> TargetId {
    TargetId::Block(BlockId::from(id))
}

fn landing_page(width: f64) -> PageController<ViewportModel, RecordingSurface> {
    let metrics = ViewportMetrics {
        scroll_y: 0.0,
        width,
        height: VIEWPORT_HEIGHT,
    };
    let viewport = ViewportModel::new(
        [
            (section("#about"), Rect::new(1000.0, 1000.0)),
            (section("#services"), Rect::new(2000.0, 1000.0)),
            (section("#process"), Rect::new(3000.0, 1000.0)),
            (section("#portfolio"), Rect::new(4000.0, 1000.0)),
            (section("#contact"), Rect::new(5000.0, 600.0)),
            (block("about-copy"), Rect::new(1100.0, 400.0)),
            (block("process-steps"), Rect::new(3200.0, 600.0)),
        ],
        metrics,
    );
    let env = Environment {
        reduced_motion: false,
        viewport: metrics,
        document_height: viewport.document_height(),
        header_height: 64.0,
    };
    PageController::start(
        PageConfig::default(),
        env,
        PageTargets {
            sections: PageConfig::default().sections,
            reveal_blocks: vec![BlockId::from("about-copy"), BlockId::from("process-steps")],
            steps: StepCatalog::default(),
        },
        viewport,
        RecordingSurface::new().with_focus("process-card-3"),
    )
}

fn scroll_to(page: &mut PageController<ViewportModel, RecordingSurface>, y: f64) {
    page.handle(PageEvent::Scroll { y });
    page.handle(PageEvent::AnimationFrame);
}

#[test]
fn scrolling_tracks_sections_and_reveals_blocks_once() {
    let mut page = landing_page(1280.0);
    assert_eq!(page.snapshot().active_section, None);
    assert!(page.surface().revealed.is_empty());

    scroll_to(&mut page, 1000.0);
    let snapshot = page.snapshot();
    assert_eq!(snapshot.active_section, Some(SectionId::from("#about")));
    assert_eq!(snapshot.revealed, vec![BlockId::from("about-copy")]);
    assert!(page.surface().topbar_scrolled);

    scroll_to(&mut page, 2900.0);
    assert_eq!(page.snapshot().active_section, Some(SectionId::from("#process")));
    assert_eq!(page.snapshot().revealed.len(), 2);

    // Back at the top nothing intersects: the last section stays current.
    scroll_to(&mut page, 0.0);
    assert_eq!(page.snapshot().active_section, Some(SectionId::from("#process")));
    assert_eq!(page.surface().nav_current.len(), 1);

    scroll_to(&mut page, 3000.0);
    assert_eq!(
        page.surface().revealed,
        vec![
            (BlockId::from("about-copy"), true),
            (BlockId::from("process-steps"), true)
        ]
    );
}

#[test]
fn narrow_viewport_timeline_walkthrough() {
    let mut page = landing_page(800.0);

    page.handle(PageEvent::KeyDown {
        key: Key::Enter,
        target: Some(ControlTarget::StepTrigger { index: 3 }),
    });
    let progress = page.surface().step_progress.clone().expect("progress");
    assert_eq!(progress.height, "100%");
    assert_eq!(progress.width, "2px");
    assert_eq!(
        page.surface().last_announcement(),
        Some("Launch opened. Press Escape to close.")
    );

    page.handle(PageEvent::Click {
        target: ControlTarget::CloseRegion,
    });
    page.handle(PageEvent::Advance { ms: 100 });
    page.handle(PageEvent::Click {
        target: ControlTarget::StepTrigger { index: 0 },
    });
    page.handle(PageEvent::Advance { ms: 300 });
    assert!(page.surface().overlay_visible);
    assert_eq!(page.surface().selected_triggers(), vec![0]);

    page.handle(PageEvent::KeyDown {
        key: Key::Escape,
        target: None,
    });
    page.handle(PageEvent::Advance { ms: 220 });
    assert!(!page.surface().overlay_visible);
    assert_eq!(page.snapshot().active_step, None);
    assert_eq!(page.snapshot().clock_ms, 620);
}
