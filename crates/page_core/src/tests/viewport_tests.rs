use shared::domain::{BlockId, SectionId};

use super::*;
use crate::observe::{MarginLength, RootMargin};

fn section(id: &str) -> TargetId {
    TargetId::Section(SectionId::from(id))
}

fn block(id: &str) -> TargetId {
    TargetId::Block(BlockId::from(id))
}

fn metrics(scroll_y: f64) -> ViewportMetrics {
    ViewportMetrics {
        scroll_y,
        width: 1280.0,
        height: 1000.0,
    }
}

fn model(scroll_y: f64) -> ViewportModel {
    ViewportModel::new(
        [
            (section("#about"), Rect::new(800.0, 1000.0)),
            (section("#services"), Rect::new(1800.0, 1000.0)),
            (block("about-copy"), Rect::new(900.0, 400.0)),
            (block("services-grid"), Rect::new(2000.0, 600.0)),
        ],
        metrics(scroll_y),
    )
}

fn plain(thresholds: Vec<f64>) -> ObserveOptions {
    ObserveOptions::new(thresholds, RootMargin::default())
}

#[test]
fn subscribe_reports_initial_state_for_every_target() {
    let mut viewport = model(0.0);
    let sub = viewport
        .subscribe(&[block("about-copy"), block("services-grid")], plain(vec![0.12]))
        .expect("subscribe");

    let deliveries = viewport.take_deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].subscription, sub);
    let entries = &deliveries[0].entries;
    assert_eq!(entries.len(), 2);
    // about-copy spans 900..1300, the viewport 0..1000.
    assert!(entries[0].is_intersecting);
    assert!((entries[0].ratio - 0.25).abs() < 1e-9);
    assert!(!entries[1].is_intersecting);
}

#[test]
fn only_threshold_crossings_are_reported() {
    let mut viewport = model(0.0);
    viewport
        .subscribe(&[section("#about")], plain(vec![0.2, 0.5]))
        .expect("subscribe");
    viewport.take_deliveries();

    // 20% visible -> 25%: same bucket, no entry.
    viewport.viewport_changed(metrics(50.0));
    assert!(viewport.take_deliveries().is_empty());

    // 55% visible crosses 0.5.
    viewport.viewport_changed(metrics(350.0));
    let deliveries = viewport.take_deliveries();
    assert_eq!(deliveries.len(), 1);
    assert!((deliveries[0].entries[0].ratio - 0.55).abs() < 1e-9);
}

#[test]
fn negative_bottom_margin_shrinks_the_root() {
    let viewport = model(0.0);
    let options = ObserveOptions::new(
        vec![0.0],
        RootMargin {
            top: MarginLength::Px(0.0),
            bottom: MarginLength::Percent(-55.0),
        },
    );
    // Root is 0..450, #about starts at 800.
    assert_eq!(viewport.measure(&section("#about"), &options), (false, 0.0));

    let plain_options = plain(vec![0.0]);
    let (visible, ratio) = viewport.measure(&section("#about"), &plain_options);
    assert!(visible);
    assert!((ratio - 0.2).abs() < 1e-9);
}

#[test]
fn unobserved_targets_stop_reporting() {
    let mut viewport = model(0.0);
    let sub = viewport
        .subscribe(&[block("services-grid")], plain(vec![0.12]))
        .expect("subscribe");
    viewport.take_deliveries();

    viewport.unobserve(sub, &block("services-grid"));
    assert!(!viewport.is_observing(sub, &block("services-grid")));

    viewport.viewport_changed(metrics(1800.0));
    assert!(viewport.take_deliveries().is_empty());
}

#[test]
fn unknown_targets_never_intersect() {
    let mut viewport = model(0.0);
    viewport
        .subscribe(&[block("ghost")], plain(vec![0.0]))
        .expect("subscribe");
    let deliveries = viewport.take_deliveries();
    assert_eq!(deliveries[0].entries[0], IntersectionEntry::new(block("ghost"), false, 0.0));
    assert_eq!(viewport.document_height(), 2800.0);
}
