use shared::domain::BlockId;

use super::*;
use crate::{observe::ScriptedSource, surface::RecordingSurface, Unavailable};

fn sections() -> Vec<SectionId> {
    PageConfig::default().sections
}

fn seen(id: &str, ratio: f64) -> IntersectionEntry {
    IntersectionEntry::new(TargetId::Section(SectionId::from(id)), true, ratio)
}

fn gone(id: &str) -> IntersectionEntry {
    IntersectionEntry::new(TargetId::Section(SectionId::from(id)), false, 0.0)
}

fn started() -> (VisibilityTracker, ScriptedSource) {
    let mut source = ScriptedSource::new();
    let options = VisibilityTracker::observe_options(&PageConfig::default(), 64.0);
    let tracker = VisibilityTracker::start(sections(), options, &mut source);
    (tracker, source)
}

#[test]
fn subscribes_with_header_and_bottom_bias() {
    let (tracker, source) = started();
    let sub = tracker.subscription().expect("subscribed");
    let options = source.options(sub).expect("options");

    assert_eq!(options.thresholds, vec![0.2, 0.35, 0.5]);
    assert_eq!(options.root_margin.top, MarginLength::Px(-74.0));
    assert_eq!(options.root_margin.bottom, MarginLength::Percent(-55.0));
    assert_eq!(source.observed(sub).len(), 5);
}

#[test]
fn picks_the_most_visible_intersecting_section() {
    let (mut tracker, _source) = started();
    let mut surface = RecordingSurface::new();

    let changed = tracker.handle_batch(
        &[seen("#about", 0.2), seen("#services", 0.5), gone("#process")],
        &mut surface,
    );

    assert_eq!(changed, Some(SectionId::from("#services")));
    assert_eq!(tracker.active(), Some(&SectionId::from("#services")));
    assert_eq!(
        surface.nav_current.iter().collect::<Vec<_>>(),
        vec![&SectionId::from("#services")]
    );
}

#[test]
fn keeps_previous_section_when_nothing_intersects() {
    let (mut tracker, _source) = started();
    let mut surface = RecordingSurface::new();

    tracker.handle_batch(&[seen("#about", 0.35)], &mut surface);
    let changed = tracker.handle_batch(&[gone("#about"), gone("#services")], &mut surface);

    assert_eq!(changed, None);
    assert_eq!(tracker.active(), Some(&SectionId::from("#about")));
    assert_eq!(surface.nav_current.len(), 1);
}

#[test]
fn marker_moves_so_exactly_one_section_is_current() {
    let (mut tracker, _source) = started();
    let mut surface = RecordingSurface::new();

    for (id, ratio) in [("#about", 0.5), ("#services", 0.35), ("#contact", 0.2)] {
        tracker.handle_batch(&[seen(id, ratio)], &mut surface);
        assert_eq!(surface.nav_current.len(), 1);
        assert!(surface.nav_current.contains(&SectionId::from(id)));
    }
}

#[test]
fn ties_resolve_to_first_entry_in_batch() {
    let entries = [seen("#portfolio", 0.35), seen("#about", 0.35)];
    assert_eq!(
        VisibilityTracker::select(&sections(), &entries),
        Some(&SectionId::from("#portfolio"))
    );
}

#[test]
fn ignores_untracked_targets() {
    let entries = [
        seen("#hero", 0.9),
        IntersectionEntry::new(TargetId::Block(BlockId::from("card")), true, 1.0),
        seen("#contact", 0.2),
    ];
    assert_eq!(
        VisibilityTracker::select(&sections(), &entries),
        Some(&SectionId::from("#contact"))
    );
}

#[test]
fn missing_nav_links_still_track_state() {
    let (mut tracker, _source) = started();
    let mut surface = RecordingSurface::new().without(shared::error::Collaborator::NavigationLinks);

    tracker.handle_batch(&[seen("#process", 0.5)], &mut surface);
    assert_eq!(tracker.active(), Some(&SectionId::from("#process")));
    assert!(surface.nav_current.is_empty());
}

#[test]
fn degrades_without_observer() {
    let options = VisibilityTracker::observe_options(&PageConfig::default(), 0.0);
    let tracker = VisibilityTracker::start(sections(), options, &mut Unavailable);
    assert_eq!(tracker.subscription(), None);
    assert_eq!(tracker.active(), None);
}
