//! Headless controller for a single scrolling landing page: active-section
//! tracking, one-shot reveal of content blocks, the process-timeline
//! disclosure overlay and the progress indicators that go with them.

pub mod config;
pub mod deferred;
pub mod disclosure;
pub mod observe;
pub mod page;
pub mod progress;
pub mod reveal;
pub mod scroll;
pub mod surface;
pub mod tracker;
pub mod viewport;

pub use config::PageConfig;
pub use deferred::{DeferredQueue, TaskToken};
pub use disclosure::{DisclosureState, KeyOutcome, StepDisclosure, Transition};
pub use observe::{
    Delivery, IntersectionSource, MarginLength, ObserveOptions, RootMargin, ScriptedSource,
    SubscriptionId, Unavailable, ViewportMetrics,
};
pub use page::{Environment, EventOutcome, PageController, PageSnapshot, PageTargets};
pub use progress::{map_progress, page_scroll_progress, step_progress, ProgressStyles, ProgressValue};
pub use reveal::RevealScheduler;
pub use scroll::{FrameThrottle, ScrollEffects, ScrollFrame};
pub use surface::{PageSurface, RecordingSurface, SurfaceError};
pub use tracker::VisibilityTracker;
pub use viewport::{Rect, ViewportModel};
