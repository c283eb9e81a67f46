//! Render surface for the simulator: records state like the test surface and
//! traces every write so a replay reads like a DOM mutation log.

use page_core::{PageSurface, ProgressStyles, RecordingSurface, SurfaceError};
use shared::{
    domain::{BlockId, ControlId, SectionId, Step},
    error::Collaborator,
};
use tracing::info;

pub struct TraceSurface {
    inner: RecordingSurface,
}

impl TraceSurface {
    pub fn new(inner: RecordingSurface) -> Self {
        Self { inner }
    }

    pub fn recorded(&self) -> &RecordingSurface {
        &self.inner
    }
}

impl PageSurface for TraceSurface {
    fn has(&self, collaborator: Collaborator) -> bool {
        self.inner.has(collaborator)
    }

    fn set_nav_current(&mut self, section: &SectionId, current: bool) -> Result<(), SurfaceError> {
        self.inner.set_nav_current(section, current)?;
        if current {
            info!(section = section.as_str(), "aria-current=page");
        }
        Ok(())
    }

    fn reveal_block(&mut self, block: &BlockId, animate: bool) -> Result<(), SurfaceError> {
        self.inner.reveal_block(block, animate)?;
        info!(block = block.as_str(), animate, "is-visible");
        Ok(())
    }

    fn set_topbar_scrolled(&mut self, scrolled: bool) -> Result<(), SurfaceError> {
        if self.inner.topbar_scrolled != scrolled {
            info!(scrolled, "topbar is-scrolled");
        }
        self.inner.set_topbar_scrolled(scrolled)
    }

    fn set_scroll_progress(&mut self, styles: &ProgressStyles) -> Result<(), SurfaceError> {
        tracing::debug!(width = %styles.width, "scroll progress");
        self.inner.set_scroll_progress(styles)
    }

    fn set_parallax_offset(&mut self, offset_px: f64) -> Result<(), SurfaceError> {
        tracing::debug!(offset_px, "scene translate3d");
        self.inner.set_parallax_offset(offset_px)
    }

    fn set_timeline_dimmed(&mut self, dimmed: bool) -> Result<(), SurfaceError> {
        self.inner.set_timeline_dimmed(dimmed)?;
        info!(dimmed, "timeline is-dimmed");
        Ok(())
    }

    fn set_trigger_selected(&mut self, index: usize, selected: bool) -> Result<(), SurfaceError> {
        self.inner.set_trigger_selected(index, selected)?;
        if selected {
            info!(index, "aria-expanded=true");
        }
        Ok(())
    }

    fn set_step_progress(&mut self, styles: &ProgressStyles) -> Result<(), SurfaceError> {
        self.inner.set_step_progress(styles)?;
        info!(width = %styles.width, height = %styles.height, "timeline progress");
        Ok(())
    }

    fn render_step(&mut self, step: &Step) -> Result<(), SurfaceError> {
        self.inner.render_step(step)?;
        info!(
            label = %step.label,
            title = %step.title,
            bullets = step.bullets.len(),
            deliverables = step.deliverables.len(),
            "overlay content"
        );
        Ok(())
    }

    fn set_overlay_open(&mut self, open: bool) -> Result<(), SurfaceError> {
        self.inner.set_overlay_open(open)?;
        info!(open, "overlay is-open");
        Ok(())
    }

    fn set_overlay_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.inner.set_overlay_visible(visible)?;
        info!(hidden = !visible, "overlay hidden");
        Ok(())
    }

    fn announce(&mut self, message: &str) -> Result<(), SurfaceError> {
        self.inner.announce(message)?;
        info!(text = message, "live region");
        Ok(())
    }

    fn focused_control(&self) -> Option<ControlId> {
        self.inner.focused_control()
    }

    fn focus(&mut self, control: &ControlId) -> Result<(), SurfaceError> {
        self.inner.focus(control)?;
        info!(control = control.as_str(), "focus");
        Ok(())
    }
}
