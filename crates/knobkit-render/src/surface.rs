//! Visible surfaces that finished frames are blitted onto.

use crate::frame::OffscreenBuffer;
use crate::renderer::RenderResult;

/// Something a finished frame can be copied onto in one operation.
pub trait Surface {
    fn blit(&mut self, frame: &OffscreenBuffer) -> RenderResult<()>;
}

/// Keeps the last blitted frame. Useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    last: Option<OffscreenBuffer>,
    blits: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&OffscreenBuffer> {
        self.last.as_ref()
    }

    /// Number of blits received.
    pub fn blit_count(&self) -> usize {
        self.blits
    }
}

impl Surface for RecordingSurface {
    fn blit(&mut self, frame: &OffscreenBuffer) -> RenderResult<()> {
        self.last = Some(frame.clone());
        self.blits += 1;
        Ok(())
    }
}
