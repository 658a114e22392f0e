//! Frame output port.

use crate::domain::Frame;
use crate::error::Result;

/// Receives every frame the display loop produces.
pub trait FrameSink: Send {
    /// Short name for log fields.
    fn name(&self) -> &'static str;

    /// Present one frame. An error affects only this frame.
    fn present(&mut self, frame: &Frame) -> Result<()>;
}
