//! Presentation layer
//!
//! Presenters pull a `Snapshot` each frame. Attaching a surface is the only
//! fallible step and happens before the simulation starts.

pub mod text;

pub use text::TextPresenter;

use crate::error::SurfaceError;
use crate::sim::Snapshot;

/// A frame sink the runner draws into
pub trait Presenter {
    /// Bind to an output surface sized for a `columns` x `rows` grid
    fn attach(&mut self, columns: usize, rows: usize) -> Result<(), SurfaceError>;

    /// Draw one frame
    fn present(&mut self, snapshot: &Snapshot);

    /// Release the surface; no frames are presented afterwards
    fn detach(&mut self) {}
}
