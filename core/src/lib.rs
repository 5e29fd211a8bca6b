pub mod brush;
pub mod desktop;
pub mod export;
pub mod geometry;
pub mod pointer;
pub mod surface;
pub mod terminal;

pub use brush::{BrushParams, Compositing, Rgb, ToolMode, ToolState};
pub use export::{export_file_name, ExportError};
pub use geometry::{Point, ScreenRect, Viewport};
pub use pointer::PointerInput;
pub use surface::{DirtyRect, DrawingSurface, ResizeOutcome, Segment};
pub use terminal::{CommandOutput, Effect, Line, Session};
