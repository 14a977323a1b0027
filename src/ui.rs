pub mod painter_surface;
pub mod toolbar;
pub mod wave_panel;

pub use painter_surface::PainterSurface;
pub use toolbar::ToolbarAction;
pub use wave_panel::{WaveAction, WavePanel};
