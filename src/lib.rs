pub mod audio;
pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod render;
pub mod studio;
pub mod transport;
pub mod ui;
pub mod wave;

pub use collection::WaveCollection;
pub use config::StudioConfig;
pub use error::{StudioError, StudioResult};
pub use events::{EventBus, WaveEvent};
pub use studio::Studio;
pub use wave::kind::WaveKind;
pub use wave::{Wave, WaveId};
