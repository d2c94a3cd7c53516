//! Audio output for the fly shaker: a small mixer-style backend trait, a
//! cpal implementation, a silent timed implementation, and the playback
//! driver that renders a template for a bounded time.

pub mod backend;
pub mod device;
pub mod error;
mod mixer;
pub mod playback;
pub mod silent;

pub use backend::{AudioBackend, OutputConfig};
pub use device::{output_device_names, CpalBackend};
pub use error::{AudioError, AudioResult};
pub use playback::{Fades, PlaybackDriver};
pub use silent::{BackendEvent, PlaybackLog, SilentBackend};
