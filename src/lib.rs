mod encoder;
mod error;
mod midi_exporter;
mod model;
mod presets;
mod util;
mod writer;

pub use encoder::Encode;
pub use encoder::chunk::*;
pub use encoder::delta::*;
pub use encoder::vlq::*;
pub use error::*;
pub use midi_exporter::*;
pub use model::config::*;
pub use model::document::*;
pub use model::event::*;
pub use model::mappings::*;
pub use model::song::*;
pub use model::track::*;
pub use presets::*;
pub use util::*;
pub use writer::*;
