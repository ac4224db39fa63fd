mod record;
mod spec;

pub use record::LayerRecord;
pub use spec::LayerSpec;
