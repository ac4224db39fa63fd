//! Receptive field arithmetic for stacks of convolution and pooling layers.
//!
//! Given each layer's `(kernel, stride, padding)` and the size of the original input,
//! [`ReceptiveFieldCalculator`] walks the layers in order and records the size entering
//! and leaving every layer together with how many input pixels one of its outputs sees.
//! [`Table`] renders those records as a markdown table.

pub mod calculator;
pub mod configs;
pub mod error;
pub mod layers;
pub mod table;

pub use calculator::{DEFAULT_INPUT_SIZE, ReceptiveFieldCalculator};
pub use error::{Result, RfErr};
pub use layers::{LayerRecord, LayerSpec};
pub use table::{HEADERS, Table};
