mod json;

pub use json::{LayersConfig, LayersFile, load_layers, parse_layers};
