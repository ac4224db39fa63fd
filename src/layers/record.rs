/// The computed geometry of a single layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    pub name: String,
    pub kernel: usize,
    pub stride: usize,
    pub padding: usize,
    /// Spatial size entering the layer.
    pub input_size: usize,
    /// Spatial size leaving the layer.
    pub output_size: usize,
    /// Number of original input pixels one output unit of this layer sees.
    pub receptive_field: usize,
}

impl LayerRecord {
    /// The number of columns a record renders into.
    pub const COLUMNS: usize = 7;

    /// Renders every field in table column order.
    pub fn cells(&self) -> [String; Self::COLUMNS] {
        [
            self.name.clone(),
            self.kernel.to_string(),
            self.stride.to_string(),
            self.padding.to_string(),
            self.input_size.to_string(),
            self.output_size.to_string(),
            self.receptive_field.to_string(),
        ]
    }
}
