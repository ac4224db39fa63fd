use std::{collections::HashSet, path::Path};

use log::debug;

use crate::{
    Result, RfErr,
    layers::{LayerRecord, LayerSpec},
    table::Table,
};

/// The input size used when the caller doesn't have a specific one in mind.
pub const DEFAULT_INPUT_SIZE: usize = 224;

/// Computes per layer input size, output size and cumulative receptive field for a
/// sequence of convolution or pooling layers.
///
/// The layers are fixed at construction, the records are recomputed from scratch on
/// every call to [`ReceptiveFieldCalculator::calculate`].
#[derive(Debug, Clone)]
pub struct ReceptiveFieldCalculator {
    layers: Vec<(String, LayerSpec)>,
    records: Option<Vec<LayerRecord>>,
}

impl ReceptiveFieldCalculator {
    /// Creates a new `ReceptiveFieldCalculator` from named layers, traversed in the
    /// order they are given.
    ///
    /// # Arguments
    /// * `layers` - Pairs of layer name and `(kernel, stride, padding)`.
    ///
    /// # Errors
    /// `RfErr::InvalidLayerSpec` for a zero kernel or stride and
    /// `RfErr::DuplicateLayerName` if a name shows up twice.
    pub fn from_named_layers<I, S>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, (usize, usize, usize))>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let layers = layers
            .into_iter()
            .map(|(name, params)| {
                let name = name.into();
                if !seen.insert(name.clone()) {
                    return Err(RfErr::DuplicateLayerName(name));
                }

                let spec = LayerSpec::named(&name, params)?;
                Ok((name, spec))
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            layers,
            records: None,
        })
    }

    /// Creates a new `ReceptiveFieldCalculator` from unnamed layers, which are named
    /// `layer_0, layer_1, ...` by position.
    ///
    /// # Arguments
    /// * `layers` - The `(kernel, stride, padding)` of every layer.
    ///
    /// # Errors
    /// `RfErr::InvalidLayerSpec` for a zero kernel or stride.
    pub fn from_ordered_layers<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, usize)>,
    {
        Self::from_named_layers(
            layers
                .into_iter()
                .enumerate()
                .map(|(i, params)| (format!("layer_{i}"), params)),
        )
    }

    /// The layers in traversal order.
    pub fn layers(&self) -> &[(String, LayerSpec)] {
        &self.layers
    }

    /// Propagates `input_size` through every layer, replacing any previous result.
    ///
    /// # Arguments
    /// * `input_size` - The spatial size of the original input.
    ///
    /// # Errors
    /// `RfErr::InvalidInputSize` for a zero input, `RfErr::DegenerateOutputSize` if
    /// some kernel doesn't fit in its padded input and `RfErr::Overflow` if the padded
    /// input, the receptive field or the stride product grows past `usize::MAX`. On
    /// error no result is kept.
    pub fn calculate(&mut self, input_size: usize) -> Result<()> {
        self.records = None;

        if input_size == 0 {
            return Err(RfErr::InvalidInputSize(input_size));
        }

        let mut records = Vec::with_capacity(self.layers.len());
        let mut size = input_size;
        let mut rf = 1usize;
        let mut s_prod = 1usize;

        for (name, spec) in &self.layers {
            let output_size = spec.output_size(name, size)?;

            let overflow = || RfErr::Overflow {
                layer: name.clone(),
            };
            rf = (spec.kernel() - 1)
                .checked_mul(s_prod)
                .and_then(|grow| rf.checked_add(grow))
                .ok_or_else(overflow)?;
            s_prod = s_prod.checked_mul(spec.stride()).ok_or_else(overflow)?;

            debug!("{name}: {size} -> {output_size}, receptive field {rf}");
            records.push(LayerRecord {
                name: name.clone(),
                kernel: spec.kernel(),
                stride: spec.stride(),
                padding: spec.padding(),
                input_size: size,
                output_size,
                receptive_field: rf,
            });

            size = output_size;
        }

        self.records = Some(records);
        Ok(())
    }

    /// The records of the last successful calculation.
    ///
    /// # Errors
    /// `RfErr::NotCalculated` if `calculate` hasn't succeeded yet.
    pub fn records(&self) -> Result<&[LayerRecord]> {
        self.records.as_deref().ok_or(RfErr::NotCalculated)
    }

    /// Renders the last result as a markdown table.
    ///
    /// # Errors
    /// `RfErr::NotCalculated` if `calculate` hasn't succeeded yet.
    pub fn markdown(&self) -> Result<String> {
        Ok(Table::new(self.records()?).render())
    }

    /// Prints the markdown table to stdout followed by an empty line.
    ///
    /// # Errors
    /// `RfErr::NotCalculated` if `calculate` hasn't succeeded yet.
    pub fn show_layers(&self) -> Result<()> {
        println!("{}\n", self.markdown()?);
        Ok(())
    }

    /// Writes the markdown table to `path`, creating missing parent directories and
    /// overwriting whatever was there.
    ///
    /// # Errors
    /// `RfErr::NotCalculated` if `calculate` hasn't succeeded yet or `RfErr::Path` if
    /// the file couldn't be written.
    pub fn to_markdown<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Table::new(self.records()?).write_to(path)
    }
}
