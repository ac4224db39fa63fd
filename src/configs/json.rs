use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Result, RfErr, calculator::ReceptiveFieldCalculator};

/// A layer file: the layers to walk and, optionally, the input size to start from.
#[derive(Debug, Deserialize)]
pub struct LayersFile {
    pub input_size: Option<usize>,
    pub layers: LayersConfig,
}

/// Layers keyed by name, or a plain list named by position.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LayersConfig {
    Named(Map<String, Value>),
    Ordered(Vec<Value>),
}

impl LayersFile {
    /// Builds the calculator described by this file.
    ///
    /// # Errors
    /// `RfErr::InvalidConfig` if a layer isn't a `[kernel, stride, padding]` triple or
    /// a `{kernel, stride, padding}` object, `RfErr::InvalidLayerSpec` for negative or
    /// zero values.
    pub fn into_calculator(self) -> Result<ReceptiveFieldCalculator> {
        match self.layers {
            LayersConfig::Named(layers) => {
                let layers = layers
                    .iter()
                    .map(|(name, layer)| {
                        parse_layer(name, layer).map(|params| (name.clone(), params))
                    })
                    .collect::<Result<Vec<_>>>()?;
                ReceptiveFieldCalculator::from_named_layers(layers)
            }
            LayersConfig::Ordered(layers) => {
                let layers = layers
                    .iter()
                    .enumerate()
                    .map(|(i, layer)| parse_layer(&format!("layer_{i}"), layer))
                    .collect::<Result<Vec<_>>>()?;
                ReceptiveFieldCalculator::from_ordered_layers(layers)
            }
        }
    }
}

/// Parses a layer file from its JSON text.
///
/// # Errors
/// `RfErr::InvalidConfig` if the text isn't a valid layer file.
pub fn parse_layers(content: &str) -> Result<LayersFile> {
    Ok(serde_json::from_str(content)?)
}

/// Loads a layer file from disk.
///
/// # Errors
/// `RfErr::InvalidConfig` if the file can't be read or parsed.
pub fn load_layers<P: AsRef<Path>>(path: P) -> Result<LayersFile> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| RfErr::InvalidConfig(format!("cannot read '{}': {e}", path.display())))?;

    parse_layers(&content)
}

fn parse_layer(name: &str, layer: &Value) -> Result<(usize, usize, usize)> {
    let (kernel, stride, padding) = match layer {
        Value::Array(values) if values.len() == 3 => (&values[0], &values[1], &values[2]),
        Value::Object(fields) => {
            let field = |key: &str| {
                fields
                    .get(key)
                    .ok_or_else(|| RfErr::InvalidConfig(format!("{name}: missing field {key}")))
            };
            (field("kernel")?, field("stride")?, field("padding")?)
        }
        other => {
            return Err(RfErr::InvalidConfig(format!(
                "{name}: expected [kernel, stride, padding], got {other}"
            )));
        }
    };

    Ok((
        parse_param(name, "kernel", kernel)?,
        parse_param(name, "stride", stride)?,
        parse_param(name, "padding", padding)?,
    ))
}

fn parse_param(name: &str, param: &str, value: &Value) -> Result<usize> {
    if let Some(value) = value.as_u64() {
        return usize::try_from(value).map_err(|_| {
            RfErr::InvalidConfig(format!("{name}: {param} {value} is out of range"))
        });
    }

    match value.as_i64() {
        Some(value) => Err(RfErr::InvalidLayerSpec {
            layer: name.to_string(),
            reason: format!("{param} must be non negative, got {value}"),
        }),
        None => Err(RfErr::InvalidConfig(format!(
            "{name}: {param} must be an integer in range"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_layers_keep_file_order() {
        let file = parse_layers(
            r#"{
                "input_size": 64,
                "layers": {
                    "conv2": [3, 1, 1],
                    "conv1": {"kernel": 3, "stride": 1, "padding": 1},
                    "pool": [2, 2, 0]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(file.input_size, Some(64));

        let calc = file.into_calculator().unwrap();
        let names: Vec<_> = calc.layers().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["conv2", "conv1", "pool"]);
    }

    #[test]
    fn ordered_layers_get_positional_names() {
        let file = parse_layers(r#"{"layers": [[3, 1, 1], [2, 2, 0]]}"#).unwrap();
        assert_eq!(file.input_size, None);

        let mut calc = file.into_calculator().unwrap();
        calc.calculate(224).unwrap();
        let records = calc.records().unwrap();
        assert_eq!(records[0].name, "layer_0");
        assert_eq!(records[1].name, "layer_1");
        assert_eq!(records[1].output_size, 112);
    }

    #[test]
    fn negative_padding_is_an_invalid_spec() {
        let file = parse_layers(r#"{"layers": {"conv": [3, 1, -1]}}"#).unwrap();
        let err = file.into_calculator().unwrap_err();
        assert!(matches!(err, RfErr::InvalidLayerSpec { ref layer, .. } if layer == "conv"));
    }

    #[test]
    fn padding_above_i64_max_is_accepted() {
        let file = parse_layers(r#"{"layers": [[3, 1, 9223372036854775808]]}"#).unwrap();
        let calc = file.into_calculator().unwrap();
        assert_eq!(calc.layers()[0].1.padding() as u64, 1 << 63);
    }

    #[test]
    fn zero_stride_is_an_invalid_spec() {
        let file = parse_layers(r#"{"layers": [[3, 0, 1]]}"#).unwrap();
        let err = file.into_calculator().unwrap_err();
        assert!(matches!(err, RfErr::InvalidLayerSpec { ref layer, .. } if layer == "layer_0"));
    }

    #[test]
    fn malformed_layers_are_rejected() {
        let short = parse_layers(r#"{"layers": [[3, 1]]}"#).unwrap();
        assert!(matches!(short.into_calculator(), Err(RfErr::InvalidConfig(_))));

        let missing = parse_layers(r#"{"layers": {"conv": {"kernel": 3}}}"#).unwrap();
        assert!(matches!(missing.into_calculator(), Err(RfErr::InvalidConfig(_))));

        let float = parse_layers(r#"{"layers": [[3.5, 1, 0]]}"#).unwrap();
        assert!(matches!(float.into_calculator(), Err(RfErr::InvalidConfig(_))));

        assert!(matches!(parse_layers("{}"), Err(RfErr::InvalidConfig(_))));
        assert!(matches!(parse_layers("not json"), Err(RfErr::InvalidConfig(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_layers("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RfErr::InvalidConfig(ref msg) if msg.contains("cannot read")));
    }
}
