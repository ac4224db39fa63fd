use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, RfErr>;

/// All errors that can occur while computing or exporting receptive fields.
#[derive(Debug)]
pub enum RfErr {
    /// Kernel or stride is zero, or a config file holds a negative value.
    InvalidLayerSpec { layer: String, reason: String },
    /// The same layer name was supplied twice.
    DuplicateLayerName(String),
    /// `calculate` was invoked with an input size of zero.
    InvalidInputSize(usize),
    /// The kernel doesn't fit in the padded input of this layer.
    DegenerateOutputSize {
        layer: String,
        input_size: usize,
        kernel: usize,
        stride: usize,
        padding: usize,
    },
    /// The padded input, the receptive field or the stride product doesn't fit in a
    /// `usize`.
    Overflow { layer: String },
    /// The records were requested before a successful `calculate`.
    NotCalculated,
    /// The destination of an export couldn't be created or written.
    Path { path: PathBuf, source: io::Error },
    /// A layer file couldn't be parsed.
    InvalidConfig(String),
}

impl Display for RfErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayerSpec { layer, reason } => {
                write!(f, "invalid layer spec for {layer}: {reason}")
            }
            Self::DuplicateLayerName(name) => write!(f, "duplicate layer name: {name}"),
            Self::InvalidInputSize(size) => {
                write!(f, "input size must be positive, got {size}")
            }
            Self::DegenerateOutputSize {
                layer,
                input_size,
                kernel,
                stride,
                padding,
            } => write!(
                f,
                "layer {layer} produces an empty output: input {input_size}, \
                 kernel {kernel}, stride {stride}, padding {padding}"
            ),
            Self::Overflow { layer } => write!(f, "arithmetic overflow at layer {layer}"),
            Self::NotCalculated => {
                f.write_str("no receptive fields computed yet, call `calculate` first")
            }
            Self::Path { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for RfErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Path { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RfErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_message_does_not_blame_a_single_quantity() {
        let msg = RfErr::Overflow {
            layer: "conv1".into(),
        }
        .to_string();
        assert_eq!(msg, "arithmetic overflow at layer conv1");
    }

    #[test]
    fn path_error_exposes_its_source() {
        let err = RfErr::Path {
            path: PathBuf::from("out/table.md"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("cannot write out/table.md"));
    }
}
