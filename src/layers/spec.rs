use std::num::NonZeroUsize;

use crate::{Result, RfErr};

/// The spatial parameters of a single convolution or pooling layer.
///
/// Kernel and stride are always positive, so a `LayerSpec` can never feed a
/// division by zero into the output size formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSpec {
    kernel: NonZeroUsize,
    stride: NonZeroUsize,
    padding: usize,
}

impl LayerSpec {
    /// Creates a new `LayerSpec`.
    ///
    /// # Arguments
    /// * `kernel` - The kernel size, must be greater than 0.
    /// * `stride` - The stride, must be greater than 0.
    /// * `padding` - The padding added to both sides of the input.
    ///
    /// # Returns
    /// The spec or `None` if the kernel or the stride is zero.
    pub fn new(kernel: usize, stride: usize, padding: usize) -> Option<Self> {
        Some(Self {
            kernel: NonZeroUsize::new(kernel)?,
            stride: NonZeroUsize::new(stride)?,
            padding,
        })
    }

    /// Same as [`LayerSpec::new`] but reports which layer was rejected and why.
    ///
    /// # Errors
    /// `RfErr::InvalidLayerSpec` if the kernel or the stride is zero.
    pub fn named(layer: &str, (kernel, stride, padding): (usize, usize, usize)) -> Result<Self> {
        Self::new(kernel, stride, padding).ok_or_else(|| {
            let field = if kernel == 0 { "kernel" } else { "stride" };
            RfErr::InvalidLayerSpec {
                layer: layer.to_string(),
                reason: format!("{field} must be positive, got 0"),
            }
        })
    }

    pub fn kernel(&self) -> usize {
        self.kernel.get()
    }

    pub fn stride(&self) -> usize {
        self.stride.get()
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Computes `floor((input_size + 2*padding - kernel) / stride) + 1` for `layer`.
    ///
    /// # Errors
    /// `RfErr::Overflow` if the padded input doesn't fit in a `usize` and
    /// `RfErr::DegenerateOutputSize` if the kernel doesn't fit in the padded input
    /// (the formula would yield a non positive size).
    pub fn output_size(&self, layer: &str, input_size: usize) -> Result<usize> {
        let padded = self
            .padding
            .checked_mul(2)
            .and_then(|padding| padding.checked_add(input_size))
            .ok_or_else(|| RfErr::Overflow {
                layer: layer.to_string(),
            })?;

        let span = padded
            .checked_sub(self.kernel())
            .ok_or_else(|| RfErr::DegenerateOutputSize {
                layer: layer.to_string(),
                input_size,
                kernel: self.kernel(),
                stride: self.stride(),
                padding: self.padding,
            })?;

        Ok(span / self.stride() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_kernel_or_stride_is_rejected() {
        assert!(LayerSpec::new(0, 1, 0).is_none());
        assert!(LayerSpec::new(3, 0, 1).is_none());
        assert!(LayerSpec::new(1, 1, 0).is_some());
    }

    #[test]
    fn named_reports_the_offending_field() {
        let err = LayerSpec::named("conv1", (3, 0, 1)).unwrap_err();
        match err {
            RfErr::InvalidLayerSpec { layer, reason } => {
                assert_eq!(layer, "conv1");
                assert!(reason.contains("stride"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn output_size_matches_conv_formula() {
        let same = LayerSpec::new(3, 1, 1).unwrap();
        assert_eq!(same.output_size("same", 224).unwrap(), 224);

        let pool = LayerSpec::new(2, 2, 0).unwrap();
        assert_eq!(pool.output_size("pool", 224).unwrap(), 112);
        assert_eq!(pool.output_size("pool", 7).unwrap(), 3);

        let stem = LayerSpec::new(7, 2, 3).unwrap();
        assert_eq!(stem.output_size("stem", 224).unwrap(), 112);
    }

    #[test]
    fn output_size_is_degenerate_when_kernel_does_not_fit() {
        let spec = LayerSpec::new(5, 1, 0).unwrap();
        assert!(matches!(
            spec.output_size("conv", 4),
            Err(RfErr::DegenerateOutputSize { input_size: 4, .. })
        ));
        assert_eq!(spec.output_size("conv", 5).unwrap(), 1);

        let padded = LayerSpec::new(5, 1, 1).unwrap();
        assert_eq!(padded.output_size("conv", 3).unwrap(), 1);
    }

    #[test]
    fn output_size_overflow_is_not_degenerate() {
        let huge_padding = LayerSpec::new(3, 1, usize::MAX / 2 + 1).unwrap();
        assert!(matches!(
            huge_padding.output_size("conv", 4),
            Err(RfErr::Overflow { ref layer }) if layer == "conv"
        ));

        let same = LayerSpec::new(3, 1, 1).unwrap();
        assert!(matches!(
            same.output_size("conv", usize::MAX),
            Err(RfErr::Overflow { .. })
        ));

        let unpadded = LayerSpec::new(3, 1, 0).unwrap();
        assert_eq!(unpadded.output_size("conv", usize::MAX).unwrap(), usize::MAX - 2);
    }
}
