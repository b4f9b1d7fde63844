//! Axis order conventions.
//!
//! An [`AxisOrder`] knows where the logical batch, height, width and depth
//! (or batch, time and feature) dimensions live in a concrete shape. Shape
//! inference goes through it instead of indexing shapes directly, so that
//! the same op works for NHWC-style and NCHW-style graphs.
use crate::errors::{ShapeError, ShapeResult};
use crate::internal::*;
use std::fmt;
use std::str::FromStr;

/// Layout tag attached to every IR buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AxisFormat {
    /// batch, spatial..., channel
    Nsc,
    /// batch, channel, spatial...
    Ncs,
    /// batch, time, feature
    Btf,
    /// time, batch, feature
    Tbf,
    Feature,
    NonTrivial,
    Any,
}

impl fmt::Display for AxisFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AxisFormat::Nsc => "NSC",
            AxisFormat::Ncs => "NCS",
            AxisFormat::Btf => "BTF",
            AxisFormat::Tbf => "TBF",
            AxisFormat::Feature => "FEATURE",
            AxisFormat::NonTrivial => "NONTRIVIAL",
            AxisFormat::Any => "ANY",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, new)]
pub struct SpatialDims {
    pub batch: usize,
    pub height: usize,
    pub width: usize,
    pub depth: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, new)]
pub struct TimeSeriesDims {
    pub batch: usize,
    pub time_steps: usize,
    pub feature: usize,
}

/// Axis ordering convention of a graph.
///
/// Stateless: one value per convention, freely copied and shared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum AxisOrder {
    /// TensorFlow: NHWC spatial tensors, batch-major time series.
    #[default]
    Tf,
    /// Caffe: NCHW spatial tensors, time-major time series.
    Caffe,
    /// ONNX: NCHW spatial tensors, time-major time series, recurrent
    /// states carry a leading direction axis.
    Onnx,
}

impl AxisOrder {
    pub const ALL: [AxisOrder; 3] = [AxisOrder::Tf, AxisOrder::Caffe, AxisOrder::Onnx];

    pub fn spatial_format(&self) -> AxisFormat {
        match self {
            AxisOrder::Tf => AxisFormat::Nsc,
            AxisOrder::Caffe | AxisOrder::Onnx => AxisFormat::Ncs,
        }
    }

    pub fn time_series_format(&self) -> AxisFormat {
        match self {
            AxisOrder::Tf => AxisFormat::Btf,
            AxisOrder::Caffe | AxisOrder::Onnx => AxisFormat::Tbf,
        }
    }

    #[inline]
    pub fn is_onnx(&self) -> bool {
        *self == AxisOrder::Onnx
    }

    /// Default layout tag for a buffer of the given rank.
    pub fn axis_format_for_rank(&self, rank: usize) -> AxisFormat {
        match rank {
            4 => self.spatial_format(),
            3 => self.time_series_format(),
            2 => AxisFormat::Feature,
            _ => AxisFormat::NonTrivial,
        }
    }

    pub fn extract_spatial_dims(&self, shape: &[usize]) -> ShapeResult<SpatialDims> {
        let &[a, b, c, d] = shape else {
            return Err(rank_error("spatial", 4, shape));
        };
        Ok(match self.spatial_format() {
            AxisFormat::Nsc => SpatialDims::new(a, b, c, d),
            _ => SpatialDims::new(a, c, d, b),
        })
    }

    pub fn format_spatial_output_shape(&self, dims: SpatialDims) -> Shape {
        let SpatialDims { batch, height, width, depth } = dims;
        match self.spatial_format() {
            AxisFormat::Nsc => tvec![batch, height, width, depth],
            _ => tvec![batch, depth, height, width],
        }
    }

    pub fn extract_time_series_dims(&self, shape: &[usize]) -> ShapeResult<TimeSeriesDims> {
        let &[a, b, c] = shape else {
            return Err(rank_error("time series", 3, shape));
        };
        Ok(match self.time_series_format() {
            AxisFormat::Btf => TimeSeriesDims::new(a, b, c),
            _ => TimeSeriesDims::new(b, a, c),
        })
    }

    pub fn format_time_series_output_shape(&self, dims: TimeSeriesDims) -> Shape {
        let TimeSeriesDims { batch, time_steps, feature } = dims;
        match self.time_series_format() {
            AxisFormat::Btf => tvec![batch, time_steps, feature],
            _ => tvec![time_steps, batch, feature],
        }
    }
}

fn rank_error(what: &str, expected: usize, shape: &[usize]) -> ShapeError {
    ShapeError(format!(
        "expected a rank {expected} {what} tensor, got shape {:?} (rank {})",
        shape,
        shape.len()
    ))
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AxisOrder::Tf => "tf",
            AxisOrder::Caffe => "caffe",
            AxisOrder::Onnx => "onnx",
        };
        f.write_str(s)
    }
}

impl FromStr for AxisOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<AxisOrder, String> {
        match &*s.to_lowercase() {
            "tf" | "tensorflow" => Ok(AxisOrder::Tf),
            "caffe" => Ok(AxisOrder::Caffe),
            "onnx" => Ok(AxisOrder::Onnx),
            _ => Err(format!("Unknown axis order `{s}` (expected tf, caffe or onnx)")),
        }
    }
}
