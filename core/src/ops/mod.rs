//! The operator catalogue.
//!
//! Every IR operator is an [`Op`]: a unique name plus an [`OpKind`], the
//! closed sum type over the catalogue, each variant holding the typed
//! configuration of its kind. Configurations are declared with `op_config!`
//! from their attribute schema and implement [`IrOp`] for shape inference.

use crate::internal::*;
use crate::model::Buffer;

#[macro_use]
mod macros;

pub mod array;
pub mod attrs;
pub mod cnn;
pub mod detection;
pub mod identity;
pub mod image;
pub mod konst;
pub mod math;
pub mod nn;
pub mod rec;
pub mod source;
pub mod udl;

use self::array::*;
use self::cnn::*;
use self::detection::*;
use self::identity::*;
use self::image::*;
use self::konst::Constant;
use self::math::*;
use self::nn::*;
use self::rec::*;
use self::source::Input;
use self::udl::Udl;

/// Shape inference and layout behaviour of an op configuration.
pub trait IrOp: Attributes + fmt::Debug {
    /// Output shapes from the input shapes, in output order.
    ///
    /// `num_outputs` is the number of outputs the graph declared for the op.
    fn infer_shape(
        &self,
        inputs: &[Shape],
        num_outputs: usize,
        axis_order: AxisOrder,
    ) -> ShapeResult<TVec<Shape>>;

    /// Set the layout tag of one of this op's output buffers.
    ///
    /// Defaults to the axis order's convention for the buffer rank. Kinds
    /// with a fixed natural layout override it.
    fn populate_axis_format(&self, buffer: &mut Buffer, axis_order: AxisOrder) {
        buffer.populate_axis_format(axis_order)
    }
}

op_catalogue! {
    Input(Input) => "input",
    ArgMax(ArgMax) => "argmax",
    Batchnorm(Batchnorm) => "batchnorm",
    ChannelShuffle(ChannelShuffle) => "channel_shuffle",
    Concat(Concat) => "concatenation",
    Constant(Constant) => "constant",
    Convolution(Conv) => "convolution",
    Crop(Crop) => "crop",
    CropAndResize(CropAndResize) => "crop_and_resize",
    CrossCorrelation(CrossCorrelation) => "cross_correlation",
    Deconvolution(Deconv) => "deconvolution",
    DetectionOutput(DetectionOutput) => "detection_output",
    Dropout(Dropout) => "dropout",
    ElementwiseBinarySub(ElementwiseBinary) => "elementwise_binary_sub",
    ElementwiseBinaryDiv(ElementwiseBinary) => "elementwise_binary_div",
    ElementwiseBinaryProduct(ElementwiseBinary) => "elementwise_binary_product",
    ElementwiseDiv(Elementwise) => "elementwise_div",
    ElementwiseMax(Elementwise) => "elementwise_max",
    ElementwiseProduct(Elementwise) => "elementwise_product",
    ElementwiseSub(Elementwise) => "elementwise_sub",
    ElementwiseSum(ElementwiseSum) => "elementwise_sum",
    ElementwiseUnaryAbs(ElementwiseUnary) => "elementwise_unary_abs",
    ElementwiseUnaryExp(ElementwiseUnary) => "elementwise_unary_exp",
    ElementwiseUnaryFloor(ElementwiseUnary) => "elementwise_unary_floor",
    ElementwiseUnaryLog(ElementwiseUnary) => "elementwise_unary_log",
    ElementwiseUnaryNeg(ElementwiseUnary) => "elementwise_unary_neg",
    ElementwiseUnarySin(ElementwiseUnary) => "elementwise_unary_sin",
    ElementwiseUnarySqrt(ElementwiseUnary) => "elementwise_unary_sqrt",
    Embedding(Embedding) => "embedding",
    ExtractGlimpse(ExtractGlimpse) => "extract_glimpse",
    FullyConnected(FullyConnected) => "fully_connected",
    Gather(Gather) => "gather",
    GenerateProposals(GenerateProposals) => "generate_proposals",
    Gru(Gru) => "gru",
    ImageProjectiveTransform(ImageProjectiveTransform) => "image_projective_transform",
    L2Norm(L2Norm) => "l2_norm",
    Lstm(Lstm) => "lstm",
    MaxY(MaxY) => "max_y",
    Moment(Moment) => "moment",
    Neg(Neg) => "neg",
    Neuron(Neuron) => "neuron",
    NonMaxSuppression(NonMaxSuppression) => "non_max_suppression",
    Noop(Noop) => "noop",
    Pad(Pad) => "pad",
    Permute(Permute) => "permute",
    PixelShuffle(PixelShuffle) => "pixel_shuffle",
    Pool(Pool) => "pool",
    Power(Power) => "power",
    Prelu(Prelu) => "prelu",
    Proposal(Proposal) => "proposal",
    ReduceMax(Reduce) => "reduce_max",
    ReduceMean(Reduce) => "reduce_mean",
    ReduceMin(Reduce) => "reduce_min",
    ReduceProd(Reduce) => "reduce_prod",
    ReduceSum(Reduce) => "reduce_sum",
    Reshape(Reshape) => "reshape",
    RNorm(RNorm) => "rnorm",
    RoiAlign(RoiAlign) => "roi_align",
    RoiPooling(RoiPooling) => "roi_pooling",
    Resize(Resize) => "resize",
    RnnTransformation(RnnTransformation) => "rnn_transformation",
    Scale(Scale) => "scale",
    Slice(Slice) => "slice",
    StridedSlice(StridedSlice) => "strided_slice",
    Static(Static) => "static",
    Softmax(Softmax) => "softmax",
    SpaceToDepth(SpaceToDepth) => "space_to_depth",
    Ssd(Ssd) => "ssd",
    SubtractMean(SubtractMean) => "subtract_mean",
    Tile(Tile) => "tile",
    Udl(Udl) => "udl",
    Upsample(Resize) => "upsample",
    UpsampleIndexBased(UpsampleIndexed) => "upsample_index_based",
    UpsampleSparse(UpsampleIndexed) => "upsample_sparse",
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OpType {
    type Err = String;
    fn from_str(s: &str) -> Result<OpType, String> {
        OpType::from_key(s).ok_or_else(|| format!("Unknown IR op type `{s}`"))
    }
}

/// A named IR operator.
///
/// Name and type are fixed at construction. Attribute values can only be
/// changed through [`Op::set_attr`], which the graph exposes during merges.
#[derive(Debug, Clone, PartialEq)]
pub struct Op {
    name: String,
    kind: OpKind,
}

impl Op {
    pub fn new(name: impl Into<String>, kind: OpKind) -> Op {
        Op { name: name.into(), kind }
    }

    /// Build an op from a keyword-style attribute bag, validating required
    /// attributes and applying defaults.
    pub fn from_attrs(name: impl Into<String>, op_type: OpType, bag: &AttrBag) -> IrResult<Op> {
        let name = name.into();
        let kind = OpKind::from_attrs(op_type, &name, bag)?;
        let known = kind.config().attr_names();
        for key in bag.keys().filter(|k| !known.contains(k)) {
            trace!("{name} ({op_type}): ignoring attribute `{key}`");
        }
        Ok(Op { name, kind })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    pub fn op_type(&self) -> OpType {
        self.kind.op_type()
    }

    pub fn attr_names(&self) -> &'static [&'static str] {
        self.kind.config().attr_names()
    }

    /// Value of an attribute. Fails with `UnknownAttribute` if this kind
    /// does not declare `key`.
    pub fn attr(&self, key: &str) -> IrResult<AttrValue> {
        self.kind.config().get_attr(key).ok_or_else(|| IrError::UnknownAttribute {
            op: self.name.clone(),
            kind: self.op_type(),
            attr: key.to_string(),
        })
    }

    /// Every declared attribute with its current value.
    pub fn attrs(&self) -> AttrBag {
        let config = self.kind.config();
        config
            .attr_names()
            .iter()
            .filter_map(|k| config.get_attr(k).map(|v| (*k, v)))
            .collect()
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) -> IrResult<()> {
        let kind = self.op_type();
        self.kind.config_mut().set_attr(&self.name, kind, key, value.into())
    }

    pub fn infer_shape(
        &self,
        inputs: &[Shape],
        num_outputs: usize,
        axis_order: AxisOrder,
    ) -> IrResult<TVec<Shape>> {
        self.kind
            .config()
            .infer_shape(inputs, num_outputs, axis_order)
            .in_op(&self.name, self.op_type())
    }

    pub fn populate_axis_format(&self, buffer: &mut Buffer, axis_order: AxisOrder) {
        self.kind.config().populate_axis_format(buffer, axis_order)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.op_type())
    }
}

/// Shape of input `ix`, failing if the op received fewer inputs.
pub(crate) fn input_shape(inputs: &[Shape], ix: usize) -> ShapeResult<&Shape> {
    match inputs.get(ix) {
        Some(shape) => Ok(shape),
        None => bail_shape!("expected at least {} input(s), got {}", ix + 1, inputs.len()),
    }
}

/// Resolve a possibly negative axis against `rank`.
pub(crate) fn resolve_axis(axis: i64, rank: usize) -> ShapeResult<usize> {
    let resolved = if axis < 0 { axis + rank as i64 } else { axis };
    ensure_shape!(
        (0..rank as i64).contains(&resolved),
        "axis {axis} is out of range for rank {rank}"
    );
    Ok(resolved as usize)
}

/// Dimension of a weight tensor, counted from the end when negative.
pub(crate) fn tensor_dim(tensor: &Tensor, axis: isize, what: &str) -> ShapeResult<usize> {
    match tensor.dim(axis) {
        Some(d) => Ok(d),
        None => bail_shape!(
            "{what} of shape {} has no axis {axis}",
            format_shape(tensor.shape())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for op_type in OpType::ALL {
            assert_eq!(OpType::from_key(op_type.as_str()), Some(*op_type));
        }
        assert_eq!(OpType::ALL.len(), 74);
        assert_eq!(OpType::Concat.to_string(), "concatenation");
    }

    #[test]
    fn unknown_attribute_is_distinct_from_missing() {
        let op = Op::from_attrs("d", OpType::Dropout, &AttrBag::new().with("keep", 0.5f32)).unwrap();
        assert!(matches!(op.attr("keep"), Ok(AttrValue::Float(_))));
        assert!(matches!(op.attr("ratio"), Err(IrError::UnknownAttribute { .. })));
        let e = Op::from_attrs("d", OpType::Dropout, &AttrBag::new()).unwrap_err();
        assert!(matches!(e, IrError::MissingAttribute { ref attr, .. } if attr == "keep"));
    }

    #[test]
    fn defaults_are_applied() {
        let bag = AttrBag::new().with("axes", vec![1i64]);
        let op = Op::from_attrs("r", OpType::ReduceMean, &bag).unwrap();
        assert_eq!(op.attr("keep_dims").unwrap(), AttrValue::Bool(true));
        let op = Op::from_attrs("m", OpType::Moment, &bag).unwrap();
        assert_eq!(op.attr("keep_dims").unwrap(), AttrValue::Bool(false));
    }

    #[test]
    fn set_attr_validates() {
        let mut op = Op::from_attrs("g", OpType::Gather, &AttrBag::new()).unwrap();
        op.set_attr("axis", 2i64).unwrap();
        assert_eq!(op.attr("axis").unwrap(), AttrValue::Int(2));
        assert!(matches!(
            op.set_attr("axis", "two"),
            Err(IrError::InvalidAttribute { .. })
        ));
        assert!(matches!(op.set_attr("axes", 1i64), Err(IrError::UnknownAttribute { .. })));
    }

    #[test]
    fn shape_errors_carry_op_identity() {
        let op = Op::from_attrs("b", OpType::ElementwiseBinarySub, &AttrBag::new()).unwrap();
        let e = op.infer_shape(&[tvec![2, 3]], 1, AxisOrder::Tf).unwrap_err();
        assert_eq!(e.op_name(), Some("b"));
        assert!(e.to_string().starts_with("Shape inference failed for op b (elementwise_binary_sub)"));
    }

    #[test]
    fn attrs_dump() {
        let op = Op::from_attrs("p", OpType::Power, &AttrBag::new().with("power", 2.0f32)).unwrap();
        let attrs = op.attrs();
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["power", "scale", "shift"]);
        assert_eq!(attrs.get("scale"), Some(&AttrValue::Float(1.0)));
    }
}
