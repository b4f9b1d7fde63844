//! Attribute values and the keyword-style bag handlers build ops from.
use crate::errors::{IrError, IrResult};
use crate::ops::OpType;
use irconv_data::prelude::*;
use std::collections::BTreeMap;

/// A dynamically typed attribute value, as extracted from a source node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f32),
    Str(String),
    Tensor(Tensor),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::None => "none",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
            AttrValue::Tensor(_) => "tensor",
            AttrValue::List(_) => "list",
            AttrValue::Map(_) => "map",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, AttrValue::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        if let AttrValue::Str(s) = self { Some(s) } else { None }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let AttrValue::Int(i) = self { Some(*i) } else { None }
    }
}

/// Typed conversion out of an `AttrValue`.
///
/// The error is a bare reason; callers attach the op and attribute names.
pub trait FromAttr: Sized {
    fn from_attr(value: &AttrValue) -> Result<Self, String>;
}

fn mismatch<T>(expected: &str, got: &AttrValue) -> Result<T, String> {
    Err(format!("expected {expected}, got {}", got.type_name()))
}

impl FromAttr for AttrValue {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromAttr for bool {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        match value {
            AttrValue::Bool(b) => Ok(*b),
            AttrValue::Int(0) => Ok(false),
            AttrValue::Int(1) => Ok(true),
            other => mismatch("a bool", other),
        }
    }
}

impl FromAttr for i64 {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        match value {
            AttrValue::Int(i) => Ok(*i),
            AttrValue::Bool(b) => Ok(*b as i64),
            other => mismatch("an integer", other),
        }
    }
}

impl FromAttr for usize {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        let i = i64::from_attr(value)?;
        usize::try_from(i).map_err(|_| format!("expected a non-negative integer, got {i}"))
    }
}

impl FromAttr for f32 {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        match value {
            AttrValue::Float(f) => Ok(*f),
            AttrValue::Int(i) => Ok(*i as f32),
            AttrValue::Tensor(t) if t.len() == 1 => Ok(t.to_vec()[0]),
            other => mismatch("a float", other),
        }
    }
}

impl FromAttr for String {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        match value {
            AttrValue::Str(s) => Ok(s.clone()),
            other => mismatch("a string", other),
        }
    }
}

impl FromAttr for Tensor {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        match value {
            AttrValue::Tensor(t) => Ok(t.clone()),
            AttrValue::Float(_) | AttrValue::Int(_) => Ok(tensor0(f32::from_attr(value)?)),
            AttrValue::List(_) => {
                let mut shape = vec![];
                let mut data = vec![];
                nested_values(value, 0, &mut shape, &mut data)?;
                Tensor::from_shape_vec(&shape, data).map_err(|e| e.to_string())
            }
            other => mismatch("a tensor", other),
        }
    }
}

// Flattens rectangular nested lists, recording the shape on the way down.
fn nested_values(
    value: &AttrValue,
    depth: usize,
    shape: &mut Vec<usize>,
    data: &mut Vec<f32>,
) -> Result<(), String> {
    match value {
        AttrValue::List(items) => {
            if shape.len() == depth {
                shape.push(items.len());
            } else if shape[depth] != items.len() {
                return Err("nested lists are not rectangular".to_string());
            }
            items.iter().try_for_each(|item| nested_values(item, depth + 1, shape, data))
        }
        scalar => {
            if depth != shape.len() {
                return Err("nested lists are not rectangular".to_string());
            }
            data.push(f32::from_attr(scalar)?);
            Ok(())
        }
    }
}

impl<T: FromAttr> FromAttr for Vec<T> {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        match value {
            AttrValue::List(items) => items.iter().map(T::from_attr).collect(),
            AttrValue::Tensor(t) if t.rank() <= 1 => {
                t.to_vec().into_iter().map(|v| T::from_attr(&AttrValue::Float(v))).collect()
            }
            other => mismatch("a list", other),
        }
    }
}

impl<T: FromAttr> FromAttr for TVec<T> {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        Vec::<T>::from_attr(value).map(TVec::from_vec)
    }
}

impl<T: FromAttr, const N: usize> FromAttr for [T; N] {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        let items = Vec::<T>::from_attr(value)?;
        let len = items.len();
        items.try_into().map_err(|_| format!("expected a list of {N} values, got {len}"))
    }
}

impl<T: FromAttr> FromAttr for Option<T> {
    fn from_attr(value: &AttrValue) -> Result<Self, String> {
        if value.is_none() { Ok(None) } else { T::from_attr(value).map(Some) }
    }
}

macro_rules! into_attr {
    ($($t:ty => |$v:ident| $e:expr),* $(,)?) => {
        $(impl From<$t> for AttrValue {
            fn from($v: $t) -> AttrValue {
                $e
            }
        })*
    };
}

into_attr! {
    bool => |v| AttrValue::Bool(v),
    i64 => |v| AttrValue::Int(v),
    i32 => |v| AttrValue::Int(v as i64),
    usize => |v| AttrValue::Int(v as i64),
    f32 => |v| AttrValue::Float(v),
    String => |v| AttrValue::Str(v),
    &str => |v| AttrValue::Str(v.to_string()),
    Tensor => |v| AttrValue::Tensor(v),
    BTreeMap<String, AttrValue> => |v| AttrValue::Map(v),
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(v: Vec<T>) -> AttrValue {
        AttrValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttrValue>> From<TVec<T>> for AttrValue {
    fn from(v: TVec<T>) -> AttrValue {
        AttrValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttrValue>, const N: usize> From<[T; N]> for AttrValue {
    fn from(v: [T; N]) -> AttrValue {
        AttrValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> AttrValue {
        v.map(Into::into).unwrap_or_default()
    }
}

/// Keyword-style attribute bag, the inbound form of op parameters.
///
/// A key holding `AttrValue::None` counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrBag(BTreeMap<String, AttrValue>);

impl AttrBag {
    pub fn new() -> AttrBag {
        AttrBag::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> AttrBag {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key).filter(|v| !v.is_none())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn required<T: FromAttr>(&self, op: &str, kind: OpType, key: &str) -> IrResult<T> {
        match self.optional(op, kind, key)? {
            Some(v) => Ok(v),
            None => Err(IrError::MissingAttribute {
                op: op.to_string(),
                kind,
                attr: key.to_string(),
            }),
        }
    }

    pub fn optional<T: FromAttr>(&self, op: &str, kind: OpType, key: &str) -> IrResult<Option<T>> {
        self.get(key)
            .map(|value| T::from_attr(value).map_err(|reason| invalid(op, kind, key, reason)))
            .transpose()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for AttrBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> AttrBag {
        AttrBag(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

pub(crate) fn invalid(op: &str, kind: OpType, key: &str, reason: String) -> IrError {
    IrError::InvalidAttribute { op: op.to_string(), kind, attr: key.to_string(), reason }
}

/// Named attribute access over a typed op configuration.
///
/// Implemented by `op_config!` for every catalogue configuration.
pub trait Attributes {
    /// Attribute keys this kind declares, in declaration order.
    fn attr_names(&self) -> &'static [&'static str];
    fn get_attr(&self, key: &str) -> Option<AttrValue>;
    fn set_attr(&mut self, op: &str, kind: OpType, key: &str, value: AttrValue) -> IrResult<()>;
}
