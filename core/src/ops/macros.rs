/// Declares a typed op configuration from its attribute schema.
///
/// Field names are attribute keys. A field without a default is required;
/// `= expr` gives the default applied when the key is absent. Defaults may
/// refer to fields declared above them.
macro_rules! op_config {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty $(= $default:expr)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl $name {
            #[allow(unused_variables)]
            pub fn from_attrs(
                op: &str,
                kind: $crate::ops::OpType,
                bag: &$crate::ops::attrs::AttrBag,
            ) -> $crate::errors::IrResult<$name> {
                $( let $field: $ty = op_config!(@field bag, op, kind, $field, $ty $(, $default)?); )*
                Ok($name { $($field,)* })
            }
        }

        impl $crate::ops::attrs::Attributes for $name {
            fn attr_names(&self) -> &'static [&'static str] {
                &[$(stringify!($field),)*]
            }

            fn get_attr(&self, key: &str) -> Option<$crate::ops::attrs::AttrValue> {
                match key {
                    $( stringify!($field) => Some(self.$field.clone().into()), )*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set_attr(
                &mut self,
                op: &str,
                kind: $crate::ops::OpType,
                key: &str,
                value: $crate::ops::attrs::AttrValue,
            ) -> $crate::errors::IrResult<()> {
                match key {
                    $( stringify!($field) => {
                        self.$field = <$ty as $crate::ops::attrs::FromAttr>::from_attr(&value)
                            .map_err(|reason| $crate::ops::attrs::invalid(op, kind, key, reason))?;
                        Ok(())
                    } )*
                    _ => Err($crate::errors::IrError::UnknownAttribute {
                        op: op.to_string(),
                        kind,
                        attr: key.to_string(),
                    }),
                }
            }
        }
    };
    (@field $bag:ident, $op:ident, $kind:ident, $field:ident, $ty:ty) => {
        $bag.required::<$ty>($op, $kind, stringify!($field))?
    };
    (@field $bag:ident, $op:ident, $kind:ident, $field:ident, $ty:ty, $default:expr) => {
        match $bag.optional::<$ty>($op, $kind, stringify!($field))? {
            Some(v) => v,
            None => $default,
        }
    };
}

/// An enumerated mode attribute, carried as a string by source nodes.
macro_rules! attr_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $key, )*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<$name, String> {
                match s {
                    $( $key => Ok($name::$variant), )*
                    _ => Err(format!(
                        "unknown {} `{}` (expected one of {})",
                        stringify!($name),
                        s,
                        [$($key),*].join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::ops::attrs::FromAttr for $name {
            fn from_attr(value: &$crate::ops::attrs::AttrValue) -> Result<$name, String> {
                match value {
                    $crate::ops::attrs::AttrValue::Str(s) => s.parse(),
                    other => Err(format!("expected a mode string, got {}", other.type_name())),
                }
            }
        }

        impl From<$name> for $crate::ops::attrs::AttrValue {
            fn from(v: $name) -> $crate::ops::attrs::AttrValue {
                $crate::ops::attrs::AttrValue::Str(v.as_str().to_string())
            }
        }
    };
}

/// Generates the closed `OpType` tag enum and the `OpKind` sum type from
/// the catalogue table, with the exhaustive dispatch between them.
macro_rules! op_catalogue {
    ($( $variant:ident($config:ty) => $key:literal, )*) => {
        /// Type tag of an IR operator. Closed: one tag per catalogue kind.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum OpType {
            $( $variant, )*
        }

        impl OpType {
            pub const ALL: &'static [OpType] = &[$( OpType::$variant, )*];

            /// The IR key of this kind, as it appears in serialized graphs.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( OpType::$variant => $key, )*
                }
            }

            pub fn from_key(key: &str) -> Option<OpType> {
                match key {
                    $( $key => Some(OpType::$variant), )*
                    _ => None,
                }
            }
        }

        /// Operator kind together with its typed configuration.
        #[derive(Debug, Clone, PartialEq)]
        pub enum OpKind {
            $( $variant($config), )*
        }

        impl OpKind {
            pub fn op_type(&self) -> OpType {
                match self {
                    $( OpKind::$variant(_) => OpType::$variant, )*
                }
            }

            pub fn from_attrs(
                op_type: OpType,
                op: &str,
                bag: &$crate::ops::attrs::AttrBag,
            ) -> $crate::errors::IrResult<OpKind> {
                Ok(match op_type {
                    $( OpType::$variant => OpKind::$variant(<$config>::from_attrs(op, op_type, bag)?), )*
                })
            }

            pub fn config(&self) -> &dyn IrOp {
                match self {
                    $( OpKind::$variant(c) => c, )*
                }
            }

            pub fn config_mut(&mut self) -> &mut dyn IrOp {
                match self {
                    $( OpKind::$variant(c) => c, )*
                }
            }
        }
    };
}

/// Implements `IrOp` for configurations whose single output has the shape
/// of their first input.
macro_rules! shape_of_first_input {
    ($($config:ty),* $(,)?) => {
        $(impl $crate::ops::IrOp for $config {
            fn infer_shape(
                &self,
                inputs: &[$crate::irconv_data::Shape],
                _num_outputs: usize,
                _axis_order: $crate::axes::AxisOrder,
            ) -> $crate::errors::ShapeResult<$crate::irconv_data::TVec<$crate::irconv_data::Shape>> {
                Ok(std::iter::once($crate::ops::input_shape(inputs, 0)?.clone()).collect())
            }
        })*
    };
}

/// Implements `IrOp` for configurations with one output per input, each
/// with the shape of that input.
macro_rules! shape_of_all_inputs {
    ($($config:ty),* $(,)?) => {
        $(impl $crate::ops::IrOp for $config {
            fn infer_shape(
                &self,
                inputs: &[$crate::irconv_data::Shape],
                _num_outputs: usize,
                _axis_order: $crate::axes::AxisOrder,
            ) -> $crate::errors::ShapeResult<$crate::irconv_data::TVec<$crate::irconv_data::Shape>> {
                Ok(inputs.iter().cloned().collect())
            }
        })*
    };
}
