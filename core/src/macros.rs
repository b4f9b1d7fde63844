/// Early return with a context-free `ShapeError`.
#[macro_export]
macro_rules! bail_shape {
    ($($arg:tt)*) => {
        return Err($crate::errors::ShapeError(format!($($arg)*)))
    };
}

/// Check a shape-level invariant, failing with a `ShapeError` otherwise.
#[macro_export]
macro_rules! ensure_shape {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail_shape!($($arg)*)
        }
    };
}
