//! N-way shape broadcast
use crate::errors::ShapeResult;
use crate::internal::*;

/// Computes a shape, if any, to which all shapes can be broadcasted.
///
/// Shapes are aligned on their trailing dimension, and size-1 dimensions
/// stretch to match the others.
pub fn multi_broadcast(shapes: &[impl AsRef<[usize]>]) -> ShapeResult<Shape> {
    let Some(len) = shapes.iter().map(|shape| shape.as_ref().len()).max() else {
        return Ok(tvec!());
    };
    let mut shape: Shape = tvec!();
    for i in 0..len {
        let mut wanted_size = 1;
        for s in shapes {
            let s = s.as_ref();
            let dim = if i < s.len() { s[s.len() - i - 1] } else { 1 };
            wanted_size = match (wanted_size, dim) {
                (a, b) if a == b => a,
                (1, b) => b,
                (a, 1) => a,
                (a, b) => bail_shape!(
                    "Can not broadcast {} together ({a} and {b} on axis -{})",
                    shapes.iter().map(|s| format_shape(s.as_ref())).join(", "),
                    i + 1
                ),
            };
        }
        shape.push(wanted_size)
    }
    shape.reverse();
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onnx_1() {
        assert_eq!(multi_broadcast(&tvec![tvec![2, 3, 4, 5], tvec![]]).unwrap(), tvec![2, 3, 4, 5])
    }

    #[test]
    fn onnx_2() {
        assert_eq!(multi_broadcast(&tvec![tvec![2, 3, 4, 5], tvec![5]]).unwrap(), tvec![2, 3, 4, 5])
    }

    #[test]
    fn onnx_4() {
        assert_eq!(
            multi_broadcast(&tvec![tvec![1, 4, 5], tvec![2, 3, 4, 1]]).unwrap(),
            tvec![2, 3, 4, 5]
        )
    }

    #[test]
    fn onnx_5() {
        assert_eq!(
            multi_broadcast(&tvec![tvec![3, 4, 5], tvec![2, 1, 1, 1]]).unwrap(),
            tvec![2, 3, 4, 5]
        )
    }

    #[test]
    fn incompatible() {
        let e = multi_broadcast(&[[2usize, 3], [2, 4]]).unwrap_err();
        assert_eq!(e.to_string(), "Can not broadcast 2x3, 2x4 together (3 and 4 on axis -1)");
    }
}
