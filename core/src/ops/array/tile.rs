use crate::internal::*;

op_config! {
    pub struct Tile {
        multiples: TVec<usize>,
    }
}

// multiples are not reflected in the inferred shapes
shape_of_all_inputs!(Tile);
