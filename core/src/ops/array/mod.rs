//! Shape manipulation ops.
use crate::internal::*;

mod concat;
mod gather;
mod pad;
mod permute;
mod reshape;
mod space_to_depth;
mod strided_slice;
mod tile;

pub use self::concat::Concat;
pub use self::gather::Gather;
pub use self::pad::Pad;
pub use self::permute::Permute;
pub use self::reshape::{Crop, Reshape, Slice};
pub use self::space_to_depth::{DataFormat, PixelShuffle, SpaceToDepth};
pub use self::strided_slice::StridedSlice;
pub use self::tile::Tile;

attr_enum! {
    pub enum ChannelShuffleMode {
        Grouped => "CHANNEL_SHUFFLE_GROUPED",
    }
}

op_config! {
    pub struct ChannelShuffle {
        groups: usize,
        shuffle_mode: ChannelShuffleMode = ChannelShuffleMode::Grouped,
    }
}

shape_of_first_input!(ChannelShuffle);
