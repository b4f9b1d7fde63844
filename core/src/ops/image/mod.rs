mod crop_and_resize;
mod glimpse;
mod projective;
mod resize;

pub use self::crop_and_resize::{CropAndResize, Interpolation};
pub use self::glimpse::ExtractGlimpse;
pub use self::projective::ImageProjectiveTransform;
pub use self::resize::{Resize, ResizeMode, UpsampleIndexed};
