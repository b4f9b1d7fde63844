mod detection_output;
mod nms;
mod proposal;
mod roi;

pub use self::detection_output::{DetectionOutput, PriorBoxCode, Ssd};
pub use self::nms::NonMaxSuppression;
pub use self::proposal::{GenerateProposals, Proposal};
pub use self::roi::{RoiAlign, RoiPooling};
