// ID3v2 tag reading and frame rendering
pub mod frames;
pub mod v2;

pub use frames::frame_ids;
pub use v2::{Id3Frame, Id3v2Header, Id3v2Tag};
