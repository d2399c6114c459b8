//! Media locators: path tokens, streaming/thumbnail URLs and clip downloads.

pub mod clip;
pub mod codec;

pub use clip::ClipRequest;
pub use codec::MediaUrlCodec;
