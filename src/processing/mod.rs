mod codec;
mod composer;
mod compressor;

pub use codec::{SourceImage, encode_image, flatten_to_rgb};
pub use composer::{DocumentComposer, count_pages, images_to_document};
pub use compressor::{SizeTargetingCompressor, compress_image};
