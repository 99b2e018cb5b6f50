// Adapters layer: concrete inputs, the JSON record reader and normalizers.

pub mod normalize;
pub mod reader;
pub mod source;

pub use normalize::{PassThrough, SplitArrays};
pub use reader::RecordReader;
pub use source::{FileSource, InputSource, MemorySource, StreamSource};
