// asset-squeeze/src/processors/mod.rs
mod batch;
mod compressor;
mod flattener;
mod loader;
mod resizer;

pub use batch::BatchProcessor;
pub use compressor::{write_atomic, Compressor};
pub use flattener::Flattener;
pub use loader::{LoadedImage, Loader};
pub use resizer::Resizer;
