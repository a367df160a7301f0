mod compressor;
mod validation;

pub use compressor::{compress, fit_width};
pub use validation::is_acceptable_upload;
