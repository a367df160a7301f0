pub mod bytes;
pub mod error;
pub mod formats;
pub mod slug;

pub use bytes::format_bytes;
pub use error::{CompressError, MetadataError, PipelineError, PipelineResult};
pub use formats::{is_recognized_extension, OutputFormat};
pub use slug::{default_file_name, export_file_name, slugify};
