pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{CompressorError, CompressorResult, PathError, ValidationError};
pub use validation::{validate_request, validate_document_request, validate_input_path, validate_output_path};
pub use formats::{OutputFormat, format_from_extension, resolve_output_format};
pub use fs::{
    get_file_size,
    extract_filename,
    ensure_extension,
    write_atomically,
};
