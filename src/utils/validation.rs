use std::path::Path;
use crate::core::{CompressionRequest, DocumentRequest};
use crate::utils::{CompressorResult, ValidationError};

/// Validates a single-image compression request
pub fn validate_request(request: &CompressionRequest) -> CompressorResult<()> {
    validate_target(request.target_bytes)?;
    validate_input_path(&request.source)?;
    validate_output_path(&request.destination)?;
    Ok(())
}

/// Validates a document request up front; per-image decoding is checked later.
pub fn validate_document_request(request: &DocumentRequest) -> CompressorResult<()> {
    if request.is_empty() {
        return Err(ValidationError::EmptyInput.into());
    }
    validate_output_path(request.destination())?;
    Ok(())
}

pub fn validate_target(target_bytes: u64) -> CompressorResult<()> {
    if target_bytes == 0 {
        return Err(ValidationError::NonPositiveTarget(target_bytes).into());
    }
    Ok(())
}

/// Validates that the input path exists and is a regular file
pub fn validate_input_path(path: &Path) -> CompressorResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_file() {
        return Err(ValidationError::not_a_file(path).into());
    }

    Ok(())
}

/// Validates that the output path's directory exists
pub fn validate_output_path(path: &Path) -> CompressorResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ValidationError::missing_parent(parent).into());
        }
    }

    if path.is_dir() {
        return Err(ValidationError::not_a_file(path).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{CompressorError, PathError};

    #[test]
    fn zero_target_is_rejected() {
        let err = validate_target(0).unwrap_err();
        assert!(matches!(
            err,
            CompressorError::Validation(ValidationError::NonPositiveTarget(0))
        ));
        assert!(validate_target(1).is_ok());
    }

    #[test]
    fn missing_input_is_a_validation_error() {
        let err = validate_input_path(Path::new("/no/such/image.png")).unwrap_err();
        assert!(matches!(
            err,
            CompressorError::Validation(ValidationError::Path(PathError::NotFound(_)))
        ));
    }

    #[test]
    fn directory_input_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_input_path(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            CompressorError::Validation(ValidationError::Path(PathError::NotFile(_)))
        ));
    }

    #[test]
    fn output_directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(&dir.path().join("out.jpg")).is_ok());
        assert!(validate_output_path(Path::new("relative.jpg")).is_ok());

        let err = validate_output_path(&dir.path().join("missing/out.jpg")).unwrap_err();
        assert!(matches!(
            err,
            CompressorError::Validation(ValidationError::Path(PathError::MissingParent(_)))
        ));
    }

    #[test]
    fn empty_document_request_is_rejected() {
        let request = DocumentRequest::new("out.pdf");
        let err = validate_document_request(&request).unwrap_err();
        assert!(matches!(err, CompressorError::Validation(ValidationError::EmptyInput)));
    }
}
