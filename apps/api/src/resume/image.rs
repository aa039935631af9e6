//! Profile picture upload: validated, then stored inline as a `data:` URI.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("Please upload an image file (got '{0}')")]
    NotAnImage(String),

    #[error("Please upload an image smaller than {limit} bytes ({size} bytes received)")]
    TooLarge { size: usize, limit: usize },

    #[error("The uploaded image is empty")]
    Empty,
}

/// Validates an upload and encodes it as `data:<mime>;base64,<payload>`.
pub fn to_data_uri(content_type: &str, bytes: &[u8], limit: usize) -> Result<String, ImageError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(ImageError::NotAnImage(content_type.to_string()));
    }
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    if bytes.len() > limit {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            limit,
        });
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 5 * 1024 * 1024;

    #[test]
    fn test_encodes_png() {
        let uri = to_data_uri("image/png", &[0x89, b'P', b'N', b'G'], LIMIT).unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_ignores_content_type_parameters() {
        let uri = to_data_uri("Image/JPEG; charset=binary", b"abc", LIMIT).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_rejects_non_images() {
        assert_eq!(
            to_data_uri("application/pdf", b"%PDF", LIMIT),
            Err(ImageError::NotAnImage("application/pdf".to_string()))
        );
        assert!(to_data_uri("image/", b"x", LIMIT).is_err());
    }

    #[test]
    fn test_rejects_oversized_and_empty() {
        assert_eq!(
            to_data_uri("image/png", &[0u8; 11], 10),
            Err(ImageError::TooLarge { size: 11, limit: 10 })
        );
        assert_eq!(to_data_uri("image/png", &[], 10), Err(ImageError::Empty));
    }
}
