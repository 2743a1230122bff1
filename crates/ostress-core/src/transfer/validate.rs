//! Post-write size validation.

use std::fmt;

/// Declared, written, and expected sizes disagreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeMismatch {
    /// `Content-Length` of the response, if it carried one.
    pub content_length: Option<u64>,
    /// Bytes on disk after the write.
    pub file_size: u64,
    /// Fixed size every fixture file must have, when checked.
    pub expected_size: Option<u64>,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.content_length {
            Some(n) => write!(f, "content_size = {}", n)?,
            None => write!(f, "content_size = <missing>")?,
        }
        write!(f, ", file_size = {}", self.file_size)?;
        if let Some(expected) = self.expected_size {
            write!(f, ", expected_size = {}", expected)?;
        }
        Ok(())
    }
}

impl std::error::Error for SizeMismatch {}

/// Ok when `Content-Length` is present and equals the file size and, if set,
/// the expected size.
pub fn check_sizes(
    content_length: Option<u64>,
    file_size: u64,
    expected_size: Option<u64>,
) -> Result<(), SizeMismatch> {
    let declared_ok = content_length == Some(file_size);
    let expected_ok = expected_size.map_or(true, |e| e == file_size);
    if declared_ok && expected_ok {
        Ok(())
    } else {
        Err(SizeMismatch {
            content_length,
            file_size,
            expected_size,
        })
    }
}
