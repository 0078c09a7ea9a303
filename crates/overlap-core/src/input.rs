//! Guards at the text boundary. The core never decodes binary content; it
//! scores it as empty text and lets the caller know.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Returns the text to score and whether it was rejected as binary.
/// Text containing NUL characters is treated as binary.
pub fn sanitize_text(text: &str) -> (Cow<'_, str>, bool) {
    if text.contains('\0') {
        (Cow::Borrowed(""), true)
    } else {
        (Cow::Borrowed(text), false)
    }
}

/// Decode raw bytes from a loader. Embedded NUL bytes or invalid UTF-8 give
/// `MalformedInput`; callers score such input as empty text.
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
    if bytes.contains(&0) {
        return Err(Error::MalformedInput("contains NUL bytes".to_string()));
    }
    String::from_utf8(bytes).map_err(|e| Error::MalformedInput(format!("not UTF-8: {e}")))
}
