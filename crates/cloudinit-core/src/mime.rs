//! Canonical multi-part MIME encoding
//!
//! The byte layout produced here is part of the drift contract: any change
//! to header order, casing or line endings makes every previously stored
//! document look out of date.

use crate::errors::EncodeError;
use crate::model::ResolvedPart;

pub const CRLF: &str = "\r\n";
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Check `boundary` against the RFC 2046 `boundary` grammar
///
/// # Errors
/// `InvalidBoundary` naming the first rule the token breaks.
pub fn validate_boundary(boundary: &str) -> Result<(), EncodeError> {
    let invalid = |reason| EncodeError::InvalidBoundary {
        boundary: boundary.to_string(),
        reason,
    };

    if boundary.is_empty() {
        return Err(invalid("boundary is empty"));
    }
    if boundary.len() > MAX_BOUNDARY_LEN {
        return Err(invalid("boundary is longer than 70 characters"));
    }
    if !boundary.bytes().all(is_bchar) {
        return Err(invalid("boundary contains a character outside the MIME boundary set"));
    }
    if boundary.ends_with(' ') {
        return Err(invalid("boundary ends with a space"));
    }
    Ok(())
}

fn is_bchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?' | b' '
        )
}

/// Reject values that would end the header line early
fn check_header_value(
    index: usize,
    header: &'static str,
    value: &str,
    forbid_quote: bool,
) -> Result<(), EncodeError> {
    let invalid = |reason| EncodeError::InvalidHeaderValue {
        index,
        header,
        reason,
    };
    if value.contains(['\r', '\n']) {
        return Err(invalid("contains a line break"));
    }
    if forbid_quote && value.contains('"') {
        return Err(invalid("contains a double quote"));
    }
    Ok(())
}

/// Per-part headers, in emission order
fn part_headers(
    index: usize,
    part: &ResolvedPart,
) -> Result<Vec<(&'static str, String)>, EncodeError> {
    let content_type = part
        .content_type()
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    check_header_value(index, "Content-Type", content_type, false)?;

    let mut headers = vec![
        ("Content-Type", content_type.to_string()),
        ("MIME-Version", "1.0".to_string()),
        ("Content-Transfer-Encoding", "7bit".to_string()),
    ];
    if let Some(filename) = part.filename().filter(|f| !f.is_empty()) {
        check_header_value(index, "Content-Disposition", filename, true)?;
        headers.push((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ));
    }
    if let Some(merge_type) = part.merge_type().filter(|m| !m.is_empty()) {
        check_header_value(index, "X-Merge-Type", merge_type, false)?;
        headers.push(("X-Merge-Type", merge_type.to_string()));
    }
    Ok(headers)
}

fn push_line(out: &mut Vec<u8>, line: &str) {
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(CRLF.as_bytes());
}

/// Encode resolved parts into a multipart/mixed document
///
/// # Errors
/// * `NoParts` - `parts` is empty
/// * `InvalidBoundary` - `boundary` is not a valid MIME boundary
/// * `InvalidHeaderValue` - a content type, filename or merge type would
///   break its header line
pub fn encode_document(parts: &[ResolvedPart], boundary: &str) -> Result<Vec<u8>, EncodeError> {
    if parts.is_empty() {
        return Err(EncodeError::NoParts);
    }
    validate_boundary(boundary)?;

    let delimiter = format!("--{}", boundary);
    let body_len: usize = parts.iter().map(|p| p.content().len() + 160).sum();
    let mut out = Vec::with_capacity(body_len + 128);

    push_line(
        &mut out,
        &format!("Content-Type: multipart/mixed; boundary=\"{}\"", boundary),
    );
    push_line(&mut out, "MIME-Version: 1.0");
    push_line(&mut out, "");

    for (index, part) in parts.iter().enumerate() {
        push_line(&mut out, &delimiter);
        for (name, value) in part_headers(index, part)? {
            push_line(&mut out, &format!("{}: {}", name, value));
        }
        push_line(&mut out, "");
        out.extend_from_slice(part.content());
        out.extend_from_slice(CRLF.as_bytes());
    }

    push_line(&mut out, &format!("{}--", delimiter));
    Ok(out)
}
