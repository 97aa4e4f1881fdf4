//! Extraction of descriptor text and metadata from compiled script chunks.

pub mod decode;
pub mod descriptor;
pub mod fields;
pub mod scan;

use crate::extract::descriptor::assemble_descriptor;
use crate::extract::scan::extract_children_array;

/// Marker that precedes the YAML code block in an app page chunk.
const YAML_BLOCK_MARKER: &str = r#"data-language":"yaml""#;

/// Extracts the raw compose descriptor text from a chunk payload.
///
/// Locates the YAML code block by its language marker, scans out the
/// bracketed element array, and reassembles the line fragments. Returns
/// `None` when the chunk carries no recoverable descriptor.
#[must_use]
pub fn extract_compose(chunk_js: &str) -> Option<String> {
    let array_text = extract_children_array(chunk_js, YAML_BLOCK_MARKER)?;
    assemble_descriptor(&array_text)
}
