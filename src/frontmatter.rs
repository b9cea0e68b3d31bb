//! Extraction of the YAML header block that precedes a post body.

use serde_yaml::{Mapping, Value};

use crate::error::BlogErr;

const DELIMITER: &str = "---";

/// Splits a document into its frontmatter header and body.
///
/// The first line must be exactly `---`; the header runs until the next line
/// that is exactly `---`. Returns `None` when either delimiter is missing.
pub fn split(document: &str) -> Option<(&str, &str)> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);
    let rest = document
        .strip_prefix(DELIMITER)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

/// Parses the frontmatter of a document into an untyped mapping.
///
/// A document without a header, or with an empty one, yields an empty
/// mapping and leaves the reporting of missing fields to validation.
pub fn parse(document: &str) -> Result<Mapping, BlogErr> {
    let Some((header, _)) = split(document) else {
        return Ok(Mapping::new());
    };
    if header.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(header)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(format!("frontmatter must be a mapping, found {other:?}").into()),
    }
}
