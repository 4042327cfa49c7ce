//! Well-formedness check for Overpass XML responses.
//!
//! The body is stored verbatim; this pass only makes sure it is an OSM
//! document worth storing and counts the top-level elements for logging.

use osmap_core::DocumentSummary;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Reasons a response body is not a usable OSM document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The body contained no element at all.
    #[error("response contained no XML element")]
    Empty,
    /// The root element was not `<osm>`.
    #[error("expected an <osm> root element, found <{found}>")]
    UnexpectedRoot { found: String },
    /// Overpass reported a runtime error inside the document.
    #[error("overpass reported: {message}")]
    Remark { message: String },
    /// The XML itself was malformed or truncated.
    #[error("malformed XML: {message}")]
    Malformed { message: String },
}

/// Check `body` is an OSM document and count its nodes, ways and relations.
///
/// # Errors
///
/// Returns a [`DocumentError`] when the body is empty, rooted elsewhere,
/// truncated, malformed, or carries an Overpass `<remark>`.
///
/// # Examples
///
/// ```
/// use osmap_data::http::inspect_document;
///
/// let body = br#"<osm version="0.6"><node id="1" lat="0" lon="0"/><way id="2"/></osm>"#;
/// let summary = inspect_document(body)?;
/// assert_eq!((summary.nodes, summary.ways, summary.relations), (1, 1, 0));
/// # Ok::<(), osmap_data::http::DocumentError>(())
/// ```
pub fn inspect_document(body: &[u8]) -> Result<DocumentSummary, DocumentError> {
    let mut reader = Reader::from_reader(body);
    let mut summary = DocumentSummary::default();
    let mut depth = 0_usize;
    let mut seen_root = false;
    let mut remark: Option<String> = None;

    loop {
        let event = reader.read_event().map_err(|err| DocumentError::Malformed {
            message: err.to_string(),
        })?;
        match event {
            Event::Start(element) => {
                visit(&element, depth, &mut seen_root, &mut summary)?;
                if element.local_name().as_ref() == b"remark" {
                    remark = Some(String::new());
                }
                depth += 1;
            }
            Event::Empty(element) => visit(&element, depth, &mut seen_root, &mut summary)?,
            Event::Text(text) => {
                if let Some(message) = remark.as_mut() {
                    let unescaped = text.unescape().map_err(|err| DocumentError::Malformed {
                        message: err.to_string(),
                    })?;
                    message.push_str(&unescaped);
                }
            }
            Event::End(element) => {
                depth = depth.saturating_sub(1);
                if element.local_name().as_ref() == b"remark" {
                    let message = remark.take().unwrap_or_default().trim().to_owned();
                    return Err(DocumentError::Remark { message });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(DocumentError::Empty);
    }
    if depth > 0 {
        return Err(DocumentError::Malformed {
            message: format!("document ended with {depth} unclosed element(s)"),
        });
    }
    Ok(summary)
}

fn visit(
    element: &BytesStart<'_>,
    depth: usize,
    seen_root: &mut bool,
    summary: &mut DocumentSummary,
) -> Result<(), DocumentError> {
    let name = element.local_name();
    if depth == 0 {
        if name.as_ref() != b"osm" {
            return Err(DocumentError::UnexpectedRoot {
                found: String::from_utf8_lossy(name.as_ref()).into_owned(),
            });
        }
        *seen_root = true;
        return Ok(());
    }
    if depth == 1 {
        match name.as_ref() {
            b"node" => summary.nodes += 1,
            b"way" => summary.ways += 1,
            b"relation" => summary.relations += 1,
            _ => {}
        }
    }
    Ok(())
}
