//! Small helpers over the quick-xml event reader.
//!
//! The slide markup is parsed as shallow, repeated structural patterns
//! rather than a full document tree: each interesting element's subtree is
//! captured as raw bytes once and then scanned with typed accessors. This
//! keeps the fallback-on-absence contract simple — a missing pattern just
//! never matches.

use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Read an attribute by its full qualified name.
pub(crate) fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    for a in e.attributes().flatten() {
        if a.key.as_ref() == key {
            return Some(String::from_utf8_lossy(&a.value).into_owned());
        }
    }
    None
}

/// Read an attribute by its local (prefix-stripped) name.
///
/// Relationship references arrive as `r:embed`/`r:link`; the prefix is not
/// significant for resolution.
pub(crate) fn attr_by_local(e: &BytesStart, local: &[u8]) -> Option<String> {
    for a in e.attributes().flatten() {
        let key = a.key.as_ref();
        let key_local = match key.iter().rposition(|&b| b == b':') {
            Some(pos) => &key[pos + 1..],
            None => key,
        };
        if key_local == local {
            return Some(String::from_utf8_lossy(&a.value).into_owned());
        }
    }
    None
}

/// Parse an attribute as i64, `None` when absent or malformed.
pub(crate) fn attr_i64(e: &BytesStart, key: &[u8]) -> Option<i64> {
    attr(e, key).and_then(|v| v.parse().ok())
}

/// Capture the complete subtree of an element whose start tag was just
/// consumed, reconstructing it (start tag, attributes, children, text) as
/// raw XML bytes.
pub(crate) fn capture_subtree(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Vec<u8>> {
    let mut xml = Vec::new();
    let mut depth = 1usize;

    write_start_tag(&mut xml, start, false);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                write_start_tag(&mut xml, &e, false);
            },
            Ok(Event::Empty(e)) => {
                write_start_tag(&mut xml, &e, true);
            },
            Ok(Event::Text(e)) => {
                xml.extend_from_slice(e.as_ref());
            },
            Ok(Event::End(e)) => {
                xml.extend_from_slice(b"</");
                xml.extend_from_slice(e.name().as_ref());
                xml.push(b'>');

                depth -= 1;
                if depth == 0 {
                    return Ok(xml);
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
    }

    Err(Error::Xml("unexpected end of element subtree".to_string()))
}

fn write_start_tag(xml: &mut Vec<u8>, e: &BytesStart, empty: bool) {
    xml.push(b'<');
    xml.extend_from_slice(e.name().as_ref());
    for a in e.attributes().flatten() {
        xml.push(b' ');
        xml.extend_from_slice(a.key.as_ref());
        xml.extend_from_slice(b"=\"");
        xml.extend_from_slice(&a.value);
        xml.push(b'"');
    }
    if empty {
        xml.extend_from_slice(b"/>");
    } else {
        xml.push(b'>');
    }
}

/// Collect the text content of every `<a:t>` element, in document order,
/// skipping runs that are empty after trimming.
pub(crate) fn collect_texts(xml: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut texts = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            },
            Ok(Event::Text(e)) if in_text => {
                let t = String::from_utf8_lossy(e.as_ref()).into_owned();
                if !t.trim().is_empty() {
                    texts.push(t);
                }
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    texts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_subtree_preserves_attributes() {
        let xml = br#"<root><p:sp idx="1"><a:off x="10" y="20"/>text</p:sp></root>"#;
        let mut reader = Reader::from_reader(&xml[..]);

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.local_name().as_ref() == b"sp" => {
                    let captured = capture_subtree(&mut reader, &e).unwrap();
                    let s = String::from_utf8(captured).unwrap();
                    assert!(s.starts_with("<p:sp idx=\"1\">"));
                    assert!(s.contains("<a:off x=\"10\" y=\"20\"/>"));
                    assert!(s.ends_with("</p:sp>"));
                    return;
                },
                Event::Eof => panic!("sp not found"),
                _ => {},
            }
        }
    }

    #[test]
    fn test_capture_subtree_handles_nesting() {
        let xml = b"<a><sp><sp>inner</sp></sp></a>";
        let mut reader = Reader::from_reader(&xml[..]);

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.local_name().as_ref() == b"sp" => {
                    let captured = capture_subtree(&mut reader, &e).unwrap();
                    assert_eq!(captured, b"<sp><sp>inner</sp></sp>");
                    return;
                },
                Event::Eof => panic!("sp not found"),
                _ => {},
            }
        }
    }

    #[test]
    fn test_collect_texts() {
        let xml = br#"<p:txBody><a:p><a:r><a:t>Hello</a:t></a:r><a:r><a:t>  </a:t></a:r><a:r><a:t>World</a:t></a:r></a:p></p:txBody>"#;
        assert_eq!(collect_texts(xml), vec!["Hello", "World"]);
    }

    #[test]
    fn test_attr_by_local() {
        let xml = br#"<a:blip r:embed="rId2"/>"#;
        let mut reader = Reader::from_reader(&xml[..]);
        match reader.read_event().unwrap() {
            Event::Empty(e) => {
                assert_eq!(attr_by_local(&e, b"embed").as_deref(), Some("rId2"));
                assert_eq!(attr(&e, b"r:embed").as_deref(), Some("rId2"));
            },
            _ => panic!("expected empty element"),
        }
    }
}
