//! Slide relationship (`.rels`) parsing.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

use super::xml::attr;

/// Parse a slide's relationship part into a map from relationship id
/// (`rId2`) to the bare media file name its target points at.
///
/// Only image-bearing relationships are kept; layout, master, and notes
/// references are ignored here.
pub(crate) fn parse_relationships(xml: &[u8]) -> HashMap<String, String> {
    let mut reader = Reader::from_reader(xml);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() != b"Relationship" {
                    continue;
                }
                let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) else {
                    continue;
                };
                if !target.contains("media/") && !target.contains("image") {
                    continue;
                }
                if let Some(file_name) = target.rsplit('/').next() {
                    rels.insert(id, file_name.to_string());
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    rels
}
