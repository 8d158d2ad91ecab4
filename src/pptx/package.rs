//! Package-level orchestration: open the archive, walk the slide parts,
//! and assemble the [`Presentation`].

use std::io::{Cursor, Read};

use crate::common::Result;
use crate::model::{Metadata, Presentation, Slide};

use super::media::extract_media;
use super::rels::parse_relationships;
use super::slide::parse_slide;
use super::theme::parse_theme;
use super::xml::{attr, collect_texts};

use quick_xml::Reader;
use quick_xml::events::Event;

const DEFAULT_TITLE: &str = "Untitled Presentation";

/// Parse a `.pptx` package from its raw bytes.
///
/// A broken archive is the only hard failure. Within a readable package,
/// missing or malformed parts degrade: slides that fail to parse become
/// blank slides, optional parts (theme, notes, core properties) are
/// skipped, and a package without any slide parts yields a presentation
/// with a single blank slide.
pub fn parse_presentation(data: &[u8]) -> Result<Presentation> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    let media = extract_media(&mut archive);

    let mut slide_names: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|n| slide_number(n).map(|num| (num, n.to_string())))
        .collect();
    slide_names.sort_by_key(|(num, _)| *num);

    let mut slides = Vec::with_capacity(slide_names.len());
    for (index, (number, name)) in slide_names.iter().enumerate() {
        let Some(xml) = read_part(&mut archive, name) else {
            tracing::debug!(part = %name, "slide part unreadable, inserting blank slide");
            slides.push(Slide::blank(index));
            continue;
        };

        let rels_name = format!("ppt/slides/_rels/slide{}.xml.rels", number);
        let rels = read_part(&mut archive, &rels_name)
            .map(|bytes| parse_relationships(&bytes))
            .unwrap_or_default();

        let mut slide = parse_slide(&xml, index, &rels, &media);

        let notes_name = format!("ppt/notesSlides/notesSlide{}.xml", number);
        slide.notes = read_part(&mut archive, &notes_name).and_then(|bytes| {
            let texts = collect_texts(&bytes);
            if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            }
        });

        slides.push(slide);
    }

    if slides.is_empty() {
        tracing::debug!("package holds no slide parts");
        slides.push(Slide::blank(0));
    }

    let title = derive_title(&slides);
    let theme = read_part(&mut archive, "ppt/theme/theme1.xml").and_then(|b| parse_theme(&b));
    let metadata = parse_metadata(&mut archive);

    Ok(Presentation {
        title,
        slides,
        theme,
        metadata,
    })
}

/// The slide number in a part name like `ppt/slides/slide12.xml`.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Presentation title: the first line of the first text element on the
/// first slide, falling back to a fixed default.
fn derive_title(slides: &[Slide]) -> String {
    slides
        .first()
        .and_then(|slide| slide.elements.iter().find_map(|el| el.text()))
        .and_then(|text| text.lines().next())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Deck metadata: page size from `ppt/presentation.xml` and the author
/// from `docProps/core.xml`. Both parts are optional.
fn parse_metadata<R: Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>) -> Option<Metadata> {
    let mut metadata = Metadata::default();
    let mut any = false;

    if let Some(xml) = read_part(archive, "ppt/presentation.xml") {
        if let Some((cx, cy)) = slide_size(&xml) {
            metadata.page_width = Some(cx);
            metadata.page_height = Some(cy);
            any = true;
        }
    }
    if let Some(xml) = read_part(archive, "docProps/core.xml") {
        if let Some(author) = creator(&xml) {
            metadata.author = Some(author);
            any = true;
        }
    }

    if any { Some(metadata) } else { None }
}

/// The `p:sldSz` extent in EMU.
fn slide_size(xml: &[u8]) -> Option<(i64, i64)> {
    let mut reader = Reader::from_reader(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sldSz" {
                    let cx = attr(&e, b"cx")?.parse().ok()?;
                    let cy = attr(&e, b"cy")?.parse().ok()?;
                    return Some((cx, cy));
                }
            },
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {},
        }
    }
}

/// Text of `dc:creator` from the core properties part.
fn creator(xml: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(xml);
    let mut in_creator = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"creator" {
                    in_creator = true;
                }
            },
            Ok(Event::Text(e)) if in_creator => {
                let text = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                return if text.is_empty() { None } else { Some(text) };
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"creator" {
                    return None;
                }
            },
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {},
        }
    }
}

/// Read one archive entry, tolerating its absence or unreadability.
fn read_part<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Option<Vec<u8>> {
    let mut file = archive.by_name(name).ok()?;
    let mut data = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut data).ok()?;
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/notesSlides/notesSlide1.xml"), None);
        assert_eq!(slide_number("ppt/slides/slideLayout1.xml"), None);
    }

    #[test]
    fn test_slide_size() {
        let xml = br#"<p:presentation><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#;
        assert_eq!(slide_size(xml), Some((9_144_000, 6_858_000)));
        assert_eq!(slide_size(b"<p:presentation/>"), None);
    }

    #[test]
    fn test_creator() {
        let xml = br#"<cp:coreProperties><dc:creator>Ada</dc:creator></cp:coreProperties>"#;
        assert_eq!(creator(xml).as_deref(), Some("Ada"));
        assert_eq!(creator(b"<cp:coreProperties/>"), None);
    }

    #[test]
    fn test_invalid_archive_is_an_error() {
        assert!(parse_presentation(b"this is not a zip file").is_err());
    }
}
