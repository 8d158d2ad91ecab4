//! Theme part parsing: color palette and the major/minor font pair.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::model::Theme;

use super::xml::attr;

/// Parse `ppt/theme/theme1.xml` into a [`Theme`].
///
/// The palette is the color scheme's entries in document order; `sysClr`
/// entries contribute their `lastClr` rendering. Returns `None` when the
/// part holds no colors at all, so callers can treat a broken theme the
/// same as an absent one.
pub(crate) fn parse_theme(xml: &[u8]) -> Option<Theme> {
    let mut reader = Reader::from_reader(xml);
    let mut palette = Vec::new();
    let mut heading_font = None;
    let mut body_font = None;

    let mut in_clr_scheme = false;
    let mut in_major = false;
    let mut in_minor = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"clrScheme" => in_clr_scheme = true,
                b"majorFont" => in_major = true,
                b"minorFont" => in_minor = true,
                b"srgbClr" if in_clr_scheme => {
                    if let Some(val) = attr(&e, b"val") {
                        palette.push(format!("#{}", val));
                    }
                },
                b"sysClr" if in_clr_scheme => {
                    if let Some(last) = attr(&e, b"lastClr") {
                        palette.push(format!("#{}", last));
                    }
                },
                b"latin" => {
                    let face = attr(&e, b"typeface").filter(|f| !f.is_empty());
                    if in_major && heading_font.is_none() {
                        heading_font = face;
                    } else if in_minor && body_font.is_none() {
                        body_font = face;
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"clrScheme" => in_clr_scheme = false,
                b"majorFont" => in_major = false,
                b"minorFont" => in_minor = false,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    if palette.is_empty() && heading_font.is_none() && body_font.is_none() {
        return None;
    }

    Some(Theme {
        palette,
        heading_font,
        body_font,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        let xml = br#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
          <a:themeElements>
            <a:clrScheme name="Office">
              <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
              <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
              <a:dk2><a:srgbClr val="44546A"/></a:dk2>
              <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
            </a:clrScheme>
            <a:fontScheme name="Office">
              <a:majorFont><a:latin typeface="Calibri Light"/></a:majorFont>
              <a:minorFont><a:latin typeface="Calibri"/></a:minorFont>
            </a:fontScheme>
          </a:themeElements>
        </a:theme>"#;

        let theme = parse_theme(xml).unwrap();
        assert_eq!(theme.palette, vec!["#000000", "#FFFFFF", "#44546A", "#4472C4"]);
        assert_eq!(theme.heading_font.as_deref(), Some("Calibri Light"));
        assert_eq!(theme.body_font.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_empty_theme_is_none() {
        assert!(parse_theme(b"<a:theme/>").is_none());
        assert!(parse_theme(b"garbage").is_none());
    }
}
