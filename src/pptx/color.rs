//! Color resolution for slide markup.
//!
//! Explicit `srgbClr` values are taken verbatim; `schemeClr` tokens are
//! resolved against a fixed Office-default palette rather than chasing the
//! theme part, trading exact fidelity for robustness on packages with
//! missing or nonstandard themes.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::xml::attr;

/// Office default scheme palette.
static SCHEME_COLORS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "tx1" => "#000000",
    "tx2" => "#44546A",
    "bg1" => "#FFFFFF",
    "bg2" => "#E7E6E6",
    "dk1" => "#000000",
    "lt1" => "#FFFFFF",
    "accent1" => "#4472C4",
    "accent2" => "#ED7D31",
    "accent3" => "#A5A5A5",
    "accent4" => "#FFC000",
    "accent5" => "#5B9BD5",
    "accent6" => "#70AD47",
};

/// Resolve a scheme color token; unknown tokens get the caller's default.
pub fn resolve_scheme_color(token: &str, default: &str) -> String {
    SCHEME_COLORS
        .get(token)
        .map(|c| (*c).to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Find the first color child (`a:srgbClr` or `a:schemeClr`) in a fill
/// fragment and return it as a hex string.
pub(crate) fn first_color(xml: &[u8], default: &str) -> Option<String> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"srgbClr" => {
                    return attr(&e, b"val").map(|v| format!("#{}", v));
                },
                b"schemeClr" => {
                    return attr(&e, b"val").map(|v| resolve_scheme_color(&v, default));
                },
                _ => {},
            },
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scheme_color() {
        assert_eq!(resolve_scheme_color("accent1", "#000000"), "#4472C4");
        assert_eq!(resolve_scheme_color("bg1", "#000000"), "#FFFFFF");
        assert_eq!(resolve_scheme_color("mystery", "#123456"), "#123456");
    }

    #[test]
    fn test_first_color_srgb() {
        let xml = br#"<a:solidFill><a:srgbClr val="FF0000"/></a:solidFill>"#;
        assert_eq!(first_color(xml, "#000000").as_deref(), Some("#FF0000"));
    }

    #[test]
    fn test_first_color_scheme() {
        let xml = br#"<a:solidFill><a:schemeClr val="tx2"/></a:solidFill>"#;
        assert_eq!(first_color(xml, "#000000").as_deref(), Some("#44546A"));
    }

    #[test]
    fn test_first_color_absent() {
        assert_eq!(first_color(b"<a:noFill/>", "#000000"), None);
    }
}
