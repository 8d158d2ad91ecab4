//! Shape (`p:sp`) and picture (`p:pic`) parsing.
//!
//! Each shape arrives as its captured subtree bytes. Every accessor here
//! degrades gracefully: a missing transform yields the default box, an
//! unknown preset geometry falls back to a rectangle, and a picture whose
//! relationship cannot be resolved is dropped rather than failing the
//! slide.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

use crate::common::unit::emu_to_pt;
use crate::model::{
    ElementCommon, ImageElement, ImageSource, Position, ShapeElement, ShapeKind, ShapeStyle, Size,
    SlideElement, TextAlign, TextElement, TextStyle,
};

use super::xml::{attr, attr_by_local, attr_i64, capture_subtree, collect_texts};

/// Default box for shapes that carry no explicit transform: 1in x 0.5in
/// at the page origin.
const DEFAULT_WIDTH_EMU: i64 = 914_400;
const DEFAULT_HEIGHT_EMU: i64 = 457_200;

/// Preset geometry names mapped into the closed shape-kind set.
static GEOMETRY_KINDS: phf::Map<&'static str, ShapeKind> = phf::phf_map! {
    "rect" => ShapeKind::Rect,
    "roundRect" => ShapeKind::RoundRect,
    "ellipse" => ShapeKind::Ellipse,
    "triangle" => ShapeKind::Triangle,
    "diamond" => ShapeKind::Diamond,
    "pentagon" => ShapeKind::Pentagon,
    "hexagon" => ShapeKind::Hexagon,
    "rightArrow" => ShapeKind::Arrow,
    "leftArrow" => ShapeKind::Arrow,
    "upArrow" => ShapeKind::Arrow,
    "downArrow" => ShapeKind::Arrow,
    "line" => ShapeKind::Line,
    "straightConnector1" => ShapeKind::Line,
    "star5" => ShapeKind::Star5,
    "star6" => ShapeKind::Star6,
    "wedgeRectCallout" => ShapeKind::Callout,
    "wedgeRoundRectCallout" => ShapeKind::Callout,
    "wedgeEllipseCallout" => ShapeKind::Callout,
};

/// Parse one `p:sp` subtree into a text or shape element.
///
/// Any shape carrying text is a text element, whatever its geometry;
/// geometric shape elements are the text-free remainder. A shape with
/// neither text nor recognizable geometry is skipped.
pub(crate) fn parse_shape(
    sp_xml: &[u8],
    slide_index: usize,
    element_index: usize,
) -> Option<SlideElement> {
    let (position, size, rotation) = parse_transform(sp_xml);
    let tx_body = subtree_of(sp_xml, b"txBody");
    let texts = tx_body.as_deref().map(collect_texts).unwrap_or_default();

    if !texts.is_empty() {
        let text = texts.join("\n");
        let style = tx_body
            .as_deref()
            .map(parse_text_style)
            .unwrap_or_default();
        let name: String = text.chars().take(20).collect();

        return Some(SlideElement::Text(TextElement {
            common: ElementCommon {
                id: format!("text-{}-{}", slide_index, element_index),
                position,
                size,
                rotation,
                z_index: element_index as i64,
                locked: None,
                name: Some(name),
            },
            text,
            style,
            paragraphs: None,
        }));
    }

    let kind = parse_geometry_kind(sp_xml)?;
    let style = parse_shape_style(sp_xml);

    Some(SlideElement::Shape(ShapeElement {
        common: ElementCommon {
            id: format!("shape-{}-{}", slide_index, element_index),
            position,
            size,
            rotation,
            z_index: element_index as i64,
            locked: None,
            name: Some(format!("{} {}", kind.as_str(), element_index + 1)),
        },
        shape_kind: kind,
        style,
        text: None,
        text_style: None,
        path: None,
    }))
}

/// Parse one `p:pic` subtree into an image element, resolving its blip
/// relationship against the slide's media map. Unresolvable pictures are
/// dropped.
pub(crate) fn parse_picture(
    pic_xml: &[u8],
    slide_index: usize,
    element_index: usize,
    rels: &HashMap<String, String>,
    media: &HashMap<String, ImageSource>,
) -> Option<SlideElement> {
    let rel_id = blip_relationship(pic_xml)?;
    let Some(file_name) = rels.get(&rel_id) else {
        tracing::debug!(rel_id, "picture relationship not found, dropping");
        return None;
    };
    let Some(src) = media.get(file_name) else {
        tracing::debug!(file_name, "picture media not in package, dropping");
        return None;
    };

    let (position, size, rotation) = parse_transform(pic_xml);

    Some(SlideElement::Image(ImageElement {
        common: ElementCommon {
            id: format!("image-{}-{}", slide_index, element_index),
            position,
            size,
            rotation,
            z_index: element_index as i64,
            locked: None,
            name: Some(file_name.clone()),
        },
        src: src.clone(),
        original_width: None,
        original_height: None,
        crop: None,
        filters: None,
    }))
}

/// Extract position, size, and rotation from the first `a:xfrm` in a
/// shape subtree. Missing pieces get the defaults: origin offset, the
/// 1in x 0.5in box, no rotation.
pub(crate) fn parse_transform(xml: &[u8]) -> (Position, Size, f64) {
    let mut reader = Reader::from_reader(xml);
    let mut position = None;
    let mut size = None;
    let mut rotation = 0.0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"xfrm" => {
                    if let Some(rot) = attr_i64(&e, b"rot") {
                        rotation = rot as f64 / 60_000.0;
                    }
                },
                b"off" if position.is_none() => {
                    let x = attr_i64(&e, b"x").unwrap_or(0);
                    let y = attr_i64(&e, b"y").unwrap_or(0);
                    position = Some(Position::from_emu(x, y));
                },
                b"ext" if size.is_none() => {
                    let cx = attr_i64(&e, b"cx").unwrap_or(DEFAULT_WIDTH_EMU);
                    let cy = attr_i64(&e, b"cy").unwrap_or(DEFAULT_HEIGHT_EMU);
                    size = Some(Size::from_emu(cx, cy));
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    (
        position.unwrap_or_else(|| Position::from_emu(0, 0)),
        size.unwrap_or_else(|| Size::from_emu(DEFAULT_WIDTH_EMU, DEFAULT_HEIGHT_EMU)),
        rotation,
    )
}

/// Shape kind from `a:prstGeom` or `a:custGeom`. Unknown presets map to a
/// rectangle; a shape with neither geometry element yields `None`.
fn parse_geometry_kind(xml: &[u8]) -> Option<ShapeKind> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"prstGeom" => {
                    let prst = attr(&e, b"prst")?;
                    return Some(
                        GEOMETRY_KINDS
                            .get(prst.as_str())
                            .copied()
                            .unwrap_or(ShapeKind::Rect),
                    );
                },
                b"custGeom" => return Some(ShapeKind::Custom),
                _ => {},
            },
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {},
        }
    }
}

/// Fill, stroke, and stroke width from the shape's `p:spPr`.
fn parse_shape_style(sp_xml: &[u8]) -> ShapeStyle {
    let mut style = ShapeStyle::default();
    let Some(sp_pr) = subtree_of(sp_xml, b"spPr") else {
        return style;
    };

    let mut reader = Reader::from_reader(sp_pr.as_slice());
    let mut ln_depth = 0usize;
    let mut fill_seen = false;
    let mut stroke_seen = false;
    // pending: Some(true) = stroke color expected, Some(false) = fill
    let mut pending: Option<bool> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ln" => {
                    ln_depth += 1;
                    if let Some(w) = attr_i64(&e, b"w") {
                        style.stroke_width = emu_to_pt(w);
                    }
                },
                b"solidFill" => {
                    if ln_depth > 0 && !stroke_seen {
                        pending = Some(true);
                    } else if ln_depth == 0 && !fill_seen {
                        pending = Some(false);
                    }
                },
                b"noFill" if ln_depth == 0 && !fill_seen => {
                    style.fill = "transparent".to_string();
                    fill_seen = true;
                },
                b"srgbClr" | b"schemeClr" => {
                    take_pending_color(&e, &mut pending, &mut style, &mut fill_seen, &mut stroke_seen);
                },
                _ => {},
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"ln" => {
                    if let Some(w) = attr_i64(&e, b"w") {
                        style.stroke_width = emu_to_pt(w);
                    }
                },
                b"noFill" if ln_depth == 0 && !fill_seen => {
                    style.fill = "transparent".to_string();
                    fill_seen = true;
                },
                b"srgbClr" | b"schemeClr" => {
                    take_pending_color(&e, &mut pending, &mut style, &mut fill_seen, &mut stroke_seen);
                },
                _ => {},
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"ln" => ln_depth = ln_depth.saturating_sub(1),
                b"solidFill" => pending = None,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    style
}

fn take_pending_color(
    e: &quick_xml::events::BytesStart,
    pending: &mut Option<bool>,
    style: &mut ShapeStyle,
    fill_seen: &mut bool,
    stroke_seen: &mut bool,
) {
    let Some(is_stroke) = *pending else {
        return;
    };

    let resolved = match e.local_name().as_ref() {
        b"srgbClr" => attr(e, b"val").map(|v| format!("#{}", v)),
        _ => attr(e, b"val").map(|v| super::color::resolve_scheme_color(&v, &style.fill)),
    };
    if let Some(color) = resolved {
        if is_stroke {
            style.stroke = color;
            *stroke_seen = true;
        } else {
            style.fill = color;
            *fill_seen = true;
        }
    }
    *pending = None;
}

/// Text style from a `p:txBody` subtree: the first run properties
/// (`a:rPr` or `a:defRPr`) seed size, weight, font, and color; the first
/// paragraph alignment wins.
fn parse_text_style(tx_body: &[u8]) -> TextStyle {
    let mut style = TextStyle::default();
    let mut reader = Reader::from_reader(tx_body);
    let mut seeded = false;
    let mut align_seen = false;
    let mut rpr_depth = 0usize;

    loop {
        let event = reader.read_event();
        match event {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.local_name().as_ref() {
                    b"rPr" | b"defRPr" if !seeded => {
                        seeded = true;
                        if let Some(sz) = attr_i64(e, b"sz") {
                            style.set_font_size(sz as f64 / 100.0);
                        }
                        if attr(e, b"b").as_deref() == Some("1") {
                            style.bold = true;
                        }
                        if attr(e, b"i").as_deref() == Some("1") {
                            style.italic = true;
                        }
                        if matches!(attr(e, b"u").as_deref(), Some("sng") | Some("1")) {
                            style.underline = true;
                        }
                        if attr(e, b"strike").as_deref() == Some("sngStrike") {
                            style.strikethrough = true;
                        }
                        // an empty tag has no children to scan
                        if matches!(event, Ok(Event::Start(_))) {
                            rpr_depth = 1;
                        }
                    },
                    b"latin" if rpr_depth > 0 => {
                        if let Some(face) = attr(&e, b"typeface") {
                            style.font_family = face;
                        }
                    },
                    b"srgbClr" if rpr_depth > 0 => {
                        if let Some(v) = attr(&e, b"val") {
                            style.color = format!("#{}", v);
                        }
                    },
                    b"schemeClr" if rpr_depth > 0 => {
                        if let Some(v) = attr(&e, b"val") {
                            style.color = super::color::resolve_scheme_color(&v, &style.color);
                        }
                    },
                    b"pPr" if !align_seen => {
                        if let Some(algn) = attr(&e, b"algn") {
                            style.align = match algn.as_str() {
                                "ctr" => TextAlign::Center,
                                "r" => TextAlign::Right,
                                "just" => TextAlign::Justify,
                                _ => TextAlign::Left,
                            };
                            align_seen = true;
                        }
                    },
                    _ => {},
                }
            },
            Ok(Event::End(e)) => {
                if matches!(e.local_name().as_ref(), b"rPr" | b"defRPr") {
                    rpr_depth = 0;
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    style
}

/// The relationship id referenced by the picture's `a:blip`.
fn blip_relationship(pic_xml: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(pic_xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"blip" {
                    return attr_by_local(&e, b"embed").or_else(|| attr_by_local(&e, b"link"));
                }
            },
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {},
        }
    }
}

/// Capture the first subtree with the given local name out of a larger
/// fragment.
pub(crate) fn subtree_of(xml: &[u8], local: &[u8]) -> Option<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == local {
                    return capture_subtree(&mut reader, &e).ok();
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == local {
                    let mut xml = Vec::new();
                    xml.push(b'<');
                    xml.extend_from_slice(e.name().as_ref());
                    xml.extend_from_slice(b"/>");
                    return Some(xml);
                }
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
    use crate::common::unit::{emu_to_px_x, emu_to_px_y};

    const TEXT_SP: &[u8] = br#"<p:sp>
      <p:spPr>
        <a:xfrm><a:off x="914400" y="457200"/><a:ext cx="1828800" cy="914400"/></a:xfrm>
        <a:prstGeom prst="rect"/>
      </p:spPr>
      <p:txBody>
        <a:p>
          <a:pPr algn="ctr"/>
          <a:r>
            <a:rPr sz="3200" b="1"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill><a:latin typeface="Georgia"/></a:rPr>
            <a:t>Hello</a:t>
          </a:r>
          <a:r><a:rPr sz="1800"/><a:t>World</a:t></a:r>
        </a:p>
      </p:txBody>
    </p:sp>"#;

    #[test]
    fn test_parse_text_shape() {
        let el = parse_shape(TEXT_SP, 0, 0).unwrap();
        let SlideElement::Text(text) = el else {
            panic!("expected a text element");
        };

        assert_eq!(text.text, "Hello\nWorld");
        assert_eq!(text.common.id, "text-0-0");
        assert_eq!(text.common.position.x, 914_400);
        assert_eq!(text.common.position.x_px, emu_to_px_x(914_400));
        assert_eq!(text.common.size.height_px, emu_to_px_y(914_400));
        assert_eq!(text.style.font_size, 32.0);
        assert!(text.style.bold);
        assert_eq!(text.style.color, "#FF0000");
        assert_eq!(text.style.font_family, "Georgia");
        assert_eq!(text.style.align, TextAlign::Center);
        assert_eq!(text.common.name.as_deref(), Some("Hello\nWorld"));
    }

    #[test]
    fn test_text_shape_without_transform_gets_default_box() {
        let sp = br#"<p:sp><p:txBody><a:p><a:r><a:t>Loose</a:t></a:r></a:p></p:txBody></p:sp>"#;
        let el = parse_shape(sp, 1, 2).unwrap();
        let common = el.common();
        assert_eq!(common.position.x, 0);
        assert_eq!(common.position.y, 0);
        assert_eq!(common.size.width, 914_400);
        assert_eq!(common.size.height, 457_200);
        assert_eq!(common.id, "text-1-2");
    }

    #[test]
    fn test_shape_without_text_or_geometry_is_dropped() {
        let sp = br#"<p:sp><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr></p:sp>"#;
        assert!(parse_shape(sp, 0, 0).is_none());
    }

    #[test]
    fn test_parse_styled_geometry_shape() {
        let sp = br#"<p:sp>
          <p:spPr>
            <a:xfrm rot="2700000"><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm>
            <a:prstGeom prst="ellipse"/>
            <a:solidFill><a:srgbClr val="00FF00"/></a:solidFill>
            <a:ln w="25400"><a:solidFill><a:srgbClr val="0000FF"/></a:solidFill></a:ln>
          </p:spPr>
        </p:sp>"#;

        let el = parse_shape(sp, 0, 3).unwrap();
        let SlideElement::Shape(shape) = el else {
            panic!("expected a shape element");
        };

        assert_eq!(shape.shape_kind, ShapeKind::Ellipse);
        assert_eq!(shape.common.rotation, 45.0);
        assert_eq!(shape.style.fill, "#00FF00");
        assert_eq!(shape.style.stroke, "#0000FF");
        assert_eq!(shape.style.stroke_width, 2.0);
        assert_eq!(shape.common.name.as_deref(), Some("ellipse 4"));
    }

    #[test]
    fn test_geometry_shape_with_text_becomes_text_element() {
        let sp = br#"<p:sp>
          <p:spPr>
            <a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm>
            <a:prstGeom prst="ellipse"/>
            <a:solidFill><a:srgbClr val="00FF00"/></a:solidFill>
          </p:spPr>
          <p:txBody><a:p><a:r><a:t>Go</a:t></a:r></a:p></p:txBody>
        </p:sp>"#;

        let el = parse_shape(sp, 0, 3).unwrap();
        let SlideElement::Text(text) = el else {
            panic!("expected a text element");
        };
        assert_eq!(text.text, "Go");
        assert_eq!(text.common.id, "text-0-3");
    }

    #[test]
    fn test_unknown_preset_becomes_rect() {
        let sp = br#"<p:sp><p:spPr><a:prstGeom prst="heptagon"/></p:spPr></p:sp>"#;
        let SlideElement::Shape(shape) = parse_shape(sp, 0, 0).unwrap() else {
            panic!("expected a shape element");
        };
        assert_eq!(shape.shape_kind, ShapeKind::Rect);
    }

    #[test]
    fn test_arrow_presets_collapse() {
        for prst in ["rightArrow", "leftArrow"] {
            let sp = format!(r#"<p:sp><p:spPr><a:prstGeom prst="{}"/></p:spPr></p:sp>"#, prst);
            let SlideElement::Shape(shape) = parse_shape(sp.as_bytes(), 0, 0).unwrap() else {
                panic!("expected a shape element");
            };
            assert_eq!(shape.shape_kind, ShapeKind::Arrow);
        }
    }

    #[test]
    fn test_no_fill_maps_to_transparent() {
        let sp = br#"<p:sp><p:spPr><a:prstGeom prst="ellipse"/><a:noFill/></p:spPr></p:sp>"#;
        let SlideElement::Shape(shape) = parse_shape(sp, 0, 0).unwrap() else {
            panic!("expected a shape element");
        };
        assert_eq!(shape.style.fill, "transparent");
    }

    #[test]
    fn test_parse_picture_resolves_media() {
        let pic = br#"<p:pic>
          <p:blipFill><a:blip r:embed="rId2"/></p:blipFill>
          <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm></p:spPr>
        </p:pic>"#;

        let mut rels = HashMap::new();
        rels.insert("rId2".to_string(), "image1.png".to_string());
        let mut media = HashMap::new();
        media.insert("image1.png".to_string(), ImageSource::Embedded {
            data: bytes::Bytes::from_static(b"pngbytes"),
            mime: "image/png".to_string(),
        });

        let el = parse_picture(pic, 0, 1, &rels, &media).unwrap();
        let SlideElement::Image(image) = el else {
            panic!("expected an image element");
        };
        assert_eq!(image.common.id, "image-0-1");
        assert_eq!(image.common.name.as_deref(), Some("image1.png"));
        assert!(matches!(image.src, ImageSource::Embedded { .. }));
    }

    #[test]
    fn test_parse_picture_drops_unresolved() {
        let pic = br#"<p:pic><p:blipFill><a:blip r:embed="rId9"/></p:blipFill></p:pic>"#;
        assert!(parse_picture(pic, 0, 0, &HashMap::new(), &HashMap::new()).is_none());
    }
}
