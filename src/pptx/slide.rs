//! Slide part parsing: element tree, background, and transition.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

use crate::model::{Background, GradientStop, ImageSource, Slide, fresh_id};

use super::color::{first_color, resolve_scheme_color};
use super::shape::{parse_picture, parse_shape, subtree_of};
use super::xml::{attr, capture_subtree};

/// Parse one slide part into a [`Slide`].
///
/// Shapes are walked before pictures, each in document order, and the
/// element index doubles as the initial z-index. Shapes and pictures that
/// fail their own parse are skipped without failing the slide.
pub(crate) fn parse_slide(
    xml: &[u8],
    slide_index: usize,
    rels: &HashMap<String, String>,
    media: &HashMap<String, ImageSource>,
) -> Slide {
    let (shapes, pictures) = collect_shape_subtrees(xml);

    let mut elements = Vec::with_capacity(shapes.len() + pictures.len());
    let mut element_index = 0usize;

    for sp in &shapes {
        if let Some(el) = parse_shape(sp, slide_index, element_index) {
            elements.push(el);
            element_index += 1;
        }
    }
    for pic in &pictures {
        if let Some(el) = parse_picture(pic, slide_index, element_index, rels, media) {
            elements.push(el);
            element_index += 1;
        }
    }

    Slide {
        id: fresh_id("slide"),
        index: slide_index,
        elements,
        background: parse_background(xml),
        notes: None,
        transition: parse_transition(xml),
    }
}

/// Capture every `p:sp` and `p:pic` subtree in document order.
fn collect_shape_subtrees(xml: &[u8]) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
    let mut reader = Reader::from_reader(xml);
    let mut shapes = Vec::new();
    let mut pictures = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => {
                    if let Ok(sub) = capture_subtree(&mut reader, &e) {
                        shapes.push(sub);
                    }
                },
                b"pic" => {
                    if let Ok(sub) = capture_subtree(&mut reader, &e) {
                        pictures.push(sub);
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    (shapes, pictures)
}

/// Background from the slide's `p:bg`, when it carries a solid or
/// gradient fill. Anything else (including theme references) yields no
/// background, leaving the canvas to the renderer.
fn parse_background(xml: &[u8]) -> Option<Background> {
    let bg = subtree_of(xml, b"bg")?;

    if let Some(grad) = subtree_of(&bg, b"gradFill") {
        let stops = parse_gradient_stops(&grad);
        if !stops.is_empty() {
            return Some(Background::Gradient { stops });
        }
    }
    if let Some(solid) = subtree_of(&bg, b"solidFill") {
        if let Some(color) = first_color(&solid, "#FFFFFF") {
            return Some(Background::Solid { color });
        }
    }

    None
}

/// Gradient stops from a `a:gradFill` subtree. Stop offsets arrive in
/// thousandths of a percent.
fn parse_gradient_stops(grad: &[u8]) -> Vec<GradientStop> {
    let mut reader = Reader::from_reader(grad);
    let mut stops = Vec::new();
    let mut pending_offset: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"gs" => {
                    pending_offset = attr(&e, b"pos")
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|pos| pos / 100_000.0);
                },
                b"srgbClr" => {
                    if let (Some(offset), Some(val)) = (pending_offset, attr(&e, b"val")) {
                        stops.push(GradientStop {
                            offset,
                            color: format!("#{}", val),
                        });
                        pending_offset = None;
                    }
                },
                b"schemeClr" => {
                    if let (Some(offset), Some(val)) = (pending_offset, attr(&e, b"val")) {
                        stops.push(GradientStop {
                            offset,
                            color: resolve_scheme_color(&val, "#FFFFFF"),
                        });
                        pending_offset = None;
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"gs" {
                    pending_offset = None;
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    stops
}

/// The transition effect tag: the local name of the first child of
/// `p:transition`, e.g. "fade" or "wipe".
fn parse_transition(xml: &[u8]) -> Option<String> {
    let transition = subtree_of(xml, b"transition")?;
    let mut reader = Reader::from_reader(transition.as_slice());
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                if depth == 2 {
                    return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
            },
            Ok(Event::Empty(e)) => {
                if depth == 1 {
                    return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
            },
            Ok(Event::End(_)) => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            },
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {},
        }
    }
}
