//! Free-text target resolution.
//!
//! A reference resolves against a slide's elements through four rules in
//! fixed priority order; the first rule that produces a match wins even
//! when a later rule would also match.

use crate::common::unit::CANVAS_HEIGHT_PX;
use crate::model::SlideElement;

const TITLE_SYNONYMS: &[&str] = &["title", "heading", "headline"];
const BODY_SYNONYMS: &[&str] = &["body", "content", "subtitle"];

/// Resolve a free-text reference to an element index.
///
/// Priority: exact id, case-insensitive substring against name or text
/// content, `{type}-{index}` (1-based among elements of that type), then
/// the title/body heuristics.
pub(crate) fn resolve_target(elements: &[SlideElement], reference: &str) -> Option<usize> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Some(idx) = elements.iter().position(|el| el.id() == reference) {
        return Some(idx);
    }

    let needle = reference.to_lowercase();
    if let Some(idx) = elements.iter().position(|el| {
        let name_hit = el
            .common()
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle));
        let text_hit = el
            .text()
            .is_some_and(|text| text.to_lowercase().contains(&needle));
        name_hit || text_hit
    }) {
        return Some(idx);
    }

    if let Some(idx) = resolve_type_index(elements, &needle) {
        return Some(idx);
    }

    resolve_semantic(elements, &needle)
}

/// The `{type}-{index}` rule: `text-2` (or `text2`) is the second text
/// element in discovery order.
fn resolve_type_index(elements: &[SlideElement], needle: &str) -> Option<usize> {
    let (kind, rest) = ["text", "image", "shape"]
        .iter()
        .find_map(|kind| needle.strip_prefix(kind).map(|rest| (*kind, rest)))?;

    let digits = rest.strip_prefix('-').unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let ordinal: usize = digits.parse().ok()?;
    if ordinal == 0 {
        return None;
    }

    elements
        .iter()
        .enumerate()
        .filter(|(_, el)| el.kind_name() == kind)
        .nth(ordinal - 1)
        .map(|(idx, _)| idx)
}

/// Title and body heuristics. A title is the first text element whose top
/// edge sits in the upper third of the canvas; a body is the second text
/// element, provided at least two exist.
fn resolve_semantic(elements: &[SlideElement], needle: &str) -> Option<usize> {
    if TITLE_SYNONYMS.iter().any(|s| needle.contains(s)) {
        return elements.iter().position(|el| {
            matches!(el, SlideElement::Text(_))
                && el.common().position.y_px < CANVAS_HEIGHT_PX / 3.0
        });
    }

    if BODY_SYNONYMS.iter().any(|s| needle.contains(s)) {
        let text_indices: Vec<usize> = elements
            .iter()
            .enumerate()
            .filter(|(_, el)| matches!(el, SlideElement::Text(_)))
            .map(|(idx, _)| idx)
            .collect();
        if text_indices.len() >= 2 {
            return Some(text_indices[1]);
        }
    }

    None
}
