//! The structured mutation command engine.
//!
//! A [`Command`] is the `{kind, target?, params}` contract an upstream
//! instruction translator produces. [`execute_command`] applies one
//! command to a presentation snapshot and returns a [`CommandOutcome`]
//! carrying a new snapshot; the input is never mutated. Ordinary domain
//! conditions (unresolvable target, type mismatch, missing parameters)
//! are reported in the outcome, never raised.

mod resolve;

use serde::{Deserialize, Serialize};

use crate::common::unit::{CANVAS_HEIGHT_PX, CANVAS_WIDTH_PX};
use crate::model::{
    ElementCommon, ImageElement, ImageSource, Position, Presentation, ShapeElement, ShapeKind,
    ShapeStyle, Size, Slide, SlideElement, TextAlign, TextElement, TextStyle, fresh_id,
};

use resolve::resolve_target;

/// Pixel offset applied to a duplicated element.
const DUPLICATE_OFFSET_PX: f64 = 20.0;

/// Margin kept between an anchored element and the canvas edge.
const ANCHOR_MARGIN_PX: f64 = 50.0;

/// The fixed command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Select,
    Add,
    Delete,
    Move,
    Resize,
    Rotate,
    Restyle,
    EditText,
    Reorder,
    Duplicate,
}

/// Kind-specific parameters, carried as one flat bag of optionals.
///
/// Each command reads the fields it understands and ignores the rest,
/// mirroring the loose upstream contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandParams {
    // add
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_kind: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    // move
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy: Option<f64>,
    // resize
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    // rotate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    // restyle, text-only fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    // restyle, shape-only fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    // edit-text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepend: Option<String>,
    // reorder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// One structured instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub kind: CommandKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
    #[serde(default)]
    pub params: CommandParams,
}

/// Result of executing one command or a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub success: bool,
    /// Short explanation suitable for direct display
    pub message: String,
    pub affected_element_ids: Vec<String>,
    /// The new snapshot; absent on failure outside batch execution
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub presentation: Option<Presentation>,
}

impl CommandOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            affected_element_ids: Vec::new(),
            presentation: None,
        }
    }
}

/// Apply one command to the given slide of a presentation snapshot.
///
/// The input is left untouched; a successful outcome carries the new
/// snapshot. Failures are ordinary outcomes with `success == false`.
pub fn execute_command(
    presentation: &Presentation,
    slide_index: usize,
    command: &Command,
) -> CommandOutcome {
    if slide_index >= presentation.slides.len() {
        return CommandOutcome::failure(format!("No slide at index {}", slide_index));
    }

    let mut next = presentation.clone();
    let slide = &mut next.slides[slide_index];

    let result = match command.kind {
        CommandKind::Select => select(slide, command),
        CommandKind::Add => add(slide, command),
        CommandKind::Delete => delete(slide, command),
        CommandKind::Move => move_element(slide, command),
        CommandKind::Resize => resize(slide, command),
        CommandKind::Rotate => rotate(slide, command),
        CommandKind::Restyle => restyle(slide, command),
        CommandKind::EditText => edit_text(slide, command),
        CommandKind::Reorder => reorder(slide, command),
        CommandKind::Duplicate => duplicate(slide, command),
    };

    match result {
        Ok((message, affected_element_ids)) => {
            tracing::debug!(kind = ?command.kind, %message, "command applied");
            CommandOutcome {
                success: true,
                message,
                affected_element_ids,
                presentation: Some(next),
            }
        },
        Err(message) => {
            tracing::debug!(kind = ?command.kind, %message, "command rejected");
            CommandOutcome::failure(message)
        },
    }
}

/// Apply commands in order, each successful outcome feeding the next.
///
/// Execution stops at the first failure; the outcome then carries the
/// failing command's message, the snapshot as mutated so far, and the
/// affected ids accumulated before the failure (deduplicated, in first
/// occurrence order).
pub fn execute_batch(
    presentation: &Presentation,
    slide_index: usize,
    commands: &[Command],
) -> CommandOutcome {
    let mut current = presentation.clone();
    let mut affected: Vec<String> = Vec::new();
    let mut messages = Vec::with_capacity(commands.len());

    for command in commands {
        let outcome = execute_command(&current, slide_index, command);
        if !outcome.success {
            return CommandOutcome {
                success: false,
                message: outcome.message,
                affected_element_ids: affected,
                presentation: Some(current),
            };
        }

        for id in outcome.affected_element_ids {
            if !affected.contains(&id) {
                affected.push(id);
            }
        }
        messages.push(outcome.message);
        if let Some(next) = outcome.presentation {
            current = next;
        }
    }

    CommandOutcome {
        success: true,
        message: messages.join(", "),
        affected_element_ids: affected,
        presentation: Some(current),
    }
}

type OpResult = Result<(String, Vec<String>), String>;

fn required_target<'a>(slide: &Slide, command: &'a Command) -> Result<(usize, &'a str), String> {
    let reference = command
        .target
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "This command requires a target reference".to_string())?;
    let idx = resolve_target(&slide.elements, reference)
        .ok_or_else(|| format!("No element matches '{}'", reference))?;
    Ok((idx, reference))
}

fn select(slide: &mut Slide, command: &Command) -> OpResult {
    let reference = command.target.as_deref().map(str::trim).unwrap_or("");
    // no reference means deselect, which always succeeds
    if reference.is_empty() {
        return Ok(("Selection cleared".to_string(), Vec::new()));
    }

    match resolve_target(&slide.elements, reference) {
        Some(idx) => {
            let el = &slide.elements[idx];
            Ok((
                format!("Selected {}", el.display_name()),
                vec![el.id().to_string()],
            ))
        },
        None => Ok((format!("No element matches '{}'", reference), Vec::new())),
    }
}

fn add(slide: &mut Slide, command: &Command) -> OpResult {
    let params = &command.params;
    let kind = params
        .element_type
        .as_deref()
        .ok_or_else(|| "Add requires an element type".to_string())?;

    let is_text = kind == "text";
    let position = Position::from_px(
        params.x.unwrap_or(CANVAS_WIDTH_PX / 2.0 - 100.0),
        params.y.unwrap_or(CANVAS_HEIGHT_PX / 2.0 - 50.0),
    );
    let size = Size::from_px(
        params.width.unwrap_or(200.0),
        params.height.unwrap_or(if is_text { 50.0 } else { 100.0 }),
    );

    let common = |id: String| ElementCommon {
        id,
        position,
        size,
        rotation: 0.0,
        z_index: slide.elements.len() as i64 + 1,
        locked: None,
        name: None,
    };

    let element = match kind {
        "text" => SlideElement::Text(TextElement {
            common: common(fresh_id("text")),
            text: params.text.clone().unwrap_or_else(|| "New text".to_string()),
            style: TextStyle::default(),
            paragraphs: None,
        }),
        "image" => {
            let url = params
                .url
                .as_deref()
                .ok_or_else(|| "Adding an image requires a source url".to_string())?;
            SlideElement::Image(ImageElement {
                common: common(fresh_id("image")),
                src: ImageSource::External {
                    url: url.to_string(),
                },
                original_width: None,
                original_height: None,
                crop: None,
                filters: None,
            })
        },
        "shape" => SlideElement::Shape(ShapeElement {
            common: common(fresh_id("shape")),
            shape_kind: params.shape_kind.unwrap_or(ShapeKind::Rect),
            style: ShapeStyle::default(),
            text: params.text.clone(),
            text_style: None,
            path: None,
        }),
        other => return Err(format!("Unknown element type '{}'", other)),
    };

    let id = element.id().to_string();
    let message = format!("Added {} element {}", kind, id);
    slide.elements.push(element);
    Ok((message, vec![id]))
}

fn delete(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let removed = slide.elements.remove(idx);
    Ok((
        format!("Deleted {}", removed.display_name()),
        vec![removed.id().to_string()],
    ))
}

fn move_element(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let params = &command.params;
    let el = &mut slide.elements[idx];
    let size = el.common().size;

    if let Some(anchor) = params.anchor.as_deref() {
        let (x, y) = anchor_position(anchor, &size)
            .ok_or_else(|| format!("Unknown anchor '{}'", anchor))?;
        el.common_mut().position.set_px(Some(x), Some(y));
        return Ok((
            format!("Moved {} to {}", el.display_name(), anchor),
            vec![el.id().to_string()],
        ));
    }

    if params.x.is_some() || params.y.is_some() {
        el.common_mut().position.set_px(params.x, params.y);
        return Ok((
            format!("Moved {}", el.display_name()),
            vec![el.id().to_string()],
        ));
    }

    if params.dx.is_some() || params.dy.is_some() {
        el.common_mut()
            .position
            .translate_px(params.dx.unwrap_or(0.0), params.dy.unwrap_or(0.0));
        return Ok((
            format!("Moved {}", el.display_name()),
            vec![el.id().to_string()],
        ));
    }

    Err("Move requires an anchor, coordinates, or a delta".to_string())
}

/// The nine named anchor positions, honoring the canvas margin. Names are
/// matched after lowercasing and collapsing spaces/underscores to dashes.
fn anchor_position(anchor: &str, size: &Size) -> Option<(f64, f64)> {
    let normalized: String = anchor
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect();

    let left = ANCHOR_MARGIN_PX;
    let center_x = (CANVAS_WIDTH_PX - size.width_px) / 2.0;
    let right = CANVAS_WIDTH_PX - size.width_px - ANCHOR_MARGIN_PX;
    let top = ANCHOR_MARGIN_PX;
    let center_y = (CANVAS_HEIGHT_PX - size.height_px) / 2.0;
    let bottom = CANVAS_HEIGHT_PX - size.height_px - ANCHOR_MARGIN_PX;

    let pos = match normalized.as_str() {
        "top-left" => (left, top),
        "top" | "top-center" => (center_x, top),
        "top-right" => (right, top),
        "left" | "center-left" => (left, center_y),
        "center" | "middle" => (center_x, center_y),
        "right" | "center-right" => (right, center_y),
        "bottom-left" => (left, bottom),
        "bottom" | "bottom-center" => (center_x, bottom),
        "bottom-right" => (right, bottom),
        _ => return None,
    };
    Some(pos)
}

fn resize(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let params = &command.params;
    let el = &mut slide.elements[idx];

    if let Some(factor) = params.scale {
        el.common_mut().size.scale(factor);
    } else if params.width.is_some() || params.height.is_some() {
        el.common_mut().size.set_px(params.width, params.height);
    } else {
        return Err("Resize requires a scale factor or explicit dimensions".to_string());
    }

    Ok((
        format!("Resized {}", el.display_name()),
        vec![el.id().to_string()],
    ))
}

fn rotate(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let params = &command.params;
    let el = &mut slide.elements[idx];

    // a delta wins over an absolute angle, and deltas accumulate without
    // normalization into [0, 360)
    let rotation = match (params.angle, params.delta) {
        (_, Some(delta)) => el.common().rotation + delta,
        (Some(angle), None) => angle,
        (None, None) => return Err("Rotate requires an angle or a delta".to_string()),
    };
    el.common_mut().rotation = rotation;

    Ok((
        format!("Rotated {} to {} degrees", el.display_name(), rotation),
        vec![el.id().to_string()],
    ))
}

fn restyle(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let params = &command.params;

    let has_any_field = params.color.is_some()
        || params.font_size.is_some()
        || params.font_family.is_some()
        || params.bold.is_some()
        || params.italic.is_some()
        || params.align.is_some()
        || params.fill.is_some()
        || params.stroke.is_some()
        || params.stroke_width.is_some();
    if !has_any_field {
        return Err("Restyle requires at least one style field".to_string());
    }

    // fields inapplicable to the element's type are silently ignored
    match &mut slide.elements[idx] {
        SlideElement::Text(text) => apply_text_style(&mut text.style, params),
        SlideElement::Shape(shape) => {
            if let Some(fill) = &params.fill {
                shape.style.fill = fill.clone();
            }
            if let Some(stroke) = &params.stroke {
                shape.style.stroke = stroke.clone();
            }
            if let Some(width) = params.stroke_width {
                shape.style.stroke_width = width;
            }
        },
        SlideElement::Image(_) => {},
    }

    let el = &slide.elements[idx];
    Ok((
        format!("Restyled {}", el.display_name()),
        vec![el.id().to_string()],
    ))
}

fn apply_text_style(style: &mut TextStyle, params: &CommandParams) {
    if let Some(color) = &params.color {
        style.color = color.clone();
    }
    if let Some(size) = params.font_size {
        style.set_font_size(size);
    }
    if let Some(family) = &params.font_family {
        style.font_family = family.clone();
    }
    if let Some(bold) = params.bold {
        style.bold = bold;
    }
    if let Some(italic) = params.italic {
        style.italic = italic;
    }
    if let Some(align) = params.align {
        style.align = align;
    }
}

fn edit_text(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let params = &command.params;

    let SlideElement::Text(text) = &mut slide.elements[idx] else {
        let el = &slide.elements[idx];
        return Err(format!("{} is not a text element", el.display_name()));
    };

    if let Some(suffix) = &params.append {
        text.text.push_str(suffix);
    } else if let Some(prefix) = &params.prepend {
        text.text = format!("{}{}", prefix, text.text);
    } else if let Some(replacement) = &params.replace {
        text.text = replacement.clone();
    } else {
        return Err("Edit-text requires replace, append, or prepend".to_string());
    }

    let el = &slide.elements[idx];
    Ok((
        format!("Updated text of {}", el.display_name()),
        vec![el.id().to_string()],
    ))
}

fn reorder(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;
    let direction = command
        .params
        .direction
        .as_deref()
        .ok_or_else(|| "Reorder requires a direction".to_string())?;

    let max_z = slide
        .elements
        .iter()
        .map(|el| el.common().z_index)
        .max()
        .unwrap_or(0);
    let min_z = slide
        .elements
        .iter()
        .map(|el| el.common().z_index)
        .min()
        .unwrap_or(0);

    let el = &mut slide.elements[idx];
    let current = el.common().z_index;
    el.common_mut().z_index = match direction {
        "front" => max_z + 1,
        "back" => min_z - 1,
        "forward" => current + 1,
        "backward" => current - 1,
        other => return Err(format!("Unknown reorder direction '{}'", other)),
    };

    let id = el.id().to_string();
    let name = el.display_name().to_string();
    slide.elements.sort_by_key(|el| el.common().z_index);

    Ok((format!("Reordered {} ({})", name, direction), vec![id]))
}

fn duplicate(slide: &mut Slide, command: &Command) -> OpResult {
    let (idx, _) = required_target(slide, command)?;

    let max_z = slide
        .elements
        .iter()
        .map(|el| el.common().z_index)
        .max()
        .unwrap_or(0);

    let mut clone = slide.elements[idx].clone();
    let source_name = slide.elements[idx].display_name().to_string();
    let prefix = clone.kind_name();
    {
        let common = clone.common_mut();
        common.id = fresh_id(prefix);
        common
            .position
            .translate_px(DUPLICATE_OFFSET_PX, DUPLICATE_OFFSET_PX);
        common.z_index = max_z + 1;
    }

    let id = clone.id().to_string();
    slide.elements.push(clone);

    Ok((format!("Duplicated {} as {}", source_name, id), vec![id]))
}
