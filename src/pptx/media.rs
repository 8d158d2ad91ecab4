//! Package media extraction and MIME resolution.

use crate::model::ImageSource;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// File extension to MIME type, for media stored under `ppt/media/`.
static MIME_BY_EXTENSION: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "bmp" => "image/bmp",
    "svg" => "image/svg+xml",
    "webp" => "image/webp",
    "tiff" => "image/tiff",
    "tif" => "image/tiff",
    "emf" => "image/emf",
    "wmf" => "image/wmf",
};

/// MIME type for a media file name. Unknown or missing extensions fall
/// back to `image/png`, which keeps unrecognized media renderable as an
/// opaque bitmap reference rather than dropping it.
pub fn mime_for_filename(name: &str) -> &'static str {
    name.rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| MIME_BY_EXTENSION.get(ext.as_str()).copied())
        .unwrap_or("image/png")
}

/// Extract every entry under `ppt/media/` into a map keyed by bare file
/// name (`image1.png`), which is how relationship targets refer to them.
///
/// A single corrupt or unreadable entry is skipped; any picture that
/// referenced it is later dropped through the unresolvable-reference
/// path.
pub(crate) fn extract_media<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> HashMap<String, ImageSource> {
    let names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/media/"))
        .map(str::to_owned)
        .collect();

    let mut media = HashMap::with_capacity(names.len());
    for name in names {
        let Ok(mut file) = archive.by_name(&name) else {
            tracing::debug!(entry = %name, "media entry unreadable, skipping");
            continue;
        };
        let mut data = Vec::with_capacity(file.size() as usize);
        if file.read_to_end(&mut data).is_err() {
            tracing::debug!(entry = %name, "media entry unreadable, skipping");
            continue;
        }

        let file_name = name.rsplit('/').next().unwrap_or(&name).to_string();
        let mime = mime_for_filename(&file_name).to_string();
        media.insert(file_name, ImageSource::Embedded {
            data: Bytes::from(data),
            mime,
        });
    }

    media
}
