/// Marks the start of a NAS path inside a title attribute.
pub const ANCHOR_MARKER: &str = "/NAS 的文件/";

/// Storage-root label that some titles put in front of [`ANCHOR_MARKER`].
/// When present it belongs to the path.
pub const STORAGE_ROOT_MARKER: &str = "存储空间";

/// Extensions (compared ASCII case-insensitively) that terminate a path.
pub const MEDIA_EXTENSIONS: [&str; 8] = ["mkv", "mp4", "avi", "mov", "m4v", "ts", "flv", "wmv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPath {
    /// The full attribute text the path was found in.
    pub raw_title: String,
    pub path: String,
}

/// Returns the first candidate, in order, that yields a media path.
pub fn scan<I, S>(candidates: I) -> Option<ExtractedPath>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates.into_iter().find_map(|candidate| {
        let raw_title = candidate.as_ref();
        extract_path_from_title(raw_title).map(|path| ExtractedPath {
            raw_title: raw_title.to_string(),
            path,
        })
    })
}

/// Pulls a media file path out of noisy title text.
///
/// The path starts at the nearest [`STORAGE_ROOT_MARKER`] preceding the
/// anchor, or at the anchor itself, and ends at the first recognised
/// extension. Text after the extension is dropped.
pub fn extract_path_from_title(title: &str) -> Option<String> {
    let title = title.trim();
    let anchor = title.find(ANCHOR_MARKER)?;
    let start = title[..anchor]
        .rfind(STORAGE_ROOT_MARKER)
        .unwrap_or(anchor);

    let path = shortest_media_prefix(title[start..].trim())?.trim();
    has_media_extension(path).then(|| path.to_string())
}

/// True if `path` ends in `.<ext>` for one of [`MEDIA_EXTENSIONS`].
pub fn has_media_extension(path: &str) -> bool {
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        MEDIA_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Shortest prefix of the first line of `text` that ends in a media
/// extension not followed by another ASCII alphanumeric.
fn shortest_media_prefix(text: &str) -> Option<&str> {
    let line = text
        .split(['\n', '\r', '\u{2028}', '\u{2029}'])
        .next()
        .unwrap_or(text);

    line.match_indices('.').find_map(|(dot, _)| {
        let rest = &line[dot + 1..];
        MEDIA_EXTENSIONS
            .iter()
            .find(|ext| extension_at(rest, ext))
            .map(|ext| &line[..dot + 1 + ext.len()])
    })
}

/// An extension only ends the path when no ASCII letter or digit follows
/// it. This departs from a plain lazy match: `show.ts2/ep01.mkv` runs on to
/// `.mkv` instead of stopping at `.ts`.
fn extension_at(rest: &str, ext: &str) -> bool {
    let Some(head) = rest.get(..ext.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(ext)
        && !rest[ext.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
}
