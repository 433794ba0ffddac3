//! Privacy-scrubbed request context
//!
//! Nothing that identifies a note file leaves this module: notes become
//! `seed-N`, links are rendered as their display text or replaced by seq ids,
//! and frontmatter is dropped.

use regex::{Captures, Regex};
use seedling_domain::{normalize_link_path, LinkResolver, Note, NoteId, PhotoInfo, SeedContext};
use std::collections::HashMap;
use std::sync::LazyLock;

const IMAGE_EXTENSIONS: [&str; 9] = ["png", "jpg", "jpeg", "gif", "webp", "heic", "bmp", "svg", "tiff"];

static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").expect("wikilink pattern is valid"));

static EMBEDDED_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").expect("embed pattern is valid"));

static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)[^)]*\)").expect("image pattern is valid"));

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("link pattern is valid"));

/// Anonymized seq id for the note at 0-based `index`
pub fn seq_id(index: usize) -> String {
    format!("seed-{}", index + 1)
}

/// Content without a leading `---` frontmatter block
pub fn strip_frontmatter(content: &str) -> &str {
    let content = content.trim_start_matches('\u{feff}');
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return content;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "---" {
            return rest[offset..].trim_start_matches(['\r', '\n']);
        }
    }
    // Unterminated block: treat as content
    content
}

fn file_stem(path: &str) -> String {
    let name = path.trim().rsplit(['/', '\\']).next().unwrap_or(path).trim();
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains(' ') => stem.to_string(),
        _ => name.to_string(),
    }
}

fn is_image_path(path: &str) -> bool {
    let path = path.split(['#', '?']).next().unwrap_or(path);
    path.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.trim().to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_image_line(line: &str) -> bool {
    EMBEDDED_IMAGE
        .captures(line)
        .map(|c| is_image_path(&c[1]))
        .unwrap_or(false)
        || MARKDOWN_IMAGE.is_match(line)
}

/// Text of the first non-empty, non-image line after line `index`
fn adjacent_caption(lines: &[&str], index: usize) -> Option<String> {
    lines[index + 1..]
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .filter(|line| !is_image_line(line))
        .map(|line| line.trim_matches(|c| c == '*' || c == '_').trim().to_string())
        .filter(|caption| !caption.is_empty())
}

/// Detect the first image in `content` and pick a caption
///
/// Embedded `![[image.jpg]]` syntax is checked before markdown `![alt](path)`.
/// The caption is the next non-empty line, else the file name, else the alt text.
pub fn detect_photo(content: &str) -> Option<PhotoInfo> {
    let lines: Vec<&str> = content.lines().collect();

    for (index, line) in lines.iter().enumerate() {
        if let Some(caps) = EMBEDDED_IMAGE.captures(line) {
            if is_image_path(&caps[1]) {
                let alt = caps.get(2).map(|m| m.as_str().trim().to_string());
                return Some(photo(&lines, index, &caps[1], alt));
            }
        }
    }

    for (index, line) in lines.iter().enumerate() {
        if let Some(caps) = MARKDOWN_IMAGE.captures(line) {
            let alt = Some(caps[1].trim().to_string());
            return Some(photo(&lines, index, &caps[2], alt));
        }
    }

    None
}

fn photo(lines: &[&str], index: usize, path: &str, alt: Option<String>) -> PhotoInfo {
    let caption = adjacent_caption(lines, index)
        .or_else(|| Some(file_stem(path)).filter(|s| !s.is_empty()))
        .or(alt.filter(|a| !a.is_empty()))
        .unwrap_or_default();
    PhotoInfo { caption }
}

/// Render links as the text a reader sees: alias if present, else the link's
/// last path segment without extension. Embeds are dropped.
pub fn render_links(content: &str) -> String {
    let rendered = WIKILINK.replace_all(content, |caps: &Captures| {
        if !caps[1].is_empty() {
            return String::new();
        }
        match caps.get(3) {
            Some(alias) if !alias.as_str().trim().is_empty() => alias.as_str().trim().to_string(),
            _ => file_stem(caps[2].split('#').next().unwrap_or(&caps[2])),
        }
    });
    let rendered = MARKDOWN_IMAGE.replace_all(&rendered, "");
    MARKDOWN_LINK.replace_all(&rendered, "$1").into_owned()
}

/// Cleaned content sent for one note
pub fn clean_content(content: &str) -> String {
    render_links(strip_frontmatter(content)).trim().to_string()
}

/// Anonymized contexts in input order, plus the seq-id → note mapping
pub fn build_seed_contexts(notes: &[Note]) -> (Vec<SeedContext>, HashMap<String, NoteId>) {
    let mut seq_map = HashMap::with_capacity(notes.len());
    let contexts = notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let id = seq_id(index);
            seq_map.insert(id.clone(), note.id.clone());
            let body = strip_frontmatter(&note.content);
            SeedContext {
                seq_id: id,
                content: clean_content(&note.content),
                tags: note.tags.clone(),
                created_at: note.created_at,
                backlink_count: note.backlinks.len(),
                photo: detect_photo(body),
            }
        })
        .collect();
    (contexts, seq_map)
}

/// Map-of-content body with every link replaced by the seq id of the note it
/// resolves to, or by its alias (else `[unlinked]`) when it is outside the set
pub fn scrub_outline<R: LinkResolver + ?Sized>(
    moc: &Note,
    resolver: &R,
    seq_by_note: &HashMap<NoteId, String>,
) -> String {
    let body = strip_frontmatter(&moc.content);
    let scrubbed = WIKILINK.replace_all(body, |caps: &Captures| {
        if !caps[1].is_empty() {
            return String::new();
        }
        let resolved = resolver
            .resolve(&caps[2], &moc.id)
            .and_then(|id| seq_by_note.get(&id).cloned());
        match (resolved, caps.get(3)) {
            (Some(seq), _) => seq,
            (None, Some(alias)) if !alias.as_str().trim().is_empty() => alias.as_str().trim().to_string(),
            (None, _) => "[unlinked]".to_string(),
        }
    });
    let scrubbed = MARKDOWN_IMAGE.replace_all(&scrubbed, "");
    MARKDOWN_LINK.replace_all(&scrubbed, "$1").trim().to_string()
}

/// Raw link targets of a map of content: declared links, then any wikilinks in
/// the body not already declared
pub fn outline_links(moc: &Note) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut links = Vec::new();
    let body_links = WIKILINK
        .captures_iter(&moc.content)
        .filter(|caps| caps[1].is_empty())
        .map(|caps| caps[2].to_string());

    for link in moc.links.iter().cloned().chain(body_links) {
        let normalized = normalize_link_path(&link);
        if normalized.is_empty() || seen.contains(&normalized) {
            continue;
        }
        seen.push(normalized);
        links.push(link);
    }
    links
}
