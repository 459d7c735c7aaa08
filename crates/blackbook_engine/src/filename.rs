use sha2::{Digest, Sha256};

const MAX_STEM_LEN: usize = 80;
const DEFAULT_EXTENSION: &str = "docx";

/// Local name for a generated document.
///
/// Uses the backend's `file_name`, else the last segment of `download_url`,
/// else `blackbook--{short_hash(download_url)}.docx`. The result is safe on
/// Windows and stable for the same inputs.
pub fn download_file_name(file_name: &str, download_url: &str) -> String {
    let candidate = if file_name.trim().is_empty() {
        last_segment(download_url)
    } else {
        file_name.trim()
    };

    let (stem, ext) = split_extension(candidate);
    let stem = sanitize_stem(stem);
    match (stem, ext) {
        (Some(stem), Some(ext)) => format!("{stem}.{ext}"),
        (Some(stem), None) => format!("{stem}.{DEFAULT_EXTENSION}"),
        (None, ext) => format!(
            "blackbook--{}.{}",
            short_hash(download_url),
            ext.unwrap_or(DEFAULT_EXTENSION)
        ),
    }
}

fn last_segment(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query.rsplit('/').next().unwrap_or("")
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (stem, Some(ext))
        }
        _ => (name, None),
    }
}

fn sanitize_stem(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        return None;
    }

    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    let mut stem: String = compacted.chars().take(MAX_STEM_LEN).collect();
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    Some(stem)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::download_file_name;

    #[test]
    fn backend_name_is_kept() {
        assert_eq!(
            download_file_name("Smart_Attendance_blackbook.docx", "/api/download/x.docx"),
            "Smart_Attendance_blackbook.docx"
        );
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(
            download_file_name("report: final?.pdf", ""),
            "report_ final.pdf"
        );
        assert_eq!(download_file_name("con.docx", ""), "con_.docx");
    }

    #[test]
    fn falls_back_to_url_segment() {
        assert_eq!(
            download_file_name("", "/api/download/Bookshelf.zip?t=1"),
            "Bookshelf.zip"
        );
    }

    #[test]
    fn hashes_when_nothing_usable() {
        let name = download_file_name("", "/api/download/");
        assert!(name.starts_with("blackbook--"));
        assert!(name.ends_with(".docx"));
        assert_eq!(name, download_file_name("  ", "/api/download/"));
        assert_eq!(name.len(), "blackbook--".len() + 8 + ".docx".len());
    }
}
