//! Project name and package name normalization.

use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9\-*~][a-z0-9\-*._~]*/)?[a-z0-9\-~][a-z0-9\-._~]*$")
        .expect("package name pattern is valid")
});

/// Trim a target directory argument and strip trailing slashes.
///
/// `"."` survives untouched and means the current directory.
pub fn format_target_dir(raw: Option<&str>) -> Option<String> {
    raw.map(|value| {
        value
            .trim_start()
            .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
            .to_string()
    })
}

/// Whether `name` is acceptable as the `name` field of a package.json.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME_PATTERN.is_match(name)
}

/// Derive a valid package name from an arbitrary project name.
pub fn to_valid_package_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut dashed = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                dashed.push('-');
            }
            in_whitespace = true;
        } else {
            dashed.push(ch);
            in_whitespace = false;
        }
    }

    let stripped = dashed
        .strip_prefix('.')
        .or_else(|| dashed.strip_prefix('_'))
        .unwrap_or(&dashed);

    let mut out = String::with_capacity(stripped.len());
    let mut in_invalid_run = false;
    for ch in stripped.chars() {
        if matches!(ch, 'a'..='z' | '0'..='9' | '-' | '~') {
            out.push(ch);
            in_invalid_run = false;
        } else {
            if !in_invalid_run {
                out.push('-');
            }
            in_invalid_run = true;
        }
    }

    out
}

/// Lexically normalize a `/`-separated path.
///
/// Repeated separators collapse, `.` segments drop, `..` cancels a preceding
/// normal segment and a trailing separator survives. An empty result is `.`.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut out = segments.join("/");
    if out.is_empty() && !absolute {
        out.push('.');
    }
    if trailing && !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    if absolute {
        out.insert(0, '/');
    }

    out
}

/// A path is valid when normalizing it changes nothing.
pub fn is_path_valid(path: &str) -> bool {
    normalize_path(path) == path
}
