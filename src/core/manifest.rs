//! `package.json` patching.
//!
//! Only `name` and `version` are touched. Key order and the template's
//! indentation are kept (two spaces when none can be detected), and the
//! written file always ends with a newline.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, ErrorCode, Result};
use crate::utils::io;

pub const MANIFEST_FILE: &str = "package.json";

const DEFAULT_INDENT: &str = "  ";

/// Set `name` (and `version`, when given) in `dir/package.json`.
///
/// Returns `Ok(false)` when the directory has no manifest.
pub fn patch_manifest(dir: &Path, name: &str, version: Option<&str>) -> Result<bool> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Ok(false);
    }

    let content = io::read_file(&path, "read manifest")?;
    let patched = patch_content(&content, name, version, &path.display().to_string())?;
    io::write_file_atomic(&path, &patched, "write manifest")?;

    Ok(true)
}

/// Apply the patch to manifest text. `origin` names the file in errors.
pub fn patch_content(content: &str, name: &str, version: Option<&str>, origin: &str) -> Result<String> {
    let mut manifest: Value =
        serde_json::from_str(content).map_err(|e| Error::manifest_invalid_json(origin, e))?;

    let Some(fields) = manifest.as_object_mut() else {
        return Err(Error::new(
            ErrorCode::ManifestInvalidJson,
            "package.json is not a JSON object",
            serde_json::json!({ "path": origin }),
        ));
    };

    fields.insert("name".to_string(), Value::String(name.to_string()));
    if let Some(version) = version {
        fields.insert("version".to_string(), Value::String(version.to_string()));
    }

    let mut out = to_pretty(&manifest, &detect_indent(content))?;
    out.push('\n');
    Ok(out)
}

/// Indentation of the first indented line, or two spaces.
fn detect_indent(content: &str) -> String {
    content
        .lines()
        .skip(1)
        .find_map(|line| {
            let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
            (!indent.is_empty()).then_some(indent)
        })
        .unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

fn to_pretty(value: &Value, indent: &str) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize manifest".to_string())))?;

    String::from_utf8(buf)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize manifest".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TEMPLATE: &str = r#"{
  "name": "template-react-desktop",
  "private": true,
  "version": "1.4.0",
  "scripts": {
    "dev": "vite"
  }
}
"#;

    #[test]
    fn patch_keeps_key_order_and_other_fields() {
        let patched = patch_content(TEMPLATE, "test-app", Some("0.0.1"), "package.json").unwrap();

        assert_eq!(
            patched,
            r#"{
  "name": "test-app",
  "private": true,
  "version": "0.0.1",
  "scripts": {
    "dev": "vite"
  }
}
"#
        );
    }

    #[test]
    fn version_is_left_alone_without_baseline() {
        let patched = patch_content(TEMPLATE, "x", None, "package.json").unwrap();
        assert!(patched.contains("\"version\": \"1.4.0\""));
    }

    #[test]
    fn missing_fields_are_added() {
        let patched = patch_content("{\"private\": true}", "x", Some("0.0.1"), "p").unwrap();
        let value: Value = serde_json::from_str(&patched).unwrap();
        assert_eq!(value["name"], "x");
        assert_eq!(value["version"], "0.0.1");
        assert!(patched.ends_with("}\n"));
        assert!(patched.contains("\n  \"private\": true"));
    }

    #[test]
    fn tab_indentation_is_preserved() {
        let patched = patch_content("{\n\t\"name\": \"a\"\n}\n", "b", None, "p").unwrap();
        assert_eq!(patched, "{\n\t\"name\": \"b\"\n}\n");
    }

    #[test]
    fn invalid_manifests_are_errors() {
        let err = patch_content("{ nope", "x", None, "p").unwrap_err();
        assert_eq!(err.code.as_str(), "manifest.invalid_json");

        let err = patch_content("[1, 2]", "x", None, "p").unwrap_err();
        assert_eq!(err.code.as_str(), "manifest.invalid_json");
    }

    #[test]
    fn patch_manifest_rewrites_file_in_place() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), TEMPLATE).unwrap();

        assert!(patch_manifest(dir.path(), "demo", Some("0.0.1")).unwrap());

        let value: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(value["name"], "demo");
    }

    #[test]
    fn patch_manifest_without_file_reports_false() {
        let dir = tempdir().unwrap();
        assert!(!patch_manifest(dir.path(), "demo", None).unwrap());
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }
}
