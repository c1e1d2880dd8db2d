//! Local templates.
//!
//! Every `templates/template-*` folder is compiled into the binary. A
//! `templates_dir` from config can shadow a folder with an on-disk copy;
//! folders missing there still come from the embedded tree.

use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir, DirEntry};

use crate::error::{Error, Result};
use crate::manifest::MANIFEST_FILE;
use crate::utils::dir::copy_tree;
use crate::utils::io::io_error;

static EMBEDDED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Template files stored under an underscore name and renamed on copy.
const RENAMED_FILES: &[(&str, &str)] = &[
    ("_gitignore", ".gitignore"),
    ("_npmrc", ".npmrc"),
    ("_prettierignore", ".prettierignore"),
    ("_eslintignore", ".eslintignore"),
];

pub fn is_embedded(folder: &str) -> bool {
    EMBEDDED.get_dir(folder).is_some()
}

/// Copy template `folder` into `target`.
///
/// Top-level underscore ignore files get their dotted names and
/// `package.json` is written last.
pub fn copy_local_template(folder: &str, override_dir: Option<&Path>, target: &Path) -> Result<()> {
    if let Some(root) = override_dir {
        let dir = root.join(folder);
        if dir.is_dir() {
            return copy_from_disk(&dir, target);
        }
        log_status!(
            "templates",
            "{} not in {}, using the built-in copy",
            folder,
            root.display()
        );
    }

    let Some(dir) = EMBEDDED.get_dir(folder) else {
        return Err(Error::template_not_found(
            folder,
            override_dir.map(|root| root.join(folder).display().to_string()),
        ));
    };
    copy_embedded(dir, target)
}

fn dest_name(name: &str) -> &str {
    RENAMED_FILES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name)
}

/// Alphabetical, with the manifest moved to the end.
fn copy_order<T>(items: &mut [(String, T)]) {
    items.sort_by(|a, b| a.0.cmp(&b.0));
    items.sort_by_key(|(name, _)| name == MANIFEST_FILE);
}

fn copy_from_disk(template_dir: &Path, target: &Path) -> Result<()> {
    let mut names: Vec<(String, ())> = fs::read_dir(template_dir)
        .map_err(|e| io_error(e, "read directory", template_dir))?
        .map(|entry| {
            entry
                .map(|e| (e.file_name().to_string_lossy().into_owned(), ()))
                .map_err(|e| io_error(e, "read directory", template_dir))
        })
        .collect::<Result<_>>()?;
    copy_order(&mut names);

    for (name, _) in names {
        copy_tree(&template_dir.join(&name), &target.join(dest_name(&name)))?;
    }

    Ok(())
}

fn copy_embedded(dir: &Dir<'static>, target: &Path) -> Result<()> {
    let mut entries = dir
        .entries()
        .iter()
        .map(|entry| Ok((entry_name(entry)?, entry)))
        .collect::<Result<Vec<_>>>()?;
    copy_order(&mut entries);

    for (name, entry) in entries {
        write_embedded(entry, &target.join(dest_name(&name)))?;
    }

    Ok(())
}

fn entry_name(entry: &DirEntry<'_>) -> Result<String> {
    entry
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::internal_unexpected(format!(
                "Embedded template entry has no name: {}",
                entry.path().display()
            ))
        })
}

fn write_embedded(entry: &DirEntry<'_>, dest: &Path) -> Result<()> {
    match entry {
        DirEntry::Dir(dir) => {
            fs::create_dir_all(dest).map_err(|e| io_error(e, "create directory", dest))?;
            for child in dir.entries() {
                write_embedded(child, &dest.join(entry_name(child)?))?;
            }
        }
        DirEntry::File(file) => {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error(e, "create directory", parent))?;
            }
            fs::write(dest, file.contents()).map_err(|e| io_error(e, "write", dest))?;
        }
    }
    Ok(())
}
