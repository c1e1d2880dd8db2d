//! Remote template download.
//!
//! A remote source is a repository identifier, `owner/name` with an optional
//! `#ref` naming a branch or tag. It is fetched either as a zip archive over
//! HTTPS or with a shallow `git clone`; both leave the repository's files
//! directly in the destination directory, without any `.git` of their own.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults::{Defaults, FetchMethod};
use crate::error::{Error, Result};
use crate::git;
use crate::utils::dir::{copy_tree, create_symlink, GIT_DIR};
use crate::utils::naming::normalize_path;
use crate::utils::io::io_error;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Downloads a remote template into a directory.
pub trait TemplateFetcher {
    fn fetch(&self, repo: &str, dest: &Path) -> Result<()>;
}

/// Parsed repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub owner: String,
    pub name: String,
    pub reference: Option<String>,
}

impl RepoSpec {
    /// Parse `[github:]owner/name[#ref]`, where `ref` is a branch or tag.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |problem: &str| {
            Error::validation_invalid_argument(
                "template source",
                problem,
                Some(raw.to_string()),
                None,
            )
        };

        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("github:").unwrap_or(trimmed);
        let (path, reference) = match trimmed.split_once('#') {
            Some((path, reference)) if !reference.is_empty() => (path, Some(reference.to_string())),
            Some(_) => return Err(invalid("Empty reference after '#'")),
            None => (trimmed, None),
        };

        let Some((owner, name)) = path.split_once('/') else {
            return Err(invalid("Expected owner/name"));
        };

        for part in [owner, name] {
            let ok = !part.is_empty()
                && part != "."
                && part != ".."
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
            if !ok {
                return Err(invalid("Expected owner/name"));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            reference,
        })
    }

    fn repo_url(&self, base_url: &str) -> String {
        format!("{}/{}/{}", base_url.trim_end_matches('/'), self.owner, self.name)
    }

    /// `{base}/{owner}/{name}/archive/{ref or HEAD}.zip`
    pub fn archive_url(&self, base_url: &str) -> String {
        format!(
            "{}/archive/{}.zip",
            self.repo_url(base_url),
            self.reference.as_deref().unwrap_or("HEAD")
        )
    }

    pub fn clone_url(&self, base_url: &str) -> String {
        self.repo_url(base_url)
    }
}

// ============================================================================
// Archive download
// ============================================================================

pub struct ArchiveFetcher {
    base_url: String,
}

impl ArchiveFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl TemplateFetcher for ArchiveFetcher {
    fn fetch(&self, repo: &str, dest: &Path) -> Result<()> {
        let spec = RepoSpec::parse(repo)?;
        let url = spec.archive_url(&self.base_url);
        let failed = |error: String| Error::template_fetch_failed(repo, error, Some(url.clone()));

        log_status!("fetch", "Downloading {}", url);

        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("create-hotpot/{}", VERSION))
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| Error::internal_io(e.to_string(), Some("create HTTP client".to_string())))?;

        let response = client.get(&url).send().map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status)));
        }

        let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
        extract_archive(&bytes, dest)
    }
}

/// Unpack a repository zip into `dest`, dropping its single top-level folder.
///
/// Symlink entries become links, provided their target stays inside `dest`.
pub fn extract_archive(bytes: &[u8], dest: &Path) -> Result<()> {
    let archive_error =
        |e: zip::result::ZipError| Error::internal_io(e.to_string(), Some("read template archive".to_string()));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(archive_error)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_error)?;

        let enclosed = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            Error::internal_io(
                format!("Archive entry escapes destination: {}", entry.name()),
                Some("read template archive".to_string()),
            )
        })?;

        let relative: PathBuf = enclosed.components().skip(1).collect();
        if relative.as_os_str().is_empty() {
            continue;
        }
        let out_path = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| io_error(e, "create directory", &out_path))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(e, "create directory", parent))?;
        }

        if entry.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            let mut target = String::new();
            entry
                .read_to_string(&mut target)
                .map_err(|e| io_error(e, "read link target", &out_path))?;
            let link = contained_link_target(&relative, &target).ok_or_else(|| {
                Error::internal_io(
                    format!("Archive link escapes destination: {} -> {}", entry.name(), target),
                    Some("read template archive".to_string()),
                )
            })?;
            create_symlink(&link, &out_path)?;
            continue;
        }

        let mut out = fs::File::create(&out_path).map_err(|e| io_error(e, "create", &out_path))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| io_error(e, "write", &out_path))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                .map_err(|e| io_error(e, "set permissions", &out_path))?;
        }
    }

    Ok(())
}

/// `target` as a link path, if the link at `entry` (relative to the
/// extraction root) resolves to somewhere inside that root.
fn contained_link_target(entry: &Path, target: &str) -> Option<PathBuf> {
    if target.is_empty() || target.starts_with('/') {
        return None;
    }

    let parent = entry
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let joined = if parent.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", parent, target)
    };
    let resolved = normalize_path(&joined);
    (resolved != ".." && !resolved.starts_with("../")).then(|| PathBuf::from(target))
}

// ============================================================================
// Shallow clone
// ============================================================================

pub struct GitFetcher {
    base_url: String,
}

impl GitFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl TemplateFetcher for GitFetcher {
    fn fetch(&self, repo: &str, dest: &Path) -> Result<()> {
        let spec = RepoSpec::parse(repo)?;
        let url = spec.clone_url(&self.base_url);

        let staging = tempfile::tempdir()
            .map_err(|e| Error::internal_io(e.to_string(), Some("create staging directory".to_string())))?;
        let checkout = staging.path().join(&spec.name);

        log_status!("fetch", "Cloning {}", url);
        git::clone_shallow(&url, spec.reference.as_deref(), &checkout)?;

        fs::create_dir_all(dest).map_err(|e| io_error(e, "create directory", dest))?;
        for entry in fs::read_dir(&checkout).map_err(|e| io_error(e, "read directory", &checkout))? {
            let entry = entry.map_err(|e| io_error(e, "read directory", &checkout))?;
            if entry.file_name() == GIT_DIR {
                continue;
            }
            copy_tree(&entry.path(), &dest.join(entry.file_name()))?;
        }

        Ok(())
    }
}

/// Fetcher selected by the `fetch` setting.
pub fn fetcher_for(defaults: &Defaults) -> Box<dyn TemplateFetcher> {
    match defaults.fetch {
        FetchMethod::Archive => Box::new(ArchiveFetcher::new(defaults.archive_base_url.clone())),
        FetchMethod::Git => Box::new(GitFetcher::new(defaults.git_base_url.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::process::Command;
    use std::thread::{self, JoinHandle};
    use tempfile::tempdir;
    use zip::write::FileOptions;

    fn zip_bytes(entries: &[(&str, Option<&str>)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            match content {
                Some(content) => {
                    writer.start_file(*name, FileOptions::default()).unwrap();
                    writer.write_all(content.as_bytes()).unwrap();
                }
                None => writer.add_directory(*name, FileOptions::default()).unwrap(),
            }
        }
        writer.finish().unwrap().into_inner()
    }

    fn zip_with_link(link: &str, target: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("repo-main/", FileOptions::default()).unwrap();
        writer.start_file("repo-main/README.md", FileOptions::default()).unwrap();
        writer.write_all(b"readme").unwrap();
        writer.add_symlink(link, target, FileOptions::default()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Answer a single HTTP request, returning the base URL and a handle that
    /// yields the request line.
    fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }

            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
            request_line
        });

        (base, handle)
    }

    #[test]
    fn parse_plain_and_prefixed_specs() {
        let spec = RepoSpec::parse("binghuis/template-nextjs").unwrap();
        assert_eq!(spec.owner, "binghuis");
        assert_eq!(spec.name, "template-nextjs");
        assert_eq!(spec.reference, None);

        let spec = RepoSpec::parse("github:binghuis/template-nextjs#v2").unwrap();
        assert_eq!(spec.name, "template-nextjs");
        assert_eq!(spec.reference.as_deref(), Some("v2"));
    }

    #[test]
    fn parse_rejects_malformed_specs() {
        for raw in ["", "solo", "a/", "/b", "a/b/c", "a/b#", "../x", "a b/c"] {
            assert!(RepoSpec::parse(raw).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn archive_url_defaults_to_head() {
        let spec = RepoSpec::parse("o/r").unwrap();
        assert_eq!(
            spec.archive_url("https://github.com/"),
            "https://github.com/o/r/archive/HEAD.zip"
        );
        let spec = RepoSpec::parse("o/r#main").unwrap();
        assert_eq!(
            spec.archive_url("https://github.com"),
            "https://github.com/o/r/archive/main.zip"
        );
    }

    #[test]
    fn extract_archive_strips_top_level_folder() {
        let bytes = zip_bytes(&[
            ("template-abc123/", None),
            ("template-abc123/package.json", Some("{\"name\":\"t\"}")),
            ("template-abc123/src/", None),
            ("template-abc123/src/main.tsx", Some("export {}")),
        ]);
        let dest = tempdir().unwrap();

        extract_archive(&bytes, dest.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dest.path().join("package.json")).unwrap(),
            "{\"name\":\"t\"}"
        );
        assert!(dest.path().join("src/main.tsx").is_file());
        assert!(!dest.path().join("template-abc123").exists());
    }

    #[test]
    fn extract_archive_rejects_garbage() {
        let dest = tempdir().unwrap();
        let err = extract_archive(b"not a zip", dest.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[cfg(unix)]
    #[test]
    fn extract_archive_recreates_symlinks() {
        let bytes = zip_with_link("repo-main/docs", "README.md");
        let dest = tempdir().unwrap();

        extract_archive(&bytes, dest.path()).unwrap();

        let link = dest.path().join("docs");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("README.md"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "readme");
    }

    #[test]
    fn extract_archive_rejects_links_leaving_destination() {
        for target in ["../../etc/passwd", "/etc/passwd"] {
            let bytes = zip_with_link("repo-main/escape", target);
            let dest = tempdir().unwrap();

            let err = extract_archive(&bytes, dest.path()).unwrap_err();

            assert_eq!(err.code.as_str(), "internal.io_error");
            assert!(fs::symlink_metadata(dest.path().join("escape")).is_err());
        }
    }

    #[test]
    fn link_targets_are_resolved_from_the_link_directory() {
        assert!(contained_link_target(Path::new("a/b/link"), "../c").is_some());
        assert!(contained_link_target(Path::new("a/link"), ".").is_some());
        assert!(contained_link_target(Path::new("a/link"), "../../x").is_none());
        assert!(contained_link_target(Path::new("link"), "..").is_none());
        assert!(contained_link_target(Path::new("link"), "").is_none());
    }

    #[test]
    fn archive_fetcher_reports_http_failure_with_url() {
        let (base, server) = serve_once("404 Not Found", b"missing".to_vec());
        let dest = tempdir().unwrap();

        let err = ArchiveFetcher::new(base.clone())
            .fetch("o/r", dest.path())
            .unwrap_err();

        assert_eq!(err.code.as_str(), "template.fetch_failed");
        assert_eq!(err.details["repo"], "o/r");
        assert_eq!(err.details["url"], format!("{}/o/r/archive/HEAD.zip", base));
        assert!(err.details["error"].as_str().unwrap().contains("404"));
        assert!(server.join().unwrap().starts_with("GET /o/r/archive/HEAD.zip "));
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn archive_fetcher_downloads_and_extracts() {
        let body = zip_bytes(&[
            ("r-main/", None),
            ("r-main/package.json", Some("{\"name\":\"r\"}")),
            ("r-main/src/", None),
            ("r-main/src/index.ts", Some("export {}")),
        ]);
        let (base, server) = serve_once("200 OK", body);
        let dest = tempdir().unwrap();

        ArchiveFetcher::new(base).fetch("o/r#main", dest.path()).unwrap();

        assert!(server.join().unwrap().starts_with("GET /o/r/archive/main.zip "));
        assert_eq!(
            fs::read_to_string(dest.path().join("package.json")).unwrap(),
            "{\"name\":\"r\"}"
        );
        assert!(dest.path().join("src/index.ts").is_file());
    }

    #[test]
    fn git_fetcher_copies_checkout_without_git_dir() {
        let base = tempdir().unwrap();
        let origin = base.path().join("owner/template");
        fs::create_dir_all(origin.join("src")).unwrap();
        fs::write(origin.join("package.json"), "{}").unwrap();
        fs::write(origin.join("src/index.ts"), "export {}").unwrap();
        for args in [
            vec!["init", "--quiet"],
            vec!["add", "--all"],
            vec!["-c", "user.name=Test", "-c", "user.email=test@test.com", "commit", "--quiet", "-m", "init"],
        ] {
            let status = Command::new("git").args(&args).current_dir(&origin).status().unwrap();
            assert!(status.success());
        }

        let dest = tempdir().unwrap();
        fs::create_dir(dest.path().join(".git")).unwrap();
        fs::write(dest.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        let fetcher = GitFetcher::new(format!("file://{}", base.path().display()));
        fetcher.fetch("owner/template", dest.path()).unwrap();

        assert!(dest.path().join("package.json").is_file());
        assert!(dest.path().join("src/index.ts").is_file());
        assert_eq!(
            fs::read_to_string(dest.path().join(".git/HEAD")).unwrap(),
            "ref: refs/heads/main"
        );
    }

    #[test]
    fn fetcher_for_honours_setting() {
        let defaults = Defaults {
            fetch: FetchMethod::Git,
            git_base_url: "file:///nowhere".to_string(),
            ..Defaults::default()
        };
        let dest = tempdir().unwrap();
        let err = fetcher_for(&defaults).fetch("o/r", dest.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "git.command_failed");
    }
}
