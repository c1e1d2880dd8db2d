//! Project generation workflow.
//!
//! One run walks a fixed sequence: pick the target directory, derive the
//! package name, confirm overwriting, resolve the template, clear, copy or
//! fetch, patch `package.json`, report. Every question goes through a
//! [`Prompter`]; a cancelled question ends the run with
//! [`Outcome::Cancelled`] before anything has been removed or written.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, TemplateSource, TemplateVariant};
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::fetch::TemplateFetcher;
use crate::manifest::{self, MANIFEST_FILE};
use crate::package_manager::PackageManager;
use crate::prompt::{Prompter, SelectOption, SelectPrompt, TextPrompt, YesNoPrompt};
use crate::utils::dir::{absolutize, are_directories_equal, clean_dir, is_empty_dir};
use crate::utils::io::io_error;
use crate::utils::naming::{
    format_target_dir, is_path_valid, is_valid_package_name, to_valid_package_name,
};
use crate::templates;
use crate::utils::shell;

pub const CANCELLED_MESSAGE: &str = "Operation cancelled";

/// Raw command-line input for one run.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub target_dir: Option<String>,
    pub template: Option<String>,
}

/// Everything decided before the first write.
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    pub target: PathBuf,
    /// Target as typed (normalized), `.` for the working directory
    pub relative: String,
    pub is_cwd: bool,
    pub package_name: String,
    pub overwrite: bool,
    pub template: TemplateVariant,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub target: String,
    pub relative: String,
    pub package_name: String,
    pub template_id: String,
    pub manifest_patched: bool,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Generated(GenerationReport),
    Cancelled,
    /// The chosen template has no published source yet.
    Unavailable(String),
}

/// Runs the workflow against injected collaborators.
pub struct Generator<'a> {
    cwd: PathBuf,
    catalog: &'a Catalog,
    prompter: &'a mut dyn Prompter,
    fetcher: &'a dyn TemplateFetcher,
    defaults: &'a Defaults,
    package_manager: PackageManager,
}

/// Unwrap an answer or end the run as cancelled.
macro_rules! answer_or_cancel {
    ($self:ident, $answer:expr) => {
        match $answer {
            Some(value) => value,
            None => return $self.cancel(),
        }
    };
}

impl<'a> Generator<'a> {
    pub fn new(
        cwd: impl Into<PathBuf>,
        catalog: &'a Catalog,
        prompter: &'a mut dyn Prompter,
        fetcher: &'a dyn TemplateFetcher,
        defaults: &'a Defaults,
    ) -> Self {
        let cwd = cwd.into();
        let cwd = absolutize(&cwd, Path::new("."));
        Self {
            cwd,
            catalog,
            prompter,
            fetcher,
            defaults,
            package_manager: PackageManager::detect(defaults.package_manager),
        }
    }

    /// Override the package manager used for the next-step commands.
    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn run(&mut self, request: GenerationRequest) -> Result<Outcome> {
        // 1. Target directory
        let relative = match format_target_dir(request.target_dir.as_deref()).filter(|s| !s.is_empty()) {
            Some(dir) => dir,
            None => answer_or_cancel!(self, self.ask_project_name()?),
        };
        let target = absolutize(&self.cwd, Path::new(&relative));
        let is_cwd = are_directories_equal(&target, &self.cwd);

        // 2. Package name from the basename
        let derived_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.defaults.default_target_dir.clone());

        // 3. Overwrite check
        let overwrite = if target.exists() {
            if !target.is_dir() {
                return Err(Error::validation_invalid_argument(
                    "target_dir",
                    "Target exists and is not a directory",
                    Some(target.display().to_string()),
                    None,
                ));
            }
            if is_empty_dir(&target)? {
                false
            } else {
                let confirmed = answer_or_cancel!(self, self.confirm_overwrite(&relative, is_cwd)?);
                if !confirmed {
                    return self.cancel();
                }
                true
            }
        } else {
            fs::create_dir_all(&target).map_err(|e| io_error(e, "create directory", &target))?;
            false
        };

        // 3a. Package name override
        let package_name = if is_valid_package_name(&derived_name) {
            derived_name
        } else {
            answer_or_cancel!(self, self.ask_package_name(&derived_name)?)
        };

        // 4. Template
        let template_id = answer_or_cancel!(self, self.resolve_template(request.template.as_deref())?);
        let Some(template) = self.catalog.variant(&template_id).cloned() else {
            self.prompter
                .warn(&format!("Template \"{}\" is not published yet.", template_id))?;
            return Ok(Outcome::Unavailable(template_id));
        };

        let plan = ResolvedPlan {
            target,
            relative,
            is_cwd,
            package_name,
            overwrite,
            template,
        };

        self.generate(&plan)
    }

    /// Steps 5 to 8 for a fully resolved plan.
    pub fn generate(&mut self, plan: &ResolvedPlan) -> Result<Outcome> {
        if plan.overwrite {
            clean_dir(&plan.target)?;
        }

        match plan.template.source {
            TemplateSource::Local(folder) => {
                let override_dir = self.defaults.templates_dir();
                templates::copy_local_template(folder, override_dir.as_deref(), &plan.target)?;
            }
            TemplateSource::Remote(repo) => {
                self.prompter.message(&format!("Fetching template {}...", repo))?;
                self.fetcher.fetch(repo, &plan.target)?;
            }
        }

        let manifest_patched = manifest::patch_manifest(
            &plan.target,
            &plan.package_name,
            self.defaults.manifest_version.as_deref(),
        )?;
        if !manifest_patched {
            log_status!("generate", "No {} in template, skipping rename", MANIFEST_FILE);
        }

        let next_steps = self.next_steps(plan);
        self.prompter.message("")?;
        self.prompter.message("Done. Now run:")?;
        self.prompter.message("")?;
        for line in &next_steps {
            self.prompter.message(&format!("  {}", line))?;
        }
        self.prompter.message("")?;

        Ok(Outcome::Generated(GenerationReport {
            target: plan.target.display().to_string(),
            relative: plan.relative.clone(),
            package_name: plan.package_name.clone(),
            template_id: plan.template.id.to_string(),
            manifest_patched,
            next_steps,
        }))
    }

    fn next_steps(&self, plan: &ResolvedPlan) -> Vec<String> {
        let mut steps = Vec::new();
        if !plan.is_cwd {
            let relative = pathdiff(&plan.target, &self.cwd);
            steps.push(shell::cd_command(&relative));
        }
        steps.push(self.package_manager.install_command().to_string());
        steps.push(self.package_manager.dev_command().to_string());
        steps
    }

    fn cancel(&mut self) -> Result<Outcome> {
        self.prompter.warn(CANCELLED_MESSAGE)?;
        Ok(Outcome::Cancelled)
    }

    fn ask_project_name(&mut self) -> Result<Option<String>> {
        let answer = self.prompter.text(&TextPrompt {
            question: "Project name:".to_string(),
            default: Some(self.defaults.default_target_dir.clone()),
            validate: Some(validate_project_name),
        })?;

        Ok(answer.and_then(|name| format_target_dir(Some(&name))))
    }

    fn confirm_overwrite(&mut self, relative: &str, is_cwd: bool) -> Result<Option<bool>> {
        let question = if is_cwd {
            "Current directory is not empty. Remove existing files and continue?".to_string()
        } else {
            format!(
                "Target directory \"{}\" is not empty. Remove existing files and continue?",
                relative
            )
        };

        self.prompter.confirm(&YesNoPrompt {
            question,
            default: false,
        })
    }

    fn ask_package_name(&mut self, derived: &str) -> Result<Option<String>> {
        self.prompter.text(&TextPrompt {
            question: "Package name:".to_string(),
            default: Some(to_valid_package_name(derived)),
            validate: Some(validate_package_name),
        })
    }

    /// Template id: the requested one when offered, otherwise picked
    /// framework first, then variant.
    fn resolve_template(&mut self, requested: Option<&str>) -> Result<Option<String>> {
        let requested = requested.map(str::trim).unwrap_or_default();
        if self.catalog.contains(requested) {
            return Ok(Some(requested.to_string()));
        }

        let question = if requested.is_empty() {
            "Select a framework:".to_string()
        } else {
            format!(
                "Template \"{}\" not found. Choose from the templates below:",
                requested
            )
        };

        let catalog = self.catalog;
        let framework_options = catalog
            .frameworks()
            .iter()
            .map(|f| SelectOption {
                value: f.id.to_string(),
                label: f.label.to_string(),
                hint: f.hint.map(str::to_string),
            })
            .collect();

        let Some(framework_id) = self.prompter.select(&SelectPrompt {
            question,
            options: framework_options,
            default_index: None,
        })?
        else {
            return Ok(None);
        };

        let Some(framework) = catalog.framework(&framework_id) else {
            return Err(Error::template_not_found(framework_id, None));
        };

        let variant_options = framework
            .variants
            .iter()
            .map(|v| SelectOption {
                value: v.id.to_string(),
                label: v.label.to_string(),
                hint: v.hint.map(str::to_string),
            })
            .collect();

        self.prompter.select(&SelectPrompt {
            question: "Select a project template:".to_string(),
            options: variant_options,
            default_index: None,
        })
    }
}

fn validate_project_name(value: &str) -> std::result::Result<(), String> {
    match format_target_dir(Some(value)) {
        Some(dir) if !dir.is_empty() && is_path_valid(&dir) => Ok(()),
        _ => Err("Project name contains invalid path characters".to_string()),
    }
}

fn validate_package_name(value: &str) -> std::result::Result<(), String> {
    if is_valid_package_name(value) {
        Ok(())
    } else {
        Err("Invalid package.json name".to_string())
    }
}

/// `target` relative to `base`, both absolute and normalized.
fn pathdiff(target: &Path, base: &Path) -> String {
    let target: Vec<_> = target.components().collect();
    let base: Vec<_> = base.components().collect();
    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); base.len() - common];
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
