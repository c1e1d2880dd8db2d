//! Template catalog.
//!
//! The catalog is a two-level table: frameworks, each holding template
//! variants. [`Catalog::build`] filters the static definition once, and every
//! listing or lookup reads from that filtered result, so a variant is offered
//! exactly when it can be resolved to a source.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Where a variant's files come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// Folder name under `templates/`, embedded in the binary
    Local(&'static str),
    /// Repository identifier, `owner/name[#ref]`
    Remote(&'static str),
}

/// Static definition of a variant, before filtering.
#[derive(Debug, Clone, Copy)]
pub struct VariantDef {
    pub id: &'static str,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    /// `None` marks a variant that has not been published yet
    pub source: Option<TemplateSource>,
    pub disabled: bool,
}

/// Static definition of a framework, before filtering.
#[derive(Debug, Clone, Copy)]
pub struct FrameworkDef {
    pub id: &'static str,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub disabled: bool,
    pub variants: &'static [VariantDef],
}

impl VariantDef {
    pub fn is_selectable(&self) -> bool {
        !self.disabled && self.source.is_some()
    }
}

/// A selectable template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariant {
    pub id: &'static str,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub source: TemplateSource,
}

/// A framework with at least one selectable variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framework {
    pub id: &'static str,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub variants: Vec<TemplateVariant>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    frameworks: Vec<Framework>,
    /// variant id -> (framework index, variant index)
    index: HashMap<&'static str, (usize, usize)>,
}

impl Catalog {
    /// Filter `definition` into a catalog.
    ///
    /// Disabled frameworks, disabled or sourceless variants, and frameworks
    /// left without variants are dropped. Variant ids must be unique.
    pub fn build(definition: &[FrameworkDef]) -> Self {
        let mut frameworks = Vec::new();
        let mut index = HashMap::new();

        for def in definition.iter().filter(|f| !f.disabled) {
            let variants: Vec<TemplateVariant> = def
                .variants
                .iter()
                .filter(|v| v.is_selectable())
                .filter_map(|v| {
                    v.source.map(|source| TemplateVariant {
                        id: v.id,
                        label: v.label,
                        hint: v.hint,
                        source,
                    })
                })
                .collect();

            if variants.is_empty() {
                continue;
            }

            let framework_idx = frameworks.len();
            for (variant_idx, variant) in variants.iter().enumerate() {
                let previous = index.insert(variant.id, (framework_idx, variant_idx));
                debug_assert!(previous.is_none(), "duplicate template id {}", variant.id);
            }

            frameworks.push(Framework {
                id: def.id,
                label: def.label,
                hint: def.hint,
                variants,
            });
        }

        Self { frameworks, index }
    }

    /// Frameworks offered to the user, in definition order.
    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    pub fn framework(&self, id: &str) -> Option<&Framework> {
        self.frameworks.iter().find(|f| f.id == id)
    }

    pub fn variant(&self, id: &str) -> Option<&TemplateVariant> {
        let &(f, v) = self.index.get(id)?;
        Some(&self.frameworks[f].variants[v])
    }

    /// Source of a selectable variant; `None` means "not generatable".
    pub fn find_source_by_id(&self, id: &str) -> Option<TemplateSource> {
        self.variant(id).map(|v| v.source)
    }

    /// Every offered variant id, in catalog order.
    pub fn template_ids(&self) -> Vec<&'static str> {
        self.frameworks
            .iter()
            .flat_map(|f| f.variants.iter().map(|v| v.id))
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

pub const DEFINITION: &[FrameworkDef] = &[
    FrameworkDef {
        id: "react",
        label: "React",
        hint: None,
        disabled: false,
        variants: &[
            VariantDef {
                id: "react-admin",
                label: "Admin Dashboard System",
                hint: Some("back-office console"),
                source: Some(TemplateSource::Remote("binghuis/template-react-desktop")),
                disabled: false,
            },
            VariantDef {
                id: "react-desktop",
                label: "Desktop Web App",
                hint: Some("offline starter"),
                source: Some(TemplateSource::Local("template-react-desktop")),
                disabled: false,
            },
        ],
    },
    FrameworkDef {
        id: "nextjs",
        label: "NextJs",
        hint: None,
        disabled: false,
        variants: &[VariantDef {
            id: "nextjs-app",
            label: "Web App (SSR)",
            hint: None,
            source: Some(TemplateSource::Remote("binghuis/template-nextjs")),
            disabled: false,
        }],
    },
    FrameworkDef {
        id: "vue",
        label: "Vue",
        hint: None,
        disabled: false,
        variants: &[VariantDef {
            id: "vue-big-screen",
            label: "Big Screen (Echarts)",
            hint: None,
            source: None,
            disabled: true,
        }],
    },
    FrameworkDef {
        id: "docs",
        label: "Docs",
        hint: Some("documentation sites"),
        disabled: false,
        variants: &[VariantDef {
            id: "astro-docs",
            label: "Astro",
            hint: None,
            source: None,
            disabled: false,
        }],
    },
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog::build(DEFINITION));

/// The catalog shipped with this tool.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}
