use hotpot::catalog::{self, Catalog};

use super::CmdResult;

pub fn run() -> CmdResult<String> {
    Ok((render(catalog::builtin()), 0))
}

/// Frameworks with their templates, one template id per line.
pub fn render(catalog: &Catalog) -> String {
    let width = catalog
        .template_ids()
        .iter()
        .map(|id| id.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for framework in catalog.frameworks() {
        match framework.hint {
            Some(hint) => out.push_str(&format!("{} ({})\n", framework.label, hint)),
            None => out.push_str(&format!("{}\n", framework.label)),
        }
        for variant in &framework.variants {
            let line = match variant.hint {
                Some(hint) => format!("  {:width$}  {} - {}", variant.id, variant.label, hint),
                None => format!("  {:width$}  {}", variant.id, variant.label),
            };
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_offered_template() {
        let text = render(catalog::builtin());
        for id in catalog::builtin().template_ids() {
            assert!(text.contains(id), "{id} missing from listing");
        }
        assert!(!text.contains("vue-big-screen"));
    }
}
