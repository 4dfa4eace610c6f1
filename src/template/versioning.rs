//! Alias and version number derivation

use super::types::{TemplateError, TemplateResult, TemplateVersion};

/// Build the external alias for a template version.
///
/// Lower-cases the name, turns spaces into hyphens and appends `-v<version>`.
/// Names differing only in punctuation or case can collide.
pub fn build_alias(name: &str, version: u32) -> String {
    format!("{}-v{}", name.to_lowercase().replace(' ', "-"), version)
}

/// Next version number for a family: highest existing number plus one.
pub fn next_version(history: &[TemplateVersion]) -> TemplateResult<u32> {
    history
        .iter()
        .map(|v| v.version_number)
        .max()
        .map(|max| max + 1)
        .ok_or_else(|| {
            TemplateError::Sequencing("cannot sequence a family with no versions".to_string())
        })
}
