//! Prompt Loader - load a custom audit template from disk

use std::path::Path;

use super::template::{AUDIT_TEMPLATE, FALLBACK_TEMPLATE};
use crate::error::{AuditError, Result};

/// Load the audit template
///
/// Without a path the built-in template is used. A file that exists but is
/// blank falls back to the minimal question/history/tools template.
pub fn load_template(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(AUDIT_TEMPLATE.to_string());
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        AuditError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to load template from {:?}: {}", path, e),
        ))
    })?;

    if content.trim().is_empty() {
        log::warn!("Template {} is empty, using fallback template", path.display());
        return Ok(FALLBACK_TEMPLATE.to_string());
    }

    log::info!("Loaded prompt template from {}", path.display());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_when_no_path() {
        assert_eq!(load_template(None).unwrap(), AUDIT_TEMPLATE);
    }

    #[test]
    fn test_load_custom_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.txt");
        fs::write(&path, "审计: {question}").unwrap();

        assert_eq!(load_template(Some(&path)).unwrap(), "审计: {question}");
    }

    #[test]
    fn test_empty_file_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(load_template(Some(&path)).unwrap(), FALLBACK_TEMPLATE);
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = load_template(Some(&dir.path().join("nope.txt")));

        let err = result.unwrap_err();
        assert!(matches!(err, AuditError::Io(_)));
        assert!(err.to_string().contains("nope.txt"));
    }
}
