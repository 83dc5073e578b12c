//! Function-mode harness generation.

use arena_core::domain::Signature;

use crate::error::{JudgeError, Result};

const TEMPLATE: &str = include_str!("../assets/harness.py");
const CLASS_PLACEHOLDER: &str = "{CLASS_NAME}";
const METHOD_PLACEHOLDER: &str = "{METHOD_NAME}";

/// Languages the harness can drive.
pub fn is_supported_language(language: &str) -> bool {
    language.trim().eq_ignore_ascii_case("python")
}

/// Fills the harness template with the signature's class and function names.
///
/// Both names are spliced into source code, so anything other than a plain
/// identifier is rejected.
pub fn render(signature: &Signature) -> Result<String> {
    if !is_supported_language(&signature.language) {
        return Err(JudgeError::UnsupportedLanguage(signature.language.clone()));
    }
    ensure_identifier("class_name", &signature.class_name)?;
    ensure_identifier("function_name", &signature.function_name)?;

    Ok(TEMPLATE
        .replace(CLASS_PLACEHOLDER, &signature.class_name)
        .replace(METHOD_PLACEHOLDER, &signature.function_name))
}

fn ensure_identifier(field: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(JudgeError::InvalidSignature(format!(
            "{field} {name:?} is not a valid identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(language: &str, class_name: &str, function_name: &str) -> Signature {
        Signature {
            language: language.to_string(),
            class_name: class_name.to_string(),
            function_name: function_name.to_string(),
            parameters: Vec::new(),
            return_type: String::new(),
        }
    }

    #[test]
    fn substitutes_names() {
        let harness = render(&signature("python", "Solution", "twoSum")).expect("render");

        assert!(harness.contains(r#"METHOD_NAME = "twoSum""#));
        assert!(harness.contains(r#"CLASS_NAME = "Solution""#));
        assert!(!harness.contains(METHOD_PLACEHOLDER));
        assert!(!harness.contains(CLASS_PLACEHOLDER));
    }

    #[test]
    fn rejects_code_injection_in_names() {
        let err = render(&signature("python", "Solution", "f\"); import os; (\""))
            .expect_err("should reject");
        assert!(matches!(err, JudgeError::InvalidSignature(_)));

        let err = render(&signature("python", "1Solution", "f")).expect_err("should reject");
        assert!(matches!(err, JudgeError::InvalidSignature(_)));
    }

    #[test]
    fn rejects_unsupported_language() {
        let err = render(&signature("cpp", "Solution", "f")).expect_err("should reject");
        assert!(matches!(err, JudgeError::UnsupportedLanguage(lang) if lang == "cpp"));
        assert!(is_supported_language(" Python "));
    }
}
