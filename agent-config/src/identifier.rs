//! Deployment name normalization.

use crate::{Error, Result};

/// Prefix added when a name does not start with a letter or underscore.
pub const IDENTIFIER_PREFIX: &str = "agent_";

/// Convert a deployment name into a bare identifier.
///
/// Hyphens become underscores, and `agent_` is prepended when the first
/// character is not an ASCII letter or `_`. Other characters pass through
/// unchanged.
pub fn internal_agent_name(deployment_name: &str) -> Result<String> {
    let name = deployment_name.replace('-', "_");

    let first = name.chars().next().ok_or_else(|| {
        Error::InvalidIdentifier("deployment name must not be empty".to_string())
    })?;

    if first.is_ascii_alphabetic() || first == '_' {
        Ok(name)
    } else {
        Ok(format!("{IDENTIFIER_PREFIX}{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphens_replaced() {
        assert_eq!(internal_agent_name("lux-map").unwrap(), "lux_map");
        assert_eq!(internal_agent_name("luxmap").unwrap(), "luxmap");
        assert_eq!(internal_agent_name("a-b-c").unwrap(), "a_b_c");
    }

    #[test]
    fn test_leading_digit_prefixed() {
        assert_eq!(internal_agent_name("123-map").unwrap(), "agent_123_map");
    }

    #[test]
    fn test_leading_hyphen_becomes_underscore() {
        // After replacement the name starts with `_`, which is allowed.
        assert_eq!(internal_agent_name("-map").unwrap(), "_map");
    }

    #[test]
    fn test_letter_or_underscore_keeps_prefix_status() {
        for name in ["Agent-1", "_private-agent", "z", "research-agent-v2"] {
            assert_eq!(internal_agent_name(name).unwrap(), name.replace('-', "_"));
        }
    }

    #[test]
    fn test_other_characters_pass_through() {
        assert_eq!(internal_agent_name("lux map!").unwrap(), "lux map!");
        assert_eq!(internal_agent_name(".hidden").unwrap(), "agent_.hidden");
        assert_eq!(internal_agent_name("émile").unwrap(), "agent_émile");
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = internal_agent_name("").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }
}
