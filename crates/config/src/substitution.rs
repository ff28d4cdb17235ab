use anyhow::Result;
use regex::{Captures, Regex};
use std::env;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("placeholder pattern is valid")
    })
}

/// Result of environment substitution over a config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substituted {
    pub content: String,
    /// Referenced variables that were not set, in order of first use
    pub missing: Vec<String>,
}

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
///
/// Unset variables keep their placeholder and are listed in
/// [`Substituted::missing`] so validation can report them.
pub fn substitute_env_vars(content: &str) -> Result<Substituted> {
    let mut missing: Vec<String> = Vec::new();

    let result = placeholder_regex().replace_all(content, |caps: &Captures| {
        let Some(var_name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
            return caps[0].to_string();
        };

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {}", var_name);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                if !missing.iter().any(|m| m == var_name) {
                    missing.push(var_name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    Ok(Substituted {
        content: result.into_owned(),
        missing,
    })
}

/// Check whether `value` still holds the placeholder for `var_name`
///
/// Matches `${VAR}` and `$VAR`, but not `$VAR` as the prefix of a longer name.
pub fn contains_placeholder(value: &str, var_name: &str) -> bool {
    placeholder_regex().captures_iter(value).any(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .is_some_and(|m| m.as_str() == var_name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_both_forms() {
        env::set_var("BALLOTS_TEST_SUB_HOST", "db.internal");
        env::set_var("BALLOTS_TEST_SUB_PORT", "27017");

        let out = substitute_env_vars("uri: mongodb://${BALLOTS_TEST_SUB_HOST}:$BALLOTS_TEST_SUB_PORT")
            .unwrap();
        assert_eq!(out.content, "uri: mongodb://db.internal:27017");
        assert!(out.missing.is_empty());
    }

    #[test]
    fn test_unset_variable_kept_and_reported() {
        env::remove_var("BALLOTS_TEST_SUB_UNSET");

        let out = substitute_env_vars("a: ${BALLOTS_TEST_SUB_UNSET}\nb: $BALLOTS_TEST_SUB_UNSET\n")
            .unwrap();
        assert_eq!(out.content, "a: ${BALLOTS_TEST_SUB_UNSET}\nb: $BALLOTS_TEST_SUB_UNSET\n");
        assert_eq!(out.missing, vec!["BALLOTS_TEST_SUB_UNSET".to_string()]);
    }

    #[test]
    fn test_longer_name_not_clobbered() {
        env::set_var("BALLOTS_TEST_SUB_A", "short");
        env::remove_var("BALLOTS_TEST_SUB_AB");

        let out = substitute_env_vars("$BALLOTS_TEST_SUB_AB $BALLOTS_TEST_SUB_A").unwrap();
        assert_eq!(out.content, "$BALLOTS_TEST_SUB_AB short");
    }

    #[test]
    fn test_plain_text_untouched() {
        let out = substitute_env_vars("port: 8080").unwrap();
        assert_eq!(out.content, "port: 8080");
        assert!(out.missing.is_empty());
    }

    #[test]
    fn test_contains_placeholder() {
        assert!(contains_placeholder("${API_KEY}", "API_KEY"));
        assert!(contains_placeholder("prefix-$API_KEY", "API_KEY"));
        assert!(!contains_placeholder("$API_KEY_2", "API_KEY"));
        assert!(!contains_placeholder("Xk9$pQ2w", "API_KEY"));
    }
}
