//! `${...}` placeholder substitution.
//!
//! Expansion is soft: a reference that cannot be resolved produces a warning
//! and the literal token survives in the output, so a partially-resolved
//! config is still usable and the failures are greppable (`${secret:` etc.).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::env::EnvSource;
use crate::platform::Platform;
use crate::secrets::SecretTable;
use crate::values::OrderedMap;

/// Matches `${<expr>}` where `<expr>` is any run of non-`}` characters.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// A reference that could not be resolved during expansion. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    UnresolvedSecret { name: String },
    UnresolvedEnv { name: String },
    EnvFallback { name: String },
    UnresolvedVariable { name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedSecret { name } => write!(f, "Unresolved secret: {name}"),
            Self::UnresolvedEnv { name } => write!(f, "Unresolved env variable: {name}"),
            Self::EnvFallback { name } => write!(
                f,
                "\"${{{name}}}\" resolved via env fallback; use \"${{env:{name}}}\" for explicit env access"
            ),
            Self::UnresolvedVariable { name } => write!(f, "Unresolved variable: {name}"),
        }
    }
}

/// Substitutes placeholders against a variable table, a secret table, and an
/// environment, for one platform.
pub struct Expander<'a> {
    variables: &'a OrderedMap<String>,
    secrets: &'a SecretTable,
    platform: Platform,
    env: &'a dyn EnvSource,
}

impl<'a> Expander<'a> {
    pub fn new(
        variables: &'a OrderedMap<String>,
        secrets: &'a SecretTable,
        platform: Platform,
        env: &'a dyn EnvSource,
    ) -> Self {
        Self {
            variables,
            secrets,
            platform,
            env,
        }
    }

    /// Replace every `${...}` occurrence in a single left-to-right pass.
    ///
    /// Replacement text is not rescanned, so expansion cannot loop. Always
    /// returns a string; unresolved tokens stay verbatim and push a warning.
    pub fn expand(&self, input: &str, warnings: &mut Vec<Warning>) -> String {
        // Fast path
        if !input.contains("${") {
            return input.to_string();
        }
        PLACEHOLDER
            .replace_all(input, |caps: &regex::Captures<'_>| {
                self.substitute(&caps[1], warnings)
            })
            .into_owned()
    }

    /// First matching rule wins.
    fn substitute(&self, expr: &str, warnings: &mut Vec<Warning>) -> String {
        // Built-ins
        if expr == "HOME" {
            return self.env.home().unwrap_or_default();
        }
        if expr == "PLATFORM" {
            return self.platform.to_string();
        }

        // Secret reference: resolved exclusively from the secret table.
        if let Some(name) = expr.strip_prefix("secret:") {
            if let Some(value) = self.secrets.get(name) {
                return value.clone();
            }
            warnings.push(Warning::UnresolvedSecret {
                name: name.to_string(),
            });
            return unexpanded(expr);
        }

        // Explicit env reference: ${env:NAME}
        if let Some(name) = expr.strip_prefix("env:") {
            if let Some(value) = self.env.var(name) {
                return value;
            }
            warnings.push(Warning::UnresolvedEnv {
                name: name.to_string(),
            });
            return unexpanded(expr);
        }

        // User-defined variables
        if let Some(value) = self.variables.get(expr) {
            return value.clone();
        }

        // Env fallback: works, but intentionally noisy to discourage it.
        if let Some(value) = self.env.var(expr) {
            warnings.push(Warning::EnvFallback {
                name: expr.to_string(),
            });
            return value;
        }

        warnings.push(Warning::UnresolvedVariable {
            name: expr.to_string(),
        });
        unexpanded(expr)
    }
}

/// The literal token, reconstructed so downstream callers can grep for it.
fn unexpanded(expr: &str) -> String {
    format!("${{{expr}}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticEnv;

    fn variables(pairs: &[(&str, &str)]) -> OrderedMap<String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn secrets(pairs: &[(&str, &str)]) -> SecretTable {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn expand(
        input: &str,
        vars: &OrderedMap<String>,
        secrets: &SecretTable,
        env: &StaticEnv,
    ) -> (String, Vec<Warning>) {
        let mut warnings = Vec::new();
        let out = Expander::new(vars, secrets, Platform::Darwin, env).expand(input, &mut warnings);
        (out, warnings)
    }

    #[test]
    fn plain_text_is_returned_unchanged() {
        let (out, warnings) = expand(
            "no placeholders here",
            &OrderedMap::new(),
            &SecretTable::new(),
            &StaticEnv::new(),
        );
        assert_eq!(out, "no placeholders here");
        assert!(warnings.is_empty());
    }

    #[test]
    fn builtins_home_and_platform() {
        let env = StaticEnv::new().set("HOME", "/home/u");
        let (out, warnings) = expand(
            "${HOME}/bin on ${PLATFORM}",
            &OrderedMap::new(),
            &SecretTable::new(),
            &env,
        );
        assert_eq!(out, "/home/u/bin on darwin");
        assert!(warnings.is_empty());
    }

    #[test]
    fn home_without_env_expands_to_empty() {
        let (out, _) = expand(
            "${HOME}/bin",
            &OrderedMap::new(),
            &SecretTable::new(),
            &StaticEnv::new(),
        );
        assert_eq!(out, "/bin");
    }

    #[test]
    fn secret_hit_substitutes_plaintext() {
        let (out, warnings) = expand(
            "token=${secret:API_KEY}",
            &OrderedMap::new(),
            &secrets(&[("API_KEY", "s3cr3t")]),
            &StaticEnv::new(),
        );
        assert_eq!(out, "token=s3cr3t");
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_secret_preserves_the_exact_token() {
        let (out, warnings) = expand(
            "${secret:MISSING}",
            &OrderedMap::new(),
            &SecretTable::new(),
            &StaticEnv::new(),
        );
        assert_eq!(out, "${secret:MISSING}");
        assert_eq!(
            warnings,
            vec![Warning::UnresolvedSecret {
                name: "MISSING".to_string()
            }]
        );
    }

    #[test]
    fn secret_names_never_fall_back_to_variables_or_env() {
        let vars = variables(&[("secret:K", "from-vars")]);
        let env = StaticEnv::new().set("K", "from-env");
        let (out, warnings) = expand("${secret:K}", &vars, &SecretTable::new(), &env);
        assert_eq!(out, "${secret:K}");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn explicit_env_reference_hit_and_miss() {
        let env = StaticEnv::new().set("PATH_EXT", "/opt/bin");
        let (out, warnings) = expand(
            "${env:PATH_EXT}:${env:NOPE}",
            &OrderedMap::new(),
            &SecretTable::new(),
            &env,
        );
        assert_eq!(out, "/opt/bin:${env:NOPE}");
        assert_eq!(
            warnings,
            vec![Warning::UnresolvedEnv {
                name: "NOPE".to_string()
            }]
        );
    }

    #[test]
    fn user_variable_wins_over_env_fallback() {
        let vars = variables(&[("NAME", "from-vars")]);
        let env = StaticEnv::new().set("NAME", "from-env");
        let (out, warnings) = expand("${NAME}", &vars, &SecretTable::new(), &env);
        assert_eq!(out, "from-vars");
        assert!(warnings.is_empty());
    }

    #[test]
    fn env_fallback_substitutes_but_warns() {
        let env = StaticEnv::new().set("EDITOR", "vim");
        let (out, warnings) = expand("${EDITOR}", &OrderedMap::new(), &SecretTable::new(), &env);
        assert_eq!(out, "vim");
        assert_eq!(
            warnings,
            vec![Warning::EnvFallback {
                name: "EDITOR".to_string()
            }]
        );
    }

    #[test]
    fn unknown_reference_is_preserved_with_warning() {
        let (out, warnings) = expand(
            "x=${WHAT}",
            &OrderedMap::new(),
            &SecretTable::new(),
            &StaticEnv::new(),
        );
        assert_eq!(out, "x=${WHAT}");
        assert_eq!(
            warnings,
            vec![Warning::UnresolvedVariable {
                name: "WHAT".to_string()
            }]
        );
    }

    #[test]
    fn replacement_text_is_not_rescanned() {
        // A variable whose value looks like a placeholder stays literal.
        let vars = variables(&[("A", "${B}"), ("B", "b-value")]);
        let (out, warnings) = expand("${A}", &vars, &SecretTable::new(), &StaticEnv::new());
        assert_eq!(out, "${B}");
        assert!(warnings.is_empty());
    }

    #[test]
    fn multiple_tokens_expand_independently() {
        let vars = variables(&[("A", "1"), ("B", "2")]);
        let (out, _) = expand("${A}-${B}-${A}", &vars, &SecretTable::new(), &StaticEnv::new());
        assert_eq!(out, "1-2-1");
    }

    #[test]
    fn unterminated_brace_is_left_alone() {
        let (out, warnings) = expand(
            "${not closed",
            &OrderedMap::new(),
            &SecretTable::new(),
            &StaticEnv::new(),
        );
        assert_eq!(out, "${not closed");
        assert!(warnings.is_empty());
    }
}
