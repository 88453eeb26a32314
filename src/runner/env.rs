//! Environment layering with command substitution
//!
//! Env values may embed `$[...]` action tokens. Each token body executes as
//! an action whose captured stdout replaces the token in the final value.
//! Groups apply in declaration order and write straight into the process
//! environment, so every group sees the bindings of the groups before it.

use crate::config::EnvGroup;
use crate::error::{ActionError, EnvError};
use crate::runner::action::{Action, ActionOutput};
use regex::Regex;
use std::env;

/// A portion of an env value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvToken {
    /// Used as is
    Literal(String),
    /// Executed; the captured output replaces the token
    Action(String),
}

/// Split an env value into literal and action tokens
///
/// The greedy flag widens the `$[...]` match to the last closing bracket,
/// which lets an action body itself contain brackets (e.g. a bash `[ ... ]`
/// conditional).
pub fn parse_env_tokens(statement: &str, greedy: bool) -> Vec<EnvToken> {
    let pattern = if greedy { r"\$\[.*\]+" } else { r"\$\[.*?\]" };
    let re = Regex::new(pattern).unwrap();

    let mut tokens = Vec::new();
    let mut cursor = 0;
    for m in re.find_iter(statement) {
        if m.start() > cursor {
            tokens.push(EnvToken::Literal(statement[cursor..m.start()].to_string()));
        }
        tokens.push(EnvToken::Action(
            statement[m.start() + 2..m.end() - 1].to_string(),
        ));
        cursor = m.end();
    }
    if tokens.is_empty() {
        return vec![EnvToken::Literal(statement.to_string())];
    }
    if cursor < statement.len() {
        tokens.push(EnvToken::Literal(statement[cursor..].to_string()));
    }
    tokens
}

/// Expand one token into its contribution to the final value
///
/// Action bodies run without env expansion; the statement reaches the child
/// untouched. A single trailing newline of the captured output is stripped.
pub fn expand(token: &EnvToken) -> Result<String, ActionError> {
    match token {
        EnvToken::Literal(value) => Ok(value.clone()),
        EnvToken::Action(statement) => {
            let mut captured = String::new();
            Action::new(statement)
                .with_env_expansion(false)
                .with_stdout(ActionOutput::Capture(&mut captured))
                .execute()?;
            if captured.ends_with('\n') {
                captured.pop();
            }
            Ok(captured)
        }
    }
}

/// Resolve every value of the group and write it into the process environment
pub fn apply(group: &EnvGroup, greedy: bool) -> Result<(), EnvError> {
    for (key, value) in group {
        let mut resolved = String::new();
        for token in parse_env_tokens(value, greedy) {
            let part = expand(&token).map_err(|e| EnvError::Apply {
                key: key.clone(),
                value: value.clone(),
                source: e,
            })?;
            resolved.push_str(&part);
        }
        // SAFETY: the engine is single-threaded; no other thread touches the
        // process environment while a workflow runs
        unsafe {
            env::set_var(key, resolved);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use EnvToken::{Action, Literal};

    #[test]
    fn test_parse_env_tokens() {
        let cases: &[(&str, Vec<EnvToken>)] = &[
            ("", vec![Literal("".into())]),
            ("12 12", vec![Literal("12 12".into())]),
            ("$[echo foo]", vec![Action("echo foo".into())]),
            (
                "1-$[foo]-2-$[echo foo ]-3-$[bar]-4",
                vec![
                    Literal("1-".into()),
                    Action("foo".into()),
                    Literal("-2-".into()),
                    Action("echo foo ".into()),
                    Literal("-3-".into()),
                    Action("bar".into()),
                    Literal("-4".into()),
                ],
            ),
        ];

        for (idx, (statement, expected)) in cases.iter().enumerate() {
            let tokens = parse_env_tokens(statement, false);
            assert_eq!(&tokens, expected, "case index={idx}");
        }
    }

    #[test]
    fn test_greedy_match_spans_inner_brackets() {
        let statement = r#"$[bash -c "[ 1 = 1 ] && echo yes"]"#;

        let tokens = parse_env_tokens(statement, true);
        assert_eq!(
            tokens,
            vec![Action(r#"bash -c "[ 1 = 1 ] && echo yes""#.into())]
        );

        // the non-greedy regex stops at the first closing bracket
        let tokens = parse_env_tokens(statement, false);
        assert_eq!(tokens[0], Action(r#"bash -c "[ 1 = 1 "#.into()));
    }

    #[test]
    fn test_tokenization_is_a_partition() {
        let statement = "a-$[echo b]-c$[echo d]";
        let rebuilt: String = parse_env_tokens(statement, false)
            .iter()
            .map(|t| match t {
                Literal(v) => v.clone(),
                Action(v) => format!("$[{v}]"),
            })
            .collect();
        assert_eq!(rebuilt, statement);
    }

    #[test]
    fn test_expand_literal() {
        assert_eq!(expand(&Literal("plain".into())).unwrap(), "plain");
    }

    #[test]
    fn test_expand_action_strips_trailing_newline() {
        assert_eq!(expand(&Action("echo foo".into())).unwrap(), "foo");
    }

    #[test]
    fn test_expand_failing_action() {
        assert!(expand(&Action("a_non_existent_program_xyz".into())).is_err());
    }

    #[test]
    fn test_apply_plain_group() {
        let mut group = EnvGroup::new();
        group.insert("ORK_ENV_TEST_PLAIN".into(), "value".into());

        apply(&group, false).unwrap();
        assert_eq!(env::var("ORK_ENV_TEST_PLAIN").unwrap(), "value");
        unsafe {
            env::remove_var("ORK_ENV_TEST_PLAIN");
        }
    }

    #[test]
    fn test_apply_with_command_substitution() {
        let mut group = EnvGroup::new();
        group.insert("ORK_ENV_TEST_SUBST".into(), "$[echo foo]-$[echo bar]".into());

        apply(&group, false).unwrap();
        assert_eq!(env::var("ORK_ENV_TEST_SUBST").unwrap(), "foo-bar");
        unsafe {
            env::remove_var("ORK_ENV_TEST_SUBST");
        }
    }

    #[test]
    fn test_apply_failure_names_the_key() {
        let mut group = EnvGroup::new();
        group.insert(
            "ORK_ENV_TEST_BROKEN".into(),
            "$[a_non_existent_program_xyz]".into(),
        );

        let err = apply(&group, false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ORK_ENV_TEST_BROKEN"));
        assert!(message.contains("$[a_non_existent_program_xyz]"));
    }
}
