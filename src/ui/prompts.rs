//! Interactive confirmations.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{Result, WslstrapError};

use super::Prompt;

fn map_dialoguer_err(e: dialoguer::Error) -> WslstrapError {
    WslstrapError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Ask `prompt` on `term`.
pub fn confirm_user(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}

/// Parse a yes/no answer given out of band (env var, config).
pub fn parse_bool_answer(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yes_answers() {
        for v in ["y", "YES", " true ", "1"] {
            assert_eq!(parse_bool_answer(v), Some(true), "{}", v);
        }
    }

    #[test]
    fn parses_no_answers() {
        for v in ["n", "No", "false", "0"] {
            assert_eq!(parse_bool_answer(v), Some(false), "{}", v);
        }
    }

    #[test]
    fn rejects_other_answers() {
        assert_eq!(parse_bool_answer("maybe"), None);
        assert_eq!(parse_bool_answer(""), None);
    }
}
