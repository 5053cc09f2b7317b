//! Interactive yes/no confirmation on the terminal.

use dialoguer::theme::SimpleTheme;
use tracing::warn;

use crate::app::Confirm;

/// Asks for confirmation on the terminal, defaulting to "no".
///
/// When the prompt cannot be shown, for example because stdin is not a
/// terminal, the operation is declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl TerminalConfirm {
    /// Prompt on stderr and read the answer from the terminal.
    #[must_use]
    pub fn stdio() -> Self {
        Self
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = dialoguer::Confirm::with_theme(&SimpleTheme)
            .with_prompt(prompt)
            .default(false)
            .interact();
        accept(answer)
    }
}

fn accept(answer: dialoguer::Result<bool>) -> bool {
    match answer {
        Ok(confirmed) => confirmed,
        Err(e) => {
            warn!(error = %e, "Could not read confirmation answer");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_accept_answers() {
        assert!(accept(Ok(true)));
        assert!(!accept(Ok(false)));
    }

    #[test]
    fn test_accept_declines_on_terminal_error() {
        let err = io::Error::new(io::ErrorKind::NotConnected, "not a terminal");
        assert!(!accept(Err(dialoguer::Error::IO(err))));
    }
}
