use std::path::PathBuf;

use albumup_scan::clean_path_input;
use albumup_upload::Confirm;
use console::Term;

/// Single-keypress yes/no prompt on the terminal.
pub struct ConsoleConfirm;

impl Confirm for ConsoleConfirm {
    fn confirm(&self, question: &str) -> std::io::Result<bool> {
        let term = Term::stdout();
        term.write_str(&format!("{question} (y/n) "))?;
        let key = term.read_char();
        term.write_line("")?;
        Ok(matches!(key?, 'y' | 'Y'))
    }
}

/// Use the given path, or ask for one when it was left out.
pub fn path_or_ask(
    given: Option<String>,
    heading: &str,
    question: &str,
) -> anyhow::Result<PathBuf> {
    let raw = match given {
        Some(p) => p,
        None => {
            let term = Term::stdout();
            term.write_line(heading)?;
            term.write_line(question)?;
            term.read_line()?
        }
    };
    Ok(clean_path_input(&raw))
}
