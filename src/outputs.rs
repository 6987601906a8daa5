//! GitHub Actions outputs and workflow commands

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};

const OUTPUT_DELIMITER: &str = "PREVIEW_ENVS_EOF";

/// Writer for step outputs
///
/// Appends to the file named by `GITHUB_OUTPUT` when the runner provides one,
/// otherwise falls back to the legacy `::set-output` command on stdout.
#[derive(Debug, Clone, Default)]
pub struct ActionOutputs {
    output_file: Option<PathBuf>,
}

impl ActionOutputs {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Set a step output
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            println!("::set-output name={}::{}", name, escape_data(value));
            return Ok(());
        };

        if value.contains(OUTPUT_DELIMITER) {
            return Err(Error::config(format!(
                "Output {} must not contain the delimiter {}",
                name, OUTPUT_DELIMITER
            )));
        }

        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        writeln!(file, "{}<<{}", name, OUTPUT_DELIMITER)?;
        writeln!(file, "{}", value)?;
        writeln!(file, "{}", OUTPUT_DELIMITER)?;

        tracing::debug!(output = name, value, "set output");
        Ok(())
    }
}

/// Emit an `::error::` workflow command
pub fn error(message: &str) {
    println!("{}", error_command(message));
}

fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Escape a workflow command payload
fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_appends_heredoc_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        let outputs = ActionOutputs::new(Some(path.clone()));

        outputs.set("humanitec-env", "dev-login").unwrap();
        outputs.set("environment-url", "https://example.com/a\nb").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "humanitec-env<<PREVIEW_ENVS_EOF\ndev-login\nPREVIEW_ENVS_EOF\n\
             environment-url<<PREVIEW_ENVS_EOF\nhttps://example.com/a\nb\nPREVIEW_ENVS_EOF\n"
        );
    }

    #[test]
    fn test_set_rejects_delimiter_in_value() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = ActionOutputs::new(Some(dir.path().join("output")));

        let result = outputs.set("name", "x PREVIEW_ENVS_EOF y");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_set_without_file_prints_command() {
        let outputs = ActionOutputs::default();
        assert!(outputs.set("humanitec-env", "dev-login").is_ok());
    }

    #[test]
    fn test_error_command_escaping() {
        assert_eq!(error_command("Action failed"), "::error::Action failed");
        assert_eq!(error_command("100% broken\r\nnext"), "::error::100%25 broken%0D%0Anext");
    }
}
