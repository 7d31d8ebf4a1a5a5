//! Report input reading shared by `render` and `resolve`.

use crate::error::{PlugcheckError, Result};
use std::io::{IsTerminal, Read};
use std::path::Path;

/// Read report JSON from a file, or from stdin when no file is given.
///
/// Refuses to read from an interactive terminal — these commands sit at the
/// end of a pipe (`plugcheck check | plugcheck render`) and waiting silently
/// on a TTY would look like a hang.
pub fn read_report_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(PlugcheckError::InvalidReport {
                    message: format!("file not found: {}", path.display()),
                });
            }
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(PlugcheckError::InvalidReport {
                    message: "no input provided; pipe JSON from 'plugcheck check' or pass a file"
                        .to_string(),
                });
            }
            let mut content = String::new();
            stdin.read_to_string(&mut content)?;
            Ok(content)
        }
    }
}
