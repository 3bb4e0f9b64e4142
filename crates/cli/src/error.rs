//! CLI failures and their exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parse error, reported by clap |
//! | 10   | a part failed to rasterize or composite |
//! | 11   | a sprite or the manifest could not be written |
//! | 12   | `--config` is not JSON, or the render config is out of range |
//! | 13   | printing JSON output failed |

use creature_sprite_core::SpriteError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Generation(SpriteError),
    /// Export failure, carrying the message of the underlying I/O error.
    Write(String),
    /// `--config` did not parse as JSON.
    ConfigSyntax(serde_json::Error),
    /// The recipe's render config was rejected (resolution, pixels per unit).
    InvalidRecipe(SpriteError),
    Output(serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Generation(_) => 10,
            CliError::Write(_) => 11,
            CliError::ConfigSyntax(_) | CliError::InvalidRecipe(_) => 12,
            CliError::Output(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Generation(e) => write!(f, "generation failed: {e}"),
            CliError::Write(msg) => write!(f, "export failed: {msg}"),
            CliError::ConfigSyntax(e) => write!(f, "invalid --config JSON: {e}"),
            CliError::InvalidRecipe(e) => write!(f, "invalid render config: {e}"),
            CliError::Output(e) => write!(f, "could not print JSON: {e}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Generation(e) | CliError::InvalidRecipe(e) => Some(e),
            CliError::ConfigSyntax(e) | CliError::Output(e) => Some(e),
            CliError::Write(_) => None,
        }
    }
}

/// Pipeline failures: export errors become [`CliError::Write`], the rest
/// [`CliError::Generation`]. Config validation goes through
/// [`CliError::InvalidRecipe`] explicitly.
impl From<SpriteError> for CliError {
    fn from(e: SpriteError) -> Self {
        match e {
            SpriteError::Io(msg) => CliError::Write(msg),
            other => CliError::Generation(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
