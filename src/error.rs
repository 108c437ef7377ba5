// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

use crate::parser::ArgCount;

/// The error type.
///
/// A parse stops at the first violation; no further tokens are applied
/// once an error has been produced.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    //------------------------------
    // Terminal display requests (success channel, exit status 0)
    //------------------------------
    /// Help output was requested (`-h`, `--help`, or the built-in
    /// `help <command>` command). Carries the fully rendered help text.
    #[error("{0}")]
    Help(String),

    /// Version output was requested (`-v` or `--version`).
    /// Carries the version string.
    #[error("{0}")]
    Version(String),

    //------------------------------
    // Classification failures (error channel, exit status 1)
    //------------------------------
    /// User specified a name that is neither a registered flag nor a
    /// registered option.
    #[error("{0} is not a recognised flag or option")]
    UnknownName(String),

    /// The name in an equals-form token (`--name=value`, `-n=value`)
    /// is not a registered option.
    #[error("{0} is not a recognised option")]
    UnknownOption(String),

    /// An option requires a value but the stream was exhausted.
    #[error("missing argument for {0}")]
    MissingArgument(String),

    /// An equals-form token supplied an empty value (`--name=`).
    #[error("missing value for {0}")]
    MissingValue(String),

    /// The built-in help command named an unregistered command.
    #[error("'{0}' is not a recognised command")]
    UnknownCommand(String),

    /// The built-in help command reached the end of the stream before
    /// finding its target command name.
    #[error("the help command requires an argument")]
    MissingHelpArgument,

    /// The number of positional arguments violated the configured
    /// [ArgCount] constraint.
    #[error("invalid number of arguments (expected {expected}, found {found})")]
    BadArgCount {
        /// The configured constraint.
        expected: ArgCount,
        /// The number of positional arguments actually captured.
        found: usize,
    },
}

impl Error {
    /// The conventional process exit status for this outcome: `0` for an
    /// explicit help or version display, `1` for any classification or
    /// validation failure.
    pub fn status(&self) -> i32 {
        match self {
            Error::Help(_) | Error::Version(_) => 0,
            _ => 1,
        }
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
