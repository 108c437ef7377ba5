// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Crate for parsing command-line arguments, with support for
//! sub-commands.
//!
//! If you want lots of extra features (derive macros, typed values,
//! shell completion), you should consider the excellent
//! [`clap`](https://crates.io/crates/clap) crate instead.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Quickstart](#quickstart)
//! * [Sub-commands](#sub-commands)
//! * [Token grammar](#token-grammar)
//! * [Help and version](#help-and-version)
//! * [Error handling and exit behaviour](#error-handling-and-exit-behaviour)
//! * [Limitations](#limitations)
//!
//! ---
//!
//! # Overview
//!
//! A [Parser] is configured up front with *flags* (repeatable switches
//! tracked by an occurrence count), *options* (named settings that
//! capture one string value per occurrence, with a fallback), and
//! *sub-commands* (independently configured nested parsers). A single
//! parse call then walks the raw argument strings in order, classifying
//! each token and mutating the registered state. Afterwards the parser
//! is queried for what was seen.
//!
//! Option values are captured as raw strings; converting them to
//! numerics or other types is left entirely to the caller.
//!
//! # Quickstart
//!
//! ```rust
//! use argot::{ArgCount, Parser, Result};
//!
//! fn main() -> Result<()> {
//!     let mut parser = Parser::new();
//!
//!     parser
//!         .helptext("Usage: greet [options] <name>...")
//!         .version("1.0.0")
//!         .flag("shout s", "Print in upper case")
//!         .option("greeting g", "Hello", "Use this greeting")
//!         .expect_args(ArgCount::AtLeast(1));
//!
//!     // A real program would call parser.parse() (or try_parse())
//!     // to read the process arguments.
//!     parser.try_parse_from(vec!["--greeting", "Hi", "-s", "world"])?;
//!
//!     assert!(parser.found("shout"));
//!     assert_eq!(parser.value("g"), "Hi");
//!     assert_eq!(parser.args(), ["world"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! Registering `"greeting g"` binds *both* aliases to one shared record:
//! occurrences of `-g` and `--greeting` accumulate into the same value
//! list, and either alias can be used in queries. Registering an alias
//! that is already taken silently replaces the earlier binding (last
//! registration wins).
//!
//! # Sub-commands
//!
//! [Parser::command] registers a nested parser with its own namespaces
//! and returns a shared handle for configuring it. The command is
//! recognised when its name appears before any bare positional
//! argument; it then consumes as many of the remaining tokens as it
//! needs (nested sub-commands included). An optional callback runs once
//! the command's portion of the stream has been consumed.
//!
//! ```rust
//! use argot::Parser;
//!
//! let mut parser = Parser::new();
//! parser.helptext("Usage: tool <command>");
//!
//! let add = parser.command("add a", "Usage: tool add <paths>", "Stage paths");
//! add.borrow_mut().flag("verbose v", "Explain what happens");
//!
//! parser
//!     .try_parse_from(vec!["add", "--verbose", "notes.txt"])
//!     .unwrap();
//!
//! assert_eq!(parser.command_name(), Some("add"));
//!
//! let child = parser.command_parser().unwrap();
//! assert_eq!(child.borrow().count("verbose"), 1);
//! assert_eq!(child.borrow().args(), ["notes.txt"]);
//! ```
//!
//! # Token grammar
//!
//! | Token        | Meaning                                              |
//! | ------------ | ---------------------------------------------------- |
//! | `--name`     | Long-form flag, or option consuming the next token   |
//! | `--name=val` | Long-form option with joined value                   |
//! | `-x`         | Short-form flag or option                            |
//! | `-xyz`       | Cluster; each character resolved independently       |
//! | `-x=val`     | Short-form option with joined value                  |
//! | `--`         | End of options; the rest is positional, verbatim     |
//! | `-`          | Positional argument                                  |
//! | `-1`, `-99`  | Dash-digit: positional (negative-number friendly)    |
//!
//! Anything else is a sub-command name (in first position) or a
//! positional argument, captured in input order.
//!
//! # Help and version
//!
//! `-h`/`--help` and `-v`/`--version` are honoured automatically, but
//! only once a non-empty help text or version string has been
//! configured; with nothing configured the same tokens fail as
//! unrecognised. When sub-commands are registered, `help <command>`
//! displays the named command's help. The rendered listing shows a
//! `Commands:` section and an `Options:` section with aliases sharing a
//! hint merged into one column-aligned row.
//!
//! # Error handling and exit behaviour
//!
//! Parsing stops at the first violation. The `try_` entry points
//! ([Parser::try_parse], [Parser::try_parse_from]) surface the outcome
//! as an [Error] value. Help and version requests are included, as
//! [Error::Help] and [Error::Version] carrying the text to display:
//!
//! ```rust
//! use argot::{Error, Parser};
//!
//! let mut parser = Parser::new();
//! parser.option("port p", "8080", "Listen on this port");
//!
//! let err = parser.try_parse_from(vec!["--port"]).unwrap_err();
//!
//! assert_eq!(err, Error::MissingArgument("--port".into()));
//! assert_eq!(err.status(), 1);
//! ```
//!
//! The plain entry points ([Parser::parse], [Parser::parse_from])
//! instead route the outcome text through the tree's shared
//! [OutputSink] and terminate the process: status 0 for help/version,
//! 1 for failures, or whatever a custom policy installed with
//! [Parser::set_output] returns.
//!
//! # Limitations
//!
//! - Option values are raw strings; no type coercion or validation.
//! - An option consumes the next token as its value even if that token
//!   starts with a dash (`getopt(3)` behaviour).
//! - A parser tree is built once and driven by exactly one parse call;
//!   concurrent parsing or registration during parsing is not
//!   supported.

mod error;
mod help;
mod output;
mod parser;

pub use error::{Error, Result};

pub use output::{OutputPolicy, OutputSink};

pub use parser::{ArgCount, Callback, Parser, TokenStream};
