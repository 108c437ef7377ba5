// SPDX-License-Identifier: Apache-2.0
//

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::env;
use std::fmt;
use std::iter::FromIterator;
use std::process;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::help::{self, HintRegistry};
use crate::output::OutputSink;

/// Special argument that is silently consumed and used to denote the end
/// of all options; every argument that follows is considered to be a
/// positional argument (even if it starts with `-`!)
///
/// See: `getopt(3)`.
const END_OF_OPTIONS: &str = "--";
const LONG_PREFIX: &str = "--";
const SHORT_PREFIX: char = '-';

/// Name recognised as a help request in long form, and as the built-in
/// help-dispatch command when sub-commands are registered.
const HELP_NAME: &str = "help";
const VERSION_NAME: &str = "version";
const HELP_SHORT: char = 'h';
const VERSION_SHORT: char = 'v';

const HELP_HINT: &str = "Show this help text";
const VERSION_HINT: &str = "Show program version";

/// An ordered, consumable queue of raw argument strings.
///
/// A stream is created for each top-level parse call and handed down to
/// sub-command parsers, each of which consumes as many subsequent tokens
/// as it needs. Once a token has been taken it cannot be put back;
/// [next] returns [None] when the stream is exhausted, so callers guard
/// consumption the way the `hasNext`-style contract requires. FIFO order
/// only, no random access.
///
/// [next]: TokenStream::next
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenStream {
    tokens: VecDeque<String>,
}

impl TokenStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        TokenStream::default()
    }

    /// Append a token to the back of the stream.
    pub fn push<S: Into<String>>(&mut self, token: S) {
        self.tokens.push_back(token.into());
    }

    /// Remove and return the front token, or [None] if the stream is
    /// exhausted.
    pub fn next(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Whether any tokens remain. Pure; does not consume.
    pub fn has_next(&self) -> bool {
        !self.tokens.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenStream {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TokenStream {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// State for one registered flag: an occurrence counter plus help text.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct FlagSpec {
    count: usize,
    hint: String,
}

/// State for one registered option: the values captured during a parse
/// (in input order), the fallback used when nothing was captured, plus
/// help text.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct OptionSpec {
    values: Vec<String>,
    fallback: String,
    hint: String,
}

/// Callback invoked after a sub-command parser has consumed its portion
/// of the stream. Receives the command name as it appeared on the
/// command line and a reference to the command's parser.
pub type Callback = Box<dyn FnMut(&str, &Parser)>;

/// Constraint on the number of positional arguments a parser accepts,
/// checked once its portion of the stream is exhausted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ArgCount {
    /// Any number of positional arguments (the default).
    #[default]
    Any,
    /// Exactly this many.
    Exactly(usize),
    /// This many or more.
    AtLeast(usize),
}

impl ArgCount {
    fn accepts(self, found: usize) -> bool {
        match self {
            ArgCount::Any => true,
            ArgCount::Exactly(expected) => found == expected,
            ArgCount::AtLeast(expected) => found >= expected,
        }
    }
}

impl fmt::Display for ArgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgCount::Any => write!(f, "any number"),
            ArgCount::Exactly(expected) => write!(f, "exactly {}", expected),
            ArgCount::AtLeast(expected) => write!(f, "at least {}", expected),
        }
    }
}

/// A command-line parser: a namespace of flags and options, a namespace
/// of sub-commands (each an independently configured `Parser`), and a
/// buffer of positional arguments captured during parsing.
///
/// Registration happens up front; a single parse call then classifies
/// each raw token and mutates the registered state, which is inspected
/// afterwards through the query methods ([found], [count], [value],
/// [values], [args], [command_name], ...).
///
/// # Notes
///
/// - A parser tree is built once and driven by exactly one parse call.
///   Re-registering during parsing, or parsing the same tree twice
///   without accounting for accumulated counts and values, is the
///   caller's responsibility.
/// - Registering an alias that is already taken silently replaces the
///   earlier binding (last registration wins). This also applies to
///   command aliases, where it orphans the previously registered child.
///
/// [found]: Parser::found
/// [count]: Parser::count
/// [value]: Parser::value
/// [values]: Parser::values
/// [args]: Parser::args
/// [command_name]: Parser::command_name
#[derive(Default)]
pub struct Parser {
    helptext: String,
    version: String,

    /// Hint shown for this parser in its parent's command listing.
    hint: String,

    flags: BTreeMap<String, Rc<RefCell<FlagSpec>>>,
    options: BTreeMap<String, Rc<RefCell<OptionSpec>>>,
    commands: BTreeMap<String, Rc<RefCell<Parser>>>,

    command_name: Option<String>,
    positional: Vec<String>,
    expected: ArgCount,

    callback: Option<Callback>,
    sink: Option<Rc<RefCell<OutputSink>>>,
}

impl Parser {
    /// Create a parser with no registered arguments, no help text and no
    /// version string.
    pub fn new() -> Self {
        Parser::default()
    }

    //----------------------------------------
    // Configuration
    //----------------------------------------

    /// Set the help text shown for `-h`/`--help`. Help requests are only
    /// honoured once this is non-empty.
    pub fn helptext<S: Into<String>>(&mut self, text: S) -> &mut Self {
        self.helptext = text.into();
        self
    }

    /// Set the version string shown for `-v`/`--version`. Version
    /// requests are only honoured once this is non-empty.
    pub fn version<S: Into<String>>(&mut self, version: S) -> &mut Self {
        self.version = version.into();
        self
    }

    /// Register a flag under every whitespace-separated alias in
    /// `aliases`, e.g. `"bar b"`. All aliases share one occurrence
    /// counter. An empty `hint` keeps the flag out of the help listing.
    pub fn flag(&mut self, aliases: &str, hint: &str) -> &mut Self {
        let spec = Rc::new(RefCell::new(FlagSpec {
            count: 0,
            hint: hint.into(),
        }));

        for alias in aliases.split_whitespace() {
            self.flags.insert(alias.into(), Rc::clone(&spec));
        }

        self
    }

    /// Register an option under every whitespace-separated alias in
    /// `aliases`. All aliases share one list of captured values.
    /// `fallback` is returned by [value] when the option never appeared.
    ///
    /// [value]: Parser::value
    pub fn option(&mut self, aliases: &str, fallback: &str, hint: &str) -> &mut Self {
        let spec = Rc::new(RefCell::new(OptionSpec {
            values: Vec::new(),
            fallback: fallback.into(),
            hint: hint.into(),
        }));

        for alias in aliases.split_whitespace() {
            self.options.insert(alias.into(), Rc::clone(&spec));
        }

        self
    }

    /// Constrain the number of positional arguments this parser accepts.
    pub fn expect_args(&mut self, expected: ArgCount) -> &mut Self {
        self.expected = expected;
        self
    }

    /// Set the callback run after this parser, dispatched as a
    /// sub-command, has consumed its portion of the stream. Invoked
    /// exactly once per dispatch.
    pub fn callback<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&str, &Parser) + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Install a custom output policy on the shared [OutputSink],
    /// replacing the default write-to-standard-streams behaviour for the
    /// whole parser tree. The policy's return value becomes the exit
    /// status of the exiting parse entry points.
    pub fn set_output<F>(&mut self, policy: F) -> &mut Self
    where
        F: FnMut(&str, bool) -> i32 + 'static,
    {
        let sink = self.sink();
        sink.borrow_mut().set_policy(Box::new(policy));
        self
    }

    /// Register a sub-command under every whitespace-separated alias in
    /// `aliases` and return the shared handle to its parser for further
    /// configuration.
    ///
    /// `helptext` is the new command's own help text; `hint` is the row
    /// shown for it in this parser's command listing. The child shares
    /// this parser's output sink, so redirection configured on the root
    /// reaches every descendant.
    pub fn command(&mut self, aliases: &str, helptext: &str, hint: &str) -> Rc<RefCell<Parser>> {
        let mut child = Parser::new();
        child.helptext = helptext.into();
        child.hint = hint.into();
        child.sink = Some(self.sink());

        let child = Rc::new(RefCell::new(child));

        for alias in aliases.split_whitespace() {
            self.commands.insert(alias.into(), Rc::clone(&child));
        }

        child
    }

    /// The shared output sink, created lazily on first use.
    fn sink(&mut self) -> Rc<RefCell<OutputSink>> {
        let sink = self
            .sink
            .get_or_insert_with(|| Rc::new(RefCell::new(OutputSink::new())));

        Rc::clone(sink)
    }

    //----------------------------------------
    // Queries
    //----------------------------------------

    /// Whether the named flag or option was seen at least once.
    pub fn found(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// How many times the named flag appeared, or how many values the
    /// named option captured. Zero for unregistered names.
    pub fn count(&self, name: &str) -> usize {
        if let Some(flag) = self.flags.get(name) {
            return flag.borrow().count;
        }

        if let Some(option) = self.options.get(name) {
            return option.borrow().values.len();
        }

        0
    }

    /// The most recently captured value for the named option, or its
    /// fallback if it never appeared. Empty for unregistered names.
    pub fn value(&self, name: &str) -> String {
        match self.options.get(name) {
            Some(option) => {
                let option = option.borrow();

                option
                    .values
                    .last()
                    .cloned()
                    .unwrap_or_else(|| option.fallback.clone())
            }
            None => String::new(),
        }
    }

    /// Every value captured for the named option, in input order. Empty
    /// for unregistered names and options that never appeared.
    pub fn values(&self, name: &str) -> Vec<String> {
        self.options
            .get(name)
            .map(|option| option.borrow().values.clone())
            .unwrap_or_default()
    }

    /// The positional arguments captured during parsing, in input order.
    pub fn args(&self) -> &[String] {
        &self.positional
    }

    /// Whether a sub-command was dispatched during parsing.
    pub fn command_found(&self) -> bool {
        self.command_name.is_some()
    }

    /// The name under which the dispatched sub-command was invoked, if
    /// any.
    pub fn command_name(&self) -> Option<&str> {
        self.command_name.as_deref()
    }

    /// The dispatched sub-command's parser, if any.
    pub fn command_parser(&self) -> Option<Rc<RefCell<Parser>>> {
        self.command_name
            .as_ref()
            .and_then(|name| self.commands.get(name))
            .map(Rc::clone)
    }

    //----------------------------------------
    // Parsing
    //----------------------------------------

    /// Parse the process's command-line arguments, skipping the program
    /// name.
    ///
    /// On a help or version request, or on any classification failure,
    /// the outcome text is routed through the shared [OutputSink] and
    /// the process exits with the flush status (0 for help/version, 1
    /// for failures, or whatever a custom policy returns). Use
    /// [try_parse] to handle outcomes as values instead.
    ///
    /// [try_parse]: Parser::try_parse
    pub fn parse(&mut self) {
        self.parse_from(env::args().skip(1));
    }

    /// Like [parse], but over an explicit list of tokens (without the
    /// program name).
    ///
    /// [parse]: Parser::parse
    pub fn parse_from<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Err(err) = self.try_parse_from(args) {
            let status = self.report(&err);
            process::exit(status);
        }
    }

    /// Parse the process's command-line arguments, skipping the program
    /// name, returning the outcome as a value.
    pub fn try_parse(&mut self) -> Result<()> {
        self.try_parse_from(env::args().skip(1))
    }

    /// Parse an explicit list of tokens (without the program name),
    /// returning the outcome as a value.
    ///
    /// Help and version requests surface as [Error::Help] and
    /// [Error::Version]; both carry the text to display and map to exit
    /// status 0 via [Error::status]. The parse stops at the first
    /// violation: no further tokens are applied.
    pub fn try_parse_from<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stream = args.into_iter().collect::<TokenStream>();

        self.parse_stream(&mut stream)
    }

    /// Classify and consume every token in `stream`.
    ///
    /// This is the recursive core: a dispatched sub-command is handed
    /// the same stream and consumes as many subsequent tokens as it
    /// needs (nested sub-commands included) before control returns here.
    pub fn parse_stream(&mut self, stream: &mut TokenStream) -> Result<()> {
        // True until a bare positional argument is filed; commands are
        // only recognised while it holds.
        let mut is_first_arg = true;

        while let Some(arg) = stream.next() {
            // A '--' turns off all further option and command
            // interpretation.
            if arg == END_OF_OPTIONS {
                while let Some(rest) = stream.next() {
                    self.positional.push(rest);
                }
                continue;
            }

            // Long-form option or flag?
            if let Some(name) = arg.strip_prefix(LONG_PREFIX) {
                self.parse_long(name, stream)?;
                continue;
            }

            // Short-form option or flag? A single dash, or a dash
            // followed by a digit, is a positional argument (preserves
            // negative-number-like tokens).
            if arg.starts_with(SHORT_PREFIX) {
                if arg.len() == 1 || arg.as_bytes()[1].is_ascii_digit() {
                    self.positional.push(arg);
                } else {
                    self.parse_short(&arg[1..], stream)?;
                }
                continue;
            }

            if is_first_arg {
                // A registered command?
                if let Some(child) = self.commands.get(&arg).map(Rc::clone) {
                    self.command_name = Some(arg.clone());

                    child.borrow_mut().parse_stream(stream)?;

                    // The callback is taken out for the duration of the
                    // call so it can be handed the child by reference.
                    let callback = child.borrow_mut().callback.take();

                    if let Some(mut callback) = callback {
                        callback(&arg, &child.borrow());
                        child.borrow_mut().callback = Some(callback);
                    }

                    continue;
                }

                // The automatic 'help <command>' command?
                if arg == HELP_NAME && !self.commands.is_empty() {
                    let name = match stream.next() {
                        Some(name) => name,
                        None => return Err(Error::MissingHelpArgument),
                    };

                    let child = match self.commands.get(&name) {
                        Some(child) => Rc::clone(child),
                        None => return Err(Error::UnknownCommand(name)),
                    };

                    let text = child.borrow().render_help();

                    return Err(Error::Help(text));
                }
            }

            // Otherwise it is a positional argument.
            self.positional.push(arg);
            is_first_arg = false;
        }

        if !self.expected.accepts(self.positional.len()) {
            return Err(Error::BadArgCount {
                expected: self.expected,
                found: self.positional.len(),
            });
        }

        Ok(())
    }

    /// Resolve a long-form token with its `--` prefix stripped.
    fn parse_long(&self, arg: &str, stream: &mut TokenStream) -> Result<()> {
        if let Some((name, value)) = arg.split_once('=') {
            return self.parse_equals(LONG_PREFIX, name, value);
        }

        if let Some(flag) = self.flags.get(arg) {
            flag.borrow_mut().count += 1;
            return Ok(());
        }

        if let Some(option) = self.options.get(arg) {
            let value = stream
                .next()
                .ok_or_else(|| Error::MissingArgument(format!("--{}", arg)))?;

            option.borrow_mut().values.push(value);
            return Ok(());
        }

        if arg == HELP_NAME && !self.helptext.is_empty() {
            return Err(Error::Help(self.render_help()));
        }

        if arg == VERSION_NAME && !self.version.is_empty() {
            return Err(Error::Version(self.version.clone()));
        }

        Err(Error::UnknownName(format!("--{}", arg)))
    }

    /// Resolve a short-form token with its `-` prefix stripped. Each
    /// character in the cluster is resolved independently, in sequence.
    fn parse_short(&self, arg: &str, stream: &mut TokenStream) -> Result<()> {
        if let Some((name, value)) = arg.split_once('=') {
            return self.parse_equals("-", name, value);
        }

        for c in arg.chars() {
            let name = c.to_string();

            if let Some(flag) = self.flags.get(&name) {
                flag.borrow_mut().count += 1;
                continue;
            }

            if let Some(option) = self.options.get(&name) {
                let value = stream
                    .next()
                    .ok_or_else(|| Error::MissingArgument(short_display(c, arg)))?;

                option.borrow_mut().values.push(value);
                continue;
            }

            if c == HELP_SHORT && !self.helptext.is_empty() {
                return Err(Error::Help(self.render_help()));
            }

            if c == VERSION_SHORT && !self.version.is_empty() {
                return Err(Error::Version(self.version.clone()));
            }

            return Err(Error::UnknownName(short_display(c, arg)));
        }

        Ok(())
    }

    /// Resolve an equals-form token split at its first `=`. `prefix` is
    /// the dash form it arrived in, used verbatim in error messages.
    fn parse_equals(&self, prefix: &str, name: &str, value: &str) -> Result<()> {
        let option = self
            .options
            .get(name)
            .ok_or_else(|| Error::UnknownOption(format!("{}{}", prefix, name)))?;

        if value.is_empty() {
            return Err(Error::MissingValue(format!("{}{}", prefix, name)));
        }

        option.borrow_mut().values.push(value.to_string());

        Ok(())
    }

    //----------------------------------------
    // Help and reporting
    //----------------------------------------

    /// Render the full help listing: the help text, a `Commands:`
    /// section for registered sub-commands and an `Options:` section for
    /// registered flags and options plus the synthesized
    /// `-h, --help` / `-v, --version` rows (added only when those
    /// aliases are free and the corresponding text is non-empty).
    pub fn render_help(&self) -> String {
        let mut out = String::new();

        out.push_str(&self.helptext);
        out.push('\n');

        if !self.commands.is_empty() {
            let mut hints = HintRegistry::new();

            hints.collect(
                self.commands
                    .iter()
                    .map(|(alias, command)| (alias.clone(), command.borrow().hint.clone())),
            );

            hints.render(&mut out, "\nCommands:\n");
        }

        let mut hints = HintRegistry::new();

        hints.collect(
            self.flags
                .iter()
                .map(|(alias, flag)| (help::flag_name(alias), flag.borrow().hint.clone())),
        );

        hints.collect(
            self.options
                .iter()
                .map(|(alias, option)| (help::option_name(alias), option.borrow().hint.clone())),
        );

        hints.collect(self.builtin_hints());

        hints.render(&mut out, "\nOptions:\n");

        out.push('\n');

        out
    }

    /// The synthesized help/version rows, keyed so they render in sorted
    /// alias order and merge with their long forms.
    fn builtin_hints(&self) -> Vec<(String, String)> {
        let mut builtins = BTreeMap::new();

        if !self.version.is_empty() {
            for alias in ["v", "version"] {
                if !self.flags.contains_key(alias) && !self.options.contains_key(alias) {
                    builtins.insert(alias, VERSION_HINT);
                }
            }
        }

        if !self.helptext.is_empty() {
            for alias in ["h", "help"] {
                if !self.flags.contains_key(alias) && !self.options.contains_key(alias) {
                    builtins.insert(alias, HELP_HINT);
                }
            }
        }

        builtins
            .into_iter()
            .map(|(alias, hint)| (help::flag_name(alias), hint.to_string()))
            .collect()
    }

    /// Route a parse outcome through the shared [OutputSink] and return
    /// the flush status: rendered help/version text flows through the
    /// success channel, everything else is written as
    /// `Error: <message>.` through the error channel.
    ///
    /// The exiting entry points ([parse], [parse_from]) call this and
    /// then exit with the returned status; hosts using the `try_` forms
    /// can call it directly to reuse the configured output policy.
    ///
    /// [parse]: Parser::parse
    /// [parse_from]: Parser::parse_from
    pub fn report(&mut self, err: &Error) -> i32 {
        let sink = self.sink();
        let mut sink = sink.borrow_mut();

        match err {
            Error::Help(text) => {
                sink.write(text);
                sink.flush(false)
            }
            Error::Version(text) => {
                sink.write(text);
                sink.write("\n");
                sink.flush(false)
            }
            _ => {
                sink.write(&format!("Error: {}.\n", err));
                sink.flush(true)
            }
        }
    }
}

/// Human-readable snapshot of all captured state, in the order options,
/// flags, positional arguments, dispatched command. Specs registered
/// under several aliases appear once per alias.
impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Options:")?;
        if self.options.is_empty() {
            writeln!(f, "  [none]")?;
        } else {
            for (alias, option) in &self.options {
                let option = option.borrow();
                writeln!(
                    f,
                    "  {}: ({}) [{}]",
                    alias,
                    option.fallback,
                    option.values.join(", ")
                )?;
            }
        }

        writeln!(f, "\nFlags:")?;
        if self.flags.is_empty() {
            writeln!(f, "  [none]")?;
        } else {
            for (alias, flag) in &self.flags {
                writeln!(f, "  {}: {}", alias, flag.borrow().count)?;
            }
        }

        writeln!(f, "\nArguments:")?;
        if self.positional.is_empty() {
            writeln!(f, "  [none]")?;
        } else {
            for arg in &self.positional {
                writeln!(f, "  {}", arg)?;
            }
        }

        writeln!(f, "\nCommand:")?;
        match &self.command_name {
            Some(name) => writeln!(f, "  {}", name),
            None => writeln!(f, "  [none]"),
        }
    }
}

/// How a short-form name is written in error messages: a lone character
/// as `-c`, a character inside a cluster with the cluster for context.
fn short_display(c: char, cluster: &str) -> String {
    if cluster.chars().nth(1).is_some() {
        format!("'{}' in -{}", c, cluster)
    } else {
        format!("-{}", c)
    }
}
