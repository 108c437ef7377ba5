// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;
use std::mem;

/// Policy invoked when a sink is flushed.
///
/// Receives the buffered text and whether it is being flushed through the
/// error channel. The returned value becomes the process exit status when
/// flushing is followed by termination (see [Parser::parse]).
///
/// [Parser::parse]: crate::Parser::parse
pub type OutputPolicy = Box<dyn FnMut(&str, bool) -> i32>;

/// Shared buffer and flush policy for help, version and error text.
///
/// One sink is created lazily by the first parser that needs it and then
/// shared by reference across the entire parser tree, so output
/// redirection configured on a root applies uniformly to every
/// sub-command.
#[derive(Default)]
pub struct OutputSink {
    buf: String,
    policy: Option<OutputPolicy>,
}

impl OutputSink {
    /// Create a sink with the default policy (write to the standard
    /// streams).
    pub fn new() -> Self {
        OutputSink::default()
    }

    /// Append text to the buffer.
    pub fn write(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Install a custom flush policy, replacing the default stream
    /// behaviour.
    pub fn set_policy(&mut self, policy: OutputPolicy) {
        self.policy = Some(policy);
    }

    /// Flush the buffer and return an exit status.
    ///
    /// With no custom policy installed, the buffer is written to stderr
    /// when `is_error` is set (status 1) and to stdout otherwise
    /// (status 0). With a custom policy, the policy's return value is the
    /// status. The buffer is emptied either way.
    pub fn flush(&mut self, is_error: bool) -> i32 {
        let text = mem::take(&mut self.buf);

        match self.policy.as_mut() {
            Some(policy) => policy(&text, is_error),
            None if is_error => {
                eprint!("{}", text);
                1
            }
            None => {
                print!("{}", text);
                0
            }
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink")
            .field("buf", &self.buf)
            .field("policy", &self.policy.is_some())
            .finish()
    }
}
