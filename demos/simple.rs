// SPDX-License-Identifier: Apache-2.0
//

//! A small program showing flags, options and positional arguments.
//!
//! Try:
//!
//! ```bash
//! $ cargo run --example simple -- -d --out report.txt one two
//! $ cargo run --example simple -- --help
//! $ cargo run --example simple -- -- --not-an-option
//! ```

use argot::{ArgCount, Parser};

fn main() {
    let mut parser = Parser::new();

    parser
        .helptext("Usage: simple [options] <file>...")
        .version("0.2.0")
        .flag("debug d", "Enable debug output")
        .option("out o", "out.txt", "Write output to this file")
        .expect_args(ArgCount::AtLeast(1));

    // Terminates the process on --help, --version or any parse error.
    parser.parse();

    println!("debug enabled: {} ({}x)", parser.found("debug"), parser.count("d"));
    println!("output file:   {}", parser.value("out"));
    println!("files:         {:?}", parser.args());

    println!();
    println!("{}", parser);
}
