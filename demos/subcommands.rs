// SPDX-License-Identifier: Apache-2.0
//

//! A program with two sub-commands and a post-parse callback.
//!
//! Try:
//!
//! ```bash
//! $ cargo run --example subcommands -- build --target release src/
//! $ cargo run --example subcommands -- clean
//! $ cargo run --example subcommands -- help build
//! ```

use argot::Parser;

fn main() {
    let mut parser = Parser::new();

    parser
        .helptext("Usage: tool <command> [options]")
        .version("0.2.0");

    let build = parser.command(
        "build b",
        "Usage: tool build [options] <dir>...",
        "Compile the project",
    );

    build
        .borrow_mut()
        .option("target t", "debug", "Build the named target")
        .callback(|name, cmd| {
            println!("running '{}' for target '{}'", name, cmd.value("target"));
            println!("directories: {:?}", cmd.args());
        });

    let clean = parser.command("clean", "Usage: tool clean", "Remove build artifacts");

    clean.borrow_mut().callback(|name, _cmd| {
        println!("running '{}'", name);
    });

    parser.parse();

    if !parser.command_found() {
        println!("no command given, try 'tool --help'");
    }
}
