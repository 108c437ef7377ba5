// SPDX-License-Identifier: Apache-2.0
//

//! Hint collection and column-aligned help rendering.

use std::collections::HashMap;

/// One rendered row: the comma-joined display names sharing a hint, plus
/// the hint text itself.
#[derive(Debug)]
struct Row {
    names: String,
    hint: String,
}

/// Transient accumulator for (display name, hint) pairs, built afresh for
/// each help render.
///
/// Names added within one [collect] call that carry byte-identical hint
/// text are merged into a single row (aliases of a shared spec always
/// merge this way, since they reference one hint). Rows keep their
/// first-insertion order; the maximum merged-name width drives column
/// alignment.
///
/// [collect]: HintRegistry::collect
#[derive(Debug, Default)]
pub(crate) struct HintRegistry {
    rows: Vec<Row>,
    width: usize,
}

impl HintRegistry {
    pub(crate) fn new() -> Self {
        HintRegistry::default()
    }

    /// Add one collection pass of (name, hint) entries. Entries with an
    /// empty hint are skipped; entries sharing hint text merge into one
    /// row. Merging never crosses collect() calls.
    pub(crate) fn collect<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut index = HashMap::<String, usize>::new();

        for (name, hint) in entries {
            if hint.is_empty() {
                continue;
            }

            let row = match index.get(&hint) {
                Some(&existing) => {
                    let row = &mut self.rows[existing];
                    row.names.push_str(", ");
                    row.names.push_str(&name);
                    existing
                }
                None => {
                    index.insert(hint.clone(), self.rows.len());
                    self.rows.push(Row { names: name, hint });
                    self.rows.len() - 1
                }
            };

            self.width = self.width.max(self.rows[row].names.len());
        }
    }

    /// Render all rows under a section tag, e.g. `"\nOptions:\n"`.
    ///
    /// The hint column starts two spaces after the widest name. A hint
    /// containing embedded line breaks renders as one logical row whose
    /// continuation lines carry pure padding in place of the name.
    /// Nothing is emitted (tag included) when no rows were collected.
    pub(crate) fn render(&self, out: &mut String, tag: &str) {
        if self.rows.is_empty() {
            return;
        }

        out.push_str(tag);

        let width = self.width + 2;

        for row in &self.rows {
            for (i, line) in row.hint.lines().enumerate() {
                if i == 0 {
                    out.push_str("  ");
                    out.push_str(&row.names);
                    out.push_str(&" ".repeat(width - row.names.len()));
                } else {
                    out.push_str(&" ".repeat(width + 2));
                }

                out.push_str(line);
                out.push('\n');
            }
        }
    }
}

/// Decorate a flag alias for display: `-x` for single-character aliases,
/// `--name` otherwise.
pub(crate) fn flag_name(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{}", alias)
    } else {
        format!("--{}", alias)
    }
}

/// Decorate an option alias for display: `-x <arg>` for single-character
/// aliases, `--name=<arg>` otherwise.
pub(crate) fn option_name(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{} <arg>", alias)
    } else {
        format!("--{}=<arg>", alias)
    }
}
