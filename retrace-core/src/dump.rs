//! Graphviz rendering of compiled patterns
//!
//! A convenience sink for debugging: renders the NFA or the AST as Graphviz
//! DOT source and writes it next to the caller's chosen directory. Feeding
//! the output through `dot -Tpdf` gives the usual state diagram. Nothing
//! here affects matching semantics.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ast::Expr;
use crate::engine::Regex;
use crate::nfa::Nfa;

impl Regex {
    /// Write the compiled NFA as `<filename>.dot` under `dir`
    pub fn dump_nfa(&self, filename: &str, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        write_dot(nfa_dot(&self.nfa), filename, dir)
    }

    /// Write the parsed AST as `<filename>.dot` under `dir`
    pub fn dump_ast(&self, filename: &str, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        write_dot(ast_dot(&self.ast), filename, dir)
    }
}

fn write_dot(source: String, filename: &str, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = dir.as_ref().join(format!("{filename}.dot"));
    fs::write(&path, source)?;
    Ok(path)
}

/// Render an NFA as DOT source
///
/// Accepting states are doublecircles; the start state is marked by an
/// arrow from a point node. Edges carry the matcher label plus any group
/// boundary annotation.
pub fn nfa_dot(nfa: &Nfa) -> String {
    let mut out = String::from("digraph nfa {\n");

    for id in 0..nfa.state_count() {
        let shape = if nfa.is_accepting(id) {
            "doublecircle"
        } else {
            "circle"
        };
        let _ = writeln!(
            out,
            "    {name} [label=\"{name}\", shape={shape}];",
            name = Nfa::state_name(id),
        );
    }

    for id in 0..nfa.state_count() {
        for transition in nfa.state(id).transitions() {
            let mut label = escape(&transition.matcher.label());
            if let Some(group) = transition.start_group {
                let _ = write!(label, "\\nStart: {group}");
            } else if let Some(group) = transition.end_group {
                let _ = write!(label, "\\nEnd: {group}");
            }
            let _ = writeln!(
                out,
                "    {} -> {} [label=\"{}\"];",
                Nfa::state_name(id),
                Nfa::state_name(transition.target),
                label,
            );
        }
    }

    let _ = writeln!(out, "    _ [shape=point];");
    let _ = writeln!(out, "    _ -> {};", Nfa::state_name(nfa.start()));
    out.push_str("}\n");
    out
}

/// Render an AST as DOT source, one node per operator
pub fn ast_dot(expr: &Expr) -> String {
    let mut out = String::from("digraph ast {\n");
    let mut next = 0usize;
    walk(expr, &mut next, &mut out);
    out.push_str("}\n");
    out
}

fn walk(expr: &Expr, next: &mut usize, out: &mut String) -> usize {
    let id = *next;
    *next += 1;
    let _ = writeln!(out, "    n{id} [label=\"{}\"];", escape(&expr.label()));
    for child in expr.children() {
        let child_id = walk(child, next, out);
        let _ = writeln!(out, "    n{id} -> n{child_id};");
    }
    id
}

/// Escape a label for a double-quoted DOT string
fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            c if c.is_control() => {
                let _ = write!(escaped, "\\\\x{:02x}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfa_dot_shape() {
        let regex = Regex::new("a|b").unwrap();
        let dot = nfa_dot(&regex.nfa);
        assert!(dot.starts_with("digraph nfa {"));
        assert!(dot.contains("doublecircle"));
        assert!(dot.contains("_ -> q"));
        assert!(dot.contains("\u{3b5}"));
    }

    #[test]
    fn test_nfa_dot_group_annotations() {
        let regex = Regex::new("(a)").unwrap();
        let dot = nfa_dot(&regex.nfa);
        assert!(dot.contains("Start: 1"));
        assert!(dot.contains("End: 1"));
    }

    #[test]
    fn test_ast_dot_shape() {
        let regex = Regex::new("a|b*").unwrap();
        let dot = ast_dot(&regex.ast);
        assert!(dot.starts_with("digraph ast {"));
        assert!(dot.contains("label=\"|\""));
        assert!(dot.contains("label=\"*\""));
        assert!(dot.contains("n0 -> n1"));
    }

    #[test]
    fn test_escape_quotes_and_controls() {
        assert_eq!(escape("a\"b"), "a\\\"b");
        assert_eq!(escape("\\1"), "\\\\1");
        assert_eq!(escape("\n"), "\\\\x0a");
    }

    #[test]
    fn test_dump_writes_files() {
        let regex = Regex::new("ab").unwrap();
        let dir = std::env::temp_dir();
        let path = regex.dump_nfa("retrace_dump_test_nfa", &dir).unwrap();
        assert!(path.ends_with("retrace_dump_test_nfa.dot"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("digraph nfa {"));
        let _ = fs::remove_file(path);
    }
}
