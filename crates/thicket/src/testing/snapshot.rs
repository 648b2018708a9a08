//! # Snapshot Testing Utilities
//!
//! This module provides utilities for snapshot testing of parse trees.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use thicket::testing::SnapshotTester;
//!
//! let tester = SnapshotTester::new("snapshots");
//! tester.assert_snapshot("basic_greeting", &node);
//! ```

use crate::error::ParseError;
use crate::node::Node;
use std::fmt::Write;
use std::path::PathBuf;

/// Snapshot tester for parse trees
pub struct SnapshotTester {
    snapshot_dir: PathBuf,
    update_mode: bool,
}

impl SnapshotTester {
    /// Create a new snapshot tester
    #[must_use]
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        let update_mode = std::env::var("UPDATE_SNAPSHOTS").is_ok()
            || std::env::var("THICKET_UPDATE_SNAPSHOTS").is_ok();
        Self {
            snapshot_dir: snapshot_dir.into(),
            update_mode,
        }
    }

    /// Set update mode (for updating existing snapshots)
    #[must_use]
    pub const fn with_update_mode(mut self, update: bool) -> Self {
        self.update_mode = update;
        self
    }

    /// Assert that a parse tree matches the snapshot
    ///
    /// # Panics
    /// Panics if the snapshot doesn't match (and update mode is disabled)
    pub fn assert_snapshot(&self, name: &str, node: &Node) {
        self.check_snapshot(name, &format_node(node));
    }

    fn check_snapshot(&self, name: &str, actual: &str) {
        let path = self.snapshot_dir.join(format!("{name}.snap"));

        if self.update_mode {
            std::fs::create_dir_all(&self.snapshot_dir).ok();
            std::fs::write(&path, actual).expect("Failed to write snapshot");
            return;
        }

        if path.exists() {
            let expected = std::fs::read_to_string(&path).expect("Failed to read snapshot");
            assert!(
                actual == expected,
                "Snapshot mismatch for '{name}':\n\
                --- Expected ---\n{expected}\n\
                --- Actual ---\n{actual}\n\
                \n\
                To update snapshots, run with UPDATE_SNAPSHOTS=1"
            );
        } else {
            panic!(
                "Snapshot '{name}' not found at {}.\n\
                To create it, run with UPDATE_SNAPSHOTS=1",
                path.display()
            );
        }
    }
}

/// Format a parse tree as an indented string, one node per line.
///
/// Each line shows the tagging rule (or the node's shape when untagged),
/// the matched interval, and for terminals the matched text.
#[must_use]
pub fn format_node(node: &Node) -> String {
    let mut result = String::new();
    write_node(node, 0, &mut result);
    result
}

fn write_node(node: &Node, indent: usize, result: &mut String) {
    let indent_str = "  ".repeat(indent);
    let label = node.rule().unwrap_or_else(|| {
        if node.is_empty() {
            "empty"
        } else if node.terminal_text().is_some() {
            "terminal"
        } else {
            "composite"
        }
    });

    match node.terminal_text() {
        Some(text) => writeln!(result, "{indent_str}{label}@{} {text:?}", node.interval()),
        None => writeln!(result, "{indent_str}{label}@{}", node.interval()),
    }
    .unwrap();

    for child in node.children() {
        write_node(child, indent + 1, result);
    }
}

/// Parse outcome assertion helpers
pub trait ParseOutcomeAssertions {
    /// Assert that parsing succeeded, returning the tree
    fn assert_ok(&self) -> &Node;
    /// Assert that parsing failed with a message containing the substring
    fn assert_error_contains(&self, substring: &str);
}

impl ParseOutcomeAssertions for Result<Node, ParseError> {
    fn assert_ok(&self) -> &Node {
        match self {
            Ok(node) => node,
            Err(error) => panic!("Expected a successful parse, got: {error}"),
        }
    }

    fn assert_error_contains(&self, substring: &str) {
        match self {
            Ok(node) => panic!(
                "Expected a parse error containing '{substring}', got a tree covering {}",
                node.interval()
            ),
            Err(error) => {
                let message = error.to_string();
                assert!(
                    message.contains(substring),
                    "No '{substring}' in error message: {message}"
                );
            }
        }
    }
}
