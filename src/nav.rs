use std::collections::HashSet;

use crate::tree::TreeNode;
use crate::util::{is_under, parent_of};

/// One visible row of the explorer: the tree flattened in display order,
/// honoring which directories are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlatEntry {
    pub(crate) path: String,
    pub(crate) is_dir: bool,
    pub(crate) depth: usize,
}

pub(crate) fn flatten(nodes: &[TreeNode], expanded: &HashSet<String>) -> Vec<FlatEntry> {
    let mut rows = Vec::new();
    push_rows(nodes, expanded, 0, &mut rows);
    rows
}

fn push_rows(
    nodes: &[TreeNode],
    expanded: &HashSet<String>,
    depth: usize,
    rows: &mut Vec<FlatEntry>,
) {
    for node in nodes {
        rows.push(FlatEntry {
            path: node.path.clone(),
            is_dir: node.is_dir,
            depth,
        });
        if node.is_dir && expanded.contains(&node.path) {
            push_rows(&node.children, expanded, depth + 1, rows);
        }
    }
}

/// Move the selection by `delta` rows, clamping at both ends; no wraparound.
pub(crate) fn step_selection(len: usize, current: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    let next = current.min(max) as isize + delta;
    next.clamp(0, max as isize) as usize
}

/// What pressing Right on a row does.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Descend {
    Expand(String),
    Select(usize),
    Stay,
}

pub(crate) fn descend(rows: &[FlatEntry], expanded: &HashSet<String>, i: usize) -> Descend {
    let Some(row) = rows.get(i) else {
        return Descend::Stay;
    };
    if !row.is_dir {
        return Descend::Stay;
    }
    if !expanded.contains(&row.path) {
        return Descend::Expand(row.path.clone());
    }
    // Already open: step onto the first child if there is one.
    match rows.get(i + 1) {
        Some(next) if is_under(&next.path, &row.path) => Descend::Select(i + 1),
        _ => Descend::Stay,
    }
}

/// What pressing Left on a row does.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Ascend {
    Collapse(String),
    Select(usize),
    Stay,
}

pub(crate) fn ascend(rows: &[FlatEntry], expanded: &HashSet<String>, i: usize) -> Ascend {
    let Some(row) = rows.get(i) else {
        return Ascend::Stay;
    };
    if row.is_dir && expanded.contains(&row.path) {
        return Ascend::Collapse(row.path.clone());
    }
    let Some(parent) = parent_of(&row.path) else {
        return Ascend::Stay;
    };
    rows.iter()
        .position(|r| r.is_dir && r.path == parent)
        .map_or(Ascend::Stay, Ascend::Select)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    fn expanded(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(ToString::to_string).collect()
    }

    fn paths(rows: &[FlatEntry]) -> Vec<&str> {
        rows.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn flatten_skips_collapsed_subtrees() {
        let tree = build_tree(["src/a.py", "src/sub/b.py", "top.py"]);
        let rows = flatten(&tree, &expanded(&[]));
        assert_eq!(paths(&rows), vec!["src", "top.py"]);

        // Directories sort before files among siblings.
        let rows = flatten(&tree, &expanded(&["src"]));
        assert_eq!(paths(&rows), vec!["src", "src/sub", "src/a.py", "top.py"]);

        let rows = flatten(&tree, &expanded(&["src", "src/sub"]));
        assert_eq!(
            paths(&rows),
            vec!["src", "src/sub", "src/sub/b.py", "src/a.py", "top.py"]
        );
        assert_eq!(rows[2].depth, 2);
    }

    #[test]
    fn step_selection_clamps_at_both_ends() {
        assert_eq!(step_selection(3, 0, -1), 0);
        assert_eq!(step_selection(3, 0, 1), 1);
        assert_eq!(step_selection(3, 2, 1), 2);
        assert_eq!(step_selection(3, 2, -5), 0);
        assert_eq!(step_selection(0, 0, 1), 0);
    }

    #[test]
    fn descend_expands_then_steps_into_first_child() {
        let tree = build_tree(["src/a.py", "top.py"]);
        let none = expanded(&[]);
        let rows = flatten(&tree, &none);
        assert_eq!(descend(&rows, &none, 0), Descend::Expand("src".to_string()));

        let open = expanded(&["src"]);
        let rows = flatten(&tree, &open);
        assert_eq!(descend(&rows, &open, 0), Descend::Select(1));
        // Files do not descend.
        assert_eq!(descend(&rows, &open, 1), Descend::Stay);
    }

    #[test]
    fn descend_past_the_last_row_stays() {
        let tree = build_tree(["src/a.py"]);
        let open = expanded(&["src"]);
        let rows = flatten(&tree, &open);
        assert_eq!(descend(&rows, &open, rows.len()), Descend::Stay);
    }

    #[test]
    fn ascend_collapses_open_dir_then_jumps_to_parent() {
        let tree = build_tree(["src/sub/b.py", "src/a.py"]);
        let open = expanded(&["src", "src/sub"]);
        let rows = flatten(&tree, &open);
        // rows: src, src/sub, src/sub/b.py, src/a.py
        assert_eq!(ascend(&rows, &open, 1), Ascend::Collapse("src/sub".to_string()));
        assert_eq!(ascend(&rows, &open, 2), Ascend::Select(1));
        assert_eq!(ascend(&rows, &open, 3), Ascend::Select(0));
        // Top-level rows have no parent to jump to.
        assert_eq!(ascend(&rows, &open, 0), Ascend::Collapse("src".to_string()));
        let closed = expanded(&[]);
        let rows = flatten(&tree, &closed);
        assert_eq!(ascend(&rows, &closed, 0), Ascend::Stay);
    }
}
