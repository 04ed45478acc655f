use std::collections::{BTreeMap, BTreeSet};

use crate::util::join_path;

/// One node of the derived project tree. Directories exist only because some
/// file path passes through them; the flat store never represents them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TreeNode {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) is_dir: bool,
    pub(crate) children: Vec<TreeNode>,
}

#[derive(Default)]
struct Level {
    dirs: BTreeMap<String, Level>,
    files: BTreeSet<String>,
}

impl Level {
    fn insert(&mut self, segments: &[&str]) {
        match segments {
            [] => {}
            [leaf] => {
                self.files.insert((*leaf).to_string());
            }
            [dir, rest @ ..] => {
                self.dirs.entry((*dir).to_string()).or_default().insert(rest);
            }
        }
    }

    fn emit(&self, parent: &str) -> Vec<TreeNode> {
        let mut nodes = Vec::with_capacity(self.dirs.len() + self.files.len());
        for (name, level) in &self.dirs {
            let path = join_path(parent, name);
            nodes.push(TreeNode {
                name: name.clone(),
                children: level.emit(&path),
                path,
                is_dir: true,
            });
        }
        for name in &self.files {
            nodes.push(TreeNode {
                name: name.clone(),
                path: join_path(parent, name),
                is_dir: false,
                children: Vec::new(),
            });
        }
        nodes
    }
}

/// Derive the hierarchical tree from a flat set of slash-separated paths.
/// Pure in the path set: ordering and duplicates in the input never change
/// the result. Siblings come out directories first, each group sorted
/// lexicographically.
pub(crate) fn build_tree<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<TreeNode> {
    let mut root = Level::default();
    for path in paths {
        let segments: Vec<&str> = path.split('/').collect();
        root.insert(&segments);
    }
    root.emit("")
}
