//! Per-section file tree

use crate::patch::DiffFile;
use crate::section::DiffSection;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Section,
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Display path for files, directory path for directories, empty for
    /// section roots
    pub path: String,
    pub kind: NodeKind,
    pub section: DiffSection,
    pub additions: usize,
    pub deletions: usize,
    pub touched_files: usize,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn section_root(section: DiffSection, children: Vec<TreeNode>) -> Self {
        let (additions, deletions, touched_files) = aggregate(&children);
        Self {
            name: section.display_name().to_string(),
            path: String::new(),
            kind: NodeKind::Section,
            section,
            additions,
            deletions,
            touched_files,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Node at a path of child indices, relative to this node
    pub fn descend(&self, path: &[usize]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(self, |node, &idx| node.children.get(idx))
    }
}

/// Tree for one section plus the lookups navigation needs
#[derive(Debug, Clone, Default)]
pub struct SectionTree {
    pub roots: Vec<TreeNode>,
    /// File paths in tree order, unique
    pub ordered_paths: Vec<String>,
    /// File path to tree location; the first element is the section index
    pub tree_index: FxHashMap<String, Vec<usize>>,
}

#[derive(Default)]
struct DirBuilder<'a> {
    dirs: BTreeMap<String, DirBuilder<'a>>,
    files: BTreeMap<String, &'a DiffFile>,
}

/// Directories before files, each group sorted by name
pub fn build_section_tree(
    section: DiffSection,
    section_index: usize,
    files: &[DiffFile],
) -> SectionTree {
    let mut root = DirBuilder::default();
    let mut seen = FxHashSet::default();
    for file in files {
        if !seen.insert(file.display_path.as_str()) {
            continue;
        }
        let mut parts: Vec<&str> = file
            .display_path
            .split('/')
            .filter(|part| !part.is_empty())
            .collect();
        let Some(name) = parts.pop() else {
            continue;
        };
        let mut dir = &mut root;
        for part in parts {
            dir = dir.dirs.entry(part.to_string()).or_default();
        }
        dir.files.entry(name.to_string()).or_insert(file);
    }

    let roots = build_children(root, "", section);
    let mut tree = SectionTree {
        roots,
        ..SectionTree::default()
    };
    let mut location = vec![section_index];
    index_nodes(
        &tree.roots,
        &mut location,
        &mut tree.ordered_paths,
        &mut tree.tree_index,
    );
    tree
}

fn build_children(dir: DirBuilder<'_>, prefix: &str, section: DiffSection) -> Vec<TreeNode> {
    let mut nodes = Vec::with_capacity(dir.dirs.len() + dir.files.len());
    for (name, child) in dir.dirs {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        let children = build_children(child, &path, section);
        let (additions, deletions, touched_files) = aggregate(&children);
        nodes.push(TreeNode {
            name,
            path,
            kind: NodeKind::Directory,
            section,
            additions,
            deletions,
            touched_files,
            children,
        });
    }
    for (name, file) in dir.files {
        nodes.push(TreeNode {
            name,
            path: file.display_path.clone(),
            kind: NodeKind::File,
            section,
            additions: file.additions,
            deletions: file.deletions,
            touched_files: 1,
            children: Vec::new(),
        });
    }
    nodes
}

fn aggregate(nodes: &[TreeNode]) -> (usize, usize, usize) {
    nodes.iter().fold((0, 0, 0), |(add, del, touched), node| {
        (
            add + node.additions,
            del + node.deletions,
            touched + node.touched_files,
        )
    })
}

fn index_nodes(
    nodes: &[TreeNode],
    location: &mut Vec<usize>,
    ordered: &mut Vec<String>,
    index: &mut FxHashMap<String, Vec<usize>>,
) {
    for (idx, node) in nodes.iter().enumerate() {
        location.push(idx);
        if node.is_leaf() {
            ordered.push(node.path.clone());
            index.insert(node.path.clone(), location.clone());
        } else {
            index_nodes(&node.children, location, ordered, index);
        }
        location.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, additions: usize, deletions: usize) -> DiffFile {
        DiffFile {
            display_path: path.to_string(),
            new_path: Some(path.to_string()),
            old_path: Some(path.to_string()),
            additions,
            deletions,
            ..DiffFile::default()
        }
    }

    #[test]
    fn test_directories_before_files() {
        let files = vec![
            file("z.txt", 1, 0),
            file("src/main.rs", 2, 1),
            file("a.txt", 0, 3),
            file("src/app/mod.rs", 4, 0),
        ];
        let tree = build_section_tree(DiffSection::Unstaged, 0, &files);
        assert_eq!(
            tree.ordered_paths,
            vec!["src/app/mod.rs", "src/main.rs", "a.txt", "z.txt"]
        );
        assert_eq!(tree.roots[0].name, "src");
        assert_eq!(tree.roots[0].kind, NodeKind::Directory);
        assert_eq!(tree.roots[0].touched_files, 2);
        assert_eq!(tree.roots[0].additions, 6);
        assert_eq!(tree.roots[0].children[0].path, "src/app");
    }

    #[test]
    fn test_tree_index_is_prefixed_with_section_index() {
        let files = vec![file("src/main.rs", 1, 0), file("b.txt", 1, 0)];
        let tree = build_section_tree(DiffSection::Staged, 1, &files);
        assert_eq!(tree.tree_index["src/main.rs"], vec![1, 0, 0]);
        assert_eq!(tree.tree_index["b.txt"], vec![1, 1]);

        let root = TreeNode::section_root(DiffSection::Staged, tree.roots.clone());
        let node = root.descend(&tree.tree_index["src/main.rs"][1..]).unwrap();
        assert_eq!(node.path, "src/main.rs");
        assert_eq!(root.touched_files, 2);
    }

    #[test]
    fn test_duplicate_paths_are_kept_once() {
        let files = vec![file("a.txt", 1, 0), file("a.txt", 5, 5)];
        let tree = build_section_tree(DiffSection::Files, 0, &files);
        assert_eq!(tree.ordered_paths, vec!["a.txt"]);
        assert_eq!(tree.roots[0].additions, 1);
    }

    #[test]
    fn test_empty_section() {
        let tree = build_section_tree(DiffSection::Unstaged, 0, &[]);
        assert!(tree.roots.is_empty());
        assert!(tree.ordered_paths.is_empty());
    }
}
