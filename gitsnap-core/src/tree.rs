use std::collections::BTreeMap;

pub const TREE_HEADER: &str = "Project structure (filtered):";

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

impl Node {
    fn insert(&mut self, relative_path: &str) {
        let mut current = self;
        for part in relative_path.split('/').filter(|p| !p.is_empty()) {
            current = current.children.entry(part.to_string()).or_default();
        }
    }

    fn render(&self, indent: &str, lines: &mut Vec<String>) {
        // Directories first, then files, each alphabetical.
        let mut entries: Vec<(&String, &Node)> = self.children.iter().collect();
        entries.sort_by(|a, b| {
            (a.1.children.is_empty(), a.0).cmp(&(b.1.children.is_empty(), b.0))
        });

        let last = entries.len().saturating_sub(1);
        for (i, (name, node)) in entries.into_iter().enumerate() {
            let connector = if i == last { "└── " } else { "├── " };
            lines.push(format!("{indent}{connector}{name}"));
            if !node.children.is_empty() {
                let extension = if i == last { "    " } else { "│   " };
                node.render(&format!("{indent}{extension}"), lines);
            }
        }
    }
}

/// Renders `/`-separated relative paths as a box-drawing tree under `root_name`.
pub fn render<S: AsRef<str>>(root_name: &str, relative_paths: &[S]) -> String {
    let mut root = Node::default();
    for path in relative_paths {
        root.insert(path.as_ref());
    }

    let mut lines = Vec::new();
    root.render("", &mut lines);

    format!("{}\n{}\n{}", TREE_HEADER, root_name, lines.join("\n"))
}
