//! Text rendering of forests via termtree

use generational_arena::Index;
use termtree::Tree;

use crate::domain::Forest;

pub trait ForestDisplay<T> {
    /// One `termtree` per root; `line` renders a single node.
    fn to_tree_strings<F>(&self, line: F) -> Vec<Tree<String>>
    where
        F: Fn(&T) -> String;
}

impl<T> ForestDisplay<T> for Forest<T> {
    fn to_tree_strings<F>(&self, line: F) -> Vec<Tree<String>>
    where
        F: Fn(&T) -> String,
    {
        fn build_tree<T, F>(forest: &Forest<T>, node_idx: Index, line: &F) -> Option<Tree<String>>
        where
            F: Fn(&T) -> String,
        {
            let node = forest.get_node(node_idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(forest, child, line))
                .collect();
            Some(Tree::new(line(&node.data)).with_leaves(leaves))
        }

        self.roots()
            .iter()
            .filter_map(|&root| build_tree(self, root, &line))
            .collect()
    }
}

/// Renders the whole forest as one string, trees separated by newlines.
pub fn render_forest<T, F>(forest: &Forest<T>, line: F) -> String
where
    F: Fn(&T) -> String,
{
    forest
        .to_tree_strings(line)
        .iter()
        .map(ToString::to_string)
        .collect()
}
