//! Flat record list -> nested tree for presentation.

use std::collections::HashMap;

use super::types::{FileRecord, TreeNode, ROOT_ID};

/// Build the forest shown to clients from a flat record listing.
///
/// Top-level nodes are records whose parent is null, the root sentinel, or does not
/// resolve to a folder in `records`. The root record itself never appears; its
/// children come out at the top. Sibling order follows the order of `records`.
pub fn assemble_tree(records: &[FileRecord]) -> Vec<TreeNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        index.entry(r.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut tops: Vec<usize> = Vec::new();
    for (i, r) in records.iter().enumerate() {
        if r.is_root() { continue; }
        match attach_point(records, &index, r) {
            Some(p) if p != i => children[p].push(i),
            _ => tops.push(i),
        }
    }

    let mut visited = vec![false; records.len()];
    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut visit_order: Vec<usize> = Vec::with_capacity(records.len());
    for &t in tops.iter() {
        visited[t] = true;
        walk(t, &children, &mut visited, &mut tree_children, &mut visit_order);
    }
    // Anything left over sits on a parent cycle; surface it instead of dropping it.
    for (i, r) in records.iter().enumerate() {
        if r.is_root() || visited[i] { continue; }
        visited[i] = true;
        tops.push(i);
        walk(i, &children, &mut visited, &mut tree_children, &mut visit_order);
    }

    // Parents are visited before their children, so build in reverse.
    let mut built: Vec<Option<TreeNode>> = vec![None; records.len()];
    for &i in visit_order.iter().rev() {
        let rec = &records[i];
        let kids = if rec.kind.is_folder() {
            Some(tree_children[i].iter().filter_map(|&c| built[c].take()).collect())
        } else {
            None
        };
        built[i] = Some(TreeNode { record: rec.clone(), children: kids });
    }

    tops.into_iter().filter_map(|t| built[t].take()).collect()
}

/// Index of the folder `rec` hangs under, if it resolves to one other than the root.
fn attach_point(records: &[FileRecord], index: &HashMap<&str, usize>, rec: &FileRecord) -> Option<usize> {
    let pid = rec.parent_id.as_deref()?;
    if pid == ROOT_ID { return None; }
    let p = *index.get(pid)?;
    if records[p].kind.is_folder() { Some(p) } else { None }
}

fn walk(
    start: usize,
    children: &[Vec<usize>],
    visited: &mut [bool],
    tree_children: &mut [Vec<usize>],
    visit_order: &mut Vec<usize>,
) {
    let mut stack = vec![start];
    while let Some(cur) = stack.pop() {
        visit_order.push(cur);
        for &c in children[cur].iter() {
            if visited[c] { continue; }
            visited[c] = true;
            tree_children[cur].push(c);
            stack.push(c);
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
