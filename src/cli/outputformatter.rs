use std::io::IsTerminal;

use terminal_size::{terminal_size, Height, Width};

use crate::storage::{FileRecord, TreeNode};

const FOLDER_COLOR: &str = "\x1b[1;34m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Print a file tree with box-drawing connectors, one node per line.
pub fn print_tree(nodes: &[TreeNode]) {
    let color = std::io::stdout().is_terminal();
    let termw = get_terminal_width();
    crate::tprintln!("[cli.outputformatter] detected terminal width={} columns", termw);
    if nodes.is_empty() {
        println!("(empty)");
        return;
    }
    for line in render_tree(nodes, color, termw) {
        println!("{}", line);
    }
}

/// Render a tree as text lines. Each line is fitted to `maxw` visible columns.
/// Top-level nodes print flush left; connectors start with their children.
pub fn render_tree(nodes: &[TreeNode], color: bool, maxw: usize) -> Vec<String> {
    let mut out = Vec::new();
    // (node, indent prefix, last among siblings, top level)
    let mut stack: Vec<(&TreeNode, String, bool, bool)> = nodes.iter().rev().map(|n| (n, String::new(), false, true)).collect();
    while let Some((node, prefix, last, top)) = stack.pop() {
        let connector = if top { "" } else if last { "└── " } else { "├── " };
        let line = format!("{}{}{}", prefix, connector, label(node, color));
        out.push(fit_line_to_width(&line, maxw));

        let child_prefix = if top { String::new() } else { format!("{}{}", prefix, if last { "    " } else { "│   " }) };
        let kids = node.children();
        for (i, c) in kids.iter().enumerate().rev() {
            stack.push((c, child_prefix.clone(), i + 1 == kids.len(), false));
        }
    }
    out
}

fn label(node: &TreeNode, color: bool) -> String {
    let rec = &node.record;
    let name = if rec.kind.is_folder() { format!("{}/", rec.name) } else { rec.name.clone() };
    let shown_id = if rec.id == rec.name { String::new() } else { format!("  [{}]", rec.id) };
    if color {
        let name = if rec.kind.is_folder() { format!("{}{}{}", FOLDER_COLOR, name, RESET) } else { name };
        let shown_id = if shown_id.is_empty() { shown_id } else { format!("{}{}{}", DIM, shown_id, RESET) };
        format!("{}{}", name, shown_id)
    } else {
        format!("{}{}", name, shown_id)
    }
}

/// Print a flat record listing as an ASCII table.
pub fn print_records(records: &[FileRecord]) {
    let termw = get_terminal_width();
    for line in render_records(records) {
        println!("{}", fit_line_to_width(&line, termw));
    }
    println!("{} record(s)", records.len());
}

pub fn render_records(records: &[FileRecord]) -> Vec<String> {
    let max_col_width: usize = 48; // cap to keep output readable
    let cols: Vec<String> = ["id", "kind", "parentId", "name"].iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<String>> = records.iter().map(|r| vec![
        r.id.clone(),
        r.kind.as_str().to_string(),
        r.parent_id.clone().unwrap_or_else(|| "-".to_string()),
        r.name.clone(),
    ]).collect();

    let mut widths: Vec<usize> = cols.iter().map(|s| s.len()).collect();
    for r in &rows {
        for (i, cell) in r.iter().enumerate() {
            let w = visible_len(cell).min(max_col_width);
            if w > widths[i] { widths[i] = w; }
        }
    }

    let sep = build_separator(&widths);
    let mut out = vec![sep.clone(), build_row(&cols, &widths), sep.clone()];
    for r in &rows {
        out.push(build_row(r, &widths));
    }
    out.push(sep);
    out
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (cell, w) in cells.iter().zip(widths.iter()) {
        let text = truncate(cell, *w);
        let pad = w.saturating_sub(visible_len(&text));
        s.push(' ');
        s.push_str(&text);
        s.push_str(&" ".repeat(pad));
        s.push_str(" |");
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    let take = max - 1;
    s.chars().take(take).collect::<String>() + "…"
}

// --- Terminal fitting & ANSI helpers ---

fn get_terminal_width() -> usize {
    if let Some((Width(w), Height(_h))) = terminal_size() {
        return (w as usize).saturating_sub(1).max(20);
    }
    80
}

/// Cut a line to `maxw` visible chars, keeping escape sequences intact and ending with a reset.
fn fit_line_to_width(s: &str, maxw: usize) -> String {
    if visible_len(s) <= maxw { return s.to_string(); }
    let budget = maxw.saturating_sub(1);
    let mut out = String::new();
    let mut seen = 0usize;
    let mut chars = s.chars().peekable();
    let mut had_ansi = false;
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            had_ansi = true;
            out.push(ch);
            if chars.peek() == Some(&'[') {
                for c in chars.by_ref() {
                    out.push(c);
                    if c.is_ascii_alphabetic() { break; }
                }
            }
            continue;
        }
        if seen >= budget { break; }
        out.push(ch);
        seen += 1;
    }
    out.push('…');
    if had_ansi { out.push_str(RESET); }
    out
}

fn visible_len(s: &str) -> usize {
    // Count visible Unicode chars, skipping ANSI escape sequences
    let mut count = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() { break; }
                }
            }
            continue;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
#[path = "outputformatter_tests.rs"]
mod outputformatter_tests;
