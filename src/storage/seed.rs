//! Sample project loaded into a fresh store on startup.
//! Seed records use their names as ids so clients can address them directly.

use super::types::{FileKind, FileRecord, ROOT_ID};

fn folder(name: &str, parent: &str) -> FileRecord {
    FileRecord { id: name.to_string(), name: name.to_string(), kind: FileKind::Folder, parent_id: Some(parent.to_string()), content: None }
}

fn file(name: &str, parent: &str, content: &str) -> FileRecord {
    FileRecord {
        id: name.to_string(),
        name: name.to_string(),
        kind: FileKind::File,
        parent_id: Some(parent.to_string()),
        content: Some(content.to_string()),
    }
}

/// Records placed under the root, parents before children. The root itself is not included.
pub fn default_records() -> Vec<FileRecord> {
    vec![
        folder(".git", ROOT_ID),
        folder("api", ROOT_ID),
        folder("docs", ROOT_ID),
        folder("frontend", ROOT_ID),
        file("index.js", "frontend", "function greet(name) {\n  console.log(`Hello, ${name}!`);\n}\n\ngreet(\"World\");\n"),
        file("app.js", "frontend", "// App.js\nconsole.log(\"App started\");\n"),
        file("styles.css", "frontend", "body {\n  margin: 0;\n  padding: 0;\n}\n"),
        file("README.md", ROOT_ID, "# Project\n\nWelcome to your project!\n"),
    ]
}
