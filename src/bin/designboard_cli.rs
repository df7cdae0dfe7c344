//!
//! designboard CLI binary
//! -----------------------
//! Command-line client for a running designboard server: browse the tree, inspect
//! records, and create, rename, edit or delete files and folders.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use designboard::cli::{print_records, print_tree, FilesClient, DEFAULT_BASE_URL};
use designboard::storage::{FileKind, FilePatch, FileRecord};

/// Command-line client for the designboard file tree API
#[derive(Parser, Debug)]
#[command(name = "designboard_cli", version)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, env = "DESIGNBOARD_URL", default_value = DEFAULT_BASE_URL, help = "Server base URL")]
    url: String,

    #[arg(long, global = true, help = "Print raw JSON instead of formatted output")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Show the file tree")]
    Tree,
    #[command(about = "List every record as a flat table, including the root")]
    Ls,
    #[command(about = "Show one record, with its content")]
    Get { id: String },
    #[command(about = "Create a folder")]
    Mkdir {
        name: String,
        #[arg(short, long, help = "Parent folder id (default: top level)")]
        parent: Option<String>,
    },
    #[command(about = "Create a file")]
    Touch {
        name: String,
        #[arg(short, long, help = "Parent folder id (default: top level)")]
        parent: Option<String>,
        #[arg(short, long, help = "Initial content")]
        content: Option<String>,
    },
    #[command(about = "Rename a file or folder")]
    Rename { id: String, name: String },
    #[command(about = "Replace the content of a file")]
    Write { id: String, content: String },
    #[command(about = "Delete a file, or a folder with everything under it")]
    Rm { id: String },
    #[command(about = "Check server health")]
    Health,
}

fn print_json<T: serde::Serialize>(v: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

fn print_record(rec: &FileRecord, as_json: bool) -> Result<()> {
    if as_json { return print_json(rec); }
    println!("id:       {}", rec.id);
    println!("name:     {}", rec.name);
    println!("kind:     {}", rec.kind.as_str());
    println!("parentId: {}", rec.parent_id.as_deref().unwrap_or("-"));
    if let Some(content) = rec.content.as_deref() {
        println!("---");
        print!("{}", content);
        if !content.ends_with('\n') { println!(); }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = CliArgs::parse();
    let client = FilesClient::new(&args.url)?;
    tracing::debug!("designboard_cli: base={}", client.base());

    match args.command {
        Commands::Tree => {
            let tree = client.tree().await?;
            if args.json { print_json(&tree)?; } else { print_tree(&tree); }
        }
        Commands::Ls => {
            let all = client.list().await?;
            if args.json { print_json(&all)?; } else { print_records(&all); }
        }
        Commands::Get { id } => {
            let rec = client.get(&id).await?;
            print_record(&rec, args.json)?;
        }
        Commands::Mkdir { name, parent } => {
            let rec = client.create(&name, FileKind::Folder, parent.as_deref(), None).await?;
            print_record(&rec, args.json)?;
        }
        Commands::Touch { name, parent, content } => {
            let rec = client.create(&name, FileKind::File, parent.as_deref(), content.as_deref()).await?;
            print_record(&rec, args.json)?;
        }
        Commands::Rename { id, name } => {
            let rec = client.update(&id, &FilePatch { name: Some(name), content: None }).await?;
            print_record(&rec, args.json)?;
        }
        Commands::Write { id, content } => {
            let rec = client.update(&id, &FilePatch { name: None, content: Some(content) }).await?;
            print_record(&rec, args.json)?;
        }
        Commands::Rm { id } => {
            if !client.delete(&id).await? {
                bail!("file not found: {}", id);
            }
            println!("deleted {}", id);
        }
        Commands::Health => {
            let v = client.health().await?;
            print_json(&v)?;
        }
    }
    Ok(())
}
