//! solcanvas command-line tools.
//!
//! Provides the `solcanvas` binary for working with contract descriptions
//! outside the editor: normalising layouts, validating, inspecting a project
//! database, and scaffolding a project directory.
//!
//! Exit codes: 0 = success, 1 = invalid input, 2 = validation issues,
//! 3 = I/O or storage error.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use solcanvas_core::form::validate_graph;
use solcanvas_core::{components_to_contract, contract_to_components, EthereumContract};
use solcanvas_sandbox::scaffold::project_tree;
use solcanvas_sandbox::{LocalSandbox, RetryingSandbox, Sandbox};
use solcanvas_storage::{ProjectId, ProjectStore, SqliteStore};

/// solcanvas contract tools.
#[derive(Parser)]
#[command(name = "solcanvas", about = "solcanvas contract tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Load a contract, place unpositioned components, and print it.
    Layout {
        /// Path to the contract JSON file.
        file: PathBuf,
    },

    /// Check every component form and the contract-level rules.
    Validate {
        /// Path to the contract JSON file.
        file: PathBuf,
    },

    /// List the projects in a database.
    Projects {
        /// Path to the project database file.
        #[arg(short, long)]
        db: String,
    },

    /// Print a stored contract as JSON.
    Export {
        /// Path to the project database file.
        #[arg(short, long)]
        db: String,

        /// Project ID.
        #[arg(short, long)]
        project: i64,

        /// Contract name.
        #[arg(short, long)]
        contract: String,
    },

    /// Write the base project files into a directory.
    Scaffold {
        /// Target directory (created if missing).
        #[arg(short, long)]
        dir: PathBuf,

        /// Project name.
        #[arg(short, long)]
        name: String,
    },
}

/// A failed command: message plus exit code.
#[derive(Debug)]
struct Failure {
    code: i32,
    message: String,
}

impl Failure {
    fn input(message: impl Into<String>) -> Self {
        Failure {
            code: 1,
            message: message.into(),
        }
    }

    fn io(message: impl Into<String>) -> Self {
        Failure {
            code: 3,
            message: message.into(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Layout { file } => run_layout(&file),
        Commands::Validate { file } => run_validate(&file),
        Commands::Projects { db } => run_projects(&db),
        Commands::Export {
            db,
            project,
            contract,
        } => run_export(&db, project, &contract),
        Commands::Scaffold { dir, name } => run_scaffold(&dir, &name),
    };

    match result {
        Ok((output, code)) => {
            println!("{}", output);
            process::exit(code);
        }
        Err(failure) => {
            eprintln!("Error: {}", failure.message);
            process::exit(failure.code);
        }
    }
}

/// Each command returns what to print and the exit code.
type CommandResult = Result<(String, i32), Failure>;

fn read_contract(path: &Path) -> Result<EthereumContract, Failure> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Failure::io(format!("failed to read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| Failure::input(format!("'{}' is not a contract: {}", path.display(), e)))
}

fn to_json(value: &impl serde::Serialize) -> Result<String, Failure> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Failure::io(format!("failed to serialize output: {}", e)))
}

fn run_layout(path: &Path) -> CommandResult {
    let contract = read_contract(path)?;
    let graph = contract_to_components(&contract).map_err(|e| Failure::input(e.to_string()))?;
    let laid_out = components_to_contract(&graph, &contract.metadata);
    Ok((to_json(&laid_out)?, 0))
}

fn run_validate(path: &Path) -> CommandResult {
    let contract = read_contract(path)?;
    let graph = contract_to_components(&contract).map_err(|e| Failure::input(e.to_string()))?;
    let issues = validate_graph(&graph);
    if issues.is_empty() {
        tracing::info!(contract = %contract.name(), components = graph.len(), "contract is valid");
    }
    let code = if issues.is_empty() { 0 } else { 2 };
    Ok((to_json(&issues)?, code))
}

fn open_store(db: &str) -> Result<SqliteStore, Failure> {
    SqliteStore::new(db).map_err(|e| Failure::io(format!("failed to open database '{}': {}", db, e)))
}

fn run_projects(db: &str) -> CommandResult {
    let store = open_store(db)?;
    let projects = store
        .list_projects()
        .map_err(|e| Failure::io(e.to_string()))?;
    Ok((to_json(&projects)?, 0))
}

fn run_export(db: &str, project: i64, name: &str) -> CommandResult {
    let store = open_store(db)?;
    let contract = store
        .get_contract(ProjectId(project), name)
        .map_err(|e| Failure::io(e.to_string()))?;
    Ok((to_json(&contract)?, 0))
}

fn run_scaffold(dir: &Path, name: &str) -> CommandResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Failure::io(format!("failed to start runtime: {}", e)))?;
    let tree = project_tree(name);
    let sandbox = RetryingSandbox::new(LocalSandbox::new(dir));
    runtime
        .block_on(sandbox.mount(&tree))
        .map_err(|e| Failure::io(e.to_string()))?;
    let files: Vec<String> = tree.files().into_iter().map(|(path, _)| path).collect();
    Ok((to_json(&files)?, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solcanvas_core::ComponentId;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn layout_places_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "token.json",
            r#"{"name": "Token", "functions": [{"id": "function-1", "name": "mint"}]}"#,
        );
        let (output, code) = run_layout(&path).unwrap();
        assert_eq!(code, 0);
        let contract: EthereumContract = serde_json::from_str(&output).unwrap();
        let position = contract
            .component_layout
            .positions
            .get(&ComponentId::from("function-1"))
            .copied()
            .unwrap();
        assert!(!position.is_unset());
    }

    #[test]
    fn validate_reports_issues_with_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let valid = write(
            dir.path(),
            "ok.json",
            r#"{"name": "Token", "events": [{"id": "event-1", "name": "Minted"}]}"#,
        );
        assert_eq!(run_validate(&valid).unwrap().1, 0);

        let invalid = write(
            dir.path(),
            "bad.json",
            r#"{"name": "Token", "events": [{"id": "event-1", "name": "1Minted"}]}"#,
        );
        let (output, code) = run_validate(&invalid).unwrap();
        assert_eq!(code, 2);
        assert!(output.contains("event-1"));
    }

    #[test]
    fn unreadable_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_layout(&dir.path().join("missing.json")).unwrap_err().code, 3);
        let garbage = write(dir.path(), "garbage.json", "[1, 2");
        assert_eq!(run_validate(&garbage).unwrap_err().code, 1);
    }

    #[test]
    fn export_prints_stored_contract() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("projects.db");
        let db = db.to_str().unwrap();
        let id = {
            let mut store = SqliteStore::new(db).unwrap();
            let id = store.create_project("Tokens").unwrap();
            let contract: EthereumContract = serde_json::from_str(r#"{"name": "Token"}"#).unwrap();
            store.add_contract_to_project(id, &contract).unwrap();
            id
        };

        let (listing, _) = run_projects(db).unwrap();
        assert!(listing.contains("Tokens"));
        let (output, code) = run_export(db, id.0, "Token").unwrap();
        assert_eq!(code, 0);
        assert!(output.contains("\"name\": \"Token\""));
        assert_eq!(run_export(db, id.0, "Missing").unwrap_err().code, 3);
    }

    #[test]
    fn scaffold_writes_project_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("my-token");
        let (output, code) = run_scaffold(&target, "My Token").unwrap();
        assert_eq!(code, 0);
        assert!(output.contains("package.json"));
        assert!(target.join("hardhat.config.js").exists());
        assert!(target.join("contracts/.gitkeep").exists());
    }
}
