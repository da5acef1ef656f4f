//! Base project layout and contract export.
//!
//! A scaffolded project is a Hardhat workspace: `package.json`, a Hardhat
//! config, and a `contracts/` directory that receives one JSON description
//! per exported contract.

use solcanvas_core::EthereumContract;

use crate::error::SandboxError;
use crate::tree::FileTree;
use crate::Sandbox;

/// Directory that exported contract descriptions are written to.
pub const CONTRACTS_DIR: &str = "contracts";

/// npm package name for a project: lowercase, `-` separated.
pub fn package_name(project: &str) -> String {
    let mut name = String::with_capacity(project.len());
    for c in project.trim().chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }
    let name = name.trim_matches('-');
    if name.is_empty() {
        "solcanvas-project".to_string()
    } else {
        name.to_string()
    }
}

/// File name stem for a contract: characters outside `[A-Za-z0-9_]` become `_`.
pub fn contract_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "Contract".to_string()
    } else {
        stem
    }
}

/// The file tree of a fresh project.
pub fn project_tree(name: &str) -> FileTree {
    let package = serde_json::json!({
        "name": package_name(name),
        "version": "0.1.0",
        "private": true,
        "scripts": {
            "compile": "hardhat compile",
            "test": "hardhat test"
        },
        "devDependencies": {
            "@nomicfoundation/hardhat-toolbox": "^5.0.0",
            "@openzeppelin/contracts": "^5.0.0",
            "hardhat": "^2.22.0"
        }
    });
    let package = serde_json::to_string_pretty(&package).unwrap_or_else(|_| "{}".to_string());

    FileTree::new()
        .with_file("package.json", package + "\n")
        .with_file(
            "hardhat.config.js",
            "require(\"@nomicfoundation/hardhat-toolbox\");\n\n\
             module.exports = {\n  solidity: \"0.8.20\",\n};\n",
        )
        .with_file(".gitignore", "node_modules\nartifacts\ncache\n")
        .with_file(&format!("{}/.gitkeep", CONTRACTS_DIR), "")
        .with_file("README.md", format!("# {}\n\nGenerated by solcanvas.\n", name.trim()))
}

/// Writes the contract description to `contracts/<Name>.json` and returns
/// the sandbox path it was written to.
pub async fn export_contract<S>(
    sandbox: &S,
    contract: &EthereumContract,
) -> Result<String, SandboxError>
where
    S: Sandbox + ?Sized,
{
    let path = format!("{}/{}.json", CONTRACTS_DIR, contract_file_stem(contract.name()));
    let body = serde_json::to_string_pretty(contract)?;
    sandbox.write_file(&path, &body).await?;
    tracing::info!(contract = %contract.name(), path = %path, "exported contract");
    Ok(path)
}
