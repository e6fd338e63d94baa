//! Build script for questlens-core.
//!
//! Generates Rust word lists from the QuestDB data files in `specs/questdb/`.
//! Generated files are written to `src/generated/` and should be committed to version control.
//!
//! Data sources:
//! - `functions.toml`: built-in functions with category, signature and description
//! - `data_types.toml`: column data types accepted at type positions

use indexmap::IndexMap;
use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;

const KNOWN_CATEGORIES: &[&str] = &["aggregate", "window", "scalar", "table"];

fn main() {
    if let Err(e) = run() {
        eprintln!("Build script error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let in_packaged_dir = manifest_dir.contains("/target/package/");

    if env::var("CARGO_PUBLISH").is_ok() || in_packaged_dir {
        println!("cargo:rerun-if-changed=specs/questdb/");
        println!("cargo:rerun-if-changed=build.rs");
        return Ok(());
    }

    let spec_dir = Path::new("specs/questdb");
    if !spec_dir.exists() {
        return Err(format!(
            "Data directory not found at {:?}. Expected at crates/questlens-core/specs/questdb/",
            spec_dir.canonicalize().unwrap_or_else(|_| spec_dir.to_path_buf())
        )
        .into());
    }

    let generated_dir = Path::new("src/generated");
    fs::create_dir_all(generated_dir)
        .map_err(|e| format!("Failed to create src/generated directory: {e}"))?;

    let functions = load_functions(spec_dir)?;
    let data_types = load_data_types(spec_dir)?;

    validate_functions(&functions)?;

    generate_mod_rs(generated_dir)?;
    generate_functions(generated_dir, &functions)?;
    generate_data_types(generated_dir, &data_types)?;

    println!("cargo:rerun-if-changed=specs/questdb/");
    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}

// ============================================================================
// Data file structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct FunctionsFile {
    functions: IndexMap<String, FunctionDef>,
}

#[derive(Debug, Deserialize)]
struct FunctionDef {
    category: String,
    signature: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataTypesFile {
    types: IndexMap<String, DataTypeDef>,
}

#[derive(Debug, Deserialize)]
struct DataTypeDef {
    #[serde(default)]
    description: Option<String>,
}

fn load_functions(spec_dir: &Path) -> Result<IndexMap<String, FunctionDef>, Box<dyn Error>> {
    let path = spec_dir.join("functions.toml");
    let content = fs::read_to_string(&path).map_err(|e| format!("Failed to read {path:?}: {e}"))?;
    let file: FunctionsFile =
        toml::from_str(&content).map_err(|e| format!("Failed to parse {path:?}: {e}"))?;
    Ok(file.functions)
}

fn load_data_types(spec_dir: &Path) -> Result<IndexMap<String, DataTypeDef>, Box<dyn Error>> {
    let path = spec_dir.join("data_types.toml");
    let content = fs::read_to_string(&path).map_err(|e| format!("Failed to read {path:?}: {e}"))?;
    let file: DataTypesFile =
        toml::from_str(&content).map_err(|e| format!("Failed to parse {path:?}: {e}"))?;
    Ok(file.types)
}

fn validate_functions(functions: &IndexMap<String, FunctionDef>) -> Result<(), Box<dyn Error>> {
    for (name, def) in functions {
        if !KNOWN_CATEGORIES.contains(&def.category.as_str()) {
            return Err(format!("Function '{name}' has unknown category '{}'", def.category).into());
        }
        if name.chars().any(|c| c.is_ascii_uppercase()) {
            println!("cargo:warning=Function key '{name}' should be lowercase");
        }
    }
    Ok(())
}

// ============================================================================
// Code Generation
// ============================================================================

fn write_if_changed(path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    let write_needed = match fs::read_to_string(path) {
        Ok(existing) => existing != content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => true,
        Err(err) => return Err(format!("Failed to read {path:?}: {err}").into()),
    };

    if write_needed {
        if let Err(err) = fs::write(path, content) {
            return Err(format!("Failed to write {path:?}: {err}").into());
        }
    }

    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn generate_mod_rs(dir: &Path) -> Result<(), Box<dyn Error>> {
    let content = r#"//! Generated QuestDB word lists.
//!
//! DO NOT EDIT MANUALLY - generated by build.rs from specs/questdb/

pub mod data_types;
pub mod functions;

pub use data_types::*;
pub use functions::*;
"#;

    write_if_changed(&dir.join("mod.rs"), content)
}

fn generate_functions(
    dir: &Path,
    functions: &IndexMap<String, FunctionDef>,
) -> Result<(), Box<dyn Error>> {
    let mut code = String::from(
        r#"//! QuestDB built-in functions.
//!
//! Generated from functions.toml

/// Broad function role, used for suggestion details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    Aggregate,
    Window,
    Scalar,
    Table,
}

impl FunctionCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FunctionCategory::Aggregate => "aggregate",
            FunctionCategory::Window => "window",
            FunctionCategory::Scalar => "scalar",
            FunctionCategory::Table => "table",
        }
    }
}

/// A function known to content assist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: &'static str,
    pub category: FunctionCategory,
    pub signature: &'static str,
    pub description: Option<&'static str>,
}

"#,
    );

    code.push_str(&format!(
        "/// Built-in functions ({} total), in data file order.\n",
        functions.len()
    ));
    code.push_str("pub static FUNCTIONS: &[FunctionInfo] = &[\n");
    for (name, def) in functions {
        let category = match def.category.as_str() {
            "aggregate" => "Aggregate",
            "window" => "Window",
            "table" => "Table",
            _ => "Scalar",
        };
        let description = match &def.description {
            Some(d) => format!("Some(\"{}\")", escape(d)),
            None => "None".to_string(),
        };
        code.push_str(&format!(
            "    FunctionInfo {{\n        name: \"{}\",\n        category: FunctionCategory::{category},\n        signature: \"{}\",\n        description: {description},\n    }},\n",
            escape(&name.to_ascii_lowercase()),
            escape(&def.signature),
        ));
    }
    code.push_str("];\n");

    write_if_changed(&dir.join("functions.rs"), &code)
}

fn generate_data_types(
    dir: &Path,
    data_types: &IndexMap<String, DataTypeDef>,
) -> Result<(), Box<dyn Error>> {
    let mut code = String::from(
        r#"//! QuestDB column data types.
//!
//! Generated from data_types.toml

/// A column type name accepted at data-type positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeInfo {
    pub name: &'static str,
    pub description: Option<&'static str>,
}

"#,
    );

    code.push_str(&format!(
        "/// Data types ({} total), in data file order.\n",
        data_types.len()
    ));
    code.push_str("pub static DATA_TYPES: &[DataTypeInfo] = &[\n");
    for (name, def) in data_types {
        let description = match &def.description {
            Some(d) => format!("Some(\"{}\")", escape(d)),
            None => "None".to_string(),
        };
        code.push_str(&format!(
            "    DataTypeInfo {{\n        name: \"{}\",\n        description: {description},\n    }},\n",
            escape(&name.to_ascii_lowercase()),
        ));
    }
    code.push_str("];\n");

    write_if_changed(&dir.join("data_types.rs"), &code)
}
