//! EasyConfig reader
//!
//! Extracts the `toolchain` and one dependency list from an EasyConfig file.
//! Everything else in the file is ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{EcdepsError, Result};
use crate::package::{Dependency, DependencyType, Toolchain};

pub mod literal;

use literal::Literal;

/// The parts of an EasyConfig that ecdeps cares about
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EasyConfig {
    /// File the config was read from
    pub path: PathBuf,

    /// Declared toolchain, if present and understood
    pub toolchain: Option<Toolchain>,

    /// Which list `dependencies` was read from
    pub dep_type: DependencyType,

    /// Entries of the selected list, in file order
    pub dependencies: Vec<Dependency>,
}

impl EasyConfig {
    /// Read an EasyConfig file, taking dependencies from the list selected by `dep_type`
    pub fn from_file(path: &Path, dep_type: DependencyType) -> Result<Self> {
        if !path.is_file() {
            let source = if path.exists() {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file")
            } else {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
            };
            return Err(EcdepsError::FileAccess {
                path: path.to_path_buf(),
                source,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| EcdepsError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&content, dep_type)?;
        config.path = path.to_path_buf();
        Ok(config)
    }

    /// Parse EasyConfig text
    pub fn parse(content: &str, dep_type: DependencyType) -> Result<Self> {
        let toolchain = read_toolchain(content);
        let dependencies = read_dependencies(content, dep_type)?;

        tracing::debug!(
            "Parsed toolchain {:?} and {} {}",
            toolchain,
            dependencies.len(),
            dep_type.key()
        );

        Ok(Self {
            path: PathBuf::new(),
            toolchain,
            dep_type,
            dependencies,
        })
    }

    /// File name without its directory, for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lines outside triple-quoted strings, with their index and byte offset.
///
/// The line that opens a `"""`/`'''` block is kept; the lines inside it are not.
fn code_lines(content: &str) -> Vec<(usize, usize, &str)> {
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut open: Option<&str> = None;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += line.len();

        if let Some(delim) = open {
            if line.matches(delim).count() % 2 == 1 {
                open = None;
            }
            continue;
        }

        lines.push((index, start, line));
        open = ["\"\"\"", "'''"]
            .into_iter()
            .find(|delim| line.matches(*delim).count() % 2 == 1);
    }
    lines
}

/// Byte offset and line index of the value assigned to `key`, if any
fn find_assignment(content: &str, key: &str) -> Option<(usize, usize)> {
    code_lines(content).into_iter().find_map(|(index, offset, line)| {
        let rest = line.trim_start().strip_prefix(key)?;
        let after_key = rest.trim_start();
        if !after_key.starts_with('=') || after_key.starts_with("==") {
            return None;
        }
        let value = after_key[1..].trim_start();
        Some((offset + (line.len() - value.len()), index))
    })
}

/// Top-level single-line string constants defined before line `before`
fn string_constants(content: &str, before: usize) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for (_, _, line) in code_lines(content)
        .into_iter()
        .take_while(|(index, _, _)| *index < before)
    {
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((name, value)) = line.trim_end().split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            continue;
        }
        if let Ok(Literal::Str(text)) = literal::parse(value) {
            names.insert(name.to_string(), text);
        }
    }
    names
}

fn read_toolchain(content: &str) -> Option<Toolchain> {
    let (offset, line) = find_assignment(content, "toolchain")?;

    let value = match literal::parse_prefix(&content[offset..]) {
        Ok((value, _)) => value,
        Err(e) => {
            tracing::warn!("Ignoring unparseable toolchain: {}", e);
            return None;
        }
    };

    let names = string_constants(content, line);
    let toolchain = match &value {
        Literal::Name(name) if name == "SYSTEM" => Some(Toolchain::system()),
        Literal::Dict(_) => match (value.get("name"), value.get("version")) {
            (Some(name), Some(version)) => name
                .as_text(&names)
                .zip(version.as_text(&names))
                .map(|(name, version)| Toolchain::new(name, version)),
            _ => None,
        },
        Literal::Tuple(items) if items.len() == 2 => items[0]
            .as_text(&names)
            .zip(items[1].as_text(&names))
            .map(|(name, version)| Toolchain::new(name, version)),
        _ => None,
    };

    if toolchain.is_none() {
        tracing::warn!("Ignoring toolchain in unsupported form: {:?}", value);
    }
    toolchain
}

fn read_dependencies(content: &str, dep_type: DependencyType) -> Result<Vec<Dependency>> {
    let key = dep_type.key();
    let Some((offset, line)) = find_assignment(content, key) else {
        tracing::debug!("No '{}' in EasyConfig", key);
        return Ok(Vec::new());
    };

    let parse_error = |message: String| EcdepsError::Parse {
        field: key.to_string(),
        message,
    };

    let (value, _) = literal::parse_prefix(&content[offset..]).map_err(|e| {
        parse_error(format!("{} (line {})", e.message, line + e.line))
    })?;

    let entries = match &value {
        Literal::List(entries) => entries,
        other => return Err(parse_error(format!("expected a list, found {:?}", other))),
    };

    let names = string_constants(content, line);
    let mut dependencies = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(items) = entry.items() else {
            tracing::warn!("Skipping {} entry that is not a tuple: {:?}", key, entry);
            continue;
        };
        let Some(name) = items.first().and_then(|n| match n {
            Literal::Str(s) => Some(s.clone()),
            _ => None,
        }) else {
            tracing::warn!("Skipping {} entry without a name: {:?}", key, entry);
            continue;
        };

        let version = items
            .get(1)
            .and_then(|v| v.as_text(&names))
            .unwrap_or_default();
        let versionsuffix = items
            .get(2)
            .and_then(|v| v.as_text(&names))
            .filter(|s| !s.is_empty());

        dependencies.push(Dependency {
            name,
            version,
            versionsuffix,
            dep_type,
        });
    }

    Ok(dependencies)
}
