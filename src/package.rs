//! Package types read from an EasyConfig

use serde::Serialize;

/// A dependency declared in an EasyConfig
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Software name (e.g., "zlib")
    pub name: String,

    /// Version string, empty when the entry omits it
    pub version: String,

    /// Version suffix (e.g., "-Python-3.11.3")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versionsuffix: Option<String>,

    /// Which list the entry came from
    pub dep_type: DependencyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Runtime,
    Build,
}

impl DependencyType {
    /// Name of the EasyConfig key holding this kind of dependency
    pub fn key(&self) -> &'static str {
        match self {
            DependencyType::Runtime => "dependencies",
            DependencyType::Build => "builddependencies",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyType::Runtime => write!(f, "dependency"),
            DependencyType::Build => write!(f, "builddependency"),
        }
    }
}

/// The toolchain an EasyConfig is built with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    pub name: String,
    pub version: String,
}

/// Toolchain generations and the GCC release each one is built on
const GENERATIONS: &[(&str, &str)] = &[
    ("2025a", "14.2.0"),
    ("2024a", "13.3.0"),
    ("2023b", "13.2.0"),
    ("2023a", "12.3.0"),
    ("2022b", "12.2.0"),
    ("2022a", "11.3.0"),
    ("2021b", "11.2.0"),
    ("2021a", "10.3.0"),
];

/// GCC version of a toolchain generation (e.g., "2023a" -> "12.3.0")
pub fn gcc_for_generation(generation: &str) -> Option<&'static str> {
    GENERATIONS
        .iter()
        .find(|(g, _)| *g == generation)
        .map(|(_, gcc)| *gcc)
}

/// Toolchain generation of a GCC version (e.g., "12.3.0" -> "2023a")
pub fn generation_for_gcc(gcc: &str) -> Option<&'static str> {
    GENERATIONS
        .iter()
        .find(|(_, v)| *v == gcc)
        .map(|(g, _)| *g)
}

impl Toolchain {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The `SYSTEM` toolchain
    pub fn system() -> Self {
        Self::new("system", "system")
    }

    pub fn is_system(&self) -> bool {
        self.name.eq_ignore_ascii_case("system")
    }

    /// The matching generation or GCC version of this toolchain, if known
    pub fn equivalent_version(&self) -> Option<&'static str> {
        gcc_for_generation(&self.version).or_else(|| generation_for_gcc(&self.version))
    }
}

impl std::fmt::Display for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_system() {
            write!(f, "SYSTEM")
        } else {
            write!(f, "{}/{}", self.name, self.version)
        }
    }
}

impl Dependency {
    /// Get the full version string, including any suffix
    pub fn full_version(&self) -> String {
        match &self.versionsuffix {
            Some(suffix) => format!("{}{}", self.version, suffix),
            None => self.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_table_maps_both_ways() {
        assert_eq!(gcc_for_generation("2023a"), Some("12.3.0"));
        assert_eq!(generation_for_gcc("12.3.0"), Some("2023a"));
        assert_eq!(gcc_for_generation("2019b"), None);
    }

    #[test]
    fn test_toolchain_equivalent_version() {
        assert_eq!(Toolchain::new("foss", "2024a").equivalent_version(), Some("13.3.0"));
        assert_eq!(Toolchain::new("GCCcore", "11.2.0").equivalent_version(), Some("2021b"));
        assert_eq!(Toolchain::system().equivalent_version(), None);
    }

    #[test]
    fn test_full_version_with_suffix() {
        let dep = Dependency {
            name: "SciPy-bundle".to_string(),
            version: "2023.07".to_string(),
            versionsuffix: Some("-Python-3.11.3".to_string()),
            dep_type: DependencyType::Runtime,
        };
        assert_eq!(dep.full_version(), "2023.07-Python-3.11.3");
    }
}
