//! Compiler configuration.
//!
//! Every field has a default matching ROS1 conventions, so an empty TOML
//! document (or [`CompilerConfig::default`]) yields a working configuration:
//!
//! ```toml
//! builtin_package = "std_msgs"
//! reserved_names = ["Header"]
//! header_type = "std_msgs/Header"
//! search_path = ["std_msgs", "geometry_msgs"]
//! ```

use serde::Deserialize;

use crate::{ast::TypeRef, error::ConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Package that reserved bare names resolve to.
    pub builtin_package: String,

    /// Bare type names that always resolve to [`Self::builtin_package`].
    pub reserved_names: Vec<String>,

    /// The timestamped header type detected in field position 0.
    pub header_type: TypeRef,

    /// Packages searched when a package-less reference is not found in the
    /// declaring package. Empty means every known package.
    pub search_path: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            builtin_package: "std_msgs".to_string(),
            reserved_names: vec!["Header".to_string()],
            header_type: TypeRef::new("std_msgs", "Header"),
            search_path: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.iter().any(|n| n == name)
    }

    /// Whether `package` may be used by the fallback search.
    pub fn searches(&self, package: &str) -> bool {
        self.search_path.is_empty() || self.search_path.iter().any(|p| p == package)
    }
}
