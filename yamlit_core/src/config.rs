use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::FormatterKind;
use crate::GenerateOptions;
use crate::YamlitError;
use crate::YamlitResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["yamlit.toml", ".yamlit.toml", ".config/yamlit.toml"];

pub const DEFAULT_VARIABLE_NAME: &str = "object";
pub const DEFAULT_ROLE_NAME: &str = "manager-role";
pub const DEFAULT_RBAC_VARIABLE_NAME: &str = "resourceObj";

/// Configuration loaded from `yamlit.toml`.
///
/// ```toml
/// [generate]
/// variable_name = "object"
/// formatter = "gofmt"
/// strict_undefined = true
/// values = "values.yaml"
///
/// [rbac]
/// role_name = "manager-role"
/// variable_name = "resourceObj"
/// verbs = ["get", "list", "watch"]
/// use_resource_names = false
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct YamlitConfig {
	#[serde(default)]
	pub generate: GenerateConfig,
	#[serde(default)]
	pub rbac: RbacConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerateConfig {
	/// The variable name used when a single document is generated.
	pub variable_name: String,
	pub formatter: FormatterKind,
	/// Fail when a template references a value that does not exist.
	pub strict_undefined: bool,
	/// A values file, relative to the config root, used when none is passed
	/// on the command line.
	pub values: Option<PathBuf>,
}

impl Default for GenerateConfig {
	fn default() -> Self {
		Self {
			variable_name: DEFAULT_VARIABLE_NAME.to_string(),
			formatter: FormatterKind::default(),
			strict_undefined: true,
			values: None,
		}
	}
}

impl GenerateConfig {
	pub fn options(&self) -> GenerateOptions {
		GenerateOptions {
			variable_name: self.variable_name.clone(),
			formatter: self.formatter,
			strict_undefined: self.strict_undefined,
		}
	}
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RbacConfig {
	pub role_name: String,
	pub variable_name: String,
	/// Verbs granted on every derived rule. Empty means the default set.
	pub verbs: Vec<String>,
	pub use_resource_names: bool,
}

impl Default for RbacConfig {
	fn default() -> Self {
		Self {
			role_name: DEFAULT_ROLE_NAME.to_string(),
			variable_name: DEFAULT_RBAC_VARIABLE_NAME.to_string(),
			verbs: vec![],
			use_resource_names: false,
		}
	}
}

impl YamlitConfig {
	/// Resolve the first existing config file path at `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> YamlitResult<Option<YamlitConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");

		let content = std::fs::read_to_string(&config_path)?;
		let config: YamlitConfig =
			toml::from_str(&content).map_err(|e| YamlitError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}
}
