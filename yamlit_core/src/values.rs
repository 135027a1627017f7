use std::path::Path;

use crate::YamlitError;
use crate::YamlitResult;

/// Load a values file for template interpolation. The format is chosen by
/// the file extension.
pub fn load_values(path: &Path) -> YamlitResult<serde_json::Value> {
	let path_display = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		YamlitError::ValuesFile {
			path: path_display.clone(),
			reason: e.to_string(),
		}
	})?;
	let format = path.extension().and_then(|e| e.to_str()).unwrap_or("");

	tracing::debug!(path = %path_display, format, "loading values file");
	parse_values(&content, format, &path_display)
}

/// Parse values in the given format into a json value.
pub fn parse_values(content: &str, format: &str, path_display: &str) -> YamlitResult<serde_json::Value> {
	let values_error = |reason: String| {
		YamlitError::ValuesFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"json" => serde_json::from_str(content).map_err(|e| values_error(e.to_string())),
		"toml" => {
			let toml_value: toml::Value = toml::from_str(content).map_err(|e| values_error(e.to_string()))?;
			toml_to_json(toml_value).map_err(values_error)
		}
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| values_error(e.to_string())),
		other => Err(YamlitError::UnsupportedValuesFormat(other.to_string())),
	}
}

fn toml_to_json(value: toml::Value) -> Result<serde_json::Value, String> {
	let json = match value {
		toml::Value::String(s) => serde_json::Value::String(s),
		toml::Value::Integer(i) => serde_json::Value::Number(i.into()),
		toml::Value::Float(f) => {
			serde_json::Value::Number(
				serde_json::Number::from_f64(f).ok_or_else(|| format!("unconvertible float value: {f}"))?,
			)
		}
		toml::Value::Boolean(b) => serde_json::Value::Bool(b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect::<Result<_, _>>()?)
		}
		toml::Value::Table(table) => {
			let mut map = serde_json::Map::new();
			for (k, v) in table {
				map.insert(k, toml_to_json(v)?);
			}
			serde_json::Value::Object(map)
		}
	};

	Ok(json)
}
