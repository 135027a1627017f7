use std::collections::HashSet;

use crate::Declaration;
use crate::Element;
use crate::FormatterKind;
use crate::FunctionRegistry;
use crate::Interpolator;
use crate::Manifests;
use crate::YamlitResult;
use crate::builder::CodeBuilder;
use crate::config::DEFAULT_VARIABLE_NAME;
use crate::decode;
use crate::naming::camel_case;
use crate::naming::lower_camel_case;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
	/// Name of the declared variable for single documents.
	pub variable_name: String,
	pub formatter: FormatterKind,
	pub strict_undefined: bool,
}

impl Default for GenerateOptions {
	fn default() -> Self {
		Self {
			variable_name: DEFAULT_VARIABLE_NAME.to_string(),
			formatter: FormatterKind::default(),
			strict_undefined: true,
		}
	}
}

/// Runs the decode, interpolate, emit and format pipeline.
#[derive(Debug, Clone, Default)]
pub struct Generator {
	options: GenerateOptions,
	registry: FunctionRegistry,
}

impl Generator {
	pub fn new(options: GenerateOptions) -> Self {
		Self {
			options,
			registry: FunctionRegistry::default(),
		}
	}

	#[must_use]
	pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
		self.registry = registry;
		self
	}

	pub fn options(&self) -> &GenerateOptions {
		&self.options
	}

	pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
		&mut self.registry
	}

	/// Generate the declaration for a single yaml document using the
	/// configured variable name.
	pub fn generate(&self, source: &str, values: &[serde_json::Value]) -> YamlitResult<String> {
		self.generate_named(source, &self.options.variable_name, values)
	}

	pub fn generate_named(
		&self,
		source: &str,
		variable_name: &str,
		values: &[serde_json::Value],
	) -> YamlitResult<String> {
		let declaration = Declaration::new(variable_name, &self.prepare(source, values)?)?;

		let mut builder = CodeBuilder::go();
		builder.emit(&declaration);
		self.options.formatter.formatter().format(&builder.build())
	}

	/// Generate one declaration per document across all manifests. Variable
	/// names are derived from each document's kind and name.
	pub fn generate_manifests(&self, manifests: &Manifests, values: &[serde_json::Value]) -> YamlitResult<String> {
		let mut names = VariableNames::default();
		let mut builder = CodeBuilder::go();

		for (position, document) in manifests.documents().into_iter().enumerate() {
			tracing::debug!(source = %document.source.display(), index = document.index, "generating document");

			let root = self.prepare(&document.content, values)?;
			let name = names.claim(&variable_name_for(&root, position));
			let declaration = Declaration::new(name, &root)?;

			if position > 0 {
				builder.push_blank();
			}

			builder.emit(&declaration);
		}

		self.options.formatter.formatter().format(&builder.build())
	}

	fn prepare(&self, source: &str, values: &[serde_json::Value]) -> YamlitResult<Element> {
		let mut root = decode(source)?;

		Interpolator::new(&self.registry)
			.strict_undefined(self.options.strict_undefined)
			.interpolate(&mut root, values)?;

		Ok(root)
	}
}

/// Generate a go declaration for `source` with default options.
pub fn generate(source: &str, variable_name: &str, values: &[serde_json::Value]) -> YamlitResult<String> {
	Generator::default().generate_named(source, variable_name, values)
}

/// The variable name derived from a document: `lowerCamel(kind +
/// Camel(metadata.name))`, or `object<N>` when either is missing.
pub fn variable_name_for(root: &Element, position: usize) -> String {
	let kind = root.get("kind").and_then(Element::value);
	let name = root
		.get("metadata")
		.and_then(|metadata| metadata.get("name"))
		.and_then(Element::value);

	match (kind, name) {
		(Some(kind), Some(name)) if !kind.is_empty() && !name.is_empty() => {
			lower_camel_case(&format!("{kind}{}", camel_case(name)))
		}
		_ => format!("{DEFAULT_VARIABLE_NAME}{position}"),
	}
}

/// Hands out unique variable names, suffixing repeats with a counter
/// starting at 2.
#[derive(Debug, Default)]
struct VariableNames {
	used: HashSet<String>,
}

impl VariableNames {
	fn claim(&mut self, base: &str) -> String {
		let mut candidate = base.to_string();
		let mut counter = 1;

		while self.used.contains(&candidate) {
			counter += 1;
			candidate = format!("{base}{counter}");
		}

		self.used.insert(candidate.clone());
		candidate
	}
}
