use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::Environment;
use minijinja::UndefinedBehavior;

use crate::Element;
use crate::ElementKind;
use crate::YamlitError;
use crate::YamlitResult;
use crate::emitter::child_path;
use crate::escape::escape;
use crate::escape::quote_interpreted;
use crate::naming::camel_case;
use crate::naming::kebab_case;
use crate::naming::lower_camel_case;
use crate::naming::snake_case;

/// A helper that maps one string to another.
pub type StringFunction = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Helper functions available to template scalars. Each helper can be used
/// as a filter (`{{ name | camel }}`) or called as a function
/// (`{{ camel(name) }}`).
#[derive(Clone)]
pub struct FunctionRegistry {
	functions: BTreeMap<String, StringFunction>,
}

impl FunctionRegistry {
	/// A registry without any helpers.
	pub fn empty() -> Self {
		Self {
			functions: BTreeMap::new(),
		}
	}

	pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.functions.insert(name.into(), Arc::new(function));
		self
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.functions.keys().map(String::as_str)
	}

	pub fn call(&self, name: &str, input: &str) -> Option<String> {
		self.functions.get(name).map(|function| function(input))
	}

	fn install(&self, env: &mut Environment<'_>) {
		for (name, function) in &self.functions {
			let filter = Arc::clone(function);
			env.add_filter(name.clone(), move |value: String| filter(&value));

			let function = Arc::clone(function);
			env.add_function(name.clone(), move |value: String| function(&value));
		}
	}
}

impl Default for FunctionRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		registry
			.register("escape", escape)
			.register("quote", quote_interpreted)
			.register("camel", camel_case)
			.register("lower_camel", lower_camel_case)
			.register("snake", snake_case)
			.register("kebab", kebab_case);
		registry
	}
}

impl fmt::Debug for FunctionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.names()).finish()
	}
}

/// Resolves template scalars against a dataset.
#[derive(Debug, Clone)]
pub struct Interpolator<'a> {
	registry: &'a FunctionRegistry,
	strict_undefined: bool,
}

impl<'a> Interpolator<'a> {
	pub fn new(registry: &'a FunctionRegistry) -> Self {
		Self {
			registry,
			strict_undefined: true,
		}
	}

	/// When disabled, undefined values render as empty text instead of
	/// failing.
	#[must_use]
	pub fn strict_undefined(mut self, strict: bool) -> Self {
		self.strict_undefined = strict;
		self
	}

	/// Rewrite every template scalar below `root` in place. At most one
	/// dataset may be supplied and it is required when templates exist.
	pub fn interpolate(&self, root: &mut Element, values: &[serde_json::Value]) -> YamlitResult<()> {
		let values = match values {
			[] => {
				return match first_template_path(root, "") {
					Some(key) => Err(YamlitError::MissingValues { key }),
					None => Ok(()),
				};
			}
			[values] => values,
			many => return Err(YamlitError::TooManyValueSets(many.len())),
		};

		let mut env = Environment::new();
		env.set_undefined_behavior(if self.strict_undefined {
			UndefinedBehavior::Strict
		} else {
			UndefinedBehavior::Chainable
		});
		self.registry.install(&mut env);

		let context = minijinja::Value::from_serialize(values);
		let renderer = Renderer { env, context };

		if let Some(children) = root.children_mut() {
			for (index, child) in children.iter_mut().enumerate() {
				let path = child_path("", child, index);
				renderer.visit(child, &path)?;
			}
		}

		Ok(())
	}
}

struct Renderer<'env> {
	env: Environment<'env>,
	context: minijinja::Value,
}

impl Renderer<'_> {
	fn visit(&self, element: &mut Element, path: &str) -> YamlitResult<()> {
		if let ElementKind::Template(value) = &element.kind {
			tracing::debug!(path, "interpolating template value");

			let rendered = self.render(value, path)?;
			element.kind = ElementKind::Template(rendered);
			element.key = self.render(&element.key, path)?;
			self.render_comments(element, path)?;

			return Ok(());
		}

		if let Some(children) = element.children_mut() {
			for (index, child) in children.iter_mut().enumerate() {
				let child_path = child_path(path, child, index);
				self.visit(child, &child_path)?;
			}
		}

		Ok(())
	}

	fn render_comments(&self, element: &mut Element, path: &str) -> YamlitResult<()> {
		let comments = &mut element.comments;
		comments.leading = self.render_lines(&comments.leading, path)?;
		comments.trailing = self.render_lines(&comments.trailing, path)?;

		if let Some(inline) = &comments.inline {
			comments.inline = Some(self.render(inline, path)?.replace('\n', " "));
		}

		Ok(())
	}

	/// Render comment lines, keeping every resulting line a go comment.
	fn render_lines(&self, lines: &[String], path: &str) -> YamlitResult<Vec<String>> {
		let mut rendered = vec![];

		for line in lines {
			for (index, part) in self.render(line, path)?.lines().enumerate() {
				if index == 0 || part.trim_start().starts_with("//") {
					rendered.push(part.to_string());
				} else {
					rendered.push(format!("// {part}"));
				}
			}
		}

		Ok(rendered)
	}

	fn render(&self, text: &str, path: &str) -> YamlitResult<String> {
		if !has_template_syntax(text) {
			return Ok(text.to_string());
		}

		self.env
			.render_str(text, &self.context)
			.map_err(|e| {
				YamlitError::Interpolation {
					key: path.to_string(),
					reason: e.to_string(),
				}
			})
	}
}

fn first_template_path(element: &Element, path: &str) -> Option<String> {
	if element.is_template() {
		return Some(path.to_string());
	}

	element
		.children()
		.iter()
		.enumerate()
		.find_map(|(index, child)| first_template_path(child, &child_path(path, child, index)))
}

/// Check whether text contains minijinja template syntax.
fn has_template_syntax(text: &str) -> bool {
	text.contains("{{") || text.contains("{%") || text.contains("{#")
}
