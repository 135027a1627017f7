use crate::Element;
use crate::ElementKind;
use crate::EmitError;
use crate::YamlitError;
use crate::YamlitResult;
use crate::builder::CodeFragment;
use crate::builder::Renderable;
use crate::escape::escape;
use crate::escape::quote;

pub const MAP_TYPE: &str = "map[string]interface{}";
pub const SLICE_TYPE: &str = "[]interface{}";

/// A go variable declaration of an `*unstructured.Unstructured` built from a
/// decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
	pub variable_name: String,
	/// Fragments of the entries inside the `Object` map.
	pub body: Vec<CodeFragment>,
}

impl Declaration {
	/// Build the declaration for the children of a decoded root mapping.
	pub fn new(variable_name: impl Into<String>, root: &Element) -> YamlitResult<Self> {
		let body = root
			.children()
			.iter()
			.enumerate()
			.map(|(index, child)| element_fragment(child, &child_path("", child, index)))
			.collect::<YamlitResult<Vec<_>>>()?;

		Ok(Self {
			variable_name: variable_name.into(),
			body,
		})
	}
}

impl Renderable for Declaration {
	fn to_fragments(&self) -> Vec<CodeFragment> {
		vec![CodeFragment::block(
			format!("var {} = &unstructured.Unstructured{{", self.variable_name),
			vec![CodeFragment::block(
				format!("Object: {MAP_TYPE}{{"),
				self.body.clone(),
				"},",
			)],
			"}",
		)]
	}
}

/// Render one element, and its descendants, as the fragment for an entry in
/// its parent literal.
pub fn element_fragment(element: &Element, path: &str) -> YamlitResult<CodeFragment> {
	let prefix = if element.is_sequence_member {
		String::new()
	} else {
		format!("{}: ", quote(&element.key))
	};
	let inline = element
		.comments
		.inline
		.as_ref()
		.map(|comment| format!(" {comment}"))
		.unwrap_or_default();

	let main = match &element.kind {
		ElementKind::Mapping(children) | ElementKind::Sequence(children) => {
			let type_name = if matches!(element.kind, ElementKind::Mapping(_)) {
				MAP_TYPE
			} else {
				SLICE_TYPE
			};

			if children.is_empty() {
				CodeFragment::line(format!("{prefix}{type_name}{{}},{inline}"))
			} else {
				let body = children
					.iter()
					.enumerate()
					.map(|(index, child)| element_fragment(child, &child_path(path, child, index)))
					.collect::<YamlitResult<Vec<_>>>()?;

				CodeFragment::block(format!("{prefix}{type_name}{{{inline}"), body, "},")
			}
		}
		scalar => {
			let value = scalar_expression(scalar).map_err(|source| {
				YamlitError::Render {
					path: path.to_string(),
					source,
				}
			})?;

			CodeFragment::line(format!("{prefix}{value},{inline}"))
		}
	};

	if element.comments.leading.is_empty() && element.comments.trailing.is_empty() {
		return Ok(main);
	}

	let mut fragments: Vec<CodeFragment> = element
		.comments
		.leading
		.iter()
		.map(CodeFragment::line)
		.collect();
	fragments.push(main);
	fragments.extend(element.comments.trailing.iter().map(CodeFragment::line));

	Ok(CodeFragment::Sequence(fragments))
}

/// The go expression for a scalar value. Collections are rendered as blocks
/// by [`element_fragment`] instead.
pub fn scalar_expression(kind: &ElementKind) -> Result<String, EmitError> {
	let expression = match kind {
		ElementKind::Null => "nil".to_string(),
		ElementKind::Bool(value) => value.to_ascii_lowercase(),
		ElementKind::Int(value) => int_expression(value),
		ElementKind::Float(value) => float_expression(value),
		ElementKind::Str(value) => escape(value),
		ElementKind::Template(value) | ElementKind::Var(value) => {
			let trimmed = value.trim();

			if trimmed.is_empty() {
				return Err(EmitError::EmptyExpression);
			}

			trimmed.to_string()
		}
		ElementKind::Mapping(_) | ElementKind::Sequence(_) => return Err(EmitError::NotScalar),
	};

	Ok(expression)
}

fn float_expression(value: &str) -> String {
	match value {
		".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => "math.Inf(1)".to_string(),
		"-.inf" | "-.Inf" | "-.INF" => "math.Inf(-1)".to_string(),
		".nan" | ".NaN" | ".NAN" => "math.NaN()".to_string(),
		value if value.contains(['.', 'e', 'E']) => value.to_string(),
		value => format!("float64({})", int_expression(value)),
	}
}

/// Go reads a leading zero as an octal prefix, so decimal integers lose
/// theirs. The sign and `0x`/`0o` prefixes are kept.
fn int_expression(value: &str) -> String {
	let digits = value.strip_prefix(['-', '+']).unwrap_or(value);

	if digits.starts_with("0x") || digits.starts_with("0o") {
		return value.to_string();
	}

	let sign = &value[..value.len() - digits.len()];
	let trimmed = digits.trim_start_matches('0');

	if trimmed.is_empty() {
		format!("{sign}0")
	} else {
		format!("{sign}{trimmed}")
	}
}

/// The dotted path of a child, used in error messages.
pub(crate) fn child_path(parent: &str, child: &Element, index: usize) -> String {
	if child.is_sequence_member {
		format!("{parent}[{index}]")
	} else if parent.is_empty() {
		child.key.clone()
	} else {
		format!("{parent}.{}", child.key)
	}
}
