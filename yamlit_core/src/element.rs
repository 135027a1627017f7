use std::fmt;

/// A node of the decoded document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	/// The mapping key this element is bound under. Empty for sequence
	/// members.
	pub key: String,
	pub kind: ElementKind,
	pub is_sequence_member: bool,
	pub comments: Comments,
}

/// The classified content of an [`Element`]. Scalars keep the raw text from
/// the source; collections own their children in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
	Null,
	Bool(String),
	Int(String),
	Float(String),
	Str(String),
	/// A scalar tagged `!!tpl`. Its text is a template expression which is
	/// resolved against the supplied values before emission.
	Template(String),
	/// A scalar tagged `!!var`. Its text is a go expression, usually a
	/// variable in scope of the generated code, and is emitted verbatim.
	Var(String),
	Mapping(Vec<Element>),
	Sequence(Vec<Element>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
	Null,
	Bool,
	Int,
	Float,
	Str,
	Template,
	Var,
	Mapping,
	Sequence,
}

impl fmt::Display for ElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tag = match self {
			Self::Null => "!!null",
			Self::Bool => "!!bool",
			Self::Int => "!!int",
			Self::Float => "!!float",
			Self::Str => "!!str",
			Self::Template => "!!tpl",
			Self::Var => "!!var",
			Self::Mapping => "!!map",
			Self::Sequence => "!!seq",
		};

		f.write_str(tag)
	}
}

/// Comments attached to an element, already translated to go line comments.
/// Each entry is a single output line such as `// managed by yamlit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
	/// Whole-line comments directly above the element.
	pub leading: Vec<String>,
	/// The comment on the same line as the element.
	pub inline: Option<String>,
	/// Whole-line comments following the element.
	pub trailing: Vec<String>,
}

impl Comments {
	pub fn is_empty(&self) -> bool {
		self.leading.is_empty() && self.inline.is_none() && self.trailing.is_empty()
	}
}

impl Element {
	pub fn new(key: impl Into<String>, kind: ElementKind) -> Self {
		Self {
			key: key.into(),
			kind,
			is_sequence_member: false,
			comments: Comments::default(),
		}
	}

	/// Create an element for a sequence position.
	pub fn member(kind: ElementKind) -> Self {
		Self {
			key: String::new(),
			kind,
			is_sequence_member: true,
			comments: Comments::default(),
		}
	}

	#[must_use]
	pub fn with_comments(mut self, comments: Comments) -> Self {
		self.comments = comments;
		self
	}

	pub fn element_type(&self) -> ElementType {
		match &self.kind {
			ElementKind::Null => ElementType::Null,
			ElementKind::Bool(_) => ElementType::Bool,
			ElementKind::Int(_) => ElementType::Int,
			ElementKind::Float(_) => ElementType::Float,
			ElementKind::Str(_) => ElementType::Str,
			ElementKind::Template(_) => ElementType::Template,
			ElementKind::Var(_) => ElementType::Var,
			ElementKind::Mapping(_) => ElementType::Mapping,
			ElementKind::Sequence(_) => ElementType::Sequence,
		}
	}

	/// The raw scalar text. `None` for collections and null.
	pub fn value(&self) -> Option<&str> {
		match &self.kind {
			ElementKind::Bool(value)
			| ElementKind::Int(value)
			| ElementKind::Float(value)
			| ElementKind::Str(value)
			| ElementKind::Template(value)
			| ElementKind::Var(value) => Some(value),
			ElementKind::Null | ElementKind::Mapping(_) | ElementKind::Sequence(_) => None,
		}
	}

	pub fn children(&self) -> &[Element] {
		match &self.kind {
			ElementKind::Mapping(children) | ElementKind::Sequence(children) => children,
			_ => &[],
		}
	}

	pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
		match &mut self.kind {
			ElementKind::Mapping(children) | ElementKind::Sequence(children) => Some(children),
			_ => None,
		}
	}

	/// Look up a direct child of a mapping by key.
	pub fn get(&self, key: &str) -> Option<&Element> {
		match &self.kind {
			ElementKind::Mapping(children) => children.iter().find(|child| child.key == key),
			_ => None,
		}
	}

	pub fn is_template(&self) -> bool {
		matches!(self.kind, ElementKind::Template(_))
	}

	/// Whether this element or any descendant is a template scalar.
	pub fn contains_template(&self) -> bool {
		self.is_template() || self.children().iter().any(Element::contains_template)
	}
}
