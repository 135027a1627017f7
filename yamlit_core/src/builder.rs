//! Indentation-aware text builder for the generated go source.

/// A structured piece of generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
	/// A single line at the current indentation.
	Line(String),
	/// An empty line without indentation.
	Blank,
	/// A header line, an indented body and an optional closing line.
	Block {
		header: String,
		body: Vec<CodeFragment>,
		close: Option<String>,
	},
	/// Fragments emitted one after another at the same level.
	Sequence(Vec<CodeFragment>),
}

impl CodeFragment {
	pub fn line(text: impl Into<String>) -> Self {
		Self::Line(text.into())
	}

	pub fn block(header: impl Into<String>, body: Vec<CodeFragment>, close: impl Into<String>) -> Self {
		Self::Block {
			header: header.into(),
			body,
			close: Some(close.into()),
		}
	}
}

/// Anything that can describe itself as code fragments.
pub trait Renderable {
	fn to_fragments(&self) -> Vec<CodeFragment>;
}

/// Builds go source with tab indentation.
///
/// ```rust
/// use yamlit_core::builder::CodeBuilder;
/// use yamlit_core::builder::CodeFragment;
///
/// let mut builder = CodeBuilder::go();
/// builder.apply_fragment(CodeFragment::block(
/// 	"var x = []interface{}{",
/// 	vec![CodeFragment::line("1,")],
/// 	"}",
/// ));
///
/// assert_eq!(builder.build(), "var x = []interface{}{\n\t1,\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
	indent_level: usize,
	buffer: String,
}

impl CodeBuilder {
	pub fn go() -> Self {
		Self::default()
	}

	/// Add a line at the current indentation. Only the first line of
	/// multi-line text is indented so raw string literals keep their content.
	pub fn push_line(&mut self, text: &str) -> &mut Self {
		self.write_indent();
		self.buffer.push_str(text);
		self.buffer.push('\n');
		self
	}

	pub fn push_blank(&mut self) -> &mut Self {
		self.buffer.push('\n');
		self
	}

	pub fn push_indent(&mut self) -> &mut Self {
		self.indent_level += 1;
		self
	}

	pub fn push_dedent(&mut self) -> &mut Self {
		self.indent_level = self.indent_level.saturating_sub(1);
		self
	}

	/// Emit every fragment of a renderable node.
	pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
		for fragment in node.to_fragments() {
			self.apply_fragment(fragment);
		}

		self
	}

	pub fn apply_fragment(&mut self, fragment: CodeFragment) {
		match fragment {
			CodeFragment::Line(text) => {
				self.push_line(&text);
			}
			CodeFragment::Blank => {
				self.push_blank();
			}
			CodeFragment::Block {
				header,
				body,
				close,
			} => {
				self.push_line(&header);
				self.push_indent();

				for fragment in body {
					self.apply_fragment(fragment);
				}

				self.push_dedent();

				if let Some(close) = close {
					self.push_line(&close);
				}
			}
			CodeFragment::Sequence(fragments) => {
				for fragment in fragments {
					self.apply_fragment(fragment);
				}
			}
		}
	}

	pub fn build(self) -> String {
		self.buffer
	}

	fn write_indent(&mut self) {
		for _ in 0..self.indent_level {
			self.buffer.push('\t');
		}
	}
}
