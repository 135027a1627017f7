/// A location in a yaml source. Lines are 1-based, columns are 0-based and
/// counted in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
	pub line: usize,
	pub column: usize,
}

impl Location {
	pub fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl std::fmt::Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column + 1)
	}
}

/// Maps character indexes, as reported by the yaml parser, to line and
/// column locations.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
	/// Character index of the first character of every line.
	line_starts: Vec<usize>,
}

impl LineIndex {
	pub fn new(source: &str) -> Self {
		let mut line_starts = vec![0];

		for (index, ch) in source.chars().enumerate() {
			if ch == '\n' {
				line_starts.push(index + 1);
			}
		}

		Self { line_starts }
	}

	pub fn location(&self, char_index: usize) -> Location {
		let line = match self.line_starts.binary_search(&char_index) {
			Ok(line) => line,
			Err(next) => next.saturating_sub(1),
		};

		Location::new(line + 1, char_index - self.line_starts[line])
	}
}
