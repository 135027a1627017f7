use crate::Location;

/// A `#` comment found in a yaml source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
	pub location: Location,
	/// The text following the `#`, with trailing whitespace removed.
	pub text: String,
	/// True when nothing but indentation precedes the comment on its line.
	pub standalone: bool,
}

impl Comment {
	/// The comment rewritten as a go line comment.
	pub fn to_go(&self) -> String {
		format!("//{}", self.text)
	}
}

/// Quoted scalars may continue across lines so the scanner keeps this state
/// between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
	None,
	Single,
	Double,
}

/// Walks a yaml source line by line and collects every comment, skipping
/// `#` characters that belong to quoted, plain or block scalars.
struct CommentScanner<'a> {
	source: &'a str,
	quote: Quote,
	/// Indentation of the line that opened an active block scalar.
	block_indent: Option<usize>,
	flow_depth: usize,
	comments: Vec<Comment>,
}

impl<'a> CommentScanner<'a> {
	fn new(source: &'a str) -> Self {
		Self {
			source,
			quote: Quote::None,
			block_indent: None,
			flow_depth: 0,
			comments: vec![],
		}
	}

	fn scan(mut self) -> Vec<Comment> {
		for (index, line) in self.source.lines().enumerate() {
			let chars: Vec<char> = line.chars().collect();
			self.scan_line(index + 1, &chars);
		}

		self.comments
	}

	fn scan_line(&mut self, line: usize, chars: &[char]) {
		let indent = chars.iter().take_while(|ch| **ch == ' ' || **ch == '\t').count();

		if let Some(block_indent) = self.block_indent {
			if indent == chars.len() || indent > block_indent {
				return;
			}

			self.block_indent = None;
		}

		let mut column = 0;
		let mut scalar_start = true;
		let mut in_property = false;
		// Column of the node which owns any block scalar opened on this line.
		let mut owner = indent;
		let mut token_start = indent;
		let mut opens_block = false;

		while column < chars.len() {
			let ch = chars[column];

			match self.quote {
				Quote::Double => {
					match ch {
						'\\' => column += 1,
						'"' => self.quote = Quote::None,
						_ => {}
					}

					column += 1;
					continue;
				}
				Quote::Single => {
					if ch == '\'' {
						if chars.get(column + 1) == Some(&'\'') {
							column += 1;
						} else {
							self.quote = Quote::None;
						}
					}

					column += 1;
					continue;
				}
				Quote::None => {}
			}

			let next = chars.get(column + 1).copied();
			let next_is_blank = next.is_none_or(|next| next == ' ' || next == '\t');
			let previous_is_blank = column == 0 || matches!(chars[column - 1], ' ' | '\t');

			if ch == ' ' || ch == '\t' {
				if in_property {
					in_property = false;
					scalar_start = true;
				}

				column += 1;
				continue;
			}

			if ch == '#' && previous_is_blank {
				let text: String = chars[column + 1..].iter().collect();
				self.comments.push(Comment {
					location: Location::new(line, column),
					text: text.trim_end().to_string(),
					standalone: column == indent,
				});
				break;
			}

			if scalar_start {
				token_start = column;
			}

			match ch {
				'"' if scalar_start => {
					self.quote = Quote::Double;
					scalar_start = false;
				}
				'\'' if scalar_start => {
					self.quote = Quote::Single;
					scalar_start = false;
				}
				'-' | '?' if scalar_start && next_is_blank => {
					owner = column;
				}
				'!' | '&' | '*' if scalar_start => {
					in_property = true;
				}
				'|' | '>' if scalar_start && self.flow_depth == 0 => {
					opens_block = true;
					scalar_start = false;
				}
				'[' | '{' if scalar_start => {
					self.flow_depth += 1;
				}
				']' | '}' if self.flow_depth > 0 => {
					self.flow_depth -= 1;
					scalar_start = false;
				}
				',' if self.flow_depth > 0 => {
					scalar_start = true;
				}
				':' if next_is_blank || (self.flow_depth > 0 && matches!(next, Some(',' | ']' | '}'))) => {
					owner = token_start;
					scalar_start = true;
				}
				_ => {
					if !in_property {
						scalar_start = false;
					}
				}
			}

			column += 1;
		}

		if opens_block {
			self.block_indent = Some(owner);
		}
	}
}

/// Collect every comment in `source` in source order.
pub(crate) fn scan_comments(source: &str) -> Vec<Comment> {
	CommentScanner::new(source).scan()
}
