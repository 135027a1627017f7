use std::io::Write;
use std::process::Command;
use std::process::Stdio;

use serde::Deserialize;
use serde::Serialize;

use crate::YamlitError;
use crate::YamlitResult;

/// Post-processes generated go source.
pub trait Formatter {
	fn format(&self, source: &str) -> YamlitResult<String>;
}

/// Which formatter to run on generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
	/// Validate the generated source without invoking external tools.
	#[default]
	Builtin,
	/// Pipe the generated source through `gofmt`.
	Gofmt,
}

impl FormatterKind {
	pub fn formatter(self) -> Box<dyn Formatter> {
		match self {
			Self::Builtin => Box::new(BuiltinFormatter),
			Self::Gofmt => Box::new(GofmtFormatter::default()),
		}
	}
}

/// Checks that delimiters balance and that string, rune and comment tokens
/// are terminated. The source is returned unchanged when it is valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormatter;

impl Formatter for BuiltinFormatter {
	fn format(&self, source: &str) -> YamlitResult<String> {
		validate_go(source)?;
		Ok(source.to_string())
	}
}

#[derive(Debug, Clone)]
pub struct GofmtFormatter {
	pub program: String,
}

impl Default for GofmtFormatter {
	fn default() -> Self {
		Self {
			program: "gofmt".to_string(),
		}
	}
}

impl Formatter for GofmtFormatter {
	fn format(&self, source: &str) -> YamlitResult<String> {
		let mut child = Command::new(&self.program)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| YamlitError::Format(format!("failed to run `{}`: {e}", self.program)))?;

		if let Some(mut stdin) = child.stdin.take() {
			stdin
				.write_all(source.as_bytes())
				.map_err(|e| YamlitError::Format(e.to_string()))?;
		}

		let output = child
			.wait_with_output()
			.map_err(|e| YamlitError::Format(e.to_string()))?;

		if !output.status.success() {
			return Err(YamlitError::Format(
				String::from_utf8_lossy(&output.stderr).trim().to_string(),
			));
		}

		String::from_utf8(output.stdout).map_err(|e| YamlitError::Format(e.to_string()))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
	Code,
	LineComment,
	BlockComment,
	Interpreted,
	Raw,
	Rune,
}

/// Validate the lexical structure of go source.
pub fn validate_go(source: &str) -> YamlitResult<()> {
	let mut state = Lexeme::Code;
	let mut stack: Vec<(char, usize)> = vec![];
	let mut line = 1;
	let mut chars = source.chars().peekable();
	let mut previous = ' ';

	while let Some(ch) = chars.next() {
		let follows_word = previous.is_alphanumeric() || previous == '_';
		previous = ch;

		if ch == '\n' {
			match state {
				Lexeme::Interpreted | Lexeme::Rune => {
					return Err(YamlitError::Format(format!("line {line}: newline in literal")));
				}
				Lexeme::LineComment => state = Lexeme::Code,
				_ => {}
			}

			line += 1;
			continue;
		}

		match state {
			Lexeme::Code => {
				match ch {
					'/' if chars.peek() == Some(&'/') => state = Lexeme::LineComment,
					'/' if chars.peek() == Some(&'*') => {
						chars.next();
						state = Lexeme::BlockComment;
					}
					'"' => state = Lexeme::Interpreted,
					'`' => state = Lexeme::Raw,
					'\'' => state = Lexeme::Rune,
					'0'..='9' if !follows_word => {
						let mut literal = String::from(ch);

						while let Some(&next) = chars.peek() {
							let exponent_sign = matches!(next, '+' | '-') && literal.ends_with(['e', 'E', 'p', 'P']);

							if !(next.is_ascii_alphanumeric() || matches!(next, '_' | '.') || exponent_sign) {
								break;
							}

							literal.push(next);
							chars.next();
						}

						check_number(&literal, line)?;
					}
					'(' | '[' | '{' => stack.push((ch, line)),
					')' | ']' | '}' => {
						let expected = match ch {
							')' => '(',
							']' => '[',
							_ => '{',
						};

						match stack.pop() {
							Some((open, _)) if open == expected => {}
							Some((open, opened)) => {
								return Err(YamlitError::Format(format!(
									"line {line}: `{ch}` does not close `{open}` from line {opened}"
								)));
							}
							None => {
								return Err(YamlitError::Format(format!("line {line}: unexpected `{ch}`")));
							}
						}
					}
					_ => {}
				}
			}
			Lexeme::Raw if ch == '`' => state = Lexeme::Code,
			Lexeme::BlockComment if ch == '*' && chars.peek() == Some(&'/') => {
				chars.next();
				state = Lexeme::Code;
			}
			Lexeme::Interpreted | Lexeme::Rune if ch == '\\' => {
				chars.next();
			}
			Lexeme::Interpreted if ch == '"' => state = Lexeme::Code,
			Lexeme::Rune if ch == '\'' => state = Lexeme::Code,
			_ => {}
		}
	}

	match state {
		Lexeme::Interpreted | Lexeme::Raw | Lexeme::Rune | Lexeme::BlockComment => {
			return Err(YamlitError::Format("unterminated literal at end of source".to_string()));
		}
		Lexeme::Code | Lexeme::LineComment => {}
	}

	if let Some((open, opened)) = stack.pop() {
		return Err(YamlitError::Format(format!("`{open}` from line {opened} is never closed")));
	}

	Ok(())
}

/// Go reads a decimal integer with a leading zero as octal.
fn check_number(literal: &str, line: usize) -> YamlitResult<()> {
	let legacy_octal = literal.len() > 1
		&& literal.starts_with('0')
		&& literal.chars().all(|ch| ch.is_ascii_digit());

	if legacy_octal && literal.contains(['8', '9']) {
		return Err(YamlitError::Format(format!(
			"line {line}: invalid digit in octal literal `{literal}`"
		)));
	}

	Ok(())
}
