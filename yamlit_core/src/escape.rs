use std::fmt::Write;

use logos::Logos;

/// Opens a verbatim go expression inside a string scalar.
pub const SPLICE_START: &str = "!!start";
/// Closes a verbatim go expression opened by [`SPLICE_START`].
pub const SPLICE_END: &str = "!!end";

#[derive(Logos, Debug, PartialEq)]
enum SpliceToken {
	#[token("!!start")]
	Start,
	#[token("!!end")]
	End,
	#[token("!")]
	Bang,
	#[regex(r"[^!]+")]
	Text,
}

/// A piece of a string scalar: literal text or a spliced go expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	Literal(String),
	Expression(String),
}

/// Split a string on `!!start ... !!end` markers. An unterminated marker is
/// kept as literal text.
pub fn split_splices(raw: &str) -> Vec<Segment> {
	let mut segments = vec![];
	let mut literal = String::new();
	let mut expression: Option<String> = None;

	for (token, span) in SpliceToken::lexer(raw).spanned() {
		let slice = &raw[span];

		let in_expression = expression.is_some();

		match token {
			Ok(SpliceToken::Start) if !in_expression => {
				if !literal.is_empty() {
					segments.push(Segment::Literal(std::mem::take(&mut literal)));
				}

				expression = Some(String::new());
			}
			Ok(SpliceToken::End) if in_expression => {
				if let Some(text) = expression.take() {
					segments.push(Segment::Expression(text.trim().to_string()));
				}
			}
			_ => {
				match expression.as_mut() {
					Some(text) => text.push_str(slice),
					None => literal.push_str(slice),
				}
			}
		}
	}

	if let Some(text) = expression {
		if let Some(Segment::Literal(previous)) = segments.last() {
			literal = previous.clone();
			segments.pop();
		}

		literal.push_str(SPLICE_START);
		literal.push_str(&text);
	}

	if !literal.is_empty() {
		segments.push(Segment::Literal(literal));
	}

	segments
}

/// Render a string scalar as a go expression evaluating to the same text.
///
/// Spliced expressions are concatenated verbatim between the quoted literal
/// parts, so `name-!!start suffix !!end` becomes `"name-" + suffix`.
pub fn escape(raw: &str) -> String {
	let parts: Vec<String> = split_splices(raw)
		.into_iter()
		.filter_map(|segment| {
			match segment {
				Segment::Literal(text) => Some(quote(&text)),
				Segment::Expression(text) if text.is_empty() => None,
				Segment::Expression(text) => Some(text),
			}
		})
		.collect();

	if parts.is_empty() {
		return quote("");
	}

	parts.join(" + ")
}

/// Quote text as a go string literal.
///
/// Text containing a newline or a backslash uses the raw backtick form, with
/// backticks spliced in as interpreted literals. Everything else, and any
/// text a raw literal cannot hold, uses the interpreted form.
pub fn quote(raw: &str) -> String {
	let prefers_raw = raw.contains(['\n', '\\']);
	let raw_safe = !raw.chars().any(|ch| !is_raw_safe(ch));

	if prefers_raw && raw_safe {
		format!("`{}`", raw.replace('`', "` + \"`\" + `"))
	} else {
		quote_interpreted(raw)
	}
}

/// Quote text as an interpreted `"..."` go string literal.
pub fn quote_interpreted(raw: &str) -> String {
	let mut quoted = String::with_capacity(raw.len() + 2);
	quoted.push('"');

	for ch in raw.chars() {
		match ch {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\r' => quoted.push_str("\\r"),
			'\t' => quoted.push_str("\\t"),
			'\u{feff}' => quoted.push_str("\\ufeff"),
			ch if ch.is_ascii_control() => {
				let _ = write!(quoted, "\\x{:02x}", ch as u32);
			}
			ch if ch.is_control() => {
				let _ = write!(quoted, "\\u{:04x}", ch as u32);
			}
			ch => quoted.push(ch),
		}
	}

	quoted.push('"');
	quoted
}

/// Go drops carriage returns from raw literals and rejects other control
/// characters and byte order marks in source.
fn is_raw_safe(ch: char) -> bool {
	ch == '\n' || ch == '\t' || !(ch.is_control() || ch == '\u{feff}')
}
