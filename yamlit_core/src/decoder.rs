use std::collections::HashMap;
use std::collections::HashSet;
use std::iter::Peekable;
use std::vec::IntoIter;

use saphyr_parser::Event;
use saphyr_parser::MarkedEventReceiver;
use saphyr_parser::Marker;
use saphyr_parser::Parser;
use saphyr_parser::ScanError;
use saphyr_parser::TScalarStyle;

use crate::Comments;
use crate::Element;
use crate::ElementKind;
use crate::Location;
use crate::YamlitError;
use crate::YamlitResult;
use crate::comments::Comment;
use crate::comments::scan_comments;
use crate::position::LineIndex;

const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

/// Decode a single yaml document into an ordered, comment-preserving element
/// tree. The returned element is always the top-level mapping.
pub fn decode(source: &str) -> YamlitResult<Element> {
	let lines = LineIndex::new(source);
	let events = collect_events(source, &lines)?;

	let documents = events
		.iter()
		.filter(|(event, _)| matches!(event, Event::DocumentStart { .. }))
		.count();

	match documents {
		0 => return Err(YamlitError::EmptyDocument),
		1 => {}
		count => return Err(YamlitError::MultipleDocuments(count)),
	}

	let mut builder = TreeBuilder::new(source, &lines, events);
	let root = builder.document()?;
	let entries = builder.entries;

	if !matches!(root.kind, RawKind::Mapping(_)) {
		return Err(YamlitError::EmptyDocument);
	}

	let comments = attach_comments(&scan_comments(source), entries);
	tracing::debug!(comments = comments.len(), "attached comments to entries");

	let mut lowerer = Lowerer {
		anchors: HashMap::new(),
		comments,
	};

	lowerer.lower(root, String::new(), false)
}

struct EventCollector {
	events: Vec<(Event, usize)>,
}

impl MarkedEventReceiver for EventCollector {
	fn on_event(&mut self, event: Event, mark: Marker) {
		self.events.push((event, mark.index()));
	}
}

fn collect_events(source: &str, lines: &LineIndex) -> YamlitResult<Vec<(Event, usize)>> {
	let mut collector = EventCollector { events: vec![] };
	let mut parser = Parser::new(source.chars());

	parser
		.load(&mut collector, true)
		.map_err(|error| scan_error(&error, lines))?;

	Ok(collector.events)
}

fn scan_error(error: &ScanError, lines: &LineIndex) -> YamlitError {
	let location = lines.location(error.marker().index());

	YamlitError::MalformedDocument {
		reason: error.info().to_string(),
		line: location.line,
		column: location.column + 1,
	}
}

fn malformed(reason: impl Into<String>, location: Location) -> YamlitError {
	YamlitError::MalformedDocument {
		reason: reason.into(),
		line: location.line,
		column: location.column + 1,
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawTag {
	handle: String,
	suffix: String,
}

impl RawTag {
	/// The name of a tag from the yaml core schema, e.g. `str` for `!!str`.
	fn core_name(&self) -> Option<&str> {
		match self.handle.as_str() {
			"!!" => Some(self.suffix.as_str()),
			CORE_SCHEMA_PREFIX => Some(self.suffix.as_str()),
			"" => self.suffix.strip_prefix(CORE_SCHEMA_PREFIX),
			_ => None,
		}
	}

	/// The parser reports a lone `!` either as an empty handle with a `!`
	/// suffix or as a `!` handle with no suffix.
	fn is_non_specific(&self) -> bool {
		(self.handle.is_empty() && self.suffix == "!") || (self.handle == "!" && self.suffix.is_empty())
	}
}

impl std::fmt::Display for RawTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.handle, self.suffix)
	}
}

#[derive(Debug)]
enum RawKind {
	Scalar { value: String, plain: bool },
	Mapping(Vec<(RawNode, RawNode)>),
	Sequence(Vec<RawNode>),
	Alias(usize),
}

/// A parsed node before comments are attached and aliases are resolved.
#[derive(Debug)]
struct RawNode {
	/// Pre-order identifier used to look up attached comments.
	id: usize,
	anchor: usize,
	tag: Option<RawTag>,
	location: Location,
	kind: RawKind,
}

/// A position where comments may attach: a mapping entry or a sequence
/// member. `id` refers to the node that becomes the element.
#[derive(Debug, Clone, Copy)]
struct Entry {
	location: Location,
	id: usize,
}

/// Walks the parser events and builds the raw node tree, recording entry
/// positions along the way.
struct TreeBuilder<'a> {
	source_lines: Vec<&'a str>,
	lines: &'a LineIndex,
	events: Peekable<IntoIter<(Event, usize)>>,
	next_id: usize,
	entries: Vec<Entry>,
}

impl<'a> TreeBuilder<'a> {
	fn new(source: &'a str, lines: &'a LineIndex, events: Vec<(Event, usize)>) -> Self {
		Self {
			source_lines: source.lines().collect(),
			lines,
			events: events.into_iter().peekable(),
			next_id: 0,
			entries: vec![],
		}
	}

	fn document(&mut self) -> YamlitResult<RawNode> {
		loop {
			match self.events.next() {
				Some((Event::DocumentStart { .. }, _)) => return self.node(),
				Some(_) => {}
				None => return Err(YamlitError::EmptyDocument),
			}
		}
	}

	fn peek_index(&mut self) -> usize {
		self.events.peek().map_or(0, |(_, index)| *index)
	}

	fn node(&mut self) -> YamlitResult<RawNode> {
		let id = self.next_id;
		self.next_id += 1;

		let Some((event, index)) = self.events.next() else {
			return Err(malformed("unexpected end of document", self.lines.location(0)));
		};
		let location = self.lines.location(index);

		let (kind, anchor, tag) = match event {
			Event::Scalar(value, style, anchor, tag) => {
				let plain = matches!(style, TScalarStyle::Plain);
				(RawKind::Scalar { value, plain }, anchor, tag)
			}
			Event::Alias(anchor) => (RawKind::Alias(anchor), 0, None),
			Event::SequenceStart(anchor, tag) => (RawKind::Sequence(self.sequence()?), anchor, tag),
			Event::MappingStart(anchor, tag) => (RawKind::Mapping(self.mapping()?), anchor, tag),
			other => {
				return Err(malformed(format!("unexpected yaml event {other:?}"), location));
			}
		};

		Ok(RawNode {
			id,
			anchor,
			tag: tag.map(|tag| {
				RawTag {
					handle: tag.handle,
					suffix: tag.suffix,
				}
			}),
			location,
			kind,
		})
	}

	fn sequence(&mut self) -> YamlitResult<Vec<RawNode>> {
		let mut members = vec![];

		loop {
			if matches!(self.events.peek(), Some((Event::SequenceEnd, _))) {
				self.events.next();
				return Ok(members);
			}

			let index = self.peek_index();
			self.entries.push(Entry {
				location: self.member_location(index),
				id: self.next_id,
			});
			members.push(self.node()?);
		}
	}

	fn mapping(&mut self) -> YamlitResult<Vec<(RawNode, RawNode)>> {
		let mut pairs = vec![];

		loop {
			if matches!(self.events.peek(), Some((Event::MappingEnd, _))) {
				self.events.next();
				return Ok(pairs);
			}

			let key = self.node()?;

			if !matches!(key.kind, RawKind::Scalar { .. } | RawKind::Alias(_)) {
				return Err(malformed("mapping keys must be scalars", key.location));
			}

			self.entries.push(Entry {
				location: key.location,
				id: self.next_id,
			});
			let value = self.node()?;
			pairs.push((key, value));
		}
	}

	/// Sequence members are positioned at their `-` indicator when the member
	/// starts on the same line as the dash. A block mapping member is marked
	/// at the `:` after its first key, so plain key text may sit between the
	/// dash and the mark.
	fn member_location(&self, index: usize) -> Location {
		let location = self.lines.location(index);
		let Some(line) = self.source_lines.get(location.line.saturating_sub(1)) else {
			return location;
		};
		let prefix: Vec<char> = line.chars().take(location.column).collect();
		let indicators = prefix
			.iter()
			.take_while(|ch| matches!(ch, ' ' | '\t' | '-'))
			.count();

		if prefix[indicators..]
			.iter()
			.any(|ch| matches!(ch, '[' | '{' | ',' | '#'))
		{
			return location;
		}

		let column = prefix[..indicators]
			.iter()
			.rposition(|ch| *ch == '-')
			.unwrap_or(indicators);

		Location::new(location.line, column)
	}
}

/// Distribute comments onto entries.
///
/// - A comment sharing a line with entries is the inline comment of the last
///   entry starting before it.
/// - A block of whole-line comments immediately followed by an entry at the
///   same or deeper indentation leads that entry.
/// - Any other block trails the latest preceding entry that is not indented
///   deeper than the block, or leads the next entry when there is none.
fn attach_comments(comments: &[Comment], mut entries: Vec<Entry>) -> HashMap<usize, Comments> {
	let mut attached: HashMap<usize, Comments> = HashMap::new();
	entries.sort_by_key(|entry| entry.location);

	let mut blocks: Vec<Vec<&Comment>> = vec![];

	for comment in comments {
		if !comment.standalone {
			let same_line = entries
				.iter()
				.rev()
				.find(|entry| {
					entry.location.line == comment.location.line
						&& entry.location.column < comment.location.column
				})
				.or_else(|| {
					entries
						.iter()
						.rev()
						.find(|entry| entry.location < comment.location)
				});

			match same_line {
				Some(entry) => attached.entry(entry.id).or_default().inline = Some(comment.to_go()),
				None => tracing::debug!(line = comment.location.line, "dropping unattached comment"),
			}

			continue;
		}

		let continues_block = blocks
			.last()
			.and_then(|block| block.last())
			.is_some_and(|last| last.location.line + 1 == comment.location.line);

		match blocks.last_mut() {
			Some(block) if continues_block => block.push(comment),
			_ => blocks.push(vec![comment]),
		}
	}

	for block in blocks {
		let (Some(first), Some(last)) = (block.first(), block.last()) else {
			continue;
		};
		let column = first.location.column;
		let lines = block.iter().map(|comment| comment.to_go());

		let leads = entries.iter().find(|entry| {
			entry.location.line == last.location.line + 1 && entry.location.column >= column
		});

		if let Some(entry) = leads {
			attached.entry(entry.id).or_default().leading.extend(lines);
			continue;
		}

		let trails = entries
			.iter()
			.rev()
			.find(|entry| entry.location < first.location && entry.location.column <= column);

		if let Some(entry) = trails {
			attached.entry(entry.id).or_default().trailing.extend(lines);
			continue;
		}

		match entries.iter().find(|entry| entry.location > last.location) {
			Some(entry) => attached.entry(entry.id).or_default().leading.extend(lines),
			None => tracing::debug!(line = first.location.line, "dropping unattached comment block"),
		}
	}

	attached
}

/// Converts raw nodes into elements, resolving aliases, merge keys and
/// scalar types.
struct Lowerer {
	/// Lowered elements by anchor id. Aliases clone from here.
	anchors: HashMap<usize, Element>,
	comments: HashMap<usize, Comments>,
}

impl Lowerer {
	fn lower(&mut self, node: RawNode, key: String, is_sequence_member: bool) -> YamlitResult<Element> {
		let comments = self.comments.remove(&node.id).unwrap_or_default();
		let anchor = node.anchor;

		let kind = match node.kind {
			RawKind::Alias(target) => {
				let Some(target) = self.anchors.get(&target) else {
					return Err(malformed("alias refers to an unknown anchor", node.location));
				};

				target.kind.clone()
			}
			RawKind::Scalar { value, plain } => classify_scalar(value, plain, node.tag.as_ref(), node.location)?,
			RawKind::Sequence(members) => {
				check_collection_tag(node.tag.as_ref(), "seq", node.location)?;
				let mut children = Vec::with_capacity(members.len());

				for member in members {
					children.push(self.lower(member, String::new(), true)?);
				}

				ElementKind::Sequence(children)
			}
			RawKind::Mapping(pairs) => {
				check_collection_tag(node.tag.as_ref(), "map", node.location)?;
				ElementKind::Mapping(self.lower_mapping(pairs)?)
			}
		};

		let element = Element {
			key,
			kind,
			is_sequence_member,
			comments,
		};

		if anchor > 0 {
			self.anchors.insert(anchor, element.clone());
		}

		Ok(element)
	}

	fn lower_mapping(&mut self, pairs: Vec<(RawNode, RawNode)>) -> YamlitResult<Vec<Element>> {
		let mut explicit = HashSet::new();
		let mut keyed = Vec::with_capacity(pairs.len());

		for (key, value) in pairs {
			if is_merge_key(&key) {
				keyed.push((None, value));
				continue;
			}

			let text = self.key_text(&key)?;

			if !explicit.insert(text.clone()) {
				return Err(malformed(format!("duplicate mapping key `{text}`"), key.location));
			}

			if key.anchor > 0 {
				self.anchors.insert(key.anchor, Element::new("", ElementKind::Str(text.clone())));
			}

			keyed.push((Some(text), value));
		}

		let mut seen = HashSet::new();
		let mut children = Vec::with_capacity(keyed.len());

		for (key, value) in keyed {
			let Some(key) = key else {
				let location = value.location;
				let mut merged = self.lower(value, String::new(), false)?;
				let comments = std::mem::take(&mut merged.comments);
				let first = children.len();

				for source in merge_sources(merged, location)? {
					for child in source {
						if !explicit.contains(&child.key) && seen.insert(child.key.clone()) {
							children.push(child);
						}
					}
				}

				// Comments on the merge key line lead the first spliced entry.
				let lines: Vec<String> = comments
					.leading
					.into_iter()
					.chain(comments.inline)
					.chain(comments.trailing)
					.collect();

				match children.get_mut(first) {
					Some(child) => {
						let mut leading = lines;
						leading.append(&mut child.comments.leading);
						child.comments.leading = leading;
					}
					None if !lines.is_empty() => {
						tracing::debug!(line = location.line, "dropping comments of an empty merge");
					}
					None => {}
				}

				continue;
			};

			seen.insert(key.clone());
			children.push(self.lower(value, key, false)?);
		}

		Ok(children)
	}

	fn key_text(&self, key: &RawNode) -> YamlitResult<String> {
		match &key.kind {
			RawKind::Scalar { value, .. } => Ok(value.clone()),
			RawKind::Alias(anchor) => {
				self.anchors
					.get(anchor)
					.and_then(|element| element.value().map(ToString::to_string))
					.ok_or_else(|| malformed("mapping keys must be scalars", key.location))
			}
			RawKind::Mapping(_) | RawKind::Sequence(_) => {
				Err(malformed("mapping keys must be scalars", key.location))
			}
		}
	}
}

fn is_merge_key(key: &RawNode) -> bool {
	match (&key.kind, &key.tag) {
		(RawKind::Scalar { .. }, Some(tag)) => tag.core_name() == Some("merge"),
		(RawKind::Scalar { value, plain: true }, None) => value == "<<",
		_ => false,
	}
}

/// The mappings a merge key splices in, in precedence order.
fn merge_sources(merged: Element, location: Location) -> YamlitResult<Vec<Vec<Element>>> {
	match merged.kind {
		ElementKind::Mapping(children) => Ok(vec![strip_members(children)]),
		ElementKind::Sequence(members) => {
			members
				.into_iter()
				.map(|member| {
					match member.kind {
						ElementKind::Mapping(children) => Ok(strip_members(children)),
						_ => Err(malformed("merge key sequences may only contain mappings", location)),
					}
				})
				.collect()
		}
		_ => Err(malformed("merge key value must be a mapping", location)),
	}
}

fn strip_members(children: Vec<Element>) -> Vec<Element> {
	children
		.into_iter()
		.map(|mut child| {
			child.is_sequence_member = false;
			child
		})
		.collect()
}

fn check_collection_tag(tag: Option<&RawTag>, expected: &str, location: Location) -> YamlitResult<()> {
	let Some(tag) = tag else {
		return Ok(());
	};

	if tag.is_non_specific() || tag.core_name() == Some(expected) {
		return Ok(());
	}

	Err(malformed(format!("unsupported tag `{tag}` on a collection"), location))
}

/// Resolve a scalar's type from its tag, or from the yaml core schema when
/// it is an untagged plain scalar.
fn classify_scalar(
	value: String,
	plain: bool,
	tag: Option<&RawTag>,
	location: Location,
) -> YamlitResult<ElementKind> {
	let Some(tag) = tag else {
		if !plain {
			return Ok(ElementKind::Str(value));
		}

		return Ok(resolve_plain(value));
	};

	if tag.is_non_specific() {
		return Ok(ElementKind::Str(value));
	}

	match tag.core_name() {
		Some("str" | "binary" | "timestamp") => Ok(ElementKind::Str(value)),
		Some("tpl") => Ok(ElementKind::Template(value)),
		Some("var") => Ok(ElementKind::Var(value)),
		Some("null") if is_null(&value) => Ok(ElementKind::Null),
		Some("bool") if is_bool(&value) => Ok(ElementKind::Bool(value)),
		Some("int") if is_int(&value) => Ok(ElementKind::Int(value)),
		Some("float") if is_float(&value) || is_int(&value) => Ok(ElementKind::Float(value)),
		Some(kind @ ("null" | "bool" | "int" | "float")) => {
			Err(malformed(format!("`{value}` is not a valid {kind}"), location))
		}
		_ => Err(malformed(format!("unsupported tag `{tag}`"), location)),
	}
}

fn resolve_plain(value: String) -> ElementKind {
	if is_null(&value) {
		ElementKind::Null
	} else if is_bool(&value) {
		ElementKind::Bool(value)
	} else if is_int(&value) {
		ElementKind::Int(value)
	} else if is_float(&value) {
		ElementKind::Float(value)
	} else {
		ElementKind::Str(value)
	}
}

fn is_null(value: &str) -> bool {
	matches!(value, "" | "~" | "null" | "Null" | "NULL")
}

fn is_bool(value: &str) -> bool {
	matches!(value, "true" | "True" | "TRUE" | "false" | "False" | "FALSE")
}

fn is_int(value: &str) -> bool {
	if let Some(octal) = value.strip_prefix("0o") {
		return !octal.is_empty() && octal.chars().all(|ch| ch.is_digit(8));
	}

	if let Some(hex) = value.strip_prefix("0x") {
		return !hex.is_empty() && hex.chars().all(|ch| ch.is_ascii_hexdigit());
	}

	let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
	!digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit())
}

fn is_float(value: &str) -> bool {
	let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);

	if matches!(unsigned, ".inf" | ".Inf" | ".INF") || matches!(value, ".nan" | ".NaN" | ".NAN") {
		return true;
	}

	let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
		Some(position) => (&unsigned[..position], Some(&unsigned[position + 1..])),
		None => (unsigned, None),
	};

	let (whole, fraction) = match mantissa.split_once('.') {
		Some((whole, fraction)) => (whole, Some(fraction)),
		None => (mantissa, None),
	};

	let all_digits = |text: &str| text.chars().all(|ch| ch.is_ascii_digit());
	let mantissa_valid = match fraction {
		Some(fraction) => all_digits(whole) && all_digits(fraction) && !(whole.is_empty() && fraction.is_empty()),
		None => !whole.is_empty() && all_digits(whole),
	};

	let exponent_valid = exponent.is_none_or(|exponent| {
		let digits = exponent.strip_prefix(['-', '+']).unwrap_or(exponent);
		!digits.is_empty() && all_digits(digits)
	});

	mantissa_valid && exponent_valid
}
