use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;
use globset::GlobBuilder;
use ignore::WalkBuilder;

use crate::YamlitError;
use crate::YamlitResult;

/// A yaml manifest file which may hold several documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
	pub filename: PathBuf,
	/// The filename relative to the root the manifests were expanded from.
	pub relative_filename: PathBuf,
	pub content: String,
}

impl Manifest {
	pub fn new(filename: PathBuf, relative_filename: PathBuf, content: impl Into<String>) -> Self {
		Self {
			filename,
			relative_filename,
			content: normalize_line_endings(&content.into()),
		}
	}

	/// Read a manifest from disk.
	pub fn load(root: &Path, filename: PathBuf) -> YamlitResult<Self> {
		let content = std::fs::read_to_string(&filename).map_err(|e| {
			YamlitError::ManifestRead {
				path: filename.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		let relative_filename = filename
			.strip_prefix(root)
			.map_or_else(|_| filename.clone(), Path::to_path_buf);

		Ok(Self::new(filename, relative_filename, content))
	}

	pub fn documents(&self) -> Vec<String> {
		extract_documents(&self.content)
	}
}

/// An ordered collection of manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Manifests(Vec<Manifest>);

impl Manifests {
	pub fn new(manifests: Vec<Manifest>) -> Self {
		Self(manifests)
	}

	/// Every document of every manifest, in order.
	pub fn documents(&self) -> Vec<ManifestDocument> {
		self.iter()
			.flat_map(|manifest| {
				manifest
					.documents()
					.into_iter()
					.enumerate()
					.map(move |(index, content)| {
						ManifestDocument {
							source: manifest.relative_filename.clone(),
							index,
							content,
						}
					})
			})
			.collect()
	}
}

impl From<Vec<Manifest>> for Manifests {
	fn from(manifests: Vec<Manifest>) -> Self {
		Self(manifests)
	}
}

/// A single yaml document split from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
	pub source: PathBuf,
	/// Position of the document within its manifest.
	pub index: usize,
	pub content: String,
}

/// Expand file paths, directories and glob patterns relative to `root` into
/// a sorted list of manifests. Directories contribute their `.yaml` and
/// `.yml` files. Every pattern must match at least one file.
pub fn expand_manifests(root: &Path, patterns: &[String]) -> YamlitResult<Manifests> {
	let mut filenames = BTreeSet::new();
	let mut walked: Option<Vec<PathBuf>> = None;

	for pattern in patterns {
		let candidate = root.join(pattern);

		if candidate.is_file() {
			filenames.insert(candidate);
			continue;
		}

		let files = walked.get_or_insert_with(|| walk_files(root));

		let matched: Vec<PathBuf> = if candidate.is_dir() {
			files
				.iter()
				.filter(|path| path.starts_with(&candidate) && is_yaml_file(path))
				.cloned()
				.collect()
		} else {
			let matcher = GlobBuilder::new(pattern)
				.literal_separator(true)
				.build()
				.map_err(|e| {
					YamlitError::ManifestPattern {
						pattern: pattern.clone(),
						reason: e.to_string(),
					}
				})?
				.compile_matcher();

			files
				.iter()
				.filter(|path| {
					path.strip_prefix(root)
						.is_ok_and(|relative| matcher.is_match(relative))
				})
				.cloned()
				.collect()
		};

		if matched.is_empty() {
			return Err(YamlitError::ManifestPattern {
				pattern: pattern.clone(),
				reason: "no files matched".to_string(),
			});
		}

		tracing::debug!(pattern, count = matched.len(), "expanded manifest pattern");
		filenames.extend(matched);
	}

	let manifests = filenames
		.into_iter()
		.map(|filename| Manifest::load(root, filename))
		.collect::<YamlitResult<Vec<_>>>()?;

	Ok(Manifests(manifests))
}

fn walk_files(root: &Path) -> Vec<PathBuf> {
	WalkBuilder::new(root)
		.build()
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_some_and(|file_type| file_type.is_file()))
		.map(ignore::DirEntry::into_path)
		.collect()
}

fn is_yaml_file(path: &Path) -> bool {
	matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

/// Split a multi-document yaml stream on `---` separator lines. Documents
/// holding only blank lines or comments are dropped.
pub fn extract_documents(content: &str) -> Vec<String> {
	let mut documents = vec![];
	let mut current = String::new();

	for line in content.lines() {
		if line.trim_end_matches(' ') == "---" {
			documents.push(std::mem::take(&mut current));
			continue;
		}

		current.push_str(line);
		current.push('\n');
	}

	documents.push(current);
	documents.retain(|document| !is_blank_document(document));
	documents
}

fn is_blank_document(document: &str) -> bool {
	document.lines().all(|line| {
		let trimmed = line.trim();
		trimmed.is_empty() || trimmed.starts_with('#')
	})
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
