use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum YamlitError {
	#[error(transparent)]
	#[diagnostic(code(yamlit::io_error))]
	Io(#[from] std::io::Error),

	#[error("malformed yaml document at {line}:{column}: {reason}")]
	#[diagnostic(code(yamlit::malformed_document))]
	MalformedDocument {
		reason: String,
		line: usize,
		column: usize,
	},

	#[error("document has no top-level mapping")]
	#[diagnostic(
		code(yamlit::empty_document),
		help("the manifest must be a yaml mapping such as `apiVersion: v1`")
	)]
	EmptyDocument,

	#[error("expected a single yaml document, found {0}")]
	#[diagnostic(
		code(yamlit::multiple_documents),
		help("pass the file through the manifest loader which splits documents on `---`")
	)]
	MultipleDocuments(usize),

	#[error("only one set of values is allowed, received {0}")]
	#[diagnostic(code(yamlit::too_many_value_sets))]
	TooManyValueSets(usize),

	#[error("template value at `{key}` requires values but none were supplied")]
	#[diagnostic(
		code(yamlit::missing_values),
		help("supply a values file with `--values <file>`")
	)]
	MissingValues { key: String },

	#[error("failed to interpolate template at `{key}`: {reason}")]
	#[diagnostic(code(yamlit::interpolation))]
	Interpolation { key: String, reason: String },

	#[error("failed to render `{path}`")]
	#[diagnostic(code(yamlit::render))]
	Render {
		path: String,
		#[source]
		source: EmitError,
	},

	#[error("generated code is not valid go: {0}")]
	#[diagnostic(code(yamlit::format))]
	Format(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(yamlit::config_parse),
		help("check that yamlit.toml is valid TOML with [generate] and/or [rbac] sections")
	)]
	ConfigParse(String),

	#[error("failed to load values file `{path}`: {reason}")]
	#[diagnostic(code(yamlit::values_file))]
	ValuesFile { path: String, reason: String },

	#[error("unsupported values file format: `{0}`")]
	#[diagnostic(
		code(yamlit::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedValuesFormat(String),

	#[error("invalid manifest pattern `{pattern}`: {reason}")]
	#[diagnostic(code(yamlit::manifest_pattern))]
	ManifestPattern { pattern: String, reason: String },

	#[error("failed to read manifest `{path}`: {reason}")]
	#[diagnostic(code(yamlit::manifest_read))]
	ManifestRead { path: String, reason: String },

	#[error("no manifests found")]
	#[diagnostic(
		code(yamlit::no_manifests),
		help("pass one or more files or glob patterns with `--manifest`")
	)]
	NoManifests,
}

/// The lower-level cause of a failed render, always wrapped by
/// [`YamlitError::Render`].
#[derive(Debug, Diagnostic, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmitError {
	#[error("template value rendered to an empty expression")]
	#[diagnostic(code(yamlit::emit::empty_expression))]
	EmptyExpression,

	#[error("collections cannot be rendered as a scalar expression")]
	#[diagnostic(code(yamlit::emit::not_scalar))]
	NotScalar,
}

pub type YamlitResult<T> = Result<T, YamlitError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
