use miette::Diagnostic;
use thiserror::Error;
use yamlit_core::YamlitError;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum RbacError {
	#[error(transparent)]
	#[diagnostic(transparent)]
	Core(#[from] YamlitError),

	#[error("verb is invalid: `{0}`")]
	#[diagnostic(
		code(yamlit::rbac::invalid_verb),
		help("valid verbs: get, list, watch, create, update, patch, delete")
	)]
	InvalidVerb(String),

	#[error("document {index} of `{path}` has no `kind`")]
	#[diagnostic(code(yamlit::rbac::missing_kind))]
	MissingKind { path: String, index: usize },

	#[error("failed to encode role `{role}` as yaml: {reason}")]
	#[diagnostic(code(yamlit::rbac::encode))]
	Encode { role: String, reason: String },
}

pub type RbacResult<T> = Result<T, RbacError>;
