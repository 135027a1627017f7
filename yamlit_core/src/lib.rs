//! `yamlit_core` turns yaml resource manifests into go source that rebuilds
//! the same data as an `*unstructured.Unstructured` composite literal.
//!
//! ## Processing Pipeline
//!
//! ```text
//! yaml document
//!   → Decoder (ordered element tree with comments, tags and resolved aliases)
//!   → Interpolator (renders `!!tpl` scalars against a values file)
//!   → Emitter (code fragments for every element, strings quoted by the escaper)
//!   → Formatter (validates the go source or pipes it through gofmt)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `yamlit.toml`.
//! - [`manifests`]: Manifest file expansion and multi-document splitting.
//! - [`escape`]: Go string literal quoting and `!!start`/`!!end` splices.
//! - [`builder`]: Tab-indented code builder used by the emitter.
//! - [`naming`]: Case conversions for derived identifiers.
//!
//! ## Template Values
//!
//! Scalars tagged `!!tpl` are [`minijinja`](https://docs.rs/minijinja)
//! templates. Their value is inserted verbatim as a go expression after
//! rendering, so the following manifest
//!
//! ```yaml
//! spec:
//!   replicas: !!tpl "{{ replicas }}"
//!   image: !!tpl "{{ image | quote }}"
//! ```
//!
//! with the values `{ "replicas": 3, "image": "nginx" }` renders
//! `"replicas": 3,` and `"image": "nginx",`.
//!
//! ## Quick Start
//!
//! ```rust
//! use yamlit_core::generate;
//!
//! let code = generate("metadata:\n  name: web\n", "service", &[]).unwrap();
//! assert!(code.starts_with("var service = &unstructured.Unstructured{"));
//! ```

pub use config::*;
pub use decoder::*;
pub use element::*;
pub use emitter::*;
pub use error::*;
pub use format::*;
pub use generate::*;
pub use interpolate::*;
pub use manifests::*;
pub use position::*;
pub use values::*;

pub mod builder;
mod comments;
pub mod config;
mod decoder;
mod element;
mod emitter;
#[allow(unused_assignments)]
mod error;
pub mod escape;
mod format;
mod generate;
mod interpolate;
pub mod manifests;
pub mod naming;
mod position;
mod values;

#[cfg(test)]
mod __tests;
