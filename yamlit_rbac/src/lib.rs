//! `yamlit_rbac` derives the kubernetes rbac permissions a controller needs
//! to manage the objects described by a set of yaml manifests.
//!
//! Every object needs `groups=<api group>,resources=<plural kind>`. Roles and
//! cluster roles additionally need every permission they grant. The derived
//! rules are available in three shapes:
//!
//! - [`generate_markers`] writes kubebuilder `// +kubebuilder:rbac` markers.
//! - [`generate_yaml`] writes a `ClusterRole` and one `Role` per namespace.
//! - [`generate_code`] writes those roles as go `unstructured.Unstructured`
//!   declarations.
//!
//! ```rust
//! use std::path::PathBuf;
//!
//! use yamlit_core::Manifest;
//! use yamlit_core::Manifests;
//! use yamlit_rbac::RbacOptions;
//! use yamlit_rbac::generate_markers;
//!
//! let manifests = Manifests::new(vec![Manifest::new(
//! 	PathBuf::from("deploy.yaml"),
//! 	PathBuf::from("deploy.yaml"),
//! 	"apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n",
//! )]);
//! let options = RbacOptions {
//! 	verbs: vec!["get".into(), "list".into()],
//! 	..RbacOptions::default()
//! };
//!
//! assert_eq!(
//! 	generate_markers(&manifests, &options).unwrap(),
//! 	"// +kubebuilder:rbac:groups=apps,resources=deployments,verbs=get;list\n"
//! );
//! ```

pub use error::*;
pub use generate::*;
pub use rules::*;

#[allow(unused_assignments)]
mod error;
mod generate;
mod rules;
