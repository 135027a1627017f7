use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn kubernetes yaml manifests into go unstructured objects.",
	long_about = "yamlit reads yaml manifests and generates go source declaring \
	              `*unstructured.Unstructured` values with the same content, keeping key order \
	              and comments.\n\nScalars tagged `!!tpl` are templates rendered against a values \
	              file and inserted as go expressions.\n\nQuick start:\n  yamlit go -m \
	              deploy.yaml        Print the go declaration\n  yamlit rbac yaml -m 'config/*.yaml'  \
	              Derive the roles a controller needs"
)]
pub struct YamlitCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root. Config files and manifest patterns are
	/// resolved from here.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable debug logging on stderr.
	#[arg(long, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate go source for the objects in yaml manifests.
	///
	/// A single document is declared with `--variable-name`. Several
	/// documents get one declaration each, named after their kind and
	/// `metadata.name`.
	Go(GoArgs),
	/// Derive the rbac permissions needed to manage the objects in yaml
	/// manifests.
	Rbac {
		#[command(subcommand)]
		command: RbacCommands,
	},
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct GoArgs {
	/// Manifest files, directories or glob patterns. May be repeated.
	#[arg(long = "manifest-files", short = 'm', required = true)]
	pub manifests: Vec<String>,

	/// Variable name for the generated object. Defaults to the config value
	/// or `object`.
	#[arg(long, short = 'v')]
	pub variable_name: Option<String>,

	/// Values file (yaml, json or toml) for `!!tpl` scalars.
	#[arg(long = "values-file", short = 'f')]
	pub values: Option<PathBuf>,

	/// Write the generated code to this file instead of stdout.
	#[arg(long, short = 'o')]
	pub output: Option<PathBuf>,

	/// Compare the generated code with `--output` instead of writing it.
	/// Exits with a non-zero status code when the file is out of date.
	#[arg(long, requires = "output", default_value_t = false)]
	pub check: bool,

	/// Format the generated code with `gofmt`.
	#[arg(long, default_value_t = false)]
	pub gofmt: bool,

	/// Render undefined template values as empty text instead of failing.
	#[arg(long, default_value_t = false)]
	pub allow_undefined: bool,
}

#[derive(Subcommand)]
pub enum RbacCommands {
	/// Print kubebuilder rbac markers for controller-gen.
	#[command(alias = "kubebuilder-markers")]
	Markers(RbacArgs),
	/// Print the `ClusterRole` and namespaced `Role` manifests.
	Yaml(RbacArgs),
	/// Print the roles as go unstructured objects.
	Go {
		#[command(flatten)]
		rbac: RbacArgs,

		/// Variable name for the generated roles. Suffixed with an index when
		/// more than one role is generated.
		#[arg(long)]
		variable_name: Option<String>,
	},
}

impl RbacCommands {
	pub fn args(&self) -> &RbacArgs {
		match self {
			Self::Markers(args) | Self::Yaml(args) | Self::Go { rbac: args, .. } => args,
		}
	}
}

#[derive(Args)]
pub struct RbacArgs {
	/// Manifest files, directories or glob patterns. May be repeated.
	#[arg(long = "manifest-files", short = 'm', required = true)]
	pub manifests: Vec<String>,

	/// Verbs granted on every rule. May be repeated. Defaults to the config
	/// value or `get list watch create update patch delete`.
	#[arg(long = "verbs")]
	pub verbs: Vec<String>,

	/// Name of the generated roles.
	#[arg(long)]
	pub role_name: Option<String>,

	/// Restrict rules to the names of the manifests' objects.
	#[arg(long, default_value_t = false)]
	pub use_resource_names: bool,
}
