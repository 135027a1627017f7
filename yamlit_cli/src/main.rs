use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use yamlit_cli::Commands;
use yamlit_cli::GoArgs;
use yamlit_cli::RbacCommands;
use yamlit_cli::YamlitCli;
use yamlit_core::FormatterKind;
use yamlit_core::Generator;
use yamlit_core::YamlitConfig;
use yamlit_core::YamlitError;
use yamlit_core::expand_manifests;
use yamlit_core::load_values;
use yamlit_rbac::RbacError;
use yamlit_rbac::RbacOptions;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = YamlitCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Go(go)) => run_go(&args, go),
		Some(Commands::Rbac { command }) => run_rbac(&args, command),
		None => {
			eprintln!("No subcommand specified. Run `yamlit --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render library errors through miette for error codes and help text.
		let e = match e.downcast::<YamlitError>() {
			Ok(yamlit_err) => {
				let report: miette::Report = (*yamlit_err).into();
				eprintln!("{report:?}");
				process::exit(2);
			}
			Err(e) => e,
		};

		match e.downcast::<RbacError>() {
			Ok(rbac_err) => {
				let report: miette::Report = (*rbac_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}

		process::exit(2);
	}
}

/// Log to stderr. `--verbose` enables debug events, otherwise `RUST_LOG`
/// applies with warnings as the default.
fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(color_enabled())
		.without_time()
		.init();
}

fn resolve_root(args: &YamlitCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> Result<YamlitConfig, Box<dyn std::error::Error>> {
	Ok(YamlitConfig::load(root)?.unwrap_or_default())
}

fn run_go(args: &YamlitCli, go: &GoArgs) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;

	let mut options = config.generate.options();
	if let Some(variable_name) = &go.variable_name {
		options.variable_name.clone_from(variable_name);
	}
	if go.gofmt {
		options.formatter = FormatterKind::Gofmt;
	}
	if go.allow_undefined {
		options.strict_undefined = false;
	}

	// A values file from the command line is relative to the working
	// directory, one from the config is relative to the project root.
	let values_path = go
		.values
		.clone()
		.or_else(|| config.generate.values.as_ref().map(|path| root.join(path)));
	let values = match values_path {
		Some(path) => vec![load_values(&path)?],
		None => vec![],
	};

	let manifests = expand_manifests(&root, &go.manifests)?;
	let documents = manifests.documents();
	let generator = Generator::new(options);

	let code = match documents.as_slice() {
		[] => return Err(YamlitError::NoManifests.into()),
		[document] => generator.generate(&document.content, &values)?,
		_ => {
			if go.variable_name.is_some() {
				tracing::warn!(
					documents = documents.len(),
					"--variable-name is ignored when generating several documents"
				);
			}

			generator.generate_manifests(&manifests, &values)?
		}
	};

	match &go.output {
		Some(output) if go.check => check_output(output, &code),
		Some(output) => {
			std::fs::write(output, &code)?;
			println!("{} {}", colored!("Wrote", green), output.display());
			Ok(())
		}
		None => {
			print!("{code}");
			Ok(())
		}
	}
}

/// Compare generated code with the file at `output`, printing a diff and
/// exiting with status 1 when they differ.
fn check_output(output: &Path, expected: &str) -> Result<(), Box<dyn std::error::Error>> {
	let current = match std::fs::read_to_string(output) {
		Ok(current) => current,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
		Err(e) => return Err(e.into()),
	};

	if current == expected {
		println!("{} is up to date.", output.display());
		return Ok(());
	}

	eprintln!("{} {} is out of date:", colored!("Stale:", yellow), output.display());
	print_diff(&current, expected);
	eprintln!();
	eprintln!("Run without `--check` to regenerate it.");
	process::exit(1);
}

fn run_rbac(args: &YamlitCli, command: &RbacCommands) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let rbac = command.args();

	let mut options = RbacOptions::from(&config.rbac);
	options.formatter = config.generate.formatter;
	if !rbac.verbs.is_empty() {
		options.verbs.clone_from(&rbac.verbs);
	}
	if let Some(role_name) = &rbac.role_name {
		options.role_name.clone_from(role_name);
	}
	if rbac.use_resource_names {
		options.use_resource_names = true;
	}

	let manifests = expand_manifests(&root, &rbac.manifests)?;

	let output = match command {
		RbacCommands::Markers(_) => yamlit_rbac::generate_markers(&manifests, &options)?,
		RbacCommands::Yaml(_) => yamlit_rbac::generate_yaml(&manifests, &options)?,
		RbacCommands::Go { variable_name, .. } => {
			if let Some(variable_name) = variable_name {
				options.variable_name.clone_from(variable_name);
			}

			yamlit_rbac::generate_code(&manifests, &options)?
		}
	};

	print!("{output}");

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
