use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn yamlit_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("yamlit"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

pub const DEPLOYMENT: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: team
spec:
  replicas: !!tpl \"{{ replicas }}\"
";

pub const CONFIG_MAP: &str = "# cluster wide settings
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  mode: fast # tuned
";
