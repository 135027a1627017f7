mod common;

use rstest::rstest;
use similar_asserts::assert_eq;
use yamlit_core::AnyEmptyResult;

fn write_manifests(root: &std::path::Path) -> std::io::Result<()> {
	std::fs::write(root.join("settings.yaml"), common::CONFIG_MAP)?;
	std::fs::write(root.join("deploy.yaml"), common::DEPLOYMENT)
}

#[rstest]
#[case::markers("markers")]
#[case::alias("kubebuilder-markers")]
fn rbac_prints_markers(#[case] command: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_manifests(tmp.path())?;

	let output = common::yamlit_cmd()
		.args(["rbac", command])
		.arg("--path")
		.arg(tmp.path())
		.args(["-m", "*.yaml", "--verbs", "get", "--verbs", "list"])
		.output()?;

	assert!(output.status.success());
	assert_eq!(
		String::from_utf8(output.stdout)?,
		"// +kubebuilder:rbac:groups=apps,resources=deployments,verbs=get;list\n// \
		 +kubebuilder:rbac:groups=core,resources=configmaps,verbs=get;list\n"
	);

	Ok(())
}

#[test]
fn rbac_prints_roles_per_namespace() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_manifests(tmp.path())?;
	std::fs::write(tmp.path().join("yamlit.toml"), "[rbac]\nrole_name = \"operator\"\n")?;

	common::yamlit_cmd()
		.args(["rbac", "yaml"])
		.arg("--path")
		.arg(tmp.path())
		.args(["-m", "settings.yaml", "-m", "deploy.yaml"])
		.assert()
		.success()
		.stdout(predicates::str::starts_with("apiVersion: rbac.authorization.k8s.io/v1\nkind: ClusterRole\n"))
		.stdout(predicates::str::contains("\n---\napiVersion: rbac.authorization.k8s.io/v1\nkind: Role\n"))
		.stdout(predicates::str::contains("name: operator"))
		.stdout(predicates::str::contains("namespace: team"));

	Ok(())
}

#[test]
fn rbac_prints_roles_as_go() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_manifests(tmp.path())?;

	common::yamlit_cmd()
		.args(["rbac", "go"])
		.arg("--path")
		.arg(tmp.path())
		.args(["-m", "*.yaml", "--variable-name", "role", "--role-name", "web-manager"])
		.assert()
		.success()
		.stdout(predicates::str::starts_with("var role0 = &unstructured.Unstructured{"))
		.stdout(predicates::str::contains("var role1 = &unstructured.Unstructured{"))
		.stdout(predicates::str::contains("\"name\": \"web-manager\","));

	Ok(())
}

#[test]
fn rbac_rejects_invalid_verbs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_manifests(tmp.path())?;

	common::yamlit_cmd()
		.args(["rbac", "markers"])
		.arg("--path")
		.arg(tmp.path())
		.args(["-m", "*.yaml", "--verbs", "destroy"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("verb is invalid"));

	Ok(())
}
