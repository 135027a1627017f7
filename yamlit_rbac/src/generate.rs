use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Serialize;
use yamlit_core::FormatterKind;
use yamlit_core::GenerateOptions;
use yamlit_core::Generator;
use yamlit_core::Manifests;
use yamlit_core::RbacConfig;
use yamlit_core::config::DEFAULT_RBAC_VARIABLE_NAME;
use yamlit_core::config::DEFAULT_ROLE_NAME;
use yamlit_core::decode;
use yamlit_core::extract_documents;

use crate::ResourceIdentity;
use crate::Rule;
use crate::RuleKey;
use crate::error::RbacError;
use crate::error::RbacResult;
use crate::rules_for_resource;

/// Verbs a controller may be granted on the resources it manages.
pub const DEFAULT_VERBS: [&str; 7] = ["get", "list", "watch", "create", "update", "patch", "delete"];

const RBAC_API_VERSION: &str = "rbac.authorization.k8s.io/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacOptions {
	/// Name given to every generated role.
	pub role_name: String,
	/// Variable name for generated go code. Suffixed with an index when more
	/// than one role is generated.
	pub variable_name: String,
	/// Verbs granted on every rule. Empty means [`DEFAULT_VERBS`].
	pub verbs: Vec<String>,
	/// Restrict rules to the names of the manifests' objects.
	pub use_resource_names: bool,
	pub formatter: FormatterKind,
}

impl Default for RbacOptions {
	fn default() -> Self {
		Self {
			role_name: DEFAULT_ROLE_NAME.to_string(),
			variable_name: DEFAULT_RBAC_VARIABLE_NAME.to_string(),
			verbs: vec![],
			use_resource_names: false,
			formatter: FormatterKind::default(),
		}
	}
}

impl From<&RbacConfig> for RbacOptions {
	fn from(config: &RbacConfig) -> Self {
		Self {
			role_name: config.role_name.clone(),
			variable_name: config.variable_name.clone(),
			verbs: config.verbs.clone(),
			use_resource_names: config.use_resource_names,
			formatter: FormatterKind::default(),
		}
	}
}

impl RbacOptions {
	/// The verbs to grant, validated against [`DEFAULT_VERBS`].
	pub fn verbs(&self) -> RbacResult<Vec<String>> {
		if self.verbs.is_empty() {
			return Ok(DEFAULT_VERBS.iter().map(ToString::to_string).collect());
		}

		if let Some(invalid) = self.verbs.iter().find(|verb| !DEFAULT_VERBS.contains(&verb.as_str())) {
			return Err(RbacError::InvalidVerb(invalid.clone()));
		}

		Ok(self.verbs.clone())
	}
}

/// The rules derived from one manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRules {
	pub identity: ResourceIdentity,
	pub rules: Vec<Rule>,
}

/// Derive the rules for every document of every manifest, with the
/// configured verbs and resource names applied.
pub fn derive_rules(manifests: &Manifests, options: &RbacOptions) -> RbacResult<Vec<DocumentRules>> {
	let verbs = options.verbs()?;
	let mut derived = vec![];

	for document in manifests.documents() {
		let root = decode(&document.content)?;
		let Some(identity) = ResourceIdentity::from_element(&root) else {
			return Err(RbacError::MissingKind {
				path: document.source.display().to_string(),
				index: document.index,
			});
		};

		let rules = rules_for_resource(&root, &identity)
			.into_iter()
			.map(|rule| {
				let rule = rule.with_verbs(&verbs);

				if options.use_resource_names && !rule.is_url_rule() {
					rule.with_resource_name(identity.name.clone())
				} else {
					rule
				}
			})
			.collect();

		tracing::debug!(kind = %identity.kind, name = %identity.name, "derived rbac rules");
		derived.push(DocumentRules { identity, rules });
	}

	Ok(derived)
}

/// One kubebuilder rbac marker per derived rule, in manifest order.
/// Repeated markers are only written once.
pub fn generate_markers(manifests: &Manifests, options: &RbacOptions) -> RbacResult<String> {
	let mut seen = HashSet::new();
	let mut markers = String::new();

	for document in derive_rules(manifests, options)? {
		for rule in document.rules {
			let marker = rule.to_marker();

			if seen.insert(marker.clone()) {
				markers.push_str(&marker);
				markers.push('\n');
			}
		}
	}

	Ok(markers)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleDocument {
	api_version: &'static str,
	kind: &'static str,
	metadata: RoleMetadata,
	rules: Vec<PolicyRule>,
}

#[derive(Debug, Serialize)]
struct RoleMetadata {
	name: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	namespace: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicyRule {
	#[serde(skip_serializing_if = "Vec::is_empty")]
	api_groups: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	resources: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	resource_names: Vec<String>,
	#[serde(rename = "nonResourceURLs", skip_serializing_if = "Vec::is_empty")]
	non_resource_urls: Vec<String>,
	verbs: Vec<String>,
}

impl From<Rule> for PolicyRule {
	fn from(rule: Rule) -> Self {
		Self {
			api_groups: rule.groups,
			resources: rule.resources,
			resource_names: rule.resource_names,
			non_resource_urls: rule.urls,
			verbs: rule.verbs,
		}
	}
}

/// Merge rules with the same key and sort them by key.
fn merge_rules(rules: Vec<Rule>) -> Vec<Rule> {
	let mut merged: BTreeMap<RuleKey, Rule> = BTreeMap::new();

	for mut rule in rules {
		rule.normalize();

		match merged.get_mut(&rule.key()) {
			Some(existing) => existing.add_verbs(&rule.verbs),
			None => {
				merged.insert(rule.key(), rule);
			}
		}
	}

	merged.into_values().collect()
}

/// A `ClusterRole` for cluster scoped objects and a `Role` per namespace,
/// ordered by namespace and joined with `---` separators.
pub fn generate_yaml(manifests: &Manifests, options: &RbacOptions) -> RbacResult<String> {
	let mut by_namespace: BTreeMap<String, Vec<Rule>> = BTreeMap::new();

	for document in derive_rules(manifests, options)? {
		by_namespace
			.entry(document.identity.namespace)
			.or_default()
			.extend(document.rules);
	}

	let mut roles = vec![];

	for (namespace, rules) in by_namespace {
		let rules = merge_rules(rules);

		if rules.is_empty() {
			continue;
		}

		let kind = if namespace.is_empty() { "ClusterRole" } else { "Role" };
		let role = RoleDocument {
			api_version: RBAC_API_VERSION,
			kind,
			metadata: RoleMetadata {
				name: options.role_name.clone(),
				namespace,
			},
			rules: rules.into_iter().map(PolicyRule::from).collect(),
		};

		let yaml = serde_yaml_ng::to_string(&role).map_err(|e| {
			RbacError::Encode {
				role: options.role_name.clone(),
				reason: e.to_string(),
			}
		})?;
		roles.push(yaml);
	}

	Ok(roles.join("---\n"))
}

/// The roles from [`generate_yaml`] as go declarations.
pub fn generate_code(manifests: &Manifests, options: &RbacOptions) -> RbacResult<String> {
	let yaml = generate_yaml(manifests, options)?;
	let documents = extract_documents(&yaml);
	let generator = Generator::new(GenerateOptions {
		variable_name: options.variable_name.clone(),
		formatter: options.formatter,
		..GenerateOptions::default()
	});

	let mut declarations = vec![];

	for (index, document) in documents.iter().enumerate() {
		let variable_name = if documents.len() > 1 {
			format!("{}{index}", options.variable_name)
		} else {
			options.variable_name.clone()
		};

		declarations.push(generator.generate_named(document, &variable_name, &[])?);
	}

	Ok(declarations.join("\n"))
}
