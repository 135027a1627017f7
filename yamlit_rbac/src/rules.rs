use std::collections::BTreeSet;

use yamlit_core::Element;

/// The group name used in kubebuilder markers for the core api group.
pub const CORE_GROUP: &str = "core";

/// Kinds whose plural does not follow the regular english rules.
const IRREGULAR_PLURALS: [(&str, &str); 2] = [("endpoints", "endpoints"), ("resourcequota", "resourcequotas")];

/// Kinds whose manifests grant permissions through a `rules` list.
const ROLE_KINDS: [&str; 2] = ["Role", "ClusterRole"];

/// A permission over resources or non-resource urls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
	pub groups: Vec<String>,
	pub resources: Vec<String>,
	pub resource_names: Vec<String>,
	pub urls: Vec<String>,
	pub verbs: Vec<String>,
}

/// The resources and urls a [`Rule`] applies to. Rules with equal keys are
/// merged by combining their verbs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleKey {
	groups: String,
	resources: String,
	resource_names: String,
	urls: String,
}

impl Rule {
	pub fn for_resource(group: impl Into<String>, resource: impl Into<String>) -> Self {
		Self {
			groups: vec![group.into()],
			resources: vec![resource.into()],
			..Self::default()
		}
	}

	pub fn for_url(url: impl Into<String>) -> Self {
		Self {
			urls: vec![url.into()],
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_verbs(mut self, verbs: &[String]) -> Self {
		self.verbs = verbs.to_vec();
		self
	}

	#[must_use]
	pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
		self.resource_names = vec![name.into()];
		self
	}

	pub fn is_url_rule(&self) -> bool {
		!self.urls.is_empty()
	}

	/// Remove duplicates from every field and sort it.
	pub fn normalize(&mut self) {
		for field in [
			&mut self.groups,
			&mut self.resources,
			&mut self.resource_names,
			&mut self.urls,
			&mut self.verbs,
		] {
			dedup_sorted(field);
		}
	}

	pub fn key(&self) -> RuleKey {
		RuleKey {
			groups: self.groups.join("&"),
			resources: self.resources.join("&"),
			resource_names: self.resource_names.join("&"),
			urls: self.urls.join("&"),
		}
	}

	pub fn add_verbs(&mut self, verbs: &[String]) {
		self.verbs.extend_from_slice(verbs);
		dedup_sorted(&mut self.verbs);
	}

	/// Render the rule as a kubebuilder rbac marker, e.g.
	/// `// +kubebuilder:rbac:groups=apps,resources=deployments,verbs=get;list`.
	pub fn to_marker(&self) -> String {
		let mut fields = vec![];

		if self.is_url_rule() {
			fields.push(format!("urls={}", self.urls.join(";")));
		} else {
			let groups: Vec<&str> = self
				.groups
				.iter()
				.map(|group| if group.is_empty() { CORE_GROUP } else { group.as_str() })
				.collect();
			fields.push(format!("groups={}", groups.join(";")));
			fields.push(format!("resources={}", self.resources.join(";")));

			if !self.resource_names.is_empty() {
				fields.push(format!("resourceNames={}", self.resource_names.join(";")));
			}
		}

		fields.push(format!("verbs={}", self.verbs.join(";")));

		format!("// +kubebuilder:rbac:{}", fields.join(","))
	}
}

fn dedup_sorted(values: &mut Vec<String>) {
	let unique: BTreeSet<String> = values.drain(..).collect();
	values.extend(unique);
}

/// The identity of a kubernetes object read from its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
	/// The api group, empty for the core group.
	pub group: String,
	pub version: String,
	pub kind: String,
	pub name: String,
	pub namespace: String,
}

impl ResourceIdentity {
	/// Read the identity from a decoded manifest. Returns `None` when the
	/// manifest has no `kind`.
	pub fn from_element(root: &Element) -> Option<Self> {
		let kind = text(root, "kind").filter(|kind| !kind.is_empty())?;
		let api_version = text(root, "apiVersion").unwrap_or_default();
		let (group, version) = api_version.split_once('/').unwrap_or(("", api_version));
		let metadata = root.get("metadata");
		let metadata_text = |key: &str| {
			metadata
				.and_then(|metadata| text(metadata, key))
				.unwrap_or_default()
				.to_string()
		};

		Some(Self {
			group: group.to_string(),
			version: version.to_string(),
			kind: kind.to_string(),
			name: metadata_text("name"),
			namespace: metadata_text("namespace"),
		})
	}

	/// The plural resource name used in rbac rules.
	pub fn resource(&self) -> String {
		plural(&self.kind)
	}
}

fn text<'a>(element: &'a Element, key: &str) -> Option<&'a str> {
	element.get(key).and_then(Element::value)
}

fn strings(element: Option<&Element>) -> Vec<String> {
	element
		.map(|element| {
			element
				.children()
				.iter()
				.filter_map(Element::value)
				.map(ToString::to_string)
				.collect()
		})
		.unwrap_or_default()
}

/// The rules a controller needs to manage the object described by `root`.
///
/// Every object needs a rule for itself. Roles and cluster roles also need
/// every permission they grant, since rbac only lets a controller grant
/// permissions it holds.
pub fn rules_for_resource(root: &Element, identity: &ResourceIdentity) -> Vec<Rule> {
	let mut rules = vec![Rule::for_resource(identity.group.clone(), identity.resource())];

	if !ROLE_KINDS.contains(&identity.kind.as_str()) {
		return rules;
	}

	let Some(granted) = root.get("rules") else {
		return rules;
	};

	for rule in granted.children() {
		let groups = strings(rule.get("apiGroups"));
		let resources = strings(rule.get("resources"));

		for group in &groups {
			for resource in &resources {
				rules.push(Rule::for_resource(group.clone(), granted_resource(resource)));
			}
		}

		rules.extend(strings(rule.get("nonResourceURLs")).into_iter().map(Rule::for_url));
	}

	rules
}

/// Resources inside role rules are already plural. Wildcards pass through
/// and subresources such as `deployments/status` are kept.
fn granted_resource(resource: &str) -> String {
	match resource.split_once('/') {
		Some((base, subresource)) => format!("{}/{subresource}", granted_resource(base)),
		None if resource == "*" => resource.to_string(),
		None => resource.to_lowercase(),
	}
}

/// The lowercase plural of a kind, e.g. `NetworkPolicy` becomes
/// `networkpolicies`.
pub fn plural(kind: &str) -> String {
	let lower = kind.to_lowercase();

	if let Some((_, irregular)) = IRREGULAR_PLURALS.iter().find(|(singular, _)| *singular == lower) {
		return (*irregular).to_string();
	}

	if lower.ends_with(['s', 'x', 'z']) || lower.ends_with("ch") || lower.ends_with("sh") {
		return format!("{lower}es");
	}

	if let Some(stem) = lower.strip_suffix('y') {
		if stem.ends_with(|ch: char| !matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')) {
			return format!("{stem}ies");
		}
	}

	format!("{lower}s")
}
