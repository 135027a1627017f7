//! Case conversions used for derived go identifiers and template helpers.

/// Split text into lowercase words on separators and case boundaries.
///
/// `"my-app"`, `"my_app"`, `"MyApp"` and `"myApp"` all produce
/// `["my", "app"]`. Acronyms stay together: `"HTTPServer"` produces
/// `["http", "server"]`.
pub fn words(text: &str) -> Vec<String> {
	let chars: Vec<char> = text.chars().collect();
	let mut words = vec![];
	let mut current = String::new();

	for (index, ch) in chars.iter().copied().enumerate() {
		if !ch.is_alphanumeric() {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}

			continue;
		}

		let previous = index.checked_sub(1).map(|index| chars[index]);
		let next = chars.get(index + 1).copied();
		let boundary = ch.is_uppercase()
			&& previous.is_some_and(|previous| {
				previous.is_lowercase()
					|| previous.is_ascii_digit()
					|| (previous.is_uppercase() && next.is_some_and(char::is_lowercase))
			});

		if boundary && !current.is_empty() {
			words.push(std::mem::take(&mut current));
		}

		current.extend(ch.to_lowercase());
	}

	if !current.is_empty() {
		words.push(current);
	}

	words
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// `my-app` becomes `MyApp`.
pub fn camel_case(text: &str) -> String {
	words(text).iter().map(|word| capitalize(word)).collect()
}

/// `my-app` becomes `myApp`.
pub fn lower_camel_case(text: &str) -> String {
	words(text)
		.iter()
		.enumerate()
		.map(|(index, word)| if index == 0 { word.clone() } else { capitalize(word) })
		.collect()
}

/// `MyApp` becomes `my_app`.
pub fn snake_case(text: &str) -> String {
	words(text).join("_")
}

/// `MyApp` becomes `my-app`.
pub fn kebab_case(text: &str) -> String {
	words(text).join("-")
}
