use std::path::PathBuf;

use rstest::rstest;
use similar_asserts::assert_eq;

use super::*;
use crate::builder::CodeBuilder;
use crate::builder::CodeFragment;
use crate::comments::scan_comments;
use crate::escape::Segment;
use crate::escape::escape;
use crate::escape::quote;
use crate::escape::split_splices;
use crate::naming;

fn wrap(entries: &[&str]) -> String {
	let mut code = String::from("var obj = &unstructured.Unstructured{\n\tObject: map[string]interface{}{\n");

	for entry in entries {
		code.push_str("\t\t");
		code.push_str(entry);
		code.push('\n');
	}

	code.push_str("\t},\n}\n");
	code
}

fn values(json: &str) -> serde_json::Value {
	serde_json::from_str(json).unwrap_or_else(|e| panic!("invalid json: {e}"))
}

// --- Decoder ---

#[test]
fn decode_preserves_key_order() -> YamlitResult<()> {
	let root = decode("zeta: 1\nalpha: 2\nmid: 3\n")?;
	let keys: Vec<&str> = root.children().iter().map(|child| child.key.as_str()).collect();

	assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
	assert_eq!(root.element_type(), ElementType::Mapping);

	Ok(())
}

#[rstest]
#[case::tilde("a: ~", ElementKind::Null)]
#[case::empty("a:", ElementKind::Null)]
#[case::null_word("a: NULL", ElementKind::Null)]
#[case::bool_lower("a: true", ElementKind::Bool("true".into()))]
#[case::bool_title("a: False", ElementKind::Bool("False".into()))]
#[case::int("a: 42", ElementKind::Int("42".into()))]
#[case::negative_int("a: -7", ElementKind::Int("-7".into()))]
#[case::hex("a: 0x1F", ElementKind::Int("0x1F".into()))]
#[case::octal("a: 0o17", ElementKind::Int("0o17".into()))]
#[case::float("a: 1.5", ElementKind::Float("1.5".into()))]
#[case::exponent("a: 1e3", ElementKind::Float("1e3".into()))]
#[case::infinity("a: -.inf", ElementKind::Float("-.inf".into()))]
#[case::not_a_number("a: .nan", ElementKind::Float(".nan".into()))]
#[case::yaml11_bool("a: yes", ElementKind::Str("yes".into()))]
#[case::underscored("a: 1_000", ElementKind::Str("1_000".into()))]
#[case::quoted_int("a: '123'", ElementKind::Str("123".into()))]
#[case::double_quoted_bool("a: \"true\"", ElementKind::Str("true".into()))]
#[case::tagged_str("a: !!str 123", ElementKind::Str("123".into()))]
#[case::tagged_float("a: !!float 1", ElementKind::Float("1".into()))]
#[case::non_specific("a: ! 12", ElementKind::Str("12".into()))]
#[case::template("a: !!tpl \"{{ x }}\"", ElementKind::Template("{{ x }}".into()))]
#[case::variable("a: !!var someVar", ElementKind::Var("someVar".into()))]
#[case::leading_zero("a: 010", ElementKind::Int("010".into()))]
#[case::verbose_tag("a: !<tag:yaml.org,2002:int> 5", ElementKind::Int("5".into()))]
fn decode_classifies_scalars(#[case] source: &str, #[case] expected: ElementKind) -> YamlitResult<()> {
	let root = decode(source)?;
	let value = root.get("a").map(|element| element.kind.clone());

	assert_eq!(value, Some(expected));

	Ok(())
}

#[rstest]
#[case::unclosed_flow("a: [1, 2")]
#[case::unknown_tag("a: !!custom x")]
#[case::local_tag("a: !thing x")]
#[case::invalid_int("a: !!int abc")]
#[case::invalid_bool("a: !!bool maybe")]
#[case::template_mapping("a: !!tpl\n  b: 1\n")]
#[case::duplicate_key("a: 1\na: 2\n")]
#[case::mapping_key("? [a, b]\n: 1\n")]
fn decode_rejects_malformed_documents(#[case] source: &str) {
	let result = decode(source);

	assert!(
		matches!(result, Err(YamlitError::MalformedDocument { .. })),
		"expected malformed document for {source:?}, got {result:?}"
	);
}

#[rstest]
#[case::empty("")]
#[case::comment_only("# nothing here\n")]
#[case::sequence("- a\n- b\n")]
#[case::scalar("just text\n")]
#[case::explicit_empty("---\n")]
fn decode_requires_top_level_mapping(#[case] source: &str) {
	assert!(matches!(decode(source), Err(YamlitError::EmptyDocument)));
}

#[test]
fn decode_rejects_multiple_documents() {
	let result = decode("a: 1\n---\nb: 2\n");

	assert!(matches!(result, Err(YamlitError::MultipleDocuments(2))));
}

#[test]
fn malformed_document_reports_location() {
	let Err(YamlitError::MalformedDocument { line, .. }) = decode("a: 1\nb: 2\nb: 3\n") else {
		panic!("expected a malformed document");
	};

	assert_eq!(line, 3);
}

#[test]
fn decode_marks_sequence_members() -> YamlitResult<()> {
	let root = decode("list:\n  - one\n  - two\n")?;
	let list = root.get("list").unwrap_or_else(|| panic!("missing list"));

	assert_eq!(list.element_type(), ElementType::Sequence);
	assert!(list.children().iter().all(|child| child.is_sequence_member && child.key.is_empty()));
	assert_eq!(list.children()[1].value(), Some("two"));

	Ok(())
}

#[test]
fn aliases_are_independent_copies() -> YamlitResult<()> {
	let mut root = decode("base: &base\n  name: a\n  tags: [x]\ncopy: *base\n")?;

	let base = root.get("base").cloned();
	let copy = root.get("copy").cloned();
	assert_eq!(base.as_ref().map(Element::children), copy.as_ref().map(Element::children));

	let children = root.children_mut().unwrap_or_else(|| panic!("root is a mapping"));
	let copy = children
		.iter_mut()
		.find(|child| child.key == "copy")
		.unwrap_or_else(|| panic!("missing copy"));
	copy.children_mut()
		.unwrap_or_else(|| panic!("copy is a mapping"))
		.push(Element::new("extra", ElementKind::Int("1".into())));

	assert_eq!(root.get("base").map(|base| base.children().len()), Some(2));
	assert_eq!(root.get("copy").map(|copy| copy.children().len()), Some(3));

	Ok(())
}

#[test]
fn alias_copies_take_comments_from_the_alias_site() -> YamlitResult<()> {
	let root = decode("base: &base\n  name: a\ncopy: *base # copied\n")?;

	assert_eq!(root.get("base").and_then(|base| base.comments.inline.clone()), None);
	assert_eq!(
		root.get("copy").and_then(|copy| copy.comments.inline.clone()),
		Some("// copied".to_string())
	);

	Ok(())
}

#[test]
fn merge_keys_splice_entries() -> YamlitResult<()> {
	let root = decode("defaults: &defaults\n  a: 1\n  b: 2\nitem:\n  <<: *defaults\n  b: 3\n  c: 4\n")?;
	let item = root.get("item").unwrap_or_else(|| panic!("missing item"));
	let entries: Vec<(&str, Option<&str>)> = item
		.children()
		.iter()
		.map(|child| (child.key.as_str(), child.value()))
		.collect();

	assert_eq!(entries, vec![("a", Some("1")), ("b", Some("3")), ("c", Some("4"))]);

	Ok(())
}

#[test]
fn merge_key_comments_lead_the_first_spliced_entry() -> YamlitResult<()> {
	let root = decode("base: &base\n  a: 1\nitem:\n  <<: *base # shared defaults\n  b: 2\n")?;
	let item = root.get("item").unwrap_or_else(|| panic!("missing item"));

	assert_eq!(
		item.get("a").map(|a| a.comments.leading.clone()),
		Some(vec!["// shared defaults".to_string()])
	);
	assert!(item.get("b").is_some_and(|b| b.comments.is_empty()));

	Ok(())
}

#[test]
fn decode_attaches_comments() -> YamlitResult<()> {
	let source = "# about kind\nkind: Pod # inline\nmetadata:\n  name: web\n  # after name\n";
	let root = decode(source)?;

	let kind = root.get("kind").unwrap_or_else(|| panic!("missing kind"));
	assert_eq!(kind.comments.leading, vec!["// about kind".to_string()]);
	assert_eq!(kind.comments.inline.as_deref(), Some("// inline"));

	let name = root
		.get("metadata")
		.and_then(|metadata| metadata.get("name"))
		.unwrap_or_else(|| panic!("missing name"));
	assert_eq!(name.comments.trailing, vec!["// after name".to_string()]);

	Ok(())
}

#[test]
fn separated_comment_blocks_trail_the_previous_entry() -> YamlitResult<()> {
	let root = decode("a: 1\n# end of a\n\nb: 2\n")?;

	assert_eq!(
		root.get("a").map(|a| a.comments.trailing.clone()),
		Some(vec!["// end of a".to_string()])
	);
	assert!(root.get("b").is_some_and(|b| b.comments.is_empty()));

	Ok(())
}

#[test]
fn deeper_comments_before_a_shallower_entry_trail_the_nested_entry() -> YamlitResult<()> {
	let root = decode("a:\n  x: 1\n  # about x\nb: 2\n")?;
	let x = root.get("a").and_then(|a| a.get("x")).unwrap_or_else(|| panic!("missing x"));

	assert_eq!(x.comments.trailing, vec!["// about x".to_string()]);
	assert!(root.get("b").is_some_and(|b| b.comments.is_empty()));

	Ok(())
}

#[test]
fn comments_on_sequence_members_with_mappings() -> YamlitResult<()> {
	let root = decode("containers:\n  # the web server\n  - name: web # the name\n    image: nginx\n")?;
	let member = root
		.get("containers")
		.and_then(|containers| containers.children().first())
		.unwrap_or_else(|| panic!("missing member"));

	assert_eq!(member.comments.leading, vec!["// the web server".to_string()]);
	assert_eq!(member.comments.inline, None);
	assert_eq!(
		member.get("name").and_then(|name| name.comments.inline.clone()),
		Some("// the name".to_string())
	);

	Ok(())
}

#[rstest]
#[case::hash_in_double_quotes("a: \"x # y\"\n", 0)]
#[case::hash_in_single_quotes("a: 'x # y'\n", 0)]
#[case::hash_in_plain_scalar("a: x#y\n", 0)]
#[case::url("a: http://host/#anchor\n", 0)]
#[case::block_scalar("a: |\n  # not a comment\n  text\nb: 1 # real\n", 1)]
#[case::folded_in_sequence("- key: >\n    # folded text\n  other: 1\n# real\n", 1)]
#[case::multiline_double_quotes("a: \"first\n  # still text\"\n", 0)]
#[case::comment_after_block_header("a: | # header\n  text\n", 1)]
fn comment_scanner_skips_scalar_content(#[case] source: &str, #[case] expected: usize) {
	assert_eq!(scan_comments(source).len(), expected);
}

// --- Escaper ---

#[rstest]
#[case::plain("plain", "\"plain\"")]
#[case::empty("", "\"\"")]
#[case::quotes("say \"hi\"", "\"say \\\"hi\\\"\"")]
#[case::newline("a\nb", "`a\nb`")]
#[case::backslash("C:\\path", "`C:\\path`")]
#[case::backtick_with_newline("a`b\nc", "`a` + \"`\" + `b\nc`")]
#[case::backtick_alone("a`b", "\"a`b\"")]
#[case::tab("tab\there", "\"tab\\there\"")]
#[case::carriage_return("a\r\nb", "\"a\\r\\nb\"")]
#[case::control("bell\u{7}", "\"bell\\x07\"")]
#[case::unicode("héllo", "\"héllo\"")]
fn escape_strings(#[case] raw: &str, #[case] expected: &str) {
	assert_eq!(escape(raw), expected);
}

/// Evaluate a concatenation of go string literals back to its text.
fn evaluate_go_string(expression: &str) -> String {
	let mut text = String::new();
	let mut chars = expression.chars();

	while let Some(ch) = chars.next() {
		match ch {
			'`' => text.extend(chars.by_ref().take_while(|ch| *ch != '`')),
			'"' => {
				loop {
					match chars.next() {
						Some('"') | None => break,
						Some('\\') => {
							let escaped = match chars.next() {
								Some('n') => '\n',
								Some('r') => '\r',
								Some('t') => '\t',
								Some(ch @ ('"' | '\\')) => ch,
								Some(width @ ('x' | 'u')) => {
									let digits: String = chars.by_ref().take(if width == 'x' { 2 } else { 4 }).collect();
									u32::from_str_radix(&digits, 16)
										.ok()
										.and_then(char::from_u32)
										.unwrap_or_else(|| panic!("invalid escape `{digits}` in {expression}"))
								}
								other => panic!("unexpected escape {other:?} in {expression}"),
							};

							text.push(escaped);
						}
						Some(ch) => text.push(ch),
					}
				}
			}
			' ' | '+' => {}
			other => panic!("unexpected `{other}` in {expression}"),
		}
	}

	text
}

#[rstest]
fn escaped_text_evaluates_to_the_original(
	#[values("\"", "\\", "\n", "`", "x")] first: &str,
	#[values("\"", "\\", "\n", "`", "x")] second: &str,
	#[values("\"", "\\", "\n", "`", "\r")] third: &str,
) -> YamlitResult<()> {
	let raw = format!("{first}{second}{third}");
	let literal = escape(&raw);

	assert_eq!(evaluate_go_string(&literal), raw, "literal: {literal}");
	validate_go(&format!("var x = {literal}\n"))?;

	Ok(())
}

#[rstest]
#[case::middle("prefix-!!start name !!end-suffix", "\"prefix-\" + name + \"-suffix\"")]
#[case::whole("!!start name !!end", "name")]
#[case::several("!!start a !!end/!!start b !!end", "a + \"/\" + b")]
#[case::unterminated("x!!start y", "\"x!!start y\"")]
#[case::stray_end("x!!end", "\"x!!end\"")]
#[case::bang("wow!", "\"wow!\"")]
fn escape_splices(#[case] raw: &str, #[case] expected: &str) {
	assert_eq!(escape(raw), expected);
}

#[test]
fn split_splices_segments() {
	let segments = split_splices("a!!start b !!end");

	insta::assert_debug_snapshot!(segments, @r#"
	[
	    Literal(
	        "a",
	    ),
	    Expression(
	        "b",
	    ),
	]
	"#);
	assert_eq!(segments[1], Segment::Expression("b".into()));
}

#[test]
fn keys_are_quoted_without_splicing() {
	assert_eq!(quote("!!start x !!end"), "\"!!start x !!end\"");
}

// --- Emitter ---

#[test]
fn generate_nested_document() -> YamlitResult<()> {
	let source = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: test\ndata:\n  enabled: true\n  count: \
	              3\n  ratio: 0.5\n  empty: null\n";
	let code = generate(source, "obj", &[])?;

	let expected = wrap(&[
		"\"apiVersion\": \"v1\",",
		"\"kind\": \"ConfigMap\",",
		"\"metadata\": map[string]interface{}{",
		"\t\"name\": \"test\",",
		"},",
		"\"data\": map[string]interface{}{",
		"\t\"enabled\": true,",
		"\t\"count\": 3,",
		"\t\"ratio\": 0.5,",
		"\t\"empty\": nil,",
		"},",
	]);
	assert_eq!(code, expected);

	Ok(())
}

#[test]
fn generate_sequence_in_order() -> YamlitResult<()> {
	let code = generate("list: [1, 2, 3]\n", "obj", &[])?;

	assert_eq!(code, wrap(&["\"list\": []interface{}{", "\t1,", "\t2,", "\t3,", "},"]));

	Ok(())
}

#[test]
fn generate_multiline_string() -> YamlitResult<()> {
	let code = generate("name: \"a\\nb\"\n", "obj", &[])?;

	assert_eq!(code, wrap(&["\"name\": `a\nb`,"]));

	Ok(())
}

#[test]
fn generate_block_scalar_keeps_content_unindented() -> YamlitResult<()> {
	let code = generate("script: |\n  # not a comment\n  echo hi\n", "obj", &[])?;

	assert_eq!(code, wrap(&["\"script\": `# not a comment\necho hi\n`,"]));

	Ok(())
}

#[test]
fn generate_empty_containers() -> YamlitResult<()> {
	let code = generate("labels: {}\nitems: []\n", "obj", &[])?;

	assert_eq!(
		code,
		wrap(&["\"labels\": map[string]interface{}{},", "\"items\": []interface{}{},"])
	);

	Ok(())
}

#[test]
fn generate_sequence_of_mappings() -> YamlitResult<()> {
	let code = generate("containers:\n  - name: web\n    image: nginx\n", "obj", &[])?;

	assert_eq!(
		code,
		wrap(&[
			"\"containers\": []interface{}{",
			"\tmap[string]interface{}{",
			"\t\t\"name\": \"web\",",
			"\t\t\"image\": \"nginx\",",
			"\t},",
			"},",
		])
	);

	Ok(())
}

#[test]
fn generate_with_comments() -> YamlitResult<()> {
	let source = "# about kind\nkind: Pod # inline\nitems: # the items\n  # first\n  - a # note\n  - b\n";
	let code = generate(source, "obj", &[])?;

	insta::assert_snapshot!(code, @r#"
	var obj = &unstructured.Unstructured{
		Object: map[string]interface{}{
			// about kind
			"kind": "Pod", // inline
			"items": []interface{}{ // the items
				// first
				"a", // note
				"b",
			},
		},
	}
	"#);

	Ok(())
}

#[rstest]
#[case::single_key("m:\n  - a: 1 # x\n", &["\t\t\"a\": 1, // x"])]
#[case::first_of_several_keys(
	"m:\n  - name: web # the name\n    image: nginx\n",
	&["\t\t\"name\": \"web\", // the name", "\t\t\"image\": \"nginx\","]
)]
#[case::later_key("m:\n  - a: 1\n    b: 2 # y\n", &["\t\t\"a\": 1,", "\t\t\"b\": 2, // y"])]
fn inline_comments_follow_member_keys(#[case] source: &str, #[case] entries: &[&str]) -> YamlitResult<()> {
	let mut lines = vec!["\"m\": []interface{}{", "\tmap[string]interface{}{"];
	lines.extend(entries);
	lines.extend(["\t},", "},"]);

	assert_eq!(generate(source, "obj", &[])?, wrap(&lines));

	Ok(())
}

#[test]
fn generate_decimal_ints_without_leading_zeros() -> YamlitResult<()> {
	let code = generate("a: 08\nb: 010\nc: -007\nd: !!float 09\n", "obj", &[])?;

	assert_eq!(
		code,
		wrap(&["\"a\": 8,", "\"b\": 10,", "\"c\": -7,", "\"d\": float64(9),"])
	);

	Ok(())
}

#[test]
fn generate_variables_verbatim_without_values() -> YamlitResult<()> {
	let code = generate("replicas: !!var replicaCount\nimage: !!var images.Web\n", "obj", &[])?;

	assert_eq!(code, wrap(&["\"replicas\": replicaCount,", "\"image\": images.Web,"]));

	Ok(())
}

#[rstest]
#[case::null(ElementKind::Null, "nil")]
#[case::bool_title(ElementKind::Bool("True".into()), "true")]
#[case::int(ElementKind::Int("0x1F".into()), "0x1F")]
#[case::float(ElementKind::Float("1.5".into()), "1.5")]
#[case::integral_float(ElementKind::Float("1".into()), "float64(1)")]
#[case::leading_zeros(ElementKind::Int("010".into()), "10")]
#[case::signed_leading_zeros(ElementKind::Int("-007".into()), "-7")]
#[case::zero(ElementKind::Int("000".into()), "0")]
#[case::integral_float_leading_zero(ElementKind::Float("08".into()), "float64(8)")]
#[case::infinity(ElementKind::Float(".inf".into()), "math.Inf(1)")]
#[case::negative_infinity(ElementKind::Float("-.Inf".into()), "math.Inf(-1)")]
#[case::nan(ElementKind::Float(".NaN".into()), "math.NaN()")]
#[case::template(ElementKind::Template(" replicas ".into()), "replicas")]
#[case::variable(ElementKind::Var("replicaCount".into()), "replicaCount")]
fn scalar_expressions(#[case] kind: ElementKind, #[case] expected: &str) {
	assert_eq!(scalar_expression(&kind), Ok(expected.to_string()));
}

#[test]
fn empty_template_expression_is_a_render_error() -> YamlitResult<()> {
	let mut root = decode("spec:\n  replicas: !!tpl \"{{ replicas }}\"\n")?;
	Interpolator::new(&FunctionRegistry::default())
		.strict_undefined(false)
		.interpolate(&mut root, &[values("{}")])?;

	let result = Declaration::new("obj", &root);

	let Err(YamlitError::Render { path, source }) = result else {
		panic!("expected a render error, got {result:?}");
	};
	assert_eq!(path, "spec.replicas");
	assert_eq!(source, EmitError::EmptyExpression);

	Ok(())
}

#[test]
fn code_builder_indents_blocks_with_tabs() {
	let mut builder = CodeBuilder::go();
	builder.apply_fragment(CodeFragment::block(
		"a{",
		vec![CodeFragment::block("b{", vec![CodeFragment::line("c")], "}")],
		"}",
	));
	builder.push_blank();
	builder.push_line("d");

	assert_eq!(builder.build(), "a{\n\tb{\n\t\tc\n\t}\n}\n\nd\n");
}

// --- Interpolator ---

#[test]
fn interpolate_template_values() -> YamlitResult<()> {
	let source = "spec:\n  replicas: !!tpl \"{{ replicas }}\"\n  image: !!tpl \"{{ image | quote }}\"\n  name: \
	              \"{{ untouched }}\"\n";
	let code = generate(source, "obj", &[values(r#"{"replicas": 3, "image": "nginx"}"#)])?;

	assert_eq!(
		code,
		wrap(&[
			"\"spec\": map[string]interface{}{",
			"\t\"replicas\": 3,",
			"\t\"image\": \"nginx\",",
			"\t\"name\": \"{{ untouched }}\",",
			"},",
		])
	);

	Ok(())
}

#[test]
fn interpolate_keys_and_comments_of_templates() -> YamlitResult<()> {
	let source = "# {{ team }} owns this\n\"{{ prefix }}-name\": !!tpl \"{{ name | escape }}\" # set by {{ team }}\n";
	let code = generate(source, "obj", &[values(r#"{"team": "infra", "prefix": "app", "name": "web"}"#)])?;

	assert_eq!(
		code,
		wrap(&["// infra owns this", "\"app-name\": \"web\", // set by infra"])
	);

	Ok(())
}

#[test]
fn templates_without_values_fail() {
	let result = generate("spec:\n  replicas: !!tpl \"{{ replicas }}\"\n", "obj", &[]);

	let Err(YamlitError::MissingValues { key }) = result else {
		panic!("expected missing values, got {result:?}");
	};
	assert_eq!(key, "spec.replicas");
}

#[test]
fn documents_without_templates_need_no_values() -> YamlitResult<()> {
	generate("a: 1\n", "obj", &[])?;

	Ok(())
}

#[test]
fn more_than_one_value_set_fails() {
	let result = generate("a: 1\n", "obj", &[values("{}"), values("{}")]);

	assert!(matches!(result, Err(YamlitError::TooManyValueSets(2))));
}

#[test]
fn undefined_values_fail_when_strict() {
	let result = generate("a: !!tpl \"{{ missing.field }}\"\n", "obj", &[values("{}")]);

	let Err(YamlitError::Interpolation { key, .. }) = result else {
		panic!("expected an interpolation error, got {result:?}");
	};
	assert_eq!(key, "a");
}

#[test]
fn invalid_template_syntax_fails() {
	let result = generate("a: !!tpl \"{{ broken \"\n", "obj", &[values("{}")]);

	assert!(matches!(result, Err(YamlitError::Interpolation { .. })));
}

#[test]
fn custom_functions_are_scoped_to_the_registry() -> YamlitResult<()> {
	let mut registry = FunctionRegistry::empty();
	registry.register("shout", |value| value.to_uppercase());

	let mut root = decode("a: !!tpl \"{{ name | shout }}-{{ shout('x') }}\"\n")?;
	Interpolator::new(&registry).interpolate(&mut root, &[values(r#"{"name": "web"}"#)])?;

	assert_eq!(root.get("a").and_then(Element::value), Some("WEB-X"));
	assert_eq!(FunctionRegistry::default().call("shout", "x"), None);

	Ok(())
}

#[test]
#[tracing_test::traced_test]
fn interpolation_is_logged() {
	let code = generate("a: !!tpl \"{{ 1 + 1 }}\"\n", "obj", &[values("{}")]);

	assert!(code.is_ok_and(|code| code.contains("\"a\": 2,")));
	assert!(logs_contain("interpolating template value"));
}

#[rstest]
#[case::camel("camel", "my-app", "MyApp")]
#[case::lower_camel("lower_camel", "my_app", "myApp")]
#[case::snake("snake", "MyApp", "my_app")]
#[case::kebab("kebab", "HTTPServer", "http-server")]
#[case::quote("quote", "a\nb", "\"a\\nb\"")]
#[case::escape("escape", "a\nb", "`a\nb`")]
fn default_registry_functions(#[case] name: &str, #[case] input: &str, #[case] expected: &str) {
	assert_eq!(FunctionRegistry::default().call(name, input).as_deref(), Some(expected));
}

// --- Formatter ---

#[rstest]
#[case::balanced("var x = map[string]interface{}{\n\t\"a\": []interface{}{},\n}\n")]
#[case::brace_in_string("var x = \"{\"\n")]
#[case::brace_in_raw_string("var x = `{\n}}`\n")]
#[case::brace_in_comment("var x = 1 // {\n")]
#[case::rune("var x = '}'\n")]
#[case::octal("var x = 0755\n")]
#[case::exponent("var x = 1e+08\n")]
#[case::leading_zero_float("var x = 09.5\n")]
#[case::identifier_digits("var v08 = 1\n")]
fn builtin_formatter_accepts_valid_source(#[case] source: &str) -> YamlitResult<()> {
	assert_eq!(BuiltinFormatter.format(source)?, source);

	Ok(())
}

#[rstest]
#[case::unclosed("var x = map[string]interface{}{\n")]
#[case::mismatched("var x = (}\n")]
#[case::unterminated_string("var x = \"abc\n")]
#[case::unterminated_raw("var x = `abc\n")]
#[case::invalid_octal_digit("var x = 08\n")]
#[case::invalid_octal_in_call("var x = float64(019)\n")]
fn builtin_formatter_rejects_invalid_source(#[case] source: &str) {
	assert!(matches!(BuiltinFormatter.format(source), Err(YamlitError::Format(_))));
}

#[test]
fn missing_gofmt_is_a_format_error() {
	let formatter = GofmtFormatter {
		program: "yamlit-formatter-that-does-not-exist".to_string(),
	};

	assert!(matches!(formatter.format("var x = 1\n"), Err(YamlitError::Format(_))));
}

// --- Naming ---

#[rstest]
#[case("my-app", vec!["my", "app"])]
#[case("my_app", vec!["my", "app"])]
#[case("MyApp", vec!["my", "app"])]
#[case("myApp", vec!["my", "app"])]
#[case("HTTPServer", vec!["http", "server"])]
#[case("web-v2", vec!["web", "v2"])]
fn naming_splits_words(#[case] input: &str, #[case] expected: Vec<&str>) {
	assert_eq!(naming::words(input), expected);
}

// --- Manifests ---

#[test]
fn extract_documents_splits_on_separators() {
	let documents = extract_documents("a: 1\n---\nb: 2\n--- \n\n---\n# only a comment\n");

	assert_eq!(documents, vec!["a: 1\n".to_string(), "b: 2\n".to_string()]);
}

#[test]
fn expand_manifests_from_globs_and_directories() -> YamlitResult<()> {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path();
	std::fs::create_dir_all(root.join("config/rbac"))?;
	std::fs::write(root.join("a.yaml"), "a: 1\n")?;
	std::fs::write(root.join("notes.txt"), "ignored\n")?;
	std::fs::write(root.join("config/b.yml"), "b: 1\n")?;
	std::fs::write(root.join("config/rbac/c.yaml"), "c: 1\n")?;

	let top_level = expand_manifests(root, &["*.yaml".to_string()])?;
	let names: Vec<PathBuf> = top_level.iter().map(|m| m.relative_filename.clone()).collect();
	assert_eq!(names, vec![PathBuf::from("a.yaml")]);

	let nested = expand_manifests(root, &["config".to_string(), "a.yaml".to_string()])?;
	let names: Vec<PathBuf> = nested.iter().map(|m| m.relative_filename.clone()).collect();
	assert_eq!(
		names,
		vec![
			PathBuf::from("a.yaml"),
			PathBuf::from("config/b.yml"),
			PathBuf::from("config/rbac/c.yaml"),
		]
	);

	Ok(())
}

#[test]
fn expand_manifests_requires_matches() -> YamlitResult<()> {
	let tmp = tempfile::tempdir()?;
	let result = expand_manifests(tmp.path(), &["*.yaml".to_string()]);

	assert!(matches!(result, Err(YamlitError::ManifestPattern { .. })));

	Ok(())
}

#[test]
fn generate_manifests_derives_unique_names() -> YamlitResult<()> {
	let manifests = Manifests::new(vec![Manifest::new(
		PathBuf::from("all.yaml"),
		PathBuf::from("all.yaml"),
		"kind: Deployment\nmetadata:\n  name: web-app\n---\nkind: Deployment\nmetadata:\n  name: \
		 web-app\n---\nitems: []\n",
	)]);
	let code = Generator::default().generate_manifests(&manifests, &[])?;

	assert!(code.contains("var deploymentWebApp = "));
	assert!(code.contains("var deploymentWebApp2 = "));
	assert!(code.contains("var object2 = "));
	assert!(code.contains("}\n\nvar deploymentWebApp2"));

	Ok(())
}

// --- Values & config ---

#[rstest]
#[case::json("json", r#"{"replicas": 2, "tags": ["a"]}"#)]
#[case::yaml("yaml", "replicas: 2\ntags: [a]\n")]
#[case::toml("toml", "replicas = 2\ntags = [\"a\"]\n")]
fn parse_values_formats(#[case] format: &str, #[case] content: &str) -> YamlitResult<()> {
	let parsed = parse_values(content, format, "values")?;

	assert_eq!(parsed, values(r#"{"replicas": 2, "tags": ["a"]}"#));

	Ok(())
}

#[test]
fn parse_values_rejects_unknown_formats() {
	let result = parse_values("", "ini", "values.ini");

	assert!(matches!(result, Err(YamlitError::UnsupportedValuesFormat(format)) if format == "ini"));
}

#[test]
fn load_config_defaults_and_overrides() -> YamlitResult<()> {
	let tmp = tempfile::tempdir()?;
	assert_eq!(YamlitConfig::load(tmp.path())?, None);

	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/yamlit.toml"),
		"[generate]\nvariable_name = \"manifest\"\nformatter = \"gofmt\"\n",
	)?;

	let config = YamlitConfig::load(tmp.path())?.unwrap_or_default();
	assert_eq!(config.generate.variable_name, "manifest");
	assert_eq!(config.generate.formatter, FormatterKind::Gofmt);
	assert!(config.generate.strict_undefined);
	assert_eq!(config.rbac, RbacConfig::default());

	Ok(())
}

#[test]
fn invalid_config_is_reported() -> YamlitResult<()> {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("yamlit.toml"), "[generate\n")?;

	assert!(matches!(YamlitConfig::load(tmp.path()), Err(YamlitError::ConfigParse(_))));

	Ok(())
}
