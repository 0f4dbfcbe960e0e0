use regex::Regex;
use serde_json::Value;

/// Escape LaTeX special characters in text destined for a template.
///
/// Sequences that are already escaped (e.g. `\&` in the YAML source) are
/// preserved as-is via placeholder substitution.
pub fn escape_latex(value: &str) -> String {
	const SAFE_AMP: &str = "\u{0}AMP\u{0}";
	const SAFE_HASH: &str = "\u{0}HASH\u{0}";
	const SAFE_DOLLAR: &str = "\u{0}DOLLAR\u{0}";
	const SAFE_PERCENT: &str = "\u{0}PERCENT\u{0}";
	const SAFE_UNDERSCORE: &str = "\u{0}US\u{0}";

	let mut text = value.to_string();

	text = text.replace("\\&", SAFE_AMP);
	text = text.replace("\\#", SAFE_HASH);
	text = text.replace("\\$", SAFE_DOLLAR);
	text = text.replace("\\%", SAFE_PERCENT);
	text = text.replace("\\_", SAFE_UNDERSCORE);

	text = text.replace('&', "\\&");
	text = text.replace('#', "\\#");
	text = text.replace('$', "\\$");
	text = text.replace('%', "\\%");
	text = text.replace('_', "\\_");

	text = text.replace(SAFE_AMP, "\\&");
	text = text.replace(SAFE_HASH, "\\#");
	text = text.replace(SAFE_DOLLAR, "\\$");
	text = text.replace(SAFE_PERCENT, "\\%");
	text = text.replace(SAFE_UNDERSCORE, "\\_");

	text
}

/// Recursively escape every string in a JSON tree. Applied to the resume
/// data before it reaches a LaTeX template, so templates never have to
/// escape anything themselves.
pub fn escape_tree(value: Value) -> Value {
	match value {
		Value::String(s) => Value::String(escape_latex(&s)),
		Value::Array(items) => Value::Array(items.into_iter().map(escape_tree).collect()),
		Value::Object(map) => Value::Object(
			map.into_iter()
				.map(|(key, val)| (key, escape_tree(val)))
				.collect(),
		),
		other => other,
	}
}

/// Strip the LaTeX subset allowed in resume text, converting to Markdown
/// where an equivalent exists. Used for the web/JSON pipeline:
/// `\href{url}{text}` -> `[text](url)`, `\textbf` -> `**text**`,
/// `\emph`/`\textit` -> `*text*`, `\small` is dropped.
pub fn clean_latex(text: &str) -> String {
	let mut text = text.replace("\\&", "&").replace("\\newline", " ");

	let href_regex = Regex::new(r"\\href\{([^}]*)\}\{([^}]*)\}").unwrap();
	loop {
		let replaced = href_regex.replace_all(&text, "[$2]($1)").to_string();
		if replaced == text {
			break;
		}
		text = replaced;
	}

	for (command, delim) in [("textbf", "**"), ("emph", "*"), ("textit", "*"), ("small", "")] {
		let pattern = Regex::new(&format!(r"\\{}\{{([^}}]*)\}}", command)).unwrap();
		loop {
			let replaced = pattern
				.replace_all(&text, format!("{delim}$1{delim}"))
				.to_string();
			if replaced == text {
				break;
			}
			text = replaced;
		}
	}

	text.trim().to_string()
}
