use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ROUTER_TEMPLATE: &str = include_str!("../templates/web/router.html");
const BUNDLE_TEMPLATE: &str = include_str!("../templates/web/bundle.html");
const SWITCHER_TEMPLATE: &str = include_str!("../templates/web/switcher.html");

/// Extract the style and body content of a rendered resume page, stripped
/// of scripts and the injected language switcher, ready for embedding in
/// the portable bundle.
pub fn extract_html_content(html_path: &Path) -> Result<(String, String)> {
	let full_html = fs::read_to_string(html_path)
		.with_context(|| format!("Failed to read {}", html_path.display()))?;

	let style_regex = Regex::new(r"(?s)<style>(.*?)</style>").unwrap();
	let body_regex = Regex::new(r"(?s)<body[^>]*>(.*?)</body>").unwrap();

	let style = style_regex
		.captures(&full_html)
		.and_then(|c| c.get(1))
		.map(|m| m.as_str().to_string())
		.unwrap_or_default();
	let mut body = body_regex
		.captures(&full_html)
		.and_then(|c| c.get(1))
		.map(|m| m.as_str().to_string())
		.unwrap_or_default();

	let script_regex = Regex::new(r"(?s)<script.*?>.*?</script>").unwrap();
	body = script_regex.replace_all(&body, "").to_string();
	let switcher_regex = Regex::new(r#"(?s)<div id="lang-switcher".*?</div>"#).unwrap();
	body = switcher_regex.replace_all(&body, "").to_string();

	Ok((style, body))
}

/// Replace profile image references with a base64 data URI so the bundle
/// has no external file dependencies. Returns the input unchanged when the
/// image is missing.
pub fn embed_base64_image(body_html: &str, image_path: &Path) -> String {
	let bytes = match fs::read(image_path) {
		Ok(bytes) => bytes,
		Err(_) => return body_html.to_string(),
	};
	let data_uri = format!("data:image/jpeg;base64,{}", BASE64.encode(bytes));
	body_html.replace("src=\"profile.jpg\"", &format!("src=\"{}\"", data_uri))
}

/// Build a self-contained icon-font CSS blob: the vendored stylesheet with
/// every woff2 reference replaced by a base64 data URI and ttf fallbacks
/// dropped. Empty string when the vendor directory is absent.
pub fn inline_icon_font_css(icon_dir: &Path) -> String {
	let css_path = icon_dir.join("all.min.css");
	let mut css = match fs::read_to_string(&css_path) {
		Ok(css) => css,
		Err(_) => return String::new(),
	};

	for entry in WalkDir::new(icon_dir.join("webfonts"))
		.into_iter()
		.filter_map(|e| e.ok())
	{
		let path = entry.path();
		if path.extension().and_then(|s| s.to_str()) != Some("woff2") {
			continue;
		}
		let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
			continue;
		};
		if let Ok(bytes) = fs::read(path) {
			let data_uri = format!("data:font/woff2;base64,{}", BASE64.encode(bytes));
			css = css.replace(&format!("../webfonts/{}", filename), &data_uri);
		}
	}

	// woff2 is sufficient for modern browsers
	let ttf_regex = Regex::new(r"url\(\.\./webfonts/[^)]+\.ttf\)[^,}]*,?").unwrap();
	ttf_regex.replace_all(&css, "").to_string()
}

fn escape_js_template(text: &str) -> String {
	text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

fn switch_label(target_lang: &str) -> String {
	match target_lang {
		"en" => "Switch to English 🇬🇧".to_string(),
		"de" => "Switch to German 🇩🇪".to_string(),
		other => format!("Switch to {}", other.to_uppercase()),
	}
}

/// Inject a floating language-switcher link into a rendered page. Plain
/// relative links between sibling language directories; no script.
pub fn inject_language_switcher(
	html_path: &Path,
	current_lang: &str,
	langs: &[String],
) -> Result<()> {
	let Some(target) = langs.iter().find(|l| l.as_str() != current_lang) else {
		return Ok(());
	};

	let content = fs::read_to_string(html_path)
		.with_context(|| format!("Failed to read {}", html_path.display()))?;
	if !content.contains("</body>") {
		return Ok(());
	}

	let switcher = SWITCHER_TEMPLATE
		.replace("{{TARGET}}", &format!("../{}/", target))
		.replace("{{LABEL}}", &switch_label(target));

	let new_content = content.replace("</body>", &format!("{}</body>", switcher));
	fs::write(html_path, new_content)
		.with_context(|| format!("Failed to write {}", html_path.display()))?;
	Ok(())
}

/// Write the root router page: redirects on the browser's declared
/// language, with plain links as fallback.
pub fn write_router(web_dir: &Path, langs: &[String]) -> Result<PathBuf> {
	let links: String = langs
		.iter()
		.map(|lang| {
			format!(
				"        <li><a href=\"./{0}/\">{1}</a></li>\n",
				lang,
				lang.to_uppercase()
			)
		})
		.collect();

	let default_lang = langs.first().map(String::as_str).unwrap_or("en");
	let html = ROUTER_TEMPLATE
		.replace("{{LANGS}}", &serde_json::to_string(langs)?)
		.replace("{{DEFAULT_LANG}}", default_lang)
		.replace("{{LINKS}}", &links);

	let router_path = web_dir.join("index.html");
	fs::write(&router_path, html)
		.with_context(|| format!("Failed to write {}", router_path.display()))?;
	Ok(router_path)
}

/// Bundle every built language into one self-contained page with
/// hash-based routing and all binary assets inlined. Assets are inlined
/// unconditionally, whatever their size. Returns None (with a warning)
/// when any language page is missing.
pub fn bundle_portable(
	web_dir: &Path,
	langs: &[String],
	display_name: &str,
	profile_image: &Path,
	icon_font_dir: Option<&Path>,
) -> Result<Option<PathBuf>> {
	let mut entries = Vec::new();
	for lang in langs {
		let page = web_dir.join(lang).join("index.html");
		if !page.exists() {
			eprintln!(
				"  ! Skipping portable bundle: {}/index.html missing",
				lang
			);
			return Ok(None);
		}
		let (style, body) = extract_html_content(&page)?;
		let body = embed_base64_image(&body, profile_image);
		entries.push((lang.clone(), style, body));
	}

	let mut content_map = String::from("{\n");
	for (lang, style, body) in &entries {
		content_map.push_str(&format!(
			"            \"{}\": {{ style: `{}`, body: `{}` }},\n",
			lang,
			escape_js_template(style),
			escape_js_template(body)
		));
	}
	content_map.push_str("        }");

	let icon_css = icon_font_dir.map(inline_icon_font_css).unwrap_or_default();
	let default_lang = langs.first().map(String::as_str).unwrap_or("en");

	let html = BUNDLE_TEMPLATE
		.replace("{{TITLE}}", &format!("{} CV", display_name))
		.replace("{{ICON_CSS}}", &icon_css)
		.replace("{{CONTENT_MAP}}", &content_map)
		.replace("{{LANGS}}", &serde_json::to_string(langs)?)
		.replace("{{DEFAULT_LANG}}", default_lang);

	let out_path = web_dir.join("resume.html");
	fs::write(&out_path, html)
		.with_context(|| format!("Failed to write {}", out_path.display()))?;
	Ok(Some(out_path))
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE_PAGE: &str = r#"<html><head><style>body { color: red; }</style></head>
<body class="x">
<h1>Jane</h1>
<img src="profile.jpg">
<script>alert(1)</script>
<div id="lang-switcher" style="z">switch</div>
</body></html>"#;

	#[test]
	fn test_extract_html_content_strips_scripts_and_switcher() {
		let dir = tempfile::tempdir().unwrap();
		let page = dir.path().join("index.html");
		fs::write(&page, SAMPLE_PAGE).unwrap();

		let (style, body) = extract_html_content(&page).unwrap();
		assert!(style.contains("color: red"));
		assert!(body.contains("<h1>Jane</h1>"));
		assert!(!body.contains("<script>"));
		assert!(!body.contains("lang-switcher"));
	}

	#[test]
	fn test_embed_base64_image() {
		let dir = tempfile::tempdir().unwrap();
		let image = dir.path().join("profile.jpg");
		fs::write(&image, [0xFFu8, 0xD8, 0xFF]).unwrap();

		let body = embed_base64_image("<img src=\"profile.jpg\">", &image);
		assert!(body.contains("data:image/jpeg;base64,"));
		assert!(!body.contains("src=\"profile.jpg\""));

		// Missing image leaves the reference untouched
		let untouched =
			embed_base64_image("<img src=\"profile.jpg\">", Path::new("/nonexistent.jpg"));
		assert!(untouched.contains("src=\"profile.jpg\""));
	}

	#[test]
	fn test_inline_icon_font_css() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(dir.path().join("webfonts")).unwrap();
		fs::write(
			dir.path().join("all.min.css"),
			"@font-face{src:url(../webfonts/fa-solid-900.woff2) format(\"woff2\"),url(../webfonts/fa-solid-900.ttf) format(\"truetype\");}",
		)
		.unwrap();
		fs::write(dir.path().join("webfonts/fa-solid-900.woff2"), [1u8, 2, 3]).unwrap();

		let css = inline_icon_font_css(dir.path());
		assert!(css.contains("data:font/woff2;base64,"));
		assert!(!css.contains(".ttf"));

		assert_eq!(inline_icon_font_css(Path::new("/nonexistent")), "");
	}

	#[test]
	fn test_router_lists_all_languages() {
		let dir = tempfile::tempdir().unwrap();
		let langs = vec!["en".to_string(), "de".to_string()];
		let path = write_router(dir.path(), &langs).unwrap();

		let html = fs::read_to_string(path).unwrap();
		assert!(html.contains("href=\"./en/\""));
		assert!(html.contains("href=\"./de/\""));
		assert!(html.contains("[\"en\",\"de\"]"));
	}

	#[test]
	fn test_switcher_injection() {
		let dir = tempfile::tempdir().unwrap();
		let page = dir.path().join("index.html");
		fs::write(&page, "<html><body><h1>Hi</h1></body></html>").unwrap();

		let langs = vec!["en".to_string(), "de".to_string()];
		inject_language_switcher(&page, "en", &langs).unwrap();

		let html = fs::read_to_string(&page).unwrap();
		assert!(html.contains("lang-switcher"));
		assert!(html.contains("href=\"../de/\""));
	}

	#[test]
	fn test_bundle_portable() {
		let dir = tempfile::tempdir().unwrap();
		let langs = vec!["en".to_string(), "de".to_string()];
		for lang in &langs {
			let lang_dir = dir.path().join(lang);
			fs::create_dir_all(&lang_dir).unwrap();
			fs::write(lang_dir.join("index.html"), SAMPLE_PAGE).unwrap();
		}

		let out = bundle_portable(dir.path(), &langs, "Jane Doe", Path::new("/missing.jpg"), None)
			.unwrap()
			.expect("bundle should be produced");
		let html = fs::read_to_string(out).unwrap();
		assert!(html.contains("Jane Doe CV"));
		assert!(html.contains("\"en\": { style:"));
		assert!(html.contains("\"de\": { style:"));
	}

	#[test]
	fn test_bundle_skipped_when_language_missing() {
		let dir = tempfile::tempdir().unwrap();
		let langs = vec!["en".to_string(), "de".to_string()];
		fs::create_dir_all(dir.path().join("en")).unwrap();
		fs::write(dir.path().join("en/index.html"), SAMPLE_PAGE).unwrap();

		let out = bundle_portable(dir.path(), &langs, "Jane", Path::new("/missing.jpg"), None)
			.unwrap();
		assert!(out.is_none());
		assert!(!dir.path().join("resume.html").exists());
	}
}
