use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::bundle;
use crate::config::Config;
use crate::jsonresume::JsonResume;
use crate::render;
use crate::resume::{PageVariant, ResumeData};

/// Build the web resumes: one themed page per configured language, a
/// language router at the web root, and the portable single-file bundle.
///
/// Returns the languages that were actually built. A language whose YAML
/// file is missing is skipped with a warning; a failed render is fatal.
pub fn build_web(
	config: &Config,
	output_dir: &Path,
	theme_override: Option<&str>,
) -> Result<Vec<String>> {
	let web_dir = output_dir.join("Web");
	fs::create_dir_all(&web_dir)
		.with_context(|| format!("Failed to create {}", web_dir.display()))?;

	let theme = theme_override
		.map(str::to_string)
		.or_else(|| config.theme.default_theme.clone())
		.unwrap_or_else(|| "classic".to_string());

	let profile_image = &config.assets.profile_image;
	if profile_image.exists() {
		fs::copy(profile_image, web_dir.join("profile.jpg"))
			.with_context(|| format!("Failed to copy {}", profile_image.display()))?;
	}

	println!(
		"\n--- Building Web Resumes ({} languages) ---",
		config.site.languages.len()
	);

	let mut built_langs = Vec::new();
	let mut display_name = None;
	let mut slug_name = None;

	for lang in &config.site.languages {
		let data = match ResumeData::load(&config.build.config_dir, lang) {
			Ok(data) => data,
			Err(e) => {
				eprintln!("  ! Skipping web resume for '{}': {:#}", lang, e);
				continue;
			}
		};

		display_name.get_or_insert_with(|| data.display_name());
		slug_name.get_or_insert_with(|| data.slug_name());

		// The web view shows full detail, so it uses 2-page visibility
		let mut detailed = data.clone();
		detailed.filter_for_variant(PageVariant::TwoPage);
		let resume = JsonResume::from_resume(&detailed, lang, &theme);

		let lang_dir = web_dir.join(lang);
		fs::create_dir_all(&lang_dir)
			.with_context(|| format!("Failed to create {}", lang_dir.display()))?;

		if profile_image.exists() {
			fs::copy(profile_image, lang_dir.join("profile.jpg"))
				.with_context(|| format!("Failed to copy {}", profile_image.display()))?;
		}

		let json_path = lang_dir.join("resume.json");
		fs::write(&json_path, serde_json::to_string_pretty(&resume)?)
			.with_context(|| format!("Failed to write {}", json_path.display()))?;

		let html_path = lang_dir.join("index.html");
		println!("  > Rendering Web/{}/index.html with theme '{}'...", lang, theme);
		render::render_resume(&theme, &json_path, &html_path)?;

		bundle::inject_language_switcher(&html_path, lang, &config.site.languages)?;
		built_langs.push(lang.clone());
		println!("    Success: Web/{}/index.html", lang);
	}

	if !built_langs.is_empty() {
		bundle::write_router(&web_dir, &built_langs)?;
		println!("  > Generated root router");

		let bundled = bundle::bundle_portable(
			&web_dir,
			&built_langs,
			display_name.as_deref().unwrap_or("Resume"),
			profile_image,
			config.assets.icon_font_dir.as_deref(),
		)?;

		if let Some(bundle_path) = bundled {
			println!("  > Generated single-file bundle: Web/resume.html");
			// Promote to the deployment root for easy sharing
			let promoted = output_dir.join(format!(
				"{}_resume.html",
				slug_name.as_deref().unwrap_or("resume")
			));
			fs::copy(&bundle_path, &promoted)
				.with_context(|| format!("Failed to copy to {}", promoted.display()))?;
			println!("  > Deployed standalone HTML: {}", promoted.display());
		}
	}

	Ok(built_langs)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn project(langs: &[&str]) -> (tempfile::TempDir, Config) {
		let dir = tempfile::tempdir().unwrap();
		let config_dir = dir.path().join("config");
		fs::create_dir_all(&config_dir).unwrap();

		for lang in langs {
			fs::write(
				config_dir.join(format!("resume_{}.yaml", lang)),
				r#"
basics: {name: Jane Doe, label: Engineer}
experience:
  - {company: Acme, title: Engineer, start: "2023-05", highlights: [Did things]}
"#,
			)
			.unwrap();
		}

		let mut config = Config::default();
		config.site.languages = langs.iter().map(|l| l.to_string()).collect();
		config.build.config_dir = config_dir;
		config.assets.profile_image = PathBuf::from("/nonexistent/profile.jpg");
		config.assets.icon_font_dir = None;
		(dir, config)
	}

	#[test]
	fn test_builds_pages_router_and_bundle() {
		let (dir, config) = project(&["en", "de"]);
		let output_dir = dir.path().join("dist");

		let built = build_web(&config, &output_dir, None).unwrap();
		assert_eq!(built, vec!["en", "de"]);

		let web_dir = output_dir.join("Web");
		assert!(web_dir.join("en/index.html").exists());
		assert!(web_dir.join("en/resume.json").exists());
		assert!(web_dir.join("de/index.html").exists());
		assert!(web_dir.join("index.html").exists());
		assert!(web_dir.join("resume.html").exists());
		assert!(output_dir.join("jane_doe_resume.html").exists());

		// The per-language page carries the switcher to its sibling
		let en_html = fs::read_to_string(web_dir.join("en/index.html")).unwrap();
		assert!(en_html.contains("href=\"../de/\""));
	}

	#[test]
	fn test_missing_language_is_skipped() {
		let (dir, mut config) = project(&["en"]);
		config.site.languages = vec!["en".to_string(), "fr".to_string()];
		let output_dir = dir.path().join("dist");

		let built = build_web(&config, &output_dir, None).unwrap();
		assert_eq!(built, vec!["en"]);
		assert!(!output_dir.join("Web/fr").exists());
	}

	#[test]
	fn test_theme_override_applies() {
		let (dir, config) = project(&["en"]);
		let output_dir = dir.path().join("dist");

		build_web(&config, &output_dir, Some("compact")).unwrap();
		let json = fs::read_to_string(output_dir.join("Web/en/resume.json")).unwrap();
		assert!(json.contains("\"theme\": \"compact\""));
	}

	#[test]
	fn test_unknown_theme_is_fatal() {
		let (dir, config) = project(&["en"]);
		let output_dir = dir.path().join("dist");

		let err = build_web(&config, &output_dir, Some("no-such-theme")).unwrap_err();
		assert!(err.to_string().contains("no-such-theme"));
	}
}
