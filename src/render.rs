use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::jsonresume::JsonResume;
use crate::theme;

/// Render a resume document through a theme to a destination file.
///
/// The operation is all-or-nothing: a missing input, an unresolvable theme
/// or an empty render result aborts before anything is written. On success
/// the theme's markup is written verbatim, creating parent directories as
/// needed and overwriting any existing file.
pub fn render_resume(theme_id: &str, input: &Path, output: &Path) -> Result<()> {
	if !input.exists() {
		bail!("Resume document not found: {}", input.display());
	}

	let raw = fs::read_to_string(input)
		.with_context(|| format!("Failed to read resume document: {}", input.display()))?;
	let resume: JsonResume = serde_json::from_str(&raw)
		.with_context(|| format!("Invalid resume document: {}", input.display()))?;

	let theme = theme::resolve(theme_id)?;
	let markup = theme.render(&resume)?;
	if markup.trim().is_empty() {
		bail!(
			"Theme '{}' returned an empty document; refusing to write {}",
			theme_id,
			output.display()
		);
	}

	if let Some(parent) = output.parent() {
		fs::create_dir_all(parent)
			.with_context(|| format!("Failed to create directory: {}", parent.display()))?;
	}
	fs::write(output, &markup)
		.with_context(|| format!("Failed to write {}", output.display()))?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::theme::Theme;

	fn write_sample_document(dir: &Path) -> std::path::PathBuf {
		let path = dir.join("resume.json");
		fs::write(
			&path,
			r#"{"basics": {"name": "Jane Doe", "label": "Engineer"}, "meta": {"language": "en"}}"#,
		)
		.unwrap();
		path
	}

	#[test]
	fn test_written_file_matches_theme_output() {
		let dir = tempfile::tempdir().unwrap();
		let input = write_sample_document(dir.path());
		let output = dir.path().join("index.html");

		render_resume("classic", &input, &output).unwrap();

		let resume: JsonResume =
			serde_json::from_str(&fs::read_to_string(&input).unwrap()).unwrap();
		let expected = theme::resolve("classic").unwrap().render(&resume).unwrap();
		assert_eq!(fs::read_to_string(&output).unwrap(), expected);
	}

	#[test]
	fn test_creates_missing_parent_directories() {
		let dir = tempfile::tempdir().unwrap();
		let input = write_sample_document(dir.path());
		let output = dir.path().join("deep/nested/path/index.html");

		render_resume("compact", &input, &output).unwrap();
		assert!(output.exists());
	}

	#[test]
	fn test_missing_input_fails_before_theme_resolution() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("absent.json");
		let output = dir.path().join("index.html");

		// The bogus theme id would also fail, so the message proves the
		// input check ran first.
		let err = render_resume("no-such-theme", &input, &output).unwrap_err();
		assert!(err.to_string().contains("absent.json"));
		assert!(!output.exists());
	}

	#[test]
	fn test_unknown_theme_writes_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let input = write_sample_document(dir.path());
		let output = dir.path().join("index.html");

		let err = render_resume("no-such-theme", &input, &output).unwrap_err();
		assert!(err.to_string().contains("no-such-theme"));
		assert!(!output.exists());
	}

	#[test]
	fn test_empty_render_result_writes_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let input = write_sample_document(dir.path());
		let output = dir.path().join("index.html");

		// A directory theme whose template renders to whitespace only
		let theme_dir = dir.path().join("empty-theme");
		fs::create_dir_all(&theme_dir).unwrap();
		fs::write(theme_dir.join("theme.html"), "   \n  ").unwrap();

		let err =
			render_resume(theme_dir.to_str().unwrap(), &input, &output).unwrap_err();
		assert!(err.to_string().contains("empty"));
		assert!(!output.exists());
	}

	#[test]
	fn test_overwrites_existing_file() {
		let dir = tempfile::tempdir().unwrap();
		let input = write_sample_document(dir.path());
		let output = dir.path().join("index.html");
		fs::write(&output, "stale").unwrap();

		render_resume("classic", &input, &output).unwrap();
		let content = fs::read_to_string(&output).unwrap();
		assert!(content.contains("Jane Doe"));

		// Sanity: built-in themes keep their contract
		let resume = JsonResume::default();
		assert!(!crate::theme::ClassicTheme.render(&resume).unwrap().is_empty());
	}
}
