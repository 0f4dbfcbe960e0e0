use anyhow::{Context, Result};
use minijinja::syntax::SyntaxConfig;
use minijinja::{path_loader, Environment};
use std::fs;
use std::path::{Path, PathBuf};

use crate::latex::escape_tree;
use crate::resume::{Basics, ResumeData};

/// Fills LaTeX templates with resume data.
///
/// Templates use `<< >>` for variables, `<% %>` for blocks and `<# #>` for
/// comments so they never collide with LaTeX's own braces. All string
/// values are LaTeX-escaped before the template sees them.
pub struct TemplateEngine {
	env: Environment<'static>,
}

impl TemplateEngine {
	pub fn new(templates_dir: &Path) -> Result<Self> {
		let mut env = Environment::new();
		env.set_loader(path_loader(templates_dir));
		env.set_syntax(
			SyntaxConfig::builder()
				.block_delimiters("<%", "%>")
				.variable_delimiters("<<", ">>")
				.comment_delimiters("<#", "#>")
				.build()
				.context("Invalid template syntax configuration")?,
		);
		// Keep whitespace tight; LaTeX is sensitive to stray blank lines
		env.set_trim_blocks(true);
		env.set_lstrip_blocks(true);

		Ok(Self { env })
	}

	pub fn render(&self, template_name: &str, data: &ResumeData) -> Result<String> {
		let template = self
			.env
			.get_template(template_name)
			.with_context(|| format!("Template not found: {}", template_name))?;

		let context = escape_tree(
			serde_json::to_value(data).context("Failed to serialize resume data")?,
		);

		let rendered = template
			.render(&context)
			.with_context(|| format!("Template rendering failed: {}", template_name))?;
		Ok(rendered)
	}
}

/// Regenerate `config/personal.tex` from the basics section. The style
/// file reads these `\newcommand` definitions to typeset the header.
pub fn write_personal_tex(config_dir: &Path, basics: &Basics) -> Result<PathBuf> {
	let photo_path = basics
		.photo
		.as_deref()
		.map(|p| format!("../{}", p))
		.unwrap_or_default();

	let lines = [
		"% Auto-generated from YAML data -- do not edit manually".to_string(),
		"% Run: vitae build to regenerate".to_string(),
		String::new(),
		format!("\\newcommand{{\\myName}}{{{}}}", basics.name),
		format!("\\newcommand{{\\myLocation}}{{{}}}", basics.location),
		format!("\\newcommand{{\\myPhone}}{{{}}}", basics.phone),
		format!("\\newcommand{{\\myEmail}}{{{}}}", basics.email),
		format!("\\newcommand{{\\myLinkedIn}}{{{}}}", basics.linkedin.display),
		format!("\\newcommand{{\\myLinkedInUrl}}{{{}}}", basics.linkedin.url),
		format!("\\newcommand{{\\myGithub}}{{{}}}", basics.github.display),
		format!("\\newcommand{{\\myGithubUrl}}{{{}}}", basics.github.url),
		String::new(),
		format!("\\newcommand{{\\myPhotoPath}}{{{}}}", photo_path),
		String::new(),
	];

	let path = config_dir.join("personal.tex");
	fs::write(&path, lines.join("\n"))
		.with_context(|| format!("Failed to write {}", path.display()))?;
	Ok(path)
}

/// Called by `ResumeData::load` users building PDFs; re-exported here so
/// the orchestrator has one place to resolve variant templates.
pub fn variant_template_name(stem: &str) -> String {
	format!("cv_{}.tex.j2", stem)
}
