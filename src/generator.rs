use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::resume::{PageVariant, ResumeData};
use crate::template::{variant_template_name, write_personal_tex, TemplateEngine};
use crate::typeset::Typesetter;
use crate::web;

/// Which output classes to produce. No class selected means build
/// everything; unselected targets are simply not invoked.
#[derive(Debug, Clone, Default)]
pub struct BuildTargets {
	pub one_page: bool,
	pub two_page: bool,
	pub web: bool,
	pub docx: bool,
	pub theme: Option<String>,
}

impl BuildTargets {
	fn build_all(&self) -> bool {
		!(self.one_page || self.two_page || self.web)
	}

	pub fn wants_one_page(&self) -> bool {
		self.build_all() || self.one_page
	}

	pub fn wants_two_page(&self) -> bool {
		self.build_all() || self.two_page
	}

	pub fn wants_web(&self) -> bool {
		self.build_all() || self.web
	}
}

/// One typeset build: a page variant in one language.
#[derive(Debug, Clone)]
pub struct Variant {
	pub variant: PageVariant,
	pub lang: String,
}

impl Variant {
	pub fn name(&self) -> String {
		format!("{}_{}", self.variant.dir_name(), self.lang.to_uppercase())
	}

	pub fn tex_filename(&self) -> String {
		format!("cv_{}_{}.tex", self.variant.stem(), self.lang)
	}

	/// Deployed artifact name. German artifacts are traditionally named
	/// "Lebenslauf"; everything else is a CV.
	pub fn artifact_name(&self, slug: &str, ext: &str) -> String {
		let kind = if self.lang == "de" { "lebenslauf" } else { "cv" };
		format!("_{}_{}.{}", slug, kind, ext)
	}
}

/// Compute the ordered variant list for a target selection, the
/// (page-length x language) build matrix.
pub fn variants_for(targets: &BuildTargets, languages: &[String]) -> Vec<Variant> {
	let mut variants = Vec::new();
	if targets.wants_one_page() {
		for lang in languages {
			variants.push(Variant {
				variant: PageVariant::OnePage,
				lang: lang.clone(),
			});
		}
	}
	if targets.wants_two_page() {
		for lang in languages {
			variants.push(Variant {
				variant: PageVariant::TwoPage,
				lang: lang.clone(),
			});
		}
	}
	variants
}

pub struct Generator {
	config: Config,
	output_dir: PathBuf,
}

impl Generator {
	pub fn new(config: Config, output_override: Option<PathBuf>) -> Self {
		let output_dir = output_override.unwrap_or_else(|| config.build.output_dir.clone());
		Self { config, output_dir }
	}

	pub fn output_dir(&self) -> &PathBuf {
		&self.output_dir
	}

	/// Run the selected builds. Each artifact is an independent, idempotent
	/// transformation; re-running regenerates everything.
	pub fn build(&self, targets: &BuildTargets) -> Result<()> {
		fs::create_dir_all(&self.output_dir)
			.with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

		let variants = variants_for(targets, &self.config.site.languages);
		if !variants.is_empty() {
			self.build_typeset_variants(&variants, targets.docx)?;
		}

		if targets.wants_web() {
			web::build_web(&self.config, &self.output_dir, targets.theme.as_deref())?;
		}

		Ok(())
	}

	fn build_typeset_variants(&self, variants: &[Variant], docx: bool) -> Result<()> {
		// Regenerate personal.tex once, from the first loadable language
		let canonical = self
			.config
			.site
			.languages
			.iter()
			.find_map(|lang| ResumeData::load(&self.config.build.config_dir, lang).ok());
		if let Some(data) = &canonical {
			write_personal_tex(&self.config.build.config_dir, &data.basics)?;
			println!("  > Generated personal.tex from YAML data");
		}

		let engine = TemplateEngine::new(&self.config.build.templates_dir)?;
		let typesetter = Typesetter::new(&self.config.build.build_dir)?;

		for variant in variants {
			println!("\n--- Building Variant: {} ---", variant.name());

			let mut data = match ResumeData::load(&self.config.build.config_dir, &variant.lang) {
				Ok(data) => data,
				Err(e) => {
					eprintln!("  ! Skipping {}: {:#}", variant.name(), e);
					continue;
				}
			};
			data.filter_for_variant(variant.variant);
			let slug = data.slug_name();

			let template_name = variant_template_name(variant.variant.stem());
			let rendered_tex = engine.render(&template_name, &data)?;

			let tex_filename = variant.tex_filename();
			let tex_path = typesetter.build_dir().join(&tex_filename);
			fs::write(&tex_path, rendered_tex)
				.with_context(|| format!("Failed to write {}", tex_path.display()))?;
			println!("  > Rendered template: {}", tex_path.display());

			let pdf_path = typesetter.compile_pdf(&tex_filename)?;

			let deploy_dir = self.output_dir.join(variant.variant.dir_name());
			fs::create_dir_all(&deploy_dir)
				.with_context(|| format!("Failed to create {}", deploy_dir.display()))?;
			let deploy_path = deploy_dir.join(variant.artifact_name(&slug, "pdf"));
			fs::copy(&pdf_path, &deploy_path)
				.with_context(|| format!("Failed to deploy {}", deploy_path.display()))?;
			println!(
				"  > Deployed: {}/{}",
				variant.variant.dir_name(),
				variant.artifact_name(&slug, "pdf")
			);

			if docx {
				println!("  > Generating DOCX for {}...", variant.name());
				let docx_path = typesetter.convert_docx(&tex_filename)?;
				let deploy_docx = deploy_dir.join(variant.artifact_name(&slug, "docx"));
				fs::copy(&docx_path, &deploy_docx)
					.with_context(|| format!("Failed to deploy {}", deploy_docx.display()))?;
				let _ = fs::remove_file(docx_path);
				println!(
					"  > Deployed: {}/{}",
					variant.variant.dir_name(),
					variant.artifact_name(&slug, "docx")
				);
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn langs() -> Vec<String> {
		vec!["en".to_string(), "de".to_string()]
	}

	#[test]
	fn test_no_flags_builds_everything() {
		let targets = BuildTargets::default();
		assert!(targets.wants_one_page());
		assert!(targets.wants_two_page());
		assert!(targets.wants_web());
		assert_eq!(variants_for(&targets, &langs()).len(), 4);
	}

	#[test]
	fn test_selective_targets() {
		let targets = BuildTargets {
			one_page: true,
			..Default::default()
		};
		assert!(!targets.wants_two_page());
		assert!(!targets.wants_web());
		let variants = variants_for(&targets, &langs());
		assert_eq!(variants.len(), 2);
		assert!(variants.iter().all(|v| v.variant == PageVariant::OnePage));

		let web_only = BuildTargets {
			web: true,
			..Default::default()
		};
		assert!(variants_for(&web_only, &langs()).is_empty());
		assert!(web_only.wants_web());
	}

	#[test]
	fn test_variant_naming() {
		let variant = Variant {
			variant: PageVariant::OnePage,
			lang: "en".to_string(),
		};
		assert_eq!(variant.name(), "1Page_EN");
		assert_eq!(variant.tex_filename(), "cv_1page_en.tex");
		assert_eq!(variant.artifact_name("jane_doe", "pdf"), "_jane_doe_cv.pdf");

		let german = Variant {
			variant: PageVariant::TwoPage,
			lang: "de".to_string(),
		};
		assert_eq!(
			german.artifact_name("jane_doe", "pdf"),
			"_jane_doe_lebenslauf.pdf"
		);
	}

	#[test]
	fn test_web_only_build_end_to_end() {
		let dir = tempfile::tempdir().unwrap();
		let config_dir = dir.path().join("config");
		fs::create_dir_all(&config_dir).unwrap();
		fs::write(
			config_dir.join("resume_en.yaml"),
			"basics: {name: Jane Doe}\n",
		)
		.unwrap();

		let mut config = Config::default();
		config.site.languages = vec!["en".to_string()];
		config.build.config_dir = config_dir;
		config.assets.profile_image = dir.path().join("missing.jpg");
		config.assets.icon_font_dir = None;

		let output_dir = dir.path().join("dist/latest");
		let generator = Generator::new(config, Some(output_dir.clone()));
		let targets = BuildTargets {
			web: true,
			..Default::default()
		};
		generator.build(&targets).unwrap();

		assert!(output_dir.join("Web/en/index.html").exists());
		assert!(output_dir.join("Web/index.html").exists());
	}
}
