use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::dates::{format_date, DateFormat, Locale};
use crate::jsonresume::JsonResume;

/// A pluggable rendering strategy: one capability, turn a resume document
/// into a markup string. Everything downstream of resolution depends only
/// on this trait.
pub trait Theme: std::fmt::Debug {
	fn name(&self) -> &str;
	fn render(&self, resume: &JsonResume) -> Result<String>;
}

const BUILTIN_THEMES: &[&str] = &["classic", "compact"];

/// Resolve a theme identifier. An existing directory is loaded as a
/// template theme (`theme.html` inside it); anything else is looked up in
/// the built-in registry. This is the only place dynamic selection occurs.
pub fn resolve(identifier: &str) -> Result<Box<dyn Theme>> {
	let path = Path::new(identifier);
	if path.is_dir() {
		return Ok(Box::new(TemplateTheme::load(path)?));
	}

	match identifier {
		"classic" => Ok(Box::new(ClassicTheme)),
		"compact" => Ok(Box::new(CompactTheme)),
		other => bail!(
			"Unknown theme '{}' (not a directory, and built-in themes are: {})",
			other,
			BUILTIN_THEMES.join(", ")
		),
	}
}

/// A theme loaded from a directory containing a `theme.html` minijinja
/// template, rendered with the full resume document as context.
#[derive(Debug)]
pub struct TemplateTheme {
	name: String,
	source: String,
}

impl TemplateTheme {
	pub fn load(dir: &Path) -> Result<Self> {
		let template_path = dir.join("theme.html");
		let source = fs::read_to_string(&template_path).with_context(|| {
			format!(
				"Theme directory '{}' has no readable theme.html",
				dir.display()
			)
		})?;
		Ok(Self {
			name: dir.display().to_string(),
			source,
		})
	}
}

impl Theme for TemplateTheme {
	fn name(&self) -> &str {
		&self.name
	}

	fn render(&self, resume: &JsonResume) -> Result<String> {
		let mut env = minijinja::Environment::new();
		env.add_template("theme", &self.source)
			.with_context(|| format!("Invalid theme template: {}", self.name))?;
		let html = env
			.get_template("theme")
			.with_context(|| format!("Invalid theme template: {}", self.name))?
			.render(minijinja::Value::from_serialize(resume))
			.with_context(|| format!("Theme '{}' failed to render", self.name))?;
		Ok(html)
	}
}

/// Default built-in theme: two-tone layout with a header band.
#[derive(Debug)]
pub struct ClassicTheme;

impl Theme for ClassicTheme {
	fn name(&self) -> &str {
		"classic"
	}

	fn render(&self, resume: &JsonResume) -> Result<String> {
		let base = include_str!("../templates/theme/classic.html");
		Ok(fill_base(base, resume))
	}
}

/// Minimal print-friendly built-in theme.
#[derive(Debug)]
pub struct CompactTheme;

impl Theme for CompactTheme {
	fn name(&self) -> &str {
		"compact"
	}

	fn render(&self, resume: &JsonResume) -> Result<String> {
		let base = include_str!("../templates/theme/compact.html");
		Ok(fill_base(base, resume))
	}
}

fn fill_base(base: &str, resume: &JsonResume) -> String {
	let locale = Locale::from_code(&resume.meta.language);
	base.replace("{{PAGE_TITLE}}", &html_escape(&resume.basics.name))
		.replace("{{NAME}}", &html_escape(&resume.basics.name))
		.replace("{{LABEL}}", &html_escape(&resume.basics.label))
		.replace("{{IMAGE}}", &html_escape(&resume.basics.image))
		.replace("{{SUMMARY}}", &markdown_to_html(&resume.basics.summary))
		.replace("{{CONTACT}}", &render_contact(resume))
		.replace("{{SECTIONS}}", &render_sections(resume, locale))
}

fn html_escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

fn markdown_to_html(markdown: &str) -> String {
	use pulldown_cmark::{html, Options, Parser};

	let mut options = Options::empty();
	options.insert(Options::ENABLE_STRIKETHROUGH);
	options.insert(Options::ENABLE_SMART_PUNCTUATION);

	let parser = Parser::new_ext(markdown, options);
	let mut html_output = String::new();
	html::push_html(&mut html_output, parser);
	html_output
}

/// Render a Markdown snippet inline, without the wrapping paragraph tag.
fn markdown_inline(markdown: &str) -> String {
	let html = markdown_to_html(markdown);
	let html = html.trim();
	html.strip_prefix("<p>")
		.and_then(|h| h.strip_suffix("</p>"))
		.unwrap_or(html)
		.to_string()
}

fn date_range(start: &str, end: &str, locale: Locale) -> String {
	format!(
		"{} – {}",
		format_date(Some(start), DateFormat::MonthYear, locale),
		format_date(Some(end), DateFormat::MonthYear, locale)
	)
}

fn render_contact(resume: &JsonResume) -> String {
	let basics = &resume.basics;
	let mut html = String::from("<ul class=\"contact\">\n");

	if !basics.email.is_empty() {
		let _ = writeln!(
			html,
			"<li><a href=\"mailto:{0}\">{0}</a></li>",
			html_escape(&basics.email)
		);
	}
	if !basics.phone.is_empty() {
		let _ = writeln!(html, "<li>{}</li>", html_escape(&basics.phone));
	}
	if !basics.location.city.is_empty() {
		let _ = writeln!(html, "<li>{}</li>", html_escape(&basics.location.city));
	}
	for profile in &basics.profiles {
		if !profile.url.is_empty() {
			let _ = writeln!(
				html,
				"<li><a href=\"{}\">{}</a></li>",
				profile.url,
				html_escape(&profile.network)
			);
		}
	}

	html.push_str("</ul>");
	html
}

fn section_header(title: &str) -> String {
	format!("<section class=\"section\">\n<h2>{}</h2>\n", title)
}

fn render_highlights(highlights: &[String]) -> String {
	if highlights.is_empty() {
		return String::new();
	}
	let mut html = String::from("<ul class=\"highlights\">\n");
	for highlight in highlights {
		let _ = writeln!(html, "<li>{}</li>", markdown_inline(highlight));
	}
	html.push_str("</ul>\n");
	html
}

fn render_sections(resume: &JsonResume, locale: Locale) -> String {
	let (work_title, education_title, projects_title, awards_title) = match locale {
		Locale::En => ("Experience", "Education", "Projects", "Certificates"),
		Locale::De => ("Berufserfahrung", "Ausbildung", "Projekte", "Zertifikate"),
	};
	let (volunteer_title, skills_title, languages_title) = match locale {
		Locale::En => ("Other Experience", "Skills", "Languages"),
		Locale::De => ("Weitere Erfahrung", "Kenntnisse", "Sprachen"),
	};

	let mut html = String::new();

	if !resume.work.is_empty() {
		html.push_str(&section_header(work_title));
		for job in &resume.work {
			let _ = writeln!(
				html,
				"<article class=\"entry\">\n<h3>{}</h3>\n<p class=\"org\"><a href=\"{}\">{}</a> <span class=\"dates\">{}</span></p>",
				html_escape(&job.position),
				job.url,
				html_escape(&job.name),
				date_range(&job.start_date, &job.end_date, locale)
			);
			if let Some(summary) = &job.summary {
				let _ = writeln!(html, "<p class=\"summary\">{}</p>", markdown_inline(summary));
			}
			html.push_str(&render_highlights(&job.highlights));
			html.push_str("</article>\n");
		}
		html.push_str("</section>\n");
	}

	if !resume.education.is_empty() {
		html.push_str(&section_header(education_title));
		for edu in &resume.education {
			let degree = if edu.study_type.is_empty() {
				edu.area.clone()
			} else {
				format!("{}: {}", edu.study_type, edu.area)
			};
			let _ = writeln!(
				html,
				"<article class=\"entry\">\n<h3>{}</h3>\n<p class=\"org\"><a href=\"{}\">{}</a> <span class=\"dates\">{}</span></p>",
				html_escape(&degree),
				edu.url,
				html_escape(&edu.institution),
				date_range(&edu.start_date, &edu.end_date, locale)
			);
			if !edu.courses.is_empty() {
				let mut pills = String::from("<ul class=\"pills\">\n");
				for course in &edu.courses {
					let _ = writeln!(pills, "<li>{}</li>", html_escape(course));
				}
				pills.push_str("</ul>\n");
				html.push_str(&pills);
			}
			html.push_str(&render_highlights(&edu.highlights));
			html.push_str("</article>\n");
		}
		html.push_str("</section>\n");
	}

	if !resume.projects.is_empty() {
		html.push_str(&section_header(projects_title));
		for project in &resume.projects {
			let _ = writeln!(
				html,
				"<article class=\"entry\">\n<h3><a href=\"{}\">{}</a> <span class=\"dates\">{}</span></h3>\n<p class=\"summary\">{}</p>",
				project.url,
				html_escape(&project.name),
				format_date(Some(&project.start_date), DateFormat::Year, locale),
				markdown_inline(&project.description)
			);
			html.push_str(&render_highlights(&project.highlights));
			html.push_str("</article>\n");
		}
		html.push_str("</section>\n");
	}

	if !resume.awards.is_empty() {
		html.push_str(&section_header(awards_title));
		html.push_str("<ul class=\"awards\">\n");
		for award in &resume.awards {
			let _ = writeln!(
				html,
				"<li><strong>{}</strong> — {} ({})</li>",
				html_escape(&award.title),
				html_escape(&award.awarder),
				format_date(Some(&award.date), DateFormat::Year, locale)
			);
		}
		html.push_str("</ul>\n</section>\n");
	}

	if !resume.volunteer.is_empty() {
		html.push_str(&section_header(volunteer_title));
		for entry in &resume.volunteer {
			let _ = writeln!(
				html,
				"<article class=\"entry\">\n<h3>{}</h3>\n<p class=\"org\"><a href=\"{}\">{}</a> <span class=\"dates\">{}</span></p>",
				html_escape(&entry.position),
				entry.url,
				html_escape(&entry.organization),
				date_range(&entry.start_date, &entry.end_date, locale)
			);
			html.push_str(&render_highlights(&entry.highlights));
			html.push_str("</article>\n");
		}
		html.push_str("</section>\n");
	}

	if !resume.skills.is_empty() {
		html.push_str(&section_header(skills_title));
		for group in &resume.skills {
			let _ = writeln!(html, "<h3>{}</h3>", html_escape(&group.name));
			let mut pills = String::from("<ul class=\"pills\">\n");
			for keyword in &group.keywords {
				let _ = writeln!(pills, "<li>{}</li>", html_escape(keyword));
			}
			pills.push_str("</ul>\n");
			html.push_str(&pills);
		}
		html.push_str("</section>\n");
	}

	if !resume.languages.is_empty() {
		html.push_str(&section_header(languages_title));
		html.push_str("<ul class=\"languages\">\n");
		for entry in &resume.languages {
			let _ = writeln!(
				html,
				"<li><strong>{}</strong>: {}</li>",
				html_escape(&entry.language),
				html_escape(&entry.fluency)
			);
		}
		html.push_str("</ul>\n</section>\n");
	}

	html
}
