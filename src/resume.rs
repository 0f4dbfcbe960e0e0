use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Page-length layout variant of the typeset CV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
	OnePage,
	TwoPage,
}

impl PageVariant {
	pub fn dir_name(&self) -> &'static str {
		match self {
			PageVariant::OnePage => "1Page",
			PageVariant::TwoPage => "2Page",
		}
	}

	pub fn stem(&self) -> &'static str {
		match self {
			PageVariant::OnePage => "1page",
			PageVariant::TwoPage => "2page",
		}
	}
}

/// Resume data for one language, loaded from `config/resume_<lang>.yaml`.
/// Single source of truth for every rendered artifact.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResumeData {
	#[serde(default)]
	pub basics: Basics,
	#[serde(default)]
	pub profile: String,
	#[serde(default)]
	pub experience: Vec<Experience>,
	#[serde(default)]
	pub education: Vec<Education>,
	#[serde(default)]
	pub projects: Vec<Project>,
	#[serde(default)]
	pub certificates: Vec<Certificate>,
	#[serde(default)]
	pub other_experience: Vec<OtherExperience>,
	#[serde(default)]
	pub skills: Vec<SkillGroup>,
	#[serde(default)]
	pub spoken_languages: Vec<SpokenLanguage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Basics {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub location: String,
	#[serde(default)]
	pub photo: Option<String>,
	#[serde(default)]
	pub linkedin: Profile,
	#[serde(default)]
	pub github: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Experience {
	#[serde(default)]
	pub company: String,
	#[serde(default)]
	pub company_url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub location: String,
	#[serde(default)]
	pub start: String,
	/// Absent or "Present" means ongoing.
	#[serde(default)]
	pub end: Option<String>,
	#[serde(default)]
	pub summary: Option<String>,
	#[serde(default)]
	pub highlights: Vec<String>,
	/// Condensed bullet list used by the 1-page layout when present.
	#[serde(default)]
	pub highlights_short: Vec<String>,
	#[serde(default)]
	pub one_page_only: bool,
	#[serde(default)]
	pub two_page_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Education {
	#[serde(default)]
	pub institution: String,
	#[serde(default)]
	pub institution_url: String,
	/// "StudyType: Area" or a plain degree name.
	#[serde(default)]
	pub degree: String,
	#[serde(default)]
	pub start: String,
	#[serde(default)]
	pub end: Option<String>,
	/// Comma-separated course list.
	#[serde(default)]
	pub coursework: String,
	#[serde(default)]
	pub highlights: Vec<String>,
	#[serde(default)]
	pub one_page_only: bool,
	#[serde(default)]
	pub two_page_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Project {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub tech: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub year: String,
	#[serde(default)]
	pub highlights: Vec<String>,
	#[serde(default)]
	pub one_page_only: bool,
	#[serde(default)]
	pub two_page_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Certificate {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub date: String,
	#[serde(default)]
	pub issuer: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub one_page_only: bool,
	#[serde(default)]
	pub two_page_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OtherExperience {
	#[serde(default)]
	pub organization: String,
	#[serde(default)]
	pub organization_url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub start: String,
	#[serde(default)]
	pub end: Option<String>,
	#[serde(default)]
	pub highlights: Vec<String>,
	#[serde(default)]
	pub one_page_only: bool,
	#[serde(default)]
	pub two_page_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkillGroup {
	#[serde(default)]
	pub category: String,
	/// Comma-separated keyword list.
	#[serde(default)]
	pub keywords: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpokenLanguage {
	#[serde(default)]
	pub language: String,
	#[serde(default)]
	pub level: String,
}

impl ResumeData {
	/// Load resume data for one language from `<config_dir>/resume_<lang>.yaml`.
	pub fn load(config_dir: &Path, lang: &str) -> Result<Self> {
		let path = config_dir.join(format!("resume_{}.yaml", lang));
		let raw = fs::read_to_string(&path)
			.with_context(|| format!("Failed to read resume data: {}", path.display()))?;
		let data: ResumeData = serde_yaml::from_str(&raw)
			.with_context(|| format!("Invalid resume YAML: {}", path.display()))?;
		Ok(data)
	}

	/// Drop entries not visible in the given page variant. The 1-page build
	/// removes `two_page_only` entries and vice versa, so templates never
	/// see an entry they must not render.
	pub fn filter_for_variant(&mut self, variant: PageVariant) {
		match variant {
			PageVariant::OnePage => {
				self.experience.retain(|e| !e.two_page_only);
				self.education.retain(|e| !e.two_page_only);
				self.projects.retain(|e| !e.two_page_only);
				self.certificates.retain(|e| !e.two_page_only);
				self.other_experience.retain(|e| !e.two_page_only);
			}
			PageVariant::TwoPage => {
				self.experience.retain(|e| !e.one_page_only);
				self.education.retain(|e| !e.one_page_only);
				self.projects.retain(|e| !e.one_page_only);
				self.certificates.retain(|e| !e.one_page_only);
				self.other_experience.retain(|e| !e.one_page_only);
			}
		}
	}

	/// Slugified name for artifact filenames, "resume" when unavailable.
	pub fn slug_name(&self) -> String {
		if self.basics.name.trim().is_empty() {
			return "resume".to_string();
		}
		self.basics.name.trim().to_lowercase().replace(' ', "_")
	}

	pub fn display_name(&self) -> String {
		if self.basics.name.trim().is_empty() {
			return "Resume".to_string();
		}
		self.basics.name.trim().to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> ResumeData {
		serde_yaml::from_str(
			r#"
basics:
  name: Jane Doe
  label: Engineer
  email: jane@example.com
  linkedin:
    username: janedoe
    url: https://linkedin.com/in/janedoe
profile: Builds things.
experience:
  - company: Acme
    title: Engineer
    start: "2023-05"
    highlights: [Did X, Did Y]
  - company: Oldcorp
    title: Intern
    start: "2018-07"
    end: "2018-09"
    two_page_only: true
education:
  - institution: TU Somewhere
    degree: "MSc: Computer Science"
    start: "2016"
    end: "2018"
    one_page_only: true
"#,
		)
		.unwrap()
	}

	#[test]
	fn test_load_defaults() {
		let data = sample();
		assert_eq!(data.basics.name, "Jane Doe");
		assert_eq!(data.experience.len(), 2);
		assert!(data.experience[0].end.is_none());
		assert_eq!(data.experience[1].end.as_deref(), Some("2018-09"));
		assert!(data.certificates.is_empty());
	}

	#[test]
	fn test_variant_filtering() {
		let mut one_page = sample();
		one_page.filter_for_variant(PageVariant::OnePage);
		assert_eq!(one_page.experience.len(), 1);
		assert_eq!(one_page.education.len(), 1);

		let mut two_page = sample();
		two_page.filter_for_variant(PageVariant::TwoPage);
		assert_eq!(two_page.experience.len(), 2);
		assert!(two_page.education.is_empty());
	}

	#[test]
	fn test_slug_name() {
		assert_eq!(sample().slug_name(), "jane_doe");
		assert_eq!(ResumeData::default().slug_name(), "resume");
	}
}
