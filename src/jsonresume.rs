use serde::{Deserialize, Serialize};

use crate::dates::Locale;
use crate::latex::clean_latex;
use crate::resume::ResumeData;

/// A resume document in the JSON Resume schema, the intermediate format
/// consumed by web themes. Only the fields this system produces are
/// modeled; unknown fields in external documents are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonResume {
	#[serde(default)]
	pub basics: JsonBasics,
	#[serde(default)]
	pub meta: Meta,
	#[serde(default)]
	pub work: Vec<WorkEntry>,
	#[serde(default)]
	pub education: Vec<EducationEntry>,
	#[serde(default)]
	pub skills: Vec<SkillEntry>,
	#[serde(default)]
	pub awards: Vec<AwardEntry>,
	#[serde(default)]
	pub languages: Vec<LanguageEntry>,
	#[serde(default)]
	pub projects: Vec<ProjectEntry>,
	#[serde(default)]
	pub volunteer: Vec<VolunteerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonBasics {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub image: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub location: JsonLocation,
	#[serde(default)]
	pub profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JsonLocation {
	#[serde(default)]
	pub city: String,
	#[serde(default)]
	pub country_code: String,
	#[serde(default)]
	pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
	#[serde(default)]
	pub network: String,
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Meta {
	#[serde(default)]
	pub theme: String,
	#[serde(default)]
	pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub position: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub start_date: String,
	#[serde(default)]
	pub end_date: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	#[serde(default)]
	pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
	#[serde(default)]
	pub institution: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub area: String,
	#[serde(default)]
	pub study_type: String,
	#[serde(default)]
	pub start_date: String,
	#[serde(default)]
	pub end_date: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub courses: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkillEntry {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwardEntry {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub date: String,
	#[serde(default)]
	pub awarder: String,
	#[serde(default)]
	pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LanguageEntry {
	#[serde(default)]
	pub language: String,
	#[serde(default)]
	pub fluency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub start_date: String,
	#[serde(default)]
	pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerEntry {
	#[serde(default)]
	pub organization: String,
	#[serde(default)]
	pub position: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub start_date: String,
	#[serde(default)]
	pub end_date: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub highlights: Vec<String>,
}

fn split_keywords(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(|k| clean_latex(k.trim()))
		.filter(|k| !k.is_empty())
		.collect()
}

fn end_date_or_present(end: Option<&str>, locale: Locale) -> String {
	match end {
		Some(value) if !value.trim().is_empty() => {
			let lowered = value.trim().to_lowercase();
			if lowered == "present" || lowered == "current" || lowered == "heute" {
				locale.present_token().to_string()
			} else {
				value.trim().to_string()
			}
		}
		_ => locale.present_token().to_string(),
	}
}

impl JsonResume {
	/// Convert language-filtered resume YAML data into a JSON Resume
	/// document: LaTeX markup is cleaned to Markdown, certificates map to
	/// awards, other experience maps to volunteer work, and ongoing end
	/// dates become the locale's present token.
	pub fn from_resume(data: &ResumeData, lang: &str, theme: &str) -> Self {
		let locale = Locale::from_code(lang);
		let basics = &data.basics;

		let city = basics
			.location
			.split(',')
			.next()
			.unwrap_or("")
			.trim()
			.to_string();

		let mut resume = JsonResume {
			basics: JsonBasics {
				name: basics.name.clone(),
				label: basics.label.clone(),
				email: basics.email.clone(),
				phone: basics.phone.clone(),
				image: "profile.jpg".to_string(),
				summary: clean_latex(&data.profile),
				url: basics.linkedin.url.clone(),
				location: JsonLocation {
					city,
					..Default::default()
				},
				profiles: vec![
					ProfileEntry {
						network: "LinkedIn".to_string(),
						username: basics.linkedin.username.clone(),
						url: basics.linkedin.url.clone(),
					},
					ProfileEntry {
						network: "GitHub".to_string(),
						username: basics.github.username.clone(),
						url: basics.github.url.clone(),
					},
				],
			},
			meta: Meta {
				theme: theme.to_string(),
				language: lang.to_string(),
			},
			..Default::default()
		};

		for job in &data.experience {
			let highlights = if !job.highlights.is_empty() {
				&job.highlights
			} else {
				&job.highlights_short
			};
			resume.work.push(WorkEntry {
				name: clean_latex(&job.company),
				position: clean_latex(&job.title),
				url: job.company_url.clone(),
				start_date: job.start.clone(),
				end_date: end_date_or_present(job.end.as_deref(), locale),
				summary: job.summary.as_deref().map(clean_latex),
				highlights: highlights.iter().map(|h| clean_latex(h)).collect(),
			});
		}

		for edu in &data.education {
			let (study_type, area) = match edu.degree.split_once(": ") {
				Some((kind, area)) => (clean_latex(kind), clean_latex(area)),
				None => (String::new(), clean_latex(&edu.degree)),
			};
			resume.education.push(EducationEntry {
				institution: clean_latex(&edu.institution),
				url: edu.institution_url.clone(),
				area,
				study_type,
				start_date: edu.start.clone(),
				end_date: end_date_or_present(edu.end.as_deref(), locale),
				courses: split_keywords(&edu.coursework),
				highlights: edu.highlights.iter().map(|h| clean_latex(h)).collect(),
			});
		}

		for project in &data.projects {
			resume.projects.push(ProjectEntry {
				name: clean_latex(&project.name),
				description: clean_latex(&project.tech),
				url: project.url.clone(),
				start_date: project.year.clone(),
				highlights: project.highlights.iter().map(|h| clean_latex(h)).collect(),
			});
		}

		for cert in &data.certificates {
			resume.awards.push(AwardEntry {
				title: clean_latex(&cert.name),
				date: cert.date.clone(),
				awarder: clean_latex(&cert.issuer),
				summary: cert.url.clone(),
			});
		}

		for other in &data.other_experience {
			let highlights: Vec<String> =
				other.highlights.iter().map(|h| clean_latex(h)).collect();
			resume.volunteer.push(VolunteerEntry {
				organization: clean_latex(&other.organization),
				position: clean_latex(&other.title),
				url: other.organization_url.clone(),
				start_date: other.start.clone(),
				end_date: end_date_or_present(other.end.as_deref(), locale),
				summary: highlights.join(" "),
				highlights,
			});
		}

		for group in &data.skills {
			resume.skills.push(SkillEntry {
				name: clean_latex(&group.category),
				keywords: split_keywords(&group.keywords),
			});
		}

		for spoken in &data.spoken_languages {
			resume.languages.push(LanguageEntry {
				language: clean_latex(&spoken.language),
				fluency: clean_latex(&spoken.level),
			});
		}

		resume
	}
}
