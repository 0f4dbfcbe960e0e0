use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::generator::{BuildTargets, Generator};
use crate::render;
use crate::server::DevServer;

#[derive(Parser)]
#[command(name = "vitae")]
#[command(about = "A data-driven CV/resume generator for PDF, DOCX and web output")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Build CV artifacts; no selection flags means build everything
	Build {
		/// Build the 1-page PDF variants
		#[arg(long)]
		one_page: bool,

		/// Build the 2-page PDF variants
		#[arg(long)]
		two_page: bool,

		/// Build the web resumes
		#[arg(long)]
		web: bool,

		/// Also convert typeset variants to DOCX
		#[arg(long)]
		docx: bool,

		/// Override the web theme (built-in name or theme directory)
		#[arg(long)]
		theme: Option<String>,

		/// Output directory (default: dist/latest)
		#[arg(short, long)]
		output: Option<PathBuf>,

		/// Configuration file
		#[arg(short, long)]
		config: Option<PathBuf>,
	},

	/// Render a JSON Resume document through a theme to a file
	Render {
		/// Path to the resume document (JSON Resume format)
		input: PathBuf,

		/// Destination path for the rendered markup
		output: PathBuf,

		/// Theme to render with (built-in name or theme directory)
		#[arg(short, long, default_value = "classic")]
		theme: String,
	},

	/// Start a preview server for the web resume
	Dev {
		/// Port to serve on
		#[arg(short, long, default_value_t = 3000)]
		port: u16,

		/// Configuration file
		#[arg(short, long)]
		config: Option<PathBuf>,
	},

	/// Initialize a new vitae project
	Init {
		/// Directory to initialize
		#[arg(default_value = ".")]
		dir: PathBuf,
	},
}

impl Cli {
	pub async fn run(self) -> Result<()> {
		match self.command {
			Commands::Build {
				one_page,
				two_page,
				web,
				docx,
				theme,
				output,
				config,
			} => {
				let config = Config::load(config.as_deref())?;
				let targets = BuildTargets {
					one_page,
					two_page,
					web,
					docx,
					theme,
				};
				let generator = Generator::new(config, output);
				generator.build(&targets)?;
				println!(
					"\nBuild complete. Output: {}",
					generator.output_dir().display()
				);
			}
			Commands::Render {
				input,
				output,
				theme,
			} => {
				render::render_resume(&theme, &input, &output)?;
				println!("Rendered {} -> {}", input.display(), output.display());
			}
			Commands::Dev { port, config } => {
				let server = DevServer::new(port, config)?;
				server.serve().await?;
			}
			Commands::Init { dir } => {
				init_project(&dir)?;
				println!("Initialized project in {}", dir.display());
			}
		}
		Ok(())
	}
}

fn init_project(dir: &PathBuf) -> Result<()> {
	let config_dir = dir.join("config");
	let templates_dir = dir.join("templates");
	fs::create_dir_all(&config_dir)?;
	fs::create_dir_all(&templates_dir)?;

	// Example data with placeholder values; copy to resume_<lang>.yaml and
	// fill in. Real personal data stays out of version control.
	let example_yaml = r#"# Example resume data. Copy to resume_en.yaml (and resume_de.yaml)
# and replace the placeholder values with your own.
basics:
  name: Your Name
  label: Job Title
  email: you@example.com
  phone: "+00 000 0000000"
  location: "City, Country"
  photo: assets/profile.jpg
  linkedin:
    username: yourname
    url: https://linkedin.com/in/yourname
    display: in/yourname
  github:
    username: yourname
    url: https://github.com/yourname
    display: gh/yourname

profile: >
  One or two sentences about yourself. A little \textbf{LaTeX} is allowed
  and is converted to Markdown for the web resume.

experience:
  - company: Example Corp
    company_url: https://example.com
    title: Senior Engineer
    location: City
    start: "2021-03"
    highlights:
      - Achievement with a concrete metric
      - Another achievement
  - company: Previous Inc
    title: Engineer
    start: "2018-01"
    end: "2021-02"
    two_page_only: true
    highlights:
      - Only shown on the detailed 2-page variant

education:
  - institution: Some University
    degree: "MSc: Computer Science"
    start: "2016"
    end: "2018"
    coursework: "Compilers, Distributed Systems"

skills:
  - category: Languages
    keywords: "Rust, Python, SQL"

spoken_languages:
  - language: English
    level: Fluent
"#;
	fs::write(config_dir.join("resume_example.yaml"), example_yaml)?;

	// Starter LaTeX templates. << >> are variables, <% %> are blocks; data
	// arrives already LaTeX-escaped.
	let one_page_template = r#"\documentclass[10pt]{article}
\usepackage[a4paper,margin=1.8cm]{geometry}
\usepackage{hyperref}
\input{../config/personal.tex}
\pagestyle{empty}
\begin{document}
{\LARGE \myName} \hfill \myLocation \quad \myEmail

\section*{Experience}
<% for job in experience %>
\textbf{<< job.title >>}, << job.company >> \hfill << job.start >> -- << job.end or "Present" >>
\begin{itemize}
<% for point in job.highlights %>
  \item << point >>
<% endfor %>
\end{itemize}
<% endfor %>

\section*{Education}
<% for edu in education %>
\textbf{<< edu.degree >>}, << edu.institution >> \hfill << edu.start >> -- << edu.end or "Present" >>
<% endfor %>
\end{document}
"#;
	fs::write(templates_dir.join("cv_1page.tex.j2"), one_page_template)?;

	let two_page_template = r#"\documentclass[10pt]{article}
\usepackage[a4paper,margin=1.8cm]{geometry}
\usepackage{hyperref}
\input{../config/personal.tex}
\pagestyle{empty}
\begin{document}
{\LARGE \myName} \hfill \myLocation \quad \myEmail

<< profile >>

\section*{Experience}
<% for job in experience %>
\textbf{<< job.title >>}, << job.company >> \hfill << job.start >> -- << job.end or "Present" >>
\begin{itemize}
<% for point in job.highlights %>
  \item << point >>
<% endfor %>
\end{itemize}
<% endfor %>

\section*{Education}
<% for edu in education %>
\textbf{<< edu.degree >>}, << edu.institution >> \hfill << edu.start >> -- << edu.end or "Present" >>

<% if edu.coursework %>Coursework: << edu.coursework >>
<% endif %>
<% endfor %>

\section*{Skills}
<% for group in skills %>
\textbf{<< group.category >>}: << group.keywords >>

<% endfor %>
\end{document}
"#;
	fs::write(templates_dir.join("cv_2page.tex.j2"), two_page_template)?;

	let config = Config::default();
	config.save(&dir.join("vitae.toml"))?;

	Ok(())
}
