use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project configuration, loaded from `vitae.toml`. Passed immutably into
/// the generator at start; there is no ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub site: SiteConfig,
	#[serde(default)]
	pub build: BuildConfig,
	#[serde(default)]
	pub theme: ThemeConfig,
	#[serde(default)]
	pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
	/// Languages to build, one resume_<lang>.yaml each.
	pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
	/// Directory holding resume_<lang>.yaml and generated personal.tex.
	pub config_dir: PathBuf,
	/// Directory holding the LaTeX templates.
	pub templates_dir: PathBuf,
	/// Scratch directory for rendered .tex files and typesetter output.
	pub build_dir: PathBuf,
	/// Deployment root for finished artifacts.
	pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeConfig {
	/// Web theme name or path; overridable per build with --theme.
	pub default_theme: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
	/// Profile photo copied next to each web resume and inlined in the
	/// portable bundle.
	pub profile_image: PathBuf,
	/// Vendored icon-font directory (css + webfonts/) inlined into the
	/// portable bundle. Optional; the bundle works without it.
	pub icon_font_dir: Option<PathBuf>,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			languages: vec!["en".to_string(), "de".to_string()],
		}
	}
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			config_dir: PathBuf::from("config"),
			templates_dir: PathBuf::from("templates"),
			build_dir: PathBuf::from("build"),
			output_dir: PathBuf::from("dist/latest"),
		}
	}
}

impl Default for AssetsConfig {
	fn default() -> Self {
		Self {
			profile_image: PathBuf::from("assets/profile.jpg"),
			icon_font_dir: Some(PathBuf::from("assets/fontawesome")),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			site: SiteConfig::default(),
			build: BuildConfig::default(),
			theme: ThemeConfig::default(),
			assets: AssetsConfig::default(),
		}
	}
}

impl Config {
	/// Load configuration from the given path, from ./vitae.toml when no
	/// path is given, falling back to defaults when neither exists.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let path = match path {
			Some(p) => p.to_path_buf(),
			None => PathBuf::from("vitae.toml"),
		};

		if !path.exists() {
			return Ok(Config::default());
		}

		let raw = fs::read_to_string(&path)
			.with_context(|| format!("Failed to read config: {}", path.display()))?;
		let config: Config = toml::from_str(&raw)
			.with_context(|| format!("Invalid config: {}", path.display()))?;
		Ok(config)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
		fs::write(path, raw)
			.with_context(|| format!("Failed to write config: {}", path.display()))?;
		Ok(())
	}
}
