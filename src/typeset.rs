use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Auxiliary files pdflatex leaves behind after a successful run.
const AUX_EXTENSIONS: &[&str] = &["aux", "log", "out", "fls", "fdb_latexmk", "synctex.gz"];

/// Drives the external typesetting toolchain. The typesetter and the DOCX
/// converter are opaque collaborators invoked as subprocesses; their own
/// output is surfaced verbatim on failure.
pub struct Typesetter {
	build_dir: PathBuf,
}

impl Typesetter {
	pub fn new(build_dir: &Path) -> Result<Self> {
		fs::create_dir_all(build_dir)
			.with_context(|| format!("Failed to create build dir: {}", build_dir.display()))?;
		Ok(Self {
			build_dir: build_dir.to_path_buf(),
		})
	}

	pub fn build_dir(&self) -> &Path {
		&self.build_dir
	}

	/// Compile a rendered .tex file in the build directory to PDF.
	pub fn compile_pdf(&self, tex_filename: &str) -> Result<PathBuf> {
		run_tool(
			"pdflatex",
			&[
				"-interaction=nonstopmode",
				&format!("-output-directory={}", self.build_dir.display()),
				tex_filename,
			],
			&self.build_dir,
		)?;

		let pdf_path = self.build_dir.join(Path::new(tex_filename).with_extension("pdf"));
		if !pdf_path.exists() {
			bail!(
				"pdflatex reported success but produced no PDF: {}",
				pdf_path.display()
			);
		}

		self.clean_aux(tex_filename);
		Ok(pdf_path)
	}

	/// Convert a .tex file to DOCX via pandoc.
	pub fn convert_docx(&self, tex_filename: &str) -> Result<PathBuf> {
		let docx_filename = Path::new(tex_filename)
			.with_extension("docx")
			.to_string_lossy()
			.to_string();
		run_tool(
			"pandoc",
			&[tex_filename, "-o", &docx_filename],
			&self.build_dir,
		)?;
		Ok(self.build_dir.join(docx_filename))
	}

	fn clean_aux(&self, tex_filename: &str) {
		for ext in AUX_EXTENSIONS {
			let aux = self.build_dir.join(Path::new(tex_filename).with_extension(ext));
			if aux.exists() {
				let _ = fs::remove_file(aux);
			}
		}
	}
}

/// Run an external tool, capturing its streams. A non-zero exit status is
/// fatal and carries the tool's own error output in the diagnostic.
pub fn run_tool(program: &str, args: &[&str], cwd: &Path) -> Result<()> {
	let output = Command::new(program)
		.args(args)
		.current_dir(cwd)
		.output()
		.with_context(|| format!("Failed to invoke '{}'; is it installed?", program))?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		let stdout = String::from_utf8_lossy(&output.stdout);
		bail!(
			"'{}' failed with {}:\n{}\n{}",
			program,
			output.status,
			stderr.trim(),
			stdout.trim()
		);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_run_tool_success() {
		let dir = tempfile::tempdir().unwrap();
		run_tool("true", &[], dir.path()).unwrap();
	}

	#[test]
	fn test_run_tool_failure_names_tool() {
		let dir = tempfile::tempdir().unwrap();
		let err = run_tool("false", &[], dir.path()).unwrap_err();
		assert!(err.to_string().contains("'false' failed"));
	}

	#[test]
	fn test_run_tool_missing_binary() {
		let dir = tempfile::tempdir().unwrap();
		let err = run_tool("definitely-not-a-real-tool", &[], dir.path()).unwrap_err();
		assert!(err.to_string().contains("definitely-not-a-real-tool"));
	}

	#[test]
	fn test_clean_aux_removes_leftovers() {
		let dir = tempfile::tempdir().unwrap();
		let typesetter = Typesetter::new(dir.path()).unwrap();
		fs::write(dir.path().join("cv_1page_en.aux"), "x").unwrap();
		fs::write(dir.path().join("cv_1page_en.log"), "x").unwrap();
		typesetter.clean_aux("cv_1page_en.tex");
		assert!(!dir.path().join("cv_1page_en.aux").exists());
		assert!(!dir.path().join("cv_1page_en.log").exists());
	}
}
