use anyhow::Result;
use axum::{
	http::StatusCode,
	response::{Html, IntoResponse},
	routing::get,
	Router,
};
use notify::{RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::generator::{BuildTargets, Generator};

/// Preview server for the web resume: builds into a temp directory,
/// serves it, and rebuilds when the resume data or templates change.
pub struct DevServer {
	port: u16,
	config_path: Option<PathBuf>,
	generator: Arc<RwLock<Option<Generator>>>,
}

fn preview_output_dir() -> PathBuf {
	std::env::temp_dir().join("vitae")
}

fn web_targets() -> BuildTargets {
	BuildTargets {
		web: true,
		..Default::default()
	}
}

impl DevServer {
	pub fn new(port: u16, config_path: Option<PathBuf>) -> Result<Self> {
		Ok(Self {
			port,
			config_path,
			generator: Arc::new(RwLock::new(None)),
		})
	}

	pub async fn serve(&self) -> Result<()> {
		let output_dir = preview_output_dir();

		// Initial build
		let config = Config::load(self.config_path.as_deref())?;
		let watch_dirs = vec![
			config.build.config_dir.clone(),
			config.build.templates_dir.clone(),
		];
		let gen = Generator::new(config, Some(output_dir.clone()));
		gen.build(&web_targets())?;
		*self.generator.write().await = Some(gen);

		// Get a handle to the current tokio runtime to use inside the watcher thread
		let rt = tokio::runtime::Handle::current();

		let mut watcher = notify::recommended_watcher({
			let generator = Arc::clone(&self.generator);
			let rt = rt.clone();

			move |event: Result<notify::Event, notify::Error>| {
				if let Ok(event) = event {
					if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
						let generator = Arc::clone(&generator);

						rt.spawn(async move {
							if let Some(gen) = generator.write().await.take() {
								if let Err(e) = gen.build(&web_targets()) {
									eprintln!("Rebuild error: {:#}", e);
								}
								*generator.write().await = Some(gen);
							}
						});
					}
				}
			}
		})?;

		for dir in &watch_dirs {
			if dir.exists() {
				watcher.watch(dir, RecursiveMode::Recursive)?;
			}
		}

		// Setup HTTP server
		let app = Router::new()
			.route("/", get(serve_index))
			.fallback_service(ServeDir::new(output_dir.join("Web")))
			.layer(ServiceBuilder::new());

		let addr = format!("0.0.0.0:{}", self.port);
		let listener = tokio::net::TcpListener::bind(&addr).await?;

		println!(
			"Preview server running at http://localhost:{}",
			self.port
		);
		println!("Watching for changes...");

		axum::serve(listener, app).await?;

		Ok(())
	}
}

async fn serve_index() -> impl IntoResponse {
	let index_path = preview_output_dir().join("Web").join("index.html");

	if index_path.exists() {
		match tokio::fs::read_to_string(&index_path).await {
			Ok(content) => Html(content).into_response(),
			Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response(),
		}
	} else {
		(StatusCode::NOT_FOUND, "Not found").into_response()
	}
}
