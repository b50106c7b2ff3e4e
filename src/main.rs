mod app;
mod config;
mod error;
mod event;
mod host;
mod inference;
mod language;
mod response;
mod session;
mod theme;
mod workbench;

use anyhow::{anyhow, Context, Result};
use app::WorkbenchApp;
use clap::Parser;
use eframe::egui;
use host::{Host, LocalHost};
use inference::{Inference, LlamaClient};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use theme::Theme;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workbench::{Repaint, Workbench};

/// Pseudocode workbench backed by a local llama.cpp server.
#[derive(Parser, Debug)]
#[command(name = "pseudobench", version, about, long_about = None)]
struct Args {
    /// Workspace directory (created if missing)
    #[arg(short, long, env = "PSEUDOBENCH_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, env = "PSEUDOBENCH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pseudobench=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config =
        config::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(workspace) = args.workspace {
        config.workspace.root = Some(workspace);
    }
    let workspace_root = config.workspace.resolve_root();
    let projects_dir = config.workspace.resolve_projects();
    info!(
        server = %config.inference.server_url,
        workspace = %workspace_root.display(),
        "starting pseudobench"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pseudobench-runtime")
        .build()
        .context("failed to start async runtime")?;

    let inference: Arc<dyn Inference> = Arc::new(
        LlamaClient::new(config.inference.clone()).context("failed to build model client")?,
    );
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let host: Arc<dyn Host> = Arc::new(LocalHost::new(cwd));
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pseudobench",
        native_options,
        Box::new(move |creation_context| {
            let theme = Theme::default();
            theme.apply_visuals(&creation_context.egui_ctx);

            let ctx = creation_context.egui_ctx.clone();
            let repaint: Repaint = Arc::new(move || ctx.request_repaint());
            let (tx, rx) = mpsc::channel();
            let workbench = Workbench::new(inference, host, handle, tx, repaint);
            workbench.open_workspace(workspace_root);

            Ok(Box::new(WorkbenchApp::new(rx, workbench, theme, projects_dir)))
        }),
    )
    .map_err(|err| anyhow!("window failed: {err}"))?;

    drop(runtime);
    Ok(())
}
