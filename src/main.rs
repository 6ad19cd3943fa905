use clap::Parser;
use deck_devtools::config::cli::Command;
use deck_devtools::core::export::{archive_entries, describe};
use deck_devtools::core::worktree_port::{md5_hex, PortResolver};
use deck_devtools::domain::model::{ExportKind, WorktreeIdentity};
use deck_devtools::utils::error::{DevToolsError, ErrorSeverity};
use deck_devtools::utils::logger;
use deck_devtools::{CliConfig, ImageExporter, LocalStorage, Seeder, Workspace};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ deck-devtools failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: CliConfig) -> Result<(), DevToolsError> {
    let workspace = match &config.project_root {
        Some(root) => Workspace::load(root, config.config.as_deref())?,
        None => Workspace::discover(config.config.as_deref())?,
    };
    tracing::debug!(
        "Project root {} (worktree '{}')",
        workspace.root().display(),
        workspace.worktree()
    );

    match config.command {
        Command::Ports { worktree } => print_ports(&workspace, worktree),
        Command::Export { project_id, out } => {
            let exporter = ImageExporter::new(workspace.http_backend()?);
            let result = exporter.export(&project_id).await?;

            println!("download_url: {}", result.download_url);
            if let Some(absolute) = &result.download_url_absolute {
                println!("download_url_absolute: {}", absolute);
            }
            println!("kind: {}", describe(&result));

            if let Some(out) = out {
                let storage = LocalStorage::new(out);
                let name = exporter.download_to(&result, &storage).await?;
                println!("📁 Saved to: {}", storage.full_path(&name).display());

                if result.kind == ExportKind::Zip {
                    let bytes = std::fs::read(storage.full_path(&name))?;
                    for entry in archive_entries(&bytes)? {
                        println!("  - {}", entry);
                    }
                }
            }
            Ok(())
        }
        Command::Seed { page_count } => {
            let ports = workspace.ports()?;
            let seeder = Seeder::new(
                workspace.http_backend()?,
                workspace.fixture_store()?,
                workspace.seed_options(),
            );
            let seeded = seeder.seed(page_count).await?;

            println!("Project: {}", seeded.project_id);
            println!("Preview: {}", ports.preview_url(&seeded.project_id));
            Ok(())
        }
    }
}

fn print_ports(workspace: &Workspace, worktree: Option<String>) -> Result<(), DevToolsError> {
    let (name, ports) = match worktree {
        // 其他 worktree 只看雜湊，不套用本機 .env
        Some(name) => {
            let resolver = PortResolver::new(WorktreeIdentity::new(name.clone())).with_bases(
                workspace.config().backend_base_port(),
                workspace.config().frontend_base_port(),
            );
            (name, resolver.resolve(Default::default())?)
        }
        None => (workspace.worktree().to_string(), workspace.ports()?),
    };

    println!("worktree: {}", name);
    println!("md5: {}", md5_hex(&name));
    println!("backend:  {} ({})", ports.backend.port, ports.backend.source);
    println!("frontend: {} ({})", ports.frontend.port, ports.frontend.source);
    Ok(())
}
