use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "deck-devtools")]
#[command(about = "Worktree ports, image export and e2e seeding for the slide-deck app")]
pub struct CliConfig {
    /// Project root (defaults to the current directory, or its parent inside frontend/)
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Path to deck-devtools.toml
    #[arg(short, long, global = true, env = "DECK_DEVTOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit JSON log lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the backend and frontend ports for this worktree
    Ports {
        /// Compute for another worktree name instead of the project root
        #[arg(long)]
        worktree: Option<String>,
    },
    /// Export a project's generated slides as JPEG or ZIP
    Export {
        project_id: String,
        /// Download the artifact into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Create a project whose pages already have images
    Seed {
        #[arg(default_value_t = crate::core::seed::DEFAULT_PAGE_COUNT)]
        page_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_default_page_count() {
        let cli = CliConfig::try_parse_from(["deck-devtools", "seed"]).unwrap();
        assert!(matches!(cli.command, Command::Seed { page_count: 3 }));
    }

    #[test]
    fn test_parse_export_with_global_flags() {
        let cli = CliConfig::try_parse_from([
            "deck-devtools",
            "export",
            "p1",
            "--out",
            "/tmp/out",
            "--verbose",
            "--project-root",
            "/work/deck",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.project_root, Some(PathBuf::from("/work/deck")));
        match cli.command {
            Command::Export { project_id, out } => {
                assert_eq!(project_id, "p1");
                assert_eq!(out, Some(PathBuf::from("/tmp/out")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ports_for_other_worktree() {
        let cli = CliConfig::try_parse_from(["deck-devtools", "ports", "--worktree", "feature-x"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Ports { worktree: Some(ref name) } if name == "feature-x"
        ));
    }
}
