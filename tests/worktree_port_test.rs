use deck_devtools::core::worktree_port::{
    compute_worktree_port, md5_hex, worktree_offset, PortOverrides, PortResolver,
};
use deck_devtools::domain::model::{PortSource, WorktreeIdentity};
use deck_devtools::Workspace;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_same_input_same_port() {
    let first = compute_worktree_port("myproject", 5000).unwrap();
    for _ in 0..100 {
        assert_eq!(compute_worktree_port("myproject", 5000).unwrap(), first);
    }
    assert_eq!(first, 5394);
}

#[test]
fn test_offset_always_below_500() {
    let names = ["a", "main", "feature/export-images", "中文目錄", " ", "x".repeat(300).as_str()]
        .map(str::to_string);
    for name in names {
        let port = compute_worktree_port(&name, 5000).unwrap();
        assert!((5000..5500).contains(&port), "{} -> {}", name, port);
        assert_eq!(port - 5000, worktree_offset(&name));
    }
}

#[test]
fn test_hex_prefix_algorithm() {
    // md5("myproject") = 4da39212...; 0x4da39212 % 500 = 394
    assert!(md5_hex("myproject").starts_with("4da39212"));
    assert_eq!(0x4da3_9212u32 % 500, 394);
    assert_eq!(worktree_offset("myproject"), 394);
}

#[test]
fn test_project_root_name_is_the_identity() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("myproject");
    std::fs::create_dir_all(root.join("frontend")).unwrap();

    let identity = WorktreeIdentity::from_project_root(&root);
    assert_eq!(identity.as_str(), "myproject");

    let pair = PortResolver::new(identity)
        .resolve(PortOverrides::default())
        .unwrap();
    assert_eq!(pair.backend.port, 5394);
    assert_eq!(pair.frontend.port, 3394);
}

#[test]
fn test_workspace_reads_backend_port_from_env_file() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("myproject");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join(".env"), "BACKEND_PORT=5999\n").unwrap();

    let workspace = Workspace::load(&root, None).unwrap();
    assert_eq!(workspace.env().file_value("BACKEND_PORT"), Some("5999"));

    // 只有在 shell 沒設定 BACKEND_PORT 時才能斷言來源
    if std::env::var("BACKEND_PORT").is_err() {
        let ports = workspace.ports().unwrap();
        assert_eq!(ports.backend.port, 5999);
        assert_eq!(ports.backend.source, PortSource::Override);
    }
}

#[test]
fn test_independent_process_agrees() {
    let parent = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_deck-devtools"))
        .args(["ports", "--worktree", "myproject", "--project-root"])
        .arg(parent.path())
        .env_remove("DECK_DEVTOOLS_CONFIG")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = compute_worktree_port("myproject", 5000).unwrap();

    assert!(stdout.contains(&format!("backend:  {} (derived)", expected)));
    assert!(stdout.contains(&format!(
        "frontend: {} (derived)",
        compute_worktree_port("myproject", 3000).unwrap()
    )));
}
