//! End-to-end pipeline tests over an in-memory store and a real temp
//! directory: the commit → sync → build lifecycle a project actually runs.

use std::fs;

use phasenv_core::{InheritanceGraph, Phase};
use phasenv_store::{MemoryStore, SecretStore};
use phasenv_sync::{build, commit, pull, EnvPaths, SyncError};
use tempfile::TempDir;

fn paths(tmp: &TempDir) -> EnvPaths {
    EnvPaths::with_defaults(tmp.path())
}

#[test]
fn commit_then_build_roundtrip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::with_graph(InheritanceGraph::default_hierarchy());

    // A developer commits their local env.
    fs::write(tmp.path().join(".env"), "DB_HOST=localhost\nDB_PORT=5432\n").unwrap();
    let outcome = commit(&store, &Phase::from("local"), &paths(&tmp)).expect("commit");
    assert_eq!(outcome.write.written, 2);
    assert_eq!(outcome.template_added, ["DB_HOST", "DB_PORT"]);

    // Build for prod: nothing set above local, so values inherit all the way
    // down and carry the source annotation.
    let result = build(&store, &Phase::from("prod"), &paths(&tmp)).expect("build");
    assert_eq!(result.chain.len(), 4);

    let rendered = fs::read_to_string(tmp.path().join(".env")).unwrap();
    assert!(rendered.contains("DB_HOST=localhost\t\t# From 'local'"));
    assert!(rendered.contains("DB_PORT=5432\t\t# From 'local'"));
}

#[test]
fn sync_appends_only_undeclared_keys() {
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::new();

    // Template already declares A with a manual expression.
    let manual_line = "A={{ load_common(key=\"A\") }}\n";
    fs::write(tmp.path().join(".env.template"), manual_line).unwrap();

    // Store collectively knows A, B and C after this commit.
    fs::write(tmp.path().join(".env"), "A=1\nB=2\nC=3\n").unwrap();
    let outcome = commit(&store, &Phase::from("local"), &paths(&tmp)).expect("commit");
    assert_eq!(outcome.template_added, ["B", "C"]);

    let template = fs::read_to_string(tmp.path().join(".env.template")).unwrap();
    assert!(template.starts_with(manual_line), "manual A line untouched");
    assert!(template.contains("B={{ load_inheritance(key=\"B\") }}\n"));
    assert!(template.contains("C={{ load_inheritance(key=\"C\") }}\n"));
}

#[test]
fn nearer_phase_shadows_ancestors_in_build() {
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::with_graph(InheritanceGraph::default_hierarchy());
    store.seed("stage", &[("X", "s")]);
    store.seed("dev", &[("X", "d")]);
    fs::write(
        tmp.path().join(".env.template"),
        "X={{ load_inheritance(key=\"X\") }}\n",
    )
    .unwrap();

    build(&store, &Phase::from("prod"), &paths(&tmp)).expect("build");
    let rendered = fs::read_to_string(tmp.path().join(".env")).unwrap();
    assert!(
        rendered.contains("X=s\t\t# From 'stage'"),
        "stage shadows dev: {rendered}"
    );
}

#[test]
fn pull_uses_common_but_not_ancestors() {
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::with_graph(InheritanceGraph::default_hierarchy());
    store.seed("common", &[("SHARED", "everywhere")]);
    store.seed("local", &[("ONLY_LOCAL", "yes")]);
    fs::write(
        tmp.path().join(".env.template"),
        "SHARED={{ load_common(key=\"SHARED\") }}\nL={{ load_inheritance(key=\"ONLY_LOCAL\") }}\n",
    )
    .unwrap();

    pull(&store, &Phase::from("dev"), &paths(&tmp)).expect("pull");
    let rendered = fs::read_to_string(tmp.path().join(".env")).unwrap();
    // common is always fetched; the ancestor walk is not (chain is [dev]).
    assert_eq!(rendered, "SHARED=everywhere\nL=\n");
}

#[test]
fn strict_build_surfaces_missing_key_by_name() {
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::new();
    fs::write(
        tmp.path().join(".env.template"),
        "S={{ load(key=\"SECRET_TOKEN\") }}\n",
    )
    .unwrap();

    let err = build(&store, &Phase::from("prod"), &paths(&tmp)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("SECRET_TOKEN"), "error names the key: {message}");
    assert!(message.contains("load"), "error names the primitive: {message}");
    assert!(matches!(err, SyncError::Render(_)));
}

#[test]
fn commit_creates_template_on_first_use() {
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::new();
    fs::write(tmp.path().join(".env"), "A=1\n").unwrap();

    assert!(!tmp.path().join(".env.template").exists());
    commit(&store, &Phase::from("local"), &paths(&tmp)).expect("commit");
    assert!(tmp.path().join(".env.template").exists());
}

#[test]
fn custom_target_and_template_names_are_respected() {
    let tmp = TempDir::new().expect("tempdir");
    let store = MemoryStore::new();
    let paths = EnvPaths::new(tmp.path(), ".env.stage", "env.tmpl");
    fs::write(tmp.path().join(".env.stage"), "A=1\n").unwrap();

    commit(&store, &Phase::from("stage"), &paths).expect("commit");
    assert!(tmp.path().join("env.tmpl").exists());
    assert_eq!(
        store.read(&Phase::from("stage")).get("A"),
        Some(&"1".to_string())
    );
}
