//! End-to-end console workflows
//!
//! These tests drive complete command sequences through the handler the
//! way the interactive loop would, including copies between the managed
//! store, the local disk, and the secondary store.

use std::io::Read;

use cli_console::{CommandHandler, CommandOutcome, Session};
use console_log::{LogLevel, LogSink, Logger, MemorySink};
use fs_store::{
    FileStore, InProcessTransport, LocalStore, MemoryStore, RemoteStore,
};
use tempfile::TempDir;

fn new_handler() -> CommandHandler<MemoryStore> {
    let mut store = MemoryStore::new();
    let session = Session::bootstrap("/usr", "me", &mut store).unwrap();
    let logger = Logger::new(LogLevel::Error, Box::new(MemorySink::new()) as Box<dyn LogSink>);
    CommandHandler::new(store, session, logger)
}

fn lines(handler: &mut CommandHandler<MemoryStore>, line: &str) -> Vec<String> {
    match handler.execute(line) {
        CommandOutcome::Output(lines) => lines,
        other => panic!("expected output for '{}', got {:?}", line, other),
    }
}

fn tmp_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().replace('\\', "/")
}

#[test]
fn test_browse_create_delete_workflow() {
    let mut handler = new_handler();

    lines(&mut handler, "mkdir docs");
    lines(&mut handler, "cd docs");
    lines(&mut handler, "newfile todo.txt buy more disks");
    lines(&mut handler, "touch empty.txt");

    let listing = lines(&mut handler, "ls");
    assert_eq!(listing[0], "Found 2 items");

    assert_eq!(
        lines(&mut handler, "cat todo.txt"),
        vec!["buy more disks"]
    );

    lines(&mut handler, "cd ..");
    assert_eq!(
        lines(&mut handler, "rm docs"),
        vec!["rm: docs: The folder is not empty"]
    );
    assert!(lines(&mut handler, "rmr docs").is_empty());
    assert_eq!(lines(&mut handler, "ls"), vec!["Found 0 items"]);
}

#[test]
fn test_copy_from_local_and_back() {
    let dir = TempDir::new().unwrap();
    let mut local = LocalStore::new();
    local
        .create_file_bytes(&tmp_path(&dir, "in/a.txt"), b"hi")
        .unwrap();
    local
        .create_file_bytes(&tmp_path(&dir, "in/sub/b.txt"), b"yo")
        .unwrap();

    let mut handler = new_handler();

    // Local tree into the managed store.
    let command = format!("copyfromlocal {} tree", tmp_path(&dir, "in"));
    assert!(lines(&mut handler, &command).is_empty());

    assert_eq!(lines(&mut handler, "cat tree/a.txt"), vec!["hi"]);
    assert_eq!(lines(&mut handler, "cat tree/sub/b.txt"), vec!["yo"]);

    // Managed tree back onto the local disk.
    let out_root = tmp_path(&dir, "out");
    let command = format!("copytolocal tree {}", out_root);
    assert!(lines(&mut handler, &command).is_empty());

    let mut content = String::new();
    local
        .read_file(&format!("{}/a.txt", out_root))
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "hi");

    content.clear();
    local
        .read_file(&format!("{}/sub/b.txt", out_root))
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "yo");
}

#[test]
fn test_copy_from_local_refuses_folder_dest() {
    let dir = TempDir::new().unwrap();
    let mut local = LocalStore::new();
    local
        .create_file_bytes(&tmp_path(&dir, "a.txt"), b"hi")
        .unwrap();

    let mut handler = new_handler();
    lines(&mut handler, "mkdir docs");

    let command = format!("copyfromlocal {} docs", tmp_path(&dir, "a.txt"));
    assert_eq!(
        lines(&mut handler, &command),
        vec!["Destination path is a folder"]
    );
}

#[test]
fn test_copy_from_local_missing_source() {
    let dir = TempDir::new().unwrap();
    let mut handler = new_handler();

    let source = tmp_path(&dir, "ghost.txt");
    let command = format!("copyfromlocal {} dest.txt", source);
    assert_eq!(
        lines(&mut handler, &command),
        vec![format!("Source '{}' does not exist", source)]
    );
}

#[test]
fn test_copy_to_local_file_into_existing_dir() {
    let dir = TempDir::new().unwrap();
    let mut handler = new_handler();
    lines(&mut handler, "newfile report.txt the content");

    let dest_root = dir.path().to_string_lossy().replace('\\', "/");
    let command = format!("copytolocal report.txt {}", dest_root);
    assert!(lines(&mut handler, &command).is_empty());

    // The file lands inside the directory under its own name.
    let mut local = LocalStore::new();
    let mut content = String::new();
    local
        .read_file(&format!("{}/report.txt", dest_root))
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "the content");
}

#[test]
fn test_copy_to_local_refuses_populated_dest() {
    let dir = TempDir::new().unwrap();
    let mut local = LocalStore::new();
    local
        .create_file_bytes(&tmp_path(&dir, "out/old.txt"), b"old")
        .unwrap();

    let mut handler = new_handler();
    lines(&mut handler, "newfile tree/a.txt fresh");

    let command = format!("copytolocal tree {}", tmp_path(&dir, "out"));
    let output = lines(&mut handler, &command);
    assert_eq!(output.len(), 1);
    assert!(output[0].contains("is not empty"));

    // The old file is untouched.
    let mut content = String::new();
    local
        .read_file(&tmp_path(&dir, "out/old.txt"))
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "old");
}

#[test]
fn test_copy_to_and_from_secondary_store() {
    let mut handler = new_handler();
    handler.attach_remote(
        "node1:7000",
        Box::new(RemoteStore::new(InProcessTransport::new(MemoryStore::new()))),
    );

    lines(&mut handler, "newfile data/a.txt first");
    lines(&mut handler, "newfile data/sub/b.txt second");

    assert!(lines(&mut handler, "copytoremote data store://node1:7000/mirror").is_empty());

    // Wipe the managed copy, then restore it from the secondary store.
    lines(&mut handler, "rmr data");
    assert_eq!(lines(&mut handler, "ls"), vec!["Found 0 items"]);

    assert!(lines(&mut handler, "copyfromremote store://node1:7000/mirror data").is_empty());
    assert_eq!(lines(&mut handler, "cat data/a.txt"), vec!["first"]);
    assert_eq!(lines(&mut handler, "cat data/sub/b.txt"), vec!["second"]);
}

#[test]
fn test_copy_remote_endpoint_mismatch() {
    let mut handler = new_handler();
    handler.attach_remote(
        "node1:7000",
        Box::new(RemoteStore::new(InProcessTransport::new(MemoryStore::new()))),
    );

    let output = lines(&mut handler, "copyfromremote store://other:9000/data dest");
    assert_eq!(output, vec!["Not connected to 'other:9000'"]);
}

#[test]
fn test_platform_flavored_path_accepted() {
    let mut handler = new_handler();
    lines(&mut handler, "mkdir /data");

    // A pasted platform path resolves into the managed namespace.
    assert!(lines(&mut handler, "cd C:\\data").is_empty());
    match handler.execute("pwd") {
        CommandOutcome::Output(output) => assert_eq!(output, vec!["/data"]),
        other => panic!("expected output, got {:?}", other),
    }
}
