/*!
Integration tests for the HTTP-backed restore path.

Each test serves a canned response from a local TCP listener and points the
restore manager at it; no external network access is involved.
*/

use dump_core::{ArchiveStrategy, DumpError, LibraryArchiver, RemoteRestoreManager};
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Serve one HTTP response on a fresh local port and return the URI for it.
async fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        // Drain the request head before answering.
        let mut buf = vec![0u8; 4096];
        let mut seen = Vec::new();
        loop {
            match socket.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    seen.extend_from_slice(&buf[..n]);
                    if seen.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                Err(_) => return,
            }
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(&body).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/dump")
}

fn build_dump_bytes(source: &Path) -> Vec<u8> {
    let mut bytes = Vec::new();
    LibraryArchiver::new()
        .write_archive(source, &mut bytes)
        .unwrap();
    bytes
}

fn populate_source(root: &Path) {
    std::fs::create_dir(root.join("alpha")).unwrap();
    std::fs::write(root.join("alpha/a.txt"), b"hello").unwrap();
    std::fs::create_dir(root.join("beta")).unwrap();
    std::fs::write(root.join("beta/b.bin"), vec![7u8; 2048]).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_deploy_final() {
    let source = TempDir::new().unwrap();
    populate_source(source.path());
    let uri = serve_once("200 OK", "application/gzip", build_dump_bytes(source.path())).await;

    let restore_root = TempDir::new().unwrap();
    let manager = RemoteRestoreManager::new(restore_root.path());

    let returned = manager.from_uri(&uri).await.unwrap().deploy().await.unwrap();
    assert_eq!(returned, restore_root.path());

    assert_eq!(
        std::fs::read(restore_root.path().join("alpha/a.txt")).unwrap(),
        b"hello"
    );
    assert_eq!(
        std::fs::read(restore_root.path().join("beta/b.bin")).unwrap(),
        vec![7u8; 2048]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_deploy_temporary_suffixes_every_file() {
    let source = TempDir::new().unwrap();
    populate_source(source.path());
    let uri = serve_once("200 OK", "application/gzip", build_dump_bytes(source.path())).await;

    let restore_root = TempDir::new().unwrap();
    let manager = RemoteRestoreManager::new(restore_root.path());

    manager
        .from_uri(&uri)
        .await
        .unwrap()
        .deploy_temporary()
        .await
        .unwrap();

    // Staged files never collide with what a final deploy would write.
    assert!(restore_root.path().join("alpha/a.txt.tmp").is_file());
    assert!(restore_root.path().join("beta/b.bin.tmp").is_file());
    assert!(!restore_root.path().join("alpha/a.txt").exists());
    assert!(!restore_root.path().join("beta/b.bin").exists());

    // Once the staged tree has been validated, the root can be cleared.
    dump_core::FileDumpManager::new(restore_root.path())
        .empty()
        .await
        .unwrap();
    assert!(restore_root.path().is_dir());
    assert_eq!(std::fs::read_dir(restore_root.path()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_each_fetch_deploys_once() {
    let source = TempDir::new().unwrap();
    populate_source(source.path());

    // Two fetches, one per deployment mode; staged and final trees coexist.
    let restore_root = TempDir::new().unwrap();
    let manager = RemoteRestoreManager::new(restore_root.path());

    let uri = serve_once("200 OK", "application/gzip", build_dump_bytes(source.path())).await;
    manager.from_uri(&uri).await.unwrap().deploy().await.unwrap();

    let uri = serve_once("200 OK", "application/gzip", build_dump_bytes(source.path())).await;
    manager
        .from_uri(&uri)
        .await
        .unwrap()
        .deploy_temporary()
        .await
        .unwrap();

    assert!(restore_root.path().join("alpha/a.txt").is_file());
    assert!(restore_root.path().join("alpha/a.txt.tmp").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_archive_body_fails_typed() {
    let uri = serve_once("200 OK", "text/html", b"<html>not a dump</html>".to_vec()).await;

    let restore_root = TempDir::new().unwrap();
    let manager = RemoteRestoreManager::new(restore_root.path());

    let result = manager.from_uri(&uri).await.unwrap().deploy().await;
    assert!(matches!(result, Err(DumpError::Extraction(_))));

    // The failed restore wrote nothing into the root.
    assert_eq!(std::fs::read_dir(restore_root.path()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_is_transport_error() {
    let uri = serve_once("404 Not Found", "text/plain", b"missing".to_vec()).await;

    let restore_root = TempDir::new().unwrap();
    let manager = RemoteRestoreManager::new(restore_root.path());

    let result = manager.from_uri(&uri).await;
    assert!(matches!(result, Err(DumpError::Transport(_))));
}
