use super::*;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::net::TcpListener;

type Store = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// How the fake server treats each connection
#[derive(Clone, Copy)]
enum Behavior {
    /// Store everything
    Store,
    /// Answer with a fixed line
    Reply(&'static str),
    /// Store one item, then hang up
    CloseAfterOne,
    /// Read requests, never answer
    Silent,
}

/// Minimal memcached that understands `set`
async fn fake_memcached(behavior: Behavior) -> (String, Store) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("failed to get addr");
    let store: Store = Arc::default();

    let server_store = Arc::clone(&store);
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            let store = Arc::clone(&server_store);
            tokio::spawn(serve(socket, store, behavior));
        }
    });

    (addr.to_string(), store)
}

async fn serve(socket: TcpStream, store: Store, behavior: Behavior) {
    let mut stream = BufReader::new(socket);
    loop {
        let mut header = String::new();
        if stream.read_line(&mut header).await.unwrap_or(0) == 0 {
            return;
        }
        let parts: Vec<&str> = header.split_whitespace().collect();
        assert_eq!(parts[0], "set");
        assert_eq!(&parts[2..4], ["0", "0"]);
        let len: usize = parts[4].parse().unwrap();

        let mut body = vec![0u8; len + 2];
        stream.read_exact(&mut body).await.unwrap();
        assert_eq!(&body[len..], b"\r\n");
        body.truncate(len);

        let reply = match behavior {
            Behavior::Store | Behavior::CloseAfterOne => {
                store.lock().insert(parts[1].to_string(), body);
                "STORED\r\n"
            }
            Behavior::Reply(line) => line,
            Behavior::Silent => continue,
        };
        stream.get_mut().write_all(reply.as_bytes()).await.unwrap();

        if matches!(behavior, Behavior::CloseAfterOne) {
            return;
        }
    }
}

fn fast_options() -> SinkOptions {
    SinkOptions::default()
        .with_connect_timeout(Duration::from_millis(500))
        .with_io_timeout(Duration::from_millis(200))
        .with_retry_interval(Duration::from_millis(10))
}

// =============================================================================
// Successful sets
// =============================================================================

#[tokio::test]
async fn test_set_stores_value() {
    let (addr, store) = fake_memcached(Behavior::Store).await;
    let mut client = MemcacheClient::new(addr, fast_options());

    assert!(!client.is_connected());
    client
        .set("idfa:1rfw452y52g2gq4g", b"\x08\x01\x08\x02")
        .await
        .unwrap();

    assert!(client.is_connected());
    assert_eq!(
        store.lock().get("idfa:1rfw452y52g2gq4g").unwrap(),
        b"\x08\x01\x08\x02"
    );
}

#[tokio::test]
async fn test_value_with_crlf_is_length_framed() {
    let (addr, store) = fake_memcached(Behavior::Store).await;
    let mut client = MemcacheClient::new(addr, fast_options());

    client.set("gaid:dev", b"a\r\nb").await.unwrap();
    assert_eq!(store.lock().get("gaid:dev").unwrap(), b"a\r\nb");
}

#[tokio::test]
async fn test_connection_reused_across_sets() {
    let (addr, store) = fake_memcached(Behavior::Store).await;
    let mut client = MemcacheClient::new(addr, fast_options());

    for i in 0..10 {
        client.set(&format!("idfa:{i}"), b"v").await.unwrap();
    }

    assert_eq!(client.connect_count(), 1);
    assert_eq!(store.lock().len(), 10);
}

#[tokio::test]
async fn test_reconnects_after_server_hangup() {
    let (addr, store) = fake_memcached(Behavior::CloseAfterOne).await;
    let mut client = MemcacheClient::new(addr, fast_options());

    client.set("idfa:first", b"1").await.unwrap();
    client.set("idfa:second", b"2").await.unwrap();

    assert_eq!(client.connect_count(), 2);
    assert_eq!(store.lock().len(), 2);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_rejection_is_not_retried() {
    let (addr, _store) = fake_memcached(Behavior::Reply("SERVER_ERROR out of memory\r\n")).await;
    let mut client = MemcacheClient::new(addr, fast_options());

    let err = client.set("idfa:dev", b"v").await.unwrap_err();
    match err {
        SinkError::Rejected { reply } => assert_eq!(reply, "SERVER_ERROR out of memory"),
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert_eq!(client.connect_count(), 1);
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_invalid_key_never_connects() {
    let (addr, _store) = fake_memcached(Behavior::Store).await;
    let mut client = MemcacheClient::new(addr, fast_options());

    let err = client.set("idfa:has space", b"v").await.unwrap_err();
    assert!(matches!(err, SinkError::InvalidKey { .. }));
    assert_eq!(client.connect_count(), 0);
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    // Grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut client = MemcacheClient::new(addr, fast_options().with_retry_attempts(2));
    let err = client.set("idfa:dev", b"v").await.unwrap_err();

    match err {
        SinkError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("connection"), "{last_error}");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(client.connect_count(), 0);
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let (addr, _store) = fake_memcached(Behavior::Silent).await;
    let options = fast_options()
        .with_io_timeout(Duration::from_millis(50))
        .with_retry_attempts(1);
    let mut client = MemcacheClient::new(addr, options);

    let err = client.set("idfa:dev", b"v").await.unwrap_err();
    match err {
        SinkError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 1);
            assert!(last_error.contains("timed out"), "{last_error}");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert!(!client.is_connected());
}

#[test]
fn test_debug_shows_address() {
    let client = MemcacheClient::new("127.0.0.1:33013", SinkOptions::default());
    let debug = format!("{client:?}");
    assert!(debug.contains("127.0.0.1:33013"));
    assert!(debug.contains("connected: false"));
}
