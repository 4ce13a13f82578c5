//! Integration tests for the history core.
//!
//! Exercises the cross-backend properties that unit tests cannot: both
//! backends converging under concurrent writers, export/import round trips
//! across service instances, and recovery from a corrupted mirror log.

use api_tester::config::StorageConfig;
use api_tester::history::{HistoryService, MirrorLog};
use api_tester::models::{DispatchOutcome, HttpMethod, RequestSpec};
use api_tester::HistoryEntry;
use std::collections::HashMap;
use std::sync::{Arc, Once};
use std::thread;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn test_entry(method: HttpMethod, url: &str, status: u16) -> HistoryEntry {
    let mut spec = RequestSpec::new(method, url);
    spec.add_header("Accept".to_string(), "application/json".to_string());
    spec.set_body("{\"probe\": true}".to_string());

    let mut response_headers = HashMap::new();
    response_headers.insert("Content-Type".to_string(), "application/json".to_string());
    response_headers.insert("Server".to_string(), "test".to_string());

    HistoryEntry::from_exchange(
        spec,
        DispatchOutcome {
            status,
            headers: response_headers,
            body: "{\"ok\": true}".to_string(),
            elapsed_ms: 17.5,
        },
    )
}

#[test]
fn concurrent_record_exchange_loses_no_updates() {
    init_test_env();
    let dir = TempDir::new().unwrap();
    let service = Arc::new(HistoryService::new(&StorageConfig::in_dir(dir.path())).unwrap());

    let threads = 8;
    let per_thread = 5;
    let mut handles = Vec::new();
    for t in 0..threads {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for i in 0..per_thread {
                let entry = test_entry(
                    HttpMethod::GET,
                    &format!("https://example.com/t{}/r{}", t, i),
                    200,
                );
                service.record_exchange(&entry).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let total = threads * per_thread;
    assert_eq!(service.store().count().unwrap(), total);

    let mirrored = MirrorLog::new(dir.path().join("history.json")).read_entries();
    assert_eq!(mirrored.len(), total);

    // Ids are unique and the recency listing is strictly descending.
    let summaries = service.browse(total).unwrap();
    assert_eq!(summaries.len(), total);
    for pair in summaries.windows(2) {
        assert!(pair[0].id > pair[1].id);
    }
}

#[test]
fn export_then_import_reproduces_entries_on_fresh_store() {
    init_test_env();
    let dir = TempDir::new().unwrap();
    let service = HistoryService::new(&StorageConfig::in_dir(dir.path())).unwrap();

    let originals = vec![
        test_entry(HttpMethod::GET, "https://example.com/a", 200),
        test_entry(HttpMethod::POST, "https://example.com/b", 201),
        test_entry(HttpMethod::DELETE, "https://example.com/c", 204),
    ];
    for entry in &originals {
        service.record_exchange(entry).unwrap();
    }

    let export_path = dir.path().join("export.json");
    assert_eq!(service.export_to(&export_path).unwrap(), 3);

    let fresh_dir = TempDir::new().unwrap();
    let fresh = HistoryService::new(&StorageConfig::in_dir(fresh_dir.path())).unwrap();
    assert_eq!(fresh.import_from(&export_path).unwrap(), 3);

    let imported = fresh.store().list_all().unwrap();
    assert_eq!(imported.len(), 3);
    for (original, copy) in originals.iter().zip(&imported) {
        assert_eq!(copy.method, original.method);
        assert_eq!(copy.url, original.url);
        assert_eq!(copy.headers, original.headers);
        assert_eq!(copy.body, original.body);
        assert_eq!(copy.response_status, original.response_status);
        assert_eq!(copy.response_headers, original.response_headers);
        assert_eq!(copy.response_body, original.response_body);
        assert_eq!(copy.time_ms, original.time_ms);
        assert_eq!(copy.timestamp, original.timestamp);
        // Only the id differs: it is reassigned by the fresh store.
        assert!(copy.id.is_some());
    }

    // Imported entries reached the fresh mirror as well.
    let mirrored = MirrorLog::new(fresh_dir.path().join("history.json")).read_entries();
    assert_eq!(mirrored.len(), 3);
}

#[test]
fn corrupt_mirror_does_not_block_recording() {
    init_test_env();
    let dir = TempDir::new().unwrap();
    let mirror_path = dir.path().join("history.json");
    std::fs::write(&mirror_path, "[{ this was truncated mid-write").unwrap();

    let service = HistoryService::new(&StorageConfig::in_dir(dir.path())).unwrap();
    service
        .record_exchange(&test_entry(HttpMethod::GET, "https://example.com", 200))
        .unwrap();

    // The corrupt content was discarded and the log restarted cleanly.
    let mirrored = MirrorLog::new(&mirror_path).read_entries();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].url, "https://example.com");
}

#[test]
fn history_survives_service_restart() {
    init_test_env();
    let dir = TempDir::new().unwrap();
    let config = StorageConfig::in_dir(dir.path());

    let id = {
        let service = HistoryService::new(&config).unwrap();
        service
            .record_exchange(&test_entry(HttpMethod::PUT, "https://example.com/persist", 200))
            .unwrap()
    };

    let reopened = HistoryService::new(&config).unwrap();
    let fetched = reopened.fetch(id).unwrap().unwrap();
    assert_eq!(fetched.url, "https://example.com/persist");
    assert_eq!(fetched.method, HttpMethod::PUT);
}

#[test]
fn dispatched_request_lands_in_both_backends() {
    init_test_env();
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/widgets")
        .with_status(201)
        .with_header("Content-Type", "application/json")
        .with_body("{\"id\": 99}")
        .create();

    let dir = TempDir::new().unwrap();
    let service = HistoryService::new(&StorageConfig::in_dir(dir.path())).unwrap();

    let mut spec = RequestSpec::new(HttpMethod::POST, format!("{}/widgets", server.url()));
    spec.add_header("Content-Type".to_string(), "application/json".to_string());
    spec.set_body("{\"name\": \"w\"}".to_string());

    let entry =
        api_tester::executor::execute_exchange(&service, spec, api_tester::executor::DEFAULT_TIMEOUT_SECS)
            .unwrap();
    assert_eq!(entry.response_status, 201);

    let summaries = service.browse_recent().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].response_status, 201);

    let mirrored = MirrorLog::new(dir.path().join("history.json")).read_entries();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].response_body, "{\"id\": 99}");
}
