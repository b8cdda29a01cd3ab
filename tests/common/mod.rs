#![allow(dead_code)]

use axum_test::TestServer;
use go_shortener::domain::deletion_worker::DeletionPool;
use go_shortener::domain::entities::Record;
use go_shortener::domain::repositories::RecordRepository;
use go_shortener::infrastructure::persistence::MemoryRecordRepository;
use go_shortener::routes::router;
use go_shortener::state::AppState;
use go_shortener::utils::trusted_subnet::TrustedSubnet;
use std::sync::Arc;

pub const BASE_URL: &str = "http://short.test";
pub const TRUSTED_SUBNET: &str = "10.0.0.0/8";

/// State over an empty in-memory store, with [`TRUSTED_SUBNET`] configured.
pub fn create_test_state() -> AppState {
    create_test_state_with(Arc::new(MemoryRecordRepository::new()))
}

/// State over `records`, preloaded into an in-memory store.
pub fn create_seeded_state(records: Vec<Record>) -> AppState {
    create_test_state_with(Arc::new(MemoryRecordRepository::with_records(records)))
}

pub fn create_test_state_with(repository: Arc<dyn RecordRepository>) -> AppState {
    let pool = Arc::new(DeletionPool::start(repository.clone(), 2, 64));
    let subnet = TrustedSubnet::parse(TRUSTED_SUBNET).unwrap();

    AppState::new(repository, pool, BASE_URL, subnet)
}

/// Server over the full router, middleware included.
pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub fn record(key: &str, url: &str, owner: &str) -> Record {
    Record::new(key.to_string(), url.to_string(), owner.to_string())
}

pub fn deleted_record(key: &str, url: &str, owner: &str) -> Record {
    let mut record = record(key, url, owner);
    record.is_deleted = true;
    record
}

/// `Cookie` header value identifying `owner`.
pub fn caller(owner: &str) -> String {
    format!("user_id={}", owner)
}

/// Last path segment of a short URL.
pub fn key_of(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}
