// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use catalog_core::memory::{MemoryCatalogStore, MemoryObjectStore};
use catalog_core::{CatalogService, ObjectStore};
use parking_lot::Mutex;
use std::io;
use std::pin::Pin;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};
use tracing::Level;

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Put counter shared by the object store doubles ---
pub static PUT_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  PUT_COUNTER.store(0, Ordering::SeqCst);
}

pub fn puts() -> usize {
  PUT_COUNTER.load(Ordering::SeqCst)
}

// --- Object store doubles ---

/// Records every put in completion order. A file name listed in `delays`
/// sleeps that long before it is stored; one listed in `failing` is rejected.
#[derive(Debug, Default)]
pub struct RecordingObjectStore {
  pub completed: Mutex<Vec<String>>,
  delays: Vec<(&'static str, Duration)>,
  failing: Vec<&'static str>,
}

impl RecordingObjectStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_delay(mut self, file_name: &'static str, delay: Duration) -> Self {
    self.delays.push((file_name, delay));
    self
  }

  pub fn failing_on(mut self, file_name: &'static str) -> Self {
    self.failing.push(file_name);
    self
  }

  pub fn completed(&self) -> Vec<String> {
    self.completed.lock().clone()
  }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
  async fn put_object(&self, key: &str, _body: Bytes, _content_type: Option<&str>) -> anyhow::Result<String> {
    PUT_COUNTER.fetch_add(1, Ordering::SeqCst);
    let delay = self
      .delays
      .iter()
      .find(|(name, _)| key.ends_with(name))
      .map(|(_, delay)| *delay);
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }
    if self.failing.iter().any(|name| key.ends_with(name)) {
      return Err(anyhow!("AccessDenied: bucket refused {}", key));
    }
    self.completed.lock().push(key.to_string());
    Ok(format!("https://bucket.test/{}", key))
  }
}

/// Counts puts, then stores in memory.
#[derive(Debug, Default)]
pub struct CountingObjectStore {
  pub inner: MemoryObjectStore,
}

#[async_trait]
impl ObjectStore for CountingObjectStore {
  async fn put_object(&self, key: &str, body: Bytes, content_type: Option<&str>) -> anyhow::Result<String> {
    PUT_COUNTER.fetch_add(1, Ordering::SeqCst);
    self.inner.put_object(key, body, content_type).await
  }
}

// --- Attachment stream that breaks mid-read ---
pub struct BrokenReader;

impl AsyncRead for BrokenReader {
  fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
    Poll::Ready(Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection reset by client")))
  }
}

// --- Service fixtures ---
pub struct Fixture {
  pub service: CatalogService,
  pub store: Arc<MemoryCatalogStore>,
  pub objects: Arc<CountingObjectStore>,
}

pub fn fixture() -> Fixture {
  let store = Arc::new(MemoryCatalogStore::new());
  let objects = Arc::new(CountingObjectStore::default());
  let service = CatalogService::new(store.clone(), objects.clone());
  Fixture { service, store, objects }
}
