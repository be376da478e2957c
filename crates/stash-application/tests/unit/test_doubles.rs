//! Hand-written store and provider doubles
//!
//! `RecordingStore` keeps entries in a map, can be told to fail, can answer
//! in text instead of bytes, and records how many operations overlapped.

#![allow(dead_code)]
use async_trait::async_trait;
use stash_domain::error::{Error, Result};
use stash_domain::ports::{CacheProvider, CacheStore, StoreValue};
use stash_domain::value_objects::{CacheConfig, InvalidateOptions, Options};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct RecordingStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Vec<String>)>>,
    pub fail: AtomicBool,
    pub answer_as_text: AtomicBool,
    pub writes: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub op_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            op_delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        Arc::new(store)
    }

    pub fn insert_raw(&self, key: &str, raw: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (raw.to_vec(), Vec::new()));
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    async fn enter(&self, operation: &'static str) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.op_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::backend(operation, format!("{operation} error")));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        self.enter("get").await?;
        let raw = self.raw(key);
        Ok(raw.map(|bytes| {
            if self.answer_as_text.load(Ordering::SeqCst) {
                StoreValue::Text(String::from_utf8(bytes).unwrap())
            } else {
                StoreValue::Bytes(bytes)
            }
        }))
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: &Options) -> Result<()> {
        self.enter("set").await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, options.tags.clone()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.enter("delete").await?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn invalidate(&self, options: &InvalidateOptions) -> Result<()> {
        self.enter("invalidate").await?;
        self.entries
            .lock()
            .unwrap()
            .retain(|_, (_, tags)| !tags.iter().any(|tag| options.tags.contains(tag)));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.enter("clear").await?;
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.enter("ping").await
    }
}

/// Provider whose validate/ping outcomes are fixed at construction
#[derive(Debug)]
pub struct StubProvider {
    pub driver: &'static str,
    pub validate_error: Option<fn() -> Error>,
    pub ping_error: Option<fn() -> Error>,
    pub store: Arc<RecordingStore>,
    pub pinged: AtomicBool,
}

impl StubProvider {
    pub fn healthy(driver: &'static str) -> Self {
        Self {
            driver,
            validate_error: None,
            ping_error: None,
            store: RecordingStore::new(),
            pinged: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl CacheProvider for StubProvider {
    fn driver(&self) -> &'static str {
        self.driver
    }

    fn validate(&self) -> Result<()> {
        match self.validate_error {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    async fn ping(&self) -> Result<()> {
        self.pinged.store(true, Ordering::SeqCst);
        match self.ping_error {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn store(&self) -> Result<Arc<dyn CacheStore>> {
        let store: Arc<dyn CacheStore> = self.store.clone();
        Ok(store)
    }
}

pub fn stub_factory(_config: &CacheConfig) -> Box<dyn CacheProvider> {
    Box::new(StubProvider::healthy("stub"))
}

pub fn unreachable_factory(_config: &CacheConfig) -> Box<dyn CacheProvider> {
    Box::new(StubProvider {
        ping_error: Some(|| {
            Error::connection_with_source(
                "unreachable",
                "connection refused",
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            )
        }),
        ..StubProvider::healthy("unreachable")
    })
}

pub fn misconfigured_factory(_config: &CacheConfig) -> Box<dyn CacheProvider> {
    Box::new(StubProvider {
        validate_error: Some(|| Error::invalid_config("misconfigured", "no address defined")),
        ..StubProvider::healthy("misconfigured")
    })
}
