// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Holds JSON documents per collection with the same equality-filter
//! semantics as the Firestore backend. Used for local development and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::Filter;
use crate::error::AppError;

type Collection = BTreeMap<String, Value>;
type Collections = HashMap<String, Collection>;

/// Shared in-memory document store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

/// Exclusive view of the store inside [`MemoryStore::transaction`].
pub struct MemoryTx<'a> {
    collections: &'a mut Collections,
}

fn poisoned() -> AppError {
    AppError::Database("memory store lock poisoned".to_string())
}

fn encode<T: Serialize>(doc: &T) -> Result<Value, AppError> {
    serde_json::to_value(doc).map_err(|e| AppError::Database(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone()).map_err(|e| AppError::Database(e.to_string()))
}

fn matches(doc: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|(field, expected)| doc.get(*field).and_then(Value::as_str) == Some(expected.as_str()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a document by id.
    pub fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(decode)
            .transpose()
    }

    /// All documents whose string fields equal every filter value.
    pub fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, AppError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        docs.values()
            .filter(|doc| matches(doc, filters))
            .map(decode)
            .collect()
    }

    /// Create or replace a document.
    pub fn put<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError> {
        self.transaction(|tx| tx.put(collection, id, doc))
    }

    /// Delete a document. Returns whether it existed.
    pub fn remove(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        self.transaction(|tx| Ok(tx.remove(collection, id)))
    }

    /// Run `f` with exclusive access to every collection.
    ///
    /// Nothing else reads or writes the store until `f` returns.
    pub fn transaction<R>(
        &self,
        f: impl FnOnce(&mut MemoryTx<'_>) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let mut tx = MemoryTx {
            collections: &mut *collections,
        };
        f(&mut tx)
    }
}

impl MemoryTx<'_> {
    pub fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, AppError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        docs.values()
            .filter(|doc| matches(doc, filters))
            .map(decode)
            .collect()
    }

    pub fn put<T: Serialize>(
        &mut self,
        collection: &str,
        id: &str,
        doc: &T,
    ) -> Result<(), AppError> {
        let value = encode(doc)?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, collection: &str, id: &str) -> bool {
        self.collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some())
    }
}
