// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory remote store for sync and station tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use hp_core::{PassRow, StudentRow};
use tokio::sync::mpsc;

use super::store::{PassClose, RemoteStore, StoreError, StoreFuture};

/// A remote store backed by vectors, with switchable failures and a
/// manually triggered notification channel.
#[derive(Default)]
pub struct MockStore {
    active: Mutex<Vec<PassRow>>,
    students: Mutex<Vec<StudentRow>>,
    writes: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
    fail_fetches: AtomicBool,
    failing_subscribes: AtomicU32,
    subscriptions: AtomicU32,
    fetches: AtomicU32,
    notifier: Mutex<Option<mpsc::Sender<()>>>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(MockStore::default())
    }

    pub fn set_active(&self, rows: Vec<PassRow>) {
        *self.active.lock().unwrap() = rows;
    }

    pub fn active(&self) -> Vec<PassRow> {
        self.active.lock().unwrap().clone()
    }

    pub fn set_students(&self, rows: Vec<StudentRow>) {
        *self.students.lock().unwrap() = rows;
    }

    pub fn students(&self) -> Vec<StudentRow> {
        self.students.lock().unwrap().clone()
    }

    /// Labels of attempted writes, e.g. `insert_pass:<id>`.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Makes the next `n` subscribe calls fail.
    pub fn fail_next_subscribes(&self, n: u32) {
        self.failing_subscribes.store(n, Ordering::SeqCst);
    }

    /// Number of successful subscriptions so far.
    pub fn subscriptions(&self) -> u32 {
        self.subscriptions.load(Ordering::SeqCst)
    }

    /// Number of `fetch_active` calls so far.
    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Sends one change notification to the current subscriber.
    pub fn notify(&self) -> bool {
        match self.notifier.lock().unwrap().as_ref() {
            Some(tx) => tx.try_send(()).is_ok(),
            None => false,
        }
    }

    /// Ends the current subscription, as a dropped connection would.
    pub fn drop_subscription(&self) {
        self.notifier.lock().unwrap().take();
    }

    fn record(&self, label: String) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(label);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionFailed("mock write failure".into()));
        }
        Ok(())
    }

    fn check_fetch(&self) -> Result<(), StoreError> {
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout);
        }
        Ok(())
    }
}

impl RemoteStore for MockStore {
    fn fetch_active(&self, tenant_id: &str) -> StoreFuture<'_, Vec<PassRow>> {
        let tenant_id = tenant_id.to_string();
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.check_fetch()?;
            Ok(self
                .active()
                .into_iter()
                .filter(|r| r.tenant_id == tenant_id && r.end_time.is_none())
                .collect())
        })
    }

    fn fetch_roster(&self, tenant_id: &str) -> StoreFuture<'_, Vec<StudentRow>> {
        let tenant_id = tenant_id.to_string();
        Box::pin(async move {
            self.check_fetch()?;
            Ok(self
                .students()
                .into_iter()
                .filter(|r| r.tenant_id == tenant_id)
                .collect())
        })
    }

    fn insert_pass(&self, row: PassRow) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.record(format!("insert_pass:{}", row.id))?;
            self.active.lock().unwrap().insert(0, row);
            Ok(())
        })
    }

    fn close_pass(&self, close: PassClose) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.record(format!("close_pass:{}", close.id))?;
            self.active
                .lock()
                .unwrap()
                .retain(|r| !(r.id == close.id && r.tenant_id == close.tenant_id));
            Ok(())
        })
    }

    fn upsert_student(&self, row: StudentRow) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.record(format!("upsert_student:{}", row.student_id))?;
            let mut students = self.students.lock().unwrap();
            students.retain(|s| !(s.student_id == row.student_id && s.tenant_id == row.tenant_id));
            students.push(row);
            Ok(())
        })
    }

    fn subscribe(&self, _tenant_id: &str) -> StoreFuture<'_, mpsc::Receiver<()>> {
        Box::pin(async move {
            let failing = self.failing_subscribes.load(Ordering::SeqCst);
            if failing > 0 {
                self.failing_subscribes.store(failing - 1, Ordering::SeqCst);
                return Err(StoreError::ConnectionFailed("mock subscribe failure".into()));
            }
            let (tx, rx) = mpsc::channel(16);
            *self.notifier.lock().unwrap() = Some(tx);
            self.subscriptions.fetch_add(1, Ordering::SeqCst);
            Ok(rx)
        })
    }
}
