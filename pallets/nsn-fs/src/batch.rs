// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Per-item isolation for batch calls.

use crate::{BatchKind, Config, Event, FileHashOf, ItemFailure, Pallet, LOG_TARGET};
use alloc::vec::Vec;
use frame_support::{pallet_prelude::DispatchResult, storage::with_storage_layer, BoundedVec};

/// Collects rejected items of one batch call.
///
/// Each item runs in its own storage layer, so a failing item leaves no
/// partial writes behind while earlier and later items still apply.
pub(crate) struct BatchErrors<T: Config> {
    kind: BatchKind,
    failures: Vec<ItemFailure<T>>,
}

impl<T: Config> BatchErrors<T> {
    pub(crate) fn new(kind: BatchKind) -> Self {
        Self {
            kind,
            failures: Vec::new(),
        }
    }

    /// Run one item, recording its error against `file_hash` if it fails.
    pub(crate) fn run<F>(&mut self, file_hash: &FileHashOf<T>, item: F)
    where
        F: FnOnce() -> DispatchResult,
    {
        if let Err(error) = with_storage_layer(item) {
            log::debug!(
                target: LOG_TARGET,
                "{:?} item {:?} rejected: {:?}",
                self.kind,
                file_hash,
                error,
            );
            self.failures.push(ItemFailure {
                file_hash: file_hash.clone(),
                error,
            });
        }
    }

    /// Deposit the collected failures as a single event, if there are any.
    pub(crate) fn emit(self) {
        if self.failures.is_empty() {
            return;
        }
        // one entry per item, and items are bounded by MaxFilesPerCall
        let failures = BoundedVec::truncate_from(self.failures);
        Pallet::<T>::deposit_event(Event::BatchItemsFailed {
            kind: self.kind,
            failures,
        });
    }
}
