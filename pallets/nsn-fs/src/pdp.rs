// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! PDP record settlement.
//!
//! Records are created by the proof path. This module only consumes them when
//! a file is deleted or changes owner. The `settled` flag guarantees a node's
//! capacity is credited back at most once per record.

use crate::{
    Config, Error, Event, FileHashOf, FileInfo, Files, Pallet, PdpRecord, PdpRecords,
    StorageNodeRegistry, LOG_TARGET,
};
use alloc::vec::Vec;
use frame_support::{ensure, pallet_prelude::DispatchResult};

impl<T: Config> Pallet<T> {
    /// Open an unsettled PDP record for a node holding a stored file.
    ///
    /// Entry point for the proof-submission path. Re-recording an existing
    /// (file, node) pair keeps the record as it is.
    pub fn record_pdp(
        file_hash: &FileHashOf<T>,
        file_owner: &T::AccountId,
        node: &T::AccountId,
    ) -> DispatchResult {
        ensure!(
            Files::<T>::contains_key(file_owner, file_hash),
            Error::<T>::FileNotFound
        );

        let key = (file_hash.clone(), file_owner.clone());
        if !PdpRecords::<T>::contains_key(&key, node) {
            PdpRecords::<T>::insert(
                &key,
                node,
                PdpRecord::<T> {
                    file_hash: file_hash.clone(),
                    file_owner: file_owner.clone(),
                    node_addr: node.clone(),
                    settled: false,
                },
            );
        }
        Ok(())
    }

    /// Credit every unsettled record's node with the file size and mark the
    /// record settled. Already settled records are skipped.
    pub(crate) fn settle_pdp_records(file: &FileInfo<T>) -> DispatchResult {
        let key = (file.file_hash.clone(), file.file_owner.clone());
        let pending: Vec<_> = PdpRecords::<T>::iter_prefix(&key)
            .filter(|(_, record)| !record.settled)
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let released = Self::file_size(file.file_block_count)?;
        for (node, mut record) in pending {
            T::NodeRegistry::release_capacity(&node, released).map_err(|e| {
                log::warn!(
                    target: LOG_TARGET,
                    "capacity release for node {:?} on file {:?} failed: {:?}",
                    node,
                    file.file_hash,
                    e,
                );
                Error::<T>::CapacityReleaseFailed
            })?;
            record.settled = true;
            PdpRecords::<T>::insert(&key, &node, record);

            Self::deposit_event(Event::PdpSettled {
                file_hash: file.file_hash.clone(),
                node,
                released,
            });
        }
        Ok(())
    }

    pub(crate) fn purge_pdp_records(file_hash: &FileHashOf<T>, file_owner: &T::AccountId) {
        let key = (file_hash.clone(), file_owner.clone());
        let result = PdpRecords::<T>::clear_prefix(&key, u32::MAX, None);
        debug_assert!(result.maybe_cursor.is_none());
    }

    /// Move every record of a file to a new owner key.
    pub(crate) fn rekey_pdp_records(
        file_hash: &FileHashOf<T>,
        from: &T::AccountId,
        to: &T::AccountId,
    ) {
        let old_key = (file_hash.clone(), from.clone());
        let new_key = (file_hash.clone(), to.clone());
        let records: Vec<_> = PdpRecords::<T>::drain_prefix(&old_key).collect();
        for (node, mut record) in records {
            record.file_owner = to.clone();
            PdpRecords::<T>::insert(&new_key, &node, record);
        }
    }

    /// All PDP records of a file under its current owner.
    pub(crate) fn pdp_records_of(
        file_hash: &FileHashOf<T>,
        file_owner: &T::AccountId,
    ) -> Vec<PdpRecord<T>> {
        PdpRecords::<T>::iter_prefix_values(&(file_hash.clone(), file_owner.clone())).collect()
    }
}
