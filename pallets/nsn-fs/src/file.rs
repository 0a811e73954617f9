// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! File lifecycle: store, renew, delete and transfer.
//!
//! Every function here handles a single batch item. The batch calls in
//! `lib.rs` wrap each one in its own storage layer.

use crate::{
    economics, BalanceOf, CallContextOf, Config, Error, Event, FileHashOf, FileInfo, FileOwners,
    FileRenewal, FileStoreRequest, FileTransfer, Files, Pallet, Spaces, StorageType, WhiteLists,
    LOG_TARGET,
};
use frame_support::{ensure, pallet_prelude::DispatchResult, traits::Get};
use sp_runtime::{
    traits::{CheckedAdd, CheckedSub, Zero},
    DispatchError,
};

impl<T: Config> Pallet<T> {
    pub(crate) fn do_store_file(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        request: FileStoreRequest<T>,
    ) -> DispatchResult {
        ensure!(*who == request.file_owner, Error::<T>::NotAuthorized);
        ensure!(request.pdp_interval > 0, Error::<T>::InvalidPdpInterval);
        ensure!(
            request.time_expired >= ctx.now,
            Error::<T>::FileExpiryInPast
        );

        // A hash lives once across all owners; an expired holder is reclaimed.
        if let Some(prior_owner) = FileOwners::<T>::get(&request.file_hash) {
            if let Some(prior) = Self::get_and_update_file(&prior_owner, &request.file_hash, ctx) {
                ensure!(!prior.valid, Error::<T>::FileAlreadyStored);
                log::info!(
                    target: LOG_TARGET,
                    "reclaiming expired file {:?} of {:?}",
                    prior.file_hash,
                    prior.file_owner,
                );
                Self::delete_file(&prior, ctx)?;
            }
        }

        let mut file = FileInfo::<T> {
            file_hash: request.file_hash,
            file_owner: request.file_owner,
            file_block_count: request.file_block_count,
            copy_number: request.copy_number,
            storage_type: request.storage_type,
            pdp_interval: request.pdp_interval,
            time_start: ctx.now,
            time_expired: request.time_expired,
            pay_amount: Zero::zero(),
            rest_amount: Zero::zero(),
            file_cost: Zero::zero(),
            valid: true,
        };

        match file.storage_type {
            StorageType::UseSpace => {
                let mut space = Self::get_and_update_space(&file.file_owner, ctx)
                    .ok_or(Error::<T>::SpaceNotFound)?;
                ensure!(space.valid, Error::<T>::SpaceExpired);

                let size = Self::file_size(file.file_block_count)?;
                ensure!(space.rest_vol > size, Error::<T>::InsufficientSpaceVolume);
                space.rest_vol -= size;
                file.pdp_interval = space.pdp_interval;

                Spaces::<T>::insert(&file.file_owner, space);
            }
            StorageType::UseFile => {
                let fee = Self::file_cost_total(&file)?;
                Self::collect(&file.file_owner, fee)?;
                file.pay_amount = fee;
                file.rest_amount = fee;
            }
        }

        Files::<T>::insert(&file.file_owner, &file.file_hash, &file);
        FileOwners::<T>::insert(&file.file_hash, &file.file_owner);

        Self::deposit_event(Event::FileStored {
            file_hash: file.file_hash,
            owner: file.file_owner,
            storage_type: file.storage_type,
            pay_amount: file.pay_amount,
        });

        Ok(())
    }

    pub(crate) fn do_renew_file(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        renewal: FileRenewal<T>,
    ) -> DispatchResult {
        ensure!(*who == renewal.payer, Error::<T>::NotAuthorized);

        let mut file = Self::get_and_update_file(&renewal.file_owner, &renewal.file_hash, ctx)
            .ok_or(Error::<T>::FileNotFound)?;
        ensure!(
            file.storage_type == StorageType::UseFile,
            Error::<T>::UnsupportedStorageType
        );
        ensure!(file.valid, Error::<T>::FileExpired);

        file.time_expired = renewal.new_time_expired;
        let new_total = Self::file_cost_total(&file)?;
        let delta = new_total
            .checked_sub(&file.pay_amount)
            .ok_or(Error::<T>::RenewalReducesFee)?;

        Self::collect(&renewal.payer, delta)?;

        file.pay_amount = new_total;
        file.rest_amount = file
            .rest_amount
            .checked_add(&delta)
            .ok_or(Error::<T>::Overflow)?;
        Files::<T>::insert(&renewal.file_owner, &renewal.file_hash, &file);

        Self::deposit_event(Event::FileRenewed {
            file_hash: renewal.file_hash,
            payer: renewal.payer,
            time_expired: file.time_expired,
            pay_amount: new_total,
        });

        Ok(())
    }

    pub(crate) fn do_delete_file(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        file_hash: FileHashOf<T>,
    ) -> DispatchResult {
        let owner = FileOwners::<T>::get(&file_hash).ok_or(Error::<T>::FileNotFound)?;
        ensure!(*who == owner, Error::<T>::NotAuthorized);

        let file =
            Self::get_and_update_file(&owner, &file_hash, ctx).ok_or(Error::<T>::FileNotFound)?;
        Self::delete_file(&file, ctx)
    }

    pub(crate) fn do_transfer_file(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        transfer: FileTransfer<T>,
    ) -> DispatchResult {
        ensure!(*who == transfer.ori_owner, Error::<T>::NotAuthorized);

        let mut file = Self::get_and_update_file(&transfer.ori_owner, &transfer.file_hash, ctx)
            .ok_or(Error::<T>::FileNotFound)?;
        ensure!(file.valid, Error::<T>::FileExpired);
        ensure!(
            file.storage_type == StorageType::UseFile,
            Error::<T>::UnsupportedStorageType
        );
        // the hash index must agree with the record before either is rekeyed
        ensure!(
            FileOwners::<T>::get(&transfer.file_hash).as_ref() == Some(&file.file_owner),
            Error::<T>::FileOwnerMismatch
        );

        Files::<T>::remove(&transfer.ori_owner, &transfer.file_hash);
        file.file_owner = transfer.new_owner.clone();
        Files::<T>::insert(&transfer.new_owner, &transfer.file_hash, &file);

        Self::rekey_pdp_records(&transfer.file_hash, &transfer.ori_owner, &transfer.new_owner);
        FileOwners::<T>::insert(&transfer.file_hash, &transfer.new_owner);
        if let Some(list) = WhiteLists::<T>::take(&transfer.ori_owner, &transfer.file_hash) {
            WhiteLists::<T>::insert(&transfer.new_owner, &transfer.file_hash, list);
        }

        Self::deposit_event(Event::FileTransferred {
            file_hash: transfer.file_hash,
            from: transfer.ori_owner,
            to: transfer.new_owner,
        });

        Ok(())
    }

    /// Release everything a file holds and remove it.
    ///
    /// Settles outstanding PDP records, refunds the file escrow or restores
    /// lease volume, then purges the file, its owner index entry, its PDP
    /// records and its white list.
    pub(crate) fn delete_file(file: &FileInfo<T>, ctx: &CallContextOf<T>) -> DispatchResult {
        Self::settle_pdp_records(file)?;

        match file.storage_type {
            StorageType::UseFile => Self::refund(&file.file_owner, file.rest_amount)?,
            StorageType::UseSpace => {
                let mut space = Self::get_and_update_space(&file.file_owner, ctx)
                    .ok_or(Error::<T>::SpaceNotFound)?;
                let size = Self::file_size(file.file_block_count)?;
                space.rest_vol = space
                    .rest_vol
                    .checked_add(size)
                    .filter(|rest| *rest <= space.volume)
                    .ok_or(Error::<T>::AccountingViolation)?;
                Spaces::<T>::insert(&file.file_owner, space);
            }
        }

        Files::<T>::remove(&file.file_owner, &file.file_hash);
        FileOwners::<T>::remove(&file.file_hash);
        Self::purge_pdp_records(&file.file_hash, &file.file_owner);
        WhiteLists::<T>::remove(&file.file_owner, &file.file_hash);

        Self::deposit_event(Event::FileDeleted {
            file_hash: file.file_hash.clone(),
            owner: file.file_owner.clone(),
        });

        Ok(())
    }

    /// Load a file, marking it invalid once its window has closed.
    pub(crate) fn get_and_update_file(
        owner: &T::AccountId,
        file_hash: &FileHashOf<T>,
        ctx: &CallContextOf<T>,
    ) -> Option<FileInfo<T>> {
        let mut file = Files::<T>::get(owner, file_hash)?;
        if Self::expire_file(&mut file, ctx) {
            Files::<T>::insert(owner, file_hash, &file);
        }
        Some(file)
    }

    /// Read-only counterpart of [`Self::get_and_update_file`].
    pub(crate) fn file_view(
        owner: &T::AccountId,
        file_hash: &FileHashOf<T>,
        ctx: &CallContextOf<T>,
    ) -> Option<FileInfo<T>> {
        let mut file = Files::<T>::get(owner, file_hash)?;
        Self::expire_file(&mut file, ctx);
        Some(file)
    }

    fn expire_file(file: &mut FileInfo<T>, ctx: &CallContextOf<T>) -> bool {
        if file.valid && ctx.now > file.time_expired {
            log::debug!(
                target: LOG_TARGET,
                "file {:?} expired at {}",
                file.file_hash,
                file.time_expired,
            );
            file.valid = false;
            return true;
        }
        false
    }

    /// Total escrow of a pay-per-file file over its whole window.
    fn file_cost_total(file: &FileInfo<T>) -> Result<BalanceOf<T>, DispatchError> {
        let price = Self::global_param()?.file_price_per_kb;
        let cycles = economics::pdp_count(file.time_start, file.time_expired, file.pdp_interval)
            .ok_or(Error::<T>::InvalidTimeExpired)?;
        economics::file_fee(
            cycles,
            file.file_block_count,
            T::BlockSize::get(),
            file.copy_number,
            price,
        )
        .ok_or_else(|| Error::<T>::Overflow.into())
    }
}
