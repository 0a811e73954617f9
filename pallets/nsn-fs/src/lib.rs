// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.
//
// NSN Chain is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! # NSN FS Pallet
//!
//! Settlement core of the NSN decentralized file storage market.
//!
//! ## Overview
//!
//! Storage nodes sell capacity and clients pay for it in one of two ways:
//! - Space leases: a time-boxed capacity allocation billed per PDP interval
//! - Pay-per-file: an escrow deposited for a single file
//!
//! Readers escrow a read pledge covering a quota of blocks from one or more
//! serving nodes. PDP (proof of data possession) records are written by the
//! proof path and settled here when a file goes away, crediting each node's
//! capacity exactly once.
//!
//! All funds are held by the pallet account derived from `PalletId`.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `create_space`: Lease capacity and escrow its full cost
//! - `update_space`: Resize or extend a lease, settling the fee delta
//! - `delete_space`: Drop an unused lease and refund its remaining escrow
//! - `store_files`: Batch store files against a lease or a file escrow
//! - `renew_files`: Batch extend pay-per-file files
//! - `delete_files`: Batch delete files, settling PDP records and refunds
//! - `transfer_files`: Batch move pay-per-file files to a new owner
//! - `set_white_list`: Update the read white list of a file
//! - `read_file_pledge`: Escrow a read quota for a file
//! - `cancel_file_read`: Withdraw an expired read pledge
//!
//! Batch calls never fail because of a single item. Each item runs in its own
//! storage layer and rejected items are reported through one
//! `BatchItemsFailed` event.
//!
//! ### Queries
//!
//! Read-only lookups are exposed as plain functions on [`Pallet`] and through
//! the [`query::FsQuery`] dispatcher returning SCALE-encoded payloads.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

use frame_support::pallet_prelude::DispatchResult;
use sp_runtime::DispatchError;

mod types;
pub use types::*;

mod batch;
pub mod economics;
mod file;
mod pdp;
pub mod query;
mod read_pledge;
mod space;
mod white_list;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub(crate) const LOG_TARGET: &str = "runtime::nsn-fs";

/// Storage node registry as seen from the settlement core.
pub trait StorageNodeRegistry<AccountId> {
    /// Give `amount` of capacity back to a node once a file no longer needs it.
    ///
    /// Fails if the node is unknown.
    fn release_capacity(node: &AccountId, amount: u64) -> DispatchResult;
}

/// Resolves a passport token into the account it was issued to.
pub trait PassportVerifier<AccountId, BlockNumber> {
    fn resolve(height: BlockNumber, passport: &[u8]) -> Result<AccountId, DispatchError>;
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use crate::batch::BatchErrors;
    use alloc::vec::Vec;
    use core::marker::PhantomData;
    use frame_support::{
        pallet_prelude::*,
        traits::{Currency, ExistenceRequirement, StorageVersion, UnixTime},
        PalletId,
    };
    use frame_system::pallet_prelude::*;
    use sp_runtime::{
        traits::{AccountIdConversion, SaturatedConversion, Zero},
        DispatchError,
    };

    /// Balance type alias
    pub type BalanceOf<T> =
        <<T as Config>::Currency as Currency<<T as frame_system::Config>::AccountId>>::Balance;

    /// Content identifier of a file
    pub type FileHashOf<T> = BoundedVec<u8, <T as Config>::MaxFileHashLen>;

    /// Read white list of a file
    pub type WhiteListOf<T> = BoundedVec<WhiteListEntry<T>, <T as Config>::MaxWhiteListLen>;

    pub type CallContextOf<T> = CallContext<BlockNumberFor<T>>;

    /// The in-code storage version.
    const STORAGE_VERSION: StorageVersion = StorageVersion::new(0);

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Configuration trait for the NSN FS pallet
    #[pallet::config]
    pub trait Config: frame_system::Config {
        #[allow(deprecated)]
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Currency used for lease, file and read escrows
        type Currency: Currency<Self::AccountId>;

        /// Wall clock used for lease and file windows
        type UnixTime: UnixTime;

        /// Node capacity bookkeeping (loose coupling to the node registry)
        type NodeRegistry: StorageNodeRegistry<Self::AccountId>;

        /// Passport resolution for owner-scoped list queries
        type PassportVerifier: PassportVerifier<Self::AccountId, BlockNumberFor<Self>>;

        /// Pallet ID for the escrow account
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Size of one file block in kilobytes
        #[pallet::constant]
        type BlockSize: Get<u64>;

        /// Blocks added on top of the file block count before a read pledge
        /// may be cancelled
        #[pallet::constant]
        type ReadPledgeGraceBlocks: Get<u32>;

        /// Maximum length of a file hash
        #[pallet::constant]
        type MaxFileHashLen: Get<u32>;

        /// Maximum number of items in one batch call
        #[pallet::constant]
        type MaxFilesPerCall: Get<u32>;

        /// Maximum number of serving nodes in one read pledge
        #[pallet::constant]
        type MaxReadPlans: Get<u32>;

        /// Maximum number of entries in a file white list
        #[pallet::constant]
        type MaxWhiteListLen: Get<u32>;

        /// Weight information
        type WeightInfo: WeightInfo;
    }

    // ============================================================================
    // Storage
    // ============================================================================

    /// Pricing parameters, seeded at genesis
    #[pallet::storage]
    pub type GlobalParams<T: Config> = StorageValue<_, GlobalParam, OptionQuery>;

    /// Space lease per owner (one lease per owner)
    #[pallet::storage]
    pub type Spaces<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, SpaceInfo<T>, OptionQuery>;

    /// Files by owner and hash
    #[pallet::storage]
    pub type Files<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        FileHashOf<T>,
        FileInfo<T>,
        OptionQuery,
    >;

    /// Current owner of every stored file hash
    #[pallet::storage]
    pub type FileOwners<T: Config> =
        StorageMap<_, Blake2_128Concat, FileHashOf<T>, T::AccountId, OptionQuery>;

    /// PDP records keyed by (file hash, file owner), then node
    #[pallet::storage]
    pub type PdpRecords<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        (FileHashOf<T>, T::AccountId),
        Blake2_128Concat,
        T::AccountId,
        PdpRecord<T>,
        OptionQuery,
    >;

    /// Read white lists by owner and file hash
    #[pallet::storage]
    pub type WhiteLists<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        FileHashOf<T>,
        WhiteListOf<T>,
        OptionQuery,
    >;

    /// Read pledges by downloader and file hash
    #[pallet::storage]
    pub type ReadPledges<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        FileHashOf<T>,
        ReadPledge<T>,
        OptionQuery,
    >;

    // ============================================================================
    // Genesis
    // ============================================================================

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        pub space_price_per_kb: u64,
        pub file_price_per_kb: u64,
        pub read_price_per_kb: u64,
        #[serde(skip)]
        pub _marker: PhantomData<T>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            GlobalParams::<T>::put(GlobalParam {
                space_price_per_kb: self.space_price_per_kb,
                file_price_per_kb: self.file_price_per_kb,
                read_price_per_kb: self.read_price_per_kb,
            });
            // escrow holds the existential deposit on top of what it owes
            T::Currency::make_free_balance_be(
                &Pallet::<T>::account_id(),
                T::Currency::minimum_balance(),
            );
        }
    }

    // ============================================================================
    // Events
    // ============================================================================

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// A space lease was created
        SpaceCreated {
            owner: T::AccountId,
            volume: u64,
            pay_amount: BalanceOf<T>,
        },
        /// A space lease was resized or extended
        SpaceUpdated {
            owner: T::AccountId,
            payer: T::AccountId,
            volume: u64,
            time_expired: u64,
            pay_amount: BalanceOf<T>,
        },
        /// A space lease was removed and its remaining escrow refunded
        SpaceDeleted {
            owner: T::AccountId,
            refund: BalanceOf<T>,
        },
        /// A file was stored
        FileStored {
            file_hash: FileHashOf<T>,
            owner: T::AccountId,
            storage_type: StorageType,
            pay_amount: BalanceOf<T>,
        },
        /// A pay-per-file file was renewed
        FileRenewed {
            file_hash: FileHashOf<T>,
            payer: T::AccountId,
            time_expired: u64,
            pay_amount: BalanceOf<T>,
        },
        /// A file was deleted and its resources reclaimed
        FileDeleted {
            file_hash: FileHashOf<T>,
            owner: T::AccountId,
        },
        /// A file changed owner
        FileTransferred {
            file_hash: FileHashOf<T>,
            from: T::AccountId,
            to: T::AccountId,
        },
        /// A PDP record was settled and node capacity released
        PdpSettled {
            file_hash: FileHashOf<T>,
            node: T::AccountId,
            released: u64,
        },
        /// A file white list was updated
        WhiteListSet {
            file_hash: FileHashOf<T>,
            owner: T::AccountId,
            op: WhiteListOp,
        },
        /// A read quota was pledged
        ReadPledged {
            file_hash: FileHashOf<T>,
            downloader: T::AccountId,
            added_blocks: u64,
            fee: BalanceOf<T>,
            expire_height: BlockNumberFor<T>,
        },
        /// A read pledge was withdrawn
        ReadPledgeCancelled {
            file_hash: FileHashOf<T>,
            downloader: T::AccountId,
            refund: BalanceOf<T>,
        },
        /// Some items of a batch call were rejected
        BatchItemsFailed {
            kind: BatchKind,
            failures: BoundedVec<ItemFailure<T>, T::MaxFilesPerCall>,
        },
    }

    // ============================================================================
    // Errors
    // ============================================================================

    #[pallet::error]
    pub enum Error<T> {
        /// Signer does not control the account named in the request
        NotAuthorized,
        /// Pricing parameters were never configured
        GlobalParamNotSet,
        /// PDP interval must be non-zero
        InvalidPdpInterval,
        /// Expiry time must lie in the future
        InvalidTimeExpired,
        /// Owner already holds a space lease
        SpaceAlreadyExists,
        /// No space lease for this owner
        SpaceNotFound,
        /// Space lease has expired
        SpaceExpired,
        /// Update changes neither volume nor expiry
        EmptySpaceUpdate,
        /// New volume is below the volume already used by files
        VolumeBelowUsage,
        /// Lease escrow cannot cover the refund
        InsufficientRestAmount,
        /// Lease still backs stored files
        SpaceInUse,
        /// Lease has too little free volume for the file
        InsufficientSpaceVolume,
        /// No file with this hash
        FileNotFound,
        /// A valid file with this hash is already stored
        FileAlreadyStored,
        /// File has expired
        FileExpired,
        /// File expiry lies in the past
        FileExpiryInPast,
        /// Operation is not supported for this storage type
        UnsupportedStorageType,
        /// File is not held by the given owner
        FileOwnerMismatch,
        /// Renewal would lower the total fee already paid
        RenewalReducesFee,
        /// Read pledge carries no read plans
        EmptyReadPlans,
        /// A node appears twice in the read plans
        DuplicateReadPlan,
        /// Too many read plans in one pledge
        TooManyReadPlans,
        /// No read pledge for this downloader and file
        ReadPledgeNotFound,
        /// Read pledge is still locked
        ReadPledgeLocked,
        /// No white list for this file
        WhiteListNotFound,
        /// White list is full
        WhiteListTooLong,
        /// Currency transfer failed
        TransferFailed,
        /// Node registry refused to release capacity
        CapacityReleaseFailed,
        /// Arithmetic overflow
        Overflow,
        /// Stored accounting is inconsistent
        AccountingViolation,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::BlockSize::get() > 0, "BlockSize must be non-zero");
            assert!(
                T::MaxFilesPerCall::get() > 0,
                "MaxFilesPerCall must be non-zero"
            );
        }
    }

    // ============================================================================
    // Calls
    // ============================================================================

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Lease storage space and escrow its full cost
        ///
        /// The lease starts at the current time. Its cost is
        /// `pdp_count * volume * copy_number * space_price_per_kb`.
        ///
        /// # Errors
        /// * `NotAuthorized` - Signer is not the lease owner
        /// * `SpaceAlreadyExists` - Owner already holds a lease
        /// * `InvalidPdpInterval` - Interval is zero
        /// * `InvalidTimeExpired` - Expiry is not after the start time
        /// * `TransferFailed` - Owner cannot pay the escrow
        ///
        /// # Events
        /// * `SpaceCreated`
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::create_space())]
        pub fn create_space(origin: OriginFor<T>, request: SpaceRequest<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();
            Self::do_create_space(&who, &ctx, request)
        }

        /// Resize or extend a space lease
        ///
        /// Zero fields keep their current value. The fee is recomputed over the
        /// original start time; an increase is charged to the payer and a
        /// decrease is refunded to the payer out of the lease escrow.
        ///
        /// # Errors
        /// * `NotAuthorized` - Signer is not the payer
        /// * `EmptySpaceUpdate` - Nothing to change
        /// * `SpaceNotFound` / `SpaceExpired`
        /// * `InvalidTimeExpired` - New expiry not in the future
        /// * `VolumeBelowUsage` - New volume smaller than used volume
        /// * `InsufficientRestAmount` - Escrow cannot cover the refund
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::update_space())]
        pub fn update_space(origin: OriginFor<T>, update: SpaceUpdate<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();
            Self::do_update_space(&who, &ctx, update)
        }

        /// Delete an unused space lease and refund the remaining escrow
        ///
        /// # Errors
        /// * `NotAuthorized` - Signer is not the owner
        /// * `SpaceNotFound`
        /// * `SpaceInUse` - Files still occupy the lease
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::delete_space())]
        pub fn delete_space(origin: OriginFor<T>, owner: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();
            Self::do_delete_space(&who, &ctx, owner)
        }

        /// Store a batch of files
        ///
        /// Rejected items are rolled back individually and reported in a
        /// single `BatchItemsFailed` event; the call itself succeeds.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::store_files(files.len() as u32))]
        pub fn store_files(
            origin: OriginFor<T>,
            files: BoundedVec<FileStoreRequest<T>, T::MaxFilesPerCall>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();

            let mut batch = BatchErrors::<T>::new(BatchKind::Store);
            for request in files {
                let file_hash = request.file_hash.clone();
                batch.run(&file_hash, || Self::do_store_file(&who, &ctx, request));
            }
            batch.emit();

            Ok(())
        }

        /// Renew a batch of pay-per-file files
        ///
        /// The payer covers the difference between the recomputed total fee
        /// and the amount already paid.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::renew_files(renewals.len() as u32))]
        pub fn renew_files(
            origin: OriginFor<T>,
            renewals: BoundedVec<FileRenewal<T>, T::MaxFilesPerCall>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();

            let mut batch = BatchErrors::<T>::new(BatchKind::Renew);
            for renewal in renewals {
                let file_hash = renewal.file_hash.clone();
                batch.run(&file_hash, || Self::do_renew_file(&who, &ctx, renewal));
            }
            batch.emit();

            Ok(())
        }

        /// Delete a batch of files by hash
        ///
        /// Unsettled PDP records release node capacity, then the file escrow is
        /// refunded or its lease volume restored.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::delete_files(file_hashes.len() as u32))]
        pub fn delete_files(
            origin: OriginFor<T>,
            file_hashes: BoundedVec<FileHashOf<T>, T::MaxFilesPerCall>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();

            let mut batch = BatchErrors::<T>::new(BatchKind::Delete);
            for file_hash in file_hashes {
                let key = file_hash.clone();
                batch.run(&key, || Self::do_delete_file(&who, &ctx, file_hash));
            }
            batch.emit();

            Ok(())
        }

        /// Transfer a batch of pay-per-file files to new owners
        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::transfer_files(transfers.len() as u32))]
        pub fn transfer_files(
            origin: OriginFor<T>,
            transfers: BoundedVec<FileTransfer<T>, T::MaxFilesPerCall>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();

            let mut batch = BatchErrors::<T>::new(BatchKind::Transfer);
            for transfer in transfers {
                let file_hash = transfer.file_hash.clone();
                batch.run(&file_hash, || Self::do_transfer_file(&who, &ctx, transfer));
            }
            batch.emit();

            Ok(())
        }

        /// Update the read white list of a file
        ///
        /// # Errors
        /// * `FileNotFound`
        /// * `NotAuthorized` - Signer does not own the file
        /// * `WhiteListTooLong`
        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::set_white_list())]
        pub fn set_white_list(origin: OriginFor<T>, update: WhiteListUpdate<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_set_white_list(&who, update)
        }

        /// Pledge a read quota for a file
        ///
        /// Only the newly requested blocks are charged. Plans for nodes that
        /// already appear in an earlier pledge are merged into it.
        ///
        /// # Errors
        /// * `NotAuthorized` - Signer is not the downloader
        /// * `EmptyReadPlans` / `DuplicateReadPlan` / `TooManyReadPlans`
        /// * `FileNotFound` / `FileExpired`
        /// * `TransferFailed`
        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::read_file_pledge())]
        pub fn read_file_pledge(
            origin: OriginFor<T>,
            request: ReadPledgeRequest<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();
            Self::do_read_file_pledge(&who, &ctx, request)
        }

        /// Withdraw a read pledge once its lock height has passed
        ///
        /// # Errors
        /// * `ReadPledgeNotFound`
        /// * `NotAuthorized` - Signer is not the downloader
        /// * `ReadPledgeLocked` - Lock height not reached
        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::cancel_file_read())]
        pub fn cancel_file_read(
            origin: OriginFor<T>,
            downloader: T::AccountId,
            file_hash: FileHashOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let ctx = Self::call_context();
            Self::do_cancel_file_read(&who, &ctx, downloader, file_hash)
        }
    }

    // Helper functions
    impl<T: Config> Pallet<T> {
        /// Account holding every escrow of this pallet.
        pub fn account_id() -> T::AccountId {
            T::PalletId::get().into_account_truncating()
        }

        /// Current pricing parameters.
        pub fn global_param() -> Result<GlobalParam, DispatchError> {
            GlobalParams::<T>::get().ok_or_else(|| Error::<T>::GlobalParamNotSet.into())
        }

        /// Read the clock once for the whole call.
        pub(crate) fn call_context() -> CallContextOf<T> {
            CallContext {
                now: T::UnixTime::now().as_secs(),
                height: frame_system::Pallet::<T>::block_number(),
            }
        }

        /// Move `amount` from `from` into the escrow account.
        pub(crate) fn collect(from: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
            if amount.is_zero() {
                return Ok(());
            }
            T::Currency::transfer(
                from,
                &Self::account_id(),
                amount,
                ExistenceRequirement::AllowDeath,
            )
            .map_err(|_| Error::<T>::TransferFailed.into())
        }

        /// Pay `amount` out of the escrow account to `to`.
        pub(crate) fn refund(to: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
            if amount.is_zero() {
                return Ok(());
            }
            T::Currency::transfer(
                &Self::account_id(),
                to,
                amount,
                ExistenceRequirement::KeepAlive,
            )
            .map_err(|_| Error::<T>::TransferFailed.into())
        }

        /// Size of a file in the unit leases are measured in.
        pub(crate) fn file_size(file_block_count: u64) -> Result<u64, DispatchError> {
            file_block_count
                .checked_mul(T::BlockSize::get())
                .ok_or_else(|| Error::<T>::Overflow.into())
        }

        /// Number of hashes stored under `owner`.
        pub fn file_count(owner: &T::AccountId) -> u32 {
            Files::<T>::iter_key_prefix(owner).count().saturated_into()
        }

        /// Every hash stored under `owner`.
        pub(crate) fn owned_hashes(owner: &T::AccountId) -> Vec<FileHashOf<T>> {
            Files::<T>::iter_key_prefix(owner).collect()
        }
    }
}
