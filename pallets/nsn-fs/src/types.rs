// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Types for pallet-nsn-fs

use crate::{BalanceOf, Config, FileHashOf};
use frame_support::{
    pallet_prelude::*, CloneNoBound, EqNoBound, PartialEqNoBound, RuntimeDebugNoBound,
};
use frame_system::pallet_prelude::BlockNumberFor;
use parity_scale_codec::{Decode, DecodeWithMemTracking, Encode};
use scale_info::TypeInfo;
use sp_runtime::{DispatchError, RuntimeDebug};

/// Network-wide pricing, seeded at genesis.
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
    Default,
)]
pub struct GlobalParam {
    /// Price per kilobyte per PDP interval for space leases
    pub space_price_per_kb: u64,
    /// Price per kilobyte per PDP interval for pay-per-file storage
    pub file_price_per_kb: u64,
    /// Price per kilobyte for reads
    pub read_price_per_kb: u64,
}

/// How a stored file is paid for
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum StorageType {
    /// Capacity is drawn from the owner's space lease
    UseSpace,
    /// Escrow is deposited for this file alone
    UseFile,
}

/// A time-boxed capacity lease held by one owner.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound(T: Config))]
pub struct SpaceInfo<T: Config> {
    pub owner: T::AccountId,
    /// Total leased volume
    pub volume: u64,
    /// Volume not yet used by files, always `<= volume`
    pub rest_vol: u64,
    pub copy_number: u64,
    /// Seconds between required proofs
    pub pdp_interval: u64,
    pub time_start: u64,
    pub time_expired: u64,
    /// Total escrowed at creation or last update
    pub pay_amount: BalanceOf<T>,
    /// Unconsumed escrow, always `<= pay_amount`
    pub rest_amount: BalanceOf<T>,
    pub valid: bool,
}

/// A stored file, keyed by owner and hash.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound(T: Config))]
pub struct FileInfo<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub file_owner: T::AccountId,
    pub file_block_count: u64,
    pub copy_number: u64,
    pub storage_type: StorageType,
    pub pdp_interval: u64,
    pub time_start: u64,
    pub time_expired: u64,
    pub pay_amount: BalanceOf<T>,
    pub rest_amount: BalanceOf<T>,
    /// Accumulated cost paid out to nodes, starts at zero
    pub file_cost: BalanceOf<T>,
    pub valid: bool,
}

/// Settlement record for one (file, node) proof obligation.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound(T: Config))]
pub struct PdpRecord<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub file_owner: T::AccountId,
    pub node_addr: T::AccountId,
    /// Set once the node's capacity has been credited back
    pub settled: bool,
}

/// Read quota against a single serving node.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound(T: Config))]
pub struct ReadPlan<T: Config> {
    pub node_addr: T::AccountId,
    pub max_read_block_num: u64,
    pub have_read_block_num: u64,
}

/// Escrowed read prepayment of one downloader for one file.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound(T: Config))]
pub struct ReadPledge<T: Config> {
    pub downloader: T::AccountId,
    pub file_hash: FileHashOf<T>,
    pub rest_money: BalanceOf<T>,
    pub block_height: BlockNumberFor<T>,
    /// Cancellation is refused before this height
    pub expire_height: BlockNumberFor<T>,
    pub read_plans: BoundedVec<ReadPlan<T>, T::MaxReadPlans>,
}

/// One account allowed to read a file within a height window.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound(T: Config))]
pub struct WhiteListEntry<T: Config> {
    pub addr: T::AccountId,
    pub base_height: BlockNumberFor<T>,
    pub expire_height: BlockNumberFor<T>,
}

/// How a white list update combines with the stored list
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum WhiteListOp {
    /// Insert entries, replacing any entry with the same address
    Add,
    /// Drop entries whose address matches
    Remove,
    /// Overwrite the whole list
    Replace,
    /// Drop the list
    Clear,
}

// ============================================================================
// Requests
// ============================================================================

/// Parameters of a new space lease. The start time is taken from the chain.
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct SpaceRequest<T: Config> {
    pub owner: T::AccountId,
    pub volume: u64,
    pub copy_number: u64,
    pub pdp_interval: u64,
    pub time_expired: u64,
}

/// Extend or resize a lease. Zero means "keep the current value".
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct SpaceUpdate<T: Config> {
    pub owner: T::AccountId,
    pub payer: T::AccountId,
    pub new_volume: u64,
    pub new_time_expired: u64,
}

#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct FileStoreRequest<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub file_owner: T::AccountId,
    pub file_block_count: u64,
    pub copy_number: u64,
    /// Ignored for `UseSpace`, which inherits the lease interval
    pub pdp_interval: u64,
    pub time_expired: u64,
    pub storage_type: StorageType,
}

#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct FileRenewal<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub file_owner: T::AccountId,
    pub payer: T::AccountId,
    pub new_time_expired: u64,
}

#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct FileTransfer<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub ori_owner: T::AccountId,
    pub new_owner: T::AccountId,
}

#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct ReadPledgeRequest<T: Config> {
    pub downloader: T::AccountId,
    pub file_hash: FileHashOf<T>,
    pub read_plans: BoundedVec<ReadPlan<T>, T::MaxReadPlans>,
}

#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct WhiteListUpdate<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub op: WhiteListOp,
    pub entries: BoundedVec<WhiteListEntry<T>, T::MaxWhiteListLen>,
}

// ============================================================================
// Batch reporting
// ============================================================================

/// Batch call an item failure belongs to
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum BatchKind {
    Store,
    Renew,
    Delete,
    Transfer,
}

/// A single rejected batch item
#[derive(
    CloneNoBound,
    Encode,
    Decode,
    DecodeWithMemTracking,
    EqNoBound,
    PartialEqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub struct ItemFailure<T: Config> {
    pub file_hash: FileHashOf<T>,
    pub error: DispatchError,
}

/// Clock readings taken once at the start of a call and handed to every
/// helper, so a call never observes two different times.
#[derive(Clone, Copy, Eq, PartialEq, RuntimeDebug)]
pub struct CallContext<BlockNumber> {
    /// Unix time in seconds
    pub now: u64,
    pub height: BlockNumber,
}
