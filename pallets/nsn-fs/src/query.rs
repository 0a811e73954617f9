// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Read-only queries.
//!
//! [`FsQuery`] lists every lookup the pallet answers. [`Pallet::query`]
//! dispatches one and returns the SCALE-encoded result, which is the shape a
//! runtime API would hand to clients. The typed functions below are usable
//! directly from other pallets.
//!
//! Lazily expired leases and files are reported as invalid, but nothing is
//! written back.

use crate::{
    CallContextOf, Config, Error, FileHashOf, FileInfo, FileOwners, Pallet, PassportVerifier,
    PdpRecord, ReadPledge, ReadPledges, SpaceInfo, WhiteListOf, WhiteLists,
};
use alloc::vec::Vec;
use frame_support::{CloneNoBound, EqNoBound, PartialEqNoBound, RuntimeDebugNoBound};
use parity_scale_codec::{Decode, DecodeWithMemTracking, Encode};
use scale_info::TypeInfo;
use sp_runtime::DispatchError;

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
pub enum FsQuery<T: Config> {
    GlobalParam,
    SpaceInfo {
        owner: T::AccountId,
    },
    FileInfo {
        file_hash: FileHashOf<T>,
    },
    /// Hashes owned by the account the passport resolves to
    FileHashList {
        passport: Vec<u8>,
    },
    PdpInfoList {
        file_hash: FileHashOf<T>,
    },
    WhiteList {
        owner: T::AccountId,
        file_hash: FileHashOf<T>,
    },
    ReadPledge {
        downloader: T::AccountId,
        file_hash: FileHashOf<T>,
    },
}

impl<T: Config> Pallet<T> {
    /// Answer a query with its SCALE-encoded result.
    pub fn query(query: FsQuery<T>) -> Result<Vec<u8>, DispatchError> {
        let ctx = Self::call_context();
        let payload = match query {
            FsQuery::GlobalParam => Self::global_param()?.encode(),
            FsQuery::SpaceInfo { owner } => Self::space_info_at(&owner, &ctx)?.encode(),
            FsQuery::FileInfo { file_hash } => Self::file_info_at(&file_hash, &ctx)?.encode(),
            FsQuery::FileHashList { passport } => {
                Self::file_hash_list_at(&passport, &ctx)?.encode()
            }
            FsQuery::PdpInfoList { file_hash } => Self::pdp_info_list(&file_hash)?.encode(),
            FsQuery::WhiteList { owner, file_hash } => {
                Self::white_list(&owner, &file_hash)?.encode()
            }
            FsQuery::ReadPledge {
                downloader,
                file_hash,
            } => Self::read_pledge(&downloader, &file_hash)?.encode(),
        };
        Ok(payload)
    }

    pub fn space_info(owner: &T::AccountId) -> Result<SpaceInfo<T>, DispatchError> {
        Self::space_info_at(owner, &Self::call_context())
    }

    /// File by hash, looked up through its current owner.
    pub fn file_info(file_hash: &FileHashOf<T>) -> Result<FileInfo<T>, DispatchError> {
        Self::file_info_at(file_hash, &Self::call_context())
    }

    pub fn file_hash_list(passport: &[u8]) -> Result<Vec<FileHashOf<T>>, DispatchError> {
        Self::file_hash_list_at(passport, &Self::call_context())
    }

    pub fn pdp_info_list(file_hash: &FileHashOf<T>) -> Result<Vec<PdpRecord<T>>, DispatchError> {
        let owner = FileOwners::<T>::get(file_hash).ok_or(Error::<T>::FileNotFound)?;
        Ok(Self::pdp_records_of(file_hash, &owner))
    }

    pub fn white_list(
        owner: &T::AccountId,
        file_hash: &FileHashOf<T>,
    ) -> Result<WhiteListOf<T>, DispatchError> {
        WhiteLists::<T>::get(owner, file_hash).ok_or_else(|| Error::<T>::WhiteListNotFound.into())
    }

    pub fn read_pledge(
        downloader: &T::AccountId,
        file_hash: &FileHashOf<T>,
    ) -> Result<ReadPledge<T>, DispatchError> {
        ReadPledges::<T>::get(downloader, file_hash)
            .ok_or_else(|| Error::<T>::ReadPledgeNotFound.into())
    }

    fn space_info_at(
        owner: &T::AccountId,
        ctx: &CallContextOf<T>,
    ) -> Result<SpaceInfo<T>, DispatchError> {
        Self::space_view(owner, ctx).ok_or_else(|| Error::<T>::SpaceNotFound.into())
    }

    fn file_info_at(
        file_hash: &FileHashOf<T>,
        ctx: &CallContextOf<T>,
    ) -> Result<FileInfo<T>, DispatchError> {
        let owner = FileOwners::<T>::get(file_hash).ok_or(Error::<T>::FileNotFound)?;
        Self::file_view(&owner, file_hash, ctx).ok_or_else(|| Error::<T>::FileNotFound.into())
    }

    fn file_hash_list_at(
        passport: &[u8],
        ctx: &CallContextOf<T>,
    ) -> Result<Vec<FileHashOf<T>>, DispatchError> {
        let owner = T::PassportVerifier::resolve(ctx.height, passport)?;
        Ok(Self::owned_hashes(&owner))
    }
}
