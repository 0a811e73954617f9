// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Benchmarking for pallet-nsn-fs
//!
//! Batch calls are measured with every item succeeding, so each item pays
//! its full storage and transfer cost.

#![cfg(feature = "runtime-benchmarks")]

use super::*;
use crate::Pallet as NsnFs;
use alloc::vec::Vec;
use frame_benchmarking::v2::*;
use frame_support::{
    traits::{Currency, Get, UnixTime},
    BoundedVec,
};
use frame_system::{pallet_prelude::BlockNumberFor, RawOrigin};
use parity_scale_codec::Encode;

const SEED: u32 = 0;
const LEASE_SECS: u64 = 1_000;
const PDP_INTERVAL: u64 = 100;
const FILE_BLOCKS: u64 = 4;

/// Seed unit prices and return an expiry comfortably in the future.
fn prepare<T: Config>() -> u64 {
    GlobalParams::<T>::put(GlobalParam {
        space_price_per_kb: 1,
        file_price_per_kb: 1,
        read_price_per_kb: 1,
    });
    let escrow = NsnFs::<T>::account_id();
    T::Currency::make_free_balance_be(&escrow, T::Currency::minimum_balance());
    T::UnixTime::now().as_secs().saturating_add(LEASE_SECS)
}

fn funded<T: Config>(name: &'static str, index: u32) -> T::AccountId {
    let who: T::AccountId = account(name, index, SEED);
    T::Currency::make_free_balance_be(&who, u32::MAX.into());
    who
}

fn bench_hash<T: Config>(index: u32) -> FileHashOf<T> {
    BoundedVec::truncate_from((b"bench-file", index).encode())
}

fn file_requests<T: Config>(
    owner: &T::AccountId,
    count: u32,
    time_expired: u64,
) -> BoundedVec<FileStoreRequest<T>, T::MaxFilesPerCall> {
    let requests: Vec<_> = (0..count)
        .map(|i| FileStoreRequest::<T> {
            file_hash: bench_hash::<T>(i),
            file_owner: owner.clone(),
            file_block_count: FILE_BLOCKS,
            copy_number: 1,
            pdp_interval: PDP_INTERVAL,
            time_expired,
            storage_type: StorageType::UseFile,
        })
        .collect();
    BoundedVec::truncate_from(requests)
}

fn store_files_of<T: Config>(
    owner: &T::AccountId,
    count: u32,
    time_expired: u64,
) -> Result<(), BenchmarkError> {
    NsnFs::<T>::store_files(
        RawOrigin::Signed(owner.clone()).into(),
        file_requests::<T>(owner, count, time_expired),
    )?;
    Ok(())
}

fn lease<T: Config>(owner: &T::AccountId, time_expired: u64) -> SpaceRequest<T> {
    SpaceRequest {
        owner: owner.clone(),
        volume: 1_000_000,
        copy_number: 1,
        pdp_interval: PDP_INTERVAL,
        time_expired,
    }
}

fn read_plans<T: Config>() -> BoundedVec<ReadPlan<T>, T::MaxReadPlans> {
    let plans: Vec<_> = (0..T::MaxReadPlans::get())
        .map(|i| ReadPlan::<T> {
            node_addr: account("node", i, SEED),
            max_read_block_num: 16,
            have_read_block_num: 0,
        })
        .collect();
    BoundedVec::truncate_from(plans)
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn create_space() {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), lease::<T>(&caller, expiry));

        assert!(Spaces::<T>::contains_key(&caller));
    }

    #[benchmark]
    fn update_space() -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        NsnFs::<T>::create_space(
            RawOrigin::Signed(caller.clone()).into(),
            lease::<T>(&caller, expiry),
        )?;

        // growing both dimensions takes the collect path
        let update = SpaceUpdate::<T> {
            owner: caller.clone(),
            payer: caller.clone(),
            new_volume: 2_000_000,
            new_time_expired: expiry.saturating_add(LEASE_SECS),
        };

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), update);

        assert_eq!(Spaces::<T>::get(&caller).map(|s| s.volume), Some(2_000_000));
        Ok(())
    }

    #[benchmark]
    fn delete_space() -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        NsnFs::<T>::create_space(
            RawOrigin::Signed(caller.clone()).into(),
            lease::<T>(&caller, expiry),
        )?;

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), caller.clone());

        assert!(!Spaces::<T>::contains_key(&caller));
        Ok(())
    }

    #[benchmark]
    fn store_files(n: Linear<1, { T::MaxFilesPerCall::get() }>) {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        let requests = file_requests::<T>(&caller, n, expiry);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), requests);

        assert_eq!(NsnFs::<T>::file_count(&caller), n);
    }

    #[benchmark]
    fn renew_files(n: Linear<1, { T::MaxFilesPerCall::get() }>) -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        store_files_of::<T>(&caller, n, expiry)?;

        let renewals: Vec<_> = (0..n)
            .map(|i| FileRenewal::<T> {
                file_hash: bench_hash::<T>(i),
                file_owner: caller.clone(),
                payer: caller.clone(),
                new_time_expired: expiry.saturating_add(LEASE_SECS),
            })
            .collect();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), BoundedVec::truncate_from(renewals));

        assert_eq!(
            Files::<T>::get(&caller, bench_hash::<T>(0)).map(|f| f.time_expired),
            Some(expiry.saturating_add(LEASE_SECS))
        );
        Ok(())
    }

    #[benchmark]
    fn delete_files(n: Linear<1, { T::MaxFilesPerCall::get() }>) -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        store_files_of::<T>(&caller, n, expiry)?;
        let hashes: Vec<_> = (0..n).map(bench_hash::<T>).collect();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), BoundedVec::truncate_from(hashes));

        assert_eq!(NsnFs::<T>::file_count(&caller), 0);
        Ok(())
    }

    #[benchmark]
    fn transfer_files(n: Linear<1, { T::MaxFilesPerCall::get() }>) -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        let receiver: T::AccountId = account("receiver", 0, SEED);
        store_files_of::<T>(&caller, n, expiry)?;

        let transfers: Vec<_> = (0..n)
            .map(|i| FileTransfer::<T> {
                file_hash: bench_hash::<T>(i),
                ori_owner: caller.clone(),
                new_owner: receiver.clone(),
            })
            .collect();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), BoundedVec::truncate_from(transfers));

        assert_eq!(NsnFs::<T>::file_count(&receiver), n);
        Ok(())
    }

    #[benchmark]
    fn set_white_list() -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let caller: T::AccountId = funded::<T>("owner", 0);
        store_files_of::<T>(&caller, 1, expiry)?;

        let now = frame_system::Pallet::<T>::block_number();
        let entries: Vec<_> = (0..T::MaxWhiteListLen::get())
            .map(|i| WhiteListEntry::<T> {
                addr: account("reader", i, SEED),
                base_height: now,
                expire_height: now + BlockNumberFor::<T>::from(100u32),
            })
            .collect();
        let update = WhiteListUpdate::<T> {
            file_hash: bench_hash::<T>(0),
            op: WhiteListOp::Replace,
            entries: BoundedVec::truncate_from(entries),
        };

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), update);

        assert!(WhiteLists::<T>::contains_key(&caller, bench_hash::<T>(0)));
        Ok(())
    }

    #[benchmark]
    fn read_file_pledge() -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let owner: T::AccountId = funded::<T>("owner", 0);
        let caller: T::AccountId = funded::<T>("downloader", 0);
        store_files_of::<T>(&owner, 1, expiry)?;

        let request = ReadPledgeRequest::<T> {
            downloader: caller.clone(),
            file_hash: bench_hash::<T>(0),
            read_plans: read_plans::<T>(),
        };

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), request);

        assert!(ReadPledges::<T>::contains_key(&caller, bench_hash::<T>(0)));
        Ok(())
    }

    #[benchmark]
    fn cancel_file_read() -> Result<(), BenchmarkError> {
        let expiry = prepare::<T>();
        let owner: T::AccountId = funded::<T>("owner", 0);
        let caller: T::AccountId = funded::<T>("downloader", 0);
        store_files_of::<T>(&owner, 1, expiry)?;
        NsnFs::<T>::read_file_pledge(
            RawOrigin::Signed(caller.clone()).into(),
            ReadPledgeRequest::<T> {
                downloader: caller.clone(),
                file_hash: bench_hash::<T>(0),
                read_plans: read_plans::<T>(),
            },
        )?;

        let unlock = ReadPledges::<T>::get(&caller, bench_hash::<T>(0))
            .map(|p| p.expire_height)
            .ok_or(BenchmarkError::Stop("pledge missing"))?;
        frame_system::Pallet::<T>::set_block_number(unlock);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), caller.clone(), bench_hash::<T>(0));

        assert!(!ReadPledges::<T>::contains_key(&caller, bench_hash::<T>(0)));
        Ok(())
    }

    impl_benchmark_test_suite!(NsnFs, crate::mock::ExtBuilder::default().build(), crate::mock::Test);
}
