// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Weights for pallet-nsn-fs
//!
//! THIS FILE WAS AUTO-GENERATED USING THE SUBSTRATE BENCHMARK CLI VERSION 4.0.0-dev
//! DATE: Placeholder - benchmarks to be run
//! HOSTNAME: Placeholder
//! CPU: Placeholder
//!
//! NOTE: Runtime benchmarking not yet performed. These are placeholder weights
//! with estimated PoV (Proof of Validity) sizes for Cumulus compatibility.
//! Batch calls scale linearly in the number of items `n`.

#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{traits::Get, weights::Weight};

/// Weight functions needed for pallet_nsn_fs.
pub trait WeightInfo {
    fn create_space() -> Weight;
    fn update_space() -> Weight;
    fn delete_space() -> Weight;
    fn store_files(n: u32) -> Weight;
    fn renew_files(n: u32) -> Weight;
    fn delete_files(n: u32) -> Weight;
    fn transfer_files(n: u32) -> Weight;
    fn set_white_list() -> Weight;
    fn read_file_pledge() -> Weight;
    fn cancel_file_read() -> Weight;
}

/// Weights for pallet_nsn_fs using the Substrate node and recommended hardware.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Storage: NsnFs Spaces (r:1 w:1)
    /// Proof: NsnFs Spaces (max_values: None, max_size: Some(169), added: 2644, mode: MaxEncodedLen)
    /// Storage: NsnFs GlobalParams (r:1 w:0)
    /// Proof: NsnFs GlobalParams (max_values: Some(1), max_size: Some(24), added: 519, mode: MaxEncodedLen)
    /// Storage: System Account (r:2 w:2)
    fn create_space() -> Weight {
        Weight::from_parts(48_000_000, 6196)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    /// Storage: NsnFs Spaces (r:1 w:1)
    /// Storage: NsnFs GlobalParams (r:1 w:0)
    /// Storage: System Account (r:2 w:2)
    fn update_space() -> Weight {
        Weight::from_parts(52_000_000, 6196)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    /// Storage: NsnFs Spaces (r:1 w:1)
    /// Storage: System Account (r:2 w:2)
    fn delete_space() -> Weight {
        Weight::from_parts(45_000_000, 6196)
            .saturating_add(T::DbWeight::get().reads(3))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    /// Storage: NsnFs FileOwners (r:1 w:1)
    /// Storage: NsnFs Files (r:1 w:1)
    /// Storage: NsnFs GlobalParams (r:1 w:0)
    /// Storage: System Account (r:2 w:2)
    /// The range of component `n` is `[1, 32]`.
    fn store_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(55_000_000, 2670).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((5_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((4_u64).saturating_mul(n.into())))
    }

    /// Storage: NsnFs Files (r:1 w:1)
    /// Storage: NsnFs GlobalParams (r:1 w:0)
    /// Storage: System Account (r:2 w:2)
    /// The range of component `n` is `[1, 32]`.
    fn renew_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(45_000_000, 2670).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(n.into())))
    }

    /// Storage: NsnFs FileOwners (r:1 w:1)
    /// Storage: NsnFs Files (r:1 w:1)
    /// Storage: NsnFs PdpRecords (r:1 w:1)
    /// Storage: NsnFs WhiteLists (r:0 w:1)
    /// Storage: System Account (r:2 w:2)
    /// The range of component `n` is `[1, 32]`.
    fn delete_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(60_000_000, 2670).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((5_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((6_u64).saturating_mul(n.into())))
    }

    /// Storage: NsnFs FileOwners (r:1 w:1)
    /// Storage: NsnFs Files (r:1 w:2)
    /// Storage: NsnFs PdpRecords (r:1 w:2)
    /// Storage: NsnFs WhiteLists (r:1 w:1)
    /// The range of component `n` is `[1, 32]`.
    fn transfer_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(40_000_000, 2670).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(n.into())))
            .saturating_add(T::DbWeight::get().writes((6_u64).saturating_mul(n.into())))
    }

    /// Storage: NsnFs FileOwners (r:1 w:0)
    /// Storage: NsnFs WhiteLists (r:1 w:1)
    fn set_white_list() -> Weight {
        Weight::from_parts(30_000_000, 4210)
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    /// Storage: NsnFs FileOwners (r:1 w:0)
    /// Storage: NsnFs Files (r:1 w:0)
    /// Storage: NsnFs ReadPledges (r:1 w:1)
    /// Storage: NsnFs GlobalParams (r:1 w:0)
    /// Storage: System Account (r:2 w:2)
    fn read_file_pledge() -> Weight {
        Weight::from_parts(50_000_000, 6196)
            .saturating_add(T::DbWeight::get().reads(6))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    /// Storage: NsnFs ReadPledges (r:1 w:1)
    /// Storage: System Account (r:2 w:2)
    fn cancel_file_read() -> Weight {
        Weight::from_parts(40_000_000, 6196)
            .saturating_add(T::DbWeight::get().reads(3))
            .saturating_add(T::DbWeight::get().writes(3))
    }
}

// For backwards compatibility and tests
impl WeightInfo for () {
    fn create_space() -> Weight {
        Weight::from_parts(48_000_000, 6196)
    }
    fn update_space() -> Weight {
        Weight::from_parts(52_000_000, 6196)
    }
    fn delete_space() -> Weight {
        Weight::from_parts(45_000_000, 6196)
    }
    fn store_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(55_000_000, 2670).saturating_mul(n.into()))
    }
    fn renew_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(45_000_000, 2670).saturating_mul(n.into()))
    }
    fn delete_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(60_000_000, 2670).saturating_mul(n.into()))
    }
    fn transfer_files(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 3593)
            .saturating_add(Weight::from_parts(40_000_000, 2670).saturating_mul(n.into()))
    }
    fn set_white_list() -> Weight {
        Weight::from_parts(30_000_000, 4210)
    }
    fn read_file_pledge() -> Weight {
        Weight::from_parts(50_000_000, 6196)
    }
    fn cancel_file_read() -> Weight {
        Weight::from_parts(40_000_000, 6196)
    }
}
