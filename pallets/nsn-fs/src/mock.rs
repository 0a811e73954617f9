// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.
//
// NSN Chain is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Test utilities for pallet-nsn-fs

use crate as pallet_nsn_fs;
use core::time::Duration;
use frame_support::{
    construct_runtime, derive_impl, parameter_types,
    storage::unhashed,
    traits::{ConstU128, ConstU32, ConstU64, Get, UnixTime},
    BoundedVec, PalletId,
};
use frame_system::pallet_prelude::BlockNumberFor;
use parity_scale_codec::{Decode, Encode};
use sp_runtime::{traits::IdentityLookup, BuildStorage, DispatchError, DispatchResult};

pub type AccountId = u64;
pub type Balance = u128;
pub type BlockNumber = BlockNumberFor<Test>;

type Block = frame_system::mocking::MockBlockU32<Test>;

// Configure mock runtime
construct_runtime!(
    pub enum Test
    {
        System: frame_system,
        Balances: pallet_balances,
        NsnFs: pallet_nsn_fs,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type Block = Block;
    type AccountId = AccountId;
    type Lookup = IdentityLookup<Self::AccountId>;
    type AccountData = pallet_balances::AccountData<Balance>;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
    type Balance = Balance;
    type ExistentialDeposit = ConstU128<1>;
    type AccountStore = System;
}

parameter_types! {
    pub const FsPalletId: PalletId = PalletId(*b"nsn/fsmk");
}

parameter_types! {
    /// Unix time (seconds) reported to the pallet
    pub static Now: u64 = 0;
}

/// Wall clock driven by [`Now`]
pub struct MockTime;
impl UnixTime for MockTime {
    fn now() -> Duration {
        Duration::from_secs(Now::get())
    }
}

/// Node registry kept in unhashed storage so item rollbacks undo credits too
pub struct MockNodeRegistry;
impl MockNodeRegistry {
    fn key(node: &AccountId) -> Vec<u8> {
        (b"mock/node-capacity", node).encode()
    }

    pub fn register(node: AccountId, capacity: u64) {
        unhashed::put(&Self::key(&node), &capacity);
    }

    pub fn capacity(node: AccountId) -> Option<u64> {
        unhashed::get(&Self::key(&node))
    }
}

impl pallet_nsn_fs::StorageNodeRegistry<AccountId> for MockNodeRegistry {
    fn release_capacity(node: &AccountId, amount: u64) -> DispatchResult {
        let current = Self::capacity(*node).ok_or(DispatchError::Other("unknown node"))?;
        unhashed::put(&Self::key(node), &current.saturating_add(amount));
        Ok(())
    }
}

/// Passports are the SCALE-encoded account id
pub struct MockPassport;
impl pallet_nsn_fs::PassportVerifier<AccountId, BlockNumber> for MockPassport {
    fn resolve(_height: BlockNumber, passport: &[u8]) -> Result<AccountId, DispatchError> {
        AccountId::decode(&mut &passport[..]).map_err(|_| DispatchError::Other("bad passport"))
    }
}

impl pallet_nsn_fs::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Currency = Balances;
    type UnixTime = MockTime;
    type NodeRegistry = MockNodeRegistry;
    type PassportVerifier = MockPassport;
    type PalletId = FsPalletId;
    type BlockSize = ConstU64<256>;
    type ReadPledgeGraceBlocks = ConstU32<30>;
    type MaxFileHashLen = ConstU32<64>;
    type MaxFilesPerCall = ConstU32<8>;
    type MaxReadPlans = ConstU32<4>;
    type MaxWhiteListLen = ConstU32<4>;
    type WeightInfo = ();
}

// Test accounts
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const DAVE: AccountId = 4;
pub const EVE: AccountId = 5;

// Storage nodes
pub const NODE_A: AccountId = 101;
pub const NODE_B: AccountId = 102;

pub const INITIAL_BALANCE: Balance = 10_000_000;

// Build test externalities
pub struct ExtBuilder {
    balances: Vec<(AccountId, Balance)>,
    space_price: u64,
    file_price: u64,
    read_price: u64,
}

impl Default for ExtBuilder {
    fn default() -> Self {
        Self {
            balances: vec![
                (ALICE, INITIAL_BALANCE),
                (BOB, INITIAL_BALANCE),
                (CHARLIE, INITIAL_BALANCE),
                (DAVE, INITIAL_BALANCE),
                (EVE, INITIAL_BALANCE),
            ],
            space_price: 1,
            file_price: 1,
            read_price: 1,
        }
    }
}

impl ExtBuilder {
    pub fn with_balances(mut self, balances: Vec<(AccountId, Balance)>) -> Self {
        self.balances = balances;
        self
    }

    pub fn with_prices(mut self, space: u64, file: u64, read: u64) -> Self {
        self.space_price = space;
        self.file_price = file;
        self.read_price = read;
        self
    }

    pub fn build(self) -> sp_io::TestExternalities {
        let mut storage = frame_system::GenesisConfig::<Test>::default()
            .build_storage()
            .unwrap();

        pallet_balances::GenesisConfig::<Test> {
            balances: self.balances,
            ..Default::default()
        }
        .assimilate_storage(&mut storage)
        .unwrap();

        pallet_nsn_fs::GenesisConfig::<Test> {
            space_price_per_kb: self.space_price,
            file_price_per_kb: self.file_price,
            read_price_per_kb: self.read_price,
            _marker: Default::default(),
        }
        .assimilate_storage(&mut storage)
        .unwrap();

        let mut ext = sp_io::TestExternalities::new(storage);
        ext.execute_with(|| {
            System::set_block_number(1);
            Now::set(0);
            MockNodeRegistry::register(NODE_A, 0);
            MockNodeRegistry::register(NODE_B, 0);
        });
        ext
    }
}

pub fn set_now(seconds: u64) {
    Now::set(seconds);
}

// Helper function to advance blocks
pub fn roll_to(n: BlockNumber) {
    while System::block_number() < n {
        System::set_block_number(System::block_number() + 1);
    }
}

pub fn hash(raw: &[u8]) -> BoundedVec<u8, ConstU32<64>> {
    BoundedVec::try_from(raw.to_vec()).expect("hash fits")
}

/// Escrowed funds, not counting the existential deposit seeded at genesis
pub fn escrow_balance() -> Balance {
    let ed: Balance = <Test as pallet_balances::Config>::ExistentialDeposit::get();
    Balances::free_balance(NsnFs::account_id()).saturating_sub(ed)
}

// Helper to get last event
pub fn last_event() -> RuntimeEvent {
    System::events().pop().expect("Event expected").event
}

// Helper to get all events
pub fn events() -> Vec<RuntimeEvent> {
    System::events().into_iter().map(|r| r.event).collect()
}

/// Pallet events only, oldest first
pub fn fs_events() -> Vec<pallet_nsn_fs::Event<Test>> {
    events()
        .into_iter()
        .filter_map(|e| match e {
            RuntimeEvent::NsnFs(inner) => Some(inner),
            _ => None,
        })
        .collect()
}
