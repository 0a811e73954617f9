// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Read pledge escrow.

use crate::{
    economics, BalanceOf, CallContextOf, Config, Error, Event, FileHashOf, FileOwners, Pallet,
    ReadPlan, ReadPledge, ReadPledgeRequest, ReadPledges,
};
use alloc::vec::Vec;
use frame_support::{ensure, pallet_prelude::DispatchResult, traits::Get, BoundedVec};
use frame_system::pallet_prelude::BlockNumberFor;
use sp_runtime::traits::{CheckedAdd, Zero};

impl<T: Config> Pallet<T> {
    pub(crate) fn do_read_file_pledge(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        request: ReadPledgeRequest<T>,
    ) -> DispatchResult {
        ensure!(*who == request.downloader, Error::<T>::NotAuthorized);
        ensure!(!request.read_plans.is_empty(), Error::<T>::EmptyReadPlans);

        let owner = FileOwners::<T>::get(&request.file_hash).ok_or(Error::<T>::FileNotFound)?;
        let file = Self::get_and_update_file(&owner, &request.file_hash, ctx)
            .ok_or(Error::<T>::FileNotFound)?;
        ensure!(file.valid, Error::<T>::FileExpired);

        // Fresh plans start with nothing read; only these blocks are charged.
        let mut added_blocks: u64 = 0;
        let mut plans: Vec<ReadPlan<T>> = Vec::with_capacity(request.read_plans.len());
        for plan in request.read_plans {
            ensure!(
                !plans.iter().any(|p| p.node_addr == plan.node_addr),
                Error::<T>::DuplicateReadPlan
            );
            added_blocks = added_blocks
                .checked_add(plan.max_read_block_num)
                .ok_or(Error::<T>::Overflow)?;
            plans.push(ReadPlan {
                node_addr: plan.node_addr,
                max_read_block_num: plan.max_read_block_num,
                have_read_block_num: 0,
            });
        }

        let (rest_money, block_height) =
            match ReadPledges::<T>::get(&request.downloader, &request.file_hash) {
                Some(prior) => {
                    for old in prior.read_plans {
                        match plans.iter_mut().find(|p| p.node_addr == old.node_addr) {
                            Some(plan) => {
                                plan.max_read_block_num = plan
                                    .max_read_block_num
                                    .checked_add(old.max_read_block_num)
                                    .ok_or(Error::<T>::Overflow)?;
                                plan.have_read_block_num = old.have_read_block_num;
                            }
                            None => plans.push(old),
                        }
                    }
                    let block_height = if ctx.height >= prior.expire_height {
                        ctx.height
                    } else {
                        prior.block_height
                    };
                    (prior.rest_money, block_height)
                }
                None => (Zero::zero(), ctx.height),
            };

        let read_plans: BoundedVec<_, T::MaxReadPlans> =
            BoundedVec::try_from(plans).map_err(|_| Error::<T>::TooManyReadPlans)?;

        let price = Self::global_param()?.read_price_per_kb;
        let fee: BalanceOf<T> = economics::read_fee(added_blocks, T::BlockSize::get(), price)
            .ok_or(Error::<T>::Overflow)?;
        let rest_money = rest_money.checked_add(&fee).ok_or(Error::<T>::Overflow)?;

        let lock = file
            .file_block_count
            .checked_add(u64::from(T::ReadPledgeGraceBlocks::get()))
            .ok_or(Error::<T>::Overflow)?;
        let lock = BlockNumberFor::<T>::try_from(lock).map_err(|_| Error::<T>::Overflow)?;
        let expire_height = ctx.height.checked_add(&lock).ok_or(Error::<T>::Overflow)?;

        Self::collect(&request.downloader, fee)?;

        ReadPledges::<T>::insert(
            &request.downloader,
            &request.file_hash,
            ReadPledge::<T> {
                downloader: request.downloader.clone(),
                file_hash: request.file_hash.clone(),
                rest_money,
                block_height,
                expire_height,
                read_plans,
            },
        );

        Self::deposit_event(Event::ReadPledged {
            file_hash: request.file_hash,
            downloader: request.downloader,
            added_blocks,
            fee,
            expire_height,
        });

        Ok(())
    }

    pub(crate) fn do_cancel_file_read(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        downloader: T::AccountId,
        file_hash: FileHashOf<T>,
    ) -> DispatchResult {
        let pledge = ReadPledges::<T>::get(&downloader, &file_hash)
            .ok_or(Error::<T>::ReadPledgeNotFound)?;
        ensure!(*who == pledge.downloader, Error::<T>::NotAuthorized);
        ensure!(
            ctx.height >= pledge.expire_height,
            Error::<T>::ReadPledgeLocked
        );

        ReadPledges::<T>::remove(&downloader, &file_hash);
        Self::refund(&downloader, pledge.rest_money)?;

        Self::deposit_event(Event::ReadPledgeCancelled {
            file_hash,
            downloader,
            refund: pledge.rest_money,
        });

        Ok(())
    }
}
