// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Space lease lifecycle.

use crate::{
    economics, BalanceOf, CallContextOf, Config, Error, Event, Pallet, SpaceInfo, SpaceRequest,
    SpaceUpdate, Spaces, LOG_TARGET,
};
use frame_support::{ensure, pallet_prelude::DispatchResult};
use sp_runtime::{
    traits::{CheckedAdd, CheckedSub},
    DispatchError,
};

impl<T: Config> Pallet<T> {
    pub(crate) fn do_create_space(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        request: SpaceRequest<T>,
    ) -> DispatchResult {
        ensure!(*who == request.owner, Error::<T>::NotAuthorized);
        ensure!(
            !Spaces::<T>::contains_key(&request.owner),
            Error::<T>::SpaceAlreadyExists
        );
        ensure!(request.pdp_interval > 0, Error::<T>::InvalidPdpInterval);
        ensure!(
            request.time_expired > ctx.now,
            Error::<T>::InvalidTimeExpired
        );

        let pay_amount = Self::lease_cost(
            ctx.now,
            request.time_expired,
            request.pdp_interval,
            request.volume,
            request.copy_number,
        )?;
        Self::collect(&request.owner, pay_amount)?;

        let space = SpaceInfo::<T> {
            owner: request.owner.clone(),
            volume: request.volume,
            rest_vol: request.volume,
            copy_number: request.copy_number,
            pdp_interval: request.pdp_interval,
            time_start: ctx.now,
            time_expired: request.time_expired,
            pay_amount,
            rest_amount: pay_amount,
            valid: true,
        };
        Spaces::<T>::insert(&request.owner, space);

        Self::deposit_event(Event::SpaceCreated {
            owner: request.owner,
            volume: request.volume,
            pay_amount,
        });

        Ok(())
    }

    pub(crate) fn do_update_space(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        update: SpaceUpdate<T>,
    ) -> DispatchResult {
        ensure!(*who == update.payer, Error::<T>::NotAuthorized);
        ensure!(
            update.new_volume != 0 || update.new_time_expired != 0,
            Error::<T>::EmptySpaceUpdate
        );

        let mut space =
            Self::get_and_update_space(&update.owner, ctx).ok_or(Error::<T>::SpaceNotFound)?;
        ensure!(space.valid, Error::<T>::SpaceExpired);

        let new_time_expired = match update.new_time_expired {
            0 => space.time_expired,
            t => {
                ensure!(t > ctx.now, Error::<T>::InvalidTimeExpired);
                t
            }
        };
        let new_volume = match update.new_volume {
            0 => space.volume,
            v => v,
        };

        let used = space
            .volume
            .checked_sub(space.rest_vol)
            .ok_or(Error::<T>::AccountingViolation)?;
        ensure!(new_volume >= used, Error::<T>::VolumeBelowUsage);

        let new_pay = Self::lease_cost(
            space.time_start,
            new_time_expired,
            space.pdp_interval,
            new_volume,
            space.copy_number,
        )?;

        if new_pay > space.pay_amount {
            let delta = new_pay - space.pay_amount;
            space.rest_amount = space
                .rest_amount
                .checked_add(&delta)
                .ok_or(Error::<T>::Overflow)?;
            Self::collect(&update.payer, delta)?;
        } else if new_pay < space.pay_amount {
            let delta = space.pay_amount - new_pay;
            space.rest_amount = space
                .rest_amount
                .checked_sub(&delta)
                .ok_or(Error::<T>::InsufficientRestAmount)?;
            Self::refund(&update.payer, delta)?;
        }

        space.pay_amount = new_pay;
        space.volume = new_volume;
        space.rest_vol = new_volume - used;
        space.time_expired = new_time_expired;
        Spaces::<T>::insert(&update.owner, &space);

        Self::deposit_event(Event::SpaceUpdated {
            owner: update.owner,
            payer: update.payer,
            volume: new_volume,
            time_expired: new_time_expired,
            pay_amount: new_pay,
        });

        Ok(())
    }

    pub(crate) fn do_delete_space(
        who: &T::AccountId,
        ctx: &CallContextOf<T>,
        owner: T::AccountId,
    ) -> DispatchResult {
        ensure!(*who == owner, Error::<T>::NotAuthorized);

        let space = Self::get_and_update_space(&owner, ctx).ok_or(Error::<T>::SpaceNotFound)?;
        ensure!(space.rest_vol == space.volume, Error::<T>::SpaceInUse);

        Spaces::<T>::remove(&owner);
        Self::refund(&owner, space.rest_amount)?;

        Self::deposit_event(Event::SpaceDeleted {
            owner,
            refund: space.rest_amount,
        });

        Ok(())
    }

    /// Load a lease, marking it invalid once its window has closed.
    ///
    /// Escrow and volume are left untouched on expiry; whatever remains is
    /// returned through the normal delete path.
    pub(crate) fn get_and_update_space(
        owner: &T::AccountId,
        ctx: &CallContextOf<T>,
    ) -> Option<SpaceInfo<T>> {
        let mut space = Spaces::<T>::get(owner)?;
        if Self::expire_space(&mut space, ctx) {
            Spaces::<T>::insert(owner, &space);
        }
        Some(space)
    }

    /// Read-only counterpart of [`Self::get_and_update_space`].
    pub(crate) fn space_view(owner: &T::AccountId, ctx: &CallContextOf<T>) -> Option<SpaceInfo<T>> {
        let mut space = Spaces::<T>::get(owner)?;
        Self::expire_space(&mut space, ctx);
        Some(space)
    }

    fn expire_space(space: &mut SpaceInfo<T>, ctx: &CallContextOf<T>) -> bool {
        if space.valid && ctx.now > space.time_expired {
            log::debug!(
                target: LOG_TARGET,
                "space of {:?} expired at {}",
                space.owner,
                space.time_expired,
            );
            space.valid = false;
            return true;
        }
        false
    }

    fn lease_cost(
        time_start: u64,
        time_expired: u64,
        pdp_interval: u64,
        volume: u64,
        copy_number: u64,
    ) -> Result<BalanceOf<T>, DispatchError> {
        let price = Self::global_param()?.space_price_per_kb;
        let cycles = economics::pdp_count(time_start, time_expired, pdp_interval)
            .ok_or(Error::<T>::InvalidTimeExpired)?;
        economics::space_fee(cycles, volume, copy_number, price)
            .ok_or_else(|| Error::<T>::Overflow.into())
    }
}
