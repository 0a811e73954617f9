// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

use crate::{
    Config, Error, Event, FileOwners, Pallet, WhiteListOf, WhiteListOp, WhiteListUpdate,
    WhiteLists,
};
use frame_support::{ensure, pallet_prelude::DispatchResult};

impl<T: Config> Pallet<T> {
    pub(crate) fn do_set_white_list(
        who: &T::AccountId,
        update: WhiteListUpdate<T>,
    ) -> DispatchResult {
        let owner = FileOwners::<T>::get(&update.file_hash).ok_or(Error::<T>::FileNotFound)?;
        ensure!(*who == owner, Error::<T>::NotAuthorized);

        let entries = update.entries;
        WhiteLists::<T>::try_mutate_exists(
            &owner,
            &update.file_hash,
            |maybe_list| -> DispatchResult {
                let mut list: WhiteListOf<T> = maybe_list.take().unwrap_or_default();
                match update.op {
                    WhiteListOp::Add => {
                        for entry in entries {
                            list.retain(|e| e.addr != entry.addr);
                            list.try_push(entry)
                                .map_err(|_| Error::<T>::WhiteListTooLong)?;
                        }
                    }
                    WhiteListOp::Remove => {
                        list.retain(|e| !entries.iter().any(|r| r.addr == e.addr));
                    }
                    WhiteListOp::Replace => list = entries,
                    WhiteListOp::Clear => list = WhiteListOf::<T>::default(),
                }
                // an empty list is the same as no list
                *maybe_list = if list.is_empty() { None } else { Some(list) };
                Ok(())
            },
        )?;

        Self::deposit_event(Event::WhiteListSet {
            file_hash: update.file_hash,
            owner,
            op: update.op,
        });

        Ok(())
    }
}
