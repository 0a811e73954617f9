// Copyright 2024 Neural Sovereign Network
// This file is part of NSN Chain.

//! Cost formulas shared by leases, files and read pledges.
//!
//! All functions are pure and return `None` on overflow so callers can map
//! the failure onto their own error.

use sp_runtime::traits::AtLeast32BitUnsigned;

/// Number of proof cycles between `time_start` and `time_expired`, never
/// less than one.
pub fn pdp_count(time_start: u64, time_expired: u64, pdp_interval: u64) -> Option<u64> {
    time_expired
        .checked_sub(time_start)?
        .checked_div(pdp_interval)?
        .checked_add(1)
}

/// Total escrow for a space lease.
pub fn space_fee<B: AtLeast32BitUnsigned + Copy>(
    pdp_count: u64,
    volume: u64,
    copy_number: u64,
    price_per_kb: u64,
) -> Option<B> {
    let units = pdp_count.checked_mul(volume)?.checked_mul(copy_number)?;
    priced(units, price_per_kb)
}

/// Total escrow for a pay-per-file deposit.
pub fn file_fee<B: AtLeast32BitUnsigned + Copy>(
    pdp_count: u64,
    file_block_count: u64,
    block_size: u64,
    copy_number: u64,
    price_per_kb: u64,
) -> Option<B> {
    let units = pdp_count
        .checked_mul(file_block_count)?
        .checked_mul(block_size)?
        .checked_mul(copy_number)?;
    priced(units, price_per_kb)
}

/// Fee for a freshly pledged read quota.
pub fn read_fee<B: AtLeast32BitUnsigned + Copy>(
    read_blocks: u64,
    block_size: u64,
    price_per_kb: u64,
) -> Option<B> {
    priced(read_blocks.checked_mul(block_size)?, price_per_kb)
}

fn priced<B: AtLeast32BitUnsigned + Copy>(units: u64, price: u64) -> Option<B> {
    let units = B::try_from(units).ok()?;
    let price = B::try_from(price).ok()?;
    units.checked_mul(&price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdp_count_includes_the_opening_cycle() {
        assert_eq!(pdp_count(0, 250, 100), Some(3));
        assert_eq!(pdp_count(0, 300, 100), Some(4));
        assert_eq!(pdp_count(10, 10, 100), Some(1));
    }

    #[test]
    fn pdp_count_rejects_bad_inputs() {
        assert_eq!(pdp_count(0, 250, 0), None);
        assert_eq!(pdp_count(300, 250, 100), None);
    }

    #[test]
    fn space_fee_matches_reference_lease() {
        // 3 cycles * 1000 volume * 2 copies * price 1
        assert_eq!(space_fee::<u128>(3, 1000, 2, 1), Some(6000));
        assert_eq!(space_fee::<u128>(3, 1000, 2, 0), Some(0));
    }

    #[test]
    fn file_fee_scales_with_block_size() {
        assert_eq!(file_fee::<u128>(2, 4, 256, 3, 1), Some(6144));
    }

    #[test]
    fn read_fee_only_charges_requested_blocks() {
        assert_eq!(read_fee::<u128>(10, 256, 2), Some(5120));
        assert_eq!(read_fee::<u128>(0, 256, 2), Some(0));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(space_fee::<u128>(u64::MAX, 2, 1, 1), None);
        // fits u64 units but not a u32 balance
        assert_eq!(read_fee::<u32>(1 << 20, 1 << 20, 1), None);
    }
}
