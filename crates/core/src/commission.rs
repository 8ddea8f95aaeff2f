//! Commission split math.
//!
//! All amounts are integer cents. Shares are derived by subtraction from the
//! rounded larger figure, so each split sums exactly; no cent is lost or
//! invented by rounding.
//!
//! Two schemes exist, one per product line:
//!
//! - **Rentals**: a configurable rate (default 10%) of the booking total is
//!   the commission; the platform takes 20% of that, and the remainder is
//!   split 70/30 between the owner agent and the booking agent.
//! - **Sales**: 20% of the sale price forms the commission pool, split
//!   48/48/4 between the listing agent, the selling agent, and the platform.

/// Platform's share of a rental commission.
const RENTAL_PLATFORM_SHARE: f64 = 0.20;

/// Owner agent's share of the remaining rental pool.
const RENTAL_OWNER_SHARE: f64 = 0.70;

/// Commission pool as a share of the sale price.
const SALES_POOL_SHARE: f64 = 0.20;

/// Listing and selling agents' shares of the sales pool.
const SALES_AGENT_SHARE: f64 = 0.48;

/// A rental booking's commission split, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalSplit {
    /// Total commission.
    pub amount: i64,
    /// Owner agent's share.
    pub owner_commission: i64,
    /// Booking agent's share.
    pub booking_commission: i64,
    /// Platform's share.
    pub platform_fee: i64,
}

/// A closed sale's commission split, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesSplit {
    /// Total commission pool.
    pub pool: i64,
    /// Listing agent's share.
    pub listing_commission: i64,
    /// Selling agent's share.
    pub selling_commission: i64,
    /// Platform's share.
    pub platform_fee: i64,
}

fn share(amount: i64, fraction: f64) -> i64 {
    (amount as f64 * fraction).round() as i64
}

/// Split a rental booking total at `rate` percent.
///
/// `owner_commission + booking_commission + platform_fee == amount` holds
/// exactly for every input.
#[must_use]
pub fn rental_split(total_amount: i64, rate: f64) -> RentalSplit {
    let amount = share(total_amount, rate / 100.0);
    let platform_fee = share(amount, RENTAL_PLATFORM_SHARE);
    let pool = amount - platform_fee;
    let owner_commission = share(pool, RENTAL_OWNER_SHARE);
    let booking_commission = pool - owner_commission;

    RentalSplit {
        amount,
        owner_commission,
        booking_commission,
        platform_fee,
    }
}

/// Split a sale price into the 48/48/4 sales commission pool.
///
/// `listing_commission + selling_commission + platform_fee == pool` holds
/// exactly for every input.
#[must_use]
pub fn sales_split(sale_price: i64) -> SalesSplit {
    let pool = share(sale_price, SALES_POOL_SHARE);
    let listing_commission = share(pool, SALES_AGENT_SHARE);
    let selling_commission = share(pool, SALES_AGENT_SHARE);
    let platform_fee = pool - listing_commission - selling_commission;

    SalesSplit {
        pool,
        listing_commission,
        selling_commission,
        platform_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_split_reference_case() {
        // 1000.00 at 10% -> 100.00 commission, 20.00 platform, 56.00 / 24.00
        let split = rental_split(100_000, 10.0);
        assert_eq!(split.amount, 10_000);
        assert_eq!(split.platform_fee, 2_000);
        assert_eq!(split.owner_commission, 5_600);
        assert_eq!(split.booking_commission, 2_400);
    }

    #[test]
    fn test_rental_split_sums_exactly() {
        for total in [1, 99, 101, 12_345, 99_999, 1_000_001] {
            for rate in [5.0, 7.5, 10.0, 12.5] {
                let s = rental_split(total, rate);
                assert_eq!(
                    s.owner_commission + s.booking_commission + s.platform_fee,
                    s.amount,
                    "total={total} rate={rate}"
                );
            }
        }
    }

    #[test]
    fn test_rental_split_zero() {
        let s = rental_split(0, 10.0);
        assert_eq!(s.amount, 0);
        assert_eq!(s.owner_commission, 0);
        assert_eq!(s.booking_commission, 0);
        assert_eq!(s.platform_fee, 0);
    }

    #[test]
    fn test_sales_split_reference_case() {
        // 500,000.00 sale -> 100,000.00 pool -> 48,000 / 48,000 / 4,000
        let split = sales_split(50_000_000);
        assert_eq!(split.pool, 10_000_000);
        assert_eq!(split.listing_commission, 4_800_000);
        assert_eq!(split.selling_commission, 4_800_000);
        assert_eq!(split.platform_fee, 400_000);
    }

    #[test]
    fn test_sales_split_sums_exactly() {
        for price in [1, 77, 12_345, 99_999_999] {
            let s = sales_split(price);
            assert_eq!(
                s.listing_commission + s.selling_commission + s.platform_fee,
                s.pool,
                "price={price}"
            );
        }
    }
}
