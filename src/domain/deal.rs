//! Deal and upfront-deal value objects with derived date math.

use super::{Address, CoreError, FixedPointAmount, TimeSec};

/// The token a deal pays out in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderlyingToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Total underlying supplied by the holder.
    pub total: FixedPointAmount,
}

/// Conversion rates between investment tokens and deal tokens.
///
/// Both rates are expressed at the larger of the two token decimal counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRates {
    pub investment_per_deal: FixedPointAmount,
    pub deal_per_investment: FixedPointAmount,
}

impl ExchangeRates {
    /// Rates for a standard deal, derived from the funded totals.
    ///
    /// `investment_per_deal = deal_total / investment_total`, and
    /// `deal_per_investment` is its reciprocal. These determine investor
    /// payout ratios, so degenerate inputs fail loudly instead of
    /// returning zero.
    ///
    /// # Errors
    /// `DivisionByZero` when either total is zero.
    pub fn from_totals(
        investment_total: &FixedPointAmount,
        deal_total: &FixedPointAmount,
    ) -> Result<Self, CoreError> {
        if investment_total.is_zero() || deal_total.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        let investment_per_deal = deal_total.div(investment_total)?;
        let deal_per_investment = investment_per_deal.reciprocal()?;
        Ok(ExchangeRates {
            investment_per_deal,
            deal_per_investment,
        })
    }

    /// Rates for an upfront deal, where the purchase-token-per-deal-token
    /// rate is fixed at creation rather than derived by division.
    ///
    /// # Errors
    /// `DivisionByZero` when the rate is zero.
    pub fn from_fixed_rate(purchase_per_deal: &FixedPointAmount) -> Result<Self, CoreError> {
        if purchase_per_deal.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        Ok(ExchangeRates {
            investment_per_deal: *purchase_per_deal,
            deal_per_investment: purchase_per_deal.reciprocal()?,
        })
    }
}

/// Cliff + linear vesting dates, anchored on the redemption end instant.
///
/// Both ends are `None` until the deal is funded and redemption has a
/// defined end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingSchedule {
    pub cliff_duration_secs: u64,
    pub period_duration_secs: u64,
    pub cliff_end: Option<TimeSec>,
    pub vesting_end: Option<TimeSec>,
}

impl VestingSchedule {
    /// Derive vesting dates from an optional redemption-end instant.
    pub fn from_redemption_end(
        redemption_end: Option<TimeSec>,
        cliff_duration_secs: u64,
        period_duration_secs: u64,
    ) -> Self {
        let cliff_end = redemption_end.map(|end| end.plus(cliff_duration_secs));
        let vesting_end = cliff_end.map(|end| end.plus(period_duration_secs));
        VestingSchedule {
            cliff_duration_secs,
            period_duration_secs,
            cliff_end,
            vesting_end,
        }
    }
}

/// Which redemption phase is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionPeriod {
    /// Phase 1: purchasers redeem up to their pro-rata share.
    ProRata,
    /// Phase 2: remaining capacity is first come, first served.
    Open,
}

impl RedemptionPeriod {
    /// Numeric phase tag used by API consumers (1 = pro-rata, 2 = open).
    pub fn as_u8(&self) -> u8 {
        match self {
            RedemptionPeriod::ProRata => 1,
            RedemptionPeriod::Open => 2,
        }
    }
}

/// The two-phase redemption window of a standard deal.
///
/// `open_end` is `None` when the deal has no open phase. The active
/// period is derived, never stored: callers pass "now" on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionWindow {
    pub pro_rata_start: TimeSec,
    pub pro_rata_end: TimeSec,
    pub open_end: Option<TimeSec>,
}

impl RedemptionWindow {
    /// Build a window from a start instant and the two phase durations.
    /// A zero `open_duration` means there is no open phase at all.
    pub fn new(pro_rata_start: TimeSec, pro_rata_duration_secs: u64, open_duration_secs: u64) -> Self {
        let pro_rata_end = pro_rata_start.plus(pro_rata_duration_secs);
        let open_end = if open_duration_secs == 0 {
            None
        } else {
            Some(pro_rata_end.plus(open_duration_secs))
        };
        RedemptionWindow {
            pro_rata_start,
            pro_rata_end,
            open_end,
        }
    }

    /// The instant the whole window closes.
    pub fn end(&self) -> TimeSec {
        self.open_end.unwrap_or(self.pro_rata_end)
    }

    /// The phase active at `now`, or `None` outside the window.
    pub fn period_at(&self, now: TimeSec) -> Option<RedemptionPeriod> {
        if now < self.pro_rata_start {
            return None;
        }
        if now < self.pro_rata_end {
            return Some(RedemptionPeriod::ProRata);
        }
        match self.open_end {
            Some(open_end) if now < open_end => Some(RedemptionPeriod::Open),
            _ => None,
        }
    }
}

/// A standard two-phase deal attached to a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub underlying: UnderlyingToken,
    pub exchange_rates: ExchangeRates,
    pub vesting: VestingSchedule,
    /// Present once the holder funds and redemption is scheduled.
    pub redemption: Option<RedemptionWindow>,
    pub holder_funding_expiration: TimeSec,
    pub holder_has_funded: bool,
}

/// A deal whose terms are fixed at pool creation; redemption is immediate
/// on deposit rather than two-phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpfrontDeal {
    pub underlying: UnderlyingToken,
    pub exchange_rates: ExchangeRates,
    pub vesting: VestingSchedule,
    pub purchase_raise_minimum: FixedPointAmount,
    pub allows_deallocation: bool,
    pub merkle_root: Option<String>,
    pub total_users_accepted: u64,
}
