//! Lifecycle stage derivation.
//!
//! The stage is a pure function of `(Pool, now)`, recomputed on demand.
//! There is no persisted state machine and no transition events.

use crate::domain::{Pool, PoolDeal, TimeSec};

/// The lifecycle stage of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStage {
    /// Accepting investments.
    Open,
    /// Investment window closed; waiting on a funded deal.
    AwaitingDeal,
    /// Deal funded and redeemable.
    DealReady,
    /// Redemption elapsed; deal tokens vesting.
    Vesting,
    /// Terminal.
    Complete,
}

impl PoolStage {
    /// Stable camelCase tag for API consumers.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStage::Open => "open",
            PoolStage::AwaitingDeal => "awaitingDeal",
            PoolStage::DealReady => "dealReady",
            PoolStage::Vesting => "vesting",
            PoolStage::Complete => "complete",
        }
    }
}

impl std::fmt::Display for PoolStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the current stage of a pool at the given instant.
///
/// Upfront-deal pools report `AwaitingDeal` the whole way through their
/// vesting window and only flip to `Complete` once vesting has fully
/// elapsed. That mirrors the behavior dashboards have always shown for
/// upfront deals and is kept as-is.
pub fn pool_stage(pool: &Pool, now: TimeSec) -> PoolStage {
    if let PoolDeal::Upfront(upfront) = &pool.deal {
        return match upfront.vesting.vesting_end {
            Some(vesting_end) if now >= vesting_end => PoolStage::Complete,
            _ => PoolStage::AwaitingDeal,
        };
    }

    match pool.investment_deadline {
        None => return PoolStage::Open,
        Some(deadline) if now < deadline => return PoolStage::Open,
        Some(_) => {}
    }

    let deal = match &pool.deal {
        PoolDeal::Deal(deal) => deal,
        _ => return PoolStage::AwaitingDeal,
    };
    if !deal.holder_has_funded {
        return PoolStage::AwaitingDeal;
    }
    let redemption = match &deal.redemption {
        Some(window) => window,
        None => return PoolStage::AwaitingDeal,
    };

    if now < redemption.end() {
        return PoolStage::DealReady;
    }
    match deal.vesting.vesting_end {
        Some(vesting_end) if now < vesting_end => PoolStage::Vesting,
        _ => PoolStage::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Address, ChainId, Deal, ExchangeRates, FixedPointAmount, PrivacyMode, RedemptionWindow,
        UnderlyingToken, UpfrontDeal, VestingSchedule,
    };

    fn amt(raw: &str, decimals: u8) -> FixedPointAmount {
        FixedPointAmount::from_raw_str(raw, decimals).unwrap()
    }

    fn underlying() -> UnderlyingToken {
        UnderlyingToken {
            address: Address::parse("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984").unwrap(),
            symbol: "UNI".to_string(),
            decimals: 18,
            total: amt("400000000000000000000", 18),
        }
    }

    fn rates() -> ExchangeRates {
        ExchangeRates::from_totals(&amt("100000000", 6), &amt("400000000000000000000", 18))
            .unwrap()
    }

    fn bare_pool(deal: PoolDeal) -> Pool {
        Pool {
            address: Address::parse("0x21b1f26ec9cb9a3cd7a55bc7bd9f4cb7d9ba3a2d").unwrap(),
            chain_id: ChainId::new(1),
            name: "Test Pool".to_string(),
            symbol: "vTEST".to_string(),
            created_at: TimeSec::new(0),
            investment_deadline: Some(TimeSec::new(1000)),
            deal_deadline: Some(TimeSec::new(5000)),
            investment_token_address: Address::parse(
                "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            )
            .unwrap(),
            investment_token_symbol: "USDC".to_string(),
            investment_token_decimals: 6,
            cap: FixedPointAmount::zero(6),
            total_deposited: FixedPointAmount::zero(6),
            total_withdrawn: FixedPointAmount::zero(6),
            total_redeemed: FixedPointAmount::zero(6),
            privacy: PrivacyMode::Public,
            nft_collection_rules: Vec::new(),
            ipfs_hash: None,
            deal,
        }
    }

    /// Funded deal: redemption [2000, 3000), vesting ends at 4000.
    fn funded_deal() -> Deal {
        let redemption = RedemptionWindow::new(TimeSec::new(2000), 500, 500);
        Deal {
            underlying: underlying(),
            exchange_rates: rates(),
            vesting: VestingSchedule::from_redemption_end(Some(redemption.end()), 0, 1000),
            redemption: Some(redemption),
            holder_funding_expiration: TimeSec::new(2000),
            holder_has_funded: true,
        }
    }

    #[test]
    fn test_stage_monotonic_through_lifecycle() {
        let pool = bare_pool(PoolDeal::Deal(funded_deal()));

        let expected = [
            (0, PoolStage::Open),
            (999, PoolStage::Open),
            (1000, PoolStage::DealReady), // deadline passed, deal already funded
            (2999, PoolStage::DealReady),
            (3000, PoolStage::Vesting),
            (3999, PoolStage::Vesting),
            (4000, PoolStage::Complete),
            (1_000_000, PoolStage::Complete),
        ];
        for (now, stage) in expected {
            assert_eq!(
                pool_stage(&pool, TimeSec::new(now)),
                stage,
                "at now={}",
                now
            );
        }
    }

    #[test]
    fn test_stage_awaiting_deal_before_funding() {
        let pool = bare_pool(PoolDeal::None);
        assert_eq!(pool_stage(&pool, TimeSec::new(1000)), PoolStage::AwaitingDeal);

        let mut deal = funded_deal();
        deal.holder_has_funded = false;
        deal.redemption = None;
        deal.vesting = VestingSchedule::from_redemption_end(None, 0, 1000);
        let pool = bare_pool(PoolDeal::Deal(deal));
        assert_eq!(pool_stage(&pool, TimeSec::new(1500)), PoolStage::AwaitingDeal);
    }

    #[test]
    fn test_stage_open_without_deadline() {
        let mut pool = bare_pool(PoolDeal::None);
        pool.investment_deadline = None;
        assert_eq!(pool_stage(&pool, TimeSec::new(i64::MAX)), PoolStage::Open);
    }

    #[test]
    fn test_stage_no_open_redemption_phase() {
        let redemption = RedemptionWindow::new(TimeSec::new(2000), 500, 0);
        let mut deal = funded_deal();
        deal.vesting = VestingSchedule::from_redemption_end(Some(redemption.end()), 0, 1000);
        deal.redemption = Some(redemption);
        let pool = bare_pool(PoolDeal::Deal(deal));

        assert_eq!(pool_stage(&pool, TimeSec::new(2400)), PoolStage::DealReady);
        assert_eq!(pool_stage(&pool, TimeSec::new(2500)), PoolStage::Vesting);
        assert_eq!(pool_stage(&pool, TimeSec::new(3500)), PoolStage::Complete);
    }

    #[test]
    fn test_upfront_pool_reports_awaiting_through_vesting() {
        let upfront = UpfrontDeal {
            underlying: underlying(),
            exchange_rates: ExchangeRates::from_fixed_rate(&amt("2000000", 6)).unwrap(),
            vesting: VestingSchedule::from_redemption_end(Some(TimeSec::new(2000)), 0, 1000),
            purchase_raise_minimum: FixedPointAmount::zero(6),
            allows_deallocation: false,
            merkle_root: None,
            total_users_accepted: 0,
        };
        let mut pool = bare_pool(PoolDeal::Upfront(upfront));
        pool.investment_deadline = None;
        pool.deal_deadline = None;

        // Still "awaiting" while vesting is actively in progress.
        assert_eq!(pool_stage(&pool, TimeSec::new(0)), PoolStage::AwaitingDeal);
        assert_eq!(pool_stage(&pool, TimeSec::new(2500)), PoolStage::AwaitingDeal);
        assert_eq!(pool_stage(&pool, TimeSec::new(3000)), PoolStage::Complete);
    }

    #[test]
    fn test_upfront_pool_without_vesting_start_awaits() {
        let upfront = UpfrontDeal {
            underlying: underlying(),
            exchange_rates: ExchangeRates::from_fixed_rate(&amt("2000000", 6)).unwrap(),
            vesting: VestingSchedule::from_redemption_end(None, 0, 1000),
            purchase_raise_minimum: FixedPointAmount::zero(6),
            allows_deallocation: false,
            merkle_root: None,
            total_users_accepted: 0,
        };
        let mut pool = bare_pool(PoolDeal::Upfront(upfront));
        pool.investment_deadline = None;
        pool.deal_deadline = None;
        assert_eq!(
            pool_stage(&pool, TimeSec::new(i64::MAX)),
            PoolStage::AwaitingDeal
        );
    }
}
