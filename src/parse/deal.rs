//! Deal and upfront-deal record parsing.

use serde_json::Value;

use super::{
    address_field, bool_field_or, field, i64_field, opt_i64_field, opt_str_field, str_field,
    u64_field, u64_field_or, u8_field,
};
use crate::domain::{
    CoreError, Deal, ExchangeRates, FixedPointAmount, RedemptionWindow, TimeSec, UnderlyingToken,
    UpfrontDeal, VestingSchedule,
};

fn parse_underlying_token(record: &Value) -> Result<UnderlyingToken, CoreError> {
    let decimals = u8_field(record, "underlyingDealTokenDecimals")?;
    Ok(UnderlyingToken {
        address: address_field(record, "underlyingDealToken")?,
        symbol: str_field(record, "underlyingDealTokenSymbol")?.to_string(),
        decimals,
        total: FixedPointAmount::from_raw_str(
            str_field(record, "underlyingDealTokenTotal")?,
            decimals,
        )?,
    })
}

/// Parse a standard two-phase deal record.
///
/// The redemption window exists only once the holder has funded; vesting
/// dates hang off the redemption end and stay `None` until then.
pub fn parse_deal(record: &Value, investment_decimals: u8) -> Result<Deal, CoreError> {
    let underlying = parse_underlying_token(record)?;

    let investment_total = FixedPointAmount::from_raw_str(
        str_field(record, "purchaseTokenTotalForDeal")?,
        investment_decimals,
    )?;
    let exchange_rates = ExchangeRates::from_totals(&investment_total, &underlying.total)?;

    let redemption = match opt_i64_field(record, "proRataRedemptionPeriodStart")? {
        None => None,
        Some(start) => Some(RedemptionWindow::new(
            TimeSec::new(start),
            u64_field(record, "proRataRedemptionPeriod")?,
            u64_field_or(record, "openRedemptionPeriod", 0)?,
        )),
    };

    let vesting = VestingSchedule::from_redemption_end(
        redemption.as_ref().map(RedemptionWindow::end),
        u64_field_or(record, "vestingCliff", 0)?,
        u64_field_or(record, "vestingPeriod", 0)?,
    );

    Ok(Deal {
        underlying,
        exchange_rates,
        vesting,
        redemption,
        holder_funding_expiration: TimeSec::new(i64_field(record, "holderFundingExpiration")?),
        holder_has_funded: bool_field_or(record, "isDealFunded", false),
    })
}

/// Parse an upfront-deal record.
///
/// The exchange rate is fixed at creation (`purchaseTokenPerDealToken`),
/// expressed at the investment token's decimals. Vesting anchors on
/// `vestingStart`, which the indexer sets once purchasing settles.
pub fn parse_upfront_deal(record: &Value, investment_decimals: u8) -> Result<UpfrontDeal, CoreError> {
    let underlying = parse_underlying_token(record)?;

    let rate = FixedPointAmount::from_raw_str(
        str_field(record, "purchaseTokenPerDealToken")?,
        investment_decimals,
    )?;
    let exchange_rates = ExchangeRates::from_fixed_rate(&rate)?;

    let vesting_start = opt_i64_field(record, "vestingStart")?.map(TimeSec::new);
    let vesting = VestingSchedule::from_redemption_end(
        vesting_start,
        u64_field_or(record, "vestingCliffPeriod", 0)?,
        u64_field_or(record, "vestingPeriod", 0)?,
    );

    let purchase_raise_minimum = match field(record, "purchaseRaiseMinimum") {
        None => FixedPointAmount::zero(investment_decimals),
        Some(_) => FixedPointAmount::from_raw_str(
            str_field(record, "purchaseRaiseMinimum")?,
            investment_decimals,
        )?,
    };

    Ok(UpfrontDeal {
        underlying,
        exchange_rates,
        vesting,
        purchase_raise_minimum,
        allows_deallocation: bool_field_or(record, "allowDeallocation", false),
        merkle_root: opt_str_field(record, "merkleRoot").map(str::to_string),
        total_users_accepted: u64_field_or(record, "totalUsersAccepted", 0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn standard_deal_record() -> Value {
        json!({
            "underlyingDealToken": "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984",
            "underlyingDealTokenSymbol": "UNI",
            "underlyingDealTokenDecimals": 18,
            "underlyingDealTokenTotal": "400000000000000000000",
            "purchaseTokenTotalForDeal": "100000000",
            "holderFundingExpiration": 1700010000,
            "isDealFunded": true,
            "proRataRedemptionPeriodStart": 1700000000,
            "proRataRedemptionPeriod": 3600,
            "openRedemptionPeriod": 1800,
            "vestingCliff": 600,
            "vestingPeriod": 86400
        })
    }

    #[test]
    fn test_parse_deal_full() {
        let deal = parse_deal(&standard_deal_record(), 6).unwrap();

        assert_eq!(deal.underlying.symbol, "UNI");
        assert!(deal.holder_has_funded);
        assert_eq!(deal.holder_funding_expiration, TimeSec::new(1700010000));

        let window = deal.redemption.unwrap();
        assert_eq!(window.pro_rata_end, TimeSec::new(1700003600));
        assert_eq!(window.open_end, Some(TimeSec::new(1700005400)));

        // cliff = redemption end + 600, vesting end = cliff + 86400
        assert_eq!(deal.vesting.cliff_end, Some(TimeSec::new(1700006000)));
        assert_eq!(deal.vesting.vesting_end, Some(TimeSec::new(1700092400)));

        // 100 investment tokens for 400 deal tokens
        assert_eq!(deal.exchange_rates.investment_per_deal.format(4), "4");
        assert_eq!(deal.exchange_rates.deal_per_investment.format(4), "0.25");
    }

    #[test]
    fn test_parse_deal_unfunded_has_no_dates() {
        let mut record = standard_deal_record();
        record["isDealFunded"] = json!(false);
        record["proRataRedemptionPeriodStart"] = json!(null);

        let deal = parse_deal(&record, 6).unwrap();
        assert!(!deal.holder_has_funded);
        assert!(deal.redemption.is_none());
        assert_eq!(deal.vesting.cliff_end, None);
        assert_eq!(deal.vesting.vesting_end, None);
    }

    #[test]
    fn test_parse_deal_zero_open_period_has_no_open_end() {
        let mut record = standard_deal_record();
        record["openRedemptionPeriod"] = json!(0);
        let deal = parse_deal(&record, 6).unwrap();
        assert_eq!(deal.redemption.unwrap().open_end, None);
    }

    #[test]
    fn test_parse_deal_zero_totals_fail() {
        let mut record = standard_deal_record();
        record["purchaseTokenTotalForDeal"] = json!("0");
        assert_eq!(parse_deal(&record, 6), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn test_parse_deal_missing_underlying_fails() {
        let mut record = standard_deal_record();
        record.as_object_mut().unwrap().remove("underlyingDealToken");
        assert!(matches!(
            parse_deal(&record, 6),
            Err(CoreError::MalformedRecord(_))
        ));
    }

    fn upfront_deal_record() -> Value {
        json!({
            "underlyingDealToken": "0x514910771af9ca656af840dff83e8264ecf986ca",
            "underlyingDealTokenSymbol": "LINK",
            "underlyingDealTokenDecimals": 18,
            "underlyingDealTokenTotal": "1000000000000000000000",
            "purchaseTokenPerDealToken": "2000000",
            "purchaseRaiseMinimum": "50000000",
            "allowDeallocation": true,
            "merkleRoot": "0xabcdef0000000000000000000000000000000000000000000000000000000000",
            "totalUsersAccepted": "7",
            "vestingStart": 1700000000,
            "vestingCliffPeriod": 0,
            "vestingPeriod": 7200
        })
    }

    #[test]
    fn test_parse_upfront_deal_full() {
        let upfront = parse_upfront_deal(&upfront_deal_record(), 6).unwrap();

        assert_eq!(upfront.exchange_rates.investment_per_deal.format(6), "2");
        assert_eq!(upfront.exchange_rates.deal_per_investment.format(6), "0.5");
        assert!(upfront.allows_deallocation);
        assert_eq!(upfront.total_users_accepted, 7);
        assert_eq!(upfront.purchase_raise_minimum.raw_string(), "50000000");
        assert_eq!(upfront.vesting.cliff_end, Some(TimeSec::new(1700000000)));
        assert_eq!(upfront.vesting.vesting_end, Some(TimeSec::new(1700007200)));
    }

    #[test]
    fn test_parse_upfront_deal_zero_rate_fails() {
        let mut record = upfront_deal_record();
        record["purchaseTokenPerDealToken"] = json!("0");
        assert_eq!(
            parse_upfront_deal(&record, 6),
            Err(CoreError::DivisionByZero)
        );
    }

    #[test]
    fn test_parse_upfront_deal_without_vesting_start() {
        let mut record = upfront_deal_record();
        record.as_object_mut().unwrap().remove("vestingStart");
        let upfront = parse_upfront_deal(&record, 6).unwrap();
        assert_eq!(upfront.vesting.vesting_end, None);
    }
}
