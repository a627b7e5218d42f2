use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Currency & Trading Pair
// ---------------------------------------------------------------------------

/// A currency the balance sheet tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Base fiat.
    Cny,
    Btc,
    Bch,
    Eth,
}

impl Currency {
    /// Every currency a zeroed balance snapshot starts with.
    pub const ALL: [Currency; 4] = [Currency::Cny, Currency::Btc, Currency::Bch, Currency::Eth];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Cny => "cny",
            Currency::Btc => "btc",
            Currency::Bch => "bch",
            Currency::Eth => "eth",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The market a broker trades, fixed for the broker's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    /// Currency prices are quoted in.
    pub base: Currency,
    /// Currency being bought and sold.
    pub market: Currency,
    /// Exchange-specific symbol for the pair (e.g. "btc_cny").
    pub code: String,
}

impl TradingPair {
    pub fn new(base: Currency, market: Currency, code: impl Into<String>) -> Self {
        Self {
            base,
            market,
            code: code.into(),
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.market, self.base)
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// How an order rests on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Plain limit order; may take liquidity on arrival.
    Limit,
    /// Post-only limit order; the venue rejects it instead of letting it take.
    Maker,
}

/// The lifecycle state of an order, as reported by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::PartiallyFilled)
    }
}

/// Venue-assigned order identifier. Some venues use numeric ids, so the
/// token is kept opaque as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Venues hand back an empty token on some partial failures; the broker
    /// layer short-circuits on these.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Client-supplied idempotency token attached to a placement. The venue
/// echoes it back on the resulting order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random token for callers that do not track their own.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An order as reported by the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Exchange pair code the order was placed on.
    pub pair_code: String,
    pub side: Side,
    pub order_type: OrderType,
    pub amount: Decimal,
    pub filled_amount: Decimal,
    pub price: Decimal,
    /// Volume-weighted fill price, once anything has filled.
    pub avg_fill_price: Option<Decimal>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client_id: Option<ClientOrderId>,
}

impl Order {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.amount - self.filled_amount
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Outcome of cancelling a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub id: OrderId,
    /// Status the venue reported after the cancel request; a fully filled
    /// order can no longer be cancelled and comes back `Filled`.
    pub status: OrderStatus,
}

/// Summary of a cancel-all sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAllReport {
    pub cancelled: Vec<OrderId>,
}

impl CancelAllReport {
    pub fn count(&self) -> usize {
        self.cancelled.len()
    }
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

/// Holdings of a single currency. `available` excludes amounts locked in
/// open orders; the venue maintains `available <= total`, this layer does
/// not re-check it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub total: Decimal,
    pub available: Decimal,
}

impl AssetBalance {
    pub const ZERO: AssetBalance = AssetBalance {
        total: Decimal::ZERO,
        available: Decimal::ZERO,
    };

    pub fn new(total: Decimal, available: Decimal) -> Self {
        Self { total, available }
    }

    /// Amount tied up in open orders.
    pub fn locked(&self) -> Decimal {
        self.total - self.available
    }
}

/// Point-in-time view of holdings across every tracked currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    balances: BTreeMap<Currency, AssetBalance>,
}

impl BalanceSnapshot {
    /// Snapshot with every tracked currency at zero. A live binding
    /// overwrites this with its first balance fetch.
    pub fn zeroed() -> Self {
        let balances = Currency::ALL
            .iter()
            .map(|&currency| (currency, AssetBalance::ZERO))
            .collect();
        Self { balances }
    }

    pub fn get(&self, currency: Currency) -> AssetBalance {
        self.balances
            .get(&currency)
            .copied()
            .unwrap_or(AssetBalance::ZERO)
    }

    pub fn set(&mut self, currency: Currency, balance: AssetBalance) {
        self.balances.insert(currency, balance);
    }

    pub fn total(&self, currency: Currency) -> Decimal {
        self.get(currency).total
    }

    pub fn available(&self, currency: Currency) -> Decimal {
        self.get(currency).available
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, AssetBalance)> + '_ {
        self.balances.iter().map(|(&currency, &held)| (currency, held))
    }
}

impl Default for BalanceSnapshot {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl fmt::Display for BalanceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (currency, held) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}: {}/{}", currency, held.available, held.total)?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Funding
// ---------------------------------------------------------------------------

/// Venue-issued address for depositing into the trading account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositAddress(String);

impl DepositAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Venue-issued identifier for a withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(String);

impl TransferId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zeroed_snapshot_tracks_every_currency() {
        let snapshot = BalanceSnapshot::zeroed();
        for currency in Currency::ALL {
            assert_eq!(snapshot.total(currency), Decimal::ZERO);
            assert_eq!(snapshot.available(currency), Decimal::ZERO);
        }
        assert_eq!(snapshot.to_string(), "cny: 0/0 btc: 0/0 bch: 0/0 eth: 0/0");
    }

    #[test]
    fn locked_is_total_minus_available() {
        let held = AssetBalance::new(dec!(10), dec!(7.5));
        assert_eq!(held.locked(), dec!(2.5));
    }

    #[test]
    fn trading_pair_renders_market_over_base() {
        let pair = TradingPair::new(Currency::Cny, Currency::Btc, "btc_cny");
        assert_eq!(pair.to_string(), "btc/cny");
        assert_eq!(pair.code, "btc_cny");
    }

    #[test]
    fn side_opposite_flips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn order_ids_can_be_empty_tokens() {
        assert!(OrderId::new("").is_empty());
        assert!(!OrderId::new("42").is_empty());
    }

    #[test]
    fn generated_client_ids_are_unique() {
        assert_ne!(ClientOrderId::generate(), ClientOrderId::generate());
    }

    #[test]
    fn remaining_amount_counts_down_with_fills() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new("7"),
            pair_code: "btc_cny".to_string(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            amount: dec!(3),
            filled_amount: dec!(1.2),
            price: dec!(25000),
            avg_fill_price: Some(dec!(24990)),
            status: OrderStatus::PartiallyFilled,
            created_at: now,
            updated_at: now,
            client_id: None,
        };
        assert_eq!(order.remaining_amount(), dec!(1.8));
        assert!(order.is_open());
    }

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap(),
            "\"partially_filled\""
        );
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&Currency::Eth).unwrap(), "\"eth\"");
    }
}
