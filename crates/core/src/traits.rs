use crate::models::*;
use async_trait::async_trait;
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Exchange Trait
// ---------------------------------------------------------------------------

/// Errors surfaced by a concrete exchange binding.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("order rejected: {0}")]
    OrderRejected(String),
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),
    #[error("insufficient {currency} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        currency: Currency,
        requested: Decimal,
        available: Decimal,
    },
    #[error("{0} is not supported on this exchange")]
    Unsupported(&'static str),
    #[error("exchange error: {0}")]
    Other(String),
}

/// A concrete exchange binding supplying the trading primitives.
///
/// Every call round-trips to the venue; no order lifecycle is tracked on
/// this side. Bindings backed by a plain HTTP client are safe to share
/// across tasks; a binding that caches state must guard it internally.
/// Timeouts belong to the binding's transport, not to this interface.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Venue name used in log lines.
    fn name(&self) -> &str;

    /// Place a limit order.
    async fn place_limit(
        &self,
        side: Side,
        amount: Decimal,
        price: Decimal,
        client_id: Option<ClientOrderId>,
    ) -> Result<OrderId, ExchangeError>;

    /// Place a post-only limit order; the venue must reject it rather than
    /// let it take liquidity.
    async fn place_maker(
        &self,
        side: Side,
        amount: Decimal,
        price: Decimal,
    ) -> Result<OrderId, ExchangeError>;

    /// Look up a single order.
    async fn order(&self, id: &OrderId) -> Result<Order, ExchangeError>;

    /// Cancel a single order.
    async fn cancel(&self, id: &OrderId) -> Result<Cancellation, ExchangeError>;

    /// Look up a batch of orders. Ids the venue does not know are absent
    /// from the result.
    async fn orders(&self, ids: &[OrderId]) -> Result<Vec<Order>, ExchangeError>;

    /// Past orders, oldest first.
    async fn order_history(&self) -> Result<Vec<Order>, ExchangeError>;

    /// Current account holdings.
    async fn balances(&self) -> Result<BalanceSnapshot, ExchangeError>;

    /// Cancel every open order on the pair.
    async fn cancel_all(&self) -> Result<CancelAllReport, ExchangeError>;

    /// Funding endpoints are not wired up for any venue.
    async fn deposit(&self) -> Result<DepositAddress, ExchangeError> {
        Err(ExchangeError::Unsupported("deposit"))
    }

    async fn withdraw(
        &self,
        _amount: Decimal,
        _address: &str,
    ) -> Result<TransferId, ExchangeError> {
        Err(ExchangeError::Unsupported("withdraw"))
    }
}
