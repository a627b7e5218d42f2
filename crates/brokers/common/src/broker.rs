use rust_decimal::Decimal;
use spreadbot_core::{
    BalanceSnapshot, CancelAllReport, Cancellation, ClientOrderId, DepositAddress, Exchange,
    ExchangeError, Order, OrderId, Side, TradingPair, TransferId,
};
use spreadbot_risk::{check_order_volume, OrderLimits, RiskViolation};
use std::fmt;
use std::future::Future;
use tracing::{error, info};

/// Uniform front over a concrete exchange binding.
///
/// Every trading call gets the same treatment: placements run a pre-flight
/// volume check and emit one structured log line, and any venue-side failure
/// is logged and contained to `None` instead of propagating. A `None` result
/// means the outcome is unknown; the caller reconciles by re-querying, it
/// must not assume the call never happened.
///
/// All operations take `&self` except [`Broker::get_balances`], which
/// refreshes the cached balance sheet, so sharing a broker across tasks
/// needs an external lock.
pub struct Broker {
    exchange: Box<dyn Exchange>,
    pair: TradingPair,
    limits: OrderLimits,
    balances: BalanceSnapshot,
}

impl Broker {
    /// Wrap a binding for one trading pair. The balance sheet starts zeroed
    /// and holds real numbers only after the first successful
    /// [`Broker::get_balances`].
    pub fn new(exchange: impl Exchange + 'static, pair: TradingPair, limits: OrderLimits) -> Self {
        Self {
            exchange: Box::new(exchange),
            pair,
            limits,
            balances: BalanceSnapshot::zeroed(),
        }
    }

    /// Venue name of the underlying binding.
    pub fn name(&self) -> &str {
        self.exchange.name()
    }

    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    /// Balance sheet from the last successful fetch (zeroed until then).
    pub fn balance_sheet(&self) -> &BalanceSnapshot {
        &self.balances
    }

    /// Run one venue call, containing any failure to a logged `None`.
    async fn contain<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T, ExchangeError>>,
    ) -> Option<T> {
        match call.await {
            Ok(value) => Some(value),
            Err(err) => {
                error!(exchange = self.exchange.name(), op, %err, "exchange call failed");
                None
            }
        }
    }

    async fn place_limit(
        &self,
        side: Side,
        amount: Decimal,
        price: Decimal,
        client_id: Option<ClientOrderId>,
    ) -> Result<Option<OrderId>, RiskViolation> {
        check_order_volume(amount, &self.limits)?;
        info!(
            exchange = self.exchange.name(),
            side = ?side,
            %amount,
            market = %self.pair.market,
            %price,
            base = %self.pair.base,
            "limit order"
        );
        Ok(self
            .contain(
                "place_limit",
                self.exchange.place_limit(side, amount, price, client_id),
            )
            .await)
    }

    async fn place_maker(
        &self,
        side: Side,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Option<OrderId>, RiskViolation> {
        check_order_volume(amount, &self.limits)?;
        info!(
            exchange = self.exchange.name(),
            side = ?side,
            %amount,
            market = %self.pair.market,
            %price,
            base = %self.pair.base,
            "maker order"
        );
        Ok(self
            .contain("place_maker", self.exchange.place_maker(side, amount, price))
            .await)
    }

    /// Place a limit buy. `Err` only on a local risk violation; venue
    /// failures collapse to `Ok(None)`.
    pub async fn place_limit_buy(
        &self,
        amount: Decimal,
        price: Decimal,
        client_id: Option<ClientOrderId>,
    ) -> Result<Option<OrderId>, RiskViolation> {
        self.place_limit(Side::Buy, amount, price, client_id).await
    }

    /// Place a limit sell. Same contract as [`Broker::place_limit_buy`].
    pub async fn place_limit_sell(
        &self,
        amount: Decimal,
        price: Decimal,
        client_id: Option<ClientOrderId>,
    ) -> Result<Option<OrderId>, RiskViolation> {
        self.place_limit(Side::Sell, amount, price, client_id).await
    }

    /// Place a post-only buy.
    pub async fn place_maker_buy(
        &self,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Option<OrderId>, RiskViolation> {
        self.place_maker(Side::Buy, amount, price).await
    }

    /// Place a post-only sell.
    pub async fn place_maker_sell(
        &self,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Option<OrderId>, RiskViolation> {
        self.place_maker(Side::Sell, amount, price).await
    }

    /// Look up one order. An empty id comes back `None` without a venue call.
    pub async fn get_order(&self, id: &OrderId) -> Option<Order> {
        if id.is_empty() {
            return None;
        }
        self.contain("get_order", self.exchange.order(id)).await
    }

    /// Cancel one order. An empty id short-circuits like [`Broker::get_order`].
    pub async fn cancel_order(&self, id: &OrderId) -> Option<Cancellation> {
        if id.is_empty() {
            return None;
        }
        self.contain("cancel_order", self.exchange.cancel(id)).await
    }

    /// Look up a batch of orders. An empty id set still hits the venue.
    pub async fn get_orders(&self, ids: &[OrderId]) -> Option<Vec<Order>> {
        self.contain("get_orders", self.exchange.orders(ids)).await
    }

    pub async fn get_order_history(&self) -> Option<Vec<Order>> {
        self.contain("get_order_history", self.exchange.order_history())
            .await
    }

    /// Fetch current holdings, refreshing the cached sheet on success.
    pub async fn get_balances(&mut self) -> Option<BalanceSnapshot> {
        let snapshot = self
            .contain("get_balances", self.exchange.balances())
            .await?;
        self.balances = snapshot.clone();
        Some(snapshot)
    }

    /// Cancel every open order on the pair.
    pub async fn cancel_all(&self) -> Option<CancelAllReport> {
        self.contain("cancel_all", self.exchange.cancel_all()).await
    }

    /// Funding endpoints propagate their error instead of containing it;
    /// no binding implements them yet.
    pub async fn deposit(&self) -> Result<DepositAddress, ExchangeError> {
        self.exchange.deposit().await
    }

    pub async fn withdraw(
        &self,
        amount: Decimal,
        address: &str,
    ) -> Result<TransferId, ExchangeError> {
        self.exchange.withdraw(amount, address).await
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exchange.name(), self.balances)
    }
}
