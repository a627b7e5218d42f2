use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use spreadbot_core::{
    AssetBalance, BalanceSnapshot, CancelAllReport, Cancellation, ClientOrderId, Exchange,
    ExchangeError, Order, OrderId, OrderStatus, OrderType, Side, TradingPair,
};
use std::sync::{Mutex, MutexGuard};

/// In-memory venue for rehearsal runs and tests.
///
/// Orders rest on a book that never matches; funds are locked on placement
/// and released on cancellation, which is enough to exercise every broker
/// path against realistic balance movements. Funding endpoints keep the
/// trait defaults (unsupported).
pub struct PaperExchange {
    pair: TradingPair,
    state: Mutex<PaperState>,
}

struct PaperState {
    balances: BalanceSnapshot,
    open: Vec<Order>,
    history: Vec<Order>,
    next_id: u64,
}

impl PaperExchange {
    pub fn new(pair: TradingPair, opening_balances: BalanceSnapshot) -> Self {
        Self {
            pair,
            state: Mutex::new(PaperState {
                balances: opening_balances,
                open: Vec::new(),
                history: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PaperState> {
        self.state.lock().expect("paper exchange state poisoned")
    }

    fn place(
        &self,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
        price: Decimal,
        client_id: Option<ClientOrderId>,
    ) -> Result<OrderId, ExchangeError> {
        let mut state = self.lock();

        // A buy locks base currency at the limit price; a sell locks the
        // market currency itself.
        let (currency, needed) = match side {
            Side::Buy => (self.pair.base, amount * price),
            Side::Sell => (self.pair.market, amount),
        };
        let held = state.balances.get(currency);
        if held.available < needed {
            return Err(ExchangeError::InsufficientBalance {
                currency,
                requested: needed,
                available: held.available,
            });
        }
        state
            .balances
            .set(currency, AssetBalance::new(held.total, held.available - needed));

        let id = OrderId::new(format!("paper-{}", state.next_id));
        state.next_id += 1;
        let now = Utc::now();
        state.open.push(Order {
            id: id.clone(),
            pair_code: self.pair.code.clone(),
            side,
            order_type,
            amount,
            filled_amount: Decimal::ZERO,
            price,
            avg_fill_price: None,
            status: OrderStatus::Open,
            created_at: now,
            updated_at: now,
            client_id,
        });
        Ok(id)
    }
}

impl PaperState {
    fn find(&self, id: &OrderId) -> Option<Order> {
        self.open
            .iter()
            .chain(self.history.iter().rev())
            .find(|order| &order.id == id)
            .cloned()
    }

    /// Give back the funds an open order had locked.
    fn release_funds(&mut self, order: &Order, pair: &TradingPair) {
        let (currency, locked) = match order.side {
            Side::Buy => (pair.base, order.remaining_amount() * order.price),
            Side::Sell => (pair.market, order.remaining_amount()),
        };
        let held = self.balances.get(currency);
        self.balances
            .set(currency, AssetBalance::new(held.total, held.available + locked));
    }

    fn retire(&mut self, mut order: Order, status: OrderStatus) -> Order {
        order.status = status;
        order.updated_at = Utc::now();
        self.history.push(order.clone());
        order
    }
}

#[async_trait]
impl Exchange for PaperExchange {
    fn name(&self) -> &str {
        "paper"
    }

    async fn place_limit(
        &self,
        side: Side,
        amount: Decimal,
        price: Decimal,
        client_id: Option<ClientOrderId>,
    ) -> Result<OrderId, ExchangeError> {
        self.place(side, OrderType::Limit, amount, price, client_id)
    }

    async fn place_maker(
        &self,
        side: Side,
        amount: Decimal,
        price: Decimal,
    ) -> Result<OrderId, ExchangeError> {
        // The paper book never crosses, so a post-only order cannot take.
        self.place(side, OrderType::Maker, amount, price, None)
    }

    async fn order(&self, id: &OrderId) -> Result<Order, ExchangeError> {
        self.lock()
            .find(id)
            .ok_or_else(|| ExchangeError::OrderNotFound(id.clone()))
    }

    async fn cancel(&self, id: &OrderId) -> Result<Cancellation, ExchangeError> {
        let mut state = self.lock();
        let position = state
            .open
            .iter()
            .position(|order| &order.id == id)
            .ok_or_else(|| ExchangeError::OrderNotFound(id.clone()))?;
        let order = state.open.remove(position);
        state.release_funds(&order, &self.pair);
        let order = state.retire(order, OrderStatus::Cancelled);
        Ok(Cancellation {
            id: order.id,
            status: order.status,
        })
    }

    async fn orders(&self, ids: &[OrderId]) -> Result<Vec<Order>, ExchangeError> {
        let state = self.lock();
        Ok(ids.iter().filter_map(|id| state.find(id)).collect())
    }

    async fn order_history(&self) -> Result<Vec<Order>, ExchangeError> {
        Ok(self.lock().history.clone())
    }

    async fn balances(&self) -> Result<BalanceSnapshot, ExchangeError> {
        Ok(self.lock().balances.clone())
    }

    async fn cancel_all(&self) -> Result<CancelAllReport, ExchangeError> {
        let mut state = self.lock();
        let open = std::mem::take(&mut state.open);
        let mut cancelled = Vec::with_capacity(open.len());
        for order in open {
            state.release_funds(&order, &self.pair);
            let order = state.retire(order, OrderStatus::Cancelled);
            cancelled.push(order.id);
        }
        Ok(CancelAllReport { cancelled })
    }
}
