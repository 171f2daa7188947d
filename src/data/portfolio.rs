use serde::{Deserialize, Serialize};

/// A user's claimed position. Value figures are derived on read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub amount: f64,
    pub purchase_price: f64,
    pub current_price: f64,
}

impl PortfolioHolding {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        purchase_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            amount,
            purchase_price,
            current_price: purchase_price,
        }
    }

    pub fn with_current_price(mut self, current_price: f64) -> Self {
        self.current_price = current_price;
        self
    }

    /// Reason the holding cannot be stored, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("holding id is empty".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("amount must be positive, got {}", self.amount));
        }
        if !self.purchase_price.is_finite() || self.purchase_price < 0.0 {
            return Err(format!(
                "purchase price must be non-negative, got {}",
                self.purchase_price
            ));
        }
        if !self.current_price.is_finite() || self.current_price < 0.0 {
            return Err(format!(
                "current price must be non-negative, got {}",
                self.current_price
            ));
        }
        Ok(())
    }

    pub fn current_value(&self) -> f64 {
        self.amount * self.current_price
    }

    pub fn original_value(&self) -> f64 {
        self.amount * self.purchase_price
    }

    pub fn gain_loss(&self) -> f64 {
        self.current_value() - self.original_value()
    }

    pub fn gain_loss_percentage(&self) -> f64 {
        percentage(self.gain_loss(), self.original_value())
    }

    pub fn apply(&mut self, update: &HoldingUpdate) {
        if let Some(symbol) = &update.symbol {
            self.symbol = symbol.clone();
        }
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(purchase_price) = update.purchase_price {
            self.purchase_price = purchase_price;
        }
        if let Some(current_price) = update.current_price {
            self.current_price = current_price;
        }
    }
}

/// Fields to merge into an existing holding; `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingUpdate {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
}

impl HoldingUpdate {
    pub fn current_price(price: f64) -> Self {
        Self {
            current_price: Some(price),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percentage: f64,
}

impl PortfolioTotals {
    pub fn from_holdings(holdings: &[PortfolioHolding]) -> Self {
        let (total_value, total_cost) = holdings.iter().fold((0.0, 0.0), |(value, cost), h| {
            (value + h.current_value(), cost + h.original_value())
        });
        let total_gain_loss = total_value - total_cost;

        Self {
            total_value,
            total_cost,
            total_gain_loss,
            total_gain_loss_percentage: percentage(total_gain_loss, total_cost),
        }
    }
}

fn percentage(delta: f64, base: f64) -> f64 {
    if base == 0.0 { 0.0 } else { delta / base * 100.0 }
}
