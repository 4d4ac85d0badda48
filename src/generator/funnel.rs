//! Order funnel stages and rate definitions
//!
//! Stage counts are non-increasing along the funnel:
//! call ≥ resp ≥ pickup ≥ board ≥ depart ≥ comp ≥ pay ≥ 0,
//! and `cancel = call - comp` (never negative).

use rand::Rng;
use super::config::{Bounds, FunnelRates};

pub const CALL_QTY: &str = "call_qty";
pub const RESP_QTY: &str = "resp_qty";
pub const PICKUP_QTY: &str = "pickup_qty";
pub const BOARD_QTY: &str = "board_qty";
pub const DEPART_QTY: &str = "depart_qty";
pub const COMP_QTY: &str = "comp_qty";
pub const PAY_QTY: &str = "pay_qty";
pub const CANCEL_QTY: &str = "cancel_qty";
pub const GMV: &str = "gmv";

/// Funnel stage metric ids, widest first
pub const FUNNEL_STAGES: [&str; 7] = [
    CALL_QTY, RESP_QTY, PICKUP_QTY, BOARD_QTY, DEPART_QTY, COMP_QTY, PAY_QTY,
];

/// A rate metric as numerator / denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDefinition {
    pub id: &'static str,
    pub numerator: &'static str,
    pub denominator: &'static str,
}

/// Every rate the generator derives
pub const RATES: [RateDefinition; 4] = [
    RateDefinition { id: "resp_rate", numerator: RESP_QTY, denominator: CALL_QTY },
    RateDefinition { id: "pickup_rate", numerator: PICKUP_QTY, denominator: RESP_QTY },
    RateDefinition { id: "comp_rate", numerator: COMP_QTY, denominator: CALL_QTY },
    RateDefinition { id: "cancel_rate", numerator: CANCEL_QTY, denominator: CALL_QTY },
];

/// Format `numerator / denominator` as a percentage with one decimal
///
/// A zero denominator yields `"0.0"`.
pub fn format_rate(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0.0".to_string();
    }
    let pct = numerator as f64 * 100.0 / denominator as f64;
    let formatted = format!("{:.1}", pct);
    if formatted == "-0.0" {
        "0.0".to_string()
    } else {
        formatted
    }
}

/// Round to `places` decimals, folding negative zero into zero
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Counts for one row, one per funnel stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunnelCounts {
    pub call: u64,
    pub resp: u64,
    pub pickup: u64,
    pub board: u64,
    pub depart: u64,
    pub comp: u64,
    pub pay: u64,
}

impl FunnelCounts {
    /// Draw stage counts below `call` by successive conversion draws
    pub fn draw(call: u64, rates: &FunnelRates, rng: &mut impl Rng) -> Self {
        let resp = convert(call, rates.respond, rng);
        let pickup = convert(resp, rates.pickup, rng);
        let board = convert(pickup, rates.board, rng);
        let depart = convert(board, rates.depart, rng);
        let comp = convert(depart, rates.complete, rng);
        let pay = convert(comp, rates.pay, rng);
        FunnelCounts { call, resp, pickup, board, depart, comp, pay }
    }

    pub fn cancel(&self) -> u64 {
        self.call.saturating_sub(self.comp)
    }

    /// Stage counts paired with their metric ids, widest first
    pub fn stages(&self) -> [(&'static str, u64); 7] {
        [
            (CALL_QTY, self.call),
            (RESP_QTY, self.resp),
            (PICKUP_QTY, self.pickup),
            (BOARD_QTY, self.board),
            (DEPART_QTY, self.depart),
            (COMP_QTY, self.comp),
            (PAY_QTY, self.pay),
        ]
    }

    pub fn is_ordered(&self) -> bool {
        self.call >= self.resp
            && self.resp >= self.pickup
            && self.pickup >= self.board
            && self.board >= self.depart
            && self.depart >= self.comp
            && self.comp >= self.pay
    }
}

/// Apply a conversion rate drawn from `bounds`, never exceeding `from`
fn convert(from: u64, bounds: Bounds, rng: &mut impl Rng) -> u64 {
    if from == 0 {
        return 0;
    }
    let rate = rng.gen_range(bounds.min..=bounds.max).clamp(0.0, 1.0);
    ((from as f64 * rate).floor() as u64).min(from)
}
