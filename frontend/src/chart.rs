//! Per-category totals of a binder and the geometry of the bar chart drawn
//! from them. The Yew component in `components.rs` only turns these numbers
//! into SVG.

use crate::color::{darken, DEFAULT_CATEGORY_COLOR};
use crate::filter::format_amount;
use crate::model::BinderData;

pub const NO_DATA_TEXT: &str = "Nessuna transazione da visualizzare";
pub const SERIES_LABEL: &str = "Importo";

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub total: f64,
    pub fill: String,
    pub border: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartModel {
    /// The binder has no transactions; a placeholder is shown instead of a chart.
    Empty,
    Bars(Vec<Bar>),
}

/// Sums transaction amounts per category.
///
/// Every declared category gets a bar even when nothing was spent on it.
/// Transactions naming an undeclared category add a bar after the declared
/// ones; transactions without category or numeric amount are skipped.
pub fn aggregate(data: &BinderData) -> ChartModel {
    if data.transactions.is_empty() {
        return ChartModel::Empty;
    }

    let mut sums: Vec<(String, f64, Option<&str>)> = data
        .categories
        .iter()
        .map(|c| (c.label().to_string(), 0.0, c.color.as_deref()))
        .collect();

    for tx in &data.transactions {
        let (Some(category), Some(amount)) = (tx.category.as_deref(), tx.amount) else {
            continue;
        };
        if category.is_empty() {
            continue;
        }
        match sums.iter_mut().find(|(label, _, _)| label == category) {
            Some((_, sum, _)) => *sum += amount,
            None => sums.push((category.to_string(), amount, None)),
        }
    }

    let bars = sums
        .into_iter()
        .map(|(label, total, color)| {
            let fill = color.unwrap_or(DEFAULT_CATEGORY_COLOR).to_string();
            let border = darken(&fill).unwrap_or_else(|| fill.clone());
            Bar {
                label,
                total,
                fill,
                border,
            }
        })
        .collect();

    ChartModel::Bars(bars)
}

pub fn tooltip_text(bar: &Bar, currency_symbol: &str) -> String {
    format!("{}: {}", bar.label, format_amount(bar.total, currency_symbol))
}

pub fn tick_text(value: f64, currency_symbol: &str) -> String {
    format!("{} {}", value, currency_symbol)
}

/// Value range of the chart. Always contains zero.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

const MAX_TICKS: i64 = 12;

impl ValueAxis {
    /// Axis covering every finite total. Totals that overflowed to infinity
    /// (or are NaN) are left out of the range.
    pub fn for_bars(bars: &[Bar]) -> Self {
        let finite = || bars.iter().map(|b| b.total).filter(|t| t.is_finite());
        let lo = finite().fold(0.0_f64, f64::min);
        let hi = finite().fold(0.0_f64, f64::max);
        let hi = if hi == lo { lo + 1.0 } else { hi };

        let step = nice_step((hi - lo) / 5.0);
        let first = (lo / step).floor() as i64;
        let last = (hi / step).ceil() as i64;
        let last = if last.saturating_sub(first) > MAX_TICKS {
            first.saturating_add(MAX_TICKS)
        } else {
            last
        };
        let ticks: Vec<f64> = (first..=last).map(|k| round_to_step(k as f64 * step, step)).collect();

        ValueAxis {
            min: ticks.first().copied().unwrap_or(lo),
            max: ticks.last().copied().unwrap_or(hi),
            ticks,
        }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn round_to_step(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10().floor()).max(0.0) as i32;
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub const DEFAULT: PlotArea = PlotArea {
        left: 64.0,
        top: 12.0,
        width: 520.0,
        height: 240.0,
    };

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical pixel position of `value` on `axis`.
    pub fn y_for(&self, axis: &ValueAxis, value: f64) -> f64 {
        self.bottom() - (value - axis.min) / axis.span() * self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Places one rectangle per bar, growing up from the zero line for positive
/// totals and down from it for negative ones.
pub fn layout(bars: &[Bar], axis: &ValueAxis, area: PlotArea) -> Vec<BarRect> {
    if bars.is_empty() {
        return Vec::new();
    }
    let slot = area.width / bars.len() as f64;
    let width = slot * 0.8;
    let zero = area.y_for(axis, 0.0);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let y = area.y_for(axis, bar.total.clamp(axis.min, axis.max));
            BarRect {
                x: area.left + slot * i as f64 + (slot - width) / 2.0,
                y: y.min(zero),
                width,
                height: (zero - y).abs(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BinderData {
        serde_json::from_str(
            r##"{
                "categories": {"Food": {"color": "#ff0000"}, "Rent": {}},
                "transactions": [
                    {"category": "Food", "amount": 10},
                    {"category": "Food", "amount": 5},
                    {"category": "Rent", "amount": -20}
                ]
            }"##,
        )
        .unwrap()
    }

    fn bars(model: ChartModel) -> Vec<Bar> {
        match model {
            ChartModel::Bars(bars) => bars,
            ChartModel::Empty => panic!("expected bars"),
        }
    }

    #[test]
    fn sums_per_category() {
        let bars = bars(aggregate(&sample()));
        assert_eq!(bars.len(), 2);
        assert_eq!((bars[0].label.as_str(), bars[0].total), ("Food", 15.0));
        assert_eq!((bars[1].label.as_str(), bars[1].total), ("Rent", -20.0));
        assert_eq!(bars[0].fill, "#ff0000");
        assert_eq!(bars[0].border, "#eb0000");
        assert_eq!(bars[1].fill, DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn empty_binder_has_no_chart() {
        let data: BinderData =
            serde_json::from_str(r##"{"transactions": [], "categories": {"Food": {}}}"##).unwrap();
        assert_eq!(aggregate(&data), ChartModel::Empty);
    }

    #[test]
    fn unused_categories_stay_at_zero() {
        let data: BinderData = serde_json::from_str(
            r##"{"categories": {"A": {}, "B": {}}, "transactions": [{"category": "B", "amount": 3}]}"##,
        )
        .unwrap();
        let bars = bars(aggregate(&data));
        assert_eq!(bars[0].total, 0.0);
        assert_eq!(bars[1].total, 3.0);
    }

    #[test]
    fn undeclared_categories_are_appended() {
        let data: BinderData = serde_json::from_str(
            r##"{"categories": {"A": {}}, "transactions": [
                {"category": "Z", "amount": 1},
                {"category": "", "amount": 100},
                {"category": "A", "amount": "oops"},
                {"amount": 7},
                {"category": "Z", "amount": 2}
            ]}"##,
        )
        .unwrap();
        let bars = bars(aggregate(&data));
        let totals: Vec<_> = bars.iter().map(|b| (b.label.as_str(), b.total)).collect();
        assert_eq!(totals, vec![("A", 0.0), ("Z", 3.0)]);
    }

    #[test]
    fn bad_color_reused_as_border() {
        let data: BinderData = serde_json::from_str(
            r##"{"categories": {"A": {"color": "pink"}}, "transactions": [{"category": "A", "amount": 1}]}"##,
        )
        .unwrap();
        let bars = bars(aggregate(&data));
        assert_eq!(bars[0].border, "pink");
    }

    #[test]
    fn tooltip_has_two_decimals() {
        let bar = Bar {
            label: "Food".into(),
            total: 15.0,
            fill: String::new(),
            border: String::new(),
        };
        assert_eq!(tooltip_text(&bar, "€"), "Food: 15.00 €");
        assert_eq!(tick_text(2.5, "€"), "2.5 €");
        assert_eq!(tick_text(100.0, "€"), "100 €");
    }

    #[test]
    fn axis_spans_zero() {
        let bars = bars(aggregate(&sample()));
        let axis = ValueAxis::for_bars(&bars);
        assert_eq!(axis.ticks, vec![-20.0, -10.0, 0.0, 10.0, 20.0]);

        let positive = vec![Bar {
            label: "x".into(),
            total: 42.0,
            fill: String::new(),
            border: String::new(),
        }];
        let axis = ValueAxis::for_bars(&positive);
        assert_eq!(axis.min, 0.0);
        assert_eq!(axis.max, 50.0);
    }

    #[test]
    fn overflowing_totals_keep_a_bounded_axis() {
        let data: BinderData = serde_json::from_str(
            r##"{"categories": {"A": {}, "B": {}}, "transactions": [
                {"category": "A", "amount": 1e308},
                {"category": "A", "amount": 1e308},
                {"category": "B", "amount": 30}
            ]}"##,
        )
        .unwrap();
        let bars = bars(aggregate(&data));
        assert!(bars[0].total.is_infinite());

        let axis = ValueAxis::for_bars(&bars);
        assert!(axis.ticks.len() as i64 <= MAX_TICKS + 1);
        assert_eq!(axis.min, 0.0);
        assert_eq!(axis.max, 30.0);

        let huge = vec![Bar {
            label: "x".into(),
            total: f64::MAX,
            fill: String::new(),
            border: String::new(),
        }];
        let axis = ValueAxis::for_bars(&huge);
        assert!(axis.ticks.len() as i64 <= MAX_TICKS + 1);
        assert!(axis.ticks.iter().all(|t| t.is_finite()));

        let rects = layout(&bars, &ValueAxis::for_bars(&bars), PlotArea::DEFAULT);
        assert!(rects.iter().all(|r| r.y.is_finite() && r.height.is_finite()));
    }

    #[test]
    fn bars_hang_from_zero_line() {
        let bars = bars(aggregate(&sample()));
        let axis = ValueAxis::for_bars(&bars);
        let area = PlotArea::DEFAULT;
        let rects = layout(&bars, &axis, area);
        let zero = area.y_for(&axis, 0.0);

        assert_eq!(rects.len(), 2);
        assert!((rects[0].y + rects[0].height - zero).abs() < 1e-9);
        assert!((rects[1].y - zero).abs() < 1e-9);
        assert!(rects[1].height > rects[0].height);
        assert!(rects[0].x < rects[1].x);
    }
}
