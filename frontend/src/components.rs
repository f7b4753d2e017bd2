use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

use crate::api::fetch_binder_data;
use crate::chart::{
    aggregate, layout, tick_text, tooltip_text, Bar, ChartModel, PlotArea, ValueAxis, NO_DATA_TEXT,
    SERIES_LABEL,
};

const VIEW_WIDTH: f64 = 600.0;
const VIEW_HEIGHT: f64 = 300.0;

#[derive(Properties, PartialEq)]
pub struct BinderChartProps {
    pub binder: String,
    pub currency_symbol: String,
    /// Server-rendered `.transaction-chart` element, hidden once the chart
    /// or the no-data alert takes its place.
    #[prop_or_default]
    pub placeholder: Option<Element>,
}

#[derive(Clone, PartialEq)]
enum ChartState {
    Loading,
    Ready(ChartModel),
    Failed,
}

impl ChartState {
    /// Whether the chart or the no-data alert has taken the placeholder's place.
    fn replaces_placeholder(&self) -> bool {
        matches!(self, ChartState::Ready(_))
    }
}

fn hide(placeholder: &Element) {
    let Some(placeholder) = placeholder.dyn_ref::<HtmlElement>() else {
        return;
    };
    if let Err(err) = placeholder.style().set_property("display", "none") {
        log::warn!("chart placeholder not hidden: {:?}", err);
    }
}

/// Bar chart of one binder's totals per category, drawn once its data has
/// been fetched. Fetch failures are logged and leave the placeholder in place.
#[function_component(BinderChart)]
pub fn binder_chart(props: &BinderChartProps) -> Html {
    let state = use_state(|| ChartState::Loading);

    {
        let state = state.clone();
        use_effect_with_deps(
            move |binder: &String| {
                let binder = binder.clone();
                spawn_local(async move {
                    match fetch_binder_data(&binder).await {
                        Ok(data) => state.set(ChartState::Ready(aggregate(&data))),
                        Err(err) => {
                            log::error!("chart data for binder {}: {}", binder, err);
                            state.set(ChartState::Failed);
                        }
                    }
                });
                || ()
            },
            props.binder.clone(),
        );
    }

    {
        let placeholder = props.placeholder.clone();
        use_effect_with_deps(
            move |ready: &bool| {
                if let (true, Some(placeholder)) = (*ready, placeholder.as_ref()) {
                    hide(placeholder);
                }
                || ()
            },
            state.replaces_placeholder(),
        );
    }

    match &*state {
        ChartState::Loading | ChartState::Failed => html! {},
        ChartState::Ready(ChartModel::Empty) => html! {
            <div class="alert alert-light text-center">{ NO_DATA_TEXT }</div>
        },
        ChartState::Ready(ChartModel::Bars(bars)) => bar_chart(bars, &props.currency_symbol),
    }
}

fn bar_chart(bars: &[Bar], currency_symbol: &str) -> Html {
    let axis = ValueAxis::for_bars(bars);
    let area = PlotArea::DEFAULT;
    let rects = layout(bars, &axis, area);
    let right = area.left + area.width;
    let slot = area.width / bars.len() as f64;

    html! {
        <svg class="binder-chart-svg" viewBox={format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT)}
            width="100%" height="100%" role="img" aria-label={SERIES_LABEL}>
            <g class="axis">
                { for axis.ticks.iter().map(|tick| {
                    let y = format!("{:.1}", area.y_for(&axis, *tick));
                    let stroke = if *tick == 0.0 { "#adb5bd" } else { "#e9ecef" };
                    html! {
                        <g>
                            <line x1={format!("{:.1}", area.left)} x2={format!("{:.1}", right)}
                                y1={y.clone()} y2={y.clone()} stroke={stroke} stroke-width="1" />
                            <text x={format!("{:.1}", area.left - 6.0)} y={y} text-anchor="end"
                                dominant-baseline="middle" font-size="11" fill="#6c757d">
                                { tick_text(*tick, currency_symbol) }
                            </text>
                        </g>
                    }
                }) }
            </g>
            <g class="bars">
                { for bars.iter().zip(rects.iter()).map(|(bar, rect)| html! {
                    <rect x={format!("{:.1}", rect.x)} y={format!("{:.1}", rect.y)}
                        width={format!("{:.1}", rect.width)} height={format!("{:.1}", rect.height)}
                        fill={bar.fill.clone()} stroke={bar.border.clone()} stroke-width="1">
                        <title>{ tooltip_text(bar, currency_symbol) }</title>
                    </rect>
                }) }
            </g>
            <g class="labels">
                { for bars.iter().enumerate().map(|(i, bar)| html! {
                    <text x={format!("{:.1}", area.left + slot * (i as f64 + 0.5))}
                        y={format!("{:.1}", area.bottom() + 18.0)} text-anchor="middle"
                        font-size="12" fill="#495057">
                        { bar.label.clone() }
                    </text>
                }) }
            </g>
        </svg>
    }
}
