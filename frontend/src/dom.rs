//! Wiring between the server-rendered dashboard and the pure logic in
//! `filter`, `forms` and `chart`.
//!
//! Every handler returns a [`Result`]; errors are logged where the event
//! arrives and only abort that one interaction.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlTextAreaElement, NodeList,
};

use crate::api;
use crate::components::{BinderChart, BinderChartProps};
use crate::error::{ClientError, Result};
use crate::filter::{apply_filter, CategoryFilter, TableRow};
use crate::forms::{
    self, category_options, placeholder_option, FormPlan, ModalKind, SelectOption, SelectPlan,
};
use crate::settings::ClientSettings;

pub const SERVICE_WORKER_URL: &str = "/service-worker.js";

const LOAD_TOKEN_ATTR: &str = "data-load-token";

thread_local! {
    static NEXT_LOAD_TOKEN: Cell<u64> = Cell::new(0);
}

/// Runs [`init`] now, or once the document has finished parsing.
pub fn start(settings: ClientSettings) -> Result<()> {
    let document = document()?;
    let ready_state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))?;
    if ready_state.as_string().as_deref() != Some("loading") {
        return init(&settings);
    }

    on(&document, "DOMContentLoaded", move |_| {
        if let Err(err) = init(&settings) {
            log::error!("dashboard setup failed: {}", err);
        }
    })
}

pub fn init(settings: &ClientSettings) -> Result<()> {
    let document = document()?;
    let symbol: Rc<str> = Rc::from(settings.currency_symbol.as_str());

    default_dates(&document)?;
    wire_binder_toggles(&document)?;
    wire_category_selectors(&document, symbol)?;
    wire_back_buttons(&document)?;
    for kind in ModalKind::ALL {
        wire_modal(&document, kind)?;
    }
    mount_charts(&document, &settings.currency_symbol)?;
    register_service_worker();

    log::info!("dashboard ready");
    Ok(())
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| ClientError::MissingElement("document".to_string()))
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn find(root: &Element, selector: &str) -> Result<Element> {
    root.query_selector(selector)?
        .ok_or_else(|| ClientError::MissingElement(selector.to_string()))
}

fn closest(element: &Element, selector: &str) -> Result<Element> {
    element
        .closest(selector)?
        .ok_or_else(|| ClientError::MissingElement(selector.to_string()))
}

fn by_id(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ClientError::MissingElement(format!("#{}", id)))
}

/// Attaches `handler` for the lifetime of the page.
fn on(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn default_dates(document: &Document) -> Result<()> {
    let today = iso_date(&String::from(js_sys::Date::new_0().to_iso_string()));
    for element in elements(document.query_selector_all(r#"input[type="date"]"#)?) {
        if let Ok(input) = element.dyn_into::<HtmlInputElement>() {
            if input.value().is_empty() {
                input.set_value(&today);
            }
        }
    }
    Ok(())
}

/// `YYYY-MM-DD` part of an ISO-8601 timestamp.
pub fn iso_date(timestamp: &str) -> String {
    timestamp.split('T').next().unwrap_or_default().to_string()
}

fn wire_binder_toggles(document: &Document) -> Result<()> {
    for header in elements(document.query_selector_all(".binder-header")?) {
        let this = header.clone();
        on(&header, "click", move |event| {
            if clicked_inside(&event, ".btn-group") {
                return;
            }
            if let Err(err) = toggle_binder(&this) {
                log::warn!("binder toggle skipped: {}", err);
            }
        })?;
    }
    Ok(())
}

fn clicked_inside(event: &Event, selector: &str) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest(selector).ok().flatten())
        .is_some()
}

fn toggle_binder(header: &Element) -> Result<()> {
    let card = closest(header, ".binder-card")?;
    let content = find(&card, ".binder-content")?;
    let icon = find(&card, ".toggle-icon i")?;

    let expanded = content.class_list().toggle("show")?;
    let (old, new) = chevron_swap(expanded);
    icon.class_list().remove_1(old)?;
    icon.class_list().add_1(new)?;
    Ok(())
}

/// Icon classes to swap, `(remove, add)`, after a card was expanded or collapsed.
pub fn chevron_swap(expanded: bool) -> (&'static str, &'static str) {
    if expanded {
        ("fa-chevron-down", "fa-chevron-up")
    } else {
        ("fa-chevron-up", "fa-chevron-down")
    }
}

fn wire_category_selectors(document: &Document, symbol: Rc<str>) -> Result<()> {
    for selector in elements(document.query_selector_all(".category-selector")?) {
        let this = selector.clone();
        let symbol = Rc::clone(&symbol);
        on(&selector, "click", move |_| {
            if let Err(err) = select_category(&this, &symbol) {
                log::warn!("category filter skipped: {}", err);
            }
        })?;
    }
    Ok(())
}

fn select_category(selector: &Element, symbol: &str) -> Result<()> {
    let filter = CategoryFilter::from_attributes(
        selector.get_attribute("data-category").as_deref(),
        selector.get_attribute("data-category-id").as_deref(),
    );
    let label = selector.text_content().unwrap_or_default();

    let card = closest(selector, ".binder-card")?;
    let table = find(&card, ".transactions-table")?;
    let row_elements = elements(table.query_selector_all("tbody tr.transaction-row")?);
    let rows = row_elements
        .iter()
        .map(read_row)
        .collect::<Result<Vec<TableRow>>>()?;
    let total = find(&card, ".total-amount")?;

    let outcome = apply_filter(
        &filter,
        &label,
        &rows,
        total.get_attribute("data-all-total").as_deref(),
        symbol,
    );
    log::debug!("filter {:?}: total {}", filter, outcome.total_text);

    find(&card, ".current-category-name")?.set_text_content(Some(&outcome.heading));
    find(&card, ".current-category-total-name")?.set_text_content(Some(&outcome.total_heading));

    for (row, visible) in row_elements.iter().zip(&outcome.visible) {
        if let Some(row) = row.dyn_ref::<HtmlElement>() {
            let display = if *visible { "" } else { "none" };
            row.style().set_property("display", display)?;
        }
    }

    total.set_text_content(Some(&outcome.total_text));
    total.class_list().add_1(outcome.tone.class())?;
    total.class_list().remove_1(outcome.tone.other_class())?;

    let back = find(&card, ".back-to-categories-btn")?;
    if outcome.show_back_button {
        back.class_list().remove_1("d-none")?;
    } else {
        back.class_list().add_1("d-none")?;
    }
    Ok(())
}

fn read_row(row: &Element) -> Result<TableRow> {
    Ok(TableRow {
        category_id: row.get_attribute("data-category-id"),
        amount_text: row
            .query_selector("td:nth-child(4)")?
            .and_then(|cell| cell.text_content()),
    })
}

fn wire_back_buttons(document: &Document) -> Result<()> {
    for button in elements(document.query_selector_all(".back-to-categories-btn")?) {
        let this = button.clone();
        on(&button, "click", move |_| {
            let all = closest(&this, ".binder-card")
                .and_then(|card| find(&card, r#".category-selector[data-category="all"]"#));
            match all {
                Ok(selector) => {
                    if let Some(selector) = selector.dyn_ref::<HtmlElement>() {
                        selector.click();
                    }
                }
                Err(err) => log::debug!("no all-categories selector: {}", err),
            }
        })?;
    }
    Ok(())
}

fn wire_modal(document: &Document, kind: ModalKind) -> Result<()> {
    let Some(modal) = document.get_element_by_id(kind.modal_id()) else {
        return Ok(());
    };
    let document = document.clone();
    on(&modal, "show.bs.modal", move |event| {
        if let Err(err) = open_modal(&document, kind, &event) {
            log::warn!("{} not prepared: {}", kind.modal_id(), err);
        }
    })
}

fn open_modal(document: &Document, kind: ModalKind, event: &Event) -> Result<()> {
    let trigger = related_target(event)
        .ok_or_else(|| ClientError::MissingElement("relatedTarget".to_string()))?;
    let plan = forms::plan(kind, &forms::Trigger::read(|name| trigger.get_attribute(name)))?;
    apply_plan(document, plan)
}

/// Bootstrap puts the control that opened a dialog on the event object.
fn related_target(event: &Event) -> Option<Element> {
    js_sys::Reflect::get(event, &JsValue::from_str("relatedTarget"))
        .ok()?
        .dyn_into::<Element>()
        .ok()
}

fn apply_plan(document: &Document, plan: FormPlan) -> Result<()> {
    for (id, text) in &plan.texts {
        by_id(document, id)?.set_text_content(Some(text));
    }
    if let Some(select) = plan.select {
        fill_category_select(document, select)?;
    }
    for (id, value) in &plan.values {
        set_field_value(&by_id(document, id)?, value)?;
    }
    by_id(document, plan.form_id)?.set_attribute("action", &plan.action)?;
    Ok(())
}

fn set_field_value(element: &Element, value: &str) -> Result<()> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    } else {
        return Err(ClientError::MissingElement(format!("#{} input", element.id())));
    }
    Ok(())
}

/// Resets the select to its placeholder and fills it in once the binder's
/// categories arrive. Only the newest request for a select is applied.
fn fill_category_select(document: &Document, plan: SelectPlan) -> Result<()> {
    let select = by_id(document, plan.select_id)?;
    select.set_inner_html("");
    let placeholder = option_element(document, &placeholder_option())?;
    select.append_child(&placeholder)?;

    let token = NEXT_LOAD_TOKEN.with(|next| {
        let token = next.get() + 1;
        next.set(token);
        token.to_string()
    });
    select.set_attribute(LOAD_TOKEN_ATTR, &token)?;

    let document = document.clone();
    spawn_local(async move {
        let data = match api::fetch_binder_data(&plan.binder).await {
            Ok(data) => data,
            Err(err) => {
                log::error!("categories of binder {}: {}", plan.binder, err);
                return;
            }
        };
        let Some(select) = document.get_element_by_id(plan.select_id) else {
            return;
        };
        if select.get_attribute(LOAD_TOKEN_ATTR).as_deref() != Some(token.as_str()) {
            log::debug!("stale categories for {} dropped", plan.select_id);
            return;
        }
        for option in category_options(&data, plan.selected.as_deref()) {
            let appended = option_element(&document, &option)
                .and_then(|element| Ok(select.append_child(&element)?));
            if let Err(err) = appended {
                log::warn!("category option {} not added: {}", option.value, err);
            }
        }
    });
    Ok(())
}

fn option_element(document: &Document, option: &SelectOption) -> Result<HtmlOptionElement> {
    let element = document
        .create_element("option")?
        .dyn_into::<HtmlOptionElement>()
        .map_err(|_| ClientError::Js("created element is not an option".to_string()))?;
    element.set_value(&option.value);
    element.set_text(&option.label);
    element.set_disabled(option.disabled);
    element.set_selected(option.selected);
    Ok(element)
}

fn mount_charts(document: &Document, currency_symbol: &str) -> Result<()> {
    for placeholder in elements(document.query_selector_all(".transaction-chart")?) {
        let Some(binder) = placeholder
            .get_attribute("data-binder")
            .filter(|name| !name.is_empty())
        else {
            continue;
        };

        let host = document.create_element("div")?;
        host.set_class_name("binder-chart");
        placeholder.after_with_node_1(&host)?;

        yew::Renderer::<BinderChart>::with_root_and_props(
            host,
            BinderChartProps {
                binder,
                currency_symbol: currency_symbol.to_string(),
                placeholder: Some(placeholder),
            },
        )
        .render();
    }
    Ok(())
}

fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    // absent outside secure contexts
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        log::debug!("service workers unavailable");
        return;
    }

    let registration = navigator.service_worker().register(SERVICE_WORKER_URL);
    spawn_local(async move {
        match JsFuture::from(registration).await {
            Ok(_) => log::info!("service worker registered"),
            Err(err) => log::warn!("service worker registration failed: {}", ClientError::from(err)),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_part_of_timestamp() {
        assert_eq!(iso_date("2024-05-01T08:30:00.000Z"), "2024-05-01");
        assert_eq!(iso_date(""), "");
    }

    #[test]
    fn chevron_follows_state() {
        assert_eq!(chevron_swap(true), ("fa-chevron-down", "fa-chevron-up"));
        assert_eq!(chevron_swap(false), ("fa-chevron-up", "fa-chevron-down"));
    }
}
