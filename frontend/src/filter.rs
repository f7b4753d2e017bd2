//! Client-side filtering of a binder's transaction table.
//!
//! Everything here works on a snapshot of the rendered rows so it can be
//! exercised without a browser; `dom.rs` takes the snapshot and applies the
//! resulting [`FilterOutcome`].

pub const ALL_CATEGORIES_LABEL: &str = "Tutte le categorie";

/// The two states of a binder card's category selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// `None` when the selector has no `data-category-id`; it then selects
    /// the rows that lack one too.
    Category(Option<String>),
}

impl CategoryFilter {
    /// Builds the selection from a selector's `data-category` and
    /// `data-category-id` attributes.
    pub fn from_attributes(category: Option<&str>, category_id: Option<&str>) -> Self {
        match category {
            Some("all") => CategoryFilter::All,
            _ => CategoryFilter::Category(category_id.map(str::to_string)),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }

    pub fn matches(&self, row_category_id: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(id) => row_category_id == id.as_deref(),
        }
    }
}

/// What `dom.rs` reads out of one `tr.transaction-row`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    pub category_id: Option<String>,
    pub amount_text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
}

impl Tone {
    pub fn for_total(total: f64) -> Self {
        if total < 0.0 {
            Tone::Danger
        } else {
            Tone::Success
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Tone::Success => "text-success",
            Tone::Danger => "text-danger",
        }
    }

    pub fn other_class(self) -> &'static str {
        match self {
            Tone::Success => Tone::Danger.class(),
            Tone::Danger => Tone::Success.class(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterOutcome {
    /// One entry per input row, same order.
    pub visible: Vec<bool>,
    pub total: f64,
    pub total_text: String,
    pub tone: Tone,
    pub show_back_button: bool,
    pub heading: String,
    pub total_heading: String,
}

/// Applies `filter` to the table rows of one binder card.
///
/// `selector_label` is the visible text of the clicked selector and
/// `all_total` the card's `data-all-total` attribute, used verbatim when the
/// filter is [`CategoryFilter::All`].
pub fn apply_filter(
    filter: &CategoryFilter,
    selector_label: &str,
    rows: &[TableRow],
    all_total: Option<&str>,
    currency_symbol: &str,
) -> FilterOutcome {
    let mut visible = Vec::with_capacity(rows.len());
    let mut category_total = 0.0;

    for row in rows {
        let shown = filter.matches(row.category_id.as_deref());
        if shown {
            category_total += row
                .amount_text
                .as_deref()
                .and_then(|text| parse_amount(text, currency_symbol))
                .unwrap_or(0.0);
        }
        visible.push(shown);
    }

    let (total, heading, total_heading) = match filter {
        CategoryFilter::All => (
            all_total.and_then(parse_float_prefix).unwrap_or(0.0),
            ALL_CATEGORIES_LABEL.to_string(),
            ALL_CATEGORIES_LABEL.to_string(),
        ),
        CategoryFilter::Category(_) => {
            let label = selector_label.trim();
            (
                category_total,
                label.to_string(),
                format!("categoria {}", label),
            )
        }
    };

    FilterOutcome {
        visible,
        total,
        total_text: format_amount(total, currency_symbol),
        tone: Tone::for_total(round_cents(total)),
        show_back_button: !filter.is_all(),
        heading,
        total_heading,
    }
}

/// Formats a total as `"<n.nn> <symbol>"`, never printing a negative zero.
pub fn format_amount(value: f64, currency_symbol: &str) -> String {
    let value = if round_cents(value) == 0.0 { 0.0 } else { value };
    format!("{:.2} {}", value, currency_symbol)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reads the number out of an amount cell such as `"-12.50 €"`.
pub fn parse_amount(text: &str, currency_symbol: &str) -> Option<f64> {
    let stripped = text.trim().replacen(currency_symbol, "", 1);
    parse_float_prefix(&stripped)
}

/// Parses the longest leading decimal number of `text`, ignoring leading
/// whitespace and whatever follows the number, like a browser's `parseFloat`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}
