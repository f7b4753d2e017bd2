//! Create/edit/delete dialogs of the dashboard.
//!
//! When a dialog opens, the button that opened it carries the binder name and,
//! depending on the dialog, a category or a transaction. [`plan`] turns those
//! attributes into a [`FormPlan`]; `dom.rs` writes the plan into the page and,
//! for the transaction dialogs, fills the category select once the binder
//! data arrives.

use crate::api;
use crate::error::{ClientError, Result};
use crate::model::BinderData;

pub const CATEGORY_PLACEHOLDER: &str = "Seleziona una categoria";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKind {
    DeleteBinder,
    NewCategory,
    DeleteCategory,
    AddTransaction,
    EditTransaction,
    DeleteTransaction,
}

impl ModalKind {
    pub const ALL: [ModalKind; 6] = [
        ModalKind::DeleteBinder,
        ModalKind::NewCategory,
        ModalKind::DeleteCategory,
        ModalKind::AddTransaction,
        ModalKind::EditTransaction,
        ModalKind::DeleteTransaction,
    ];

    pub fn modal_id(self) -> &'static str {
        match self {
            ModalKind::DeleteBinder => "deleteBinderModal",
            ModalKind::NewCategory => "newCategoryModal",
            ModalKind::DeleteCategory => "deleteCategoryModal",
            ModalKind::AddTransaction => "addTransactionModal",
            ModalKind::EditTransaction => "editTransactionModal",
            ModalKind::DeleteTransaction => "deleteTransactionModal",
        }
    }

    pub fn form_id(self) -> &'static str {
        match self {
            ModalKind::DeleteBinder => "deleteBinderForm",
            ModalKind::NewCategory => "newCategoryForm",
            ModalKind::DeleteCategory => "deleteCategoryForm",
            ModalKind::AddTransaction => "addTransactionForm",
            ModalKind::EditTransaction => "editTransactionForm",
            ModalKind::DeleteTransaction => "deleteTransactionForm",
        }
    }
}

/// `data-*` attributes of the control that opened a dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trigger {
    pub binder: Option<String>,
    pub category: Option<String>,
    pub transaction: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
}

impl Trigger {
    /// Reads the trigger through `attr`, which maps an attribute name such as
    /// `data-binder` to its value.
    pub fn read(attr: impl Fn(&str) -> Option<String>) -> Self {
        Trigger {
            binder: attr("data-binder"),
            category: attr("data-category"),
            transaction: attr("data-transaction"),
            date: attr("data-date"),
            description: attr("data-description"),
            amount: attr("data-amount"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectPlan {
    pub select_id: &'static str,
    pub binder: String,
    /// Option to pre-select once the categories are loaded.
    pub selected: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormPlan {
    pub form_id: &'static str,
    pub action: String,
    /// `(element id, text content)`
    pub texts: Vec<(&'static str, String)>,
    /// `(input id, value)`
    pub values: Vec<(&'static str, String)>,
    pub select: Option<SelectPlan>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
    pub disabled: bool,
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(ClientError::MissingAttribute(name))
}

/// Works out what opening `kind` from `trigger` does to the page.
pub fn plan(kind: ModalKind, trigger: &Trigger) -> Result<FormPlan> {
    let binder = required(&trigger.binder, "data-binder")?;
    let mut plan = FormPlan {
        form_id: kind.form_id(),
        action: String::new(),
        texts: Vec::new(),
        values: Vec::new(),
        select: None,
    };

    match kind {
        ModalKind::DeleteBinder => {
            plan.action = api::delete_binder_path(binder);
            plan.texts.push(("deleteBinderName", binder.to_string()));
        }
        ModalKind::NewCategory => {
            plan.action = api::new_category_path(binder);
        }
        ModalKind::DeleteCategory => {
            let category = required(&trigger.category, "data-category")?;
            plan.action = api::delete_category_path(binder, category);
            plan.texts.push(("deleteCategoryName", category.to_string()));
        }
        ModalKind::AddTransaction => {
            plan.action = api::new_transaction_path(binder);
            plan.select = Some(SelectPlan {
                select_id: "transaction_category",
                binder: binder.to_string(),
                selected: None,
            });
        }
        ModalKind::EditTransaction => {
            let transaction = required(&trigger.transaction, "data-transaction")?;
            plan.action = api::edit_transaction_path(binder, transaction);
            plan.values = vec![
                (
                    "edit_transaction_date",
                    trigger.date.clone().unwrap_or_default(),
                ),
                (
                    "edit_transaction_description",
                    trigger.description.clone().unwrap_or_default(),
                ),
                (
                    "edit_transaction_amount",
                    trigger.amount.clone().unwrap_or_default(),
                ),
            ];
            plan.select = Some(SelectPlan {
                select_id: "edit_transaction_category",
                binder: binder.to_string(),
                selected: trigger.category.clone(),
            });
        }
        ModalKind::DeleteTransaction => {
            let transaction = required(&trigger.transaction, "data-transaction")?;
            plan.action = api::delete_transaction_path(binder, transaction);
        }
    }

    Ok(plan)
}

/// The single option a category select shows while its binder data loads.
pub fn placeholder_option() -> SelectOption {
    SelectOption {
        value: String::new(),
        label: CATEGORY_PLACEHOLDER.to_string(),
        selected: true,
        disabled: true,
    }
}

/// Options appended after the placeholder once the binder data is known.
///
/// The submitted value is the key of the `categories` object, which is the
/// category id when the server keys them that way. `selected` may name
/// either the key or the label.
pub fn category_options(data: &BinderData, selected: Option<&str>) -> Vec<SelectOption> {
    data.categories
        .iter()
        .map(|category| SelectOption {
            value: category.key.clone(),
            label: category.label().to_string(),
            selected: selected
                .map(|s| s == category.key || s == category.label())
                .unwrap_or(false),
            disabled: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn trigger(pairs: &[(&str, &str)]) -> Trigger {
        let attrs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Trigger::read(|name| attrs.get(name).cloned())
    }

    #[test]
    fn delete_binder_names_the_binder() {
        let plan = plan(ModalKind::DeleteBinder, &trigger(&[("data-binder", "Casa")])).unwrap();
        assert_eq!(plan.form_id, "deleteBinderForm");
        assert_eq!(plan.action, "/api/binder/Casa/delete");
        assert_eq!(plan.texts, vec![("deleteBinderName", "Casa".to_string())]);
        assert!(plan.select.is_none());
    }

    #[test]
    fn new_category_only_sets_action() {
        let plan = plan(ModalKind::NewCategory, &trigger(&[("data-binder", "Casa")])).unwrap();
        assert_eq!(plan.action, "/api/binder/Casa/category");
        assert!(plan.texts.is_empty() && plan.values.is_empty());
    }

    #[test]
    fn delete_category_needs_category() {
        let t = trigger(&[("data-binder", "Casa"), ("data-category", "Spesa")]);
        let plan = plan(ModalKind::DeleteCategory, &t).unwrap();
        assert_eq!(plan.action, "/api/binder/Casa/category/Spesa/delete");
        assert_eq!(plan.texts, vec![("deleteCategoryName", "Spesa".to_string())]);

        let err = super::plan(ModalKind::DeleteCategory, &trigger(&[("data-binder", "Casa")]));
        assert!(matches!(err, Err(ClientError::MissingAttribute("data-category"))));
    }

    #[test]
    fn add_transaction_loads_categories() {
        let plan = plan(ModalKind::AddTransaction, &trigger(&[("data-binder", "Casa")])).unwrap();
        assert_eq!(plan.action, "/api/binder/Casa/transaction");
        let select = plan.select.unwrap();
        assert_eq!(select.select_id, "transaction_category");
        assert_eq!(select.binder, "Casa");
        assert_eq!(select.selected, None);
    }

    #[test]
    fn edit_transaction_prefills_fields() {
        let t = trigger(&[
            ("data-binder", "Casa"),
            ("data-transaction", "42"),
            ("data-date", "2024-05-01"),
            ("data-category", "Spesa"),
            ("data-amount", "-12.5"),
        ]);
        let plan = plan(ModalKind::EditTransaction, &t).unwrap();
        assert_eq!(plan.action, "/api/binder/Casa/transaction/42/edit");
        assert_eq!(
            plan.values,
            vec![
                ("edit_transaction_date", "2024-05-01".to_string()),
                ("edit_transaction_description", String::new()),
                ("edit_transaction_amount", "-12.5".to_string()),
            ]
        );
        let select = plan.select.unwrap();
        assert_eq!(select.select_id, "edit_transaction_category");
        assert_eq!(select.selected.as_deref(), Some("Spesa"));
    }

    #[test]
    fn delete_transaction_uses_id() {
        let t = trigger(&[("data-binder", "Casa"), ("data-transaction", "42")]);
        let plan = plan(ModalKind::DeleteTransaction, &t).unwrap();
        assert_eq!(plan.form_id, "deleteTransactionForm");
        assert_eq!(plan.action, "/api/binder/Casa/transaction/42/delete");
    }

    #[test]
    fn every_dialog_needs_a_binder() {
        for kind in ModalKind::ALL {
            assert!(matches!(
                plan(kind, &Trigger::default()),
                Err(ClientError::MissingAttribute("data-binder"))
            ));
        }
    }

    #[test]
    fn options_follow_category_order() {
        let data: BinderData = serde_json::from_str(
            r#"{"transactions": [], "categories": {"Spesa": {}, "Affitto": {}, "Svago": {}}}"#,
        )
        .unwrap();

        let options = category_options(&data, Some("Affitto"));
        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Spesa", "Affitto", "Svago"]);
        let selected: Vec<_> = options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, true, false]);
        assert!(options.iter().all(|o| !o.disabled && o.value == o.label));

        let placeholder = placeholder_option();
        assert!(placeholder.disabled && placeholder.selected);
        assert_eq!(placeholder.label, CATEGORY_PLACEHOLDER);
    }

    #[test]
    fn id_keyed_categories_submit_the_id() {
        let data: BinderData = serde_json::from_str(
            r##"{"transactions": [], "categories": {
                "7": {"name": "Spesa", "color": "#f8a5c2"},
                "9": {"name": "Affitto"}
            }}"##,
        )
        .unwrap();

        let options = category_options(&data, Some("Affitto"));
        let pairs: Vec<_> = options
            .iter()
            .map(|o| (o.value.as_str(), o.label.as_str(), o.selected))
            .collect();
        assert_eq!(pairs, vec![("7", "Spesa", false), ("9", "Affitto", true)]);

        let by_id = category_options(&data, Some("7"));
        assert!(by_id[0].selected && !by_id[1].selected);
    }
}
