use gloo_net::http::Request;
use web_sys::RequestCredentials;

use crate::error::{ClientError, Result};
use crate::model::BinderData;

const API_BINDER_PREFIX: &str = "/api/binder";

pub fn binder_data_path(binder: &str) -> String {
    format!("{}/{}/data", API_BINDER_PREFIX, binder)
}

pub fn delete_binder_path(binder: &str) -> String {
    format!("{}/{}/delete", API_BINDER_PREFIX, binder)
}

pub fn new_category_path(binder: &str) -> String {
    format!("{}/{}/category", API_BINDER_PREFIX, binder)
}

pub fn delete_category_path(binder: &str, category: &str) -> String {
    format!("{}/{}/category/{}/delete", API_BINDER_PREFIX, binder, category)
}

pub fn new_transaction_path(binder: &str) -> String {
    format!("{}/{}/transaction", API_BINDER_PREFIX, binder)
}

pub fn edit_transaction_path(binder: &str, transaction: &str) -> String {
    format!("{}/{}/transaction/{}/edit", API_BINDER_PREFIX, binder, transaction)
}

pub fn delete_transaction_path(binder: &str, transaction: &str) -> String {
    format!("{}/{}/transaction/{}/delete", API_BINDER_PREFIX, binder, transaction)
}

/// Fetches the transactions and categories of one binder. The session cookie
/// rides along so the server's login check passes.
pub async fn fetch_binder_data(binder: &str) -> Result<BinderData> {
    let url = binder_data_path(binder);
    let resp = Request::get(&url)
        .credentials(RequestCredentials::SameOrigin)
        .send()
        .await?;

    if !resp.ok() {
        return Err(ClientError::Status(resp.status()));
    }

    let data = resp.json::<BinderData>().await?;
    log::debug!(
        "binder {}: {} transactions, {} categories",
        binder,
        data.transactions.len(),
        data.categories.len()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_rest_paths() {
        assert_eq!(binder_data_path("Casa"), "/api/binder/Casa/data");
        assert_eq!(delete_binder_path("Casa"), "/api/binder/Casa/delete");
        assert_eq!(new_category_path("Casa"), "/api/binder/Casa/category");
        assert_eq!(
            delete_category_path("Casa", "Spesa"),
            "/api/binder/Casa/category/Spesa/delete"
        );
        assert_eq!(new_transaction_path("Casa"), "/api/binder/Casa/transaction");
        assert_eq!(
            edit_transaction_path("Casa", "12"),
            "/api/binder/Casa/transaction/12/edit"
        );
        assert_eq!(
            delete_transaction_path("Casa", "12"),
            "/api/binder/Casa/transaction/12/delete"
        );
    }
}
