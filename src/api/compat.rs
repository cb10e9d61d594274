//! JSONPlaceholder-style compatibility records
//!
//! The frontend this service replaced its upstream for was written against
//! a JSONPlaceholder API. These derivations present currencies as "users"
//! and current rates as "posts" so that frontend keeps working unchanged.

use crate::db::sqlite::models::{Currency, RateRow};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CompanyRecord {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressRecord {
    pub city: String,
}

/// A currency dressed up as a JSONPlaceholder user
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: CompanyRecord,
    pub address: AddressRecord,
}

/// A current rate dressed up as a JSONPlaceholder post
#[derive(Debug, Clone, Serialize)]
pub struct PostRecord {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

pub fn user_from_currency(currency: &Currency) -> UserRecord {
    // The mailbox is the description lowercased with whitespace removed
    let mailbox: String = currency
        .description
        .to_lowercase()
        .split_whitespace()
        .collect();

    UserRecord {
        id: currency.code,
        name: currency.description.clone(),
        username: format!("moneda_{}", currency.code),
        email: format!("{}@banguat.gt", mailbox),
        phone: format!("+502-{}000-0000", currency.code),
        website: "www.banguat.gob.gt".to_string(),
        company: CompanyRecord {
            name: "Banco de Guatemala".to_string(),
        },
        address: AddressRecord {
            city: "Guatemala".to_string(),
        },
    }
}

/// Minimal user reference nested in [`UserPosts`]
#[derive(Debug, Clone, Serialize)]
pub struct UserStub {
    pub id: i64,
    pub name: String,
}

/// Payload for the user-posts route: the currency's history as posts
#[derive(Debug, Clone, Serialize)]
pub struct UserPosts {
    pub user: UserStub,
    pub posts: Vec<RateRow>,
    #[serde(rename = "postsCount")]
    pub posts_count: usize,
}

pub fn user_posts(code: i64, posts: Vec<RateRow>) -> UserPosts {
    UserPosts {
        user: UserStub {
            id: code,
            name: format!("Moneda {}", code),
        },
        posts_count: posts.len(),
        posts,
    }
}

pub fn post_from_rate(rate: &RateRow) -> PostRecord {
    let symbol = rate.symbol.as_deref().unwrap_or("");
    let buy = format_amount(rate.buy);
    let sell = format_amount(rate.sell);

    PostRecord {
        id: rate.currency_code,
        user_id: rate.currency_code,
        title: format!("Tipo de Cambio {}", rate.description),
        body: format!(
            "Compra: {}{} - Venta: {}{} - Fecha: {}",
            symbol, buy, symbol, sell, rate.date
        ),
    }
}

/// Absent amounts render as `N/A`; a real zero still renders as a number.
fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}
