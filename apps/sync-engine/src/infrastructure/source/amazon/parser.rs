//! Product page parsing.
//!
//! All knowledge of the source page structure lives here. The output is a
//! small set of signals; nothing downstream ever sees HTML.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use crate::domain::availability::AvailabilitySignal;

/// Price containers, most specific first.
const PRICE_SELECTORS: &[&str] = &[
    "#corePrice_feature_div .a-offscreen",
    "#corePriceDisplay_desktop_feature_div .a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    "#price_inside_buybox",
    "#buybox .a-price .a-offscreen",
];

const AVAILABILITY_SELECTORS: &[&str] = &["#availability", "#outOfStock", "#availability-string"];

const DELIVERY_SELECTORS: &[&str] = &[
    "#mir-layout-DELIVERY_BLOCK-slot-PRIMARY_DELIVERY_MESSAGE_LARGE",
    "#mir-layout-DELIVERY_BLOCK",
    "#deliveryBlockMessage",
    "#delivery-message",
];

const ADD_TO_CART_SELECTORS: &[&str] = &["#add-to-cart-button", "#buy-now-button"];

const NEGATIVE_UNAVAILABLE: &[&str] = &["currently unavailable", "no longer available"];
const NEGATIVE_OUT_OF_STOCK: &[&str] = &["out of stock"];
const POSITIVE_PHRASES: &[&str] = &["in stock", "add to cart", "usually ships within"];

/// Markers of an anti-bot interstitial.
const BLOCK_MARKERS: &[&str] = &[
    "/errors/validatecaptcha",
    "robot check",
    "enter the characters you see below",
    "make sure you're not a robot",
    "api-services-support@amazon.com",
];

static DELIVERY_DATE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})\b",
    )
    .ok()
});

/// Signals extracted from one product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSignals {
    /// Displayed price.
    pub price: Option<Decimal>,
    /// Availability phrase class.
    pub signal: AvailabilitySignal,
    /// Days until the earliest delivery estimate.
    pub delivery_days: Option<u32>,
    /// Page is an anti-bot interstitial.
    pub blocked: bool,
}

/// Parse a product page fetched on `today`.
#[must_use]
pub fn parse_product_page(html: &str, today: NaiveDate) -> PageSignals {
    let document = Html::parse_document(html);

    let price = PRICE_SELECTORS
        .iter()
        .find_map(|selector| first_text(&document, selector))
        .and_then(|text| parse_price(&text));

    let availability_text = AVAILABILITY_SELECTORS
        .iter()
        .filter_map(|selector| first_text(&document, selector))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let has_add_to_cart = ADD_TO_CART_SELECTORS
        .iter()
        .any(|selector| exists(&document, selector));
    let signal = classify_availability(&availability_text, has_add_to_cart);

    let delivery_days = DELIVERY_SELECTORS
        .iter()
        .find_map(|selector| first_text(&document, selector))
        .and_then(|text| parse_delivery_days(&text, today));

    let nothing_found =
        price.is_none() && signal == AvailabilitySignal::Unknown && delivery_days.is_none();
    let blocked = nothing_found && is_block_page(html);

    PageSignals {
        price,
        signal: if blocked {
            AvailabilitySignal::Blocked
        } else {
            signal
        },
        delivery_days,
        blocked,
    }
}

/// Check for anti-bot markers anywhere in the raw page.
#[must_use]
pub fn is_block_page(html: &str) -> bool {
    let lowered = html.to_lowercase();
    BLOCK_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Map availability text to a signal. Negative phrases win.
#[must_use]
pub fn classify_availability(text: &str, has_add_to_cart: bool) -> AvailabilitySignal {
    if NEGATIVE_UNAVAILABLE.iter().any(|p| text.contains(p)) {
        AvailabilitySignal::Unavailable
    } else if NEGATIVE_OUT_OF_STOCK.iter().any(|p| text.contains(p)) {
        AvailabilitySignal::OutOfStock
    } else if has_add_to_cart || POSITIVE_PHRASES.iter().any(|p| text.contains(p)) {
        AvailabilitySignal::InStock
    } else {
        AvailabilitySignal::Unknown
    }
}

/// Parse a displayed price such as `$1,234.56`.
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok().filter(|p| !p.is_sign_negative())
}

/// Days from `today` until the first delivery date mentioned in `text`.
///
/// Dates without a year roll over to next year when already past.
#[must_use]
pub fn parse_delivery_days(text: &str, today: NaiveDate) -> Option<u32> {
    let lowered = text.to_lowercase();
    if lowered.contains("today") {
        return Some(0);
    }
    if lowered.contains("tomorrow") {
        return Some(1);
    }

    let captures = DELIVERY_DATE.as_ref()?.captures(&lowered)?;
    let month = month_number(captures.get(1)?.as_str())?;
    let day: u32 = captures.get(2)?.as_str().parse().ok()?;

    let mut date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date < today {
        date = NaiveDate::from_ymd_opt(today.year() + 1, month, day)?;
    }
    u32::try_from((date - today).num_days()).ok()
}

fn month_number(prefix: &str) -> Option<u32> {
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}

fn exists(document: &Html, selector: &str) -> bool {
    Selector::parse(selector)
        .ok()
        .is_some_and(|selector| document.select(&selector).next().is_some())
}
