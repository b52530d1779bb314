//! Membership plan catalog.
//!
//! Static until plans move to the backend. The pricing page and the checkout
//! placeholder both read from here.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Month,
    Year,
    /// Single purchase, e.g. a class pack.
    Once,
}

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in the smallest currency unit.
    pub price_cents: u32,
    pub currency: &'static str,
    pub interval: BillingInterval,
    pub features: &'static [&'static str],
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "drop-in",
        name: "Drop-In Class",
        price_cents: 2_500,
        currency: "usd",
        interval: BillingInterval::Once,
        features: &["One group class", "Towel service"],
    },
    Plan {
        id: "ten-pack",
        name: "10-Class Pack",
        price_cents: 20_000,
        currency: "usd",
        interval: BillingInterval::Once,
        features: &["Ten group classes", "Valid for 6 months", "Towel service"],
    },
    Plan {
        id: "unlimited-monthly",
        name: "Unlimited Monthly",
        price_cents: 14_900,
        currency: "usd",
        interval: BillingInterval::Month,
        features: &["Unlimited group classes", "Open gym access", "Monthly progress check-in"],
    },
    Plan {
        id: "unlimited-annual",
        name: "Unlimited Annual",
        price_cents: 149_000,
        currency: "usd",
        interval: BillingInterval::Year,
        features: &[
            "Unlimited group classes",
            "Open gym access",
            "Quarterly personal training session",
            "Two months free",
        ],
    },
];

/// Look up a plan by id. Surrounding whitespace is ignored.
#[must_use]
pub fn find_plan(id: &str) -> Option<&'static Plan> {
    let id = id.trim();
    PLANS.iter().find(|plan| plan.id == id)
}
