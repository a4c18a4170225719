//! Service price list.
//!
//! Fixed table of what can be bought: price, gateway description and the
//! page the buyer returns to after paying.

use serde::Serialize;

pub const CURRENCY: &str = "RUB";

/// Purchasable product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Full personal Matrix of Destiny reading
    #[default]
    Personal,
    /// Two-person compatibility matrix
    Compatibility,
}

/// Gateway-facing details of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOffer {
    pub service: ServiceType,
    /// Decimal string with two fraction digits, as the gateway expects
    pub amount: &'static str,
    pub description: &'static str,
    pub return_url: &'static str,
}

static OFFERS: &[ServiceOffer] = &[
    ServiceOffer {
        service: ServiceType::Personal,
        amount: "590.00",
        description: "Полный расклад Матрицы Судьбы",
        return_url: "https://www.xn--80aaxovl4a.site/index.html?payment=success",
    },
    ServiceOffer {
        service: ServiceType::Compatibility,
        amount: "590.00",
        description: "Матрица совместимости",
        return_url: "https://www.xn--80aaxovl4a.site/compatibility.html?payment=success",
    },
];

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Personal => "personal",
            ServiceType::Compatibility => "compatibility",
        }
    }

    /// Parse a client-supplied service name. Exact, case-sensitive match.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "personal" => Some(ServiceType::Personal),
            "compatibility" => Some(ServiceType::Compatibility),
            _ => None,
        }
    }

    pub fn offer(&self) -> &'static ServiceOffer {
        match self {
            ServiceType::Personal => &OFFERS[0],
            ServiceType::Compatibility => &OFFERS[1],
        }
    }
}
