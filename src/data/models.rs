//! Data models for orders, packages, and their closed enumerations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Marketplace an order was placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "shop.app")]
    ShopApp,
    #[serde(rename = "etsy")]
    Etsy,
    #[serde(rename = "amazon")]
    Amazon,
    #[serde(rename = "generic")]
    Generic,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::ShopApp,
        Platform::Etsy,
        Platform::Amazon,
        Platform::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::ShopApp => "shop.app",
            Platform::Etsy => "etsy",
            Platform::Amazon => "amazon",
            Platform::Generic => "generic",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "shop.app" => Ok(Platform::ShopApp),
            "etsy" => Ok(Platform::Etsy),
            "amazon" => Ok(Platform::Amazon),
            "generic" => Ok(Platform::Generic),
            _ => Err(invalid_value("platform", s, &Platform::ALL.map(|p| p.as_str()))),
        }
    }
}

/// Shipping company handling a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    Fedex,
    Ups,
    Usps,
    AmazonLogistics,
}

impl Carrier {
    pub const ALL: [Carrier; 4] = [
        Carrier::Fedex,
        Carrier::Ups,
        Carrier::Usps,
        Carrier::AmazonLogistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Fedex => "fedex",
            Carrier::Ups => "ups",
            Carrier::Usps => "usps",
            Carrier::AmazonLogistics => "amazon_logistics",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Carrier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "fedex" => Ok(Carrier::Fedex),
            "ups" => Ok(Carrier::Ups),
            "usps" => Ok(Carrier::Usps),
            "amazon_logistics" => Ok(Carrier::AmazonLogistics),
            _ => Err(invalid_value("carrier", s, &Carrier::ALL.map(|c| c.as_str()))),
        }
    }
}

/// Delivery-lifecycle state, shared by orders and packages.
///
/// The seven values form an unordered set: any value may replace any other
/// via update-status. No transition graph is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Pending,
        Status::Shipped,
        Status::InTransit,
        Status::OutForDelivery,
        Status::Delivered,
        Status::Exception,
        Status::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Shipped => "shipped",
            Status::InTransit => "in_transit",
            Status::OutForDelivery => "out_for_delivery",
            Status::Delivered => "delivered",
            Status::Exception => "exception",
            Status::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "shipped" => Ok(Status::Shipped),
            "in_transit" => Ok(Status::InTransit),
            "out_for_delivery" => Ok(Status::OutForDelivery),
            "delivered" => Ok(Status::Delivered),
            "exception" => Ok(Status::Exception),
            "cancelled" => Ok(Status::Cancelled),
            _ => Err(invalid_value("status", s, &Status::ALL.map(|v| v.as_str()))),
        }
    }
}

fn invalid_value(kind: &str, value: &str, valid: &[&str]) -> Error {
    Error::Validation(format!(
        "invalid {kind}: {value} (valid options: {})",
        valid.join(", ")
    ))
}

/// A user-placed purchase, owning zero or more packages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub platform: Platform,
    pub order_number: Option<String>,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub packages: Vec<Package>,
}

/// One physical shipment attached to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub order_id: i64,
    pub tracking_number: String,
    pub carrier: Carrier,
    pub status: Status,
    pub last_location: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an order; id, status, and timestamps are assigned
/// by the storage layer
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub platform: Platform,
    pub order_number: Option<String>,
    pub description: String,
}

/// Tracking details for creating a package
#[derive(Debug, Clone)]
pub struct NewTracking {
    pub tracking_number: String,
    pub carrier: Carrier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ETSY".parse::<Platform>().unwrap(), Platform::Etsy);
        assert_eq!("Shop.App".parse::<Platform>().unwrap(), Platform::ShopApp);
        assert_eq!("FedEx".parse::<Carrier>().unwrap(), Carrier::Fedex);
        assert_eq!("In_Transit".parse::<Status>().unwrap(), Status::InTransit);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let err = "ebay".parse::<Platform>().unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert!(msg.contains("ebay"));
                assert!(msg.contains("shop.app, etsy, amazon, generic"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!("dhl".parse::<Carrier>().is_err());
        assert!("lost".parse::<Status>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
        for carrier in Carrier::ALL {
            assert_eq!(carrier.to_string().parse::<Carrier>().unwrap(), carrier);
        }
        for status in Status::ALL {
            assert_eq!(status.to_string().parse::<Status>().unwrap(), status);
        }
    }
}
