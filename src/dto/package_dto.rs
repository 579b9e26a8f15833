use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::model::package::{NewPackage, Package, PackageChanges};

/// Prices arrive either as JSON numbers or as numeric strings from form inputs.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn into_price<E: de::Error>(self) -> Result<f64, E> {
        let price = match self {
            PriceInput::Number(price) => price,
            PriceInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid price: {:?}", text)))?,
        };
        if !price.is_finite() {
            return Err(E::custom("price must be a finite number"));
        }
        Ok(price)
    }
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    PriceInput::deserialize(deserializer)?.into_price()
}

fn deserialize_optional_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<PriceInput>::deserialize(deserializer)?
        .map(PriceInput::into_price)
        .transpose()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(deserialize_with = "deserialize_price")]
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub image: String,
}

impl From<CreatePackageRequest> for NewPackage {
    fn from(req: CreatePackageRequest) -> Self {
        NewPackage {
            title: req.title.trim().to_string(),
            location: req.location.trim().to_string(),
            price: req.price,
            description: req.description.trim().to_string(),
            image: req.image.trim().to_string(),
        }
    }
}

/// Omitted and `null` fields are left untouched; every other value overwrites, `0` and `""` included.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePackageRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_price")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
}

impl From<UpdatePackageRequest> for PackageChanges {
    fn from(req: UpdatePackageRequest) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        PackageChanges {
            title: trim(req.title),
            location: trim(req.location),
            price: req.price,
            description: trim(req.description),
            image: trim(req.image),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub created_by: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Package> for PackageResponse {
    fn from(package: Package) -> Self {
        PackageResponse {
            id: package.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: package.title,
            location: package.location,
            price: package.price,
            description: package.description,
            image: package.image,
            created_by: package.created_by.to_hex(),
            created_at: package.created_at,
            updated_at: package.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMessageResponse {
    pub message: String,
    pub package: PackageResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_accepts_number_and_numeric_string() {
        let from_number: CreatePackageRequest = serde_json::from_value(json!({
            "title": "Tokyo", "location": "Tokyo, Japan", "price": 1899, "description": "City break"
        }))
        .expect("numeric price");
        assert_eq!(from_number.price, 1899.0);
        assert!(from_number.image.is_empty());

        let from_text: CreatePackageRequest = serde_json::from_value(json!({
            "title": "Tokyo", "location": "Tokyo, Japan", "price": " 1899.50 ", "description": "City break"
        }))
        .expect("string price");
        assert_eq!(from_text.price, 1899.5);
    }

    #[test]
    fn test_price_rejects_garbage_and_non_finite() {
        for price in [json!("cheap"), json!("NaN"), json!("inf"), json!(true)] {
            let parsed = serde_json::from_value::<CreatePackageRequest>(json!({
                "title": "Tokyo", "location": "Tokyo, Japan", "price": price, "description": "City break"
            }));
            assert!(parsed.is_err(), "price {} should be rejected", price);
        }
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let req: CreatePackageRequest = serde_json::from_value(json!({
            "title": "Tokyo", "location": "Tokyo, Japan", "price": -1, "description": "City break"
        }))
        .expect("parse");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_distinguishes_absent_from_zero_and_empty() {
        let req: UpdatePackageRequest =
            serde_json::from_value(json!({ "price": 0, "image": "", "title": null })).expect("parse");
        assert!(req.validate().is_ok());
        let changes = PackageChanges::from(req);
        assert_eq!(changes.price, Some(0.0));
        assert_eq!(changes.image.as_deref(), Some(""));
        assert!(changes.title.is_none());
        assert!(changes.location.is_none());
    }

    #[test]
    fn test_update_rejects_empty_title() {
        let req: UpdatePackageRequest = serde_json::from_value(json!({ "title": "" })).expect("parse");
        assert!(req.validate().is_err());
    }
}
