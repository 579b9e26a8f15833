use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A bookable travel offering, owned by the admin account that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub created_by: ObjectId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Caller-supplied fields of a new package.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPackage {
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

impl NewPackage {
    pub fn into_package(self, created_by: ObjectId) -> Package {
        Package {
            id: None,
            title: self.title,
            location: self.location,
            price: self.price,
            description: self.description,
            image: self.image,
            created_by,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial update. `None` means the field was not supplied and keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageChanges {
    pub title: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl PackageChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.location.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }

    pub fn apply_to(&self, package: &mut Package) {
        if let Some(title) = &self.title {
            package.title = title.clone();
        }
        if let Some(location) = &self.location {
            package.location = location.clone();
        }
        if let Some(price) = self.price {
            package.price = price;
        }
        if let Some(description) = &self.description {
            package.description = description.clone();
        }
        if let Some(image) = &self.image {
            package.image = image.clone();
        }
    }
}
