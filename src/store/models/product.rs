use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// Validated product fields for a create; the id is assigned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Option<Rating>,
}

/// Raw create payload as sent by clients. Unknown keys (including `id`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProductDraft {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub rating: Option<Rating>,
}

/// Partial update. Absent fields keep their current value; `id` is never patchable.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("Missing or invalid required product fields")]
    MissingOrInvalidFields,

    #[error("No update data provided")]
    NoUpdateData,

    #[error("Invalid product update fields")]
    InvalidUpdateFields,
}

impl ProductDraft {
    pub fn from_json(value: Value) -> Result<Self, ProductValidationError> {
        if !value.is_object() {
            return Err(ProductValidationError::MissingOrInvalidFields);
        }
        serde_json::from_value(value).map_err(|_| ProductValidationError::MissingOrInvalidFields)
    }

    pub fn validate(self) -> Result<NewProduct, ProductValidationError> {
        let invalid = ProductValidationError::MissingOrInvalidFields;

        let title = self.title.filter(|s| !s.is_empty()).ok_or(invalid.clone())?;
        let price = self.price.filter(|p| valid_price(*p)).ok_or(invalid.clone())?;
        let description = self.description.filter(|s| !s.is_empty()).ok_or(invalid.clone())?;
        let category = self.category.filter(|s| !s.is_empty()).ok_or(invalid.clone())?;
        let image = self.image.filter(|s| !s.is_empty()).ok_or(invalid.clone())?;

        if let Some(rating) = &self.rating {
            if !rating.rate.is_finite() {
                return Err(invalid);
            }
        }

        Ok(NewProduct {
            title,
            price,
            description,
            category,
            image,
            rating: self.rating,
        })
    }
}

impl NewProduct {
    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            rating: self.rating.unwrap_or_default(),
        }
    }
}

impl ProductPatch {
    /// Parse an update body. An empty (or non-object) body is rejected before
    /// any field is looked at.
    pub fn from_json(value: Value) -> Result<Self, ProductValidationError> {
        match value.as_object() {
            Some(map) if !map.is_empty() => {}
            _ => return Err(ProductValidationError::NoUpdateData),
        }

        let patch: ProductPatch = serde_json::from_value(value)
            .map_err(|_| ProductValidationError::InvalidUpdateFields)?;
        patch.validate()?;
        Ok(patch)
    }

    fn validate(&self) -> Result<(), ProductValidationError> {
        let non_empty = |field: &Option<String>| field.as_deref().map_or(true, |s| !s.is_empty());

        let ok = non_empty(&self.title)
            && non_empty(&self.description)
            && non_empty(&self.category)
            && non_empty(&self.image)
            && self.price.map_or(true, valid_price)
            && self.rating.map_or(true, |r| r.rate.is_finite());

        if ok {
            Ok(())
        } else {
            Err(ProductValidationError::InvalidUpdateFields)
        }
    }

    pub fn apply_to(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}
