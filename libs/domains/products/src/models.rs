use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

/// Largest accepted price: eight integer digits (`DECIMAL(10,2)`).
const MAX_PRICE_INTEGER_DIGITS: u32 = 8;
const MAX_PRICE_SCALE: u32 = 2;

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Product name is required".into()));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(
            ValidationError::new("range").with_message("Price must be greater than 0".into()),
        );
    }

    let integer_limit = Decimal::from(10_u64.pow(MAX_PRICE_INTEGER_DIGITS));
    if price.normalize().scale() > MAX_PRICE_SCALE || price.trunc() >= integer_limit {
        return Err(ValidationError::new("digits").with_message(
            "Price must have at most 8 integer digits and 2 decimal places".into(),
        ));
    }
    Ok(())
}

/// A catalog entry as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the database on insert
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Always carries two decimal places, e.g. `10.00`
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Replace every mutable field. `id` and timestamps are left to the repository.
    pub fn overwrite(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.stock = fields.stock;
        self.image_url = fields.image_url;
        self.category = fields.category;
    }
}

/// Request body for create and full update.
///
/// Every key is optional on the wire so that a missing or `null` `name` or
/// `price` is reported by validation instead of failing deserialization.
/// Unknown keys, including `id` and the timestamps, are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(
        required(message = "Product name is required"),
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Product name must not exceed 100 characters")
    )]
    #[schema(example = "Widget")]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    #[validate(required(message = "Price is required"), custom(function = "validate_price"))]
    #[schema(value_type = Option<f64>, example = 9.99)]
    pub price: Option<Decimal>,

    /// Defaults to 0 when omitted
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,

    #[validate(length(max = 255, message = "Image URL must not exceed 255 characters"))]
    pub image_url: Option<String>,

    #[validate(length(max = 50, message = "Category must not exceed 50 characters"))]
    pub category: Option<String>,
}

impl ProductInput {
    /// Validate and unwrap into the values the repository stores.
    pub fn into_fields(self) -> Result<ProductFields, ValidationErrors> {
        self.validate()?;

        let (name, mut price) = match (self.name, self.price) {
            (Some(name), Some(price)) => (name, price),
            (name, price) => return Err(required_errors(name.is_none(), price.is_none())),
        };
        price.rescale(MAX_PRICE_SCALE);

        Ok(ProductFields {
            name,
            description: self.description,
            price,
            stock: self.stock.unwrap_or_default(),
            image_url: self.image_url,
            category: self.category,
        })
    }
}

fn required_errors(name_missing: bool, price_missing: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if name_missing {
        errors.add(
            "name",
            ValidationError::new("required").with_message("Product name is required".into()),
        );
    }
    if price_missing {
        errors.add(
            "price",
            ValidationError::new("required").with_message("Price is required".into()),
        );
    }
    errors
}

/// Validated mutable fields of a [`Product`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// `?name=` for substring search
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-sensitive substring of the product name
    pub name: String,
}

/// `?min=&max=`, both bounds inclusive
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRangeQuery {
    #[param(value_type = f64, example = 10.0)]
    pub min: Decimal,
    #[param(value_type = f64, example = 50.0)]
    pub max: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockQuery {
    /// Only products with stock strictly above this value; defaults to 0
    pub min: Option<i32>,
}
