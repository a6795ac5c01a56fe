use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    OneTime,
    Subscription,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal string exactly as the server sends it, e.g. "14.99".
    pub price: String,
    pub currency: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub credits_granted: Option<i64>,
    #[serde(default)]
    pub monthly_credits: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogGroups {
    /// Ranked for display.
    pub one_time: Vec<Product>,
    /// Server order.
    pub subscription: Vec<Product>,
}
