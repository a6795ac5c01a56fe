mod model;

pub use model::*;

use std::{cmp::Ordering, sync::Arc};

use tokio::sync::RwLock;

use super::{surface_error, ApiClient, LoadState, ServiceError};
use crate::runtime::{EventLog, Source};

pub const LOAD_PRODUCTS_FAILED: &str = "Failed to load products";

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// Server order.
    pub products: Vec<Product>,
    pub load_state: LoadState,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct CatalogView {
    api: ApiClient,
    events: EventLog,
    featured_price: String,
    state: Arc<RwLock<CatalogState>>,
}

impl CatalogView {
    pub fn new(api: ApiClient, events: EventLog, featured_price: &str) -> Self {
        Self {
            api,
            events,
            featured_price: featured_price.to_string(),
            state: Arc::new(RwLock::new(CatalogState::default())),
        }
    }

    /// Replaces the product list. On failure the previous list stays.
    pub async fn load(&self) {
        {
            let mut state = self.state.write().await;
            state.load_state = LoadState::Loading;
            state.error = None;
        }

        let result = self.api.products().await;

        let mut state = self.state.write().await;
        match result {
            Ok(products) => {
                info!("Loaded {} products", products.len());
                state.products = products;
                state.load_state = LoadState::Idle;
            }
            Err(ServiceError::AuthRequired) => {
                state.load_state = LoadState::Idle;
            }
            Err(e) => {
                state.error = surface_error(&self.events, Source::Catalog, &e, LOAD_PRODUCTS_FAILED);
                state.load_state = LoadState::Error;
            }
        }
    }

    pub async fn snapshot(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    /// Puts a load aborted mid-flight back to idle.
    pub(crate) async fn reset_interrupted(&self) {
        let mut state = self.state.write().await;
        if state.load_state == LoadState::Loading {
            state.load_state = LoadState::Idle;
        }
    }

    pub async fn groups(&self) -> CatalogGroups {
        partition(&self.state.read().await.products)
    }

    pub fn is_featured(&self, product: &Product) -> bool {
        product.price == self.featured_price
    }
}

/// Splits by product type; the one-time group comes back ranked.
pub fn partition(products: &[Product]) -> CatalogGroups {
    let (mut one_time, subscription): (Vec<Product>, Vec<Product>) = products
        .iter()
        .cloned()
        .partition(|product| product.product_type == ProductType::OneTime);
    rank_one_time(&mut one_time);
    CatalogGroups { one_time, subscription }
}

/// Packs whose name or slug contains "10" first, then by granted credits
/// ascending with missing credits last. Stable.
pub fn rank_one_time(products: &mut [Product]) {
    products.sort_by(|a, b| {
        is_ten_pack(b)
            .cmp(&is_ten_pack(a))
            .then_with(|| compare_credits(a.credits_granted, b.credits_granted))
    });
}

/// Marketing heuristic: a literal substring match, so "100" and "v10" count too.
pub fn is_ten_pack(product: &Product) -> bool {
    product.name.contains("10") || product.slug.contains("10")
}

fn compare_credits(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
