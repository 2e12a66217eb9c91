//! Reference feature: an item catalog with details, compose and filters.

mod feature;
mod intent;
mod memory;
mod route;
mod service;

pub use feature::{
    CatalogFeature, COMPOSE_SHEET, FILTERS_SHEET, INVALID_FORM_ALERT, ITEMS, SAVE,
    SAVE_FAILED_ALERT, TRACK,
};
pub use intent::CatalogIntent;
pub use memory::InMemoryCatalog;
pub use route::CatalogRoute;
pub use service::{
    Analytics, CatalogError, CatalogServices, Item, ItemForm, ItemSource, ItemStore, TrackEvent,
};
