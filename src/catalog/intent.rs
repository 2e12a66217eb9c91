use crate::mvi::Intent;

use super::service::ItemForm;

#[derive(Debug, Clone)]
pub enum CatalogIntent {
    /// Load items unless a load is running or content is already shown.
    Load,
    /// Reload, superseding any load in flight.
    Refresh,
    CancelLoad,
    /// Load again after a failure. Ignored in any other state.
    Retry,
    /// Open the compose sheet.
    Compose,
    Submit(ItemForm),
    ShowItem(u64),
    Back,
    BackToRoot,
    OpenFilters,
    DismissModal,
}

impl Intent for CatalogIntent {}
