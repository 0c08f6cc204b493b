//! Brand selection.
//!
//! Holds the fetched brand list and applies the default-selection
//! heuristic. The selected brand itself lives in the
//! [`Conversation`](crate::conversation::Conversation); the selector only
//! proposes brands to select.

use tracing::{debug, info};

use crate::api::{BrandBrainApi, BrandListing};
use crate::config::DefaultSelection;
use crate::types::Brand;

/// Brand list state for the selection control.
#[derive(Debug, Clone)]
pub struct BrandSelector {
    brands: Vec<Brand>,
    loading: bool,
    last_failure: Option<String>,
    /// Cleared after the first successful non-empty fetch or a manual pick.
    auto_select: bool,
    default_selection: DefaultSelection,
}

impl Default for BrandSelector {
    fn default() -> Self {
        Self::new(DefaultSelection::default())
    }
}

impl BrandSelector {
    /// Selector in its initial loading state.
    pub fn new(default_selection: DefaultSelection) -> Self {
        Self {
            brands: Vec::new(),
            loading: true,
            last_failure: None,
            auto_select: true,
            default_selection,
        }
    }

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The selection control is disabled while a fetch is pending.
    pub fn is_enabled(&self) -> bool {
        !self.loading
    }

    /// Reason the last fetch was degraded, if it was.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }

    /// Fetch brands and apply the result. Returns the brand the heuristic
    /// picked, if any.
    pub async fn load(&mut self, api: &dyn BrandBrainApi, current: Option<&Brand>) -> Option<Brand> {
        self.loading = true;
        let listing = api.list_brands().await;
        self.apply_listing(listing, current)
    }

    /// Replace the brand list with `listing`.
    ///
    /// The heuristic runs at most once: on the first fetched, non-empty
    /// listing, and it only proposes a brand when `current` is `None`.
    pub fn apply_listing(&mut self, listing: BrandListing, current: Option<&Brand>) -> Option<Brand> {
        self.loading = false;
        self.last_failure = listing.failure().map(str::to_string);
        self.brands = listing.brands;
        debug!(count = self.brands.len(), "Brands loaded");

        if self.last_failure.is_some() || self.brands.is_empty() || !self.auto_select {
            return None;
        }
        self.auto_select = false;

        if current.is_some() {
            return None;
        }

        let choice = self.default_choice();
        if let Some(ref brand) = choice {
            info!("Auto-selected brand: {}", brand.id);
        }
        choice
    }

    /// Preferred brand if present, else the only brand, else nothing.
    pub fn default_choice(&self) -> Option<Brand> {
        self.brands
            .iter()
            .find(|b| self.default_selection.matches(b))
            .cloned()
            .or_else(|| match self.brands.as_slice() {
                [only] => Some(only.clone()),
                _ => None,
            })
    }

    /// Manual selection by id. Unknown ids (and picks while loading) are
    /// ignored. A successful pick disables the heuristic for good.
    pub fn choose(&mut self, id: &str) -> Option<Brand> {
        if self.loading {
            return None;
        }
        let brand = self.find(id).cloned()?;
        self.auto_select = false;
        Some(brand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(ids: &[&str]) -> BrandListing {
        BrandListing::fetched(
            ids.iter().map(|id| Brand::new(*id, id.to_uppercase())).collect(),
            None,
        )
    }

    #[test]
    fn test_starts_loading_and_disabled() {
        let selector = BrandSelector::default();
        assert!(selector.is_loading());
        assert!(!selector.is_enabled());
    }

    #[test]
    fn test_prefers_westinghouse_by_id() {
        let mut selector = BrandSelector::default();
        let picked = selector.apply_listing(listing(&["a", "westinghouse_in"]), None);
        assert_eq!(picked.unwrap().id, "westinghouse_in");
        assert!(selector.is_enabled());
    }

    #[test]
    fn test_prefers_westinghouse_by_name() {
        let mut selector = BrandSelector::default();
        let brands = BrandListing::fetched(
            vec![Brand::new("a", "Alpha"), Brand::new("wh", "Westinghouse India")],
            None,
        );
        assert_eq!(selector.apply_listing(brands, None).unwrap().id, "wh");
    }

    #[test]
    fn test_single_brand_selected() {
        let mut selector = BrandSelector::default();
        assert_eq!(selector.apply_listing(listing(&["a"]), None).unwrap().id, "a");
    }

    #[test]
    fn test_ambiguous_list_selects_nothing() {
        let mut selector = BrandSelector::default();
        assert!(selector.apply_listing(listing(&["a", "b"]), None).is_none());
    }

    #[test]
    fn test_existing_selection_is_kept() {
        let mut selector = BrandSelector::default();
        let current = Brand::new("b", "B");
        assert!(selector
            .apply_listing(listing(&["westinghouse_in", "b"]), Some(&current))
            .is_none());
    }

    #[test]
    fn test_heuristic_runs_once() {
        let mut selector = BrandSelector::default();
        assert!(selector.apply_listing(listing(&["a", "b"]), None).is_none());
        assert!(selector.apply_listing(listing(&["a"]), None).is_none());
    }

    #[test]
    fn test_degraded_or_empty_fetch_keeps_heuristic_armed() {
        let mut selector = BrandSelector::default();
        let degraded = BrandListing::degraded("timeout", Some(&Brand::new("havells", "Havells")));
        assert!(selector.apply_listing(degraded, None).is_none());
        assert_eq!(selector.last_failure(), Some("timeout"));

        assert!(selector.apply_listing(listing(&[]), None).is_none());
        assert_eq!(selector.apply_listing(listing(&["a"]), None).unwrap().id, "a");
        assert_eq!(selector.last_failure(), None);
    }

    #[test]
    fn test_manual_choice_disables_heuristic() {
        let mut selector = BrandSelector::default();
        selector.apply_listing(BrandListing::degraded("down", Some(&Brand::new("b", "B"))), None);
        assert_eq!(selector.choose("b").unwrap().id, "b");
        assert!(selector.apply_listing(listing(&["a"]), None).is_none());
    }

    #[test]
    fn test_choose_unknown_or_while_loading_is_noop() {
        let mut selector = BrandSelector::default();
        assert!(selector.choose("a").is_none());

        selector.apply_listing(listing(&["a", "b"]), None);
        assert!(selector.choose("zzz").is_none());
        assert_eq!(selector.choose("a").unwrap().id, "a");
    }
}
