// src/app/state.rs

use crate::{config::DF, domain::AssetId};

/// View state owned by the app and handed to the render code by reference.
/// Mutate only through the methods below.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    search: String,
    selected: Option<AssetId>,
}

impl DashboardState {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Tracked assets whose id contains the search text, ignoring case.
    pub fn filtered_assets(&self) -> Vec<AssetId> {
        AssetId::all()
            .into_iter()
            .filter(|a| a.matches(&self.search))
            .collect()
    }

    pub fn selected(&self) -> Option<AssetId> {
        self.selected
    }

    /// Replaces any previous selection; the modal shows exactly one asset.
    pub fn select(&mut self, asset: AssetId) {
        #[cfg(debug_assertions)]
        if DF.log_selection {
            log::info!("SELECTION SET to {}", asset);
        }
        self.selected = Some(asset);
    }

    /// Close button, backdrop click and Escape all land here.
    pub fn close_modal(&mut self) -> Option<AssetId> {
        #[cfg(debug_assertions)]
        if DF.log_selection {
            log::info!("SELECTION CLEARED (was {:?})", self.selected);
        }
        self.selected.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_lists_everything() {
        let state = DashboardState::default();
        assert_eq!(state.filtered_assets(), AssetId::all());
    }

    #[test]
    fn search_do_finds_only_dogecoin() {
        let mut state = DashboardState::default();
        state.set_search("do");
        assert_eq!(state.filtered_assets(), vec![AssetId::Dogecoin]);

        state.set_search("DO");
        assert_eq!(state.filtered_assets(), vec![AssetId::Dogecoin]);
    }

    #[test]
    fn search_matches_substrings_anywhere() {
        let mut state = DashboardState::default();
        state.set_search("an");
        assert_eq!(state.filtered_assets(), vec![AssetId::Cardano]);

        state.set_search("e");
        assert_eq!(
            state.filtered_assets(),
            vec![AssetId::Ethereum, AssetId::Ripple, AssetId::Dogecoin]
        );

        state.set_search("zzz");
        assert!(state.filtered_assets().is_empty());
    }

    #[test]
    fn one_selection_at_a_time() {
        let mut state = DashboardState::default();
        assert_eq!(state.selected(), None);

        state.select(AssetId::Bitcoin);
        state.select(AssetId::Cardano);
        assert_eq!(state.selected(), Some(AssetId::Cardano));

        assert_eq!(state.close_modal(), Some(AssetId::Cardano));
        assert_eq!(state.selected(), None);
        assert_eq!(state.close_modal(), None);
    }
}
