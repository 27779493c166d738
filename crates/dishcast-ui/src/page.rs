//! Headless page: render targets, their mounted fragments and live bindings.

use crate::events::{Action, EventKind};
use crate::html::{Fragment, RESULTS_SLOT};

/// A page region whose contents are replaced wholesale on each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    WeatherWidget,
    Main,
    /// Results container inside the current main fragment
    Results,
    Modal,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeatherWidget => "weather-widget",
            Self::Main => "main-content",
            Self::Results => "results",
            Self::Modal => "modal",
        }
    }
}

/// The document model.
///
/// `Results` lives inside `Main`: mounting a new main fragment discards the
/// old results and bumps the main generation. Renders addressed to an older
/// generation are dropped, like writes into a detached container.
#[derive(Debug, Default)]
pub struct Page {
    weather: Fragment,
    main: Fragment,
    results: Fragment,
    modal: Fragment,
    main_generation: u64,
    loading: bool,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, target: Target) -> &mut Fragment {
        match target {
            Target::WeatherWidget => &mut self.weather,
            Target::Main => &mut self.main,
            Target::Results => &mut self.results,
            Target::Modal => &mut self.modal,
        }
    }

    fn slot(&self, target: Target) -> &Fragment {
        match target {
            Target::WeatherWidget => &self.weather,
            Target::Main => &self.main,
            Target::Results => &self.results,
            Target::Modal => &self.modal,
        }
    }

    /// Replace `target`'s fragment. Returns how many bindings were torn down.
    pub fn mount(&mut self, target: Target, fragment: Fragment) -> usize {
        let mut torn_down = 0;
        if target == Target::Main {
            self.main_generation += 1;
            torn_down += std::mem::take(&mut self.results).bindings().len();
        }

        let previous = std::mem::replace(self.slot_mut(target), fragment);
        torn_down += previous.bindings().len();

        tracing::debug!(
            "Mounted {} (generation {}, {} bindings torn down)",
            target.as_str(),
            self.main_generation,
            torn_down
        );
        torn_down
    }

    /// Mount into the results container of main generation `generation`.
    ///
    /// Returns false, leaving the page untouched, when main has been replaced
    /// since or the current main fragment has no results container.
    pub fn mount_results(&mut self, generation: u64, fragment: Fragment) -> bool {
        if generation != self.main_generation {
            tracing::debug!(
                "Dropping results for stale generation {} (current {})",
                generation,
                self.main_generation
            );
            return false;
        }
        if !self.main.has_results_slot() {
            tracing::debug!("Dropping results: main has no results container");
            return false;
        }
        self.mount(Target::Results, fragment);
        true
    }

    pub fn clear(&mut self, target: Target) -> usize {
        self.mount(target, Fragment::empty())
    }

    /// Current main generation
    pub fn generation(&self) -> u64 {
        self.main_generation
    }

    /// Action bound to (`element_id`, `kind`) by a mounted fragment, with the
    /// main generation it was resolved under. The modal sits on top, so it is
    /// searched first.
    pub fn resolve(&self, element_id: &str, kind: EventKind) -> Option<(Action, u64)> {
        [Target::Modal, Target::Results, Target::Main, Target::WeatherWidget]
            .into_iter()
            .find_map(|target| self.slot(target).action_for(element_id, kind))
            .map(|action| (action.clone(), self.main_generation))
    }

    pub fn html(&self, target: Target) -> &str {
        self.slot(target).html()
    }

    pub fn is_empty(&self, target: Target) -> bool {
        self.slot(target).html().is_empty()
    }

    pub fn binding_count(&self) -> usize {
        [Target::WeatherWidget, Target::Main, Target::Results, Target::Modal]
            .into_iter()
            .map(|target| self.slot(target).bindings().len())
            .sum()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Main fragment with the results container filled in
    pub fn main_html(&self) -> String {
        self.main.html().replacen(RESULTS_SLOT, self.results.html(), 1)
    }

    /// Whole document, ready to be written to a file.
    pub fn render_document(&self) -> String {
        let mut feature_cards = String::new();
        for feature in crate::events::Feature::ALL {
            feature_cards.push_str(&format!(
                "<div class=\"feature-card glass-effect\" data-feature=\"{}\"><h3>{}</h3></div>",
                feature.as_str(),
                feature.title()
            ));
        }

        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head><meta charset=\"UTF-8\"><title>Dishcast</title></head>\n\
             <body>\n\
             <header>\n\
             <div class=\"logo\">Dishcast</div>\n\
             <input type=\"text\" id=\"search-input\" placeholder=\"Search recipes...\">\n\
             <div id=\"{}\">{}</div>\n\
             </header>\n\
             <section class=\"features\">{}</section>\n\
             <main id=\"{}\">{}</main>\n\
             <div class=\"loader\" style=\"display: {}\"></div>\n\
             <div id=\"{}\">{}</div>\n\
             </body>\n\
             </html>\n",
            Target::WeatherWidget.as_str(),
            self.weather.html(),
            feature_cards,
            Target::Main.as_str(),
            self.main_html(),
            if self.loading { "block" } else { "none" },
            Target::Modal.as_str(),
            self.modal.html()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_with_slot() -> Fragment {
        Fragment::new(format!("<div>{}</div>", RESULTS_SLOT))
    }

    fn card(id: u64) -> Fragment {
        Fragment::new(format!("<button id=\"v{}\"></button>", id)).bind(
            format!("v{}", id),
            EventKind::Click,
            Action::ViewRecipe(id),
        )
    }

    #[test]
    fn test_remount_tears_down_old_bindings() {
        let mut page = Page::new();
        page.mount(Target::Main, card(1));
        assert!(page.resolve("v1", EventKind::Click).is_some());

        let torn = page.mount(Target::Main, card(2));
        assert_eq!(torn, 1);
        assert!(page.resolve("v1", EventKind::Click).is_none());
        assert_eq!(
            page.resolve("v2", EventKind::Click).map(|(a, _)| a),
            Some(Action::ViewRecipe(2))
        );
        assert_eq!(page.binding_count(), 1);
    }

    #[test]
    fn test_results_render_into_main() {
        let mut page = Page::new();
        page.mount(Target::Main, main_with_slot());
        assert!(page.mount_results(page.generation(), card(7)));

        assert!(page.main_html().contains("id=\"v7\""));
        assert!(!page.main_html().contains(RESULTS_SLOT));
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut page = Page::new();
        page.mount(Target::Main, main_with_slot());
        let old = page.generation();
        page.mount(Target::Main, main_with_slot());

        assert!(!page.mount_results(old, card(3)));
        assert!(page.is_empty(Target::Results));
    }

    #[test]
    fn test_results_need_container() {
        let mut page = Page::new();
        page.mount(Target::Main, Fragment::new("<p>no slot</p>"));
        assert!(!page.mount_results(page.generation(), card(1)));
    }

    #[test]
    fn test_mounting_main_clears_results() {
        let mut page = Page::new();
        page.mount(Target::Main, main_with_slot());
        page.mount_results(page.generation(), card(4));

        let torn = page.mount(Target::Main, main_with_slot());
        assert_eq!(torn, 1);
        assert!(page.resolve("v4", EventKind::Click).is_none());
    }

    #[test]
    fn test_modal_resolves_first() {
        let mut page = Page::new();
        page.mount(
            Target::Main,
            Fragment::new("").bind("x", EventKind::Click, Action::ViewRecipe(1)),
        );
        page.mount(
            Target::Modal,
            Fragment::new("").bind("x", EventKind::Click, Action::CloseModal),
        );
        assert_eq!(
            page.resolve("x", EventKind::Click).map(|(a, _)| a),
            Some(Action::CloseModal)
        );

        page.clear(Target::Modal);
        assert_eq!(
            page.resolve("x", EventKind::Click).map(|(a, _)| a),
            Some(Action::ViewRecipe(1))
        );
    }

    #[test]
    fn test_document_shows_loader_state() {
        let mut page = Page::new();
        assert!(page.render_document().contains("display: none"));
        page.set_loading(true);
        assert!(page.render_document().contains("display: block"));
        assert!(page.render_document().contains("data-feature=\"mood-food\""));
    }
}
