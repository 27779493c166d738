//! HTML fragments and the event bindings they register.

use crate::events::{Action, EventKind};

/// Marker replaced by the results fragment when the page is rendered.
pub const RESULTS_SLOT: &str = "<!--results-->";

/// Escape text for use in element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// An (element id, event kind) pair wired to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element_id: String,
    pub kind: EventKind,
    pub action: Action,
}

/// Rendered markup plus the bindings its elements register.
///
/// Bindings live exactly as long as the fragment: replacing the fragment in
/// its render target drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    html: String,
    bindings: Vec<Binding>,
}

impl Fragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            bindings: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Register `action` for `kind` events on the element with `element_id`.
    pub fn bind(mut self, element_id: impl Into<String>, kind: EventKind, action: Action) -> Self {
        self.bindings.push(Binding {
            element_id: element_id.into(),
            kind,
            action,
        });
        self
    }

    /// Append another fragment's markup and bindings.
    pub fn append(&mut self, other: Fragment) {
        self.html.push_str(&other.html);
        self.bindings.extend(other.bindings);
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Whether this fragment contains a results container
    pub fn has_results_slot(&self) -> bool {
        self.html.contains(RESULTS_SLOT)
    }

    pub(crate) fn action_for(&self, element_id: &str, kind: EventKind) -> Option<&Action> {
        self.bindings
            .iter()
            .find(|b| b.element_id == element_id && b.kind == kind)
            .map(|b| &b.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_and_quotes() {
        assert_eq!(
            escape(r#"<b>"Mac" & 'Cheese'</b>"#),
            "&lt;b&gt;&quot;Mac&quot; &amp; &#39;Cheese&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_bindings_match_id_and_kind() {
        let fragment = Fragment::new("<button id=\"close\"></button>").bind(
            "close",
            EventKind::Click,
            Action::CloseModal,
        );
        assert_eq!(
            fragment.action_for("close", EventKind::Click),
            Some(&Action::CloseModal)
        );
        assert_eq!(fragment.action_for("close", EventKind::Input), None);
        assert_eq!(fragment.action_for("other", EventKind::Click), None);
    }

    #[test]
    fn test_append_keeps_bindings_in_order() {
        let mut fragment = Fragment::new("<a>").bind("a", EventKind::Click, Action::ViewRecipe(1));
        fragment.append(Fragment::new("<b>").bind("b", EventKind::Click, Action::ViewRecipe(2)));
        assert_eq!(fragment.html(), "<a><b>");
        let ids: Vec<&str> = fragment.bindings().iter().map(|b| b.element_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
