//! UI events entering the dispatcher and the typed actions bound to rendered elements.

use std::fmt;
use std::str::FromStr;

/// Feature cards on the landing page (`data-feature` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Ingredients,
    RecipeSearch,
    MoodFood,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Ingredients, Feature::RecipeSearch, Feature::MoodFood];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::RecipeSearch => "recipe-search",
            Self::MoodFood => "mood-food",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Ingredients => "Search by Ingredients",
            Self::RecipeSearch => "Search Recipes",
            Self::MoodFood => "Food for Your Mood",
        }
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown feature '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Stressed,
    Energetic,
    Relaxed,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Stressed,
        Mood::Energetic,
        Mood::Relaxed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Stressed => "stressed",
            Self::Energetic => "energetic",
            Self::Relaxed => "relaxed",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "😊 Happy",
            Self::Sad => "😢 Sad",
            Self::Stressed => "😰 Stressed",
            Self::Energetic => "⚡ Energetic",
            Self::Relaxed => "😌 Relaxed",
        }
    }

    /// Element id of the mood's selector button
    pub fn element_id(&self) -> String {
        format!("mood-{}", self.as_str())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown mood '{}'", s))
    }
}

/// DOM-style event kinds a binding can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
}

/// What a bound element does when its event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ViewRecipe(u64),
    FindRecipe(String),
    SelectMood(Mood),
    /// Search with the ingredient list carried by the event value
    SearchIngredients,
    /// Debounced search with the text carried by the event value
    SearchRecipes,
    CloseModal,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Page loaded: resolve location, show weather, load recommendations
    Startup,
    /// Reload recipes for the last weather reading
    WeatherRecommendations,
    /// Typing in the header search box (debounced)
    MainSearchInput(String),
    /// Enter key or search button in the header
    MainSearchSubmit(String),
    /// Click on a landing-page feature card
    OpenFeature(Feature),
    /// An event on an element produced by a rendered fragment
    Element {
        id: String,
        kind: EventKind,
        /// Current value of the associated input, when there is one
        value: Option<String>,
    },
}

impl UiEvent {
    pub fn click(id: impl Into<String>) -> Self {
        Self::Element {
            id: id.into(),
            kind: EventKind::Click,
            value: None,
        }
    }

    pub fn click_with(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Element {
            id: id.into(),
            kind: EventKind::Click,
            value: Some(value.into()),
        }
    }

    pub fn input(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Element {
            id: id.into(),
            kind: EventKind::Input,
            value: Some(value.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_round_trips_data_attribute() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), feature);
        }
        assert!("settings".parse::<Feature>().is_err());
    }

    #[test]
    fn test_mood_parse_is_case_insensitive() {
        assert_eq!("Stressed".parse::<Mood>().unwrap(), Mood::Stressed);
        assert_eq!(" relaxed ".parse::<Mood>().unwrap(), Mood::Relaxed);
        assert!("hangry".parse::<Mood>().is_err());
    }

    #[test]
    fn test_mood_element_ids_are_distinct() {
        let ids: std::collections::HashSet<String> =
            Mood::ALL.iter().map(Mood::element_id).collect();
        assert_eq!(ids.len(), Mood::ALL.len());
    }
}
