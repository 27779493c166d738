//! Response shapes → HTML fragments.
//!
//! Every function here is pure: it takes records (or the [`AppState`]) and
//! returns a [`Fragment`] carrying the bindings for the elements it produced.

use dishcast_services::{
    parse_mood_suggestions, GenerateContentResponse, MoodSuggestion, RecipeDetail, RecipeSummary,
    DEFAULT_IMAGE_URL,
};

use crate::events::{Action, EventKind, Feature, Mood};
use crate::html::{escape, Fragment, RESULTS_SLOT};
use crate::state::AppState;

pub const INGREDIENTS_INPUT: &str = "ingredients-input";
pub const INGREDIENTS_BUTTON: &str = "ingredients-search-btn";
pub const RECIPE_SEARCH_INPUT: &str = "recipe-search-input";
pub const MODAL: &str = "recipe-modal";
pub const CLOSE_MODAL: &str = "close-modal";

pub const MOOD_FALLBACK: &str = "Unable to load mood-based suggestions. Please try again.";
pub const NO_RECIPES: &str = "No recipes found.";

pub fn view_recipe_id(recipe_id: u64) -> String {
    format!("view-recipe-{}", recipe_id)
}

pub fn find_recipe_id(index: usize) -> String {
    format!("find-recipe-{}", index)
}

fn results_container() -> String {
    format!(
        "<div class=\"results-container\" id=\"results\">{}</div>",
        RESULTS_SLOT
    )
}

/// Temperature and place, or placeholders before the first reading.
pub fn weather_widget(state: &AppState) -> Fragment {
    let (temperature, location) = match &state.weather {
        Some(reading) => (
            format!("{}°C", reading.rounded_temperature()),
            escape(&reading.location_name),
        ),
        None => ("--°C".to_string(), "Location unavailable".to_string()),
    };

    widget(&temperature, &location, None)
}

/// Widget after a failed lookup. Shows the known place, if any, and why
/// there is no temperature.
pub fn weather_unavailable(state: &AppState, message: &str) -> Fragment {
    let location = state.place_name().unwrap_or(message);
    widget("--°C", &escape(location), Some(&escape(message)))
}

fn widget(temperature: &str, location: &str, status: Option<&str>) -> Fragment {
    let status = status
        .map(|s| format!("<span class=\"weather-status\">{}</span>", s))
        .unwrap_or_default();
    Fragment::new(format!(
        "<div class=\"weather-widget\">\
         <span id=\"temperature\">{}</span>\
         <span id=\"location\">{}</span>{}\
         </div>",
        temperature, location, status
    ))
}

/// Main-area wrapper for header search results.
pub fn search_results() -> Fragment {
    Fragment::new(format!(
        "<div class=\"search-results\"><h2>Search Results</h2>{}</div>",
        results_container()
    ))
}

/// Main-area wrapper for weather-based recommendations; `None` without a reading.
pub fn weather_recommendations(state: &AppState) -> Option<Fragment> {
    let reading = state.weather.as_ref()?;
    Some(Fragment::new(format!(
        "<div class=\"weather-recommendations\">\
         <h2>Weather-Based Recommendations</h2>\
         <p>Based on the current temperature of {}°C</p>\
         <h3>{}</h3>{}</div>",
        reading.rounded_temperature(),
        reading.food_category().description(),
        results_container()
    )))
}

/// Template for a feature card, with its input bindings.
pub fn feature(feature: Feature) -> Fragment {
    match feature {
        Feature::Ingredients => Fragment::new(format!(
            "<div class=\"ingredients-search glass-effect\">\
             <h2>{}</h2>\
             <div class=\"ingredients-input\">\
             <input type=\"text\" id=\"{}\" placeholder=\"Enter ingredients (comma separated)\">\
             <button class=\"search-btn\" id=\"{}\"><i class=\"fas fa-search\"></i></button>\
             </div>{}</div>",
            feature.title(),
            INGREDIENTS_INPUT,
            INGREDIENTS_BUTTON,
            results_container()
        ))
        .bind(INGREDIENTS_BUTTON, EventKind::Click, Action::SearchIngredients),

        Feature::RecipeSearch => Fragment::new(format!(
            "<div class=\"recipe-search glass-effect\">\
             <h2>{}</h2>\
             <div class=\"search-input\">\
             <input type=\"text\" id=\"{}\" placeholder=\"Enter recipe name\">\
             <button class=\"search-btn\"><i class=\"fas fa-search\"></i></button>\
             </div>{}</div>",
            feature.title(),
            RECIPE_SEARCH_INPUT,
            results_container()
        ))
        .bind(RECIPE_SEARCH_INPUT, EventKind::Input, Action::SearchRecipes),

        Feature::MoodFood => {
            let buttons: String = Mood::ALL
                .iter()
                .map(|mood| {
                    format!(
                        "<button id=\"{}\" data-mood=\"{}\">{}</button>",
                        mood.element_id(),
                        mood.as_str(),
                        mood.label()
                    )
                })
                .collect();

            Mood::ALL.iter().fold(
                Fragment::new(format!(
                    "<div class=\"mood-food glass-effect\">\
                     <h2>{}</h2>\
                     <div class=\"mood-selector\">{}</div>{}</div>",
                    feature.title(),
                    buttons,
                    results_container()
                )),
                |fragment, mood| {
                    fragment.bind(mood.element_id(), EventKind::Click, Action::SelectMood(*mood))
                },
            )
        }
    }
}

/// One card per recipe, in input order.
pub fn recipe_cards(recipes: &[RecipeSummary]) -> Fragment {
    if recipes.is_empty() {
        return placeholder(NO_RECIPES);
    }

    let mut fragment = Fragment::empty();
    for recipe in recipes {
        let title = escape(&recipe.title);
        let image = escape(recipe.image.as_deref().unwrap_or(DEFAULT_IMAGE_URL));
        let button_id = view_recipe_id(recipe.id);
        fragment.append(
            Fragment::new(format!(
                "<div class=\"recipe-card glass-effect\">\
                 <img src=\"{}\" alt=\"{}\">\
                 <h3>{}</h3>\
                 <button class=\"view-recipe\" id=\"{}\" data-id=\"{}\">View Recipe</button>\
                 </div>",
                image, title, title, button_id, recipe.id
            ))
            .bind(button_id, EventKind::Click, Action::ViewRecipe(recipe.id)),
        );
    }
    fragment
}

/// Suggestion cards from a Gemini response, or the fallback message when
/// the payload cannot be read.
pub fn mood_suggestions(response: &GenerateContentResponse) -> Fragment {
    match parse_mood_suggestions(response) {
        Ok(suggestions) => suggestion_cards(&suggestions),
        Err(e) => {
            tracing::warn!("Error parsing mood suggestions: {}", e);
            placeholder(MOOD_FALLBACK)
        }
    }
}

fn suggestion_cards(suggestions: &[MoodSuggestion]) -> Fragment {
    let mut fragment = Fragment::empty();
    for (index, suggestion) in suggestions.iter().enumerate() {
        let name = escape(&suggestion.name);
        let button_id = find_recipe_id(index);
        fragment.append(
            Fragment::new(format!(
                "<div class=\"recipe-card glass-effect\">\
                 <h3>{}</h3>\
                 <p>{}</p>\
                 <button class=\"search-recipe\" id=\"{}\" data-name=\"{}\">Find Recipe</button>\
                 </div>",
                name,
                escape(&suggestion.description),
                button_id,
                name
            ))
            .bind(
                button_id,
                EventKind::Click,
                Action::FindRecipe(suggestion.name.clone()),
            ),
        );
    }
    fragment
}

/// Detail modal. `image` is the recipe image or a looked-up substitute.
pub fn recipe_detail(recipe: &RecipeDetail, image: &str) -> Fragment {
    let title = escape(&recipe.title);

    let ready = recipe
        .ready_in_minutes
        .map(|m| m.to_string())
        .unwrap_or_else(|| "?".to_string());
    let servings = recipe
        .servings
        .map(|s| s.to_string())
        .unwrap_or_else(|| "?".to_string());

    let ingredients: String = recipe
        .extended_ingredients
        .iter()
        .map(|ing| format!("<li>{}</li>", escape(&ing.original)))
        .collect();

    let steps = recipe.steps();
    let instructions = if steps.is_empty() {
        "No instructions available".to_string()
    } else {
        steps
            .iter()
            .map(|step| format!("<li>{}</li>", escape(&step.step)))
            .collect()
    };

    Fragment::new(format!(
        "<div class=\"recipe-modal glass-effect\" id=\"{}\">\
         <div class=\"modal-content\">\
         <span class=\"close-modal\" id=\"{}\">&times;</span>\
         <h2>{}</h2>\
         <img src=\"{}\" alt=\"{}\">\
         <div class=\"recipe-info\">\
         <p><i class=\"fas fa-clock\"></i> Ready in {} minutes</p>\
         <p><i class=\"fas fa-users\"></i> Serves {}</p>\
         </div>\
         <div class=\"ingredients-section\"><h3>Ingredients</h3><ul>{}</ul></div>\
         <div class=\"instructions-section\"><h3>Instructions</h3><ol>{}</ol></div>\
         </div></div>",
        MODAL,
        CLOSE_MODAL,
        title,
        escape(image),
        title,
        ready,
        servings,
        ingredients,
        instructions
    ))
    .bind(CLOSE_MODAL, EventKind::Click, Action::CloseModal)
    .bind(MODAL, EventKind::Click, Action::CloseModal)
}

/// Modal shown when a recipe could not be loaded.
pub fn error_modal(message: &str) -> Fragment {
    Fragment::new(format!(
        "<div class=\"recipe-modal glass-effect\" id=\"{}\">\
         <div class=\"modal-content\">\
         <span class=\"close-modal\" id=\"{}\">&times;</span>\
         <p class=\"placeholder\">{}</p>\
         </div></div>",
        MODAL,
        CLOSE_MODAL,
        escape(message)
    ))
    .bind(CLOSE_MODAL, EventKind::Click, Action::CloseModal)
    .bind(MODAL, EventKind::Click, Action::CloseModal)
}

/// Single-message state for a region.
pub fn placeholder(message: &str) -> Fragment {
    Fragment::new(format!("<p class=\"placeholder\">{}</p>", escape(message)))
}
