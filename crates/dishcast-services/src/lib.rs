pub mod error;
pub mod images;
pub mod recipes;
pub mod suggestions;

pub use error::ServiceError;
pub use images::{ImageClient, DEFAULT_IMAGE_URL};
pub use recipes::{
    Ingredient, InstructionBlock, InstructionStep, RecipeClient, RecipeDetail,
    RecipeSearchResponse, RecipeSummary,
};
pub use suggestions::{
    mood_prompt, parse_mood_suggestions, parse_suggestion_text, GenerateContentResponse,
    MoodSuggestion, SuggestionClient,
};
