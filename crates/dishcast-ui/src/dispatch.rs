//! Request dispatcher: one UI event, at most one outbound call, one render.
//!
//! Handlers never return errors. A failed call is logged and the affected
//! render target is left showing a placeholder. Responses are not ordered
//! across triggers: whichever arrives last wins a shared target.

use std::sync::{Arc, Weak};

use dishcast_core::{AppError, Config, SearchConfig};
use dishcast_services::{
    ImageClient, RecipeClient, ServiceError, SuggestionClient, DEFAULT_IMAGE_URL,
};
use dishcast_weather::{LocationSource, WeatherError, WeatherProvider};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::debounce::Debouncer;
use crate::events::{Action, Feature, Mood, UiEvent};
use crate::html::Fragment;
use crate::page::{Page, Target};
use crate::render;
use crate::state::AppState;

/// External clients the dispatcher calls.
#[derive(Debug)]
pub struct Services {
    pub recipes: RecipeClient,
    pub images: ImageClient,
    pub suggestions: SuggestionClient,
    pub weather: WeatherProvider,
    pub location: LocationSource,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let timeout = config.http.timeout();
        Ok(Self {
            recipes: RecipeClient::new(&config.spoonacular, config.search.results, timeout)?,
            images: ImageClient::new(&config.unsplash, timeout)?,
            suggestions: SuggestionClient::new(&config.gemini, timeout)?,
            weather: WeatherProvider::new(&config.openweather, timeout)?,
            location: LocationSource::from_config(&config.location, timeout)?,
        })
    }
}

/// Shows the loading indicator until dropped.
struct LoadingGuard {
    page: Arc<Mutex<Page>>,
}

impl LoadingGuard {
    fn show(page: &Arc<Mutex<Page>>) -> Self {
        page.lock().set_loading(true);
        Self { page: page.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.page.lock().set_loading(false);
    }
}

struct Inner {
    services: Services,
    page: Arc<Mutex<Page>>,
    state: Arc<RwLock<AppState>>,
    min_query_len: usize,
    main_search: Debouncer<String>,
    /// Query plus the main generation the input belonged to
    recipe_search: Debouncer<(String, u64)>,
}

/// Entry point for UI events. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    pub fn new(services: Services, search: &SearchConfig) -> Self {
        let delay = search.debounce();
        let min_query_len = search.min_query_len;

        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let main_weak = weak.clone();
            let main_search = Debouncer::new(delay, move |query: String| {
                let weak = main_weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.search_main(&query).await;
                    }
                }
            });

            let results_weak = weak.clone();
            let recipe_search = Debouncer::new(delay, move |(query, generation): (String, u64)| {
                let weak = results_weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.search_recipes_as_typed(&query, generation).await;
                    }
                }
            });

            Inner {
                services,
                page: Arc::new(Mutex::new(Page::new())),
                state: Arc::new(RwLock::new(AppState::default())),
                min_query_len,
                main_search,
                recipe_search,
            }
        });

        Self { inner }
    }

    /// Build the clients from `config` and a dispatcher over them.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let services = Services::from_config(config)?;
        Ok(Self::new(services, &config.search))
    }

    /// Handle one UI event. Debounced events return once scheduled.
    pub async fn handle(&self, event: UiEvent) {
        debug!("Handling {:?}", event);
        let inner = &self.inner;
        match event {
            UiEvent::Startup => inner.startup().await,
            UiEvent::WeatherRecommendations => inner.weather_recommendations().await,
            UiEvent::MainSearchInput(text) => inner.main_search.call(text),
            UiEvent::MainSearchSubmit(text) => inner.search_main(&text).await,
            UiEvent::OpenFeature(feature) => inner.open_feature(feature),
            UiEvent::Element { id, kind, value } => {
                let resolved = inner.page.lock().resolve(&id, kind);
                match resolved {
                    Some((action, generation)) => inner.perform(action, value, generation).await,
                    None => debug!("No binding for {:?} on '{}', ignoring", kind, id),
                }
            }
        }
    }

    /// Run `action` directly, as if a bound element had fired it.
    pub async fn perform(&self, action: Action, value: Option<String>) {
        let generation = self.inner.page.lock().generation();
        self.inner.perform(action, value, generation).await;
    }

    pub fn page(&self) -> Arc<Mutex<Page>> {
        self.inner.page.clone()
    }

    pub fn state(&self) -> Arc<RwLock<AppState>> {
        self.inner.state.clone()
    }

    /// Whether a debounced search is still waiting for its quiet period
    pub fn has_pending_search(&self) -> bool {
        self.inner.main_search.is_pending() || self.inner.recipe_search.is_pending()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("services", &self.inner.services)
            .field("min_query_len", &self.inner.min_query_len)
            .finish_non_exhaustive()
    }
}

fn placeholder_for(err: &ServiceError) -> Fragment {
    render::placeholder(&err.user_message())
}

impl Inner {
    async fn perform(&self, action: Action, value: Option<String>, generation: u64) {
        match action {
            Action::ViewRecipe(id) => self.view_recipe(id).await,
            Action::FindRecipe(name) => self.search_into_results(&name, generation).await,
            Action::SelectMood(mood) => self.mood_suggestions(mood, generation).await,
            Action::SearchIngredients => {
                let list = value.unwrap_or_default();
                let list = list.trim();
                if list.is_empty() {
                    debug!("Empty ingredient list, ignoring");
                    return;
                }
                self.ingredients(list, generation).await;
            }
            Action::SearchRecipes => self
                .recipe_search
                .call((value.unwrap_or_default(), generation)),
            Action::CloseModal => {
                self.page.lock().clear(Target::Modal);
            }
        }
    }

    fn long_enough(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_len
    }

    async fn startup(&self) {
        info!("Resolving location");
        let location = match self.services.location.current().await {
            Ok(location) => location,
            Err(e) => {
                warn!("Location unavailable: {}", e);
                self.show_weather_failure(&WeatherError::from(e));
                return;
            }
        };
        info!("Got location: {}, {}", location.latitude, location.longitude);
        self.state.write().location = Some(location.clone());

        let reading = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.weather.fetch(&location).await
        };

        match reading {
            Ok(reading) => {
                self.state.write().weather = Some(reading);
                let state = self.state.read().clone();
                self.page
                    .lock()
                    .mount(Target::WeatherWidget, render::weather_widget(&state));
                self.weather_recommendations().await;
            }
            Err(e) => {
                error!("Error fetching weather: {}", e);
                self.state.write().weather = None;
                self.show_weather_failure(&e);
            }
        }
    }

    fn show_weather_failure(&self, err: &WeatherError) {
        let state = self.state.read().clone();
        self.page.lock().mount(
            Target::WeatherWidget,
            render::weather_unavailable(&state, err.user_message()),
        );
    }

    async fn weather_recommendations(&self) {
        let state = self.state.read().clone();
        let (Some(category), Some(wrapper)) =
            (state.food_category(), render::weather_recommendations(&state))
        else {
            debug!("No weather reading yet, skipping recommendations");
            return;
        };

        debug!("Loading {:?} recommendations", category);
        let result = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.recipes.search(category.query()).await
        };

        let mut page = self.page.lock();
        match result {
            Ok(response) => {
                page.mount(Target::Main, wrapper);
                let generation = page.generation();
                page.mount_results(generation, render::recipe_cards(&response.results));
            }
            Err(e) => {
                error!("Error loading weather recommendations: {}", e);
                page.mount(Target::Main, placeholder_for(&e));
            }
        }
    }

    async fn search_main(&self, query: &str) {
        let query = query.trim();
        if !self.long_enough(query) {
            debug!("Query '{}' too short, ignoring", query);
            return;
        }

        let result = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.recipes.search(query).await
        };

        let mut page = self.page.lock();
        match result {
            Ok(response) => {
                info!("Found {} recipes for '{}'", response.results.len(), query);
                page.mount(Target::Main, render::search_results());
                let generation = page.generation();
                page.mount_results(generation, render::recipe_cards(&response.results));
            }
            Err(e) => {
                error!("Error searching recipes: {}", e);
                page.mount(Target::Main, placeholder_for(&e));
            }
        }
    }

    fn open_feature(&self, feature: Feature) {
        // The previous feature's input handler goes away with its fragment.
        self.recipe_search.cancel();
        self.page
            .lock()
            .mount(Target::Main, render::feature(feature));
    }

    fn mount_results(&self, generation: u64, fragment: Fragment) {
        if !self.page.lock().mount_results(generation, fragment) {
            debug!("Results container from generation {} is gone", generation);
        }
    }

    /// The feature search box checks and sends the raw text, unlike the
    /// header box which trims first.
    async fn search_recipes_as_typed(&self, query: &str, generation: u64) {
        if !self.long_enough(query) {
            debug!("Query '{}' too short, ignoring", query);
            return;
        }
        self.search_into_results(query, generation).await;
    }

    async fn search_into_results(&self, query: &str, generation: u64) {
        let result = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.recipes.search(query).await
        };

        let fragment = match result {
            Ok(response) => render::recipe_cards(&response.results),
            Err(e) => {
                error!("Error searching recipes: {}", e);
                placeholder_for(&e)
            }
        };
        self.mount_results(generation, fragment);
    }

    async fn ingredients(&self, list: &str, generation: u64) {
        let result = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.recipes.find_by_ingredients(list).await
        };

        let fragment = match result {
            Ok(recipes) => render::recipe_cards(&recipes),
            Err(e) => {
                error!("Error searching by ingredients: {}", e);
                placeholder_for(&e)
            }
        };
        self.mount_results(generation, fragment);
    }

    async fn mood_suggestions(&self, mood: Mood, generation: u64) {
        let result = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.suggestions.mood_suggestions(mood.as_str()).await
        };

        let fragment = match result {
            Ok(response) => render::mood_suggestions(&response),
            Err(e) => {
                error!("Error getting mood suggestions: {}", e);
                placeholder_for(&e)
            }
        };
        self.mount_results(generation, fragment);
    }

    async fn view_recipe(&self, id: u64) {
        let result = {
            let _loading = LoadingGuard::show(&self.page);
            self.services.recipes.recipe(id).await
        };

        let recipe = match result {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("Error loading recipe {}: {}", id, e);
                self.page
                    .lock()
                    .mount(Target::Modal, render::error_modal(&e.user_message()));
                return;
            }
        };

        let image = match recipe.image.clone() {
            Some(image) => image,
            None => {
                let _loading = LoadingGuard::show(&self.page);
                match self.services.images.recipe_image(&recipe.title).await {
                    Ok(url) => url,
                    Err(e) => {
                        warn!("No substitute image for '{}': {}", recipe.title, e);
                        DEFAULT_IMAGE_URL.to_string()
                    }
                }
            }
        };

        self.page
            .lock()
            .mount(Target::Modal, render::recipe_detail(&recipe, &image));
    }
}
