use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{ChatMessage, FoodAnalysis, NutritionalValues, Preferences, Profile},
        ports::FoodAnalysisService,
        value_objects::{ImagePayload, IngredientOverride},
    },
    library::{ports::KeyValueStore, services::PersistenceStore},
    session::entities::{
        NutritionUnit, RequestKind, RequestTicket, ResultView, Screen, SessionState, Tab,
    },
};

/// How many history entries the home tab shows.
pub const RECENT_ON_HOME: usize = 5;

#[derive(Debug, Clone)]
pub enum AnalysisInput {
    Query(String),
    Image(ImagePayload),
}

/// An analysis request taken from the session, ready to be sent.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub ticket: RequestTicket,
    pub input: AnalysisInput,
    pub profile: Profile,
    pub preferences: Preferences,
    /// Base64 image kept for the result screen and the in-session history.
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PendingRecalculation {
    pub ticket: RequestTicket,
    pub prior: FoodAnalysis,
    pub profile: Profile,
    pub preferences: Preferences,
    pub overrides: Option<Vec<IngredientOverride>>,
    /// Set when the user changed preferences; applied only on success.
    pub new_preferences: Option<Preferences>,
}

#[derive(Debug, Clone)]
pub struct PendingChat {
    pub ticket: RequestTicket,
    pub message: String,
    pub context: FoodAnalysis,
    pub profile: Profile,
    pub preferences: Preferences,
    pub prior_turns: Vec<ChatMessage>,
}

/// What happened to a request once its reply was handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied,
    Failed(CoreError),
    /// The user navigated away before the reply arrived.
    Discarded,
    /// Empty input; nothing was sent.
    Ignored,
}

/// Owns the session and drives every screen transition.
///
/// Network-bound operations come in two forms: a one-shot method
/// (`submit_query`, `update_impact`, ...) and a split `begin_*` / `run_*` /
/// `finish_*` form for front-ends that let the user act while a request is
/// in flight. A reply whose ticket is no longer current is dropped.
#[derive(Debug)]
pub struct ViewController<S, K> {
    analysis_service: S,
    store: PersistenceStore<K>,
    session: SessionState,
}

impl<S, K> ViewController<S, K>
where
    S: FoodAnalysisService,
    K: KeyValueStore,
{
    pub fn new(analysis_service: S, store: PersistenceStore<K>) -> Self {
        Self {
            analysis_service,
            store,
            session: SessionState::default(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn store(&self) -> &PersistenceStore<K> {
        &self.store
    }

    pub fn analysis_service(&self) -> &S {
        &self.analysis_service
    }

    pub fn result(&self) -> Option<&ResultView> {
        match self.session.screen {
            Screen::Result => self.session.result.as_ref(),
            _ => None,
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<String> {
        self.session.drain_notifications()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.session.screen != Screen::Main {
            self.show_main();
        }
        self.session.tab = tab;
    }

    pub fn set_profile(&mut self, profile: Profile) {
        info!(profile = profile.as_str(), "Profile changed");
        self.session.profile = profile;
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.session.preferences = preferences;
    }

    pub fn begin_query(&mut self, query: &str) -> Result<Option<PendingAnalysis>, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.begin_analysis(AnalysisInput::Query(query.to_string()), None)
            .map(Some)
    }

    pub fn begin_image(
        &mut self,
        image: ImagePayload,
    ) -> Result<Option<PendingAnalysis>, CoreError> {
        if image.is_empty() {
            return Ok(None);
        }

        let encoded = image.to_base64();
        self.begin_analysis(AnalysisInput::Image(image), Some(encoded))
            .map(Some)
    }

    fn begin_analysis(
        &mut self,
        input: AnalysisInput,
        image: Option<String>,
    ) -> Result<PendingAnalysis, CoreError> {
        if self.session.is_busy() {
            return Err(CoreError::Busy);
        }

        self.session.result = None;
        self.session.navigate(Screen::Analyzing);
        let ticket = self.session.begin_request(RequestKind::Analysis)?;

        Ok(PendingAnalysis {
            ticket,
            input,
            profile: self.session.profile,
            preferences: self.session.preferences.clone(),
            image,
        })
    }

    pub async fn run_analysis(&self, pending: &PendingAnalysis) -> Result<FoodAnalysis, CoreError> {
        match &pending.input {
            AnalysisInput::Query(query) => {
                self.analysis_service
                    .analyze_from_query(
                        query.clone(),
                        pending.profile,
                        pending.preferences.clone(),
                    )
                    .await
            }
            AnalysisInput::Image(image) => {
                self.analysis_service
                    .analyze_from_image(
                        image.clone(),
                        pending.profile,
                        pending.preferences.clone(),
                    )
                    .await
            }
        }
    }

    #[instrument(skip_all, fields(generation = pending.ticket.generation))]
    pub async fn finish_analysis(
        &mut self,
        pending: PendingAnalysis,
        outcome: Result<FoodAnalysis, CoreError>,
    ) -> Completion {
        if !self.session.finish_request(&pending.ticket) {
            debug!("Discarding analysis that arrived after navigation");
            return Completion::Discarded;
        }

        match outcome {
            Ok(analysis) => {
                info!(food_name = %analysis.food_name, "Analysis completed");
                let entry = self
                    .store
                    .append_history(analysis, pending.profile, pending.image)
                    .await;
                let is_favorite = self.store.is_favorite(&entry.analysis.food_name);
                self.show_result(ResultView::new(entry.analysis, entry.image, is_favorite));
                Completion::Applied
            }
            Err(CoreError::EmptyInput) => {
                self.show_main();
                Completion::Ignored
            }
            Err(e) => {
                error!("Analysis failed: {}", e);
                self.session.notify(e.user_message());
                self.show_main();
                Completion::Failed(e)
            }
        }
    }

    pub async fn submit_query(&mut self, query: &str) -> Result<Completion, CoreError> {
        let Some(pending) = self.begin_query(query)? else {
            return Ok(Completion::Ignored);
        };
        let outcome = self.run_analysis(&pending).await;
        Ok(self.finish_analysis(pending, outcome).await)
    }

    pub async fn submit_image(&mut self, image: ImagePayload) -> Result<Completion, CoreError> {
        let Some(pending) = self.begin_image(image)? else {
            return Ok(Completion::Ignored);
        };
        let outcome = self.run_analysis(&pending).await;
        Ok(self.finish_analysis(pending, outcome).await)
    }

    /// Leave the analyzing screen; the reply, if it ever comes, is discarded.
    pub fn cancel_analysis(&mut self) -> bool {
        if self.session.screen != Screen::Analyzing {
            return false;
        }
        info!("Analysis cancelled");
        self.show_main();
        true
    }

    pub fn select_history_item(&mut self, id: Uuid) -> Result<(), CoreError> {
        let entry = self.store.history_entry(id).ok_or(CoreError::NotFound)?;
        let is_favorite = self.store.is_favorite(&entry.analysis.food_name);
        let view = ResultView::new(entry.analysis.clone(), entry.image.clone(), is_favorite);

        self.show_result(view);
        Ok(())
    }

    /// Favorites only keep a truncated preview, so the result opens without an image.
    pub fn select_favorite(&mut self, food_name: &str) -> Result<(), CoreError> {
        let favorite = self
            .store
            .favorites()
            .iter()
            .find(|f| f.name() == food_name)
            .ok_or(CoreError::NotFound)?;
        let view = ResultView::new(favorite.analysis.clone(), None, true);

        self.show_result(view);
        Ok(())
    }

    pub fn back(&mut self) {
        if self.session.screen != Screen::Main {
            self.show_main();
        }
    }

    pub fn edit_ingredient_quantity(
        &mut self,
        index: usize,
        quantity: &str,
    ) -> Result<(), CoreError> {
        self.result_mut()?.edit_quantity(index, quantity)
    }

    pub fn begin_update_impact(&mut self) -> Result<PendingRecalculation, CoreError> {
        let view = self.result_view()?;
        let prior = view.analysis.clone();
        let overrides = view.ingredient_overrides();

        let ticket = self.session.begin_request(RequestKind::Recalculation)?;

        Ok(PendingRecalculation {
            ticket,
            prior,
            profile: self.session.profile,
            preferences: self.session.preferences.clone(),
            overrides: Some(overrides),
            new_preferences: None,
        })
    }

    pub fn begin_recalculate_with_preferences(
        &mut self,
        preferences: Preferences,
    ) -> Result<PendingRecalculation, CoreError> {
        let view = self.result_view()?;
        let prior = view.analysis.clone();
        let overrides = view
            .has_unsaved_changes
            .then(|| view.ingredient_overrides());

        let ticket = self.session.begin_request(RequestKind::Recalculation)?;

        Ok(PendingRecalculation {
            ticket,
            prior,
            profile: self.session.profile,
            preferences: preferences.clone(),
            overrides,
            new_preferences: Some(preferences),
        })
    }

    pub async fn run_recalculation(
        &self,
        pending: &PendingRecalculation,
    ) -> Result<FoodAnalysis, CoreError> {
        self.analysis_service
            .recalculate(
                pending.prior.clone(),
                pending.profile,
                pending.preferences.clone(),
                pending.overrides.clone(),
            )
            .await
    }

    #[instrument(skip_all, fields(generation = pending.ticket.generation))]
    pub fn finish_recalculation(
        &mut self,
        pending: PendingRecalculation,
        outcome: Result<FoodAnalysis, CoreError>,
    ) -> Completion {
        if !self.session.finish_request(&pending.ticket) {
            debug!("Discarding recalculation that arrived after navigation");
            return Completion::Discarded;
        }

        match outcome {
            Ok(analysis) => {
                let is_favorite = self.store.is_favorite(&analysis.food_name);
                if let Some(view) = self.session.result.as_mut() {
                    view.apply_recalculated(analysis);
                    view.is_favorite = is_favorite;
                }
                if let Some(preferences) = pending.new_preferences {
                    self.session.preferences = preferences;
                }
                info!("Recalculation applied");
                Completion::Applied
            }
            Err(e) => {
                error!("Recalculation failed: {}", e);
                self.session.notify(e.user_message());
                Completion::Failed(e)
            }
        }
    }

    /// Regenerate the open analysis with the edited ingredient quantities.
    pub async fn update_impact(&mut self) -> Result<Completion, CoreError> {
        let pending = self.begin_update_impact()?;
        let outcome = self.run_recalculation(&pending).await;
        Ok(self.finish_recalculation(pending, outcome))
    }

    /// Regenerate the open analysis for new preferences, keeping the session's
    /// preferences untouched unless the call succeeds.
    pub async fn recalculate_with_preferences(
        &mut self,
        preferences: Preferences,
    ) -> Result<Completion, CoreError> {
        let pending = self.begin_recalculate_with_preferences(preferences)?;
        let outcome = self.run_recalculation(&pending).await;
        Ok(self.finish_recalculation(pending, outcome))
    }

    pub fn begin_chat(&mut self, message: &str) -> Result<Option<PendingChat>, CoreError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }

        let view = self.result_view()?;
        let context = view.analysis.clone();
        let prior_turns = view.chat.clone();

        let ticket = self.session.begin_request(RequestKind::Chat)?;
        self.result_mut()?.chat.push(ChatMessage::user(message));

        Ok(Some(PendingChat {
            ticket,
            message: message.to_string(),
            context,
            profile: self.session.profile,
            preferences: self.session.preferences.clone(),
            prior_turns,
        }))
    }

    pub async fn run_chat(&self, pending: &PendingChat) -> String {
        self.analysis_service
            .chat(
                pending.message.clone(),
                pending.context.clone(),
                pending.profile,
                pending.preferences.clone(),
                pending.prior_turns.clone(),
            )
            .await
    }

    pub fn finish_chat(&mut self, pending: PendingChat, reply: String) -> Completion {
        if !self.session.finish_request(&pending.ticket) {
            debug!("Discarding chat reply that arrived after navigation");
            return Completion::Discarded;
        }

        match self.session.result.as_mut() {
            Some(view) => {
                view.chat.push(ChatMessage::model(reply));
                Completion::Applied
            }
            None => Completion::Discarded,
        }
    }

    pub async fn send_chat_message(&mut self, message: &str) -> Result<Completion, CoreError> {
        let Some(pending) = self.begin_chat(message)? else {
            return Ok(Completion::Ignored);
        };
        let reply = self.run_chat(&pending).await;
        Ok(self.finish_chat(pending, reply))
    }

    pub async fn toggle_favorite(&mut self) -> Result<bool, CoreError> {
        if self.session.screen != Screen::Result {
            return Err(CoreError::NoActiveAnalysis);
        }
        let Some(view) = self.session.result.as_mut() else {
            return Err(CoreError::NoActiveAnalysis);
        };

        match self
            .store
            .toggle_favorite(&view.analysis, view.image.as_deref())
            .await
        {
            Ok(is_favorite) => {
                view.is_favorite = is_favorite;
                Ok(is_favorite)
            }
            Err(e) => {
                warn!("Favorite toggle rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_nutrition_unit(
        &mut self,
        unit: NutritionUnit,
        custom_grams: Option<&str>,
    ) -> Result<(), CoreError> {
        self.result_mut()?.set_nutrition_unit(unit, custom_grams);
        Ok(())
    }

    pub fn current_nutrition(&self) -> Option<NutritionalValues> {
        self.result()?.current_nutrition()
    }

    pub fn share_text(&self) -> Result<String, CoreError> {
        Ok(self.result_view()?.analysis.share_text())
    }

    pub fn recipe_share_text(&self, index: usize) -> Result<String, CoreError> {
        self.result_view()?
            .analysis
            .recipes
            .get(index)
            .map(|recipe| recipe.share_text())
            .ok_or(CoreError::NotFound)
    }

    fn show_main(&mut self) {
        self.session.result = None;
        self.session.navigate(Screen::Main);
    }

    fn show_result(&mut self, view: ResultView) {
        self.session.result = Some(view);
        self.session.navigate(Screen::Result);
    }

    fn result_view(&self) -> Result<&ResultView, CoreError> {
        self.result().ok_or(CoreError::NoActiveAnalysis)
    }

    fn result_mut(&mut self) -> Result<&mut ResultView, CoreError> {
        if self.session.screen != Screen::Result {
            return Err(CoreError::NoActiveAnalysis);
        }
        self.session
            .result
            .as_mut()
            .ok_or(CoreError::NoActiveAnalysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food_analysis::services::{AnalysisClient, CHAT_APOLOGY};
    use crate::infrastructure::storage::InMemoryKeyValueStore;
    use crate::test_support::{ScriptedLLMClient, sample_analysis_json};

    type TestController = ViewController<AnalysisClient<ScriptedLLMClient>, InMemoryKeyValueStore>;

    async fn controller() -> TestController {
        let mut store = PersistenceStore::new(InMemoryKeyValueStore::new(), 100);
        store.load().await;
        ViewController::new(AnalysisClient::new(ScriptedLLMClient::new()), store)
    }

    fn llm(controller: &TestController) -> &ScriptedLLMClient {
        controller.analysis_service().llm_client()
    }

    async fn open_result(controller: &mut TestController, name: &str) {
        llm(controller).push_ok(sample_analysis_json(name));
        let completion = controller.submit_query(name).await.unwrap();
        assert_eq!(completion, Completion::Applied);
    }

    #[tokio::test]
    async fn test_submit_query_opens_result_and_records_history() {
        let mut controller = controller().await;

        open_result(&mut controller, "Oatmeal").await;

        assert_eq!(controller.session().screen, Screen::Result);
        assert!(!controller.session().is_busy());
        assert_eq!(controller.result().unwrap().analysis.food_name, "Oatmeal");
        assert_eq!(controller.store().history().len(), 1);
        assert!(controller.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_leaves_state_unchanged() {
        let mut controller = controller().await;
        controller.select_tab(Tab::History);
        llm(&controller).push_ok("{\"foodName\": \"Oatmeal\"");

        let completion = controller.submit_query("oatmeal").await.unwrap();

        assert!(matches!(
            completion,
            Completion::Failed(CoreError::ResponseFormat(_))
        ));
        assert_eq!(controller.session().screen, Screen::Main);
        assert_eq!(controller.session().tab, Tab::History);
        assert!(controller.session().result.is_none());
        assert!(!controller.session().is_busy());
        assert!(controller.store().history().is_empty());
        assert_eq!(
            controller.drain_notifications(),
            vec!["Failed to analyze. Please try again.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_query_does_nothing() {
        let mut controller = controller().await;
        let generation = controller.session().generation();

        let completion = controller.submit_query("   ").await.unwrap();

        assert_eq!(completion, Completion::Ignored);
        assert_eq!(llm(&controller).calls(), 0);
        assert_eq!(controller.session().screen, Screen::Main);
        assert_eq!(controller.session().generation(), generation);
    }

    #[tokio::test]
    async fn test_submit_image_keeps_image_for_session() {
        let mut controller = controller().await;
        llm(&controller).push_ok(sample_analysis_json("Salad"));

        let completion = controller
            .submit_image(ImagePayload::jpeg(b"food".to_vec()))
            .await
            .unwrap();

        assert_eq!(completion, Completion::Applied);
        assert_eq!(controller.result().unwrap().image.as_deref(), Some("Zm9vZA=="));
        assert_eq!(controller.store().history()[0].image.as_deref(), Some("Zm9vZA=="));
    }

    #[tokio::test]
    async fn test_reply_after_cancel_is_discarded() {
        let mut controller = controller().await;
        llm(&controller).push_ok(sample_analysis_json("Oatmeal"));

        let pending = controller.begin_query("oatmeal").unwrap().unwrap();
        assert_eq!(controller.session().screen, Screen::Analyzing);
        assert!(controller.cancel_analysis());

        let outcome = controller.run_analysis(&pending).await;
        let completion = controller.finish_analysis(pending, outcome).await;

        assert_eq!(completion, Completion::Discarded);
        assert_eq!(controller.session().screen, Screen::Main);
        assert!(controller.store().history().is_empty());
    }

    #[tokio::test]
    async fn test_stale_reply_does_not_clobber_newer_request() {
        let mut controller = controller().await;
        llm(&controller).push_ok(sample_analysis_json("Stale"));
        llm(&controller).push_ok(sample_analysis_json("Fresh"));

        let stale = controller.begin_query("stale").unwrap().unwrap();
        controller.select_tab(Tab::Home);
        let fresh = controller.begin_query("fresh").unwrap().unwrap();

        let stale_outcome = controller.run_analysis(&stale).await;
        let fresh_outcome = controller.run_analysis(&fresh).await;

        assert_eq!(
            controller.finish_analysis(stale, stale_outcome).await,
            Completion::Discarded
        );
        assert_eq!(controller.session().screen, Screen::Analyzing);
        assert!(controller.session().is_busy());

        assert_eq!(
            controller.finish_analysis(fresh, fresh_outcome).await,
            Completion::Applied
        );
        assert_eq!(controller.result().unwrap().analysis.food_name, "Fresh");
        assert_eq!(controller.store().history().len(), 1);
    }

    #[tokio::test]
    async fn test_second_request_on_result_is_busy() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;

        let _chat = controller.begin_chat("Is it healthy?").unwrap().unwrap();

        assert_eq!(controller.begin_update_impact().unwrap_err(), CoreError::Busy);
        assert_eq!(
            controller.begin_chat("Another?").unwrap_err(),
            CoreError::Busy
        );
    }

    #[tokio::test]
    async fn test_failed_update_keeps_draft_and_flag() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;

        controller.edit_ingredient_quantity(0, "200g").unwrap();
        assert!(controller.result().unwrap().has_unsaved_changes);

        llm(&controller).push_err(CoreError::Transport("offline".into()));
        let completion = controller.update_impact().await.unwrap();

        assert!(matches!(completion, Completion::Failed(CoreError::Transport(_))));
        let view = controller.result().unwrap();
        assert!(view.has_unsaved_changes);
        assert_eq!(view.ingredients[0].quantity.as_deref(), Some("200g"));
        assert_eq!(view.analysis.ingredients[0].quantity.as_deref(), Some("80g"));
        assert_eq!(controller.session().screen, Screen::Result);
        assert_eq!(controller.drain_notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_update_replaces_ingredients() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;
        controller.edit_ingredient_quantity(0, "200g").unwrap();

        let recalculated = sample_analysis_json("Oatmeal").replace("\"80g\"", "\"200g\"");
        llm(&controller).push_ok(recalculated);
        let completion = controller.update_impact().await.unwrap();

        assert_eq!(completion, Completion::Applied);
        let view = controller.result().unwrap();
        assert!(!view.has_unsaved_changes);
        assert_eq!(view.analysis.ingredients[0].quantity.as_deref(), Some("200g"));
        assert_eq!(view.ingredients, view.analysis.ingredients);
        assert!(llm(&controller).prompts()[1].contains(r#"{"name":"Oats","quantity":"200g"}"#));
        // Recalculations do not add history entries.
        assert_eq!(controller.store().history().len(), 1);
    }

    #[tokio::test]
    async fn test_preferences_only_change_on_successful_recalculation() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;
        let nut_free = Preferences::new("nuts", "");

        llm(&controller).push_err(CoreError::Transport("offline".into()));
        controller
            .recalculate_with_preferences(nut_free.clone())
            .await
            .unwrap();
        assert_eq!(controller.session().preferences, Preferences::default());

        llm(&controller).push_ok(sample_analysis_json("Oatmeal"));
        controller
            .recalculate_with_preferences(nut_free.clone())
            .await
            .unwrap();
        assert_eq!(controller.session().preferences, nut_free);
        assert!(llm(&controller).prompts()[2].contains("nuts"));
    }

    #[tokio::test]
    async fn test_chat_appends_both_turns() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;

        llm(&controller).push_ok("Yes, plenty of fiber.");
        controller.send_chat_message("Is it filling?").await.unwrap();
        controller.send_chat_message("Any protein?").await.unwrap();

        let chat = &controller.result().unwrap().chat;
        assert_eq!(
            chat,
            &vec![
                ChatMessage::user("Is it filling?"),
                ChatMessage::model("Yes, plenty of fiber."),
                ChatMessage::user("Any protein?"),
                ChatMessage::model(CHAT_APOLOGY),
            ]
        );
        assert_eq!(llm(&controller).last_chat().len(), 5);
    }

    #[tokio::test]
    async fn test_chat_reply_after_back_is_discarded() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;
        llm(&controller).push_ok("Late reply");

        let pending = controller.begin_chat("Hello").unwrap().unwrap();
        controller.back();
        let reply = controller.run_chat(&pending).await;

        assert_eq!(controller.finish_chat(pending, reply), Completion::Discarded);
        assert!(controller.result().is_none());
    }

    #[tokio::test]
    async fn test_toggle_favorite_and_reopen() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;

        assert!(controller.toggle_favorite().await.unwrap());
        assert!(controller.result().unwrap().is_favorite);

        controller.back();
        assert_eq!(
            controller.toggle_favorite().await.unwrap_err(),
            CoreError::NoActiveAnalysis
        );

        controller.select_favorite("Oatmeal").unwrap();
        assert!(controller.result().unwrap().is_favorite);
        assert!(!controller.toggle_favorite().await.unwrap());
        assert!(controller.store().favorites().is_empty());
    }

    #[tokio::test]
    async fn test_share_texts() {
        let mut controller = controller().await;
        assert_eq!(
            controller.recipe_share_text(0).unwrap_err(),
            CoreError::NoActiveAnalysis
        );
        open_result(&mut controller, "Oatmeal").await;

        assert!(controller.share_text().unwrap().contains("Oatmeal"));
        let recipe = controller.recipe_share_text(0).unwrap();
        assert!(recipe.starts_with("Recipe: Overnight Oats"));
        assert!(recipe.contains("https://www.google.com/search?q=Overnight%20Oats"));
        assert_eq!(
            controller.recipe_share_text(1).unwrap_err(),
            CoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_favorites_full_is_returned_without_notification() {
        let mut store = PersistenceStore::new(InMemoryKeyValueStore::new(), 1);
        store.load().await;
        let mut controller =
            ViewController::new(AnalysisClient::new(ScriptedLLMClient::new()), store);
        open_result(&mut controller, "Oatmeal").await;
        controller.toggle_favorite().await.unwrap();
        open_result(&mut controller, "Soup").await;

        assert_eq!(
            controller.toggle_favorite().await.unwrap_err(),
            CoreError::FavoritesFull { limit: 1 }
        );
        assert!(!controller.result().unwrap().is_favorite);
        assert!(controller.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_open_history_item() {
        let mut controller = controller().await;
        open_result(&mut controller, "Oatmeal").await;
        controller.select_tab(Tab::History);

        let id = controller.store().history()[0].id;
        controller.select_history_item(id).unwrap();

        assert_eq!(controller.session().screen, Screen::Result);
        assert!(!controller.result().unwrap().has_unsaved_changes);
        assert_eq!(
            controller.select_history_item(Uuid::nil()).unwrap_err(),
            CoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_nutrition_unit_switch() {
        let mut controller = controller().await;
        assert!(controller.current_nutrition().is_none());
        open_result(&mut controller, "Oatmeal").await;

        controller
            .set_nutrition_unit(NutritionUnit::Custom, Some("150g"))
            .unwrap();

        assert_eq!(
            controller.current_nutrition(),
            Some(NutritionalValues::new(375.0, 15.0, 45.0, 12.0))
        );
    }
}
