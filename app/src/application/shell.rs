use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use foodlenz_core::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::Preferences, ports::FoodAnalysisService, value_objects::ImagePayload,
    },
    library::ports::KeyValueStore,
    session::{
        entities::{Screen, Tab},
        services::{PendingAnalysis, PendingChat, PendingRecalculation, RECENT_ON_HOME, ViewController},
    },
};
use tokio::io::{AsyncBufRead, Lines};
use tracing::{debug, info, warn};

use super::{
    command::{Command, HELP},
    render,
};

/// Line-oriented front-end over a [`ViewController`].
pub struct Shell<S, K, R> {
    controller: ViewController<S, K>,
    lines: Lines<R>,
}

/// Await `request` while watching input for a cancel command.
///
/// Returns `None` when the user cancelled. End of input keeps waiting.
async fn wait_or_cancel<R, F, T>(lines: &mut Lines<R>, request: F) -> Option<T>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = T>,
{
    tokio::pin!(request);

    loop {
        tokio::select! {
            biased;

            output = &mut request => return Some(output),
            line = lines.next_line() => match line {
                Ok(Some(line)) if Command::is_cancel(&line) => return None,
                Ok(Some(_)) => println!("Still working. Type 'cancel' to stop waiting."),
                Ok(None) | Err(_) => return Some(request.await),
            },
        }
    }
}

impl<S, K, R> Shell<S, K, R>
where
    S: FoodAnalysisService,
    K: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    pub fn new(controller: ViewController<S, K>, lines: Lines<R>) -> Self {
        Self { controller, lines }
    }

    pub fn controller(&self) -> &ViewController<S, K> {
        &self.controller
    }

    pub async fn run(&mut self) -> Result<(), anyhow::Error> {
        println!("{}", self.render());

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = self.lines.next_line().await? else {
                break;
            };

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Empty) => continue,
                Ok(command) => {
                    let output = self.execute(command).await;
                    println!("{}", output);
                }
                Err(message) => println!("{}", message),
            }

            for notification in self.controller.drain_notifications() {
                println!("! {}", notification);
            }
        }

        info!("Session ended");
        Ok(())
    }

    /// Run one command and return the text to show for it.
    async fn execute(&mut self, command: Command) -> String {
        let outcome = match command {
            Command::Search(query) => self.search(&query).await,
            Command::Upload(path) => self.upload(path).await,
            Command::Tab(tab) => {
                self.controller.select_tab(tab);
                Ok(())
            }
            Command::Open(position) => self.open(position),
            Command::Favorite => self.controller.toggle_favorite().await.map(|_| ()),
            Command::Back | Command::Cancel => {
                self.controller.back();
                Ok(())
            }
            Command::Profile(profile) => {
                self.controller.set_profile(profile);
                Ok(())
            }
            Command::Allergies(allergies) => {
                let preferences = Preferences {
                    allergies,
                    ..self.controller.session().preferences.clone()
                };
                self.change_preferences(preferences).await
            }
            Command::Goals(custom_goals) => {
                let preferences = Preferences {
                    custom_goals,
                    ..self.controller.session().preferences.clone()
                };
                self.change_preferences(preferences).await
            }
            Command::Quantity { index, quantity } => {
                self.controller.edit_ingredient_quantity(index, &quantity)
            }
            Command::Update => self.update_impact().await,
            Command::Unit { unit, grams } => {
                self.controller.set_nutrition_unit(unit, grams.as_deref())
            }
            Command::Chat(message) => self.chat(&message).await,
            Command::Share(recipe) => {
                let text = match recipe {
                    Some(index) => self.controller.recipe_share_text(index),
                    None => self.controller.share_text(),
                };
                return text.unwrap_or_else(|e| e.user_message());
            }
            Command::Help => return HELP.to_string(),
            Command::Quit | Command::Empty => return String::new(),
        };

        match outcome {
            Ok(()) => self.render(),
            Err(e) => {
                debug!("Command failed: {}", e);
                e.user_message()
            }
        }
    }

    async fn search(&mut self, query: &str) -> Result<(), CoreError> {
        match self.controller.begin_query(query)? {
            Some(pending) => self.await_analysis(pending).await,
            None => Ok(()),
        }
    }

    async fn upload(&mut self, path: PathBuf) -> Result<(), CoreError> {
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                println!("Could not read {}: {}", path.display(), e);
                return Ok(());
            }
        };
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        match self
            .controller
            .begin_image(ImagePayload::with_file_name(data, file_name))?
        {
            Some(pending) => self.await_analysis(pending).await,
            None => {
                println!("{} is empty.", path.display());
                Ok(())
            }
        }
    }

    async fn await_analysis(&mut self, pending: PendingAnalysis) -> Result<(), CoreError> {
        println!("Analyzing... (type 'cancel' to stop)");

        match wait_or_cancel(&mut self.lines, self.controller.run_analysis(&pending)).await {
            Some(outcome) => {
                self.controller.finish_analysis(pending, outcome).await;
            }
            None => {
                self.controller.cancel_analysis();
                println!("Cancelled.");
            }
        }
        Ok(())
    }

    fn open(&mut self, position: usize) -> Result<(), CoreError> {
        let session = self.controller.session();
        if session.screen != Screen::Main {
            return Err(CoreError::NotFound);
        }

        let store = self.controller.store();
        match session.tab {
            Tab::Home => {
                let id = store
                    .recent(RECENT_ON_HOME)
                    .get(position)
                    .map(|entry| entry.id)
                    .ok_or(CoreError::NotFound)?;
                self.controller.select_history_item(id)
            }
            Tab::History => {
                let id = store
                    .history()
                    .get(position)
                    .map(|entry| entry.id)
                    .ok_or(CoreError::NotFound)?;
                self.controller.select_history_item(id)
            }
            Tab::Favorites => {
                let name = store
                    .favorites()
                    .get(position)
                    .map(|favorite| favorite.name().to_string())
                    .ok_or(CoreError::NotFound)?;
                self.controller.select_favorite(&name)
            }
            Tab::Profile => Err(CoreError::NotFound),
        }
    }

    async fn change_preferences(&mut self, preferences: Preferences) -> Result<(), CoreError> {
        if self.controller.result().is_none() {
            self.controller.set_preferences(preferences);
            return Ok(());
        }

        let pending = self
            .controller
            .begin_recalculate_with_preferences(preferences)?;
        self.await_recalculation(pending).await
    }

    async fn update_impact(&mut self) -> Result<(), CoreError> {
        let pending = self.controller.begin_update_impact()?;
        self.await_recalculation(pending).await
    }

    async fn await_recalculation(&mut self, pending: PendingRecalculation) -> Result<(), CoreError> {
        println!("Recalculating... (type 'cancel' to stop)");

        match wait_or_cancel(&mut self.lines, self.controller.run_recalculation(&pending)).await {
            Some(outcome) => {
                self.controller.finish_recalculation(pending, outcome);
            }
            None => {
                self.controller.back();
                println!("Stopped waiting.");
            }
        }
        Ok(())
    }

    async fn chat(&mut self, message: &str) -> Result<(), CoreError> {
        let Some(pending) = self.controller.begin_chat(message)? else {
            return Ok(());
        };
        self.await_chat(pending).await
    }

    async fn await_chat(&mut self, pending: PendingChat) -> Result<(), CoreError> {
        match wait_or_cancel(&mut self.lines, self.controller.run_chat(&pending)).await {
            Some(reply) => {
                self.controller.finish_chat(pending, reply);
            }
            None => {
                self.controller.back();
                println!("Stopped waiting.");
            }
        }
        Ok(())
    }

    fn render(&self) -> String {
        let session = self.controller.session();
        let store = self.controller.store();

        match session.screen {
            Screen::Analyzing => "Analyzing...".to_string(),
            Screen::Result => self
                .controller
                .result()
                .map(|view| render::result(view, self.controller.current_nutrition()))
                .unwrap_or_default(),
            Screen::Main => match session.tab {
                Tab::Home => render::home(session.profile, store.recent(RECENT_ON_HOME)),
                Tab::History => render::history(store.history()),
                Tab::Favorites => render::favorites(store.favorites(), store.max_favorites()),
                Tab::Profile => render::profile(session.profile, &session.preferences),
            },
        }
    }
}
