//! Composition root for the explorer client.
//!
//! Owns the dataset and every engine, wired together by plain dependency
//! injection. The currently selected monastery lives in a single slot;
//! the most recent selection wins.

use monastery_core::{District, Language, Monastery, Sect};

use crate::audio::{AudioGuidePlayer, EngineEvent, PlayerError, SpeechEngine};
use crate::chatbot::{ChatReply, Chatbot};
use crate::filter::{FilterQuery, filter};
use crate::map::{MapPresenter, MapSurface};
use crate::settings::KeyValueStore;

pub struct Explorer<S, E, K>
where
    S: MapSurface,
    E: SpeechEngine,
    K: KeyValueStore,
{
    records: Vec<Monastery>,
    query: FilterQuery,
    filtered_ids: Vec<u32>,
    presenter: MapPresenter,
    surface: S,
    chatbot: Chatbot,
    player: AudioGuidePlayer<E, K>,
    selected: Option<u32>,
}

impl<S, E, K> Explorer<S, E, K>
where
    S: MapSurface,
    E: SpeechEngine,
    K: KeyValueStore,
{
    /// Wire the components together and render the initial, unfiltered
    /// scene.
    pub fn new(records: Vec<Monastery>, surface: S, engine: E, storage: K) -> Self {
        let player = AudioGuidePlayer::new(engine, storage);
        let language = player.settings().language;
        let mut explorer = Self {
            records,
            query: FilterQuery::new(),
            filtered_ids: Vec::new(),
            presenter: MapPresenter::new(),
            surface,
            chatbot: Chatbot::new(language),
            player,
            selected: None,
        };
        explorer.apply_filters();
        explorer
    }

    pub fn records(&self) -> &[Monastery] {
        &self.records
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    /// Records passing the current filter, in dataset order.
    pub fn filtered(&self) -> Vec<&Monastery> {
        self.filtered_ids
            .iter()
            .filter_map(|id| self.records.iter().find(|m| m.id == *id))
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_ids.len()
    }

    pub fn marker_count(&self) -> usize {
        self.presenter.marker_count()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn player(&self) -> &AudioGuidePlayer<E, K> {
        &self.player
    }

    pub fn chatbot_mut(&mut self) -> &mut Chatbot {
        &mut self.chatbot
    }

    // -- filtering ----------------------------------------------------------

    pub fn set_search_text(&mut self, text: Option<String>) {
        self.query.search_text = text;
        self.apply_filters();
    }

    pub fn set_sect(&mut self, sect: Option<Sect>) {
        self.query.sect = sect;
        self.apply_filters();
    }

    pub fn set_district(&mut self, district: Option<District>) {
        self.query.district = district;
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        let matched = filter(&self.records, &self.query);
        self.filtered_ids = matched.iter().map(|m| m.id).collect();
        self.presenter.rebuild(&matched, &mut self.surface);
    }

    // -- selection ----------------------------------------------------------

    /// Select a monastery by id, focusing the map on it. Unknown ids leave
    /// the previous selection in place.
    pub fn select(&mut self, id: u32) -> bool {
        match self.records.iter().find(|m| m.id == id) {
            Some(monastery) => {
                self.selected = Some(id);
                self.presenter.select(monastery, &mut self.surface);
                true
            }
            None => {
                tracing::warn!(id, "selection ignored, no such monastery");
                false
            }
        }
    }

    pub fn selected(&self) -> Option<&Monastery> {
        let id = self.selected?;
        self.records.iter().find(|m| m.id == id)
    }

    // -- chat ---------------------------------------------------------------

    pub fn ask(&self, query: &str) -> ChatReply<'_> {
        self.chatbot.respond(query, &self.records)
    }

    pub fn greeting(&mut self) -> &'static str {
        self.chatbot.greeting()
    }

    // -- audio --------------------------------------------------------------

    /// Narrate the selected monastery in the persisted language.
    pub fn play_selected(&mut self) -> Result<(), PlayerError> {
        let id = self.selected.ok_or(PlayerError::NothingSelected)?;
        let monastery = self
            .records
            .iter()
            .find(|m| m.id == id)
            .ok_or(PlayerError::NothingSelected)?;
        let language = self.player.settings().language;
        self.player.play(monastery, language)
    }

    pub fn pause_audio(&mut self) {
        self.player.pause();
    }

    pub fn resume_audio(&mut self) {
        self.player.resume();
    }

    pub fn stop_audio(&mut self) {
        self.player.stop();
    }

    pub fn toggle_speed(&mut self) -> f32 {
        self.player.toggle_speed()
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.player.toggle_mute()
    }

    /// Change the narration language everywhere: chatbot greeting pool and
    /// audio, restarting a live narration in the new language.
    pub fn set_language(&mut self, language: Language) -> Result<(), PlayerError> {
        self.chatbot.set_language(language);
        if let Some(id) = self.selected {
            if let Some(monastery) = self.records.iter().find(|m| m.id == id) {
                return self.player.change_language(monastery, language);
            }
        }
        // No selection: just persist the preference.
        self.player.set_preferred_language(language);
        Ok(())
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        self.player.handle_event(event);
    }
}
