//! Animation request boundary.
//!
//! The simulation never drives sprite playback directly. States request
//! `(clip, facing)` pairs on a [`CharacterAnimation`] component; the render
//! side consumes `Changed<CharacterAnimation>` and plays the resolved clip.
//! Resolution tries the facing-suffixed variant first (`"walk_side"`), then
//! the bare clip name, and otherwise degrades to a no-op. An identical
//! request never restarts the running clip.

use bevy::prelude::*;
use std::collections::HashSet;

use super::Facing;

/// Clip library plus the currently playing clip for one animated entity.
#[derive(Component, Debug, Clone)]
pub struct CharacterAnimation {
    clips: HashSet<String>,
    playing: Option<String>,
    /// Clip keys already warned about, so a missing clip logs once.
    missing: HashSet<String>,
}

impl CharacterAnimation {
    /// Build a library from the clip names the render collaborator provides.
    pub fn new<I, S>(clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clips: clips.into_iter().map(Into::into).collect(),
            playing: None,
            missing: HashSet::new(),
        }
    }

    /// Request the clip for `state` in the given facing.
    ///
    /// Tries `"{state}_{category}"`, falls back to `"{state}"`, else logs a
    /// warning (once per key) and leaves the current clip running. A request
    /// that resolves to the already-playing clip is a no-op.
    pub fn request(&mut self, state: &str, facing: Facing) {
        let suffixed = format!("{state}_{}", facing.category());
        let resolved = if self.clips.contains(&suffixed) {
            suffixed
        } else if self.clips.contains(state) {
            state.to_string()
        } else {
            if self.missing.insert(suffixed.clone()) {
                warn!("no animation clip for request {suffixed:?}");
            }
            return;
        };

        if self.playing.as_deref() != Some(resolved.as_str()) {
            self.playing = Some(resolved);
        }
    }

    /// The clip that should currently be playing, if any.
    #[must_use]
    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }
}
