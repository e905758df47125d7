use crate::foundation::core::{KeyframeId, TRACK_DURATION_SECS, TrackKind, clamp_track_time};
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::registry::set::AnimationSet;
use crate::render::renderer::{Renderer, apply_track_value};
use crate::timeline::geometry::TrackGeometry;
use crate::timeline::keyframe::{Keyframe, KeyframePatch, sorted_by_time};

fn default_duration() -> f64 {
    TRACK_DURATION_SECS
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragState {
    id: KeyframeId,
    start_x_px: f64,
    start_secs: f64,
}

/// Two independent keyframe tracks plus editing state (selection, drag).
///
/// Storage order is insertion order; scheduling sorts a copy by time with a stable sort, so
/// keyframes sharing a time fire in the order they were added.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    #[serde(default = "default_duration")]
    duration_secs: f64,
    #[serde(default)]
    actions: Vec<Keyframe>,
    #[serde(default)]
    emotions: Vec<Keyframe>,
    #[serde(default)]
    next_id: u64,
    #[serde(skip)]
    selected: Option<KeyframeId>,
    #[serde(skip)]
    drag: Option<DragState>,
    #[serde(skip)]
    idle_action: Option<String>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TRACK_DURATION_SECS)
    }
}

impl Timeline {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            actions: Vec::new(),
            emotions: Vec::new(),
            next_id: 0,
            selected: None,
            drag: None,
            idle_action: None,
        }
    }

    /// Override the preferred default for new action keyframes (defaults to `"Idle"`).
    pub fn with_idle_action(mut self, idle_action: impl Into<String>) -> Self {
        self.idle_action = Some(idle_action.into());
        self
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn geometry(&self, width_px: f64) -> TrackGeometry {
        TrackGeometry::new(width_px, self.duration_secs)
    }

    pub fn track(&self, track: TrackKind) -> &[Keyframe] {
        match track {
            TrackKind::Action => &self.actions,
            TrackKind::Emotion => &self.emotions,
        }
    }

    fn track_mut(&mut self, track: TrackKind) -> &mut Vec<Keyframe> {
        match track {
            TrackKind::Action => &mut self.actions,
            TrackKind::Emotion => &mut self.emotions,
        }
    }

    /// Keyframes of `track` ordered for scheduling.
    pub fn sorted(&self, track: TrackKind) -> Vec<Keyframe> {
        sorted_by_time(self.track(track))
    }

    pub fn len(&self) -> usize {
        self.actions.len() + self.emotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.actions
            .iter()
            .chain(self.emotions.iter())
            .find(|k| k.id == id)
    }

    fn locate(&self, id: KeyframeId) -> AvatarResult<(TrackKind, usize)> {
        for track in TrackKind::ALL {
            if let Some(idx) = self.track(track).iter().position(|k| k.id == id) {
                return Ok((track, idx));
            }
        }
        Err(AvatarError::validation(format!("unknown keyframe {id}")))
    }

    pub fn selected(&self) -> Option<&Keyframe> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Add a keyframe with the track's default value at `time` (0 when `None`).
    ///
    /// The new keyframe becomes the selection but is not previewed.
    pub fn add(
        &mut self,
        track: TrackKind,
        time: Option<f64>,
        registry: &AnimationSet,
    ) -> AvatarResult<Keyframe> {
        let idle = self.idle_action.as_deref().unwrap_or("Idle");
        let value = registry
            .default_value(track, idle)
            .ok_or_else(|| {
                AvatarError::validation(format!("no enabled {track} animation to add"))
            })?
            .to_owned();
        self.insert(track, time.unwrap_or(0.0), value)
    }

    /// Add a keyframe with an explicit value, validated against `registry`.
    pub fn add_with_value(
        &mut self,
        track: TrackKind,
        time: f64,
        value: &str,
        registry: &AnimationSet,
    ) -> AvatarResult<Keyframe> {
        registry.ensure_enabled(track, value)?;
        self.insert(track, time, value.to_owned())
    }

    /// Click-to-add: `x_px` is measured from the left edge of a track `width_px` wide.
    pub fn add_at_click(
        &mut self,
        track: TrackKind,
        x_px: f64,
        width_px: f64,
        registry: &AnimationSet,
    ) -> AvatarResult<Keyframe> {
        let time = self.geometry(width_px).time_at(x_px);
        self.add(track, Some(time), registry)
    }

    fn insert(&mut self, track: TrackKind, time: f64, value: String) -> AvatarResult<Keyframe> {
        if !time.is_finite() {
            return Err(AvatarError::validation("keyframe time must be a finite number"));
        }
        self.next_id += 1;
        let keyframe = Keyframe {
            id: KeyframeId(self.next_id),
            time: clamp_track_time(time, self.duration_secs),
            track,
            value,
        };
        tracing::debug!(id = %keyframe.id, %track, time = keyframe.time, value = %keyframe.value, "added keyframe");
        self.track_mut(track).push(keyframe.clone());
        self.selected = Some(keyframe.id);
        Ok(keyframe)
    }

    /// Rewrite time and/or value. When the keyframe is selected, the new value is previewed.
    pub fn update(
        &mut self,
        id: KeyframeId,
        patch: KeyframePatch,
        registry: &AnimationSet,
        renderer: &mut dyn Renderer,
    ) -> AvatarResult<Keyframe> {
        let (track, idx) = self.locate(id)?;
        if let Some(value) = patch.value.as_deref() {
            registry.ensure_enabled(track, value)?;
        }
        if let Some(time) = patch.time
            && !time.is_finite()
        {
            return Err(AvatarError::validation("keyframe time must be a finite number"));
        }

        let duration = self.duration_secs;
        let keyframe = &mut self.track_mut(track)[idx];
        if let Some(time) = patch.time {
            keyframe.time = clamp_track_time(time, duration);
        }
        let value_changed = match patch.value {
            Some(value) => {
                keyframe.value = value;
                true
            }
            None => false,
        };
        let updated = keyframe.clone();

        if value_changed && self.selected == Some(id) {
            apply_track_value(renderer, track, &updated.value)?;
        }
        Ok(updated)
    }

    pub fn delete(&mut self, id: KeyframeId) -> AvatarResult<Keyframe> {
        let (track, idx) = self.locate(id)?;
        let removed = self.track_mut(track).remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        Ok(removed)
    }

    /// Remove every keyframe from both tracks. Without confirmation this is a no-op.
    pub fn clear(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.actions.clear();
        self.emotions.clear();
        self.selected = None;
        self.drag = None;
        tracing::info!("cleared timeline");
        true
    }

    /// Mark `id` active and preview its value on the renderer.
    pub fn select(&mut self, id: KeyframeId, renderer: &mut dyn Renderer) -> AvatarResult<()> {
        let (track, idx) = self.locate(id)?;
        self.selected = Some(id);
        let value = self.track(track)[idx].value.clone();
        apply_track_value(renderer, track, &value)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Start dragging `id` from pointer position `x_px`. Selects the keyframe without preview.
    pub fn begin_drag(&mut self, id: KeyframeId, x_px: f64) -> AvatarResult<()> {
        let (track, idx) = self.locate(id)?;
        let start_secs = self.track(track)[idx].time;
        self.selected = Some(id);
        self.drag = Some(DragState {
            id,
            start_x_px: x_px,
            start_secs,
        });
        Ok(())
    }

    /// Move the dragged keyframe to follow the pointer. Returns the new time, if dragging.
    pub fn drag_to(&mut self, x_px: f64, width_px: f64) -> Option<f64> {
        let drag = self.drag?;
        let geometry = self.geometry(width_px);
        let time = geometry.dragged_time(drag.start_secs, x_px - drag.start_x_px);
        let (track, idx) = self.locate(drag.id).ok()?;
        self.track_mut(track)[idx].time = time;
        Some(time)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Check every keyframe against `registry` (e.g. after import or a model switch).
    pub fn revalidate(&self, registry: &AnimationSet) -> AvatarResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for track in TrackKind::ALL {
            for keyframe in self.track(track) {
                if !seen.insert(keyframe.id) {
                    return Err(AvatarError::validation(format!(
                        "duplicate keyframe id {}",
                        keyframe.id
                    )));
                }
                if keyframe.track != track {
                    return Err(AvatarError::validation(format!(
                        "keyframe {} is stored on the {track} track but tagged {}",
                        keyframe.id, keyframe.track
                    )));
                }
                if !keyframe.time.is_finite()
                    || keyframe.time < 0.0
                    || keyframe.time > self.duration_secs
                {
                    return Err(AvatarError::validation(format!(
                        "keyframe {} time {} is outside [0, {}]",
                        keyframe.id, keyframe.time, self.duration_secs
                    )));
                }
                registry.ensure_enabled(track, &keyframe.value)?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> AvatarResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an exported timeline and validate it against `registry`.
    pub fn from_json(json: &str, registry: &AnimationSet) -> AvatarResult<Self> {
        let mut timeline: Self = serde_json::from_str(json)?;
        timeline.revalidate(registry)?;
        let max_id = timeline
            .actions
            .iter()
            .chain(timeline.emotions.iter())
            .map(|k| k.id.0)
            .max()
            .unwrap_or(0);
        timeline.next_id = timeline.next_id.max(max_id);
        Ok(timeline)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
