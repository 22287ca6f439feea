// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cooperative step scheduler that drives a whole layout run.
//!
//! ## Usage
//!
//! 1) Create a [`CloudLayout`] with a [`Config`], a [`RenderingSurface`] and a
//!    seedable random source.
//! 2) Call [`CloudLayout::start`] with the words to lay out.
//! 3) Call [`CloudLayout::step`] whenever the host has time (for example once
//!    per animation frame) until it returns [`Step::Done`]. After each step,
//!    drain [`CloudEvent`]s with [`CloudLayout::drain_events`].
//! 4) Read the placed glyphs from [`CloudLayout::layout`].
//!
//! Each step does a bounded amount of work: one stage transition, or the
//! placement of a single glyph. Cancellation requested through
//! [`CloudLayout::cancel`] or a [`CancelToken`] is honored at the next step.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::{Drain, Vec};
use core::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tracing::{debug, warn};

use crate::collision::Strategy;
use crate::color::ColorBias;
use crate::config::Config;
use crate::glyph::{Glyph, build_glyphs};
use crate::placer::{Guard, Placer};
use crate::progress::Progress;
use crate::surface::{GlyphId, RenderingSurface};
use crate::word::{Word, filter_words, highest_weight};

/// Top-level stages of a layout run, in execution order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reset the surface, draw the colour bias and announce the run.
    #[default]
    Start,
    /// Filter the input words.
    ProcessWords,
    /// Build unplaced glyphs.
    MakeTexts,
    /// Place one glyph per step.
    PlaceWords,
    /// Redraw the composed surface.
    Render,
    /// Release scratch buffers.
    Finish,
    /// Announce completion. Terminal.
    Stop,
}

impl Stage {
    /// The stage that follows this one. [`Stop`](Self::Stop) is terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::Start => Self::ProcessWords,
            Self::ProcessWords => Self::MakeTexts,
            Self::MakeTexts => Self::PlaceWords,
            Self::PlaceWords => Self::Render,
            Self::Render => Self::Finish,
            Self::Finish | Self::Stop => Self::Stop,
        }
    }

    /// Index into [`STAGE_WEIGHTS`](crate::STAGE_WEIGHTS), or `None` for
    /// [`Stop`](Self::Stop).
    pub const fn weight_index(self) -> Option<usize> {
        match self {
            Self::Start => Some(0),
            Self::ProcessWords => Some(1),
            Self::MakeTexts => Some(2),
            Self::PlaceWords => Some(3),
            Self::Render => Some(4),
            Self::Finish => Some(5),
            Self::Stop => None,
        }
    }
}

/// The scheduler's position: current stage plus the next word to place.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CloudState {
    stage: Stage,
    word_index: usize,
    done: bool,
}

impl CloudState {
    /// A state that has nothing left to do.
    const fn idle() -> Self {
        Self {
            stage: Stage::Stop,
            word_index: 0,
            done: true,
        }
    }

    /// Current stage.
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Index of the next word to place during [`Stage::PlaceWords`].
    pub const fn word_index(&self) -> usize {
        self.word_index
    }

    /// Whether the run has finished, been cancelled, or was never started.
    pub const fn is_done(&self) -> bool {
        self.done
    }

    fn next_stage(&mut self) {
        self.stage = self.stage.next();
        self.word_index = 0;
    }

    fn next_word(&mut self) {
        self.word_index += 1;
    }
}

/// Result of one cooperative step.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// More work remains; call [`CloudLayout::step`] again.
    Pending,
    /// The run is complete (or cancelled).
    Done,
}

/// A glyph that could not be placed cleanly.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementWarning {
    /// Index of the glyph in placement order.
    pub index: usize,
    /// Text of the glyph.
    pub text: String,
    /// Spiral advances taken.
    pub advances: u32,
    /// The guard that tripped.
    pub guard: Guard,
    /// Whether the glyph still ended up collision free.
    pub collision_free: bool,
}

/// Signals emitted while a layout runs.
#[derive(Clone, Debug, PartialEq)]
pub enum CloudEvent {
    /// The run has started.
    Started,
    /// Overall progress in `[0, 100]`; strictly increasing within a run.
    Progress(f64),
    /// A placement guard tripped.
    Warning(PlacementWarning),
    /// The run completed; the layout is final.
    Finished,
    /// The run was cancelled before completing.
    Cancelled,
}

/// Shared cancellation flag for a layout run.
///
/// Clones observe the same flag, so a host can keep one while the layout owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Mutable per-run state, kept apart from the immutable [`Config`].
#[derive(Clone, Debug, Default)]
struct EngineState {
    cloud: CloudState,
    words: Vec<Word>,
    filtered: Vec<Word>,
    highest: u32,
    pending: Vec<Glyph>,
    placed: Vec<Glyph>,
    ids: Vec<GlyphId>,
    bias: ColorBias,
    progress: Progress,
    events: Vec<CloudEvent>,
}

/// Incremental word cloud layout over a [`RenderingSurface`].
///
/// The engine is single threaded and not reentrant: only one step runs against
/// its surface at a time, and glyphs are placed strictly in filtered-word order.
#[derive(Debug)]
pub struct CloudLayout<S, R> {
    config: Config,
    surface: S,
    rng: R,
    placer: Placer,
    cancel: CancelToken,
    state: EngineState,
}

impl<S: RenderingSurface, R: Rng> CloudLayout<S, R> {
    /// Create an idle layout engine.
    ///
    /// `config` takes the surface's canvas size and is then sanitized, so
    /// starting positions always refer to the canvas being drawn on.
    pub fn new(config: Config, surface: S, rng: R) -> Self {
        let canvas = surface.canvas_size();
        if canvas != config.canvas_size() {
            debug!(
                configured_width = config.width,
                configured_height = config.height,
                width = canvas.width,
                height = canvas.height,
                "using the surface's canvas size"
            );
        }
        let config = config.fitted_to(canvas).sanitized();
        let placer = Placer::from_config(&config);
        Self {
            config,
            surface,
            rng,
            placer,
            cancel: CancelToken::new(),
            state: EngineState {
                cloud: CloudState::idle(),
                ..EngineState::default()
            },
        }
    }

    /// The sanitized configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The placement strategy selected by the configuration.
    pub fn strategy(&self) -> Strategy {
        Strategy::from_cuddle(self.config.cuddle)
    }

    /// Current scheduler state.
    pub fn state(&self) -> CloudState {
        self.state.cloud
    }

    /// The rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the rendering surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// A token that cancels this layout's current run when triggered.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Request cancellation of the current run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Glyphs placed so far, in placement order. Final once the run is done.
    pub fn layout(&self) -> &[Glyph] {
        &self.state.placed
    }

    /// Surface handles of the placed glyphs, parallel to [`Self::layout`].
    pub fn glyph_ids(&self) -> &[GlyphId] {
        &self.state.ids
    }

    /// Take the queued events.
    pub fn drain_events(&mut self) -> Drain<'_, CloudEvent> {
        self.state.events.drain(..)
    }

    /// Consume the engine, returning the placed glyphs and the surface.
    pub fn into_parts(self) -> (Vec<Glyph>, S) {
        (self.state.placed, self.surface)
    }

    /// Arm a new run over `words`, discarding any previous run.
    pub fn start(&mut self, words: impl Into<Vec<Word>>) {
        self.cancel.reset();
        self.state = EngineState {
            words: words.into(),
            ..EngineState::default()
        };
    }

    /// Perform one cooperative step.
    pub fn step(&mut self) -> Step {
        if self.state.cloud.is_done() {
            return Step::Done;
        }
        if self.cancel.is_cancelled() {
            debug!(stage = ?self.state.cloud.stage(), "layout cancelled");
            self.surface.dispose_scratch();
            self.state.events.push(CloudEvent::Cancelled);
            self.state.cloud.done = true;
            return Step::Done;
        }

        match self.state.cloud.stage() {
            Stage::Start => {
                debug!(words = self.state.words.len(), "starting layout");
                self.surface.clear();
                self.state.bias = ColorBias::random(&mut self.rng, self.config.text_brightness);
                self.state.events.push(CloudEvent::Started);
                self.complete(Stage::Start);
            }
            Stage::ProcessWords => {
                debug!("processing words");
                self.state.highest = highest_weight(&self.state.words);
                self.state.filtered = filter_words(&self.state.words, self.config.max_words);
                self.complete(Stage::ProcessWords);
            }
            Stage::MakeTexts => {
                debug!(count = self.state.filtered.len(), "making texts");
                self.state.pending = build_glyphs(
                    &self.state.filtered,
                    self.state.highest,
                    &self.config,
                    &self.state.bias,
                    &mut self.surface,
                    &mut self.rng,
                );
                self.state.placed.reserve(self.state.pending.len());
                self.complete(Stage::MakeTexts);
            }
            Stage::PlaceWords => self.place_next(),
            Stage::Render => {
                debug!("rendering");
                self.report(Stage::PlaceWords, 100.0);
                self.surface.flush();
                self.complete(Stage::Render);
            }
            Stage::Finish => {
                debug!("tidying up");
                self.surface.dispose_scratch();
                self.complete(Stage::Finish);
            }
            Stage::Stop => {
                debug!(placed = self.state.placed.len(), "layout done");
                self.state.events.push(CloudEvent::Finished);
                self.state.cloud.done = true;
                return Step::Done;
            }
        }
        Step::Pending
    }

    /// Step until the run is done, returning every event emitted on the way.
    pub fn run_to_completion(&mut self) -> Vec<CloudEvent> {
        let mut events = Vec::new();
        loop {
            let step = self.step();
            events.extend(self.drain_events());
            if step == Step::Done {
                return events;
            }
        }
    }

    fn report(&mut self, stage: Stage, percent: f64) {
        if let Some(total) = self.state.progress.set(stage, percent) {
            self.state.events.push(CloudEvent::Progress(total));
        }
    }

    fn complete(&mut self, stage: Stage) {
        self.report(stage, 100.0);
        self.state.cloud.next_stage();
    }

    /// Place the glyph at the current word index, then either move to the next
    /// word or, after the last one, finalize and leave the stage.
    fn place_next(&mut self) {
        let index = self.state.cloud.word_index();
        let total = self.state.pending.len();

        if let Some(mut glyph) = self.state.pending.get(index).cloned() {
            let placement = match self.strategy() {
                Strategy::Box => self.placer.place_among(&mut glyph, &self.state.placed),
                Strategy::Pixel => self.placer.place_on_surface(
                    &mut glyph,
                    &mut self.surface,
                    self.config.word_padding,
                ),
            };
            if let Some(guard) = placement.guard {
                warn!(
                    index,
                    word = %glyph.word.text,
                    advances = placement.advances,
                    collision_free = placement.collision_free,
                    "placement guard tripped"
                );
                self.state
                    .events
                    .push(CloudEvent::Warning(PlacementWarning {
                        index,
                        text: glyph.word.text.clone(),
                        advances: placement.advances,
                        guard,
                        collision_free: placement.collision_free,
                    }));
            }

            let id = self.surface.create_glyph(&glyph);
            self.state.ids.push(id);
            self.state.placed.push(glyph);
            #[allow(
                clippy::cast_precision_loss,
                reason = "word counts are far below f64 precision limits"
            )]
            let percent = 100.0 * (index + 1) as f64 / total as f64;
            self.report(Stage::PlaceWords, percent);
        }

        if index + 1 >= total {
            if self.strategy() == Strategy::Pixel {
                self.finalize_colors();
            }
            self.state.cloud.next_stage();
        } else {
            self.state.cloud.next_word();
        }
    }

    /// Give every glyph placed by the pixel strategy its final colour and full
    /// opacity.
    fn finalize_colors(&mut self) {
        debug!(count = self.state.placed.len(), "colouring placed texts");
        for (glyph, id) in self.state.placed.iter_mut().zip(&self.state.ids) {
            glyph.color = self.state.bias.color(&mut self.rng);
            glyph.opacity = 1.0;
            self.surface.update_glyph(*id, glyph);
        }
    }
}
