// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-strategy runs of the step scheduler against a measuring-only surface.

use std::sync::Arc;

use kurbo::{Point, Size};
use peniko::Color;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use troposphere::collision::boxes::glyphs_intersect;
use troposphere::{
    CloudEvent, CloudLayout, Config, Glyph, GlyphId, GlyphShape, PixelBuffer, PixelRegion, Placer,
    RenderingSurface, Stage, Step, Word,
};

/// Measures text as fixed-advance boxes and records what the engine asks for.
#[derive(Debug, Default)]
struct Recorder {
    cleared: u32,
    created: Vec<GlyphId>,
    updated: u32,
    flushed: u32,
    disposed: u32,
}

impl RenderingSurface for Recorder {
    fn canvas_size(&self) -> Size {
        Size::new(800.0, 800.0)
    }

    fn measure_text(&mut self, text: &str, _font: &str, font_size: f64) -> Size {
        let chars = text.chars().count() as f64;
        Size::new(0.6 * font_size * chars, font_size)
    }

    fn clear(&mut self) {
        self.cleared += 1;
        self.created.clear();
    }

    fn create_glyph(&mut self, _glyph: &Glyph) -> GlyphId {
        let id = GlyphId(u32::try_from(self.created.len()).unwrap());
        self.created.push(id);
        id
    }

    fn update_glyph(&mut self, _id: GlyphId, _glyph: &Glyph) {
        self.updated += 1;
    }

    fn remove_glyph(&mut self, _id: GlyphId) {}

    fn read_pixels(&mut self, region: PixelRegion) -> PixelBuffer {
        PixelBuffer::transparent(region.width, region.height)
    }

    fn render_isolated(&mut self, _glyph: &Glyph, region: PixelRegion) -> PixelBuffer {
        PixelBuffer::transparent(region.width, region.height)
    }

    fn flush(&mut self) {
        self.flushed += 1;
    }

    fn dispose_scratch(&mut self) {
        self.disposed += 1;
    }
}

fn words() -> Vec<Word> {
    [
        ("troposphere", 40),
        ("cloud", 35),
        ("weather", 30),
        ("pressure", 22),
        ("humidity", 20),
        ("front", 18),
        ("storm", 15),
        ("rain", 12),
        ("wind", 12),
        ("fog", 9),
        ("hail", 7),
        ("dew", 5),
        ("mist", 4),
        ("gust", 3),
        ("haze", 2),
    ]
    .into_iter()
    .map(|(text, weight)| Word::new(text, weight))
    .collect()
}

fn layout(config: Config, seed: u64) -> CloudLayout<Recorder, SmallRng> {
    CloudLayout::new(config, Recorder::default(), SmallRng::seed_from_u64(seed))
}

fn progress_of(events: &[CloudEvent]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            CloudEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[test]
fn a_full_run_places_every_filtered_word_without_box_overlap() {
    let mut cloud = layout(Config::default(), 7);
    cloud.start(words());
    let events = cloud.run_to_completion();

    assert_eq!(events.first(), Some(&CloudEvent::Started));
    assert_eq!(events.last(), Some(&CloudEvent::Finished));

    let placed = cloud.layout();
    assert_eq!(placed.len(), 15);
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            assert!(
                !glyphs_intersect(a, b),
                "{} overlaps {}",
                a.word.text,
                b.word.text
            );
        }
    }

    let surface = cloud.surface();
    assert_eq!(surface.cleared, 1);
    assert_eq!(surface.created.len(), 15);
    assert_eq!(surface.updated, 0, "box mode colours glyphs up front");
    assert_eq!(surface.flushed, 1);
    assert_eq!(surface.disposed, 1);
}

#[test]
fn glyphs_follow_filtered_order_and_shrink_with_weight() {
    let config = Config {
        max_words: 6,
        ..Config::default()
    };
    let mut cloud = layout(config, 3);
    cloud.start(words());
    let _ = cloud.run_to_completion();

    let texts: Vec<_> = cloud.layout().iter().map(|g| g.word.text.as_str()).collect();
    assert_eq!(
        texts,
        ["troposphere", "cloud", "weather", "pressure", "humidity", "front"]
    );
    let sizes: Vec<_> = cloud.layout().iter().map(|g| g.font_size).collect();
    assert!(sizes.windows(2).all(|w| w[0] >= w[1]), "{sizes:?}");
    assert_eq!(sizes[0], 106.0);
}

#[test]
fn progress_rises_monotonically_to_one_hundred() {
    let mut cloud = layout(Config::default(), 11);
    cloud.start(words());
    let events = cloud.run_to_completion();
    let progress = progress_of(&events);

    assert!(progress.windows(2).all(|w| w[0] < w[1]), "{progress:?}");
    assert_eq!(progress.first().copied(), Some(1.0));
    assert_eq!(progress.last().copied(), Some(100.0));
}

#[test]
fn each_placement_step_places_exactly_one_glyph() {
    let mut cloud = layout(Config::default(), 5);
    cloud.start(words());

    while cloud.state().stage() != Stage::PlaceWords {
        assert_eq!(cloud.step(), Step::Pending);
    }
    for n in 1..=15 {
        assert_eq!(cloud.step(), Step::Pending);
        assert_eq!(cloud.layout().len(), n);
    }
    assert_eq!(cloud.state().stage(), Stage::Render);

    let mut steps = 0;
    while cloud.step() == Step::Pending {
        steps += 1;
    }
    assert_eq!(steps, 2, "render and finish, then stop completes");
    assert_eq!(cloud.step(), Step::Done);
}

#[test]
fn same_seed_gives_the_same_layout() {
    let run = |seed| {
        let mut cloud = layout(Config::default(), seed);
        cloud.start(words());
        let _ = cloud.run_to_completion();
        cloud.into_parts().0
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn cancellation_stops_before_the_next_step() {
    let mut cloud = layout(Config::default(), 9);
    let token = cloud.cancel_token();
    cloud.start(words());

    for _ in 0..6 {
        assert_eq!(cloud.step(), Step::Pending);
    }
    let placed = cloud.layout().len();
    token.cancel();
    assert_eq!(cloud.step(), Step::Done);
    assert_eq!(cloud.layout().len(), placed);

    let events: Vec<_> = cloud.drain_events().collect();
    assert!(events.contains(&CloudEvent::Cancelled));
    assert!(!events.contains(&CloudEvent::Finished));
    assert_eq!(cloud.surface().disposed, 1);

    cloud.start(words());
    let events = cloud.run_to_completion();
    assert_eq!(events.last(), Some(&CloudEvent::Finished));
    assert_eq!(cloud.layout().len(), 15);
}

#[test]
fn empty_input_still_completes() {
    let mut cloud = layout(Config::default(), 1);
    cloud.start(Vec::<Word>::new());
    let events = cloud.run_to_completion();
    assert!(cloud.layout().is_empty());
    assert_eq!(progress_of(&events).last().copied(), Some(100.0));
    assert_eq!(events.last(), Some(&CloudEvent::Finished));
}

#[test]
fn an_idle_layout_is_done() {
    let mut cloud = layout(Config::default(), 1);
    assert_eq!(cloud.step(), Step::Done);
    assert!(cloud.drain_events().next().is_none());
}

/// A horizontal text glyph centred on `(400, 400)`, sized by its weight.
fn centred(text: &str, weight: u32) -> Glyph {
    let font_size = f64::from(weight) * 4.0;
    Glyph {
        word: Word::new(text, weight),
        position: Point::new(400.0, 400.0),
        angle: 0.0,
        font_size,
        size: Size::new(0.6 * font_size * text.len() as f64, font_size),
        color: Color::BLACK,
        opacity: 1.0,
        font: Arc::from("f"),
        shape: GlyphShape::Text,
    }
}

/// Place glyphs in order with the box strategy from a shared start.
fn place_in_order(glyphs: &[Glyph]) -> Vec<(Glyph, bool)> {
    let config = Config::default();
    let mut placer = Placer::from_config(&config);
    let mut placed: Vec<Glyph> = Vec::new();
    let mut out = Vec::new();
    for glyph in glyphs {
        let mut glyph = glyph.clone();
        let placement = placer.place_among(&mut glyph, &placed);
        placed.push(glyph.clone());
        out.push((glyph, placement.collision_free));
    }
    out
}

#[test]
fn placement_order_decides_who_moves() {
    let a = centred("a", 10);
    let b = centred("b", 5);

    let forward = place_in_order(&[a.clone(), b.clone()]);
    let backward = place_in_order(&[b.clone(), a.clone()]);

    for run in [&forward, &backward] {
        assert!(run.iter().all(|(_, free)| *free));
        assert!(!glyphs_intersect(&run[0].0, &run[1].0));
    }

    // Whoever goes first keeps its start; the other one is pushed out.
    assert_eq!(forward[0].0.position, a.position);
    assert_ne!(forward[1].0.position, b.position);
    assert_eq!(backward[0].0.position, b.position);
    assert_ne!(backward[1].0.position, a.position);
}
