//! Cadence demo: composes a small card animation and runs it to completion.
//!
//! Settings come from `cadence.toml` and `CADENCE_*` environment variables.
//! Set `RUST_LOG=debug` to see scheduler lifecycle logs.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;
use cadence_config::CadenceConfig;
use cadence_core::{
    AnimationValue, Curve, EventKind, FixedStepClock, FrameClock, PropertyChange, PropertyTarget,
    Scheduler, SystemFrameClock, TargetRef, Transform2D,
};

/// A card whose properties are plain stored values.
#[derive(Debug, Default)]
struct Card {
    props: BTreeMap<String, AnimationValue>,
}

impl Card {
    fn new() -> Self {
        let mut props = BTreeMap::new();
        props.insert("opacity".to_string(), AnimationValue::scalar(0.0));
        props.insert("origin".to_string(), AnimationValue::point(0.0, 0.0));
        props.insert(
            "transform".to_string(),
            AnimationValue::from(Transform2D::default()),
        );
        props.insert(
            "background".to_string(),
            AnimationValue::color([0.1, 0.1, 0.1, 1.0]),
        );
        Self { props }
    }
}

impl PropertyTarget for Card {
    fn value(&self, key: &str) -> Option<AnimationValue> {
        self.props.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: AnimationValue) {
        self.props.insert(key.to_string(), value);
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = CadenceConfig::load();
    log::info!(
        "cadence demo: curve={} frame_rate={} fixed_step={}",
        config.timing.default_curve,
        config.clock.frame_rate,
        config.clock.fixed_step
    );

    let mut scheduler = Scheduler::new();
    scheduler.set_default_curve(config.timing.default_curve.into());
    scheduler.set_record_positions(config.events.record_positions);

    let card = Rc::new(RefCell::new(Card::new()));
    let target: TargetRef = card.clone();

    let fade_in = scheduler.animate(PropertyChange::new(target.clone(), "opacity", 1.0), 0.3, None)?;
    let slide = scheduler.animate(
        PropertyChange::new(target.clone(), "origin", AnimationValue::point(120.0, 40.0)),
        0.6,
        Some(Curve::ease_out_back()),
    )?;
    let grow = scheduler.animate(
        PropertyChange::new(target.clone(), "transform", Transform2D::scale(1.5, 1.5)),
        0.4,
        Some(Curve::ease_in_out()),
    )?;
    scheduler.delayed(grow, 0.2)?;
    let tint = scheduler.animate(
        PropertyChange::new(
            target.clone(),
            "background",
            AnimationValue::color([0.2, 0.5, 0.9, 1.0]),
        ),
        0.5,
        None,
    )?;
    // "label" is not a card property, so this falls back to a direct write
    let label = scheduler.animate_or_set(
        PropertyChange::new(target.clone(), "label", 1.0),
        0.5,
        None,
    )?;

    let motion = scheduler.and(slide, grow)?;
    let hold = scheduler.wait(0.25)?;
    let done = {
        let card = Rc::clone(&card);
        scheduler.action(move || {
            log::info!("card settled: {:?}", card.borrow().props);
        })
    };
    let sequence = scheduler.chain(vec![fade_in, motion, tint, label, hold, done])?;

    for (name, node) in [("fade-in", fade_in), ("motion", motion), ("tint", tint)] {
        scheduler.on_active(node, move |event| {
            log::info!("{name} active at {:.3}", event.position);
        })?;
        scheduler.on_completed(node, move |event| {
            log::info!("{name} completed (finished = {})", event.finished);
        })?;
    }
    scheduler.on(sequence, EventKind::Completed, |event| {
        log::info!("sequence {} completed", event.node);
    })?;
    scheduler.go(sequence)?;

    let frame_rate = 1.0 / config.frame_interval().as_secs_f64();
    let mut clock: Box<dyn FrameClock> = match (config.clock.fixed_step, config.clock.max_frames) {
        (true, Some(frames)) => Box::new(FixedStepClock::with_frame_rate(frame_rate).limit(frames)),
        (true, None) => Box::new(FixedStepClock::with_frame_rate(frame_rate)),
        (false, max_frames) => {
            let mut clock = SystemFrameClock::with_frame_rate(frame_rate);
            let mut remaining = max_frames;
            Box::new(move || match &mut remaining {
                Some(0) => None,
                Some(n) => {
                    *n -= 1;
                    clock.next_frame()
                }
                None => clock.next_frame(),
            })
        }
    };

    let frames = scheduler.run(clock.as_mut());
    for event in scheduler.drain_events() {
        log::debug!("{:?}", event);
    }
    log::info!(
        "ran {frames} frames, {:.3}s of animation",
        scheduler.time()
    );
    Ok(())
}
