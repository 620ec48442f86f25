use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Context, Result};
use cadence_core::{
    AnimationError, AnimationEvent, AnimationValue, ApplierPriority, Curve, EventKind,
    FixedStepClock, NodeId, NodeState, PropertyApplier, PropertyChange, PropertyClass,
    PropertyTarget, Scheduler, TargetRef,
};

#[derive(Default)]
struct Card {
    props: HashMap<String, AnimationValue>,
    writes: Vec<(String, AnimationValue)>,
}

impl PropertyTarget for Card {
    fn value(&self, key: &str) -> Option<AnimationValue> {
        self.props.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: AnimationValue) {
        self.writes.push((key.to_string(), value.clone()));
        self.props.insert(key.to_string(), value);
    }

    fn property_class(&self, key: &str) -> PropertyClass {
        if key == "opacity" {
            PropertyClass::RenderLayer
        } else {
            PropertyClass::Plain
        }
    }
}

fn card() -> (Rc<RefCell<Card>>, TargetRef) {
    let mut card = Card::default();
    card.props
        .insert("opacity".to_string(), AnimationValue::scalar(0.0));
    card.props
        .insert("x".to_string(), AnimationValue::scalar(0.0));
    let card = Rc::new(RefCell::new(card));
    let target: TargetRef = card.clone();
    (card, target)
}

fn scalar(card: &Rc<RefCell<Card>>, key: &str) -> Result<f64> {
    card.borrow()
        .value(key)
        .and_then(|v| v.as_scalar())
        .context("missing scalar property")
}

fn completions(events: &[AnimationEvent]) -> Vec<NodeId> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Completed)
        .map(|e| e.node)
        .collect()
}

#[test]
fn leaf_progresses_in_quarters() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let fade = scheduler.animate(PropertyChange::new(target, "opacity", 1.0), 1.0, None)?;
    scheduler.go(fade)?;
    scheduler.drain_events();

    let mut positions = Vec::new();
    for tick in 0..4 {
        scheduler.tick(0.25);
        positions.push(scheduler.position(fade).context("fade retired early")?);
        let kinds: Vec<_> = scheduler.drain_events().into_iter().map(|e| e.kind).collect();
        match tick {
            0 => assert_eq!(kinds, vec![EventKind::BecameActive]),
            3 => assert_eq!(kinds, vec![EventKind::Completed]),
            _ => assert!(kinds.is_empty()),
        }
        if tick == 1 {
            assert!((scalar(&card, "opacity")? - 0.5).abs() < 1e-9);
        }
    }
    assert_eq!(positions, vec![0.25, 0.5, 0.75, 1.0]);
    assert_eq!(scalar(&card, "opacity")?, 1.0);
    Ok(())
}

#[test]
fn delayed_leaf_activates_after_delay() -> Result<()> {
    let (_card, target) = card();
    let mut scheduler = Scheduler::new();
    let fade = scheduler.animate(PropertyChange::new(target, "opacity", 1.0), 0.5, None)?;
    scheduler.delayed(fade, 0.5)?;
    scheduler.go(fade)?;
    assert_eq!(scheduler.pop_event().map(|e| e.kind), Some(EventKind::Delayed));

    let mut seen = Vec::new();
    for _ in 0..4 {
        scheduler.tick(0.25);
        let position = scheduler.position(fade).context("fade retired early")?;
        for event in scheduler.drain_events() {
            seen.push((event.kind, position));
        }
    }
    assert_eq!(
        seen,
        vec![(EventKind::BecameActive, 0.75), (EventKind::Completed, 1.0)]
    );
    Ok(())
}

#[test]
fn chain_completes_children_in_order() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let durations = [0.5, 1.0, 0.25];
    let mut leaves = Vec::new();
    for (i, duration) in durations.iter().enumerate() {
        let change = PropertyChange::new(target.clone(), "x", (i + 1) as f64 * 10.0);
        leaves.push(scheduler.animate(change, *duration, None)?);
    }
    let chain = scheduler.chain(leaves.clone())?;
    assert_eq!(scheduler.duration(chain), Some(1.75));
    scheduler.go(chain)?;

    let frames = scheduler.run(&mut FixedStepClock::new(0.125));
    assert_eq!(frames, 14);

    let events = scheduler.drain_events();
    let mut expected = leaves.clone();
    expected.push(chain);
    assert_eq!(completions(&events), expected);
    assert_eq!(scalar(&card, "x")?, 30.0);
    assert_eq!(scheduler.is_finished(chain), Some(true));
    Ok(())
}

#[test]
fn then_waits_for_first_to_finish() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let a = scheduler.animate(PropertyChange::new(target.clone(), "opacity", 1.0), 1.0, None)?;
    let b = scheduler.animate(PropertyChange::new(target, "x", 100.0), 1.0, None)?;
    let chain = scheduler.then(a, b)?;
    scheduler.go(chain)?;

    scheduler.tick(0.5);
    assert_eq!(scheduler.state(b), Some(NodeState::Pending));
    assert_eq!(scalar(&card, "x")?, 0.0);

    scheduler.complete(a, false)?;
    assert_eq!(scheduler.state(b), Some(NodeState::Active));
    scheduler.tick(1.0);
    assert_eq!(scheduler.state(chain), Some(NodeState::Completed));
    assert_eq!(scheduler.is_finished(b), Some(true));
    assert_eq!(scheduler.is_finished(chain), Some(false));
    // force-completion snaps to the final value
    assert_eq!(scalar(&card, "opacity")?, 1.0);
    Ok(())
}

#[test]
fn group_completes_after_longest_child() -> Result<()> {
    let (_card, target) = card();
    let mut scheduler = Scheduler::new();
    let short = scheduler.animate(PropertyChange::new(target.clone(), "opacity", 1.0), 1.0, None)?;
    let long = scheduler.animate(PropertyChange::new(target, "x", 50.0), 2.0, None)?;
    let group = scheduler.and(short, long)?;
    assert_eq!(scheduler.duration(group), Some(2.0));

    let group_done = Rc::new(Cell::new(None));
    let sink = Rc::clone(&group_done);
    scheduler.on_completed(group, move |e| sink.set(Some(e.finished)))?;
    scheduler.go(group)?;

    for _ in 0..7 {
        scheduler.tick(0.25);
    }
    assert_eq!(group_done.get(), None);
    scheduler.tick(0.25);
    assert_eq!(group_done.get(), Some(true));
    assert_eq!(scheduler.time(), 2.0);

    let events = scheduler.drain_events();
    assert_eq!(completions(&events), vec![short, long, group]);
    Ok(())
}

#[test]
fn nested_composites_share_time() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let fade = scheduler.animate(PropertyChange::new(target.clone(), "opacity", 1.0), 0.5, None)?;
    let slide = scheduler.animate(PropertyChange::new(target.clone(), "x", 20.0), 1.0, None)?;
    let pause = scheduler.wait(0.25)?;
    let group = scheduler.and(fade, slide)?;
    let chain = scheduler.then(pause, group)?;
    assert_eq!(scheduler.duration(chain), Some(1.25));
    scheduler.go(chain)?;

    scheduler.tick(0.75);
    assert_eq!(scheduler.state(pause), Some(NodeState::Completed));
    assert!((scalar(&card, "opacity")? - 1.0).abs() < 1e-9);
    assert!((scalar(&card, "x")? - 10.0).abs() < 1e-9);

    scheduler.tick(0.5);
    assert_eq!(scheduler.state(chain), Some(NodeState::Completed));
    assert_eq!(scalar(&card, "x")?, 20.0);
    Ok(())
}

#[test]
fn reversed_leaf_plays_back_to_from() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let change = PropertyChange::new(target, "x", 10.0).from_value(0.0);
    let slide = scheduler.animate(change, 1.0, Some(Curve::linear()))?;
    scheduler.go_with_speed(slide, -1.0)?;
    assert_eq!(scalar(&card, "x")?, 10.0);

    scheduler.tick(0.25);
    assert!((scalar(&card, "x")? - 7.5).abs() < 1e-9);
    scheduler.tick(0.75);
    assert_eq!(scalar(&card, "x")?, 0.0);
    assert_eq!(scheduler.state(slide), Some(NodeState::Completed));
    Ok(())
}

#[test]
fn complete_twice_has_no_further_effect() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let fade = scheduler.animate(PropertyChange::new(target, "opacity", 1.0), 1.0, None)?;
    scheduler.complete(fade, true)?;
    let writes = card.borrow().writes.len();
    scheduler.complete(fade, true)?;

    assert_eq!(card.borrow().writes.len(), writes);
    assert_eq!(completions(&scheduler.drain_events()), vec![fade]);
    Ok(())
}

#[test]
fn seek_emits_each_crossing_once() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let fade = scheduler.animate(PropertyChange::new(target, "opacity", 1.0), 1.0, None)?;
    scheduler.delayed(fade, 1.0)?;

    scheduler.set_position(fade, 5.0)?;
    let kinds: Vec<_> = scheduler.drain_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::BecameActive, EventKind::Completed]);
    assert_eq!(scalar(&card, "opacity")?, 1.0);
    assert_eq!(scheduler.is_manual(fade), Some(true));

    scheduler.set_position(fade, 1.5)?;
    assert!((scalar(&card, "opacity")? - 0.5).abs() < 1e-9);
    Ok(())
}

struct FadeApplier {
    hits: Rc<Cell<usize>>,
}

impl PropertyApplier for FadeApplier {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn can_animate(&self, target: &dyn PropertyTarget, key: &str) -> bool {
        target.property_class(key) == PropertyClass::RenderLayer
    }

    fn apply(&self, target: &mut dyn PropertyTarget, key: &str, value: &AnimationValue) {
        self.hits.set(self.hits.get() + 1);
        target.set_value(key, value.clone());
    }

    fn commit_final(&self, target: &mut dyn PropertyTarget, key: &str, value: &AnimationValue) {
        target.set_value(key, value.clone());
    }
}

#[test]
fn first_qualifying_applier_wins() -> Result<()> {
    let (_card, target) = card();
    let hits = Rc::new(Cell::new(0));
    let mut scheduler = Scheduler::new();
    scheduler.appliers_mut().register(
        ApplierPriority::RenderProperty,
        FadeApplier {
            hits: Rc::clone(&hits),
        },
    );

    let fade = scheduler.animate(PropertyChange::new(target.clone(), "opacity", 1.0), 1.0, None)?;
    let slide = scheduler.animate(PropertyChange::new(target, "x", 5.0), 1.0, None)?;
    scheduler.go(fade)?;
    scheduler.go(slide)?;
    let applied = hits.get();
    scheduler.tick(0.5);
    // only the layer-backed property goes through the fade applier
    assert_eq!(hits.get(), applied + 1);
    Ok(())
}

#[test]
fn animate_or_set_falls_back_to_direct_write() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();

    let err = scheduler
        .animate(PropertyChange::new(target.clone(), "title", 1.0), 1.0, None)
        .unwrap_err();
    assert_eq!(
        err,
        AnimationError::NoApplier {
            key: "title".to_string()
        }
    );

    let set = scheduler.animate_or_set(PropertyChange::new(target, "title", 1.0), 1.0, None)?;
    assert_eq!(scheduler.duration(set), Some(0.0));
    scheduler.tick(0.0);
    assert_eq!(scalar(&card, "title")?, 1.0);
    assert_eq!(scheduler.state(set), Some(NodeState::Completed));
    Ok(())
}

#[test]
fn manual_chain_follows_seeks() -> Result<()> {
    let (card, target) = card();
    let mut scheduler = Scheduler::new();
    let a = scheduler.animate(PropertyChange::new(target.clone(), "opacity", 1.0), 1.0, None)?;
    let b = scheduler.animate(PropertyChange::new(target, "x", 10.0), 1.0, None)?;
    let chain = scheduler.then(a, b)?;
    scheduler.manual(chain)?;

    scheduler.set_position(chain, 1.5)?;
    assert_eq!(scalar(&card, "opacity")?, 1.0);
    assert!((scalar(&card, "x")? - 5.0).abs() < 1e-9);

    scheduler.set_position(chain, 0.5)?;
    assert!((scalar(&card, "opacity")? - 0.5).abs() < 1e-9);
    assert_eq!(scalar(&card, "x")?, 0.0);

    scheduler.tick(1.0);
    assert_eq!(scheduler.position(chain), Some(0.5));
    Ok(())
}
