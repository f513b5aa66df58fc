use collective::{
    AncestorVisitor, ClassId, Container, Hierarchy, Options, VisitDecision, WalkStatus,
};
use collective_testhelpers::IPanic;

/// Root -> Mid -> Leaf, with `thing` declared on Mid only.
fn declared_midway() -> (Hierarchy<u32>, [ClassId; 3]) {
    let mut h = Hierarchy::new();
    let root = h.define_class("Root", None).unwrap();
    let mid = h.define_class("Mid", Some(root)).unwrap();
    let leaf = h.define_class("Leaf", Some(mid)).unwrap();
    h.declare(mid, "thing", Options::new()).unwrap();
    h.collective_mut(mid, "things").unwrap().push(1).unwrap();
    h.collective_mut(leaf, "things").unwrap().push(2).unwrap();
    (h, [root, mid, leaf])
}

#[derive(Default)]
struct Recorder {
    visited: Vec<(ClassId, usize)>,
    stop_after: Option<usize>,
}

impl AncestorVisitor<u32> for Recorder {
    fn visit(&mut self, ancestor: ClassId, contribution: &Container<u32>) -> VisitDecision {
        self.visited.push((ancestor, contribution.len()));
        match self.stop_after {
            Some(n) if self.visited.len() >= n => VisitDecision::Stop,
            _ => VisitDecision::Continue,
        }
    }
}

#[test]
fn walk_visits_responding_ancestors_root_first() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let (h, [_, mid, leaf]) = declared_midway();

    let mut recorder = Recorder::default();
    let status = h.walk(leaf, "things", &mut recorder)?;
    assert_eq!(status, WalkStatus::Completed);
    // Root never declared nor inherited `thing`, so it is not visited
    assert_eq!(recorder.visited, [(mid, 1), (leaf, 1)]);
    Ok(())
}

#[test]
fn walk_stops_when_asked() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let (h, [_, mid, leaf]) = declared_midway();

    let mut recorder = Recorder {
        stop_after: Some(1),
        ..Recorder::default()
    };
    assert_eq!(h.walk(leaf, "things", &mut recorder)?, WalkStatus::Stopped);
    assert_eq!(recorder.visited, [(mid, 1)]);
    Ok(())
}

#[test]
fn walk_with_closure_sees_each_contribution() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let (h, [_, _, leaf]) = declared_midway();

    let mut total = 0;
    let status = h.walk_with(leaf, "all_things", |_, contribution| {
        total += contribution.iter().map(|element| *element.value()).sum::<u32>();
        VisitDecision::Continue
    })?;
    assert_eq!(status, WalkStatus::Completed);
    assert_eq!(total, 3);
    Ok(())
}

#[test]
fn walking_from_a_non_responding_class_visits_nothing() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let (h, [root, ..]) = declared_midway();

    let status = h.walk_with(root, "things", |ancestor, _| {
        panic!("{ancestor} should not be visited")
    })?;
    assert_eq!(status, WalkStatus::Completed);
    assert!(h.contributions(root, "things")?.is_empty());
    Ok(())
}

#[test]
fn walk_initialises_untouched_ancestors() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let mut h = Hierarchy::new();
    let root = h.define_class("Root", None)?;
    let leaf = h.define_class("Leaf", Some(root))?;
    h.declare(
        root,
        "thing",
        Options::new().default_value(Container::sequence([7_u32])),
    )?;

    let contributions = h.contributions(leaf, "things")?;
    assert_eq!(
        contributions,
        [
            (root, &Container::sequence([7])),
            (leaf, &Container::sequence([7])),
        ]
    );
    Ok(())
}

#[test]
fn each_and_all_agree_with_the_walk() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let (h, [_, _, leaf]) = declared_midway();

    let mut walked = Vec::new();
    h.walk_with(leaf, "things", |_, contribution| {
        walked.extend(contribution.iter().map(|element| *element.value()));
        VisitDecision::Continue
    })?;

    let each: Vec<_> = h.each(leaf, "each_thing")?.iter().map(|e| *e.value()).collect();
    assert_eq!(each, walked);
    assert_eq!(h.all(leaf, "all_things")?, Container::sequence(walked));
    Ok(())
}
