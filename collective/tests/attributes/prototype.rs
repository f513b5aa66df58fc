use collective::{Container, Element, Error, Hierarchy, Options};
use collective_testhelpers::IPanic;

use super::fixtures::{prototype_objects, push};

#[test]
fn base_class_has_its_own_things() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let fx = prototype_objects();
    let h = &fx.hierarchy;

    assert_eq!(h.collective(fx.object, "things")?, &Container::sequence(["Thingy"]));
    assert_eq!(h.all(fx.object, "all_things")?, Container::sequence(["Thingy"]));

    let mut seen = Vec::new();
    h.each_with(fx.object, "each_thing", |element| seen.push(*element.value()))?;
    assert_eq!(seen, ["Thingy"]);
    Ok(())
}

#[test]
fn subclass_storage_is_independent_and_merged_ancestor_first() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let fx = prototype_objects();
    let h = &fx.hierarchy;

    assert_eq!(h.collective(fx.subclass, "things")?, &Container::sequence(["OtherThingy"]));
    assert_eq!(
        h.all(fx.subclass, "all_things")?,
        Container::sequence(["Thingy", "OtherThingy"])
    );
    assert_eq!(
        h.all(fx.subclass, "all_other_things")?,
        Container::sequence(["Junk", "SomeMoreJunk"])
    );
    // the parent never sees what the subclass added
    assert_eq!(h.all(fx.object, "all_things")?, Container::sequence(["Thingy"]));
    Ok(())
}

#[test]
fn mutating_the_subclass_leaves_the_parent_alone() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let mut fx = prototype_objects();
    push(&mut fx.hierarchy, fx.subclass, "things", "Extra");
    fx.hierarchy.collective_mut(fx.object, "things")?.push("Late")?;

    let h = &fx.hierarchy;
    assert_eq!(h.collective(fx.object, "things")?, &Container::sequence(["Thingy", "Late"]));
    assert_eq!(
        h.collective(fx.subclass, "things")?,
        &Container::sequence(["OtherThingy", "Extra"])
    );
    assert_eq!(
        h.all(fx.subclass, "things")?,
        Container::sequence(["Thingy", "Late", "OtherThingy", "Extra"])
    );
    Ok(())
}

#[test]
fn declared_but_empty_attribute_merges_to_nothing() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let mut h: Hierarchy<u32> = Hierarchy::new();
    let t = h.define_class("T", None)?;
    h.declare(t, "x", Options::new())?;

    assert_eq!(h.all(t, "all_xes")?, Container::sequence([]));
    assert_eq!(h.each(t, "each_x")?.iter().count(), 0);
    Ok(())
}

#[test]
fn appended_element_shows_up_once_in_position() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let mut h = Hierarchy::new();
    let t = h.define_class("T", None)?;
    let s = h.define_class("S", Some(t))?;
    h.declare(t, "x", Options::new())?;
    h.collective_mut(t, "xes")?.push(1)?;
    h.collective_mut(s, "xes")?.push(3)?;
    h.collective_mut(t, "xes")?.push(2)?;

    assert_eq!(h.all(s, "all_xes")?, Container::sequence([1, 2, 3]));
    assert_eq!(h.all(t, "all_xes")?, Container::sequence([1, 2]));
    Ok(())
}

#[test]
fn duplicates_are_kept() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let mut fx = prototype_objects();
    push(&mut fx.hierarchy, fx.subclass, "things", "Thingy");
    assert_eq!(
        fx.hierarchy.all(fx.subclass, "all_things")?,
        Container::sequence(["Thingy", "OtherThingy", "Thingy"])
    );
    Ok(())
}

#[test]
fn merged_views_are_fresh_every_time() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let fx = prototype_objects();
    let h = &fx.hierarchy;

    let mut first = h.all(fx.subclass, "all_things")?;
    let second = h.all(fx.subclass, "all_things")?;
    assert_eq!(first, second);

    first.push("Mutated")?;
    assert_ne!(first, second);
    assert_eq!(h.all(fx.subclass, "all_things")?, second);
    assert_eq!(h.collective(fx.subclass, "things")?, &Container::sequence(["OtherThingy"]));
    Ok(())
}

#[test]
fn each_is_restartable() -> Result<(), IPanic> {
    collective_testhelpers::setup();
    let fx = prototype_objects();
    let each = fx.hierarchy.each(fx.subclass, "each_thing")?;

    let first: Vec<_> = each.iter().map(|e| *e.value()).collect();
    let second: Vec<_> = each.iter().map(|e| *e.value()).collect();
    assert_eq!(first, ["Thingy", "OtherThingy"]);
    assert_eq!(first, second);

    // by-value iteration works too, since `Each` is `Copy`
    assert_eq!(each.into_iter().count(), 2);
    assert!(each.iter().all(|e| matches!(e, Element::Item(_))));
    Ok(())
}

#[test]
fn undeclared_attribute_is_an_unknown_operation() {
    collective_testhelpers::setup();
    let fx = prototype_objects();
    let h = &fx.hierarchy;

    for name in ["each_widget", "all_widgets", "widgets", "widget"] {
        assert!(matches!(
            h.all(fx.subclass, name),
            Err(Error::UnknownOperation { .. })
        ));
        assert!(matches!(
            h.each(fx.subclass, name),
            Err(Error::UnknownOperation { .. })
        ));
    }

    let err = h.all(fx.subclass, "all_widgets").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"undefined operation `all_widgets` for class `MyPrototypeObjectSubClass`");
}
