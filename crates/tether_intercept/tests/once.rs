//! Once-semantics: self-unregistering hooks and their reference cleanup.


use std::sync::OnceLock;
use std::sync::atomic::Ordering;

use test_utils::{count_of, counter, counting_hook, hookable};
use tether_intercept::Observer;
use tether_registry::callback::{HookFn, hook};
use tether_registry::events::EventNames;

#[test]
fn once_hooks_fire_exactly_once() {
    let subject = hookable("hookable", &["a", "b"]);
    let observer = Observer::new();
    let count1 = counter();
    let count2 = counter();

    observer.add_hook_once(Some(&subject), "a", Some(counting_hook(&count1)), None);
    observer.add_hook_once(Some(&subject), "b", Some(counting_hook(&count2)), None);

    for _ in 0..3 {
        subject.call("a", vec![]).unwrap();
    }
    for _ in 0..4 {
        subject.call("b", vec![]).unwrap();
    }
    assert_eq!(count_of(&count1), 1);
    assert_eq!(count_of(&count2), 1);
}

#[test]
fn once_cleans_up_both_reference_tables_after_firing() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();

    observer.add_hook_once(
        Some(&subject),
        "a",
        Some(hook(|_ctx, _record| Ok(()))),
        None,
    );
    assert_eq!(observer.listening_count(), 1);
    assert_eq!(subject.listener_count(), 1);

    subject.call("a", vec![]).unwrap();
    assert_eq!(observer.listening_count(), 0);
    assert_eq!(subject.listener_count(), 0);
    assert_eq!(subject.hook_count("a"), 0);
}

#[test]
fn once_map_counts_down_name_by_name() {
    let subject = hookable("hookable", &["a", "b"]);
    let observer = Observer::new();

    observer.add_hook_once(
        Some(&subject),
        EventNames::from([
            ("a", hook(|_ctx, _record| Ok(()))),
            ("b", hook(|_ctx, _record| Ok(()))),
        ]),
        None,
        None,
    );

    subject.call("a", vec![]).unwrap();
    assert_eq!(observer.listening_count(), 1);
    assert_eq!(subject.listener_count(), 1);

    subject.call("b", vec![]).unwrap();
    assert_eq!(observer.listening_count(), 0);
    assert_eq!(subject.listener_count(), 0);
}

#[test]
fn once_with_space_separated_names_fires_once_per_name() {
    let subject = hookable("hookable", &["a", "b"]);
    let observer = Observer::new();
    let count = counter();

    observer.add_hook_once(Some(&subject), "a b", Some(counting_hook(&count)), None);

    subject.call("a", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count), 1);

    subject.call("b", vec![]).unwrap();
    subject.call("b", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count), 2);
}

#[test]
fn once_beside_a_plain_registration_of_the_same_callback() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();
    let callback = counting_hook(&count);

    observer.add_hook_once(Some(&subject), "a", Some(callback.clone()), None);
    observer.add_hook(Some(&subject), "a", Some(callback), None);

    subject.call("a", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count), 4, "once fires once, plain fires thrice");
}

#[test]
fn unfired_once_is_removable_by_its_original_callback() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();
    let callback = counting_hook(&count);

    observer.add_hook_once(Some(&subject), "a", Some(callback.clone()), None);
    observer.remove_hook(Some(&subject), Some("a".into()), Some(&callback), None);

    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count), 0);
    assert_eq!(observer.listening_count(), 0);
    assert_eq!(subject.listener_count(), 0);
}

#[test]
fn removing_a_plain_and_once_pair_mid_snapshot() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();

    let slot: std::sync::Arc<OnceLock<HookFn>> = std::sync::Arc::new(OnceLock::new());
    let callback = {
        let slot = slot.clone();
        let observer = observer.clone();
        let subject = subject.clone();
        let count = count.clone();
        hook(move |_ctx, _record| {
            count.fetch_add(1, Ordering::SeqCst);
            if let Some(me) = slot.get() {
                observer.remove_hook(Some(&subject), Some("a".into()), Some(me), None);
            }
            Ok(())
        })
    };
    slot.set(callback.clone()).ok();

    observer.add_hook(Some(&subject), "a", Some(callback.clone()), None);
    observer.add_hook_once(Some(&subject), "a", Some(callback), None);

    for _ in 0..4 {
        subject.call("a", vec![]).unwrap();
    }
    assert_eq!(
        count_of(&count),
        2,
        "both snapshot entries fire once, then everything is gone"
    );
}

#[test]
fn a_once_hook_may_reenter_the_method() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count1 = counter();
    let count2 = counter();

    let reentering = {
        let subject = subject.clone();
        let count1 = count1.clone();
        hook(move |_ctx, _record| {
            count1.fetch_add(1, Ordering::SeqCst);
            subject.call("a", vec![])?;
            Ok(())
        })
    };

    observer.add_hook_once(Some(&subject), "a", Some(reentering), None);
    observer.add_hook_once(Some(&subject), "a", Some(counting_hook(&count2)), None);

    subject.call("a", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count1), 1);
    assert_eq!(count_of(&count2), 1);
}

#[test]
fn once_without_a_callback_is_a_noop() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();

    observer.add_hook_once(Some(&subject), "a", None, None);
    subject.call("a", vec![]).unwrap();
    assert_eq!(observer.listening_count(), 0);
    assert_eq!(subject.hook_count("a"), 0);
}

#[test]
fn once_chains_with_plain_attach() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();
    let callback = counting_hook(&count);

    observer
        .add_hook_once(Some(&subject), "a", Some(callback.clone()), None)
        .add_hook(Some(&subject), "a", Some(callback), None);

    subject.call("a", vec![]).unwrap();
    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count), 3);
}
