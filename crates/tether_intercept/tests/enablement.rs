//! Hook-enablement: attaching to missing methods synthesizes them, plain
//! methods stay unhookable.


use serde_json::{Value, json};
use test_utils::{count_of, counter, counting_hook, hookable};
use tether_intercept::{Observer, Subject};

#[test]
fn attaching_to_a_missing_method_synthesizes_a_hookable_noop() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();

    observer.add_hook(Some(&subject), "ghost", Some(counting_hook(&count)), None);

    assert!(subject.is_hookable("ghost"));
    assert!(subject.contains_method("___ghost"));

    let result = subject.call("ghost", vec![]).unwrap();
    assert_eq!(result, Value::Null);
    assert_eq!(count_of(&count), 1);
}

#[test]
fn methods_added_by_attach_are_hookable_like_any_other() {
    let subject = hookable("hookable", &[]);
    let observer = Observer::new();
    let count = counter();
    let before_count = counter();

    observer.add_hook(Some(&subject), "ghost", Some(counting_hook(&count)), None);
    observer.add_hook_before(
        Some(&subject),
        "ghost",
        Some(counting_hook(&before_count)),
        None,
    );

    subject.call("ghost", vec![]).unwrap();
    assert_eq!(count_of(&count), 1);
    assert_eq!(count_of(&before_count), 1);
}

#[test]
fn plain_methods_cannot_be_hooked() {
    let subject = Subject::builder("mixed")
        .method("plain", |_args: &[Value]| json!("plain"))
        .build();
    let observer = Observer::new();
    let count = counter();

    observer.add_hook(Some(&subject), "plain", Some(counting_hook(&count)), None);

    assert_eq!(subject.hook_count("plain"), 0);
    assert_eq!(observer.listening_count(), 0);

    // The plain method keeps working, uninstrumented.
    assert_eq!(subject.call("plain", vec![]).unwrap(), json!("plain"));
    assert_eq!(count_of(&count), 0);
}

#[test]
fn prefixed_native_keys_cannot_be_hooked() {
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();

    observer.add_hook(Some(&subject), "___a", Some(counting_hook(&count)), None);

    assert_eq!(subject.hook_count("___a"), 0);
    assert_eq!(observer.listening_count(), 0);
}

#[test]
fn mixed_attach_skips_unhookable_names_only() {
    let subject = Subject::builder("mixed")
        .method("___a", |_args: &[Value]| Value::Null)
        .method("plain", |_args: &[Value]| Value::Null)
        .build();
    let observer = Observer::new();
    let count = counter();

    observer.add_hook(Some(&subject), "a plain", Some(counting_hook(&count)), None);

    assert_eq!(subject.hook_count("a"), 1);
    assert_eq!(subject.hook_count("plain"), 0);
    assert_eq!(observer.listening_count(), 1);

    subject.call("a", vec![]).unwrap();
    subject.call("plain", vec![]).unwrap();
    assert_eq!(count_of(&count), 1);
}

#[test]
fn before_and_after_names_become_callable_methods_of_their_own() {
    // Attaching "before:a" synthesizes a hookable no-op method of that
    // exact name, mirroring the registry's name-keyed view of phases.
    let subject = hookable("hookable", &["a"]);
    let observer = Observer::new();
    let count = counter();

    observer.add_hook_before(Some(&subject), "a", Some(counting_hook(&count)), None);

    assert!(subject.is_hookable("before:a"));
    subject.call("before:a", vec![]).unwrap();
    assert_eq!(count_of(&count), 1);

    subject.call("a", vec![]).unwrap();
    assert_eq!(count_of(&count), 2);
}
