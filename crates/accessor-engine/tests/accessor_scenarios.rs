//! Integration tests for accessor dispatch
//!
//! Tests cover:
//! - Virtual properties proxying another field (Time)
//! - Getter defaults shadowed by a directly assigned public field (Article)
//! - Lazy promotion and reset
//! - Read-only / write-only enforcement
//! - Inheritance overrides
//! - Façade enumeration
//! - Getter/lazy-getter conflicts under each policy

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use accessor_engine::{
    AccessError, AccessorEngine, ClassBuilder, ClassId, ClassRegistry, ConflictPolicy,
    EngineOptions, MethodError, NamingConvention, Object, ObjectModel, PropertyState,
    ResolutionError, Value, Visibility,
};

/// Route engine logs to the test harness; `RUST_LOG=accessor_types=warn` shows conflicts
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn int_arg(args: &[Value]) -> Result<i64, MethodError> {
    match args.first() {
        Some(Value::Int(n)) => Ok(*n),
        Some(other) => Err(MethodError::from(format!("expected int, got {}", other.kind_name()))),
        None => Err(MethodError::from("missing argument")),
    }
}

fn define_time(registry: &mut ClassRegistry) -> ClassId {
    registry.define(
        ClassBuilder::new("Time")
            .field("seconds", Visibility::Public, Some(Value::Int(120)))
            .method("get_minutes", Visibility::Protected, |obj, _| {
                let seconds = obj.field("seconds").and_then(Value::as_int).unwrap_or(0);
                Ok(Value::Int(seconds / 60))
            })
            .method("set_minutes", Visibility::Protected, |obj, args| {
                let minutes = int_arg(args)?;
                obj.set_field("seconds", Value::Int(minutes * 60));
                Ok(Value::Null)
            }),
    )
}

fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn define_article(registry: &mut ClassRegistry) -> ClassId {
    registry.define(
        ClassBuilder::new("Article")
            .field("title", Visibility::Public, Some(Value::from("Hello Big World")))
            .field("slug", Visibility::Public, None)
            .method("get_slug", Visibility::Protected, |obj, _| {
                let title = obj
                    .field("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Ok(Value::from(slugify(title)))
            }),
    )
}

fn model(registry: ClassRegistry) -> ObjectModel {
    ObjectModel::new(Arc::new(registry), EngineOptions::default())
}

#[test]
fn test_time_virtual_minutes() {
    let mut registry = ClassRegistry::new();
    let time = define_time(&mut registry);
    let model = model(registry);
    let mut obj = model.instantiate(time).unwrap();

    assert_eq!(model.get(&mut obj, "minutes").unwrap(), Value::Int(2));

    model.set(&mut obj, "minutes", Value::Int(4)).unwrap();
    assert_eq!(model.get(&mut obj, "seconds").unwrap(), Value::Int(240));
    assert_eq!(model.get(&mut obj, "minutes").unwrap(), Value::Int(4));
}

#[test]
fn test_time_engine_direct() {
    let mut registry = ClassRegistry::new();
    let time = define_time(&mut registry);
    let model = model(registry);
    let engine = model.engine();
    let mut obj = model.instantiate(time).unwrap();

    assert_eq!(engine.resolve_read(&mut obj, "minutes").unwrap(), Value::Int(2));
    engine
        .resolve_write(&mut obj, "minutes", Value::Int(4))
        .unwrap();
    assert_eq!(obj.visible_field("seconds"), Some(&Value::Int(240)));
    assert!(obj.slot("minutes").is_none());
}

#[test]
fn test_setter_failure_reports_method() {
    let mut registry = ClassRegistry::new();
    let time = define_time(&mut registry);
    let model = model(registry);
    let mut obj = model.instantiate(time).unwrap();

    assert_eq!(
        model
            .set(&mut obj, "minutes", Value::from("four"))
            .unwrap_err(),
        AccessError::MethodFailed {
            class: "Time".to_string(),
            method: "set_minutes".to_string(),
            message: "expected int, got string".to_string(),
        }
    );
    assert_eq!(obj.field("seconds"), Some(&Value::Int(120)));
}

#[test]
fn test_custom_naming_through_engine() {
    let mut registry = ClassRegistry::new();
    let id = registry.define(
        ClassBuilder::new("Legacy")
            .field("total", Visibility::Private, Some(Value::Int(3)))
            .method("fetch_total", Visibility::Protected, |obj, _| {
                Ok(obj.field("total").cloned().unwrap_or_default())
            })
            .method("get_total", Visibility::Protected, |_, _| Ok(Value::Int(-1))),
    );
    let naming = NamingConvention {
        getter_prefix: "fetch_".to_string(),
        ..NamingConvention::default()
    };
    let model = ObjectModel::new(Arc::new(registry), EngineOptions::with_naming(naming));
    let mut obj = model.instantiate(id).unwrap();

    assert_eq!(model.get(&mut obj, "total").unwrap(), Value::Int(3));
    assert_eq!(model.engine().list_facade_properties(id).unwrap(), vec!["total".to_string()]);
}

#[test]
fn test_article_slug_default_then_assigned_then_removed() {
    let mut registry = ClassRegistry::new();
    let article = define_article(&mut registry);
    let model = model(registry);
    let mut obj = model.instantiate(article).unwrap();

    assert_eq!(model.get(&mut obj, "slug").unwrap(), Value::from("hello-big-world"));

    model
        .set(&mut obj, "slug", Value::from("my-article"))
        .unwrap();
    assert_eq!(model.get(&mut obj, "slug").unwrap(), Value::from("my-article"));

    model
        .set(&mut obj, "title", Value::from("Something Else"))
        .unwrap();
    assert_eq!(model.get(&mut obj, "slug").unwrap(), Value::from("my-article"));

    model.unset(&mut obj, "slug").unwrap();
    assert_eq!(model.get(&mut obj, "slug").unwrap(), Value::from("something-else"));
}

#[test]
fn test_lazy_property_idempotence_and_reset() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut registry = ClassRegistry::new();
    let report = registry.define(
        ClassBuilder::new("Report")
            .field("rows", Visibility::Public, Some(Value::Int(3)))
            .method("lazy_get_summary", Visibility::Protected, move |obj, _| {
                let run = counter.fetch_add(1, Ordering::SeqCst);
                let rows = obj.field("rows").and_then(Value::as_int).unwrap_or(0);
                Ok(Value::from(format!("{} rows (run {})", rows, run)))
            }),
    );
    let model = model(registry);
    let mut obj = model.instantiate(report).unwrap();

    let first = model.get(&mut obj, "summary").unwrap();
    assert_eq!(first, Value::from("3 rows (run 0)"));
    assert_eq!(obj.slot("summary").unwrap().state, PropertyState::Cached(first.clone()));

    // Promoted value shadows the lazy getter, through the model and the engine alike
    model.set(&mut obj, "rows", Value::Int(10)).unwrap();
    assert_eq!(model.get(&mut obj, "summary").unwrap(), first);
    assert_eq!(model.engine().resolve_read(&mut obj, "summary").unwrap(), first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    model.unset(&mut obj, "summary").unwrap();
    assert_eq!(model.get(&mut obj, "summary").unwrap(), Value::from("10 rows (run 1)"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_lazy_property_preseeded_by_write() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut registry = ClassRegistry::new();
    let report = registry.define(ClassBuilder::new("Report").method(
        "lazy_get_summary",
        Visibility::Protected,
        move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::from("computed"))
        },
    ));
    let model = model(registry);
    let mut obj = model.instantiate(report).unwrap();

    model
        .set(&mut obj, "summary", Value::from("seeded"))
        .unwrap();
    assert_eq!(model.get(&mut obj, "summary").unwrap(), Value::from("seeded"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_read_only_rejects_every_write() {
    let mut registry = ClassRegistry::new();
    let id = registry.define(
        ClassBuilder::new("Clock")
            .field("ticks", Visibility::Private, Some(Value::Int(9)))
            .method("get_ticks", Visibility::Protected, |obj, _| {
                Ok(obj.field("ticks").cloned().unwrap_or_default())
            }),
    );
    let model = model(registry);
    let mut obj = model.instantiate(id).unwrap();

    assert_eq!(model.get(&mut obj, "ticks").unwrap(), Value::Int(9));
    for value in [Value::Int(1), Value::Null, Value::from("x"), Value::List(vec![])] {
        assert_eq!(
            model.set(&mut obj, "ticks", value).unwrap_err(),
            AccessError::NotWritable {
                property: "ticks".to_string(),
                class: "Clock".to_string(),
            }
        );
    }
    assert_eq!(obj.field("ticks"), Some(&Value::Int(9)));
}

#[test]
fn test_write_only_rejects_every_read() {
    let mut registry = ClassRegistry::new();
    let id = registry.define(
        ClassBuilder::new("Account")
            .field("password_hash", Visibility::Private, None)
            .method("set_password", Visibility::Protected, |obj, args| {
                let plain = args.first().and_then(Value::as_str).unwrap_or_default();
                obj.set_field("password_hash", Value::from(format!("hash:{}", plain.len())));
                Ok(Value::Null)
            }),
    );
    let model = model(registry);
    let mut obj = model.instantiate(id).unwrap();

    model
        .set(&mut obj, "password", Value::from("hunter2"))
        .unwrap();
    assert_eq!(obj.field("password_hash"), Some(&Value::from("hash:7")));

    let err = model.get(&mut obj, "password").unwrap_err();
    assert_eq!(
        err,
        AccessError::NotReadable {
            property: "password".to_string(),
            class: "Account".to_string(),
        }
    );
    assert!(!model.isset(&mut obj, "password").unwrap());
}

#[test]
fn test_virtual_reads_are_not_cached() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let source = ticks.clone();

    let mut registry = ClassRegistry::new();
    let id = registry.define(ClassBuilder::new("Counter").method(
        "get_next",
        Visibility::Private,
        move |_, _| Ok(Value::Int(source.fetch_add(1, Ordering::SeqCst) as i64)),
    ));
    let engine = AccessorEngine::new(Arc::new(registry));
    let mut obj = Object::new(id);

    assert_eq!(engine.resolve_read(&mut obj, "next").unwrap(), Value::Int(0));
    assert_eq!(engine.resolve_read(&mut obj, "next").unwrap(), Value::Int(1));
    assert_eq!(obj.slot_count(), 0);
}

#[test]
fn test_derived_getter_overrides_base() {
    let mut registry = ClassRegistry::new();
    let shape = registry.define(
        ClassBuilder::new("Shape")
            .method("get_label", Visibility::Protected, |_, _| Ok(Value::from("shape")))
            .method("get_sides", Visibility::Protected, |_, _| Ok(Value::Int(0))),
    );
    let square = registry.define(
        ClassBuilder::new("Square")
            .extends(shape)
            .method("get_sides", Visibility::Protected, |_, _| Ok(Value::Int(4))),
    );
    let model = model(registry);

    let mut base_obj = model.instantiate(shape).unwrap();
    let mut derived_obj = model.instantiate(square).unwrap();

    assert_eq!(model.get(&mut base_obj, "sides").unwrap(), Value::Int(0));
    assert_eq!(model.get(&mut derived_obj, "sides").unwrap(), Value::Int(4));
    assert_eq!(model.get(&mut derived_obj, "label").unwrap(), Value::from("shape"));
}

#[test]
fn test_facade_enumeration_completeness() {
    let mut registry = ClassRegistry::new();
    let base = registry.define(
        ClassBuilder::new("Entity")
            .field("id", Visibility::Protected, None)
            .field("created_at", Visibility::Private, None)
            .method("get_id", Visibility::Protected, |obj, _| {
                Ok(obj.field("id").cloned().unwrap_or_default())
            }),
    );
    let user = registry.define(
        ClassBuilder::new("User")
            .extends(base)
            .field("email", Visibility::Private, None)
            .field("name", Visibility::Public, None)
            .field("nickname", Visibility::Private, None)
            .method("get_email", Visibility::Protected, |_, _| Ok(Value::Null))
            .method("set_email", Visibility::Protected, |_, _| Ok(Value::Null))
            .method("get_name", Visibility::Protected, |_, _| Ok(Value::Null))
            .method("set_nickname", Visibility::Private, |_, _| Ok(Value::Null)),
    );
    let engine = AccessorEngine::new(Arc::new(registry));

    assert_eq!(
        engine.list_facade_properties(user).unwrap(),
        vec!["email".to_string(), "nickname".to_string(), "id".to_string()]
    );
    assert_eq!(engine.list_facade_properties(base).unwrap(), vec!["id".to_string()]);
}

#[test]
fn test_unknown_class_is_a_resolution_error() {
    let engine = AccessorEngine::new(Arc::new(ClassRegistry::new()));
    let mut obj = Object::new(3);

    assert!(matches!(
        engine.resolve_read(&mut obj, "x"),
        Err(AccessError::Resolution(_))
    ));
    assert!(engine.list_facade_properties(3).is_err());
}

fn define_ambiguous(registry: &mut ClassRegistry) -> ClassId {
    registry.define(
        ClassBuilder::new("Ambiguous")
            .method("get_total", Visibility::Protected, |_, _| Ok(Value::from("eager")))
            .method("lazy_get_total", Visibility::Protected, |_, _| Ok(Value::from("lazy"))),
    )
}

#[test]
fn test_conflict_prefers_lazy_by_default() {
    init_tracing();
    let mut registry = ClassRegistry::new();
    let id = define_ambiguous(&mut registry);
    let model = model(registry);
    let mut obj = model.instantiate(id).unwrap();

    assert_eq!(model.get(&mut obj, "total").unwrap(), Value::from("lazy"));
    assert_eq!(obj.slot("total").unwrap().state, PropertyState::Cached(Value::from("lazy")));
}

#[test]
fn test_conflict_rejected_by_policy() {
    init_tracing();
    let mut registry = ClassRegistry::new();
    let id = define_ambiguous(&mut registry);
    let model = ObjectModel::new(
        Arc::new(registry),
        EngineOptions::with_conflict_policy(ConflictPolicy::Reject),
    );
    let mut obj = model.instantiate(id).unwrap();

    assert_eq!(
        model.get(&mut obj, "total").unwrap_err(),
        AccessError::Resolution(ResolutionError::AmbiguousAccessor {
            class: "Ambiguous".to_string(),
            property: "total".to_string(),
        })
    );
    // Failed resolutions are not cached
    assert_eq!(model.engine().cached_class_count(), 0);
}
