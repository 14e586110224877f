// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for reloading and change notification.

mod common;

use common::{root_over, temp_file, Counter, MockProvider};
use layercfg::prelude::*;
use std::fs;

#[cfg(feature = "reload")]
use std::thread;
#[cfg(feature = "reload")]
use std::time::{Duration, Instant};

#[test]
fn test_reload_clears_stale_keys() {
    let provider = MockProvider::new("mock")
        .with_value("keep", "1")
        .with_value("drop", "2")
        .shared();
    let root = root_over(&[&provider]);
    assert_eq!(root.get("drop").as_deref(), Some("2"));

    provider.set_backing(&[("keep", "10")]);
    root.reload().unwrap();

    assert_eq!(root.get("keep").as_deref(), Some("10"));
    assert_eq!(root.get("drop"), None);
    assert_eq!(provider.try_get("drop"), None);
}

#[test]
fn test_reload_token_fires_exactly_once() {
    let root = ConfigBuilder::new().with_in_memory([("a", "1")]).build().unwrap();
    let counter = Counter::default();

    let token = root.reload_token();
    let _registration = token.register(counter.callback());

    root.reload().unwrap();
    assert_eq!(counter.get(), 1);
    assert!(token.has_changed());

    root.reload().unwrap();
    assert_eq!(counter.get(), 1);

    let next = root.reload_token();
    assert!(!next.has_changed());
    assert!(!next.same_token(&token));
}

#[test]
fn test_disposed_registration_never_runs() {
    let root = ConfigBuilder::new().with_in_memory([("a", "1")]).build().unwrap();
    let counter = Counter::default();

    let registration = root.reload_token().register(counter.callback());
    registration.dispose();
    root.reload().unwrap();

    assert_eq!(counter.get(), 0);
}

#[test]
fn test_on_change_follows_every_reload() {
    let root = ConfigBuilder::new().with_in_memory([("a", "1")]).build().unwrap();
    let counter = Counter::default();

    let producer_root = root.clone();
    let subscription = on_change(move || producer_root.reload_token(), counter.callback());

    for _ in 0..3 {
        root.reload().unwrap();
    }
    assert_eq!(counter.get(), 3);

    drop(subscription);
    root.reload().unwrap();
    assert_eq!(counter.get(), 3);
}

#[test]
fn test_provider_token_propagates_to_root() {
    let provider = MockProvider::new("watched")
        .with_value("v", "1")
        .with_reload_token()
        .shared();
    let root = root_over(&[&provider]);
    let counter = Counter::default();
    let _registration = root.reload_token().register(counter.callback());

    // A provider reloading on its own, as a watcher would.
    provider.set_backing(&[("v", "2")]);
    provider.load().unwrap();

    assert_eq!(counter.get(), 1);
    assert_eq!(root.get("v").as_deref(), Some("2"));
}

#[test]
fn test_observer_sees_new_data_when_notified() {
    let provider = MockProvider::new("watched")
        .with_value("v", "old")
        .with_reload_token()
        .shared();
    let root = root_over(&[&provider]);

    let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
    let observer_root = root.clone();
    let observed = std::sync::Arc::clone(&seen);
    let _registration = root.reload_token().register(move || {
        *observed.lock().unwrap() = observer_root.get("v");
    });

    provider.set_backing(&[("v", "new")]);
    provider.load().unwrap();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("new"));
}

#[test]
fn test_reload_failure_propagates_and_keeps_token() {
    let provider = MockProvider::new("flaky").with_value("k", "v").shared();
    let root = root_over(&[&provider]);
    let token = root.reload_token();

    provider.fail_loads(true);
    assert!(matches!(root.reload(), Err(ConfigError::SourceError { .. })));
    assert!(!token.has_changed());
    assert_eq!(root.get("k").as_deref(), Some("v"));
}

#[test]
#[cfg(feature = "yaml")]
fn test_manual_file_reload() {
    let file = temp_file("key: initial_value\nother: x\n", ".yaml");
    let root = ConfigBuilder::new().with_yaml_file(file.path()).build().unwrap();
    assert_eq!(root.get("key").as_deref(), Some("initial_value"));

    fs::write(file.path(), "key: updated_value\n").unwrap();
    assert_eq!(root.get("key").as_deref(), Some("initial_value"));

    root.reload().unwrap();
    assert_eq!(root.get("key").as_deref(), Some("updated_value"));
    assert_eq!(root.get("other"), None);
}

#[test]
#[cfg(feature = "yaml")]
fn test_load_error_handler_can_ignore() {
    use layercfg::adapters::{FileLoadErrorContext, YamlFileSource};
    use std::sync::Arc;

    let file = temp_file("key: [unclosed\n", ".yaml");
    let counter = Counter::default();
    let on_error = counter.callback();

    let root = ConfigBuilder::new()
        .with_in_memory([("key", "fallback")])
        .add(
            YamlFileSource::new(file.path()).on_load_error(Arc::new(
                move |ctx: &mut FileLoadErrorContext<'_>| {
                    on_error();
                    ctx.ignore = true;
                },
            )),
        )
        .build()
        .unwrap();

    assert_eq!(counter.get(), 1);
    assert_eq!(root.get("key").as_deref(), Some("fallback"));
}

#[test]
#[cfg(feature = "yaml")]
fn test_builder_error_handler_is_shared() {
    use layercfg::adapters::FileLoadErrorContext;
    use std::sync::Arc;

    let counter = Counter::default();
    let on_error = counter.callback();

    let result = ConfigBuilder::new()
        .set_file_load_error_handler(Arc::new(move |_ctx: &mut FileLoadErrorContext<'_>| on_error()))
        .with_yaml_file("/nonexistent/layercfg/app.yaml")
        .build();

    assert!(matches!(result, Err(ConfigError::SourceNotFound { .. })));
    assert_eq!(counter.get(), 1);
}

#[test]
#[cfg(feature = "yaml")]
fn test_optional_missing_file_is_empty() {
    use layercfg::adapters::YamlFileSource;

    let root = ConfigBuilder::new()
        .add(YamlFileSource::new("/nonexistent/layercfg/app.yaml").optional(true))
        .build()
        .unwrap();

    assert!(root.children().is_empty());
}

#[cfg(feature = "reload")]
fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    false
}

#[test]
#[cfg(all(feature = "reload", feature = "yaml"))]
fn test_file_change_reloads_root() {
    use layercfg::adapters::YamlFileSource;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, "key: initial\n").unwrap();

    let root = ConfigBuilder::new()
        .add(
            YamlFileSource::new(&path)
                .reload_on_change(true)
                .reload_delay(Duration::from_millis(50)),
        )
        .build()
        .unwrap();
    let counter = Counter::default();
    let producer_root = root.clone();
    let _subscription = on_change(move || producer_root.reload_token(), counter.callback());

    thread::sleep(Duration::from_millis(100));
    fs::write(&path, "key: changed\n").unwrap();

    assert!(wait_for(|| root.get("key").as_deref() == Some("changed")));
    assert!(wait_for(|| counter.get() >= 1));
}

#[test]
#[cfg(all(feature = "reload", feature = "yaml"))]
fn test_deleted_file_reloads_as_empty() {
    use layercfg::adapters::YamlFileSource;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, "key: present\n").unwrap();

    let root = ConfigBuilder::new()
        .add(
            YamlFileSource::new(&path)
                .reload_on_change(true)
                .reload_delay(Duration::from_millis(50)),
        )
        .build()
        .unwrap();
    assert_eq!(root.get("key").as_deref(), Some("present"));

    thread::sleep(Duration::from_millis(100));
    fs::remove_file(&path).unwrap();

    assert!(wait_for(|| root.get("key").is_none()));
}

#[test]
#[cfg(feature = "yaml")]
fn test_reloads_racing_file_rewrites_never_mix_versions() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, "a: 0\nb: 0\n").unwrap();

    let root = ConfigBuilder::new().with_yaml_file(&path).build().unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let dir = dir.path().to_path_buf();
        let path = path.clone();
        std::thread::spawn(move || {
            for version in 1..=200 {
                let staged = dir.join("app.yaml.tmp");
                fs::write(&staged, format!("a: {version}\nb: {version}\n")).unwrap();
                fs::rename(&staged, &path).unwrap();
            }
        })
    };

    let reloader = {
        let root = root.clone();
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            let mut reloads = 0;
            loop {
                root.reload().unwrap();
                root.set("touched", Some("yes")).unwrap();
                reloads += 1;
                if done.load(Ordering::SeqCst) {
                    break reloads;
                }
            }
        })
    };

    let reader = {
        let root = root.clone();
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            let mut checks = 0;
            loop {
                for provider in root.providers() {
                    let entries = provider.data().snapshot();
                    let a = entries.get(&ConfigKey::from("a")).cloned().flatten();
                    let b = entries.get(&ConfigKey::from("b")).cloned().flatten();
                    assert!(a.is_some());
                    assert_eq!(a, b);
                }
                checks += 1;
                if done.load(Ordering::SeqCst) {
                    break checks;
                }
            }
        })
    };

    writer.join().unwrap();
    done.store(true, Ordering::SeqCst);
    assert!(reloader.join().unwrap() > 0);
    assert!(reader.join().unwrap() > 0);

    root.reload().unwrap();
    assert_eq!(root.get("a").as_deref(), Some("200"));
    assert_eq!(root.get("b").as_deref(), Some("200"));
}
