// SPDX-License-Identifier: MPL-2.0
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::tempdir;
use toast_lifecycle::config::{self, Config};
use toast_lifecycle::journal::{DismissReason, LifecycleEventKind};
use toast_lifecycle::notifications::{
    Kind, Phase, PromiseMessages, ToastId, ToastSpec, Toaster, ToasterConfig, Transition,
};
use tokio::time;

fn toaster() -> Toaster {
    Toaster::new(ToasterConfig::default()).expect("inside runtime")
}

fn removals(toaster: &Toaster, id: ToastId) -> usize {
    toaster
        .history(id)
        .iter()
        .filter(|e| e.kind.is_removal())
        .count()
}

#[tokio::test(start_paused = true)]
async fn visible_list_never_exceeds_capacity() {
    let toaster = toaster();
    let max_seen = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&max_seen);
    toaster.on_change(move |toasts| {
        let mut max = sink.lock().unwrap();
        *max = (*max).max(toasts.len());
    });

    for i in 0..40 {
        match i % 4 {
            0 => toaster.info(format!("info {i}")),
            1 => toaster.error(format!("error {i}")),
            2 => toaster.loading(format!("loading {i}")),
            _ => toaster
                .show(ToastSpec::warning(format!("short {i}")).duration(Duration::from_millis(30))),
        };
        if i % 7 == 0 {
            time::sleep(Duration::from_millis(120)).await;
        }
        assert!(toaster.len() <= 5);
    }
    assert_eq!(*max_seen.lock().unwrap(), 5);
}

#[tokio::test(start_paused = true)]
async fn overflow_evicts_first_created() {
    let toaster = toaster();
    let ids: Vec<_> = (0..5).map(|i| toaster.info(format!("n{i}"))).collect();

    let newest = toaster.info("n5");

    let visible: Vec<_> = toaster.toasts().iter().map(|t| t.id()).collect();
    let mut expected = vec![newest];
    expected.extend(ids[1..].iter().rev());
    assert_eq!(visible, expected);
    assert!(toaster.get(ids[0]).is_none());
    assert!(toaster
        .history(ids[0])
        .iter()
        .any(|e| e.kind == LifecycleEventKind::Evicted));
}

#[tokio::test(start_paused = true)]
async fn eviction_cancels_the_evicted_timer() {
    let toaster = Toaster::new(Config {
        max_notifications: Some(1),
        ..Config::default()
    }
    .toaster_config())
    .expect("inside runtime");

    let first = toaster.info("first");
    toaster.loading("second");
    assert_eq!(toaster.running_timers(), 0);

    time::sleep(Duration::from_secs(10)).await;
    assert_eq!(removals(&toaster, first), 1);
    assert!(!toaster
        .history(first)
        .iter()
        .any(|e| matches!(e.kind, LifecycleEventKind::Dismissed { .. })));
}

#[tokio::test(start_paused = true)]
async fn double_dismiss_purges_once() {
    let toaster = toaster();
    let id = toaster.info("x");

    assert!(toaster.dismiss(id));
    assert!(!toaster.dismiss(id));
    time::sleep(Duration::from_millis(250)).await;
    assert!(!toaster.dismiss(id));

    assert!(toaster.is_empty());
    assert_eq!(removals(&toaster, id), 1);
}

#[tokio::test(start_paused = true)]
async fn manual_dismiss_prevents_auto_dismiss() {
    let toaster = toaster();
    let id = toaster.show(ToastSpec::info("x").duration(Duration::from_millis(300)));

    time::sleep(Duration::from_millis(100)).await;
    toaster.dismiss(id);
    time::sleep(Duration::from_secs(2)).await;

    let dismissals: Vec<_> = toaster
        .history(id)
        .into_iter()
        .filter_map(|e| match e.kind {
            LifecycleEventKind::Dismissed { reason } => Some(reason),
            _ => None,
        })
        .collect();
    assert_eq!(dismissals, vec![DismissReason::Manual]);
    assert_eq!(removals(&toaster, id), 1);
}

#[tokio::test(start_paused = true)]
async fn purge_follows_dismiss_by_grace_period() {
    let toaster = toaster();
    let id = toaster.show(ToastSpec::info("x").duration(Duration::from_millis(1000)));

    time::sleep(Duration::from_secs(3)).await;
    let history = toaster.history(id);
    let dismissed = history
        .iter()
        .find(|e| matches!(e.kind, LifecycleEventKind::Dismissed { .. }))
        .expect("dismissed");
    let purged = history
        .iter()
        .find(|e| e.kind == LifecycleEventKind::Purged)
        .expect("purged");

    let grace = purged.at - dismissed.at;
    assert!(grace >= Duration::from_millis(200) && grace < Duration::from_millis(250));
    let lifetime = dismissed.at - history[0].at;
    assert!(lifetime >= Duration::from_millis(1000) && lifetime <= Duration::from_millis(1050));
}

#[tokio::test(start_paused = true)]
async fn zero_duration_dismisses_on_first_tick() {
    let toaster = toaster();
    let id = toaster.show(ToastSpec::info("blink").duration(Duration::ZERO));
    assert_eq!(toaster.get(id).map(|t| t.phase()), Some(Phase::Active));
    assert_eq!(toaster.remaining_fraction(id), Some(0.0));

    time::sleep(Duration::from_millis(1)).await;
    assert_eq!(toaster.get(id).map(|t| t.phase()), Some(Phase::Exiting));
    let dismissals: Vec<_> = toaster
        .history(id)
        .into_iter()
        .filter_map(|e| match e.kind {
            LifecycleEventKind::Dismissed { reason } => Some(reason),
            _ => None,
        })
        .collect();
    assert_eq!(dismissals, vec![DismissReason::Expired]);

    time::sleep(Duration::from_millis(250)).await;
    assert!(toaster.is_empty());
    assert_eq!(removals(&toaster, id), 1);
}

#[tokio::test(start_paused = true)]
async fn promise_round_trip() {
    let toaster = toaster();
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&kinds);
    toaster.on_change(move |toasts| {
        sink.lock()
            .unwrap()
            .extend(toasts.iter().map(|t| (t.kind(), t.message().to_string())));
    });

    let value = toaster
        .promise(
            async { Ok::<_, std::io::Error>(42) },
            PromiseMessages::new("p").success_with(|v: &i32| format!("got {v}")),
        )
        .await
        .expect("fulfilled");

    assert_eq!(value, 42);
    assert_eq!(toaster.len(), 1);
    assert_eq!(
        *kinds.lock().unwrap(),
        vec![
            (Kind::Pending, "p".to_string()),
            (Kind::Success, "got 42".to_string())
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn promise_rejection_propagates() {
    let toaster = toaster();
    let result = toaster
        .promise(
            async { Err::<(), _>(std::io::Error::other("x")) },
            PromiseMessages::new("p").error_with(|e: &std::io::Error| e.to_string()),
        )
        .await;

    let err = result.expect_err("rejected");
    assert_eq!(err.to_string(), "x");
    let toasts = toaster.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind(), Kind::Error);
    assert_eq!(toasts[0].message(), "x");
}

#[tokio::test(start_paused = true)]
async fn clear_stops_everything_immediately() {
    let toaster = toaster();
    toaster.info("a");
    toaster.error("b");
    toaster.loading("c");
    let exiting = toaster.success("d");
    toaster.dismiss(exiting);
    assert_eq!(toaster.running_timers(), 3);

    assert!(toaster.clear());
    assert!(toaster.toasts().is_empty());
    assert_eq!(toaster.running_timers(), 0);

    let journal_len = toaster.journal().len();
    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(toaster.journal().len(), journal_len);
}

#[tokio::test(start_paused = true)]
async fn update_after_exit_is_ignored() {
    let toaster = toaster();
    let id = toaster.loading("saving");
    toaster.dismiss(id);

    assert!(!toaster.update(
        id,
        Transition::Fulfil {
            message: "saved".into()
        }
    ));
    assert_eq!(toaster.get(id).map(|t| t.phase()), Some(Phase::Exiting));
    assert_eq!(toaster.get(id).map(|t| t.kind()), Some(Kind::Pending));
}

#[tokio::test(start_paused = true)]
async fn config_file_drives_toaster() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("toasts.toml");
    let settings = Config {
        max_notifications: Some(2),
        default_duration_ms: Some(1000),
        grace_period_ms: Some(0),
        ..Config::default()
    };
    config::save_to_path(&settings, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    let toaster = Toaster::new(loaded.toaster_config()).expect("inside runtime");

    toaster.info("a");
    toaster.info("b");
    toaster.info("c");
    assert_eq!(toaster.len(), 2);

    time::sleep(Duration::from_millis(1100)).await;
    assert!(toaster.is_empty());
}
