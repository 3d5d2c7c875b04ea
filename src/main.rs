// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::time::Duration;

use toast_lifecycle::config;
use toast_lifecycle::error::{Error, Result};
use toast_lifecycle::notifications::{
    Action, Message, PromiseMessages, ToastSpec, ToastView, Toaster,
};
use tokio::time::{self, Instant};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();
    let config_path: Option<PathBuf> = args
        .opt_value_from_str("--config")
        .map_err(|e| Error::Config(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = match config_path {
        Some(path) => config::load_from_path(&path)?,
        None => config::load()?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(config))
}

fn describe(toasts: &[ToastView]) -> String {
    if toasts.is_empty() {
        return "(empty)".to_string();
    }
    toasts
        .iter()
        .map(|toast| {
            let progress = toast
                .remaining_fraction()
                .map(|f| format!(" {:>3.0}%", f * 100.0))
                .unwrap_or_default();
            format!(
                "[{} {} {:?}{}] {}",
                toast.id(),
                toast.kind(),
                toast.phase(),
                progress,
                toast.message()
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Runs a scripted session and prints every change the renderer would see.
async fn run(config: config::Config) -> Result<()> {
    let toaster = Toaster::new(config.toaster_config())?;
    let started = Instant::now();
    toaster.on_change(move |toasts| {
        println!(
            "{:>6}ms  {}",
            started.elapsed().as_millis(),
            describe(toasts)
        );
    });

    toaster.info("Connected to project server");
    toaster.show(ToastSpec::warning("Two tasks are overdue").title("Schedule"));

    let undo = toaster.show(
        ToastSpec::success("Task archived").action(Action::new("Undo", |id| {
            println!("          undo requested for {id}");
        })),
    );
    time::sleep(Duration::from_millis(600)).await;
    toaster.handle_message(&Message::InvokeAction(undo));

    for i in 1..=4 {
        toaster.info(format!("Sync batch {i} uploaded"));
    }

    let upload = toaster.promise(
        async {
            time::sleep(Duration::from_millis(1500)).await;
            Ok::<_, Error>(12)
        },
        PromiseMessages::new("Uploading drawings…")
            .title("Uploads")
            .success_with(|count: &u32| format!("{count} drawings uploaded"))
            .error_with(|err: &Error| format!("Upload failed: {err}")),
    );
    upload.await?;

    let report = toaster.promise(
        async {
            time::sleep(Duration::from_millis(800)).await;
            Err::<(), _>(Error::Io("connection reset".into()))
        },
        PromiseMessages::new("Generating report…").error_with(|err: &Error| err.to_string()),
    );
    if let Err(err) = report.await {
        tracing::info!(%err, "report failed as scripted");
    }

    let mut updates = toaster.watch();
    while !toaster.is_empty() {
        if updates.changed().await.is_err() {
            break;
        }
    }
    println!("{} lifecycle events recorded", toaster.journal().len());
    Ok(())
}
