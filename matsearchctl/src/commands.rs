use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use matsearch_client::app::ScanStart;
use matsearch_client::domains::media::ClipRequest;
use matsearch_client::domains::upload::{UploadOutcome, UploadRequest};
use matsearch_client::{AppConfig, BusyIndicator, Notifier, Session};
use matsearch_model::{SearchForm, SearchOutcome, TimeRange};

use crate::cli::{Command, QueryArgs};
use crate::console::{ConsoleBusyIndicator, ConsoleNotifier};
use crate::render;

/// Runs one command. Failures already reported through the notifier map to
/// a failing exit code; local problems (files, config) come back as errors.
pub async fn run(mut config: AppConfig, command: Command) -> Result<ExitCode> {
    if let Command::Status {
        interval: Some(interval),
        ..
    } = &command
    {
        config = config
            .with_poll_interval(*interval)
            .context("invalid --interval")?;
    }

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let busy: Arc<dyn BusyIndicator> = Arc::new(ConsoleBusyIndicator::default());
    let mut session = Session::connect(config, Arc::clone(&notifier), busy)
        .context("creating HTTP client")?;

    match command {
        Command::Status { watch: false, .. } => {
            let Ok(snapshot) = session.refresh_status().await else {
                return Ok(ExitCode::FAILURE);
            };
            print!("{}", render::status(&snapshot));
            Ok(ExitCode::SUCCESS)
        }
        Command::Status { watch: true, .. } => watch_status(&session).await,
        Command::Scan => {
            if session.refresh_status().await.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(match session.start_scan().await {
                Ok(ScanStart::Started) => ExitCode::SUCCESS,
                Ok(ScanStart::AlreadyRunning) => ExitCode::from(2),
                Err(_) => ExitCode::FAILURE,
            })
        }
        Command::CleanCache => Ok(exit_for(session.clean_cache().await.is_ok())),
        Command::Search {
            mode,
            query,
            image,
            json,
        } => {
            apply_query(session.form_mut(), &query);
            if let (Some(from), Some(to)) = (query.from, query.to) {
                let range = TimeRange::new(from, to).context("invalid --from/--to")?;
                session.set_time_range(Some(range));
            }
            let outcome = match image {
                Some(file) => {
                    let upload = UploadRequest::from_path(&file)
                        .with_context(|| format!("reading {}", file.display()))?;
                    session.search_with_upload(mode, &upload).await
                }
                None => session.search(mode).await,
            };
            print_outcome(outcome.ok(), json)
        }
        Command::Similar {
            mode,
            url,
            top_n,
            json,
        } => {
            if let Some(top_n) = top_n {
                session.form_mut().top_n = top_n;
            }
            let outcome = session.search_from_result(mode, &url).await;
            print_outcome(outcome.ok(), json)
        }
        Command::Upload { file } => {
            let upload = UploadRequest::from_path(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            debug!(
                "[matsearchctl] uploading {} ({}, {} bytes)",
                upload.file_name,
                upload.mime,
                upload.size()
            );
            let outcome = session.upload_image(&upload).await;
            Ok(exit_for(outcome == UploadOutcome::Success))
        }
        Command::Clip {
            path,
            start,
            end,
            output,
        } => {
            let clip = match ClipRequest::new(path, start, end) {
                Ok(clip) => clip,
                Err(failure) => {
                    notifier.error(&failure.to_string());
                    return Ok(ExitCode::FAILURE);
                }
            };
            let Ok(download) = session.download_clip(&clip).await else {
                return Ok(ExitCode::FAILURE);
            };
            let destination = output.unwrap_or_else(|| PathBuf::from(&download.file_name));
            std::fs::write(&destination, &download.bytes)
                .with_context(|| format!("writing {}", destination.display()))?;
            println!("{}", destination.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Models => {
            let Ok(catalog) = session.list_models().await else {
                return Ok(ExitCode::FAILURE);
            };
            print!("{}", render::models(&catalog));
            Ok(ExitCode::SUCCESS)
        }
        Command::UseModel { name } => Ok(match session.change_model(&name).await {
            Ok(response) => exit_for(response.success),
            Err(_) => ExitCode::FAILURE,
        }),
    }
}

async fn watch_status(session: &Session) -> Result<ExitCode> {
    let mut updates = session.subscribe_status();
    session.start();
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("waiting for Ctrl-C")?;
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    println!("{}", render::status(&snapshot));
                }
            }
        }
    }
    session.teardown();
    Ok(ExitCode::SUCCESS)
}

fn apply_query(form: &mut SearchForm, query: &QueryArgs) {
    form.positive = query.positive.clone();
    form.negative = query.negative.clone();
    form.path = query.path.clone();
    form.text = query.text.clone();
    form.img_id = query.img_id.clone();
    if let Some(top_n) = query.top_n {
        form.top_n = top_n;
    }
    if let Some(threshold) = query.positive_threshold {
        form.positive_threshold = threshold;
    }
    if let Some(threshold) = query.negative_threshold {
        form.negative_threshold = threshold;
    }
    if let Some(threshold) = query.image_threshold {
        form.image_threshold = threshold;
    }
}

fn print_outcome(outcome: Option<SearchOutcome>, json: bool) -> Result<ExitCode> {
    let Some(outcome) = outcome else {
        return Ok(ExitCode::FAILURE);
    };
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("encoding outcome")?
        );
    } else {
        print!("{}", render::outcome(&outcome));
    }
    Ok(ExitCode::SUCCESS)
}

fn exit_for(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
