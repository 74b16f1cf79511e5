use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use course_client::{CourseClient, FlowError, LectureEdit, MediaFile, StaticIdentityProvider};
use shared::domain::{CourseId, LectureId};
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tracing_subscriber::EnvFilter;

mod config;
mod report;

use config::load_settings;
use report::{print_notices, render_catalog, render_lectures, render_profile, ErrorCategory};

#[derive(Parser, Debug)]
#[command(about = "Sign in to the course platform and manage lectures")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    media_url: Option<String>,
    #[arg(long)]
    email: String,
    #[arg(long, required_unless_present = "provider_name")]
    password: Option<String>,
    /// Sign in through the identity provider with this display name instead of a password.
    #[arg(long, conflicts_with = "password")]
    provider_name: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and show the profile.
    Login,
    /// Sign in and list enrolled courses.
    Courses,
    EditLecture {
        #[arg(long)]
        course_id: String,
        #[arg(long)]
        lecture_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        preview_free: bool,
        #[arg(long)]
        video: Option<PathBuf>,
    },
    RemoveLecture {
        #[arg(long)]
        course_id: String,
        #[arg(long)]
        lecture_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<FlowError>() {
            // The failure itself was already printed as a notice.
            Some(flow) => {
                let category = ErrorCategory::classify(flow);
                eprintln!("hint: {}", category.hint());
                ExitCode::from(category.exit_code())
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(args: Args) -> Result<()> {
    let mut settings = load_settings()?;
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(url) = args.media_url {
        settings.media_url = url;
    }
    tracing::debug!(
        server_url = %settings.server_url,
        media_url = %settings.media_url,
        "loaded settings"
    );

    let client = CourseClient::new(settings.client_config()?)
        .context("failed to build http client")?;
    let mut events = client.subscribe_events();

    let outcome = execute(
        &client,
        &args.email,
        args.password.as_deref(),
        args.provider_name.as_deref(),
        args.command,
    )
    .await;
    print_notices(&mut events);
    outcome?;

    println!("now at {}", client.navigator().current());
    Ok(())
}

async fn execute(
    client: &Arc<CourseClient>,
    email: &str,
    password: Option<&str>,
    provider_name: Option<&str>,
    command: Command,
) -> Result<()> {
    match provider_name {
        Some(name) => {
            let provider = StaticIdentityProvider::new(name, email);
            client.login_with_provider(&provider).await?;
        }
        None => {
            client
                .login_with_password(email, password.unwrap_or_default())
                .await?;
        }
    }

    match command {
        Command::Login => println!("{}", render_profile(&client.users().snapshot())),
        Command::Courses => println!("{}", render_catalog(&client.catalog())),
        Command::EditLecture {
            course_id,
            lecture_id,
            title,
            preview_free,
            video,
        } => {
            let mut edit = LectureEdit::new(
                CourseId::new(course_id),
                LectureId::new(lecture_id),
                title,
            )
            .preview_free(preview_free);
            if let Some(path) = video {
                let media = MediaFile::from_path(&path)
                    .await
                    .with_context(|| format!("failed to read video '{}'", path.display()))?;
                edit = edit.with_video(media);
            }

            let progress = spawn_progress_printer(client);
            let result = client.update_lecture(edit).await;
            progress.abort();
            println!("{}", render_lectures(&result?));
        }
        Command::RemoveLecture {
            course_id,
            lecture_id,
        } => {
            client
                .remove_lecture(&CourseId::new(course_id), &LectureId::new(lecture_id))
                .await?;
        }
    }
    Ok(())
}

fn spawn_progress_printer(client: &CourseClient) -> JoinHandle<()> {
    let mut updates = WatchStream::from_changes(client.upload_progress());
    tokio::spawn(async move {
        let mut last = None;
        while let Some(progress) = updates.next().await {
            let percent = progress.percent();
            if last != Some(percent) {
                eprintln!("upload: {percent}%");
                last = Some(percent);
            }
        }
    })
}
