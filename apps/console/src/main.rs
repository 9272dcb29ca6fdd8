use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod console;
mod devices;
mod password;

use auth_cell::{Credentials, SessionEntryFlow, SurveyFlush};
use shared_config::AppConfig;
use shared_storage::SessionContext;
use video_conferencing_cell::{
    ConsultationMeetingFlow, EndOutcome, MeetingRoute, MeetingServices, StartOutcome,
};

use crate::cli::{Cli, Command};
use crate::console::{ConsoleInput, ConsoleUi};
use crate::devices::{LoggingMeetingSdk, PlaceholderDevices};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    cli.apply_overrides(&mut config);
    info!("Using backend {}", config.api_base_url);
    let session = SessionContext::open(&config).context("failed to open session storage")?;
    let input = ConsoleInput::new();
    let ui = ConsoleUi::new(input.clone());

    match cli.command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => crate::password::prompt_password("Password: ").await?,
            };
            let flow = SessionEntryFlow::from_config(&config, session, ui);
            let mut credentials = Credentials::new(username, password);
            let success = flow.submit(&mut credentials).await?;
            report_login(&success.redirect_to, &success.survey);
        }
        Command::GoogleLogin { credential } => {
            let flow = SessionEntryFlow::from_config(&config, session, ui);
            let success = flow.submit_google(&credential).await?;
            report_login(&success.redirect_to, &success.survey);
        }
        Command::Logout => {
            let flow = SessionEntryFlow::from_config(&config, session, ui);
            let next = flow.logout()?;
            println!("Signed out. Continue at {}", next);
        }
        Command::Meet { meeting_id, appointment_id, name, no_mic, no_webcam } => {
            let services = MeetingServices::from_config(
                &config,
                &session,
                Arc::new(LoggingMeetingSdk),
                Arc::new(PlaceholderDevices),
            )?;
            let route = MeetingRoute::new(meeting_id, appointment_id);
            if session.access_token()?.is_none() {
                // A later `login` continues back into this meeting.
                info!("Not signed in, joining as a guest");
                session.set_redirect_target(&format!("/meeting?meetingId={}", route.room_id))?;
            }
            let mut flow = ConsultationMeetingFlow::new(route, session, services, ui.clone(), ui);

            if let Some(name) = name {
                flow.set_display_name(name);
            }
            if no_mic {
                flow.toggle_mic().await;
            }
            if no_webcam {
                flow.toggle_webcam().await;
            }

            flow.prepare().await.context("meeting is not available")?;
            run_meeting(&mut flow, &input).await;
        }
    }

    Ok(())
}

fn report_login(redirect_to: &str, survey: &SurveyFlush) {
    match survey {
        SurveyFlush::Submitted => println!("Your survey answers were submitted."),
        SurveyFlush::Failed => println!("Your survey answers could not be submitted yet."),
        SurveyFlush::Nothing | SurveyFlush::AlreadySubmitted => {}
    }
    println!("Signed in. Continue at {}", redirect_to);
}

async fn run_meeting(flow: &mut ConsultationMeetingFlow, input: &ConsoleInput) {
    println!(
        "Meeting {} ready as {}. Commands: join, mic, cam, end, leave",
        flow.route().room_id,
        flow.settings().display_name
    );

    loop {
        let line = tokio::select! {
            line = input.prompt("> ") => line,
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted");
                None
            }
        };

        let Some(line) = line else {
            flow.leave();
            break;
        };

        match line.trim() {
            "" => {}
            "join" | "start" => match flow.start().await {
                Ok(StartOutcome::Joined { appointment_started }) => {
                    if appointment_started {
                        println!("Appointment started.");
                    }
                    println!("Joined the meeting.");
                }
                Ok(StartOutcome::Declined) => println!("Not joined."),
                Ok(StartOutcome::LifecycleUpdateFailed | StartOutcome::JoinFailed) => {}
                Err(e) => println!("{}", e),
            },
            "mic" => {
                let on = flow.toggle_mic().await;
                println!("Microphone {}", if on { "on" } else { "off" });
            }
            "cam" => {
                let on = flow.toggle_webcam().await;
                println!("Camera {}", if on { "on" } else { "off" });
            }
            "end" => match flow.end().await {
                Ok(EndOutcome::Left { appointment_ended }) => {
                    if appointment_ended {
                        println!("Appointment completed.");
                    }
                    break;
                }
                Ok(EndOutcome::Cancelled | EndOutcome::LifecycleUpdateFailed) => {}
                Err(e) => println!("{}", e),
            },
            "leave" => {
                flow.leave();
                break;
            }
            other => println!("Unknown command: {}", other),
        }
    }

    info!("Meeting closed");
}
