use std::{sync::Arc, time::Duration};

use anyhow::Result;
use bot::{
    Data,
    command::priority::{add, list, remove},
    config::Config,
    notifier,
    schedule::ReportSchedule,
};
use chrono::NaiveDateTime;
use chrono_tz::America::Sao_Paulo;
use log::info;
use market::{Database, PriceClient, ReportBuilder};
use poise::{Framework, FrameworkOptions};
use serenity::all::{ChannelId, ClientBuilder, GatewayIntents};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let db = Arc::new(Database::open(&config.db_path).expect("open database failed"));
    let price_client = Arc::new(PriceClient::from_env().expect("init price client failed"));
    let builder = Arc::new(ReportBuilder::new(
        Arc::clone(&db),
        Arc::clone(&price_client),
        config.normal_symbols.clone(),
        config.alert_threshold,
    ));

    let intents = GatewayIntents::non_privileged();
    let commands = vec![add(), remove(), list()];

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands,
            ..Default::default()
        })
        .setup({
            let db = Arc::clone(&db);
            let price_client = Arc::clone(&price_client);

            move |ctx, ready, framework| {
                Box::pin(async move {
                    info!(
                        "{} [{}] connected successfully!",
                        ready.user.name, ready.user.id
                    );

                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                    Ok(Data { db, price_client })
                })
            }
        })
        .build();

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .expect("Err creating client");

    let http = client.http.clone();
    let channel = ChannelId::new(config.channel_id);

    tokio::spawn(async move {
        if let Err(why) = client.start().await {
            log::error!("Client error: {why:?}");
        }
    });

    let mut sched = ReportSchedule::new(config.report_times.clone(), local_now());
    let mut tick = tokio::time::interval(Duration::from_secs(60));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let now = local_now();
                for _ in 0..sched.due(now) {
                    if let Err(e) = notifier::send_report(
                        http.clone(),
                        channel,
                        Arc::clone(&builder),
                        Arc::clone(&db),
                        Arc::clone(&price_client),
                    )
                    .await
                    {
                        log::error!("send_report failed: {e:?}");
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    info!("Shutdown complete.");
    Ok(())
}

fn local_now() -> NaiveDateTime {
    chrono::Utc::now().with_timezone(&Sao_Paulo).naive_local()
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
