use axum::Router;
use config::Config;
use envconfig::Envconfig;
use eyre::Result;
use futures::future::{select, Either};
use purge::Purger;
use std::time::Duration;

use purge_common::config::JobConfiguration;
use purge_common::job::PurgeContactsJob;
use purge_common::metrics;

mod config;
mod handlers;
mod purge;

async fn listen(app: Router, bind: String) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

async fn purge_loop(purger: Purger, interval_secs: u64) -> Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        purger.purge();
    }
}

fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::init_from_env()?;
    if config.purge_interval_secs == 0 {
        eyre::bail!("PURGE_INTERVAL_SECS must be greater than zero");
    }

    let job_config = JobConfiguration::from_settings(config.job_settings())?;
    tracing::info!(
        token_url = %job_config.token_url(),
        task_url = %job_config.task_url(),
        default_cutoff_days = job_config.default_cutoff_days().get(),
        interval_secs = config.purge_interval_secs,
        "starting purge-janitor"
    );

    let job = PurgeContactsJob::new(job_config, http_client(config.http_timeout())?);
    let purger = Purger::new(job, config.command(), config.schedule());
    let purge_loop = Box::pin(purge_loop(purger, config.purge_interval_secs));

    let recorder_handle = metrics::setup_metrics_recorder()?;
    let app = handlers::app(Some(recorder_handle));
    let http_server = Box::pin(listen(app, config.bind()));

    match select(http_server, purge_loop).await {
        Either::Left((listen_result, _)) => match listen_result {
            Ok(_) => {}
            Err(e) => tracing::error!("failed to start purge-janitor http server, {}", e),
        },
        Either::Right((purge_result, _)) => match purge_result {
            Ok(_) => {}
            Err(e) => tracing::error!("purge-janitor purge loop exited, {}", e),
        },
    };

    Ok(())
}
