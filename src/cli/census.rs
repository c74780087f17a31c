//! Census operation: read the repository list, query GitHub, write the report.

use std::io::{self, Write};

use boardcensus::config::ClientSettings;
use boardcensus::github::GraphqlTransport;
use boardcensus::{
    BatchDriver, BoardcensusConfig, CensusError, GraphqlCensusGateway, OctocrabTransport,
    RateLimitedClient, read_repository_list, write_report_file,
};

use super::output::write_run_summary;

/// Runs the census against GitHub.
///
/// # Errors
///
/// Returns [`CensusError::Configuration`] (or another configuration error)
/// before any network call when settings or the repository list are unusable,
/// and [`CensusError::Write`] when the report cannot be written. Failures of
/// individual repositories are reported in the summary, not returned.
pub async fn run(config: &BoardcensusConfig) -> Result<(), CensusError> {
    let mut stdout = io::stdout().lock();
    run_with_transport_builder(
        config,
        |settings| {
            OctocrabTransport::for_token(
                &settings.token,
                &settings.api_base,
                settings.request_timeout,
            )
        },
        &mut stdout,
    )
    .await
}

/// Runs the census using a custom transport builder.
///
/// This function is exposed for testing with scripted transports.
pub async fn run_with_transport_builder<T, F, W>(
    config: &BoardcensusConfig,
    build_transport: F,
    writer: &mut W,
) -> Result<(), CensusError>
where
    T: GraphqlTransport,
    F: FnOnce(&ClientSettings) -> Result<T, CensusError>,
    W: Write,
{
    let org = config.require_org()?;
    let repos_file = config.require_repos_file()?;
    let settings = config.client_settings()?;
    let repos = read_repository_list(&org, &repos_file)?;

    let transport = build_transport(&settings)?;
    let client = RateLimitedClient::new(transport, settings.retry_policy);
    let gateway = GraphqlCensusGateway::new(&client, settings.page_size, settings.max_pages);
    let outcome = BatchDriver::new(&gateway).run(&org, &repos).await;

    if client.retries() > 0 {
        tracing::info!("waited out {count} primary rate limits", count = client.retries());
    }

    let report_path = config.output_path();
    write_report_file(&report_path, &org, outcome.summaries())?;
    write_run_summary(writer, &outcome, &report_path)
}
