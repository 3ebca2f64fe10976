//! `search` subcommand: one pipeline run, printed as pretty JSON on stdout.

use placefinder_core::AppConfig;
use placefinder_search::{run_search, PlaceSearch, QueryRewriter, SearchRequest, SearchResponse};

/// Builds the engine (and the rewriter unless `no_rewrite`) from `config`
/// and prints the requested page.
///
/// # Errors
///
/// Returns an error if the upstream clients cannot be built, the search
/// fails with a client error or timeout, or the response cannot be
/// serialized.
pub(crate) async fn run_search_command(
    config: &AppConfig,
    query: String,
    top_n: u32,
    page: u32,
    no_rewrite: bool,
) -> anyhow::Result<()> {
    let engine = PlaceSearch::from_app_config(config)?;
    let rewriter = if no_rewrite {
        None
    } else {
        QueryRewriter::from_app_config(config)?
    };

    let request = SearchRequest { query, top_n, page };
    let response = run_search(&engine, rewriter.as_ref(), &request).await?;

    tracing::info!(
        total = response.result.pagination.total_results,
        page = response.result.pagination.current_page,
        total_pages = response.result.pagination.total_pages,
        "search finished"
    );
    println!("{}", render(&response)?);
    Ok(())
}

fn render(response: &SearchResponse) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}
