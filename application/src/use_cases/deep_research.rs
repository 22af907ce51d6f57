//! Recursive web research engine.
//!
//! Turns a question into deduplicated learnings, source URLs, and a
//! synthesized report. Each level generates SERP queries, searches,
//! extracts learnings from the scraped pages, and recurses with halved
//! breadth and decremented depth, so the recursion tree is finite.
//!
//! Accumulated learnings and URLs are threaded through the recursion as an
//! explicit by-value accumulator, which keeps deduplication global across
//! sibling branches without shared mutable state. Failures inside one
//! sub-query are logged and skipped; siblings and the parent branch
//! continue.

use crate::ports::completion_gateway::ChatOptions;
use crate::ports::discussion_logger::{DiscussionEvent, DiscussionEventKind};
use crate::ports::search::SearchQuery;
use crate::use_cases::shared::{PanelDeps, instruction_message};
use colloquy_domain::{
    Message, Model, PanelPrompt, ResearchBounds, SerpAnalysis, parse_query_list,
    parse_serp_analysis, push_unique,
};
use futures::future::BoxFuture;
use tracing::{debug, warn};

/// Learnings extracted per sub-query.
const MAX_LEARNINGS_PER_QUERY: usize = 3;

/// Search results examined per sub-query.
const MAX_SEARCH_RESULTS: usize = 5;

/// Scraped page content is truncated to this many characters.
const MAX_CONTENT_CHARS: usize = 50_000;

/// Sentinel report when synthesis itself fails.
const REPORT_FAILURE: &str = "Error writing final report.";

/// The aggregate result of one research run.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    pub learnings: Vec<String>,
    pub visited_urls: Vec<String>,
    pub report: String,
}

/// Learnings and URLs accumulated across the whole recursion tree.
#[derive(Debug, Clone, Default)]
struct ResearchAccumulator {
    learnings: Vec<String>,
    visited_urls: Vec<String>,
}

/// Breadth/depth-bounded recursive research pipeline.
pub struct DeepResearch {
    deps: PanelDeps,
    model: Model,
}

impl DeepResearch {
    pub fn new(deps: PanelDeps, model: Model) -> Self {
        Self { deps, model }
    }

    /// Run the full pipeline for `query` and synthesize the report.
    pub async fn run(&self, query: &str, bounds: ResearchBounds) -> ResearchOutcome {
        let acc = self
            .explore(query.to_string(), bounds, ResearchAccumulator::default())
            .await;
        let report = self.write_report(query, &acc).await;
        ResearchOutcome {
            learnings: acc.learnings,
            visited_urls: acc.visited_urls,
            report,
        }
    }

    /// One recursion level: generate sub-queries, process each
    /// sequentially, recurse while depth and breadth remain.
    fn explore(
        &self,
        query: String,
        bounds: ResearchBounds,
        mut acc: ResearchAccumulator,
    ) -> BoxFuture<'_, ResearchAccumulator> {
        Box::pin(async move {
            let serp_queries = self
                .generate_serp_queries(&query, bounds.breadth, &acc.learnings)
                .await;

            for serp_query in serp_queries {
                let results = match self
                    .deps
                    .search
                    .text(&SearchQuery::new(&serp_query).with_max_results(MAX_SEARCH_RESULTS))
                    .await
                {
                    Ok(results) => results,
                    Err(e) => {
                        warn!(query = %serp_query, error = %e, "Search failed, skipping sub-query");
                        continue;
                    }
                };

                let urls: Vec<String> = results.iter().map(|r| r.href.clone()).collect();

                let mut contents = Vec::new();
                for result in &results {
                    if let Some(text) = self.deps.fetcher.fetch(&result.href).await {
                        contents.push(truncate_chars(text, MAX_CONTENT_CHARS));
                    }
                }
                debug!(
                    query = %serp_query,
                    contents = contents.len(),
                    "Processed search results"
                );

                let analysis = if contents.is_empty() {
                    SerpAnalysis::default()
                } else {
                    self.extract_learnings(&serp_query, &contents, bounds.breadth)
                        .await
                };

                push_unique(&mut acc.learnings, analysis.learnings.clone());
                push_unique(&mut acc.visited_urls, urls.clone());

                self.deps.logger.log(DiscussionEvent::new(
                    DiscussionEventKind::ResearchEvent,
                    serde_json::json!({
                        "query": serp_query,
                        "learnings": analysis.learnings,
                        "urls": urls,
                    }),
                ));

                let next = bounds.narrowed();
                if next.depth > 0 && next.breadth > 0 {
                    debug!(
                        breadth = next.breadth,
                        depth = next.depth,
                        "Researching deeper"
                    );
                    let next_query =
                        PanelPrompt::follow_up_query(&serp_query, &analysis.follow_up_questions);
                    acc = self.explore(next_query, next, acc).await;
                }
            }

            acc
        })
    }

    /// Step 1: ask the model for up to `breadth` distinct SERP queries.
    /// Degrades to an empty list on any failure.
    async fn generate_serp_queries(
        &self,
        query: &str,
        breadth: usize,
        learnings: &[String],
    ) -> Vec<String> {
        if breadth == 0 {
            return Vec::new();
        }
        let messages = [
            instruction_message(&self.model, PanelPrompt::researcher_system()),
            Message::user(PanelPrompt::serp_queries(query, breadth, learnings)),
        ];
        match self
            .deps
            .gateway
            .complete(&self.model, &messages, &ChatOptions::json())
            .await
        {
            Ok(completion) => {
                let queries = parse_query_list(&completion.content_or_default(), breadth);
                debug!(count = queries.len(), "Generated SERP queries");
                queries
            }
            Err(e) => {
                warn!(error = %e, "SERP query generation failed");
                Vec::new()
            }
        }
    }

    /// Step 3: summarize scraped contents into learnings and follow-ups.
    /// Degrades to an empty analysis on any failure.
    async fn extract_learnings(
        &self,
        query: &str,
        contents: &[String],
        breadth: usize,
    ) -> SerpAnalysis {
        let num_follow_ups = breadth.div_ceil(2);
        let messages = [
            instruction_message(&self.model, PanelPrompt::researcher_system()),
            Message::user(PanelPrompt::serp_learnings(
                query,
                contents,
                MAX_LEARNINGS_PER_QUERY,
                num_follow_ups,
            )),
        ];
        match self
            .deps
            .gateway
            .complete(&self.model, &messages, &ChatOptions::json())
            .await
        {
            Ok(completion) => parse_serp_analysis(
                &completion.content_or_default(),
                MAX_LEARNINGS_PER_QUERY,
            ),
            Err(e) => {
                warn!(query = %query, error = %e, "Learning extraction failed");
                SerpAnalysis::default()
            }
        }
    }

    /// Step 5: synthesize the final report and append the source list,
    /// one deduplicated URL per line.
    async fn write_report(&self, query: &str, acc: &ResearchAccumulator) -> String {
        let messages = [
            instruction_message(&self.model, PanelPrompt::researcher_system()),
            Message::user(PanelPrompt::research_report(query, &acc.learnings)),
        ];
        let body = match self
            .deps
            .gateway
            .complete(&self.model, &messages, &ChatOptions::default())
            .await
        {
            Ok(completion) => completion.content_or_default(),
            Err(e) => {
                warn!(error = %e, "Report synthesis failed");
                REPORT_FAILURE.to_string()
            }
        };

        let sources: String = acc
            .visited_urls
            .iter()
            .map(|url| format!("- {}", url))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n## Sources\n\n{}", body, sources)
    }
}

/// Truncate to a character budget without splitting a code point.
fn truncate_chars(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text
    } else {
        text.chars().take(max_chars).collect()
    }
}
