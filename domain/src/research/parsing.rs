//! Structured-response parsing for research model output.
//!
//! The model is asked to respond with a JSON object, but output is not
//! always well-formed. Decoding is an explicit two-stage path:
//!
//! 1. [`decode_query_list`] / [`decode_serp_analysis`] — strict JSON decode,
//!    returning [`ParseError`] on malformed or unexpectedly shaped output.
//! 2. Line-based heuristic fallback: split the raw text into lines, strip
//!    list numbering, keep non-empty entries.
//!
//! When both stages produce nothing, the result is empty — never an error,
//! so a malformed model response degrades a single call rather than failing
//! the branch.

use serde::Deserialize;
use thiserror::Error;

/// Errors from the strict JSON decode stage
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct QueryListPayload {
    queries: Vec<String>,
}

/// Learnings plus follow-up questions extracted from scraped content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerpAnalysis {
    pub learnings: Vec<String>,
    pub follow_up_questions: Vec<String>,
}

#[derive(Deserialize)]
struct SerpAnalysisPayload {
    learnings: Vec<String>,
    #[serde(rename = "followUpQuestions", default)]
    follow_up_questions: Vec<String>,
}

/// Strict decode of a `{"queries": [...]}` payload.
pub fn decode_query_list(raw: &str) -> Result<Vec<String>, ParseError> {
    let payload: QueryListPayload = serde_json::from_str(raw)?;
    Ok(payload.queries)
}

/// Strict decode of a `{"learnings": [...], "followUpQuestions": [...]}` payload.
pub fn decode_serp_analysis(raw: &str) -> Result<SerpAnalysis, ParseError> {
    let payload: SerpAnalysisPayload = serde_json::from_str(raw)?;
    Ok(SerpAnalysis {
        learnings: payload.learnings,
        follow_up_questions: payload.follow_up_questions,
    })
}

/// Decode a query list, falling back to line extraction, capped at `max`.
pub fn parse_query_list(raw: &str, max: usize) -> Vec<String> {
    match decode_query_list(raw) {
        Ok(queries) => queries.into_iter().take(max).collect(),
        Err(_) => extract_lines(raw, max),
    }
}

/// Decode a SERP analysis, falling back to line extraction for the
/// learnings (follow-up questions are dropped in the fallback).
pub fn parse_serp_analysis(raw: &str, max_learnings: usize) -> SerpAnalysis {
    match decode_serp_analysis(raw) {
        Ok(mut analysis) => {
            analysis.learnings.truncate(max_learnings);
            analysis
        }
        Err(_) => SerpAnalysis {
            learnings: extract_lines(raw, max_learnings),
            follow_up_questions: Vec::new(),
        },
    }
}

/// Line-based heuristic extraction: one entry per non-empty line, with
/// leading list markers (`-`, digits, dots) stripped.
fn extract_lines(raw: &str, max: usize) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c == '-' || c == '.' || c.is_ascii_digit())
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .take(max)
        .collect()
}
