//! Integration tests for the pagewise collection controller

mod support;

mod cli_parse;
mod debounce_search;
mod http_fetcher;
mod pagination;
mod stale_responses;
