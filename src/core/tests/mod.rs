//! Cross-module scenario tests for the request lifecycle core.

mod support;
