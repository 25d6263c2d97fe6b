//! Error formatting utilities
//!
//! Renders errors with their cause chain for terminal output, and as
//! structured JSON for log records.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display, appending nested causes
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::Auth {
            reason,
            status: Some(status),
        } => format!("Authentication failed (HTTP {}): {}", status, reason),

        Error::Remote {
            operation,
            status: Some(status),
            message,
        } => format!("{} failed with HTTP {}: {}", operation, status, message),

        Error::Remote {
            operation,
            status: None,
            message,
        } => format!("{} failed before a response arrived: {}", operation, message),

        Error::RateLimit {
            operation,
            attempts,
            retry_after: Some(after),
        } => format!(
            "Rate limited during {} after {} attempts (provider asked for {}s)",
            operation, attempts, after
        ),

        Error::Validation {
            field,
            message,
            value: Some(val),
        } => format!(
            "Validation failed for {} (value: '{}'): {}",
            field, val, message
        ),

        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
        "retryable": error.is_retryable(),
    });

    if let Some(status) = error.status() {
        log_data["status"] = serde_json::Value::Number(status.into());
    }

    match error {
        Error::RateLimit {
            attempts,
            retry_after,
            ..
        } => {
            log_data["attempts"] = serde_json::Value::Number((*attempts).into());
            if let Some(after) = retry_after {
                log_data["retry_after"] = serde_json::Value::Number((*after).into());
            }
        }
        Error::BatchInterrupted {
            committed_chunks,
            total_chunks,
            tracks_committed,
            ..
        } => {
            log_data["committed_chunks"] = serde_json::Value::Number((*committed_chunks).into());
            log_data["total_chunks"] = serde_json::Value::Number((*total_chunks).into());
            log_data["tracks_committed"] = serde_json::Value::Number((*tracks_committed).into());
        }
        Error::PaginationLimit {
            max_pages,
            items_collected,
            ..
        } => {
            log_data["max_pages"] = serde_json::Value::Number((*max_pages).into());
            log_data["items_collected"] = serde_json::Value::Number((*items_collected).into());
        }
        _ => {}
    }

    log_data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_formatting() {
        let error = Error::remote("search_track", 400, "Bad search query");
        let formatted = format_error(&error);

        assert!(formatted.contains("HTTP 400"));
        assert!(formatted.contains("Bad search query"));
    }

    #[test]
    fn test_validation_error_shows_value() {
        let error = Error::validation_with_value("position", "--position takes exactly one track id", "2");

        assert_eq!(
            format_error(&error),
            "Validation failed for position (value: '2'): --position takes exactly one track id"
        );
    }

    #[test]
    fn test_nested_error_formatting() {
        let error = Error::BatchInterrupted {
            committed_chunks: 1,
            failed_chunk: 2,
            total_chunks: 3,
            tracks_committed: 100,
            source: Box::new(Error::remote("add_tracks_in_batch", 502, "Bad gateway")),
        };

        let formatted = format_error(&error);
        assert!(formatted.contains("chunk 2 of 3"));
        assert!(formatted.contains("Bad gateway"));
    }

    #[test]
    fn test_logging_format_for_rate_limit() {
        let error = Error::rate_limit("create_playlist", 4, Some(3));
        let log = format_error_for_logging(&error);

        assert_eq!(log["category"], "rate_limit");
        assert_eq!(log["retryable"], true);
        assert_eq!(log["status"], 429);
        assert_eq!(log["attempts"], 4);
        assert_eq!(log["retry_after"], 3);
    }

    #[test]
    fn test_logging_format_for_batch() {
        let error = Error::BatchInterrupted {
            committed_chunks: 2,
            failed_chunk: 3,
            total_chunks: 3,
            tracks_committed: 200,
            source: Box::new(Error::transport("add_tracks_in_batch", "reset by peer")),
        };
        let log = format_error_for_logging(&error);

        assert_eq!(log["committed_chunks"], 2);
        assert_eq!(log["tracks_committed"], 200);
        assert!(log.get("status").is_none());
    }
}
