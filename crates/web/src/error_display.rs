//! Error-to-display rendering

use std::fmt::Display;
use tracing::error;

use crate::element::Document;

/// Shown when an error has no message of its own
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Log an error and return the message to show the user
pub fn handle_error<E: Display + ?Sized>(err: &E) -> String {
    error!("Error: {}", err);
    error_message(err)
}

/// Like `handle_error`, and also mount an alert into the element `element_id`
///
/// A missing element is ignored. The message is inserted without escaping.
pub fn handle_error_in<E: Display + ?Sized>(
    err: &E,
    document: &mut Document,
    element_id: &str,
) -> String {
    let message = handle_error(err);

    if let Some(element) = document.get_element_by_id_mut(element_id) {
        element.set_inner_html(alert_html(&message));
    }

    message
}

/// Message to show for an error, without logging it
pub fn error_message<E: Display + ?Sized>(err: &E) -> String {
    let message = err.to_string();
    if message.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

fn alert_html(message: &str) -> String {
    format!("<div class=\"alert alert-danger\">{}</div>", message)
}
