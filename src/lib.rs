//! A sales reporting dashboard.
//!
//! This library loads a CSV transaction log, aggregates it by date, month,
//! user and time of day, and serves the results as HTML pages with tables
//! and charts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use routing::build_router;
pub use transaction::{
    DateRange, RawTransaction, Selection, ThreeHourBucket, Transaction, TransactionSource,
    YearMonth, date_bounds, filter_by_date, filter_by_range, load_transactions,
    normalize_amount, parse_timestamp, prepare, read_transactions,
};

use crate::internal_server_error::InternalServerError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction log could not be opened or its metadata read.
    ///
    /// `reason` is the message from the underlying I/O error.
    #[error("could not read the data file \"{path}\": {reason}")]
    DataFileUnreadable {
        /// The path of the data file.
        path: String,
        /// Why the file could not be read.
        reason: String,
    },

    /// The CSV had issues that prevented it from being parsed, e.g. a missing
    /// column or a record with the wrong number of fields.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// Could not acquire the lock on the cached transactions.
    #[error("could not acquire the dataset lock")]
    DatasetLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::DataFileUnreadable { .. } | Error::InvalidCSV(_) => {
                InternalServerError::data_unavailable(self.to_string()).into_response()
            }
            Error::DatasetLockError => InternalServerError::default().into_response(),
        }
    }
}
