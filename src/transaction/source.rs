//! Loads the transaction log from a CSV file and caches the prepared rows.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::SystemTime,
};

use crate::{
    Error,
    transaction::models::{RawTransaction, Transaction, prepare},
};

/// The columns every transaction log must have.
const REQUIRED_COLUMNS: [&str; 5] = ["Unique Code", "Username", "Date", "Time", "Amount"];

/// Read and prepare transactions from CSV text.
///
/// The first row must be a header containing the columns `Unique Code`,
/// `Username`, `Date`, `Time` and `Amount`. Other columns are ignored.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the header row is absent, a required column
/// is missing or a record cannot be read. Rows with bad dates or amounts are not errors, see
/// [prepare].
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;

    let missing_columns: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();

    if !missing_columns.is_empty() {
        return Err(Error::InvalidCSV(format!(
            "missing required columns: {}",
            missing_columns.join(", ")
        )));
    }

    let raw_transactions = csv_reader
        .deserialize::<RawTransaction>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;

    Ok(prepare(raw_transactions))
}

/// Read and prepare transactions from the CSV file at `path`.
///
/// # Errors
/// Returns [Error::DataFileUnreadable] if the file cannot be opened and
/// [Error::InvalidCSV] if its contents are not a valid transaction log.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, Error> {
    let file = File::open(path).map_err(|error| Error::DataFileUnreadable {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;

    read_transactions(file)
}

/// Identifies a version of the data file so stale caches can be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileVersion {
    modified: Option<SystemTime>,
    length: u64,
}

impl FileVersion {
    fn of(path: &Path) -> Result<Self, Error> {
        let metadata = std::fs::metadata(path).map_err(|error| Error::DataFileUnreadable {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;

        Ok(Self {
            modified: metadata.modified().ok(),
            length: metadata.len(),
        })
    }
}

#[derive(Debug)]
struct CachedTransactions {
    version: FileVersion,
    transactions: Arc<[Transaction]>,
}

/// The transaction log backing the dashboard.
///
/// The prepared rows are kept in memory and reused until the file's
/// modification time or length changes. Callers get a shared, read-only
/// view of the rows.
#[derive(Debug, Clone)]
pub struct TransactionSource {
    path: PathBuf,
    cache: Arc<Mutex<Option<CachedTransactions>>>,
}

impl TransactionSource {
    /// Create a source for the CSV file at `path`.
    ///
    /// The file is not read until [TransactionSource::load] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// The path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the prepared transactions, reading the file if it changed since
    /// the last call.
    ///
    /// # Errors
    /// Returns [Error::DataFileUnreadable] or [Error::InvalidCSV] if the file
    /// cannot be loaded, or [Error::DatasetLockError] if the cache lock is
    /// poisoned.
    pub fn load(&self) -> Result<Arc<[Transaction]>, Error> {
        let version = FileVersion::of(&self.path).inspect_err(|error| {
            tracing::error!(
                "could not read transaction log {}: {error}",
                self.path.display()
            )
        })?;

        let mut cache = self
            .cache
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire dataset lock: {error}"))
            .map_err(|_| Error::DatasetLockError)?;

        if let Some(cached) = cache.as_ref().filter(|cached| cached.version == version) {
            tracing::debug!(
                "using cached transactions from {}",
                self.path.display()
            );
            return Ok(cached.transactions.clone());
        }

        let transactions: Arc<[Transaction]> = load_transactions(&self.path)
            .inspect_err(|error| {
                tracing::error!(
                    "could not load transaction log {}: {error}",
                    self.path.display()
                )
            })?
            .into();

        log_load_summary(&self.path, &transactions);

        *cache = Some(CachedTransactions {
            version,
            transactions: transactions.clone(),
        });

        Ok(transactions)
    }
}

fn log_load_summary(path: &Path, transactions: &[Transaction]) {
    let invalid_timestamps = transactions
        .iter()
        .filter(|transaction| transaction.timestamp.is_none())
        .count();
    let invalid_amounts = transactions
        .iter()
        .filter(|transaction| transaction.amount.is_none())
        .count();

    tracing::info!(
        "Loaded {} transactions from {} ({invalid_timestamps} with invalid date/time, \
        {invalid_amounts} with invalid amounts)",
        transactions.len(),
        path.display()
    );
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::{
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// Write `contents` to a fresh file in the system temp directory.
    pub(crate) fn write_temp_csv(contents: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let path = std::env::temp_dir().join(format!(
            "sales_dashboard_test_{}_{}.csv",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub(crate) const SAMPLE_CSV: &str = "\
Unique Code,Username,Date,Time,Amount
T001,alice,01/05/2024,10:00:00 AM,100
T002,bob,01/05/2024,23:30:00 PM,50
T003,carol,02/05/2024,01:15:00 PM,\"1,234.50\"
T004,alice,15/06/2024,08:45:10 PM,20.25
T005,bob,15/06/2024,08:00:00 AM,oops
";
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use time::macros::datetime;

    use crate::Error;

    use super::{
        TransactionSource, load_transactions, read_transactions,
        test_utils::{SAMPLE_CSV, write_temp_csv},
    };

    #[test]
    fn reads_all_rows_including_invalid_ones() {
        let transactions = read_transactions(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 5);
        assert_eq!(transactions[0].id, "T001");
        assert_eq!(
            transactions[0].timestamp,
            Some(datetime!(2024-05-01 10:00:00))
        );
        assert_eq!(transactions[1].timestamp, None);
        assert_eq!(transactions[2].amount, Some(1234.50));
        assert_eq!(transactions[3].hour(), Some(20));
        assert_eq!(transactions[4].amount, None);
    }

    #[test]
    fn ignores_extra_columns() {
        let text = "Notes,Amount,Time,Date,Username,Unique Code\n\
            hello,5,10:00:00 AM,01/05/2024,dave,X1\n";

        let transactions = read_transactions(text.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].username, "dave");
        assert_eq!(transactions[0].id, "X1");
        assert_eq!(transactions[0].amount, Some(5.0));
    }

    #[test]
    fn missing_column_is_an_error() {
        let text = "Unique Code,Username,Date,Amount\nT1,a,01/05/2024,5\n";

        let result = read_transactions(text.as_bytes());

        assert!(matches!(result, Err(Error::InvalidCSV(_))));
    }

    #[test]
    fn header_without_rows_is_still_checked() {
        let inputs = [
            "Foo,Bar\n",
            "Unique Code,Username,Date,Amount\n",
        ];

        for text in inputs {
            let result = read_transactions(text.as_bytes());

            assert!(
                matches!(result, Err(Error::InvalidCSV(_))),
                "expected InvalidCSV for {text:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn missing_columns_are_named_in_the_error() {
        let result = read_transactions("Unique Code,Username,Date,Amount\n".as_bytes());

        assert_eq!(
            result,
            Err(Error::InvalidCSV("missing required columns: Time".to_owned()))
        );
    }

    #[test]
    fn empty_file_is_an_error() {
        let result = read_transactions("".as_bytes());

        assert!(matches!(result, Err(Error::InvalidCSV(_))));
    }

    #[test]
    fn header_only_file_loads_no_transactions() {
        let transactions =
            read_transactions("Unique Code,Username,Date,Time,Amount\n".as_bytes()).unwrap();

        assert!(transactions.is_empty());
    }

    #[test]
    fn ragged_record_is_an_error() {
        let text = "Unique Code,Username,Date,Time,Amount\nT1,a,01/05/2024\n";

        let result = read_transactions(text.as_bytes());

        assert!(matches!(result, Err(Error::InvalidCSV(_))));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let result = load_transactions(Path::new("/definitely/not/here.csv"));

        assert!(matches!(result, Err(Error::DataFileUnreadable { .. })));
    }

    #[test]
    fn source_reuses_cache_until_file_changes() {
        let path = write_temp_csv(SAMPLE_CSV);
        let source = TransactionSource::new(&path);

        let first = source.load().unwrap();
        let second = source.load().unwrap();
        assert_eq!(first.len(), 5);
        assert!(std::sync::Arc::ptr_eq(&first, &second));

        // A different length invalidates the cache even if the mtime is unchanged.
        std::fs::write(
            &path,
            "Unique Code,Username,Date,Time,Amount\nT9,zed,03/05/2024,09:00:00 AM,7\n",
        )
        .unwrap();

        let third = source.load().unwrap();
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].username, "zed");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn source_reports_deleted_file() {
        let path = write_temp_csv(SAMPLE_CSV);
        let source = TransactionSource::new(&path);
        source.load().unwrap();

        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            source.load(),
            Err(Error::DataFileUnreadable { .. })
        ));
    }
}
