use crate::error::{ReportBuilderError, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Length of a normalized account number.
pub const ACCOUNT_NUMBER_LEN: usize = 12;

/// One row of the customer registry.
///
/// The registry file keeps the production column headers, so field names are
/// mapped via serde renames. The five investment metrics and the display
/// stats stay raw strings here; coercing them to numbers (and deciding what
/// a malformed value means) is the classifier's and prompt builder's call,
/// not the loader's.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "이름")]
    pub name: String,

    #[serde(rename = "계좌번호")]
    pub account_number: String,

    #[serde(rename = "팀", default)]
    pub team: Option<String>,

    #[serde(rename = "거래금액", default)]
    pub trading_volume: Option<String>,

    #[serde(rename = "거래빈도", default)]
    pub trading_frequency: Option<String>,

    #[serde(rename = "분산투자", default)]
    pub diversification: Option<String>,

    #[serde(rename = "안정성_점수", default)]
    pub stability_score: Option<String>,

    #[serde(rename = "해외비중", default)]
    pub global_share_ratio: Option<String>,

    #[serde(rename = "AVG(수익률)", default)]
    pub avg_return: Option<String>,

    #[serde(rename = "OPS(활동성)", default)]
    pub ops_activity: Option<String>,

    #[serde(rename = "ERA(안정성)", default)]
    pub era_stability: Option<String>,

    #[serde(rename = "종목1", default)]
    pub stock1: Option<String>,

    #[serde(rename = "종목1 수익률", default)]
    pub stock1_return: Option<String>,

    #[serde(rename = "종목2", default)]
    pub stock2: Option<String>,

    #[serde(rename = "종목2 수익률", default)]
    pub stock2_return: Option<String>,

    #[serde(rename = "종목3", default)]
    pub stock3: Option<String>,

    #[serde(rename = "종목3 수익률", default)]
    pub stock3_return: Option<String>,
}

/// A validated, normalized (name, account number) pair.
///
/// Construction is the only validation gate: a lookup is never attempted
/// with input that failed these checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInput {
    name: String,
    account_number: String,
}

impl IdentityInput {
    /// Validates and normalizes raw user input.
    ///
    /// The name must be non-empty after trimming. The account number must be
    /// exactly [`ACCOUNT_NUMBER_LEN`] ASCII digits once whitespace and
    /// hyphens are stripped.
    pub fn parse(name: &str, account_number: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReportBuilderError::InvalidIdentity(
                "name must not be empty".to_string(),
            ));
        }

        let account_number = normalize_account_number(account_number);
        if account_number.len() != ACCOUNT_NUMBER_LEN
            || !account_number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ReportBuilderError::InvalidIdentity(format!(
                "account number must be {} digits",
                ACCOUNT_NUMBER_LEN
            )));
        }

        Ok(Self {
            name: name.to_string(),
            account_number,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Display value derived from the account: its last two digits.
    pub fn jersey_number(&self) -> &str {
        &self.account_number[self.account_number.len() - 2..]
    }
}

/// CSV-backed registry of player records.
///
/// Holds only the path; the dataset is re-read from disk on every lookup so
/// a freshly updated file is picked up without restarting.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the first record matching the given identity.
    ///
    /// Stored names are trimmed and stored account numbers are trimmed and
    /// stripped of hyphens before the exact, case-sensitive comparison.
    /// Duplicate rows are possible in the file; the first match in file
    /// order wins. A missing, unreadable, or malformed file is
    /// [`ReportBuilderError::StorageUnavailable`]; a clean miss is
    /// [`ReportBuilderError::NotFound`].
    pub fn find(&self, identity: &IdentityInput) -> Result<PlayerRecord> {
        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| self.storage_unavailable(e))?;

        for (row_index, row) in reader.deserialize::<PlayerRecord>().enumerate() {
            let mut record = row.map_err(|e| self.storage_unavailable(e))?;
            record.name = record.name.trim().to_string();
            record.account_number = normalize_account_number(&record.account_number);

            if record.name == identity.name() && record.account_number == identity.account_number()
            {
                debug!(
                    "registry hit for '{}' at row {}",
                    identity.name(),
                    row_index
                );
                return Ok(record);
            }
        }

        Err(ReportBuilderError::NotFound)
    }

    /// Convenience wrapper: validates raw input, then looks it up.
    pub fn find_record(&self, name: &str, account_number: &str) -> Result<PlayerRecord> {
        let identity = IdentityInput::parse(name, account_number)?;
        self.find(&identity)
    }

    fn storage_unavailable(&self, err: csv::Error) -> ReportBuilderError {
        ReportBuilderError::StorageUnavailable {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

fn normalize_account_number(raw: &str) -> String {
    raw.trim().replace('-', "")
}
