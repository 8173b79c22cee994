//! Transaction record types and their validation rules.
//!
//! Wire column names (`Transaction_ID`, `Hora_do_Dia`, ...) are part of the
//! external table contract and are preserved through serde renames; Rust
//! field names stay idiomatic.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use validator::Validate;

/// Column names shared by the store schema and the dataset accessors.
pub mod columns {
    pub const TRANSACTION_ID: &str = "Transaction_ID";
    pub const USER_ID: &str = "User_ID";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const AMOUNT: &str = "Transaction_Amount";
    pub const TRANSACTION_TYPE: &str = "Transaction_Type";
    pub const LOCATION: &str = "Location";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const RISK_SCORE: &str = "Risk_Score";
    pub const FAILED_COUNT_7D: &str = "Failed_Transaction_Count_7d";
    pub const FRAUD_LABEL: &str = "Fraud_Label";

    // Derived by the ETL pipeline.
    pub const HOUR_OF_DAY: &str = "Hora_do_Dia";
    pub const WEEKDAY: &str = "Dia_da_Semana";
    pub const MONTH: &str = "Mes";

    /// Numeric columns of the enriched table.
    pub const NUMERIC: &[&str] = &[
        AMOUNT,
        LATITUDE,
        LONGITUDE,
        RISK_SCORE,
        FAILED_COUNT_7D,
        FRAUD_LABEL,
        HOUR_OF_DAY,
        WEEKDAY,
        MONTH,
    ];

    /// Categorical columns of the enriched table.
    pub const CATEGORICAL: &[&str] = &[USER_ID, TRANSACTION_TYPE, LOCATION];

    /// Every column of the enriched table.
    pub const ALL: &[&str] = &[
        TRANSACTION_ID,
        USER_ID,
        TIMESTAMP,
        AMOUNT,
        TRANSACTION_TYPE,
        LOCATION,
        LATITUDE,
        LONGITUDE,
        RISK_SCORE,
        FAILED_COUNT_7D,
        FRAUD_LABEL,
        HOUR_OF_DAY,
        WEEKDAY,
        MONTH,
    ];
}

/// One raw payment event, as stored in the source table.
///
/// `timestamp` is the unparsed date-time text from the source system; the
/// ETL Transform stage is responsible for parsing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransactionRecord {
    #[serde(rename = "Transaction_ID")]
    #[validate(length(min = 1))]
    pub transaction_id: String,

    #[serde(rename = "User_ID")]
    pub user_id: String,

    /// Raw date-time text, e.g. `2024-01-01T15:30:00`.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    #[serde(rename = "Transaction_Amount")]
    #[validate(range(min = 0.0))]
    pub amount: f64,

    #[serde(rename = "Transaction_Type")]
    pub transaction_type: String,

    #[serde(rename = "Location")]
    pub location: Option<String>,

    #[serde(rename = "Latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(rename = "Longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[serde(rename = "Risk_Score")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub risk_score: f64,

    #[serde(rename = "Failed_Transaction_Count_7d")]
    pub failed_count_7d: u32,

    /// Truthy encoding tolerated on input; Transform coerces to 0/1.
    #[serde(rename = "Fraud_Label")]
    pub fraud_label: u8,
}

/// A transaction record after the ETL Transform stage.
///
/// `timestamp` is parsed to epoch milliseconds (UTC-naive, DateTime64(3) in
/// the store) and the three time features are derived from it. Immutable
/// once written to the destination table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EnrichedRecord {
    #[serde(rename = "Transaction_ID")]
    #[validate(length(min = 1))]
    pub transaction_id: String,

    #[serde(rename = "User_ID")]
    pub user_id: String,

    /// Epoch milliseconds of the parsed source timestamp.
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,

    #[serde(rename = "Transaction_Amount")]
    #[validate(range(min = 0.0))]
    pub amount: f64,

    #[serde(rename = "Transaction_Type")]
    pub transaction_type: String,

    #[serde(rename = "Location")]
    pub location: Option<String>,

    #[serde(rename = "Latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(rename = "Longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[serde(rename = "Risk_Score")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub risk_score: f64,

    #[serde(rename = "Failed_Transaction_Count_7d")]
    pub failed_count_7d: u32,

    #[serde(rename = "Fraud_Label")]
    #[validate(range(max = 1))]
    pub fraud_label: u8,

    /// Hour of day, 0-23.
    #[serde(rename = "Hora_do_Dia")]
    #[validate(range(max = 23))]
    pub hour_of_day: u8,

    /// Day of week, Monday = 0 through Sunday = 6.
    #[serde(rename = "Dia_da_Semana")]
    #[validate(range(max = 6))]
    pub weekday: u8,

    /// Month, 1-12.
    #[serde(rename = "Mes")]
    #[validate(range(min = 1, max = 12))]
    pub month: u8,
}

impl EnrichedRecord {
    pub fn is_fraud(&self) -> bool {
        self.fraud_label == 1
    }
}

// Stable content hash, used for dataset fingerprinting. Floats hash via
// their bit patterns; None and negative zero are distinct from 0.0.
impl Hash for EnrichedRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transaction_id.hash(state);
        self.user_id.hash(state);
        self.timestamp.hash(state);
        self.amount.to_bits().hash(state);
        self.transaction_type.hash(state);
        self.location.hash(state);
        self.latitude.map(f64::to_bits).hash(state);
        self.longitude.map(f64::to_bits).hash(state);
        self.risk_score.to_bits().hash(state);
        self.failed_count_7d.hash(state);
        self.fraud_label.hash(state);
        self.hour_of_day.hash(state);
        self.weekday.hash(state);
        self.month.hash(state);
    }
}
