use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClearError {
    #[error("File not found: '{0}'")]
    FileNotFound(String),

    #[error("Failed to parse emissions data from '{0}': {1}")]
    FileParse(String, String),

    #[error("Record '{business_unit}' is missing required field '{field}'")]
    MissingField {
        field: &'static str,
        business_unit: String,
    },

    #[error("At least one emissions record must be provided")]
    EmptyDataset,

    #[error("Business unit '{0}' appears more than once")]
    DuplicateBusinessUnit(String),

    #[error("Parameter '{name}' = {value} is outside the allowed range {min}..={max}")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Regulation '{0}' not found")]
    UnknownRegulation(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process CSV '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("Output for '{0}' is not valid UTF-8: {1}")]
    Utf8(String, #[source] std::string::FromUtf8Error),
}

pub type ClearResult<T> = Result<T, ClearError>;
