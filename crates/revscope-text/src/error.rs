use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TEI embed error: {0}")]
    Tei(String),

    #[error("spreadsheet export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}
