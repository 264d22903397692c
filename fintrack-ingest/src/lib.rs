//! fintrack-ingest: bank statement parsing (OFX tag soup, free-form CSV)
//! into a normalized transaction list.

pub mod error;
pub mod normalize;
pub mod parsers;
pub mod types;

use std::path::Path;

pub use error::{IngestError, Result};
pub use parsers::csv::parse_csv;
pub use parsers::ofx::parse_ofx;
pub use types::{Direction, Transaction};

/// Statement dialects we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Ofx,
    Csv,
}

impl StatementFormat {
    /// Pick the dialect from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("ofx") => Ok(Self::Ofx),
            Some("csv") => Ok(Self::Csv),
            _ => Err(IngestError::UnsupportedFileType {
                name: name.to_string(),
            }),
        }
    }

    pub fn parse(self, content: &str) -> Result<Vec<Transaction>> {
        match self {
            Self::Ofx => parse_ofx(content),
            Self::Csv => parse_csv(content),
        }
    }
}

/// Parse an uploaded statement, selecting the dialect by file name.
///
/// An empty `Ok` is a legitimate outcome ("no transactions found"); only an
/// unsupported extension is reported as an error.
pub fn parse_statement(file_name: &str, content: &str) -> Result<Vec<Transaction>> {
    let format = StatementFormat::from_file_name(file_name)?;
    let txns = format.parse(content)?;
    tracing::info!(file = file_name, ?format, count = txns.len(), "parsed statement");
    Ok(txns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(StatementFormat::from_file_name("extrato.ofx").unwrap(), StatementFormat::Ofx);
        assert_eq!(StatementFormat::from_file_name("EXTRATO.OFX").unwrap(), StatementFormat::Ofx);
        assert_eq!(StatementFormat::from_file_name("/tmp/fatura.Csv").unwrap(), StatementFormat::Csv);
    }

    #[test]
    fn test_unsupported_extension_names_supported_ones() {
        let err = StatementFormat::from_file_name("statement.pdf").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("statement.pdf"));
        assert!(msg.contains(".ofx") && msg.contains(".csv"));

        assert!(matches!(
            parse_statement("noextension", "x"),
            Err(IngestError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_parse_statement_dispatches() {
        let ofx = parse_statement("a.ofx", "<STMTTRN><TRNAMT>1<DTPOSTED>20240101<MEMO>X").unwrap();
        assert_eq!(ofx.len(), 1);

        let csv = parse_statement("a.csv", "Data,Descricao,Valor\n01/01/2024,X,1\n").unwrap();
        assert_eq!(csv.len(), 1);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        assert!(parse_statement("a.csv", "Foo,Bar\n1,2").unwrap().is_empty());
        assert!(parse_statement("a.ofx", "").unwrap().is_empty());
    }
}
