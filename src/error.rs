use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidXlsx(String),
    Xml(roxmltree::Error),
    /// Required header names absent from the sheet, in canonical column order.
    MissingColumns(Vec<String>),
    /// Column widths, page capacity or margins that cannot produce a valid layout.
    Layout(String),
    Config(String),
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidXlsx(msg) => write!(f, "invalid XLSX: {msg}"),
            Error::Xml(e) => write!(f, "XML parse error: {e}"),
            Error::MissingColumns(cols) => write!(f, "missing columns: {}", cols.join(", ")),
            Error::Layout(msg) => write!(f, "layout configuration error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF generation failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::InvalidXlsx(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
