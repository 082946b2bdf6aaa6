use crate::archive::ArchiveError;
use crate::envelope::EnvelopeError;
use crate::rawdata::RawDataError;
use std::fmt;

/// An error that can occur when processing a save
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwraps the error into its specific type
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The container or one of its compression backends failed
    Envelope(EnvelopeError),

    /// A raw record contradicted its layout, or a tag was missing
    RawData(RawDataError),

    /// An archive primitive could not be read
    Archive(ArchiveError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Envelope(ref err) => Some(err),
            ErrorKind::RawData(ref err) => Some(err),
            ErrorKind::Archive(ref err) => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Envelope(_) => write!(f, "unable to process save container"),
            ErrorKind::RawData(_) => write!(f, "unable to process raw data"),
            ErrorKind::Archive(ref err) => write!(f, "archive error: {}", err),
        }
    }
}

impl From<EnvelopeError> for Error {
    fn from(error: EnvelopeError) -> Self {
        Error::new(ErrorKind::Envelope(error))
    }
}

impl From<RawDataError> for Error {
    fn from(error: RawDataError) -> Self {
        Error::new(ErrorKind::RawData(error))
    }
}

impl From<ArchiveError> for Error {
    fn from(error: ArchiveError) -> Self {
        Error::new(ErrorKind::Archive(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeErrorKind;
    use std::error::Error as _;

    #[test]
    fn test_error_source_chain() {
        let err = Error::from(EnvelopeError::from(EnvelopeErrorKind::EmptyInput));
        assert!(matches!(err.kind(), ErrorKind::Envelope(_)));
        let source = err.source().map(|x| x.to_string());
        assert_eq!(source.as_deref(), Some("input data for compression is empty"));
    }
}
