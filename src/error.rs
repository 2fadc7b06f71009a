use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use rusoto_core::request::TlsError;
use rusoto_core::RusotoError;

#[derive(Debug)]
pub struct StringError(String);
impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl StdError for StringError {}
impl From<String> for StringError {
    fn from(s: String) -> StringError {
        StringError(s)
    }
}

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Csv(csv::Error),
    Tls(TlsError),
    Rusoto(RusotoError<StringError>),
    InvalidUri(String),
    OutputExists(PathBuf),
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{}", e),
            Self::Csv(e) => write!(f, "{}", e),
            Self::Tls(e) => write!(f, "{}", e),
            Self::Rusoto(e) => write!(f, "{}", e),
            Self::InvalidUri(uri) => write!(
                f,
                "not a valid S3 URI, expected (s3://)<bucket>/<key>: {}",
                uri
            ),
            Self::OutputExists(path) => write!(
                f,
                "output file {} already exists, pass --overwrite to replace it",
                path.display()
            ),
        }
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            &Self::Io(ref e) => Some(e),
            &Self::Csv(ref e) => Some(e),
            &Self::Tls(ref e) => Some(e),
            &Self::Rusoto(ref e) => Some(e),
            &Self::InvalidUri(_) => None,
            &Self::OutputExists(_) => None,
        }
    }
}
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}
impl From<TlsError> for Error {
    fn from(e: TlsError) -> Self {
        Self::Tls(e)
    }
}
impl<E> From<RusotoError<E>> for Error
where
    E: fmt::Display,
{
    fn from(e: RusotoError<E>) -> Self {
        Self::Rusoto(match e {
            RusotoError::Service(e) => RusotoError::Service(format!("{}", e).into()),
            RusotoError::HttpDispatch(e) => RusotoError::HttpDispatch(e),
            RusotoError::Credentials(e) => RusotoError::Credentials(e),
            RusotoError::Validation(e) => RusotoError::Validation(e),
            RusotoError::ParseError(e) => RusotoError::ParseError(e),
            RusotoError::Unknown(e) => RusotoError::Unknown(e),
            RusotoError::Blocking => RusotoError::Blocking,
        })
    }
}
