pub enum Error {
    InvalidMagic,
    UnsupportedVersion(u8),
    TruncatedHeader,
    InvalidMarkerLength(u8),
    UnknownChecksumType(u8),
    MarkerMismatch,
    TruncatedPayload,
    ChecksumMismatch,
}

impl std::error::Error for Error {}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidMagic => write!(f, "InvalidMagic"),
            Error::UnsupportedVersion(v) => write!(f, "UnsupportedVersion({})", v),
            Error::TruncatedHeader => write!(f, "TruncatedHeader"),
            Error::InvalidMarkerLength(l) => write!(f, "InvalidMarkerLength({})", l),
            Error::UnknownChecksumType(t) => write!(f, "UnknownChecksumType({})", t),
            Error::MarkerMismatch => write!(f, "MarkerMismatch"),
            Error::TruncatedPayload => write!(f, "TruncatedPayload"),
            Error::ChecksumMismatch => write!(f, "ChecksumMismatch"),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidMagic => write!(f, "is not an ambc archive"),
            Error::UnsupportedVersion(v) => write!(f, "unsupported format version {}", v),
            Error::TruncatedHeader => write!(f, "archive shorter than declared header"),
            Error::InvalidMarkerLength(l) => write!(f, "invalid marker bit length {}", l),
            Error::UnknownChecksumType(t) => write!(f, "unknown checksum type {}", t),
            Error::MarkerMismatch => write!(f, "marker mismatch at chunk boundary"),
            Error::TruncatedPayload => write!(f, "archive ends inside a chunk"),
            Error::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}
