//! Distinguishable error markers (spec §7). These are plain
//! `std::error::Error` types wrapped through `anyhow` at call sites via
//! `.context(...)`; the CLI entry point downcasts the error chain against
//! them to decide on user-facing phrasing. They are not a full typed
//! hierarchy — the teacher's codebase does not use `thiserror` enums, and
//! neither does this one.
use std::fmt;

macro_rules! marker_error {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        impl std::error::Error for $name {}
    };
}

marker_error!(ProviderRejected, "Hosting API returned a non-2xx response.");
marker_error!(AssetAmbiguous, "Asset selection could not be narrowed to one.");
marker_error!(AssetNotFound, "No asset matches the requested platform.");
marker_error!(ChecksumMissing, "No checksum manifest could be located.");
marker_error!(ChecksumMismatch, "Downloaded bytes do not match the expected digest.");
marker_error!(SignatureMissing, "No signature could be located.");
marker_error!(SignatureInvalid, "Signature verification failed.");
marker_error!(KeyInvalid, "The supplied key is not a usable public key.");
marker_error!(PolicyViolation, "A verification policy flag was not satisfied.");
marker_error!(ExtractionUnsafe, "Archive entry would escape the extraction root.");
marker_error!(ConfigInvalid, "Configuration could not be parsed.");
