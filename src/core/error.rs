use thiserror::Error;

/// Errors raised while turning one form-instance document into a billing
/// record.
///
/// Every variant is fatal for the document being processed: the engine
/// never emits a partial record. The caller is expected to persist a
/// fallout entry and continue with the next document — one bad document
/// must not abort a batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BillingError {
    /// The document declares a different namespace than expected — the
    /// producer sent the wrong document type entirely.
    #[error("namespace mismatch: expected {expected:?}, found {found:?}")]
    NamespaceMismatch { expected: String, found: String },

    /// The bytes are not a well-formed form-instance document. The
    /// platform occasionally returns an HTML error page in place of the
    /// expected export; that surfaces here, never as a raw parser panic.
    #[error("malformed form-instance document: {0}")]
    MalformedDocument(String),

    /// The repeating-values subtree contained no recognized row groups.
    #[error("document contains no repeating row-group data")]
    NoData,

    /// Row-group families are populated with different row counts; a
    /// short invoice would silently drop lines, so this aborts instead.
    /// `details` enumerates `TypeName=count` per mismatched family.
    #[error("row count mismatch across field groups, sizes {observed_sizes:?}: {details}")]
    RowCountMismatch {
        observed_sizes: Vec<usize>,
        details: String,
    },

    /// A monetary or quantity field did not contain a parseable number
    /// after currency noise was stripped.
    #[error("not a number: {original:?}")]
    NotANumber { original: String },

    /// The organization-information string did not match the fixed
    /// seven-group `number | name | street | care-of | zip city | motpart`
    /// grammar.
    #[error("organization information does not match the expected format: {input:?}")]
    OrganizationInfoFormat { input: String },

    /// No variant mapper is registered for the form family that produced
    /// this instance.
    #[error("no variant mapper registered for form family {family_id:?}")]
    UnsupportedFamily { family_id: String },
}
