use thiserror::Error;

/// Contract violations detected before any ICO bytes are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no images supplied")]
    EmptyInput,
    #[error("invalid entry #{index}: {fault}")]
    InvalidEntry { index: usize, fault: EntryFault },
}

/// Why a single entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryFault {
    #[error("image payload is empty")]
    EmptyPayload,
    #[error("size {0} is outside 1..=256")]
    SizeOutOfRange(u32),
    #[error("image count exceeds the 16-bit directory limit")]
    TooManyImages,
    #[error("payload ends past the 32-bit offset limit")]
    OffsetOverflow,
}

impl FormatError {
    pub(crate) fn entry(index: usize, fault: EntryFault) -> Self {
        Self::InvalidEntry { index, fault }
    }
}
