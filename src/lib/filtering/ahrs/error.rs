// Error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    // null or released filter instance
    #[error("invalid filter handle")]
    InvalidHandle,
}
