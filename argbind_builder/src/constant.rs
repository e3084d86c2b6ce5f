// The token which ends the flagged section of the input; also appended as the scan sentinel.
pub(crate) const TERMINATOR: &str = "--";
// The text a flag type receives when it appears without an explicit value.
pub(crate) const FLAG_PRESENT: &str = "true";
// Composite values stop accumulating once they grow past this many bytes.
pub(crate) const COMPOSITE_LIMIT: usize = 256;
pub(crate) const HELP_MESSAGE: &str = "Display this help and exit";
pub(crate) const OPTIONS_HEADER: &str = "OPTIONS:";
