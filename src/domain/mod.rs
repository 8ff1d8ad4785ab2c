// Price observations and the raw storage-row boundary
pub mod record;

// Engine output contract
pub mod recommendation;

// Domain-specific error types
pub mod errors;
