//! Error type shared by every repository port.

use super::define_port_error;

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum PersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { constraint: String } => "unique constraint violated: {constraint}",
        /// A conditional write found a different `updated_at` than expected.
        StaleWrite => "record changed since it was read",
        /// A conditional write found no record at all.
        Missing => "record no longer exists",
    }
}
