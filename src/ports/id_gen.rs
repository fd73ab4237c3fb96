//! ID generator port for producing client-side command identifiers.

/// Generates unique identifiers.
///
/// Sync API batches reference not-yet-created objects by client-chosen
/// temp ids. Abstracting generation lets replay substitute a predictable
/// sequence.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
