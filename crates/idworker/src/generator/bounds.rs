use crate::{Error, FlakeId, IdentifierField, Result};

/// Checks that both identifiers fit their 5-bit fields.
///
/// Only the upper bound needs checking since the inputs are unsigned. The
/// bound is inclusive: `31` is accepted, `32` is rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] naming the first field that is out of
/// range, worker before datacenter.
///
/// # Example
///
/// ```
/// use idworker::{validate_identifiers, Error, IdentifierField};
///
/// assert!(validate_identifiers(31, 31).is_ok());
/// assert!(matches!(
///     validate_identifiers(0, 32),
///     Err(Error::InvalidIdentifier { field: IdentifierField::Datacenter, .. })
/// ));
/// ```
pub fn validate_identifiers(worker_id: u8, datacenter_id: u8) -> Result<()> {
    if worker_id > FlakeId::MAX_WORKER_ID {
        return Err(Error::InvalidIdentifier {
            field: IdentifierField::Worker,
            value: worker_id,
            max: FlakeId::MAX_WORKER_ID,
        });
    }
    if datacenter_id > FlakeId::MAX_DATACENTER_ID {
        return Err(Error::InvalidIdentifier {
            field: IdentifierField::Datacenter,
            value: datacenter_id,
            max: FlakeId::MAX_DATACENTER_ID,
        });
    }
    Ok(())
}
