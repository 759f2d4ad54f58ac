use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::FlakeId;

/// Serializes as the raw `u64`.
impl Serialize for FlakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

/// Deserializes from a raw `u64`, rejecting values with the reserved bits 62
/// or 63 set.
impl<'de> Deserialize<'de> for FlakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        let id = Self::from_raw(raw);
        if !id.is_valid() {
            return Err(de::Error::custom(format_args!(
                "{raw} sets the reserved bits of a FlakeId"
            )));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::FlakeId;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Event {
        id: FlakeId,
    }

    #[test]
    fn serializes_as_integer() {
        let event = Event {
            id: FlakeId::from_parts(1, 2, 3, 4),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, format!("{{\"id\":{}}}", event.id.to_raw()));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn rejects_reserved_bits() {
        let json = format!("{{\"id\":{}}}", 1u64 << 62);
        let err = serde_json::from_str::<Event>(&json).unwrap_err();
        assert!(err.to_string().contains("reserved bits"));
    }
}
