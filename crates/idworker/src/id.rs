use core::fmt;

/// A 64-bit Snowflake ID with separate datacenter and worker fields.
///
/// - 2 bits reserved (always zero)
/// - 40 bits timestamp (ms since the generator's epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63    62 61            22 21             17 16         12 11             0
///              +-------+----------------+-----------------+-------------+---------------+
///  Field:      | rsv(2)| timestamp (40) | datacenter (5)  | worker (5)  | sequence (12) |
///              +-------+----------------+-----------------+-------------+---------------+
///              |<--------------------- MSB ---- 64 bits ---- LSB ---------------------->|
/// ```
///
/// Downstream consumers may rely on this layout to decode IDs without access
/// to the generator that produced them.
///
/// # Example
///
/// ```
/// use idworker::FlakeId;
///
/// let id = FlakeId::from_parts(1000, 3, 7, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 3);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 40;
    /// Width of the datacenter ID field.
    pub const DATACENTER_ID_BITS: u32 = 5;
    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u32 = 5;
    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for extracting the 40-bit timestamp field. Occupies bits 22
    /// through 61.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 =
        Self::SEQUENCE_BITS + Self::WORKER_ID_BITS + Self::DATACENTER_ID_BITS;

    /// Number of bits to shift the datacenter ID to its correct position (bit
    /// 17).
    pub const DATACENTER_ID_SHIFT: u32 = Self::SEQUENCE_BITS + Self::WORKER_ID_BITS;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Largest worker ID that fits the layout.
    pub const MAX_WORKER_ID: u8 = Self::WORKER_ID_MASK as u8;

    /// Largest datacenter ID that fits the layout.
    pub const MAX_DATACENTER_ID: u8 = Self::DATACENTER_ID_MASK as u8;

    /// Largest sequence value within a single millisecond.
    pub const MAX_SEQUENCE: u16 = Self::SEQUENCE_MASK as u16;

    /// Largest timestamp delta (ms since epoch) that fits the layout.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Packs the components into an ID. Each value is masked to its field
    /// width.
    pub const fn from_parts(
        timestamp: u64,
        datacenter_id: u8,
        worker_id: u8,
        sequence: u16,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id =
            (datacenter_id as u64 & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id as u64 & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence as u64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Extracts the timestamp (ms since epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> u8 {
        ((self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK) as u8
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u8 {
        ((self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK) as u8
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u16 {
        ((self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u16
    }

    /// Returns the raw `u64`.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw `u64` without validation. See [`Self::is_valid`].
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the reserved bits 62 and 63 are clear.
    pub const fn is_valid(&self) -> bool {
        self.id >> (Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS) == 0
    }

    /// Recovers the wall-clock time of this ID in milliseconds since the Unix
    /// epoch, given the generator's epoch in the same unit. Saturates at
    /// `i64::MAX`.
    pub const fn unix_millis(&self, epoch_millis: i64) -> i64 {
        epoch_millis.saturating_add(self.timestamp() as i64)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("raw", &format_args!("0x{:016x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
