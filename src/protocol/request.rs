//! Request definitions
//!
//! Represents operations sent to the simulator.

/// Size of one simulated cache line, and of every frame payload
pub const LINE_SIZE: usize = 64;

/// Operation kinds understood by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpKind {
    Read = 0x00,
    Write = 0x01,
}

impl OpKind {
    /// Interpret a wire `op_type` byte
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(OpKind::Read),
            0x01 => Some(OpKind::Write),
            _ => None,
        }
    }

    pub fn as_wire(self) -> u8 {
        self as u8
    }
}

/// A single request frame
///
/// `op_type` is kept as the raw wire byte so that a decoded frame carrying an
/// unknown operation is still representable; use [`Request::op`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Operation type (0 = READ, 1 = WRITE)
    pub op_type: u8,

    /// Target address
    pub addr: u64,

    /// Number of meaningful bytes (at most `LINE_SIZE`)
    pub size: u32,

    /// Client-side timestamp, forwarded verbatim
    pub timestamp: u64,

    /// Write payload, zero-filled for reads
    pub payload: [u8; LINE_SIZE],
}

impl Request {
    /// Create a READ request
    pub fn read(addr: u64, size: u32) -> Self {
        Self {
            op_type: OpKind::Read.as_wire(),
            addr,
            size,
            timestamp: 0,
            payload: [0u8; LINE_SIZE],
        }
    }

    /// Create a WRITE request
    ///
    /// `data` is zero-padded to `LINE_SIZE`; bytes beyond `LINE_SIZE` are not sent.
    pub fn write(addr: u64, data: &[u8], size: u32) -> Self {
        let mut payload = [0u8; LINE_SIZE];
        let len = data.len().min(LINE_SIZE);
        payload[..len].copy_from_slice(&data[..len]);

        Self {
            op_type: OpKind::Write.as_wire(),
            addr,
            size,
            timestamp: 0,
            payload,
        }
    }

    /// Set the timestamp field
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The operation kind, if `op_type` is a known value
    pub fn op(&self) -> Option<OpKind> {
        OpKind::from_wire(self.op_type)
    }
}
