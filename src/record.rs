//! Wire format for generated rows.
//!
//! Key (8 bytes): `user_id` (u32 BE) then `txn_id` (u32 BE).
//! Value (9 bytes): `timestamp` (u32 BE), the IEEE-754 bits of `amount`
//! (4 bytes BE), and `completed` (1 byte), where `timestamp = user_id +
//! txn_id`, `amount = txn_id + 0.5` and `completed = timestamp mod 2`.

use byteorder::{BigEndian, ByteOrder};

/// Length of an encoded key.
pub const KEY_LEN: usize = 8;

/// Length of an encoded value.
pub const VALUE_LEN: usize = 9;

/// One synthetic row, derived from a selected `(user_id, txn_id)` pair.
///
/// Records are ephemeral: constructed, encoded, written, discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// 1-based user id.
    pub user_id: u32,
    /// 1-based per-user transaction id.
    pub txn_id: u32,
}

impl Record {
    /// The record for a selected `(user_id, txn_id)` pair.
    pub fn new(user_id: u32, txn_id: u32) -> Record {
        Record { user_id, txn_id }
    }

    /// Synthetic timestamp field.
    pub fn timestamp(&self) -> u32 {
        self.user_id + self.txn_id
    }

    /// Synthetic amount field.
    pub fn amount(&self) -> f32 {
        self.txn_id as f32 + 0.5
    }

    /// Completion flag: timestamp parity.
    pub fn completed(&self) -> u8 {
        (self.timestamp() % 2) as u8
    }

    /// Encode the 8-byte primary key.
    pub fn key(&self) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        BigEndian::write_u32(&mut key[0..4], self.user_id);
        BigEndian::write_u32(&mut key[4..8], self.txn_id);
        key
    }

    /// Encode the 9-byte value.
    ///
    /// The amount is written as an explicit big-endian float bit pattern,
    /// not an integer byte-swap of the float's storage.
    pub fn value(&self) -> [u8; VALUE_LEN] {
        let mut value = [0u8; VALUE_LEN];
        BigEndian::write_u32(&mut value[0..4], self.timestamp());
        BigEndian::write_f32(&mut value[4..8], self.amount());
        value[8] = self.completed();
        value
    }

    /// Decode an encoded key back into its record.
    pub fn decode_key(key: &[u8; KEY_LEN]) -> Record {
        Record {
            user_id: BigEndian::read_u32(&key[0..4]),
            txn_id: BigEndian::read_u32(&key[4..8]),
        }
    }
}

/// Decoded view of an encoded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedValue {
    /// Timestamp field.
    pub timestamp: u32,
    /// Amount field.
    pub amount: f32,
    /// Completion flag.
    pub completed: u8,
}

/// Decode a 9-byte value.
pub fn decode_value(value: &[u8; VALUE_LEN]) -> DecodedValue {
    DecodedValue {
        timestamp: BigEndian::read_u32(&value[0..4]),
        amount: BigEndian::read_f32(&value[4..8]),
        completed: value[8],
    }
}
