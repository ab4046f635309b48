//! Feature-report codec for the EC command protocol.
//!
//! Every exchange with the embedded controller is one fixed-size 90-byte
//! feature report, request and response alike. The codec owns the byte
//! layout and the checksum; it never interprets status bytes, which are
//! per-model configuration handled by [`crate::types::StatusCodes`].

use zerocopy::byteorder::big_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::ProtocolError;

/// Capacity of the argument region
pub const ARG_CAPACITY: usize = 80;
/// Report length on the wire (excluding the HID report-id prefix)
pub const REPORT_LEN: usize = 90;
/// Offset of the checksum byte
const CHECKSUM_OFFSET: usize = 88;
/// Checksum covers `remaining_packets` through the last argument byte
const CHECKSUM_REGION: std::ops::Range<usize> = 2..CHECKSUM_OFFSET;

/// One EC command: class/id selector plus its ordered argument bytes.
///
/// Built by the action resolver, consumed by the transaction manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub class: u8,
    pub id: u8,
    pub args: Vec<u8>,
}

impl Command {
    pub fn new(class: u8, id: u8, args: &[u8]) -> Self {
        Self {
            class,
            id,
            args: args.to_vec(),
        }
    }
}

/// Wire layout of one report.
///
/// `remaining_packets` is the only multi-byte field and is big-endian.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct RawReport {
    status: u8,
    transaction_id: u8,
    remaining_packets: U16,
    protocol_type: u8,
    data_size: u8,
    command_class: u8,
    command_id: u8,
    args: [u8; ARG_CAPACITY],
    checksum: u8,
    reserved: u8,
}

const _: () = assert!(std::mem::size_of::<RawReport>() == REPORT_LEN);

/// Decoded fields of a response report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReport {
    pub status: u8,
    pub transaction_id: u8,
    pub command_class: u8,
    pub command_id: u8,
    /// Argument region truncated to the report's `data_size`
    pub args: Vec<u8>,
}

/// XOR accumulator over the payload region (`remaining_packets` through the
/// final argument byte). Status, transaction id, the checksum byte itself
/// and the trailing reserved byte are excluded.
pub fn checksum(frame: &[u8]) -> u8 {
    frame[CHECKSUM_REGION].iter().fold(0, |acc, b| acc ^ b)
}

/// Encode a command into a wire frame carrying the given transaction id.
///
/// `new_status` is the profile's request-status value written into byte 0.
pub fn encode(
    command: &Command,
    transaction_id: u8,
    new_status: u8,
) -> Result<[u8; REPORT_LEN], ProtocolError> {
    if command.args.len() > ARG_CAPACITY {
        return Err(ProtocolError::ArgumentOverflow {
            len: command.args.len(),
        });
    }

    let mut args = [0u8; ARG_CAPACITY];
    args[..command.args.len()].copy_from_slice(&command.args);

    let raw = RawReport {
        status: new_status,
        transaction_id,
        remaining_packets: U16::new(0),
        protocol_type: 0,
        data_size: command.args.len() as u8,
        command_class: command.class,
        command_id: command.id,
        args,
        checksum: 0,
        reserved: 0,
    };

    let mut frame = [0u8; REPORT_LEN];
    frame.copy_from_slice(raw.as_bytes());
    frame[CHECKSUM_OFFSET] = checksum(&frame);
    Ok(frame)
}

/// Decode a wire frame, recomputing and verifying its checksum.
pub fn decode(frame: &[u8]) -> Result<DecodedReport, ProtocolError> {
    let raw = RawReport::ref_from_bytes(frame)
        .map_err(|_| ProtocolError::MalformedReport { len: frame.len() })?;

    if raw.data_size as usize > ARG_CAPACITY {
        return Err(ProtocolError::MalformedReport { len: frame.len() });
    }
    if raw.checksum != checksum(frame) {
        return Err(ProtocolError::ChecksumMismatch);
    }

    Ok(DecodedReport {
        status: raw.status,
        transaction_id: raw.transaction_id,
        command_class: raw.command_class,
        command_id: raw.command_id,
        args: raw.args[..raw.data_size as usize].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Command {
        Command::new(0x0d, 0x02, &[0x01, 0x01, 0x05, 0x00])
    }

    #[test]
    fn round_trip_recovers_class_id_args() {
        let command = sample();
        let frame = encode(&command, 0x2a, 0x00).unwrap();
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.transaction_id, 0x2a);
        assert_eq!(decoded.command_class, command.class);
        assert_eq!(decoded.command_id, command.id);
        assert_eq!(decoded.args, command.args);
    }

    #[test]
    fn round_trip_empty_and_full_args() {
        for args in [vec![], vec![0xffu8; ARG_CAPACITY]] {
            let command = Command::new(0x07, 0x12, &args);
            let decoded = decode(&encode(&command, 1, 0).unwrap()).unwrap();
            assert_eq!(decoded.args, args);
        }
    }

    #[test]
    fn every_bit_flip_in_argument_region_breaks_checksum() {
        let command = Command::new(0x03, 0x03, &[1, 5, 0x80]);
        let frame = encode(&command, 7, 0x00).unwrap();
        for byte in 8..CHECKSUM_OFFSET {
            for bit in 0..8 {
                let mut corrupt = frame;
                corrupt[byte] ^= 1 << bit;
                assert_eq!(
                    decode(&corrupt),
                    Err(ProtocolError::ChecksumMismatch),
                    "flip at byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    #[test]
    fn status_byte_is_outside_checksum_region() {
        // A response differs from its request only in the status byte; the
        // checksum must survive that rewrite.
        let mut frame = encode(&sample(), 9, 0x00).unwrap();
        frame[0] = 0x02;
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.status, 0x02);
    }

    #[test]
    fn oversized_args_fail_at_encode_time() {
        let command = Command::new(0x0d, 0x01, &[0u8; ARG_CAPACITY + 1]);
        assert_eq!(
            encode(&command, 0, 0),
            Err(ProtocolError::ArgumentOverflow {
                len: ARG_CAPACITY + 1
            })
        );
    }

    #[test]
    fn wrong_length_is_malformed() {
        let frame = encode(&sample(), 1, 0).unwrap();
        assert_eq!(
            decode(&frame[..REPORT_LEN - 1]),
            Err(ProtocolError::MalformedReport { len: REPORT_LEN - 1 })
        );
        let mut long = frame.to_vec();
        long.push(0);
        assert_eq!(
            decode(&long),
            Err(ProtocolError::MalformedReport { len: REPORT_LEN + 1 })
        );
    }

    #[test]
    fn oversized_data_size_is_malformed() {
        let mut frame = encode(&sample(), 1, 0).unwrap();
        frame[5] = ARG_CAPACITY as u8 + 1;
        frame[CHECKSUM_OFFSET] = checksum(&frame);
        assert_eq!(
            decode(&frame),
            Err(ProtocolError::MalformedReport { len: REPORT_LEN })
        );
    }

    #[test]
    fn checksum_is_recomputed_per_report() {
        let a = encode(&Command::new(0x0d, 0x01, &[0, 1, 30]), 1, 0).unwrap();
        let b = encode(&Command::new(0x0d, 0x01, &[0, 2, 30]), 1, 0).unwrap();
        assert_ne!(a[CHECKSUM_OFFSET], b[CHECKSUM_OFFSET]);
    }
}
