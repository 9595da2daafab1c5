//! CRC checksums over byte buffers
//!
//! Bitwise implementations; the framing layer only needs [`crc16`], the 8-bit
//! and 32-bit variants are general utilities for application payloads.

/// CCITT polynomial x^16 + x^12 + x^5 + 1
const CRC16_POLY: u16 = 0x1021;

/// IEEE 802.3 polynomial, bit-reversed
const CRC32_POLY: u32 = 0xEDB8_8320;

/// x^8 + x^5 + x^4 + 1
const CRC8_POLY: u8 = 0x31;

/// CRC-16/CCITT-FALSE: MSB-first, initial register `0xFFFF`, no final XOR.
///
/// This is the checksum carried in every frame trailer.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;

    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC16_POLY
            } else {
                crc << 1
            };
        }
    }

    crc
}

/// CRC-32 (IEEE 802.3): reflected, initial register `0xFFFF_FFFF`, final
/// one's complement.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;

    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32_POLY
            } else {
                crc >> 1
            };
        }
    }

    !crc
}

/// CRC-8 with polynomial `0x31`: MSB-first, initial register `0xFF`, no final
/// XOR.
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;

    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            };
        }
    }

    crc
}
