//! Table-free CRC checksums shared by the sensor wire protocol.
//!
//! [`crc16`] is the Modbus variant the sensor firmware uses to protect
//! every frame. [`crc5`] is the companion 5-bit checksum from the same
//! firmware family; the temperature/humidity flow never invokes it, but
//! it is kept as part of the shared checksum interface.

/// Computes the Modbus CRC16 over `data`.
///
/// Initial register value 0xFFFF, reflected polynomial 0xA001 applied
/// LSB-first per bit, no final inversion. An empty slice returns the
/// initial register value unmodified.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for byte in data {
        crc ^= u16::from(*byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Computes a 5-bit CRC over `data`.
///
/// Same LSB-first shift structure as [`crc16`] with initial register
/// 0x1F and reflected polynomial 0x14. The result is always in `0..=31`.
pub fn crc5(data: &[u8]) -> u8 {
    let mut crc: u8 = 0x1F;
    for byte in data {
        crc ^= *byte;
        for _ in 0..8 {
            if crc & 0x01 != 0 {
                crc = (crc >> 1) ^ 0x14;
            } else {
                crc >>= 1;
            }
        }
    }
    crc & 0x1F
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc16_known_vector() {
        // Request payload of the read-registers frame; the sensor
        // transmits this CRC as C4 0B (low byte first).
        let data = [0x01, 0x03, 0x00, 0x00, 0x00, 0x02];
        assert_eq!(crc16(&data), 0x0BC4);
    }

    #[test]
    fn crc16_empty_is_initial_register() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn crc16_is_deterministic() {
        let data = [0x01, 0x03, 0x04, 0x01, 0xF4, 0x00, 0xC8];
        assert_eq!(crc16(&data), crc16(&data));
    }

    #[test]
    fn crc16_single_byte() {
        // 0xFFFF xor 0x00 shifted 8 times through 0xA001.
        assert_eq!(crc16(&[0x00]), 0x40BF);
    }

    #[test]
    fn crc5_stays_in_range() {
        for byte in 0u8..=255 {
            assert!(crc5(&[byte]) < 32);
        }
        assert!(crc5(&[0xDE, 0xAD, 0xBE, 0xEF]) < 32);
    }

    #[test]
    fn crc5_empty_is_initial_register() {
        assert_eq!(crc5(&[]), 0x1F);
    }

    #[test]
    fn crc5_is_deterministic() {
        let data = [0x12, 0x34, 0x56];
        assert_eq!(crc5(&data), crc5(&data));
    }
}
