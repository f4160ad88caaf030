const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Compute the standard FIT CRC-16 using the Garmin nibble lookup table.
pub fn calculate_crc(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |crc, byte| {
        let mut tmp = CRC_TABLE[(crc & 0xF) as usize];
        let mut crc = (crc >> 4) & 0x0FFF;
        crc ^= tmp ^ CRC_TABLE[(byte & 0xF) as usize];
        tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_zero_crc() {
        assert_eq!(calculate_crc(&[]), 0);
    }

    #[test]
    fn appending_the_crc_yields_zero() {
        let payload = b"\x0e\x20\x54\x08\x00\x00\x00\x00.FIT";
        let crc = calculate_crc(payload);
        let mut framed = payload.to_vec();
        framed.extend_from_slice(&crc.to_le_bytes());
        assert_eq!(calculate_crc(&framed), 0);
    }
}
