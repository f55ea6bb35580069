//! # ESC/POS Raster Graphics
//!
//! Avatars and attachments are sent with the raster bit image command
//! `GS v 0`, which most network receipt printers accept.
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```

use super::commands::{GS, u16_le};

/// Rows per `GS v 0` command. Tall images are split so no single command
/// exceeds the receive buffer of small printers.
pub const MAX_CHUNK_ROWS: usize = 256;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m = 0`: normal density (no doubling)
/// - `xL xH`: width in **bytes**, little-endian
/// - `yL yH`: height in **dots**, little-endian
/// - `d1...dk`: `width_bytes × height` bytes, row-major
///
/// ```
/// use pingslip::protocol::graphics;
///
/// let data = vec![0xFF; 8 * 2];
/// let cmd = graphics::raster(8, 2, &data);
/// assert_eq!(&cmd[0..8], &[0x1D, 0x76, 0x30, 0, 8, 0, 2, 0]);
/// assert_eq!(cmd.len(), 8 + 16);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend([GS, b'v', b'0', 0, xl, xh, yl, yh]);
    cmd.extend_from_slice(data);
    cmd
}

/// Raster commands for an image of any height, split every
/// [`MAX_CHUNK_ROWS`] rows.
///
/// ```
/// use pingslip::protocol::graphics;
///
/// let data = vec![0u8; 2 * 300];
/// let cmd = graphics::raster_chunked(2, 300, &data);
/// // Two headers (256 + 44 rows) plus the data
/// assert_eq!(cmd.len(), 2 * 8 + 600);
/// ```
pub fn raster_chunked(width_bytes: usize, height: usize, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 8 * height.div_ceil(MAX_CHUNK_ROWS));
    let mut row = 0;

    while row < height {
        let rows = (height - row).min(MAX_CHUNK_ROWS);
        let chunk = &data[row * width_bytes..(row + rows) * width_bytes];
        out.extend(raster(width_bytes as u16, rows as u16, chunk));
        row += rows;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header() {
        let data = vec![0xAA; 48 * 10];
        let cmd = raster(48, 10, &data);
        assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 48, 0, 10, 0]);
        assert_eq!(&cmd[8..], &data[..]);
    }

    #[test]
    fn test_raster_large_height() {
        let data = vec![0; 300];
        let cmd = raster(1, 300, &data);
        assert_eq!(&cmd[6..8], &[0x2C, 0x01]);
    }

    #[test]
    fn test_chunked_single() {
        let data = vec![0xFF; 8 * 64];
        assert_eq!(raster_chunked(8, 64, &data), raster(8, 64, &data));
    }

    #[test]
    fn test_chunked_split() {
        let width_bytes = 4;
        let data: Vec<u8> = (0..width_bytes * 600).map(|i| (i / width_bytes) as u8).collect();
        let cmd = raster_chunked(width_bytes, 600, &data);

        // 256 + 256 + 88 rows
        assert_eq!(cmd.len(), 3 * 8 + data.len());
        assert_eq!(&cmd[6..8], &[0x00, 0x01]);

        let second = 8 + 256 * width_bytes;
        assert_eq!(&cmd[second..second + 4], &[0x1D, 0x76, 0x30, 0x00]);
        // First data byte of the second chunk is row 256
        assert_eq!(cmd[second + 8], 0u8);

        let third = second + 8 + 256 * width_bytes;
        assert_eq!(&cmd[third + 6..third + 8], &[88, 0]);
    }

    #[test]
    fn test_chunked_empty() {
        assert!(raster_chunked(4, 0, &[]).is_empty());
    }
}
