use super::error::{EntryFault, FormatError};
use super::header::{payload_start, IconDir, IconDirEntry, MAX_DIMENSION};

/// One square image to embed, already encoded (PNG).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub size: u32,
    pub pixel_data: Vec<u8>,
}

impl IconImage {
    pub fn new(size: u32, pixel_data: Vec<u8>) -> Self {
        Self { size, pixel_data }
    }

    fn check(&self, index: usize) -> Result<(), FormatError> {
        if self.size == 0 || self.size > MAX_DIMENSION {
            return Err(FormatError::entry(index, EntryFault::SizeOutOfRange(self.size)));
        }
        if self.pixel_data.is_empty() {
            return Err(FormatError::entry(index, EntryFault::EmptyPayload));
        }
        Ok(())
    }
}

/// An ordered, validated set of images ready to be written as one `.ico`.
///
/// Entry order is directory order. Duplicate sizes are kept as-is.
#[derive(Debug, Clone)]
pub struct IcoContainer {
    entries: Vec<IconImage>,
    directory: Vec<IconDirEntry>,
}

impl IcoContainer {
    pub fn new(entries: Vec<IconImage>) -> Result<Self, FormatError> {
        let directory = layout(&entries)?;
        Ok(Self { entries, directory })
    }

    pub fn entries(&self) -> &[IconImage] {
        &self.entries
    }

    /// Directory records with their computed payload offsets.
    pub fn directory(&self) -> &[IconDirEntry] {
        &self.directory
    }

    /// Length of the serialized file.
    pub fn encoded_len(&self) -> usize {
        encoded_len(&self.entries)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        write(&self.entries, &self.directory)
    }
}

/// Serialize `entries` into a complete ICO file.
pub fn encode(entries: &[IconImage]) -> Result<Vec<u8>, FormatError> {
    let directory = layout(entries)?;
    Ok(write(entries, &directory))
}

/// Validate entries and compute each directory record.
fn layout(entries: &[IconImage]) -> Result<Vec<IconDirEntry>, FormatError> {
    if entries.is_empty() {
        return Err(FormatError::EmptyInput);
    }
    if entries.len() > u16::MAX as usize {
        return Err(FormatError::entry(
            u16::MAX as usize,
            EntryFault::TooManyImages,
        ));
    }
    for (index, entry) in entries.iter().enumerate() {
        entry.check(index)?;
    }

    let lens: Vec<usize> = entries.iter().map(|e| e.pixel_data.len()).collect();
    let offsets = payload_offsets(&lens)?;

    Ok(entries
        .iter()
        .zip(offsets)
        .map(|(entry, data_offset)| IconDirEntry {
            size: entry.size,
            data_size: entry.pixel_data.len() as u32,
            data_offset,
        })
        .collect())
}

/// Offset of each payload: a running prefix sum starting right after the
/// directory. Every payload must end within the 32-bit offset range.
fn payload_offsets(lens: &[usize]) -> Result<Vec<u32>, FormatError> {
    let mut offset = payload_start(lens.len()) as u64;
    let mut offsets = Vec::with_capacity(lens.len());
    for (index, &len) in lens.iter().enumerate() {
        let end = offset + len as u64;
        if end > u32::MAX as u64 {
            return Err(FormatError::entry(index, EntryFault::OffsetOverflow));
        }
        offsets.push(offset as u32);
        offset = end;
    }
    Ok(offsets)
}

fn encoded_len(entries: &[IconImage]) -> usize {
    payload_start(entries.len()) + entries.iter().map(|e| e.pixel_data.len()).sum::<usize>()
}

fn write(entries: &[IconImage], directory: &[IconDirEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(entries));

    IconDir {
        count: entries.len() as u16,
    }
    .write_to(&mut out);
    for record in directory {
        record.write_to(&mut out);
    }
    for entry in entries {
        out.extend_from_slice(&entry.pixel_data);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(buf: &[u8], pos: usize) -> u16 {
        u16::from_le_bytes([buf[pos], buf[pos + 1]])
    }

    fn u32_at(buf: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
    }

    fn payload(len: usize, seed: u8) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
    }

    #[test]
    fn test_single_entry_layout() {
        let data = payload(100, 7);
        let bytes = encode(&[IconImage::new(16, data.clone())]).unwrap();

        assert_eq!(bytes.len(), 122);
        assert_eq!(u16_at(&bytes, 0), 0);
        assert_eq!(u16_at(&bytes, 2), 1);
        assert_eq!(u16_at(&bytes, 4), 1);
        assert_eq!(bytes[6], 16); // width
        assert_eq!(bytes[7], 16); // height
        assert_eq!(bytes[8], 0);
        assert_eq!(bytes[9], 0);
        assert_eq!(u16_at(&bytes, 10), 1);
        assert_eq!(u16_at(&bytes, 12), 32);
        assert_eq!(u32_at(&bytes, 14), 100);
        assert_eq!(u32_at(&bytes, 18), 22);
        assert_eq!(&bytes[22..122], data.as_slice());
    }

    #[test]
    fn test_two_entries_256_and_48() {
        let big = payload(1000, 1);
        let small = payload(500, 2);
        let bytes = encode(&[
            IconImage::new(256, big.clone()),
            IconImage::new(48, small.clone()),
        ])
        .unwrap();

        assert_eq!(bytes.len(), 1538);
        assert_eq!(u16_at(&bytes, 4), 2);

        // 256 is written as 0
        assert_eq!(bytes[6], 0);
        assert_eq!(bytes[7], 0);
        assert_eq!(u32_at(&bytes, 14), 1000);
        assert_eq!(u32_at(&bytes, 18), 38);

        assert_eq!(bytes[22], 48);
        assert_eq!(bytes[23], 48);
        assert_eq!(u32_at(&bytes, 30), 500);
        assert_eq!(u32_at(&bytes, 34), 1038);

        assert_eq!(&bytes[38..1038], big.as_slice());
        assert_eq!(&bytes[1038..1538], small.as_slice());
    }

    #[test]
    fn test_payloads_recoverable_from_directory() {
        let entries: Vec<IconImage> = [16u32, 24, 32, 48, 64, 128, 256]
            .iter()
            .enumerate()
            .map(|(i, &s)| IconImage::new(s, payload(10 + i * 37, i as u8)))
            .collect();
        let bytes = encode(&entries).unwrap();

        let n = entries.len();
        let expected_len = 6 + 16 * n + entries.iter().map(|e| e.pixel_data.len()).sum::<usize>();
        assert_eq!(bytes.len(), expected_len);
        assert_eq!(u16_at(&bytes, 4) as usize, n);

        for (i, entry) in entries.iter().enumerate() {
            let rec = 6 + 16 * i;
            let size = u32_at(&bytes, rec + 8) as usize;
            let offset = u32_at(&bytes, rec + 12) as usize;
            assert_eq!(size, entry.pixel_data.len());
            assert_eq!(&bytes[offset..offset + size], entry.pixel_data.as_slice());
        }
    }

    #[test]
    fn test_duplicate_sizes_kept() {
        let bytes = encode(&[
            IconImage::new(32, vec![1; 4]),
            IconImage::new(32, vec![2; 4]),
        ])
        .unwrap();
        assert_eq!(u16_at(&bytes, 4), 2);
        assert_eq!(bytes[6], 32);
        assert_eq!(bytes[22], 32);
        assert_eq!(bytes.len(), 6 + 32 + 8);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(encode(&[]), Err(FormatError::EmptyInput));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = encode(&[IconImage::new(32, Vec::new())]).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidEntry {
                index: 0,
                fault: EntryFault::EmptyPayload
            }
        );
    }

    #[test]
    fn test_out_of_range_size_rejected() {
        let err = encode(&[
            IconImage::new(16, vec![1]),
            IconImage::new(257, vec![1]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidEntry {
                index: 1,
                fault: EntryFault::SizeOutOfRange(257)
            }
        );

        assert!(encode(&[IconImage::new(0, vec![1])]).is_err());
    }

    #[test]
    fn test_container_matches_encode() {
        let entries = vec![IconImage::new(256, payload(40, 3)), IconImage::new(16, payload(9, 4))];
        let container = IcoContainer::new(entries.clone()).unwrap();
        assert_eq!(container.to_bytes(), encode(&entries).unwrap());

        let dir = container.directory();
        assert_eq!(dir[0].data_offset, 38);
        assert_eq!(dir[1].data_offset, 78);
        assert_eq!(container.entries().len(), 2);
        assert_eq!(container.encoded_len(), 38 + 40 + 9);
    }

    #[test]
    fn test_too_many_images_rejected() {
        let entries = vec![IconImage::new(16, vec![1]); 65_536];
        assert_eq!(
            encode(&entries),
            Err(FormatError::InvalidEntry {
                index: 65_535,
                fault: EntryFault::TooManyImages
            })
        );

        let entries = vec![IconImage::new(16, vec![1]); 65_535];
        let bytes = encode(&entries).unwrap();
        assert_eq!(u16_at(&bytes, 4), u16::MAX);
    }

    #[test]
    fn test_payload_offsets_prefix_sum() {
        assert_eq!(payload_offsets(&[1000, 500, 1]).unwrap(), vec![54, 1054, 1554]);
    }

    #[test]
    fn test_payload_ending_at_u32_max_fits() {
        let last = u32::MAX as usize - 22;
        assert_eq!(payload_offsets(&[last]).unwrap(), vec![22]);
    }

    #[test]
    fn test_payload_past_u32_max_rejected() {
        assert_eq!(
            payload_offsets(&[1000, u32::MAX as usize]),
            Err(FormatError::InvalidEntry {
                index: 1,
                fault: EntryFault::OffsetOverflow
            })
        );
        assert_eq!(
            payload_offsets(&[u32::MAX as usize - 21]),
            Err(FormatError::InvalidEntry {
                index: 0,
                fault: EntryFault::OffsetOverflow
            })
        );
    }

    #[test]
    fn test_container_rejects_empty() {
        assert!(matches!(
            IcoContainer::new(Vec::new()),
            Err(FormatError::EmptyInput)
        ));
    }
}
