//finding an entry by name and slicing its blob out of the container

use memchr::memmem;

use binrw::{
    io::Cursor,
    BinReaderExt
};

use crate::error::{Error, Result};
#[allow(clippy::wildcard_imports)]
use crate::utils::*;

/// An entry record found in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Position of the first match of the name.
    pub name_pos: usize,
    /// Decoded build time, `None` if the entry has none or it doesn't decode.
    pub timestamp: Option<BuildTime>,
    /// Position of the offset/size pair, always a multiple of 4.
    pub meta_pos: usize,
    pub offset: usize,
    pub size: usize,
}

impl Entry {
    /// Borrows the blob this entry points to.
    /// # Errors
    /// * `SizeMismatch` if `offset + size` runs past the end of `container`
    pub fn blob<'a>(&self, container: &'a [u8]) -> Result<&'a [u8]> {
        let actual = container.len().saturating_sub(self.offset).min(self.size);
        if actual != self.size {
            return Err(Error::SizeMismatch { name: self.name.clone(), expected: self.size, actual })
        }
        //an empty blob may point anywhere, even past the end
        Ok(container.get(range_size(self.offset, self.size)).unwrap_or_default())
    }
}

/// Finds the entry for `name` and decodes its metadata, without touching the blob.
///
/// The first occurrence of `name` anywhere in the container is used, it does not
/// have to sit on a record boundary.
/// # Errors
/// * `NotFound` if `name` is empty or does not occur in `container`
/// * `Bounds` if the offset/size pair would be read past the end of `container`
pub fn locate(container: &[u8], name: &[u8]) -> Result<Entry> {
    let name_pos = if name.is_empty() { None } else { memmem::find(container, name) }
        .ok_or_else(|| Error::not_found(name))?;
    let mut pos = name_pos + name.len();

    while pos < container.len() && container[pos] == 0 {
        pos += 1;
    }

    //a short or non-numeric run means there is no timestamp, don't move
    let mut timestamp = None;
    if let Some(digits) = container.get(range_size(pos, TIMESTAMP_LEN)).filter(|d| is_timestamp(d)) {
        timestamp = BuildTime::parse(digits);
        pos += TIMESTAMP_LEN;
    }

    let meta_pos = align4(pos);
    if meta_pos + ENTRYMETA_SIZE > container.len() {
        return Err(Error::Bounds {
            name: String::from_utf8_lossy(name).into_owned(),
            position: meta_pos,
            len: container.len()
        })
    }
    let meta = cast_struct!(EntryMeta, container[range_size(meta_pos, ENTRYMETA_SIZE)])?;

    Ok(Entry {
        name: String::from_utf8_lossy(name).into_owned(),
        name_pos,
        timestamp,
        meta_pos,
        offset: meta.offset as usize,
        size: meta.size as usize,
    })
}

/// Copies the blob named `name` out of the container.
/// # Errors
/// * Any error of [`locate`] or [`Entry::blob`]
pub fn extract(container: &[u8], name: &[u8]) -> Result<Vec<u8>> {
    let entry = locate(container, name)?;
    entry.blob(container).map(<[u8]>::to_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const NAME: &[u8] = b"WIFI_RAM_CODE_MT6639_2_1.bin";
    const BLOB: &[u8] = b"\xDE\xAD\xBE\xEF\x01\x02";

    //name, padding, optional timestamp, alignment, metadata, 4 bytes of filler, blob
    fn build(name: &[u8], pad: usize, stamp: Option<&[u8]>, blob: &[u8]) -> Vec<u8> {
        let mut buf = name.to_vec();
        buf.resize(buf.len() + pad, 0);
        if let Some(stamp) = stamp {
            buf.extend_from_slice(stamp);
        }
        buf.resize(align4(buf.len()), 0);
        let offset = buf.len() + ENTRYMETA_SIZE + 4;
        buf.extend_from_slice(&u32::try_from(offset).unwrap().to_le_bytes());
        buf.extend_from_slice(&u32::try_from(blob.len()).unwrap().to_le_bytes());
        buf.extend_from_slice(&[0xff; 4]);
        buf.extend_from_slice(blob);
        buf
    }

    #[test]
    fn extracts_reference_container() {
        let mut container = NAME.to_vec();
        container.extend_from_slice(b"\x00\x00");
        container.extend_from_slice(&40u32.to_le_bytes());
        container.extend_from_slice(&4u32.to_le_bytes());
        container.extend_from_slice(&[0; 8]);
        container.extend_from_slice(b"\xDE\xAD\xBE\xEF");

        assert_eq!(extract(&container, NAME).unwrap(), b"\xDE\xAD\xBE\xEF");
    }

    #[test_case(b"FW", 0, None; "short name, no padding")]
    #[test_case(b"FW_A", 1, None; "aligned name, one pad byte")]
    #[test_case(b"FW_AB", 2, None; "odd name, two pad bytes")]
    #[test_case(b"FW_ABC", 3, None; "three pad bytes")]
    #[test_case(b"FW", 1, Some(b"20230102030405"); "stamped")]
    #[test_case(b"FW_A", 0, Some(b"20230102030405"); "stamped, no padding")]
    #[test_case(b"FW_ABC", 5, Some(b"19991231235959"); "stamped, long padding")]
    fn extracts_blob(name: &[u8], pad: usize, stamp: Option<&[u8]>) {
        let container = build(name, pad, stamp, BLOB);
        assert_eq!(extract(&container, name).unwrap(), BLOB);
    }

    #[test]
    fn extraction_is_idempotent() {
        let container = build(NAME, 2, Some(b"20240517120000"), BLOB);
        assert_eq!(extract(&container, NAME).unwrap(), extract(&container, NAME).unwrap());
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    fn metadata_is_aligned(rem: usize) {
        //the cursor lands on `4 + rem` after the name, the metadata goes right after
        let name = &b"FWNAME1"[..4 + rem];
        let mut container = name.to_vec();
        container.resize(align4(container.len()), 0);
        container.extend_from_slice(&[0x11, 0, 0, 0, 0x22, 0, 0, 0]);

        let entry = locate(&container, name).unwrap();
        assert_eq!(entry.meta_pos % 4, 0);
        assert!(entry.meta_pos >= name.len());
        assert_eq!((entry.offset, entry.size), (0x11, 0x22));
    }

    #[test]
    fn consumes_digit_timestamp() {
        let container = build(b"FW_A", 0, Some(b"20230102030405"), BLOB);
        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!(entry.meta_pos, 4 + 16);
        assert_eq!(entry.timestamp.unwrap().to_string(), "2023-01-02 03:04:05");
    }

    #[test]
    fn skips_nothing_on_non_digit_run() {
        let mut container = b"FW_A".to_vec();
        container.extend_from_slice(b"2023010203040X");
        container.extend_from_slice(&[0; 8]);

        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!(entry.meta_pos, 4);
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.offset, u32::from_le_bytes(*b"2023") as usize);
        assert_eq!(entry.size, u32::from_le_bytes(*b"0102") as usize);
    }

    #[test]
    fn short_digit_run_is_not_a_timestamp() {
        //only 8 bytes left after the name, so they are the metadata
        let container = b"FW_A12345678".to_vec();
        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!(entry.meta_pos, 4);
        assert_eq!(entry.offset, u32::from_le_bytes(*b"1234") as usize);
    }

    #[test]
    fn out_of_range_timestamp_is_still_skipped() {
        let container = build(b"FW_A", 0, Some(b"20231302030405"), BLOB);
        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!(entry.meta_pos, 4 + 16);
        assert_eq!(entry.timestamp, None);
        assert_eq!(extract(&container, b"FW_A").unwrap(), BLOB);
    }

    #[test]
    fn truncated_blob_is_a_size_mismatch() {
        let mut container = build(NAME, 2, None, BLOB);
        container.truncate(container.len() - 2);

        match extract(&container, NAME) {
            Err(Error::SizeMismatch { name, expected, actual }) => {
                assert_eq!(name, "WIFI_RAM_CODE_MT6639_2_1.bin");
                assert_eq!(expected, BLOB.len());
                assert_eq!(actual, BLOB.len() - 2);
            }
            other => panic!("expected a size mismatch, got {other:?}"),
        }
    }

    #[test]
    fn offset_past_end_is_a_size_mismatch() {
        let mut container = b"FW_A".to_vec();
        container.extend_from_slice(&u32::MAX.to_le_bytes());
        container.extend_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            extract(&container, b"FW_A"),
            Err(Error::SizeMismatch { actual: 0, .. })
        ));
    }

    #[test]
    fn zero_size_blob_is_empty() {
        let container = build(b"FW_A", 0, Some(b"20230102030405"), b"");
        assert_eq!(extract(&container, b"FW_A").unwrap(), b"");
    }

    #[test]
    fn zero_size_blob_past_end_is_empty() {
        let mut container = b"FW_A".to_vec();
        container.extend_from_slice(&0x1011u32.to_le_bytes());
        container.extend_from_slice(&0u32.to_le_bytes());

        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!((entry.offset, entry.size), (0x1011, 0));
        assert_eq!(extract(&container, b"FW_A").unwrap(), b"");
    }

    #[test_case(b"NOT_THERE.bin"; "absent")]
    #[test_case(b""; "empty name")]
    fn missing_name_is_not_found(name: &[u8]) {
        let container = build(NAME, 2, None, BLOB);
        assert!(matches!(extract(&container, name), Err(Error::NotFound { .. })));
    }

    #[test]
    fn metadata_past_end_is_out_of_bounds() {
        let container = b"junkFW_A\0\0\0\0\x10\0".to_vec();
        match locate(&container, b"FW_A") {
            Err(Error::Bounds { position, len, .. }) => {
                assert_eq!(position, 12);
                assert_eq!(len, container.len());
            }
            other => panic!("expected a bounds error, got {other:?}"),
        }
    }

    #[test]
    fn first_match_wins() {
        let mut container = build(b"FW_A", 0, None, b"first");
        container.extend_from_slice(&build(b"FW_A", 0, None, b"second"));

        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!(entry.name_pos, 0);
        assert_eq!(entry.blob(&container).unwrap(), b"first");
    }

    #[test]
    fn name_need_not_start_a_record() {
        let mut container = b"xyz".to_vec();
        container.extend_from_slice(&build(b"FW_A", 1, None, BLOB));
        //the record is shifted by 3, so only the match position and alignment hold
        let entry = locate(&container, b"FW_A").unwrap();
        assert_eq!(entry.name_pos, 3);
        assert_eq!(entry.meta_pos % 4, 0);
    }
}
