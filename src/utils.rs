/*
    Layout of an entry inside the container, as found in mtkwlan.dat:
        name bytes (no length prefix, no fixed width)
        0x00 padding, any amount
        14 ASCII digits, YYYYMMDDhhmmss, not present on every entry
        0x00 padding up to the next 4 byte boundary
        u32 LE offset of the blob from the start of the file
        u32 LE size of the blob
    There is no index table, entries are found by searching for their name.
*/
use binrw::BinRead;

//utility macros/functions to help make my life easier

//generate a struct from a slice of bytes, using binread
#[macro_export]
macro_rules! cast_struct {
    ($t: ty, $arr: expr) => {
        Cursor::new(&$arr).read_le::<$t>()
    }
}

//create a range from the start and size
pub const fn range_size(start: usize, size: usize) -> std::ops::Range<usize> {
    start..start+size
}

//round up to the alignment of the metadata pair
pub const fn align4(pos: usize) -> usize {
    (pos + 3) & !3
}

//true if the slice is exactly one timestamp worth of ASCII digits
pub fn is_timestamp(slice: &[u8]) -> bool {
    slice.len() == TIMESTAMP_LEN && slice.iter().all(u8::is_ascii_digit)
}

//write to file with a buffer, creating the parent folders first
pub fn filewrite(path: &std::path::Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    out.write_all(data)?;
    out.flush()
}

//structs

#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    pub offset: u32,
    pub size: u32,
}

//all of the below allows are due to macro generated code
#[allow(
    dead_code,
    clippy::map_unwrap_or,
    clippy::no_effect_underscore_binding,
    clippy::cast_lossless
)]
mod buildtime { //in a module to be able to apply allow attribute
    use modular_bitfield::prelude::*;
    use std::fmt;

    #[bitfield(bits = 40)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BuildTime {
        second: B6,
        minute: B6,
        hour: B5,
        day: B5,
        month: B4,
        year: B14,
    }

    impl BuildTime {
        /// Decodes a `YYYYMMDDhhmmss` digit run.
        ///
        /// Returns `None` if the run is not 14 ASCII digits or a field is out of range
        /// (month 13, minute 61, ...).
        pub fn parse(digits: &[u8]) -> Option<Self> {
            if !super::is_timestamp(digits) { return None }
            let num = |start: usize, len: usize| digits[super::range_size(start, len)]
                .iter()
                .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));

            let (year, month, day) = (num(0, 4), num(4, 2), num(6, 2));
            let (hour, minute, second) = (num(8, 2), num(10, 2), num(12, 2));
            if !(1..=12).contains(&month) || !(1..=31).contains(&day)
                || hour > 23 || minute > 59 || second > 59 {
                return None
            }

            //everything is below 60 here, the casts can't truncate
            Self::new()
                .with_year_checked(year).ok()?
                .with_month_checked(month as u8).ok()?
                .with_day_checked(day as u8).ok()?
                .with_hour_checked(hour as u8).ok()?
                .with_minute_checked(minute as u8).ok()?
                .with_second_checked(second as u8).ok()
        }
    }

    impl fmt::Display for BuildTime {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                self.year(), self.month(), self.day(), self.hour(), self.minute(), self.second())
        }
    }
}

pub use buildtime::BuildTime;

pub static TIMESTAMP_LEN: usize = 14;
pub static ENTRYMETA_SIZE: usize = 8;
