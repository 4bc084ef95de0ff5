//clippy config
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::use_self, //issues with this from nursery
    clippy::cast_possible_truncation //can't do much about this
)]

use std::{
    path::{Path, PathBuf},
    io::{Write, BufWriter},
    fs
};

use prettytable::{format, row, Table};

#[macro_use]
mod utils;
mod config;
mod container;
mod error;

pub use config::{ContainerKind, OutputMode};
pub use container::{extract, locate, Entry};
pub use error::{Error, Result};
pub use utils::BuildTime;


/// A blob that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub entry: Entry,
    pub path: PathBuf,
}

//one row per written blob
fn summary(extracted: &[Extracted]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["name", "built", "offset", "size"]);
    for blob in extracted {
        let built = blob.entry.timestamp.map_or_else(|| String::from("-"), |t| t.to_string());
        table.add_row(row![
            blob.entry.name,
            built,
            format!("{:#x}", blob.entry.offset),
            format!("{:#x}", blob.entry.size)
        ]);
    }
    table
}

/// The main logic of the program.
/// # Arguments
/// * `filein` - The container to read from, its file name decides the [`ContainerKind`]
/// * `output` - A `.bin` file for just the primary blob, otherwise a directory for all of them
/// * `verbose` - The verbosity level (0 for no output, 1 for normal output)
/// # Errors
/// * Input file errors (permissions, not found, etc.)
/// * The first blob that can't be found or sliced out, later blobs are not attempted
/// * Errors while writing to the output path
/// * Errors while writing to stdout
pub fn mtkfwsplit(filein: &Path, output: &Path, verbose: usize) -> Result<Vec<Extracted>> {
    let container: Vec<u8> = fs::read(filein)?;
    let kind = ContainerKind::from_path(filein);
    let mode = OutputMode::from_target(output);
    if let OutputMode::Directory(dir) = &mode {
        fs::create_dir_all(dir)?;
    }

    //fast stdout
    let stdout = std::io::stdout();
    let outlock = stdout.lock();
    let mut outbuf: BufWriter<Box<dyn Write>> = std::io::BufWriter::new(
        if verbose == 1 {
            Box::new(outlock)
        } else {
            Box::new(std::io::sink())
        }
    );

    let mut extracted = Vec::new();
    for (name, path) in mode.targets(kind) {
        let entry = locate(&container, name.as_bytes())?;
        let blob = entry.blob(&container)?;
        utils::filewrite(&path, blob)?;
        writeln!(&mut outbuf, "Extracted {name}: {len} bytes -> {path}", len=blob.len(), path=path.display())?;
        extracted.push(Extracted { entry, path });
    }

    summary(&extracted).print(&mut outbuf)?;
    outbuf.flush()?;
    Ok(extracted)
}

use core::ffi::{c_char, CStr};

/// Calls the main logic of the program with FFI.
/// # Arguments
/// * `filein` - the path to the firmware container
/// * `output` - the path to the output directory, or to a `.bin` file
/// * `verbose` - the verbosity level (0 for no output, 1 for normal output)
/// # Returns
/// * 0 on success
/// * 1 on failure
/// # Safety
/// * `filein` and `output` must each be null, or a null terminated char array
#[no_mangle]
pub unsafe extern "C" fn split(filein: *const c_char, output: *const c_char, verbose: usize) -> isize {
    if filein.is_null() || output.is_null() { return 1 }
    let Ok(filein) = unsafe { CStr::from_ptr(filein) }.to_str() else { return 1 };
    let Ok(output) = unsafe { CStr::from_ptr(output) }.to_str() else { return 1 };
    match mtkfwsplit(Path::new(filein), Path::new(output), verbose) {
        Ok(_) => 0,
        Err(_) => 1
    }
}
