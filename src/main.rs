use std::{
    path::Path,
    process,
};
use mtkfwsplit_rs::mtkfwsplit;

fn main() {
    let argv: Vec<String> = std::env::args().collect();

    if argv.len() != 3 {
        eprintln!("[!] Wrong number of arguments\n\
                   mtkfwsplit-rs - tool to extract the firmware blobs from a MediaTek driver bundle\n\
                   Usage: {prog} <mtkwlan.dat> <output-dir-or-file>\n  \
                   If output is a directory or has no extension: extract all firmware blobs\n  \
                   If output is a .bin file: extract BT firmware only (legacy mode)",
                   prog=argv.first().map_or("mtkfwsplit-rs", String::as_str));
        process::exit(1)
    }

    if let Err(err) = mtkfwsplit(Path::new(&argv[1]), Path::new(&argv[2]), 1) {
        eprintln!("[!] {err}");
        process::exit(1)
    }
}
