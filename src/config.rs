//which blobs to pull out of which container, and where to put them

use std::path::{Path, PathBuf};

/// The container variants seen in driver bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// `mtkwlan.dat`, carries the Bluetooth and both WLAN blobs
    Wlan,
    /// Bluetooth-only bundle
    Bluetooth,
}

const WLAN_BLOBS: [&str; 3] = [
    "BT_RAM_CODE_MT6639_2_1_hdr.bin",
    "WIFI_MT6639_PATCH_MCU_2_1_hdr.bin",
    "WIFI_RAM_CODE_MT6639_2_1.bin",
];

const BT_BLOBS: [&str; 1] = [
    "BT_RAM_CODE_MT6639_2_1_hdr.bin",
];

impl ContainerKind {
    /// Picks the variant from the container's file name, the contents are never looked at.
    ///
    /// The stem is split on anything that isn't a letter or digit; a `bt` or `mtkbt...`
    /// word selects [`ContainerKind::Bluetooth`] unless some word mentions `wlan`.
    pub fn from_path(path: &Path) -> Self {
        let stem = path.file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let words: Vec<&str> = stem.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let bt = words.iter().any(|w| *w == "bt" || w.starts_with("mtkbt"));
        let wlan = words.iter().any(|w| w.contains("wlan"));
        if bt && !wlan { Self::Bluetooth } else { Self::Wlan }
    }

    /// Known blob names, in extraction order.
    pub const fn blob_names(self) -> &'static [&'static str] {
        match self {
            Self::Wlan => &WLAN_BLOBS,
            Self::Bluetooth => &BT_BLOBS,
        }
    }

    //the blob written in single file mode
    pub const fn primary(self) -> &'static str {
        self.blob_names()[0]
    }
}

/// Where extracted blobs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Only the primary blob, written to exactly this path
    Single(PathBuf),
    /// Every known blob, as `<dir>/<blob name>`
    Directory(PathBuf),
}

impl OutputMode {
    //a target ending in .bin is the old "just give me the BT firmware" invocation
    pub fn from_target(target: &Path) -> Self {
        if target.as_os_str().to_string_lossy().ends_with(".bin") {
            Self::Single(target.to_path_buf())
        } else {
            Self::Directory(target.to_path_buf())
        }
    }

    /// Pairs each blob name of `kind` with the file it is written to.
    pub fn targets(&self, kind: ContainerKind) -> Vec<(&'static str, PathBuf)> {
        match self {
            Self::Single(path) => vec![(kind.primary(), path.clone())],
            Self::Directory(dir) => kind.blob_names()
                .iter()
                .map(|name| (*name, dir.join(name)))
                .collect(),
        }
    }
}
