//! Class-file version verification.
//!
//! Compiled `.class` files carry the bytecode level in their header: the
//! magic `0xCAFEBABE`, a big-endian minor version, then a big-endian major
//! version. Major 45 is Java 1.1, so the Java release a class targets is
//! `major - 44`. A class is acceptable when its release is at or below the
//! requested target.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const CLASS_MAGIC: u32 = 0xCAFE_BABE;
const MAJOR_BASE: u16 = 44;

#[derive(Error, Debug)]
pub enum CvvError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a class file (bad magic)")]
    BadMagic { path: PathBuf },

    #[error("{path} is truncated")]
    Truncated { path: PathBuf },
}

/// One inspected class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub path: PathBuf,
    /// Classfile major version, e.g. 52 for Java 8.
    pub major: u16,
}

impl ClassRecord {
    /// Java release this class targets.
    pub fn release(&self) -> u16 {
        self.major.saturating_sub(MAJOR_BASE)
    }
}

#[derive(Debug, Default)]
pub struct VersionCheck {
    target: u16,
    pub good: Vec<ClassRecord>,
    pub bad: Vec<ClassRecord>,
}

impl VersionCheck {
    /// `target` is the Java release, e.g. 8 for "1.8" or "8".
    pub fn new(target: u16) -> Self {
        Self {
            target,
            good: Vec::new(),
            bad: Vec::new(),
        }
    }

    pub fn target(&self) -> u16 {
        self.target
    }

    pub fn checked(&self) -> usize {
        self.good.len() + self.bad.len()
    }

    /// Inspects one file. Non-class files are skipped without error.
    pub fn check_file(&mut self, path: &Path) -> Result<(), CvvError> {
        if path.extension().map_or(true, |ext| ext != "class") {
            return Ok(());
        }
        let major = read_major(path)?;
        let record = ClassRecord {
            path: path.to_path_buf(),
            major,
        };
        if record.release() <= self.target {
            self.good.push(record);
        } else {
            self.bad.push(record);
        }
        Ok(())
    }

    /// Walks a directory tree, inspecting every class file under it.
    pub fn check_dir(&mut self, dir: &Path) -> Result<(), CvvError> {
        for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            if entry.file_type().is_file() {
                self.check_file(entry.path())?;
            }
        }
        Ok(())
    }
}

fn read_major(path: &Path) -> Result<u16, CvvError> {
    let mut header = [0u8; 8];
    let mut file = File::open(path).map_err(|source| CvvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    file.read_exact(&mut header).map_err(|_| CvvError::Truncated {
        path: path.to_path_buf(),
    })?;

    let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if magic != CLASS_MAGIC {
        return Err(CvvError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    // Bytes 4-5 are the minor version, 6-7 the major.
    Ok(u16::from_be_bytes([header[6], header[7]]))
}

/// Parses a `-t` argument. Both "1.4" and "4" mean release 4.
pub fn parse_target(raw: &str) -> Option<u16> {
    raw.rsplit('.').next()?.parse().ok()
}
