//! A minimal read-only memory map of a file.
//!
//! This is deliberately not a general-purpose mmap wrapper: it exposes
//! exactly the contract the reader stage needs, a `&[u8]` over the whole
//! file, acquired once up front.

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// A read-only mapping of an entire file.
pub struct Mapping {
    addr: *mut libc::c_void,
    len: usize,
}

// The mapping is a plain read-only view of file-backed memory; sharing
// it across reader threads is exactly what it's for.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

impl Mapping {
    /// Maps `path` read-only for its full length.
    pub fn open(path: &Path) -> io::Result<Self> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_RDONLY) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        let len = match std::fs::metadata(path) {
            Ok(meta) => meta.len() as usize,
            Err(e) => {
                unsafe { libc::close(fd) };
                return Err(e);
            }
        };

        if len == 0 {
            unsafe { libc::close(fd) };
            return Ok(Mapping {
                addr: std::ptr::null_mut(),
                len: 0,
            });
        }

        let addr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_PRIVATE,
                fd,
                0,
            )
        };

        // Safe to close now; the mapping keeps the pages alive.
        unsafe { libc::close(fd) };

        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        Ok(Mapping { addr, len })
    }

    /// The mapped bytes.
    pub fn as_slice(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.addr as *const u8, self.len) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        if !self.addr.is_null() {
            unsafe { libc::munmap(self.addr, self.len) };
        }
    }
}
