use super::{OodleCompressor, OodleLevel, OodleLibrary};
use crate::envelope::{EnvelopeError, EnvelopeErrorKind};
use libloading::Library;
use std::ffi::{c_int, c_void};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type DecompressFn = unsafe extern "C" fn(
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_size: usize,
    fuzz_safe: c_int,
    check_crc: c_int,
    verbosity: c_int,
    dec_buf_base: *mut c_void,
    dec_buf_size: usize,
    callback: *mut c_void,
    callback_userdata: *mut c_void,
    scratch: *mut c_void,
    scratch_size: usize,
    thread_phase: c_int,
) -> c_int;

type CompressFn = unsafe extern "C" fn(
    compressor: c_int,
    src: *const u8,
    src_len: c_int,
    dst: *mut u8,
    dst_capacity: usize,
    level: c_int,
) -> c_int;

#[cfg(windows)]
const LIBRARY_NAME: &str = "libooz.dll";

#[cfg(not(windows))]
const LIBRARY_NAME: &str = "libooz.so";

/// Returns the library subdirectory for the running platform
pub fn platform_dir() -> Result<&'static str, EnvelopeError> {
    use std::env::consts::{ARCH, OS};
    match (OS, ARCH) {
        ("windows", _) => Ok("windows"),
        ("linux", "x86_64") => Ok("linux_x86_64"),
        ("linux", "aarch64" | "arm") => Ok("linux_arm64"),
        ("linux", arch) => Err(EnvelopeErrorKind::LibraryUnavailable(format!(
            "unsupported linux architecture: {}",
            arch
        ))
        .into()),
        (os, _) => Err(
            EnvelopeErrorKind::LibraryUnavailable(format!("unsupported platform: {}", os)).into(),
        ),
    }
}

/// `libooz` loaded at runtime.
///
/// The library is resolved once, and every call afterwards goes through
/// the same mutex as the library makes no reentrancy guarantees.
///
/// ```no_run
/// use palsav::compression::OozLibrary;
/// use palsav::SaveCodec;
///
/// let lib = OozLibrary::load("lib")?;
/// let codec = SaveCodec::builder().oodle(lib).build();
/// # Ok::<(), palsav::Error>(())
/// ```
pub struct OozLibrary {
    decompress: DecompressFn,
    compress: CompressFn,
    lock: Mutex<()>,
    path: PathBuf,

    // keeps the function pointers above valid
    _lib: Library,
}

impl std::fmt::Debug for OozLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OozLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl OozLibrary {
    /// Loads the library for this platform from `<lib_dir>/<platform>/`
    pub fn load<P: AsRef<Path>>(lib_dir: P) -> Result<Self, EnvelopeError> {
        let path = lib_dir.as_ref().join(platform_dir()?).join(LIBRARY_NAME);
        Self::open(path)
    }

    /// Loads the library from an exact path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EnvelopeError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EnvelopeErrorKind::LibraryUnavailable(format!(
                "{} not found",
                path.display()
            ))
            .into());
        }

        let unavailable =
            |e: libloading::Error| EnvelopeErrorKind::LibraryUnavailable(format!("{}", e));

        // SAFETY: loading runs the library's initializers. libooz is plain C
        // with no initialization side effects.
        let lib = unsafe { Library::new(path) }.map_err(unavailable)?;

        // SAFETY: the signatures match the exported C declarations
        let decompress = unsafe { lib.get::<DecompressFn>(b"Ooz_Decompress\0").map(|f| *f) }
            .map_err(unavailable)?;
        let compress = unsafe { lib.get::<CompressFn>(b"Ooz_Compress\0").map(|f| *f) }
            .map_err(unavailable)?;

        log::debug!("loaded oodle library from {}", path.display());
        Ok(OozLibrary {
            decompress,
            compress,
            lock: Mutex::new(()),
            path: path.to_path_buf(),
            _lib: lib,
        })
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OodleLibrary for OozLibrary {
    fn compress(
        &self,
        compressor: OodleCompressor,
        src: &[u8],
        dst: &mut [u8],
        level: OodleLevel,
    ) -> i64 {
        let Ok(src_len) = c_int::try_from(src.len()) else {
            return -1;
        };

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: both buffers are valid for the lengths passed and the
        // library writes at most `dst.len()` bytes
        let status = unsafe {
            (self.compress)(
                compressor.value(),
                src.as_ptr(),
                src_len,
                dst.as_mut_ptr(),
                dst.len(),
                level.value(),
            )
        };
        i64::from(status)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8], expected_len: usize) -> i64 {
        if dst.len() < expected_len {
            return -1;
        }

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: `dst` holds `expected_len` bytes plus the padding the
        // decoder may overrun into, and the optional buffers are null
        let status = unsafe {
            (self.decompress)(
                src.as_ptr(),
                src.len(),
                dst.as_mut_ptr(),
                expected_len,
                0,
                0,
                0,
                std::ptr::null_mut(),
                0,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                0,
                0,
            )
        };
        i64::from(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_dir() {
        let dir = platform_dir();
        if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
            assert_eq!(dir.unwrap(), "linux_x86_64");
        } else if cfg!(windows) {
            assert_eq!(dir.unwrap(), "windows");
        }
    }

    #[test]
    fn test_missing_library() {
        let err = OozLibrary::open("/nonexistent/libooz.so").unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::LibraryUnavailable(_)
        ));
    }
}
