//! Unlocking and preparing STREAMS pseudo-terminals on illumos and Solaris.
//!
//! ```no_run
//! # #[cfg(any(target_os = "illumos", target_os = "solaris"))]
//! # fn main() -> std::io::Result<()> {
//! let controller = std::fs::OpenOptions::new().read(true).write(true).open("/dev/ptmx")?;
//! let subordinate = strpty::unlockpt(&controller)?;
//! println!("{}", subordinate.display());
//! # Ok(())
//! # }
//! # #[cfg(not(any(target_os = "illumos", target_os = "solaris")))]
//! # fn main() {}
//! ```

pub mod pty;

pub use pty::ffi;
pub use pty::{ptsname_with, subordinate_path, unlockpt_with, Error, Result, Streams};
#[cfg(any(target_os = "illumos", target_os = "solaris"))]
pub use pty::{ptsname, unlockpt, Native};
