//! Subordinate bring-up for STREAMS pseudo-terminals.
//!
//! On illumos and Solaris the pty controller (`/dev/ptmx`) is a STREAMS clone device. Unlocking
//! the subordinate and looking up its name is done with `I_STR` ioctls carrying driver specific
//! commands, and the subordinate only behaves like a terminal once `ptem` and `ldterm` have been
//! pushed onto its stream.
//!
//! The sequence is written against the [`Streams`] trait. [`Native`] issues the real system
//! calls; tests drive the same code through a recording fake.

use log::{debug, trace};
use nix::errno::Errno;
use std::fmt;
use std::io;
#[cfg(any(target_os = "illumos", target_os = "solaris"))]
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::result;

pub mod ffi;
#[cfg(any(target_os = "illumos", target_os = "solaris"))]
mod native;

use self::ffi::{DeviceNumber, Module, StrIoctl};
#[cfg(any(target_os = "illumos", target_os = "solaris"))]
pub use self::native::Native;

/// The error reported by the failing system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum Error {
    Sys(Errno),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn errno(&self) -> Errno {
        match *self {
            Error::Sys(errno) => errno,
        }
    }
}

impl ::std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.errno().desc())
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        io::Error::from_raw_os_error(e.errno() as i32)
    }
}

/// The kernel primitives the pty bring-up is made of.
///
/// Every method is one blocking system call, attempted exactly once.
pub trait Streams {
    /// `ioctl(fd, I_STR, request)`
    fn str_ioctl(&mut self, fd: RawFd, request: &mut StrIoctl) -> Result<()>;

    /// `st_rdev` from `fstat(fd)`
    fn fstat_rdev(&mut self, fd: RawFd) -> Result<DeviceNumber>;

    /// `open(path, O_RDWR | O_NOCTTY)`. Ownership of the returned descriptor passes to the caller.
    fn open_subordinate(&mut self, path: &Path) -> Result<RawFd>;

    /// `ioctl(fd, I_PUSH, name)`
    fn push_module(&mut self, fd: RawFd, module: Module) -> Result<()>;
}

/// Path of the subordinate device with the given device number.
pub fn subordinate_path(rdev: DeviceNumber) -> PathBuf {
    PathBuf::from(format!("{}/{}", ffi::PTS_DIR, ffi::minor(rdev)))
}

/// Resolves the subordinate path of the controller `fd`. Does not change any device state.
pub fn ptsname_with<S: Streams>(streams: &mut S, fd: RawFd) -> Result<PathBuf> {
    let mut request = StrIoctl::command(ffi::ISPTM);
    trace!("I_STR cmd={:#x} on fd {}", request.cmd(), fd);
    streams.str_ioctl(fd, &mut request)?;

    let rdev = streams.fstat_rdev(fd)?;
    let path = subordinate_path(rdev);
    debug!("pty controller fd {} (rdev {:#x}) pairs with {}", fd, rdev, path.display());
    Ok(path)
}

/// Unlocks the subordinate of the controller `fd` and pushes the terminal modules onto it.
///
/// Stops at the first failing step and leaves the device as the completed steps left it. The
/// subordinate descriptor opened for the pushes is not closed, consumers open the returned path
/// themselves.
pub fn unlockpt_with<S: Streams>(streams: &mut S, fd: RawFd) -> Result<PathBuf> {
    let mut request = StrIoctl::command(ffi::UNLKPT);
    trace!("I_STR cmd={:#x} on fd {}", request.cmd(), fd);
    streams.str_ioctl(fd, &mut request)?;
    debug!("unlocked subordinate of pty controller fd {}", fd);

    let path = ptsname_with(streams, fd)?;

    let subordinate = streams.open_subordinate(&path)?;
    debug!("opened {} as fd {}", path.display(), subordinate);

    for &module in &[Module::Ptem, Module::Ldterm] {
        streams.push_module(subordinate, module)?;
        debug!("pushed {} onto {}", module.name(), path.display());
    }

    Ok(path)
}

/// Path of the subordinate device paired with the controller `master`.
#[cfg(any(target_os = "illumos", target_os = "solaris"))]
pub fn ptsname<F: AsRawFd>(master: &F) -> Result<PathBuf> {
    ptsname_with(&mut Native, master.as_raw_fd())
}

/// Unlocks and prepares the subordinate of `master`, returning its path.
#[cfg(any(target_os = "illumos", target_os = "solaris"))]
pub fn unlockpt<F: AsRawFd>(master: &F) -> Result<PathBuf> {
    unlockpt_with(&mut Native, master.as_raw_fd())
}
