use std::ffi::CString;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

use nix::errno::Errno;

use super::ffi::{self, DeviceNumber, Module, StrIoctl};
use super::{Result, Streams};

macro_rules! unsafe_try {
    ( $x:expr ) => {{
        let ret = unsafe { $x };

        if ret < 0 {
            return Err(Errno::last().into());
        } else {
            ret
        }
    }};
}

/// The running kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct Native;

impl Native {
    /// Reads the terminal attributes of `fd` with `TCGETS`.
    pub fn tcgets(&self, fd: RawFd) -> Result<libc::termios> {
        let mut termios: libc::termios = unsafe { mem::zeroed() };
        unsafe_try!(libc::ioctl(fd, ffi::TCGETS, &mut termios as *mut libc::termios));
        Ok(termios)
    }
}

impl Streams for Native {
    fn str_ioctl(&mut self, fd: RawFd, request: &mut StrIoctl) -> Result<()> {
        unsafe_try!(libc::ioctl(fd, ffi::I_STR, request as *mut StrIoctl));
        Ok(())
    }

    fn fstat_rdev(&mut self, fd: RawFd) -> Result<DeviceNumber> {
        let mut status: libc::stat = unsafe { mem::zeroed() };
        unsafe_try!(libc::fstat(fd, &mut status));
        Ok(status.st_rdev as DeviceNumber)
    }

    fn open_subordinate(&mut self, path: &Path) -> Result<RawFd> {
        // Paths come from ptsname and never contain NUL.
        let path = CString::new(path.as_os_str().as_bytes()).map_err(|_| Errno::EINVAL)?;
        let fd = unsafe_try!(libc::open(path.as_ptr(), libc::O_RDWR | libc::O_NOCTTY));
        Ok(fd)
    }

    fn push_module(&mut self, fd: RawFd, module: Module) -> Result<()> {
        let name = module.name_with_nul();
        unsafe_try!(libc::ioctl(fd, ffi::I_PUSH, name.as_ptr() as *const libc::c_char));
        Ok(())
    }
}
