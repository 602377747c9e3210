// Kernel ABI of the illumos/Solaris STREAMS pseudo-terminal driver (ptm/pts).
// Values from <sys/stropts.h>, <sys/ptms.h>, <sys/termios.h> and <sys/mkdev.h>.

use libc::{c_char, c_int};

/// Device number as reported in `st_rdev`, widened to 64 bits on every target.
pub type DeviceNumber = u64;

const STR: c_int = (b'S' as c_int) << 8;
const TIOC: c_int = (b'T' as c_int) << 8;
const PTM: c_int = (b'P' as c_int) << 8;

/// Push a module onto the top of a stream. Argument is a NUL-terminated module name.
pub const I_PUSH: c_int = STR | 0o2;
/// Send an ioctl described by a `StrIoctl` down the stream.
pub const I_STR: c_int = STR | 0o10;

/// Get terminal attributes (`struct termios`).
pub const TCGETS: c_int = TIOC | 13;
/// Set terminal attributes (`struct termios`).
pub const TCSETS: c_int = TIOC | 14;

/// Succeeds only if the stream is the controller side of a pty pair.
pub const ISPTM: c_int = PTM | 1;
/// Unlock the subordinate side so it can be opened.
pub const UNLKPT: c_int = PTM | 2;

const PTEM: &[u8] = b"ptem\0";
const LDTERM: &[u8] = b"ldterm\0";

/// STREAMS modules that make a pty subordinate behave like a terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Module {
    /// Terminal emulation.
    Ptem,
    /// Line discipline.
    Ldterm,
}

impl Module {
    /// Module name including the terminating NUL, as `I_PUSH` expects it.
    pub fn name_with_nul(self) -> &'static [u8] {
        match self {
            Module::Ptem => PTEM,
            Module::Ldterm => LDTERM,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Module::Ptem => "ptem",
            Module::Ldterm => "ldterm",
        }
    }
}

/// Directory holding the subordinate device nodes.
pub const PTS_DIR: &str = "/dev/pts";

/// `struct strioctl`, argument of `I_STR`.
///
/// Only command-only requests can be built: no data block is ever handed to the kernel.
#[repr(C)]
#[derive(Debug)]
pub struct StrIoctl {
    ic_cmd: c_int,
    ic_timout: c_int,
    ic_len: c_int,
    ic_dp: *mut c_char,
}

impl StrIoctl {
    /// A request that carries only a command code: no timeout, no data block.
    pub fn command(cmd: c_int) -> Self {
        StrIoctl {
            ic_cmd: cmd,
            ic_timout: 0,
            ic_len: 0,
            ic_dp: ::std::ptr::null_mut(),
        }
    }

    pub fn cmd(&self) -> c_int {
        self.ic_cmd
    }

    pub fn timeout(&self) -> c_int {
        self.ic_timout
    }

    pub fn data_len(&self) -> c_int {
        self.ic_len
    }

    pub fn has_payload(&self) -> bool {
        !self.ic_dp.is_null()
    }
}

#[cfg(all(test, target_pointer_width = "64"))]
const NBITSMINOR: u32 = 32;
#[cfg(target_pointer_width = "64")]
const MAXMIN: DeviceNumber = 0xffff_ffff;

#[cfg(all(test, not(target_pointer_width = "64")))]
const NBITSMINOR: u32 = 18;
#[cfg(not(target_pointer_width = "64"))]
const MAXMIN: DeviceNumber = 0x3ffff;

/// Minor component of a device number.
pub fn minor(dev: DeviceNumber) -> u32 {
    (dev & MAXMIN) as u32
}

#[cfg(test)]
pub(crate) fn makedev(major: u32, minor: u32) -> DeviceNumber {
    (DeviceNumber::from(major) << NBITSMINOR) | (DeviceNumber::from(minor) & MAXMIN)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::mem;

    #[test]
    fn test_command_codes() {
        assert_eq!(ISPTM, 0x5001);
        assert_eq!(UNLKPT, 0x5002);
        assert_eq!(I_PUSH, 0x5302);
        assert_eq!(I_STR, 0x5308);
        assert_eq!(TCGETS, 0x540d);
        assert_eq!(TCSETS, 0x540e);
    }

    #[test]
    fn test_module_names_nul_terminated() {
        for &module in &[Module::Ptem, Module::Ldterm] {
            let name = module.name_with_nul();
            assert_eq!(name.last(), Some(&0));
            assert_eq!(name.iter().filter(|&&b| b == 0).count(), 1);
            assert_eq!(&name[..name.len() - 1], module.name().as_bytes());
        }
    }

    #[test]
    fn test_command_block_never_carries_data() {
        for &cmd in &[ISPTM, UNLKPT, TCGETS, 0, -1, c_int::max_value()] {
            let block = StrIoctl::command(cmd);
            assert_eq!(block.cmd(), cmd);
            assert_eq!(block.timeout(), 0);
            assert_eq!(block.data_len(), 0);
            assert!(!block.has_payload());
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_strioctl_layout_lp64() {
        assert_eq!(mem::size_of::<StrIoctl>(), 24);
        assert_eq!(mem::align_of::<StrIoctl>(), 8);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_strioctl_layout_ilp32() {
        assert_eq!(mem::size_of::<StrIoctl>(), 16);
        assert_eq!(mem::align_of::<StrIoctl>(), 4);
    }

    #[test]
    fn test_minor() {
        assert_eq!(minor(7), 7);
        assert_eq!(minor(makedev(26, 7)), 7);
        assert_eq!(minor(makedev(0, 0)), 0);
        assert_eq!(minor(makedev(u32::max_value() >> 14, 1234)), 1234);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_minor_uses_low_32_bits() {
        assert_eq!(minor(0x0000_00ab_0001_0002), 0x0001_0002);
        assert_eq!(minor(makedev(1, u32::max_value())), u32::max_value());
    }
}
