use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

/// Unlock a STREAMS pty and push ptem/ldterm onto its subordinate.
#[derive(StructOpt, Debug)]
#[structopt(name = "strpty")]
#[cfg_attr(not(any(target_os = "illumos", target_os = "solaris")), allow(dead_code))]
struct Options {
    /// Clone device to open the controller from
    #[structopt(long = "ptmx", default_value = "/dev/ptmx", parse(from_os_str))]
    ptmx: PathBuf,

    /// Only print the subordinate path, do not unlock
    #[structopt(long = "probe-only")]
    probe_only: bool,

    /// Verify that the prepared subordinate answers TCGETS
    #[structopt(long = "check")]
    check: bool,

    /// flexi_logger spec, RUST_LOG takes precedence
    #[structopt(long = "log-level", default_value = "info")]
    log_level: String,

    /// Write logs to files in this directory instead of stderr
    #[structopt(long = "log-dir", parse(from_os_str))]
    log_dir: Option<PathBuf>,
}

fn setup_logging(options: &Options) -> Result<(), flexi_logger::FlexiLoggerError> {
    let logger = flexi_logger::Logger::with_env_or_str(&options.log_level);
    let logger = if let Some(ref dir) = options.log_dir {
        logger.log_to_file().directory(dir.to_string_lossy().into_owned())
    } else {
        logger
    };
    logger.start()?;
    Ok(())
}

#[cfg(any(target_os = "illumos", target_os = "solaris"))]
fn run(options: &Options) -> Result<PathBuf, Box<dyn Error>> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    let controller = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(&options.ptmx)?;
    log::info!("opened controller {} as fd {}", options.ptmx.display(), controller.as_raw_fd());

    if options.probe_only {
        return Ok(strpty::ptsname(&controller)?);
    }

    let path = strpty::unlockpt(&controller)?;
    log::info!("prepared {}", path.display());

    if options.check {
        let subordinate = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)?;
        let termios = strpty::Native.tcgets(subordinate.as_raw_fd())?;
        log::info!("{} is a terminal (c_lflag {:#o})", path.display(), termios.c_lflag);
    }

    Ok(path)
}

#[cfg(not(any(target_os = "illumos", target_os = "solaris")))]
fn run(_options: &Options) -> Result<PathBuf, Box<dyn Error>> {
    Err("STREAMS ptys are only available on illumos and Solaris".into())
}

fn main() {
    let options = Options::from_args();

    if let Err(e) = setup_logging(&options) {
        eprintln!("Could not start logger: {}", e);
        process::exit(2);
    }

    match run(&options) {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
