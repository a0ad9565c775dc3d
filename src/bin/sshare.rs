use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use prime_share::{FileShareStore, ShamirShare, ShareStore, read_share_file};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

/// Secret sharing scheme.
///
/// With zero or one FILES the secret is read (from stdin or the file) and
/// split into shares. Reconstruction takes place whenever multiple files are
/// given; the secret is written to stdout.
#[derive(Parser, Debug)]
#[command(version, about, name = "sshare")]
struct Cli {
    /// Generate NUM shares
    #[arg(short, long = "nshares", value_name = "NUM", default_value_t = 3)]
    nshares: u32,

    /// Require NUM shares to reconstruct
    #[arg(short, long = "thresh", value_name = "NUM", default_value_t = 2)]
    thresh: u32,

    /// Write shares in DIR (default: a fresh shares-XXXXXX temp directory)
    #[arg(short, long, value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Secret to split, or two or more shares to combine
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.nshares < cli.thresh {
        bail!(
            "number of shares (n={}) must be >= threshold (t={})",
            cli.nshares,
            cli.thresh
        );
    }

    match cli.mode() {
        Mode::Reconstruct(files) => reconstruct(files),
        Mode::Distribute(secret) => distribute(&cli, secret),
    }
}

/// What a command line asks for
#[derive(Debug, PartialEq, Eq)]
enum Mode<'a> {
    /// Split the secret read from the file, or from stdin when `None`
    Distribute(Option<&'a Path>),
    /// Combine two or more share files
    Reconstruct(&'a [PathBuf]),
}

impl Cli {
    fn mode(&self) -> Mode<'_> {
        match self.files.as_slice() {
            [] => Mode::Distribute(None),
            [secret] => Mode::Distribute(Some(secret.as_path())),
            files => Mode::Reconstruct(files),
        }
    }
}

fn distribute(cli: &Cli, source: Option<&Path>) -> anyhow::Result<()> {
    let scheme = ShamirShare::new(cli.nshares, cli.thresh).context("invalid sharing parameters")?;

    let mut secret = Zeroizing::new(Vec::new());
    match source {
        Some(path) => {
            File::open(path)
                .and_then(|mut f| f.read_to_end(&mut secret))
                .with_context(|| format!("failed to read secret from {}", path.display()))?;
        }
        None => {
            io::stdin()
                .lock()
                .read_to_end(&mut secret)
                .context("failed to read secret from stdin")?;
        }
    }
    debug!(secret_len = secret.len(), "read secret");

    let shares = scheme.split(&secret).context("failed to split secret")?;

    let (outdir, generated) = match &cli.outdir {
        Some(dir) => (dir.clone(), false),
        None => {
            let dir = tempfile::Builder::new()
                .prefix("shares-")
                .tempdir()
                .context("failed to create share directory")?;
            (dir.keep(), true)
        }
    };

    let mut store = FileShareStore::new(&outdir)
        .with_context(|| format!("failed to open {}", outdir.display()))?;
    store
        .store_all(&shares)
        .with_context(|| format!("failed to write shares to {}", outdir.display()))?;
    info!(count = shares.len(), dir = %outdir.display(), "wrote shares");

    if generated {
        println!("{}", outdir.display());
    }
    Ok(())
}

fn reconstruct(files: &[PathBuf]) -> anyhow::Result<()> {
    let shares = files
        .iter()
        .map(|path| load(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let secret = Zeroizing::new(
        ShamirShare::reconstruct(&shares).context("failed to reconstruct secret")?,
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(&secret).context("failed to write secret")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<prime_share::Share> {
    read_share_file(path).with_context(|| format!("failed to read share {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sshare").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_files_distributes_from_stdin() {
        let cli = parse(&[]);
        assert_eq!(cli.mode(), Mode::Distribute(None));
        assert_eq!((cli.nshares, cli.thresh), (3, 2));
        assert!(cli.outdir.is_none());
    }

    #[test]
    fn test_one_file_distributes_from_it() {
        let cli = parse(&["-n", "5", "-t", "3", "-o", "out", "secret.bin"]);
        assert_eq!(cli.mode(), Mode::Distribute(Some(Path::new("secret.bin"))));
        assert_eq!((cli.nshares, cli.thresh), (5, 3));
        assert_eq!(cli.outdir.as_deref(), Some(Path::new("out")));
    }

    #[test]
    fn test_two_or_more_files_reconstruct() {
        let cli = parse(&["shares/1", "shares/3"]);
        assert_eq!(
            cli.mode(),
            Mode::Reconstruct(&[PathBuf::from("shares/1"), PathBuf::from("shares/3")])
        );

        let cli = parse(&["--nshares", "4", "--thresh", "3", "a", "b", "c"]);
        assert!(matches!(cli.mode(), Mode::Reconstruct(files) if files.len() == 3));
    }
}
