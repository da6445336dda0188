use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use kaleido_db::{DEFAULT_ARENA_SIZE, File, LineIndex, check_file, parse_tree};
use kaleido_errors::Renderer;
use kaleido_tokenizer::{TokenKind, Tokenizer};
use salsa::DatabaseImpl;
use tracing::Level;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Front end for Kaleidoscope sources")]
struct Options {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalOptions {
    /// Bytes reserved for the parse arena of each file.
    #[arg(long, global = true, default_value_t = DEFAULT_ARENA_SIZE)]
    arena_size: usize,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file, print its tree and report syntax errors.
    Run { path: Utf8PathBuf },
    /// Parse a file and only report syntax errors.
    Check { path: Utf8PathBuf },
    /// Print the token stream of a file.
    Tokens { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    let Options { global, command } = Options::parse();
    init_logging(global.verbose);

    match command {
        Command::Run { path } => {
            let db = DatabaseImpl::default();
            let file = load(&db, path, global.arena_size)?;

            print!("{}", parse_tree(&db, file));
            report(&db, file)
        }
        Command::Check { path } => {
            let db = DatabaseImpl::default();
            let file = load(&db, path, global.arena_size)?;
            report(&db, file)
        }
        Command::Tokens { path } => {
            let text = read(&path)?;
            let line_index = LineIndex::new(&text);

            for token in Tokenizer::new(&text) {
                let pos = line_index.line_col(token.range.start());
                let kind = match token.kind {
                    TokenKind::NAME if token.is(&text, "def") => "DEF".to_owned(),
                    TokenKind::NAME if token.is(&text, "extern") => "EXTERN".to_owned(),
                    kind => format!("{kind:?}"),
                };
                println!("{}:{} {kind} {:?}", pos.line + 1, pos.col + 1, token.text(&text));
            }

            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

fn load(db: &DatabaseImpl, path: Utf8PathBuf, arena_size: usize) -> anyhow::Result<File> {
    let text = read(&path)?;
    Ok(File::new(db, path, text, arena_size))
}

fn report(db: &DatabaseImpl, file: File) -> anyhow::Result<()> {
    let diagnostics = check_file(db, file);
    if diagnostics.is_empty() {
        return Ok(());
    }

    let renderer = Renderer::styled();
    let path = file.path(db).as_str();
    let text = file.text(db);

    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic.render(&renderer, path, text));
    }

    anyhow::bail!("{} syntax error(s) in `{path}`", diagnostics.len())
}
