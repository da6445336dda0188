use camino::Utf8PathBuf;
use kaleido_arena::BumpArena;
pub use kaleido_errors::Diagnostic;
pub use line_index::{LineCol, LineIndex};
use salsa::{Accumulator, Database};
use text_size::TextRange;

/// Arena reservation used when the caller has no preference.
pub const DEFAULT_ARENA_SIZE: usize = 16 * 1024 * 1024;

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
    pub arena_size: usize,
}

/// Parses `file` into a fresh arena and returns the tree dump. Syntax errors
/// and arena exhaustion are accumulated as [`Diagnostic`]s.
#[salsa::tracked(returns(ref))]
pub fn parse_tree(db: &dyn Database, file: File) -> String {
    let text = file.text(db);

    let arena = match BumpArena::with_capacity(file.arena_size(db)) {
        Ok(arena) => arena,
        Err(err) => {
            Diagnostic::error(err.to_string(), TextRange::empty(0.into())).accumulate(db);
            return String::new();
        }
    };

    match kaleido_parse::module(text, &arena) {
        Ok(module) => {
            tracing::debug!(
                path = %file.path(db),
                items = module.items().len(),
                nodes = module.nodes().len(),
                arena_used = arena.used(),
                "parsed file"
            );

            let tree = module.debug_tree();
            for diagnostic in module.into_diagnostics() {
                diagnostic.accumulate(db);
            }
            tree
        }
        Err(err) => {
            Diagnostic::error(err.to_string(), TextRange::empty(0.into())).accumulate(db);
            String::new()
        }
    }
}

pub fn check_file(db: &dyn Database, file: File) -> Vec<Diagnostic> {
    parse_tree(db, file);
    parse_tree::accumulated::<Diagnostic>(db, file)
        .into_iter()
        .map(|diagnostic| Diagnostic::clone(&diagnostic))
        .collect()
}
