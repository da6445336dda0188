use kaleido_db::{DEFAULT_ARENA_SIZE, Diagnostic, File, LineIndex, check_file, parse_tree};
use salsa::DatabaseImpl;

#[derive(Debug, PartialEq, Eq)]
struct ExpectedDiag {
    line: usize,
    message: String,
}

fn parse_expectations(fixture: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((_, comment)) = line.split_once("//~") else {
            continue;
        };
        let comment = comment.trim();
        let comment = comment.strip_prefix("ERROR").unwrap_or(comment).trim();
        if comment.is_empty() {
            continue;
        }
        expected.push(ExpectedDiag { line: idx + 1, message: comment.to_owned() });
    }

    expected
}

fn collect_actual(fixture: &str, diagnostics: &[Diagnostic]) -> Vec<ExpectedDiag> {
    let line_index = LineIndex::new(fixture);
    diagnostics
        .iter()
        .map(|diag| {
            let line = line_index.line_col(diag.range().start()).line as usize + 1;
            ExpectedDiag { line, message: diag.message().to_owned() }
        })
        .collect()
}

#[track_caller]
fn check(fixture: &str) {
    let db = DatabaseImpl::new();
    let file = File::new(&db, "fixture.ks".into(), fixture.to_owned(), DEFAULT_ARENA_SIZE);

    let diagnostics = check_file(&db, file);
    let actual = collect_actual(fixture, &diagnostics);
    let expected = parse_expectations(fixture);

    assert_eq!(actual, expected, "diagnostics did not match the annotations");
}

#[test]
fn clean_source() {
    check(
        r#"
def fib(n) fib(n - 1) + fib(n - 2);
extern print(x);
print(fib(10));
"#,
    );
}

#[test]
fn errors_are_reported_on_their_line() {
    check(
        r#"
def ok(x) x * 2;
def 5(x) x; //~ ERROR Expected function name in prototype
extern missing x; //~ ERROR Expected '(' in prototype
ok(1 + ); //~ ERROR Unknown token!
(ok(2); //~ ERROR Expected ')'
"#,
    );
}

#[test]
fn exhausted_arena_is_a_diagnostic() {
    let db = DatabaseImpl::new();
    let file = File::new(&db, "tiny.ks".into(), "def f(x) x".to_owned(), 16);

    let diagnostics = check_file(&db, file);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message().starts_with("arena exhausted"), "{diagnostics:?}");
    assert!(parse_tree(&db, file).is_empty());
}

#[test]
fn tree_is_cached_until_the_text_changes() {
    use salsa::Setter;

    let mut db = DatabaseImpl::new();
    let file = File::new(&db, "edit.ks".into(), "x".to_owned(), DEFAULT_ARENA_SIZE);
    assert_eq!(parse_tree(&db, file), "EXPRESSION\n  VARIABLE x\n");

    file.set_text(&mut db).to("y(1)".to_owned());
    assert_eq!(parse_tree(&db, file), "EXPRESSION\n  CALL y\n    NUMBER 1.0\n");
}
