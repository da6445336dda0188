use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static SOURCE: &str = "
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); // comment
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); /* block */
extern sin(x); [ ] { } = . \\ : \"string literal\"
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); // comment
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); /* block */
extern sin(x); [ ] { } = . \\ : \"string literal\"
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); // comment
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); /* block */
extern sin(x); [ ] { } = . \\ : \"string literal\"
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); // comment
def foo(a, b) a * (b + 1.5) < bar(a, b / 2); /* block */
extern sin(x); [ ] { } = . \\ : \"string literal\"
";

static NUMBERS: &str = "1 -2 3.25 -4.5 1e10 6.02e23 -7 8 9.0 10 11 -12.75 13 14e-3 15 16 17 18 19 20 \
     1 -2 3.25 -4.5 1e10 6.02e23 -7 8 9.0 10 11 -12.75 13 14e-3 15 16 17 18 19 20";

static CANDIDATES: [(&str, &str); 2] = [("numbers", NUMBERS), ("definitions_and_punctuation", SOURCE)];

fn iterate(s: &str) {
    use kaleido_tokenizer::{TokenKind, Tokenizer};

    let mut tokenizer = Tokenizer::new(s);

    loop {
        let token = tokenizer.next_token();

        if token.kind == TokenKind::EOF {
            break;
        }

        black_box(token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
