//! Performance benchmarks for rs-wlparse.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks cover the two extraction primitives on a realistic profile
//! snippet, plus a whole-row parse of a ranking listing.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rs_wlparse::{extract_between, integer_after, numeric_after};

const PROFILE_SNIPPET: &str = concat!(
    "<html><head><title>Maculus - Play Risk Online Free</title></head><body>",
    "<nav><a href=\"/\">Home</a><a href=\"/Forum\">Forum</a></nav>",
    "<big><b>Level 58</b></big>",
    "<font>Points earned in last 30 days:</font> 12,890<br />",
    "<font>Currently in</font> 7 multi-day games<br />",
    "<font>Played in</font> 1404 games (31.5% real-time)<br />",
    "<font>Joined WarLight:</font> 03/01/2011<br />",
    "This player has been booted 7 times (1.2% of turns)</font>",
    "<h3>Ladder Statistics</h3>",
    "<a href=\"/LadderTeam?LadderTeamID=811&TeamID=811\">1 v 1 Ladder</a>: ",
    "Ranked 12 with a rating of 1822. Best rating ever: 1904, best rank ever: 8.<br />",
    "</body></html>",
);

fn bench_window_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_between");
    group.throughput(Throughput::Bytes(PROFILE_SNIPPET.len() as u64));
    group.bench_function("title", |b| {
        b.iter(|| extract_between(black_box(PROFILE_SNIPPET), "<title>", " -"))
    });
    group.bench_function("deep_marker", |b| {
        b.iter(|| extract_between(black_box(PROFILE_SNIPPET), "best rank ever: ", ".<br />"))
    });
    group.finish();
}

fn bench_typed_scans(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_scans");
    group.bench_function("integer_after", |b| {
        b.iter(|| integer_after(black_box(PROFILE_SNIPPET), "Played in</font> "))
    });
    group.bench_function("numeric_after", |b| {
        b.iter(|| numeric_after(black_box(PROFILE_SNIPPET), " ("))
    });
    group.finish();
}

fn bench_field_sweep(c: &mut Criterion) {
    // A typical profile read touches a dozen markers on the same body.
    c.bench_function("profile_field_sweep", |b| {
        b.iter(|| {
            let page = black_box(PROFILE_SNIPPET);
            let _ = extract_between(page, "<title>", " -");
            let _ = integer_after(page, "<big><b>Level ");
            let _ = integer_after(page, "Currently in</font> ");
            let _ = integer_after(page, "Played in</font> ");
            let _ = numeric_after(page, " (");
            let _ = integer_after(page, "This player has been booted ");
            let _ = integer_after(page, "Ranked ");
            let _ = integer_after(page, "rating of ");
        })
    });
}

criterion_group!(
    benches,
    bench_window_extraction,
    bench_typed_scans,
    bench_field_sweep
);
criterion_main!(benches);
