use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use receptbok_rs::{FilterState, Recipe, UrlState, filter};

const CATEGORIES: &[&str] = &["Frukost", "Huvudrätt", "Efterrätt", "Soppa", "Bröd"];
const TAGS: &[&str] = &["snabb", "söt", "salt", "vegetarisk", "glutenfri", "fest", "billig"];

fn synthetic_recipes(count: usize) -> Vec<Recipe> {
    (0..count)
        .map(|idx| {
            Recipe::new(format!("r{idx}"), format!("Recept nummer {idx}"))
                .with_category(CATEGORIES[idx % CATEGORIES.len()])
                .with_tags([TAGS[idx % TAGS.len()], TAGS[(idx / 3) % TAGS.len()]])
                .with_ingredients([
                    format!("{} dl mjölk", idx % 7 + 1),
                    "2 ägg".to_string(),
                    format!("{} g smör", (idx % 5 + 1) * 25),
                ])
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let recipes = synthetic_recipes(500);
    let cases = [
        ("none", FilterState::new()),
        ("search", FilterState::new().with_search("smör")),
        ("category", FilterState::new().with_category("Soppa")),
        ("tags", FilterState::new().with_tags(["söt", "fest"])),
        (
            "combined",
            FilterState::new()
                .with_search("mjölk")
                .with_category("Efterrätt")
                .with_tags(["snabb"]),
        ),
    ];
    for (label, state) in &cases {
        c.bench_with_input(BenchmarkId::new("filter_500", label), state, |b, state| {
            b.iter(|| black_box(filter(&recipes, state).len()));
        });
    }
}

fn bench_url_codec(c: &mut Criterion) {
    let state = UrlState::new(
        FilterState::new()
            .with_search("pannkakor med sylt")
            .with_category("Efterrätt")
            .with_tags(["söt", "snabb", "fest"]),
        Some("pannkakor".to_string()),
    );
    let encoded = state.encode();
    c.bench_function("url_state::encode", |b| b.iter(|| black_box(state.encode())));
    c.bench_function("url_state::decode", |b| {
        b.iter(|| black_box(UrlState::decode(&encoded)))
    });
}

criterion_group!(benches, bench_filter, bench_url_codec);
criterion_main!(benches);
