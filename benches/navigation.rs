use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::NaiveDate;
use touchline::fixtures::create_mock_day;
use touchline::live::{LiveReconciler, TreeSurface};
use touchline::nav::{ContainerKind, Direction, ElementKind, MoveContext, NodeId, NodeSpec, Rect, SpatialResolver, ViewTree};
use touchline::store::UserProfile;
use touchline::tui::layout::{build_shell, home_page};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
}

/// Unstructured page of buttons, resolved by distance search only
fn button_field(columns: usize, rows: usize) -> (ViewTree, Vec<NodeId>) {
    let mut tree = ViewTree::new();
    tree.set_viewport(Rect::new(0.0, 0.0, 400.0, 200.0));
    let content = tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Content, Rect::new(0.0, 0.0, 400.0, 200.0)),
    );
    let mut buttons = Vec::new();
    for row in 0..rows {
        for col in 0..columns {
            // Stagger rows so scores rarely tie
            let x = col as f64 * 12.0 + (row % 3) as f64 * 2.0;
            let y = row as f64 * 3.0;
            buttons.push(tree.insert(
                content,
                NodeSpec::element(ElementKind::Button, Rect::new(x, y, 10.0, 1.0)),
            ));
        }
    }
    (tree, buttons)
}

fn bench_geometric_resolve(c: &mut Criterion) {
    let (tree, buttons) = button_field(30, 60);
    let resolver = SpatialResolver::default();
    let current = buttons[buttons.len() / 2];

    c.bench_function("geometric_resolve_1800_candidates", |b| {
        b.iter(|| {
            for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
                let cx = MoveContext {
                    tree: &tree,
                    current,
                    scope: None,
                    direction,
                };
                black_box(resolver.resolve(black_box(&cx)));
            }
        })
    });
}

fn bench_home_page_moves(c: &mut Criterion) {
    let mut tree = ViewTree::new();
    let shell = build_shell(&mut tree, 160.0, 48.0);
    let cards = home_page(&mut tree, shell.content, shell.area, day(), &create_mock_day(day()), &UserProfile::default());
    let resolver = SpatialResolver::default();

    c.bench_function("home_page_move_every_card", |b| {
        b.iter(|| {
            for &current in &cards {
                for direction in [Direction::Down, Direction::Right] {
                    let cx = MoveContext {
                        tree: &tree,
                        current,
                        scope: None,
                        direction,
                    };
                    black_box(resolver.resolve(&cx));
                }
            }
        })
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let matches = create_mock_day(day());
    let mut tree = ViewTree::new();
    let shell = build_shell(&mut tree, 160.0, 48.0);
    home_page(&mut tree, shell.content, shell.area, day(), &matches, &UserProfile::default());
    let mut rendered = matches.clone();
    let mut profile = UserProfile::default();
    let mut reconciler = LiveReconciler::new();

    c.bench_function("reconcile_mock_day", |b| {
        b.iter(|| {
            let mut surface = TreeSurface {
                tree: &mut tree,
                rendered: &mut rendered,
                open_match: None,
            };
            black_box(reconciler.reconcile(black_box(&matches), &mut profile, &[], &mut surface));
        })
    });
}

criterion_group!(
    benches,
    bench_geometric_resolve,
    bench_home_page_moves,
    bench_reconcile
);
criterion_main!(benches);
